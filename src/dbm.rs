//! Dbm Module
//!
//! The database handle that coordinates all components.
//!
//! ## Responsibilities
//! - Open the directory and page files
//! - Route each key through the directory to its page
//! - Split overflowing pages, bounded by `split_max`
//! - Iterate keys in physical page order
//! - Track a sticky error flag for I/O and corruption failures

use std::fs;
use std::path::Path;

use tracing::{debug, error, warn};

use crate::config::Config;
use crate::directory::{BitStore, DirectoryIndex};
use crate::error::{DbmError, Result};
use crate::hash::hash;
use crate::page::{Page, PAIRMAX, PAIR_OVERHEAD, PBLKSIZ};
use crate::storage::{BlockFile, DirFile};

/// How `store` treats a key that is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// Keep the existing pair and report `StoreOutcome::Exists`
    Insert,

    /// Drop the existing pair, then insert the new one
    Replace,
}

/// Result of a successful `store`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The pair was written
    Stored,

    /// `StoreMode::Insert` found the key already present; nothing changed
    Exists,
}

/// Iteration position: a page block and the last pair returned from it
#[derive(Debug, Clone, Copy)]
struct Cursor {
    block: u64,
    slot: usize,
}

/// A database handle
///
/// ## Access Model: single handle, single thread
///
/// Every call is a synchronous read page → modify in memory → write page
/// sequence. There is no locking; two handles writing the same files will
/// corrupt them.
///
/// ## Caches
/// - one page buffer, tagged with its block number (`pagbno`)
/// - one directory block inside `DirFile`
///
/// Both are dropped whenever an operation fails with an I/O-class error.
pub struct Dbm {
    /// Handle configuration
    config: Config,

    /// Page file
    pag: BlockFile,

    /// Directory bitmap file
    dir: DirFile,

    /// Trie traversal state
    directory: DirectoryIndex,

    /// The page buffer
    page: Page,

    /// Block number held in `page`, if any
    pagbno: Option<u64>,

    /// Key iteration position
    cursor: Option<Cursor>,

    /// Sticky I/O error flag
    io_error: bool,
}

impl Dbm {
    /// Open or create a database with the given config
    pub fn open(config: Config) -> Result<Self> {
        if config.split_max == 0 {
            return Err(DbmError::Config("split_max must be at least 1".to_string()));
        }

        let dir_path = config.dir_path();
        let pag_path = config.pag_path();

        if config.create && !config.read_only {
            for path in [&dir_path, &pag_path] {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let dir = DirFile::open(&dir_path, &config)?;
        let pag = BlockFile::open(&pag_path, PBLKSIZ, &config)?;

        debug!(
            dir = %dir_path.display(),
            pag = %pag_path.display(),
            pages = pag.block_count()?,
            dir_bits = dir.bit_len(),
            read_only = config.read_only,
            "opened database"
        );

        Ok(Self {
            config,
            pag,
            dir,
            directory: DirectoryIndex::new(),
            page: Page::new(),
            pagbno: None,
            cursor: None,
            io_error: false,
        })
    }

    /// Open with a base path (convenience method)
    ///
    /// Uses default config; files are `{path}.dir` and `{path}.pag`
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().path(path).build())
    }

    /// Get the value stored for `key`
    pub fn fetch(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let h = hash(key);
        self.guard(|db| {
            db.locate_page(h)?;
            Ok(db.page.get(key).map(<[u8]>::to_vec))
        })
    }

    /// Check whether `key` is stored
    pub fn contains(&mut self, key: &[u8]) -> Result<bool> {
        let h = hash(key);
        self.guard(|db| {
            db.locate_page(h)?;
            Ok(db.page.contains(key))
        })
    }

    /// Store a key-value pair
    ///
    /// Steps:
    /// 1. Locate the page for `hash(key)`
    /// 2. Apply `mode` to any existing pair
    /// 3. Split the page until the pair fits (at most `split_max` times)
    /// 4. Insert and write the page back
    pub fn store(&mut self, key: &[u8], value: &[u8], mode: StoreMode) -> Result<StoreOutcome> {
        self.check_writable()?;

        let need = key.len() + value.len() + PAIR_OVERHEAD;
        if need > PAIRMAX {
            return Err(DbmError::CapacityExceeded {
                need,
                max: PAIRMAX,
            });
        }

        let h = hash(key);
        self.guard(|db| {
            db.locate_page(h)?;

            match mode {
                StoreMode::Replace => {
                    db.page.remove(key);
                }
                StoreMode::Insert => {
                    if db.page.contains(key) {
                        return Ok(StoreOutcome::Exists);
                    }
                }
            }

            if !db.page.fits(key.len(), value.len()) {
                db.make_room(h, key.len(), value.len())?;
            }

            db.page.insert(key, value)?;
            db.write_page()?;
            Ok(StoreOutcome::Stored)
        })
    }

    /// Delete a key
    ///
    /// Returns `false` if the key was not present. Pages never shrink or merge.
    pub fn delete(&mut self, key: &[u8]) -> Result<bool> {
        self.check_writable()?;

        let h = hash(key);
        self.guard(|db| {
            db.locate_page(h)?;
            if !db.page.remove(key) {
                return Ok(false);
            }
            db.write_page()?;
            Ok(true)
        })
    }

    /// Start iteration and return the first key
    ///
    /// Keys come in physical order: ascending page number, then slot
    /// order within a page. This is neither hash nor key order.
    pub fn first_key(&mut self) -> Result<Option<Vec<u8>>> {
        self.cursor = Some(Cursor { block: 0, slot: 0 });
        self.guard(|db| db.advance())
    }

    /// Continue iteration; starts from the beginning if `first_key` was never called
    pub fn next_key(&mut self) -> Result<Option<Vec<u8>>> {
        if self.cursor.is_none() {
            return self.first_key();
        }
        self.guard(|db| db.advance())
    }

    /// Iterate over all keys from the beginning
    pub fn keys(&mut self) -> Keys<'_> {
        Keys {
            db: self,
            started: false,
            done: false,
        }
    }

    /// Flush both files to disk
    pub fn sync(&mut self) -> Result<()> {
        self.guard(|db| {
            db.dir.sync()?;
            db.pag.sync()
        })
    }

    /// Close the handle, syncing a writable database to disk
    pub fn close(mut self) -> Result<()> {
        if !self.config.read_only {
            self.sync()?;
        }
        Ok(())
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Whether an I/O-class error has occurred since the last `clear_error`
    pub fn error(&self) -> bool {
        self.io_error
    }

    /// Reset the sticky error flag
    pub fn clear_error(&mut self) {
        self.io_error = false;
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    /// Number of blocks in the page file
    pub fn page_count(&mut self) -> Result<u64> {
        self.guard(|db| db.pag.block_count())
    }

    /// Addressable bits in the directory (`maxbno`)
    pub fn dir_bits(&self) -> u64 {
        self.dir.bit_len()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Run `op`, raising the sticky flag and dropping caches on I/O-class errors
    fn guard<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = op(self);
        if let Err(e) = &result {
            if e.is_io_error() {
                error!(error = %e, "database operation failed");
                self.io_error = true;
                self.pagbno = None;
                self.dir.invalidate();
            }
        }
        result
    }

    fn check_writable(&self) -> Result<()> {
        if self.config.read_only {
            return Err(DbmError::ReadOnly);
        }
        Ok(())
    }

    /// Walk the directory for `h` and bring its page into the buffer
    fn locate_page(&mut self, h: u32) -> Result<()> {
        let location = self.directory.locate(&mut self.dir, h)?;
        self.read_page(location.page)
    }

    /// Load block `pagno` into the page buffer unless it is already there
    fn read_page(&mut self, pagno: u64) -> Result<()> {
        if self.pagbno == Some(pagno) {
            return Ok(());
        }

        self.pagbno = None;
        let mut block = [0u8; PBLKSIZ];
        self.pag.read_block(pagno, &mut block)?;
        self.page = Page::load(&block, pagno)?;
        self.pagbno = Some(pagno);
        Ok(())
    }

    /// Write the buffered page back to its block
    fn write_page(&mut self) -> Result<()> {
        let Some(pagno) = self.pagbno else {
            return Err(DbmError::NoPageBuffered);
        };
        self.pag.write_block(pagno, self.page.as_bytes())
    }

    /// Split the buffered page until a pair of the given size fits in the
    /// page `h` now routes to
    ///
    /// Write order per split: new sibling page, directory bit, original
    /// page. Every pair stays reachable if the process dies between steps.
    fn make_room(&mut self, h: u32, key_len: usize, val_len: usize) -> Result<()> {
        let mut splits = 0;
        while splits < self.config.split_max {
            let (Some(sbit), Some(newp)) =
                (self.directory.split_bit(), self.directory.sibling_page(h))
            else {
                warn!(hash = h, depth = self.directory.depth(), "hash bits exhausted");
                break;
            };
            let oldp = self.directory.location(h).page;

            let sibling = self.page.split(sbit)?;
            debug!(
                old_page = oldp,
                new_page = newp,
                sbit,
                kept = self.page.pair_count(),
                moved = sibling.pair_count(),
                "split page"
            );

            self.pag.write_block(newp, sibling.as_bytes())?;
            self.directory.record_split(&mut self.dir, h)?;
            self.pag.write_block(oldp, self.page.as_bytes())?;
            splits += 1;

            if h & sbit != 0 {
                self.page = sibling;
                self.pagbno = Some(newp);
            }

            if self.page.fits(key_len, val_len) {
                return Ok(());
            }
        }

        warn!(
            hash = h,
            splits,
            split_max = self.config.split_max,
            "cannot insert after split limit"
        );
        Err(DbmError::SplitLimitExceeded { attempts: splits })
    }

    /// Move the cursor to the next key, reading pages as needed
    fn advance(&mut self) -> Result<Option<Vec<u8>>> {
        let Some(mut cursor) = self.cursor else {
            return Ok(None);
        };
        let blocks = self.pag.block_count()?;

        while cursor.block < blocks {
            self.read_page(cursor.block)?;
            cursor.slot += 1;
            if let Some(key) = self.page.nth_key(cursor.slot) {
                let key = key.to_vec();
                self.cursor = Some(cursor);
                return Ok(Some(key));
            }
            cursor.block += 1;
            cursor.slot = 0;
        }

        self.cursor = Some(cursor);
        Ok(None)
    }
}

/// Iterator over every key of a database, in physical order
///
/// Stops after the first error.
pub struct Keys<'a> {
    db: &'a mut Dbm,
    started: bool,
    done: bool,
}

impl Iterator for Keys<'_> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = if self.started {
            self.db.next_key()
        } else {
            self.started = true;
            self.db.first_key()
        };

        match result {
            Ok(Some(key)) => Some(Ok(key)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
