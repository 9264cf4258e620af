//! Block File
//!
//! Block-addressed reads and writes over one file.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::config::{Config, SyncStrategy};
use crate::error::Result;

/// A file viewed as a sequence of fixed-size blocks
///
/// Block `n` starts at byte `n * block_size`. Reading a block that lies
/// partly or wholly past end of file yields zeros for the missing bytes.
pub struct BlockFile {
    /// Underlying file handle
    file: File,
    /// Path, for logging
    path: PathBuf,
    /// Size of every block in bytes
    block_size: usize,
    /// Whether each write is followed by an fsync
    sync_strategy: SyncStrategy,
}

impl BlockFile {
    /// Open the file at `path` as configured (read-only / create)
    pub fn open(path: &Path, block_size: usize, config: &Config) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(!config.read_only)
            .create(config.create && !config.read_only)
            .open(path)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            block_size,
            sync_strategy: config.sync_strategy,
        })
    }

    /// Read block `block` into `buf`
    ///
    /// Returns how many bytes actually came from the file; the rest of
    /// `buf` is zero-filled.
    pub fn read_block(&mut self, block: u64, buf: &mut [u8]) -> Result<usize> {
        debug_assert_eq!(buf.len(), self.block_size);

        self.file.seek(SeekFrom::Start(self.block_offset(block)))?;

        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        buf[filled..].fill(0);

        trace!(path = %self.path.display(), block, bytes = filled, "block read");
        Ok(filled)
    }

    /// Write `buf` as block `block`, extending the file if needed
    pub fn write_block(&mut self, block: u64, buf: &[u8]) -> Result<()> {
        debug_assert_eq!(buf.len(), self.block_size);

        self.file.seek(SeekFrom::Start(self.block_offset(block)))?;
        self.file.write_all(buf)?;

        if let SyncStrategy::EveryWrite = self.sync_strategy {
            self.file.sync_data()?;
        }

        trace!(path = %self.path.display(), block, "block written");
        Ok(())
    }

    /// Current file length in bytes
    pub fn len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of blocks, counting a trailing partial block
    pub fn block_count(&self) -> Result<u64> {
        let size = self.block_size as u64;
        Ok(self.len()?.div_ceil(size))
    }

    /// Flush data and metadata to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    fn block_offset(&self, block: u64) -> u64 {
        block * self.block_size as u64
    }
}
