//! Directory File
//!
//! The directory bitmap on disk, read through a single-block cache.

use std::path::Path;

use crate::config::Config;
use crate::directory::BitStore;
use crate::error::Result;
use crate::page::DBLKSIZ;

use super::BlockFile;

/// Bits held by one directory block
const BITS_PER_BLOCK: u64 = DBLKSIZ as u64 * 8;

/// Directory bitmap backed by a file of `DBLKSIZ` blocks
///
/// Bit `n` lives in byte `n / 8`, bit `n % 8`. Exactly one block is cached;
/// every `set` writes its block straight through.
pub struct DirFile {
    /// Block storage for the bitmap
    file: BlockFile,
    /// The cached block
    buf: Vec<u8>,
    /// Block number held in `buf`, if any
    cached: Option<u64>,
    /// Number of addressable bits, a whole number of blocks
    maxbno: u64,
}

impl DirFile {
    /// Open the directory file, deriving `maxbno` from its length
    pub fn open(path: &Path, config: &Config) -> Result<Self> {
        let file = BlockFile::open(path, DBLKSIZ, config)?;
        let len = file.len()?;

        Ok(Self {
            file,
            buf: vec![0u8; DBLKSIZ],
            // A fresh directory is all zeros, which the empty buffer already is.
            cached: if len == 0 { Some(0) } else { None },
            maxbno: len.div_ceil(DBLKSIZ as u64) * BITS_PER_BLOCK,
        })
    }

    /// Flush to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Drop the cached block so the next access re-reads it
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    fn load(&mut self, block: u64) -> Result<()> {
        if self.cached == Some(block) {
            return Ok(());
        }
        self.cached = None;
        self.file.read_block(block, &mut self.buf)?;
        self.cached = Some(block);
        Ok(())
    }
}

impl BitStore for DirFile {
    fn bit_len(&self) -> u64 {
        self.maxbno
    }

    fn test(&mut self, bit: u64) -> Result<bool> {
        let byte = bit / 8;
        self.load(byte / DBLKSIZ as u64)?;
        Ok(self.buf[(byte % DBLKSIZ as u64) as usize] & (1 << (bit % 8)) != 0)
    }

    fn set(&mut self, bit: u64) -> Result<()> {
        let byte = bit / 8;
        let block = byte / DBLKSIZ as u64;
        self.load(block)?;

        self.buf[(byte % DBLKSIZ as u64) as usize] |= 1 << (bit % 8);
        if let Err(e) = self.file.write_block(block, &self.buf) {
            self.cached = None;
            return Err(e);
        }

        self.maxbno = self.maxbno.max((block + 1) * BITS_PER_BLOCK);
        Ok(())
    }
}
