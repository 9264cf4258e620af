//! In-memory directory bitmap
//!
//! Same bit numbering and growth rule as the directory file: bit `n` is
//! bit `n % 8` of byte `n / 8`, and storage grows in whole `DBLKSIZ` blocks.

use crate::error::Result;
use crate::page::DBLKSIZ;

use super::BitStore;

/// A `BitStore` held entirely in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemBitmap {
    bytes: Vec<u8>,
}

impl MemBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing directory image
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of set bits
    pub fn count_ones(&self) -> u64 {
        self.bytes.iter().map(|b| b.count_ones() as u64).sum()
    }
}

impl BitStore for MemBitmap {
    fn bit_len(&self) -> u64 {
        self.bytes.len() as u64 * 8
    }

    fn test(&mut self, bit: u64) -> Result<bool> {
        let byte = (bit / 8) as usize;
        Ok(self
            .bytes
            .get(byte)
            .map_or(false, |b| b & (1 << (bit % 8)) != 0))
    }

    fn set(&mut self, bit: u64) -> Result<()> {
        let byte = (bit / 8) as usize;
        if byte >= self.bytes.len() {
            let blocks = byte / DBLKSIZ + 1;
            self.bytes.resize(blocks * DBLKSIZ, 0);
        }
        self.bytes[byte] |= 1 << (bit % 8);
        Ok(())
    }
}
