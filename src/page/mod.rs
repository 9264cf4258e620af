//! Page Module
//!
//! Fixed-size pages packing variable-length key/value pairs.
//!
//! ## Responsibilities
//! - Byte layout of one page and checked access to its offset index
//! - Fit check, insert, lookup, delete and n-th key (`pair.rs`)
//! - Redistributing a full page over two pages (`split.rs`)
//! - Structural validation of bytes read from storage (`validate.rs`)
//!
//! ## Page Layout
//! ```text
//! ┌───────────┬──────────┬─────┬──────────┬──────────────┬──────────────────────┐
//! │ Count (2) │ Off1 (2) │ ... │ OffN (2) │  free space  │ ..v2 k2 v1 k1        │
//! └───────────┴──────────┴─────┴──────────┴──────────────┴──────────────────────┘
//! 0                                                                        1024
//! ```
//! - `Count` is the number of offsets N, always even (N/2 pairs)
//! - Odd slots hold key offsets, even slots value offsets
//! - Pair bytes are packed from the tail backward: key first, its value
//!   directly below it, the next pair below that
//! - A key ends where the previous pair's value starts (or at 1024)
//! - All integers are little-endian `u16`

mod pair;
mod split;
mod validate;

use std::fmt;

use tracing::warn;

use crate::error::{DbmError, Result};

// =============================================================================
// Shared Constants
// =============================================================================

/// Page block size in bytes
pub const PBLKSIZ: usize = 1024;

/// Directory block size in bytes
pub const DBLKSIZ: usize = 4096;

/// Largest accepted `key + value + PAIR_OVERHEAD`
pub const PAIRMAX: usize = 1008;

/// Default bound on page splits attempted for a single insert
pub const SPLTMAX: usize = 10;

/// Size of one index entry (an offset) in bytes
pub const OFFSET_SIZE: usize = 2;

/// Index bytes consumed by one pair: a key offset plus a value offset
pub const PAIR_OVERHEAD: usize = 2 * OFFSET_SIZE;

/// Upper bound on the entry count of a page
pub const MAX_ENTRIES: usize = PBLKSIZ / OFFSET_SIZE;

// =============================================================================
// Page
// =============================================================================

/// One page buffer
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    buf: [u8; PBLKSIZ],
}

impl Page {
    /// Create an empty page
    pub fn new() -> Self {
        Self { buf: [0u8; PBLKSIZ] }
    }

    /// Wrap raw bytes without validating them
    ///
    /// Short input is zero-filled; bytes past `PBLKSIZ` are ignored. Only
    /// `load` hands such a page out, after it has validated.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        let mut page = Self::new();
        let len = bytes.len().min(PBLKSIZ);
        page.buf[..len].copy_from_slice(&bytes[..len]);
        page
    }

    /// Wrap bytes read from block `pagno`, rejecting structurally invalid pages
    ///
    /// Short input is zero-filled, so an empty slice loads as an empty page.
    pub fn load(bytes: &[u8], pagno: u64) -> Result<Self> {
        let page = Self::from_bytes(bytes);
        if !page.validate() {
            warn!(page = pagno, count = page.entry_count(), "rejecting corrupt page");
            return Err(DbmError::CorruptPage { page: pagno });
        }
        Ok(page)
    }

    /// Raw page bytes, ready to be written to storage
    pub fn as_bytes(&self) -> &[u8; PBLKSIZ] {
        &self.buf
    }

    /// Reset to an empty page
    pub fn clear(&mut self) {
        self.buf.fill(0);
    }

    /// Number of index entries N (twice the pair count)
    pub fn entry_count(&self) -> usize {
        self.read_u16(0)
    }

    /// Number of stored pairs
    pub fn pair_count(&self) -> usize {
        self.entry_count() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Bytes between the end of the index and the lowest used payload byte
    pub fn free_space(&self) -> usize {
        self.payload_floor().saturating_sub(self.index_end())
    }

    /// Iterate `(key, value)` views in physical slot order
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            page: self,
            next: 0,
            count: self.pair_count(),
        }
    }

    // =========================================================================
    // Index Accessors
    // =========================================================================

    /// Offset stored in index slot `slot` (1-based; slot 0 is the count)
    pub(crate) fn offset(&self, slot: usize) -> usize {
        self.read_u16(slot * OFFSET_SIZE)
    }

    pub(crate) fn set_offset(&mut self, slot: usize, offset: usize) {
        self.write_u16(slot * OFFSET_SIZE, offset);
    }

    pub(crate) fn set_entry_count(&mut self, count: usize) {
        self.write_u16(0, count);
    }

    /// First byte past the offset index
    pub(crate) fn index_end(&self) -> usize {
        (self.entry_count() + 1) * OFFSET_SIZE
    }

    /// Lowest payload byte in use (`PBLKSIZ` on an empty page)
    pub(crate) fn payload_floor(&self) -> usize {
        match self.entry_count() {
            0 => PBLKSIZ,
            n => self.offset(n),
        }
    }

    pub(crate) fn key_offset(&self, pair: usize) -> usize {
        self.offset(key_slot(pair))
    }

    pub(crate) fn value_offset(&self, pair: usize) -> usize {
        self.offset(value_slot(pair))
    }

    /// One past the last byte owned by `pair`
    pub(crate) fn pair_end(&self, pair: usize) -> usize {
        match pair {
            0 => PBLKSIZ,
            p => self.value_offset(p - 1),
        }
    }

    pub(crate) fn key(&self, pair: usize) -> &[u8] {
        &self.buf[self.key_offset(pair)..self.pair_end(pair)]
    }

    pub(crate) fn value(&self, pair: usize) -> &[u8] {
        &self.buf[self.value_offset(pair)..self.key_offset(pair)]
    }

    fn read_u16(&self, pos: usize) -> usize {
        u16::from_le_bytes([self.buf[pos], self.buf[pos + 1]]) as usize
    }

    fn write_u16(&mut self, pos: usize, value: usize) {
        debug_assert!(value <= PBLKSIZ);
        self.buf[pos..pos + OFFSET_SIZE].copy_from_slice(&(value as u16).to_le_bytes());
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Page");
        out.field("entries", &self.entry_count());
        // Offsets of an invalid page are not safe to follow.
        if self.validate() {
            out.field("free", &self.free_space());
        } else {
            out.field("corrupt", &true);
        }
        out.finish()
    }
}

/// Index slot holding the key offset of `pair`
pub(crate) fn key_slot(pair: usize) -> usize {
    2 * pair + 1
}

/// Index slot holding the value offset of `pair`
pub(crate) fn value_slot(pair: usize) -> usize {
    2 * pair + 2
}

// =============================================================================
// Pair Iterator
// =============================================================================

/// Iterator over the pairs of a page in physical slot order
pub struct Pairs<'a> {
    page: &'a Page,
    next: usize,
    count: usize,
}

impl<'a> Iterator for Pairs<'a> {
    /// (key, value)
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let pair = self.next;
        self.next += 1;
        Some((self.page.key(pair), self.page.value(pair)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Pairs<'_> {}
