//! Directory Module
//!
//! Larson's dynamic hashing directory: a bitmap read as a binary trie that
//! maps a key hash to the page currently responsible for it.
//!
//! ## Trie Numbering
//! ```text
//!                     bit 0
//!                /            \
//!           bit 1              bit 2           hash bit 0 = 0 / 1
//!          /     \            /     \
//!      bit 3    bit 4     bit 5    bit 6       hash bit 1 = 0 / 1
//! ```
//! A set bit marks a node whose page has been split. Traversal starts at
//! bit 0 and descends while the current bit is set, choosing the left or
//! right child by successive hash bits. Stopping at depth `d` selects page
//! `hash & (2^d - 1)`.
//!
//! ## Responsibilities
//! - Walk the trie for a hash (`locate`)
//! - Record a split of the last located node (`record_split`)
//! - Abstract the backing bit array (`BitStore`) so the same walk runs over
//!   the cached directory file or an in-memory bitmap

mod bitmap;

pub use bitmap::MemBitmap;

use tracing::trace;

use crate::error::Result;

/// Deepest trie level; a 32-bit hash has no further bits to split on
pub const MAX_DEPTH: u32 = 32;

/// A growable array of bits backing the directory trie
pub trait BitStore {
    /// Number of addressable bits (`maxbno`); bits at or past it are unset
    fn bit_len(&self) -> u64;

    /// Read one bit
    fn test(&mut self, bit: u64) -> Result<bool>;

    /// Set one bit, growing the array when `bit >= bit_len()`
    fn set(&mut self, bit: u64) -> Result<()>;
}

/// Where a hash landed in the trie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Page number responsible for the hash
    pub page: u64,
    /// Trie node (directory bit) of that page
    pub bit: u64,
    /// Number of hash bits consumed
    pub depth: u32,
}

/// Traversal state of the directory
///
/// Remembers the node reached by the last `locate` so a following split
/// knows which bit to set.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    /// Current trie depth (number of hash bits in the fold mask)
    depth: u32,
    /// Directory bit of the node reached by the last traversal
    curbit: u64,
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the trie for `hash` and return the responsible page
    pub fn locate<B: BitStore + ?Sized>(&mut self, bits: &mut B, hash: u32) -> Result<Location> {
        let mut bit = 0u64;
        let mut depth = 0u32;

        while depth < MAX_DEPTH && bit < bits.bit_len() && bits.test(bit)? {
            bit = child(bit, hash, depth);
            depth += 1;
        }

        self.curbit = bit;
        self.depth = depth;

        let location = self.location(hash);
        trace!(hash, page = location.page, bit, depth, "located page");
        Ok(location)
    }

    /// Mark the current node as split and descend to the child `hash` selects
    ///
    /// The caller must have written both halves of the split before calling
    /// this, since setting the bit is what makes the sibling page reachable.
    pub fn record_split<B: BitStore + ?Sized>(&mut self, bits: &mut B, hash: u32) -> Result<()> {
        debug_assert!(self.depth < MAX_DEPTH);
        bits.set(self.curbit)?;
        self.curbit = child(self.curbit, hash, self.depth);
        self.depth += 1;
        Ok(())
    }

    /// Location of `hash` at the current depth
    pub fn location(&self, hash: u32) -> Location {
        Location {
            page: (hash & self.hmask()) as u64,
            bit: self.curbit,
            depth: self.depth,
        }
    }

    /// Fold mask `2^depth - 1`
    pub fn hmask(&self) -> u32 {
        ((1u64 << self.depth) - 1) as u32
    }

    /// Hash bit that separates the two halves of a split at this depth,
    /// or `None` once every hash bit is in use
    pub fn split_bit(&self) -> Option<u32> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        Some(1u32 << self.depth)
    }

    /// Page that receives the `split_bit` half when the current page splits
    pub fn sibling_page(&self, hash: u32) -> Option<u64> {
        self.split_bit()
            .map(|sbit| ((hash & self.hmask()) | sbit) as u64)
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn curbit(&self) -> u64 {
        self.curbit
    }
}

/// Child of trie node `bit` chosen by hash bit `depth`
fn child(bit: u64, hash: u32, depth: u32) -> u64 {
    if (hash >> depth) & 1 == 1 {
        2 * bit + 2
    } else {
        2 * bit + 1
    }
}
