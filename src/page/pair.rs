//! Pair operations on a single page
//!
//! Pairs are kept in insertion order, so lookups are a linear scan.

use crate::error::{DbmError, Result};

use super::{key_slot, value_slot, Page, PAIR_OVERHEAD};

impl Page {
    /// Check whether a pair of the given sizes fits in the free space,
    /// counting the two index entries it needs.
    pub fn fits(&self, key_len: usize, val_len: usize) -> bool {
        key_len + val_len + PAIR_OVERHEAD <= self.free_space()
    }

    /// Append a pair below the current payload floor
    ///
    /// Does not look for an existing copy of `key`.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if !self.fits(key.len(), value.len()) {
            return Err(DbmError::PageFull {
                need: key.len() + value.len() + PAIR_OVERHEAD,
                free: self.free_space(),
            });
        }

        let pair = self.pair_count();
        let key_off = self.payload_floor() - key.len();
        let val_off = key_off - value.len();

        self.buf[key_off..key_off + key.len()].copy_from_slice(key);
        self.buf[val_off..val_off + value.len()].copy_from_slice(value);
        self.set_offset(key_slot(pair), key_off);
        self.set_offset(value_slot(pair), val_off);
        self.set_entry_count(self.entry_count() + 2);

        Ok(())
    }

    /// Value stored for `key`, if any
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.find(key).map(|pair| self.value(pair))
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    /// Delete the pair for `key`, compacting the payload
    ///
    /// Returns `false` when the key is absent.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let Some(pair) = self.find(key) else {
            return false;
        };

        let pairs = self.pair_count();
        let floor = self.payload_floor();
        let start = self.value_offset(pair);
        let freed = self.pair_end(pair) - start;

        if pair + 1 < pairs {
            // Everything stored below the removed pair moves up by `freed`.
            self.buf.copy_within(floor..start, floor + freed);

            for later in pair + 1..pairs {
                let key_off = self.key_offset(later) + freed;
                let val_off = self.value_offset(later) + freed;
                self.set_offset(key_slot(later - 1), key_off);
                self.set_offset(value_slot(later - 1), val_off);
            }
        }

        let last = pairs - 1;
        self.set_offset(key_slot(last), 0);
        self.set_offset(value_slot(last), 0);
        self.buf[floor..floor + freed].fill(0);
        self.set_entry_count(self.entry_count() - 2);

        true
    }

    /// Key of the `n`-th pair in physical order (1-based)
    pub fn nth_key(&self, n: usize) -> Option<&[u8]> {
        if n == 0 || n > self.pair_count() {
            return None;
        }
        Some(self.key(n - 1))
    }

    /// Index of the first pair whose key equals `key`
    fn find(&self, key: &[u8]) -> Option<usize> {
        (0..self.pair_count()).find(|&pair| self.key(pair) == key)
    }
}
