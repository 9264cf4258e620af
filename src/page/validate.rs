//! Structural validation
//!
//! Every block read from the page file passes through here before any
//! offset in it is trusted.

use super::{key_slot, value_slot, Page, MAX_ENTRIES, PBLKSIZ};

impl Page {
    /// Check the page invariants
    ///
    /// - the entry count is even and below `MAX_ENTRIES`
    /// - the index does not run into the payload
    /// - walking toward the tail, each key offset is at or below the end of
    ///   the previous pair and each value offset is at or below its key
    pub fn validate(&self) -> bool {
        let count = self.entry_count();
        if count % 2 != 0 || count >= MAX_ENTRIES {
            return false;
        }

        let index_end = self.index_end();
        if index_end > PBLKSIZ {
            return false;
        }

        let mut end = PBLKSIZ;
        for pair in 0..count / 2 {
            let key_off = self.offset(key_slot(pair));
            let val_off = self.offset(value_slot(pair));
            if key_off > end || val_off > key_off {
                return false;
            }
            end = val_off;
        }

        end >= index_end
    }
}
