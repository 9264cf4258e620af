//! Page splitting
//!
//! A full page is redistributed over itself and a fresh sibling by a single
//! hash bit. The destination of a key depends only on its hash and that bit,
//! never on which other keys share the page.

use crate::error::Result;
use crate::hash::hash;

use super::Page;

impl Page {
    /// Split this page by `sbit`
    ///
    /// Pairs whose key hash has `sbit` set move to the returned sibling; the
    /// rest stay here. Both pages are rebuilt from a snapshot in ascending
    /// slot order, so relative pair order is preserved on each side.
    pub fn split(&mut self, sbit: u32) -> Result<Page> {
        let snapshot = self.clone();
        let mut sibling = Page::new();
        self.clear();

        for (key, value) in snapshot.pairs() {
            let target = if hash(key) & sbit != 0 {
                &mut sibling
            } else {
                &mut *self
            };
            target.insert(key, value)?;
        }

        Ok(sibling)
    }
}
