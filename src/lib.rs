//! # hashdbm
//!
//! A disk-resident hashed key/value store in the ndbm/sdbm lineage, built on
//! Per-Åke Larson's dynamic hashing (1978):
//! - Fixed 1024-byte pages packing variable-length key/value pairs
//! - A bitmap directory read as a binary trie that grows one split at a time
//! - No full-table rehashing: an overflowing page splits in place
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                            Dbm                               │
//! │        fetch / store / delete / first_key / next_key         │
//! └──────┬──────────────────────┬──────────────────────┬────────┘
//!        │                      │                      │
//!        ▼                      ▼                      ▼
//!  ┌───────────┐        ┌───────────────┐       ┌────────────┐
//!  │   hash    │        │ DirectoryIndex│       │    Page    │
//!  │ (65599)   │───────▶│  (bit trie)   │──────▶│ (1024 B)   │
//!  └───────────┘        └───────┬───────┘       └─────┬──────┘
//!                               │                     │
//!                               ▼                     ▼
//!                        ┌────────────┐        ┌────────────┐
//!                        │  DirFile   │        │ BlockFile  │
//!                        │  (.dir)    │        │  (.pag)    │
//!                        └────────────┘        └────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod hash;
pub mod page;
pub mod directory;
pub mod storage;
pub mod dbm;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DbmError, Result};
pub use config::{Config, SyncStrategy};
pub use dbm::{Dbm, Keys, StoreMode, StoreOutcome};
pub use hash::hash;
pub use page::{Page, DBLKSIZ, PAIRMAX, PBLKSIZ, SPLTMAX};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of hashdbm
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
