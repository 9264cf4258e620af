//! Storage Module
//!
//! Block-addressed access to the two files of a database.
//!
//! ## Responsibilities
//! - Read and write whole blocks by number (`BlockFile`)
//! - Serve the directory bitmap through a one-block cache (`DirFile`)
//! - Treat holes and reads past end of file as zeros
//!
//! ## Files
//! ```text
//! <base>.pag   ┌──────────┬──────────┬──────────┬─────┐
//!              │ page 0   │ page 1   │ page 2   │ ... │   1024-byte blocks
//!              └──────────┴──────────┴──────────┴─────┘
//! <base>.dir   ┌──────────────────────┬─────┐
//!              │ bits 0..32767        │ ... │           4096-byte blocks
//!              └──────────────────────┴─────┘
//! ```

mod block;
mod dirfile;

pub use block::BlockFile;
pub use dirfile::DirFile;
