//! Configuration for hashdbm
//!
//! Centralized configuration with sensible defaults.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::page::SPLTMAX;

/// Extension of the directory (bitmap) file
pub const DIR_EXTENSION: &str = ".dir";

/// Extension of the page file
pub const PAG_EXTENSION: &str = ".pag";

/// Main configuration for a database handle
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// Base path of the database
    /// Files derived from it:
    ///   {path}.dir   (directory bitmap)
    ///   {path}.pag   (pages)
    pub path: PathBuf,

    /// Explicit directory file path, overriding `{path}.dir`
    pub dir_path: Option<PathBuf>,

    /// Explicit page file path, overriding `{path}.pag`
    pub pag_path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Access Configuration
    // -------------------------------------------------------------------------
    /// Open without write access; `store`/`delete` fail with `ReadOnly`
    pub read_only: bool,

    /// Create missing files (ignored when read-only)
    pub create: bool,

    // -------------------------------------------------------------------------
    // Handle Configuration
    // -------------------------------------------------------------------------
    /// Maximum page splits attempted for one insert
    pub split_max: usize,

    /// Sync strategy: whether to fsync after each block write
    pub sync_strategy: SyncStrategy,
}

/// Block write sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Leave flushing to the OS (and to explicit `sync()` calls)
    Never,

    /// fsync after every block write (safest, slowest)
    EveryWrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./hashdbm"),
            dir_path: None,
            pag_path: None,
            read_only: false,
            create: true,
            split_max: SPLTMAX,
            sync_strategy: SyncStrategy::Never,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolved directory file path
    pub fn dir_path(&self) -> PathBuf {
        self.dir_path
            .clone()
            .unwrap_or_else(|| with_suffix(&self.path, DIR_EXTENSION))
    }

    /// Resolved page file path
    pub fn pag_path(&self) -> PathBuf {
        self.pag_path
            .clone()
            .unwrap_or_else(|| with_suffix(&self.path, PAG_EXTENSION))
    }
}

/// Append `suffix` to the file name, keeping any extension already present
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the base path (files become `{path}.dir` and `{path}.pag`)
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Set explicit directory and page file paths
    pub fn files(mut self, dir: impl Into<PathBuf>, pag: impl Into<PathBuf>) -> Self {
        self.config.dir_path = Some(dir.into());
        self.config.pag_path = Some(pag.into());
        self
    }

    /// Open read-only
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.config.read_only = read_only;
        self
    }

    /// Create missing files
    pub fn create(mut self, create: bool) -> Self {
        self.config.create = create;
        self
    }

    /// Set the split bound per insert
    pub fn split_max(mut self, count: usize) -> Self {
        self.config.split_max = count;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
