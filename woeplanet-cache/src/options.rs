//! Storage tuning applied when the cache is opened.
//!
//! The defaults trade crash durability for ingestion throughput: the cache
//! is rebuilt from source data, so relaxed syncing and an exclusive lock
//! are acceptable.

use serde::{Deserialize, Serialize};

/// `PRAGMA synchronous` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Synchronous {
    /// Hand writes to the OS without syncing.
    #[default]
    Off,
    /// Sync at critical moments only.
    Normal,
    /// Sync after every write.
    Full,
}

impl Synchronous {
    const fn as_pragma(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Normal => "NORMAL",
            Self::Full => "FULL",
        }
    }
}

/// `PRAGMA locking_mode` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockingMode {
    /// Release locks after each transaction.
    Normal,
    /// Hold the file lock for the lifetime of the connection.
    #[default]
    Exclusive,
}

impl LockingMode {
    const fn as_pragma(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Exclusive => "EXCLUSIVE",
        }
    }
}

/// `PRAGMA journal_mode` setting. Write-ahead logging is not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    /// Rollback journal deleted after each transaction.
    #[default]
    Delete,
    /// Rollback journal truncated after each transaction.
    Truncate,
    /// Rollback journal kept in memory.
    Memory,
    /// No journal.
    Off,
}

impl JournalMode {
    const fn as_pragma(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::Memory => "MEMORY",
            Self::Off => "OFF",
        }
    }
}

/// Options controlling how the cache file is opened.
///
/// # Examples
///
/// ```
/// use woeplanet_cache::{CacheOptions, Synchronous};
///
/// let options: CacheOptions = serde_json::from_str(r#"{"synchronous": "normal"}"#)
///     .expect("partial options");
/// assert_eq!(options.synchronous, Synchronous::Normal);
/// assert_eq!(options.page_size, 4096);
/// assert!(options.setup);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheOptions {
    /// Sync behaviour.
    pub synchronous: Synchronous,
    /// File locking behaviour.
    pub locking_mode: LockingMode,
    /// Rollback journal behaviour.
    pub journal_mode: JournalMode,
    /// Page size in bytes.
    pub page_size: u32,
    /// Page cache size, in pages.
    pub cache_size: u32,
    /// Create every table and index when opening.
    pub setup: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            synchronous: Synchronous::default(),
            locking_mode: LockingMode::default(),
            journal_mode: JournalMode::default(),
            page_size: 4096,
            cache_size: 10_000,
            setup: true,
        }
    }
}

impl CacheOptions {
    /// Options that skip schema creation on open.
    #[must_use]
    pub fn without_setup() -> Self {
        Self {
            setup: false,
            ..Self::default()
        }
    }

    /// Pragmas to apply, in order.
    pub(crate) fn pragmas(&self) -> [(&'static str, String); 5] {
        [
            ("synchronous", self.synchronous.as_pragma().to_owned()),
            ("locking_mode", self.locking_mode.as_pragma().to_owned()),
            ("journal_mode", self.journal_mode.as_pragma().to_owned()),
            ("page_size", self.page_size.to_string()),
            ("cache_size", self.cache_size.to_string()),
        ]
    }
}
