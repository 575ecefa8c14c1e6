//! Errors raised by the gazetteer cache.

use camino::Utf8PathBuf;
use rusqlite::Error as SqliteError;
use thiserror::Error;
use woeplanet_core::{CodecError, Table};

/// Errors raised while opening, configuring or querying the cache.
///
/// Absent rows are never errors; accessors report them as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Failed to create the directory holding the cache file.
    #[error("failed to create cache directory {path:?}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open cache at {path:?}")]
    Open {
        /// Location of the cache file.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Applying a storage pragma failed.
    #[error("failed to apply pragma {pragma}")]
    Configure {
        /// Pragma being applied.
        pragma: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating, dropping or indexing a table failed.
    #[error("{step} failed for table {table}")]
    Ddl {
        /// Table being altered.
        table: Table,
        /// DDL step that failed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Compiling a statement failed.
    #[error("{operation}: failed to prepare statement")]
    Prepare {
        /// Accessor that issued the statement.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Binding or executing a statement failed.
    #[error("{operation}: failed to execute statement")]
    Execute {
        /// Accessor that issued the statement.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Reading a result row failed.
    #[error("{operation}: failed to fetch results")]
    Fetch {
        /// Accessor that issued the statement.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Packing a document or unpacking a row failed.
    #[error("{operation}: invalid column data")]
    Codec {
        /// Accessor that handled the data.
        operation: &'static str,
        /// Codec failure.
        #[source]
        source: CodecError,
    },
}

impl CacheError {
    /// Name of the accessor that failed, when the error belongs to one.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Prepare { operation, .. }
            | Self::Execute { operation, .. }
            | Self::Fetch { operation, .. }
            | Self::Codec { operation, .. } => Some(*operation),
            Self::CreateDirectory { .. }
            | Self::Open { .. }
            | Self::Configure { .. }
            | Self::Ddl { .. } => None,
        }
    }
}
