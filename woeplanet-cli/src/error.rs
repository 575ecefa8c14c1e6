//! Error types emitted by the woeplanet CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use woeplanet_cache::CacheError;

/// Errors emitted by the woeplanet CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that could supply it.
        env: &'static str,
    },
    /// A value could not be interpreted.
    #[error("invalid {field} {value:?}")]
    InvalidArgument {
        /// Name of the offending option.
        field: &'static str,
        /// Value as supplied.
        value: String,
    },
    /// The cache file does not exist or is not a file.
    #[error("cache path {path:?} does not exist or is not a file")]
    MissingCache {
        /// Location checked.
        path: Utf8PathBuf,
    },
    /// The cache could not be opened.
    #[error("failed to open cache at {path:?}: {source}")]
    OpenCache {
        /// Location of the cache file.
        path: Utf8PathBuf,
        /// Underlying cache error.
        #[source]
        source: CacheError,
    },
    /// A cache operation failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// The requested record is not in the cache.
    #[error("{what} not found in the cache")]
    NotFound {
        /// Description of the missing record.
        what: String,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
