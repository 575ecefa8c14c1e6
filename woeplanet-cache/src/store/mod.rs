//! Typed accessors over the cache tables.
//!
//! - [`place`] writes and reads the `places` table.
//! - [`records`] covers the flat lookup tables (admins, coords, countries,
//!   aliases, placetypes and Who's On First mappings).
//! - [`lists`] stores the packed children and ancestors lists.
//!
//! Writers upsert exactly the populated fields of a record. Readers report
//! an absent key as `Ok(None)`.

mod lists;
mod place;
mod records;

use woeplanet_core::id_to_storage;

use crate::{CacheError, cache::codec_error};

/// Convert a lookup key to its stored form, attributing failures to
/// `operation`.
pub(crate) fn storage_key(
    operation: &'static str,
    field: &str,
    id: u64,
) -> Result<i64, CacheError> {
    id_to_storage(field, id).map_err(|source| codec_error(operation, source))
}
