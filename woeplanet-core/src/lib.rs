//! Storage-independent domain types for the WOE ID gazetteer cache.
//!
//! The crate describes what is stored (the [`Table`] catalogue with its
//! declared column types), the typed records read and written by the cache,
//! and the codec that flattens composite fields into storage scalars.
//! Nothing here touches a database.
#![forbid(unsafe_code)]

pub mod codec;
mod geometry;
mod place;
mod records;
mod table;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use codec::{CodecError, Column, ColumnMap, ColumnSet, Record, id_to_storage, pack, unpack};
pub use geometry::{Geometry, Position};
pub use place::{ConcordanceId, HistoryEntry, Place, PlaceAlias};
pub use records::{Admin, Alias, Coords, Country, Meta, Placetype, Wof};
pub use table::{FieldSet, StorageType, Table};
