//! Facade crate for the WOE ID gazetteer cache.
//!
//! This crate re-exports the domain types and, behind the `store-sqlite`
//! feature, the SQLite-backed cache.

#![forbid(unsafe_code)]

pub use woeplanet_core::{
    Admin, Alias, CodecError, Coords, Country, Geometry, Meta, Place, PlaceAlias, Placetype,
    Record, Table, Wof,
};

#[cfg(feature = "store-sqlite")]
pub use woeplanet_cache::{
    AncestorSearch, CacheError, CacheOptions, GeoplanetCache, MetaStore, ReadQuery,
};

#[cfg(feature = "test-support")]
pub use woeplanet_core::test_support;
