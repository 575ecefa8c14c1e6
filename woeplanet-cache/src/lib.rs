//! SQLite-backed cache for the Yahoo! GeoPlanet gazetteer.
//!
//! [`GeoplanetCache`] owns a single SQLite connection and exposes typed
//! accessors over the cache tables:
//! - schema lifecycle: [`GeoplanetCache::create_table`] and
//!   [`GeoplanetCache::create_index`];
//! - writers such as [`GeoplanetCache::insert_place`], which upsert exactly
//!   the populated fields of a record;
//! - point reads such as [`GeoplanetCache::get_woeid`], which report an
//!   absent key as `Ok(None)`;
//! - the monotonic WOE ID counter behind [`GeoplanetCache::refresh_meta`];
//! - hierarchy traversal through [`GeoplanetCache::find_ancestor`].
//!
//! Reads run through compiled statements tagged with the schema generation
//! they were built for; any DDL call retires them.
#![forbid(unsafe_code)]

mod cache;
mod error;
mod fs;
mod hierarchy;
mod meta;
mod options;
mod schema;
mod statements;
mod store;

pub use cache::GeoplanetCache;
pub use error::CacheError;
pub use hierarchy::AncestorSearch;
pub use meta::MetaStore;
pub use options::{CacheOptions, JournalMode, LockingMode, Synchronous};
pub use statements::ReadQuery;
