//! Named read statements and their schema-generation bookkeeping.
//!
//! Compiled statements live in the connection's prepared-statement cache.
//! Each named query remembers the schema generation it was compiled
//! against; a DDL call bumps the generation, and the first read after that
//! flushes the connection cache so every query recompiles against the new
//! schema.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
};

use log::debug;
use rusqlite::{CachedStatement, Connection};

use crate::CacheError;

/// The fixed set of named reads served by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadQuery {
    /// Singleton meta row.
    Meta,
    /// Place by WOE ID.
    Woeid,
    /// Parent of a place.
    Parent,
    /// Packed children of a place.
    Children,
    /// Administrative snapshot of a place.
    Admins,
    /// Coordinate snapshot of a place.
    Coords,
    /// Packed ancestors of a place.
    Ancestors,
    /// WOE ID mapped from a Who's On First id.
    Wof,
    /// Country by ISO alpha-2 code.
    Country,
    /// Placetype by short name.
    Placetype,
}

impl ReadQuery {
    /// Every named read.
    pub const ALL: [Self; 10] = [
        Self::Meta,
        Self::Woeid,
        Self::Parent,
        Self::Children,
        Self::Admins,
        Self::Coords,
        Self::Ancestors,
        Self::Wof,
        Self::Country,
        Self::Placetype,
    ];

    /// Accessor name reported in errors and logs.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::Meta => "get_meta",
            Self::Woeid => "get_woeid",
            Self::Parent => "get_parent",
            Self::Children => "get_children",
            Self::Admins => "get_admins",
            Self::Coords => "get_coords",
            Self::Ancestors => "get_ancestors",
            Self::Wof => "get_wof",
            Self::Country => "get_country",
            Self::Placetype => "get_placetype",
        }
    }

    pub(crate) const fn sql(self) -> &'static str {
        match self {
            Self::Meta => "SELECT id, maxwoeid FROM meta WHERE id = 1 LIMIT 1",
            Self::Woeid => {
                "SELECT woeid, iso, name, lang, placetype, placetypename, parent, \
                 lon, lat, swlon, swlat, nelon, nelat, adjacent, \
                 alias_q, alias_v, alias_a, alias_s, alias_p, \
                 state, county, localadmin, country, continent, \
                 concordance, supercedes, superceded, history, updated, geometry \
                 FROM places WHERE woeid = ?1 LIMIT 1"
            }
            Self::Parent => "SELECT parent FROM places WHERE woeid = ?1 LIMIT 1",
            Self::Children => "SELECT children FROM children WHERE woeid = ?1 LIMIT 1",
            Self::Admins => {
                "SELECT woeid, state, county, localadmin, country, continent \
                 FROM admins WHERE woeid = ?1 LIMIT 1"
            }
            Self::Coords => {
                "SELECT woeid, lon, lat, swlon, swlat, nelon, nelat \
                 FROM coords WHERE woeid = ?1 LIMIT 1"
            }
            Self::Ancestors => "SELECT ancestors FROM ancestors WHERE woeid = ?1 LIMIT 1",
            Self::Wof => "SELECT wofid, woeid FROM wof WHERE wofid = ?1 LIMIT 1",
            Self::Country => {
                "SELECT woeid, name, iso2, iso3 FROM countries WHERE iso2 = ?1 LIMIT 1"
            }
            Self::Placetype => {
                "SELECT id, name, descr, shortname, tag FROM placetypes \
                 WHERE shortname = ?1 LIMIT 1"
            }
        }
    }
}

impl fmt::Display for ReadQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())
    }
}

/// One compiled slot per [`ReadQuery`], tagged with its schema generation.
///
/// The cache is not shareable across threads; it is used through `&self`
/// from a single caller at a time.
#[derive(Debug, Default)]
pub(crate) struct StatementCache {
    generation: Cell<u64>,
    flushed_at: Cell<u64>,
    compiled: RefCell<HashMap<ReadQuery, u64>>,
}

impl StatementCache {
    /// Record a schema change; every slot becomes stale.
    pub(crate) fn invalidate(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Whether `query` holds a statement compiled for the current schema.
    pub(crate) fn is_current(&self, query: ReadQuery) -> bool {
        self.compiled.borrow().get(&query) == Some(&self.generation.get())
    }

    /// Fetch the compiled statement for `query`, recompiling if stale.
    pub(crate) fn prepare<'conn>(
        &self,
        connection: &'conn Connection,
        query: ReadQuery,
    ) -> Result<CachedStatement<'conn>, CacheError> {
        let generation = self.generation.get();
        if !self.is_current(query) {
            if self.flushed_at.get() != generation {
                connection.flush_prepared_statement_cache();
                self.flushed_at.set(generation);
            }
            debug!("compiling {query} for schema generation {generation}");
        }

        let statement =
            connection
                .prepare_cached(query.sql())
                .map_err(|source| CacheError::Prepare {
                    operation: query.operation(),
                    source,
                })?;
        self.compiled.borrow_mut().insert(query, generation);
        Ok(statement)
    }
}
