//! Packed WOE ID lists: the children and ancestors of a place.

use woeplanet_core::{ColumnSet, Table};

use super::storage_key;
use crate::{CacheError, GeoplanetCache, ReadQuery, cache::codec_error};

impl GeoplanetCache {
    /// Store the direct children of a place.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the list cannot be packed or written.
    pub fn insert_children(&self, woeid: u64, children: &[u64]) -> Result<(), CacheError> {
        self.insert_list("insert_children", Table::Children, "children", woeid, children)
    }

    /// Store the ancestors of a place, nearest first.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the list cannot be packed or written.
    pub fn insert_ancestors(&self, woeid: u64, ancestors: &[u64]) -> Result<(), CacheError> {
        self.insert_list(
            "insert_ancestors",
            Table::Ancestors,
            "ancestors",
            woeid,
            ancestors,
        )
    }

    /// Direct children of a place, or `None` when no list was stored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails or the list cannot be
    /// unpacked.
    pub fn get_children(&self, woeid: u64) -> Result<Option<Vec<u64>>, CacheError> {
        self.fetch_list(ReadQuery::Children, "children", woeid)
    }

    /// Ancestors of a place, or `None` when no list was stored.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails or the list cannot be
    /// unpacked.
    pub fn get_ancestors(&self, woeid: u64) -> Result<Option<Vec<u64>>, CacheError> {
        self.fetch_list(ReadQuery::Ancestors, "ancestors", woeid)
    }

    fn insert_list(
        &self,
        operation: &'static str,
        table: Table,
        field: &'static str,
        woeid: u64,
        list: &[u64],
    ) -> Result<(), CacheError> {
        let mut columns = ColumnSet::new();
        columns
            .id("woeid", Some(woeid))
            .and_then(|()| columns.packed(field, Some(list)))
            .map_err(|source| codec_error(operation, source))?;
        self.upsert_columns(operation, table, columns)
    }

    fn fetch_list(
        &self,
        query: ReadQuery,
        field: &str,
        woeid: u64,
    ) -> Result<Option<Vec<u64>>, CacheError> {
        let operation = query.operation();
        let key = storage_key(operation, "woeid", woeid)?;
        let Some(row) = self.fetch_row(query, [key])? else {
            return Ok(None);
        };
        let list = row
            .packed::<Vec<u64>>(field)
            .map_err(|source| codec_error(operation, source))?;
        Ok(Some(list.unwrap_or_default()))
    }
}
