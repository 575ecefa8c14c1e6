//! Place writes and reads.

use std::time::{SystemTime, UNIX_EPOCH};

use woeplanet_core::{Column, ColumnSet, Geometry, Place, Record, Table, id_to_storage, pack};

use super::storage_key;
use crate::{CacheError, GeoplanetCache, ReadQuery, cache::codec_error};

/// Seconds since the Unix epoch, clamped to zero for clocks set before it.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

fn stamp_updated(operation: &'static str, columns: &mut ColumnSet) -> Result<(), CacheError> {
    let now =
        id_to_storage("updated", unix_now()).map_err(|source| codec_error(operation, source))?;
    columns.set("updated", Column::Integer(now));
    Ok(())
}

impl GeoplanetCache {
    /// Insert or replace a place.
    ///
    /// A missing geometry is stored as `Point(0, 0)` and `updated` is set to
    /// the current time.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Codec`] when a field cannot be packed, or an
    /// engine error when the statement fails.
    pub fn insert_place(&self, place: &Place) -> Result<(), CacheError> {
        const OPERATION: &str = "insert_place";
        let mut columns = place
            .to_columns()
            .map_err(|source| codec_error(OPERATION, source))?;
        if place.geometry.is_none() {
            let geometry = pack("geometry", &Geometry::default())
                .map_err(|source| codec_error(OPERATION, source))?;
            columns.set("geometry", Column::Text(geometry));
        }
        stamp_updated(OPERATION, &mut columns)?;
        self.upsert_columns(OPERATION, Table::Places, columns)
    }

    /// Update the populated fields of an existing place, keyed by its WOE ID.
    ///
    /// Returns `false` when no row carries that WOE ID.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Codec`] when a field cannot be packed, or an
    /// engine error when the statement fails.
    pub fn update_place(&self, place: &Place) -> Result<bool, CacheError> {
        const OPERATION: &str = "update_place";
        let mut columns = place
            .to_columns()
            .map_err(|source| codec_error(OPERATION, source))?;
        let key = Column::Integer(storage_key(OPERATION, "woeid", place.woeid)?);
        columns.take("woeid");
        stamp_updated(OPERATION, &mut columns)?;

        let bound = columns
            .bind_to(Table::Places)
            .map_err(|source| codec_error(OPERATION, source))?;
        let assignments: Vec<String> = bound
            .iter()
            .enumerate()
            .map(|(index, (name, _))| format!("{name} = ?{}", index + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE woeid = ?{}",
            Table::Places,
            assignments.join(", "),
            bound.len() + 1
        );
        let values = bound
            .into_iter()
            .map(|(_, value)| value)
            .chain(std::iter::once(key));
        let touched = self.execute_bound(OPERATION, &sql, values)?;
        Ok(touched > 0)
    }

    /// Fetch a place by WOE ID, unpacking every composite field.
    ///
    /// # Errors
    ///
    /// Returns an engine error when the read fails, or
    /// [`CacheError::Codec`] when a stored field cannot be unpacked.
    pub fn get_woeid(&self, woeid: u64) -> Result<Option<Place>, CacheError> {
        let key = storage_key(ReadQuery::Woeid.operation(), "woeid", woeid)?;
        self.fetch_record(ReadQuery::Woeid, [key])
    }

    /// Parent of a place: `Some(0)` for a root, `None` for an unknown WOE ID.
    ///
    /// # Errors
    ///
    /// Returns an engine error when the read fails.
    pub fn get_parent(&self, woeid: u64) -> Result<Option<u64>, CacheError> {
        let operation = ReadQuery::Parent.operation();
        let key = storage_key(operation, "woeid", woeid)?;
        let Some(row) = self.fetch_row(ReadQuery::Parent, [key])? else {
            return Ok(None);
        };
        let parent = row
            .id("parent")
            .map_err(|source| codec_error(operation, source))?;
        Ok(Some(parent.unwrap_or(0)))
    }
}
