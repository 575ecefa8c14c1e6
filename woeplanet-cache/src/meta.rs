//! The singleton bookkeeping row and its monotonic WOE ID counter.

use log::info;
use woeplanet_core::Column;

use crate::{CacheError, GeoplanetCache, store::storage_key};

const ADVANCE: &str = "UPDATE meta SET maxwoeid = ?1 \
     WHERE id = 1 AND (maxwoeid IS NULL OR maxwoeid < ?1)";
const SEED: &str = "INSERT INTO meta (id, maxwoeid) \
     SELECT 1, ?1 WHERE NOT EXISTS (SELECT 1 FROM meta WHERE id = 1)";

/// Compare-and-set view over the `meta` row.
///
/// The counter only ever moves upwards. Callers reach it through
/// [`GeoplanetCache::meta`].
#[derive(Debug, Clone, Copy)]
pub struct MetaStore<'cache> {
    cache: &'cache GeoplanetCache,
}

impl MetaStore<'_> {
    /// Stored counter, or `None` when the row or value is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails.
    pub fn get(&self) -> Result<Option<u64>, CacheError> {
        Ok(self.cache.get_meta()?.and_then(|meta| meta.maxwoeid))
    }

    /// Raise the counter to `candidate` if it is higher than the stored
    /// value, creating the row when missing.
    ///
    /// Returns whether [`GeoplanetCache::get_maxwoeid`] now reads higher. An
    /// absent or `NULL` counter reads as `0`, so seeding it with `0` is not a
    /// move.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when either statement fails.
    pub fn advance_to(&self, candidate: u64) -> Result<bool, CacheError> {
        const OPERATION: &str = "refresh_meta";
        let value = storage_key(OPERATION, "maxwoeid", candidate)?;
        let bind = || std::iter::once(Column::Integer(value));
        let written = self.cache.execute_bound(OPERATION, ADVANCE, bind())? > 0
            || self.cache.execute_bound(OPERATION, SEED, bind())? > 0;
        Ok(written && candidate > 0)
    }
}

impl GeoplanetCache {
    /// Counter view over the `meta` row.
    #[must_use]
    pub const fn meta(&self) -> MetaStore<'_> {
        MetaStore { cache: self }
    }

    /// Highest WOE ID recorded, or `0` on a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails.
    pub fn get_maxwoeid(&self) -> Result<u64, CacheError> {
        Ok(self.meta().get()?.unwrap_or(0))
    }

    /// Record `woeid` as seen, raising the counter when it is a new maximum.
    ///
    /// Returns `true` when the counter moved.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the counter cannot be read or written.
    pub fn refresh_meta(&self, woeid: u64) -> Result<bool, CacheError> {
        let moved = self.meta().advance_to(woeid)?;
        if moved {
            info!("maxwoeid advanced to {woeid}");
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::CacheOptions;

    #[fixture]
    fn cache() -> GeoplanetCache {
        GeoplanetCache::open_in_memory(&CacheOptions::default()).expect("open cache")
    }

    #[rstest]
    fn fresh_caches_report_zero(cache: GeoplanetCache) {
        assert_eq!(cache.get_maxwoeid().expect("read counter"), 0);
        assert!(cache.meta().get().expect("read counter").is_none());
    }

    #[rstest]
    fn seeding_with_zero_is_not_a_move(cache: GeoplanetCache) {
        assert!(!cache.refresh_meta(0).expect("seed counter"));
        assert_eq!(cache.meta().get().expect("read counter"), Some(0));
        assert_eq!(cache.get_maxwoeid().expect("read counter"), 0);

        assert!(cache.refresh_meta(1).expect("first real woeid"));
        assert_eq!(cache.get_maxwoeid().expect("read counter"), 1);
    }

    #[rstest]
    fn null_counters_filled_with_zero_do_not_move(cache: GeoplanetCache) {
        cache
            .connection()
            .execute("INSERT INTO meta (id) VALUES (1)", [])
            .expect("seed empty row");

        assert!(!cache.refresh_meta(0).expect("fill counter"));
        assert_eq!(cache.get_maxwoeid().expect("read counter"), 0);
    }

    #[rstest]
    fn counter_never_moves_backwards(cache: GeoplanetCache) {
        assert!(cache.refresh_meta(5).expect("seed counter"));
        assert!(!cache.refresh_meta(3).expect("lower candidate"));
        assert_eq!(cache.get_maxwoeid().expect("read counter"), 5);

        assert!(cache.refresh_meta(7).expect("higher candidate"));
        assert_eq!(cache.get_maxwoeid().expect("read counter"), 7);
    }

    #[rstest]
    fn equal_candidates_leave_the_counter_alone(cache: GeoplanetCache) {
        cache.refresh_meta(9).expect("seed counter");
        assert!(!cache.meta().advance_to(9).expect("equal candidate"));
    }

    #[rstest]
    fn null_counters_are_filled(cache: GeoplanetCache) {
        cache
            .connection()
            .execute("INSERT INTO meta (id) VALUES (1)", [])
            .expect("seed empty row");

        assert!(cache.refresh_meta(4).expect("fill counter"));
        assert_eq!(cache.get_maxwoeid().expect("read counter"), 4);
    }

    #[rstest]
    fn only_one_meta_row_exists(cache: GeoplanetCache) {
        for woeid in [1, 8, 2, 12] {
            cache.refresh_meta(woeid).expect("refresh counter");
        }
        let rows: i64 = cache
            .connection()
            .query_row("SELECT COUNT(*) FROM meta", [], |row| row.get(0))
            .expect("count meta rows");
        assert_eq!(rows, 1);
    }
}
