//! Flat lookup tables: one record type per table, upserted whole.

use woeplanet_core::{Admin, Alias, Coords, Country, Meta, Placetype, Wof};

use super::storage_key;
use crate::{CacheError, GeoplanetCache, ReadQuery};

impl GeoplanetCache {
    /// Store an alternative name for a place.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the row cannot be written.
    pub fn insert_alias(&self, alias: &Alias) -> Result<(), CacheError> {
        self.upsert("insert_alias", alias)
    }

    /// Store the administrative ancestry of a place.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the row cannot be written.
    pub fn insert_admin(&self, admin: &Admin) -> Result<(), CacheError> {
        self.upsert("insert_admin", admin)
    }

    /// Store a country row.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the row cannot be written.
    pub fn insert_country(&self, country: &Country) -> Result<(), CacheError> {
        self.upsert("insert_country", country)
    }

    /// Store a Who's On First to WOE ID mapping.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the row cannot be written.
    pub fn insert_wof(&self, wof: &Wof) -> Result<(), CacheError> {
        self.upsert("insert_wof", wof)
    }

    /// Store a placetype vocabulary entry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the row cannot be written.
    pub fn insert_placetype(&self, placetype: &Placetype) -> Result<(), CacheError> {
        self.upsert("insert_placetype", placetype)
    }

    /// Store the coordinate snapshot of a place.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the row cannot be written.
    pub fn insert_coords(&self, coords: &Coords) -> Result<(), CacheError> {
        self.upsert("insert_coords", coords)
    }

    /// The singleton bookkeeping row, if it has been written.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails.
    pub fn get_meta(&self) -> Result<Option<Meta>, CacheError> {
        self.fetch_record(ReadQuery::Meta, [])
    }

    /// Administrative ancestry of a place.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails.
    pub fn get_admins(&self, woeid: u64) -> Result<Option<Admin>, CacheError> {
        let key = storage_key(ReadQuery::Admins.operation(), "woeid", woeid)?;
        self.fetch_record(ReadQuery::Admins, [key])
    }

    /// Coordinate snapshot of a place.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails.
    pub fn get_coords(&self, woeid: u64) -> Result<Option<Coords>, CacheError> {
        let key = storage_key(ReadQuery::Coords.operation(), "woeid", woeid)?;
        self.fetch_record(ReadQuery::Coords, [key])
    }

    /// Country by ISO 3166-1 alpha-2 code.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails.
    pub fn get_country(&self, iso2: &str) -> Result<Option<Country>, CacheError> {
        self.fetch_record(ReadQuery::Country, [iso2])
    }

    /// WOE ID mapping for a Who's On First identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails.
    pub fn get_wof(&self, wofid: u64) -> Result<Option<Wof>, CacheError> {
        let key = storage_key(ReadQuery::Wof.operation(), "wofid", wofid)?;
        self.fetch_record(ReadQuery::Wof, [key])
    }

    /// Placetype vocabulary entry by short name, such as `Town`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the read fails.
    pub fn get_placetype(&self, shortname: &str) -> Result<Option<Placetype>, CacheError> {
        self.fetch_record(ReadQuery::Placetype, [shortname])
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use woeplanet_core::{Place, test_support::populated_place};

    use super::*;
    use crate::CacheOptions;

    #[fixture]
    fn cache() -> GeoplanetCache {
        GeoplanetCache::open_in_memory(&CacheOptions::default()).expect("open cache")
    }

    #[fixture]
    fn united_kingdom() -> Country {
        Country {
            woeid: 23_424_975,
            name: Some("United Kingdom".into()),
            iso2: "GB".into(),
            iso3: Some("GBR".into()),
        }
    }

    #[rstest]
    fn countries_are_found_by_iso_code(cache: GeoplanetCache, united_kingdom: Country) {
        cache.insert_country(&united_kingdom).expect("insert country");

        assert_eq!(
            cache.get_country("GB").expect("read country"),
            Some(united_kingdom)
        );
        assert!(cache.get_country("FR").expect("read country").is_none());
    }

    #[rstest]
    fn replacing_a_country_keeps_one_row(cache: GeoplanetCache, united_kingdom: Country) {
        cache.insert_country(&united_kingdom).expect("insert country");
        let renamed = Country {
            name: Some("Great Britain".into()),
            ..united_kingdom
        };
        cache.insert_country(&renamed).expect("replace country");

        let rows: i64 = cache
            .connection()
            .query_row("SELECT COUNT(*) FROM countries", [], |row| row.get(0))
            .expect("count countries");
        assert_eq!(rows, 1);
        assert_eq!(cache.get_country("GB").expect("read country"), Some(renamed));
    }

    #[rstest]
    fn admins_and_coords_are_keyed_by_woeid(cache: GeoplanetCache) {
        let place = populated_place(2_487_956);
        let admin = Admin {
            woeid: place.woeid,
            state: place.state,
            county: place.county,
            localadmin: None,
            country: place.country,
            continent: place.continent,
        };
        cache.insert_admin(&admin).expect("insert admin");
        cache
            .insert_coords(&Coords::from(&place))
            .expect("insert coords");

        assert_eq!(cache.get_admins(place.woeid).expect("read admins"), Some(admin));
        let coords = cache
            .get_coords(place.woeid)
            .expect("read coords")
            .expect("coords exist");
        assert_eq!(coords.lat, place.lat);
        assert!(cache.get_admins(1).expect("read admins").is_none());
        assert!(cache.get_coords(1).expect("read coords").is_none());
    }

    #[rstest]
    fn wof_mappings_resolve_to_woeids(cache: GeoplanetCache) {
        let mapping = Wof {
            wofid: 85_922_583,
            woeid: 2_487_956,
        };
        cache.insert_wof(&mapping).expect("insert mapping");

        assert_eq!(cache.get_wof(85_922_583).expect("read mapping"), Some(mapping));
        assert!(cache.get_wof(1).expect("read mapping").is_none());
    }

    #[rstest]
    fn placetypes_are_found_by_shortname(cache: GeoplanetCache) {
        let town = Placetype {
            id: 7,
            name: Some("Town".into()),
            descr: Some("A populated settlement".into()),
            shortname: Some("Town".into()),
            tag: None,
        };
        cache.insert_placetype(&town).expect("insert placetype");

        assert_eq!(cache.get_placetype("Town").expect("read placetype"), Some(town));
        assert!(cache.get_placetype("Suburb").expect("read placetype").is_none());
    }

    #[rstest]
    fn aliases_accumulate_per_place(cache: GeoplanetCache) {
        for name in ["NYC", "Big Apple"] {
            cache
                .insert_alias(&Alias {
                    woeid: 2_459_115,
                    name: name.into(),
                    kind: Some("V".into()),
                    lang: Some("ENG".into()),
                })
                .expect("insert alias");
        }

        let rows: i64 = cache
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM aliases WHERE woeid = ?1",
                [2_459_115],
                |row| row.get(0),
            )
            .expect("count aliases");
        assert_eq!(rows, 2);
    }

    #[rstest]
    fn meta_is_absent_until_written(cache: GeoplanetCache) {
        assert!(cache.get_meta().expect("read meta").is_none());
        cache.insert_place(&Place::new(1)).expect("insert place");
        assert!(cache.get_meta().expect("read meta").is_none());
    }
}
