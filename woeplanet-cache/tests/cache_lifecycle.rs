//! End-to-end checks of an on-disk cache through the public API.

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use woeplanet_cache::{CacheOptions, GeoplanetCache, ReadQuery};
use woeplanet_core::{
    Admin, Geometry, Place, Table,
    test_support::{linked_place, populated_place},
};

struct CacheFixture {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl CacheFixture {
    fn open(&self) -> GeoplanetCache {
        GeoplanetCache::open(&self.path, &CacheOptions::default()).expect("open cache")
    }
}

#[fixture]
fn on_disk() -> CacheFixture {
    let dir = TempDir::new().expect("create temp dir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("cache/geoplanet.db"))
        .expect("temp dir path is UTF-8");
    CacheFixture { _dir: dir, path }
}

#[rstest]
fn ingestion_round_trip(on_disk: CacheFixture) {
    {
        let cache = on_disk.open();
        for woeid in [2_487_956, 12_587_707] {
            let place = populated_place(woeid);
            cache.insert_place(&place).expect("insert place");
            cache.refresh_meta(woeid).expect("refresh counter");
        }
        cache
            .insert_children(12_587_707, &[2_487_956])
            .expect("insert children");
    }

    let cache = on_disk.open();
    let stored = cache
        .get_woeid(2_487_956)
        .expect("read place")
        .expect("place exists");
    assert_eq!(stored.concordance, populated_place(2_487_956).concordance);
    assert!(matches!(stored.geometry, Some(Geometry::Polygon(_))));
    assert_eq!(cache.get_maxwoeid().expect("read counter"), 12_587_707);
    assert_eq!(
        cache.get_children(12_587_707).expect("read children"),
        Some(vec![2_487_956])
    );
}

#[rstest]
fn reads_recover_after_every_table_is_reset(on_disk: CacheFixture) {
    let mut cache = on_disk.open();
    cache.insert_place(&linked_place(3, 0, 12)).expect("insert place");
    cache
        .insert_admin(&Admin {
            woeid: 3,
            ..Admin::default()
        })
        .expect("insert admin");
    for query in ReadQuery::ALL {
        assert!(!cache.is_compiled(query));
    }
    assert!(cache.get_woeid(3).expect("read place").is_some());
    assert!(cache.get_admins(3).expect("read admins").is_some());

    for table in Table::ALL {
        cache.create_table(table, true).expect("reset table");
        cache.create_index(table).expect("index table");
    }

    assert!(cache.get_woeid(3).expect("read place").is_none());
    assert!(cache.get_admins(3).expect("read admins").is_none());
    cache.insert_place(&Place::new(3)).expect("insert after reset");
    assert_eq!(cache.get_parent(3).expect("read parent"), Some(0));
}

#[rstest]
fn find_ancestor_hides_the_reason_for_a_miss(on_disk: CacheFixture) {
    let cache = on_disk.open();
    cache.insert_place(&linked_place(1, 0, 29)).expect("insert root");
    cache.insert_place(&linked_place(2, 1, 12)).expect("insert child");

    assert_eq!(
        cache
            .find_ancestor(2, 29)
            .expect("walk hierarchy")
            .map(|place| place.woeid),
        Some(1)
    );
    assert!(cache.find_ancestor(2, 7).expect("walk hierarchy").is_none());
    assert!(cache.find_ancestor(9, 29).expect("walk hierarchy").is_none());
}
