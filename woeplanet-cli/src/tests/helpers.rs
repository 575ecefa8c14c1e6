//! Test helpers for building populated caches on disk.

use camino::Utf8PathBuf;
use tempfile::TempDir;
use woeplanet_cache::{CacheOptions, GeoplanetCache};
use woeplanet_core::{Placetype, test_support::linked_place};

pub(super) const CONTINENT: u64 = 29;
pub(super) const COUNTRY: u64 = 12;
pub(super) const TOWN: u64 = 7;

/// A cache file holding Europe <- United Kingdom <- London.
pub(super) struct CacheFile {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl CacheFile {
    pub(super) fn empty() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("geoplanet.db"))
            .expect("tempdir path is UTF-8");
        Self { _dir: dir, path }
    }

    pub(super) fn populated() -> Self {
        let file = Self::empty();
        let cache = GeoplanetCache::open(&file.path, &CacheOptions::default()).expect("open cache");
        for place in [
            linked_place(24_865_675, 0, CONTINENT),
            linked_place(23_424_975, 24_865_675, COUNTRY),
            linked_place(44_418, 23_424_975, TOWN),
        ] {
            cache.insert_place(&place).expect("insert place");
            cache.refresh_meta(place.woeid).expect("refresh counter");
        }
        cache
            .insert_placetype(&Placetype {
                id: COUNTRY,
                shortname: Some("Country".into()),
                ..Placetype::default()
            })
            .expect("insert placetype");
        file
    }

    pub(super) fn path(&self) -> Utf8PathBuf {
        self.path.clone()
    }
}

pub(super) fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).expect("output is UTF-8")
}
