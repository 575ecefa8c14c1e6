//! Command execution against caches on disk.

use super::helpers::{COUNTRY, CONTINENT, CacheFile, output};
use super::*;
use crate::commands::{
    self, AncestorConfig, InitConfig, MaxwoeidConfig, PlaceConfig, PlacetypeRef,
};
use rstest::rstest;
use woeplanet_cache::{CacheOptions, GeoplanetCache};
use woeplanet_core::Place;

fn ancestor_of_london(file: &CacheFile, placetype: PlacetypeRef) -> Result<String, CliError> {
    let mut buffer = Vec::new();
    commands::ancestor(
        &AncestorConfig {
            cache: file.path(),
            woeid: 44_418,
            placetype,
        },
        &mut buffer,
    )?;
    Ok(output(buffer))
}

#[rstest]
fn init_creates_a_usable_cache() {
    let file = CacheFile::empty();
    let mut buffer = Vec::new();

    commands::init(
        &InitConfig {
            cache: file.path(),
            reset: false,
        },
        &mut buffer,
    )
    .expect("init cache");

    assert!(output(buffer).starts_with("initialised 11 tables"));
    let cache =
        GeoplanetCache::open(&file.path(), &CacheOptions::without_setup()).expect("open cache");
    assert!(cache.get_woeid(1).expect("read place").is_none());
}

#[rstest]
fn init_with_reset_empties_tables() {
    let file = CacheFile::populated();
    let mut buffer = Vec::new();

    commands::init(
        &InitConfig {
            cache: file.path(),
            reset: true,
        },
        &mut buffer,
    )
    .expect("reset cache");

    let mut buffer = Vec::new();
    commands::maxwoeid(&MaxwoeidConfig { cache: file.path() }, &mut buffer)
        .expect("read counter");
    assert_eq!(output(buffer), "0\n");
}

#[rstest]
fn place_prints_json() {
    let file = CacheFile::populated();
    let mut buffer = Vec::new();

    commands::place(
        &PlaceConfig {
            cache: file.path(),
            woeid: 44_418,
        },
        &mut buffer,
    )
    .expect("print place");

    let place: Place = serde_json::from_str(&output(buffer)).expect("place JSON");
    assert_eq!(place.woeid, 44_418);
    assert_eq!(place.parent, Some(23_424_975));
}

#[rstest]
fn missing_places_are_reported() {
    let file = CacheFile::populated();
    let err = commands::place(
        &PlaceConfig {
            cache: file.path(),
            woeid: 1,
        },
        &mut Vec::new(),
    )
    .expect_err("place 1 is absent");
    assert!(matches!(err, CliError::NotFound { .. }));
}

#[rstest]
#[case::by_id(PlacetypeRef::Id(CONTINENT), 24_865_675)]
#[case::by_shortname(PlacetypeRef::Shortname("Country".into()), 23_424_975)]
fn ancestors_are_printed(#[case] placetype: PlacetypeRef, #[case] expected: u64) {
    let file = CacheFile::populated();
    let printed = ancestor_of_london(&file, placetype).expect("print ancestor");
    let place: Place = serde_json::from_str(&printed).expect("place JSON");
    assert_eq!(place.woeid, expected);
}

#[rstest]
fn unknown_shortnames_are_reported() {
    let file = CacheFile::populated();
    let err = ancestor_of_london(&file, PlacetypeRef::Shortname("Suburb".into()))
        .expect_err("Suburb is not in the vocabulary");
    match err {
        CliError::NotFound { what } => assert!(what.contains("Suburb")),
        other => panic!("expected NotFound, found {other:?}"),
    }
}

#[rstest]
fn absent_ancestors_are_reported() {
    let file = CacheFile::populated();
    let err = ancestor_of_london(&file, PlacetypeRef::Id(COUNTRY + 1000))
        .expect_err("no ancestor of that placetype");
    assert!(matches!(err, CliError::NotFound { .. }));
}

#[rstest]
fn maxwoeid_prints_the_counter() {
    let file = CacheFile::populated();
    let mut buffer = Vec::new();
    commands::maxwoeid(&MaxwoeidConfig { cache: file.path() }, &mut buffer)
        .expect("read counter");
    assert_eq!(output(buffer), "24865675\n");
}

#[rstest]
fn read_commands_require_an_existing_cache() {
    let file = CacheFile::empty();
    let err = commands::maxwoeid(&MaxwoeidConfig { cache: file.path() }, &mut Vec::new())
        .expect_err("cache file is missing");
    assert!(matches!(err, CliError::MissingCache { .. }));
    assert!(!file.path().exists());
}
