//! Sample records shared by unit and behaviour tests across the workspace.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{ConcordanceId, Geometry, HistoryEntry, Place, PlaceAlias, Position};

/// A minimal place linked into a hierarchy.
#[must_use]
pub fn linked_place(woeid: u64, parent: u64, placetype: u64) -> Place {
    Place {
        name: Some(format!("place-{woeid}")),
        placetype: Some(placetype),
        parent: Some(parent),
        ..Place::new(woeid)
    }
}

fn alias(name: &str, lang: &str) -> PlaceAlias {
    PlaceAlias {
        name: name.to_owned(),
        lang: Some(lang.to_owned()),
    }
}

/// A place with every composite field populated.
#[must_use]
pub fn populated_place(woeid: u64) -> Place {
    let mut change = Map::new();
    change.insert("action".to_owned(), Value::from("merged"));
    change.insert("woeid".to_owned(), Value::from(2_487_956_u64));

    Place {
        woeid,
        iso: Some("US".into()),
        name: Some("San Francisco".into()),
        lang: Some("ENG".into()),
        placetype: Some(7),
        placetypename: Some("Town".into()),
        parent: Some(12_587_707),
        lon: Some(-122.42),
        lat: Some(37.77),
        swlon: Some(-122.51),
        swlat: Some(37.7),
        nelon: Some(-122.35),
        nelat: Some(37.81),
        adjacent: Some(vec![2_347_563, 12_587_688]),
        alias_q: Some(vec![alias("San Francisco", "ENG")]),
        alias_v: Some(vec![alias("SF", "ENG"), alias("San Francisco", "SPA")]),
        alias_a: Some(vec![alias("SFO", "ENG")]),
        alias_s: Some(vec![alias("Frisco", "ENG")]),
        alias_p: Some(vec![alias("The City", "ENG")]),
        state: Some(2_347_563),
        county: Some(12_587_707),
        localadmin: None,
        country: Some(23_424_977),
        continent: Some(24_865_672),
        concordance: Some(BTreeMap::from([
            ("gn:id".to_owned(), ConcordanceId::Integer(5_391_959)),
            ("wd:id".to_owned(), ConcordanceId::Text("Q62".into())),
        ])),
        supercedes: Some(vec![2_487_957]),
        superceded: Some(Vec::new()),
        history: Some(vec![HistoryEntry(change)]),
        updated: None,
        geometry: Some(Geometry::Polygon(vec![vec![
            [-122.51, 37.7],
            [-122.35, 37.7],
            [-122.35, 37.81],
            [-122.51, 37.7],
        ]])),
    }
}

/// Deterministic positions whose coordinates use every mantissa bit.
///
/// Magnitudes span from 1/256 up to 128 degrees of longitude and 64 of
/// latitude, with both signs, so decimal formatting rarely lands on a short
/// literal.
#[must_use]
pub fn scattered_positions(count: usize, seed: u64) -> Vec<Position> {
    let mut state = seed | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };
    (0..count)
        .map(|_| [coordinate(next(), 14), coordinate(next(), 13)])
        .collect()
}

fn coordinate(bits: u64, max_exponent: u64) -> f64 {
    const MANTISSA: u64 = (1 << 52) - 1;
    const SIGN: u64 = 1 << 63;
    let exponent = 1015 + ((bits >> 52) & 0b1111).min(max_exponent);
    f64::from_bits((bits & SIGN) | (exponent << 52) | (bits & MANTISSA))
}
