//! The primary gazetteer record.

use std::collections::BTreeMap;

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

use crate::{
    Geometry, Table,
    codec::{CodecError, ColumnMap, ColumnSet, Record},
};

/// A name recorded under one of the alias classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaceAlias {
    /// Alias text.
    pub name: String,
    /// Language code of the alias, when known.
    #[serde(default)]
    pub lang: Option<String>,
}

/// Identifier of a place in an external scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConcordanceId {
    /// Numeric identifier (e.g. `GeoNames`).
    Integer(i64),
    /// Textual identifier (e.g. ISO codes, Wikidata items).
    Text(String),
}

/// Change record for a place (merges, splits, renames).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntry(pub serde_json::Map<String, serde_json::Value>);

/// A place keyed by its WOE ID.
///
/// Only `woeid` is mandatory; a document carrying a subset of fields is a
/// valid partial write, and undeclared fields are rejected when
/// deserialising.
///
/// # Examples
///
/// ```
/// use woeplanet_core::Place;
///
/// let place: Place = serde_json::from_str(r#"{"woeid": 44418, "name": "London"}"#)
///     .expect("partial document");
/// assert_eq!(place.name.as_deref(), Some("London"));
/// assert!(serde_json::from_str::<Place>(r#"{"woeid": 1, "colour": "red"}"#).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Place {
    /// Unique place identifier.
    pub woeid: u64,
    /// ISO country code.
    pub iso: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Language of `name`.
    pub lang: Option<String>,
    /// Placetype identifier.
    pub placetype: Option<u64>,
    /// Placetype display name.
    pub placetypename: Option<String>,
    /// Parent WOE ID; `0` marks a root.
    pub parent: Option<u64>,
    /// Centroid longitude.
    pub lon: Option<f64>,
    /// Centroid latitude.
    pub lat: Option<f64>,
    /// South-west corner longitude.
    pub swlon: Option<f64>,
    /// South-west corner latitude.
    pub swlat: Option<f64>,
    /// North-east corner longitude.
    pub nelon: Option<f64>,
    /// North-east corner latitude.
    pub nelat: Option<f64>,
    /// Neighbouring WOE IDs.
    pub adjacent: Option<Vec<u64>>,
    /// Qualified (preferred) names.
    pub alias_q: Option<Vec<PlaceAlias>>,
    /// Variant names.
    pub alias_v: Option<Vec<PlaceAlias>>,
    /// Abbreviations.
    pub alias_a: Option<Vec<PlaceAlias>>,
    /// Synonyms.
    pub alias_s: Option<Vec<PlaceAlias>>,
    /// Colloquial names.
    pub alias_p: Option<Vec<PlaceAlias>>,
    /// State-level ancestor.
    pub state: Option<u64>,
    /// County-level ancestor.
    pub county: Option<u64>,
    /// Local-admin-level ancestor.
    pub localadmin: Option<u64>,
    /// Country ancestor.
    pub country: Option<u64>,
    /// Continent ancestor.
    pub continent: Option<u64>,
    /// External identifiers keyed by scheme.
    pub concordance: Option<BTreeMap<String, ConcordanceId>>,
    /// WOE IDs this place replaces.
    pub supercedes: Option<Vec<u64>>,
    /// WOE IDs that replace this place.
    pub superceded: Option<Vec<u64>>,
    /// Change history.
    pub history: Option<Vec<HistoryEntry>>,
    /// Unix timestamp of the last write.
    pub updated: Option<u64>,
    /// Place geometry.
    pub geometry: Option<Geometry>,
}

impl Place {
    /// Create a place carrying only its identifier.
    #[must_use]
    pub fn new(woeid: u64) -> Self {
        Self {
            woeid,
            ..Self::default()
        }
    }

    /// Whether the place has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self.parent, None | Some(0))
    }

    /// Centroid as a `geo` coordinate when both axes are known.
    #[must_use]
    pub fn centroid(&self) -> Option<Coord<f64>> {
        Some(Coord {
            x: self.lon?,
            y: self.lat?,
        })
    }

    /// Bounding box when all four corners are known.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let south_west = Coord {
            x: self.swlon?,
            y: self.swlat?,
        };
        let north_east = Coord {
            x: self.nelon?,
            y: self.nelat?,
        };
        Some(Rect::new(south_west, north_east))
    }
}

impl Record for Place {
    const TABLE: Table = Table::Places;

    fn to_columns(&self) -> Result<ColumnSet, CodecError> {
        let mut columns = ColumnSet::new();
        columns.id("woeid", Some(self.woeid))?;
        columns.text("iso", self.iso.as_deref());
        columns.text("name", self.name.as_deref());
        columns.text("lang", self.lang.as_deref());
        columns.id("placetype", self.placetype)?;
        columns.text("placetypename", self.placetypename.as_deref());
        columns.id("parent", self.parent)?;
        columns.real("lon", self.lon);
        columns.real("lat", self.lat);
        columns.real("swlon", self.swlon);
        columns.real("swlat", self.swlat);
        columns.real("nelon", self.nelon);
        columns.real("nelat", self.nelat);
        columns.packed("adjacent", self.adjacent.as_ref())?;
        columns.packed("alias_q", self.alias_q.as_ref())?;
        columns.packed("alias_v", self.alias_v.as_ref())?;
        columns.packed("alias_a", self.alias_a.as_ref())?;
        columns.packed("alias_s", self.alias_s.as_ref())?;
        columns.packed("alias_p", self.alias_p.as_ref())?;
        columns.id("state", self.state)?;
        columns.id("county", self.county)?;
        columns.id("localadmin", self.localadmin)?;
        columns.id("country", self.country)?;
        columns.id("continent", self.continent)?;
        columns.packed("concordance", self.concordance.as_ref())?;
        columns.packed("supercedes", self.supercedes.as_ref())?;
        columns.packed("superceded", self.superceded.as_ref())?;
        columns.packed("history", self.history.as_ref())?;
        columns.id("updated", self.updated)?;
        columns.packed("geometry", self.geometry.as_ref())?;
        Ok(columns)
    }

    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError> {
        Ok(Self {
            woeid: columns.required_id("woeid")?,
            iso: columns.text("iso")?,
            name: columns.text("name")?,
            lang: columns.text("lang")?,
            placetype: columns.id("placetype")?,
            placetypename: columns.text("placetypename")?,
            parent: columns.id("parent")?,
            lon: columns.real("lon")?,
            lat: columns.real("lat")?,
            swlon: columns.real("swlon")?,
            swlat: columns.real("swlat")?,
            nelon: columns.real("nelon")?,
            nelat: columns.real("nelat")?,
            adjacent: columns.packed("adjacent")?,
            alias_q: columns.packed("alias_q")?,
            alias_v: columns.packed("alias_v")?,
            alias_a: columns.packed("alias_a")?,
            alias_s: columns.packed("alias_s")?,
            alias_p: columns.packed("alias_p")?,
            state: columns.id("state")?,
            county: columns.id("county")?,
            localadmin: columns.id("localadmin")?,
            country: columns.id("country")?,
            continent: columns.id("continent")?,
            concordance: columns.packed("concordance")?,
            supercedes: columns.packed("supercedes")?,
            superceded: columns.packed("superceded")?,
            history: columns.packed("history")?,
            updated: columns.id("updated")?,
            geometry: columns.packed("geometry")?,
        })
    }
}
