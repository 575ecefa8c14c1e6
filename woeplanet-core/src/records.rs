//! Secondary records: administrative snapshots, countries, aliases and
//! identifier mappings.

use serde::{Deserialize, Serialize};

use crate::{
    Place, Table,
    codec::{CodecError, ColumnMap, ColumnSet, Record},
};

/// Administrative ancestry of a place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Admin {
    /// Place the snapshot belongs to.
    pub woeid: u64,
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
}

impl Record for Admin {
    const TABLE: Table = Table::Admins;

    fn to_columns(&self) -> Result<ColumnSet, CodecError> {
        let mut columns = ColumnSet::new();
        columns.id("woeid", Some(self.woeid))?;
        columns.id("state", self.state)?;
        columns.id("county", self.county)?;
        columns.id("localadmin", self.localadmin)?;
        columns.id("country", self.country)?;
        columns.id("continent", self.continent)?;
        Ok(columns)
    }

    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError> {
        Ok(Self {
            woeid: columns.required_id("woeid")?,
            state: columns.id("state")?,
            county: columns.id("county")?,
            localadmin: columns.id("localadmin")?,
            country: columns.id("country")?,
            continent: columns.id("continent")?,
        })
    }
}

/// Country lookup row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Country {
    /// WOE ID of the country.
    pub woeid: u64,
    /// Display name.
    pub name: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    pub iso2: String,
    /// ISO 3166-1 alpha-3 code.
    pub iso3: Option<String>,
}

impl Record for Country {
    const TABLE: Table = Table::Countries;

    fn to_columns(&self) -> Result<ColumnSet, CodecError> {
        let mut columns = ColumnSet::new();
        columns.id("woeid", Some(self.woeid))?;
        columns.text("name", self.name.as_deref());
        columns.text("iso2", Some(&self.iso2));
        columns.text("iso3", self.iso3.as_deref());
        Ok(columns)
    }

    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError> {
        Ok(Self {
            woeid: columns.required_id("woeid")?,
            name: columns.text("name")?,
            iso2: columns.required_text("iso2")?,
            iso3: columns.text("iso3")?,
        })
    }
}

/// Mapping from a Who's On First identifier to a WOE ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Wof {
    /// Who's On First identifier.
    pub wofid: u64,
    /// Matching WOE ID.
    pub woeid: u64,
}

impl Record for Wof {
    const TABLE: Table = Table::Wof;

    fn to_columns(&self) -> Result<ColumnSet, CodecError> {
        let mut columns = ColumnSet::new();
        columns.id("wofid", Some(self.wofid))?;
        columns.id("woeid", Some(self.woeid))?;
        Ok(columns)
    }

    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError> {
        Ok(Self {
            wofid: columns.required_id("wofid")?,
            woeid: columns.required_id("woeid")?,
        })
    }
}

/// Row of the `aliases` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alias {
    /// Place the alias names.
    pub woeid: u64,
    /// Alias text.
    pub name: String,
    /// Alias class (`Q`, `V`, `A`, `S` or `P`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Language code.
    pub lang: Option<String>,
}

impl Record for Alias {
    const TABLE: Table = Table::Aliases;

    fn to_columns(&self) -> Result<ColumnSet, CodecError> {
        let mut columns = ColumnSet::new();
        columns.id("woeid", Some(self.woeid))?;
        columns.text("name", Some(&self.name));
        columns.text("type", self.kind.as_deref());
        columns.text("lang", self.lang.as_deref());
        Ok(columns)
    }

    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError> {
        Ok(Self {
            woeid: columns.required_id("woeid")?,
            name: columns.required_text("name")?,
            kind: columns.text("type")?,
            lang: columns.text("lang")?,
        })
    }
}

/// Entry of the placetype vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Placetype {
    /// Numeric placetype identifier.
    pub id: u64,
    /// Display name.
    pub name: Option<String>,
    /// Description.
    pub descr: Option<String>,
    /// Short machine name (e.g. `Town`).
    pub shortname: Option<String>,
    /// Free-form tag.
    pub tag: Option<String>,
}

impl Record for Placetype {
    const TABLE: Table = Table::Placetypes;

    fn to_columns(&self) -> Result<ColumnSet, CodecError> {
        let mut columns = ColumnSet::new();
        columns.id("id", Some(self.id))?;
        columns.text("name", self.name.as_deref());
        columns.text("descr", self.descr.as_deref());
        columns.text("shortname", self.shortname.as_deref());
        columns.text("tag", self.tag.as_deref());
        Ok(columns)
    }

    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError> {
        Ok(Self {
            id: columns.required_id("id")?,
            name: columns.text("name")?,
            descr: columns.text("descr")?,
            shortname: columns.text("shortname")?,
            tag: columns.text("tag")?,
        })
    }
}

/// Coordinate snapshot of a place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coords {
    /// Place the coordinates belong to.
    pub woeid: u64,
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
}

impl From<&Place> for Coords {
    fn from(place: &Place) -> Self {
        Self {
            woeid: place.woeid,
            lon: place.lon,
            lat: place.lat,
            swlon: place.swlon,
            swlat: place.swlat,
            nelon: place.nelon,
            nelat: place.nelat,
        }
    }
}

impl Record for Coords {
    const TABLE: Table = Table::Coords;

    fn to_columns(&self) -> Result<ColumnSet, CodecError> {
        let mut columns = ColumnSet::new();
        columns.id("woeid", Some(self.woeid))?;
        columns.real("lon", self.lon);
        columns.real("lat", self.lat);
        columns.real("swlon", self.swlon);
        columns.real("swlat", self.swlat);
        columns.real("nelon", self.nelon);
        columns.real("nelat", self.nelat);
        Ok(columns)
    }

    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError> {
        Ok(Self {
            woeid: columns.required_id("woeid")?,
            lon: columns.real("lon")?,
            lat: columns.real("lat")?,
            swlon: columns.real("swlon")?,
            swlat: columns.real("swlat")?,
            nelon: columns.real("nelon")?,
            nelat: columns.real("nelat")?,
        })
    }
}

/// The singleton bookkeeping row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Row identifier; always `1`.
    pub id: u64,
    /// Highest WOE ID seen so far.
    pub maxwoeid: Option<u64>,
}

impl Record for Meta {
    const TABLE: Table = Table::Meta;

    fn to_columns(&self) -> Result<ColumnSet, CodecError> {
        let mut columns = ColumnSet::new();
        columns.id("id", Some(self.id))?;
        columns.id("maxwoeid", self.maxwoeid)?;
        Ok(columns)
    }

    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError> {
        Ok(Self {
            id: columns.required_id("id")?,
            maxwoeid: columns.id("maxwoeid")?,
        })
    }
}
