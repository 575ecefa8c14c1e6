//! Catalogue of the cache tables and their declared column types.
//!
//! Every write is validated against this catalogue before it reaches the
//! storage engine, so a column missing from a table's declaration can never
//! be bound.

use std::{fmt, str::FromStr};

use crate::CodecError;

/// Primitive storage class a column is bound with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Signed 64-bit integer (identifiers, timestamps).
    Integer,
    /// Double precision float (coordinates).
    Real,
    /// UTF-8 text, including packed composite values.
    Text,
}

impl StorageType {
    /// SQL type name used in table declarations.
    #[must_use]
    pub const fn sql_type(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
        }
    }
}

/// Declared `(column, storage type)` pairs for a single table.
pub type FieldSet = &'static [(&'static str, StorageType)];

const META_FIELDS: FieldSet = &[
    ("id", StorageType::Integer),
    ("maxwoeid", StorageType::Integer),
];

const PLACE_FIELDS: FieldSet = &[
    ("woeid", StorageType::Integer),
    ("iso", StorageType::Text),
    ("name", StorageType::Text),
    ("lang", StorageType::Text),
    ("placetype", StorageType::Integer),
    ("placetypename", StorageType::Text),
    ("parent", StorageType::Integer),
    ("lon", StorageType::Real),
    ("lat", StorageType::Real),
    ("swlon", StorageType::Real),
    ("swlat", StorageType::Real),
    ("nelon", StorageType::Real),
    ("nelat", StorageType::Real),
    ("adjacent", StorageType::Text),
    ("alias_q", StorageType::Text),
    ("alias_v", StorageType::Text),
    ("alias_a", StorageType::Text),
    ("alias_s", StorageType::Text),
    ("alias_p", StorageType::Text),
    ("state", StorageType::Integer),
    ("county", StorageType::Integer),
    ("localadmin", StorageType::Integer),
    ("country", StorageType::Integer),
    ("continent", StorageType::Integer),
    ("concordance", StorageType::Text),
    ("supercedes", StorageType::Text),
    ("superceded", StorageType::Text),
    ("history", StorageType::Text),
    ("updated", StorageType::Integer),
    ("geometry", StorageType::Text),
];

const ADJACENCY_FIELDS: FieldSet = &[
    ("woeid", StorageType::Integer),
    ("neighbour", StorageType::Integer),
];

const ALIAS_FIELDS: FieldSet = &[
    ("woeid", StorageType::Integer),
    ("name", StorageType::Text),
    ("type", StorageType::Text),
    ("lang", StorageType::Text),
];

const PLACETYPE_FIELDS: FieldSet = &[
    ("id", StorageType::Integer),
    ("name", StorageType::Text),
    ("descr", StorageType::Text),
    ("shortname", StorageType::Text),
    ("tag", StorageType::Text),
];

const ADMIN_FIELDS: FieldSet = &[
    ("woeid", StorageType::Integer),
    ("state", StorageType::Integer),
    ("county", StorageType::Integer),
    ("localadmin", StorageType::Integer),
    ("country", StorageType::Integer),
    ("continent", StorageType::Integer),
];

const CHILDREN_FIELDS: FieldSet = &[
    ("woeid", StorageType::Integer),
    ("children", StorageType::Text),
];

const ANCESTOR_FIELDS: FieldSet = &[
    ("woeid", StorageType::Integer),
    ("ancestors", StorageType::Text),
];

const COORD_FIELDS: FieldSet = &[
    ("woeid", StorageType::Integer),
    ("lon", StorageType::Real),
    ("lat", StorageType::Real),
    ("swlon", StorageType::Real),
    ("swlat", StorageType::Real),
    ("nelon", StorageType::Real),
    ("nelat", StorageType::Real),
];

const COUNTRY_FIELDS: FieldSet = &[
    ("woeid", StorageType::Integer),
    ("name", StorageType::Text),
    ("iso2", StorageType::Text),
    ("iso3", StorageType::Text),
];

const WOF_FIELDS: FieldSet = &[
    ("wofid", StorageType::Integer),
    ("woeid", StorageType::Integer),
];

/// A table held in the gazetteer cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Singleton bookkeeping row.
    Meta,
    /// Primary place records.
    Places,
    /// Legacy neighbour table; adjacency lives on `places.adjacent`.
    Adjacencies,
    /// Alternative place names.
    Aliases,
    /// Placetype vocabulary.
    Placetypes,
    /// Administrative-level snapshot per place.
    Admins,
    /// Packed child lists.
    Children,
    /// Packed ancestor lists.
    Ancestors,
    /// Denormalised coordinate projection of `places`.
    Coords,
    /// Country lookup keyed by ISO code.
    Countries,
    /// Who's On First identifier mapping.
    Wof,
}

impl Table {
    /// Every table, in creation order.
    pub const ALL: [Self; 11] = [
        Self::Meta,
        Self::Places,
        Self::Adjacencies,
        Self::Aliases,
        Self::Placetypes,
        Self::Admins,
        Self::Children,
        Self::Ancestors,
        Self::Coords,
        Self::Countries,
        Self::Wof,
    ];

    /// SQL name of the table.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Places => "places",
            Self::Adjacencies => "adjacencies",
            Self::Aliases => "aliases",
            Self::Placetypes => "placetypes",
            Self::Admins => "admins",
            Self::Children => "children",
            Self::Ancestors => "ancestors",
            Self::Coords => "coords",
            Self::Countries => "countries",
            Self::Wof => "wof",
        }
    }

    /// Declared columns, in storage order.
    #[must_use]
    pub const fn fields(self) -> FieldSet {
        match self {
            Self::Meta => META_FIELDS,
            Self::Places => PLACE_FIELDS,
            Self::Adjacencies => ADJACENCY_FIELDS,
            Self::Aliases => ALIAS_FIELDS,
            Self::Placetypes => PLACETYPE_FIELDS,
            Self::Admins => ADMIN_FIELDS,
            Self::Children => CHILDREN_FIELDS,
            Self::Ancestors => ANCESTOR_FIELDS,
            Self::Coords => COORD_FIELDS,
            Self::Countries => COUNTRY_FIELDS,
            Self::Wof => WOF_FIELDS,
        }
    }

    /// Storage type declared for `column`, if the table has such a column.
    #[must_use]
    pub fn field_type(self, column: &str) -> Option<StorageType> {
        self.fields()
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, storage)| *storage)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.name() == s)
            .ok_or_else(|| CodecError::UnknownTable { name: s.to_owned() })
    }
}
