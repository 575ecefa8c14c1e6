//! Conversion between structured records and flat storage columns.
//!
//! Composite fields (lists, maps and geometry) are packed into a single text
//! scalar: a `v1:` version tag followed by compact JSON. Scalars pass through
//! unchanged. Both directions skip fields that are absent, so partial
//! documents survive a round trip untouched.

use std::collections::BTreeMap;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{StorageType, Table};

/// Version tag prepended to every packed value.
pub const PACK_VERSION: &str = "v1";

const PACK_SEPARATOR: char = ':';

/// Errors raised while packing or unpacking column values.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A composite value could not be serialised.
    #[error("failed to pack field `{field}`")]
    Pack {
        /// Column being packed.
        field: String,
        /// JSON encoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A packed value did not decode into the expected structure.
    #[error("packed field `{field}` is malformed")]
    Malformed {
        /// Column being unpacked.
        field: String,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// A packed value carried an unknown or missing version tag.
    #[error("packed field `{field}` has unsupported encoding version {found:?}")]
    UnsupportedVersion {
        /// Column being unpacked.
        field: String,
        /// Tag found in front of the payload, if any.
        found: Option<String>,
    },
    /// An identifier does not fit the storage integer range.
    #[error("field `{field}` value {value} exceeds the storage integer range")]
    OutOfRange {
        /// Column carrying the identifier.
        field: String,
        /// Offending value.
        value: String,
    },
    /// A column held a value of a different storage class than declared.
    #[error("field `{field}` expected {expected:?} storage")]
    TypeMismatch {
        /// Column carrying the value.
        field: String,
        /// Declared storage type.
        expected: StorageType,
    },
    /// A required column was missing or `NULL`.
    #[error("required field `{field}` is missing")]
    MissingField {
        /// Column that was required.
        field: String,
    },
    /// A column is not declared for the target table.
    #[error("field `{field}` is not declared for table `{table}`")]
    UnknownField {
        /// Target table.
        table: Table,
        /// Undeclared column.
        field: String,
    },
    /// A table name did not match the catalogue.
    #[error("unknown table `{name}`")]
    UnknownTable {
        /// Name that failed to parse.
        name: String,
    },
}

/// A single storage scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// SQL `NULL`.
    Null,
    /// Integer scalar.
    Integer(i64),
    /// Floating point scalar.
    Real(f64),
    /// Text scalar (packed composites included).
    Text(String),
}

impl StorageType {
    /// Coerce `value` into this storage class for column `field`.
    ///
    /// Integers widen into real columns; every other mismatch is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TypeMismatch`] when the value cannot be stored
    /// in a column of this type.
    pub fn coerce(self, field: &str, value: Column) -> Result<Column, CodecError> {
        match (self, value) {
            (_, Column::Null) => Ok(Column::Null),
            (Self::Integer, Column::Integer(v)) => Ok(Column::Integer(v)),
            (Self::Real, Column::Real(v)) => Ok(Column::Real(v)),
            (Self::Real, Column::Integer(v)) => Ok(Column::Real(int_to_real(v))),
            (Self::Text, Column::Text(v)) => Ok(Column::Text(v)),
            (expected, _) => Err(CodecError::TypeMismatch {
                field: field.to_owned(),
                expected,
            }),
        }
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "SQLite stores integral coordinates as integers; magnitudes stay far below 2^53"
)]
const fn int_to_real(value: i64) -> f64 {
    value as f64
}

/// Serialise `value` into a versioned packed scalar.
///
/// # Errors
///
/// Returns [`CodecError::Pack`] when the value cannot be encoded as JSON.
pub fn pack<T: Serialize + ?Sized>(field: &str, value: &T) -> Result<String, CodecError> {
    let body = serde_json::to_string(value).map_err(|source| CodecError::Pack {
        field: field.to_owned(),
        source,
    })?;
    Ok(format!("{PACK_VERSION}{PACK_SEPARATOR}{body}"))
}

/// Decode a packed scalar produced by [`pack`].
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedVersion`] for untagged or foreign
/// payloads and [`CodecError::Malformed`] when the JSON body does not match
/// `T`.
pub fn unpack<T: DeserializeOwned>(field: &str, packed: &str) -> Result<T, CodecError> {
    let Some((version, body)) = packed.split_once(PACK_SEPARATOR) else {
        return Err(CodecError::UnsupportedVersion {
            field: field.to_owned(),
            found: None,
        });
    };
    if version != PACK_VERSION {
        return Err(CodecError::UnsupportedVersion {
            field: field.to_owned(),
            found: Some(version.to_owned()),
        });
    }
    serde_json::from_str(body).map_err(|source| CodecError::Malformed {
        field: field.to_owned(),
        source,
    })
}

/// Convert an identifier into the signed storage range.
///
/// # Errors
///
/// Returns [`CodecError::OutOfRange`] for identifiers above `i64::MAX`.
pub fn id_to_storage(field: &str, id: u64) -> Result<i64, CodecError> {
    i64::try_from(id).map_err(|_| CodecError::OutOfRange {
        field: field.to_owned(),
        value: id.to_string(),
    })
}

/// Ordered columns produced when packing a record for a write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSet {
    entries: Vec<(&'static str, Column)>,
}

impl ColumnSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an identifier column; `None` is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfRange`] when the identifier exceeds `i64`.
    pub fn id(&mut self, field: &'static str, value: Option<u64>) -> Result<(), CodecError> {
        if let Some(id) = value {
            let stored = id_to_storage(field, id)?;
            self.entries.push((field, Column::Integer(stored)));
        }
        Ok(())
    }

    /// Append a real column; `None` is skipped.
    pub fn real(&mut self, field: &'static str, value: Option<f64>) {
        if let Some(v) = value {
            self.entries.push((field, Column::Real(v)));
        }
    }

    /// Append a text column; `None` is skipped.
    pub fn text(&mut self, field: &'static str, value: Option<&str>) {
        if let Some(v) = value {
            self.entries.push((field, Column::Text(v.to_owned())));
        }
    }

    /// Append a packed composite column; `None` is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Pack`] when serialisation fails.
    pub fn packed<T: Serialize + ?Sized>(
        &mut self,
        field: &'static str,
        value: Option<&T>,
    ) -> Result<(), CodecError> {
        if let Some(v) = value {
            self.entries.push((field, Column::Text(pack(field, v)?)));
        }
        Ok(())
    }

    /// Replace the value of `field`, appending it when absent.
    pub fn set(&mut self, field: &'static str, value: Column) {
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    /// Remove and return the value of `field`.
    pub fn take(&mut self, field: &str) -> Option<Column> {
        let position = self.entries.iter().position(|(name, _)| *name == field)?;
        Some(self.entries.remove(position).1)
    }

    /// Column names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Number of populated columns.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no column is populated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate each column against `table` and coerce it to the declared
    /// storage type.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownField`] for undeclared columns and
    /// [`CodecError::TypeMismatch`] for values of the wrong storage class.
    pub fn bind_to(self, table: Table) -> Result<Vec<(&'static str, Column)>, CodecError> {
        self.entries
            .into_iter()
            .map(|(field, value)| {
                let storage = table
                    .field_type(field)
                    .ok_or_else(|| CodecError::UnknownField {
                        table,
                        field: field.to_owned(),
                    })?;
                Ok((field, storage.coerce(field, value)?))
            })
            .collect()
    }
}

/// Columns fetched from a stored row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    columns: BTreeMap<String, Column>,
}

impl FromIterator<(String, Column)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (String, Column)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl ColumnMap {
    /// Raw value of `field`; `NULL` and missing columns both yield `None`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Column> {
        self.columns
            .get(field)
            .filter(|value| !matches!(value, Column::Null))
    }

    /// Integer column.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TypeMismatch`] for non-integer values.
    pub fn integer(&self, field: &str) -> Result<Option<i64>, CodecError> {
        match self.get(field) {
            None => Ok(None),
            Some(Column::Integer(v)) => Ok(Some(*v)),
            Some(_) => Err(mismatch(field, StorageType::Integer)),
        }
    }

    /// Identifier column; negative values are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::OutOfRange`] for negative identifiers.
    pub fn id(&self, field: &str) -> Result<Option<u64>, CodecError> {
        self.integer(field)?
            .map(|v| {
                u64::try_from(v).map_err(|_| CodecError::OutOfRange {
                    field: field.to_owned(),
                    value: v.to_string(),
                })
            })
            .transpose()
    }

    /// Identifier column that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] when the column is absent.
    pub fn required_id(&self, field: &str) -> Result<u64, CodecError> {
        self.id(field)?.ok_or_else(|| CodecError::MissingField {
            field: field.to_owned(),
        })
    }

    /// Real column; integral values are widened.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TypeMismatch`] for non-numeric values.
    pub fn real(&self, field: &str) -> Result<Option<f64>, CodecError> {
        match self.get(field) {
            None => Ok(None),
            Some(Column::Real(v)) => Ok(Some(*v)),
            Some(Column::Integer(v)) => Ok(Some(int_to_real(*v))),
            Some(Column::Text(_)) => Err(mismatch(field, StorageType::Real)),
            Some(Column::Null) => Ok(None),
        }
    }

    /// Text column.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::TypeMismatch`] for non-text values.
    pub fn text(&self, field: &str) -> Result<Option<String>, CodecError> {
        match self.get(field) {
            None => Ok(None),
            Some(Column::Text(v)) => Ok(Some(v.clone())),
            Some(_) => Err(mismatch(field, StorageType::Text)),
        }
    }

    /// Text column that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MissingField`] when the column is absent.
    pub fn required_text(&self, field: &str) -> Result<String, CodecError> {
        self.text(field)?.ok_or_else(|| CodecError::MissingField {
            field: field.to_owned(),
        })
    }

    /// Packed composite column, unpacked into `T`.
    ///
    /// # Errors
    ///
    /// Propagates [`unpack`] failures.
    pub fn packed<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, CodecError> {
        self.text(field)?
            .map(|packed| unpack(field, &packed))
            .transpose()
    }
}

fn mismatch(field: &str, expected: StorageType) -> CodecError {
    CodecError::TypeMismatch {
        field: field.to_owned(),
        expected,
    }
}

/// A typed record stored in exactly one cache table.
pub trait Record: Sized {
    /// Table the record is written to.
    const TABLE: Table;

    /// Pack the populated fields into storage columns.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when a field cannot be represented.
    fn to_columns(&self) -> Result<ColumnSet, CodecError>;

    /// Rebuild the record from a fetched row.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] when a column is malformed or a required
    /// column is missing.
    fn from_columns(columns: &ColumnMap) -> Result<Self, CodecError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Geometry, HistoryEntry, test_support::scattered_positions};
    use rstest::rstest;
    use serde_json::{Map, Value};

    #[rstest]
    fn pack_prefixes_version_tag() {
        let packed = pack("adjacent", &vec![1_u64, 2, 3]).expect("pack list");
        assert_eq!(packed, "v1:[1,2,3]");
    }

    #[rstest]
    fn unpack_reverses_pack() {
        let ids = vec![12_u64, 44];
        let packed = pack("children", &ids).expect("pack ids");
        let unpacked: Vec<u64> = unpack("children", &packed).expect("unpack ids");
        assert_eq!(unpacked, ids);
    }

    #[rstest]
    fn packed_coordinates_keep_every_bit() {
        let geometry = Geometry::MultiPoint(scattered_positions(20_000, 0x9E37_79B9_7F4A_7C15));
        let packed = pack("geometry", &geometry).expect("pack geometry");
        let unpacked: Geometry = unpack("geometry", &packed).expect("unpack geometry");
        assert_eq!(unpacked, geometry);
    }

    #[rstest]
    fn packed_history_keeps_float_values() {
        let history: Vec<HistoryEntry> = scattered_positions(2_000, 0x2545_F491_4F6C_DD1D)
            .into_iter()
            .map(|[lon, lat]| {
                let mut entry = Map::new();
                entry.insert("lon".to_owned(), Value::from(lon));
                entry.insert("lat".to_owned(), Value::from(lat));
                HistoryEntry(entry)
            })
            .collect();
        let packed = pack("history", &history).expect("pack history");
        let unpacked: Vec<HistoryEntry> = unpack("history", &packed).expect("unpack history");
        assert_eq!(unpacked, history);
    }

    #[rstest]
    #[case("[1,2]", None)]
    #[case("v2:[1,2]", Some("v2"))]
    fn unpack_rejects_foreign_versions(#[case] raw: &str, #[case] found: Option<&str>) {
        let err = unpack::<Vec<u64>>("history", raw).expect_err("foreign version");
        match err {
            CodecError::UnsupportedVersion {
                found: reported, ..
            } => assert_eq!(reported.as_deref(), found),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[rstest]
    fn unpack_reports_malformed_payloads() {
        let err = unpack::<Vec<u64>>("adjacent", "v1:{not json").expect_err("bad json");
        assert!(matches!(err, CodecError::Malformed { field, .. } if field == "adjacent"));
    }

    #[rstest]
    fn column_set_skips_absent_values() {
        let mut columns = ColumnSet::new();
        columns.id("woeid", Some(7)).expect("woeid fits");
        columns.id("parent", None).expect("absent parent");
        columns.text("name", None);
        columns.real("lat", Some(51.5));
        assert_eq!(columns.names().collect::<Vec<_>>(), vec!["woeid", "lat"]);
    }

    #[rstest]
    fn column_set_rejects_oversized_ids() {
        let mut columns = ColumnSet::new();
        let err = columns.id("woeid", Some(u64::MAX)).expect_err("too large");
        assert!(matches!(err, CodecError::OutOfRange { .. }));
    }

    #[rstest]
    fn bind_to_rejects_undeclared_columns() {
        let mut columns = ColumnSet::new();
        columns.text("geometry", Some("v1:{}"));
        let err = columns.bind_to(Table::Admins).expect_err("undeclared");
        assert!(matches!(err, CodecError::UnknownField { table: Table::Admins, .. }));
    }

    #[rstest]
    fn bind_to_widens_integers_into_real_columns() {
        let mut columns = ColumnSet::new();
        columns.set("lon", Column::Integer(3));
        let bound = columns.bind_to(Table::Coords).expect("coerce");
        assert_eq!(bound, vec![("lon", Column::Real(3.0))]);
    }

    #[rstest]
    fn bind_to_rejects_text_in_integer_columns() {
        let mut columns = ColumnSet::new();
        columns.text("woeid", Some("twelve"));
        let err = columns.bind_to(Table::Places).expect_err("mismatch");
        assert!(matches!(
            err,
            CodecError::TypeMismatch {
                expected: StorageType::Integer,
                ..
            }
        ));
    }

    #[rstest]
    fn column_map_treats_null_as_absent() {
        let row: ColumnMap = [
            ("woeid".to_owned(), Column::Integer(3)),
            ("parent".to_owned(), Column::Null),
        ]
        .into_iter()
        .collect();
        assert_eq!(row.id("parent").expect("null parent"), None);
        assert_eq!(row.required_id("woeid").expect("woeid"), 3);
    }

    #[rstest]
    #[case::integer_column("woeid", StorageType::Integer)]
    #[case::real_column("lat", StorageType::Real)]
    fn column_map_rejects_numeric_text(#[case] field: &str, #[case] expected: StorageType) {
        let row: ColumnMap = [(field.to_owned(), Column::Text("12".to_owned()))]
            .into_iter()
            .collect();
        let err = if expected == StorageType::Integer {
            row.integer(field).map(|_| ())
        } else {
            row.real(field).map(|_| ())
        }
        .expect_err("text is not numeric storage");
        assert!(matches!(
            err,
            CodecError::TypeMismatch { expected: found, .. } if found == expected
        ));
    }

    #[rstest]
    fn column_map_rejects_negative_ids() {
        let row: ColumnMap = [("woeid".to_owned(), Column::Integer(-1))]
            .into_iter()
            .collect();
        assert!(matches!(
            row.id("woeid"),
            Err(CodecError::OutOfRange { .. })
        ));
    }
}
