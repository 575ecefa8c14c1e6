//! The cache handle: connection lifecycle and shared read/write plumbing.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use rusqlite::{
    Connection, Params, params_from_iter,
    types::{Value, ValueRef},
};
use woeplanet_core::{CodecError, Column, ColumnMap, ColumnSet, Record, Table};

use crate::{
    CacheError, CacheOptions,
    fs::ensure_cache_dir,
    statements::{ReadQuery, StatementCache},
};

/// Embedded, single-process gazetteer cache backed by one SQLite file.
///
/// The handle is not `Sync`. One caller drives it at a time, and the
/// storage engine's exclusive lock keeps other processes out.
///
/// # Examples
///
/// ```
/// use woeplanet_cache::{CacheOptions, GeoplanetCache};
/// use woeplanet_core::Place;
///
/// # fn main() -> Result<(), woeplanet_cache::CacheError> {
/// let cache = GeoplanetCache::open_in_memory(&CacheOptions::default())?;
/// cache.insert_place(&Place {
///     name: Some("Sunnyvale".into()),
///     ..Place::new(2_502_265)
/// })?;
///
/// let place = cache.get_woeid(2_502_265)?.expect("place was stored");
/// assert_eq!(place.name.as_deref(), Some("Sunnyvale"));
/// assert!(cache.get_woeid(1)?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct GeoplanetCache {
    pub(crate) connection: Connection,
    pub(crate) statements: StatementCache,
    path: Option<Utf8PathBuf>,
}

impl fmt::Debug for GeoplanetCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoplanetCache")
            .field("path", &self.path)
            .field("schema_generation", &self.statements.generation())
            .finish_non_exhaustive()
    }
}

impl GeoplanetCache {
    /// Open (creating if needed) the cache file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the directory, file, pragmas or schema
    /// cannot be set up.
    pub fn open(path: &Utf8Path, options: &CacheOptions) -> Result<Self, CacheError> {
        ensure_cache_dir(path)?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| CacheError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Self::initialise(connection, Some(path.to_path_buf()), options)
    }

    /// Open a private in-memory cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the pragmas or schema cannot be applied.
    pub fn open_in_memory(options: &CacheOptions) -> Result<Self, CacheError> {
        let connection =
            Connection::open_in_memory().map_err(|source| CacheError::Open {
                path: Utf8PathBuf::from(":memory:"),
                source,
            })?;
        Self::initialise(connection, None, options)
    }

    fn initialise(
        connection: Connection,
        path: Option<Utf8PathBuf>,
        options: &CacheOptions,
    ) -> Result<Self, CacheError> {
        for (pragma, value) in options.pragmas() {
            apply_pragma(&connection, pragma, &value)
                .map_err(|source| CacheError::Configure { pragma, source })?;
        }
        connection.set_prepared_statement_cache_capacity(ReadQuery::ALL.len());

        let mut cache = Self {
            connection,
            statements: StatementCache::default(),
            path,
        };
        if options.setup {
            cache.setup_schema()?;
        }
        Ok(cache)
    }

    /// Location of the cache file; `None` for in-memory caches.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Raw connection, for callers needing SQL the accessors do not cover.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Number of schema changes observed since opening.
    #[must_use]
    pub fn schema_generation(&self) -> u64 {
        self.statements.generation()
    }

    /// Whether `query` currently holds a statement compiled for this schema.
    #[must_use]
    pub fn is_compiled(&self, query: ReadQuery) -> bool {
        self.statements.is_current(query)
    }

    /// Run a named read and return its first row, if any.
    pub(crate) fn fetch_row<P: Params>(
        &self,
        query: ReadQuery,
        params: P,
    ) -> Result<Option<ColumnMap>, CacheError> {
        let operation = query.operation();
        let mut statement = self.statements.prepare(&self.connection, query)?;
        let names: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_owned)
            .collect();
        let mut rows = statement
            .query(params)
            .map_err(|source| CacheError::Execute { operation, source })?;
        let Some(row) = rows
            .next()
            .map_err(|source| CacheError::Fetch { operation, source })?
        else {
            return Ok(None);
        };

        let columns = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| row.get_ref(index).map(|value| (name, column_from(value))))
            .collect::<rusqlite::Result<ColumnMap>>()
            .map_err(|source| CacheError::Fetch { operation, source })?;
        Ok(Some(columns))
    }

    /// Run a named read and decode its first row into `R`.
    pub(crate) fn fetch_record<R: Record, P: Params>(
        &self,
        query: ReadQuery,
        params: P,
    ) -> Result<Option<R>, CacheError> {
        self.fetch_row(query, params)?
            .map(|columns| R::from_columns(&columns))
            .transpose()
            .map_err(|source| codec_error(query.operation(), source))
    }

    /// `INSERT OR REPLACE` exactly the populated columns of `record`.
    pub(crate) fn upsert<R: Record>(
        &self,
        operation: &'static str,
        record: &R,
    ) -> Result<(), CacheError> {
        let columns = record
            .to_columns()
            .map_err(|source| codec_error(operation, source))?;
        self.upsert_columns(operation, R::TABLE, columns)
    }

    pub(crate) fn upsert_columns(
        &self,
        operation: &'static str,
        table: Table,
        columns: ColumnSet,
    ) -> Result<(), CacheError> {
        let bound = columns
            .bind_to(table)
            .map_err(|source| codec_error(operation, source))?;
        let names: Vec<&str> = bound.iter().map(|(name, _)| *name).collect();
        let placeholders: Vec<String> =
            (1..=bound.len()).map(|index| format!("?{index}")).collect();
        let sql = format!(
            "INSERT OR REPLACE INTO {table} ({}) VALUES ({})",
            names.join(", "),
            placeholders.join(", ")
        );
        self.execute_bound(operation, &sql, bound.into_iter().map(|(_, value)| value))
            .map(|_| ())
    }

    /// Prepare `sql`, bind `values` positionally and execute it once.
    pub(crate) fn execute_bound<I>(
        &self,
        operation: &'static str,
        sql: &str,
        values: I,
    ) -> Result<usize, CacheError>
    where
        I: IntoIterator<Item = Column>,
    {
        debug!("{operation}: {sql}");
        let mut statement = self
            .connection
            .prepare(sql)
            .map_err(|source| CacheError::Prepare { operation, source })?;
        statement
            .execute(params_from_iter(values.into_iter().map(value_from)))
            .map_err(|source| CacheError::Execute { operation, source })
    }
}

/// Some pragmas echo their new value as a row; drain it rather than fail.
fn apply_pragma(connection: &Connection, pragma: &str, value: &str) -> rusqlite::Result<()> {
    let mut statement = connection.prepare(&format!("PRAGMA {pragma} = {value}"))?;
    let mut rows = statement.query([])?;
    while rows.next()?.is_some() {}
    Ok(())
}

pub(crate) const fn codec_error(operation: &'static str, source: CodecError) -> CacheError {
    CacheError::Codec { operation, source }
}

fn column_from(value: ValueRef<'_>) -> Column {
    match value {
        ValueRef::Null => Column::Null,
        ValueRef::Integer(v) => Column::Integer(v),
        ValueRef::Real(v) => Column::Real(v),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Column::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn value_from(column: Column) -> Value {
    match column {
        Column::Null => Value::Null,
        Column::Integer(v) => Value::Integer(v),
        Column::Real(v) => Value::Real(v),
        Column::Text(v) => Value::Text(v),
    }
}
