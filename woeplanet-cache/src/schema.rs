//! Table and index lifecycle.
//!
//! Column declarations are generated from the [`Table`] catalogue so the
//! stored schema and the bind-time type checks cannot drift apart. Every
//! call, successful or not, bumps the schema generation so compiled reads
//! are rebuilt before their next use.

use log::info;
use rusqlite::Transaction;
use woeplanet_core::Table;

use crate::{CacheError, GeoplanetCache};

/// Index name, uniqueness and indexed column.
type IndexSpec = (&'static str, bool, &'static str);

const fn indexes(table: Table) -> &'static [IndexSpec] {
    match table {
        Table::Meta => &[("meta_by_id", true, "id")],
        Table::Places => &[
            ("places_by_woeid", true, "woeid"),
            ("places_by_parent", false, "parent"),
        ],
        Table::Adjacencies => &[("adjacencies_by_woeid", false, "woeid")],
        Table::Aliases => &[("aliases_by_woeid", false, "woeid")],
        Table::Placetypes => &[
            ("placetype_by_id", false, "id"),
            ("placetype_by_name", false, "shortname"),
        ],
        Table::Admins => &[("admin_by_id", true, "woeid")],
        Table::Children => &[("children_by_woeid", true, "woeid")],
        Table::Ancestors => &[("ancestors_by_woeid", true, "woeid")],
        Table::Coords => &[("coords_by_woeid", true, "woeid")],
        Table::Countries => &[
            ("countries_by_woeid", true, "woeid"),
            ("countries_by_iso", true, "iso2"),
        ],
        Table::Wof => &[("wof_by_wofid", true, "wofid")],
    }
}

fn create_table_sql(table: Table) -> String {
    let columns: Vec<String> = table
        .fields()
        .iter()
        .map(|(name, storage)| format!("{name} {}", storage.sql_type()))
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {table} ({})",
        columns.join(", ")
    )
}

fn create_index_sql((name, unique, column): IndexSpec, table: Table) -> String {
    let unique = if unique { "UNIQUE " } else { "" };
    format!("CREATE {unique}INDEX IF NOT EXISTS {name} ON {table}({column})")
}

fn run_step(
    transaction: &Transaction<'_>,
    table: Table,
    step: &'static str,
    sql: &str,
) -> Result<(), CacheError> {
    transaction
        .execute_batch(sql)
        .map_err(|source| CacheError::Ddl {
            table,
            step,
            source,
        })
}

impl GeoplanetCache {
    /// Create `table` if it is absent, dropping it first when `reset` is set.
    ///
    /// Runs in a transaction; a failure rolls back and leaves the previous
    /// schema intact.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Ddl`] with the engine diagnostic.
    pub fn create_table(&mut self, table: Table, reset: bool) -> Result<(), CacheError> {
        self.statements.invalidate();
        let transaction = self.begin_ddl(table)?;
        if reset {
            info!("resetting table {table}");
            run_step(
                &transaction,
                table,
                "drop table",
                &format!("DROP TABLE IF EXISTS {table}"),
            )?;
        }
        run_step(&transaction, table, "create table", &create_table_sql(table))?;
        commit_ddl(transaction, table)
    }

    /// Create the unique and lookup indexes declared for `table`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Ddl`] with the engine diagnostic, for example
    /// when existing rows violate a unique index.
    pub fn create_index(&mut self, table: Table) -> Result<(), CacheError> {
        self.statements.invalidate();
        let transaction = self.begin_ddl(table)?;
        for index in indexes(table) {
            run_step(
                &transaction,
                table,
                "create index",
                &create_index_sql(*index, table),
            )?;
        }
        commit_ddl(transaction, table)
    }

    /// Create every table and its indexes without resetting existing data.
    ///
    /// # Errors
    ///
    /// Returns the first [`CacheError::Ddl`] encountered.
    pub fn setup_schema(&mut self) -> Result<(), CacheError> {
        for table in Table::ALL {
            self.create_table(table, false)?;
            self.create_index(table)?;
        }
        Ok(())
    }

    fn begin_ddl(&mut self, table: Table) -> Result<Transaction<'_>, CacheError> {
        self.connection
            .transaction()
            .map_err(|source| CacheError::Ddl {
                table,
                step: "begin transaction",
                source,
            })
    }
}

fn commit_ddl(transaction: Transaction<'_>, table: Table) -> Result<(), CacheError> {
    transaction.commit().map_err(|source| CacheError::Ddl {
        table,
        step: "commit transaction",
        source,
    })
}
