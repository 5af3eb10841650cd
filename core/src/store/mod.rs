//! SQLite data source.
//!
//! RULE: Only the store module talks to the database.
//! The engine never executes SQL. It sees `Tables`, exactly as it would
//! from any other source.

use crate::{
    error::{DashError, DashResult},
    record::{Claim, FoodListing, Provider, Receiver, SourceRecord},
    source::{DataSource, Tables},
};
use rusqlite::{types::Value, Connection, Row};

mod claim;
mod food_listing;
mod provider;
mod receiver;

pub struct DatasetDb {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl DatasetDb {
    pub fn open(path: &str) -> DashResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DashResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Create the four source tables if they do not exist yet.
    pub fn migrate(&self) -> DashResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_dataset.sql"))?;
        Ok(())
    }

    /// Write every row of `tables` in one transaction.
    pub fn import(&self, tables: &Tables) -> DashResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for p in &tables.providers {
            self.insert_provider(p)?;
        }
        for r in &tables.receivers {
            self.insert_receiver(r)?;
        }
        for f in &tables.food_listings {
            self.insert_food_listing(f)?;
        }
        for c in &tables.claims {
            self.insert_claim(c)?;
        }
        tx.commit()?;
        log::info!(
            "imported {} providers, {} receivers, {} listings, {} claims",
            tables.providers.len(),
            tables.receivers.len(),
            tables.food_listings.len(),
            tables.claims.len()
        );
        Ok(())
    }

    // ── Schema checks ──────────────────────────────────────────

    fn table_columns(&self, table: &str) -> DashResult<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Build the SELECT for a source table.
    ///
    /// Required columns must exist; optional columns that are absent are
    /// selected as NULL so row mappers can always read them by name.
    fn select_for<T: SourceRecord>(&self, optional: &[&str]) -> DashResult<String> {
        let present = self.table_columns(T::TABLE)?;
        if present.is_empty() {
            return Err(DashError::data_source(T::TABLE, "table not found"));
        }
        let has = |col: &str| present.iter().any(|p| p.as_str() == col);
        if let Some(missing) = T::REQUIRED.iter().find(|c| !has(c)) {
            return Err(DashError::MissingColumn {
                table: T::TABLE.to_string(),
                column: missing.to_string(),
            });
        }
        let mut columns: Vec<String> = T::REQUIRED.iter().map(|c| c.to_string()).collect();
        for col in optional {
            if has(col) {
                columns.push(col.to_string());
            } else {
                columns.push(format!("NULL AS {col}"));
            }
        }
        Ok(format!("SELECT {} FROM {} ORDER BY rowid", columns.join(", "), T::TABLE))
    }
}

impl DataSource for DatasetDb {
    fn name(&self) -> String {
        format!("sqlite:{}", self.path.as_deref().unwrap_or(":memory:"))
    }

    fn load(&self) -> DashResult<Tables> {
        Ok(Tables {
            providers: self.load_providers().map_err(in_table(Provider::TABLE))?,
            receivers: self.load_receivers().map_err(in_table(Receiver::TABLE))?,
            food_listings: self
                .load_food_listings()
                .map_err(in_table(FoodListing::TABLE))?,
            claims: self.load_claims().map_err(in_table(Claim::TABLE))?,
        })
    }
}

/// Raw SQL failures while reading a table are data source errors for that table.
fn in_table(table: &'static str) -> impl Fn(DashError) -> DashError {
    move |err| match err {
        DashError::Database(e) => DashError::data_source(table, e.to_string()),
        other => other,
    }
}

// ── Row helpers ──────────────────────────────────────────────────────────────

/// Read a nullable text column, accepting numbers stored where text was expected.
pub(crate) fn text(row: &Row<'_>, col: &str) -> rusqlite::Result<Option<String>> {
    Ok(match row.get::<_, Value>(col)? {
        Value::Null => None,
        Value::Text(s) => Some(s),
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    })
}

/// Read a non-negative integer column.
pub(crate) fn non_negative(row: &Row<'_>, col: &str) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(col)?;
    u64::try_from(raw).map_err(|_| {
        let idx = row.as_ref().column_index(col).unwrap_or_default();
        rusqlite::Error::IntegralValueOutOfRange(idx, raw)
    })
}
