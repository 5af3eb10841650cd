//! Data sources: collaborators that hand the engine four typed tables.
//!
//! RULE: sources do type coercion only. No filtering, no joins, no
//! business logic. A missing table or required column is fatal.

use crate::{
    error::{DashError, DashResult},
    record::{Claim, FoodListing, Provider, Receiver, SourceRecord},
};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// The four raw tables, exactly as loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub providers: Vec<Provider>,
    pub receivers: Vec<Receiver>,
    pub food_listings: Vec<FoodListing>,
    pub claims: Vec<Claim>,
}

impl Tables {
    /// Number of claims whose timestamp could not be parsed.
    pub fn claims_without_timestamp(&self) -> usize {
        self.claims.iter().filter(|c| c.timestamp.is_none()).count()
    }
}

/// Anything that can produce the four tables once per session.
pub trait DataSource {
    /// Short description used in logs.
    fn name(&self) -> String;

    fn load(&self) -> DashResult<Tables>;
}

/// Tables already held in memory.
impl DataSource for Tables {
    fn name(&self) -> String {
        "in-memory".to_string()
    }

    fn load(&self) -> DashResult<Tables> {
        Ok(self.clone())
    }
}

// ── JSON directory ───────────────────────────────────────────────────────────

pub const PROVIDERS_FILE: &str = "providers_data.json";
pub const RECEIVERS_FILE: &str = "receivers_data.json";
pub const FOOD_LISTINGS_FILE: &str = "food_listings_data.json";
pub const CLAIMS_FILE: &str = "claims_data.json";

/// A directory holding one JSON array of row objects per table.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    data_dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn read_table<T: SourceRecord>(&self, file: &str) -> DashResult<Vec<T>> {
        let path = self.data_dir.join(file);
        let content = std::fs::read_to_string(&path).map_err(|e| {
            DashError::data_source(T::TABLE, format!("cannot read {}: {e}", path.display()))
        })?;
        let doc: Value = serde_json::from_str(&content).map_err(|e| {
            DashError::data_source(T::TABLE, format!("invalid JSON in {}: {e}", path.display()))
        })?;
        match doc {
            Value::Array(rows) => decode_rows(rows),
            _ => Err(DashError::data_source(
                T::TABLE,
                format!("{} must hold a JSON array of rows", path.display()),
            )),
        }
    }

    /// Write `tables` into `data_dir` in the layout `load` expects.
    pub fn write(&self, tables: &Tables) -> DashResult<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        write_table(&self.data_dir.join(PROVIDERS_FILE), &tables.providers)?;
        write_table(&self.data_dir.join(RECEIVERS_FILE), &tables.receivers)?;
        write_table(&self.data_dir.join(FOOD_LISTINGS_FILE), &tables.food_listings)?;
        write_table(&self.data_dir.join(CLAIMS_FILE), &tables.claims)?;
        Ok(())
    }
}

impl DataSource for JsonDirSource {
    fn name(&self) -> String {
        format!("json:{}", self.data_dir.display())
    }

    fn load(&self) -> DashResult<Tables> {
        Ok(Tables {
            providers: self.read_table(PROVIDERS_FILE)?,
            receivers: self.read_table(RECEIVERS_FILE)?,
            food_listings: self.read_table(FOOD_LISTINGS_FILE)?,
            claims: self.read_table(CLAIMS_FILE)?,
        })
    }
}

fn write_table<T: serde::Serialize>(path: &Path, rows: &[T]) -> DashResult<()> {
    let content = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Decode raw JSON rows into records, enforcing the table's required columns.
pub fn decode_rows<T: SourceRecord>(rows: Vec<Value>) -> DashResult<Vec<T>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let object = match row {
                Value::Object(object) => object,
                other => {
                    return Err(DashError::data_source(
                        T::TABLE,
                        format!("row {i} is not an object: {other}"),
                    ))
                }
            };
            ensure_columns::<T>(&object)?;
            serde_json::from_value(Value::Object(object))
                .map_err(|e| DashError::data_source(T::TABLE, format!("row {i}: {e}")))
        })
        .collect()
}

fn ensure_columns<T: SourceRecord>(row: &Map<String, Value>) -> DashResult<()> {
    match T::REQUIRED.iter().find(|col| !row.contains_key(**col)) {
        Some(column) => Err(DashError::MissingColumn {
            table: T::TABLE.to_string(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}
