use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Data source error in table '{table}': {reason}")]
    DataSource { table: String, reason: String },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Unknown query id {id}: expected 1..=13")]
    UnknownQuery { id: u32 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashError {
    pub fn data_source(table: &str, reason: impl Into<String>) -> Self {
        DashError::DataSource {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors that mean the dataset could not be loaded at all.
    pub fn is_data_source(&self) -> bool {
        matches!(
            self,
            DashError::DataSource { .. }
                | DashError::MissingColumn { .. }
                | DashError::Database(_)
                | DashError::Io(_)
        )
    }
}

pub type DashResult<T> = Result<T, DashError>;
