use super::{text, DatasetDb};
use crate::{error::DashResult, record::Provider};
use rusqlite::params;

const OPTIONAL: &[&str] = &["Address"];

fn provider_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Provider> {
    Ok(Provider {
        provider_id: row.get("Provider_ID")?,
        name: text(row, "Name")?,
        provider_type: text(row, "Provider_Type")?,
        address: text(row, "Address")?,
        city: text(row, "City")?,
        contact: text(row, "Contact")?,
    })
}

impl DatasetDb {
    // ── Provider ──────────────────────────────────────────────────

    pub fn insert_provider(&self, p: &Provider) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO providers (Provider_ID, Name, Provider_Type, Address, City, Contact)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                p.provider_id,
                p.name.as_deref(),
                p.provider_type.as_deref(),
                p.address.as_deref(),
                p.city.as_deref(),
                p.contact.as_deref(),
            ],
        )?;
        Ok(())
    }

    pub fn load_providers(&self) -> DashResult<Vec<Provider>> {
        let sql = self.select_for::<Provider>(OPTIONAL)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], provider_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
