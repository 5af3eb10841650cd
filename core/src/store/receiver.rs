use super::{text, DatasetDb};
use crate::{error::DashResult, record::Receiver};
use rusqlite::params;

const OPTIONAL: &[&str] = &["Receiver_Type", "Contact"];

fn receiver_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Receiver> {
    Ok(Receiver {
        receiver_id: row.get("Receiver_ID")?,
        name: text(row, "Name")?,
        receiver_type: text(row, "Receiver_Type")?,
        city: text(row, "City")?,
        contact: text(row, "Contact")?,
    })
}

impl DatasetDb {
    // ── Receiver ──────────────────────────────────────────────────

    pub fn insert_receiver(&self, r: &Receiver) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO receivers (Receiver_ID, Name, Receiver_Type, City, Contact)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                r.receiver_id,
                r.name.as_deref(),
                r.receiver_type.as_deref(),
                r.city.as_deref(),
                r.contact.as_deref(),
            ],
        )?;
        Ok(())
    }

    pub fn load_receivers(&self) -> DashResult<Vec<Receiver>> {
        let sql = self.select_for::<Receiver>(OPTIONAL)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], receiver_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
