use super::{text, DatasetDb};
use crate::{
    error::DashResult,
    record::{parse_timestamp, Claim, ClaimStatus},
};
use rusqlite::params;

fn claim_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<Claim> {
    Ok(Claim {
        claim_id: row.get("Claim_ID")?,
        food_id: row.get("Food_ID")?,
        receiver_id: row.get("Receiver_ID")?,
        status: text(row, "Status")?.map(ClaimStatus::from),
        timestamp: text(row, "Timestamp")?.and_then(|s| parse_timestamp(&s)),
    })
}

impl DatasetDb {
    // ── Claim ─────────────────────────────────────────────────────

    pub fn insert_claim(&self, c: &Claim) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO claims (Claim_ID, Food_ID, Receiver_ID, Status, Timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                c.claim_id,
                c.food_id,
                c.receiver_id,
                c.status.as_ref().map(ClaimStatus::as_str),
                c.timestamp
                    .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            ],
        )?;
        Ok(())
    }

    /// Insert a claim with a timestamp exactly as the source wrote it.
    pub fn insert_claim_raw(
        &self,
        claim_id: i64,
        food_id: Option<i64>,
        receiver_id: Option<i64>,
        status: Option<&str>,
        raw_timestamp: Option<&str>,
    ) -> DashResult<()> {
        self.conn.execute(
            "INSERT INTO claims (Claim_ID, Food_ID, Receiver_ID, Status, Timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![claim_id, food_id, receiver_id, status, raw_timestamp],
        )?;
        Ok(())
    }

    pub fn load_claims(&self) -> DashResult<Vec<Claim>> {
        let sql = self.select_for::<Claim>(&[])?;
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], claim_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
