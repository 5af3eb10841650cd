use super::{non_negative, text, DatasetDb};
use crate::{
    error::{DashError, DashResult},
    record::{coerce_date, FoodListing},
};
use rusqlite::params;

const OPTIONAL: &[&str] = &["Expiry_Date", "Location"];

fn food_listing_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<FoodListing> {
    Ok(FoodListing {
        food_id: row.get("Food_ID")?,
        food_name: text(row, "Food_Name")?,
        quantity: non_negative(row, "Quantity")?,
        expiry_date: text(row, "Expiry_Date")?.and_then(|s| coerce_date(&s)),
        provider_id: row.get("Provider_ID")?,
        provider_type: text(row, "Provider_Type")?,
        location: text(row, "Location")?,
        food_type: text(row, "Food_Type")?,
        meal_type: text(row, "Meal_Type")?,
    })
}

impl DatasetDb {
    // ── Food listing ──────────────────────────────────────────────

    pub fn insert_food_listing(&self, f: &FoodListing) -> DashResult<()> {
        let quantity = i64::try_from(f.quantity).map_err(|_| {
            DashError::data_source(
                "food_listings",
                format!(
                    "quantity {} of listing {} does not fit in an INTEGER column",
                    f.quantity, f.food_id
                ),
            )
        })?;
        self.conn.execute(
            "INSERT INTO food_listings (
                Food_ID, Food_Name, Quantity, Expiry_Date, Provider_ID,
                Provider_Type, Location, Food_Type, Meal_Type
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                f.food_id,
                f.food_name.as_deref(),
                quantity,
                f.expiry_date.map(|d| d.format("%Y-%m-%d").to_string()),
                f.provider_id,
                f.provider_type.as_deref(),
                f.location.as_deref(),
                f.food_type.as_deref(),
                f.meal_type.as_deref(),
            ],
        )?;
        Ok(())
    }

    pub fn load_food_listings(&self) -> DashResult<Vec<FoodListing>> {
        let sql = self.select_for::<FoodListing>(OPTIONAL)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], food_listing_row_mapper)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
