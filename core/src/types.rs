//! Shared primitive types used across the dashboard engine.

/// Primary key of a provider row.
pub type ProviderId = i64;

/// Primary key of a receiver row.
pub type ReceiverId = i64;

/// Primary key of a food listing row.
pub type FoodId = i64;

/// Primary key of a claim row.
pub type ClaimId = i64;

/// Food quantities are whole, non-negative units.
pub type Quantity = u64;

/// City selector value meaning "no city restriction".
pub const ALL_CITIES: &str = "All";
