//! Questions over the food listings table (2, 5, 6, 7 and 13).
//!
//! None of these read claims, so the date range never applies here.

use crate::{
    config::RankingLimits,
    dataset::Dataset,
    filter::FilterContext,
    frame::{count_by, group_by, left_join, rank_desc, top_n},
    query::{scalar_result, table_result, QueryId},
    table::{ChartSpec, QueryResult, TableRow, Value},
    types::Quantity,
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTypeQuantity {
    pub provider_type: String,
    pub quantity: Quantity,
}

impl TableRow for ProviderTypeQuantity {
    const COLUMNS: &'static [&'static str] = &["Provider_Type", "Quantity"];

    fn cells(&self) -> Vec<Value> {
        vec![self.provider_type.clone().into(), self.quantity.into()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityListings {
    pub city: String,
    pub total_listings: u64,
}

impl TableRow for CityListings {
    const COLUMNS: &'static [&'static str] = &["City", "total_listings"];

    fn cells(&self) -> Vec<Value> {
        vec![self.city.clone().into(), self.total_listings.into()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodTypeCount {
    pub food_type: String,
    pub total_items: u64,
}

impl TableRow for FoodTypeCount {
    const COLUMNS: &'static [&'static str] = &["Food_Type", "total_items"];

    fn cells(&self) -> Vec<Value> {
        vec![self.food_type.clone().into(), self.total_items.into()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDonation {
    pub name: String,
    pub total_donated: Quantity,
}

impl TableRow for ProviderDonation {
    const COLUMNS: &'static [&'static str] = &["Name", "total_donated"];

    fn cells(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.total_donated.into()]
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub fn quantity_by_provider_type(dataset: &Dataset) -> Vec<ProviderTypeQuantity> {
    group_by(
        dataset.food_listings(),
        |f| f.provider_type.clone(),
        |sum: &mut Quantity, f| *sum = sum.saturating_add(f.quantity),
    )
    .into_iter()
    .map(|(provider_type, quantity)| ProviderTypeQuantity {
        provider_type,
        quantity,
    })
    .collect()
}

/// Sum of every listing's quantity; zero for an empty table. Saturates at
/// `Quantity::MAX`.
pub fn total_quantity_available(dataset: &Dataset) -> Quantity {
    dataset
        .food_listings()
        .iter()
        .fold(0, |sum: Quantity, f| sum.saturating_add(f.quantity))
}

/// Listing count per provider city. Listings whose provider is unknown
/// have no city and are left out.
pub fn food_listings_by_city(dataset: &Dataset) -> Vec<CityListings> {
    let joined = left_join(
        dataset.food_listings(),
        dataset.providers(),
        dataset.provider_index(),
        |f| f.provider_id,
    );
    count_by(joined, |(_, p)| p.and_then(|p| p.city.clone()))
        .into_iter()
        .map(|(city, total_listings)| CityListings {
            city,
            total_listings,
        })
        .collect()
}

pub fn most_common_food_types(dataset: &Dataset) -> Vec<FoodTypeCount> {
    count_by(dataset.food_listings(), |f| f.food_type.clone())
        .into_iter()
        .map(|(food_type, total_items)| FoodTypeCount {
            food_type,
            total_items,
        })
        .collect()
}

/// Quantity listed per provider name, largest first, at most `limit` rows.
pub fn total_quantity_donated_by_provider(
    dataset: &Dataset,
    limit: usize,
) -> Vec<ProviderDonation> {
    let joined = left_join(
        dataset.food_listings(),
        dataset.providers(),
        dataset.provider_index(),
        |f| f.provider_id,
    );
    let mut rows: Vec<ProviderDonation> = group_by(
        joined,
        |(_, p)| p.and_then(|p| p.name.clone()),
        |sum: &mut Quantity, (f, _)| *sum = sum.saturating_add(f.quantity),
    )
    .into_iter()
    .map(|(name, total_donated)| ProviderDonation {
        name,
        total_donated,
    })
    .collect();
    rank_desc(&mut rows, |a, b| a.total_donated.cmp(&b.total_donated));
    top_n(rows, limit)
}

// ── Registry adapters ────────────────────────────────────────────────────────

pub(crate) fn run_quantity_by_provider_type(
    dataset: &Dataset,
    _ctx: &FilterContext,
    _limits: &RankingLimits,
) -> QueryResult {
    let rows = quantity_by_provider_type(dataset);
    table_result(
        QueryId::QuantityByProviderType,
        &rows,
        Some(ChartSpec::bar("Provider_Type", "Quantity")),
    )
}

pub(crate) fn run_total_quantity_available(
    dataset: &Dataset,
    _ctx: &FilterContext,
    _limits: &RankingLimits,
) -> QueryResult {
    scalar_result(
        QueryId::TotalQuantityAvailable,
        "Total Available Quantity",
        total_quantity_available(dataset),
    )
}

pub(crate) fn run_food_listings_by_city(
    dataset: &Dataset,
    _ctx: &FilterContext,
    _limits: &RankingLimits,
) -> QueryResult {
    let rows = food_listings_by_city(dataset);
    table_result(
        QueryId::FoodListingsByCity,
        &rows,
        Some(ChartSpec::bar("City", "total_listings")),
    )
}

pub(crate) fn run_most_common_food_types(
    dataset: &Dataset,
    _ctx: &FilterContext,
    _limits: &RankingLimits,
) -> QueryResult {
    let rows = most_common_food_types(dataset);
    table_result(
        QueryId::MostCommonFoodTypes,
        &rows,
        Some(ChartSpec::bar("Food_Type", "total_items")),
    )
}

pub(crate) fn run_total_quantity_donated_by_provider(
    dataset: &Dataset,
    _ctx: &FilterContext,
    limits: &RankingLimits,
) -> QueryResult {
    let rows = total_quantity_donated_by_provider(dataset, limits.donated_by_provider);
    table_result(
        QueryId::TotalQuantityDonatedByProvider,
        &rows,
        Some(ChartSpec::bar("Name", "total_donated")),
    )
}
