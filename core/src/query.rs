//! Query identifiers and the registry that maps them to query functions.
//!
//! RULE: every query has the same signature (`QueryFn`) and is pure.
//! The registry is filled once, in question order 1..=13, and the
//! engine dispatches through it.

use crate::{
    claim_queries, directory_queries,
    config::RankingLimits,
    dataset::Dataset,
    error::{DashError, DashResult},
    filter::FilterContext,
    listing_queries,
    table::{ChartSpec, Metric, QueryOutput, QueryResult, ResultTable, TableRow},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum QueryId {
    ProvidersReceiversByCity = 1,
    QuantityByProviderType = 2,
    ProviderContactsByCity = 3,
    TopReceiversByClaims = 4,
    TotalQuantityAvailable = 5,
    FoodListingsByCity = 6,
    MostCommonFoodTypes = 7,
    ClaimsPerFoodItem = 8,
    TopProvidersBySuccessfulClaims = 9,
    ClaimStatusDistribution = 10,
    AvgQuantityClaimedPerReceiver = 11,
    MostClaimedMealTypes = 12,
    TotalQuantityDonatedByProvider = 13,
}

impl QueryId {
    pub const ALL: [QueryId; 13] = [
        QueryId::ProvidersReceiversByCity,
        QueryId::QuantityByProviderType,
        QueryId::ProviderContactsByCity,
        QueryId::TopReceiversByClaims,
        QueryId::TotalQuantityAvailable,
        QueryId::FoodListingsByCity,
        QueryId::MostCommonFoodTypes,
        QueryId::ClaimsPerFoodItem,
        QueryId::TopProvidersBySuccessfulClaims,
        QueryId::ClaimStatusDistribution,
        QueryId::AvgQuantityClaimedPerReceiver,
        QueryId::MostClaimedMealTypes,
        QueryId::TotalQuantityDonatedByProvider,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(id: u32) -> DashResult<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(DashError::UnknownQuery { id })
    }

    pub fn name(self) -> &'static str {
        match self {
            QueryId::ProvidersReceiversByCity => "Providers & Receivers by City",
            QueryId::QuantityByProviderType => "Quantity by Provider Type",
            QueryId::ProviderContactsByCity => "Provider Contacts by City",
            QueryId::TopReceiversByClaims => "Top Receivers by Claims",
            QueryId::TotalQuantityAvailable => "Total Quantity Available",
            QueryId::FoodListingsByCity => "Food Listings by City",
            QueryId::MostCommonFoodTypes => "Most Common Food Types",
            QueryId::ClaimsPerFoodItem => "Claims per Food Item",
            QueryId::TopProvidersBySuccessfulClaims => "Top Providers by Successful Claims",
            QueryId::ClaimStatusDistribution => "Claim Status Distribution",
            QueryId::AvgQuantityClaimedPerReceiver => "Average Quantity Claimed per Receiver",
            QueryId::MostClaimedMealTypes => "Most Claimed Meal Types",
            QueryId::TotalQuantityDonatedByProvider => "Total Quantity Donated by Provider",
        }
    }

    /// Numbered title as shown in the question selector, e.g. "4. Top Receivers by Claims".
    pub fn title(self) -> String {
        format!("{}. {}", self.number(), self.name())
    }

    /// Ranking queries truncate to a top-N; the rest return every group.
    pub fn is_ranking(self) -> bool {
        matches!(
            self,
            QueryId::TopReceiversByClaims
                | QueryId::ClaimsPerFoodItem
                | QueryId::TopProvidersBySuccessfulClaims
                | QueryId::AvgQuantityClaimedPerReceiver
                | QueryId::TotalQuantityDonatedByProvider
        )
    }
}

impl TryFrom<u32> for QueryId {
    type Error = DashError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        QueryId::from_number(id)
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

/// Uniform query signature.
pub type QueryFn = fn(&Dataset, &FilterContext, &RankingLimits) -> QueryResult;

#[derive(Default)]
pub struct QueryRegistry {
    entries: Vec<(QueryId, QueryFn)>,
}

impl QueryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All thirteen dashboard questions, in question order.
    pub fn standard() -> Self {
        let mut registry = QueryRegistry::new();

        registry.register(
            QueryId::ProvidersReceiversByCity,
            directory_queries::run_providers_receivers_by_city,
        );
        registry.register(
            QueryId::QuantityByProviderType,
            listing_queries::run_quantity_by_provider_type,
        );
        registry.register(
            QueryId::ProviderContactsByCity,
            directory_queries::run_provider_contacts_by_city,
        );
        registry.register(
            QueryId::TopReceiversByClaims,
            claim_queries::run_top_receivers_by_claims,
        );
        registry.register(
            QueryId::TotalQuantityAvailable,
            listing_queries::run_total_quantity_available,
        );
        registry.register(
            QueryId::FoodListingsByCity,
            listing_queries::run_food_listings_by_city,
        );
        registry.register(
            QueryId::MostCommonFoodTypes,
            listing_queries::run_most_common_food_types,
        );
        registry.register(
            QueryId::ClaimsPerFoodItem,
            claim_queries::run_claims_per_food_item,
        );
        registry.register(
            QueryId::TopProvidersBySuccessfulClaims,
            claim_queries::run_top_providers_by_successful_claims,
        );
        registry.register(
            QueryId::ClaimStatusDistribution,
            claim_queries::run_claim_status_distribution,
        );
        registry.register(
            QueryId::AvgQuantityClaimedPerReceiver,
            claim_queries::run_avg_quantity_claimed_per_receiver,
        );
        registry.register(
            QueryId::MostClaimedMealTypes,
            claim_queries::run_most_claimed_meal_types,
        );
        registry.register(
            QueryId::TotalQuantityDonatedByProvider,
            listing_queries::run_total_quantity_donated_by_provider,
        );

        registry
    }

    /// Register a query. A later registration for the same id replaces the earlier one.
    pub fn register(&mut self, id: QueryId, query: QueryFn) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = query,
            None => self.entries.push((id, query)),
        }
    }

    pub fn get(&self, id: QueryId) -> Option<QueryFn> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, query)| *query)
    }

    pub fn ids(&self) -> impl Iterator<Item = QueryId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Result builders shared by the query modules ─────────────────────────────

pub(crate) fn table_result<R: TableRow>(
    id: QueryId,
    rows: &[R],
    chart: Option<ChartSpec>,
) -> QueryResult {
    QueryResult {
        id: id.number(),
        title: id.title(),
        output: QueryOutput::Table(ResultTable::from_rows(rows)),
        chart,
    }
}

pub(crate) fn scalar_result(id: QueryId, label: &str, value: u64) -> QueryResult {
    QueryResult {
        id: id.number(),
        title: id.title(),
        output: QueryOutput::Scalar(Metric {
            label: label.to_string(),
            value,
        }),
        chart: None,
    }
}

/// An empty table under `id`'s title.
pub(crate) fn empty_result(id: QueryId) -> QueryResult {
    QueryResult {
        id: id.number(),
        title: id.title(),
        output: QueryOutput::Table(ResultTable::default()),
        chart: None,
    }
}
