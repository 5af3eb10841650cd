//! Claim questions (4, 8, 9, 10, 11 and 12).
//!
//! Every query here starts from the claims that pass the filter
//! context's date range, then left-joins outward:
//!   claims → receivers   (receiver name)
//!   claims → listings    (quantity, food name, meal type)
//!   listings → providers (provider name)
//! A claim whose receiver or listing is missing still counts wherever
//! its group key is known; a missing quantity contributes nothing.

use crate::{
    config::RankingLimits,
    dataset::Dataset,
    filter::{filter_claims, FilterContext},
    frame::{cmp_nullable, count_by, group_by, left_join, rank_desc, top_n, Tally},
    query::{table_result, QueryId},
    record::{Claim, FoodListing, Receiver},
    table::{ChartSpec, QueryResult, TableRow, Value},
};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverClaims {
    pub name: String,
    pub claim_count: u64,
    pub approx_total_qty: u64,
}

impl TableRow for ReceiverClaims {
    const COLUMNS: &'static [&'static str] = &["Name", "claim_count", "approx_total_qty"];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.claim_count.into(),
            self.approx_total_qty.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodClaims {
    pub food_name: String,
    pub total_claims: u64,
}

impl TableRow for FoodClaims {
    const COLUMNS: &'static [&'static str] = &["Food_Name", "total_claims"];

    fn cells(&self) -> Vec<Value> {
        vec![self.food_name.clone().into(), self.total_claims.into()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSuccess {
    pub name: String,
    pub successful_claims: u64,
}

impl TableRow for ProviderSuccess {
    const COLUMNS: &'static [&'static str] = &["Name", "successful_claims"];

    fn cells(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.successful_claims.into()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusShare {
    pub status: String,
    pub cnt: u64,
    pub percentage: f64,
}

impl TableRow for StatusShare {
    const COLUMNS: &'static [&'static str] = &["Status", "cnt", "percentage"];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.status.clone().into(),
            self.cnt.into(),
            self.percentage.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverAverage {
    pub name: String,
    /// `None` when none of the receiver's claims matched a listing.
    pub avg_qty_claimed: Option<f64>,
}

impl TableRow for ReceiverAverage {
    const COLUMNS: &'static [&'static str] = &["Name", "avg_qty_claimed"];

    fn cells(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.avg_qty_claimed.into()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealClaims {
    pub meal_type: String,
    pub total_claims: u64,
}

impl TableRow for MealClaims {
    const COLUMNS: &'static [&'static str] = &["Meal_Type", "total_claims"];

    fn cells(&self) -> Vec<Value> {
        vec![self.meal_type.clone().into(), self.total_claims.into()]
    }
}

// ── Joins ────────────────────────────────────────────────────────────────────

type ReceiverLeg<'a> = (&'a Claim, Option<&'a Receiver>);

/// filtered claims ⋈ receivers ⋈ listings, grouped by receiver name.
fn tally_by_receiver(dataset: &Dataset, ctx: &FilterContext) -> Vec<(String, Tally)> {
    let claims = filter_claims(dataset.claims(), ctx);
    let with_receiver = left_join(
        claims,
        dataset.receivers(),
        dataset.receiver_index(),
        |c| c.receiver_id,
    );
    let joined: Vec<(ReceiverLeg<'_>, Option<&FoodListing>)> = left_join(
        with_receiver,
        dataset.food_listings(),
        dataset.food_index(),
        |(c, _)| c.food_id,
    );
    group_by(
        joined,
        |((_, r), _)| r.and_then(|r| r.name.clone()),
        |tally: &mut Tally, (_, f)| tally.add(f.map(|f| f.quantity)),
    )
}

/// filtered claims ⋈ listings.
fn claims_with_listing<'a>(
    dataset: &'a Dataset,
    claims: Vec<&'a Claim>,
) -> Vec<(&'a Claim, Option<&'a FoodListing>)> {
    left_join(
        claims,
        dataset.food_listings(),
        dataset.food_index(),
        |c| c.food_id,
    )
}

// ── Queries ──────────────────────────────────────────────────────────────────

/// Receivers ranked by claim count, then by total quantity claimed.
pub fn top_receivers_by_claims(
    dataset: &Dataset,
    ctx: &FilterContext,
    limit: usize,
) -> Vec<ReceiverClaims> {
    let mut rows: Vec<ReceiverClaims> = tally_by_receiver(dataset, ctx)
        .into_iter()
        .map(|(name, tally)| ReceiverClaims {
            name,
            claim_count: tally.rows,
            approx_total_qty: tally.sum,
        })
        .collect();
    rank_desc(&mut rows, |a, b| {
        (a.claim_count, a.approx_total_qty).cmp(&(b.claim_count, b.approx_total_qty))
    });
    top_n(rows, limit)
}

pub fn claims_per_food_item(
    dataset: &Dataset,
    ctx: &FilterContext,
    limit: usize,
) -> Vec<FoodClaims> {
    let joined = claims_with_listing(dataset, filter_claims(dataset.claims(), ctx));
    let mut rows: Vec<FoodClaims> = count_by(joined, |(_, f)| f.and_then(|f| f.food_name.clone()))
        .into_iter()
        .map(|(food_name, total_claims)| FoodClaims {
            food_name,
            total_claims,
        })
        .collect();
    rank_desc(&mut rows, |a, b| a.total_claims.cmp(&b.total_claims));
    top_n(rows, limit)
}

/// Completed claims per provider name, reached through the claimed listing.
pub fn top_providers_by_successful_claims(
    dataset: &Dataset,
    ctx: &FilterContext,
    limit: usize,
) -> Vec<ProviderSuccess> {
    let completed: Vec<&Claim> = filter_claims(dataset.claims(), ctx)
        .into_iter()
        .filter(|c| c.is_completed())
        .collect();
    let with_listing = claims_with_listing(dataset, completed);
    let joined = left_join(
        with_listing,
        dataset.providers(),
        dataset.provider_index(),
        |(_, f)| f.and_then(|f| f.provider_id),
    );
    let mut rows: Vec<ProviderSuccess> = count_by(joined, |(_, p)| p.and_then(|p| p.name.clone()))
        .into_iter()
        .map(|(name, successful_claims)| ProviderSuccess {
            name,
            successful_claims,
        })
        .collect();
    rank_desc(&mut rows, |a, b| a.successful_claims.cmp(&b.successful_claims));
    top_n(rows, limit)
}

/// Count and share of each status. Percentages sum to 100 whenever any
/// claim with a status passes the filter; with none the table is empty.
pub fn claim_status_distribution(dataset: &Dataset, ctx: &FilterContext) -> Vec<StatusShare> {
    let counts = count_by(filter_claims(dataset.claims(), ctx), |c| {
        c.status.as_ref().map(|s| s.as_str().to_string())
    });
    let total: u64 = counts.iter().map(|(_, n)| n).sum();
    counts
        .into_iter()
        .map(|(status, cnt)| StatusShare {
            status,
            cnt,
            percentage: if total == 0 {
                0.0
            } else {
                cnt as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

/// Mean listing quantity per receiver name, highest first.
pub fn avg_quantity_claimed_per_receiver(
    dataset: &Dataset,
    ctx: &FilterContext,
    limit: usize,
) -> Vec<ReceiverAverage> {
    let mut rows: Vec<ReceiverAverage> = tally_by_receiver(dataset, ctx)
        .into_iter()
        .map(|(name, tally)| ReceiverAverage {
            name,
            avg_qty_claimed: tally.mean(),
        })
        .collect();
    rank_desc(&mut rows, |a, b| cmp_nullable(a.avg_qty_claimed, b.avg_qty_claimed));
    top_n(rows, limit)
}

pub fn most_claimed_meal_types(dataset: &Dataset, ctx: &FilterContext) -> Vec<MealClaims> {
    let joined = claims_with_listing(dataset, filter_claims(dataset.claims(), ctx));
    count_by(joined, |(_, f)| f.and_then(|f| f.meal_type.clone()))
        .into_iter()
        .map(|(meal_type, total_claims)| MealClaims {
            meal_type,
            total_claims,
        })
        .collect()
}

// ── Registry adapters ────────────────────────────────────────────────────────

pub(crate) fn run_top_receivers_by_claims(
    dataset: &Dataset,
    ctx: &FilterContext,
    limits: &RankingLimits,
) -> QueryResult {
    let rows = top_receivers_by_claims(dataset, ctx, limits.top_receivers);
    table_result(
        QueryId::TopReceiversByClaims,
        &rows,
        Some(ChartSpec::bar("Name", "claim_count")),
    )
}

pub(crate) fn run_claims_per_food_item(
    dataset: &Dataset,
    ctx: &FilterContext,
    limits: &RankingLimits,
) -> QueryResult {
    let rows = claims_per_food_item(dataset, ctx, limits.claims_per_food);
    table_result(
        QueryId::ClaimsPerFoodItem,
        &rows,
        Some(ChartSpec::bar("Food_Name", "total_claims")),
    )
}

pub(crate) fn run_top_providers_by_successful_claims(
    dataset: &Dataset,
    ctx: &FilterContext,
    limits: &RankingLimits,
) -> QueryResult {
    let rows = top_providers_by_successful_claims(dataset, ctx, limits.top_providers);
    table_result(
        QueryId::TopProvidersBySuccessfulClaims,
        &rows,
        Some(ChartSpec::bar("Name", "successful_claims")),
    )
}

pub(crate) fn run_claim_status_distribution(
    dataset: &Dataset,
    ctx: &FilterContext,
    _limits: &RankingLimits,
) -> QueryResult {
    let rows = claim_status_distribution(dataset, ctx);
    table_result(
        QueryId::ClaimStatusDistribution,
        &rows,
        Some(ChartSpec::arc("cnt", "Status").with_tooltip(&["Status", "cnt", "percentage"])),
    )
}

pub(crate) fn run_avg_quantity_claimed_per_receiver(
    dataset: &Dataset,
    ctx: &FilterContext,
    limits: &RankingLimits,
) -> QueryResult {
    let rows = avg_quantity_claimed_per_receiver(dataset, ctx, limits.avg_quantity_per_receiver);
    table_result(
        QueryId::AvgQuantityClaimedPerReceiver,
        &rows,
        Some(ChartSpec::bar("Name", "avg_qty_claimed")),
    )
}

pub(crate) fn run_most_claimed_meal_types(
    dataset: &Dataset,
    ctx: &FilterContext,
    _limits: &RankingLimits,
) -> QueryResult {
    let rows = most_claimed_meal_types(dataset, ctx);
    table_result(
        QueryId::MostClaimedMealTypes,
        &rows,
        Some(ChartSpec::bar("Meal_Type", "total_claims")),
    )
}
