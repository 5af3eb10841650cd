//! Claim questions (4, 8, 9, 10, 11 and 12).

mod common;

use common::{at, date, seeded_tables, small_dataset};
use foodshare_core::{
    claim_queries::{
        avg_quantity_claimed_per_receiver, claim_status_distribution, claims_per_food_item,
        most_claimed_meal_types, top_providers_by_successful_claims, top_receivers_by_claims,
    },
    dataset::Dataset,
    filter::FilterContext,
    record::{Claim, ClaimStatus, FoodListing, Provider, Receiver},
};
use std::collections::HashMap;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn early_march() -> FilterContext {
    FilterContext::all().with_date_range(date(2025, 3, 1), date(2025, 3, 10))
}

fn successes_by_provider(ds: &Dataset) -> HashMap<String, u64> {
    top_providers_by_successful_claims(ds, &FilterContext::all(), usize::MAX)
        .into_iter()
        .map(|r| (r.name, r.successful_claims))
        .collect()
}

// ── Question 4 ───────────────────────────────────────────────────────────────

/// Claims from an unknown receiver are dropped; a claim on an unknown
/// listing still counts but adds no quantity.
#[test]
fn top_receivers_counts_claims_and_quantity() {
    let rows = top_receivers_by_claims(&small_dataset(), &FilterContext::all(), 20);
    let triples: Vec<(&str, u64, u64)> = rows
        .iter()
        .map(|r| (r.name.as_str(), r.claim_count, r.approx_total_qty))
        .collect();
    assert_eq!(
        triples,
        vec![
            ("Shelter A", 3, 15),
            ("Food Bank B", 2, 23),
            ("Charity C", 1, 10),
        ]
    );
}

/// Equal claim counts are broken by total quantity, descending.
#[test]
fn top_receivers_breaks_ties_on_quantity() {
    let ds = Dataset::new(
        Vec::new(),
        vec![Receiver::new(1, "Alpha", "Lyon"), Receiver::new(2, "Beta", "Lyon")],
        vec![
            FoodListing::new(10, 1, "Bread", "Restaurant", "Vegan", "Lunch", 2),
            FoodListing::new(11, 1, "Milk", "Restaurant", "Vegan", "Lunch", 9),
        ],
        vec![
            Claim::new(1, 10, 1, "Completed", None),
            Claim::new(2, 11, 2, "Completed", None),
        ],
    );
    let rows = top_receivers_by_claims(&ds, &FilterContext::all(), 20);
    assert_eq!(rows[0].name, "Beta", "Beta claimed more quantity");
    assert_eq!(rows[1].name, "Alpha");
}

/// The date range is applied before joining.
#[test]
fn top_receivers_respects_date_range() {
    let rows = top_receivers_by_claims(&small_dataset(), &early_march(), 20);
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].name.as_str(), rows[0].claim_count), ("Shelter A", 2));
    assert_eq!((rows[1].name.as_str(), rows[1].claim_count), ("Food Bank B", 1));
}

// ── Question 8 ───────────────────────────────────────────────────────────────

/// Ties keep ascending name order; the claim on an unknown listing is dropped.
#[test]
fn claims_per_food_item_ranks_food_names() {
    let rows = claims_per_food_item(&small_dataset(), &FilterContext::all(), 30);
    let pairs: Vec<(&str, u64)> = rows
        .iter()
        .map(|r| (r.food_name.as_str(), r.total_claims))
        .collect();
    assert_eq!(
        pairs,
        vec![("Bread", 2), ("Milk", 2), ("Rice", 1), ("Soup", 1)]
    );
}

// ── Question 9 ───────────────────────────────────────────────────────────────

#[test]
fn top_providers_counts_only_completed_claims() {
    let rows = top_providers_by_successful_claims(&small_dataset(), &FilterContext::all(), 20);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Green Bistro");
    assert_eq!(rows[0].successful_claims, 3);
}

/// Turning a Completed claim into Cancelled never raises any provider's count.
#[test]
fn cancelling_a_claim_never_increases_successes() {
    for seed in [3u64, 17, 99] {
        let tables = seeded_tables(seed);
        let before = successes_by_provider(&Dataset::from_tables(tables.clone()));

        let mut changed = tables;
        let target = changed
            .claims
            .iter_mut()
            .find(|c| c.is_completed())
            .expect("seeded data has completed claims");
        target.status = Some(ClaimStatus::Cancelled);
        let after = successes_by_provider(&Dataset::from_tables(changed));

        for (name, n) in &after {
            let was = before.get(name).copied().unwrap_or(0);
            assert!(*n <= was, "seed {seed}: {name} went from {was} to {n}");
        }
    }
}

// ── Question 10 ──────────────────────────────────────────────────────────────

/// [Completed, Completed, Pending] gives 66.67% and 33.33%.
#[test]
fn claim_status_distribution_example() {
    let rows = claim_status_distribution(&small_dataset(), &early_march());
    assert_eq!(rows.len(), 2);
    let completed = rows.iter().find(|r| r.status == "Completed").unwrap();
    let pending = rows.iter().find(|r| r.status == "Pending").unwrap();
    assert_eq!(completed.cnt, 2);
    assert_eq!(pending.cnt, 1);
    assert!((completed.percentage - 66.666_666).abs() < 1e-3);
    assert!((pending.percentage - 33.333_333).abs() < 1e-3);
}

/// Percentages sum to 100 whenever a claim survives the filter.
#[test]
fn claim_status_percentages_sum_to_100() {
    for seed in [5u64, 6, 7] {
        let ds = Dataset::from_tables(seeded_tables(seed));
        for ctx in [
            FilterContext::all(),
            FilterContext::all().with_date_range(date(2025, 2, 1), date(2025, 2, 14)),
        ] {
            let rows = claim_status_distribution(&ds, &ctx);
            assert!(!rows.is_empty(), "seed {seed}: expected claims in range");
            let total: f64 = rows.iter().map(|r| r.percentage).sum();
            assert!((total - 100.0).abs() < 1e-9, "seed {seed}: sum was {total}");
        }
    }
}

/// An empty selection is an empty table, not a division by zero.
#[test]
fn claim_status_distribution_empty_range() {
    let ctx = FilterContext::all().with_date_range(date(2030, 1, 1), date(2030, 12, 31));
    assert!(claim_status_distribution(&small_dataset(), &ctx).is_empty());
}

// ── Question 11 ──────────────────────────────────────────────────────────────

#[test]
fn avg_quantity_ranks_receivers_by_mean() {
    let rows = avg_quantity_claimed_per_receiver(&small_dataset(), &FilterContext::all(), 20);
    let pairs: Vec<(&str, Option<f64>)> = rows
        .iter()
        .map(|r| (r.name.as_str(), r.avg_qty_claimed))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Food Bank B", Some(11.5)),
            ("Charity C", Some(10.0)),
            ("Shelter A", Some(7.5)),
        ],
        "Shelter A's unmatched claim must not drag its mean down"
    );
}

/// A receiver whose claims all miss the listings table has no mean and sorts last.
#[test]
fn avg_quantity_puts_null_means_last() {
    let ds = Dataset::new(
        Vec::new(),
        vec![Receiver::new(1, "Ghost", "Lyon"), Receiver::new(2, "Real", "Lyon")],
        vec![FoodListing::new(10, 1, "Bread", "Restaurant", "Vegan", "Lunch", 4)],
        vec![
            Claim::new(1, 999, 1, "Pending", None),
            Claim::new(2, 10, 2, "Pending", None),
        ],
    );
    let rows = avg_quantity_claimed_per_receiver(&ds, &FilterContext::all(), 20);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Real");
    assert_eq!(rows[1].name, "Ghost");
    assert_eq!(rows[1].avg_qty_claimed, None);
}

// ── Question 12 ──────────────────────────────────────────────────────────────

#[test]
fn most_claimed_meal_types_counts_claims() {
    let rows = most_claimed_meal_types(&small_dataset(), &FilterContext::all());
    let pairs: Vec<(&str, u64)> = rows
        .iter()
        .map(|r| (r.meal_type.as_str(), r.total_claims))
        .collect();
    assert_eq!(pairs, vec![("Breakfast", 4), ("Dinner", 1), ("Lunch", 1)]);
}

/// Claims without a timestamp count while no range is set, and drop out once one is.
#[test]
fn untimed_claims_only_count_without_range() {
    let ds = Dataset::new(
        vec![Provider::new(1, "Green Bistro", "Restaurant", "Lyon", "1")],
        vec![Receiver::new(1, "Shelter A", "Lyon")],
        vec![FoodListing::new(10, 1, "Bread", "Restaurant", "Vegan", "Lunch", 4)],
        vec![
            Claim::new(1, 10, 1, "Completed", None),
            Claim::new(2, 10, 1, "Completed", Some(at(2025, 3, 2, 9, 0))),
        ],
    );
    let all = most_claimed_meal_types(&ds, &FilterContext::all());
    assert_eq!(all[0].total_claims, 2);
    let ranged = most_claimed_meal_types(&ds, &early_march());
    assert_eq!(ranged[0].total_claims, 1);
}

// ── Missing foreign keys ─────────────────────────────────────────────────────

/// A claim with no listing id joins to nothing but still counts for its
/// status and for its receiver, adding no quantity.
#[test]
fn claim_without_food_id_counts_without_quantity() {
    let mut orphan = Claim::new(2, 10, 1, "Pending", Some(at(2025, 3, 3, 9, 0)));
    orphan.food_id = None;
    let ds = Dataset::new(
        Vec::new(),
        vec![Receiver::new(1, "Alpha", "Lyon")],
        vec![FoodListing::new(10, 1, "Bread", "Restaurant", "Vegan", "Lunch", 4)],
        vec![
            Claim::new(1, 10, 1, "Completed", Some(at(2025, 3, 2, 9, 0))),
            orphan,
        ],
    );

    let statuses: Vec<(String, u64)> = claim_status_distribution(&ds, &FilterContext::all())
        .into_iter()
        .map(|s| (s.status, s.cnt))
        .collect();
    assert_eq!(
        statuses,
        vec![("Completed".to_string(), 1), ("Pending".to_string(), 1)]
    );

    let receivers = top_receivers_by_claims(&ds, &FilterContext::all(), 20);
    assert_eq!(receivers.len(), 1);
    assert_eq!(receivers[0].claim_count, 2);
    assert_eq!(receivers[0].approx_total_qty, 4, "the orphan claim adds no quantity");
}
