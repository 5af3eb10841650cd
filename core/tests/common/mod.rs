//! Shared fixtures for the integration tests.
//!
//! `small_dataset()` is hand-built so expected answers can be worked out
//! on paper. `seeded_dataset()` is random but reproducible, for the
//! property-style checks.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use foodshare_core::{
    dataset::Dataset,
    record::{Claim, FoodListing, Provider, Receiver},
    source::Tables,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).expect("valid time")
}

// ── Hand-built fixture ───────────────────────────────────────────────────────
//
// providers   1 Green Bistro  Restaurant   Lyon
//             2 Fresh Mart    Supermarket  Lyon
//             3 Home Kitchen  Household    Nice
// receivers   1 Shelter A     Lyon
//             2 Food Bank B   Nice
//             3 Charity C     Marseille
// listings   10 Bread   p1  Vegetarian Breakfast 10
//            11 Soup    p1  Vegan      Dinner     5
//            12 Rice    p3  Vegan      Lunch      3
//            13 Milk    p2  Vegetarian Breakfast 20
//            14 Apples  p99 Vegan      Snacks     7   (provider unknown)
// claims    100 f10 r1  Completed 2025-03-01
//           101 f11 r1  Completed 2025-03-05
//           102 f12 r2  Pending   2025-03-10
//           103 f13 r2  Cancelled 2025-03-15
//           104 f10 r3  Completed 2025-03-20
//           105 f999 r1 Completed 2025-03-25   (listing unknown)
//           106 f13 r77 Pending   no timestamp (receiver unknown)

pub fn small_tables() -> Tables {
    Tables {
        providers: vec![
            Provider::new(1, "Green Bistro", "Restaurant", "Lyon", "555-0101"),
            Provider::new(2, "Fresh Mart", "Supermarket", "Lyon", "555-0102"),
            Provider::new(3, "Home Kitchen", "Household", "Nice", "555-0103"),
        ],
        receivers: vec![
            Receiver::new(1, "Shelter A", "Lyon"),
            Receiver::new(2, "Food Bank B", "Nice"),
            Receiver::new(3, "Charity C", "Marseille"),
        ],
        food_listings: vec![
            FoodListing::new(10, 1, "Bread", "Restaurant", "Vegetarian", "Breakfast", 10),
            FoodListing::new(11, 1, "Soup", "Restaurant", "Vegan", "Dinner", 5),
            FoodListing::new(12, 3, "Rice", "Household", "Vegan", "Lunch", 3),
            FoodListing::new(13, 2, "Milk", "Supermarket", "Vegetarian", "Breakfast", 20),
            FoodListing::new(14, 99, "Apples", "Supermarket", "Vegan", "Snacks", 7),
        ],
        claims: vec![
            Claim::new(100, 10, 1, "Completed", Some(at(2025, 3, 1, 10, 0))),
            Claim::new(101, 11, 1, "Completed", Some(at(2025, 3, 5, 12, 0))),
            Claim::new(102, 12, 2, "Pending", Some(at(2025, 3, 10, 9, 30))),
            Claim::new(103, 13, 2, "Cancelled", Some(at(2025, 3, 15, 18, 0))),
            Claim::new(104, 10, 3, "Completed", Some(at(2025, 3, 20, 8, 0))),
            Claim::new(105, 999, 1, "Completed", Some(at(2025, 3, 25, 8, 0))),
            Claim::new(106, 13, 77, "Pending", None),
        ],
    }
}

pub fn small_dataset() -> Dataset {
    Dataset::from_tables(small_tables())
}

// ── Seeded fixture ───────────────────────────────────────────────────────────

const CITIES: &[&str] = &["Lyon", "Nice", "Paris", "Lille", "Nantes", "Rennes"];
const PROVIDER_TYPES: &[&str] = &["Restaurant", "Supermarket", "Household", "Catering"];
const FOOD_NAMES: &[&str] = &["Bread", "Soup", "Rice", "Milk", "Apples", "Pasta", "Salad"];
const FOOD_TYPES: &[&str] = &["Vegan", "Vegetarian", "Non-Vegetarian"];
const MEAL_TYPES: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snacks"];
const STATUSES: &[&str] = &["Pending", "Completed", "Cancelled"];

fn pick<'a>(rng: &mut Pcg64Mcg, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// A random dataset with a few dangling keys and missing timestamps mixed in.
pub fn seeded_tables(seed: u64) -> Tables {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);

    let providers: Vec<Provider> = (1..=40)
        .map(|id| {
            Provider::new(
                id,
                &format!("Provider {}", rng.gen_range(1..=30)),
                pick(&mut rng, PROVIDER_TYPES),
                pick(&mut rng, CITIES),
                &format!("555-{id:04}"),
            )
        })
        .collect();

    let receivers: Vec<Receiver> = (1..=35)
        .map(|id| {
            Receiver::new(
                id,
                &format!("Receiver {}", rng.gen_range(1..=25)),
                pick(&mut rng, CITIES),
            )
        })
        .collect();

    let food_listings: Vec<FoodListing> = (1..=120)
        .map(|id| {
            FoodListing::new(
                id,
                rng.gen_range(1..=42),
                pick(&mut rng, FOOD_NAMES),
                pick(&mut rng, PROVIDER_TYPES),
                pick(&mut rng, FOOD_TYPES),
                pick(&mut rng, MEAL_TYPES),
                rng.gen_range(0..=50),
            )
        })
        .collect();

    let start = at(2025, 1, 1, 0, 0);
    let claims: Vec<Claim> = (1..=400)
        .map(|id| {
            let timestamp = if rng.gen_bool(0.05) {
                None
            } else {
                Some(start + chrono::Duration::minutes(rng.gen_range(0..60 * 24 * 90)))
            };
            Claim::new(
                id,
                rng.gen_range(1..=125),
                rng.gen_range(1..=37),
                pick(&mut rng, STATUSES),
                timestamp,
            )
        })
        .collect();

    Tables {
        providers,
        receivers,
        food_listings,
        claims,
    }
}

pub fn seeded_dataset(seed: u64) -> Dataset {
    Dataset::from_tables(seeded_tables(seed))
}

/// A directory under the system temp dir that no other test uses.
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "foodshare-test-{}-{name}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
