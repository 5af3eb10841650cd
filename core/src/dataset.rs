//! The dataset store: four immutable tables plus their join indexes.
//!
//! RULE: a `Dataset` is never mutated after construction. Queries borrow
//! it; filtering and aggregation always build new derived rows.

use crate::{
    error::DashResult,
    frame::KeyIndex,
    record::{Claim, FoodListing, Provider, Receiver},
    source::{DataSource, Tables},
};

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    tables: Tables,
    provider_index: KeyIndex,
    receiver_index: KeyIndex,
    food_index: KeyIndex,
}

impl Dataset {
    pub fn new(
        providers: Vec<Provider>,
        receivers: Vec<Receiver>,
        food_listings: Vec<FoodListing>,
        claims: Vec<Claim>,
    ) -> Self {
        Self::from_tables(Tables {
            providers,
            receivers,
            food_listings,
            claims,
        })
    }

    pub fn from_tables(tables: Tables) -> Self {
        let provider_index = KeyIndex::build(&tables.providers, |p| p.provider_id);
        let receiver_index = KeyIndex::build(&tables.receivers, |r| r.receiver_id);
        let food_index = KeyIndex::build(&tables.food_listings, |f| f.food_id);
        Self {
            tables,
            provider_index,
            receiver_index,
            food_index,
        }
    }

    /// A store with four empty tables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load once from `source`. Any source failure is fatal.
    pub fn load(source: &dyn DataSource) -> DashResult<Self> {
        let tables = source.load()?;
        log::info!(
            "loaded {}: {} providers, {} receivers, {} listings, {} claims",
            source.name(),
            tables.providers.len(),
            tables.receivers.len(),
            tables.food_listings.len(),
            tables.claims.len()
        );
        let untimed = tables.claims_without_timestamp();
        if untimed > 0 {
            log::warn!(
                "{untimed} of {} claims have no parseable timestamp; they are excluded from date-range filters",
                tables.claims.len()
            );
        }
        Ok(Self::from_tables(tables))
    }

    pub fn providers(&self) -> &[Provider] {
        &self.tables.providers
    }

    pub fn receivers(&self) -> &[Receiver] {
        &self.tables.receivers
    }

    pub fn food_listings(&self) -> &[FoodListing] {
        &self.tables.food_listings
    }

    pub fn claims(&self) -> &[Claim] {
        &self.tables.claims
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn provider_index(&self) -> &KeyIndex {
        &self.provider_index
    }

    pub fn receiver_index(&self) -> &KeyIndex {
        &self.receiver_index
    }

    pub fn food_index(&self) -> &KeyIndex {
        &self.food_index
    }

    pub fn is_empty(&self) -> bool {
        self.tables.providers.is_empty()
            && self.tables.receivers.is_empty()
            && self.tables.food_listings.is_empty()
            && self.tables.claims.is_empty()
    }
}
