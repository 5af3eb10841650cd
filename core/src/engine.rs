//! The dashboard engine: one session over one loaded dataset.
//!
//! RULES:
//!   - The dataset is loaded once, before the first query, and never mutated.
//!   - Every query runs through the registry; the engine has no per-question
//!     branching of its own.
//!   - Queries take `&self`, so a single engine can serve concurrent readers.

use crate::{
    config::EngineConfig,
    dataset::Dataset,
    error::DashResult,
    filter::{FilterContext, FilterDomain},
    listing_queries::total_quantity_available,
    query::{empty_result, QueryFn, QueryId, QueryRegistry},
    source::DataSource,
    table::QueryResult,
    types::Quantity,
};
use serde::{Deserialize, Serialize};

/// Headline KPIs shown above the question selector. Never filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total_providers: usize,
    pub total_receivers: usize,
    pub total_listings: usize,
    pub total_quantity: Quantity,
}

pub struct DashboardEngine {
    dataset: Dataset,
    config: EngineConfig,
    registry: QueryRegistry,
}

impl DashboardEngine {
    pub fn new(dataset: Dataset, config: EngineConfig) -> Self {
        Self {
            dataset,
            config,
            registry: QueryRegistry::standard(),
        }
    }

    /// Load the dataset from `source` and wire the standard registry.
    /// Any source failure aborts startup.
    pub fn load(source: &dyn DataSource, config: EngineConfig) -> DashResult<Self> {
        let dataset = Dataset::load(source)?;
        Ok(Self::new(dataset, config))
    }

    /// Run question `id` (1..=13). Anything else is `UnknownQuery`.
    pub fn run_query(&self, id: u32, ctx: &FilterContext) -> DashResult<QueryResult> {
        let id = QueryId::from_number(id)?;
        Ok(self.run(id, ctx))
    }

    pub fn run(&self, id: QueryId, ctx: &FilterContext) -> QueryResult {
        let result = match self.registry.get(id) {
            Some(query) => query(&self.dataset, ctx, &self.config.ranking),
            None => {
                log::warn!("query {} has no registered function", id.number());
                empty_result(id)
            }
        };
        match result.table() {
            Some(table) => log::debug!("{}: {} rows", id.title(), table.len()),
            None => log::debug!("{}: scalar {:?}", id.title(), result.scalar()),
        }
        result
    }

    /// Every registered question, in registry order.
    pub fn run_all(&self, ctx: &FilterContext) -> Vec<QueryResult> {
        self.registry.ids().map(|id| self.run(id, ctx)).collect()
    }

    pub fn overview(&self) -> Overview {
        Overview {
            total_providers: self.dataset.providers().len(),
            total_receivers: self.dataset.receivers().len(),
            total_listings: self.dataset.food_listings().len(),
            total_quantity: total_quantity_available(&self.dataset),
        }
    }

    pub fn filter_domain(&self) -> FilterDomain {
        FilterDomain::from_dataset(&self.dataset)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Swap the function behind one question.
    pub fn register(&mut self, id: QueryId, query: QueryFn) {
        self.registry.register(id, query);
    }
}
