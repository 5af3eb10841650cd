//! Directory questions over providers and receivers (questions 1 and 3).

use crate::{
    config::RankingLimits,
    dataset::Dataset,
    filter::FilterContext,
    frame::count_by,
    query::{table_result, QueryId},
    table::{ChartSpec, QueryResult, TableRow, Value},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityParticipation {
    pub city: String,
    pub providers: u64,
    pub receivers: u64,
}

impl TableRow for CityParticipation {
    const COLUMNS: &'static [&'static str] = &["City", "providers", "receivers"];

    fn cells(&self) -> Vec<Value> {
        vec![
            self.city.clone().into(),
            self.providers.into(),
            self.receivers.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderContact {
    pub name: Option<String>,
    pub contact: Option<String>,
}

impl TableRow for ProviderContact {
    const COLUMNS: &'static [&'static str] = &["Name", "Contact"];

    fn cells(&self) -> Vec<Value> {
        vec![self.name.clone().into(), self.contact.clone().into()]
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

/// Provider and receiver counts per city over the union of both sides' cities.
/// A city seen on only one side reports zero for the other.
pub fn providers_receivers_by_city(dataset: &Dataset) -> Vec<CityParticipation> {
    let providers = count_by(dataset.providers(), |p| p.city.clone());
    let receivers = count_by(dataset.receivers(), |r| r.city.clone());

    let mut merged: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for (city, n) in providers {
        merged.entry(city).or_default().0 = n;
    }
    for (city, n) in receivers {
        merged.entry(city).or_default().1 = n;
    }

    merged
        .into_iter()
        .map(|(city, (providers, receivers))| CityParticipation {
            city,
            providers,
            receivers,
        })
        .collect()
}

/// Name and contact of every provider in the selected city, in table order.
pub fn provider_contacts_by_city(dataset: &Dataset, ctx: &FilterContext) -> Vec<ProviderContact> {
    dataset
        .providers()
        .iter()
        .filter(|p| ctx.matches_city(p.city.as_deref()))
        .map(|p| ProviderContact {
            name: p.name.clone(),
            contact: p.contact.clone(),
        })
        .collect()
}

// ── Registry adapters ────────────────────────────────────────────────────────

pub(crate) fn run_providers_receivers_by_city(
    dataset: &Dataset,
    _ctx: &FilterContext,
    _limits: &RankingLimits,
) -> QueryResult {
    let rows = providers_receivers_by_city(dataset);
    table_result(
        QueryId::ProvidersReceiversByCity,
        &rows,
        Some(
            ChartSpec::bar("City", "count")
                .with_color("role")
                .with_melt("City", "role", "count"),
        ),
    )
}

pub(crate) fn run_provider_contacts_by_city(
    dataset: &Dataset,
    ctx: &FilterContext,
    _limits: &RankingLimits,
) -> QueryResult {
    let rows = provider_contacts_by_city(dataset, ctx);
    table_result(QueryId::ProviderContactsByCity, &rows, None)
}
