//! Filter context: the user's city and claim date-range selection.
//!
//! A `FilterContext` is a plain value built per request. Building one
//! never fails; a reversed date range is legal and simply matches no
//! claims.

use crate::{dataset::Dataset, record::Claim, types::ALL_CITIES};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterContext {
    city: Option<String>,
    date_range: Option<DateRange>,
}

impl FilterContext {
    /// No city restriction, no date restriction.
    pub fn all() -> Self {
        Self::default()
    }

    /// `city` of `None` or `"All"` means every city.
    pub fn new(city: Option<&str>, date_range: Option<DateRange>) -> Self {
        Self {
            city: city.filter(|c| *c != ALL_CITIES).map(str::to_string),
            date_range,
        }
    }

    pub fn with_city(self, city: &str) -> Self {
        Self::new(Some(city), self.date_range)
    }

    pub fn with_date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            date_range: Some(DateRange::new(start, end)),
            ..self
        }
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    /// Exact match against the selected city; everything matches "All".
    pub fn matches_city(&self, city: Option<&str>) -> bool {
        match &self.city {
            None => true,
            Some(selected) => city == Some(selected.as_str()),
        }
    }

    /// Claims without a timestamp only pass while no date range is active.
    pub fn admits_claim(&self, claim: &Claim) -> bool {
        match self.date_range {
            None => true,
            Some(range) => claim.claim_date().is_some_and(|d| range.contains(d)),
        }
    }
}

/// Claims that pass the context's date range, in input order.
pub fn filter_claims<'a>(
    claims: impl IntoIterator<Item = &'a Claim>,
    ctx: &FilterContext,
) -> Vec<&'a Claim> {
    claims.into_iter().filter(|c| ctx.admits_claim(c)).collect()
}

/// Selector domains offered to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDomain {
    /// `"All"` followed by the distinct provider cities, ascending.
    pub cities: Vec<String>,
    /// First and last claim date, when any claim has a timestamp.
    pub date_bounds: Option<DateRange>,
}

impl FilterDomain {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let distinct: BTreeSet<&str> = dataset
            .providers()
            .iter()
            .filter_map(|p| p.city.as_deref())
            .filter(|c| *c != ALL_CITIES)
            .collect();
        let mut cities = Vec::with_capacity(distinct.len() + 1);
        cities.push(ALL_CITIES.to_string());
        cities.extend(distinct.into_iter().map(str::to_string));

        let mut dates = dataset.claims().iter().filter_map(Claim::claim_date);
        let date_bounds = dates.next().map(|first| {
            let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
            DateRange::new(lo, hi)
        });

        Self {
            cities,
            date_bounds,
        }
    }
}
