//! Join and group helpers shared by every query.
//!
//! The queries are all variations of "left-join some tables, group by a
//! text column, fold a metric, maybe rank". These helpers carry the
//! shared semantics:
//!   - left joins never drop a left row; a left row with no match is
//!     paired with `None`, a left row with several matches yields one
//!     pair per match
//!   - groups come out in ascending key order; rows with a null key are
//!     dropped
//!   - ranking is a stable descending sort, so ties keep group order

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Positions of rows by integer key, built once per table.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    positions: HashMap<i64, Vec<usize>>,
}

impl KeyIndex {
    pub fn build<T>(rows: &[T], key: impl Fn(&T) -> i64) -> Self {
        let mut positions: HashMap<i64, Vec<usize>> = HashMap::new();
        for (pos, row) in rows.iter().enumerate() {
            positions.entry(key(row)).or_default().push(pos);
        }
        Self { positions }
    }

    /// Positions of every row whose key equals `key`, in table order.
    pub fn positions(&self, key: i64) -> &[usize] {
        self.positions.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Left-outer join of `left` against `right` through `index`.
///
/// `L` is usually a reference or a tuple of references, so joins chain:
/// the output of one join is the left side of the next. A `None` key
/// (the foreign key came from an earlier join that missed) matches nothing.
pub fn left_join<'r, L, R>(
    left: impl IntoIterator<Item = L>,
    right: &'r [R],
    index: &KeyIndex,
    key: impl Fn(&L) -> Option<i64>,
) -> Vec<(L, Option<&'r R>)>
where
    L: Copy,
{
    let mut joined = Vec::new();
    for row in left {
        let before = joined.len();
        let positions = key(&row).map_or(&[][..], |k| index.positions(k));
        for &pos in positions {
            if let Some(m) = right.get(pos) {
                joined.push((row, Some(m)));
            }
        }
        if joined.len() == before {
            joined.push((row, None));
        }
    }
    joined
}

/// Group `rows` by a nullable text key and fold each group into `A`.
pub fn group_by<T, A>(
    rows: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> Option<String>,
    mut fold: impl FnMut(&mut A, &T),
) -> Vec<(String, A)>
where
    A: Default,
{
    let mut groups: BTreeMap<String, A> = BTreeMap::new();
    for row in rows {
        if let Some(k) = key(&row) {
            fold(groups.entry(k).or_default(), &row);
        }
    }
    groups.into_iter().collect()
}

/// Count rows per key.
pub fn count_by<T>(
    rows: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> Option<String>,
) -> Vec<(String, u64)> {
    group_by(rows, key, |count: &mut u64, _| *count += 1)
}

/// Running sum and non-null count, enough for both `sum` and `mean`.
/// The sum saturates at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub rows: u64,
    pub sum: u64,
    pub non_null: u64,
}

impl Tally {
    /// Record one row; `value` is `None` when the join that should supply it missed.
    pub fn add(&mut self, value: Option<u64>) {
        self.rows += 1;
        if let Some(v) = value {
            self.sum = self.sum.saturating_add(v);
            self.non_null += 1;
        }
    }

    /// Mean over non-null values, `None` if there were none.
    pub fn mean(&self) -> Option<f64> {
        if self.non_null == 0 {
            None
        } else {
            Some(self.sum as f64 / self.non_null as f64)
        }
    }
}

/// Stable descending sort on `cmp`: equal rows keep their current order.
pub fn rank_desc<T>(rows: &mut [T], cmp: impl Fn(&T, &T) -> Ordering) {
    rows.sort_by(|a, b| cmp(b, a));
}

pub fn top_n<T>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    rows.truncate(n);
    rows
}

/// Orders nullable floats with null as the smallest value, so `rank_desc` puts nulls last.
pub fn cmp_nullable(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
