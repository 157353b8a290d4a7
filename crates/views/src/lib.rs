//! Group-aggregate-rank views over record streams.
//!
//! Every report in the workspace has the same shape: filter a stream of
//! records, bucket them by a key, add up a numeric contribution per bucket,
//! and optionally rank or divide the result. [`accumulate`] and
//! [`partition`] build the buckets in one forward pass; [`rank`] and
//! [`ratio`] derive ordered or normalised views from them.

use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::AddAssign;

use ipl_core::{CoreError, Result};
use serde::{Deserialize, Serialize};

mod grouped;

pub use grouped::{Grouped, Partitioned};

/// Values that can be summed per key and divided by [`ratio`].
pub trait Numeric: Copy + Default + AddAssign + PartialOrd {
    fn to_f64(self) -> f64;

    fn is_zero(self) -> bool {
        self.to_f64() == 0.0
    }
}

impl Numeric for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Numeric for u64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Numeric for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

/// Composite accumulator for ratio metrics such as runs per legal ball.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioPair {
    pub numerator: i64,
    pub denominator: i64,
}

impl RatioPair {
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self { numerator, denominator }
    }
}

impl AddAssign for RatioPair {
    fn add_assign(&mut self, rhs: Self) {
        self.numerator += rhs.numerator;
        self.denominator += rhs.denominator;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankConfig {
    pub order: Order,
    pub limit: i64,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self { order: Order::Descending, limit: 10 }
    }
}

impl RankConfig {
    pub fn apply<K, V>(&self, grouped: &Grouped<K, V>) -> Result<Vec<(K, V)>>
    where
        K: Eq + Hash + Clone,
        V: Copy + PartialOrd,
    {
        rank(grouped, self.order, self.limit)
    }
}

/// Predicate that keeps every record.
pub fn select_all<R>(_: &R) -> Result<bool> {
    Ok(true)
}

/// Value function for plain counting.
pub fn count_one<R>(_: &R) -> Result<u64> {
    Ok(1)
}

/// Fold `records` into a per-key total.
///
/// Unseen keys start at `V::default()`. The first error from the source,
/// the predicate or either extractor aborts the pass and is returned.
pub fn accumulate<R, I, K, V, P, KF, VF>(
    records: I,
    predicate: P,
    key_fn: KF,
    value_fn: VF,
) -> Result<Grouped<K, V>>
where
    I: IntoIterator<Item = Result<R>>,
    K: Eq + Hash,
    V: Default + AddAssign,
    P: Fn(&R) -> Result<bool>,
    KF: Fn(&R) -> Result<K>,
    VF: Fn(&R) -> Result<V>,
{
    let mut grouped = Grouped::new();
    for record in records {
        let record = record?;
        if !predicate(&record)? {
            continue;
        }
        grouped.add(key_fn(&record)?, value_fn(&record)?);
    }
    Ok(grouped)
}

/// Like [`accumulate`], but buckets twice: by `outer_key_fn`, then by
/// `inner_key_fn` within each outer group.
pub fn partition<R, I, O, K, V, P, OF, KF, VF>(
    records: I,
    predicate: P,
    outer_key_fn: OF,
    inner_key_fn: KF,
    value_fn: VF,
) -> Result<Partitioned<O, K, V>>
where
    I: IntoIterator<Item = Result<R>>,
    O: Eq + Hash,
    K: Eq + Hash,
    V: Default + AddAssign,
    P: Fn(&R) -> Result<bool>,
    OF: Fn(&R) -> Result<O>,
    KF: Fn(&R) -> Result<K>,
    VF: Fn(&R) -> Result<V>,
{
    let mut partitioned = Partitioned::new();
    for record in records {
        let record = record?;
        if !predicate(&record)? {
            continue;
        }
        partitioned.add(outer_key_fn(&record)?, inner_key_fn(&record)?, value_fn(&record)?);
    }
    Ok(partitioned)
}

/// Sort entries by value and keep the first `limit`.
///
/// Equal values keep their first-encounter order.
pub fn rank<K, V>(grouped: &Grouped<K, V>, order: Order, limit: i64) -> Result<Vec<(K, V)>>
where
    K: Eq + Hash + Clone,
    V: Copy + PartialOrd,
{
    if limit < 0 {
        return Err(CoreError::Range { limit });
    }
    let mut entries: Vec<(K, V)> = grouped.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| {
        let ord = a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal);
        match order {
            Order::Ascending => ord,
            Order::Descending => ord.reverse(),
        }
    });
    entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    Ok(entries)
}

/// Divide numerator by denominator per key, rounding half-to-even to
/// `round_to` decimal places. Keys whose denominator is zero or absent are
/// left out.
pub fn ratio<K, N, D>(
    numerator: &Grouped<K, N>,
    denominator: &Grouped<K, D>,
    round_to: u32,
) -> Grouped<K, f64>
where
    K: Eq + Hash + Clone,
    N: Numeric,
    D: Numeric,
{
    numerator
        .iter()
        .filter_map(|(key, n)| {
            let d = denominator.get(key)?;
            if d.is_zero() {
                return None;
            }
            Some((key.clone(), round_half_even(n.to_f64() / d.to_f64(), round_to)))
        })
        .collect()
}

pub fn round_half_even(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round_ties_even() / factor
}
