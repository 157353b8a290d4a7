use std::hash::Hash;
use std::ops::AddAssign;

use indexmap::IndexMap;

use crate::{Numeric, RatioPair};

/// Keyed aggregate that remembers the order in which keys were first seen.
#[derive(Debug, Clone)]
pub struct Grouped<K, V> {
    entries: IndexMap<K, V>,
}

// Equality ignores encounter order.
impl<K: Eq + Hash, V: PartialEq> PartialEq for Grouped<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, V> Default for Grouped<K, V> {
    fn default() -> Self {
        Self { entries: IndexMap::new() }
    }
}

impl<K, V> Grouped<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) {
        self.entries.retain(|k, v| keep(k, v));
    }

    pub fn map_values<W>(&self, f: impl Fn(&V) -> W) -> Grouped<K, W>
    where
        K: Clone,
    {
        Grouped {
            entries: self.entries.iter().map(|(k, v)| (k.clone(), f(v))).collect(),
        }
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries.into_iter().collect()
    }

    /// Entries ordered by key instead of by first encounter.
    pub fn sorted_by_key(&self) -> Vec<(K, V)>
    where
        K: Ord + Clone,
        V: Clone,
    {
        let mut out: Vec<(K, V)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

impl<K, V> Grouped<K, V>
where
    K: Eq + Hash,
    V: Default + AddAssign,
{
    pub fn add(&mut self, key: K, value: V) {
        *self.entries.entry(key).or_default() += value;
    }
}

impl<K, V> Grouped<K, V>
where
    K: Eq + Hash,
    V: Numeric,
{
    pub fn value_or_default(&self, key: &K) -> V {
        self.entries.get(key).copied().unwrap_or_default()
    }

    pub fn total(&self) -> V {
        let mut sum = V::default();
        for v in self.entries.values() {
            sum += *v;
        }
        sum
    }
}

impl<K> Grouped<K, RatioPair>
where
    K: Eq + Hash + Clone,
{
    /// Splits composite accumulators into numerator and denominator maps.
    pub fn split(&self) -> (Grouped<K, i64>, Grouped<K, i64>) {
        (
            self.map_values(|p| p.numerator),
            self.map_values(|p| p.denominator),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for Grouped<K, V>
where
    K: Eq + Hash,
    V: Default + AddAssign,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut grouped = Grouped::new();
        for (k, v) in iter {
            grouped.add(k, v);
        }
        grouped
    }
}

/// Two-level aggregate: outer key (e.g. season) to inner key (e.g. team).
#[derive(Debug, Clone)]
pub struct Partitioned<O, K, V> {
    groups: IndexMap<O, Grouped<K, V>>,
}

impl<O: Eq + Hash, K: Eq + Hash, V: PartialEq> PartialEq for Partitioned<O, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl<O, K, V> Default for Partitioned<O, K, V> {
    fn default() -> Self {
        Self { groups: IndexMap::new() }
    }
}

impl<O, K, V> Partitioned<O, K, V>
where
    O: Eq + Hash,
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, outer: &O) -> Option<&Grouped<K, V>> {
        self.groups.get(outer)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&O, &Grouped<K, V>)> {
        self.groups.iter()
    }

    pub fn outer_keys_sorted(&self) -> Vec<O>
    where
        O: Ord + Clone,
    {
        let mut keys: Vec<O> = self.groups.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Union of inner keys across every outer group, sorted.
    pub fn inner_keys_sorted(&self) -> Vec<K>
    where
        K: Ord + Clone,
    {
        let mut keys: Vec<K> = self
            .groups
            .values()
            .flat_map(|g| g.keys().cloned())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

impl<O, K, V> Partitioned<O, K, V>
where
    O: Eq + Hash,
    K: Eq + Hash,
    V: Default + AddAssign,
{
    pub fn add(&mut self, outer: O, inner: K, value: V) {
        self.groups.entry(outer).or_default().add(inner, value);
    }
}

impl<O, K, V> Partitioned<O, K, V>
where
    O: Eq + Hash,
    K: Eq + Hash,
    V: Numeric,
{
    /// Absent outer or inner keys read as zero.
    pub fn value_or_default(&self, outer: &O, inner: &K) -> V {
        self.groups
            .get(outer)
            .map(|g| g.value_or_default(inner))
            .unwrap_or_default()
    }

    pub fn total(&self) -> V {
        let mut sum = V::default();
        for g in self.groups.values() {
            sum += g.total();
        }
        sum
    }
}
