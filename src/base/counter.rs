//! Sparse map with a shared default value.
//!
//! A [`Counter`] behaves like a map defined over every possible key. Keys
//! that were never set (or were set back to the default) read as the
//! counter's `base`. Only keys whose value differs from `base` are stored.

use std::collections::{hash_map, HashMap};
use std::hash::Hash;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use log::warn;
use thiserror::Error;

use super::merge::merge_keys;

/// Returned by [`Counter::arg_max`] when there are no stored entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("arg_max of a counter with no stored entries")]
pub struct EmptyCounterError;

/// Sparse numeric map where every missing key reads as `base`.
///
/// Invariant: no stored value equals `base`. Writes of `base` remove the
/// key instead.
#[derive(Debug, Clone)]
pub struct Counter<K = String> {
    values: HashMap<K, f64>,
    base: f64,
}

impl<K> Default for Counter<K> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            base: 0.0,
        }
    }
}

/// Same base and same stored entries, compared exactly.
impl<K: Eq + Hash> PartialEq for Counter<K> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.values == other.values
    }
}

impl<K> Counter<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(base: f64) -> Self {
        Self {
            values: HashMap::new(),
            base,
        }
    }

    /// The value of every key that isn't stored.
    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn get(&self, k: &K) -> f64 {
        self.values.get(k).copied().unwrap_or(self.base)
    }

    /// Sets `k` to `v`. Setting a key to `base` removes it.
    pub fn set(&mut self, k: K, v: f64) {
        if v == self.base {
            self.values.remove(&k);
        } else {
            self.values.insert(k, v);
        }
    }

    pub fn incr(&mut self, k: K) {
        let v = self.get(&k);
        self.set(k, v + 1.0);
    }

    /// Keys with a value other than `base`, in no particular order.
    pub fn keys(&self) -> hash_map::Keys<'_, K, f64> {
        self.values.keys()
    }

    /// Stored entries, in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, K, f64> {
        self.values.iter()
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.values.contains_key(k)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // Owned snapshot so the storage can be mutated while we walk the keys.
    fn key_snapshot(&self) -> Vec<K> {
        self.values.keys().cloned().collect()
    }

    /// Updates `self` to `op(self, b)` over the union of both key sets.
    ///
    /// `keys` computes that union from snapshots of each side's keys; see
    /// [`merge_keys`](super::merge::merge_keys) and
    /// [`spawn_merge_keys`](super::merge::spawn_merge_keys).
    pub fn combine_inplace_by<F, M, I>(&mut self, b: &Counter<K>, op: F, keys: M)
    where
        F: Fn(f64, f64) -> f64,
        M: FnOnce(Vec<K>, Vec<K>) -> I,
        I: IntoIterator<Item = K>,
    {
        // Keys missing from self still read as the old base until written.
        let old_base = self.base;
        self.base = op(old_base, b.base);
        for k in keys(self.key_snapshot(), b.key_snapshot()) {
            let ours = self.values.get(&k).copied().unwrap_or(old_base);
            let v = op(ours, b.get(&k));
            self.set(k, v);
        }
    }

    /// Updates `self` to `op(self, b)` elementwise, base included.
    pub fn combine_inplace<F>(&mut self, b: &Counter<K>, op: F)
    where
        F: Fn(f64, f64) -> f64,
    {
        self.combine_inplace_by(b, op, merge_keys)
    }

    pub fn add_in_place(&mut self, o: &Counter<K>) {
        self.combine_inplace(o, |a, b| a + b)
    }

    pub fn subtract_in_place(&mut self, o: &Counter<K>) {
        self.combine_inplace(o, |a, b| a - b)
    }

    pub fn multiply_in_place(&mut self, o: &Counter<K>) {
        self.combine_inplace(o, |a, b| a * b)
    }

    pub fn divide_in_place(&mut self, o: &Counter<K>) {
        self.combine_inplace(o, |a, b| a / b)
    }

    /// Replaces every value with `f(key, value)`.
    ///
    /// The base goes first, as `f(None, base)`, so missing keys keep
    /// reading consistently with stored ones. Stored entries that land on
    /// the new base are dropped.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(Option<&K>, f64) -> f64,
    {
        self.base = f(None, self.base);
        let base = self.base;
        self.values.retain(|k, v| {
            *v = f(Some(k), *v);
            *v != base
        });
    }

    pub fn log(&mut self) {
        self.apply(|_, v| v.ln())
    }

    pub fn exp(&mut self) {
        self.apply(|_, v| v.exp())
    }

    /// Folds `op` over the stored values, starting at `seed`.
    ///
    /// The base is not part of the fold.
    pub fn reduce<F>(&self, seed: f64, op: F) -> f64
    where
        F: Fn(f64, f64) -> f64,
    {
        self.values.values().fold(seed, |acc, &v| op(acc, v))
    }

    /// Base plus every stored value.
    pub fn sum(&self) -> f64 {
        self.reduce(self.base, |a, b| a + b)
    }

    fn total(&self) -> f64 {
        let total = self.reduce(0.0, |a, b| a + b);
        if total == 0.0 {
            warn!("normalizing a counter whose stored values sum to zero");
        }
        total
    }

    /// Divides every value, base included, by the sum of the stored values.
    ///
    /// With a base of 0 the stored values end up summing to 1. A nonzero
    /// base is divided too and ends up as `base / total`.
    pub fn normalize(&mut self) {
        let total = self.total();
        self.apply(|_, v| v / total)
    }

    /// Like [`normalize`](Self::normalize) followed by [`log`](Self::log),
    /// but subtracts the log of the total instead of dividing first.
    pub fn log_normalize(&mut self) {
        let log_total = self.total().ln();
        self.apply(|_, v| v.ln() - log_total)
    }

    /// The stored entry with the largest value.
    ///
    /// The first entry visited is always taken, then replaced only by a
    /// strictly greater one, so ties go to whichever key iteration reaches
    /// first. The base never competes.
    pub fn arg_max(&self) -> Result<(K, f64), EmptyCounterError> {
        let mut best: Option<(&K, f64)> = None;
        for (k, &v) in &self.values {
            if best.map_or(true, |(_, max)| v > max) {
                best = Some((k, v));
            }
        }
        best.map(|(k, v)| (k.clone(), v)).ok_or(EmptyCounterError)
    }
}

/// Read/write access shared by anything that counts keys.
pub trait Counts<K> {
    fn get(&self, k: &K) -> f64;
    fn set(&mut self, k: K, v: f64);
    /// Keys holding a non-default value.
    fn keys(&self) -> Vec<K>;

    fn incr(&mut self, k: K)
    where
        K: Clone,
    {
        let v = self.get(&k);
        self.set(k, v + 1.0);
    }
}

impl<K: Eq + Hash + Clone> Counts<K> for Counter<K> {
    fn get(&self, k: &K) -> f64 {
        Counter::get(self, k)
    }

    fn set(&mut self, k: K, v: f64) {
        Counter::set(self, k, v)
    }

    fn keys(&self) -> Vec<K> {
        self.key_snapshot()
    }
}

/// Returns `op(a, b)` elementwise over the union of both key sets, using
/// `keys` to compute that union. Neither input is modified.
pub fn combine_by<K, F, M, I>(a: &Counter<K>, b: &Counter<K>, op: F, keys: M) -> Counter<K>
where
    K: Eq + Hash + Clone,
    F: Fn(f64, f64) -> f64,
    M: FnOnce(Vec<K>, Vec<K>) -> I,
    I: IntoIterator<Item = K>,
{
    let mut result = Counter::new(op(a.base, b.base));
    for k in keys(a.key_snapshot(), b.key_snapshot()) {
        let v = op(a.get(&k), b.get(&k));
        result.set(k, v);
    }
    result
}

/// Returns `op(a, b)` elementwise, base included.
pub fn combine<K, F>(a: &Counter<K>, b: &Counter<K>, op: F) -> Counter<K>
where
    K: Eq + Hash + Clone,
    F: Fn(f64, f64) -> f64,
{
    combine_by(a, b, op, merge_keys)
}

pub fn add<K: Eq + Hash + Clone>(a: &Counter<K>, b: &Counter<K>) -> Counter<K> {
    combine(a, b, |a, b| a + b)
}

pub fn subtract<K: Eq + Hash + Clone>(a: &Counter<K>, b: &Counter<K>) -> Counter<K> {
    combine(a, b, |a, b| a - b)
}

pub fn multiply<K: Eq + Hash + Clone>(a: &Counter<K>, b: &Counter<K>) -> Counter<K> {
    combine(a, b, |a, b| a * b)
}

pub fn divide<K: Eq + Hash + Clone>(a: &Counter<K>, b: &Counter<K>) -> Counter<K> {
    combine(a, b, |a, b| a / b)
}

macro_rules! impl_ops {
    ($($Op:ident $op:ident $OpAssign:ident $op_assign:ident => $f:ident $f_in_place:ident;)*) => {$(
        impl<K: Eq + Hash + Clone> $Op<&Counter<K>> for &Counter<K> {
            type Output = Counter<K>;

            fn $op(self, rhs: &Counter<K>) -> Counter<K> {
                $f(self, rhs)
            }
        }

        impl<K: Eq + Hash + Clone> $OpAssign<&Counter<K>> for Counter<K> {
            fn $op_assign(&mut self, rhs: &Counter<K>) {
                self.$f_in_place(rhs)
            }
        }
    )*};
}

impl_ops! {
    Add add AddAssign add_assign => add add_in_place;
    Sub sub SubAssign sub_assign => subtract subtract_in_place;
    Mul mul MulAssign mul_assign => multiply multiply_in_place;
    Div div DivAssign div_assign => divide divide_in_place;
}

/// Counts occurrences: each key is incremented once per appearance.
impl<K: Eq + Hash + Clone> FromIterator<K> for Counter<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut c = Counter::new(0.0);
        c.extend(iter);
        c
    }
}

impl<K: Eq + Hash + Clone> Extend<K> for Counter<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.incr(k);
        }
    }
}

impl<'a, K> IntoIterator for &'a Counter<K> {
    type Item = (&'a K, &'a f64);
    type IntoIter = hash_map::Iter<'a, K, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
