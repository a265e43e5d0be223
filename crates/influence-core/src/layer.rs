//! Sparse scalar fields over navigation vertices and their algebra.
//!
//! A missing entry means zero. All operations treat absent keys that way
//! instead of failing.

use nav_graph::VertexId;
use std::collections::HashMap;
use std::ops::{AddAssign, MulAssign, SubAssign};

use crate::error::InfluenceError;

/// One influence field: vertex id -> influence value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    values: HashMap<VertexId, f32>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    /// Value at a vertex, zero when absent
    pub fn get(&self, vertex: VertexId) -> f32 {
        self.values.get(&vertex).copied().unwrap_or(0.0)
    }

    /// Value at a vertex only if the entry is materialized
    pub fn entry(&self, vertex: VertexId) -> Option<f32> {
        self.values.get(&vertex).copied()
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.values.contains_key(&vertex)
    }

    pub fn set(&mut self, vertex: VertexId, value: f32) {
        self.values.insert(vertex, value);
    }

    /// Add `value` to a vertex, inserting it if absent
    pub fn accumulate(&mut self, vertex: VertexId, value: f32) {
        *self.values.entry(vertex).or_insert(0.0) += value;
    }

    pub fn remove(&mut self, vertex: VertexId) -> Option<f32> {
        self.values.remove(&vertex)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, f32)> + '_ {
        self.values.iter().map(|(v, value)| (*v, *value))
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.values.keys().copied()
    }

    /// Sum of all entries
    pub fn total(&self) -> f32 {
        self.values.values().sum()
    }

    /// Entries sorted by vertex id, for stable output.
    pub fn sorted_entries(&self) -> Vec<(VertexId, f32)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by_key(|(v, _)| *v);
        entries
    }

    /// Drop entries whose magnitude is below `threshold`, returning how many went.
    pub fn prune(&mut self, threshold: f32) -> usize {
        let before = self.values.len();
        self.values.retain(|_, value| value.abs() >= threshold);
        before - self.values.len()
    }

    /// Scale every entry in place. Absent entries stay absent.
    pub fn multiply(&mut self, factor: f32) {
        for value in self.values.values_mut() {
            *value *= factor;
        }
    }

    /// `self[v] += other[v]` for every key of `other`.
    pub fn add_layer(&mut self, other: &Layer) {
        for (vertex, value) in other.iter() {
            self.accumulate(vertex, value);
        }
    }

    /// `self[v] -= other[v]` for every key of `other`.
    ///
    /// Cancelled entries stay materialized near zero; prune if sparsity matters.
    pub fn subtract_layer(&mut self, other: &Layer) {
        for (vertex, value) in other.iter() {
            self.accumulate(vertex, -value);
        }
    }

    /// Vertex holding the largest value.
    ///
    /// Ties resolve in iteration order, which is unspecified.
    pub fn highest_influence(&self) -> Result<(VertexId, f32), InfluenceError> {
        self.iter()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(InfluenceError::EmptyLayer)
    }

    /// Vertex holding the smallest value.
    ///
    /// Ties resolve in iteration order, which is unspecified.
    pub fn lowest_influence(&self) -> Result<(VertexId, f32), InfluenceError> {
        self.iter()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .ok_or(InfluenceError::EmptyLayer)
    }
}

impl FromIterator<(VertexId, f32)> for Layer {
    fn from_iter<I: IntoIterator<Item = (VertexId, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(u32, f32); N]> for Layer {
    fn from(entries: [(u32, f32); N]) -> Self {
        entries
            .into_iter()
            .map(|(v, value)| (VertexId(v), value))
            .collect()
    }
}

impl AddAssign<&Layer> for Layer {
    fn add_assign(&mut self, rhs: &Layer) {
        self.add_layer(rhs);
    }
}

impl SubAssign<&Layer> for Layer {
    fn sub_assign(&mut self, rhs: &Layer) {
        self.subtract_layer(rhs);
    }
}

impl MulAssign<f32> for Layer {
    fn mul_assign(&mut self, rhs: f32) {
        self.multiply(rhs);
    }
}
