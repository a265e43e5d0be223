//! Layer Store
//!
//! One [`Layer`] per registered identifier. Names and classification live in
//! the [`TypeRegistry`](crate::registry::TypeRegistry).

use std::collections::HashMap;

use crate::error::InfluenceError;
use crate::layer::Layer;
use crate::registry::LayerId;

/// All layers, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    layers: HashMap<LayerId, Layer>,
}

impl LayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty layer for `id`, keeping any layer already there.
    pub fn open(&mut self, id: LayerId) {
        self.layers.entry(id).or_default();
    }

    pub fn get(&self, id: LayerId) -> Result<&Layer, InfluenceError> {
        self.layers.get(&id).ok_or(InfluenceError::UnknownLayer(id))
    }

    pub fn get_mut(&mut self, id: LayerId) -> Result<&mut Layer, InfluenceError> {
        self.layers
            .get_mut(&id)
            .ok_or(InfluenceError::UnknownLayer(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.layers.iter().map(|(id, layer)| (*id, layer))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (LayerId, &mut Layer)> {
        self.layers.iter_mut().map(|(id, layer)| (*id, layer))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
