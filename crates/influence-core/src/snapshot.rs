//! Snapshot Output
//!
//! Serializable per-layer summaries for logs, tooling, and visualizers.

use nav_graph::{NavGraph, Vec2, VertexId};
use serde::Serialize;

use crate::engine::InfluenceMap;
use crate::error::InfluenceError;
use crate::query::weighted_centroid;
use crate::registry::LayerId;
use crate::sight::SightState;

/// Summary of one layer
#[derive(Debug, Clone, Serialize)]
pub struct LayerSummary {
    pub id: LayerId,
    pub name: String,
    pub is_static: bool,
    pub entries: usize,
    pub total: f32,
    pub peak_vertex: Option<VertexId>,
    pub peak_value: Option<f32>,
    pub centroid: Option<Vec2>,
}

/// Summary of every layer at one moment
#[derive(Debug, Clone, Serialize)]
pub struct InfluenceSnapshot {
    pub elapsed: f64,
    pub sight: SightState,
    pub layers: Vec<LayerSummary>,
}

impl InfluenceSnapshot {
    /// Find a layer summary by display name
    pub fn layer(&self, name: &str) -> Option<&LayerSummary> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'g, G: NavGraph + ?Sized> InfluenceMap<'g, G> {
    /// Summarize every registered layer, ordered by id.
    pub fn snapshot(&self) -> Result<InfluenceSnapshot, InfluenceError> {
        let mut layers = Vec::new();
        for (id, info) in self.registered_layers() {
            let layer = self.layer(id)?;
            let peak = layer.highest_influence().ok();
            layers.push(LayerSummary {
                id,
                name: info.name.clone(),
                is_static: info.is_static,
                entries: layer.len(),
                total: layer.total(),
                peak_vertex: peak.map(|(vertex, _)| vertex),
                peak_value: peak.map(|(_, value)| value),
                centroid: weighted_centroid(layer, self.graph)?,
            });
        }

        Ok(InfluenceSnapshot {
            elapsed: self.elapsed(),
            sight: self.sight_state(),
            layers,
        })
    }
}
