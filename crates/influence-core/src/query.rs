//! Query Layer
//!
//! Aggregate questions AI code asks of a layer.

use nav_graph::{NavGraph, Vec2};

use crate::error::InfluenceError;
use crate::layer::Layer;

/// Influence-weighted centroid of a layer's populated vertices.
///
/// Only positive entries carry weight. Returns `Ok(None)` when there is
/// nothing to weigh, and fails if the layer names a vertex the graph lacks.
pub fn weighted_centroid<G: NavGraph + ?Sized>(
    layer: &Layer,
    graph: &G,
) -> Result<Option<Vec2>, InfluenceError> {
    let mut weighted = Vec2::ZERO;
    let mut total = 0.0f32;

    for (vertex, value) in layer.iter() {
        if value <= 0.0 {
            continue;
        }
        let position = graph
            .position(vertex)
            .ok_or(InfluenceError::UnknownVertex(vertex))?;
        weighted += position * value;
        total += value;
    }

    if total > 0.0 {
        Ok(Some(weighted / total))
    } else {
        Ok(None)
    }
}
