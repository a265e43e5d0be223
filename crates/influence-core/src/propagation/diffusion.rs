//! Bounded momentum diffusion.

use nav_graph::{NavGraph, VertexId};
use std::collections::HashSet;

use crate::layer::Layer;

/// Run `iterations` diffusion passes over `layer`, then prune.
///
/// Every populated vertex and its neighbors are updated as
/// `next[v] = cur[v] * (1 - momentum) + momentum * mean(cur[neighbors(v)])`.
/// Each pass reads the previous pass's snapshot, so update order cannot bias
/// the result. Vertices without neighbors keep their value.
pub fn diffuse<G: NavGraph + ?Sized>(
    layer: &mut Layer,
    graph: &G,
    momentum: f32,
    iterations: usize,
    prune_threshold: f32,
) {
    for _ in 0..iterations {
        let next = diffusion_pass(layer, graph, momentum);
        *layer = next;
    }
    layer.prune(prune_threshold);
}

fn diffusion_pass<G: NavGraph + ?Sized>(current: &Layer, graph: &G, momentum: f32) -> Layer {
    let mut active: HashSet<VertexId> = HashSet::with_capacity(current.len() * 2);
    for vertex in current.vertices() {
        active.insert(vertex);
        active.extend(graph.neighbors(vertex).iter().copied());
    }

    let mut next = Layer::with_capacity(active.len());
    for vertex in active {
        let own = current.get(vertex);
        let neighbors = graph.neighbors(vertex);

        let value = if neighbors.is_empty() {
            own
        } else {
            let sum: f32 = neighbors.iter().map(|n| current.get(*n)).sum();
            let mean = sum / neighbors.len() as f32;
            own * (1.0 - momentum) + momentum * mean
        };

        if value != 0.0 {
            next.set(vertex, value);
        }
    }
    next
}
