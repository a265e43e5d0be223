//! Breadth-first flood propagation.
//!
//! A wave expands hop by hop from the seed vertices. The value carried to a
//! neighbor is the sender's value times a per-step retention, so with a
//! constant retention of `1 - decay` hop `k` receives `v0 * (1 - decay)^k`.

use nav_graph::{NavGraph, VertexId};
use std::collections::HashMap;

use crate::layer::Layer;

/// Bounds for one flood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloodParams {
    /// Maximum hop distance from any seed
    pub iterations: usize,
    /// The wave stops inserting new vertices once the layer holds this many
    pub max_cells: usize,
    /// Per-hop falloff
    pub decay: f32,
    /// Values below this are not written
    pub prune_threshold: f32,
}

/// What a flood did, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloodStats {
    pub hops: usize,
    pub written: usize,
}

/// Flood from `seeds` with uniform `1 - decay` retention per hop.
pub fn flood<G: NavGraph + ?Sized>(
    layer: &mut Layer,
    graph: &G,
    seeds: &[VertexId],
    params: &FloodParams,
) -> FloodStats {
    let retention = 1.0 - params.decay;
    flood_with(layer, graph, seeds, params, |_, _| retention)
}

/// Flood from `seeds`, asking `retention(from, to)` for each step's falloff.
///
/// Seeds start with their current layer value; non-positive seeds do not
/// spread. A vertex is only written when the incoming value beats what it
/// already holds, so a vertex reachable along several paths keeps the highest
/// value. The wave still passes through vertices it loses to and carries its
/// own value onward. Retention is clamped to `[0, 1]`, which keeps the wave
/// monotone.
pub fn flood_with<G, F>(
    layer: &mut Layer,
    graph: &G,
    seeds: &[VertexId],
    params: &FloodParams,
    mut retention: F,
) -> FloodStats
where
    G: NavGraph + ?Sized,
    F: FnMut(VertexId, VertexId) -> f32,
{
    let mut stats = FloodStats::default();

    let mut frontier: HashMap<VertexId, f32> = HashMap::new();
    for &seed in seeds {
        let value = layer.get(seed);
        if value > 0.0 {
            frontier.insert(seed, value);
        }
    }
    // Strongest wave value that has left each vertex so far
    let mut carried = frontier.clone();

    while stats.hops < params.iterations && !frontier.is_empty() {
        let mut next: HashMap<VertexId, f32> = HashMap::new();

        for (&from, &value) in &frontier {
            for &to in graph.neighbors(from) {
                let candidate = value * retention(from, to).clamp(0.0, 1.0);
                if candidate < params.prune_threshold || candidate <= 0.0 {
                    continue;
                }
                if carried.get(&to).is_some_and(|&best| best >= candidate) {
                    continue;
                }
                match layer.entry(to) {
                    Some(existing) if existing >= candidate => {}
                    None if layer.len() >= params.max_cells => continue,
                    _ => {
                        layer.set(to, candidate);
                        stats.written += 1;
                    }
                }

                carried.insert(to, candidate);
                next.insert(to, candidate);
            }
        }

        stats.hops += 1;
        frontier = next;
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_graph::AdjacencyGraph;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn params(iterations: usize, decay: f32) -> FloodParams {
        FloodParams {
            iterations,
            max_cells: usize::MAX,
            decay,
            prune_threshold: 0.0,
        }
    }

    #[test]
    fn test_chain_falloff() {
        let graph = AdjacencyGraph::chain(5, 1.0);
        let mut layer = Layer::from([(2, 1.0)]);

        let stats = flood(&mut layer, &graph, &[VertexId(2)], &params(2, 0.5));

        assert_eq!(stats.hops, 2);
        assert_eq!(layer.len(), 5);
        assert!(approx(layer.get(VertexId(2)), 1.0));
        assert!(approx(layer.get(VertexId(1)), 0.5));
        assert!(approx(layer.get(VertexId(3)), 0.5));
        assert!(approx(layer.get(VertexId(0)), 0.25));
        assert!(approx(layer.get(VertexId(4)), 0.25));
    }

    #[test]
    fn test_hop_limit() {
        let graph = AdjacencyGraph::chain(10, 1.0);
        let mut layer = Layer::from([(0, 1.0)]);

        flood(&mut layer, &graph, &[VertexId(0)], &params(3, 0.1));

        assert_eq!(layer.len(), 4);
        assert!(!layer.contains(VertexId(4)));
        assert!(approx(layer.get(VertexId(3)), 0.9f32.powi(3)));
    }

    #[test]
    fn test_cell_budget() {
        let graph = AdjacencyGraph::grid(10, 10, 1.0);
        let mut layer = Layer::from([(55, 1.0)]);
        let bounded = FloodParams {
            max_cells: 7,
            ..params(20, 0.05)
        };

        flood(&mut layer, &graph, &[VertexId(55)], &bounded);
        assert_eq!(layer.len(), 7);
    }

    #[test]
    fn test_keeps_higher_existing_values() {
        let graph = AdjacencyGraph::chain(5, 1.0);
        let mut layer = Layer::from([(0, 1.0), (1, 2.0)]);

        let stats = flood(&mut layer, &graph, &[VertexId(0)], &params(3, 0.5));

        // Vertex 1 already holds more than the wave brings
        assert!(approx(layer.get(VertexId(1)), 2.0));
        // The wave passes through it with its own value
        assert!(approx(layer.get(VertexId(2)), 0.25));
        assert!(approx(layer.get(VertexId(3)), 0.125));
        assert!(!layer.contains(VertexId(4)));
        assert!(approx(layer.get(VertexId(0)), 1.0));
        assert_eq!(stats.written, 2);
    }

    #[test]
    fn test_raises_lower_existing_values() {
        let graph = AdjacencyGraph::chain(3, 1.0);
        let mut layer = Layer::from([(0, 1.0), (1, 0.1)]);

        flood(&mut layer, &graph, &[VertexId(0)], &params(2, 0.5));

        assert!(approx(layer.get(VertexId(1)), 0.5));
        assert!(approx(layer.get(VertexId(2)), 0.25));
    }

    #[test]
    fn test_multiple_seeds_take_maximum() {
        let graph = AdjacencyGraph::chain(5, 1.0);
        let mut layer = Layer::from([(0, 1.0), (4, 0.4)]);

        flood(&mut layer, &graph, &[VertexId(0), VertexId(4)], &params(4, 0.5));

        assert!(approx(layer.get(VertexId(1)), 0.5));
        assert!(approx(layer.get(VertexId(2)), 0.25));
        // 0.4 * 0.5 from the right beats 1.0 * 0.125 from the left
        assert!(approx(layer.get(VertexId(3)), 0.2));
    }

    #[test]
    fn test_non_positive_seed_does_not_spread() {
        let graph = AdjacencyGraph::chain(3, 1.0);
        let mut layer = Layer::from([(1, -1.0)]);

        let stats = flood(&mut layer, &graph, &[VertexId(1)], &params(3, 0.5));
        assert_eq!(stats, FloodStats::default());
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_custom_retention() {
        let graph = AdjacencyGraph::chain(5, 1.0);
        let mut layer = Layer::from([(2, 1.0)]);

        // Only allow the wave to move toward higher ids
        flood_with(&mut layer, &graph, &[VertexId(2)], &params(2, 0.0), |from, to| {
            if to > from { 0.5 } else { 0.0 }
        });

        assert!(!layer.contains(VertexId(1)));
        assert!(approx(layer.get(VertexId(3)), 0.5));
        assert!(approx(layer.get(VertexId(4)), 0.25));
    }
}
