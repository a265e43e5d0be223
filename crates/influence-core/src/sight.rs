//! Sight Predictor
//!
//! When the tracked target drops out of view, the search layer is flooded
//! outward from where it was last seen, favoring the direction it was
//! heading. When it is seen again, the guess collapses onto the real position.

use nav_graph::{NavGraph, Vec2, VertexId};
use serde::Serialize;
use tracing::debug;

use crate::engine::InfluenceMap;
use crate::error::InfluenceError;
use crate::propagation::{diffuse, flood_with, Spread};
use crate::registry::InfluenceType;

/// What the engine currently believes about the tracked target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SightState {
    /// Never seen
    #[default]
    Unknown,
    /// In view at this vertex
    Visible { vertex: VertexId },
    /// Lost at this vertex while moving along `heading`
    Lost { vertex: VertexId, heading: Vec2 },
}

impl SightState {
    pub fn is_lost(&self) -> bool {
        matches!(self, SightState::Lost { .. })
    }
}

/// Retention multiplier for stepping from `from` to `to` given a heading.
///
/// Returns `(1 - bias) + bias * (1 + cos θ) / 2`, where θ is the angle
/// between the step and the heading: 1 straight ahead, `1 - bias` straight back.
pub fn heading_bias<G: NavGraph + ?Sized>(
    graph: &G,
    from: VertexId,
    to: VertexId,
    heading: Vec2,
    bias: f32,
) -> f32 {
    let step = match (graph.position(from), graph.position(to)) {
        (Some(a), Some(b)) => (b - a).try_normalize(),
        _ => None,
    };
    let cos = step.map(|s| s.dot(heading)).unwrap_or(0.0);
    (1.0 - bias) + bias * (1.0 + cos) * 0.5
}

impl<'g, G: NavGraph + ?Sized> InfluenceMap<'g, G> {
    pub fn sight_state(&self) -> SightState {
        self.sight
    }

    /// Start predicting where the target went after losing sight of it.
    ///
    /// Replaces the search layer with a flood seeded at the vertex nearest
    /// `position`. A zero `last_direction` floods evenly in all directions.
    pub fn on_lose_sight(
        &mut self,
        position: Vec2,
        last_direction: Vec2,
    ) -> Result<VertexId, InfluenceError> {
        if !last_direction.x.is_finite() || !last_direction.y.is_finite() {
            return Err(InfluenceError::InvalidParameter {
                name: "last_direction",
                value: if last_direction.x.is_finite() { last_direction.y } else { last_direction.x },
            });
        }
        let vertex = self.resolve_vertex(position)?;

        let graph = self.graph;
        let params = self.flood_params(self.sight_config.flood_iterations);
        let base = 1.0 - self.engine.decay;
        let bias = self.sight_config.direction_bias;
        let seed_value = self.sight_config.seed_value;
        let heading = last_direction.try_normalize();

        let layer = self.store.get_mut(InfluenceType::Search.id())?;
        layer.clear();
        layer.set(vertex, seed_value);
        let stats = flood_with(layer, graph, &[vertex], &params, |from, to| match heading {
            Some(heading) => base * heading_bias(graph, from, to, heading, bias),
            None => base,
        });

        let heading = heading.unwrap_or(Vec2::ZERO);
        self.sight = SightState::Lost { vertex, heading };
        debug!(%vertex, heading_x = heading.x, heading_y = heading.y, written = stats.written, "lost sight of target");
        Ok(vertex)
    }

    /// The target is visible at `pos`: drop the prediction and re-seed the player layer.
    pub fn on_have_sight(&mut self, pos: Vec2) -> Result<VertexId, InfluenceError> {
        let vertex = self.resolve_vertex(pos)?;
        let was_lost = self.sight.is_lost();

        self.clear_influence(InfluenceType::Search)?;
        self.clear_influence(InfluenceType::Player)?;
        self.add_static_influence(
            pos,
            InfluenceType::Player,
            self.sight_config.player_value,
            Spread::flood(self.sight_config.flood_iterations),
        )?;

        self.sight = SightState::Visible { vertex };
        if was_lost {
            debug!(%vertex, "regained sight of target");
        }
        Ok(vertex)
    }

    /// Where the search layer currently thinks the target is.
    pub fn predicted_position(&self) -> Result<Option<Vec2>, InfluenceError> {
        self.avg_position(InfluenceType::Search)
    }

    /// One diffusion pass over the search layer while the target is lost.
    pub(crate) fn advance_search(&mut self) -> Result<(), InfluenceError> {
        if !self.sight.is_lost() || !self.sight_config.spread_while_lost {
            return Ok(());
        }
        let graph = self.graph;
        let momentum = self.engine.momentum;
        let prune_threshold = self.engine.prune_threshold;
        let search = self.store.get_mut(InfluenceType::Search.id())?;
        diffuse(search, graph, momentum, 1, prune_threshold);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InfluenceConfig;
    use crate::store::LayerStore;
    use nav_graph::AdjacencyGraph;

    #[test]
    fn test_heading_bias_range() {
        let graph = AdjacencyGraph::chain(3, 1.0);
        let heading = Vec2::new(1.0, 0.0);

        let ahead = heading_bias(&graph, VertexId(1), VertexId(2), heading, 0.75);
        let behind = heading_bias(&graph, VertexId(1), VertexId(0), heading, 0.75);
        assert!((ahead - 1.0).abs() < 1e-6);
        assert!((behind - 0.25).abs() < 1e-6);

        let isotropic = heading_bias(&graph, VertexId(1), VertexId(0), heading, 0.0);
        assert!((isotropic - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lose_sight_favors_heading() {
        let graph = AdjacencyGraph::grid(9, 9, 1.0);
        let mut map = InfluenceMap::new(&graph);

        let vertex = map
            .on_lose_sight(Vec2::new(4.0, 4.0), Vec2::new(1.0, 0.0))
            .unwrap();
        assert_eq!(vertex, VertexId(40));
        assert!(map.sight_state().is_lost());

        let search = map.layer(InfluenceType::Search).unwrap();
        let ahead = search.get(VertexId(42));
        let behind = search.get(VertexId(38));
        let side = search.get(VertexId(58));
        assert!(ahead > side);
        assert!(side > behind);
        assert_eq!(map.highest_influence(InfluenceType::Search).unwrap(), vertex);

        let predicted = map.predicted_position().unwrap().unwrap();
        assert!(predicted.x > 4.0);
        assert!((predicted.y - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_heading_is_isotropic() {
        let graph = AdjacencyGraph::chain(5, 1.0);
        let mut map = InfluenceMap::new(&graph);

        map.on_lose_sight(Vec2::new(2.0, 0.0), Vec2::ZERO).unwrap();

        let search = map.layer(InfluenceType::Search).unwrap();
        assert!((search.get(VertexId(1)) - search.get(VertexId(3))).abs() < 1e-6);
        assert_eq!(
            map.sight_state(),
            SightState::Lost {
                vertex: VertexId(2),
                heading: Vec2::ZERO
            }
        );
    }

    #[test]
    fn test_lose_sight_replaces_previous_prediction() {
        let graph = AdjacencyGraph::chain(20, 1.0);
        let mut config = InfluenceConfig::default();
        config.sight.flood_iterations = 2;
        let mut map = InfluenceMap::with_config(&graph, config).unwrap();

        map.on_lose_sight(Vec2::new(0.0, 0.0), Vec2::ZERO).unwrap();
        map.on_lose_sight(Vec2::new(15.0, 0.0), Vec2::ZERO).unwrap();

        let search = map.layer(InfluenceType::Search).unwrap();
        assert!(!search.contains(VertexId(0)));
        assert_eq!(search.len(), 5);
    }

    #[test]
    fn test_have_sight_collapses_prediction() {
        let graph = AdjacencyGraph::grid(5, 5, 1.0);
        let mut map = InfluenceMap::new(&graph);

        map.on_lose_sight(Vec2::new(2.0, 2.0), Vec2::new(0.0, 1.0)).unwrap();
        let vertex = map.on_have_sight(Vec2::new(4.0, 0.0)).unwrap();

        assert_eq!(vertex, VertexId(4));
        assert_eq!(map.sight_state(), SightState::Visible { vertex });
        assert!(map.layer(InfluenceType::Search).unwrap().is_empty());
        assert_eq!(map.predicted_position().unwrap(), None);
        assert_eq!(map.highest_influence(InfluenceType::Player).unwrap(), vertex);
    }

    #[test]
    fn test_repeated_sightings_do_not_accumulate() {
        let graph = AdjacencyGraph::chain(5, 1.0);
        let mut map = InfluenceMap::new(&graph);

        for _ in 0..10 {
            map.on_have_sight(Vec2::new(2.0, 0.0)).unwrap();
        }
        let player = map.layer(InfluenceType::Player).unwrap();
        assert!((player.get(VertexId(2)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_keeps_spreading_while_lost() {
        let graph = AdjacencyGraph::chain(30, 1.0);
        let mut config = InfluenceConfig::default();
        config.sight.flood_iterations = 1;
        let mut map = InfluenceMap::with_config(&graph, config).unwrap();

        map.on_lose_sight(Vec2::new(15.0, 0.0), Vec2::ZERO).unwrap();
        let before = map.layer(InfluenceType::Search).unwrap().len();
        map.update(0.1).unwrap();
        let after = map.layer(InfluenceType::Search).unwrap().len();
        assert!(after > before);

        // Spreading stops once the target is seen again
        map.on_have_sight(Vec2::new(15.0, 0.0)).unwrap();
        map.update(0.1).unwrap();
        assert!(map.layer(InfluenceType::Search).unwrap().is_empty());
    }

    #[test]
    fn test_update_reports_missing_search_layer() {
        let graph = AdjacencyGraph::chain(5, 1.0);
        let mut map = InfluenceMap::new(&graph);
        map.on_lose_sight(Vec2::new(2.0, 0.0), Vec2::ZERO).unwrap();

        map.store = LayerStore::new();
        assert!(matches!(
            map.update(0.1),
            Err(InfluenceError::UnknownLayer(id)) if id == InfluenceType::Search.id()
        ));
    }

    #[test]
    fn test_sight_on_empty_graph_fails() {
        let graph = AdjacencyGraph::new();
        let mut map = InfluenceMap::new(&graph);

        assert!(matches!(
            map.on_lose_sight(Vec2::ZERO, Vec2::new(1.0, 0.0)),
            Err(InfluenceError::EmptyGraph)
        ));
        assert_eq!(map.sight_state(), SightState::Unknown);
    }
}
