//! The influence map engine.
//!
//! [`InfluenceMap`] owns the type registry and layer store and borrows the
//! navigation graph it was built over. Game code registers types once,
//! seeds layers during play, calls [`InfluenceMap::update`] once per frame,
//! and queries layers on demand.

use nav_graph::{NavGraph, Vec2, VertexId};
use tracing::{debug, trace};

use crate::config::{EngineConfig, InfluenceConfig, SightConfig};
use crate::decay::{decay_factor, decay_layer};
use crate::error::InfluenceError;
use crate::layer::Layer;
use crate::propagation::{diffuse, flood, FloodParams, Spread};
use crate::query::weighted_centroid;
use crate::registry::{LayerId, TypeInfo, TypeRegistry};
use crate::sight::SightState;
use crate::store::LayerStore;

/// Influence layers attached to the vertices of a navigation graph.
///
/// Single-threaded: callers sharing one map across threads must serialize
/// access themselves.
pub struct InfluenceMap<'g, G: NavGraph + ?Sized> {
    pub(crate) graph: &'g G,
    pub(crate) engine: EngineConfig,
    pub(crate) sight_config: SightConfig,
    registry: TypeRegistry,
    pub(crate) store: LayerStore,
    pub(crate) sight: SightState,
    elapsed: f64,
}

impl<'g, G: NavGraph + ?Sized> InfluenceMap<'g, G> {
    /// Creates an engine with default parameters.
    pub fn new(graph: &'g G) -> Self {
        let registry = TypeRegistry::new();
        let mut store = LayerStore::new();
        for (id, _) in registry.iter() {
            store.open(id);
        }

        Self {
            graph,
            engine: EngineConfig::default(),
            sight_config: SightConfig::default(),
            registry,
            store,
            sight: SightState::default(),
            elapsed: 0.0,
        }
    }

    /// Creates an engine from a validated configuration.
    pub fn with_config(graph: &'g G, config: InfluenceConfig) -> Result<Self, InfluenceError> {
        config.validate()?;
        let mut map = Self::new(graph);
        map.engine = config.engine;
        map.sight_config = config.sight;
        Ok(map)
    }

    pub fn graph(&self) -> &'g G {
        self.graph
    }

    pub fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn sight_config(&self) -> &SightConfig {
        &self.sight_config
    }

    pub fn momentum(&self) -> f32 {
        self.engine.momentum
    }

    pub fn decay(&self) -> f32 {
        self.engine.decay
    }

    /// Total time passed to [`update`](Self::update), in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Sets the diffusion momentum, must be within `[0, 1]`.
    pub fn set_momentum(&mut self, momentum: f32) -> Result<(), InfluenceError> {
        self.engine.momentum = InfluenceError::check_unit("momentum", momentum)?;
        Ok(())
    }

    /// Sets the decay rate, must be within `[0, 1]`.
    pub fn set_decay(&mut self, decay: f32) -> Result<(), InfluenceError> {
        self.engine.decay = InfluenceError::check_unit("decay", decay)?;
        Ok(())
    }

    /// Register a new influence type and return its id.
    pub fn register_type(&mut self, name: impl Into<String>, is_static: bool) -> LayerId {
        let name = name.into();
        let id = self.registry.register(name.clone(), is_static);
        debug!(%id, %name, is_static, "registered influence type");
        self.store.open(id);
        id
    }

    pub fn layer_name(&self, id: impl Into<LayerId>) -> Result<&str, InfluenceError> {
        let id = id.into();
        self.registry.name(id).ok_or(InfluenceError::UnknownLayer(id))
    }

    pub fn is_static(&self, id: impl Into<LayerId>) -> Result<bool, InfluenceError> {
        let id = id.into();
        self.registry
            .get(id)
            .map(|info| info.is_static)
            .ok_or(InfluenceError::UnknownLayer(id))
    }

    /// Every registered type, ordered by id.
    pub fn registered_layers(&self) -> impl Iterator<Item = (LayerId, &TypeInfo)> {
        self.registry.iter()
    }

    /// Add `value` at the vertex nearest `pos`, then spread it.
    ///
    /// Returns the vertex the position resolved to. Propagating a dynamic
    /// layer is rejected.
    pub fn add_static_influence(
        &mut self,
        pos: Vec2,
        id: impl Into<LayerId>,
        value: f32,
        spread: Spread,
    ) -> Result<VertexId, InfluenceError> {
        let id = id.into();
        if spread.propagate && !self.is_static(id)? {
            return Err(InfluenceError::DynamicLayer(id));
        }
        check_finite("value", value)?;
        let vertex = self.resolve_vertex(pos)?;

        let graph = self.graph;
        let momentum = self.engine.momentum;
        let prune_threshold = self.engine.prune_threshold;
        let params = self.flood_params(spread.iterations);

        let layer = self.store.get_mut(id)?;
        layer.accumulate(vertex, value);
        if spread.propagate {
            if spread.flood {
                let stats = flood(layer, graph, &[vertex], &params);
                debug!(%id, %vertex, value, hops = stats.hops, written = stats.written, "flooded static influence");
            } else {
                diffuse(layer, graph, momentum, spread.iterations, prune_threshold);
                debug!(%id, %vertex, value, passes = spread.iterations, entries = layer.len(), "diffused static influence");
            }
        } else {
            debug!(%id, %vertex, value, "added static influence");
        }
        Ok(vertex)
    }

    /// Add `value` at the vertex nearest `pos` without propagation.
    ///
    /// Dynamic influences are expected to be re-added every frame.
    pub fn add_dynamic_influence(
        &mut self,
        pos: Vec2,
        id: impl Into<LayerId>,
        value: f32,
    ) -> Result<VertexId, InfluenceError> {
        let id = id.into();
        self.store.get(id)?;
        check_finite("value", value)?;
        let vertex = self.resolve_vertex(pos)?;

        self.store.get_mut(id)?.accumulate(vertex, value);
        trace!(%id, %vertex, value, "added dynamic influence");
        Ok(vertex)
    }

    /// Propagate an existing static layer without seeding it.
    ///
    /// Flooding treats every populated vertex as part of the initial frontier.
    pub fn spread_layer(&mut self, id: impl Into<LayerId>, spread: Spread) -> Result<(), InfluenceError> {
        let id = id.into();
        if !self.is_static(id)? {
            return Err(InfluenceError::DynamicLayer(id));
        }
        if !spread.propagate {
            return Ok(());
        }

        let graph = self.graph;
        let momentum = self.engine.momentum;
        let prune_threshold = self.engine.prune_threshold;
        let params = self.flood_params(spread.iterations);

        let layer = self.store.get_mut(id)?;
        if spread.flood {
            let mut seeds: Vec<VertexId> = layer.vertices().collect();
            seeds.sort();
            let stats = flood(layer, graph, &seeds, &params);
            debug!(%id, seeds = seeds.len(), hops = stats.hops, written = stats.written, "flooded layer");
        } else {
            diffuse(layer, graph, momentum, spread.iterations, prune_threshold);
            debug!(%id, passes = spread.iterations, entries = layer.len(), "diffused layer");
        }
        Ok(())
    }

    /// Empty one layer.
    pub fn clear_influence(&mut self, id: impl Into<LayerId>) -> Result<(), InfluenceError> {
        let id = id.into();
        self.store.get_mut(id)?.clear();
        debug!(%id, "cleared influence layer");
        Ok(())
    }

    /// Empty every dynamic layer.
    pub fn clear_dynamic_layers(&mut self) {
        let registry = &self.registry;
        for (id, layer) in self.store.iter_mut() {
            if registry.get(id).is_some_and(|info| !info.is_static) {
                layer.clear();
            }
        }
    }

    /// Decay every static layer by `(1 - decay)^delta_time`.
    ///
    /// Dynamic layers are left alone unless `clear_dynamic_on_update` is set.
    /// While the tracked target is out of sight the search layer also gets
    /// one diffusion pass.
    pub fn update(&mut self, delta_time: f32) -> Result<(), InfluenceError> {
        let factor = decay_factor(self.engine.decay, delta_time)?;

        if self.engine.clear_dynamic_on_update {
            self.clear_dynamic_layers();
        }
        self.advance_search()?;

        let prune_threshold = self.engine.prune_threshold;
        let mut pruned = 0;
        let registry = &self.registry;
        for (id, layer) in self.store.iter_mut() {
            if registry.get(id).is_some_and(|info| info.is_static) {
                pruned += decay_layer(layer, factor, prune_threshold);
            }
        }

        self.elapsed += f64::from(delta_time);
        trace!(delta_time, factor, pruned, "decayed static layers");
        Ok(())
    }

    /// Read-only access to a layer.
    pub fn layer(&self, id: impl Into<LayerId>) -> Result<&Layer, InfluenceError> {
        self.store.get(id.into())
    }

    /// Mutable access to a layer, for caller-side algebra.
    pub fn layer_mut(&mut self, id: impl Into<LayerId>) -> Result<&mut Layer, InfluenceError> {
        self.store.get_mut(id.into())
    }

    pub fn highest_influence(&self, id: impl Into<LayerId>) -> Result<VertexId, InfluenceError> {
        self.layer(id)?.highest_influence().map(|(vertex, _)| vertex)
    }

    pub fn lowest_influence(&self, id: impl Into<LayerId>) -> Result<VertexId, InfluenceError> {
        self.layer(id)?.lowest_influence().map(|(vertex, _)| vertex)
    }

    /// Influence-weighted centroid of a layer, `None` when it holds no positive weight.
    pub fn avg_position(&self, id: impl Into<LayerId>) -> Result<Option<Vec2>, InfluenceError> {
        weighted_centroid(self.layer(id)?, self.graph)
    }

    pub fn multiply_layer(&mut self, id: impl Into<LayerId>, factor: f32) -> Result<(), InfluenceError> {
        check_finite("factor", factor)?;
        self.layer_mut(id)?.multiply(factor);
        Ok(())
    }

    /// `dst += src` between two registered layers.
    pub fn add_layers(
        &mut self,
        dst: impl Into<LayerId>,
        src: impl Into<LayerId>,
    ) -> Result<(), InfluenceError> {
        let (dst, src) = (dst.into(), src.into());
        self.store.get(dst)?;
        let other = self.layer(src)?.clone();
        self.layer_mut(dst)?.add_layer(&other);
        Ok(())
    }

    /// `dst -= src` between two registered layers.
    pub fn subtract_layers(
        &mut self,
        dst: impl Into<LayerId>,
        src: impl Into<LayerId>,
    ) -> Result<(), InfluenceError> {
        let (dst, src) = (dst.into(), src.into());
        self.store.get(dst)?;
        let other = self.layer(src)?.clone();
        self.layer_mut(dst)?.subtract_layer(&other);
        Ok(())
    }

    pub(crate) fn resolve_vertex(&self, pos: Vec2) -> Result<VertexId, InfluenceError> {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return Err(InfluenceError::InvalidParameter {
                name: "position",
                value: if pos.x.is_finite() { pos.y } else { pos.x },
            });
        }
        self.graph
            .nearest_vertex(pos)
            .ok_or(InfluenceError::EmptyGraph)
    }

    pub(crate) fn flood_params(&self, iterations: usize) -> FloodParams {
        FloodParams {
            iterations,
            max_cells: self.engine.max_heat_cells,
            decay: self.engine.decay,
            prune_threshold: self.engine.prune_threshold,
        }
    }
}

fn check_finite(name: &'static str, value: f32) -> Result<f32, InfluenceError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InfluenceError::InvalidParameter { name, value })
    }
}
