//! Spatial influence maps over a navigation graph.
//!
//! Named scalar layers live on the vertices of a navigation graph. Values are
//! seeded at world positions, spread by diffusion or flood fill, decayed every
//! frame, and queried for extrema and centroids by AI decision code.
//!
//! # Modules
//!
//! - [`registry`]: Influence type identifiers and names
//! - [`layer`]: Sparse fields and their algebra
//! - [`propagation`]: Diffusion and flood-fill spreading
//! - [`decay`]: Frame-rate independent decay
//! - [`query`]: Centroid queries
//! - [`sight`]: Lost-sight target prediction
//! - [`engine`]: The [`InfluenceMap`] tying it all together
//!
//! # Example
//!
//! ```
//! use influence_core::{InfluenceMap, InfluenceType, Spread};
//! use nav_graph::{AdjacencyGraph, Vec2};
//!
//! let graph = AdjacencyGraph::chain(5, 1.0);
//! let mut map = InfluenceMap::new(&graph);
//! let threat = map.register_type("Threat", true);
//!
//! map.add_static_influence(Vec2::new(2.0, 0.0), threat, 1.0, Spread::flood(2)).unwrap();
//! map.update(1.0 / 60.0).unwrap();
//!
//! let hottest = map.highest_influence(threat).unwrap();
//! assert_eq!(hottest.0, 2);
//! assert!(map.avg_position(InfluenceType::Search).unwrap().is_none());
//! ```

pub mod config;
pub mod decay;
pub mod engine;
pub mod error;
pub mod layer;
pub mod propagation;
pub mod query;
pub mod registry;
pub mod sight;
pub mod snapshot;
pub mod store;

pub use config::{default_config_toml, ConfigError, EngineConfig, InfluenceConfig, SightConfig};
pub use engine::InfluenceMap;
pub use error::InfluenceError;
pub use layer::Layer;
pub use propagation::{FloodParams, FloodStats, Spread};
pub use registry::{InfluenceType, LayerId, TypeInfo, TypeRegistry};
pub use sight::SightState;
pub use snapshot::{InfluenceSnapshot, LayerSummary};
pub use store::LayerStore;

// Re-export graph types so hosts need only one import
pub use nav_graph::{AdjacencyGraph, NavGraph, Vec2, VertexId};
