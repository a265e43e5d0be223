//! Error types for influence map operations.

use nav_graph::VertexId;
use thiserror::Error;

use crate::config::ConfigError;
use crate::registry::LayerId;

/// Errors that can occur in influence map operations.
///
/// Every variant indicates a caller bug rather than an expected runtime
/// condition; a failed call leaves the engine exactly as it was.
#[derive(Debug, Error)]
pub enum InfluenceError {
    /// Layer id was never registered
    #[error("unknown influence layer {0}")]
    UnknownLayer(LayerId),

    /// Extrema query on a layer with no entries
    #[error("influence layer is empty")]
    EmptyLayer,

    /// The navigation graph has no vertices to resolve a position to
    #[error("navigation graph is empty")]
    EmptyGraph,

    /// A layer references a vertex the graph does not know
    #[error("vertex {0} is not part of the navigation graph")]
    UnknownVertex(VertexId),

    /// Propagation requested on a caller-managed layer
    #[error("layer {0} is dynamic and cannot be propagated")]
    DynamicLayer(LayerId),

    /// Parameter outside its valid range
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// Configuration could not be loaded or failed validation
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl InfluenceError {
    /// Checks `value` is finite and within `[0, 1]`.
    pub(crate) fn check_unit(name: &'static str, value: f32) -> Result<f32, InfluenceError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(InfluenceError::InvalidParameter { name, value })
        }
    }
}
