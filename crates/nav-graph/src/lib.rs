//! Navigation graph types shared by the influence engine and its hosts.
//!
//! This crate contains pure data structures with no influence logic.
//! It is a dependency for all other crates in the workspace.

pub mod graph;

// Re-export graph types
pub use graph::{AdjacencyGraph, GraphError, NavGraph, NavVertex, VertexId};

// Positions are glam vectors
pub use glam::Vec2;
