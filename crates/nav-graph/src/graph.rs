//! Graph Provider contract and a concrete adjacency-list graph.
//!
//! The influence engine only ever borrows a [`NavGraph`]; hosts with their
//! own navmesh implement the trait, everyone else can use [`AdjacencyGraph`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Identifier of a navigation vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u32> for VertexId {
    fn from(id: u32) -> Self {
        VertexId(id)
    }
}

/// Read-only view of a navigation graph.
///
/// Implementations must be cheap to query: the engine calls `neighbors`
/// once per populated vertex per propagation pass.
pub trait NavGraph {
    /// Number of vertices in the graph.
    fn vertex_count(&self) -> usize;

    /// World position of a vertex, `None` if the id is unknown.
    fn position(&self, vertex: VertexId) -> Option<Vec2>;

    /// Adjacent vertices. Unknown ids have no neighbors.
    fn neighbors(&self, vertex: VertexId) -> &[VertexId];

    /// Vertex closest to `point`, `None` only when the graph is empty.
    fn nearest_vertex(&self, point: Vec2) -> Option<VertexId>;

    fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }
}

/// Errors raised while building or loading an [`AdjacencyGraph`].
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    #[error("self-loop on vertex {0}")]
    SelfLoop(VertexId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A vertex of an [`AdjacencyGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavVertex {
    /// World position
    pub position: Vec2,
    /// Adjacent vertex IDs (undirected)
    #[serde(default)]
    pub neighbors: Vec<VertexId>,
}

/// Undirected graph stored as adjacency lists, vertex ids are dense indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjacencyGraph {
    vertices: Vec<NavVertex>,
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight line of `len` vertices along +x, `spacing` apart.
    pub fn chain(len: usize, spacing: f32) -> Self {
        let mut graph = Self::new();
        for i in 0..len {
            let id = graph.add_vertex(Vec2::new(i as f32 * spacing, 0.0));
            if i > 0 {
                graph.link(VertexId(id.0 - 1), id);
            }
        }
        graph
    }

    /// 4-connected `width` x `height` grid. Vertex `(x, y)` has id `y * width + x`.
    pub fn grid(width: usize, height: usize, spacing: f32) -> Self {
        let mut graph = Self::new();
        for y in 0..height {
            for x in 0..width {
                let id = graph.add_vertex(Vec2::new(x as f32 * spacing, y as f32 * spacing));
                if x > 0 {
                    graph.link(VertexId(id.0 - 1), id);
                }
                if y > 0 {
                    graph.link(VertexId(id.0 - width as u32), id);
                }
            }
        }
        graph
    }

    /// Add an unconnected vertex and return its id
    pub fn add_vertex(&mut self, position: Vec2) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(NavVertex {
            position,
            neighbors: Vec::new(),
        });
        id
    }

    /// Connect two vertices in both directions. Connecting twice is a no-op.
    pub fn connect(&mut self, a: VertexId, b: VertexId) -> Result<(), GraphError> {
        for id in [a, b] {
            if self.vertex(id).is_none() {
                return Err(GraphError::UnknownVertex(id));
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        self.link(a, b);
        Ok(())
    }

    fn link(&mut self, a: VertexId, b: VertexId) {
        if !self.vertices[a.index()].neighbors.contains(&b) {
            self.vertices[a.index()].neighbors.push(b);
        }
        if !self.vertices[b.index()].neighbors.contains(&a) {
            self.vertices[b.index()].neighbors.push(a);
        }
    }

    /// Get a vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&NavVertex> {
        self.vertices.get(id.index())
    }

    /// Get all vertex IDs
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len() as u32).map(VertexId)
    }

    /// Check if two vertices are adjacent
    pub fn are_adjacent(&self, a: VertexId, b: VertexId) -> bool {
        self.vertex(a)
            .map(|v| v.neighbors.contains(&b))
            .unwrap_or(false)
    }

    /// Hop distance between two vertices (simple BFS)
    pub fn hop_distance(&self, from: VertexId, to: VertexId) -> Option<usize> {
        self.vertex(from)?;
        if from == to {
            return Some(0);
        }

        let mut visited = HashMap::new();
        let mut queue = VecDeque::new();

        visited.insert(from, 0usize);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            let hops = visited[&current];
            for &next in self.neighbors(current) {
                if next == to {
                    return Some(hops + 1);
                }
                if !visited.contains_key(&next) {
                    visited.insert(next, hops + 1);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    /// Check that every edge points at a known vertex and is mirrored.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (index, vertex) in self.vertices.iter().enumerate() {
            let id = VertexId(index as u32);
            for &next in &vertex.neighbors {
                if next == id {
                    return Err(GraphError::SelfLoop(id));
                }
                let other = self.vertex(next).ok_or(GraphError::UnknownVertex(next))?;
                if !other.neighbors.contains(&id) {
                    return Err(GraphError::UnknownVertex(next));
                }
            }
        }
        Ok(())
    }

    /// Loads a graph from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses and validates a graph from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, GraphError> {
        let graph: AdjacencyGraph = serde_json::from_str(content)?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl NavGraph for AdjacencyGraph {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn position(&self, vertex: VertexId) -> Option<Vec2> {
        self.vertex(vertex).map(|v| v.position)
    }

    fn neighbors(&self, vertex: VertexId) -> &[VertexId] {
        self.vertex(vertex)
            .map(|v| v.neighbors.as_slice())
            .unwrap_or(&[])
    }

    fn nearest_vertex(&self, point: Vec2) -> Option<VertexId> {
        self.vertices
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_squared(point)
                    .total_cmp(&b.position.distance_squared(point))
            })
            .map(|(index, _)| VertexId(index as u32))
    }
}
