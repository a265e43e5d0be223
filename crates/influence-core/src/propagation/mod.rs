//! Propagation Engine
//!
//! Spreads layer values across the navigation graph from populated vertices.
//! Both algorithms work on vertex ids only; world positions are resolved once
//! by the caller before propagation starts.

pub mod diffusion;
pub mod flood;

pub use diffusion::diffuse;
pub use flood::{flood, flood_with, FloodParams, FloodStats};

/// How a seeded value should spread after it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spread {
    /// Run propagation at all
    pub propagate: bool,
    /// Breadth-first flood instead of diffusion
    pub flood: bool,
    /// Diffusion passes, or flood hops
    pub iterations: usize,
}

impl Default for Spread {
    fn default() -> Self {
        Self {
            propagate: true,
            flood: false,
            iterations: 5,
        }
    }
}

impl Spread {
    /// Write the value only.
    pub fn none() -> Self {
        Self {
            propagate: false,
            ..Self::default()
        }
    }

    pub fn diffuse(iterations: usize) -> Self {
        Self {
            propagate: true,
            flood: false,
            iterations,
        }
    }

    pub fn flood(iterations: usize) -> Self {
        Self {
            propagate: true,
            flood: true,
            iterations,
        }
    }
}
