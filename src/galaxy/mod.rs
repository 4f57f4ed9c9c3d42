//! Spiral galaxy point cloud: generation and ownership.

mod generator;
mod system;

// Re-export public types
pub use generator::{branch_angle, generate};
pub use system::GalaxySystem;

/// Per-particle attributes uploaded for one draw call.
///
/// Flat, index-aligned arrays: particle `i` owns `positions[3i..3i+3]`,
/// `colors[3i..3i+3]`, `randomness[3i..3i+3]` and `scales[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleBuffer {
    /// Base spiral positions (y is always 0)
    pub positions: Vec<f32>,
    /// RGB per particle
    pub colors: Vec<f32>,
    /// Offsets added in the vertex shader
    pub randomness: Vec<f32>,
    /// Size/brightness factor in [0, 1]
    pub scales: Vec<f32>,
}

impl ParticleBuffer {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
            randomness: Vec::with_capacity(count * 3),
            scales: Vec::with_capacity(count),
        }
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}
