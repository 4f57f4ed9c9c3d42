//! Galaxy ownership: the single parameter set and its current buffer.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::generator::generate;
use super::ParticleBuffer;
use crate::params::GalaxyParameters;

/// Owns the galaxy parameters and the particle buffer derived from them
pub struct GalaxySystem {
    params: GalaxyParameters,
    buffer: ParticleBuffer,
    /// Incremented on every regeneration; lets the renderer detect stale uploads
    generation: u64,
    rng: SmallRng,
}

impl GalaxySystem {
    /// Create the system and generate the first buffer.
    ///
    /// With a seed the point cloud is reproducible across runs.
    pub fn new(params: GalaxyParameters, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let buffer = generate(&params, &mut rng);
        log::info!(
            "Galaxy generated: {} particles, {} branches, radius {}",
            params.count,
            params.branches,
            params.radius
        );

        Self {
            params,
            buffer,
            generation: 0,
            rng,
        }
    }

    pub fn params(&self) -> &GalaxyParameters {
        &self.params
    }

    /// Mutable parameters; call [`GalaxySystem::regenerate`] after committing changes
    pub fn params_mut(&mut self) -> &mut GalaxyParameters {
        &mut self.params
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rebuild the buffer from the current parameters.
    ///
    /// The new buffer is fully built before it replaces the old one, which is
    /// handed back to the caller to release.
    pub fn regenerate(&mut self) -> ParticleBuffer {
        let fresh = generate(&self.params, &mut self.rng);
        self.generation += 1;
        log::debug!(
            "Galaxy regenerated (generation {}): {} particles",
            self.generation,
            fresh.len()
        );
        std::mem::replace(&mut self.buffer, fresh)
    }
}
