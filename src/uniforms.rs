//! Per-frame shader uniforms and the frame clock.
//!
//! The galaxy animates entirely on the GPU: each frame only the four scalars
//! in [`ShaderUniforms`] change, never the particle attributes.

use bytemuck::{Pod, Zeroable};
use std::time::Instant;

use crate::audio::FrequencyBins;

/// Galaxy material uniforms (matches `Galaxy` in galaxy.wgsl)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    /// Seconds since the first frame
    pub time: f32,
    /// Point sprite size in physical pixels
    pub point_size: f32,
    /// Low frequency bin, 0-255
    pub audio_low: f32,
    /// High frequency bin, 0-255
    pub audio_high: f32,
}

impl ShaderUniforms {
    /// Fresh uniforms for a new material
    pub fn new(point_size: f32) -> Self {
        Self {
            point_size,
            ..Self::default()
        }
    }

    /// Uniform values for one frame
    pub fn for_frame(elapsed_s: f32, bins: FrequencyBins, point_size: f32) -> Self {
        Self {
            time: elapsed_s,
            point_size,
            audio_low: bins.low as f32,
            audio_high: bins.high as f32,
        }
    }

    /// Write this frame's values; point size stays what the material was created with
    pub fn update(&mut self, elapsed_s: f32, bins: FrequencyBins) {
        *self = Self::for_frame(elapsed_s, bins, self.point_size);
    }
}

/// Camera uniforms shared by all passes (matches `Camera` in the shaders)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Surface size in physical pixels
    pub viewport: [f32; 2],
    pub _padding: [f32; 2], // Padding for alignment
}

impl CameraUniforms {
    pub fn new(view_proj: glam::Mat4, width: u32, height: u32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            viewport: [width as f32, height as f32],
            _padding: [0.0; 2],
        }
    }
}

/// Timing for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub elapsed_s: f32,
    pub delta_s: f32,
}

/// Monotonic clock started by the first frame
#[derive(Debug, Default)]
pub struct FrameClock {
    start: Option<Instant>,
    last_elapsed_s: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advance to `now`. The first call reads 0; elapsed never decreases.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let elapsed_s = now
            .checked_duration_since(start)
            .map(|d| d.as_secs_f32())
            .unwrap_or(0.0)
            .max(self.last_elapsed_s);

        let delta_s = elapsed_s - self.last_elapsed_s;
        self.last_elapsed_s = elapsed_s;

        FrameTime { elapsed_s, delta_s }
    }
}
