//! Background track playback and spectrum sampling.
//!
//! Plays a track through rodio while a tap feeds the most recent samples to a
//! small spectrum analyser; the render loop samples two bins per frame.

mod analyser;
mod controls;
mod sampler;
mod system;

// Re-export public types
pub use analyser::{blackman_window, FrequencyAnalyser, SampleWindow};
pub use controls::{PlaybackAction, PlaybackControls};
pub use sampler::{pick_bins, AudioSampler, FrequencyBins, SilentSampler};
pub use system::PlaybackSystem;
