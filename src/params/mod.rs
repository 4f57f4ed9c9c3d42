//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers of the scene live here with:
//! - Units (world units, seconds, pixels, dBFS)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod galaxy;
mod render;
mod scene;
pub mod tuning;

// Re-export all types
pub use audio::AnalyserConfig;
pub use galaxy::{AxisSpread, GalaxyParameters, Rgb};
pub use render::{CameraRig, RenderConfig};
pub use scene::{AssetPaths, DriftGroup, LightRig, SpacecraftPlacement};
pub use tuning::{Axis, Commit, FieldRange, TuningField, TuningPanel, Tunables};
