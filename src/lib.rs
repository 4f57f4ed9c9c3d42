//! Galaxy Drift library - audio-reactive spiral galaxy scene

pub mod assets;
pub mod audio;
pub mod camera;
pub mod cli;
pub mod error;
pub mod galaxy;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod uniforms;
