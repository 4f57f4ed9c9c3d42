//! Command-line argument parsing.

use clap::Parser;

use crate::params::{
    AssetPaths, GalaxyParameters, LightRig, Rgb, SpacecraftPlacement, TuningField, TuningPanel,
    Tunables,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Galaxy Drift")]
#[command(about = "Audio-reactive spiral galaxy with a drifting spacecraft", long_about = None)]
pub struct Args {
    /// Number of particles (100-1000000)
    #[arg(long)]
    pub count: Option<usize>,

    /// Galaxy radius (0.01-20)
    #[arg(long)]
    pub radius: Option<f32>,

    /// Number of spiral arms (2-20)
    #[arg(long)]
    pub branches: Option<u32>,

    /// Scatter around the arms (0-2)
    #[arg(long)]
    pub randomness: Option<f32>,

    /// Scatter exponent; higher keeps particles tighter to the arms (1-10)
    #[arg(long)]
    pub randomness_power: Option<f32>,

    /// Core color
    #[arg(long, value_name = "#RRGGBB")]
    pub inside_color: Option<Rgb>,

    /// Rim color
    #[arg(long, value_name = "#RRGGBB")]
    pub outside_color: Option<Rgb>,

    /// Seed for a reproducible point cloud
    #[arg(long)]
    pub seed: Option<u64>,

    /// Track to play; without one the galaxy runs silent
    #[arg(long, value_name = "FILE")]
    pub audio: Option<String>,

    /// Start playback immediately instead of waiting for Space
    #[arg(long)]
    pub autoplay: bool,

    /// Spacecraft glTF model
    #[arg(long, value_name = "FILE")]
    pub model: Option<String>,

    /// Baked spacecraft texture
    #[arg(long, value_name = "FILE")]
    pub texture: Option<String>,

    /// Lens flare texture
    #[arg(long, value_name = "FILE")]
    pub flare: Option<String>,
}

impl Args {
    /// Galaxy parameters with overrides applied, constrained like the tuning panel
    pub fn galaxy_parameters(&self) -> GalaxyParameters {
        let mut galaxy = GalaxyParameters::default();
        let mut lights = LightRig::default();
        let mut placement = SpacecraftPlacement::default();
        let mut camera = [0.0; 3];
        let mut tunables = Tunables {
            galaxy: &mut galaxy,
            lights: &mut lights,
            placement: &mut placement,
            camera: &mut camera,
        };

        let overrides = [
            (TuningField::Count, self.count.map(|v| v as f64)),
            (TuningField::Radius, self.radius.map(f64::from)),
            (TuningField::Branches, self.branches.map(f64::from)),
            (TuningField::Randomness, self.randomness.map(f64::from)),
            (TuningField::RandomnessPower, self.randomness_power.map(f64::from)),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                TuningPanel::commit_value(field, value, &mut tunables);
            }
        }

        if let Some(color) = self.inside_color {
            galaxy.inside_color = color;
        }
        if let Some(color) = self.outside_color {
            galaxy.outside_color = color;
        }

        galaxy
    }

    pub fn asset_paths(&self) -> AssetPaths {
        let defaults = AssetPaths::default();
        AssetPaths {
            model: self.model.clone().unwrap_or(defaults.model),
            baked_texture: self.texture.clone().unwrap_or(defaults.baked_texture),
            flare_texture: self.flare.clone().unwrap_or(defaults.flare_texture),
        }
    }
}
