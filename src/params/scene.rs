//! Spacecraft placement, drift group and light rig.

/// Fixed transform applied to the loaded spacecraft model
#[derive(Debug, Clone)]
pub struct SpacecraftPlacement {
    /// Euler rotation (radians, XYZ order)
    pub rotation: [f32; 3],

    /// Position inside the drift group
    pub position: [f32; 3],

    /// Uniform scale (model is authored in centimeters)
    pub scale: f32,
}

impl Default for SpacecraftPlacement {
    fn default() -> Self {
        Self {
            rotation: [0.0, 3.61, 0.0],
            position: [-2.6, 0.4, 2.4],
            scale: 0.01,
        }
    }
}

/// Slow rotation of the group holding the spacecraft and its light
#[derive(Debug, Clone)]
pub struct DriftGroup {
    /// Y rotation at t = 0 (radians)
    pub initial_yaw: f32,

    /// Yaw change per second (radians, negative = clockwise from above)
    pub yaw_rate: f32,
}

impl Default for DriftGroup {
    fn default() -> Self {
        Self {
            initial_yaw: 0.1,
            yaw_rate: -0.0025,
        }
    }
}

/// Point light riding with the spacecraft plus a spot light from the galaxy core
#[derive(Debug, Clone)]
pub struct LightRig {
    /// Point light position inside the drift group
    pub point_position: [f32; 3],

    pub point_intensity: f32,

    /// Spot light position (world)
    pub spot_position: [f32; 3],

    /// Spot light aim point (world)
    pub spot_target: [f32; 3],

    /// Cone half-angle (radians)
    pub spot_angle: f32,

    /// Tunable within 0..=1000
    pub spot_intensity: f32,

    /// Lens flare sprite size (pixels)
    pub flare_size_px: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            point_position: [-2.57, 0.39, 2.46],
            point_intensity: 20.0,
            spot_position: [0.0, 0.0, 0.0],
            spot_target: [-2.57, 0.39, 2.46],
            spot_angle: std::f32::consts::FRAC_PI_3,
            spot_intensity: 1.0,
            flare_size_px: 512.0,
        }
    }
}

/// Asset locations
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub model: String,
    pub baked_texture: String,
    pub flare_texture: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            model: "assets/Challenger.gltf".to_string(),
            baked_texture: "assets/Challenger_Blue.png".to_string(),
            flare_texture: "assets/lensflare4.png".to_string(),
        }
    }
}
