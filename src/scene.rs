//! Scene graph around the galaxy: drifting spacecraft group and lights.

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::params::{DriftGroup, LightRig, SpacecraftPlacement};

/// Spacecraft presence in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpacecraftSlot {
    /// Model still loading; nothing is drawn
    #[default]
    Placeholder,
    /// Model installed on the GPU
    Loaded { triangles: usize },
    /// Load failed; the scene carries on without it
    Unavailable,
}

impl SpacecraftSlot {
    pub fn is_drawable(self) -> bool {
        matches!(self, SpacecraftSlot::Loaded { .. })
    }
}

/// Lights as seen by the spacecraft shader (world space)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniforms {
    /// xyz = position, w = intensity
    pub point: [f32; 4],
    /// xyz = position, w = intensity
    pub spot_position: [f32; 4],
    /// xyz = normalized direction, w = cos(cone half-angle)
    pub spot_direction: [f32; 4],
}

/// Spacecraft, point light and lens flare share one slowly turning group
pub struct SceneSystem {
    placement: SpacecraftPlacement,
    drift: DriftGroup,
    lights: LightRig,
    pub spacecraft: SpacecraftSlot,
    /// Current group yaw (radians)
    yaw: f32,
}

impl SceneSystem {
    pub fn new(placement: SpacecraftPlacement, drift: DriftGroup, lights: LightRig) -> Self {
        let yaw = drift.initial_yaw;
        Self {
            placement,
            drift,
            lights,
            spacecraft: SpacecraftSlot::default(),
            yaw,
        }
    }

    /// Set the group rotation for the current time
    pub fn update(&mut self, elapsed_s: f32) {
        self.yaw = self.drift.initial_yaw + self.drift.yaw_rate * elapsed_s;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// Tunable spacecraft placement and lights, borrowed together
    pub fn tunables_mut(&mut self) -> (&mut SpacecraftPlacement, &mut LightRig) {
        (&mut self.placement, &mut self.lights)
    }

    /// Drift group transform
    pub fn group_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw)
    }

    /// World transform of the spacecraft model
    pub fn spacecraft_matrix(&self) -> Mat4 {
        let [rx, ry, rz] = self.placement.rotation;
        let local = Mat4::from_scale_rotation_translation(
            Vec3::splat(self.placement.scale),
            Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
            Vec3::from_array(self.placement.position),
        );
        self.group_matrix() * local
    }

    /// Spacecraft transform for this frame; `None` while the slot has no model
    pub fn spacecraft_transform(&self) -> Option<Mat4> {
        self.spacecraft.is_drawable().then(|| self.spacecraft_matrix())
    }

    /// World position of the point light (and its flare)
    pub fn point_light_position(&self) -> Vec3 {
        self.group_matrix()
            .transform_point3(Vec3::from_array(self.lights.point_position))
    }

    pub fn light_uniforms(&self) -> LightUniforms {
        let spot_position = Vec3::from_array(self.lights.spot_position);
        let spot_direction =
            (Vec3::from_array(self.lights.spot_target) - spot_position).normalize_or_zero();

        LightUniforms {
            point: self
                .point_light_position()
                .extend(self.lights.point_intensity)
                .to_array(),
            spot_position: spot_position.extend(self.lights.spot_intensity).to_array(),
            spot_direction: spot_direction.extend(self.lights.spot_angle.cos()).to_array(),
        }
    }
}
