//! Slowly auto-rotating orbit camera.

use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

use crate::params::{CameraRig, RenderConfig};

/// Camera orbiting its target about the world Y axis
pub struct OrbitCamera {
    target: Vec3,
    /// Horizontal distance from the target
    radius: f32,
    /// Height above the target
    height: f32,
    /// Azimuth (radians, measured from +Z toward +X)
    theta: f32,
    /// Radians per second
    angular_speed: f32,
}

impl OrbitCamera {
    pub fn new(rig: &CameraRig) -> Self {
        let mut camera = Self {
            target: Vec3::from_array(rig.target),
            radius: 0.0,
            height: 0.0,
            theta: 0.0,
            angular_speed: TAU / 60.0 * rig.auto_rotate_speed,
        };
        camera.set_position(Vec3::from_array(rig.position));
        camera
    }

    /// Move the eye; the orbit continues from the new position
    pub fn set_position(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        self.radius = (offset.x * offset.x + offset.z * offset.z).sqrt();
        self.height = offset.y;
        self.theta = offset.x.atan2(offset.z).rem_euclid(TAU);
    }

    /// Advance the auto-rotation by `delta_s` seconds
    pub fn update(&mut self, delta_s: f32) {
        // Positive speed turns clockwise seen from above
        self.theta = (self.theta - self.angular_speed * delta_s).rem_euclid(TAU);
    }

    pub fn position(&self) -> Vec3 {
        self.target
            + Vec3::new(
                self.radius * self.theta.sin(),
                self.height,
                self.radius * self.theta.cos(),
            )
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn view_proj(&self, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let eye = self.position();

        let view = Mat4::look_at_rh(eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        );

        (proj * view, eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_radius(p: Vec3) -> f32 {
        (p.x * p.x + p.z * p.z).sqrt()
    }

    #[test]
    fn test_starts_at_rig_position() {
        let rig = CameraRig::default();
        let camera = OrbitCamera::new(&rig);
        let eye = camera.position();

        assert!((eye - Vec3::from_array(rig.position)).length() < 1e-5);
    }

    #[test]
    fn test_set_position_rebuilds_orbit() {
        let mut camera = OrbitCamera::new(&CameraRig::default());
        let eye = Vec3::new(4.0, -1.0, 0.0);
        camera.set_position(eye);
        assert!((camera.position() - eye).length() < 1e-5);

        // Quarter turn later: same radius and height, swung round the Y axis
        camera.update(15.0 / 0.025);
        let later = camera.position();
        assert!((horizontal_radius(later) - 4.0).abs() < 1e-4);
        assert!((later.y + 1.0).abs() < 1e-6);
        assert!(later.x.abs() < 1e-3);
        assert!((later.z - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_preserves_radius_and_height() {
        let rig = CameraRig::default();
        let mut camera = OrbitCamera::new(&rig);
        let start = camera.position();

        for _ in 0..1000 {
            camera.update(0.5);
        }
        let eye = camera.position();

        assert!((horizontal_radius(eye) - horizontal_radius(start)).abs() < 1e-4);
        assert!((eye.y - start.y).abs() < 1e-6);
        assert!((eye - start).length() > 1e-3);
    }

    #[test]
    fn test_full_turn_period() {
        // Speed 1.0 is one revolution per minute
        let rig = CameraRig {
            auto_rotate_speed: 1.0,
            ..CameraRig::default()
        };
        let mut camera = OrbitCamera::new(&rig);
        let start = camera.position();

        camera.update(30.0);
        let half = camera.position();
        assert!((half.x + start.x).abs() < 1e-3);
        assert!((half.z + start.z).abs() < 1e-3);

        camera.update(30.0);
        assert!((camera.position() - start).length() < 1e-3);
    }

    #[test]
    fn test_zero_speed_is_static() {
        let rig = CameraRig {
            auto_rotate_speed: 0.0,
            ..CameraRig::default()
        };
        let mut camera = OrbitCamera::new(&rig);
        let start = camera.position();
        camera.update(100.0);
        assert_eq!(camera.position(), start);
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = OrbitCamera::new(&CameraRig::default());
        let (view_proj, eye) = camera.view_proj(&RenderConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);
        assert!(eye.is_finite());

        // Target lands in the middle of the screen
        let clip = view_proj * Vec3::ZERO.extend(1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
