//! Rendering and camera configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,

    /// Device pixel ratio cap (HiDPI screens beyond this render at this ratio)
    pub max_pixel_ratio: f32,

    /// Point sprite size in logical pixels before pixel ratio and per-particle scale
    pub base_point_size: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 100.0,
            max_pixel_ratio: 2.0,
            base_point_size: 30.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }

    /// Effective pixel ratio for a window scale factor
    pub fn pixel_ratio(&self, scale_factor: f64) -> f32 {
        (scale_factor as f32).min(self.max_pixel_ratio)
    }

    /// Point size uniform for a window scale factor
    pub fn point_size(&self, scale_factor: f64) -> f32 {
        self.base_point_size * self.pixel_ratio(scale_factor)
    }
}

/// Orbit camera parameters
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// Initial eye position
    pub position: [f32; 3],

    /// Orbit center / look-at point
    pub target: [f32; 3],

    /// Auto-rotation speed; 1.0 = one full turn per minute
    pub auto_rotate_speed: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            position: [-2.5, 0.5, 3.0],
            target: [0.0, 0.0, 0.0],
            auto_rotate_speed: 0.025,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_is_capped() {
        let config = RenderConfig::default();
        assert_eq!(config.pixel_ratio(1.0), 1.0);
        assert_eq!(config.pixel_ratio(1.5), 1.5);
        assert_eq!(config.pixel_ratio(3.0), 2.0);
    }

    #[test]
    fn test_point_size_follows_density() {
        let config = RenderConfig::default();
        assert_eq!(config.point_size(1.0), 30.0);
        assert_eq!(config.point_size(2.0), 60.0);
        assert_eq!(config.point_size(4.0), 60.0);
    }
}
