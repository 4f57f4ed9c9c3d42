//! Tuning panel: bounded fields bound to galaxy, light, spacecraft and camera
//! parameters.
//!
//! Every field declares a `{min, max, step}` range. Committing a value snaps it
//! to the step grid, clamps it into range, writes it into the bound struct and
//! reports what has to be rebuilt.

use super::galaxy::{GalaxyParameters, Rgb};
use super::scene::{LightRig, SpacecraftPlacement};

/// Numeric range of a tunable field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Snap to the step grid, then clamp into range
    pub fn constrain(&self, value: f64) -> f64 {
        let snapped = (value / self.step).round() * self.step;
        // Round away multiply noise (0.1 * 3 = 0.30000000000000004)
        let scale = 10f64.powi(self.decimals());
        ((snapped * scale).round() / scale).clamp(self.min, self.max)
    }

    /// Decimal places in the step (0.001 -> 3)
    fn decimals(&self) -> i32 {
        let mut scaled = self.step;
        let mut decimals = 0;
        while (scaled - scaled.round()).abs() > 1e-9 && decimals < 12 {
            scaled *= 10.0;
            decimals += 1;
        }
        decimals
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Fields exposed by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningField {
    Count,
    Radius,
    Branches,
    Randomness,
    RandomnessPower,
    InsideColor,
    OutsideColor,
    SpotIntensity,
    /// Spacecraft Euler rotation (radians)
    SpacecraftRotation(Axis),
    /// Spacecraft position inside the drift group
    SpacecraftPosition(Axis),
    /// Camera eye position (world)
    CameraPosition(Axis),
}

impl TuningField {
    pub const ALL: [TuningField; 17] = [
        TuningField::Count,
        TuningField::Radius,
        TuningField::Branches,
        TuningField::Randomness,
        TuningField::RandomnessPower,
        TuningField::InsideColor,
        TuningField::OutsideColor,
        TuningField::SpotIntensity,
        TuningField::SpacecraftRotation(Axis::X),
        TuningField::SpacecraftRotation(Axis::Y),
        TuningField::SpacecraftRotation(Axis::Z),
        TuningField::SpacecraftPosition(Axis::X),
        TuningField::SpacecraftPosition(Axis::Y),
        TuningField::SpacecraftPosition(Axis::Z),
        TuningField::CameraPosition(Axis::X),
        TuningField::CameraPosition(Axis::Y),
        TuningField::CameraPosition(Axis::Z),
    ];

    pub fn label(self) -> &'static str {
        match self {
            TuningField::Count => "count",
            TuningField::Radius => "radius",
            TuningField::Branches => "branches",
            TuningField::Randomness => "randomness",
            TuningField::RandomnessPower => "randomnessPower",
            TuningField::InsideColor => "insideColor",
            TuningField::OutsideColor => "outsideColor",
            TuningField::SpotIntensity => "Light Intensity",
            TuningField::SpacecraftRotation(Axis::X) => "GLTF Rotate X",
            TuningField::SpacecraftRotation(Axis::Y) => "GLTF Rotate Y",
            TuningField::SpacecraftRotation(Axis::Z) => "GLTF Rotate Z",
            TuningField::SpacecraftPosition(Axis::X) => "GLTF Position X",
            TuningField::SpacecraftPosition(Axis::Y) => "GLTF Position Y",
            TuningField::SpacecraftPosition(Axis::Z) => "GLTF Position Z",
            TuningField::CameraPosition(Axis::X) => "Camera X",
            TuningField::CameraPosition(Axis::Y) => "Camera Y",
            TuningField::CameraPosition(Axis::Z) => "Camera Z",
        }
    }

    /// Declared range; `None` for the unconstrained color pickers
    pub fn range(self) -> Option<FieldRange> {
        match self {
            TuningField::Count => Some(FieldRange::new(100.0, 1_000_000.0, 100.0)),
            TuningField::Radius => Some(FieldRange::new(0.01, 20.0, 0.01)),
            TuningField::Branches => Some(FieldRange::new(2.0, 20.0, 1.0)),
            TuningField::Randomness => Some(FieldRange::new(0.0, 2.0, 0.001)),
            TuningField::RandomnessPower => Some(FieldRange::new(1.0, 10.0, 0.001)),
            TuningField::SpotIntensity => Some(FieldRange::new(0.0, 1000.0, 1.0)),
            TuningField::SpacecraftRotation(_) => Some(FieldRange::new(0.0, 10.0, 0.001)),
            TuningField::SpacecraftPosition(_) => Some(FieldRange::new(-10.0, 10.0, 0.01)),
            TuningField::CameraPosition(_) => Some(FieldRange::new(-10.0, 10.0, 0.1)),
            TuningField::InsideColor | TuningField::OutsideColor => None,
        }
    }
}

/// What a commit requires from the owner of the bound parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Value unchanged after constraining
    Unchanged,
    /// Galaxy buffers must be rebuilt
    RegenerateGalaxy,
    /// Light uniforms changed, geometry untouched
    UpdateLights,
    /// Spacecraft transform changed
    UpdateSpacecraft,
    /// Camera eye moved; the orbit must be rebuilt around it
    UpdateCamera,
}

/// Parameters the panel writes into
pub struct Tunables<'a> {
    pub galaxy: &'a mut GalaxyParameters,
    pub lights: &'a mut LightRig,
    pub placement: &'a mut SpacecraftPlacement,
    pub camera: &'a mut [f32; 3],
}

/// Keyboard-driven parameter panel (hidden by default)
#[derive(Debug, Clone, Copy, Default)]
pub struct TuningPanel {
    visible: bool,
    selected: usize,
}

impl TuningPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn selected(&self) -> TuningField {
        TuningField::ALL[self.selected]
    }

    pub fn select_next(&mut self) -> TuningField {
        self.selected = (self.selected + 1) % TuningField::ALL.len();
        self.selected()
    }

    pub fn select_previous(&mut self) -> TuningField {
        self.selected = (self.selected + TuningField::ALL.len() - 1) % TuningField::ALL.len();
        self.selected()
    }

    /// Current value of a numeric field
    pub fn value(field: TuningField, tunables: &Tunables<'_>) -> Option<f64> {
        let value = match field {
            TuningField::Count => return Some(tunables.galaxy.count as f64),
            TuningField::Branches => return Some(tunables.galaxy.branches as f64),
            TuningField::Radius => tunables.galaxy.radius,
            TuningField::Randomness => tunables.galaxy.randomness,
            TuningField::RandomnessPower => tunables.galaxy.randomness_power,
            TuningField::SpotIntensity => tunables.lights.spot_intensity,
            TuningField::SpacecraftRotation(axis) => tunables.placement.rotation[axis.index()],
            TuningField::SpacecraftPosition(axis) => tunables.placement.position[axis.index()],
            TuningField::CameraPosition(axis) => tunables.camera[axis.index()],
            TuningField::InsideColor | TuningField::OutsideColor => return None,
        };
        Some(value as f64)
    }

    /// Commit a numeric value to a field
    pub fn commit_value(field: TuningField, value: f64, tunables: &mut Tunables<'_>) -> Commit {
        let Some(range) = field.range() else {
            return Commit::Unchanged;
        };
        let value = range.constrain(value);
        let single = value as f32;

        let (changed, commit) = match field {
            TuningField::Count => (
                replace(&mut tunables.galaxy.count, value as usize),
                Commit::RegenerateGalaxy,
            ),
            TuningField::Radius => (
                replace(&mut tunables.galaxy.radius, single),
                Commit::RegenerateGalaxy,
            ),
            TuningField::Branches => (
                replace(&mut tunables.galaxy.branches, value as u32),
                Commit::RegenerateGalaxy,
            ),
            TuningField::Randomness => (
                replace(&mut tunables.galaxy.randomness, single),
                Commit::RegenerateGalaxy,
            ),
            TuningField::RandomnessPower => (
                replace(&mut tunables.galaxy.randomness_power, single),
                Commit::RegenerateGalaxy,
            ),
            TuningField::SpotIntensity => (
                replace(&mut tunables.lights.spot_intensity, single),
                Commit::UpdateLights,
            ),
            TuningField::SpacecraftRotation(axis) => (
                replace(&mut tunables.placement.rotation[axis.index()], single),
                Commit::UpdateSpacecraft,
            ),
            TuningField::SpacecraftPosition(axis) => (
                replace(&mut tunables.placement.position[axis.index()], single),
                Commit::UpdateSpacecraft,
            ),
            TuningField::CameraPosition(axis) => (
                replace(&mut tunables.camera[axis.index()], single),
                Commit::UpdateCamera,
            ),
            TuningField::InsideColor | TuningField::OutsideColor => (false, Commit::Unchanged),
        };

        if changed {
            commit
        } else {
            Commit::Unchanged
        }
    }

    /// Commit a color to one of the color fields
    pub fn commit_color(field: TuningField, color: Rgb, galaxy: &mut GalaxyParameters) -> Commit {
        let slot = match field {
            TuningField::InsideColor => &mut galaxy.inside_color,
            TuningField::OutsideColor => &mut galaxy.outside_color,
            _ => return Commit::Unchanged,
        };
        if replace(slot, color) {
            Commit::RegenerateGalaxy
        } else {
            Commit::Unchanged
        }
    }

    /// Step the selected field by `steps` increments (colors rotate hue by 30° per step)
    pub fn step_selected(&self, steps: i32, tunables: &mut Tunables<'_>) -> Commit {
        let field = self.selected();
        match field {
            TuningField::InsideColor => {
                let color = tunables.galaxy.inside_color.rotate_hue(30.0 * steps as f32);
                Self::commit_color(field, color, tunables.galaxy)
            }
            TuningField::OutsideColor => {
                let color = tunables.galaxy.outside_color.rotate_hue(30.0 * steps as f32);
                Self::commit_color(field, color, tunables.galaxy)
            }
            _ => {
                let (Some(range), Some(current)) = (field.range(), Self::value(field, tunables))
                else {
                    return Commit::Unchanged;
                };
                Self::commit_value(field, current + range.step * steps as f64, tunables)
            }
        }
    }

    /// One-line description of a field and its current value
    pub fn describe(field: TuningField, tunables: &Tunables<'_>) -> String {
        match field {
            TuningField::InsideColor => {
                format!("{}: {}", field.label(), tunables.galaxy.inside_color)
            }
            TuningField::OutsideColor => {
                format!("{}: {}", field.label(), tunables.galaxy.outside_color)
            }
            _ => {
                let value = Self::value(field, tunables).unwrap_or_default();
                match field.range() {
                    Some(r) => format!(
                        "{}: {} [{}..{} step {}]",
                        field.label(),
                        value,
                        r.min,
                        r.max,
                        r.step
                    ),
                    None => format!("{}: {}", field.label(), value),
                }
            }
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Owned copies of everything the panel binds to
    #[derive(Default)]
    struct Bound {
        galaxy: GalaxyParameters,
        lights: LightRig,
        placement: SpacecraftPlacement,
        camera: [f32; 3],
    }

    impl Bound {
        fn tunables(&mut self) -> Tunables<'_> {
            Tunables {
                galaxy: &mut self.galaxy,
                lights: &mut self.lights,
                placement: &mut self.placement,
                camera: &mut self.camera,
            }
        }
    }

    #[test]
    fn test_range_constrain_snaps_and_clamps() {
        let count = TuningField::Count.range().unwrap();
        assert_eq!(count.constrain(12_345.0), 12_300.0);
        assert_eq!(count.constrain(10.0), 100.0);
        assert_eq!(count.constrain(5_000_000.0), 1_000_000.0);

        let radius = TuningField::Radius.range().unwrap();
        assert_eq!(radius.constrain(0.0), 0.01);
        assert_eq!(radius.constrain(3.14159), 3.14);
    }

    #[test]
    fn test_range_constrain_drops_float_noise() {
        let camera = TuningField::CameraPosition(Axis::X).range().unwrap();
        assert_eq!(camera.constrain(0.1 * 3.0), 0.3);
        assert_eq!(camera.constrain(-2.5 + 0.1), -2.4);

        let rotation = TuningField::SpacecraftRotation(Axis::Y).range().unwrap();
        assert_eq!(rotation.constrain(3.61 + 0.001), 3.611);
    }

    #[test]
    fn test_commit_value_regenerates_on_change() {
        let mut bound = Bound::default();
        let mut tunables = bound.tunables();

        let commit = TuningPanel::commit_value(TuningField::Branches, 7.4, &mut tunables);
        assert_eq!(commit, Commit::RegenerateGalaxy);
        assert_eq!(tunables.galaxy.branches, 7);

        // Same value again is a no-op
        let commit = TuningPanel::commit_value(TuningField::Branches, 7.0, &mut tunables);
        assert_eq!(commit, Commit::Unchanged);
    }

    #[test]
    fn test_commit_clamps_branches_to_minimum() {
        let mut bound = Bound::default();

        TuningPanel::commit_value(TuningField::Branches, 0.0, &mut bound.tunables());
        assert_eq!(bound.galaxy.branches, 2);
    }

    #[test]
    fn test_spot_intensity_only_updates_lights() {
        let mut bound = Bound::default();
        let before = bound.galaxy.clone();

        let commit =
            TuningPanel::commit_value(TuningField::SpotIntensity, 250.0, &mut bound.tunables());
        assert_eq!(commit, Commit::UpdateLights);
        assert_eq!(bound.lights.spot_intensity, 250.0);
        assert_eq!(bound.galaxy, before);
    }

    #[test]
    fn test_spacecraft_fields_update_placement() {
        let mut bound = Bound::default();
        let before = bound.galaxy.clone();

        let field = TuningField::SpacecraftPosition(Axis::Z);
        let commit = TuningPanel::commit_value(field, 1.234, &mut bound.tunables());
        assert_eq!(commit, Commit::UpdateSpacecraft);
        assert_eq!(bound.placement.position, [-2.6, 0.4, 1.23]);

        // Rotation is limited to [0, 10]
        let field = TuningField::SpacecraftRotation(Axis::X);
        let commit = TuningPanel::commit_value(field, -1.0, &mut bound.tunables());
        assert_eq!(commit, Commit::Unchanged);
        assert_eq!(bound.placement.rotation[0], 0.0);
        TuningPanel::commit_value(field, 42.0, &mut bound.tunables());
        assert_eq!(bound.placement.rotation[0], 10.0);

        assert_eq!(bound.galaxy, before);
    }

    #[test]
    fn test_camera_fields_clamp() {
        let mut bound = Bound::default();

        let field = TuningField::CameraPosition(Axis::Y);
        let commit = TuningPanel::commit_value(field, 25.0, &mut bound.tunables());
        assert_eq!(commit, Commit::UpdateCamera);
        assert_eq!(bound.camera, [0.0, 10.0, 0.0]);

        TuningPanel::commit_value(field, -1.26, &mut bound.tunables());
        assert_eq!(bound.camera[1], -1.3);
    }

    #[test]
    fn test_commit_color() {
        let mut galaxy = GalaxyParameters::default();
        let white = Rgb::new(1.0, 1.0, 1.0);

        let commit = TuningPanel::commit_color(TuningField::OutsideColor, white, &mut galaxy);
        assert_eq!(commit, Commit::RegenerateGalaxy);
        assert_eq!(galaxy.outside_color, white);

        // Numeric fields ignore colors
        let commit = TuningPanel::commit_color(TuningField::Radius, white, &mut galaxy);
        assert_eq!(commit, Commit::Unchanged);
    }

    #[test]
    fn test_step_selected_and_wraparound() {
        let mut panel = TuningPanel::new();
        let mut bound = Bound::default();

        assert!(!panel.is_visible());
        assert_eq!(panel.selected(), TuningField::Count);

        let commit = panel.step_selected(3, &mut bound.tunables());
        assert_eq!(commit, Commit::RegenerateGalaxy);
        assert_eq!(bound.galaxy.count, 200_300);

        assert_eq!(panel.select_previous(), TuningField::CameraPosition(Axis::Z));
        assert_eq!(panel.select_next(), TuningField::Count);
    }

    #[test]
    fn test_step_color_rotates_hue() {
        let mut panel = TuningPanel::new();
        let mut bound = Bound::default();

        while panel.selected() != TuningField::InsideColor {
            panel.select_next();
        }
        let before = bound.galaxy.inside_color;
        let commit = panel.step_selected(1, &mut bound.tunables());
        assert_eq!(commit, Commit::RegenerateGalaxy);
        assert_ne!(bound.galaxy.inside_color, before);
    }

    #[test]
    fn test_describe_spacecraft_rotation() {
        let mut bound = Bound::default();
        let line =
            TuningPanel::describe(TuningField::SpacecraftRotation(Axis::Y), &bound.tunables());
        assert!(line.starts_with("GLTF Rotate Y: 3.6"));
        assert!(line.ends_with("[0..10 step 0.001]"));
    }
}
