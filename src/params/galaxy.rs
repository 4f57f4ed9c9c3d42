//! Galaxy generation parameters and color handling.

use std::fmt;
use std::str::FromStr;

use crate::error::ParamError;

/// Linear RGB color with channels in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Linear interpolation toward `other` (t = 0 → self, t = 1 → other)
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Rotate hue by `degrees`, keeping saturation and lightness
    pub fn rotate_hue(self, degrees: f32) -> Rgb {
        let (h, s, l) = self.to_hsl();
        Rgb::from_hsl((h + degrees / 360.0).rem_euclid(1.0), s, l)
    }

    fn to_hsl(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };

        (h / 6.0, s, l)
    }

    fn from_hsl(h: f32, s: f32, l: f32) -> Rgb {
        if s == 0.0 {
            return Rgb::new(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl FromStr for Rgb {
    type Err = ParamError;

    /// Parse `#rrggbb` (leading `#` optional)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        // Digits only; from_str_radix takes a leading sign
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParamError::InvalidColor(s.to_string()));
        }
        let hex =
            u32::from_str_radix(digits, 16).map_err(|_| ParamError::InvalidColor(s.to_string()))?;
        Ok(Rgb::from_hex(hex))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }
}

/// Per-axis multipliers applied to the randomness offset.
///
/// Wider on X than on Z, narrowest on Y: flattens the cloud into elongated arms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpread {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for AxisSpread {
    fn default() -> Self {
        Self {
            x: 5.0,
            y: 1.0,
            z: 3.0,
        }
    }
}

impl AxisSpread {
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Galaxy point-cloud generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyParameters {
    /// Number of particles
    pub count: usize,

    /// Maximum orbital radius (world units)
    pub radius: f32,

    /// Spiral arm count (>= 2)
    pub branches: u32,

    /// Jitter magnitude as a fraction of the particle's base radius
    pub randomness: f32,

    /// Exponent applied to the uniform jitter sample; higher packs particles tighter to the arm
    pub randomness_power: f32,

    /// Color at the center
    pub inside_color: Rgb,

    /// Color at the rim
    pub outside_color: Rgb,

    pub axis_spread: AxisSpread,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 200_000,
            radius: 5.0,
            branches: 5,
            randomness: 0.5,
            randomness_power: 3.0,
            inside_color: Rgb::from_hex(0xf50083),
            outside_color: Rgb::from_hex(0x0dd3d0),
            axis_spread: AxisSpread::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let color: Rgb = "#0dd3d0".parse().unwrap();
        assert_eq!(color, Rgb::from_hex(0x0dd3d0));
        assert_eq!(color.to_string(), "#0dd3d0");

        let bare: Rgb = "f50083".parse().unwrap();
        assert_eq!(bare.to_string(), "#f50083");
    }

    #[test]
    fn test_parse_invalid_color() {
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#zzzzzz".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
        assert!(matches!("+abcde".parse::<Rgb>(), Err(ParamError::InvalidColor(_))));
        assert!("#-abcde".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(1.0, 0.0, 0.5);
        let b = Rgb::new(0.0, 1.0, 0.5);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);

        let mid = a.lerp(b, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_hue() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let green = red.rotate_hue(120.0);
        assert!(green.r.abs() < 1e-4);
        assert!((green.g - 1.0).abs() < 1e-4);
        assert!(green.b.abs() < 1e-4);

        // Full turn comes back
        let back = red.rotate_hue(360.0);
        assert!((back.r - 1.0).abs() < 1e-4);

        // Grey has no hue to rotate
        let grey = Rgb::new(0.5, 0.5, 0.5);
        assert_eq!(grey.rotate_hue(90.0), grey);
    }

    #[test]
    fn test_default_parameters() {
        let params = GalaxyParameters::default();
        assert_eq!(params.count, 200_000);
        assert_eq!(params.branches, 5);
        assert_eq!(params.axis_spread, AxisSpread { x: 5.0, y: 1.0, z: 3.0 });
        assert_eq!(params.inside_color.to_string(), "#f50083");
        assert_eq!(params.outside_color.to_string(), "#0dd3d0");
    }
}
