//! Procedural spiral galaxy point cloud.

use rand::Rng;
use std::f32::consts::TAU;

use super::ParticleBuffer;
use crate::params::GalaxyParameters;

/// Generate a fresh particle buffer for the given parameters.
///
/// Particles are dealt round-robin onto `branches` evenly spaced arms. Each
/// gets a base radius drawn uniformly from `[0, radius]` in the XZ plane; all
/// vertical extent comes from the randomness offset, which the shader adds at
/// draw time. Color fades from `inside_color` to `outside_color` with the base
/// radius only.
pub fn generate<R: Rng + ?Sized>(params: &GalaxyParameters, rng: &mut R) -> ParticleBuffer {
    let count = params.count;
    let mut buffer = ParticleBuffer::with_capacity(count);

    let branches = params.branches.max(1);
    let spread = params.axis_spread.to_array();

    for i in 0..count {
        // Position
        let radius = rng.gen::<f32>() * params.radius;
        let branch_angle = branch_angle(i, branches);

        buffer
            .positions
            .extend_from_slice(&[branch_angle.cos() * radius, 0.0, branch_angle.sin() * radius]);

        // Randomness
        for axis_scale in spread {
            let offset = jitter(rng, params.randomness_power)
                * params.randomness
                * radius
                * axis_scale;
            buffer.randomness.push(offset);
        }

        // Color
        let t = if params.radius > 0.0 {
            (radius / params.radius).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mixed = params.inside_color.lerp(params.outside_color, t);
        buffer.colors.extend_from_slice(&mixed.to_array());

        // Scale
        buffer.scales.push(rng.gen::<f32>());
    }

    buffer
}

/// Base angle of the arm particle `index` belongs to
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let arm = (index % branches as usize) as f32;
    arm / branches as f32 * TAU
}

/// Signed jitter sample in [-1, 1], biased toward zero by `power`
fn jitter<R: Rng + ?Sized>(rng: &mut R, power: f32) -> f32 {
    let magnitude = rng.gen::<f32>().powf(power);
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Rgb;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn small_params(count: usize) -> GalaxyParameters {
        GalaxyParameters {
            count,
            ..GalaxyParameters::default()
        }
    }

    /// Angle of a base position in [0, 2π)
    fn base_angle(buffer: &ParticleBuffer, i: usize) -> f32 {
        let x = buffer.positions[i * 3];
        let z = buffer.positions[i * 3 + 2];
        z.atan2(x).rem_euclid(TAU)
    }

    fn base_radius(buffer: &ParticleBuffer, i: usize) -> f32 {
        let x = buffer.positions[i * 3];
        let z = buffer.positions[i * 3 + 2];
        (x * x + z * z).sqrt()
    }

    #[test]
    fn test_buffer_lengths() {
        for count in [0, 1, 2, 17, 1000] {
            let buffer = generate(&small_params(count), &mut rng());
            assert_eq!(buffer.positions.len(), 3 * count);
            assert_eq!(buffer.colors.len(), 3 * count);
            assert_eq!(buffer.randomness.len(), 3 * count);
            assert_eq!(buffer.scales.len(), count);
            assert_eq!(buffer.len(), count);
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let buffer = generate(&small_params(0), &mut rng());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_base_positions_lie_in_plane_within_radius() {
        let params = small_params(5000);
        let buffer = generate(&params, &mut rng());

        for i in 0..buffer.len() {
            assert_eq!(buffer.positions[i * 3 + 1], 0.0);
            assert!(base_radius(&buffer, i) <= params.radius + 1e-4);
        }
    }

    #[test]
    fn test_colors_stay_between_endpoints() {
        let params = GalaxyParameters {
            count: 5000,
            inside_color: Rgb::new(1.0, 0.2, 0.0),
            outside_color: Rgb::new(0.0, 0.6, 1.0),
            ..GalaxyParameters::default()
        };
        let buffer = generate(&params, &mut rng());

        let inside = params.inside_color.to_array();
        let outside = params.outside_color.to_array();
        for (i, channel) in buffer.colors.iter().enumerate() {
            let lo = inside[i % 3].min(outside[i % 3]);
            let hi = inside[i % 3].max(outside[i % 3]);
            assert!(*channel >= lo - 1e-6 && *channel <= hi + 1e-6);
        }
    }

    #[test]
    fn test_color_tracks_base_radius() {
        let params = GalaxyParameters {
            count: 2000,
            inside_color: Rgb::new(0.0, 0.0, 0.0),
            outside_color: Rgb::new(1.0, 1.0, 1.0),
            ..GalaxyParameters::default()
        };
        let buffer = generate(&params, &mut rng());

        // With black → white endpoints every channel equals r / radius
        for i in 0..buffer.len() {
            let expected = base_radius(&buffer, i) / params.radius;
            assert!((buffer.colors[i * 3] - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_scales_in_unit_range() {
        let buffer = generate(&small_params(10_000), &mut rng());
        assert!(buffer.scales.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_branch_angles_follow_branch_count() {
        for branches in [2u32, 3, 5, 7] {
            let params = GalaxyParameters {
                count: 400,
                branches,
                ..GalaxyParameters::default()
            };
            let buffer = generate(&params, &mut rng());

            let angles: BTreeSet<i64> = (0..buffer.len())
                .filter(|&i| base_radius(&buffer, i) > 1e-3)
                .map(|i| {
                    let a = base_angle(&buffer, i);
                    // Snap 2π back to 0
                    let a = if (TAU - a) < 1e-3 { 0.0 } else { a };
                    (a * 1000.0).round() as i64
                })
                .collect();

            let expected: BTreeSet<i64> = (0..branches)
                .map(|k| ((k as f32 / branches as f32 * TAU) * 1000.0).round() as i64)
                .collect();

            assert_eq!(angles, expected, "branches = {}", branches);
        }
    }

    #[test]
    fn test_five_particles_five_arms() {
        let params = GalaxyParameters {
            count: 5,
            branches: 5,
            radius: 1.0,
            ..GalaxyParameters::default()
        };
        let buffer = generate(&params, &mut rng());

        for i in 0..5 {
            assert!((branch_angle(i, 5).to_degrees() - 72.0 * i as f32).abs() < 1e-3);
            assert!(base_radius(&buffer, i) <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_zero_randomness_means_no_offsets() {
        let params = GalaxyParameters {
            count: 1000,
            randomness: 0.0,
            ..GalaxyParameters::default()
        };
        let buffer = generate(&params, &mut rng());
        assert!(buffer.randomness.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_offsets_bounded_per_axis() {
        let params = small_params(10_000);
        let buffer = generate(&params, &mut rng());
        let spread = params.axis_spread.to_array();

        for i in 0..buffer.len() {
            let r = base_radius(&buffer, i);
            for axis in 0..3 {
                let bound = params.randomness * r * spread[axis] + 1e-4;
                assert!(buffer.randomness[i * 3 + axis].abs() <= bound);
            }
        }
    }

    #[test]
    fn test_spread_is_flattened() {
        let params = GalaxyParameters {
            count: 20_000,
            randomness_power: 1.0,
            ..GalaxyParameters::default()
        };
        let buffer = generate(&params, &mut rng());

        let mean_abs = |axis: usize| {
            buffer
                .randomness
                .iter()
                .skip(axis)
                .step_by(3)
                .map(|v| v.abs())
                .sum::<f32>()
                / buffer.len() as f32
        };

        // Widest on X, then Z, narrowest on Y
        assert!(mean_abs(0) > mean_abs(2));
        assert!(mean_abs(2) > mean_abs(1));
    }

    #[test]
    fn test_offset_signs_are_balanced() {
        let buffer = generate(&small_params(20_000), &mut rng());
        let positive = buffer.randomness.iter().filter(|v| **v > 0.0).count();
        let ratio = positive as f32 / buffer.randomness.len() as f32;
        assert!((ratio - 0.5).abs() < 0.02);
    }

    #[test]
    fn test_regeneration_is_statistically_similar() {
        let params = small_params(20_000);
        let mut rng_a = SmallRng::seed_from_u64(1);
        let mut rng_b = SmallRng::seed_from_u64(2);
        let a = generate(&params, &mut rng_a);
        let b = generate(&params, &mut rng_b);

        assert_eq!(a.positions.len(), b.positions.len());
        assert_ne!(a.positions, b.positions);

        let mean_radius = |buf: &ParticleBuffer| {
            (0..buf.len()).map(|i| base_radius(buf, i)).sum::<f32>() / buf.len() as f32
        };
        let mean_scale = |buf: &ParticleBuffer| buf.scales.iter().sum::<f32>() / buf.len() as f32;

        // Uniform radius on [0, 5] → mean 2.5; uniform scale → mean 0.5
        assert!((mean_radius(&a) - 2.5).abs() < 0.1);
        assert!((mean_radius(&b) - 2.5).abs() < 0.1);
        assert!((mean_radius(&a) - mean_radius(&b)).abs() < 0.1);
        assert!((mean_scale(&a) - 0.5).abs() < 0.02);
        assert!((mean_scale(&b) - 0.5).abs() < 0.02);
    }
}
