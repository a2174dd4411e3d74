//! Noise heightfields and 1-D noise profiles using the `noise` crate

use noise::{NoiseFn, Perlin};
use trama_geom::procedural::HeightField;
use trama_geom::{GeomError, Result};

/// Base frequency multiplier of [`layered_profile`]
const PROFILE_SCALE: f64 = 10.0;

/// Relative frequencies of the profile octaves, highest first
const PROFILE_FREQUENCIES: [f64; 3] = [1.0, 0.5, 0.1];

/// Configuration for Perlin noise generation
#[derive(Clone, Debug)]
pub struct PerlinConfig {
    /// Scale of the noise (larger = more zoomed in)
    pub scale: f64,
    /// Number of octaves for fractal noise
    pub octaves: u32,
    /// Persistence (amplitude multiplier per octave)
    pub persistence: f64,
    /// Lacunarity (frequency multiplier per octave)
    pub lacunarity: f64,
    /// Random seed
    pub seed: u32,
}

impl Default for PerlinConfig {
    fn default() -> Self {
        Self {
            scale: 0.05,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 0,
        }
    }
}

impl PerlinConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Fractal noise sampled per texel, stretched to fill `[0, 1]`
    ///
    /// A perfectly flat result maps to 0.5.
    pub fn heightfield(&self, width: u32, height: u32) -> Result<HeightField> {
        if self.octaves == 0 {
            return Err(GeomError::invalid("octaves", "at least one octave is required"));
        }

        let perlin = Perlin::new(self.seed);
        let raw = HeightField::from_fn(width, height, |x, y| {
            self.sample_fbm(&perlin, x as f64, y as f64) as f32
        })?;

        let (lo, hi) = raw
            .samples()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
        let range = hi - lo;

        HeightField::from_fn(width, height, |x, y| {
            if range > f32::EPSILON {
                (raw.get(x, y) - lo) / range
            } else {
                0.5
            }
        })
    }

    /// Sample fractal Brownian motion (multi-octave noise)
    fn sample_fbm<N: NoiseFn<f64, 2>>(&self, noise: &N, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.scale;
        let mut max_value = 0.0;

        for _ in 0..self.octaves {
            total += noise.get([x * frequency, y * frequency]) * amplitude;
            max_value += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        total / max_value
    }
}

/// Three-octave 1-D noise profile
///
/// Samples `x = start_x + i / steps` for `i` in `0..=steps`. `amplitudes`
/// weight the octaves from the lowest frequency to the highest, and each
/// octave is offset by +0.5. Returns `(x, y)` pairs.
pub fn layered_profile(
    start_x: f32,
    scale_x: f32,
    amplitudes: [f32; 3],
    steps: u32,
    seed: u32,
) -> Vec<(f32, f32)> {
    let perlin = Perlin::new(seed);
    let steps = steps.max(1);
    // Highest frequency pairs with the last amplitude
    let octaves: Vec<(f64, f64)> = PROFILE_FREQUENCIES
        .iter()
        .zip(amplitudes.iter().rev())
        .map(|(&f, &a)| (f * PROFILE_SCALE * scale_x as f64, a as f64))
        .collect();

    (0..=steps)
        .map(|i| {
            let x = start_x as f64 + i as f64 / steps as f64;
            let y: f64 = octaves
                .iter()
                .map(|&(freq, amp)| (perlin.get([x * freq, 0.0]) + 0.5) * amp)
                .sum();
            (x as f32, y as f32)
        })
        .collect()
}

/// 1-D noise that repeats every `period`
///
/// Each sample blends the noise at `x mod period` with the noise one period
/// earlier, weighted by how far into the period it is, so both ends of a
/// period evaluate the same noise. Samples `x = i / steps` for `i` in
/// `0..=steps`.
pub fn periodic_profile(
    offset_x: f32,
    scale_x: f32,
    period: f32,
    steps: u32,
    seed: u32,
) -> Result<Vec<(f32, f32)>> {
    if !(period.is_finite() && period > 0.0) {
        return Err(GeomError::invalid("period", format!("must be > 0.0, got {period}")));
    }

    let perlin = Perlin::new(seed);
    let steps = steps.max(1);
    let (offset, scale, period) = (offset_x as f64, scale_x as f64, period as f64);

    Ok((0..=steps)
        .map(|i| {
            let x = i as f64 / steps as f64;
            let local = x % period;
            let a = perlin.get([offset + local * scale, 0.0]) + 0.5;
            let b = perlin.get([offset + (local - period) * scale, 0.0]) + 0.5;
            let weight_b = local / period;
            (x as f32, ((1.0 - weight_b) * a + weight_b * b) as f32)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heightfield_is_normalised() {
        let field = PerlinConfig::with_seed(7).heightfield(32, 24).unwrap();
        assert_eq!((field.width(), field.height()), (32, 24));
        let min = field.samples().iter().copied().fold(f32::INFINITY, f32::min);
        let max = field.samples().iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(min.abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heightfield_is_deterministic() {
        let config = PerlinConfig::with_seed(3);
        assert_eq!(config.heightfield(16, 16).unwrap(), config.heightfield(16, 16).unwrap());
    }

    #[test]
    fn test_zero_octaves_rejected() {
        let config = PerlinConfig {
            octaves: 0,
            ..Default::default()
        };
        assert!(config.heightfield(4, 4).is_err());
    }

    #[test]
    fn test_layered_profile_samples() {
        let profile = layered_profile(0.5, 1.0, [3.0, 2.0, 1.0], 400, 0);
        assert_eq!(profile.len(), 401);
        assert!((profile[0].0 - 0.5).abs() < 1e-6);
        assert!((profile[400].0 - 1.5).abs() < 1e-5);
        assert!(profile.iter().all(|(_, y)| y.is_finite()));
    }

    #[test]
    fn test_layered_profile_zero_amplitudes_is_flat() {
        let profile = layered_profile(0.0, 1.0, [0.0; 3], 10, 0);
        assert!(profile.iter().all(|&(_, y)| y == 0.0));
    }

    #[test]
    fn test_periodic_profile_repeats() {
        let profile = periodic_profile(0.3, 50.0, 0.25, 400, 1).unwrap();
        // Samples 100 apart are exactly one period apart
        for i in 0..300 {
            assert!((profile[i].1 - profile[i + 100].1).abs() < 1e-4, "sample {i}");
        }
    }

    #[test]
    fn test_periodic_profile_rejects_bad_period() {
        assert!(periodic_profile(0.0, 1.0, 0.0, 10, 0).is_err());
        assert!(periodic_profile(0.0, 1.0, f32::NAN, 10, 0).is_err());
    }
}
