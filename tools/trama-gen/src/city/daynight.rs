//! Day/night lighting state

use glam::Vec3;

use crate::color::from_hex;

/// Sky colour at full day
pub const SKY_DAY: u32 = 0xccccff;

/// Sky colour at full night
pub const SKY_NIGHT: u32 = 0x222299;

/// Colour of the sun light
pub const DIRECTIONAL_COLOR: u32 = 0xeeeeff;

/// Direction the sun light comes from
pub const DIRECTIONAL_POSITION: Vec3 = Vec3::new(-1.0, 2.0, 3.0);

/// Hemisphere light sky and ground colours
pub const HEMISPHERE_COLORS: (u32, u32) = (0x8888dd, 0x080866);

/// Lighting for a day/night factor (0 = day, 1 = night)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayNight {
    pub factor: f32,
    pub sky: Vec3,
    /// Window glow (grey level equals the factor)
    pub window_emissive: Vec3,
    pub lamp_intensity: f32,
    pub directional_intensity: f32,
    pub hemisphere_intensity: f32,
}

impl DayNight {
    pub fn at(factor: f32) -> Self {
        let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        Self {
            factor,
            sky: from_hex(SKY_DAY).lerp(from_hex(SKY_NIGHT), factor),
            window_emissive: Vec3::splat(factor),
            lamp_intensity: factor * 0.6,
            directional_intensity: 1.0 - factor,
            hemisphere_intensity: 0.1 + (1.0 - factor) * 0.3,
        }
    }

    pub fn day() -> Self {
        Self::at(0.0)
    }

    pub fn night() -> Self {
        Self::at(1.0)
    }
}
