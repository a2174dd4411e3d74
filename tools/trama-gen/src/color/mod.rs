//! Colour models and their volume geometry
//!
//! Every channel is normalised to `[0, 1]`. HSV hue is in degrees, HSL hue is
//! a fraction of a turn.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;

mod volumes;

pub use volumes::{
    OUTLINE_SEGMENTS, RADIAL_SEGMENTS, cmy_volume, color_volume, hsl_volume, hsv_volume,
    outline_edges, rgb_volume,
};

/// Lightness where the HSL double cone is widest
pub const L_MID_POINT: f32 = 0.5;

/// Radius of the HSL double cone at [`L_MID_POINT`] and full saturation
pub const MAX_VISUAL_RADIUS_AT_MID: f32 = 0.5;

/// Colour model of a volume
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorModel {
    Rgb,
    Cmy,
    Hsv,
    Hsl,
}

impl ColorModel {
    pub const ALL: [ColorModel; 4] = [Self::Rgb, Self::Cmy, Self::Hsv, Self::Hsl];

    pub fn name(self) -> &'static str {
        match self {
            Self::Rgb => "rgb",
            Self::Cmy => "cmy",
            Self::Hsv => "hsv",
            Self::Hsl => "hsl",
        }
    }

    /// Channel names in axis order
    pub fn channels(self) -> [&'static str; 3] {
        match self {
            Self::Rgb => ["r", "g", "b"],
            Self::Cmy => ["c", "m", "y"],
            Self::Hsv => ["h", "s", "v"],
            Self::Hsl => ["h", "s", "l"],
        }
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgb" => Ok(Self::Rgb),
            "cmy" => Ok(Self::Cmy),
            "hsv" => Ok(Self::Hsv),
            "hsl" => Ok(Self::Hsl),
            other => Err(format!("unknown colour model '{other}' (expected rgb, cmy, hsv or hsl)")),
        }
    }
}

/// Per-channel `(min, max)` limits of a sub-volume
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorLimits {
    pub model: ColorModel,
    /// Limits in [`ColorModel::channels`] order
    pub channels: [(f32, f32); 3],
}

impl ColorLimits {
    /// The whole colour space
    pub fn full(model: ColorModel) -> Self {
        let hue_max = if model == ColorModel::Hsv { 360.0 } else { 1.0 };
        Self {
            model,
            channels: [(0.0, hue_max), (0.0, 1.0), (0.0, 1.0)],
        }
    }

    pub fn with_channel(mut self, index: usize, min: f32, max: f32) -> Self {
        if let Some(slot) = self.channels.get_mut(index) {
            *slot = (min, max);
        }
        self
    }

    /// `max - min` per channel
    pub fn extents(&self) -> [f32; 3] {
        self.channels.map(|(lo, hi)| hi - lo)
    }
}

impl Default for ColorLimits {
    fn default() -> Self {
        Self::full(ColorModel::Rgb)
    }
}

#[inline]
pub fn rgb_to_cmy(rgb: Vec3) -> Vec3 {
    Vec3::ONE - rgb
}

#[inline]
pub fn cmy_to_rgb(cmy: Vec3) -> Vec3 {
    Vec3::ONE - cmy
}

/// RGB to HSV, hue in degrees `[0, 360)`
pub fn rgb_to_hsv(rgb: Vec3) -> (f32, f32, f32) {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == rgb.x {
        60.0 * ((rgb.y - rgb.z) / delta).rem_euclid(6.0)
    } else if max == rgb.y {
        60.0 * ((rgb.z - rgb.x) / delta + 2.0)
    } else {
        60.0 * ((rgb.x - rgb.y) / delta + 4.0)
    };

    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

/// HSV to RGB, hue in degrees (wrapped)
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

/// RGB to HSL, hue as a fraction of a turn `[0, 1)`
pub fn rgb_to_hsl(rgb: Vec3) -> (f32, f32, f32) {
    let max = rgb.max_element();
    let min = rgb.min_element();
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let delta = max - min;
    let s = if l <= 0.5 { delta / (max + min) } else { delta / (2.0 - max - min) };
    let h = if max == rgb.x {
        (rgb.y - rgb.z) / delta + if rgb.y < rgb.z { 6.0 } else { 0.0 }
    } else if max == rgb.y {
        (rgb.z - rgb.x) / delta + 2.0
    } else {
        (rgb.x - rgb.y) / delta + 4.0
    };

    (h / 6.0, s, l)
}

/// HSL to RGB, hue as a fraction of a turn (wrapped)
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Quantise a normalised colour to opaque RGBA8
#[inline]
pub fn to_rgba8(rgb: Vec3) -> [u8; 4] {
    let [r, g, b] = rgb.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    [r, g, b, 255]
}

/// Unpack `0xrrggbb` into a normalised colour
pub fn from_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Radius of the HSL double cone at lightness `l` for full saturation
///
/// Grows linearly from the black apex to [`MAX_VISUAL_RADIUS_AT_MID`] and
/// shrinks back to the white apex.
pub fn hsl_radius(l: f32) -> f32 {
    let r = if l <= L_MID_POINT {
        (l / L_MID_POINT) * MAX_VISUAL_RADIUS_AT_MID
    } else {
        ((1.0 - l) / (1.0 - L_MID_POINT)) * MAX_VISUAL_RADIUS_AT_MID
    };
    r.max(0.0)
}

/// `d hsl_radius / dl` on the half containing `l`
pub(crate) fn hsl_radius_slope(l: f32) -> f32 {
    if l <= L_MID_POINT {
        MAX_VISUAL_RADIUS_AT_MID / L_MID_POINT
    } else {
        -MAX_VISUAL_RADIUS_AT_MID / (1.0 - L_MID_POINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_cmy_is_complement() {
        let rgb = Vec3::new(0.2, 0.5, 0.9);
        assert!(close(rgb_to_cmy(rgb), Vec3::new(0.8, 0.5, 0.1)));
        assert!(close(cmy_to_rgb(rgb_to_cmy(rgb)), rgb));
    }

    #[test]
    fn test_hsv_primaries() {
        assert!(close(hsv_to_rgb(0.0, 1.0, 1.0), Vec3::X));
        assert!(close(hsv_to_rgb(120.0, 1.0, 1.0), Vec3::Y));
        assert!(close(hsv_to_rgb(240.0, 1.0, 1.0), Vec3::Z));
        assert!(close(hsv_to_rgb(360.0, 1.0, 1.0), Vec3::X));
        assert!(close(hsv_to_rgb(-120.0, 1.0, 1.0), Vec3::Z));
    }

    #[test]
    fn test_rgb_to_hsv_magenta() {
        let (h, s, v) = rgb_to_hsv(Vec3::new(1.0, 0.0, 1.0));
        assert!((h - 300.0).abs() < 1e-4);
        assert_eq!((s, v), (1.0, 1.0));
    }

    #[test]
    fn test_hsl_matches_hsv_at_full_saturation() {
        for k in 0..12 {
            let h = k as f32 / 12.0;
            assert!(close(hsl_to_rgb(h, 1.0, 0.5), hsv_to_rgb(h * 360.0, 1.0, 1.0)));
        }
    }

    #[test]
    fn test_hsl_grey_and_extremes() {
        assert!(close(hsl_to_rgb(0.3, 0.0, 0.25), Vec3::splat(0.25)));
        assert!(close(hsl_to_rgb(0.7, 1.0, 0.0), Vec3::ZERO));
        assert!(close(hsl_to_rgb(0.7, 1.0, 1.0), Vec3::ONE));
    }

    #[test]
    fn test_rgb_to_hsl_inverts() {
        let rgb = Vec3::new(0.9, 0.3, 0.4);
        let (h, s, l) = rgb_to_hsl(rgb);
        assert!(close(hsl_to_rgb(h, s, l), rgb));
        assert!((0.0..1.0).contains(&h));
    }

    #[test]
    fn test_to_rgba8() {
        assert_eq!(to_rgba8(Vec3::new(1.0, 0.5, -1.0)), [255, 128, 0, 255]);
        assert_eq!(to_rgba8(from_hex(0x887755)), [0x88, 0x77, 0x55, 255]);
    }

    #[test]
    fn test_hsl_radius_profile() {
        assert_eq!(hsl_radius(0.0), 0.0);
        assert!((hsl_radius(0.25) - 0.25).abs() < 1e-6);
        assert!((hsl_radius(0.5) - MAX_VISUAL_RADIUS_AT_MID).abs() < 1e-6);
        assert!(hsl_radius(1.0).abs() < 1e-6);
        assert_eq!(hsl_radius_slope(0.2), 1.0);
        assert_eq!(hsl_radius_slope(0.8), -1.0);
    }

    #[test]
    fn test_model_parse_and_limits() {
        assert_eq!("HSV".parse::<ColorModel>(), Ok(ColorModel::Hsv));
        assert!("xyz".parse::<ColorModel>().is_err());
        assert_eq!(ColorLimits::full(ColorModel::Hsv).channels[0], (0.0, 360.0));
        assert_eq!(ColorLimits::full(ColorModel::Hsl).channels[0], (0.0, 1.0));
        let limits = ColorLimits::full(ColorModel::Rgb).with_channel(1, 0.25, 0.75);
        assert_eq!(limits.extents(), [1.0, 0.5, 1.0]);
    }
}
