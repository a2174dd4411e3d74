//! Curves for paths and tubes
//!
//! - [`QuadraticBezier`] / [`CubicBezier`]: Bernstein-basis segments over 2D or 3D points
//! - [`CatmullRom`]: centripetal, chordal or uniform splines through 3D points
//!
//! Every curve implements [`Curve`], so its samples can be fed to
//! [`tube_along`](crate::mesh::tube_along) or written as a polyline.

use glam::{Vec2, Vec3};

mod bezier;
mod catmull;

pub use bezier::{CubicBezier, QuadraticBezier};
pub use catmull::{CatmullRom, CurveType};

/// Point types a curve can be built from
pub trait CurvePoint:
    Copy
    + std::fmt::Debug
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<f32, Output = Self>
{
    const ZERO: Self;

    fn length(self) -> f32;
}

impl CurvePoint for Vec2 {
    const ZERO: Self = Vec2::ZERO;

    fn length(self) -> f32 {
        Vec2::length(self)
    }
}

impl CurvePoint for Vec3 {
    const ZERO: Self = Vec3::ZERO;

    fn length(self) -> f32 {
        Vec3::length(self)
    }
}

/// A curve parameterised over `t` in `[0, 1]`
pub trait Curve {
    type Point: CurvePoint;

    /// Point at `t` (clamped to `[0, 1]`)
    fn point(&self, t: f32) -> Self::Point;

    /// `divisions + 1` evenly spaced samples including both ends
    fn points(&self, divisions: u32) -> Vec<Self::Point> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|i| self.point(i as f32 / divisions as f32))
            .collect()
    }
}
