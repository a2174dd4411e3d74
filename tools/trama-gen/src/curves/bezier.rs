//! Bézier segments evaluated through their Bernstein bases

use super::{Curve, CurvePoint};

/// Quadratic Bernstein basis at `u`
#[inline]
fn quadratic_basis(u: f32) -> [f32; 3] {
    let m = 1.0 - u;
    [m * m, 2.0 * u * m, u * u]
}

/// Derivatives of the quadratic basis
#[inline]
fn quadratic_basis_derivative(u: f32) -> [f32; 3] {
    [-2.0 + 2.0 * u, 2.0 - 4.0 * u, 2.0 * u]
}

/// Cubic Bernstein basis at `u`
#[inline]
fn cubic_basis(u: f32) -> [f32; 4] {
    let m = 1.0 - u;
    [m * m * m, 3.0 * m * m * u, 3.0 * m * u * u, u * u * u]
}

/// Derivatives of the cubic basis
#[inline]
fn cubic_basis_derivative(u: f32) -> [f32; 4] {
    [
        -3.0 * u * u + 6.0 * u - 3.0,
        9.0 * u * u - 12.0 * u + 3.0,
        -9.0 * u * u + 6.0 * u,
        3.0 * u * u,
    ]
}

fn weighted<T: CurvePoint, const N: usize>(points: &[T; N], weights: [f32; N]) -> T {
    points
        .iter()
        .zip(weights)
        .fold(T::ZERO, |acc, (&p, w)| acc + p * w)
}

fn unit<T: CurvePoint>(v: T) -> T {
    let len = v.length();
    if len > f32::EPSILON { v * (1.0 / len) } else { T::ZERO }
}

/// Quadratic Bézier segment through `p0` and `p2`, pulled towards `p1`
#[derive(Clone, Copy, Debug)]
pub struct QuadraticBezier<T: CurvePoint> {
    pub p0: T,
    pub p1: T,
    pub p2: T,
}

impl<T: CurvePoint> QuadraticBezier<T> {
    pub fn new(p0: T, p1: T, p2: T) -> Self {
        Self { p0, p1, p2 }
    }

    fn controls(&self) -> [T; 3] {
        [self.p0, self.p1, self.p2]
    }

    /// First derivative with respect to `u`
    pub fn derivative(&self, u: f32) -> T {
        weighted(&self.controls(), quadratic_basis_derivative(u.clamp(0.0, 1.0)))
    }

    /// Unit tangent, zero where the derivative vanishes
    pub fn tangent(&self, u: f32) -> T {
        unit(self.derivative(u))
    }
}

impl<T: CurvePoint> Curve for QuadraticBezier<T> {
    type Point = T;

    fn point(&self, u: f32) -> T {
        weighted(&self.controls(), quadratic_basis(u.clamp(0.0, 1.0)))
    }
}

/// Cubic Bézier segment through `p0` and `p3` with handles `p1` and `p2`
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier<T: CurvePoint> {
    pub p0: T,
    pub p1: T,
    pub p2: T,
    pub p3: T,
}

impl<T: CurvePoint> CubicBezier<T> {
    pub fn new(p0: T, p1: T, p2: T, p3: T) -> Self {
        Self { p0, p1, p2, p3 }
    }

    fn controls(&self) -> [T; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// First derivative with respect to `u`
    pub fn derivative(&self, u: f32) -> T {
        weighted(&self.controls(), cubic_basis_derivative(u.clamp(0.0, 1.0)))
    }

    /// Unit tangent, zero where the derivative vanishes
    pub fn tangent(&self, u: f32) -> T {
        unit(self.derivative(u))
    }
}

impl<T: CurvePoint> Curve for CubicBezier<T> {
    type Point = T;

    fn point(&self, u: f32) -> T {
        weighted(&self.controls(), cubic_basis(u.clamp(0.0, 1.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_bases_partition_unity() {
        for i in 0..=10 {
            let u = i as f32 / 10.0;
            assert!((quadratic_basis(u).iter().sum::<f32>() - 1.0).abs() < 1e-6);
            assert!((cubic_basis(u).iter().sum::<f32>() - 1.0).abs() < 1e-6);
            assert!(quadratic_basis_derivative(u).iter().sum::<f32>().abs() < 1e-5);
            assert!(cubic_basis_derivative(u).iter().sum::<f32>().abs() < 1e-5);
        }
    }

    #[test]
    fn test_quadratic_endpoints_and_midpoint() {
        let curve = QuadraticBezier::new(Vec2::ZERO, Vec2::new(1.0, 2.0), Vec2::new(2.0, 0.0));
        assert_eq!(curve.point(0.0), Vec2::ZERO);
        assert_eq!(curve.point(1.0), Vec2::new(2.0, 0.0));
        assert!((curve.point(0.5) - Vec2::new(1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_quadratic_derivative_at_ends() {
        let curve = QuadraticBezier::new(Vec2::ZERO, Vec2::new(1.0, 2.0), Vec2::new(2.0, 0.0));
        assert!((curve.derivative(0.0) - Vec2::new(2.0, 4.0)).length() < 1e-6);
        assert!((curve.derivative(1.0) - Vec2::new(2.0, -4.0)).length() < 1e-6);
    }

    #[test]
    fn test_cubic_derivative_matches_difference() {
        let curve = CubicBezier::new(
            Vec3::ZERO,
            Vec3::new(1.0, 3.0, 0.0),
            Vec3::new(3.0, -1.0, 1.0),
            Vec3::new(4.0, 0.0, 0.0),
        );
        let h = 1e-3;
        for &u in &[0.2, 0.5, 0.8] {
            let numeric = (curve.point(u + h) - curve.point(u - h)) * (1.0 / (2.0 * h));
            assert!((numeric - curve.derivative(u)).length() < 1e-2);
        }
    }

    #[test]
    fn test_cubic_tangent_is_unit() {
        let curve = CubicBezier::new(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 1.0, 0.0), Vec3::new(3.0, 1.0, 0.0));
        assert!((curve.tangent(0.3).length() - 1.0).abs() < 1e-5);
        let flat = CubicBezier::new(Vec3::ONE, Vec3::ONE, Vec3::ONE, Vec3::ONE);
        assert_eq!(flat.tangent(0.5), Vec3::ZERO);
    }

    #[test]
    fn test_points_includes_both_ends() {
        let curve = CubicBezier::new(Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::ONE);
        let pts = curve.points(10);
        assert_eq!(pts.len(), 11);
        assert_eq!(pts[0], Vec2::ZERO);
        assert_eq!(pts[10], Vec2::ONE);
    }
}
