//! Catmull-Rom splines through 3D points
//!
//! Non-uniform variants parameterise each span by the distance between its
//! points raised to a power (0.25 of the squared distance for centripetal,
//! 0.5 for chordal), which avoids cusps and self-intersections on uneven
//! spacing.

use glam::Vec3;
use trama_geom::{GeomError, Result};

use super::Curve;

/// Span lengths below this are treated as degenerate
const MIN_SPAN: f32 = 1e-4;

/// Catmull-Rom parameterisation
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CurveType {
    Centripetal,
    Chordal,
    /// Fixed tangents scaled by `tension` (0.5 is the classic spline)
    Uniform { tension: f32 },
}

impl Default for CurveType {
    fn default() -> Self {
        Self::Centripetal
    }
}

impl CurveType {
    /// Default uniform spline
    pub const UNIFORM: Self = Self::Uniform { tension: 0.5 };
}

/// Spline that passes through every control point
#[derive(Clone, Debug)]
pub struct CatmullRom {
    points: Vec<Vec3>,
    curve_type: CurveType,
    closed: bool,
}

/// Cubic `c0 + c1 t + c2 t^2 + c3 t^3` for one coordinate
#[derive(Clone, Copy, Debug)]
struct CubicPoly {
    c0: f32,
    c1: f32,
    c2: f32,
    c3: f32,
}

impl CubicPoly {
    /// Hermite form from end values and tangents
    fn hermite(x0: f32, x1: f32, t0: f32, t1: f32) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(x0: f32, x1: f32, x2: f32, x3: f32, tension: f32) -> Self {
        Self::hermite(x1, x2, tension * (x2 - x0), tension * (x3 - x1))
    }

    #[allow(clippy::too_many_arguments)]
    fn non_uniform(x0: f32, x1: f32, x2: f32, x3: f32, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = ((x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1) * dt1;
        let t2 = ((x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2) * dt1;
        Self::hermite(x1, x2, t1, t2)
    }

    #[inline]
    fn eval(&self, t: f32) -> f32 {
        let t2 = t * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t2 * t
    }
}

impl CatmullRom {
    /// Build a spline over `points`
    ///
    /// # Errors
    /// [`GeomError::InvalidParameter`] when fewer than 2 points are given.
    pub fn new(points: Vec<Vec3>, curve_type: CurveType, closed: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeomError::invalid(
                "points",
                format!("a Catmull-Rom spline needs at least 2 points, got {}", points.len()),
            ));
        }
        Ok(Self {
            points,
            curve_type,
            closed,
        })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The four points that shape the span starting at `index`
    ///
    /// Open curves extrapolate a phantom point past each end.
    fn span(&self, index: usize) -> [Vec3; 4] {
        let pts = &self.points;
        let l = pts.len();

        let p0 = if self.closed || index > 0 {
            pts[(index + l - 1) % l]
        } else {
            pts[0] * 2.0 - pts[1]
        };
        let p1 = pts[index % l];
        let p2 = pts[(index + 1) % l];
        let p3 = if self.closed || index + 2 < l {
            pts[(index + 2) % l]
        } else {
            pts[l - 1] * 2.0 - pts[l - 2]
        };
        [p0, p1, p2, p3]
    }
}

impl Curve for CatmullRom {
    type Point = Vec3;

    fn point(&self, t: f32) -> Vec3 {
        let l = self.points.len();
        let spans = if self.closed { l } else { l - 1 };
        let p = spans as f32 * t.clamp(0.0, 1.0);

        let mut index = p.floor() as usize;
        let mut weight = p - index as f32;

        if self.closed {
            index %= l;
        } else if index >= l - 1 {
            // t == 1 lands past the last span; evaluate its end instead
            index = l - 2;
            weight = 1.0;
        }

        let [p0, p1, p2, p3] = self.span(index);

        let polys: [CubicPoly; 3] = match self.curve_type {
            CurveType::Uniform { tension } => {
                [0, 1, 2].map(|k| CubicPoly::uniform(p0[k], p1[k], p2[k], p3[k], tension))
            }
            CurveType::Centripetal | CurveType::Chordal => {
                let pow = if self.curve_type == CurveType::Chordal { 0.5 } else { 0.25 };
                let mut dt0 = p0.distance_squared(p1).powf(pow);
                let mut dt1 = p1.distance_squared(p2).powf(pow);
                let mut dt2 = p2.distance_squared(p3).powf(pow);

                if dt1 < MIN_SPAN {
                    dt1 = 1.0;
                }
                if dt0 < MIN_SPAN {
                    dt0 = dt1;
                }
                if dt2 < MIN_SPAN {
                    dt2 = dt1;
                }

                [0, 1, 2].map(|k| CubicPoly::non_uniform(p0[k], p1[k], p2[k], p3[k], dt0, dt1, dt2))
            }
        };

        Vec3::new(polys[0].eval(weight), polys[1].eval(weight), polys[2].eval(weight))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wavy_loop() -> Vec<Vec3> {
        vec![
            Vec3::new(-5.0, 0.0, 5.0),
            Vec3::new(-5.0, 1.0, -5.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(5.0, -1.0, 5.0),
            Vec3::new(5.0, 0.0, -5.0),
        ]
    }

    #[test]
    fn test_rejects_single_point() {
        assert!(CatmullRom::new(vec![Vec3::ONE], CurveType::default(), false).is_err());
    }

    #[test]
    fn test_passes_through_control_points() {
        for curve_type in [CurveType::Centripetal, CurveType::Chordal, CurveType::UNIFORM] {
            let pts = wavy_loop();
            let curve = CatmullRom::new(pts.clone(), curve_type, false).unwrap();
            for (i, p) in pts.iter().enumerate() {
                let t = i as f32 / (pts.len() - 1) as f32;
                assert!(
                    (curve.point(t) - *p).length() < 1e-4,
                    "{curve_type:?} misses point {i}"
                );
            }
        }
    }

    #[test]
    fn test_closed_curve_wraps() {
        let pts = wavy_loop();
        let curve = CatmullRom::new(pts.clone(), CurveType::Centripetal, true).unwrap();
        // Closed curves span l segments, so t = 1 is back at the start
        assert!((curve.point(1.0) - pts[0]).length() < 1e-4);
        assert!((curve.point(0.2) - pts[1]).length() < 1e-4);
    }

    #[test]
    fn test_points_count() {
        let curve = CatmullRom::new(wavy_loop(), CurveType::default(), false).unwrap();
        let samples = curve.points(50);
        assert_eq!(samples.len(), 51);
        assert!((samples[50] - Vec3::new(5.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_two_point_curve_is_straight() {
        let curve = CatmullRom::new(vec![Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)], CurveType::Centripetal, false)
            .unwrap();
        let mid = curve.point(0.5);
        assert!((mid - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_duplicate_points_do_not_produce_nan() {
        let curve = CatmullRom::new(
            vec![Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::X],
            CurveType::Chordal,
            false,
        )
        .unwrap();
        for p in curve.points(20) {
            assert!(p.is_finite());
        }
    }
}
