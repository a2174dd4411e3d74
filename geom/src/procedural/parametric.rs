//! Parametric surface tessellation
//!
//! Samples a `(u, v) -> Vec3` map on a grid made of uniform samples plus
//! optional knots, and emits a non-indexed triangle list (every triangle owns
//! three vertices). Either axis may be closed, in which case the last column
//! or row connects back to the first and finite differences wrap.
//!
//! Normals are chosen per vertex, in priority order:
//! 1. a caller-supplied normal function (handed the finite-difference partials)
//! 2. smooth shading: `normalize(du x dv)` from finite differences
//! 3. flat shading: the face normal of the owning triangle

use glam::Vec3;
use tracing::{debug, warn};

use super::types::{MeshBuilderUV, UnpackedMesh};
use crate::error::{GeomError, Result};

/// Default finite-difference step in parameter space
///
/// Samples are `f32`, so the step is kept well above the ulp of values near 1.
pub const DEFAULT_EPSILON: f32 = 1e-4;

/// Samples closer than this are treated as the same sample
const SAMPLE_MERGE_EPSILON: f32 = 1e-6;

/// Shading used when no normal function is supplied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shading {
    /// Per-vertex normals from the surface partials
    #[default]
    Smooth,
    /// One normal per triangle
    Flat,
}

/// Everything a custom normal function gets to see about a vertex
#[derive(Clone, Copy, Debug)]
pub struct NormalQuery {
    pub u: f32,
    pub v: f32,
    /// Index of the triangle in emission order
    pub triangle: usize,
    /// Corner within the triangle (0, 1 or 2)
    pub corner: usize,
    pub position: Vec3,
    /// Unscaled partial along u
    pub du: Vec3,
    /// Unscaled partial along v
    pub dv: Vec3,
}

/// Custom per-vertex normal. The result is normalized by the tessellator.
pub type NormalFn<'a> = Box<dyn Fn(&NormalQuery) -> Vec3 + 'a>;

/// Custom texture coordinates for a `(u, v)` sample
pub type UvFn<'a> = Box<dyn Fn(f32, f32) -> (f32, f32) + 'a>;

/// Tessellation options
pub struct SurfaceOptions<'a> {
    pub u_range: (f32, f32),
    pub v_range: (f32, f32),
    pub u_segments: u32,
    pub v_segments: u32,
    /// Forced u samples (kept only when inside the range)
    pub u_knots: Vec<f32>,
    /// Forced v samples (kept only when inside the range)
    pub v_knots: Vec<f32>,
    pub u_closed: bool,
    pub v_closed: bool,
    pub shading: Shading,
    pub normal_fn: Option<NormalFn<'a>>,
    pub uv_fn: Option<UvFn<'a>>,
    pub epsilon: f32,
}

impl Default for SurfaceOptions<'_> {
    fn default() -> Self {
        Self {
            u_range: (0.0, 1.0),
            v_range: (0.0, 1.0),
            u_segments: 8,
            v_segments: 8,
            u_knots: Vec::new(),
            v_knots: Vec::new(),
            u_closed: false,
            v_closed: false,
            shading: Shading::Smooth,
            normal_fn: None,
            uv_fn: None,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Sampled positions, row-major in v (`points[i * u.len() + j] = f(u[j], v[i])`)
#[derive(Clone, Debug)]
pub struct SampleGrid {
    pub u: Vec<f32>,
    pub v: Vec<f32>,
    pub points: Vec<Vec3>,
}

impl SampleGrid {
    /// Point at row `i` (v) and column `j` (u)
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> Vec3 {
        self.points[i * self.u.len() + j]
    }
}

/// Merge a uniform grid with knots into a sorted, deduplicated sample list
///
/// Closed axes drop the upper bound (it coincides with the lower one) and
/// only accept knots in `[a, b)`.
pub fn build_samples(range: (f32, f32), segments: u32, knots: &[f32], closed: bool) -> Vec<f32> {
    let (a, b) = range;
    let n = segments.max(1);

    let mut samples: Vec<f32> = (0..=n)
        .filter(|&k| !(closed && k == n))
        .map(|k| a + (b - a) * (k as f32 / n as f32))
        .collect();

    samples.extend(knots.iter().copied().filter(|&t| {
        if closed {
            t >= a && t < b
        } else {
            t >= a && t <= b
        }
    }));

    samples.sort_by(f32::total_cmp);
    samples.dedup_by(|next, kept| (*next - *kept).abs() <= SAMPLE_MERGE_EPSILON);
    samples
}

/// Wrap `t` into `[a, b)`
pub fn wrap_to_range(t: f32, (a, b): (f32, f32)) -> f32 {
    let w = b - a;
    let x = a + (t - a).rem_euclid(w);
    if x >= b { a } else { x }
}

/// A parametric surface ready to be tessellated
pub struct ParametricSurface<'a, F>
where
    F: Fn(f32, f32) -> Vec3,
{
    func: F,
    options: SurfaceOptions<'a>,
}

impl<'a, F> ParametricSurface<'a, F>
where
    F: Fn(f32, f32) -> Vec3,
{
    pub fn new(func: F, options: SurfaceOptions<'a>) -> Self {
        Self { func, options }
    }

    pub fn options(&self) -> &SurfaceOptions<'a> {
        &self.options
    }

    /// Evaluate the map at the merged sample grid
    pub fn sample_grid(&self) -> Result<SampleGrid> {
        self.validate()?;
        let opts = &self.options;
        let u = build_samples(opts.u_range, opts.u_segments, &opts.u_knots, opts.u_closed);
        let v = build_samples(opts.v_range, opts.v_segments, &opts.v_knots, opts.v_closed);

        let mut points = Vec::with_capacity(u.len() * v.len());
        for &vi in &v {
            for &uj in &u {
                points.push((self.func)(uj, vi));
            }
        }

        Ok(SampleGrid { u, v, points })
    }

    /// Tessellate into an [`UnpackedMesh`]
    pub fn build(&self) -> Result<UnpackedMesh> {
        self.build_into()
    }

    /// Tessellate into any UV-capable mesh builder
    pub fn build_into<M: MeshBuilderUV>(&self) -> Result<M> {
        let grid = self.sample_grid()?;
        let opts = &self.options;
        let nu = grid.u.len();
        let nv = grid.v.len();

        let j_limit = if opts.u_closed { nu } else { nu - 1 };
        let i_limit = if opts.v_closed { nv } else { nv - 1 };

        let mut mesh = M::default();
        let mut triangle = 0usize;

        for i in 0..i_limit {
            let i_next = if opts.v_closed { (i + 1) % nv } else { i + 1 };
            for j in 0..j_limit {
                let j_next = if opts.u_closed { (j + 1) % nu } else { j + 1 };

                self.push_triangle(&mut mesh, &grid, [(i, j), (i, j_next), (i_next, j)], triangle);
                triangle += 1;

                self.push_triangle(
                    &mut mesh,
                    &grid,
                    [(i, j_next), (i_next, j_next), (i_next, j)],
                    triangle,
                );
                triangle += 1;
            }
        }

        debug!(
            "tessellated parametric surface: {}x{} samples, {} triangles",
            nu, nv, triangle
        );

        Ok(mesh)
    }

    fn validate(&self) -> Result<()> {
        let opts = &self.options;
        for (axis, (start, end)) in [("u", opts.u_range), ("v", opts.v_range)] {
            if !(start.is_finite() && end.is_finite() && start < end) {
                return Err(GeomError::InvalidRange { axis, start, end });
            }
        }
        if opts.u_segments == 0 {
            warn!("ParametricSurface: u_segments must be >= 1, clamping to 1");
        }
        if opts.v_segments == 0 {
            warn!("ParametricSurface: v_segments must be >= 1, clamping to 1");
        }
        Ok(())
    }

    fn epsilon(&self) -> f32 {
        let eps = self.options.epsilon;
        if eps.is_finite() && eps > 0.0 {
            eps
        } else {
            warn!("ParametricSurface: epsilon must be > 0.0, using {DEFAULT_EPSILON}");
            DEFAULT_EPSILON
        }
    }

    fn push_triangle<M: MeshBuilderUV>(
        &self,
        mesh: &mut M,
        grid: &SampleGrid,
        corners: [(usize, usize); 3],
        triangle: usize,
    ) {
        let [a, b, c] = corners.map(|(i, j)| grid.at(i, j));
        let face_normal = (b - a).cross(c - a).normalize_or_zero();

        let mut ids = [0u32; 3];
        for (corner, &(i, j)) in corners.iter().enumerate() {
            let u = grid.u[j];
            let v = grid.v[i];
            let position = grid.at(i, j);

            let normal = if let Some(normal_fn) = &self.options.normal_fn {
                let (du, dv) = self.partials(u, v, position);
                normal_fn(&NormalQuery {
                    u,
                    v,
                    triangle,
                    corner,
                    position,
                    du,
                    dv,
                })
                .normalize_or_zero()
            } else if self.options.shading == Shading::Smooth {
                let (du, dv) = self.partials(u, v, position);
                du.cross(dv).normalize_or_zero()
            } else {
                face_normal
            };

            ids[corner] = mesh.add_vertex_uv(position, self.uv(u, v), normal);
        }
        mesh.add_triangle(ids[0], ids[1], ids[2]);
    }

    fn uv(&self, u: f32, v: f32) -> (f32, f32) {
        if let Some(uv_fn) = &self.options.uv_fn {
            return uv_fn(u, v);
        }
        let (ua, ub) = self.options.u_range;
        let (va, vb) = self.options.v_range;
        ((u - ua) / (ub - ua), (v - va) / (vb - va))
    }

    /// Finite-difference partials at `(u, v)` where `p0 = f(u, v)`
    fn partials(&self, u: f32, v: f32, p0: Vec3) -> (Vec3, Vec3) {
        let eps = self.epsilon();
        let opts = &self.options;
        let du = axis_difference(|t| (self.func)(t, v), u, eps, opts.u_range, opts.u_closed, p0);
        let dv = axis_difference(|t| (self.func)(u, t), v, eps, opts.v_range, opts.v_closed, p0);
        (du, dv)
    }
}

/// Central difference where possible, one-sided at open boundaries
fn axis_difference(
    eval: impl Fn(f32) -> Vec3,
    t: f32,
    eps: f32,
    range: (f32, f32),
    closed: bool,
    p0: Vec3,
) -> Vec3 {
    let (a, b) = range;
    if closed {
        eval(wrap_to_range(t + eps, range)) - eval(wrap_to_range(t - eps, range))
    } else if t - eps >= a && t + eps <= b {
        eval(t + eps) - eval(t - eps)
    } else if t - eps < a {
        eval(t + eps) - p0
    } else {
        p0 - eval(t - eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(u: f32, v: f32) -> Vec3 {
        Vec3::new(u, 0.0, v)
    }

    #[test]
    fn test_samples_uniform_open() {
        let s = build_samples((0.0, 1.0), 4, &[], false);
        assert_eq!(s, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_samples_closed_drops_upper_bound() {
        let s = build_samples((0.0, 1.0), 4, &[], true);
        assert_eq!(s, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_samples_merge_knots() {
        let s = build_samples((0.0, 1.0), 2, &[0.3, 0.5, 2.0, -1.0], false);
        assert_eq!(s, vec![0.0, 0.3, 0.5, 1.0]);
    }

    #[test]
    fn test_samples_closed_rejects_upper_knot() {
        let s = build_samples((0.0, 1.0), 1, &[1.0, 0.6], true);
        assert_eq!(s, vec![0.0, 0.6]);
    }

    #[test]
    fn test_samples_zero_segments() {
        let s = build_samples((2.0, 4.0), 0, &[], false);
        assert_eq!(s, vec![2.0, 4.0]);
    }

    #[test]
    fn test_wrap_to_range_multiple_periods() {
        assert!((wrap_to_range(2.25, (0.0, 1.0)) - 0.25).abs() < 1e-6);
        assert!((wrap_to_range(-1.75, (0.0, 1.0)) - 0.25).abs() < 1e-6);
        assert_eq!(wrap_to_range(1.0, (0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_open_grid_vertex_count() {
        let options = SurfaceOptions {
            u_segments: 3,
            v_segments: 2,
            ..Default::default()
        };
        let mesh = ParametricSurface::new(plane, options).build().unwrap();
        // 3x2 cells, 2 triangles each, 3 vertices per triangle
        assert_eq!(mesh.vertex_count(), 3 * 2 * 6);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.is_valid());
        assert_eq!(mesh.uvs.len(), mesh.vertex_count());
    }

    #[test]
    fn test_closed_axis_wraps_cells() {
        let options = SurfaceOptions {
            u_segments: 4,
            v_segments: 1,
            u_closed: true,
            ..Default::default()
        };
        let mesh = ParametricSurface::new(plane, options).build().unwrap();
        // 4 u samples, all 4 connect (last wraps to first)
        assert_eq!(mesh.triangle_count(), 4 * 2);
    }

    #[test]
    fn test_indices_are_sequential() {
        let mesh = ParametricSurface::new(plane, SurfaceOptions::default())
            .build()
            .unwrap();
        for (i, &idx) in mesh.indices.iter().enumerate() {
            assert_eq!(idx as usize, i);
        }
    }

    #[test]
    fn test_smooth_normals_on_plane() {
        let mesh = ParametricSurface::new(plane, SurfaceOptions::default())
            .build()
            .unwrap();
        // du = +X, dv = +Z, X x Z = -Y
        for n in &mesh.normals {
            assert!((Vec3::from(*n) - Vec3::NEG_Y).length() < 1e-4);
        }
    }

    #[test]
    fn test_flat_normals_match_face() {
        let options = SurfaceOptions {
            shading: Shading::Flat,
            ..Default::default()
        };
        let mesh = ParametricSurface::new(
            |u: f32, v: f32| Vec3::new(u, u * u, v),
            options,
        )
        .build()
        .unwrap();
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.position(i));
            let face = (b - a).cross(c - a).normalize();
            for i in tri {
                let n = Vec3::from(mesh.normals[i as usize]);
                assert!((n - face).length() < 1e-5);
            }
        }
    }

    #[test]
    fn test_normal_fn_takes_priority() {
        let options = SurfaceOptions {
            shading: Shading::Flat,
            normal_fn: Some(Box::new(|_q: &NormalQuery| Vec3::new(0.0, 5.0, 0.0))),
            ..Default::default()
        };
        let mesh = ParametricSurface::new(plane, options).build().unwrap();
        for n in &mesh.normals {
            assert_eq!(*n, [0.0, 1.0, 0.0]);
        }
    }

    #[test]
    fn test_normal_fn_sees_triangle_and_corner() {
        use std::cell::RefCell;
        let seen = RefCell::new(Vec::new());
        let options = SurfaceOptions {
            u_segments: 1,
            v_segments: 1,
            normal_fn: Some(Box::new(|q: &NormalQuery| {
                seen.borrow_mut().push((q.triangle, q.corner));
                Vec3::Y
            })),
            ..Default::default()
        };
        ParametricSurface::new(plane, options).build().unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn test_default_uvs_normalized_to_range() {
        let options = SurfaceOptions {
            u_range: (-2.0, 2.0),
            v_range: (10.0, 20.0),
            ..Default::default()
        };
        let mesh = ParametricSurface::new(plane, options).build().unwrap();
        for uv in &mesh.uvs {
            assert!((0.0..=1.0).contains(&uv[0]));
            assert!((0.0..=1.0).contains(&uv[1]));
        }
    }

    #[test]
    fn test_uv_fn_overrides_default() {
        let options = SurfaceOptions {
            uv_fn: Some(Box::new(|u: f32, v: f32| (u * 2.0, v * 3.0))),
            ..Default::default()
        };
        let mesh = ParametricSurface::new(plane, options).build().unwrap();
        assert!(mesh.uvs.iter().any(|uv| uv[0] == 2.0));
        assert!(mesh.uvs.iter().any(|uv| uv[1] == 3.0));
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let options = SurfaceOptions {
            u_range: (1.0, 0.0),
            ..Default::default()
        };
        let err = ParametricSurface::new(plane, options).build().unwrap_err();
        assert!(matches!(err, GeomError::InvalidRange { axis: "u", .. }));
    }

    #[test]
    fn test_one_sided_differences_at_boundary() {
        // f(u) = u^2 along x; at u = 0 only a forward difference is possible
        let f = |t: f32| Vec3::new(t * t, 0.0, 0.0);
        let d = axis_difference(f, 0.0, 1e-3, (0.0, 1.0), false, f(0.0));
        assert!(d.x > 0.0);
        let d = axis_difference(f, 1.0, 1e-3, (0.0, 1.0), false, f(1.0));
        assert!(d.x > 0.0);
    }

    #[test]
    fn test_closed_difference_wraps_across_seam() {
        let circle = |t: f32| {
            let a = t * std::f32::consts::TAU;
            Vec3::new(a.cos(), a.sin(), 0.0)
        };
        let d = axis_difference(circle, 0.0, 1e-3, (0.0, 1.0), true, circle(0.0));
        // Tangent of the unit circle at angle 0 points along +Y
        assert!(d.normalize().dot(Vec3::Y) > 0.999);
    }

    #[test]
    fn test_cylinder_smooth_normals_point_outward() {
        let cylinder = |u: f32, v: f32| {
            let a = u * std::f32::consts::TAU;
            Vec3::new(a.cos(), v, a.sin())
        };
        let options = SurfaceOptions {
            u_segments: 16,
            v_segments: 2,
            u_closed: true,
            ..Default::default()
        };
        let mesh = ParametricSurface::new(cylinder, options).build().unwrap();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let radial = Vec3::new(p[0], 0.0, p[2]).normalize();
            // du x dv points inward for this orientation; it must be radial either way
            assert!(Vec3::from(*n).dot(radial).abs() > 0.99);
        }
    }
}
