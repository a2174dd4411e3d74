//! Ready-made parametric surfaces
//!
//! The `*_fn` constructors return closures for [`ParametricSurface`]. The
//! extrusion builders wrap a closure together with the knots and closed axes
//! that keep their polygon corners sharp.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Vec2, Vec3};

use super::parametric::{NormalQuery, ParametricSurface, Shading, SurfaceOptions, build_samples};
use super::types::UnpackedMesh;
use crate::error::{GeomError, Result};

/// Flat `width x height` rectangle on XZ, centred on the origin
pub fn plane_fn(width: f32, height: f32) -> impl Fn(f32, f32) -> Vec3 + Clone {
    move |u, v| Vec3::new(-width / 2.0 + u * width, 0.0, -height / 2.0 + v * height)
}

/// Radial ripples that decay with distance from the centre
///
/// `y = sin(d * freq) * amplitude / (1 + d)` where `d` is the distance from
/// the origin on XZ.
pub fn waves_fn(
    width: f32,
    height: f32,
    freq: f32,
    amplitude: f32,
) -> impl Fn(f32, f32) -> Vec3 + Clone {
    move |u, v| {
        let x = -width / 2.0 + u * width;
        let z = -height / 2.0 + v * height;
        let d = (x * x + z * z).sqrt();
        Vec3::new(x, (d * freq).sin() * amplitude / (1.0 + d), z)
    }
}

/// Torus section swept around X with an optional rippled tube
///
/// `u` walks around the tube, `v` along the sweep. The sweep angle is
/// `(to - from) * (from + v)`, and the tube radius is modulated by
/// `sin(freq * v) * amplitude`.
pub fn torus_fn(
    major_radius: f32,
    minor_radius: f32,
    from: f32,
    to: f32,
    freq: f32,
    amplitude: f32,
) -> impl Fn(f32, f32) -> Vec3 + Clone {
    move |u, v| {
        let theta = TAU * u;
        let phi = (to - from) * (from + v);
        let tube = minor_radius + (freq * v).sin() * amplitude;
        let ring = major_radius + tube * theta.cos();
        Vec3::new(tube * theta.sin(), ring * phi.sin(), ring * phi.cos())
    }
}

/// Star prism with an optional twist along the extrusion
#[derive(Clone, Debug)]
pub struct ExtrudedStar {
    /// Number of star tips (>= 2)
    pub points: u32,
    pub r_outer: f32,
    pub r_inner: f32,
    /// Total extrusion length, centred on Z = 0
    pub depth: f32,
    /// Full turns of twist over the whole extrusion
    pub twist_turns: f32,
    pub u_segments_per_edge: u32,
    pub v_segments: u32,
    pub shading: Shading,
}

impl Default for ExtrudedStar {
    fn default() -> Self {
        Self {
            points: 5,
            r_outer: 1.0,
            r_inner: 0.5,
            depth: 1.0,
            twist_turns: 1.0,
            u_segments_per_edge: 6,
            v_segments: 32,
            shading: Shading::Flat,
        }
    }
}

impl ExtrudedStar {
    /// Star outline on XY: `2 * points` corners alternating outer and inner radius
    ///
    /// The first tip points towards -Y.
    pub fn outline(&self) -> Vec<Vec2> {
        let corners = self.points * 2;
        (0..corners)
            .map(|k| {
                let angle = k as f32 * PI / self.points as f32 - FRAC_PI_2;
                let r = if k % 2 == 0 { self.r_outer } else { self.r_inner };
                Vec2::new(r * angle.cos(), r * angle.sin())
            })
            .collect()
    }

    pub fn build(&self) -> Result<UnpackedMesh> {
        if self.points < 2 {
            return Err(GeomError::invalid(
                "points",
                format!("a star needs at least 2 points, got {}", self.points),
            ));
        }

        let outline = self.outline();
        let corners = outline.len();
        let twist = TAU * self.twist_turns;
        let depth = self.depth;

        let func = move |u: f32, v: f32| {
            let t = u * corners as f32;
            let edge = (t.floor() as usize) % corners;
            let s = t - t.floor();
            let p = outline[edge].lerp(outline[(edge + 1) % corners], s);
            let rotated = Vec2::from_angle(twist * v).rotate(p);
            Vec3::new(rotated.x, rotated.y, (v - 0.5) * depth)
        };

        let options = SurfaceOptions {
            u_closed: true,
            u_segments: self.u_segments_per_edge.max(1) * corners as u32,
            v_segments: self.v_segments,
            u_knots: (0..corners).map(|k| k as f32 / corners as f32).collect(),
            v_knots: vec![0.0, 1.0],
            shading: self.shading,
            ..Default::default()
        };

        ParametricSurface::new(func, options).build()
    }
}

/// Rectangular tube: a `width x height` rectangle extruded along Z
#[derive(Clone, Debug)]
pub struct ExtrudedRect {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub u_segments: u32,
    pub v_segments: u32,
    /// Use exact per-side normals instead of flat face normals
    pub analytic_normals: bool,
}

impl Default for ExtrudedRect {
    fn default() -> Self {
        Self {
            width: 3.0,
            height: 1.0,
            depth: 6.0,
            u_segments: 24,
            v_segments: 1,
            analytic_normals: false,
        }
    }
}

/// Outward normal of each rectangle side in walking order
const RECT_SIDE_NORMALS: [Vec3; 4] = [Vec3::NEG_Y, Vec3::X, Vec3::Y, Vec3::NEG_X];

const RECT_KNOTS: [f32; 4] = [0.0, 0.25, 0.5, 0.75];

impl ExtrudedRect {
    /// Point on the rectangle outline at `u` (bottom, right, top, left)
    fn outline(&self, u: f32) -> Vec2 {
        let (w, h) = (self.width, self.height);
        let t = u * 4.0;
        let side = t.floor() as i32;
        let s = t - t.floor();
        match side {
            0 => Vec2::new(-w / 2.0 + s * w, -h / 2.0),
            1 => Vec2::new(w / 2.0, -h / 2.0 + s * h),
            2 => Vec2::new(w / 2.0 - s * w, h / 2.0),
            _ => Vec2::new(-w / 2.0, h / 2.0 - s * h),
        }
    }

    pub fn build(&self) -> Result<UnpackedMesh> {
        for (name, value) in [("width", self.width), ("height", self.height), ("depth", self.depth)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(GeomError::invalid(name, format!("must be > 0.0, got {value}")));
            }
        }

        let depth = self.depth;
        let func = |u: f32, v: f32| self.outline(u).extend((v - 0.5) * depth);

        let mut options = SurfaceOptions {
            u_closed: true,
            u_segments: self.u_segments,
            v_segments: self.v_segments,
            u_knots: RECT_KNOTS.to_vec(),
            v_knots: vec![0.0, 1.0],
            shading: Shading::Flat,
            ..Default::default()
        };

        if self.analytic_normals {
            // A corner sample is shared by two sides, so pick the side from the
            // middle of the cell that owns the triangle.
            let u_samples = build_samples((0.0, 1.0), self.u_segments, &RECT_KNOTS, true);
            options.normal_fn = Some(Box::new(move |q: &NormalQuery| {
                let cells = u_samples.len();
                let cell = (q.triangle / 2) % cells;
                let start = u_samples[cell];
                let end = u_samples.get(cell + 1).copied().unwrap_or(1.0);
                let side = (((start + end) * 2.0).floor() as usize).min(3);
                RECT_SIDE_NORMALS[side]
            }));
        }

        ParametricSurface::new(func, options).build()
    }
}
