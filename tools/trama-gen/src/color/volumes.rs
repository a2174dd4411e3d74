//! Sub-volumes of the colour spaces as vertex-coloured meshes
//!
//! RGB and CMY are axis-aligned boxes. HSV is a cylinder sector and HSL a
//! double-cone sector, both revolved around +Y with hue measured from +Z
//! towards +X. Their walls, caps and side faces are tessellated as
//! parametric surfaces with analytic normals.

use std::f32::consts::TAU;

use glam::Vec3;
use tracing::{debug, warn};
use trama_geom::procedural::{
    NormalQuery, ParametricSurface, SurfaceOptions, UnpackedMesh, build_samples, generate_box,
};

use super::{
    ColorLimits, ColorModel, L_MID_POINT, MAX_VISUAL_RADIUS_AT_MID, cmy_to_rgb, hsl_radius,
    hsl_radius_slope, hsl_to_rgb, hsv_to_rgb, to_rgba8,
};
use crate::mesh::{Edge, MeshModifier, Transform, combine};

/// Segments around a full turn of a revolved volume
pub const RADIAL_SEGMENTS: u32 = 64;

/// Segments around a full turn of an outline ring
pub const OUTLINE_SEGMENTS: u32 = 32;

const HSV_HEIGHT_SEGMENTS: u32 = 8;
const HSL_HEIGHT_SEGMENTS: u32 = 16;

/// Caps narrower than this are dropped
const MIN_CAP_RADIUS: f32 = 0.001;

/// Build the sub-volume described by `limits`
pub fn color_volume(limits: &ColorLimits) -> Option<UnpackedMesh> {
    match limits.model {
        ColorModel::Rgb => rgb_volume(limits.channels),
        ColorModel::Cmy => cmy_volume(limits.channels),
        ColorModel::Hsv => hsv_volume(limits.channels),
        ColorModel::Hsl => hsl_volume(limits.channels),
    }
}

/// Box spanning `[min, max]` of R, G and B
pub fn rgb_volume(limits: [(f32, f32); 3]) -> Option<UnpackedMesh> {
    box_volume(limits, |p| p)
}

/// Box spanning `[min, max]` of C, M and Y, coloured in RGB
pub fn cmy_volume(limits: [(f32, f32); 3]) -> Option<UnpackedMesh> {
    box_volume(limits, cmy_to_rgb)
}

/// Cylinder sector: hue (degrees) around, saturation out, value up
pub fn hsv_volume(limits: [(f32, f32); 3]) -> Option<UnpackedMesh> {
    let [(h0, h1), (s0, s1), (v0, v1)] = limits;
    if !(h1 > h0 && s1 > s0 && v1 > v0 && s1 > 0.0) {
        debug!("hsv volume {:?} is empty", limits);
        return None;
    }

    let span = (h1 - h0).min(360.0).to_radians();
    let start = h0.to_radians();
    let sector = Sector {
        profile: Profile::Cylinder,
        theta: (start, start + span),
        s: (s0.max(0.0), s1),
        y: (v0, v1),
        y_knots: Vec::new(),
        radial_segments: radial_segments_for(span),
        height_segments: HSV_HEIGHT_SEGMENTS,
    };

    let mut mesh = sector.build()?;
    paint_by_position(&mut mesh, |p| {
        let (theta, r) = polar(p);
        hsv_to_rgb(theta.to_degrees(), r, p.y)
    });
    Some(mesh)
}

/// Double-cone sector: hue (turns) around, saturation out, lightness up
///
/// A knot at the widest lightness keeps the rim of the cone sharp.
pub fn hsl_volume(limits: [(f32, f32); 3]) -> Option<UnpackedMesh> {
    let [(h0, h1), (s0, s1), (l0, l1)] = limits;
    let (l0, l1) = (l0.max(0.0), l1.min(1.0));
    if !(h1 > h0 && s1 > s0 && l1 > l0 && s1 > 0.0) {
        debug!("hsl volume {:?} is empty", limits);
        return None;
    }

    let span = (h1 - h0).min(1.0) * TAU;
    let start = h0 * TAU;
    let sector = Sector {
        profile: Profile::DoubleCone,
        theta: (start, start + span),
        s: (s0.max(0.0), s1),
        y: (l0, l1),
        y_knots: vec![L_MID_POINT],
        radial_segments: radial_segments_for(span),
        height_segments: HSL_HEIGHT_SEGMENTS,
    };

    let mut mesh = sector.build()?;
    paint_by_position(&mut mesh, |p| {
        let (theta, r) = polar(p);
        let full = hsl_radius(p.y);
        let s = if full > 1e-6 { (r / full).min(1.0) } else { 0.0 };
        hsl_to_rgb(theta / TAU, s, p.y)
    });
    Some(mesh)
}

/// Edges outlining the whole colour space, ready for `tubes_from_edges`
///
/// RGB/CMY give the unit cube. HSV gives both rims and the seams of a unit
/// cylinder. HSL gives the rim of the double cone and the lightness axis.
pub fn outline_edges(model: ColorModel) -> Vec<Edge> {
    match model {
        ColorModel::Rgb | ColorModel::Cmy => {
            let corner = |k: u32| {
                Vec3::new((k & 1) as f32, ((k >> 1) & 1) as f32, ((k >> 2) & 1) as f32)
            };
            let mut edges = Vec::with_capacity(12);
            for k in 0..8 {
                for bit in [1, 2, 4] {
                    if k & bit == 0 {
                        edges.push(Edge::new(corner(k), corner(k | bit)));
                    }
                }
            }
            edges
        }
        ColorModel::Hsv => {
            let mut edges = ring(0.0, 1.0, OUTLINE_SEGMENTS);
            edges.extend(ring(1.0, 1.0, OUTLINE_SEGMENTS));
            edges.extend((0..OUTLINE_SEGMENTS).map(|k| {
                let p = rim_point(k, 1.0, OUTLINE_SEGMENTS);
                Edge::new(p, p + Vec3::Y)
            }));
            edges
        }
        ColorModel::Hsl => {
            let mut edges = ring(L_MID_POINT, MAX_VISUAL_RADIUS_AT_MID, OUTLINE_SEGMENTS);
            edges.push(Edge::new(Vec3::ZERO, Vec3::Y));
            edges
        }
    }
}

fn box_volume(limits: [(f32, f32); 3], color: impl Fn(Vec3) -> Vec3) -> Option<UnpackedMesh> {
    let min = Vec3::from(limits.map(|(lo, _)| lo));
    let max = Vec3::from(limits.map(|(_, hi)| hi));
    let size = max - min;
    if size.min_element() <= 0.0 {
        debug!("box volume {:?} is empty", limits);
        return None;
    }

    let mut mesh: UnpackedMesh = generate_box(size.x, size.y, size.z);
    let center = (min + max) * 0.5;
    Transform::translate(center.x, center.y, center.z).apply(&mut mesh);
    paint_by_position(&mut mesh, color);
    Some(mesh)
}

fn paint_by_position(mesh: &mut UnpackedMesh, color: impl Fn(Vec3) -> Vec3) {
    mesh.colors = mesh
        .positions
        .iter()
        .map(|p| to_rgba8(color(Vec3::from(*p))))
        .collect();
}

/// Angle around +Y from +Z (in `[0, TAU)`) and distance from the axis
fn polar(p: Vec3) -> (f32, f32) {
    (p.x.atan2(p.z).rem_euclid(TAU), p.x.hypot(p.z))
}

fn radial_segments_for(span: f32) -> u32 {
    ((RADIAL_SEGMENTS as f32 * span / TAU).ceil() as u32).max(3)
}

fn rim_point(k: u32, radius: f32, segments: u32) -> Vec3 {
    let theta = k as f32 / segments as f32 * TAU;
    Vec3::new(radius * theta.sin(), 0.0, radius * theta.cos())
}

fn ring(y: f32, radius: f32, segments: u32) -> Vec<Edge> {
    let lift = Vec3::new(0.0, y, 0.0);
    (0..segments)
        .map(|k| {
            Edge::new(
                rim_point(k, radius, segments) + lift,
                rim_point(k + 1, radius, segments) + lift,
            )
        })
        .collect()
}

/// Radius scale of a revolved volume along its axis
#[derive(Clone, Copy, Debug)]
enum Profile {
    Cylinder,
    DoubleCone,
}

impl Profile {
    fn radius(self, y: f32) -> f32 {
        match self {
            Self::Cylinder => 1.0,
            Self::DoubleCone => hsl_radius(y),
        }
    }

    fn slope(self, y: f32) -> f32 {
        match self {
            Self::Cylinder => 0.0,
            Self::DoubleCone => hsl_radius_slope(y),
        }
    }
}

/// Revolved sector bounded in angle, saturation and height
struct Sector {
    profile: Profile,
    /// Radians
    theta: (f32, f32),
    s: (f32, f32),
    y: (f32, f32),
    y_knots: Vec<f32>,
    radial_segments: u32,
    height_segments: u32,
}

impl Sector {
    fn is_full(&self) -> bool {
        self.theta.1 - self.theta.0 >= TAU - 1e-4
    }

    fn point(&self, theta: f32, s: f32, y: f32) -> Vec3 {
        let r = s * self.profile.radius(y);
        Vec3::new(r * theta.sin(), y, r * theta.cos())
    }

    fn build(&self) -> Option<UnpackedMesh> {
        let mut parts = Vec::with_capacity(6);
        parts.extend(self.wall(self.s.1, true));
        if self.s.0 > 0.0 {
            parts.extend(self.wall(self.s.0, false));
        }
        parts.extend(self.cap(self.y.0, false));
        parts.extend(self.cap(self.y.1, true));
        if !self.is_full() {
            parts.extend(self.side(self.theta.0, true));
            parts.extend(self.side(self.theta.1, false));
        }

        let refs: Vec<&UnpackedMesh> = parts.iter().collect();
        let mesh = combine(&refs);
        (!mesh.is_empty()).then_some(mesh)
    }

    /// Revolved wall at saturation `s`, facing away from the axis when `outward`
    fn wall(&self, s: f32, outward: bool) -> Option<UnpackedMesh> {
        let (t0, t1) = self.theta;
        let closed = self.is_full();
        // Running theta backwards flips the winding
        let theta_at = move |u: f32| if outward { u } else { t0 + t1 - u };
        let sign = if outward { 1.0 } else { -1.0 };

        let rows = build_samples(self.y, self.height_segments, &self.y_knots, false);
        let columns = build_samples(self.theta, self.radial_segments, &[], closed).len();
        let columns = if closed { columns } else { columns - 1 };
        let profile = self.profile;

        let options = SurfaceOptions {
            u_range: self.theta,
            v_range: self.y,
            u_segments: self.radial_segments,
            v_segments: self.height_segments,
            v_knots: self.y_knots.clone(),
            u_closed: closed,
            // The slope is taken from the owning row so the cone rim stays sharp
            normal_fn: Some(Box::new(move |q: &NormalQuery| {
                let row = (q.triangle / (2 * columns)).min(rows.len().saturating_sub(2));
                let mid = 0.5 * (rows[row] + rows[row + 1]);
                let theta = theta_at(q.u);
                Vec3::new(theta.sin(), -s * profile.slope(mid), theta.cos()) * sign
            })),
            ..Default::default()
        };

        tessellate(
            ParametricSurface::new(|u, y| self.point(theta_at(u), s, y), options),
            "wall",
        )
    }

    /// Flat annular cap at height `y`
    fn cap(&self, y: f32, top: bool) -> Option<UnpackedMesh> {
        if self.profile.radius(y) * self.s.1 <= MIN_CAP_RADIUS {
            return None;
        }

        let (t0, t1) = self.theta;
        // Increasing theta then saturation faces -Y
        let theta_at = move |u: f32| if top { t0 + t1 - u } else { u };
        let normal = if top { Vec3::Y } else { Vec3::NEG_Y };

        let options = SurfaceOptions {
            u_range: self.theta,
            v_range: self.s,
            u_segments: self.radial_segments,
            v_segments: 1,
            u_closed: self.is_full(),
            normal_fn: Some(Box::new(move |_: &NormalQuery| normal)),
            ..Default::default()
        };

        tessellate(
            ParametricSurface::new(|u, s| self.point(theta_at(u), s, y), options),
            "cap",
        )
    }

    /// Radial face closing a partial sector at angle `theta`
    fn side(&self, theta: f32, at_start: bool) -> Option<UnpackedMesh> {
        let (s0, s1) = self.s;
        let s_at = move |u: f32| if at_start { u } else { s0 + s1 - u };
        let outward = Vec3::new(-theta.cos(), 0.0, theta.sin());
        let normal = if at_start { outward } else { -outward };

        let options = SurfaceOptions {
            u_range: self.s,
            v_range: self.y,
            u_segments: 1,
            v_segments: self.height_segments,
            v_knots: self.y_knots.clone(),
            normal_fn: Some(Box::new(move |_: &NormalQuery| normal)),
            ..Default::default()
        };

        tessellate(
            ParametricSurface::new(|u, y| self.point(theta, s_at(u), y), options),
            "side",
        )
    }
}

fn tessellate<F>(surface: ParametricSurface<'_, F>, part: &str) -> Option<UnpackedMesh>
where
    F: Fn(f32, f32) -> Vec3,
{
    match surface.build() {
        Ok(mesh) => Some(mesh),
        Err(e) => {
            warn!("colour volume {part}: {e}");
            None
        }
    }
}
