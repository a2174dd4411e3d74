//! Simple indexed primitives with UVs (box, sphere, plane, torus)

use glam::Vec3;
use std::f32::consts::{PI, TAU};
use tracing::warn;

use crate::procedural::types::MeshBuilderUV;

/// Clamp a strictly positive size, warning when the caller passed nonsense
pub(crate) fn positive(value: f32, what: &str, generator: &str) -> f32 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        warn!("{generator}: {what} must be > 0.0, clamping to 0.001");
        0.001
    }
}

/// Generate an axis-aligned box centred on the origin
///
/// # Arguments
/// * `width` - Full extent along X
/// * `height` - Full extent along Y
/// * `depth` - Full extent along Z
///
/// # Returns
/// Mesh with 24 vertices (4 per face) so every face keeps a hard normal.
/// Each face maps the full `[0,1]` UV square.
pub fn generate_box<M: MeshBuilderUV>(width: f32, height: f32, depth: f32) -> M {
    let half = Vec3::new(
        positive(width, "width", "generate_box"),
        positive(height, "height", "generate_box"),
        positive(depth, "depth", "generate_box"),
    ) * 0.5;

    // (normal, u axis, v axis) with u x v == normal
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut mesh = M::default();
    for (normal, u_axis, v_axis) in FACES {
        let center = normal * normal.abs().dot(half);
        let hu = u_axis * u_axis.abs().dot(half);
        let hv = v_axis * v_axis.abs().dot(half);

        let i0 = mesh.add_vertex_uv(center - hu - hv, (0.0, 0.0), normal);
        let i1 = mesh.add_vertex_uv(center + hu - hv, (1.0, 0.0), normal);
        let i2 = mesh.add_vertex_uv(center + hu + hv, (1.0, 1.0), normal);
        let i3 = mesh.add_vertex_uv(center - hu + hv, (0.0, 1.0), normal);

        mesh.add_triangle(i0, i1, i2);
        mesh.add_triangle(i0, i2, i3);
    }
    mesh
}

/// Generate a UV sphere
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `segments` - Longitudinal divisions (min 3, max 512)
/// * `rings` - Latitudinal divisions (min 2, max 512)
///
/// The seam column is duplicated so U runs from 0 to 1 inclusive. V runs
/// from the north pole (0) to the south pole (1). Pole rows are fans, so
/// the mesh has `2 * segments * (rings - 1)` triangles.
pub fn generate_sphere<M: MeshBuilderUV>(radius: f32, segments: u32, rings: u32) -> M {
    let radius = positive(radius, "radius", "generate_sphere");
    let segments = segments.clamp(3, 512);
    let rings = rings.clamp(2, 512);

    let mut mesh = M::default();
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * PI;
        let (sin_phi, cos_phi) = match ring {
            0 => (0.0, 1.0),
            r if r == rings => (0.0, -1.0),
            _ => phi.sin_cos(),
        };
        for seg in 0..=segments {
            let u = seg as f32 / segments as f32;
            let theta = u * TAU;
            let normal = Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin());
            mesh.add_vertex_uv(normal * radius, (u, v), normal);
        }
    }

    let row = segments + 1;
    for ring in 0..rings {
        for seg in 0..segments {
            let a = ring * row + seg;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            // Pole rows collapse to a point, keep only the fan triangle
            if ring != 0 {
                mesh.add_triangle(a, b, d);
            }
            if ring != rings - 1 {
                mesh.add_triangle(a, d, c);
            }
        }
    }
    mesh
}

/// Generate a subdivided plane on XZ (Y = 0) facing +Y
///
/// U follows X and V follows Z, both over `[0,1]`.
pub fn generate_plane<M: MeshBuilderUV>(
    width: f32,
    depth: f32,
    subdivisions_x: u32,
    subdivisions_z: u32,
) -> M {
    let width = positive(width, "width", "generate_plane");
    let depth = positive(depth, "depth", "generate_plane");
    let sx = subdivisions_x.clamp(1, 1024);
    let sz = subdivisions_z.clamp(1, 1024);

    let mut mesh = M::default();
    for z in 0..=sz {
        let v = z as f32 / sz as f32;
        for x in 0..=sx {
            let u = x as f32 / sx as f32;
            let position = Vec3::new((u - 0.5) * width, 0.0, (v - 0.5) * depth);
            mesh.add_vertex_uv(position, (u, v), Vec3::Y);
        }
    }

    let row = sx + 1;
    for z in 0..sz {
        for x in 0..sx {
            let a = z * row + x;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            mesh.add_triangle(a, c, b);
            mesh.add_triangle(b, c, d);
        }
    }
    mesh
}

/// Generate a torus lying on XZ around the Y axis
///
/// # Arguments
/// * `major_radius` - Distance from the centre to the tube centre
/// * `minor_radius` - Tube radius
/// * `major_segments` - Divisions around the ring (min 3, max 512)
/// * `minor_segments` - Divisions around the tube (min 3, max 512)
pub fn generate_torus<M: MeshBuilderUV>(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> M {
    let major_radius = positive(major_radius, "major_radius", "generate_torus");
    let minor_radius = positive(minor_radius, "minor_radius", "generate_torus");
    let major_segments = major_segments.clamp(3, 512);
    let minor_segments = minor_segments.clamp(3, 512);

    let mut mesh = M::default();
    for i in 0..=major_segments {
        let u = i as f32 / major_segments as f32;
        let (sin_t, cos_t) = (u * TAU).sin_cos();
        for j in 0..=minor_segments {
            let v = j as f32 / minor_segments as f32;
            let (sin_p, cos_p) = (v * TAU).sin_cos();
            let normal = Vec3::new(cos_p * cos_t, sin_p, cos_p * sin_t);
            let ring = major_radius + minor_radius * cos_p;
            let position = Vec3::new(ring * cos_t, minor_radius * sin_p, ring * sin_t);
            mesh.add_vertex_uv(position, (u, v), normal);
        }
    }

    let row = minor_segments + 1;
    for i in 0..major_segments {
        for j in 0..minor_segments {
            let a = i * row + j;
            let along_tube = a + 1;
            let along_ring = a + row;
            let both = along_ring + 1;
            mesh.add_triangle(a, along_tube, along_ring);
            mesh.add_triangle(along_tube, both, along_ring);
        }
    }
    mesh
}
