//! Cylinder builders with UV coordinates
//!
//! [`generate_cylinder_wall`] and [`generate_closed_cylinder`] stand on the
//! XZ plane and grow towards +Y. [`generate_cylinder`] is a frustum centred
//! on the origin and doubles as a cone when one radius is zero.

use glam::Vec3;
use std::f32::consts::TAU;
use tracing::warn;

use super::simple::positive;
use crate::procedural::types::MeshBuilderUV;

/// Generate the open wall of a cylinder (no caps)
///
/// # Arguments
/// * `radius` - Wall radius
/// * `height` - Wall height, spanning `y` in `[0, height]`
/// * `radial_segments` - Divisions around the axis (min 3, max 512)
/// * `height_segments` - Divisions along the axis (min 1, max 512)
///
/// # Returns
/// `(height_segments + 1) x (radial_segments + 1)` vertices with radial
/// normals. U wraps around the axis and V climbs from bottom to top.
pub fn generate_cylinder_wall<M: MeshBuilderUV>(
    radius: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> M {
    let mut mesh = M::default();
    let radius = positive(radius, "radius", "generate_cylinder_wall");
    let height = positive(height, "height", "generate_cylinder_wall");
    let radial_segments = radial_segments.clamp(3, 512);
    let height_segments = height_segments.clamp(1, 512);
    push_wall(&mut mesh, radius, height, radial_segments, height_segments);
    mesh
}

/// Generate a cylinder wall with a bottom cap at `y = 0` and a top cap at `y = height`
///
/// Caps are fans around a centre vertex with planar UVs
/// `(0.5 + x / 2r, 0.5 + z / 2r)`.
pub fn generate_closed_cylinder<M: MeshBuilderUV>(
    radius: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) -> M {
    let mut mesh = M::default();
    let radius = positive(radius, "radius", "generate_closed_cylinder");
    let height = positive(height, "height", "generate_closed_cylinder");
    let radial_segments = radial_segments.clamp(3, 512);
    let height_segments = height_segments.clamp(1, 512);

    push_wall(&mut mesh, radius, height, radial_segments, height_segments);
    push_cap(&mut mesh, radius, 0.0, radial_segments, false);
    push_cap(&mut mesh, radius, height, radial_segments, true);
    mesh
}

fn push_wall<M: MeshBuilderUV>(
    mesh: &mut M,
    radius: f32,
    height: f32,
    radial_segments: u32,
    height_segments: u32,
) {
    let row = radial_segments + 1;
    let mut base = 0;

    for i in 0..=height_segments {
        let v = i as f32 / height_segments as f32;
        let y = v * height;
        for j in 0..=radial_segments {
            let u = j as f32 / radial_segments as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let index = mesh.add_vertex_uv(
                Vec3::new(radius * cos, y, radius * sin),
                (u, v),
                Vec3::new(cos, 0.0, sin),
            );
            if i == 0 && j == 0 {
                base = index;
            }
        }
    }

    for i in 0..height_segments {
        for j in 0..radial_segments {
            let a = base + i * row + j;
            let b = a + row;
            let c = b + 1;
            let d = a + 1;
            mesh.add_triangle(a, b, d);
            mesh.add_triangle(b, c, d);
        }
    }
}

fn push_cap<M: MeshBuilderUV>(mesh: &mut M, radius: f32, y: f32, segments: u32, top: bool) {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let center = mesh.add_vertex_uv(Vec3::new(0.0, y, 0.0), (0.5, 0.5), normal);

    for i in 0..=segments {
        let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
        let (x, z) = (radius * cos, radius * sin);
        mesh.add_vertex_uv(
            Vec3::new(x, y, z),
            (0.5 + x / (2.0 * radius), 0.5 + z / (2.0 * radius)),
            normal,
        );
    }

    // Ring angle runs +X towards +Z, clockwise seen from above
    for i in 0..segments {
        let b = center + i + 1;
        let c = center + i + 2;
        if top {
            mesh.add_triangle(center, c, b);
        } else {
            mesh.add_triangle(center, b, c);
        }
    }
}

/// Generate a frustum centred on the origin with slanted side normals
///
/// # Arguments
/// * `radius_bottom` - Radius at `y = -height / 2` (>= 0.0)
/// * `radius_top` - Radius at `y = height / 2` (>= 0.0)
/// * `height` - Total height
/// * `segments` - Radial divisions (min 3, max 512)
///
/// Caps are only emitted for non-zero radii.
pub fn generate_cylinder<M: MeshBuilderUV>(
    radius_bottom: f32,
    radius_top: f32,
    height: f32,
    segments: u32,
) -> M {
    let clamp_radius = |r: f32, what: &str| {
        if r < 0.0 || !r.is_finite() {
            warn!("generate_cylinder: {what} must be >= 0.0, clamping to 0.0");
            0.0
        } else {
            r
        }
    };
    let mut radius_bottom = clamp_radius(radius_bottom, "radius_bottom");
    let radius_top = clamp_radius(radius_top, "radius_top");
    if radius_bottom == 0.0 && radius_top == 0.0 {
        warn!("generate_cylinder: both radii are 0.0, clamping radius_bottom to 0.001");
        radius_bottom = 0.001;
    }
    let height = positive(height, "height", "generate_cylinder");
    let segments = segments.clamp(3, 512);

    let mut mesh = M::default();
    let half = height * 0.5;

    // Side normal tilts up when the bottom is wider
    let slope = radius_bottom - radius_top;
    let slant = (height * height + slope * slope).sqrt();
    let (ny, nr) = (slope / slant, height / slant);

    for i in 0..=segments {
        let u = i as f32 / segments as f32;
        let (sin, cos) = (u * TAU).sin_cos();
        let normal = Vec3::new(nr * cos, ny, nr * sin);
        mesh.add_vertex_uv(
            Vec3::new(radius_bottom * cos, -half, radius_bottom * sin),
            (u, 0.0),
            normal,
        );
        mesh.add_vertex_uv(
            Vec3::new(radius_top * cos, half, radius_top * sin),
            (u, 1.0),
            normal,
        );
    }

    for i in 0..segments {
        let bottom = i * 2;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        mesh.add_triangle(bottom, top, next_bottom);
        mesh.add_triangle(top, next_top, next_bottom);
    }

    if radius_bottom > 0.0 {
        push_cap(&mut mesh, radius_bottom, -half, segments, false);
    }
    if radius_top > 0.0 {
        push_cap(&mut mesh, radius_top, half, segments, true);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedural::UnpackedMesh;

    fn face_normal(mesh: &UnpackedMesh, tri: [u32; 3]) -> Vec3 {
        let [a, b, c] = tri.map(|i| mesh.position(i));
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_wall_vertex_and_index_counts() {
        let mesh: UnpackedMesh = generate_cylinder_wall(1.0, 2.0, 8, 3);
        assert_eq!(mesh.vertex_count(), 4 * 9);
        assert_eq!(mesh.triangle_count(), 3 * 8 * 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_wall_indices_follow_existing_vertices() {
        let mut mesh = UnpackedMesh::default();
        push_cap(&mut mesh, 1.0, 0.0, 6, false);
        let offset = mesh.vertex_count() as u32;
        let cap_indices = mesh.indices.len();

        push_wall(&mut mesh, 1.0, 1.0, 6, 2);
        let wall = &mesh.indices[cap_indices..];
        assert_eq!(wall.len(), 2 * 6 * 2 * 3);
        assert!(wall.iter().all(|&i| i >= offset));
        assert_eq!(wall.iter().min(), Some(&offset));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_wall_spans_zero_to_height() {
        let mesh: UnpackedMesh = generate_cylinder_wall(1.0, 2.5, 12, 2);
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.min.y - 0.0).abs() < 1e-6);
        assert!((bounds.max.y - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_wall_faces_outward() {
        let mesh: UnpackedMesh = generate_cylinder_wall(1.0, 1.0, 16, 1);
        for tri in mesh.triangles() {
            let centroid = tri.iter().map(|&i| mesh.position(i)).sum::<Vec3>() / 3.0;
            let radial = Vec3::new(centroid.x, 0.0, centroid.z).normalize();
            assert!(face_normal(&mesh, tri).dot(radial) > 0.9);
        }
    }

    #[test]
    fn test_closed_cylinder_caps_agree_with_normals() {
        let mesh: UnpackedMesh = generate_closed_cylinder(1.0, 2.0, 10, 1);
        let wall_triangles = 10 * 2;
        assert_eq!(mesh.triangle_count(), wall_triangles + 2 * 10);
        assert!(mesh.is_valid());

        for tri in mesh.triangles().skip(wall_triangles) {
            let stored = Vec3::from(mesh.normals[tri[0] as usize]);
            assert!(face_normal(&mesh, tri).dot(stored) > 0.99);
        }
    }

    #[test]
    fn test_cap_uvs_stay_in_unit_square() {
        let mesh: UnpackedMesh = generate_closed_cylinder(3.0, 1.0, 7, 1);
        for uv in &mesh.uvs {
            assert!(uv[0] >= -1e-6 && uv[0] <= 1.0 + 1e-6);
            assert!(uv[1] >= -1e-6 && uv[1] <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_frustum_cone_has_single_cap() {
        let cone: UnpackedMesh = generate_cylinder(1.0, 0.0, 2.0, 8);
        let side_triangles = 8 * 2;
        assert_eq!(cone.triangle_count(), side_triangles + 8);
        let bounds = cone.bounds().unwrap();
        assert!((bounds.min.y + 1.0).abs() < 1e-6);
        assert!((bounds.max.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_frustum_side_faces_outward() {
        let mesh: UnpackedMesh = generate_cylinder(0.5, 0.5, 1.0, 12);
        for tri in mesh.triangles().take(24) {
            let centroid = tri.iter().map(|&i| mesh.position(i)).sum::<Vec3>() / 3.0;
            let radial = Vec3::new(centroid.x, 0.0, centroid.z).normalize();
            assert!(face_normal(&mesh, tri).dot(radial) > 0.9);
        }
    }

    #[test]
    fn test_degenerate_parameters_are_clamped() {
        let mesh: UnpackedMesh = generate_cylinder_wall(-1.0, 0.0, 0, 0);
        assert_eq!(mesh.vertex_count(), 2 * 4);
        assert!(mesh.is_valid());
    }
}
