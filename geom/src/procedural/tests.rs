use glam::Vec3;

use super::*;

fn face_normal(mesh: &UnpackedMesh, tri: [u32; 3]) -> Vec3 {
    let [a, b, c] = tri.map(|i| mesh.position(i));
    (b - a).cross(c - a)
}

/// Every non-degenerate triangle winds counter-clockwise around its stored normal
fn assert_winding_matches_normals(mesh: &UnpackedMesh) {
    for tri in mesh.triangles() {
        let face = face_normal(mesh, tri);
        if face.length() < 1e-8 {
            continue;
        }
        let stored: Vec3 = tri
            .iter()
            .map(|&i| Vec3::from(mesh.normals[i as usize]))
            .sum();
        assert!(
            face.dot(stored) > 0.0,
            "triangle {tri:?} is wound against its normals"
        );
    }
}

#[test]
fn test_box_counts_and_extent() {
    let mesh: UnpackedMesh = generate_box(2.0, 4.0, 6.0);
    assert_eq!(mesh.vertex_count(), 24);
    assert_eq!(mesh.triangle_count(), 12);
    let bounds = mesh.bounds().unwrap();
    assert_eq!(bounds.size(), Vec3::new(2.0, 4.0, 6.0));
    assert_eq!(bounds.center(), Vec3::ZERO);
    assert_winding_matches_normals(&mesh);
}

#[test]
fn test_sphere_normals_are_radial() {
    let mesh: UnpackedMesh = generate_sphere(2.0, 12, 8);
    assert_eq!(mesh.vertex_count(), 9 * 13);
    // Pole rows are single fans
    assert_eq!(mesh.triangle_count(), 12 * 2 * 7);
    assert!(mesh.triangles().all(|tri| face_normal(&mesh, tri).length() > 1e-4));
    for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
        let p = Vec3::from(*p);
        assert!((p.length() - 2.0).abs() < 1e-5);
        assert!((p.normalize() - Vec3::from(*n)).length() < 1e-5);
    }
    assert_winding_matches_normals(&mesh);
}

#[test]
fn test_plane_faces_up() {
    let mesh: UnpackedMesh = generate_plane(4.0, 2.0, 4, 2);
    assert_eq!(mesh.vertex_count(), 5 * 3);
    assert_eq!(mesh.triangle_count(), 4 * 2 * 2);
    assert_winding_matches_normals(&mesh);
}

#[test]
fn test_torus_winding() {
    let mesh: UnpackedMesh = generate_torus(3.0, 1.0, 16, 8);
    assert!(mesh.is_valid());
    let bounds = mesh.bounds().unwrap();
    assert!((bounds.max.x - 4.0).abs() < 1e-5);
    assert!((bounds.max.y - 1.0).abs() < 1e-5);
    assert_winding_matches_normals(&mesh);
}

#[test]
fn test_cylinders_winding() {
    let closed: UnpackedMesh = generate_closed_cylinder(1.0, 3.0, 12, 4);
    assert_winding_matches_normals(&closed);
    let frustum: UnpackedMesh = generate_cylinder(1.0, 0.5, 2.0, 12);
    assert_winding_matches_normals(&frustum);
}

#[test]
fn test_degenerate_primitives_clamp() {
    let mesh: UnpackedMesh = generate_sphere(-1.0, 0, 0);
    assert!(mesh.is_valid());
    assert_eq!(mesh.vertex_count(), 3 * 4);
    let mesh: UnpackedMesh = generate_box(0.0, 1.0, 1.0);
    assert!(mesh.bounds().unwrap().size().x > 0.0);
}

#[test]
fn test_parametric_torus_matches_winding() {
    let options = SurfaceOptions {
        u_segments: 24,
        v_segments: 12,
        u_closed: true,
        v_closed: true,
        ..Default::default()
    };
    let torus = torus_fn(4.0, 1.0, 0.0, std::f32::consts::TAU, 40.0, 0.0);
    let mesh = ParametricSurface::new(torus, options).build().unwrap();
    assert_eq!(mesh.triangle_count(), 24 * 12 * 2);
    assert_winding_matches_normals(&mesh);
}

#[test]
fn test_sample_grid_knots_appear_once() {
    let options = SurfaceOptions {
        u_segments: 4,
        u_knots: vec![0.1, 0.25, 0.1],
        ..Default::default()
    };
    let grid = ParametricSurface::new(plane_fn(1.0, 1.0), options)
        .sample_grid()
        .unwrap();
    assert_eq!(grid.u, vec![0.0, 0.1, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(grid.points.len(), grid.u.len() * grid.v.len());
    assert!((grid.at(0, 1) - Vec3::new(-0.4, 0.0, -0.5)).length() < 1e-6);
}

#[test]
fn test_elevation_and_export_together() {
    let field = HeightField::from_fn(8, 8, |x, y| ((x + y) % 2) as f32).unwrap();
    let mesh: UnpackedMesh = generate_elevation(&field, &ElevationOptions::default()).unwrap();
    let mut out = Vec::new();
    write_obj_to(&mesh, &mut out, "terrain").unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text.lines().filter(|l| l.starts_with("f ")).count(),
        mesh.triangle_count()
    );
}
