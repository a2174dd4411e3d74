//! Tubes swept along polylines
//!
//! A circle of `radial_segments` vertices is carried along the path with
//! parallel-transport frames, so the tube does not twist where the path bends.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use tracing::warn;

use super::combine::combine;
use super::{MeshBuilder, MeshBuilderUV, UnpackedMesh};

/// Default tube radius for outlines
pub const TUBE_RADIUS: f32 = 0.01;

/// Default number of vertices around a tube
pub const TUBE_RADIAL_SEGMENTS: u32 = 8;

/// Straight segment between two points
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub start: Vec3,
    pub end: Vec3,
}

impl Edge {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Tube around a single straight segment (open ends)
pub fn tube_segment(start: Vec3, end: Vec3, radius: f32, radial_segments: u32) -> UnpackedMesh {
    tube_along(&[start, end], radius, radial_segments, false)
}

/// Merge one tube per edge into a single mesh
///
/// Zero-length edges are skipped. Returns `None` when nothing is left.
pub fn tubes_from_edges(edges: &[Edge], radius: f32, radial_segments: u32) -> Option<UnpackedMesh> {
    let tubes: Vec<UnpackedMesh> = edges
        .iter()
        .filter(|edge| {
            let usable = edge.length() > f32::EPSILON;
            if !usable {
                warn!("tubes_from_edges: skipping zero-length edge at {}", edge.start);
            }
            usable
        })
        .map(|edge| tube_segment(edge.start, edge.end, radius, radial_segments))
        .collect();

    if tubes.is_empty() {
        return None;
    }
    let refs: Vec<&UnpackedMesh> = tubes.iter().collect();
    Some(combine(&refs))
}

/// Sweep a circle along `points`
///
/// # Arguments
/// * `points` - Path vertices (at least 2 distinct points)
/// * `radius` - Tube radius
/// * `radial_segments` - Vertices around the tube (min 3)
/// * `closed` - Connect the last point back to the first
///
/// UVs run around the tube (U) and along the path (V). On closed paths the
/// frame mismatch at the seam is spread evenly over the whole loop.
pub fn tube_along(points: &[Vec3], radius: f32, radial_segments: u32, closed: bool) -> UnpackedMesh {
    let mut mesh = UnpackedMesh::new();

    // Consecutive duplicates have no tangent
    let mut path: Vec<Vec3> = Vec::with_capacity(points.len());
    for &p in points {
        if path.last().is_none_or(|last| last.distance(p) > f32::EPSILON) {
            path.push(p);
        }
    }
    if closed && path.len() > 2 && path[0].distance(path[path.len() - 1]) <= f32::EPSILON {
        path.pop();
    }
    if path.len() < 2 {
        warn!("tube_along: path needs at least 2 distinct points, got {}", path.len());
        return mesh;
    }

    let radius = if radius > 0.0 {
        radius
    } else {
        warn!("tube_along: radius must be > 0.0, clamping to 0.001");
        0.001
    };
    let radial_segments = radial_segments.clamp(3, 256);
    let closed = closed && path.len() > 2;

    let tangents = path_tangents(&path, closed);
    let normals = transport_frames(&tangents, closed);

    let rings = if closed { path.len() + 1 } else { path.len() };
    for k in 0..rings {
        let i = k % path.len();
        let (t, n) = (tangents[i], normals[i]);
        let b = t.cross(n);
        let v = k as f32 / (rings - 1) as f32;
        for j in 0..=radial_segments {
            let u = j as f32 / radial_segments as f32;
            let (sin, cos) = (u * TAU).sin_cos();
            let dir = n * cos + b * sin;
            mesh.add_vertex_uv(path[i] + dir * radius, (u, v), dir);
        }
    }

    let row = radial_segments + 1;
    for k in 0..(rings - 1) as u32 {
        for j in 0..radial_segments {
            let a = k * row + j;
            let b = a + row;
            let c = b + 1;
            let d = a + 1;
            mesh.add_triangle(a, d, b);
            mesh.add_triangle(b, d, c);
        }
    }

    mesh
}

fn path_tangents(path: &[Vec3], closed: bool) -> Vec<Vec3> {
    let n = path.len();
    (0..n)
        .map(|i| {
            let (prev, next) = if closed {
                (path[(i + n - 1) % n], path[(i + 1) % n])
            } else {
                (path[i.saturating_sub(1)], path[(i + 1).min(n - 1)])
            };
            let t = (next - prev).normalize_or_zero();
            if t == Vec3::ZERO {
                // Path folds back on itself; fall back to the outgoing segment
                (path[(i + 1) % n] - path[i]).normalize_or(Vec3::X)
            } else {
                t
            }
        })
        .collect()
}

/// Parallel-transport a normal along the tangents
fn transport_frames(tangents: &[Vec3], closed: bool) -> Vec<Vec3> {
    let t0 = tangents[0];
    let seed = if t0.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let mut normal = t0.cross(seed).normalize();

    let mut normals = Vec::with_capacity(tangents.len());
    normals.push(normal);
    for pair in tangents.windows(2) {
        normal = (Quat::from_rotation_arc(pair[0], pair[1]) * normal).normalize();
        normals.push(normal);
    }

    if closed {
        // Carry the last frame back to the start and measure the twist
        let back = (Quat::from_rotation_arc(tangents[tangents.len() - 1], t0) * normal).normalize();
        let first = normals[0];
        let twist = first.cross(back).dot(t0).atan2(first.dot(back));
        let count = tangents.len() as f32;
        for (k, (n, t)) in normals.iter_mut().zip(tangents).enumerate().skip(1) {
            *n = Quat::from_axis_angle(*t, -twist * k as f32 / count) * *n;
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_faces_outward(mesh: &UnpackedMesh) {
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.position(i));
            let face = (b - a).cross(c - a);
            if face.length() < 1e-9 {
                continue;
            }
            let stored: Vec3 = tri.iter().map(|&i| Vec3::from(mesh.normals[i as usize])).sum();
            assert!(face.dot(stored) > 0.0);
        }
    }

    #[test]
    fn test_segment_counts_and_radius() {
        let mesh = tube_segment(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.5, 8);
        assert_eq!(mesh.vertex_count(), 2 * 9);
        assert_eq!(mesh.triangle_count(), 8 * 2);
        for p in &mesh.positions {
            let p = Vec3::from(*p);
            assert!((Vec3::new(p.x, 0.0, p.z).length() - 0.5).abs() < 1e-5);
        }
        assert_faces_outward(&mesh);
    }

    #[test]
    fn test_tubes_from_edges_empty() {
        assert!(tubes_from_edges(&[], TUBE_RADIUS, TUBE_RADIAL_SEGMENTS).is_none());
        let degenerate = [Edge::new(Vec3::ONE, Vec3::ONE)];
        assert!(tubes_from_edges(&degenerate, TUBE_RADIUS, TUBE_RADIAL_SEGMENTS).is_none());
    }

    #[test]
    fn test_tubes_from_edges_merges() {
        let edges = [
            Edge::new(Vec3::ZERO, Vec3::X),
            Edge::new(Vec3::ZERO, Vec3::Y),
            Edge::new(Vec3::ZERO, Vec3::Z),
        ];
        let mesh = tubes_from_edges(&edges, 0.05, 6).unwrap();
        assert_eq!(mesh.vertex_count(), 3 * 2 * 7);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_bent_path_keeps_radius() {
        let path = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 1.0)];
        let mesh = tube_along(&path, 0.1, 12, false);
        assert_eq!(mesh.vertex_count(), 4 * 13);
        for (k, p) in path.iter().enumerate() {
            for j in 0..13 {
                let v = mesh.position((k * 13 + j) as u32);
                assert!((v.distance(*p) - 0.1).abs() < 1e-4);
            }
        }
        assert_faces_outward(&mesh);
    }

    #[test]
    fn test_closed_loop_repeats_first_ring() {
        let square = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Z];
        let mesh = tube_along(&square, 0.1, 6, true);
        assert_eq!(mesh.vertex_count(), 5 * 7);
        let row = 7;
        for j in 0..row {
            let first = mesh.position(j as u32);
            let last = mesh.position((4 * row + j) as u32);
            assert!(first.distance(last) < 1e-5);
        }
    }

    #[test]
    fn test_too_short_path_is_empty() {
        let mesh = tube_along(&[Vec3::ONE, Vec3::ONE], 0.1, 8, false);
        assert!(mesh.is_empty());
    }
}
