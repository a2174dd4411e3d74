//! Mesh modifiers
//!
//! Modifiers operate on [`UnpackedMesh`] in place.
//!
//! # Fluent API
//!
//! Use the [`MeshApply`] extension trait for method chaining:
//! ```no_run
//! use trama_gen::mesh::*;
//!
//! let mut mesh: UnpackedMesh = generate_sphere(1.0, 16, 8);
//! mesh.apply(Transform::scale(1.0, 0.5, 1.0))
//!     .apply(FlatNormals)
//!     .apply(Paint([0, 153, 0, 255]));
//! ```

use glam::{Mat4, Vec3};
use hashbrown::HashMap;

use super::UnpackedMesh;

/// Trait for mesh modifiers
pub trait MeshModifier {
    /// Apply this modifier to a mesh, modifying it in place
    fn apply(&self, mesh: &mut UnpackedMesh);
}

/// Extension trait for fluent modifier application
pub trait MeshApply {
    /// Apply a modifier and return `&mut Self` for chaining
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self;
}

impl MeshApply for UnpackedMesh {
    fn apply<M: MeshModifier>(&mut self, modifier: M) -> &mut Self {
        modifier.apply(self);
        self
    }
}

/// Transform vertices and normals by a 4x4 matrix
///
/// Normals go through the inverse-transpose so non-uniform scales keep them
/// perpendicular. Mirroring matrices (negative determinant) also reverse the
/// triangle winding so faces keep pointing outward.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    matrix: Mat4,
}

impl Transform {
    pub fn identity() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::from_matrix(Mat4::from_translation(Vec3::new(x, y, z)))
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::from_matrix(Mat4::from_scale(Vec3::new(x, y, z)))
    }

    pub fn scale_uniform(s: f32) -> Self {
        Self::scale(s, s, s)
    }

    /// Rotation around X (in degrees)
    pub fn rotate_x(degrees: f32) -> Self {
        Self::from_matrix(Mat4::from_rotation_x(degrees.to_radians()))
    }

    /// Rotation around Y (in degrees)
    pub fn rotate_y(degrees: f32) -> Self {
        Self::from_matrix(Mat4::from_rotation_y(degrees.to_radians()))
    }

    /// Rotation around Z (in degrees)
    pub fn rotate_z(degrees: f32) -> Self {
        Self::from_matrix(Mat4::from_rotation_z(degrees.to_radians()))
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

impl MeshModifier for Transform {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let normal_matrix = self.matrix.inverse().transpose();

        for pos in &mut mesh.positions {
            *pos = self.matrix.transform_point3(Vec3::from(*pos)).to_array();
        }

        for norm in &mut mesh.normals {
            let n = normal_matrix.transform_vector3(Vec3::from(*norm));
            *norm = n.normalize_or_zero().to_array();
        }

        if self.matrix.determinant() < 0.0 {
            for tri in mesh.indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
    }
}

/// Recompute smooth normals by averaging face normals over shared positions
///
/// Vertices closer than `weld_threshold` are treated as one point, so seams
/// left by un-indexed or duplicated vertices shade continuously. Faces are
/// weighted by area.
#[derive(Clone, Copy, Debug)]
pub struct SmoothNormals {
    pub weld_threshold: f32,
}

impl Default for SmoothNormals {
    fn default() -> Self {
        Self {
            weld_threshold: 0.0001,
        }
    }
}

impl SmoothNormals {
    fn cell(&self, p: Vec3) -> (i64, i64, i64) {
        let q = (p / self.weld_threshold.max(f32::EPSILON)).round();
        (q.x as i64, q.y as i64, q.z as i64)
    }
}

impl MeshModifier for SmoothNormals {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        // Spatial hash: quantised position -> accumulated normal
        let mut sums: HashMap<(i64, i64, i64), Vec3> = HashMap::new();

        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.position(i));
            // Unnormalised cross product weights by area
            let face = (b - a).cross(c - a);
            for p in [a, b, c] {
                *sums.entry(self.cell(p)).or_insert(Vec3::ZERO) += face;
            }
        }

        let normals: Vec<[f32; 3]> = mesh
            .positions
            .iter()
            .map(|p| {
                let key = self.cell(Vec3::from(*p));
                sums.get(&key)
                    .copied()
                    .unwrap_or(Vec3::ZERO)
                    .normalize_or_zero()
                    .to_array()
            })
            .collect();
        mesh.normals = normals;
    }
}

/// Convert to flat shading by giving every triangle its own three vertices
pub struct FlatNormals;

impl MeshModifier for FlatNormals {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        let has_uvs = !mesh.uvs.is_empty();
        let has_colors = !mesh.colors.is_empty();
        let mut flat = UnpackedMesh::with_capacity(mesh.indices.len(), mesh.indices.len(), has_uvs);

        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.position(i));
            let face = (b - a).cross(c - a).normalize_or_zero().to_array();

            for idx in tri {
                let i = idx as usize;
                flat.indices.push(flat.positions.len() as u32);
                flat.positions.push(mesh.positions[i]);
                flat.normals.push(face);
                if has_uvs {
                    flat.uvs.push(mesh.uvs[i]);
                }
                if has_colors {
                    flat.colors.push(mesh.colors[i]);
                }
            }
        }

        *mesh = flat;
    }
}

/// Fill every vertex with one RGBA colour
#[derive(Clone, Copy, Debug)]
pub struct Paint(pub [u8; 4]);

impl MeshModifier for Paint {
    fn apply(&self, mesh: &mut UnpackedMesh) {
        mesh.paint(self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{generate_box, generate_sphere};

    #[test]
    fn test_transform_translate() {
        let mut mesh: UnpackedMesh = generate_box(2.0, 2.0, 2.0);
        Transform::translate(5.0, 0.0, 0.0).apply(&mut mesh);
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.center() - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_transform_keeps_normals_unit() {
        let mut mesh: UnpackedMesh = generate_sphere(1.0, 8, 4);
        Transform::scale(3.0, 1.0, 0.5).apply(&mut mesh);
        for n in &mesh.normals {
            assert!((Vec3::from(*n).length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_non_uniform_scale_uses_inverse_transpose() {
        let mut mesh: UnpackedMesh = generate_box(1.0, 1.0, 1.0);
        let before: Vec<[f32; 3]> = mesh.normals.clone();
        Transform::scale(4.0, 1.0, 1.0).apply(&mut mesh);
        // Axis-aligned face normals stay axis-aligned
        assert_eq!(before, mesh.normals);
    }

    #[test]
    fn test_mirror_flips_winding() {
        let mut mesh: UnpackedMesh = generate_box(1.0, 1.0, 1.0);
        Transform::scale(-1.0, 1.0, 1.0).apply(&mut mesh);
        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| mesh.position(i));
            let face = (b - a).cross(c - a);
            let stored = Vec3::from(mesh.normals[tri[0] as usize]);
            assert!(face.dot(stored) > 0.0);
        }
    }

    #[test]
    fn test_flat_normals_unindexes() {
        let mut mesh: UnpackedMesh = generate_sphere(1.0, 8, 4);
        let triangles = mesh.triangle_count();
        mesh.paint([1, 2, 3, 4]);
        FlatNormals.apply(&mut mesh);
        assert_eq!(mesh.vertex_count(), triangles * 3);
        assert_eq!(mesh.uvs.len(), mesh.vertex_count());
        assert_eq!(mesh.colors.len(), mesh.vertex_count());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_smooth_normals_welds_seams() {
        let mut mesh: UnpackedMesh = generate_sphere(1.0, 16, 8);
        FlatNormals.apply(&mut mesh);
        SmoothNormals::default().apply(&mut mesh);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let p = Vec3::from(*p);
            // Poles collapse many faces; every averaged normal still points outward
            assert!(p.normalize().dot(Vec3::from(*n)) > 0.9);
        }
    }

    #[test]
    fn test_fluent_chain() {
        let mut mesh: UnpackedMesh = generate_box(1.0, 1.0, 1.0);
        mesh.apply(Transform::identity())
            .apply(Paint([255, 0, 0, 255]));
        assert!(mesh.colors.iter().all(|c| *c == [255, 0, 0, 255]));
    }
}
