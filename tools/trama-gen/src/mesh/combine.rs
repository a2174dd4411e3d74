//! Mesh combining utilities

use glam::Mat4;

use super::UnpackedMesh;
use super::modifiers::{MeshModifier, Transform};

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Combine multiple meshes into one
///
/// Vertex and index data are concatenated with index offsets adjusted. If any
/// input has UVs the output has UVs (missing ones become `[0, 0]`); the same
/// goes for vertex colours, padded with white.
///
/// # Example
/// ```no_run
/// use trama_gen::mesh::*;
///
/// let trunk: UnpackedMesh = generate_cylinder(0.1, 0.2, 3.0, 12);
/// let crown: UnpackedMesh = generate_sphere(1.0, 16, 8);
///
/// let tree = combine(&[&trunk, &crown]);
/// ```
pub fn combine(meshes: &[&UnpackedMesh]) -> UnpackedMesh {
    let total_vertices: usize = meshes.iter().map(|m| m.vertex_count()).sum();
    let total_indices: usize = meshes.iter().map(|m| m.indices.len()).sum();
    let has_any_uvs = meshes.iter().any(|m| !m.uvs.is_empty());
    let has_any_colors = meshes.iter().any(|m| !m.colors.is_empty());

    let mut result = UnpackedMesh::with_capacity(total_vertices, total_indices, has_any_uvs);
    if has_any_colors {
        result.colors.reserve(total_vertices);
    }

    for mesh in meshes {
        if mesh.positions.is_empty() {
            continue;
        }

        let offset = result.positions.len() as u32;
        result.positions.extend_from_slice(&mesh.positions);
        result.normals.extend_from_slice(&mesh.normals);

        if has_any_uvs {
            if mesh.uvs.is_empty() {
                result.uvs.resize(result.positions.len(), [0.0, 0.0]);
            } else {
                result.uvs.extend_from_slice(&mesh.uvs);
            }
        }

        if has_any_colors {
            if mesh.colors.is_empty() {
                result.colors.resize(result.positions.len(), WHITE);
            } else {
                result.colors.extend_from_slice(&mesh.colors);
            }
        }

        result.indices.extend(mesh.indices.iter().map(|&i| offset + i));
    }

    result
}

/// Combine meshes after applying a per-mesh transform
///
/// # Example
/// ```no_run
/// use glam::{Mat4, Vec3};
/// use trama_gen::mesh::*;
///
/// let window: UnpackedMesh = generate_box(3.0, 1.5, 0.1);
/// let both = combine_transformed(&[
///     (&window, Mat4::from_translation(Vec3::new(2.0, 2.0, 0.0))),
///     (&window, Mat4::from_translation(Vec3::new(-2.0, 2.0, 0.0))),
/// ]);
/// ```
pub fn combine_transformed(meshes: &[(&UnpackedMesh, Mat4)]) -> UnpackedMesh {
    let transformed: Vec<UnpackedMesh> = meshes
        .iter()
        .map(|(mesh, matrix)| {
            let mut copy = (*mesh).clone();
            Transform::from_matrix(*matrix).apply(&mut copy);
            copy
        })
        .collect();

    let refs: Vec<&UnpackedMesh> = transformed.iter().collect();
    combine(&refs)
}
