//! Procedural mesh types
//!
//! Shared types for procedural mesh generation.

use glam::Vec3;

/// Trait for mesh construction - enables generic geometry generation
///
/// Generators are written against this trait rather than a concrete buffer so
/// the same code can fill an [`UnpackedMesh`] or a caller's own vertex sink.
pub trait MeshBuilder: Default {
    /// Add a vertex with position and normal, returning its index
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32;

    /// Add a triangle using three vertex indices
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32);
}

/// Trait extension for UV-mapped meshes
pub trait MeshBuilderUV: MeshBuilder {
    /// Add a vertex with position, UV coordinates, and normal, returning its index
    fn add_vertex_uv(&mut self, position: Vec3, uv: (f32, f32), normal: Vec3) -> u32;
}

/// Axis-aligned bounds of a mesh
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Extent along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Unpacked mesh data (f32 format) for export and modifiers
///
/// Stores full-precision attributes suitable for:
/// - OBJ file export
/// - Mesh modifiers (transform, normal recomputation, combining)
/// - Merging into per-material batches
#[derive(Clone, Debug)]
pub struct UnpackedMesh {
    /// Vertex positions as [x, y, z]
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals as [x, y, z]
    pub normals: Vec<[f32; 3]>,
    /// UV coordinates as [u, v] (empty if no UVs)
    pub uvs: Vec<[f32; 2]>,
    /// Vertex colors as [r, g, b, a] (empty if no colors)
    pub colors: Vec<[u8; 4]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl UnpackedMesh {
    /// Create empty unpacked mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create an empty mesh with room for `vertices` vertices and `indices` indices
    pub fn with_capacity(vertices: usize, indices: usize, with_uvs: bool) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: if with_uvs {
                Vec::with_capacity(vertices)
            } else {
                Vec::new()
            },
            colors: Vec::new(),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Ensure colors array is initialized (fill with white if empty)
    pub fn ensure_colors(&mut self) {
        if self.colors.is_empty() && !self.positions.is_empty() {
            self.colors = vec![[255, 255, 255, 255]; self.positions.len()];
        }
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when the mesh holds no triangles
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Bounds> {
        let first = Vec3::from(*self.positions.first()?);
        let (min, max) = self
            .positions
            .iter()
            .map(|p| Vec3::from(*p))
            .fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Bounds { min, max })
    }

    /// Check attribute lengths agree and every index points at a vertex
    pub fn is_valid(&self) -> bool {
        let n = self.positions.len();
        self.normals.len() == n
            && (self.uvs.is_empty() || self.uvs.len() == n)
            && (self.colors.is_empty() || self.colors.len() == n)
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }

    /// Position of vertex `i` as a `Vec3`
    #[inline]
    pub fn position(&self, i: u32) -> Vec3 {
        Vec3::from(self.positions[i as usize])
    }

    /// Iterate triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    /// Fill every vertex with a single color
    pub fn paint(&mut self, color: [u8; 4]) {
        self.colors = vec![color; self.positions.len()];
    }
}

impl Default for UnpackedMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder for UnpackedMesh {
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push([position.x, position.y, position.z]);
        self.normals.push([normal.x, normal.y, normal.z]);
        index
    }

    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }
}

impl MeshBuilderUV for UnpackedMesh {
    fn add_vertex_uv(&mut self, position: Vec3, uv: (f32, f32), normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push([position.x, position.y, position.z]);
        self.normals.push([normal.x, normal.y, normal.z]);
        self.uvs.push([uv.0, uv.1]);
        index
    }
}
