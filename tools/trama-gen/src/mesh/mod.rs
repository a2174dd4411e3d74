//! Mesh generation and modification

// Re-export types from trama-geom
pub use trama_geom::procedural::{Bounds, MeshBuilder, MeshBuilderUV, UnpackedMesh};

// Re-export primitives
pub use trama_geom::procedural::{
    generate_box, generate_closed_cylinder, generate_cylinder, generate_cylinder_wall,
    generate_plane, generate_sphere, generate_torus,
};

// Re-export OBJ export
pub use trama_geom::procedural::{write_obj, write_obj_to};

// Local modules
pub mod combine;
pub mod modifiers;
pub mod tube;

// Convenience re-exports
pub use combine::{combine, combine_transformed};
pub use modifiers::{FlatNormals, MeshApply, MeshModifier, Paint, SmoothNormals, Transform};
pub use tube::{Edge, TUBE_RADIAL_SEGMENTS, TUBE_RADIUS, tube_along, tube_segment, tubes_from_edges};
