//! Procedural mesh generation
//!
//! Everything here writes through [`MeshBuilder`] / [`MeshBuilderUV`] and is
//! usually collected into an [`UnpackedMesh`]:
//! - indexed primitives (box, sphere, plane, torus, cylinders)
//! - the parametric surface tessellator and its presets
//! - elevation meshes from height fields

mod elevation;
mod export;
mod parametric;
mod primitives;
mod surfaces;
mod types;

#[cfg(test)]
mod tests;

pub use types::{Bounds, MeshBuilder, MeshBuilderUV, UnpackedMesh};

pub use export::{write_obj, write_obj_to};

pub use parametric::{
    DEFAULT_EPSILON, NormalFn, NormalQuery, ParametricSurface, SampleGrid, Shading,
    SurfaceOptions, UvFn, build_samples, wrap_to_range,
};

pub use surfaces::{ExtrudedRect, ExtrudedStar, plane_fn, torus_fn, waves_fn};

pub use elevation::{ElevationOptions, HeightField, generate_elevation};

pub use primitives::{
    generate_box, generate_closed_cylinder, generate_cylinder, generate_cylinder_wall,
    generate_plane, generate_sphere, generate_torus,
};
