//! Indexed mesh primitives with UVs

mod cylinder;
mod simple;

pub use cylinder::{generate_closed_cylinder, generate_cylinder, generate_cylinder_wall};
pub use simple::{generate_box, generate_plane, generate_sphere, generate_torus};
