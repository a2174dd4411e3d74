//! Procedural generation on top of `trama-geom`
//!
//! Mesh modifiers and merging, curves and tubes, colour-space volumes,
//! heightmaps, a seeded procedural city and fading trails.
//!
//! # Mesh Example
//! ```no_run
//! use trama_gen::mesh::*;
//!
//! let mut mesh: UnpackedMesh = generate_closed_cylinder(0.5, 2.0, 16, 4);
//! mesh.apply(Transform::rotate_z(90.0))
//!     .apply(Transform::translate(0.0, 1.0, 0.0))
//!     .apply(SmoothNormals::default());
//!
//! write_obj(&mesh, "post.obj".as_ref(), "post")?;
//! # Ok::<(), trama_geom::GeomError>(())
//! ```
//!
//! # Curve Example
//! ```no_run
//! use glam::Vec3;
//! use trama_gen::curves::*;
//! use trama_gen::mesh::tube_along;
//!
//! let curve = CatmullRom::new(
//!     vec![Vec3::new(-5.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 0.0, -5.0)],
//!     CurveType::Centripetal,
//!     false,
//! )?;
//! let tube = tube_along(&curve.points(50), 0.1, 8, false);
//! # Ok::<(), trama_geom::GeomError>(())
//! ```
//!
//! # City Example
//! ```no_run
//! use trama_gen::city::*;
//!
//! let city = CityGenerator::default().generate();
//! for (material, mesh) in &city.batches {
//!     println!("{}: {} triangles", material.name(), mesh.triangle_count());
//! }
//! ```

pub mod city;
pub mod color;
pub mod curves;
pub mod heightmap;
pub mod mesh;
pub mod trail;
