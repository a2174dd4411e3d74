//! Core geometry for trama
//!
//! Mesh containers, the builder traits every generator writes through, a set of
//! indexed primitives, the parametric surface tessellator and OBJ export.
//!
//! # Example
//! ```no_run
//! use trama_geom::procedural::*;
//!
//! // Waves over a 10x10 plane, 64x64 cells, smooth finite-difference normals
//! let waves = waves_fn(10.0, 10.0, 3.0, 1.0);
//! let options = SurfaceOptions {
//!     u_segments: 64,
//!     v_segments: 64,
//!     ..Default::default()
//! };
//! let mesh = ParametricSurface::new(waves, options).build()?;
//!
//! write_obj(&mesh, "waves.obj".as_ref(), "waves")?;
//! # Ok::<(), trama_geom::GeomError>(())
//! ```

pub mod error;
pub mod procedural;

pub use error::{GeomError, Result};
