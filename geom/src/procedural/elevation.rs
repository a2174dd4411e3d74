//! Elevation meshes from height fields
//!
//! A [`HeightField`] holds normalised samples (`[0,1]`, row-major). The
//! elevation builder resamples it to the requested segment counts and lifts an
//! XZ grid by `amplitude * sample`, with normals taken from the sample slopes.

use glam::Vec3;
use tracing::debug;

use super::types::MeshBuilderUV;
use crate::error::{GeomError, Result};

/// Row-major grid of height samples in `[0,1]`
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl HeightField {
    pub fn new(width: u32, height: u32, samples: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 || samples.len() != width as usize * height as usize {
            return Err(GeomError::HeightFieldSize {
                width,
                height,
                len: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a field by evaluating `f(x, y)` at every sample
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> f32) -> Result<Self> {
        let samples = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::new(width, height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample at `(x, y)`, clamped to the field edges
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.samples[(y * self.width + x) as usize]
    }

    /// Bilinear resample to `width x height`, matching pixel centres
    pub fn resample(&self, width: u32, height: u32) -> Result<Self> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }

        let sx = self.width as f32 / width.max(1) as f32;
        let sy = self.height as f32 / height.max(1) as f32;
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;

        Self::from_fn(width, height, |x, y| {
            let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
            let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
            let (x0, y0) = (fx.floor() as u32, fy.floor() as u32);
            let (tx, ty) = (fx - x0 as f32, fy - y0 as f32);

            let top = self.get(x0, y0) * (1.0 - tx) + self.get(x0 + 1, y0) * tx;
            let bottom = self.get(x0, y0 + 1) * (1.0 - tx) + self.get(x0 + 1, y0 + 1) * tx;
            top * (1.0 - ty) + bottom * ty
        })
    }
}

/// Elevation mesh dimensions
#[derive(Clone, Debug)]
pub struct ElevationOptions {
    /// World extent along X
    pub width: f32,
    /// World extent along Z
    pub depth: f32,
    /// Height of a sample equal to 1.0
    pub amplitude: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for ElevationOptions {
    fn default() -> Self {
        Self {
            width: 10.0,
            depth: 10.0,
            amplitude: 1.0,
            width_segments: 64,
            height_segments: 64,
        }
    }
}

/// Generate an indexed elevation mesh
///
/// The field is resampled to `width_segments x height_segments`. A vertex is
/// emitted for every sample except the last row and column, so the mesh holds
/// `(ws - 1) x (hs - 1)` vertices and `(ws - 2) x (hs - 2)` quads.
pub fn generate_elevation<M: MeshBuilderUV>(field: &HeightField, opts: &ElevationOptions) -> Result<M> {
    let ws = opts.width_segments;
    let hs = opts.height_segments;
    if ws < 3 || hs < 3 {
        return Err(GeomError::invalid(
            "segments",
            format!("elevation needs at least 3x3 segments, got {ws}x{hs}"),
        ));
    }

    let grid = field.resample(ws, hs)?;
    let cell_x = opts.width / ws as f32;
    let cell_z = opts.depth / hs as f32;
    let amp = opts.amplitude;

    let mut mesh = M::default();
    let cols = hs - 1;

    for i in 0..ws - 1 {
        for j in 0..hs - 1 {
            let z0 = grid.get(i, j);
            let dx = slope(i, ws, z0, |k| grid.get(k, j));
            let dy = slope(j, hs, z0, |k| grid.get(i, k));

            let position = Vec3::new(
                opts.width * i as f32 / ws as f32 - opts.width / 2.0,
                amp * z0,
                opts.depth * j as f32 / hs as f32 - opts.depth / 2.0,
            );
            let tan_x = Vec3::new(cell_x, dx * amp, 0.0).normalize_or_zero();
            let tan_y = Vec3::new(0.0, dy * amp, cell_z).normalize_or_zero();
            let normal = tan_y.cross(tan_x).normalize_or_zero();
            let uv = (i as f32 / (ws - 1) as f32, j as f32 / (hs - 1) as f32);

            mesh.add_vertex_uv(position, uv, normal);
        }
    }

    // Vertex (i, j) lives at i * cols + j
    for i in 0..ws - 2 {
        for j in 0..hs - 2 {
            let a = i * cols + j;
            let next_z = a + 1;
            let next_x = a + cols;
            let both = next_x + 1;
            mesh.add_triangle(a, next_z, both);
            mesh.add_triangle(a, both, next_x);
        }
    }

    debug!(
        "elevation mesh: {}x{} vertices from {}x{} field",
        ws - 1,
        hs - 1,
        field.width(),
        field.height()
    );

    Ok(mesh)
}

/// Central difference, one-sided at the first and last sample
fn slope(k: u32, n: u32, z0: f32, at: impl Fn(u32) -> f32) -> f32 {
    if k == 0 {
        at(1) - z0
    } else if k + 1 >= n {
        z0 - at(k - 1)
    } else {
        (at(k + 1) - at(k - 1)) / 2.0
    }
}
