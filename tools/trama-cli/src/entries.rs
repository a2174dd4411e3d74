//! Typed manifest entries
//!
//! Each entry mirrors one `[table.name]` of `trama.toml`, carries the library
//! defaults through `#[serde(default)]`, and knows how to build its mesh. The
//! single-shot subcommands construct the same entries from their flags.

use std::f32::consts::TAU;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use glam::Vec3;
use serde::Deserialize;
use trama_gen::color::{ColorLimits, ColorModel, color_volume, outline_edges};
use trama_gen::curves::{CatmullRom, CubicBezier, Curve, CurveType, QuadraticBezier};
use trama_gen::heightmap::{PerlinConfig, load_heightmap};
use trama_gen::mesh::{
    TUBE_RADIAL_SEGMENTS, UnpackedMesh, generate_closed_cylinder, generate_cylinder_wall,
    tube_along, tubes_from_edges,
};
use trama_geom::procedural::{
    ElevationOptions, ExtrudedRect, ExtrudedStar, HeightField, ParametricSurface, Shading,
    SurfaceOptions, generate_elevation, plane_fn, torus_fn, waves_fn,
};

/// Parametric surface presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SurfacePreset {
    /// 10x10 flat plane
    Plane,
    /// 10x10 radial ripples
    Waves,
    /// Three-quarter torus sweep
    #[default]
    Torus,
    /// Twisted five-point star prism
    Star,
    /// 3x1 rectangular tube
    Rect,
}

impl SurfacePreset {
    fn default_segments(self) -> u32 {
        match self {
            Self::Plane | Self::Waves | Self::Torus => 100,
            Self::Star => 32,
            Self::Rect => 24,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SurfaceEntry {
    pub preset: SurfacePreset,
    /// Grid resolution (per-axis for grids, along the extrusion for the star)
    pub segments: Option<u32>,
    /// Force flat (`true`) or smooth (`false`) shading; presets pick their own otherwise
    pub flat: Option<bool>,
}

impl SurfaceEntry {
    pub fn build(&self) -> Result<UnpackedMesh> {
        let segments = self.segments.unwrap_or_else(|| self.preset.default_segments());
        let shading = |default_flat: bool| {
            if self.flat.unwrap_or(default_flat) {
                Shading::Flat
            } else {
                Shading::Smooth
            }
        };
        let grid = SurfaceOptions {
            u_segments: segments,
            v_segments: segments,
            shading: shading(false),
            ..Default::default()
        };

        let mesh = match self.preset {
            SurfacePreset::Plane => ParametricSurface::new(plane_fn(10.0, 10.0), grid).build()?,
            SurfacePreset::Waves => {
                ParametricSurface::new(waves_fn(10.0, 10.0, 3.0, 1.0), grid).build()?
            }
            SurfacePreset::Torus => {
                let options = SurfaceOptions {
                    u_closed: true,
                    ..grid
                };
                ParametricSurface::new(torus_fn(4.0, 1.0, 0.0, TAU * 0.75, 40.0, 0.0), options)
                    .build()?
            }
            SurfacePreset::Star => ExtrudedStar {
                v_segments: segments,
                shading: shading(true),
                ..Default::default()
            }
            .build()?,
            SurfacePreset::Rect => ExtrudedRect {
                u_segments: segments,
                analytic_normals: !self.flat.unwrap_or(false),
                ..Default::default()
            }
            .build()?,
        };
        Ok(mesh)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CylinderEntry {
    pub radius: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    /// Add the end caps
    pub closed: bool,
}

impl Default for CylinderEntry {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 2.0,
            radial_segments: 32,
            height_segments: 4,
            closed: true,
        }
    }
}

impl CylinderEntry {
    pub fn build(&self) -> UnpackedMesh {
        let (radial, rows) = (self.radial_segments, self.height_segments);
        if self.closed {
            generate_closed_cylinder(self.radius, self.height, radial, rows)
        } else {
            generate_cylinder_wall(self.radius, self.height, radial, rows)
        }
    }
}

/// Resolution of heightfields generated from noise
const NOISE_FIELD_SIZE: u32 = 128;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElevationEntry {
    /// Greyscale heightmap; relative paths resolve against the manifest
    pub image: Option<PathBuf>,
    /// Perlin seed used when no image is given
    pub seed: Option<u32>,
    pub width: f32,
    pub depth: f32,
    pub amplitude: f32,
    pub segments: u32,
}

impl Default for ElevationEntry {
    fn default() -> Self {
        let options = ElevationOptions::default();
        Self {
            image: None,
            seed: None,
            width: options.width,
            depth: options.depth,
            amplitude: options.amplitude,
            segments: options.width_segments,
        }
    }
}

impl ElevationEntry {
    /// Fail early on an entry that cannot be built
    pub fn validate(&self, base_dir: &Path) -> Result<()> {
        match (&self.image, self.seed) {
            (Some(_), Some(_)) => bail!("set either `image` or `seed`, not both"),
            (None, None) => bail!("an elevation needs an `image` or a noise `seed`"),
            (Some(image), None) => {
                let path = base_dir.join(image);
                if !path.exists() {
                    bail!("heightmap not found: {:?}", path);
                }
            }
            (None, Some(_)) => {}
        }
        if self.segments < 3 {
            bail!("elevation needs at least 3 segments, got {}", self.segments);
        }
        Ok(())
    }

    pub fn build(&self, base_dir: &Path) -> Result<UnpackedMesh> {
        let field = self.heightfield(base_dir)?;
        let options = ElevationOptions {
            width: self.width,
            depth: self.depth,
            amplitude: self.amplitude,
            width_segments: self.segments,
            height_segments: self.segments,
        };
        Ok(generate_elevation(&field, &options)?)
    }

    fn heightfield(&self, base_dir: &Path) -> Result<HeightField> {
        if let Some(image) = &self.image {
            let path = base_dir.join(image);
            return load_heightmap(&path)
                .with_context(|| format!("Failed to load heightmap: {:?}", path));
        }
        let config = PerlinConfig::with_seed(self.seed.unwrap_or_default());
        Ok(config.heightfield(NOISE_FIELD_SIZE, NOISE_FIELD_SIZE)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    /// Catmull-Rom spline through every point
    #[default]
    Catmull,
    /// Quadratic (3 points) or cubic (4 points) Bézier segment
    Bezier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SplineType {
    #[default]
    Centripetal,
    Chordal,
    Uniform,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CurveEntry {
    pub kind: CurveKind,
    /// Control points; each kind has its own demo path when empty
    pub points: Vec<[f32; 3]>,
    pub spline: SplineType,
    /// Uniform spline tension
    pub tension: f32,
    pub closed: bool,
    pub divisions: u32,
    pub radius: f32,
    pub radial_segments: u32,
}

impl Default for CurveEntry {
    fn default() -> Self {
        Self {
            kind: CurveKind::Catmull,
            points: Vec::new(),
            spline: SplineType::Centripetal,
            tension: 0.5,
            closed: false,
            divisions: 50,
            radius: 0.1,
            radial_segments: TUBE_RADIAL_SEGMENTS,
        }
    }
}

const CATMULL_PATH: [[f32; 3]; 5] = [
    [-5.0, 0.0, 5.0],
    [-5.0, 1.0, -5.0],
    [0.0, 0.0, 0.0],
    [5.0, -1.0, 5.0],
    [5.0, 0.0, -5.0],
];

const BEZIER_PATH: [[f32; 3]; 4] = [
    [-5.0, 0.0, 0.0],
    [-2.0, 4.0, 0.0],
    [2.0, -4.0, 0.0],
    [5.0, 0.0, 0.0],
];

impl CurveEntry {
    fn control_points(&self) -> Vec<Vec3> {
        let points: &[[f32; 3]] = match (self.points.is_empty(), self.kind) {
            (false, _) => &self.points,
            (true, CurveKind::Catmull) => &CATMULL_PATH,
            (true, CurveKind::Bezier) => &BEZIER_PATH,
        };
        points.iter().copied().map(Vec3::from).collect()
    }

    pub fn validate(&self) -> Result<()> {
        let count = self.control_points().len();
        match self.kind {
            CurveKind::Catmull if count < 2 => {
                bail!("a Catmull-Rom spline needs at least 2 points, got {count}")
            }
            CurveKind::Bezier if !(3..=4).contains(&count) => {
                bail!("a Bézier segment needs 3 or 4 points, got {count}")
            }
            _ => {}
        }
        if !(self.radius > 0.0) {
            bail!("tube radius must be > 0.0, got {}", self.radius);
        }
        Ok(())
    }

    /// Sample the curve
    pub fn samples(&self) -> Result<Vec<Vec3>> {
        self.validate()?;
        let points = self.control_points();
        let samples = match self.kind {
            CurveKind::Catmull => {
                let curve_type = match self.spline {
                    SplineType::Centripetal => CurveType::Centripetal,
                    SplineType::Chordal => CurveType::Chordal,
                    SplineType::Uniform => CurveType::Uniform { tension: self.tension },
                };
                CatmullRom::new(points, curve_type, self.closed)?.points(self.divisions)
            }
            CurveKind::Bezier if points.len() == 3 => {
                QuadraticBezier::new(points[0], points[1], points[2]).points(self.divisions)
            }
            CurveKind::Bezier => {
                CubicBezier::new(points[0], points[1], points[2], points[3]).points(self.divisions)
            }
        };
        Ok(samples)
    }

    /// Tube swept along the sampled curve
    pub fn build(&self) -> Result<UnpackedMesh> {
        let samples = self.samples()?;
        // A closed spline already ends on its first point
        let closed = self.closed && self.kind == CurveKind::Catmull;
        Ok(tube_along(&samples, self.radius, self.radial_segments, closed))
    }
}

/// Colour models a volume can be built in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Unit cube
    #[default]
    Rgb,
    /// Unit cube, inverted
    Cmy,
    /// Cone, hue in degrees
    Hsv,
    /// Double cone
    Hsl,
}

impl ColorSpace {
    pub fn model(self) -> ColorModel {
        match self {
            Self::Rgb => ColorModel::Rgb,
            Self::Cmy => ColorModel::Cmy,
            Self::Hsv => ColorModel::Hsv,
            Self::Hsl => ColorModel::Hsl,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorVolumeEntry {
    pub model: ColorSpace,
    /// Per-channel `[min, max]` overrides, in channel order
    pub limits: Vec<[f32; 2]>,
    /// Also write the outline of the whole space as thin tubes
    pub outline: bool,
}

impl ColorVolumeEntry {
    pub fn limits(&self) -> Result<ColorLimits> {
        let model = self.model.model();
        if self.limits.len() > 3 {
            bail!("{model} has 3 channels, got {} limits", self.limits.len());
        }
        let limits = self
            .limits
            .iter()
            .enumerate()
            .fold(ColorLimits::full(model), |limits, (i, [min, max])| {
                limits.with_channel(i, *min, *max)
            });
        Ok(limits)
    }

    pub fn validate(&self) -> Result<()> {
        let limits = self.limits()?;
        let channels = limits.model.channels();
        for (i, extent) in limits.extents().into_iter().enumerate() {
            if !(extent > 0.0) {
                bail!(
                    "{} limits leave an empty range for {}",
                    limits.model,
                    channels[i]
                );
            }
        }
        Ok(())
    }

    /// The volume, or `None` when the limits enclose nothing
    pub fn build(&self) -> Result<Option<UnpackedMesh>> {
        Ok(color_volume(&self.limits()?))
    }

    /// Tubes along the outline of the full colour space
    pub fn build_outline(&self) -> Result<Option<UnpackedMesh>> {
        let edges = outline_edges(self.model.model());
        Ok(tubes_from_edges(&edges, OUTLINE_RADIUS, TUBE_RADIAL_SEGMENTS))
    }
}

/// Outline tube radius
const OUTLINE_RADIUS: f32 = 0.005;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CityEntry {
    pub seed1: f64,
    pub seed2: f64,
    pub half_lots: i32,
    pub trees_per_lot: u32,
    /// Day/night factor (0 = day, 1 = night)
    pub night: f32,
}

impl Default for CityEntry {
    fn default() -> Self {
        let generator = trama_gen::city::CityGenerator::default();
        Self {
            seed1: generator.seed1,
            seed2: generator.seed2,
            half_lots: generator.half_lots,
            trees_per_lot: generator.trees_per_lot,
            night: 0.0,
        }
    }
}
