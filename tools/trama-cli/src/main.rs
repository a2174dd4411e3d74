//! trama - procedural geometry export tool
//!
//! Builds parametric surfaces, cylinders, elevation meshes, curve tubes,
//! colour-space volumes and the procedural city as OBJ files.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use trama_gen::mesh::{UnpackedMesh, write_obj};

use trama_cli::{
    CityEntry, ColorSpace, ColorVolumeEntry, CurveEntry, CurveKind, CylinderEntry, ElevationEntry,
    SplineType, SurfaceEntry, SurfacePreset, export_city, manifest,
};

#[derive(Parser)]
#[command(name = "trama")]
#[command(about = "Procedural geometry export tool")]
#[command(version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every mesh listed in a manifest
    Build {
        /// Path to trama.toml manifest
        #[arg(default_value = "trama.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to trama.toml manifest
        #[arg(default_value = "trama.toml")]
        manifest: PathBuf,
    },

    /// Tessellate a parametric surface preset
    Surface {
        #[arg(value_enum)]
        preset: SurfacePreset,

        /// Output .obj file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Grid resolution
        #[arg(short, long)]
        segments: Option<u32>,

        /// Flat shading
        #[arg(long)]
        flat: bool,
    },

    /// Build a cylinder with optional caps
    Cylinder {
        #[arg(long, default_value_t = 1.0)]
        radius: f32,

        #[arg(long, default_value_t = 2.0)]
        height: f32,

        /// Divisions around the axis
        #[arg(long, default_value_t = 32)]
        radial: u32,

        /// Divisions along the axis
        #[arg(long, default_value_t = 4)]
        height_segments: u32,

        /// Add the end caps
        #[arg(long)]
        closed: bool,

        /// Output .obj file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build an elevation mesh from a greyscale heightmap
    Elevation {
        /// Input PNG/JPG heightmap
        image: PathBuf,

        /// Output .obj file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Height of a white sample
        #[arg(long, default_value_t = 1.0)]
        amplitude: f32,

        /// Grid resolution (min 3)
        #[arg(long, default_value_t = 64)]
        segments: u32,
    },

    /// Sweep a tube along a demo curve
    Curve {
        #[arg(value_enum)]
        kind: CurveKind,

        /// Output .obj file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tube radius
        #[arg(long, default_value_t = 0.1)]
        radius: f32,

        /// Samples along the curve
        #[arg(long, default_value_t = 50)]
        divisions: u32,

        /// Spline parameterisation (Catmull-Rom only)
        #[arg(long, value_enum, default_value_t = SplineType::Centripetal)]
        spline: SplineType,

        /// Close the spline into a loop
        #[arg(long)]
        closed: bool,
    },

    /// Build a colour-space volume
    Color {
        #[arg(value_enum)]
        model: ColorSpace,

        /// Output .obj file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Limits of the first channel
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
        c1: Option<Vec<f32>>,

        /// Limits of the second channel
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
        c2: Option<Vec<f32>>,

        /// Limits of the third channel
        #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
        c3: Option<Vec<f32>>,

        /// Also write the outline of the whole space
        #[arg(long)]
        outline: bool,
    },

    /// Generate the procedural city
    City {
        /// Output directory
        #[arg(short, long, default_value = "city")]
        output: PathBuf,

        /// Day/night factor (0 = day, 1 = night)
        #[arg(long, default_value_t = 0.0)]
        night: f32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match cli.command {
        Commands::Build { manifest, output } => {
            tracing::info!("Building meshes from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let written = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} files written", written);
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Surface {
            preset,
            output,
            segments,
            flat,
        } => {
            let entry = SurfaceEntry {
                preset,
                segments,
                flat: flat.then_some(true),
            };
            let name = format!("{preset:?}").to_lowercase();
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{name}.obj")));
            export(&entry.build()?, &output, &name)?;
        }

        Commands::Cylinder {
            radius,
            height,
            radial,
            height_segments,
            closed,
            output,
        } => {
            let entry = CylinderEntry {
                radius,
                height,
                radial_segments: radial,
                height_segments,
                closed,
            };
            let output = output.unwrap_or_else(|| PathBuf::from("cylinder.obj"));
            export(&entry.build(), &output, "cylinder")?;
        }

        Commands::Elevation {
            image,
            output,
            amplitude,
            segments,
        } => {
            let entry = ElevationEntry {
                image: Some(image.clone()),
                amplitude,
                segments,
                ..Default::default()
            };
            entry.validate(Path::new(""))?;
            let output = output.unwrap_or_else(|| image.with_extension("obj"));
            export(&entry.build(Path::new(""))?, &output, "elevation")?;
        }

        Commands::Curve {
            kind,
            output,
            radius,
            divisions,
            spline,
            closed,
        } => {
            let entry = CurveEntry {
                kind,
                radius,
                divisions,
                spline,
                closed,
                ..Default::default()
            };
            let name = format!("{kind:?}").to_lowercase();
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{name}.obj")));
            export(&entry.build()?, &output, &name)?;
        }

        Commands::Color {
            model,
            output,
            c1,
            c2,
            c3,
            outline,
        } => {
            let mut entry = ColorVolumeEntry {
                model,
                outline,
                ..Default::default()
            };
            // Channels keep their full range until one is given
            let channels = [c1, c2, c3];
            let last = channels.iter().rposition(Option::is_some);
            if let Some(last) = last {
                let full = entry.limits()?.channels;
                entry.limits = channels[..=last]
                    .iter()
                    .zip(full)
                    .map(|(given, (lo, hi))| match given.as_deref() {
                        Some([min, max]) => [*min, *max],
                        _ => [lo, hi],
                    })
                    .collect();
            }
            entry.validate()?;

            let name = model.model().name();
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{name}.obj")));
            let Some(mesh) = entry.build()? else {
                bail!("{} limits enclose no volume", name);
            };
            export(&mesh, &output, name)?;

            if entry.outline {
                let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
                let outline_path = output.with_file_name(format!("{stem}_outline.obj"));
                if let Some(mesh) = entry.build_outline()? {
                    export(&mesh, &outline_path, &format!("{name}_outline"))?;
                }
            }
        }

        Commands::City { output, night } => {
            let entry = CityEntry {
                night,
                ..Default::default()
            };
            tracing::info!("Generating city -> {:?}", output);
            let export = export_city(&entry, &output)?;
            tracing::info!(
                "Done! {} meshes, {} triangles, {} lights",
                export.meshes,
                export.triangles,
                export.lights
            );
        }
    }

    Ok(())
}

fn export(mesh: &UnpackedMesh, output: &Path, name: &str) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    tracing::info!(
        "Writing {} -> {:?} ({} vertices, {} triangles)",
        name,
        output,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    write_obj(mesh, output, name)?;
    tracing::info!("Done!");
    Ok(())
}
