//! Manifest parsing and build orchestration
//!
//! Parses trama.toml and builds every entry into the output directory.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Deserialize;
use trama_gen::mesh::{UnpackedMesh, write_obj};

use crate::city::export_city;
use crate::entries::{
    CityEntry, ColorVolumeEntry, CurveEntry, CylinderEntry, ElevationEntry, SurfaceEntry,
};

/// Root manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub surfaces: HashMap<String, SurfaceEntry>,
    #[serde(default)]
    pub cylinders: HashMap<String, CylinderEntry>,
    #[serde(default)]
    pub elevations: HashMap<String, ElevationEntry>,
    #[serde(default)]
    pub curves: HashMap<String, CurveEntry>,
    #[serde(default)]
    pub color_volumes: HashMap<String, ColorVolumeEntry>,
    #[serde(default)]
    pub city: Option<CityEntry>,
    /// Directory holding the manifest; relative paths resolve against it
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out/")
}

/// Subdirectory the city meshes are written to
const CITY_DIR: &str = "city";

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let mut manifest: Manifest = toml::from_str(&content)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))?;
    manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(manifest)
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<()> {
    check_output_names(manifest)?;
    for (name, entry) in &manifest.elevations {
        entry
            .validate(&manifest.base_dir)
            .with_context(|| format!("Elevation '{}'", name))?;
    }
    for (name, entry) in &manifest.curves {
        entry.validate().with_context(|| format!("Curve '{}'", name))?;
    }
    for (name, entry) in &manifest.color_volumes {
        entry
            .validate()
            .with_context(|| format!("Color volume '{}'", name))?;
    }
    for (name, entry) in &manifest.cylinders {
        if !(entry.radius > 0.0 && entry.height > 0.0) {
            anyhow::bail!("Cylinder '{}' needs a positive radius and height", name);
        }
    }
    Ok(())
}

/// Every entry writes `{name}.obj` into one directory, so names must be
/// plain file stems and unique across all tables
fn check_output_names(manifest: &Manifest) -> Result<()> {
    let tables: [(&str, Vec<&String>); 5] = [
        ("surface", manifest.surfaces.keys().collect()),
        ("cylinder", manifest.cylinders.keys().collect()),
        ("elevation", manifest.elevations.keys().collect()),
        ("curve", manifest.curves.keys().collect()),
        ("color volume", manifest.color_volumes.keys().collect()),
    ];

    let mut stems: Vec<(String, &str)> = Vec::new();
    for (kind, names) in tables {
        for name in names {
            if name.is_empty()
                || name.contains(['/', '\\'])
                || name.as_str() == "."
                || name.contains("..")
            {
                anyhow::bail!("{} name '{}' is not a valid file name", kind, name);
            }
            stems.push((name.to_string(), kind));
        }
    }
    for (name, entry) in &manifest.color_volumes {
        if entry.outline {
            stems.push((format!("{}_outline", name), "color volume outline"));
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for (stem, kind) in &stems {
        if !seen.insert(stem.as_str()) {
            anyhow::bail!("Output name '{}' ({}) is used by more than one entry", stem, kind);
        }
    }
    Ok(())
}

/// One mesh to build and the file it lands in
struct Job<'a> {
    name: &'a str,
    kind: &'static str,
    build: Box<dyn Fn() -> Result<Option<UnpackedMesh>> + Send + Sync + 'a>,
}

/// Build all meshes from a manifest
///
/// Entries are built in parallel; the first failure aborts the build. Returns
/// the number of files written.
pub fn build_all(manifest: &Manifest, output_override: Option<&Path>) -> Result<usize> {
    validate(manifest)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.base_dir.join(&manifest.output.dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let base_dir = manifest.base_dir.as_path();
    let mut jobs: Vec<Job> = Vec::new();
    for (name, entry) in &manifest.surfaces {
        jobs.push(Job {
            name: name.as_str(),
            kind: "surface",
            build: Box::new(move || entry.build().map(Some)),
        });
    }
    for (name, entry) in &manifest.cylinders {
        jobs.push(Job {
            name: name.as_str(),
            kind: "cylinder",
            build: Box::new(move || Ok(Some(entry.build()))),
        });
    }
    for (name, entry) in &manifest.elevations {
        jobs.push(Job {
            name: name.as_str(),
            kind: "elevation",
            build: Box::new(move || entry.build(base_dir).map(Some)),
        });
    }
    for (name, entry) in &manifest.curves {
        jobs.push(Job {
            name: name.as_str(),
            kind: "curve",
            build: Box::new(move || entry.build().map(Some)),
        });
    }
    for (name, entry) in &manifest.color_volumes {
        jobs.push(Job {
            name: name.as_str(),
            kind: "color volume",
            build: Box::new(move || entry.build()),
        });
    }

    let written: Result<Vec<usize>> = jobs
        .par_iter()
        .map(|job| -> Result<usize> {
            let output = output_dir.join(format!("{}.obj", job.name));
            tracing::info!("Building {}: {} -> {:?}", job.kind, job.name, output);
            let mesh = (job.build)()
                .with_context(|| format!("Failed to build {} '{}'", job.kind, job.name))?;
            let Some(mesh) = mesh else {
                tracing::warn!("{} '{}' is empty, skipping", job.kind, job.name);
                return Ok(0);
            };
            write_obj(&mesh, &output, job.name)?;
            Ok(1)
        })
        .collect();
    let mut count: usize = written?.into_iter().sum();

    // Outlines ride along with their volumes
    for (name, entry) in manifest.color_volumes.iter().filter(|(_, e)| e.outline) {
        if let Some(mesh) = entry.build_outline()? {
            let output = output_dir.join(format!("{}_outline.obj", name));
            tracing::info!("Building outline: {} -> {:?}", name, output);
            write_obj(&mesh, &output, &format!("{}_outline", name))?;
            count += 1;
        }
    }

    if let Some(city) = &manifest.city {
        let dir = output_dir.join(CITY_DIR);
        tracing::info!("Building city -> {:?}", dir);
        let export = export_city(city, &dir)?;
        tracing::info!(
            "City: {} meshes, {} triangles, {} lights",
            export.meshes,
            export.triangles,
            export.lights
        );
        count += export.meshes + 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::ColorSpace;
    use tempfile::tempdir;

    fn parse(toml_src: &str) -> Manifest {
        toml::from_str(toml_src).expect("manifest should parse")
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let manifest = parse(
            r#"
            [surfaces.knot]
            preset = "star"

            [cylinders.post]
            radius = 0.5

            [color_volumes.hsv]
            model = "hsv"
            limits = [[0.0, 90.0]]
            "#,
        );
        assert_eq!(manifest.output.dir, PathBuf::from("out/"));
        assert!(manifest.city.is_none());

        let post = &manifest.cylinders["post"];
        assert_eq!(post.radius, 0.5);
        assert_eq!(post.height, 2.0);
        assert!(post.closed);

        let limits = manifest.color_volumes["hsv"].limits().unwrap();
        assert_eq!(limits.channels[0], (0.0, 90.0));
        assert_eq!(limits.channels[2], (0.0, 1.0));
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        let manifest = parse(
            r#"
            [color_volumes.many]
            model = "hsv"
            limits = [[0.0, 1.0], [0.0, 1.0], [0.0, 1.0], [0.0, 1.0]]
            "#,
        );
        assert!(validate(&manifest).is_err());

        let manifest = parse(
            r#"
            [curves.short]
            kind = "bezier"
            points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]
            "#,
        );
        assert!(validate(&manifest).is_err());

        let manifest = parse(
            r#"
            [elevations.missing]
            image = "does-not-exist.png"
            "#,
        );
        assert!(validate(&manifest).is_err());

        let manifest = parse(
            r#"
            [color_volumes.flat]
            model = "rgb"
            limits = [[0.5, 0.5]]
            "#,
        );
        assert!(validate(&manifest).is_err());
    }

    #[test]
    fn test_validate_rejects_clashing_output_names() {
        let manifest = parse(
            r#"
            [surfaces.shape]
            preset = "plane"

            [cylinders.shape]
            radius = 1.0
            "#,
        );
        let err = validate(&manifest).unwrap_err();
        assert!(err.to_string().contains("shape"));

        // An outline lands next to its volume
        let manifest = parse(
            r#"
            [color_volumes.cube]
            model = "rgb"
            outline = true

            [surfaces.cube_outline]
            preset = "star"
            "#,
        );
        assert!(validate(&manifest).is_err());

        let manifest = parse(
            r#"
            [color_volumes.cube]
            model = "rgb"

            [surfaces.cube_outline]
            preset = "star"
            "#,
        );
        assert!(validate(&manifest).is_ok());
    }

    #[test]
    fn test_validate_rejects_path_like_names() {
        for name in ["\"../escape\"", "\"nested/plane\"", "\"back\\\\slash\"", "\"\""] {
            let manifest = parse(&format!("[surfaces.{name}]\npreset = \"plane\"\n"));
            assert!(validate(&manifest).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_unknown_preset_fails_to_parse() {
        let result: std::result::Result<Manifest, _> = toml::from_str(
            r#"
            [surfaces.x]
            preset = "klein"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_color_model_fails_to_parse() {
        let result: std::result::Result<Manifest, _> = toml::from_str(
            r#"
            [color_volumes.bad]
            model = "lab"
            "#,
        );
        assert!(result.is_err());

        let manifest = parse(
            r#"
            [color_volumes.cone]
            model = "hsv"
            "#,
        );
        assert_eq!(manifest.color_volumes["cone"].model, ColorSpace::Hsv);
    }

    #[test]
    fn test_build_all_writes_every_entry() {
        let dir = tempdir().expect("Failed to create temp dir");
        let manifest_path = dir.path().join("trama.toml");
        std::fs::write(
            &manifest_path,
            r#"
            [output]
            dir = "meshes"

            [surfaces.plane]
            preset = "plane"
            segments = 4

            [cylinders.can]
            radial_segments = 8
            height_segments = 1

            [elevations.hills]
            seed = 7
            segments = 8

            [curves.path]
            divisions = 10

            [color_volumes.cube]
            model = "rgb"
            outline = true
            "#,
        )
        .unwrap();

        let manifest = load_manifest(&manifest_path).unwrap();
        let count = build_all(&manifest, None).unwrap();
        assert_eq!(count, 6);

        let out = dir.path().join("meshes");
        for file in ["plane", "can", "hills", "path", "cube", "cube_outline"] {
            assert!(out.join(format!("{file}.obj")).exists(), "{file}.obj missing");
        }
        let plane = std::fs::read_to_string(out.join("plane.obj")).unwrap();
        assert!(plane.contains("o plane"));
        // 4x4 cells, two triangles each
        assert_eq!(plane.lines().filter(|l| l.starts_with("f ")).count(), 32);
    }
}
