//! City export: one OBJ per material plus the lighting rig as JSON

use std::path::Path;

use anyhow::{Context, Result};
use trama_gen::city::{
    CityGenerator, DIRECTIONAL_COLOR, DIRECTIONAL_POSITION, DayNight, HEMISPHERE_COLORS,
};
use trama_gen::color::from_hex;
use trama_gen::mesh::write_obj;

use crate::entries::CityEntry;

/// Name of the lighting file written next to the meshes
pub const LIGHTS_FILE: &str = "lights.json";

/// What an export wrote
#[derive(Debug, Clone, Default)]
pub struct CityExport {
    pub meshes: usize,
    pub triangles: usize,
    pub lights: usize,
}

impl CityEntry {
    pub fn generator(&self) -> CityGenerator {
        CityGenerator {
            seed1: self.seed1,
            seed2: self.seed2,
            half_lots: self.half_lots,
            trees_per_lot: self.trees_per_lot,
            daytime: self.night <= 0.0,
            ..Default::default()
        }
    }
}

/// Generate the city and write it into `dir`
pub fn export_city(entry: &CityEntry, dir: &Path) -> Result<CityExport> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {:?}", dir))?;

    let city = entry.generator().generate();
    let lighting = DayNight::at(entry.night);

    for (material, mesh) in &city.batches {
        let path = dir.join(format!("{}.obj", material.name()));
        tracing::debug!("Writing {} ({} triangles)", material, mesh.triangle_count());
        write_obj(mesh, &path, material.name())?;
    }

    // Lamps follow the day/night factor like the rest of the rig
    let points: Vec<_> = city
        .lights
        .iter()
        .map(|light| {
            serde_json::json!({
                "position": light.position.to_array(),
                "color": light.color.to_array(),
                "intensity": lighting.lamp_intensity,
                "distance": light.distance,
                "decay": light.decay,
            })
        })
        .collect();

    let rig = serde_json::json!({
        "night": lighting.factor,
        "sky": lighting.sky.to_array(),
        "window_emissive": lighting.window_emissive.to_array(),
        "directional": {
            "color": from_hex(DIRECTIONAL_COLOR).to_array(),
            "position": DIRECTIONAL_POSITION.to_array(),
            "intensity": lighting.directional_intensity,
        },
        "hemisphere": {
            "sky": from_hex(HEMISPHERE_COLORS.0).to_array(),
            "ground": from_hex(HEMISPHERE_COLORS.1).to_array(),
            "intensity": lighting.hemisphere_intensity,
        },
        "points": points,
    });

    let path = dir.join(LIGHTS_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(&rig)?)
        .with_context(|| format!("Failed to write {:?}", path))?;

    Ok(CityExport {
        meshes: city.batches.len(),
        triangles: city.triangle_count(),
        lights: city.lights.len(),
    })
}
