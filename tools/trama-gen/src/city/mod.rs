//! Seeded procedural city
//!
//! Two facing rows of lots on a ground plane. Each lot holds a multi-storey
//! house, a park slab, a lamp post and a line of trees. Every part is moved
//! to world space and merged into one mesh per [`Material`], so a renderer
//! needs a single draw per material.
//!
//! ```no_run
//! use trama_gen::city::{CityGenerator, DayNight};
//!
//! let city = CityGenerator::default().generate();
//! let dusk = DayNight::at(0.6);
//! println!("{} lamps at {}", city.lights.len(), dusk.lamp_intensity);
//! ```

use std::collections::BTreeMap;
use std::f32::consts::PI;

use glam::{Mat4, Vec3};
use tracing::{debug, info};

use crate::color::to_rgba8;
use crate::mesh::{
    MeshModifier, Transform, UnpackedMesh, combine, generate_box, generate_cylinder,
    generate_plane, generate_sphere,
};

mod daynight;
mod materials;
mod rng;

pub use daynight::{
    DIRECTIONAL_COLOR, DIRECTIONAL_POSITION, DayNight, HEMISPHERE_COLORS, SKY_DAY, SKY_NIGHT,
};
pub use materials::Material;
pub use rng::{SEED1, SEED2, SeededRng};

const GROUND_SIZE: (f32, f32) = (220.0, 80.0);
const GROUND_Y: f32 = -0.1;
const LOT_SPACING: f32 = 22.0;
const ROW_OFFSET: f32 = 15.0;

const FLOOR_HEIGHT: f32 = 4.0;
const HOUSE_DEPTH: f32 = 10.0;
const PARK_SIZE: f32 = 20.0;
const LAMP_LINE: f32 = 16.0;
const LAMP_RADIUS: f32 = 0.3;
const POST_RADIUS: f32 = 0.1;

const SPHERE_SEGMENTS: (u32, u32) = (32, 16);
const TRUNK_SEGMENTS: u32 = 32;
const POST_SEGMENTS: u32 = 12;

/// A lamp's light, in world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    /// Range of the light
    pub distance: f32,
    pub decay: f32,
}

/// Generated city: merged geometry per material plus the lamp lights
#[derive(Clone, Debug, Default)]
pub struct City {
    pub batches: BTreeMap<Material, UnpackedMesh>,
    pub lights: Vec<PointLight>,
}

impl City {
    pub fn triangle_count(&self) -> usize {
        self.batches.values().map(|m| m.triangle_count()).sum()
    }
}

/// City layout parameters
#[derive(Clone, Debug)]
pub struct CityGenerator {
    pub seed1: f64,
    pub seed2: f64,
    /// Lots per row on each side of the origin (`i` in `-n..n`)
    pub half_lots: i32,
    pub trees_per_lot: u32,
    pub lamp_intensity: f32,
    /// Skip lamp lights, as at daytime
    pub daytime: bool,
}

impl Default for CityGenerator {
    fn default() -> Self {
        Self {
            seed1: SEED1,
            seed2: SEED2,
            half_lots: 4,
            trees_per_lot: 10,
            lamp_intensity: 0.65,
            daytime: false,
        }
    }
}

impl CityGenerator {
    /// Build the whole city
    ///
    /// The random sequence is consumed in a fixed order, so the same
    /// parameters always produce the same city.
    pub fn generate(&self) -> City {
        let mut rng = SeededRng::new(self.seed1, self.seed2);
        let mut builder = CityBuilder::default();

        let ground: UnpackedMesh = generate_plane(GROUND_SIZE.0, GROUND_SIZE.1, 1, 1);
        builder.add(
            Material::Ground,
            &ground,
            Mat4::from_translation(Vec3::new(0.0, GROUND_Y, 0.0)),
        );

        for (z, angle) in [(-ROW_OFFSET, 0.0), (ROW_OFFSET, PI)] {
            for i in -self.half_lots..self.half_lots {
                let lot = Mat4::from_translation(Vec3::new(i as f32 * LOT_SPACING, 0.0, z))
                    * Mat4::from_rotation_y(angle);
                self.build_lot(&mut rng, &mut builder, lot);
            }
        }

        let city = builder.finish();
        info!(
            "generated city: {} materials, {} triangles, {} lights",
            city.batches.len(),
            city.triangle_count(),
            city.lights.len()
        );
        city
    }

    fn build_lot(&self, rng: &mut SeededRng, builder: &mut CityBuilder, lot: Mat4) {
        let floors = rng.int(2, 10);
        let width = rng.float(3.0, 8.0);
        build_house(rng, builder, lot, floors.max(0) as u32, width);

        let park: UnpackedMesh = generate_box(PARK_SIZE, 0.05, PARK_SIZE);
        builder.add(Material::Grass, &park, lot);

        let lamp_height = rng.float(2.0, 7.0);
        let lamp_count = rng.int(1, 1).max(1);
        // Drawn to keep the sequence aligned; lamps take the palette colour
        let _hue = rng.float(0.0, 1.0);
        let lamp_spacing = LAMP_LINE / lamp_count as f32;
        for k in 1..=lamp_count {
            let x = LAMP_LINE / 2.0 - k as f32 * lamp_spacing;
            let at = lot * Mat4::from_translation(Vec3::new(x, 0.0, 8.0));
            self.build_lamp_post(rng, builder, at, lamp_height);
        }

        for j in 0..self.trees_per_lot {
            let height = rng.float(3.0, 7.0);
            let diameter = rng.float(1.0, 4.0);
            let foliage = Material::foliage(rng.int(1, 3));
            let offset_x = rng.float(0.0, 2.0);
            let at = lot * Mat4::from_translation(Vec3::new(9.0 - offset_x, 0.0, 5.0 - j as f32));
            build_tree(builder, at, height, diameter, foliage);
        }
    }

    fn build_lamp_post(
        &self,
        rng: &mut SeededRng,
        builder: &mut CityBuilder,
        at: Mat4,
        height: f32,
    ) {
        let post: UnpackedMesh = generate_cylinder(POST_RADIUS, POST_RADIUS, height, POST_SEGMENTS);
        builder.add(
            Material::Post,
            &post,
            at * Mat4::from_translation(Vec3::new(0.0, height / 2.0, 0.0)),
        );

        let material = Material::light(rng.int(1, 5));
        let (segments, rings) = SPHERE_SEGMENTS;
        let lamp: UnpackedMesh = generate_sphere(LAMP_RADIUS, segments, rings);
        let top = at * Mat4::from_translation(Vec3::new(0.0, height, 0.0));
        builder.add(material, &lamp, top);

        if !self.daytime {
            builder.lights.push(PointLight {
                position: top.transform_point3(Vec3::ZERO),
                color: material.emissive().unwrap_or(Vec3::ONE),
                intensity: self.lamp_intensity,
                distance: 10.0,
                decay: 1.0,
            });
        }
    }
}

fn build_house(
    rng: &mut SeededRng,
    builder: &mut CityBuilder,
    lot: Mat4,
    floors: u32,
    width: f32,
) {
    let wall = Material::house(rng.int(1, 3));
    let lift = |y: f32| lot * Mat4::from_translation(Vec3::new(0.0, y, 0.0));

    let roof: UnpackedMesh = generate_box(width + 1.0, 0.5, HOUSE_DEPTH + 1.0);
    builder.add(Material::Roof, &roof, lift(FLOOR_HEIGHT * floors as f32));

    let body: UnpackedMesh = generate_box(width, FLOOR_HEIGHT, HOUSE_DEPTH);
    let slab: UnpackedMesh = generate_box(width + 1.0, 0.1, HOUSE_DEPTH + 1.0);
    // Windows face sideways, so the 3 m side runs along Z
    let window: UnpackedMesh = generate_box(0.1, 1.5, 3.0);

    for i in 0..floors {
        let base = i as f32 * FLOOR_HEIGHT;
        builder.add(Material::Floor, &slab, lift(base));
        builder.add(wall, &body, lift(base + FLOOR_HEIGHT / 2.0));

        for (x, z) in [(-width / 2.0 - 0.1, 2.0), (width / 2.0 + 0.1, -2.0)] {
            let at = lot * Mat4::from_translation(Vec3::new(x, base + 2.0, z));
            builder.add(Material::Window, &window, at);
        }
    }

    let door: UnpackedMesh = generate_box(1.0, 2.2, 0.2);
    builder.add(
        Material::Door,
        &door,
        lot * Mat4::from_translation(Vec3::new(0.0, 1.1, HOUSE_DEPTH / 2.0)),
    );
}

fn build_tree(builder: &mut CityBuilder, at: Mat4, height: f32, diameter: f32, foliage: Material) {
    let trunk_diameter = (diameter * 0.1).max(0.1);
    let trunk: UnpackedMesh =
        generate_cylinder(trunk_diameter, trunk_diameter / 2.0, height, TRUNK_SEGMENTS);
    builder.add(
        Material::Trunk,
        &trunk,
        at * Mat4::from_translation(Vec3::new(0.0, height / 2.0, 0.0)),
    );

    let (segments, rings) = SPHERE_SEGMENTS;
    let crown: UnpackedMesh = generate_sphere(diameter / 2.0, segments, rings);
    builder.add(
        foliage,
        &crown,
        at * Mat4::from_translation(Vec3::new(0.0, height, 0.0)),
    );
}

/// Collects world-space parts per material
#[derive(Default)]
struct CityBuilder {
    parts: BTreeMap<Material, Vec<UnpackedMesh>>,
    lights: Vec<PointLight>,
}

impl CityBuilder {
    fn add(&mut self, material: Material, mesh: &UnpackedMesh, world: Mat4) {
        let mut part = mesh.clone();
        Transform::from_matrix(world).apply(&mut part);
        self.parts.entry(material).or_default().push(part);
    }

    fn finish(self) -> City {
        let batches = self
            .parts
            .into_iter()
            .map(|(material, parts)| {
                let refs: Vec<&UnpackedMesh> = parts.iter().collect();
                let mut merged = combine(&refs);
                merged.paint(to_rgba8(material.display_color()));
                debug!(
                    "{}: {} parts, {} triangles",
                    material,
                    parts.len(),
                    merged.triangle_count()
                );
                (material, merged)
            })
            .collect();

        City {
            batches,
            lights: self.lights,
        }
    }
}
