//! trama-cli library
//!
//! Manifest handling and the entry builders behind the `trama` binary.

pub mod city;
pub mod entries;
pub mod manifest;

pub use city::{CityExport, LIGHTS_FILE, export_city};
pub use entries::{
    CityEntry, ColorSpace, ColorVolumeEntry, CurveEntry, CurveKind, CylinderEntry, ElevationEntry,
    SplineType, SurfaceEntry, SurfacePreset,
};
