//! Heightmap sources: noise, PNG and other image files
//!
//! Everything produces a [`HeightField`] with samples in `[0, 1]`, ready for
//! `generate_elevation`.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;
use trama_geom::procedural::HeightField;
use trama_geom::{GeomError, Result};

mod noise;

pub use self::noise::{PerlinConfig, layered_profile, periodic_profile};

/// Load a heightmap from any supported image file
///
/// PNG files are decoded directly; other formats (JPEG) go through the
/// `image` crate. Only the first (red/grey) channel is used.
pub fn load_heightmap(path: &Path) -> Result<HeightField> {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png {
        return load_heightmap_png(path);
    }

    let image = image::open(path)
        .map_err(|e| GeomError::Image {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .to_luma8();

    let (width, height) = image.dimensions();
    debug!("loaded {}x{} heightmap from {}", width, height, path.display());
    HeightField::new(
        width,
        height,
        image.pixels().map(|p| p.0[0] as f32 / 255.0).collect(),
    )
}

/// Load a heightmap from the red channel of a PNG
///
/// Grey, grey-alpha, RGB and RGBA images are accepted. Palette images are
/// expanded and 16-bit images are reduced to 8 bits first.
pub fn load_heightmap_png(path: &Path) -> Result<HeightField> {
    let decode_error = |reason: String| GeomError::Image {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| GeomError::io(path, e))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder.read_info().map_err(|e| decode_error(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(|e| decode_error(e.to_string()))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(decode_error(format!("unsupported bit depth {:?}", info.bit_depth)));
    }
    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => return Err(decode_error(format!("unsupported colour type {other:?}"))),
    };

    let (width, height) = (info.width, info.height);
    let samples = buf[..info.buffer_size()]
        .chunks_exact(info.line_size)
        .flat_map(|row| row.chunks_exact(channels).take(width as usize))
        .map(|px| px[0] as f32 / 255.0)
        .collect();

    debug!("loaded {}x{} heightmap from {}", width, height, path.display());
    HeightField::new(width, height, samples)
}

/// Write a height field as an 8-bit greyscale PNG
pub fn write_heightfield_png(field: &HeightField, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| GeomError::io(path, e))?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, field.width(), field.height());
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    let pixels: Vec<u8> = field
        .samples()
        .iter()
        .map(|s| (s.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    let encode_error = |e: png::EncodingError| GeomError::io(path, std::io::Error::other(e));
    let mut writer = encoder.write_header().map_err(encode_error)?;
    writer.write_image_data(&pixels).map_err(encode_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn gradient() -> HeightField {
        HeightField::from_fn(8, 4, |x, _| x as f32 / 7.0).unwrap()
    }

    #[test]
    fn test_png_roundtrip_keeps_gradient() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ramp.png");
        write_heightfield_png(&gradient(), &path).unwrap();

        let loaded = load_heightmap(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (8, 4));
        assert_eq!(loaded.get(0, 2), 0.0);
        assert_eq!(loaded.get(7, 2), 1.0);
        assert!((loaded.get(3, 0) - 3.0 / 7.0).abs() < 1.0 / 255.0);
    }

    #[test]
    fn test_png_rgba_uses_red_channel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rgba.png");
        let file = File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[255, 0, 0, 255, 51, 255, 255, 0]).unwrap();
        writer.finish().unwrap();

        let field = load_heightmap_png(&path).unwrap();
        assert_eq!(field.samples(), &[1.0, 0.2]);
    }

    #[test]
    fn test_jpeg_goes_through_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flat.jpg");
        image::GrayImage::from_pixel(16, 16, image::Luma([200]))
            .save(&path)
            .unwrap();

        let field = load_heightmap(&path).unwrap();
        assert_eq!((field.width(), field.height()), (16, 16));
        assert!(field.samples().iter().all(|s| (s - 200.0 / 255.0).abs() < 0.03));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_heightmap(Path::new("/nonexistent/height.png")).unwrap_err();
        assert!(matches!(err, GeomError::Io { .. }));
    }
}
