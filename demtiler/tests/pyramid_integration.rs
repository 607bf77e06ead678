//! Integration tests for pyramid generation.
//!
//! These tests run the whole flow from a raster file on disk to tiles and a
//! descriptor in an output directory:
//! - ASCII grid → ElevationRaster → PyramidGenerator → DirectorySink
//! - tile layout and `layer.json` contents
//! - coverage of irregular rasters
//!
//! Run with: `cargo test --test pyramid_integration`

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use demtiler::config::PyramidConfig;
use demtiler::coord::{generate_tiling_scheme, GeoBounds, TileCoord};
use demtiler::encode::{TileFormat, QUANTIZED_MESH_HEADER_SIZE};
use demtiler::pyramid::{PyramidGenerator, PyramidMetadata};
use demtiler::raster::{self, ElevationRaster, RasterSource};
use demtiler::sink::{DirectorySink, MemorySink, DESCRIPTOR_FILE};

// ============================================================================
// Helper Functions
// ============================================================================

/// Write an ESRI ASCII grid covering `[-10, -10, 10, 10]` with a ramp from
/// 100 m in the north-west to 100 + 10·(x + y) m in the south-east.
fn write_grid(dir: &Path, size: u32) -> std::path::PathBuf {
    let cell = 20.0 / size as f64;
    let mut text = format!(
        "ncols {size}\nnrows {size}\nxllcorner -10\nyllcorner -10\ncellsize {cell}\nNODATA_value -9999\n"
    );
    for y in 0..size {
        let row: Vec<String> = (0..size)
            .map(|x| format!("{}", 100 + 10 * (x + y)))
            .collect();
        text.push_str(&row.join(" "));
        text.push('\n');
    }

    let path = dir.join("dem.asc");
    fs::write(&path, text).unwrap();
    path
}

fn load(path: &Path) -> ElevationRaster {
    raster::open(path).load().unwrap()
}

fn read_descriptor(root: &Path) -> PyramidMetadata {
    let json = fs::read_to_string(root.join(DESCRIPTOR_FILE)).unwrap();
    PyramidMetadata::from_json(&json).unwrap()
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Level counts never shrink with zoom for a fixed bounding box.
#[test]
fn test_scheme_is_monotonic_for_reference_bbox() {
    let bounds = GeoBounds::new(-10.0, -10.0, 10.0, 10.0).unwrap();
    let scheme = generate_tiling_scheme(&bounds, 0, 2).unwrap();

    assert!(scheme.level_count(2) >= scheme.level_count(1));
    assert!(scheme.level_count(1) >= scheme.level_count(0));
    assert_eq!(scheme.level_count(0), 1);
}

/// Full run from an ASCII grid to PNG tiles on disk.
#[test]
fn test_ascii_grid_to_png_pyramid() {
    let dir = TempDir::new().unwrap();
    let grid = write_grid(dir.path(), 32);
    let out = dir.path().join("tiles");

    let raster = load(&grid);
    let config = PyramidConfig::default()
        .with_tile_size(256)
        .with_zoom_range(0, 2);
    let report = PyramidGenerator::new(config)
        .generate(&raster, &DirectorySink::new(&out))
        .unwrap();

    assert_eq!(report.emitted, 9);
    assert_eq!(report.failed, 0);

    for (z, x, y) in [(0, 0, 0), (1, 0, 0), (1, 1, 1), (2, 1, 1), (2, 2, 2)] {
        let path = out.join(format!("{z}/{x}/{y}.png"));
        let img = image::open(&path).unwrap().into_luma16();
        assert_eq!(img.dimensions(), (256, 256), "{}", path.display());
    }

    let meta = read_descriptor(&out);
    assert_eq!(meta.tilejson, "2.1.0");
    assert_eq!(meta.format, "heightmap-1.0");
    assert_eq!(meta.bounds, [-10.0, -10.0, 10.0, 10.0]);
    assert_eq!((meta.minzoom, meta.maxzoom), (0, 2));
    assert_eq!(meta.tiles, vec!["{z}/{x}/{y}.png".to_string()]);
    assert_eq!(meta.available.len(), 3);
}

/// Heightmap values use the raster-wide range: the fill around the raster and
/// its lowest sample map to 0, while the south-east corner lands high.
#[test]
fn test_png_spans_raster_range() {
    let dir = TempDir::new().unwrap();
    let raster = load(&write_grid(dir.path(), 16));

    let sink = MemorySink::new();
    PyramidGenerator::new(PyramidConfig::default().with_tile_size(64).with_zoom_range(0, 0))
        .generate(&raster, &sink)
        .unwrap();

    let tile = sink.get(&TileCoord::new(0, 0, 0)).unwrap();
    let img = image::load_from_memory(&tile.bytes).unwrap().into_luma16();
    let samples = img.into_raw();

    assert_eq!(samples.iter().copied().min(), Some(0));
    assert!(samples.iter().copied().max().unwrap() > 32768);
}

/// Quantized-mesh tiles carry the header plus one i16 per pixel.
#[test]
fn test_quantized_mesh_pyramid() {
    let dir = TempDir::new().unwrap();
    let raster = load(&write_grid(dir.path(), 16));
    let out = dir.path().join("mesh");

    let config = PyramidConfig::default()
        .with_tile_size(32)
        .with_zoom_range(1, 2)
        .with_format(TileFormat::QuantizedMesh);
    let report = PyramidGenerator::new(config)
        .generate(&raster, &DirectorySink::new(&out))
        .unwrap();
    assert_eq!(report.emitted, 8);

    let bytes = fs::read(out.join("2/1/1.terrain")).unwrap();
    assert_eq!(bytes.len(), QUANTIZED_MESH_HEADER_SIZE + 32 * 32 * 2);

    let meta = read_descriptor(&out);
    assert_eq!(meta.format, "quantized-mesh-1.0");
    assert_eq!(meta.available[0], None);
    assert!(meta.available[1].is_some());
}

/// Raw float tiles of a constant raster decode to the constant.
#[test]
fn test_raw_float_constant_raster() {
    let raster =
        ElevationRaster::from_samples(vec![321.5; 16], 4, 4, [20.0, 40.0, 30.0, 50.0], None)
            .unwrap();
    let sink = MemorySink::new();

    let config = PyramidConfig::default()
        .with_tile_size(16)
        .with_zoom_range(3, 3)
        .with_format(TileFormat::RawFloat);
    let report = PyramidGenerator::new(config).generate(&raster, &sink).unwrap();
    assert!(report.emitted > 0);

    for tile in sink.tiles() {
        assert_eq!(tile.bytes.len(), 16 * 16 * 4);
        for chunk in tile.bytes.chunks_exact(4) {
            let v = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            assert_eq!(v, 321.5);
        }
    }
}

/// A thin strip of raster: the descriptor only lists tiles that were
/// actually written.
#[test]
fn test_irregular_coverage_descriptor() {
    let raster = ElevationRaster::from_samples(
        (0..40).map(|v| v as f32).collect(),
        20,
        2,
        [0.5, 0.5, 40.0, 1.0],
        None,
    )
    .unwrap();
    let out = TempDir::new().unwrap();

    let config = PyramidConfig::default().with_tile_size(8).with_zoom_range(0, 4);
    let report = PyramidGenerator::new(config)
        .generate(&raster, &DirectorySink::new(out.path()))
        .unwrap();

    let meta = read_descriptor(out.path());
    for level in &report.levels {
        let range = meta.available_at(level.zoom).unwrap();
        let listed =
            (range.end_x - range.start_x + 1) as usize * (range.end_y - range.start_y + 1) as usize;
        assert!(listed >= level.emitted);

        // Every listed corner tile exists on disk
        let corner = out
            .path()
            .join(format!("{}/{}/{}.png", level.zoom, range.start_x, range.start_y));
        assert!(corner.exists(), "{}", corner.display());
    }
}

/// Image heightmap plus sidecar works end to end.
#[test]
fn test_image_heightmap_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dem.png");

    let img: image::ImageBuffer<image::Luma<u16>, Vec<u16>> =
        image::ImageBuffer::from_fn(8, 8, |x, y| image::Luma([(x * 100 + y) as u16]));
    img.save(&path).unwrap();
    fs::write(
        dir.path().join("dem.png.json"),
        r#"{"bounds": [5.0, 45.0, 6.0, 46.0], "scale": 0.5, "offset": 200}"#,
    )
    .unwrap();

    let raster = load(&path);
    assert_eq!(raster.min_elevation(), 200.0);

    let sink = MemorySink::new();
    let config = PyramidConfig::default()
        .with_tile_size(16)
        .with_zoom_range(5, 6);
    let report = PyramidGenerator::new(config)
        .generate(&raster, &sink)
        .unwrap();
    assert!(report.emitted >= 2);
    assert_eq!(sink.metadata().unwrap().bounds, [5.0, 45.0, 6.0, 46.0]);
}
