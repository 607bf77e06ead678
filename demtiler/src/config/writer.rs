//! INI serialization: `ConfigFile` → commented INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to the commented INI text written to `config.ini`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[tiling]
; Tile edge length in pixels (default: 256)
tile_size = {}
; Zoom range to generate, inclusive (0-24)
min_zoom = {}
max_zoom = {}
; Output encoding:
;   heightmap-png  - 16-bit grayscale PNG normalized to the raster's range
;   raw-float      - little-endian 32-bit floats, no header
;   quantized-mesh - header plus quantized heights (no triangles or normals)
format = {}

[generation]
; Worker threads for tile generation (0 = one per CPU core)
threads = {}

[logging]
; Directory for log files
directory = {}
file = {}
"#,
        config.tiling.tile_size,
        config.tiling.min_zoom,
        config.tiling.max_zoom,
        config.tiling.format,
        config.generation.threads,
        config.logging.directory.display(),
        config.logging.file,
    )
}
