//! INI parsing: `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names map to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::MAX_ZOOM;
use crate::encode::TileFormat;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [tiling] section
    if let Some(section) = ini.section(Some("tiling")) {
        let positive = "must be a positive integer";
        if let Some(v) = parse_key::<u32>(section, "tiling", "tile_size", positive)? {
            if v == 0 {
                return Err(invalid("tiling", "tile_size", "0", positive));
            }
            config.tiling.tile_size = v;
        }
        let zoom_range = "must be an integer from 0 to 24";
        if let Some(v) = parse_key::<u8>(section, "tiling", "min_zoom", zoom_range)? {
            config.tiling.min_zoom = check_zoom("min_zoom", v)?;
        }
        if let Some(v) = parse_key::<u8>(section, "tiling", "max_zoom", zoom_range)? {
            config.tiling.max_zoom = check_zoom("max_zoom", v)?;
        }
        if let Some(v) = parse_key::<TileFormat>(
            section,
            "tiling",
            "format",
            "must be one of: heightmap-png, raw-float, quantized-mesh",
        )? {
            config.tiling.format = v;
        }

        if config.tiling.min_zoom > config.tiling.max_zoom {
            return Err(invalid(
                "tiling",
                "min_zoom",
                &config.tiling.min_zoom.to_string(),
                "must not exceed max_zoom",
            ));
        }
    }

    // [generation] section
    if let Some(section) = ini.section(Some("generation")) {
        if let Some(v) = parse_key::<usize>(
            section,
            "generation",
            "threads",
            "must be a non-negative integer (0 = all cores)",
        )? {
            config.generation.threads = v;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Parse `key` from `section`, treating an empty value as absent.
fn parse_key<T: FromStr>(
    props: &Properties,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<Option<T>, ConfigFileError> {
    let Some(raw) = props.get(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| invalid(section, key, raw, reason))
}

fn check_zoom(key: &str, zoom: u8) -> Result<u8, ConfigFileError> {
    if zoom > MAX_ZOOM {
        return Err(invalid(
            "tiling",
            key,
            &zoom.to_string(),
            "must be an integer from 0 to 24",
        ));
    }
    Ok(zoom)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
