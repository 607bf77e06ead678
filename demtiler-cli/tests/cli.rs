//! End-to-end tests of the `demtiler` binary.
//!
//! Run with: `cargo test -p demtiler-cli --test cli`

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn demtiler(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_demtiler"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .unwrap()
}

/// Config file that keeps the log inside the temp dir.
fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.ini");
    fs::write(
        &path,
        format!(
            "[tiling]\ntile_size = 32\nmin_zoom = 0\nmax_zoom = 2\n\n[logging]\ndirectory = {}\n",
            dir.join("logs").display()
        ),
    )
    .unwrap();
    path
}

fn write_grid(dir: &Path) -> PathBuf {
    let mut text =
        String::from("ncols 4\nnrows 4\nxllcorner -10\nyllcorner -10\ncellsize 5\n");
    for y in 0..4 {
        let row: Vec<String> = (0..4).map(|x| (x * 10 + y).to_string()).collect();
        text.push_str(&row.join(" "));
        text.push('\n');
    }
    let path = dir.join("dem.asc");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_init_writes_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("conf").join("config.ini");

    let output = demtiler(&config, &["init"]);
    assert!(output.status.success());

    let text = fs::read_to_string(&config).unwrap();
    assert!(text.contains("[tiling]"));
    assert!(text.contains("tile_size = 256"));
}

#[test]
fn test_scheme_prints_levels() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    let output = demtiler(&config, &["scheme", "--bbox", "-10,-10,10,10"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let total = stdout.lines().last().unwrap();
    assert!(total.contains("total"));
    assert!(total.trim_end().ends_with('9'));
}

#[test]
fn test_generate_writes_pyramid() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let grid = write_grid(dir.path());
    let out = dir.path().join("tiles");

    let output = demtiler(
        &config,
        &[
            "generate",
            grid.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--format",
            "raw-float",
            "--quiet",
        ],
    );
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(out.join("layer.json").exists());
    let tile = fs::read(out.join("0/0/0.bin")).unwrap();
    assert_eq!(tile.len(), 32 * 32 * 4);
    assert!(dir.path().join("logs").join("demtiler.log").exists());
}

#[test]
fn test_generate_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    let output = demtiler(
        &config,
        &[
            "generate",
            dir.path().join("missing.asc").to_str().unwrap(),
            "--output",
            dir.path().join("tiles").to_str().unwrap(),
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load raster"));
}

#[test]
fn test_generate_explicit_sidecar_is_used() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let image = dir.path().join("dem.png");
    fs::write(&image, b"not read before the sidecar").unwrap();
    let sidecar = dir.path().join("geo").join("dem-bounds.json");

    let output = demtiler(
        &config,
        &[
            "generate",
            image.to_str().unwrap(),
            "--sidecar",
            sidecar.to_str().unwrap(),
            "--output",
            dir.path().join("tiles").to_str().unwrap(),
            "--quiet",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dem-bounds.json"), "{}", stderr);
}
