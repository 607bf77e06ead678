//! Region extraction and bilinear resampling of elevation samples.
//!
//! The two primitives, [`extract_region`] and [`resample_elevation`], work on
//! plain row-major slices. [`TileWindow`] and [`render_tile`] combine them to
//! turn a tile footprint into a `tile_size × tile_size` elevation buffer.

mod window;

pub use window::{render_tile, PixelWindow, TileWindow};

/// Copies a `w × h` window starting at `(x, y)` out of a row-major buffer.
///
/// No bounds checking is done beyond slice indexing: the caller guarantees
/// `x + w <= source_width` and that `y + h` rows exist.
pub fn extract_region(
    source: &[f32],
    source_width: u32,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
) -> Vec<f32> {
    let sw = source_width as usize;
    let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);

    let mut out = Vec::with_capacity(w * h);
    for row in y..y + h {
        let start = row * sw + x;
        out.extend_from_slice(&source[start..start + w]);
    }
    out
}

/// Bilinear resampling of a `sw × sh` buffer to `tw × th`.
///
/// Target pixel `(tx, ty)` reads source position `(tx*sw/tw, ty*sh/th)`; the
/// four neighbours are clamped to the last row/column at the high edge. An
/// identity resize returns a plain copy.
pub fn resample_elevation(source: &[f32], sw: u32, sh: u32, tw: u32, th: u32) -> Vec<f32> {
    if sw == tw && sh == th {
        return source.to_vec();
    }

    let (sw_us, tw_us) = (sw as usize, tw as usize);
    let max_x = sw as usize - 1;
    let max_y = sh as usize - 1;
    let x_ratio = sw as f64 / tw as f64;
    let y_ratio = sh as f64 / th as f64;

    let mut out = vec![0.0_f32; tw_us * th as usize];

    for ty in 0..th as usize {
        let sy = ty as f64 * y_ratio;
        let y0 = (sy.floor() as usize).min(max_y);
        let y1 = (y0 + 1).min(max_y);
        let y_frac = sy - sy.floor();

        for tx in 0..tw_us {
            let sx = tx as f64 * x_ratio;
            let x0 = (sx.floor() as usize).min(max_x);
            let x1 = (x0 + 1).min(max_x);
            let x_frac = sx - sx.floor();

            let v00 = source[y0 * sw_us + x0] as f64;
            let v10 = source[y0 * sw_us + x1] as f64;
            let v01 = source[y1 * sw_us + x0] as f64;
            let v11 = source[y1 * sw_us + x1] as f64;

            let top = lerp(v00, v10, x_frac);
            let bottom = lerp(v01, v11, x_frac);
            out[ty * tw_us + tx] = lerp(top, bottom, y_frac) as f32;
        }
    }

    out
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
