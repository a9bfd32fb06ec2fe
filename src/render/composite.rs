use rayon::prelude::*;

use crate::foundation::core::{CHANNELS, PixelBuffer, Rgba8};
use crate::foundation::error::{WatermarkError, WatermarkResult};

const MAX_ALPHA: u8 = u8::MAX;

/// Blend a straight-alpha `overlay` pixel onto a straight-alpha `base` pixel.
///
/// Color channels are widened to 16 bits, interpolated by the overlay alpha in f64,
/// truncated back to 16 bits and narrowed to 8. The result alpha is the larger of the
/// two input alphas.
pub fn blend_pixel(overlay: Rgba8, base: Rgba8) -> Rgba8 {
    let oa = overlay[3];
    if oa == 0 {
        return base;
    }
    if oa == MAX_ALPHA {
        return overlay;
    }

    let alpha = f64::from(widen(oa)) / f64::from(u16::MAX);
    let mut out = [0u8; 4];
    for i in 0..3 {
        let mixed =
            f64::from(widen(overlay[i])) * alpha + f64::from(widen(base[i])) * (1.0 - alpha);
        out[i] = narrow(mixed as u16);
    }
    out[3] = oa.max(base[3]);
    out
}

fn widen(c: u8) -> u16 {
    u16::from(c) * 257
}

fn narrow(c: u16) -> u8 {
    (c >> 8) as u8
}

/// Blend `overlay` into `base` with its top-left corner at `(x, y)`.
///
/// Only the origin is validated: `0 <= x <= base.width()` and `0 <= y <= base.height()`.
/// Overlay pixels falling past the base's right or bottom edge are skipped. Base pixels
/// outside the overlay footprint are left untouched.
#[tracing::instrument(
    skip(base, overlay),
    fields(base_w = base.width(), base_h = base.height(), ov_w = overlay.width(), ov_h = overlay.height())
)]
pub fn composite(
    base: &mut PixelBuffer,
    overlay: &PixelBuffer,
    x: i64,
    y: i64,
) -> WatermarkResult<()> {
    let (x, y) = validate_origin(base, x, y)?;

    let cols = overlay.width().min(base.width() - x);
    let rows = overlay.height().min(base.height() - y);
    tracing::debug!(cols, rows, "compositing footprint");
    if cols == 0 || rows == 0 {
        return Ok(());
    }

    let stride = base.stride();
    let x0 = x as usize * CHANNELS;
    let x1 = x0 + cols as usize * CHANNELS;
    base.as_raw_mut()
        .par_chunks_exact_mut(stride)
        .skip(y as usize)
        .take(rows as usize)
        .enumerate()
        .for_each(|(v, row)| {
            for (u, dst) in row[x0..x1].chunks_exact_mut(CHANNELS).enumerate() {
                let src = overlay.pixel(u as u32, v as u32);
                let out = blend_pixel(src, [dst[0], dst[1], dst[2], dst[3]]);
                dst.copy_from_slice(&out);
            }
        });

    Ok(())
}

/// Check the placement origin against the base and return it as unsigned coordinates.
pub fn validate_origin(base: &PixelBuffer, x: i64, y: i64) -> WatermarkResult<(u32, u32)> {
    if x < 0 || y < 0 {
        return Err(WatermarkError::out_of_bounds(format!(
            "offset ({x}, {y}) must not be negative"
        )));
    }
    if x > i64::from(base.width()) || y > i64::from(base.height()) {
        return Err(WatermarkError::out_of_bounds(format!(
            "offset ({x}, {y}) lies outside the {}x{} base image",
            base.width(),
            base.height()
        )));
    }
    // Both fit in u32 after the checks above.
    Ok((x as u32, y as u32))
}
