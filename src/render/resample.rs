use rayon::prelude::*;

use crate::foundation::core::{CHANNELS, PixelBuffer};
use crate::foundation::error::{WatermarkError, WatermarkResult};

/// Nearest-neighbor resize of `source` to `target_width x target_height`.
///
/// Both axes scale independently, so aspect ratio is not preserved. Pixels (alpha
/// included) are copied verbatim. A zero-sized target yields an empty buffer of that
/// size without touching `source`; otherwise an empty `source` is a
/// [`WatermarkError::NullImage`].
#[tracing::instrument(skip(source), fields(src_w = source.width(), src_h = source.height()))]
pub fn resize(
    source: &PixelBuffer,
    target_height: u32,
    target_width: u32,
) -> WatermarkResult<PixelBuffer> {
    if target_width == 0 || target_height == 0 {
        return PixelBuffer::new(target_width, target_height);
    }
    if source.is_empty() {
        return Err(WatermarkError::null_image(format!(
            "cannot resample a {}x{} source to {target_width}x{target_height}",
            source.width(),
            source.height()
        )));
    }

    let mut out = PixelBuffer::new(target_width, target_height)?;
    let src_w = source.width();
    let src_h = source.height();
    let x_map: Vec<u32> = (0..target_width)
        .map(|i| nearest_index(i, src_w, target_width))
        .collect();

    let stride = out.stride();
    out.as_raw_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(j, row)| {
            let sy = nearest_index(j as u32, src_h, target_height);
            for (dst, &sx) in row.chunks_exact_mut(CHANNELS).zip(x_map.iter()) {
                dst.copy_from_slice(&source.pixel(sx, sy));
            }
        });

    Ok(out)
}

/// `floor(i * src_len / dst_len)` computed in f64, clamped into the source.
fn nearest_index(i: u32, src_len: u32, dst_len: u32) -> u32 {
    let v = (f64::from(i) * f64::from(src_len) / f64::from(dst_len)).floor() as u32;
    v.min(src_len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> PixelBuffer {
        let mut b = PixelBuffer::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                b.set(x, y, [x as u8, y as u8, (x + y) as u8, 200]);
            }
        }
        b
    }

    #[test]
    fn output_has_target_dimensions() {
        let src = gradient(7, 3);
        for (h, w) in [(1, 1), (3, 7), (10, 2), (2, 10)] {
            let out = resize(&src, h, w).unwrap();
            assert_eq!((out.width(), out.height()), (w, h));
            assert_eq!(out.as_raw().len(), (w * h * 4) as usize);
        }
    }

    #[test]
    fn zero_target_is_empty_not_error() {
        let src = gradient(4, 4);
        let out = resize(&src, 0, 0).unwrap();
        assert!(out.is_empty());
        assert!(out.as_raw().is_empty());

        let out = resize(&src, 3, 0).unwrap();
        assert_eq!((out.width(), out.height()), (0, 3));
    }

    #[test]
    fn empty_source_is_null_image() {
        let src = PixelBuffer::new(0, 0).unwrap();
        let err = resize(&src, 2, 2).unwrap_err();
        assert!(matches!(err, WatermarkError::NullImage(_)));
    }

    #[test]
    fn oversized_target_is_an_error() {
        let src = gradient(2, 2);
        let err = resize(&src, u32::MAX, u32::MAX).unwrap_err();
        assert!(matches!(err, WatermarkError::TooLarge(_)));
    }

    #[test]
    fn halving_picks_even_source_pixels() {
        let src = gradient(10, 10);
        let out = resize(&src, 5, 5).unwrap();
        for j in 0..5 {
            for i in 0..5 {
                assert_eq!(out.pixel(i, j), src.pixel(i * 2, j * 2));
            }
        }
    }

    #[test]
    fn upscale_repeats_pixels() {
        let src = gradient(2, 1);
        let out = resize(&src, 1, 4).unwrap();
        assert_eq!(out.pixel(0, 0), src.pixel(0, 0));
        assert_eq!(out.pixel(1, 0), src.pixel(0, 0));
        assert_eq!(out.pixel(2, 0), src.pixel(1, 0));
        assert_eq!(out.pixel(3, 0), src.pixel(1, 0));
    }

    #[test]
    fn alpha_is_copied_verbatim() {
        let src = PixelBuffer::filled(3, 3, [10, 20, 30, 7]).unwrap();
        let out = resize(&src, 2, 2).unwrap();
        for px in out.as_raw().chunks_exact(4) {
            assert_eq!(px, &[10, 20, 30, 7]);
        }
    }

    #[test]
    fn source_is_not_modified() {
        let src = gradient(3, 3);
        let before = src.clone();
        let _ = resize(&src, 6, 6).unwrap();
        assert_eq!(src, before);
    }

    #[test]
    fn nearest_index_stays_in_range() {
        for dst in 1..40 {
            for i in 0..dst {
                assert!(nearest_index(i, 13, dst) < 13);
            }
        }
    }
}
