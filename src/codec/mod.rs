//! Extension-keyed decode/encode boundary around the `image` crate.
//!
//! Everything crossing this boundary is a [`PixelBuffer`]; codec-specific color types
//! never leak out.

use std::io::Cursor;
use std::path::Path;

use image::{ExtendedColorType, ImageEncoder};

use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{WatermarkError, WatermarkResult};

/// JPEG quality used when the caller does not pick one.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Resolve a format from the extension of `path` (`.jpg`, `.jpeg`, `.png`, `.gif`).
    pub fn from_path(path: &Path) -> WatermarkResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg" | "jpeg") => Ok(Self::Jpeg),
            Some("png") => Ok(Self::Png),
            Some("gif") => Ok(Self::Gif),
            _ => Err(WatermarkError::unsupported_format(format!(
                "{} has to be of type png, jpeg or gif",
                path.display()
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Gif => image::ImageFormat::Gif,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// 1..=100, only consulted for JPEG.
    pub jpeg_quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Decode `bytes` as `format` into straight RGBA8.
pub fn decode(bytes: &[u8], format: ImageFormat) -> WatermarkResult<PixelBuffer> {
    let dyn_img = image::load_from_memory_with_format(bytes, format.image_format())
        .map_err(|e| WatermarkError::decode(format!("{}: {e}", format.label())))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_raw(width, height, rgba.into_raw())
}

/// Encode `buf` as `format` into an in-memory byte vector.
pub fn encode(
    buf: &PixelBuffer,
    format: ImageFormat,
    opts: EncodeOptions,
) -> WatermarkResult<Vec<u8>> {
    let (width, height) = (buf.width(), buf.height());
    let mut out = Vec::new();
    let res = match format {
        ImageFormat::Png => image::codecs::png::PngEncoder::new(Cursor::new(&mut out))
            .write_image(buf.as_raw(), width, height, ExtendedColorType::Rgba8),
        ImageFormat::Jpeg => {
            let rgb = strip_alpha(buf.as_raw());
            let quality = opts.jpeg_quality.clamp(1, 100);
            image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut out), quality)
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        }
        ImageFormat::Gif => {
            let mut enc = image::codecs::gif::GifEncoder::new(Cursor::new(&mut out));
            enc.encode(buf.as_raw(), width, height, ExtendedColorType::Rgba8)
        }
    };
    res.map_err(|e| WatermarkError::encode(format!("{}: {e}", format.label())))?;
    Ok(out)
}

fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

/// Read and decode the image at `path`, picking the codec from its extension.
pub fn read_image(path: &Path) -> WatermarkResult<PixelBuffer> {
    let format = ImageFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|e| WatermarkError::io(path, e))?;
    decode(&bytes, format).map_err(|e| match e {
        WatermarkError::Decode(msg) => {
            WatermarkError::decode(format!("{}: {msg}", path.display()))
        }
        other => other,
    })
}

/// Encode `buf` fully in memory, then write it to `path`.
///
/// Nothing touches the filesystem until encoding succeeded, so a failure leaves no file
/// behind. Missing parent directories are created.
pub fn write_image(path: &Path, buf: &PixelBuffer, opts: EncodeOptions) -> WatermarkResult<()> {
    let format = ImageFormat::from_path(path)?;
    let bytes = encode(buf, format, opts)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| WatermarkError::io(parent, e))?;
    }
    std::fs::write(path, bytes).map_err(|e| WatermarkError::io(path, e))
}
