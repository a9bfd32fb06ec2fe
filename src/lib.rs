//! Overlay a watermark image onto a primary image.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: both files → [`PixelBuffer`] (straight RGBA8), codec picked by extension
//! 2. **Fit**: if the watermark exceeds the bounding box in either axis, nearest-neighbor
//!    resize it to exactly the box (aspect ratio is not preserved)
//! 3. **Validate**: the placement origin must lie inside the base, far edges inclusive
//! 4. **Composite**: straight-alpha blend into the base, clipped at the base's edges
//! 5. **Encode**: to memory first, then written to the output path
//!
//! Every stage failure aborts the run and no output file is produced.
#![forbid(unsafe_code)]

mod codec;
mod foundation;
mod pipeline;
mod render;

pub use codec::{
    DEFAULT_JPEG_QUALITY, EncodeOptions, ImageFormat, decode, encode, read_image, write_image,
};
pub use foundation::core::{PixelBuffer, Placement, Rgba8};
pub use foundation::error::{WatermarkError, WatermarkResult};
pub use pipeline::{WatermarkJob, apply_watermark, watermark_buffers};
pub use render::composite::{blend_pixel, composite};
pub use render::resample::resize;
