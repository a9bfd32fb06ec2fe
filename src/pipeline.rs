use std::path::{Path, PathBuf};

use crate::codec::{self, EncodeOptions};
use crate::foundation::core::{PixelBuffer, Placement};
use crate::foundation::error::{WatermarkError, WatermarkResult};
use crate::render::{composite, resample};

/// One watermark invocation: inputs, output and placement.
///
/// Deserializable from JSON. Absent paths are empty (and fail [`WatermarkJob::validate`]),
/// absent integers are 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkJob {
    pub main_image: PathBuf,
    pub watermark_image: PathBuf,
    pub out: PathBuf,
    pub x: i64,
    pub y: i64,
    pub bound_height: i64,
    pub bound_width: i64,
}

impl WatermarkJob {
    pub fn from_json_path(path: &Path) -> WatermarkResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| WatermarkError::io(path, e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| WatermarkError::config(format!("parse job '{}': {e}", path.display())))
    }

    pub fn placement(&self) -> Placement {
        Placement::new(self.x, self.y, self.bound_width, self.bound_height)
    }

    /// All three paths must be non-empty.
    pub fn validate(&self) -> WatermarkResult<()> {
        for (name, p) in [
            ("main image", &self.main_image),
            ("watermark image", &self.watermark_image),
            ("output", &self.out),
        ] {
            if p.as_os_str().is_empty() {
                return Err(WatermarkError::config(format!("{name} path is required")));
            }
        }
        Ok(())
    }
}

/// Resize `overlay` into the bounding box if needed, validate the origin and blend it
/// into `base`. Both buffers are consumed; the composited base is returned.
#[tracing::instrument(skip(base, overlay))]
pub fn watermark_buffers(
    mut base: PixelBuffer,
    overlay: PixelBuffer,
    placement: &Placement,
) -> WatermarkResult<PixelBuffer> {
    let overlay = if placement.needs_resize(overlay.width(), overlay.height()) {
        let (w, h) = placement.resize_target();
        tracing::debug!(
            from_w = overlay.width(),
            from_h = overlay.height(),
            to_w = w,
            to_h = h,
            "resizing overlay to bounds"
        );
        resample::resize(&overlay, h, w)?
    } else {
        overlay
    };

    composite::composite(&mut base, &overlay, placement.x, placement.y)?;
    Ok(base)
}

/// Read both images, watermark, and write the result to `job.out`.
///
/// The output file is written only after every earlier stage succeeded.
#[tracing::instrument(skip_all, fields(out = %job.out.display()))]
pub fn apply_watermark(job: &WatermarkJob, opts: EncodeOptions) -> WatermarkResult<()> {
    job.validate()?;

    let base = codec::read_image(&job.main_image)?;
    tracing::debug!(w = base.width(), h = base.height(), "decoded base");

    let overlay = codec::read_image(&job.watermark_image)?;
    tracing::debug!(w = overlay.width(), h = overlay.height(), "decoded overlay");

    let merged = watermark_buffers(base, overlay, &job.placement())?;

    codec::write_image(&job.out, &merged, opts)?;
    tracing::info!(path = %job.out.display(), "wrote watermarked image");
    Ok(())
}
