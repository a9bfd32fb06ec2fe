use crate::foundation::error::{WatermarkError, WatermarkResult};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

pub const CHANNELS: usize = 4;

/// Decoded image held as row-major straight RGBA8.
///
/// `data.len() == width * height * 4` holds for every buffer this type hands out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> WatermarkResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn filled(width: u32, height: u32, px: Rgba8) -> WatermarkResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.iter().copied().cycle().take(len).collect(),
        })
    }

    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> WatermarkResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(WatermarkError::decode(format!(
                "rgba8 buffer for {width}x{height} must hold {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Panics on out-of-range coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        match self.get(x, y) {
            Some(px) => px,
            None => panic!(
                "pixel ({x}, {y}) outside {}x{} buffer",
                self.width, self.height
            ),
        }
    }

    pub fn set(&mut self, x: u32, y: u32, px: Rgba8) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let i = self.offset(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&px);
        true
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

/// `width * height * 4`, or an error when that does not fit in a `Vec`.
fn byte_len(width: u32, height: u32) -> WatermarkResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .filter(|&n| n <= isize::MAX as usize)
        .ok_or_else(|| {
            WatermarkError::too_large(format!("{width}x{height} rgba8 buffer overflows memory"))
        })
}

/// Where the overlay goes and the box it must fit in.
///
/// Offsets and bounds are signed. Negative offsets are rejected by the pipeline with
/// [`WatermarkError::OutOfBounds`]; negative bounds act like 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub bound_width: i64,
    pub bound_height: i64,
}

impl Placement {
    pub fn new(x: i64, y: i64, bound_width: i64, bound_height: i64) -> Self {
        Self {
            x,
            y,
            bound_width,
            bound_height,
        }
    }

    /// True when an overlay of this size exceeds the bounding box in either axis.
    pub fn needs_resize(&self, overlay_width: u32, overlay_height: u32) -> bool {
        i64::from(overlay_width) > self.bound_width || i64::from(overlay_height) > self.bound_height
    }

    /// Bounding box as resample target dimensions; negative bounds collapse to 0.
    pub fn resize_target(&self) -> (u32, u32) {
        (clamp_dim(self.bound_width), clamp_dim(self.bound_height))
    }
}

fn clamp_dim(v: i64) -> u32 {
    u32::try_from(v.max(0)).unwrap_or(u32::MAX)
}
