use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type WatermarkResult<T> = Result<T, WatermarkError>;

/// Every way a watermark invocation can fail. None of these are retried.
#[derive(thiserror::Error, Debug)]
pub enum WatermarkError {
    /// File extension missing or not one of the supported codecs.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The codec rejected the file contents.
    #[error("decode error: {0}")]
    Decode(String),

    /// Resampling was asked to read from a buffer with no pixels.
    #[error("null image: {0}")]
    NullImage(String),

    /// Placement offset is negative or past the base image's far edge.
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    /// The codec failed to serialize the composited buffer.
    #[error("encode error: {0}")]
    Encode(String),

    /// Requested dimensions do not fit in memory.
    #[error("image too large: {0}")]
    TooLarge(String),

    /// Invalid job description (missing paths, malformed job file).
    #[error("config error: {0}")]
    Config(String),

    /// File open/create/write failure.
    #[error("io error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WatermarkError {
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn null_image(msg: impl Into<String>) -> Self {
        Self::NullImage(msg.into())
    }

    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::OutOfBounds(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn too_large(msg: impl Into<String>) -> Self {
        Self::TooLarge(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
