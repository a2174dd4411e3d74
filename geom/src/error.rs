//! Error type shared by the geometry crates

use std::path::PathBuf;

/// Result alias used across trama
pub type Result<T> = std::result::Result<T, GeomError>;

/// Errors raised by generators whose inputs cannot be clamped into something sensible
#[derive(Debug, thiserror::Error)]
pub enum GeomError {
    /// Parameter range is empty or inverted
    #[error("invalid {axis} range [{start}, {end}] (start must be < end)")]
    InvalidRange {
        axis: &'static str,
        start: f32,
        end: f32,
    },

    /// Parameter outside the domain a generator can work with
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Height field dimensions do not match the sample buffer
    #[error("height field is {width}x{height} but holds {len} samples")]
    HeightFieldSize { width: u32, height: u32, len: usize },

    /// Filesystem failure while reading or writing geometry
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image decoding failure
    #[error("failed to decode image {path:?}: {reason}")]
    Image { path: PathBuf, reason: String },
}

impl GeomError {
    /// Shorthand for [`GeomError::InvalidParameter`]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
