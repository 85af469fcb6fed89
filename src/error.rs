//! Error types for feature location

use thiserror::Error;

/// Result type for locator operations
pub type Result<T> = std::result::Result<T, LocatorError>;

/// Errors raised by the filter, the pipeline and its collaborators.
///
/// Rejecting a match for lack of evidence is not an error: the pipeline
/// returns `Ok(None)` for that case.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Ratio threshold outside (0, 1]
    #[error("ratio threshold must be in (0, 1], got {0}")]
    InvalidRatio(f32),

    /// A correspondence carried a negative or NaN distance
    #[error("correspondence {index} has an invalid distance: {distance}")]
    InvalidDistance { index: usize, distance: f32 },

    /// Matcher output referenced a keypoint that does not exist
    #[error("keypoint index {index} out of range for {len} keypoints")]
    NeighborOutOfRange { index: usize, len: usize },

    /// Image decoding or encoding failed
    #[cfg(feature = "vision")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// A request payload could not be decoded
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The feature detector failed
    #[error("feature detection failed: {0}")]
    Detector(String),

    /// The descriptor matcher failed
    #[error("descriptor matching failed: {0}")]
    Matcher(String),

    /// The artifact store failed
    #[error("artifact storage failed: {0}")]
    Storage(String),
}

impl From<toml::de::Error> for LocatorError {
    fn from(e: toml::de::Error) -> Self {
        LocatorError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for LocatorError {
    fn from(e: serde_json::Error) -> Self {
        LocatorError::InvalidRequest(e.to_string())
    }
}
