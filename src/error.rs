//! Error types shared by the locator pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocatorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocatorError {
    /// Intensity vector and microphone array disagree in length.
    #[error("invalid geometry: expected {expected} intensities, got {actual}")]
    InvalidGeometry { expected: usize, actual: usize },

    /// A layout without microphones, so there is no length to compare against.
    #[error("invalid geometry: microphone array is empty")]
    EmptyArray,

    /// Rejected at configuration time, before any iteration runs.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid reading at microphone {index}: {value}")]
    InvalidReading { index: usize, value: f64 },

    #[error("intensities sum to zero")]
    DegenerateIntensities,
}

impl LocatorError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
