use glam::DVec2;

use crate::{
    error::{LocatorError, Result},
    geometry::{MicrophoneArray, Point2D},
    simulator::IntensityVector,
};

/// Intensity-weighted centroid of the microphone positions.
///
/// This is a biased estimator. The result always lies within the convex hull of the
/// microphones, so it only matches the true source in symmetric cases such as a source in
/// the middle of a symmetric array.
pub fn weighted_centroid(intensities: &[f64], microphones: &[Point2D]) -> Result<Point2D> {
    if intensities.len() != microphones.len() {
        return Err(LocatorError::InvalidGeometry {
            expected: microphones.len(),
            actual: intensities.len(),
        });
    }

    let total: f64 = intensities.iter().sum();
    if total == 0.0 {
        return Err(LocatorError::DegenerateIntensities);
    }

    let weighted = intensities
        .iter()
        .zip(microphones)
        .fold(DVec2::ZERO, |acc, (intensity, mic)| acc + *intensity * *mic);

    Ok(weighted / total)
}

/// Estimates the source position from what the microphones heard.
#[derive(Debug, Clone)]
pub struct Computer {
    microphones: MicrophoneArray,
}

impl Computer {
    pub fn new(microphones: MicrophoneArray) -> Self {
        Self { microphones }
    }

    pub fn estimate(&self, intensities: &IntensityVector) -> Result<Point2D> {
        weighted_centroid(intensities.as_slice(), self.microphones.positions())
    }

    pub fn microphones(&self) -> &MicrophoneArray {
        &self.microphones
    }
}
