use crate::{
    error::{LocatorError, Result},
    geometry::{distance, MicrophoneArray, Point2D},
};

/// Keeps the attenuation finite when the source sits right on a microphone.
pub const EPSILON: f64 = 1e-6;

/// Normalized per-microphone intensities. Non-negative and summing to one.
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityVector(Vec<f64>);

impl IntensityVector {
    /// Normalize raw readings, e.g. levels measured elsewhere.
    pub fn from_readings(readings: Vec<f64>) -> Result<Self> {
        if readings.is_empty() {
            return Err(LocatorError::EmptyArray);
        }

        if let Some((index, &value)) = readings
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(LocatorError::InvalidReading { index, value });
        }

        let total: f64 = readings.iter().sum();
        if total <= 0.0 {
            return Err(LocatorError::DegenerateIntensities);
        }

        Ok(Self(readings.into_iter().map(|r| r / total).collect()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }
}

/// Inverse-square attenuation at the given distance, before normalization.
pub fn raw_intensity(distance: f64) -> f64 {
    attenuation(distance, 1.0)
}

/// [`raw_intensity`] with distances measured in multiples of `unit`, i.e. scaled by `unit²`.
fn attenuation(distance: f64, unit: f64) -> f64 {
    let scaled = distance / unit;
    1.0 / (scaled * scaled + EPSILON / (unit * unit))
}

/// Intensities each microphone would pick up from a source at `source`.
///
/// An empty layout gives an empty vector.
pub fn intensities(source: Point2D, microphones: &[Point2D]) -> IntensityVector {
    let distances = microphones
        .iter()
        .map(|mic| distance(source, *mic))
        .collect::<Vec<_>>();

    // Only ratios survive normalization. Measuring in units of the nearest distance keeps the
    // nearest term around one, so squaring far-away distances can't overflow every term to zero.
    let nearest = distances.iter().copied().fold(f64::INFINITY, f64::min);
    let unit = nearest.max(1.0);

    let raw = distances
        .into_iter()
        .map(|distance| attenuation(distance, unit))
        .collect::<Vec<_>>();

    let total: f64 = raw.iter().sum();

    IntensityVector(raw.into_iter().map(|r| r / total).collect())
}

/// Simulates what the microphone array hears from a point source.
#[derive(Debug, Clone)]
pub struct Simulator {
    microphones: MicrophoneArray,
}

impl Simulator {
    pub fn new(microphones: MicrophoneArray) -> Self {
        Self { microphones }
    }

    pub fn listen(&self, source: Point2D) -> IntensityVector {
        intensities(source, self.microphones.positions())
    }

    pub fn microphones(&self) -> &MicrophoneArray {
        &self.microphones
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::geometry::RoomSize;

    const TOLERANCE: f64 = 1e-9;

    fn square_room_simulator() -> Simulator {
        let room = RoomSize::new(10.0, 10.0).unwrap();
        Simulator::new(MicrophoneArray::corners(&room))
    }

    #[test]
    fn intensities_are_normalized_and_non_negative() {
        let simulator = square_room_simulator();

        for source in [
            DVec2::new(2.0, 0.0),
            DVec2::new(-4.9, 3.3),
            DVec2::new(100.0, -250.0),
            DVec2::new(5.0, 5.0),
        ] {
            let intensities = simulator.listen(source);
            let sum: f64 = intensities.iter().sum();

            assert_eq!(intensities.len(), 4);
            assert!((sum - 1.0).abs() < TOLERANCE, "sum {sum} for {source}");
            assert!(intensities.iter().all(|i| *i >= 0.0));
        }
    }

    #[test]
    fn single_microphone_gets_everything() {
        let intensities = intensities(DVec2::new(3.0, 1.0), &[DVec2::new(-1.0, 0.0)]);
        assert_eq!(intensities.as_slice(), &[1.0]);
    }

    #[test]
    fn equidistant_microphones_hear_the_same() {
        let simulator = square_room_simulator();
        // On the y axis: equidistant from left and right microphones.
        let i = simulator.listen(DVec2::new(0.0, 1.7));

        assert!((i.as_slice()[0] - i.as_slice()[1]).abs() < TOLERANCE);
        assert!((i.as_slice()[2] - i.as_slice()[3]).abs() < TOLERANCE);
    }

    #[test]
    fn center_of_square_room_is_uniform() {
        let i = square_room_simulator().listen(DVec2::ZERO);

        for value in i.iter() {
            assert!((value - 0.25).abs() < TOLERANCE);
        }
    }

    #[test]
    fn raw_intensity_decreases_with_distance() {
        let mut previous = raw_intensity(0.0);
        for step in 1..50 {
            let current = raw_intensity(step as f64 * 0.25);
            assert!(current < previous);
            previous = current;
        }
    }

    #[test]
    fn far_away_source_stays_normalized() {
        let simulator = square_room_simulator();

        for source in [
            DVec2::new(1e160, 0.0),
            DVec2::new(-3e200, 7e199),
            DVec2::new(f64::MAX / 4.0, -f64::MAX / 4.0),
        ] {
            let i = simulator.listen(source);
            let sum: f64 = i.iter().sum();

            assert!(i.iter().all(|v| v.is_finite() && *v >= 0.0), "{i:?} for {source}");
            assert!((sum - 1.0).abs() < TOLERANCE, "sum {sum} for {source}");
        }
    }

    #[test]
    fn scaling_keeps_the_ratios() {
        let mics = [DVec2::new(0.0, 0.0), DVec2::new(30.0, 0.0)];
        let source = DVec2::new(10.0, 0.0);

        let expected_near = raw_intensity(10.0) / (raw_intensity(10.0) + raw_intensity(20.0));
        let i = intensities(source, &mics);

        assert!((i.as_slice()[0] - expected_near).abs() < TOLERANCE);
    }

    #[test]
    fn source_on_microphone_stays_finite() {
        let i = square_room_simulator().listen(DVec2::new(-5.0, 5.0));

        assert!(i.iter().all(|v| v.is_finite()));
        assert!(i.as_slice()[0] > 0.99);
    }

    #[test]
    fn readings_are_validated() {
        assert_eq!(
            IntensityVector::from_readings(vec![1.0, -0.5]),
            Err(LocatorError::InvalidReading {
                index: 1,
                value: -0.5
            })
        );
        assert_eq!(
            IntensityVector::from_readings(vec![0.0, 0.0]),
            Err(LocatorError::DegenerateIntensities)
        );
        assert_eq!(
            IntensityVector::from_readings(vec![]),
            Err(LocatorError::EmptyArray)
        );

        let normalized = IntensityVector::from_readings(vec![2.0, 6.0]).unwrap();
        assert_eq!(normalized.as_slice(), &[0.25, 0.75]);
    }
}
