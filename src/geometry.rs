use glam::DVec2;

use crate::error::{LocatorError, Result};

pub type Point2D = DVec2;

/// The camera sits in the middle of the room.
pub const CAMERA_POSITION: Point2D = DVec2::ZERO;

/// Euclidean distance that doesn't overflow for far-away (but finite) points.
pub fn distance(a: Point2D, b: Point2D) -> f64 {
    let offset = a - b;
    offset.x.hypot(offset.y)
}

/// Room dimensions, centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomSize {
    width: f64,
    height: f64,
}

impl RoomSize {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;

        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn half_extents(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Whether the point lies within the room walls (inclusive).
    pub fn contains(&self, point: Point2D) -> bool {
        let half = self.half_extents();
        point.x.abs() <= half.x && point.y.abs() <= half.y
    }

    pub fn clamp(&self, point: Point2D) -> Point2D {
        let half = self.half_extents();
        point.clamp(-half, half)
    }
}

fn check_dimension(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(LocatorError::parameter(name, format!("{value} is not finite")));
    }
    if value <= 0.0 {
        return Err(LocatorError::parameter(name, format!("{value} is not positive")));
    }
    Ok(())
}

/// Fixed microphone layout for a run. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct MicrophoneArray {
    positions: Vec<Point2D>,
}

impl MicrophoneArray {
    pub fn new(positions: Vec<Point2D>) -> Result<Self> {
        if positions.is_empty() {
            return Err(LocatorError::EmptyArray);
        }

        Ok(Self { positions })
    }

    /// Four microphones in the room corners: front-left, front-right, back-left, back-right.
    pub fn corners(room: &RoomSize) -> Self {
        let DVec2 { x, y } = room.half_extents();

        Self {
            positions: vec![
                DVec2::new(-x, y),
                DVec2::new(x, y),
                DVec2::new(-x, -y),
                DVec2::new(x, -y),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point2D] {
        &self.positions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point2D> {
        self.positions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_follow_room_size() {
        let room = RoomSize::new(10.0, 6.0).unwrap();
        let mics = MicrophoneArray::corners(&room);

        assert_eq!(
            mics.positions(),
            &[
                DVec2::new(-5.0, 3.0),
                DVec2::new(5.0, 3.0),
                DVec2::new(-5.0, -3.0),
                DVec2::new(5.0, -3.0),
            ]
        );
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(matches!(
            RoomSize::new(0.0, 5.0),
            Err(LocatorError::InvalidParameter { name: "width", .. })
        ));
        assert!(matches!(
            RoomSize::new(5.0, -1.0),
            Err(LocatorError::InvalidParameter { name: "height", .. })
        ));
        assert!(RoomSize::new(f64::NAN, 5.0).is_err());
    }

    #[test]
    fn empty_array_is_rejected() {
        assert_eq!(MicrophoneArray::new(vec![]), Err(LocatorError::EmptyArray));
    }

    #[test]
    fn distance_survives_huge_coordinates() {
        assert!((distance(DVec2::new(3.0, 0.0), DVec2::new(0.0, 4.0)) - 5.0).abs() < 1e-12);

        let far = distance(DVec2::new(1e160, 0.0), DVec2::new(-5.0, 5.0));
        assert!(far.is_finite());
        assert!((far / 1e160 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn contains_and_clamp() {
        let room = RoomSize::new(4.0, 2.0).unwrap();

        assert!(room.contains(DVec2::new(2.0, -1.0)));
        assert!(!room.contains(DVec2::new(2.5, 0.0)));
        assert_eq!(room.clamp(DVec2::new(7.0, -3.0)), DVec2::new(2.0, -1.0));
    }
}
