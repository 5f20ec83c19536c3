use std::fmt;

use crate::geometry::{distance, Point2D, CAMERA_POSITION};

/// Where the camera should point: angle in degrees within [-180, 180) and distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bearing {
    pub angle_degrees: f64,
    pub magnitude: f64,
}

impl Bearing {
    /// Bearing from `camera` towards `target`.
    pub fn between(camera: Point2D, target: Point2D) -> Self {
        let offset = target - camera;
        let magnitude = distance(target, camera);

        if magnitude == 0.0 {
            return Self {
                angle_degrees: 0.0,
                magnitude,
            };
        }

        let mut angle_degrees = offset.y.atan2(offset.x).to_degrees();
        if angle_degrees >= 180.0 {
            angle_degrees -= 360.0;
        }

        Self {
            angle_degrees,
            magnitude,
        }
    }

    /// Bearing from the camera in the middle of the room.
    pub fn from_camera(target: Point2D) -> Self {
        Self::between(CAMERA_POSITION, target)
    }

    /// Inverse of [`Bearing::between`], relative to the given camera.
    pub fn target(&self, camera: Point2D) -> Point2D {
        let radians = self.angle_degrees.to_radians();
        camera + self.magnitude * Point2D::new(radians.cos(), radians.sin())
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}° at {:.3}", self.angle_degrees, self.magnitude)
    }
}
