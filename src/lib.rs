//! Locate a sound source in a rectangular room from the intensities picked up by four
//! corner microphones, and point a camera at it.

pub mod computer;
pub mod config;
pub mod direction;
pub mod error;
pub mod feedback;
pub mod geometry;
pub mod io;
pub mod motion;
pub mod ring_buffer;
pub mod simulator;
pub mod sink;
pub mod tui;

pub use error::{LocatorError, Result};
pub use geometry::Point2D;
