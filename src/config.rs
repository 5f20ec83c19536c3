use std::time::Duration;

use glam::DVec2;

use crate::{
    error::{LocatorError, Result},
    geometry::{Point2D, RoomSize},
};

/// Which position the camera is pointed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BearingTarget {
    /// The position estimated from the microphone intensities.
    #[default]
    Estimate,
    /// The simulated ground truth.
    TruePosition,
}

/// Unvalidated run parameters, as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    pub room_width: f64,
    pub room_height: f64,
    pub source_x: f64,
    pub source_y: f64,
    /// `None` runs until interrupted.
    pub iterations: Option<i64>,
    pub delay_secs: f64,
    pub bearing_target: BearingTarget,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            room_width: 10.0,
            room_height: 10.0,
            source_x: 2.0,
            source_y: 0.0,
            iterations: Some(10),
            delay_secs: 0.5,
            bearing_target: BearingTarget::default(),
        }
    }
}

/// Validated configuration of a feedback loop run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    room: RoomSize,
    source: Point2D,
    iterations: Option<usize>,
    delay: Duration,
    bearing_target: BearingTarget,
}

impl Config {
    /// Headless configuration: no pacing between iterations.
    pub fn headless(room: RoomSize, source: Point2D, iterations: Option<usize>) -> Result<Self> {
        check_source(source)?;

        Ok(Self {
            room,
            source,
            iterations,
            delay: Duration::ZERO,
            bearing_target: BearingTarget::Estimate,
        })
    }

    pub fn with_bearing_target(mut self, bearing_target: BearingTarget) -> Self {
        self.bearing_target = bearing_target;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn room(&self) -> RoomSize {
        self.room
    }

    pub fn source(&self) -> Point2D {
        self.source
    }

    /// `None` runs until interrupted.
    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn bearing_target(&self) -> BearingTarget {
        self.bearing_target
    }
}

fn check_source(source: Point2D) -> Result<()> {
    if !source.is_finite() {
        return Err(LocatorError::parameter(
            "source",
            format!("{source} is not finite"),
        ));
    }
    Ok(())
}

impl TryFrom<Params> for Config {
    type Error = LocatorError;

    fn try_from(params: Params) -> Result<Self> {
        let room = RoomSize::new(params.room_width, params.room_height)?;

        let source = DVec2::new(params.source_x, params.source_y);
        check_source(source)?;

        let iterations = params
            .iterations
            .map(|n| {
                usize::try_from(n).map_err(|_| {
                    LocatorError::parameter("iterations", format!("{n} is negative"))
                })
            })
            .transpose()?;

        if !params.delay_secs.is_finite() || params.delay_secs < 0.0 {
            return Err(LocatorError::parameter(
                "delay",
                format!("{} seconds is not a valid delay", params.delay_secs),
            ));
        }
        let delay = Duration::try_from_secs_f64(params.delay_secs)
            .map_err(|err| LocatorError::parameter("delay", err.to_string()))?;

        Ok(Self {
            room,
            source,
            iterations,
            delay,
            bearing_target: params.bearing_target,
        })
    }
}
