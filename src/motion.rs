//! How the true source moves between iterations.

use glam::DVec2;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    error::{LocatorError, Result},
    geometry::{Point2D, RoomSize},
};

pub trait Displacement {
    /// Position of the source after `iteration` has been emitted.
    fn advance(&mut self, position: Point2D, iteration: usize) -> Point2D;
}

impl<F> Displacement for F
where
    F: FnMut(Point2D, usize) -> Point2D,
{
    fn advance(&mut self, position: Point2D, iteration: usize) -> Point2D {
        self(position, iteration)
    }
}

/// The source never moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stationary;

impl Displacement for Stationary {
    fn advance(&mut self, position: Point2D, _iteration: usize) -> Point2D {
        position
    }
}

/// Moves the source by the same vector every iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantStep(pub DVec2);

impl ConstantStep {
    pub fn new(step: DVec2) -> Result<Self> {
        if !step.is_finite() {
            return Err(LocatorError::parameter("step", format!("{step} is not finite")));
        }
        Ok(Self(step))
    }
}

impl Default for ConstantStep {
    /// One unit along the x axis.
    fn default() -> Self {
        Self(DVec2::X)
    }
}

impl Displacement for ConstantStep {
    fn advance(&mut self, position: Point2D, _iteration: usize) -> Point2D {
        position + self.0
    }
}

/// Jitters the source by up to `max_step` on each axis.
#[derive(Debug, Clone)]
pub struct RandomWalk {
    max_step: f64,
    bounds: Option<RoomSize>,
    rng: StdRng,
}

impl RandomWalk {
    pub fn new(max_step: f64, seed: u64) -> Result<Self> {
        if !max_step.is_finite() || max_step < 0.0 {
            return Err(LocatorError::parameter(
                "max_step",
                format!("{max_step} must be a non-negative number"),
            ));
        }

        Ok(Self {
            max_step,
            bounds: None,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Keep the walk inside the room walls.
    pub fn within(mut self, room: RoomSize) -> Self {
        self.bounds = Some(room);
        self
    }
}

impl Displacement for RandomWalk {
    fn advance(&mut self, position: Point2D, _iteration: usize) -> Point2D {
        let jitter = if self.max_step > 0.0 {
            DVec2::new(
                self.rng.gen_range(-self.max_step..=self.max_step),
                self.rng.gen_range(-self.max_step..=self.max_step),
            )
        } else {
            DVec2::ZERO
        };

        let next = position + jitter;
        match &self.bounds {
            Some(room) => room.clamp(next),
            None => next,
        }
    }
}
