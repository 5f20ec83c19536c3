//! The simulate → estimate → point loop.
//!
//! Every iteration synthesizes the microphone intensities for the current true source
//! position, estimates the position back from those intensities, points the camera and
//! hands the result to a [`Sink`]. The source then moves according to a [`Displacement`]
//! policy. Estimates are never carried over between iterations.

use std::thread;

use log::{debug, info, warn};

use crate::{
    computer::Computer,
    config::{BearingTarget, Config},
    direction::Bearing,
    error::Result,
    geometry::{distance, MicrophoneArray, Point2D},
    motion::Displacement,
    simulator::{IntensityVector, Simulator},
    sink::Sink,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    /// Holds the index of the next iteration to run.
    Running(usize),
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub true_position: Point2D,
    pub estimate: Option<Point2D>,
    pub iteration: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterationResult {
    pub iteration: usize,
    pub microphones: MicrophoneArray,
    pub intensities: IntensityVector,
    pub estimate: Point2D,
    pub true_position: Point2D,
    pub bearing: Bearing,
    /// Distance between the estimate and the true position.
    pub error: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub iterations: usize,
    pub final_position: Point2D,
    /// `None` when nothing ran.
    pub mean_error: Option<f64>,
    pub error_std_dev: Option<f64>,
}

/// Running (Welford) statistics, so unbounded runs don't keep every error around.
#[derive(Debug, Clone, Copy, Default)]
struct ErrorStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl ErrorStats {
    fn record(&mut self, error: f64) {
        self.count += 1;
        let delta = error - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (error - self.mean);
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    fn population_std_dev(&self) -> Option<f64> {
        (self.count > 0).then(|| (self.m2 / self.count as f64).sqrt())
    }
}

pub struct FeedbackLoop<D, S> {
    config: Config,
    simulator: Simulator,
    computer: Computer,
    displacement: D,
    sink: S,
    state: SimulationState,
    status: LoopState,
    outside_room: bool,
    stats: ErrorStats,
}

impl<D, S> FeedbackLoop<D, S>
where
    D: Displacement,
    S: Sink,
{
    pub fn new(config: Config, displacement: D, sink: S) -> Self {
        let microphones = MicrophoneArray::corners(&config.room());

        Self {
            state: SimulationState {
                true_position: config.source(),
                estimate: None,
                iteration: 0,
            },
            simulator: Simulator::new(microphones.clone()),
            computer: Computer::new(microphones),
            config,
            displacement,
            sink,
            status: LoopState::Idle,
            outside_room: false,
            stats: ErrorStats::default(),
        }
    }

    pub fn status(&self) -> LoopState {
        self.status
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn microphones(&self) -> &MicrophoneArray {
        self.simulator.microphones()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run a single iteration. Returns `None` once the configured count is reached.
    pub fn step(&mut self) -> Result<Option<IterationResult>> {
        let iteration = match self.status {
            LoopState::Done => return Ok(None),
            LoopState::Idle => {
                info!(
                    "starting locator loop: room {}x{}, source {}, iterations {}",
                    self.config.room().width(),
                    self.config.room().height(),
                    self.state.true_position,
                    self.config
                        .iterations()
                        .map_or_else(|| "unbounded".to_string(), |n| n.to_string()),
                );
                0
            }
            LoopState::Running(iteration) => iteration,
        };

        if self.config.iterations().is_some_and(|n| iteration >= n) {
            self.finish();
            return Ok(None);
        }
        self.status = LoopState::Running(iteration);

        let result = self.compute(iteration)?;
        self.sink.emit(&result);

        self.state.estimate = Some(result.estimate);
        self.state.iteration = iteration + 1;
        self.stats.record(result.error);

        self.state.true_position = self
            .displacement
            .advance(self.state.true_position, iteration);
        self.check_room();

        if self.config.iterations() == Some(iteration + 1) {
            self.finish();
        } else {
            self.status = LoopState::Running(iteration + 1);
            if !self.config.delay().is_zero() {
                thread::sleep(self.config.delay());
            }
        }

        Ok(Some(result))
    }

    /// Run until done. Never returns for an unbounded configuration unless an error occurs.
    pub fn run(&mut self) -> Result<RunSummary> {
        while self.step()?.is_some() {}

        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            iterations: self.state.iteration,
            final_position: self.state.true_position,
            mean_error: self.stats.mean(),
            error_std_dev: self.stats.population_std_dev(),
        }
    }

    fn compute(&self, iteration: usize) -> Result<IterationResult> {
        let true_position = self.state.true_position;

        let intensities = self.simulator.listen(true_position);
        let estimate = self.computer.estimate(&intensities)?;
        let bearing = match self.config.bearing_target() {
            BearingTarget::Estimate => Bearing::from_camera(estimate),
            BearingTarget::TruePosition => Bearing::from_camera(true_position),
        };
        let error = distance(estimate, true_position);

        debug!("iteration {iteration}: source {true_position}, estimate {estimate}, error {error:.3}");

        Ok(IterationResult {
            iteration,
            microphones: self.computer.microphones().clone(),
            intensities,
            estimate,
            true_position,
            bearing,
            error,
        })
    }

    fn check_room(&mut self) {
        let inside = self.config.room().contains(self.state.true_position);
        if !inside && !self.outside_room {
            warn!(
                "source moved outside the room to {}",
                self.state.true_position
            );
        }
        self.outside_room = !inside;
    }

    fn finish(&mut self) {
        self.status = LoopState::Done;
        let summary = self.summary();
        info!(
            "locator loop done after {} iterations, mean error {}",
            summary.iterations,
            summary
                .mean_error
                .map_or_else(|| "n/a".to_string(), |e| format!("{e:.3}")),
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::{
        geometry::RoomSize,
        motion::{ConstantStep, Stationary},
        sink::{NullSink, RecordingSink},
    };

    fn config(iterations: Option<usize>) -> Config {
        Config::headless(
            RoomSize::new(10.0, 10.0).unwrap(),
            DVec2::new(2.0, 0.0),
            iterations,
        )
        .unwrap()
    }

    #[test]
    fn runs_exactly_the_configured_iterations() {
        let mut feedback = FeedbackLoop::new(
            config(Some(5)),
            ConstantStep::default(),
            RecordingSink::default(),
        );

        let summary = feedback.run().unwrap();

        assert_eq!(feedback.status(), LoopState::Done);
        assert_eq!(summary.iterations, 5);
        assert_eq!(summary.final_position, DVec2::new(7.0, 0.0));

        // Further steps neither emit nor move the source.
        assert_eq!(feedback.step().unwrap(), None);
        assert_eq!(feedback.state().true_position, DVec2::new(7.0, 0.0));

        let results = feedback.into_sink().results;
        assert_eq!(results.len(), 5);
        let positions = results.iter().map(|r| r.true_position.x).collect::<Vec<_>>();
        assert_eq!(positions, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(results.iter().enumerate().all(|(k, r)| r.iteration == k));
    }

    #[test]
    fn zero_iterations_emit_nothing() {
        let mut feedback = FeedbackLoop::new(config(Some(0)), Stationary, RecordingSink::default());

        let summary = feedback.run().unwrap();

        assert_eq!(summary.iterations, 0);
        assert_eq!(summary.mean_error, None);
        assert!(feedback.sink().results.is_empty());
        assert_eq!(feedback.status(), LoopState::Done);
    }

    #[test]
    fn unbounded_loop_keeps_going() {
        let mut feedback = FeedbackLoop::new(config(None), Stationary, NullSink);

        for k in 0..100 {
            let result = feedback.step().unwrap().expect("unbounded loop never stops");
            assert_eq!(result.iteration, k);
            assert_eq!(feedback.status(), LoopState::Running(k + 1));
        }
    }

    #[test]
    fn stationary_source_gives_identical_estimates() {
        let mut feedback = FeedbackLoop::new(config(Some(3)), Stationary, RecordingSink::default());
        let summary = feedback.run().unwrap();

        let results = &feedback.sink().results;
        assert!(results.windows(2).all(|w| w[0].estimate == w[1].estimate));
        assert_eq!(summary.error_std_dev.map(|s| s < 1e-12), Some(true));
    }

    #[test]
    fn far_away_source_gives_finite_results() {
        let config = Config::headless(
            RoomSize::new(10.0, 10.0).unwrap(),
            DVec2::new(1e160, 0.0),
            Some(1),
        )
        .unwrap();
        let mut feedback = FeedbackLoop::new(config, Stationary, RecordingSink::default());
        let summary = feedback.run().unwrap();

        let result = &feedback.sink().results[0];
        let sum: f64 = result.intensities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "{:?}", result.intensities);
        assert!(result.estimate.is_finite());
        assert!(result.estimate.x.abs() <= 5.0 && result.estimate.y.abs() <= 5.0);
        assert!(result.bearing.angle_degrees.is_finite());
        assert!(result.bearing.magnitude.is_finite());
        assert!(result.error.is_finite());
        assert!(summary.mean_error.is_some_and(f64::is_finite));
    }

    #[test]
    fn bearing_can_follow_the_true_position() {
        let mut feedback = FeedbackLoop::new(
            config(Some(1)).with_bearing_target(BearingTarget::TruePosition),
            Stationary,
            RecordingSink::default(),
        );
        feedback.run().unwrap();

        let result = &feedback.sink().results[0];
        assert_eq!(result.bearing.magnitude, 2.0);
        assert_eq!(result.bearing.angle_degrees, 0.0);
        assert!(result.bearing.magnitude > result.estimate.length());
    }
}
