use std::num::NonZeroUsize;

use statrs::statistics::Statistics;

use crate::{feedback::IterationResult, ring_buffer::RingBuffer, sink::Sink};

/// Rolling accuracy over the most recent iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub samples: usize,
    pub mean_error: f64,
    pub error_std_dev: f64,
}

/// Prints every iteration to stdout, with a periodic accuracy report.
#[derive(Debug, Clone)]
pub struct TuiSink {
    errors: RingBuffer<f64>,
    /// Sum of everything currently in `errors`.
    error_sum: f64,
    report_every: usize,
    verbose: bool,
}

impl TuiSink {
    /// Average over the last `window` iterations, reporting every `report_every` (0 never).
    pub fn new(window: NonZeroUsize, report_every: usize) -> Self {
        Self {
            errors: RingBuffer::new(window),
            error_sum: 0.0,
            report_every,
            verbose: true,
        }
    }

    /// Only print the periodic reports.
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    pub fn rolling_mean(&self) -> Option<f64> {
        (!self.errors.is_empty()).then(|| self.error_sum / self.errors.len() as f64)
    }

    pub fn report(&self) -> Option<Report> {
        let mean_error = self.rolling_mean()?;

        Some(Report {
            samples: self.errors.len(),
            mean_error,
            error_std_dev: self.errors.iter().population_std_dev(),
        })
    }

    fn record(&mut self, error: f64) {
        self.error_sum += error;
        if let Some(evicted) = self.errors.push_back(error) {
            self.error_sum -= evicted;
        }
    }

    fn print_iteration(&self, result: &IterationResult) {
        println!(
            "#{} source ({:.3}, {:.3}) estimate ({:.3}, {:.3}) error {:.3} (rolling {:.3}) camera {}",
            result.iteration + 1,
            result.true_position.x,
            result.true_position.y,
            result.estimate.x,
            result.estimate.y,
            result.error,
            self.rolling_mean().unwrap_or(result.error),
            result.bearing,
        );

        for (i, (mic, intensity)) in result
            .microphones
            .iter()
            .zip(result.intensities.iter())
            .enumerate()
        {
            println!(
                "    mic {} ({:.1}, {:.1}): {intensity:.2}",
                i + 1,
                mic.x,
                mic.y
            );
        }
    }
}

impl Sink for TuiSink {
    fn emit(&mut self, result: &IterationResult) {
        self.record(result.error);

        if self.verbose {
            self.print_iteration(result);
        }

        if self.report_every > 0 && (result.iteration + 1) % self.report_every == 0 {
            if let Some(report) = self.report() {
                println!(
                    "avg error: {:.3} ± {:.3} (over last {} iterations)",
                    report.mean_error, report.error_std_dev, report.samples
                );
            }
        }
    }
}
