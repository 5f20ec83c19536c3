//! Consumers of per-iteration results.

use crate::feedback::IterationResult;

pub trait Sink {
    fn emit(&mut self, result: &IterationResult);
}

impl<F> Sink for F
where
    F: FnMut(&IterationResult),
{
    fn emit(&mut self, result: &IterationResult) {
        self(result)
    }
}

/// Discards everything, for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn emit(&mut self, _result: &IterationResult) {}
}

/// Keeps every result it is given.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub results: Vec<IterationResult>,
}

impl Sink for RecordingSink {
    fn emit(&mut self, result: &IterationResult) {
        self.results.push(result.clone());
    }
}
