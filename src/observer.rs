//! Progress reporting. Observers see every accepted iterate but never steer the run.
use tracing::debug;

/// Receives `(iteration, cost, improvement)` after each accepted iterate.
///
/// Iteration 0 is the starting point, for which no improvement exists yet.
pub trait Observer {
    fn observe(&mut self, iteration: usize, cost: f64, improvement: Option<f64>);
}

/// Emits one `debug` event per iteration through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn observe(&mut self, iteration: usize, cost: f64, improvement: Option<f64>) {
        match improvement {
            Some(improvement) => debug!(iteration, cost, improvement, "iterate accepted"),
            None => debug!(iteration, cost, improvement = "undefined", "starting point"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn observe(&mut self, _iteration: usize, _cost: f64, _improvement: Option<f64>) {}
}

/// Keeps every reported cost, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub costs: Vec<f64>,
    pub improvements: Vec<Option<f64>>,
}

impl Observer for RecordingObserver {
    fn observe(&mut self, iteration: usize, cost: f64, improvement: Option<f64>) {
        debug_assert_eq!(iteration, self.costs.len());
        self.costs.push(cost);
        self.improvements.push(improvement);
    }
}
