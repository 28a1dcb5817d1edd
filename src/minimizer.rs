//! This module provides the base framework for the minimizers in this crate: the driver-facing
//! trait and the run report.
use ndarray::prelude::*;

use crate::errors::Result;
use crate::function::DiffFunction;
use crate::observer::{Observer, TracingObserver};
use crate::termination::TerminationCriterion;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The line search found no descent: zero directional derivative or an unchanged cost.
    NoProgress,
    /// The termination criterion reported the run as terminable.
    CriterionMet,
    /// The newest curvature pair had `dot(s, y) == 0`.
    CurvatureDegenerate,
    /// The iteration limit was exhausted.
    MaxIterReached,
}

/// A minimization result, storing various details of the run and the final point.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimResult {
    /// The final parameter values.
    pub minimum: Array1<f64>,
    /// The minimized objective at `minimum`, including any regularization term.
    pub minimum_value: f64,
    /// The number of accepted iterations.
    pub iterations: usize,
    /// The number of objective value evaluations.
    pub f_evals: usize,
    /// The number of gradient evaluations.
    pub g_evals: usize,
    pub status: RunStatus,
}

/// A minimizer driven by objective gradients.
pub trait GradientMinimizer {
    /// Minimizes `func` starting from `x0`, reporting progress to `observer`.
    fn minimize_observed<F, C, O>(
        &self,
        func: &F,
        x0: ArrayView1<f64>,
        criterion: &mut C,
        observer: &mut O,
    ) -> Result<OptimResult>
    where
        F: DiffFunction + ?Sized,
        C: TerminationCriterion + ?Sized,
        O: Observer + ?Sized;

    /// Minimizes `func` starting from `x0` and returns the final point.
    /// Progress goes to `tracing` at debug level.
    fn minimize<F, C>(&self, func: &F, x0: ArrayView1<f64>, criterion: &mut C) -> Result<Array1<f64>>
    where
        F: DiffFunction + ?Sized,
        C: TerminationCriterion + ?Sized,
    {
        self.minimize_observed(func, x0, criterion, &mut TracingObserver)
            .map(|res| res.minimum)
    }
}
