//! The limited-memory quasi-Newton engine shared by every minimizer in [`vector`](crate::vector).
//!
//! The engine owns the curvature history and the line search. What makes a
//! minimizer distinct (its objective, its descent direction, how it steps and
//! how it measures slope) comes from a [`Strategy`].
use ndarray::prelude::*;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::function::DiffFunction;
use crate::minimizer::{OptimResult, RunStatus};
use crate::observer::Observer;
use crate::termination::TerminationCriterion;
use crate::utils::{copy, CountingFunction};
use crate::vector::history::History;
use crate::vector::line_search::LineSearch;

/// The current iterate. Position, gradient and cost always refer to the same point.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationState {
    pub position: Array1<f64>,
    pub gradient: Array1<f64>,
    pub cost: f64,
}

/// Variant-specific hooks the engine delegates to.
pub trait Strategy {
    /// Objective actually minimized, including any regularization.
    fn evaluate<F: DiffFunction + ?Sized>(&self, func: &F, x: ArrayView1<f64>) -> f64;

    /// Candidate point `alpha` along `dir` from `x`.
    fn next_point(
        &self,
        x: ArrayView1<f64>,
        grad: ArrayView1<f64>,
        dir: ArrayView1<f64>,
        alpha: f64,
    ) -> Array1<f64>;

    /// Directional derivative of the evaluated objective along `dir`.
    fn grad_dir_product(&self, x: ArrayView1<f64>, grad: ArrayView1<f64>, dir: ArrayView1<f64>)
        -> f64;

    /// Search direction at `state`, transformed by the engine's inverse hessian estimate.
    fn update_direction(&self, state: &IterationState, engine: &QuasiNewton) -> Array1<f64>;
}

#[derive(Debug)]
pub struct QuasiNewton {
    history: History,
    line_search: LineSearch,
    last_position: Array1<f64>,
    last_gradient: Array1<f64>,
}

impl QuasiNewton {
    /// # Panics
    ///
    /// If `history_size` is zero. The minimizer builders reject that size.
    pub fn new(history_size: usize, line_search: LineSearch) -> Self {
        QuasiNewton {
            history: History::new(history_size),
            line_search,
            last_position: Array1::zeros(0),
            last_gradient: Array1::zeros(0),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn apply_inverse_hessian(&self, dir: &mut Array1<f64>) {
        self.history.apply_inverse_hessian(dir)
    }

    /// Forgets all curvature and starts over from `state`.
    pub fn reset(&mut self, state: &IterationState) {
        self.history.clear();
        self.last_position = state.position.clone();
        self.last_gradient = state.gradient.clone();
    }

    /// Records the step to `(next_pos, next_grad)` and makes it the last point.
    ///
    /// Returns `true` if the new pair carries no curvature (`dot(s, y) == 0`).
    pub fn update_state(&mut self, next_pos: ArrayView1<f64>, next_grad: ArrayView1<f64>) -> bool {
        let degenerate = self.history.push_difference(
            next_pos,
            self.last_position.view(),
            next_grad,
            self.last_gradient.view(),
        );
        copy(&mut self.last_position, next_pos);
        copy(&mut self.last_gradient, next_grad);
        degenerate
    }

    /// Minimizes `func` from `x0`, delegating variant semantics to `strategy`.
    ///
    /// The run stops when the line search makes no progress, when `criterion`
    /// is satisfied, when curvature degenerates, or after `max_iter` iterations.
    pub fn run<S, F, C, O>(
        &mut self,
        strategy: &S,
        max_iter: usize,
        func: &F,
        x0: ArrayView1<f64>,
        criterion: &mut C,
        observer: &mut O,
    ) -> Result<OptimResult>
    where
        S: Strategy,
        F: DiffFunction + ?Sized,
        C: TerminationCriterion + ?Sized,
        O: Observer + ?Sized,
    {
        let func = CountingFunction::new(func);
        let dim = x0.len();

        let gradient = checked_gradient(&func, x0)?;
        let mut state = IterationState {
            cost: strategy.evaluate(&func, x0),
            position: x0.to_owned(),
            gradient,
        };
        criterion.add_cost(state.cost);
        observer.observe(0, state.cost, None);
        self.reset(&state);

        let mut status = RunStatus::MaxIterReached;
        let mut iterations = 0;
        let mut next_pos = Array1::zeros(dim);
        for iter in 1..=max_iter {
            let dir = strategy.update_direction(&state, self);
            let cost =
                self.line_search
                    .search(strategy, &func, &state, dir.view(), iter == 1, &mut next_pos)?;
            if cost == state.cost {
                status = RunStatus::NoProgress;
                break;
            }
            iterations = iter;
            criterion.add_cost(cost);
            observer.observe(iter, cost, Some(criterion.improvement()));
            if criterion.is_terminable() {
                std::mem::swap(&mut state.position, &mut next_pos);
                state.cost = cost;
                status = RunStatus::CriterionMet;
                break;
            }

            let gradient = checked_gradient(&func, next_pos.view())?;
            std::mem::swap(&mut state.position, &mut next_pos);
            state.gradient = gradient;
            state.cost = cost;
            if self.update_state(state.position.view(), state.gradient.view()) {
                status = RunStatus::CurvatureDegenerate;
                break;
            }
        }
        debug!(?status, iterations, cost = state.cost, "minimization finished");

        Ok(OptimResult {
            minimum: state.position,
            minimum_value: state.cost,
            iterations,
            f_evals: func.f_evals(),
            g_evals: func.g_evals(),
            status,
        })
    }
}

fn checked_gradient<F: DiffFunction + ?Sized>(func: &F, x: ArrayView1<f64>) -> Result<Array1<f64>> {
    let grad = func.gradient(x);
    if grad.len() != x.len() {
        return Err(Error::DimensionMismatch {
            expected: x.len(),
            found: grad.len(),
        });
    }
    Ok(grad)
}
