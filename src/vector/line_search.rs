use ndarray::{Array1, ArrayView1};
use tracing::{debug, trace};

use crate::errors::{Error, Result};
use crate::function::DiffFunction;
use crate::utils::{copy, dot};
use crate::vector::quasi_newton::{IterationState, Strategy};

/// Backtracking line search enforcing the Armijo sufficient-decrease condition
///
/// ```text
/// f(next(x, alpha)) <= f(x) + c1 * alpha * d0
/// ```
///
/// where `d0` is the strategy's directional derivative along the search
/// direction and `next` its candidate point generator. Every failed attempt
/// multiplies `alpha` by the backoff factor.
///
/// The first iteration of a run starts from `alpha = 1 / |dir|` and backs off
/// by `first_backoff`, because its direction is an unscaled steepest descent.
/// Later iterations start from `alpha = 1` and back off by `backoff`.
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct LineSearch {
    /// Sufficient decrease constant, in `(0, 1)`.
    #[builder(default = "1e-4")]
    pub c1: f64,

    /// Number of candidate points tried before the last one is accepted regardless.
    #[builder(default = "50")]
    pub max_backtracks: usize,

    #[builder(default = "0.1")]
    pub first_backoff: f64,

    #[builder(default = "0.5")]
    pub backoff: f64,
}

impl Default for LineSearch {
    fn default() -> Self {
        LineSearch {
            c1: 1e-4,
            max_backtracks: 50,
            first_backoff: 0.1,
            backoff: 0.5,
        }
    }
}

fn in_unit_interval(name: &str, value: Option<f64>) -> std::result::Result<(), String> {
    match value {
        Some(v) if !(v > 0.0 && v < 1.0) => Err(format!("{} must lie in (0, 1), got {}", name, v)),
        _ => Ok(()),
    }
}

impl LineSearchBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        in_unit_interval("c1", self.c1)?;
        in_unit_interval("first_backoff", self.first_backoff)?;
        in_unit_interval("backoff", self.backoff)?;
        if self.max_backtracks == Some(0) {
            return Err("max_backtracks must be positive".to_string());
        }
        Ok(())
    }
}

impl LineSearch {
    /// Searches along `dir` from `state`, writes the accepted point into
    /// `next_pos` and returns its cost.
    ///
    /// A zero directional derivative means there is no descent left: the
    /// current point and cost come back unchanged. A positive one is an
    /// [`Error::AscentDirection`].
    pub fn search<S, F>(
        &self,
        strategy: &S,
        func: &F,
        state: &IterationState,
        dir: ArrayView1<f64>,
        is_first: bool,
        next_pos: &mut Array1<f64>,
    ) -> Result<f64>
    where
        S: Strategy,
        F: DiffFunction + ?Sized,
    {
        let pos = state.position.view();
        let grad = state.gradient.view();
        let d0 = strategy.grad_dir_product(pos, grad, dir);
        if d0 == 0.0 {
            copy(next_pos, pos);
            return Ok(state.cost);
        }
        if d0 > 0.0 {
            return Err(Error::AscentDirection { derivative: d0 });
        }

        let (mut alpha, backoff) = if is_first {
            (1.0 / dot(dir, dir).sqrt(), self.first_backoff)
        } else {
            (1.0, self.backoff)
        };

        let mut attempt = 1;
        loop {
            let candidate = strategy.next_point(pos, grad, dir, alpha);
            let cost = strategy.evaluate(func, candidate.view());
            let sufficient = cost <= state.cost + self.c1 * d0 * alpha;
            if sufficient || attempt >= self.max_backtracks {
                if !sufficient {
                    debug!(attempt, alpha, cost, "backtracking exhausted, taking last candidate");
                }
                copy(next_pos, candidate.view());
                return Ok(cost);
            }
            trace!(attempt, alpha, cost, "insufficient decrease");
            attempt += 1;
            alpha *= backoff;
        }
    }
}
