/// Limited-memory BFGS Quasi-Newton optimizer. Uses the two-loop recursion to
/// calculate the quasi-inverse-hessian, as formulated in
///
/// Jorge Nocedal. Updating Quasi-Newton Matrices With Limited Storage.
/// MATHEMATICS OF  COMPUTATION, VOLUME 35,  NUMBER 151 JULY 1980, PAGES 773-782
///
use ndarray::prelude::*;

use crate::errors::Result;
use crate::function::DiffFunction;
use crate::minimizer::{GradientMinimizer, OptimResult};
use crate::observer::Observer;
use crate::termination::TerminationCriterion;
use crate::utils::{axpy, dot};
use crate::vector::line_search::LineSearch;
use crate::vector::quasi_newton::{IterationState, QuasiNewton, Strategy};

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct LBFGS {
    /// Number of curvature pairs kept for the inverse hessian estimate.
    #[builder(default = "10")]
    pub history_size: usize,

    /// Larger is more precise.
    #[builder(default = "200")]
    pub max_iter: usize,

    #[builder(default)]
    pub line_search: LineSearch,
}

impl LBFGSBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        match self.history_size {
            Some(0) => Err("history_size must be positive".to_string()),
            _ => Ok(()),
        }
    }
}

impl Default for LBFGS {
    fn default() -> Self {
        LBFGS {
            history_size: 10,
            max_iter: 200,
            line_search: LineSearch::default(),
        }
    }
}

impl Strategy for LBFGS {
    fn evaluate<F: DiffFunction + ?Sized>(&self, func: &F, x: ArrayView1<f64>) -> f64 {
        func.value(x)
    }

    fn next_point(
        &self,
        x: ArrayView1<f64>,
        _grad: ArrayView1<f64>,
        dir: ArrayView1<f64>,
        alpha: f64,
    ) -> Array1<f64> {
        let mut next = x.to_owned();
        axpy(&mut next, dir, alpha);
        next
    }

    fn grad_dir_product(&self, _x: ArrayView1<f64>, grad: ArrayView1<f64>, dir: ArrayView1<f64>) -> f64 {
        dot(dir, grad)
    }

    fn update_direction(&self, state: &IterationState, engine: &QuasiNewton) -> Array1<f64> {
        let mut dir = -&state.gradient;
        engine.apply_inverse_hessian(&mut dir);
        dir
    }
}

impl GradientMinimizer for LBFGS {
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
        O: Observer + ?Sized,
    {
        QuasiNewton::new(self.history_size, self.line_search.clone())
            .run(self, self.max_iter, func, x0, criterion, observer)
    }
}
