//! Orthant-Wise Limited-memory Quasi-Newton, as described in
//!
//! Galen Andrew and Jianfeng Gao. Scalable Training of L1-Regularized
//! Log-Linear Models. Proceedings of the 24th International Conference on
//! Machine Learning, 2007, pages 33-40
//!
//! OWL-QN minimizes `f(x) + l1reg * |x|_1` for a smooth `f`. The L1 term is
//! not differentiable where a coordinate is zero, so the method
//!
//! - descends along the pseudo-gradient, the steepest descent direction of
//!   the full objective, which is zero for coordinates sitting at zero whose
//!   gradient lies within `[-l1reg, l1reg]`,
//! - zeroes every coordinate of the quasi-Newton direction whose sign
//!   disagrees with the pseudo-gradient direction,
//! - clamps candidate points to zero wherever a step would move a
//!   coordinate into the opposite orthant.
//!
//! Curvature pairs are built from the gradient of `f` alone, since the L1 term
//! contributes no curvature.
//!
//! # Examples
//!
//! ```
//! # extern crate ndarray;
//! # extern crate owlqn;
//! # use ndarray::prelude::*;
//! # use owlqn::{FnDiffFunction, GradientMinimizer, RelativeMeanImprovementBuilder};
//! # use owlqn::vector::OWLQNBuilder;
//! // 0.5 * |x - c|^2 + |x|_1 is minimized by soft-thresholding c
//! let c = arr1(&[3.0, 0.5, -2.0]);
//! let func = FnDiffFunction::new(
//!     |x: ArrayView1<f64>| 0.5 * (&x - &c).mapv(|d| d * d).sum(),
//!     |x: ArrayView1<f64>| &x - &c,
//! );
//! let minimizer = OWLQNBuilder::default().l1reg(1.0).build().unwrap();
//! let mut criterion = RelativeMeanImprovementBuilder::default()
//!     .tolerance(0.0)
//!     .build()
//!     .unwrap();
//! let x = minimizer
//!     .minimize(&func, Array1::zeros(3).view(), &mut criterion)
//!     .unwrap();
//! assert_eq!(x[1], 0.0);
//! assert!((x[0] - 2.0).abs() < 1e-6);
//! assert!((x[2] + 1.0).abs() < 1e-6);
//! ```
use ndarray::prelude::*;
use ndarray::Zip;

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
pub struct OWLQN {
    /// Weight of the L1 penalty. Zero reduces the method to plain L-BFGS.
    #[builder(default = "0.0")]
    pub l1reg: f64,

    /// Number of curvature pairs kept for the inverse hessian estimate.
    #[builder(default = "10")]
    pub history_size: usize,

    #[builder(default = "200")]
    pub max_iter: usize,

    #[builder(default)]
    pub line_search: LineSearch,
}

impl OWLQNBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(l1reg) = self.l1reg {
            if !(l1reg.is_finite() && l1reg >= 0.0) {
                return Err(format!("l1reg must be finite and non-negative, got {}", l1reg));
            }
        }
        match self.history_size {
            Some(0) => Err("history_size must be positive".to_string()),
            _ => Ok(()),
        }
    }
}

impl Default for OWLQN {
    fn default() -> Self {
        OWLQN {
            l1reg: 0.0,
            history_size: 10,
            max_iter: 200,
            line_search: LineSearch::default(),
        }
    }
}

impl OWLQN {
    /// Negated pseudo-gradient of `f(x) + l1reg * |x|_1`.
    pub fn steepest_descent(&self, x: ArrayView1<f64>, grad: ArrayView1<f64>) -> Array1<f64> {
        let l1 = self.l1reg;
        if l1 == 0.0 {
            return grad.mapv(|g| -g);
        }
        let mut dir = Array1::zeros(x.len());
        Zip::from(&mut dir).and(x).and(grad).for_each(|d, &xi, &gi| {
            *d = if xi < 0.0 {
                -(gi - l1)
            } else if xi > 0.0 {
                -(gi + l1)
            } else if gi < -l1 {
                -(gi + l1)
            } else if gi > l1 {
                -(gi - l1)
            } else {
                0.0
            };
        });
        dir
    }

    /// Zeroes every coordinate of `dir` that does not point the same way as `steepest`.
    pub fn fix_direction_signs(&self, dir: &mut Array1<f64>, steepest: ArrayView1<f64>) {
        if self.l1reg == 0.0 {
            return;
        }
        Zip::from(dir).and(steepest).for_each(|d, &s| {
            if *d * s <= 0.0 {
                *d = 0.0;
            }
        });
    }
}

impl Strategy for OWLQN {
    fn evaluate<F: DiffFunction + ?Sized>(&self, func: &F, x: ArrayView1<f64>) -> f64 {
        func.value(x) + self.l1reg * x.fold(0.0, |acc, xi| acc + xi.abs())
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
        if self.l1reg > 0.0 {
            Zip::from(&mut next).and(x).for_each(|n, &xi| {
                if xi * *n < 0.0 {
                    *n = 0.0;
                }
            });
        }
        next
    }

    fn grad_dir_product(&self, x: ArrayView1<f64>, grad: ArrayView1<f64>, dir: ArrayView1<f64>) -> f64 {
        let l1 = self.l1reg;
        if l1 == 0.0 {
            return dot(grad, dir);
        }
        let mut val = 0.0;
        Zip::from(x).and(grad).and(dir).for_each(|&xi, &gi, &di| {
            val += if xi < 0.0 {
                di * (gi - l1)
            } else if xi > 0.0 {
                di * (gi + l1)
            } else if di < 0.0 {
                di * (gi - l1)
            } else if di > 0.0 {
                di * (gi + l1)
            } else {
                0.0
            };
        });
        val
    }

    fn update_direction(&self, state: &IterationState, engine: &QuasiNewton) -> Array1<f64> {
        let steepest = self.steepest_descent(state.position.view(), state.gradient.view());
        let mut dir = steepest.clone();
        engine.apply_inverse_hessian(&mut dir);
        self.fix_direction_signs(&mut dir, steepest.view());
        dir
    }
}

impl GradientMinimizer for OWLQN {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::FnDiffFunction;
    use crate::observer::NoopObserver;
    use crate::termination::RelativeMeanImprovementBuilder;
    use crate::vector::l_bfgs::LBFGS;

    fn owlqn(l1reg: f64) -> OWLQN {
        OWLQNBuilder::default().l1reg(l1reg).build().unwrap()
    }

    #[test]
    fn pseudo_gradient_cases() {
        let m = owlqn(1.0);
        let x = arr1(&[-2.0, 3.0, 0.0, 0.0, 0.0]);
        let g = arr1(&[0.5, 0.5, -3.0, 2.5, 0.4]);
        let dir = m.steepest_descent(x.view(), g.view());
        assert_eq!(dir, arr1(&[0.5, -1.5, 2.0, -1.5, 0.0]));
    }

    #[test]
    fn no_penalty_is_plain_descent() {
        let m = owlqn(0.0);
        let x = arr1(&[0.0, 1.0, -1.0]);
        let g = arr1(&[0.2, -0.3, 0.0]);
        let d = arr1(&[1.0, 2.0, -1.0]);
        assert_eq!(m.steepest_descent(x.view(), g.view()), arr1(&[-0.2, 0.3, -0.0]));
        assert_eq!(
            m.grad_dir_product(x.view(), g.view(), d.view()),
            LBFGS::default().grad_dir_product(x.view(), g.view(), d.view())
        );
        // no clamping without a penalty
        assert_eq!(m.next_point(x.view(), g.view(), d.view(), 1.0), arr1(&[1.0, 3.0, -2.0]));
    }

    #[test]
    fn direction_signs_follow_pseudo_gradient() {
        let m = owlqn(0.5);
        let steepest = arr1(&[1.0, -1.0, 0.0, 2.0]);
        let mut dir = arr1(&[0.3, 0.4, 5.0, 1.0]);
        m.fix_direction_signs(&mut dir, steepest.view());
        assert_eq!(dir, arr1(&[0.3, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn next_point_lands_on_zero_instead_of_crossing() {
        let m = owlqn(0.1);
        let x = arr1(&[1.0, -1.0, 0.0, 2.0]);
        let dir = arr1(&[-3.0, 0.5, -1.0, -1.0]);
        let next = m.next_point(x.view(), x.view(), dir.view(), 1.0);
        assert_eq!(next, arr1(&[0.0, -0.5, -1.0, 1.0]));
    }

    #[test]
    fn positive_coordinates_use_the_positive_subgradient() {
        // x > 0 takes gradient + l1reg; a duplicated x < 0 test would fall through
        // to the dir sign cases and give -1 * (0.5 - 1.0) = 0.5 here
        let m = owlqn(1.0);
        let x = arr1(&[1.0]);
        let g = arr1(&[0.5]);
        let dir = arr1(&[-1.0]);
        assert_eq!(m.grad_dir_product(x.view(), g.view(), dir.view()), -1.5);
    }

    #[test]
    fn directional_derivative_cases() {
        let m = owlqn(1.0);
        let x = arr1(&[-1.0, 1.0, 0.0, 0.0, 0.0]);
        let g = arr1(&[0.5, 0.5, 2.0, -2.0, 0.3]);
        let d = arr1(&[1.0, 1.0, -1.0, 1.0, 0.0]);
        // -0.5 + 1.5 - 1.0 - 1.0 + 0.0
        assert_eq!(m.grad_dir_product(x.view(), g.view(), d.view()), -1.0);
    }

    #[test]
    fn evaluate_adds_penalty() {
        let m = owlqn(0.5);
        let func = FnDiffFunction::new(|_: ArrayView1<f64>| 1.0, |x: ArrayView1<f64>| {
            Array1::zeros(x.len())
        });
        assert_eq!(m.evaluate(&func, arr1(&[-2.0, 0.0, 4.0]).view()), 4.0);
    }

    #[test]
    fn dead_zone_coordinates_end_exactly_at_zero() {
        let w = arr1(&[1.0, 2.0, 1.0, 3.0, 2.0, 1.0]);
        let c = arr1(&[3.0, 0.2, -4.0, -0.1, 0.3, 2.0]);
        let func = FnDiffFunction::new(
            |x: ArrayView1<f64>| 0.5 * (&w * &(&x - &c).mapv(|d| d * d)).sum(),
            |x: ArrayView1<f64>| &w * &(&x - &c),
        );
        let mut criterion = RelativeMeanImprovementBuilder::default()
            .tolerance(0.0)
            .build()
            .unwrap();
        let res = owlqn(1.0)
            .minimize_observed(&func, Array1::ones(6).view(), &mut criterion, &mut NoopObserver)
            .unwrap();
        let x = res.minimum;
        println!("{:?} after {} iterations", x, res.iterations);
        // |w_i * c_i| <= l1reg
        for &i in &[1, 3, 4] {
            assert_eq!(x[i], 0.0, "coordinate {}", i);
        }
        // c_i - sign(c_i) * l1reg / w_i
        let expected = [(0, 2.0), (2, -3.0), (5, 1.0)];
        for &(i, v) in &expected {
            assert!((x[i] - v).abs() < 1e-5, "coordinate {}: {}", i, x[i]);
        }
    }

    #[test]
    fn rejects_negative_penalty() {
        assert!(OWLQNBuilder::default().l1reg(-0.1).build().is_err());
        assert!(OWLQNBuilder::default().l1reg(f64::NAN).build().is_err());
        assert!(OWLQNBuilder::default().history_size(0).build().is_err());
    }
}
