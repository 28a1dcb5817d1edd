//! Limited-memory quasi-Newton minimization of smooth objectives over dense vectors.
//!
//! Two minimizers share one engine:
//!
//! - [`vector::LBFGS`] for smooth objectives,
//! - [`vector::OWLQN`] for objectives with an added L1 penalty `l1reg * |x|_1`.
//!
//! Both approximate the inverse hessian from a bounded history of curvature
//! pairs with the two-loop recursion, and pick step lengths with a
//! backtracking (Armijo) line search.
//!
//! # Examples
//!
//! ```
//! # extern crate ndarray;
//! # extern crate owlqn;
//! # use ndarray::prelude::*;
//! use owlqn::{FnDiffFunction, GradientMinimizer, RelativeMeanImprovementBuilder};
//! use owlqn::vector::LBFGSBuilder;
//!
//! let center = arr1(&[1.0, -2.0, 0.5]);
//! let func = FnDiffFunction::new(
//!     |x: ArrayView1<f64>| 0.5 * (&x - &center).mapv(|d| d * d).sum(),
//!     |x: ArrayView1<f64>| &x - &center,
//! );
//! let minimizer = LBFGSBuilder::default().build().unwrap();
//! let mut criterion = RelativeMeanImprovementBuilder::default()
//!     .tolerance(1e-10)
//!     .build()
//!     .unwrap();
//! let xmin = minimizer
//!     .minimize(&func, Array1::zeros(3).view(), &mut criterion)
//!     .unwrap();
//! assert!((xmin[1] + 2.0).abs() < 1e-6);
//! ```

#[macro_use]
extern crate derive_builder;
extern crate float_cmp;
extern crate ndarray;
extern crate thiserror;
extern crate tracing;

mod errors;
mod function;
mod minimizer;
mod observer;
mod termination;
pub mod utils;
pub mod vector;

pub use errors::{Error, Result};
pub use function::{DiffFunction, FnDiffFunction, NumericalGradient};
pub use minimizer::{GradientMinimizer, OptimResult, RunStatus};
pub use observer::{NoopObserver, Observer, RecordingObserver, TracingObserver};
pub use termination::{
    RelativeMeanImprovement, RelativeMeanImprovementBuilder, RelativeMeanImprovementBuilderError,
    TerminationCriterion,
};
