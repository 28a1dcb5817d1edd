//! Objectives the minimizers can work with.
use ndarray::prelude::*;

use crate::utils::approx_gradient;

/// A differentiable objective: its value and gradient at a point.
///
/// Both are treated as black boxes and may be expensive. The gradient is
/// returned by value; the engine keeps whatever it needs to outlive the call.
pub trait DiffFunction {
    fn value(&self, x: ArrayView1<f64>) -> f64;
    fn gradient(&self, x: ArrayView1<f64>) -> Array1<f64>;
}

impl<'a, T: DiffFunction + ?Sized> DiffFunction for &'a T {
    fn value(&self, x: ArrayView1<f64>) -> f64 {
        (**self).value(x)
    }

    fn gradient(&self, x: ArrayView1<f64>) -> Array1<f64> {
        (**self).gradient(x)
    }
}

/// Objective assembled from a value closure and a gradient closure.
pub struct FnDiffFunction<F, G> {
    func: F,
    grad: G,
}

impl<F, G> FnDiffFunction<F, G>
where
    F: Fn(ArrayView1<f64>) -> f64,
    G: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    pub fn new(func: F, grad: G) -> Self {
        FnDiffFunction { func, grad }
    }
}

impl<F, G> DiffFunction for FnDiffFunction<F, G>
where
    F: Fn(ArrayView1<f64>) -> f64,
    G: Fn(ArrayView1<f64>) -> Array1<f64>,
{
    fn value(&self, x: ArrayView1<f64>) -> f64 {
        (self.func)(x)
    }

    fn gradient(&self, x: ArrayView1<f64>) -> Array1<f64> {
        (self.grad)(x)
    }
}

/// Objective with only a value closure; gradients come from forward differences.
///
/// Each gradient costs `n + 1` evaluations of the closure, so this is meant for
/// small problems or for checking an analytic gradient.
pub struct NumericalGradient<F> {
    func: F,
    epsilon: f64,
}

impl<F: Fn(ArrayView1<f64>) -> f64> NumericalGradient<F> {
    pub fn new(func: F, epsilon: f64) -> Self {
        NumericalGradient { func, epsilon }
    }
}

impl<F: Fn(ArrayView1<f64>) -> f64> DiffFunction for NumericalGradient<F> {
    fn value(&self, x: ArrayView1<f64>) -> f64 {
        (self.func)(x)
    }

    fn gradient(&self, x: ArrayView1<f64>) -> Array1<f64> {
        approx_gradient(x, &self.func, self.epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn numerical_matches_analytic() {
        let f = |x: ArrayView1<f64>| x[0].powi(2) * x[1] + x[1].exp();
        let analytic = FnDiffFunction::new(f, |x: ArrayView1<f64>| {
            arr1(&[2.0 * x[0] * x[1], x[0].powi(2) + x[1].exp()])
        });
        let numerical = NumericalGradient::new(f, 1e-7);

        let x = arr1(&[0.7, -0.3]);
        assert_eq!(analytic.value(x.view()), numerical.value(x.view()));
        let ga = analytic.gradient(x.view());
        let gn = numerical.gradient(x.view());
        for (a, n) in ga.iter().zip(gn.iter()) {
            assert!(approx_eq!(f64, *a, *n, epsilon = 1e-5));
        }
    }
}
