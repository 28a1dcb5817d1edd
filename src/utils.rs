//! Dense vector arithmetic used by the quasi-Newton engine, plus small helpers
//! around objective functions.
use std::cell::Cell;

use ndarray::prelude::*;

use crate::function::DiffFunction;

/// Inner product of two vectors of equal length.
#[inline]
pub fn dot(x: ArrayView1<f64>, y: ArrayView1<f64>) -> f64 {
    debug_assert_eq!(x.len(), y.len(), "dot: length mismatch");
    x.dot(&y)
}

/// `y *= a`, in place.
#[inline]
pub fn scale(y: &mut Array1<f64>, a: f64) {
    *y *= a;
}

/// `y += a * x`, in place.
#[inline]
pub fn axpy(y: &mut Array1<f64>, x: ArrayView1<f64>, a: f64) {
    debug_assert_eq!(x.len(), y.len(), "axpy: length mismatch");
    y.scaled_add(a, &x);
}

/// Overwrites every element of `dst` with `src`.
#[inline]
pub fn copy(dst: &mut Array1<f64>, src: ArrayView1<f64>) {
    debug_assert_eq!(dst.len(), src.len(), "copy: length mismatch");
    dst.assign(&src);
}

/// Wraps an objective and counts how often its value and gradient are requested.
pub struct CountingFunction<'a, F: DiffFunction + ?Sized> {
    func: &'a F,
    f_evals: Cell<usize>,
    g_evals: Cell<usize>,
}

impl<'a, F: DiffFunction + ?Sized> CountingFunction<'a, F> {
    pub fn new(func: &'a F) -> Self {
        CountingFunction {
            func,
            f_evals: Cell::new(0),
            g_evals: Cell::new(0),
        }
    }

    pub fn f_evals(&self) -> usize {
        self.f_evals.get()
    }

    pub fn g_evals(&self) -> usize {
        self.g_evals.get()
    }
}

impl<'a, F: DiffFunction + ?Sized> DiffFunction for CountingFunction<'a, F> {
    fn value(&self, x: ArrayView1<f64>) -> f64 {
        self.f_evals.set(self.f_evals.get() + 1);
        self.func.value(x)
    }

    fn gradient(&self, x: ArrayView1<f64>) -> Array1<f64> {
        self.g_evals.set(self.g_evals.get() + 1);
        self.func.gradient(x)
    }
}

/// Forward-difference gradient of `func` at `xk`, stepping `epsilon` along each axis.
pub fn approx_gradient<F>(xk: ArrayView1<f64>, func: F, epsilon: f64) -> Array1<f64>
where
    F: Fn(ArrayView1<f64>) -> f64,
{
    let f0 = func(xk);
    let n = xk.len();
    let mut grad = Array1::<f64>::zeros(n);
    let mut xd = xk.to_owned();
    for k in 0..n {
        xd[k] += epsilon;
        grad[k] = (func(xd.view()) - f0) / epsilon;
        xd[k] = xk[k];
    }
    grad
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::function::FnDiffFunction;
    use float_cmp::approx_eq;

    #[test]
    fn vector_ops() {
        let x = arr1(&[1.0, 2.0, 3.0]);
        let mut y = arr1(&[4.0, -5.0, 6.0]);
        assert!(approx_eq!(f64, dot(x.view(), y.view()), 12.0, ulps = 2));

        axpy(&mut y, x.view(), 2.0);
        assert_eq!(y, arr1(&[6.0, -1.0, 12.0]));

        scale(&mut y, -0.5);
        assert_eq!(y, arr1(&[-3.0, 0.5, -6.0]));

        copy(&mut y, x.view());
        assert_eq!(y, x);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn dot_rejects_mismatched_lengths() {
        let x = arr1(&[1.0, 2.0]);
        let y = arr1(&[1.0, 2.0, 3.0]);
        dot(x.view(), y.view());
    }

    #[test]
    fn gradient() {
        let function = |x: ArrayView1<f64>| 1.0 * x[0].powi(2) + 200. * x[1].powi(2);
        let x = arr1(&[1.0, 1.0]);
        let res = approx_gradient(x.view(), function, 1e-7);

        println!("Res: {}", res);
        assert!(approx_eq!(f64, res[0], 2.0, epsilon = 1e-4));
        assert!(approx_eq!(f64, res[1], 400.0, epsilon = 1e-3));
    }

    #[test]
    fn counting() {
        let func = FnDiffFunction::new(|x: ArrayView1<f64>| x.sum(), |x: ArrayView1<f64>| {
            Array1::ones(x.len())
        });
        let counted = CountingFunction::new(&func);
        let x = arr1(&[1.0, 2.0]);
        counted.value(x.view());
        counted.value(x.view());
        counted.gradient(x.view());
        assert_eq!(counted.f_evals(), 2);
        assert_eq!(counted.g_evals(), 1);
    }
}
