extern crate ndarray;
extern crate owlqn;

use ndarray::prelude::*;
use owlqn::vector::OWLQNBuilder;
use owlqn::{FnDiffFunction, GradientMinimizer, RelativeMeanImprovementBuilder};

/// Recovers a sparse coefficient vector from noisy linear measurements with
/// L1-regularized least squares (the lasso).
fn main() {
    let (rows, cols) = (60, 20);
    let design = Array2::from_shape_fn((rows, cols), |(i, j)| {
        ((i * cols + j) as f64 * 0.7318).sin() + 0.5 * ((i + 3 * j) as f64 * 1.91).cos()
    });
    let mut truth = Array1::zeros(cols);
    truth[2] = 1.5;
    truth[7] = -2.0;
    truth[15] = 0.75;
    let noise = Array1::from_shape_fn(rows, |i| 0.05 * (i as f64 * 2.3).sin());
    let target = design.dot(&truth) + noise;

    let loss = |x: ArrayView1<f64>| {
        let residual = design.dot(&x) - &target;
        0.5 * residual.dot(&residual)
    };
    let grad = |x: ArrayView1<f64>| design.t().dot(&(design.dot(&x) - &target));
    let func = FnDiffFunction::new(loss, grad);

    for &l1reg in &[0.0, 1.0, 10.0] {
        let minimizer = OWLQNBuilder::default().l1reg(l1reg).build().unwrap();
        let mut criterion = RelativeMeanImprovementBuilder::default()
            .tolerance(1e-9)
            .build()
            .unwrap();
        let xmin = minimizer
            .minimize(&func, Array1::zeros(cols).view(), &mut criterion)
            .unwrap();
        let nonzero = xmin.iter().filter(|&&xi| xi != 0.0).count();
        println!("l1reg = {}: {} non-zero coefficients", l1reg, nonzero);
        println!("{:.3}", xmin);
    }
}
