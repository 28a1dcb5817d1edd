extern crate ndarray;
extern crate owlqn;

use ndarray::prelude::*;
use owlqn::vector::LBFGSBuilder;
use owlqn::{FnDiffFunction, GradientMinimizer, RecordingObserver, RelativeMeanImprovementBuilder};

/// Fits a ridge-regularized logistic regression on a small synthetic data set.
fn main() {
    let n = 200;
    // columns: bias, feature
    let features = Array2::from_shape_fn((n, 2), |(i, j)| {
        if j == 0 {
            1.0
        } else {
            -3.0 + 6.0 * i as f64 / (n - 1) as f64
        }
    });
    // noisy labels in {-1, 1} so the classes overlap
    let labels = Array1::from_shape_fn(n, |i| {
        if features[[i, 1]] + 0.8 * (7.0 * i as f64).sin() > 0.5 {
            1.0
        } else {
            -1.0
        }
    });
    let ridge = 1e-2;

    let loss = |w: ArrayView1<f64>| {
        let margins = &labels * &features.dot(&w);
        margins.mapv(|m| (-m).exp().ln_1p()).sum() + 0.5 * ridge * w.dot(&w)
    };
    let grad = |w: ArrayView1<f64>| {
        let margins = &labels * &features.dot(&w);
        let weights = -&labels * &margins.mapv(|m| 1.0 / (1.0 + m.exp()));
        features.t().dot(&weights) + ridge * &w
    };
    let func = FnDiffFunction::new(loss, grad);

    let minimizer = LBFGSBuilder::default().history_size(5).build().unwrap();
    let mut criterion = RelativeMeanImprovementBuilder::default()
        .tolerance(1e-8)
        .build()
        .unwrap();
    let mut observer = RecordingObserver::default();
    let res = minimizer
        .minimize_observed(&func, Array1::zeros(2).view(), &mut criterion, &mut observer)
        .unwrap();

    println!("{:?} after {} iterations", res.status, res.iterations);
    println!("weights: {}", res.minimum);
    println!("loss: {}", res.minimum_value);
    println!("costs: {:?}", observer.costs);
}
