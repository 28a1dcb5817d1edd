//! Stopping rules fed with the stream of accepted costs.
use std::collections::VecDeque;

/// Decides when a run has stopped making worthwhile progress.
///
/// The minimizer reports the initial cost and then the cost of every accepted
/// iterate, in order.
pub trait TerminationCriterion {
    fn add_cost(&mut self, cost: f64);

    /// Latest improvement measure; `f64::INFINITY` until enough costs were seen.
    fn improvement(&self) -> f64;

    fn is_terminable(&self) -> bool;
}

/// Mean relative improvement over a sliding window of recent costs.
///
/// With `first` and `last` the oldest and newest retained costs and `count`
/// the number retained, the improvement is
/// `|((first - last) / (count - 1)) / divisor|` where `divisor` is `last`, or
/// `first` when `last` is zero. Two zero costs give an improvement of zero.
///
/// The improvement is infinite while `min_history` or fewer costs were seen.
/// At most `max_history + 1` costs take part in one computation, so the mean
/// is taken over the last `max_history` steps.
#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct RelativeMeanImprovement {
    /// Run is terminable once the improvement is at or below this value.
    #[builder(default = "1e-4")]
    pub tolerance: f64,

    #[builder(default = "5")]
    pub min_history: usize,

    #[builder(default = "10")]
    pub max_history: usize,

    #[builder(setter(skip), default = "VecDeque::new()")]
    costs: VecDeque<f64>,

    #[builder(setter(skip), default = "f64::INFINITY")]
    improvement: f64,
}

impl RelativeMeanImprovementBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(tol) = self.tolerance {
            if !(tol >= 0.0) {
                return Err(format!("tolerance must be non-negative, got {}", tol));
            }
        }
        let min = self.min_history.unwrap_or(5);
        let max = self.max_history.unwrap_or(10);
        if max == 0 || min > max {
            return Err(format!(
                "history bounds must satisfy min_history <= max_history and max_history > 0, got {} and {}",
                min, max
            ));
        }
        Ok(())
    }
}

impl RelativeMeanImprovement {
    fn compute_improvement(&mut self) -> f64 {
        let count = self.costs.len();
        if count <= self.min_history {
            return f64::INFINITY;
        }
        let (first, last) = match (self.costs.front(), self.costs.back()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return f64::INFINITY,
        };
        let mean = (first - last) / (count - 1) as f64;
        let improvement = if last != 0.0 {
            (mean / last).abs()
        } else if first != 0.0 {
            (mean / first).abs()
        } else {
            0.0
        };
        if count > self.max_history {
            self.costs.pop_front();
        }
        improvement
    }
}

impl TerminationCriterion for RelativeMeanImprovement {
    fn add_cost(&mut self, cost: f64) {
        self.costs.push_back(cost);
        self.improvement = self.compute_improvement();
    }

    fn improvement(&self) -> f64 {
        self.improvement
    }

    fn is_terminable(&self) -> bool {
        self.improvement <= self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn criterion(tolerance: f64) -> RelativeMeanImprovement {
        RelativeMeanImprovementBuilder::default()
            .tolerance(tolerance)
            .build()
            .unwrap()
    }

    #[test]
    fn infinite_until_enough_history() {
        let mut c = criterion(1e-4);
        for cost in &[100.0, 50.0, 25.0, 12.0, 6.0] {
            c.add_cost(*cost);
            assert_eq!(c.improvement(), f64::INFINITY);
            assert!(!c.is_terminable());
        }
        c.add_cost(6.0);
        // (100 - 6) / 5 / 6
        assert!(approx_eq!(f64, c.improvement(), 94.0 / 30.0, epsilon = 1e-12));
        assert!(!c.is_terminable());
    }

    #[test]
    fn terminable_once_window_is_flat() {
        let mut c = criterion(1e-4);
        let mut costs = vec![100.0, 50.0, 25.0, 12.0, 6.0];
        costs.extend(std::iter::repeat(6.0).take(10));
        for (k, cost) in costs.iter().enumerate() {
            c.add_cost(*cost);
            // sample 15 is the first whose window holds only the flat tail
            assert_eq!(c.is_terminable(), k + 1 >= 15, "sample {}", k + 1);
        }
        assert_eq!(c.improvement(), 0.0);
    }

    #[test]
    fn divides_by_first_when_last_is_zero() {
        let mut c = criterion(0.0);
        for cost in &[8.0, 6.0, 4.0, 2.0, 1.0, 0.0] {
            c.add_cost(*cost);
        }
        // (8 - 0) / 5 / 8
        assert!(approx_eq!(f64, c.improvement(), 0.2, epsilon = 1e-12));

        let mut zeros = criterion(0.0);
        for _ in 0..6 {
            zeros.add_cost(0.0);
        }
        assert_eq!(zeros.improvement(), 0.0);
        assert!(zeros.is_terminable());
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(RelativeMeanImprovementBuilder::default()
            .tolerance(-1.0)
            .build()
            .is_err());
        assert!(RelativeMeanImprovementBuilder::default()
            .min_history(12)
            .build()
            .is_err());
    }
}
