/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that abort a minimization run.
///
/// Convergence signals (zero directional derivative, degenerate curvature,
/// an exhausted line search) are not errors; they end the run normally and
/// show up in [`RunStatus`](crate::RunStatus).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The search direction handed to the line search points uphill.
    #[error("line search entered with an ascent direction (directional derivative {derivative})")]
    AscentDirection { derivative: f64 },

    /// The objective returned a vector whose length differs from the parameters.
    #[error("dimension mismatch: expected a vector of length {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
}
