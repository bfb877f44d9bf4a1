//! Error type for the analysis engines.

use thiserror::Error;

/// Failures surfaced by the solvers and engines. None are retried
/// internally; each aborts the current analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Gaussian elimination found no usable pivot.
    #[error("matrix is singular: no pivot above threshold in column {column}")]
    SingularMatrix { column: usize },

    /// Matrix and right-hand side sizes disagree.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An analysis request failed validation.
    #[error("bad input: {0}")]
    BadInput(String),

    /// An element value the analysis cannot work with.
    #[error("element {name}: bad value {value} ({reason})")]
    BadElementValue {
        name: String,
        value: f64,
        reason: &'static str,
    },

    /// Complex division by a near-zero quantity during assembly.
    #[error("arithmetic degenerate: complex divisor magnitude below threshold")]
    ArithmeticDegenerate,

    /// The Newton loop spent its iteration budget without settling.
    #[error("newton iteration did not converge at t = {time:.6e} s ({iterations} iterations)")]
    NewtonNonConvergence { time: f64, iterations: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
