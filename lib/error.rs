//! Error taxonomy for the optimization pipeline.
//!
//! Everything here is a precondition violation, checked once before any
//! iteration begins; numerical divergence during iteration is deliberately
//! not caught.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrapeError {
    /// Number of rows in the control table differs from the number of control
    /// Hamiltonians.
    #[error(
        "number of control functions ({controls}) must be equal to number of \
        control Hamiltonians ({generators})"
    )]
    ChannelMismatch { controls: usize, generators: usize },

    /// An operator input is not square or does not match the system
    /// dimension.
    #[error("{name} must be a {rows}x{cols} matrix, got {found_rows}x{found_cols}")]
    ShapeMismatch {
        name: &'static str,
        rows: usize,
        cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    /// No control Hamiltonians were supplied.
    #[error("at least one control Hamiltonian is required")]
    EmptyControls,

    /// The control table has zero time steps.
    #[error("control table must have at least one time step")]
    NoTimeSteps,

    /// Non-positive total evolution time.
    #[error("total time must be positive, got {0}")]
    InvalidHorizon(f64),

    /// Unrecognized objective-target string.
    #[error("target function '{0}' not supported")]
    InvalidTarget(String),

    /// Unrecognized update-method string.
    #[error("update method '{0}' not supported")]
    InvalidMethod(String),

    #[error("linear algebra error: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),

    #[error("array reshape error: {0}")]
    Reshape(#[from] ndarray::ShapeError),

    /// The delegated quasi-Newton minimizer failed to run.
    #[error("quasi-Newton minimizer error: {0}")]
    Minimizer(String),
}
