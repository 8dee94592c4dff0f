//! Adapter layer normalizing caller-supplied operators to plain dense
//! complex matrices.
//!
//! Every external description of an operator is converted exactly once, at
//! the API boundary, so the propagator/trajectory/gradient core never sees
//! anything but `ndarray::Array2<Complex64>`.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::error::GrapeError;

/// Conversion of an external operator description into an owned dense
/// complex matrix.
///
/// Real-valued matrices are promoted elementwise; complex matrices are taken
/// as-is.
pub trait IntoOperator {
    fn into_operator(self) -> nd::Array2<C64>;
}

impl IntoOperator for nd::Array2<C64> {
    fn into_operator(self) -> nd::Array2<C64> { self }
}

impl IntoOperator for &nd::Array2<C64> {
    fn into_operator(self) -> nd::Array2<C64> { self.clone() }
}

impl IntoOperator for nd::Array2<f64> {
    fn into_operator(self) -> nd::Array2<C64> { self.mapv(C64::from) }
}

impl IntoOperator for &nd::Array2<f64> {
    fn into_operator(self) -> nd::Array2<C64> { self.mapv(C64::from) }
}

/// Check that `op` is `rows × cols`, naming the operand on failure.
pub(crate) fn check_shape(
    name: &'static str,
    op: &nd::Array2<C64>,
    rows: usize,
    cols: usize,
) -> Result<(), GrapeError>
{
    let (r, c) = op.dim();
    if (r, c) != (rows, cols) {
        return Err(GrapeError::ShapeMismatch {
            name, rows, cols, found_rows: r, found_cols: c,
        });
    }
    Ok(())
}

/// Check that `op` is square with dimension `n`.
pub(crate) fn check_square(
    name: &'static str,
    op: &nd::Array2<C64>,
    n: usize,
) -> Result<(), GrapeError>
{
    check_shape(name, op, n, n)
}
