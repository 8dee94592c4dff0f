//! Helpers for dense, complex-valued `ndarray` arrays.
//!
//! All matrices are taken to be in the standard row-major layout; in
//! particular [`vectorize`] stacks *rows*, so superoperators built elsewhere
//! in this crate follow the `vec(A X B) = (A ⊗ Bᵀ) vec(X)` convention.

use ndarray as nd;
use num_complex::Complex64 as C64;

/// Compute the conjugate transpose `A†`.
pub fn dagger<S>(A: &nd::ArrayBase<S, nd::Ix2>) -> nd::Array2<C64>
where S: nd::Data<Elem = C64>
{
    A.t().mapv(|a| a.conj())
}

/// Compute the trace of a square matrix.
pub fn trace<S>(A: &nd::ArrayBase<S, nd::Ix2>) -> C64
where S: nd::Data<Elem = C64>
{
    A.diag().iter().sum()
}

/// Compute the Hilbert-Schmidt inner product `⟨A, B⟩ = Tr(A† B)`,
/// conjugate-linear in `A`.
pub fn inner<SA, SB, D>(
    A: &nd::ArrayBase<SA, D>,
    B: &nd::ArrayBase<SB, D>,
) -> C64
where
    SA: nd::Data<Elem = C64>,
    SB: nd::Data<Elem = C64>,
    D: nd::Dimension,
{
    A.iter().zip(B.iter()).map(|(a, b)| a.conj() * *b).sum()
}

/// Compute the commutator `[A, B] = A B - B A`.
pub fn commutator<SA, SB>(
    A: &nd::ArrayBase<SA, nd::Ix2>,
    B: &nd::ArrayBase<SB, nd::Ix2>,
) -> nd::Array2<C64>
where
    SA: nd::Data<Elem = C64>,
    SB: nd::Data<Elem = C64>,
{
    A.dot(B) - B.dot(A)
}

/// Compute the anti-commutator `{A, B} = A B + B A`.
pub fn anti_commutator<SA, SB>(
    A: &nd::ArrayBase<SA, nd::Ix2>,
    B: &nd::ArrayBase<SB, nd::Ix2>,
) -> nd::Array2<C64>
where
    SA: nd::Data<Elem = C64>,
    SB: nd::Data<Elem = C64>,
{
    A.dot(B) + B.dot(A)
}

/// Flatten an `n × n` matrix into a length-`n²` column by stacking rows.
pub fn vectorize<S>(A: &nd::ArrayBase<S, nd::Ix2>) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    A.iter().copied().collect()
}

/// Inverse of [`vectorize`]: reshape a length-`n²` column into an `n × n`
/// matrix, row by row.
///
/// *Panics* if the length of `v` is not a perfect square.
pub fn unvectorize<S>(v: &nd::ArrayBase<S, nd::Ix1>) -> nd::Array2<C64>
where S: nd::Data<Elem = C64>
{
    let n2 = v.len();
    let n = (n2 as f64).sqrt().round() as usize;
    if n * n != n2 {
        panic!("unvectorize: length {} is not a perfect square", n2);
    }
    v.to_owned().into_shape((n, n))
        .expect("unvectorize: error reshaping array")
}

/// Stack a series of arrays.
pub fn stack_arrays<A, D>(axis: nd::Axis, arrays: &[nd::Array<A, D>])
    -> Result<nd::Array<A, D::Larger>, nd::ShapeError>
where
    A: Clone,
    D: nd::Dimension,
    D::Larger: nd::RemoveAxis,
{
    nd::stack(
        axis,
        &arrays.iter().map(|arr| arr.view()).collect::<Vec<_>>(),
    )
}
