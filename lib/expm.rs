//! Dense matrix exponentials.
//!
//! Two entry points with the same "matrix in, matrix out" contract:
//! [`expm_hermitian`] diagonalizes a Hermitian generator and is used for
//! unitary step propagators; [`expm`] is scaling-and-squaring with a [13/13]
//! Padé approximant and handles general (e.g. Liouvillian) generators.

use ndarray as nd;
use ndarray_linalg::{ Eigh, Inverse, UPLO };
use num_complex::Complex64 as C64;
use crate::{ error::GrapeError, nd_utils::dagger };

/// Compute `exp(scale * H)` for Hermitian `H` via eigendecomposition.
///
/// `H = V Λ V†` gives `exp(scale·H) = V exp(scale·Λ) V†` with a real
/// spectrum, so the result is exactly unitary (up to roundoff) whenever
/// `scale` is imaginary.
pub fn expm_hermitian(H: &nd::Array2<C64>, scale: C64)
    -> Result<nd::Array2<C64>, GrapeError>
{
    let (evals, evects): (nd::Array1<f64>, nd::Array2<C64>)
        = H.eigh(UPLO::Lower)?;
    let exp_evals: nd::Array1<C64> = evals.mapv(|e| (scale * e).exp());
    let vd: nd::Array2<C64>
        = evects.dot(&nd::Array2::from_diag(&exp_evals));
    Ok(vd.dot(&dagger(&evects)))
}

// maximum 1-norm for which the [13/13] approximant alone is accurate to
// double precision (Higham 2005)
const THETA_13: f64 = 5.371920351148152;

const PADE_13: [f64; 14] = [
    64764752532480000.0,
    32382376266240000.0,
    7771770303897600.0,
    1187353796428800.0,
    129060195264000.0,
    10559470521600.0,
    670442572800.0,
    33522128640.0,
    1323241920.0,
    40840800.0,
    960960.0,
    16380.0,
    182.0,
    1.0,
];

fn norm_1(A: &nd::Array2<C64>) -> f64 {
    A.columns().into_iter()
        .map(|col| col.iter().map(|a| a.norm()).sum())
        .fold(0.0_f64, f64::max)
}

/// Compute `exp(A)` for a general square complex matrix by
/// scaling-and-squaring with the [13/13] Padé approximant.
pub fn expm(A: &nd::Array2<C64>) -> Result<nd::Array2<C64>, GrapeError> {
    let n = A.nrows();
    let norm = norm_1(A);
    let s: u32
        = if norm > THETA_13 {
            (norm / THETA_13).log2().ceil() as u32
        } else {
            0
        };
    let a: nd::Array2<C64> = A.mapv(|x| x / 2.0_f64.powi(s as i32));
    let eye: nd::Array2<C64> = nd::Array2::eye(n);

    let a2 = a.dot(&a);
    let a4 = a2.dot(&a2);
    let a6 = a2.dot(&a4);
    let b = &PADE_13;
    let u_inner: nd::Array2<C64>
        = a6.dot(&(&a6 * b[13] + &a4 * b[11] + &a2 * b[9]))
        + &a6 * b[7] + &a4 * b[5] + &a2 * b[3] + &eye * b[1];
    let U: nd::Array2<C64> = a.dot(&u_inner);
    let V: nd::Array2<C64>
        = a6.dot(&(&a6 * b[12] + &a4 * b[10] + &a2 * b[8]))
        + &a6 * b[6] + &a4 * b[4] + &a2 * b[2] + &eye * b[0];

    // r = (V - U)^-1 (V + U), then undo the scaling by repeated squaring
    let mut r: nd::Array2<C64> = (&V - &U).inv()?.dot(&(&V + &U));
    for _ in 0..s {
        r = r.dot(&r);
    }
    Ok(r)
}
