//! Piecewise-constant step propagators for closed (unitary) and open
//! (Liouvillian) evolution, behind a common strategy trait.
//!
//! Within time step `j` the effective generator is frozen at
//! `H_j = H0 + Σ_k u[k,j]·Hk[k]`. [`UnitaryDynamics`] exponentiates
//! `-iΔt·H_j` directly; [`LiouvilleDynamics`] assembles the vectorized
//! Lindblad generator and exponentiates `Δt·L_j`. Vectorization is
//! row-major throughout (see [`crate::nd_utils::vectorize`]).

use ndarray::{ self as nd, linalg::kron };
use num_complex::Complex64 as C64;
use crate::{
    error::GrapeError,
    expm::{ expm, expm_hermitian },
    nd_utils::{ commutator, dagger, inner },
    operators::{ IntoOperator, check_square },
};

/// Strategy seam between the optimization driver and a concrete evolution
/// model.
///
/// Implementors fix the per-step state representation, how a propagator
/// advances it, how a co-state is pulled back through a step, and the
/// derivative direction associated with each control channel. Everything is
/// a pure function of its inputs; rebuilding propagators from the same
/// control snapshot yields identical results.
pub trait Dynamics {
    /// Per-step state representation: a density matrix for closed systems,
    /// a vectorized density column for open systems.
    type State: Clone + PartialEq + std::fmt::Debug;

    /// Hilbert-space dimension `n`.
    fn dim(&self) -> usize;

    /// Number of control channels `m`.
    fn num_controls(&self) -> usize;

    /// Build one propagator per time step from a control snapshot `u[k, j]`.
    fn propagators(&self, u: &nd::Array2<f64>, dt: f64)
        -> Result<Vec<nd::Array2<C64>>, GrapeError>;

    /// Advance a state through one step.
    fn step(&self, prop: &nd::Array2<C64>, state: &Self::State) -> Self::State;

    /// Pull a co-state back through one step (adjoint action).
    fn costep(&self, prop: &nd::Array2<C64>, costate: &Self::State)
        -> Self::State;

    /// Inner product `⟨a, b⟩`, conjugate-linear in `a`.
    fn overlap(&self, a: &Self::State, b: &Self::State) -> C64;

    /// The perturbation direction `iΔt·[Hk, ρ]` for control channel `k`, in
    /// this representation.
    fn control_deriv(&self, k: usize, state: &Self::State, dt: f64)
        -> Self::State;
}

/// Closed-system evolution: states are `n × n` density matrices and step
/// propagators are the unitaries `exp(-iΔt·H_j)`.
#[derive(Clone, Debug)]
pub struct UnitaryDynamics {
    pub(crate) H0: nd::Array2<C64>,
    pub(crate) Hk: Vec<nd::Array2<C64>>,
}

impl UnitaryDynamics {
    /// Create a new `UnitaryDynamics` from a drift Hamiltonian and a
    /// non-empty list of control Hamiltonians, all `n × n`.
    pub fn new<A, B>(H0: A, Hk: Vec<B>)
        -> Result<Self, GrapeError>
    where
        A: IntoOperator,
        B: IntoOperator,
    {
        let H0 = H0.into_operator();
        let n = H0.nrows();
        check_square("basic Hamiltonian", &H0, n)?;
        if Hk.is_empty() { return Err(GrapeError::EmptyControls); }
        let Hk: Vec<nd::Array2<C64>>
            = Hk.into_iter().map(|h| h.into_operator()).collect();
        for h in Hk.iter() {
            check_square("control Hamiltonian", h, n)?;
        }
        Ok(Self { H0, Hk })
    }
}

impl Dynamics for UnitaryDynamics {
    type State = nd::Array2<C64>;

    fn dim(&self) -> usize { self.H0.nrows() }

    fn num_controls(&self) -> usize { self.Hk.len() }

    fn propagators(&self, u: &nd::Array2<f64>, dt: f64)
        -> Result<Vec<nd::Array2<C64>>, GrapeError>
    {
        let (_, n_steps) = u.dim();
        let mut props: Vec<nd::Array2<C64>> = Vec::with_capacity(n_steps);
        let mut H: nd::Array2<C64>;
        for j in 0..n_steps {
            H = self.H0.clone();
            for (k, Hk) in self.Hk.iter().enumerate() {
                H.scaled_add(C64::from(u[[k, j]]), Hk);
            }
            props.push(expm_hermitian(&H, -C64::i() * dt)?);
        }
        Ok(props)
    }

    fn step(&self, prop: &nd::Array2<C64>, state: &Self::State) -> Self::State {
        prop.dot(state).dot(&dagger(prop))
    }

    fn costep(&self, prop: &nd::Array2<C64>, costate: &Self::State)
        -> Self::State
    {
        dagger(prop).dot(costate).dot(prop)
    }

    fn overlap(&self, a: &Self::State, b: &Self::State) -> C64 {
        inner(a, b)
    }

    fn control_deriv(&self, k: usize, state: &Self::State, dt: f64)
        -> Self::State
    {
        commutator(&self.Hk[k], state).mapv(|x| C64::i() * dt * x)
    }
}

/// Build the commutator superoperator `K(H) = H⊗I - I⊗Hᵀ` acting on
/// row-major-vectorized matrices, so that `K(H)·vec(ρ) = vec([H, ρ])`.
pub fn hamiltonian_superop(H: &nd::Array2<C64>) -> nd::Array2<C64> {
    let n = H.nrows();
    let eye: nd::Array2<C64> = nd::Array2::eye(n);
    kron(H, &eye) - kron(&eye, &H.t().to_owned())
}

/// Build the dissipator superoperator
/// `c⊗c* - ½(c†c)⊗I - ½I⊗(c†c)ᵀ`
/// for a single collapse operator `c` (row-major vectorization).
pub fn dissipator_superop(c: &nd::Array2<C64>) -> nd::Array2<C64> {
    let n = c.nrows();
    let eye: nd::Array2<C64> = nd::Array2::eye(n);
    let cconj = c.mapv(|x| x.conj());
    let cdc = dagger(c).dot(c);
    kron(c, &cconj)
        - kron(&cdc, &eye) * 0.5
        - kron(&eye, &cdc.t().to_owned()) * 0.5
}

/// Open-system evolution: states are length-`n²` vectorized density
/// matrices and step propagators are the superoperators `exp(Δt·L_j)` with
/// `L_j = -iK(H_j) + Σ_c D(c) + Σ extra`.
#[derive(Clone, Debug)]
pub struct LiouvilleDynamics {
    dim: usize,
    // commutator superoperators for the drift and each control generator
    K0: nd::Array2<C64>,
    Kk: Vec<nd::Array2<C64>>,
    // control-independent dissipator sum
    dissipator: nd::Array2<C64>,
}

impl LiouvilleDynamics {
    /// Create a new `LiouvilleDynamics` from a drift Hamiltonian, a
    /// non-empty list of control Hamiltonians, a list of collapse operators
    /// (all `n × n`), and optional extra dissipators already in `n² × n²`
    /// superoperator form.
    pub fn new<A, B, G, X>(
        H0: A,
        Hk: Vec<B>,
        c_ops: Vec<G>,
        dissipators: Vec<X>,
    ) -> Result<Self, GrapeError>
    where
        A: IntoOperator,
        B: IntoOperator,
        G: IntoOperator,
        X: IntoOperator,
    {
        let H0 = H0.into_operator();
        let n = H0.nrows();
        check_square("basic Hamiltonian", &H0, n)?;
        if Hk.is_empty() { return Err(GrapeError::EmptyControls); }
        let Hk: Vec<nd::Array2<C64>>
            = Hk.into_iter().map(|h| h.into_operator()).collect();
        for h in Hk.iter() {
            check_square("control Hamiltonian", h, n)?;
        }
        let mut dissipator: nd::Array2<C64> = nd::Array2::zeros((n * n, n * n));
        for c_op in c_ops.into_iter() {
            let c = c_op.into_operator();
            check_square("collapse operator", &c, n)?;
            dissipator += &dissipator_superop(&c);
        }
        for extra in dissipators.into_iter() {
            let d = extra.into_operator();
            check_square("dissipator", &d, n * n)?;
            dissipator += &d;
        }
        let K0 = hamiltonian_superop(&H0);
        let Kk: Vec<nd::Array2<C64>>
            = Hk.iter().map(hamiltonian_superop).collect();
        Ok(Self { dim: n, K0, Kk, dissipator })
    }
}

impl Dynamics for LiouvilleDynamics {
    type State = nd::Array1<C64>;

    fn dim(&self) -> usize { self.dim }

    fn num_controls(&self) -> usize { self.Kk.len() }

    fn propagators(&self, u: &nd::Array2<f64>, dt: f64)
        -> Result<Vec<nd::Array2<C64>>, GrapeError>
    {
        let (_, n_steps) = u.dim();
        let mut props: Vec<nd::Array2<C64>> = Vec::with_capacity(n_steps);
        let mut K: nd::Array2<C64>;
        let mut L: nd::Array2<C64>;
        for j in 0..n_steps {
            K = self.K0.clone();
            for (k, Kk) in self.Kk.iter().enumerate() {
                K.scaled_add(C64::from(u[[k, j]]), Kk);
            }
            L = self.dissipator.clone();
            L.scaled_add(-C64::i(), &K);
            props.push(expm(&L.mapv(|x| dt * x))?);
        }
        Ok(props)
    }

    fn step(&self, prop: &nd::Array2<C64>, state: &Self::State) -> Self::State {
        prop.dot(state)
    }

    fn costep(&self, prop: &nd::Array2<C64>, costate: &Self::State)
        -> Self::State
    {
        dagger(prop).dot(costate)
    }

    fn overlap(&self, a: &Self::State, b: &Self::State) -> C64 {
        inner(a, b)
    }

    fn control_deriv(&self, k: usize, state: &Self::State, dt: f64)
        -> Self::State
    {
        self.Kk[k].dot(state).mapv(|x| C64::i() * dt * x)
    }
}
