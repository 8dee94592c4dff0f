//! Forward state and backward co-state trajectories.
//!
//! Both passes consume the same propagator sequence but traverse it in
//! opposite directions. Every intermediate state is retained because the
//! gradient assembly needs the full trajectories.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::dynamics::Dynamics;

/// Propagate `rho0` forward through all steps, returning the state *after*
/// each step (`states[j]` is the state after propagators `0..=j`).
pub fn forward<D>(
    dynamics: &D,
    propagators: &[nd::Array2<C64>],
    rho0: &D::State,
) -> Vec<D::State>
where D: Dynamics
{
    let mut states: Vec<D::State> = Vec::with_capacity(propagators.len());
    let mut cur = rho0.clone();
    for prop in propagators.iter() {
        cur = dynamics.step(prop, &cur);
        states.push(cur.clone());
    }
    states
}

/// Propagate the target operator backward through the adjoint propagators.
///
/// `costates[N-1]` is the target itself; for decreasing `j`,
/// `costates[j]` is the adjoint action of propagator `j+1` on
/// `costates[j+1]`. `costates[j]` measures how a perturbation of the state
/// after step `j` propagates, under the unperturbed remaining steps, into
/// the final overlap with the target.
pub fn backward<D>(
    dynamics: &D,
    propagators: &[nd::Array2<C64>],
    target: &D::State,
) -> Vec<D::State>
where D: Dynamics
{
    let n_steps = propagators.len();
    let mut costates: Vec<D::State> = Vec::with_capacity(n_steps);
    let mut cur = target.clone();
    costates.push(cur.clone());
    for prop in propagators.iter().skip(1).rev() {
        cur = dynamics.costep(prop, &cur);
        costates.push(cur.clone());
    }
    costates.reverse();
    costates
}
