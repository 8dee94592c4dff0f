//! Optimization drivers: fixed-step gradient ascent and delegated
//! quasi-Newton (L-BFGS) refinement over the shared
//! propagate/evaluate/gradient machinery.
//!
//! Every iteration rebuilds the propagator sequence, forward trajectory, and
//! co-state trajectory from the current control snapshot, so the three are
//! always mutually consistent; the only state carried across iterations is
//! the control table itself.

use std::str::FromStr;
use argmin::core::{
    CostFunction,
    Error as ArgminError,
    Executor,
    Gradient as ArgminGradient,
    State,
    TerminationReason,
};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use ndarray as nd;
use crate::{
    dynamics::{ Dynamics, LiouvilleDynamics, UnitaryDynamics },
    error::GrapeError,
    gradient::{ Target, gradient_complex },
    nd_utils::vectorize,
    operators::{ IntoOperator, check_square },
    trajectory::{ backward, forward },
};

/// Control-update rule selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    /// Fixed-step gradient ascent only.
    Direct,
    /// Delegated quasi-Newton (L-BFGS) minimization of `-Φ` only.
    Bfgs,
    /// Fixed-step ascent seeding the quasi-Newton refinement.
    Cascaded,
}

impl FromStr for Method {
    type Err = GrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Self::Direct),
            "bfgs" => Ok(Self::Bfgs),
            "cascaded" => Ok(Self::Cascaded),
            _ => Err(GrapeError::InvalidMethod(s.to_string())),
        }
    }
}

/// Termination status of an optimization run.
///
/// Hitting the iteration cap is not an error; the driver still returns its
/// current best estimate and leaves the judgment of adequacy to the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Convergence {
    /// The convergence measure dropped below tolerance.
    Converged,
    /// The patience counter ran out on consecutive non-improving steps.
    Stalled,
    /// The iteration cap was reached first.
    NotConverged,
}

/// Tunables for the fixed-step ascent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AscentOpts {
    /// Step size `α` in `u ← u + α·g`.
    pub step: f64,
    /// Convergence threshold on `|ΔΦ|` between iterations.
    pub epsilon: f64,
    /// Iteration cap.
    pub max_iter: usize,
    /// Minimum number of iterations before the threshold check applies.
    pub min_iter: usize,
    /// Number of consecutive objective-decreasing iterations tolerated
    /// before aborting; guards against oscillation from a too-large step.
    pub patience: usize,
}

impl Default for AscentOpts {
    fn default() -> Self {
        Self {
            step: 1e-3,
            epsilon: 1e-6,
            max_iter: 1000,
            min_iter: 10,
            patience: 5,
        }
    }
}

/// Tunables for the delegated quasi-Newton minimizer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuasiNewtonOpts {
    /// Gradient-norm tolerance.
    pub gtol: f64,
    /// Iteration cap.
    pub max_iter: u64,
    /// Number of curvature pairs retained by L-BFGS.
    pub memory: usize,
}

impl Default for QuasiNewtonOpts {
    fn default() -> Self {
        Self { gtol: 1e-6, max_iter: 1000, memory: 7 }
    }
}

/// Outcome of an optimization run.
#[derive(Clone, Debug)]
pub struct Optimized<D>
where D: Dynamics
{
    /// Termination status.
    pub convergence: Convergence,
    /// Last convergence measure: `|ΔΦ|` for the fixed-step ascent, final
    /// gradient norm for the quasi-Newton path.
    pub threshold: f64,
    /// Final control-amplitude table.
    pub controls: nd::Array2<f64>,
    /// Final objective value `Φ`.
    pub objective: f64,
    /// Per-iteration objective values (fixed-step ascent only).
    pub history: Vec<f64>,
    /// Forward trajectory under the final controls.
    pub trajectory: Vec<D::State>,
}

// everything derived from one control snapshot
struct Evaluation<D>
where D: Dynamics
{
    phi: f64,
    grad: nd::Array2<f64>,
    trajectory: Vec<D::State>,
}

/// GRAPE optimization problem: fixed Hamiltonians, initial state, target
/// operator, horizon, and figure of merit.
///
/// All precondition validation happens in the constructors; the iteration
/// entry points only check the control table against the declared channel
/// count.
#[derive(Clone, Debug)]
pub struct Grape<D>
where D: Dynamics
{
    dynamics: D,
    rho0: D::State,
    C: D::State,
    total_time: f64,
    target: Target,
}

impl Grape<UnitaryDynamics> {
    /// Set up a closed-system problem.
    ///
    /// `H0` is the `n × n` drift Hamiltonian, `Hk` the control Hamiltonians,
    /// `rho0` the initial density matrix, `C` the target operator, and
    /// `total_time` the horizon `T` (`Δt = T/N` with `N` taken from the
    /// control table at run time).
    pub fn unitary<A, B, R, O>(
        H0: A,
        Hk: Vec<B>,
        rho0: R,
        C: O,
        total_time: f64,
        target: Target,
    ) -> Result<Self, GrapeError>
    where
        A: IntoOperator,
        B: IntoOperator,
        R: IntoOperator,
        O: IntoOperator,
    {
        let dynamics = UnitaryDynamics::new(H0, Hk)?;
        let n = dynamics.dim();
        let rho0 = rho0.into_operator();
        check_square("initial state", &rho0, n)?;
        let C = C.into_operator();
        check_square("target operator", &C, n)?;
        if !(total_time > 0.0) {
            return Err(GrapeError::InvalidHorizon(total_time));
        }
        Ok(Self { dynamics, rho0, C, total_time, target })
    }
}

impl Grape<LiouvilleDynamics> {
    /// Set up an open-system problem in vectorized (Liouvillian) form.
    ///
    /// In addition to the closed-system inputs, `c_ops` are `n × n` collapse
    /// operators and `dissipators` are extra superoperators already in
    /// `n² × n²` form. `rho0` and `C` are supplied as `n × n` matrices and
    /// vectorized internally.
    #[allow(clippy::too_many_arguments)]
    pub fn liouville<A, B, G, X, R, O>(
        H0: A,
        Hk: Vec<B>,
        c_ops: Vec<G>,
        dissipators: Vec<X>,
        rho0: R,
        C: O,
        total_time: f64,
        target: Target,
    ) -> Result<Self, GrapeError>
    where
        A: IntoOperator,
        B: IntoOperator,
        G: IntoOperator,
        X: IntoOperator,
        R: IntoOperator,
        O: IntoOperator,
    {
        let dynamics = LiouvilleDynamics::new(H0, Hk, c_ops, dissipators)?;
        let n = dynamics.dim();
        let rho0 = rho0.into_operator();
        check_square("initial state", &rho0, n)?;
        let C = C.into_operator();
        check_square("target operator", &C, n)?;
        if !(total_time > 0.0) {
            return Err(GrapeError::InvalidHorizon(total_time));
        }
        Ok(Self {
            dynamics,
            rho0: vectorize(&rho0),
            C: vectorize(&C),
            total_time,
            target,
        })
    }
}

impl<D> Grape<D>
where D: Dynamics
{
    /// Get a reference to the underlying evolution model.
    pub fn dynamics(&self) -> &D { &self.dynamics }

    fn check_controls(&self, u: &nd::Array2<f64>)
        -> Result<(usize, usize, f64), GrapeError>
    {
        let (m, n_steps) = u.dim();
        if m != self.dynamics.num_controls() {
            return Err(GrapeError::ChannelMismatch {
                controls: m,
                generators: self.dynamics.num_controls(),
            });
        }
        if n_steps == 0 { return Err(GrapeError::NoTimeSteps); }
        Ok((m, n_steps, self.total_time / n_steps as f64))
    }

    /// Evaluate the objective `Φ` for a control snapshot.
    pub fn objective(&self, u: &nd::Array2<f64>) -> Result<f64, GrapeError> {
        let (_, _, dt) = self.check_controls(u)?;
        let props = self.dynamics.propagators(u, dt)?;
        let states = forward(&self.dynamics, &props, &self.rho0);
        let rho_final = states.last()
            .expect("objective: empty forward trajectory");
        Ok(self.target.value(self.dynamics.overlap(&self.C, rho_final)))
    }

    /// Evaluate the analytic gradient `g[k, j] = ∂Φ/∂u[k, j]` for a control
    /// snapshot.
    pub fn gradient(&self, u: &nd::Array2<f64>)
        -> Result<nd::Array2<f64>, GrapeError>
    {
        Ok(self.evaluate(u)?.grad)
    }

    fn evaluate(&self, u: &nd::Array2<f64>)
        -> Result<Evaluation<D>, GrapeError>
    {
        let (_, _, dt) = self.check_controls(u)?;
        let props = self.dynamics.propagators(u, dt)?;
        let states = forward(&self.dynamics, &props, &self.rho0);
        let costates = backward(&self.dynamics, &props, &self.C);
        let rho_final = states.last()
            .expect("evaluate: empty forward trajectory");
        let tr = self.dynamics.overlap(&self.C, rho_final);
        let gc = gradient_complex(&self.dynamics, &costates, &states, dt);
        Ok(Evaluation {
            phi: self.target.value(tr),
            grad: self.target.fold_gradient(tr, &gc),
            trajectory: states,
        })
    }

    /// Run the fixed-step gradient ascent `u ← u + α·g` from `u0`.
    ///
    /// Terminates when `|ΔΦ|` drops below `opts.epsilon` after at least
    /// `opts.min_iter` iterations, when `opts.patience` consecutive
    /// non-improving iterations have elapsed, or at the iteration cap.
    pub fn ascend(&self, u0: &nd::Array2<f64>, opts: &AscentOpts)
        -> Result<Optimized<D>, GrapeError>
    {
        self.check_controls(u0)?;
        let mut u = u0.to_owned();
        let mut eval = self.evaluate(&u)?;
        let mut history: Vec<f64> = Vec::new();
        let mut threshold = f64::INFINITY;
        let mut stall: usize = 0;
        let mut convergence = Convergence::NotConverged;
        for iter in 0..opts.max_iter {
            history.push(eval.phi);
            if threshold < opts.epsilon && iter > opts.min_iter {
                convergence = Convergence::Converged;
                break;
            }
            let mut u_new = u.clone();
            u_new.scaled_add(opts.step, &eval.grad);
            let eval_new = self.evaluate(&u_new)?;
            threshold = (eval_new.phi - eval.phi).abs();
            if eval_new.phi < eval.phi {
                stall += 1;
            } else {
                stall = 0;
            }
            u = u_new;
            eval = eval_new;
            if stall > opts.patience {
                convergence = Convergence::Stalled;
                break;
            }
        }
        Ok(Optimized {
            convergence,
            threshold,
            controls: u,
            objective: eval.phi,
            history,
            trajectory: eval.trajectory,
        })
    }

    /// Delegate to the external L-BFGS minimizer on `(-Φ, -g)` over the
    /// flattened (row-major, channel index slower) control vector.
    ///
    /// The minimizer's own gradient tolerance and iteration cap govern
    /// termination.
    pub fn minimize(&self, u0: &nd::Array2<f64>, opts: &QuasiNewtonOpts)
        -> Result<Optimized<D>, GrapeError>
    {
        let (m, n_steps, _) = self.check_controls(u0)?;
        let problem = NegObjective { grape: self, shape: (m, n_steps) };
        let init: nd::Array1<f64>
            = u0.to_owned().into_shape(m * n_steps)?;
        let fallback = init.clone();
        let linesearch = MoreThuenteLineSearch::new();
        let solver = LBFGS::new(linesearch, opts.memory)
            .with_tolerance_grad(opts.gtol)
            .map_err(|e| GrapeError::Minimizer(e.to_string()))?;
        let res = Executor::new(problem, solver)
            .configure(|state| state.param(init).max_iters(opts.max_iter))
            .run()
            .map_err(|e| GrapeError::Minimizer(e.to_string()))?;
        let convergence = match res.state().get_termination_reason() {
            Some(TerminationReason::SolverConverged) => Convergence::Converged,
            Some(TerminationReason::TargetCostReached) => Convergence::Converged,
            _ => Convergence::NotConverged,
        };
        let best: nd::Array1<f64> = res.state().get_best_param()
            .cloned()
            .unwrap_or(fallback);
        let controls: nd::Array2<f64> = best.into_shape((m, n_steps))?;
        let eval = self.evaluate(&controls)?;
        let grad_norm: f64
            = eval.grad.iter().map(|g| g * g).sum::<f64>().sqrt();
        Ok(Optimized {
            convergence,
            threshold: grad_norm,
            controls,
            objective: eval.phi,
            history: Vec::new(),
            trajectory: eval.trajectory,
        })
    }

    /// Run the selected update method from `u0`; `Method::Cascaded` seeds
    /// the quasi-Newton refinement with the ascent result.
    pub fn run(
        &self,
        u0: &nd::Array2<f64>,
        method: Method,
        ascent: &AscentOpts,
        quasi_newton: &QuasiNewtonOpts,
    ) -> Result<Optimized<D>, GrapeError>
    {
        match method {
            Method::Direct => self.ascend(u0, ascent),
            Method::Bfgs => self.minimize(u0, quasi_newton),
            Method::Cascaded => {
                let seeded = self.ascend(u0, ascent)?;
                self.minimize(&seeded.controls, quasi_newton)
            },
        }
    }
}

// adapter handing the negated objective/gradient to argmin as flattened
// real vectors
struct NegObjective<'a, D>
where D: Dynamics
{
    grape: &'a Grape<D>,
    shape: (usize, usize),
}

impl<D> NegObjective<'_, D>
where D: Dynamics
{
    fn controls(&self, x: &nd::Array1<f64>)
        -> Result<nd::Array2<f64>, GrapeError>
    {
        Ok(x.to_owned().into_shape(self.shape)?)
    }
}

impl<D> CostFunction for NegObjective<'_, D>
where D: Dynamics
{
    type Param = nd::Array1<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, ArgminError> {
        let u = self.controls(x)?;
        Ok(-self.grape.objective(&u)?)
    }
}

impl<D> ArgminGradient for NegObjective<'_, D>
where D: Dynamics
{
    type Param = nd::Array1<f64>;
    type Gradient = nd::Array1<f64>;

    fn gradient(&self, x: &Self::Param)
        -> Result<Self::Gradient, ArgminError>
    {
        let u = self.controls(x)?;
        let g = self.grape.gradient(&u)?;
        Ok(g.into_shape(self.shape.0 * self.shape.1)?.mapv(|gi| -gi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64 as C64;

    fn sigma_x() -> nd::Array2<f64> {
        nd::array![[0.0, 1.0], [1.0, 0.0]]
    }

    fn drift() -> nd::Array2<f64> {
        nd::array![[0.0, 0.0], [0.0, 1.0]]
    }

    fn ground() -> nd::Array2<f64> {
        nd::array![[1.0, 0.0], [0.0, 0.0]]
    }

    fn excited() -> nd::Array2<f64> {
        nd::array![[0.0, 0.0], [0.0, 1.0]]
    }

    fn lowering(gamma: f64) -> nd::Array2<f64> {
        nd::array![[0.0, gamma.sqrt()], [0.0, 0.0]]
    }

    fn finite_difference<D>(
        grape: &Grape<D>,
        u: &nd::Array2<f64>,
        delta: f64,
    ) -> nd::Array2<f64>
    where D: Dynamics
    {
        let mut g: nd::Array2<f64> = nd::Array2::zeros(u.dim());
        for ((k, j), gv) in g.indexed_iter_mut() {
            let mut up = u.clone();
            up[[k, j]] += delta;
            let mut um = u.clone();
            um[[k, j]] -= delta;
            *gv = (grape.objective(&up).unwrap()
                - grape.objective(&um).unwrap()) / (2.0 * delta);
        }
        g
    }

    #[test]
    fn method_strings_parse() {
        assert_eq!("direct".parse::<Method>().unwrap(), Method::Direct);
        assert_eq!("bfgs".parse::<Method>().unwrap(), Method::Bfgs);
        assert_eq!("cascaded".parse::<Method>().unwrap(), Method::Cascaded);
        assert!(matches!(
            "newton".parse::<Method>(),
            Err(GrapeError::InvalidMethod(_)),
        ));
    }

    #[test]
    fn channel_mismatch_is_rejected() {
        let grape = Grape::unitary(
            drift(), vec![sigma_x()], ground(), excited(),
            1.0, Target::TraceReal,
        ).unwrap();
        let u: nd::Array2<f64> = nd::Array2::zeros((2, 4));
        assert!(matches!(
            grape.objective(&u),
            Err(GrapeError::ChannelMismatch { .. }),
        ));
    }

    #[test]
    fn zero_time_steps_are_rejected() {
        let grape = Grape::unitary(
            drift(), vec![sigma_x()], ground(), excited(),
            1.0, Target::TraceReal,
        ).unwrap();
        let u: nd::Array2<f64> = nd::Array2::zeros((1, 0));
        assert!(matches!(grape.objective(&u), Err(GrapeError::NoTimeSteps)));
    }

    #[test]
    fn bad_initial_state_shape_is_rejected() {
        let rho0: nd::Array2<f64> = nd::Array2::zeros((3, 3));
        let res = Grape::unitary(
            drift(), vec![sigma_x()], rho0, excited(),
            1.0, Target::TraceReal,
        );
        assert!(matches!(res, Err(GrapeError::ShapeMismatch { .. })));
    }

    #[test]
    fn non_positive_horizon_is_rejected() {
        let res = Grape::unitary(
            drift(), vec![sigma_x()], ground(), excited(),
            0.0, Target::TraceReal,
        );
        assert!(matches!(res, Err(GrapeError::InvalidHorizon(_))));
    }

    // with H0 = 0 and a single σx control everything commutes, so the
    // first-order gradient is exact and must match finite differences to
    // machine-level precision
    #[test]
    fn gradient_matches_finite_difference_commuting() {
        let h0: nd::Array2<f64> = nd::Array2::zeros((2, 2));
        let grape = Grape::unitary(
            h0, vec![sigma_x()], ground(), excited(),
            1.0, Target::TraceReal,
        ).unwrap();
        let u: nd::Array2<f64> = nd::array![[0.4, -0.1, 0.8, 0.2, 0.6]];
        let g = grape.gradient(&u).unwrap();
        let g_fd = finite_difference(&grape, &u, 1e-6);
        for (a, b) in g.iter().zip(g_fd.iter()) {
            assert!((a - b).abs() < 1e-7, "analytic {} vs fd {}", a, b);
        }
    }

    #[test]
    fn abs_gradient_matches_finite_difference() {
        let h0: nd::Array2<f64> = nd::Array2::zeros((2, 2));
        let grape = Grape::unitary(
            h0, vec![sigma_x()], ground(), excited(),
            1.0, Target::Abs,
        ).unwrap();
        let u: nd::Array2<f64> = nd::array![[0.4, -0.1, 0.8, 0.2, 0.6]];
        let g = grape.gradient(&u).unwrap();
        let g_fd = finite_difference(&grape, &u, 1e-6);
        for (a, b) in g.iter().zip(g_fd.iter()) {
            assert!((a - b).abs() < 1e-7, "analytic {} vs fd {}", a, b);
        }
    }

    // a non-Hermitian target keeps the final-time trace genuinely complex,
    // so this exercises both quadratures of the trace_both fold
    #[test]
    fn trace_both_gradient_matches_finite_difference() {
        let h0: nd::Array2<f64> = nd::Array2::zeros((2, 2));
        let coherence_target: nd::Array2<f64>
            = nd::array![[0.0, 0.0], [1.0, 0.0]];
        let grape = Grape::unitary(
            h0, vec![sigma_x()], ground(), coherence_target,
            1.0, Target::TraceBoth,
        ).unwrap();
        let u: nd::Array2<f64> = nd::array![[0.4, -0.1, 0.8, 0.2, 0.6]];
        let g = grape.gradient(&u).unwrap();
        let g_fd = finite_difference(&grape, &u, 1e-6);
        let norm: f64 = g_fd.iter().map(|b| b * b).sum::<f64>().sqrt();
        assert!(norm > 1e-4);
        for (a, b) in g.iter().zip(g_fd.iter()) {
            assert!((a - b).abs() < 1e-7, "analytic {} vs fd {}", a, b);
        }
    }

    // non-commuting drift: the gradient is first-order in Δt, so compare
    // against finite differences at small Δt with a relative tolerance
    #[test]
    fn gradient_approximates_finite_difference_noncommuting() {
        let grape = Grape::unitary(
            drift(), vec![sigma_x()], ground(), excited(),
            1.0, Target::TraceReal,
        ).unwrap();
        let u: nd::Array2<f64>
            = nd::Array2::from_shape_fn(
                (1, 50), |(_, j)| 0.8 + 0.3 * (j as f64 / 50.0));
        let g = grape.gradient(&u).unwrap();
        let g_fd = finite_difference(&grape, &u, 1e-6);
        let err: f64
            = g.iter().zip(g_fd.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        let norm: f64 = g_fd.iter().map(|b| b * b).sum::<f64>().sqrt();
        assert!(norm > 1e-4);
        assert!(err < 0.05 * norm, "err {} vs norm {}", err, norm);
    }

    #[test]
    fn open_gradient_approximates_finite_difference() {
        let grape = Grape::liouville(
            drift(), vec![sigma_x()], vec![lowering(0.3)],
            Vec::<nd::Array2<C64>>::new(),
            ground(), excited(),
            1.0, Target::TraceReal,
        ).unwrap();
        let u: nd::Array2<f64>
            = nd::Array2::from_shape_fn(
                (1, 50), |(_, j)| 0.8 + 0.3 * (j as f64 / 50.0));
        let g = grape.gradient(&u).unwrap();
        let g_fd = finite_difference(&grape, &u, 1e-6);
        let err: f64
            = g.iter().zip(g_fd.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        let norm: f64 = g_fd.iter().map(|b| b * b).sum::<f64>().sqrt();
        assert!(norm > 1e-4);
        assert!(err < 0.05 * norm, "err {} vs norm {}", err, norm);
    }

    fn pi_pulse_problem() -> Grape<UnitaryDynamics> {
        let h0: nd::Array2<f64> = nd::Array2::zeros((2, 2));
        Grape::unitary(
            h0, vec![sigma_x()], ground(), excited(),
            std::f64::consts::PI, Target::TraceReal,
        ).unwrap()
    }

    #[test]
    fn ascent_is_monotonic_and_converges_to_pi_pulse() {
        let grape = pi_pulse_problem();
        let u0: nd::Array2<f64> = nd::Array2::from_elem((1, 4), 0.3);
        let opts = AscentOpts {
            step: 0.05,
            epsilon: 1e-10,
            max_iter: 2000,
            min_iter: 10,
            patience: 50,
        };
        let res = grape.ascend(&u0, &opts).unwrap();
        assert_eq!(res.convergence, Convergence::Converged);
        assert!(res.objective > 0.999, "objective {}", res.objective);
        for w in res.history.windows(2) {
            assert!(w[1] >= w[0] - 1e-12, "{} -> {}", w[0], w[1]);
        }
        assert_eq!(res.trajectory.len(), 4);
    }

    #[test]
    fn open_system_ascent_without_dissipation_matches_closed() {
        let h0: nd::Array2<f64> = nd::Array2::zeros((2, 2));
        let grape = Grape::liouville(
            h0, vec![sigma_x()],
            Vec::<nd::Array2<C64>>::new(), Vec::<nd::Array2<C64>>::new(),
            ground(), excited(),
            std::f64::consts::PI, Target::TraceReal,
        ).unwrap();
        let u0: nd::Array2<f64> = nd::Array2::from_elem((1, 4), 0.3);
        let opts = AscentOpts {
            step: 0.05,
            epsilon: 1e-10,
            max_iter: 2000,
            min_iter: 10,
            patience: 50,
        };
        let res = grape.ascend(&u0, &opts).unwrap();
        assert!(res.objective > 0.999, "objective {}", res.objective);
    }

    #[test]
    fn lbfgs_converges_to_pi_pulse() {
        let grape = pi_pulse_problem();
        let u0: nd::Array2<f64> = nd::Array2::from_elem((1, 4), 0.3);
        let opts = QuasiNewtonOpts::default();
        let res = grape.minimize(&u0, &opts).unwrap();
        assert!(res.objective > 0.999, "objective {}", res.objective);
    }

    #[test]
    fn cascaded_does_not_lose_ground() {
        let grape = pi_pulse_problem();
        let u0: nd::Array2<f64> = nd::Array2::from_elem((1, 4), 0.3);
        let ascent = AscentOpts {
            step: 0.05,
            epsilon: 1e-4,
            max_iter: 50,
            min_iter: 5,
            patience: 10,
        };
        let qn = QuasiNewtonOpts::default();
        let direct = grape.run(&u0, Method::Direct, &ascent, &qn).unwrap();
        let cascaded = grape.run(&u0, Method::Cascaded, &ascent, &qn).unwrap();
        assert!(cascaded.objective >= direct.objective - 1e-9);
    }
}
