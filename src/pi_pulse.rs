#![allow(dead_code, non_snake_case, non_upper_case_globals)]
#![allow(unused_imports, unused_variables, unused_mut)]

use std::{
    f64::consts::PI,
    path::PathBuf,
};
use ndarray as nd;
use num_complex::Complex64 as C64;
use grape_pulse::{
    mkdir,
    write_npz,
    gradient::Target,
    grape::{ AscentOpts, Grape, Method, QuasiNewtonOpts },
};

const DETUNING: f64 = 0.25;
const TOTAL_TIME: f64 = PI;
const NSTEPS: usize = 64;
// const NSTEPS: usize = 128;
const STEP: f64 = 0.02;
const MAXITERS: usize = 2000;

fn main() {
    let outdir = PathBuf::from("output");
    mkdir!(outdir);

    let H0: nd::Array2<f64> = nd::array![
        [0.0, 0.0],
        [0.0, DETUNING],
    ];
    let Hx: nd::Array2<C64> = nd::array![
        [C64::from(0.0), C64::from(1.0)],
        [C64::from(1.0), C64::from(0.0)],
    ];
    let Hy: nd::Array2<C64> = nd::array![
        [C64::from(0.0), -C64::i()],
        [C64::i(), C64::from(0.0)],
    ];
    let rho0: nd::Array2<f64> = nd::array![
        [1.0, 0.0],
        [0.0, 0.0],
    ];
    let target: nd::Array2<f64> = nd::array![
        [0.0, 0.0],
        [0.0, 1.0],
    ];

    let grape = Grape::unitary(
        H0, vec![Hx, Hy], rho0, target, TOTAL_TIME, Target::TraceReal,
    ).unwrap();

    let u0: nd::Array2<f64> = nd::Array2::from_elem((2, NSTEPS), 0.25);
    let ascent = AscentOpts {
        step: STEP,
        max_iter: MAXITERS,
        ..AscentOpts::default()
    };
    let quasi_newton = QuasiNewtonOpts::default();

    let res = grape.run(&u0, Method::Direct, &ascent, &quasi_newton).unwrap();
    println!("{:?} after {} iterations", res.convergence, res.history.len());
    println!("objective = {:.9}", res.objective);

    let refined
        = grape.run(&res.controls, Method::Bfgs, &ascent, &quasi_newton)
        .unwrap();
    println!("refined objective = {:.9}", refined.objective);

    let history: nd::Array1<f64> = res.history.iter().copied().collect();
    let populations: nd::Array2<f64>
        = nd::Array2::from_shape_fn(
            (NSTEPS, 2), |(j, a)| refined.trajectory[j][[a, a]].re);
    write_npz!(
        outdir.join("pi_pulse.npz"),
        arrays: {
            "controls" => &refined.controls,
            "history" => &history,
            "populations" => &populations,
        }
    );

    println!("done");
}
