#![allow(dead_code, non_snake_case, non_upper_case_globals)]

pub mod utils;
pub mod nd_utils;
pub mod error;
pub mod expm;
pub mod operators;
pub mod dynamics;
pub mod trajectory;
pub mod gradient;
pub mod grape;

pub use error::GrapeError;
