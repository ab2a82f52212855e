//! Mathematical utilities: least-squares regression.

pub mod ols;

pub use ols::*;
