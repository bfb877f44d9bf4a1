//! Transient time-domain analysis.
//!
//! The engine walks a uniform time grid, replacing capacitors and inductors
//! with backward-Euler companion models and resolving diodes and switches
//! with a Newton–Raphson loop that reassembles the full system each
//! iteration. A toggled switch always forces another assembly pass; the
//! per-device hysteresis is what keeps that from chattering forever.
//!
//! # Module structure
//!
//! - [`result`] - Result series with interpolation support
//! - [`solver`] - The engine itself

pub mod result;
pub mod solver;

pub use result::TranResult;
pub use solver::{run_tran, MAX_NEWTON_ITERATIONS, NEWTON_TOLERANCE};
