//! Device models and MNA stamps for Voltaic.
//!
//! This crate provides:
//! - Passive elements: R, C, L (with companion-model state for transient)
//! - Independent voltage sources with time-varying waveforms
//! - Voltage-controlled switches with hysteresis
//! - Shockley diodes with Newton linearization
//! - The [`Circuit`] container delivered by the parser and consumed by the
//!   analyses

pub mod circuit;
pub mod diode;
pub mod passive;
pub mod sources;
pub mod switch;
pub mod waveforms;

pub use circuit::{AcSweep, AcSweepType, Circuit, TranParams};
pub use diode::{Diode, DiodeModel, GMIN, THERMAL_VOLTAGE};
pub use passive::{Capacitor, Inductor, Resistor};
pub use sources::VoltageSource;
pub use switch::{SwitchModel, VSwitch};
pub use waveforms::Waveform;
