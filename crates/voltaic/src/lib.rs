//! Voltaic: a small SPICE-style circuit simulator.
//!
//! Parse a netlist into a [`Circuit`], then run the analyses it requests:
//!
//! ```
//! let result = voltaic::simulate("V1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 1k\n.tran 1u 1u\n").unwrap();
//! let tran = result.tran.unwrap();
//! let v2 = tran.voltage("2").unwrap();
//! assert!((v2.last().unwrap() - 5.0).abs() < 1e-9);
//! ```

use thiserror::Error;

pub use voltaic_core::{NodeId, NodeIndex};
pub use voltaic_devices::{
    AcSweep, AcSweepType, Capacitor, Circuit, Diode, DiodeModel, Inductor, Resistor, SwitchModel,
    TranParams, VSwitch, VoltageSource, Waveform,
};
pub use voltaic_parser::{parse_netlist, parse_value};
pub use voltaic_solver::{run_ac, run_tran, AcResult, TranResult};

/// Everything a deck asked for: AC, transient, either, or both.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub ac: Option<AcResult>,
    pub tran: Option<TranResult>,
}

/// Failure from either the parse or an analysis.
#[derive(Debug, Error)]
pub enum SimulateError {
    #[error(transparent)]
    Parse(#[from] voltaic_parser::Error),
    #[error(transparent)]
    Solve(#[from] voltaic_solver::Error),
}

/// Parse a netlist and run every analysis it requests.
pub fn simulate(netlist: &str) -> Result<Simulation, SimulateError> {
    let mut circuit = parse_netlist(netlist)?;
    let ac = run_ac(&circuit)?;
    let tran = run_tran(&mut circuit)?;
    Ok(Simulation { ac, tran })
}
