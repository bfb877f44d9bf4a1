//! SPICE netlist parser for Voltaic.
//!
//! Turns netlist text into a finalized
//! [`Circuit`](voltaic_devices::Circuit): element lines (R, C, L, V, S, D),
//! `.model` cards with lowercase-name resolution, `.ac`/`.tran` analysis
//! requests, and `.print tran` probes. Numeric fields accept the SPICE SI
//! suffixes with optional trailing dimension letters.

pub mod error;
pub mod netlist;
pub mod value;

pub use error::{Error, Result};
pub use netlist::parse_netlist;
pub use value::parse_value;
