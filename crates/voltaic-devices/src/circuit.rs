//! The parsed circuit: elements, node index, and analysis requests.

use voltaic_core::NodeIndex;

use crate::diode::Diode;
use crate::passive::{Capacitor, Inductor, Resistor};
use crate::sources::VoltageSource;
use crate::switch::VSwitch;

/// Frequency spacing of an AC sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcSweepType {
    /// Logarithmic, `num_points` per decade.
    Dec,
    /// Linear, `num_points` total.
    Lin,
}

/// `.ac` request.
#[derive(Debug, Clone)]
pub struct AcSweep {
    pub sweep_type: AcSweepType,
    pub num_points: usize,
    pub fstart: f64,
    pub fstop: f64,
}

/// `.tran` request.
#[derive(Debug, Clone)]
pub struct TranParams {
    pub tstep: f64,
    pub tstop: f64,
}

/// A complete parsed circuit.
///
/// Structurally immutable during analyses; the transient engine mutates only
/// the element state fields (`v_prev`, `i_prev`, `vd_prev`, `is_on`).
/// Elements iterate in a fixed order — R, C, L, V, S, D, each in netlist
/// order — during both stamping and output.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    pub nodes: NodeIndex,
    pub resistors: Vec<Resistor>,
    pub capacitors: Vec<Capacitor>,
    pub inductors: Vec<Inductor>,
    pub vsources: Vec<VoltageSource>,
    pub switches: Vec<VSwitch>,
    pub diodes: Vec<Diode>,
    pub ac: Option<AcSweep>,
    pub tran: Option<TranParams>,
    /// `.print tran` node probes; empty means "emit every node".
    pub probes: Vec<String>,
}

impl Circuit {
    pub fn new() -> Self {
        Circuit {
            nodes: NodeIndex::new(),
            ..Default::default()
        }
    }

    /// Number of node-voltage unknowns (non-ground nodes).
    pub fn num_nodes(&self) -> usize {
        self.nodes.num_unknowns()
    }

    pub fn num_vsources(&self) -> usize {
        self.vsources.len()
    }

    /// Size of the MNA system: node unknowns plus one branch current per
    /// voltage source.
    pub fn mna_size(&self) -> usize {
        self.num_nodes() + self.num_vsources()
    }

    /// Assign every voltage source its branch-current slot:
    /// `num_nodes() + k` for the k-th source. Must run once, after all
    /// elements and nodes are registered and before any analysis.
    pub fn finalize(&mut self) {
        let num_nodes = self.num_nodes();
        for (k, source) in self.vsources.iter_mut().enumerate() {
            source.branch_index = num_nodes + k;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltaic_core::NodeId;

    #[test]
    fn finalize_assigns_branch_indices_after_nodes() {
        let mut circuit = Circuit::new();
        let n1 = circuit.nodes.get_or_create("1");
        let n2 = circuit.nodes.get_or_create("2");
        circuit
            .vsources
            .push(VoltageSource::new("V1", n1, NodeId::GROUND, 5.0));
        circuit
            .vsources
            .push(VoltageSource::new("V2", n2, NodeId::GROUND, 1.0));
        circuit.finalize();

        assert_eq!(circuit.num_nodes(), 2);
        assert_eq!(circuit.vsources[0].branch_index, 2);
        assert_eq!(circuit.vsources[1].branch_index, 3);
        assert_eq!(circuit.mna_size(), 4);
    }
}
