//! Passive elements: resistors, capacitors, inductors.
//!
//! Capacitors and inductors carry their previous-step terminal voltage and
//! branch current so the transient engine can stamp backward-Euler companion
//! models. Stamping and state update use the same discretization; mixing
//! schemes between the two is how companion models go wrong.

use voltaic_core::{MnaSystem, NodeId};

/// Linear resistor. The parser guarantees `resistance > 0`.
#[derive(Debug, Clone)]
pub struct Resistor {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub resistance: f64,
}

impl Resistor {
    pub fn new(name: impl Into<String>, node_pos: NodeId, node_neg: NodeId, resistance: f64) -> Self {
        Resistor {
            name: name.into(),
            node_pos,
            node_neg,
            resistance,
        }
    }

    pub fn conductance(&self) -> f64 {
        1.0 / self.resistance
    }

    pub fn stamp(&self, mna: &mut MnaSystem) {
        mna.stamp_conductance(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.conductance(),
        );
    }
}

/// Capacitor with companion-model state.
#[derive(Debug, Clone)]
pub struct Capacitor {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub capacitance: f64,
    /// Terminal voltage at the previous timestep.
    pub v_prev: f64,
    /// Branch current at the previous timestep.
    pub i_prev: f64,
}

impl Capacitor {
    pub fn new(name: impl Into<String>, node_pos: NodeId, node_neg: NodeId, capacitance: f64) -> Self {
        Capacitor {
            name: name.into(),
            node_pos,
            node_neg,
            capacitance,
            v_prev: 0.0,
            i_prev: 0.0,
        }
    }

    /// Stamp the backward-Euler companion: `Geq = C/h` in parallel with a
    /// current `Geq * v_prev` injected from the negative to the positive
    /// terminal.
    pub fn stamp_companion(&self, mna: &mut MnaSystem, h: f64) {
        let geq = self.capacitance / h;
        let ieq = geq * self.v_prev;
        mna.stamp_conductance(self.node_pos.matrix_index(), self.node_neg.matrix_index(), geq);
        mna.stamp_current_source(self.node_neg.matrix_index(), self.node_pos.matrix_index(), ieq);
    }

    /// Branch current implied by the companion model at terminal voltage `v`.
    pub fn current(&self, v: f64, h: f64) -> f64 {
        self.capacitance * (v - self.v_prev) / h
    }

    /// Commit the post-step terminal voltage.
    pub fn update_state(&mut self, v: f64, h: f64) {
        self.i_prev = self.current(v, h);
        self.v_prev = v;
    }
}

/// Inductor with companion-model state.
#[derive(Debug, Clone)]
pub struct Inductor {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub inductance: f64,
    /// Terminal voltage at the previous timestep.
    pub v_prev: f64,
    /// Branch current at the previous timestep.
    pub i_prev: f64,
}

impl Inductor {
    pub fn new(name: impl Into<String>, node_pos: NodeId, node_neg: NodeId, inductance: f64) -> Self {
        Inductor {
            name: name.into(),
            node_pos,
            node_neg,
            inductance,
            v_prev: 0.0,
            i_prev: 0.0,
        }
    }

    /// Stamp the backward-Euler Norton companion: `Geq = h/L` in parallel
    /// with the previous branch current injected from the positive to the
    /// negative terminal.
    pub fn stamp_companion(&self, mna: &mut MnaSystem, h: f64) {
        let geq = h / self.inductance;
        mna.stamp_conductance(self.node_pos.matrix_index(), self.node_neg.matrix_index(), geq);
        mna.stamp_current_source(
            self.node_pos.matrix_index(),
            self.node_neg.matrix_index(),
            self.i_prev,
        );
    }

    /// Branch current implied by the companion model at terminal voltage `v`.
    pub fn current(&self, v: f64, h: f64) -> f64 {
        h / self.inductance * v + self.i_prev
    }

    /// Accumulate the post-step branch current and terminal voltage.
    pub fn update_state(&mut self, v: f64, h: f64) {
        self.i_prev = self.current(v, h);
        self.v_prev = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltaic_core::NodeId;

    #[test]
    fn capacitor_companion_stamp() {
        let mut cap = Capacitor::new("C1", NodeId::new(1), NodeId::GROUND, 1e-6);
        cap.v_prev = 2.5;

        let mut mna = MnaSystem::new(1, 0);
        let h = 1e-6;
        cap.stamp_companion(&mut mna, h);

        // Geq = C/h = 1.0, Ieq = Geq * v_prev = 2.5 into the positive node.
        assert!((mna.matrix()[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((mna.rhs()[0] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn capacitor_state_update_is_backward_euler() {
        let mut cap = Capacitor::new("C1", NodeId::new(1), NodeId::GROUND, 2e-6);
        cap.update_state(1.0, 1e-6);
        assert!((cap.v_prev - 1.0).abs() < 1e-12);
        assert!((cap.i_prev - 2.0).abs() < 1e-12); // C/h * dv = 2

        cap.update_state(1.0, 1e-6);
        assert!(cap.i_prev.abs() < 1e-12); // no further change, no current
    }

    #[test]
    fn inductor_companion_stamp_and_accumulation() {
        let mut ind = Inductor::new("L1", NodeId::new(1), NodeId::GROUND, 1e-3);
        ind.i_prev = 0.25;

        let mut mna = MnaSystem::new(1, 0);
        let h = 1e-6;
        ind.stamp_companion(&mut mna, h);

        // Geq = h/L = 1e-3; i_prev leaves the positive node.
        assert!((mna.matrix()[(0, 0)] - 1e-3).abs() < 1e-15);
        assert!((mna.rhs()[0] + 0.25).abs() < 1e-12);

        ind.update_state(2.0, h);
        assert!((ind.i_prev - (0.25 + 1e-3 * 2.0)).abs() < 1e-12);
        assert!((ind.v_prev - 2.0).abs() < 1e-12);
    }
}
