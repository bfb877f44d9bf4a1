//! Shockley diodes and their Newton linearization.

use voltaic_core::NodeId;

/// Thermal voltage kT/q at roughly 300 K (V).
pub const THERMAL_VOLTAGE: f64 = 0.02585;

/// Floor on the linearized diode conductance (S). Keeps a deeply
/// reverse-biased diode from zeroing out its matrix row.
pub const GMIN: f64 = 1e-12;

/// Soft limit on the junction voltage before the exponential is evaluated.
/// Substitutes for proper pn-junction voltage limiting.
const VD_MIN: f64 = -1.0;
const VD_MAX: f64 = 0.8;

/// Diode model parameters (`.model name D`).
#[derive(Debug, Clone, PartialEq)]
pub struct DiodeModel {
    /// Saturation current Is (A).
    pub saturation_current: f64,
    /// Emission coefficient N.
    pub emission_coefficient: f64,
}

impl DiodeModel {
    /// Effective thermal voltage `N * Vth`.
    pub fn thermal(&self) -> f64 {
        self.emission_coefficient * THERMAL_VOLTAGE
    }
}

impl Default for DiodeModel {
    fn default() -> Self {
        DiodeModel {
            saturation_current: 1e-14,
            emission_coefficient: 1.0,
        }
    }
}

/// Shockley diode: `i = Is * (exp(vd / (N * Vth)) - 1)`.
#[derive(Debug, Clone)]
pub struct Diode {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub model: DiodeModel,
    /// Junction voltage at the previous timestep; seeds Newton iteration 0.
    pub vd_prev: f64,
}

impl Diode {
    pub fn new(name: impl Into<String>, node_pos: NodeId, node_neg: NodeId, model: DiodeModel) -> Self {
        Diode {
            name: name.into(),
            node_pos,
            node_neg,
            model,
            vd_prev: 0.0,
        }
    }

    /// Linearize around the junction voltage `vd`.
    ///
    /// Returns `(gd, ieq)`: the small-signal conductance to stamp between
    /// the terminals and the companion current to inject from anode to
    /// cathode. The exponent sees `vd` clamped to [-1.0, 0.8] so a wild
    /// Newton iterate cannot overflow the double; `ieq` uses the same
    /// clamped operating point so the companion pair stays consistent.
    pub fn linearize(&self, vd: f64) -> (f64, f64) {
        let vt = self.model.thermal();
        let v = vd.clamp(VD_MIN, VD_MAX);
        let expv = (v / vt).exp();
        let gd = (self.model.saturation_current / vt * expv).max(GMIN);
        let id = self.model.saturation_current * (expv - 1.0);
        (gd, id - gd * v)
    }

    /// Diode current at the (unclamped) junction voltage `vd`.
    pub fn current(&self, vd: f64) -> f64 {
        self.model.saturation_current * ((vd / self.model.thermal()).exp() - 1.0)
    }
}
