//! Voltage-controlled switches.

use voltaic_core::{NodeId, EPSILON};

/// State-change deadband around the switching thresholds.
pub const SWITCH_TOLERANCE: f64 = 1e-6;

/// Switch model parameters (`.model name SW|VSWITCH`).
///
/// `von > voff` gives the hysteresis that keeps a switch from chattering;
/// the parser's `Vt`/`Vh` form guarantees it by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchModel {
    pub ron: f64,
    pub roff: f64,
    pub von: f64,
    pub voff: f64,
}

impl SwitchModel {
    /// Build thresholds from a center voltage and a hysteresis width:
    /// `von = vt + vh/2`, `voff = vt - vh/2`.
    pub fn from_threshold(vt: f64, vh: f64) -> Self {
        SwitchModel {
            von: vt + vh / 2.0,
            voff: vt - vh / 2.0,
            ..Default::default()
        }
    }
}

impl Default for SwitchModel {
    fn default() -> Self {
        SwitchModel {
            ron: 1.0,
            roff: 1e12,
            von: 1.0,
            voff: 0.0,
        }
    }
}

/// Voltage-controlled switch (S element).
///
/// `is_on` is the one bit of discrete state; it persists across Newton
/// iterations and time steps, starting OFF.
#[derive(Debug, Clone)]
pub struct VSwitch {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub ctrl_pos: NodeId,
    pub ctrl_neg: NodeId,
    pub model: SwitchModel,
    pub is_on: bool,
}

impl VSwitch {
    pub fn new(
        name: impl Into<String>,
        node_pos: NodeId,
        node_neg: NodeId,
        ctrl_pos: NodeId,
        ctrl_neg: NodeId,
        model: SwitchModel,
    ) -> Self {
        VSwitch {
            name: name.into(),
            node_pos,
            node_neg,
            ctrl_pos,
            ctrl_neg,
            model,
            is_on: false,
        }
    }

    /// Resistance presented at the terminals in the current state, floored
    /// away from zero.
    pub fn effective_resistance(&self) -> f64 {
        let r = if self.is_on {
            self.model.ron
        } else {
            self.model.roff
        };
        r.abs().max(EPSILON)
    }

    pub fn conductance(&self) -> f64 {
        1.0 / self.effective_resistance()
    }

    /// Apply the control voltage from the latest Newton iterate.
    /// Returns true when the state toggled, which invalidates the iterate.
    pub fn update_state(&mut self, vc: f64) -> bool {
        if self.is_on && vc <= self.model.voff + SWITCH_TOLERANCE {
            self.is_on = false;
            true
        } else if !self.is_on && vc >= self.model.von - SWITCH_TOLERANCE {
            self.is_on = true;
            true
        } else {
            false
        }
    }
}
