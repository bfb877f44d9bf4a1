//! Independent voltage sources.

use num_complex::Complex;
use voltaic_core::{polar_deg, NodeId};

use crate::waveforms::Waveform;

/// Independent voltage source.
///
/// Carries a DC value, an AC phasor (magnitude and phase in degrees), and an
/// optional time-domain waveform. `branch_index` is the source's
/// branch-current slot in the MNA system, assigned by
/// [`Circuit::finalize`](crate::Circuit::finalize) before any analysis runs.
#[derive(Debug, Clone)]
pub struct VoltageSource {
    pub name: String,
    pub node_pos: NodeId,
    pub node_neg: NodeId,
    pub dc: f64,
    pub ac_mag: f64,
    pub ac_phase_deg: f64,
    pub waveform: Option<Waveform>,
    pub branch_index: usize,
}

impl VoltageSource {
    pub fn new(name: impl Into<String>, node_pos: NodeId, node_neg: NodeId, dc: f64) -> Self {
        VoltageSource {
            name: name.into(),
            node_pos,
            node_neg,
            dc,
            ac_mag: 0.0,
            ac_phase_deg: 0.0,
            waveform: None,
            branch_index: 0,
        }
    }

    /// Instantaneous value at time `t`: the waveform when one is attached,
    /// the DC value otherwise.
    pub fn value_at(&self, t: f64) -> f64 {
        match &self.waveform {
            Some(w) => w.value_at(t),
            None => self.dc,
        }
    }

    /// Small-signal phasor. DC-only sources yield zero, which shorts them
    /// for AC analysis.
    pub fn ac_phasor(&self) -> Complex<f64> {
        polar_deg(self.ac_mag, self.ac_phase_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_source_value_ignores_time() {
        let v = VoltageSource::new("V1", NodeId::new(1), NodeId::GROUND, 10.0);
        assert_eq!(v.value_at(0.0), 10.0);
        assert_eq!(v.value_at(1.0), 10.0);
    }

    #[test]
    fn waveform_overrides_dc() {
        let mut v = VoltageSource::new("V1", NodeId::new(1), NodeId::GROUND, 10.0);
        v.waveform = Some(Waveform::pwl(vec![(0.0, 0.0), (1.0, 2.0)]));
        assert!((v.value_at(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn dc_only_source_has_zero_phasor() {
        let v = VoltageSource::new("V1", NodeId::new(1), NodeId::GROUND, 10.0);
        assert_eq!(v.ac_phasor().norm(), 0.0);
    }

    #[test]
    fn ac_phasor_from_polar() {
        let mut v = VoltageSource::new("V1", NodeId::new(1), NodeId::GROUND, 0.0);
        v.ac_mag = 2.0;
        v.ac_phase_deg = 90.0;
        let p = v.ac_phasor();
        assert!(p.re.abs() < 1e-12);
        assert!((p.im - 2.0).abs() < 1e-12);
    }
}
