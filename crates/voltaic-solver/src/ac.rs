//! Small-signal AC analysis.
//!
//! For every frequency in the sweep a fresh complex MNA system is
//! assembled, solved, and unpacked into phasor node voltages and element
//! currents. Switches and diodes have no small-signal model in this system
//! and take no part in AC; DC-only sources stamp a zero phasor, which
//! shorts them.

use indexmap::IndexMap;
use num_complex::Complex;

use voltaic_core::{checked_recip, ComplexMnaSystem, NodeId, EPSILON};
use voltaic_devices::{AcSweep, AcSweepType, Circuit};

use crate::error::{Error, Result};
use crate::linear::solve_complex;

/// Result of an AC sweep. Every series has `freqs.len()` entries.
#[derive(Debug, Clone)]
pub struct AcResult {
    pub freqs: Vec<f64>,
    pub node_voltages: IndexMap<String, Vec<Complex<f64>>>,
    pub element_currents: IndexMap<String, Vec<Complex<f64>>>,
}

impl AcResult {
    /// Phasor series for a node, looked up case-insensitively.
    pub fn voltage(&self, node: &str) -> Option<&[Complex<f64>]> {
        self.node_voltages
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(node))
            .map(|(_, series)| series.as_slice())
    }
}

/// Run AC analysis if the circuit requests one.
pub fn run_ac(circuit: &Circuit) -> Result<Option<AcResult>> {
    let Some(sweep) = &circuit.ac else {
        return Ok(None);
    };
    let freqs = frequency_points(sweep)?;
    log::debug!(
        "ac: {} frequencies in [{:.3e}, {:.3e}] Hz, {} unknowns",
        freqs.len(),
        sweep.fstart,
        sweep.fstop,
        circuit.mna_size()
    );

    let mut node_voltages: IndexMap<String, Vec<Complex<f64>>> = circuit
        .nodes
        .iter_unknowns()
        .map(|(_, name)| (name.to_string(), Vec::with_capacity(freqs.len())))
        .collect();
    let mut element_currents: IndexMap<String, Vec<Complex<f64>>> = IndexMap::new();
    for r in &circuit.resistors {
        element_currents.insert(r.name.clone(), Vec::with_capacity(freqs.len()));
    }
    for c in &circuit.capacitors {
        element_currents.insert(c.name.clone(), Vec::with_capacity(freqs.len()));
    }
    for l in &circuit.inductors {
        element_currents.insert(l.name.clone(), Vec::with_capacity(freqs.len()));
    }
    for v in &circuit.vsources {
        element_currents.insert(v.name.clone(), Vec::with_capacity(freqs.len()));
    }

    let mut sys = ComplexMnaSystem::new(circuit.num_nodes(), circuit.num_vsources());

    for &f in &freqs {
        sys.clear();
        let omega = 2.0 * std::f64::consts::PI * f;
        stamp_at_frequency(circuit, &mut sys, omega)?;

        let x = solve_complex(sys.matrix(), sys.rhs())?;

        for (id, name) in circuit.nodes.iter_unknowns() {
            let v = x[id.matrix_index().expect("non-ground node")];
            node_voltages.get_mut(name).expect("preallocated").push(v);
        }

        for r in &circuit.resistors {
            let y = Complex::new(1.0 / r.resistance, 0.0);
            let i = y * branch_voltage(&x, r.node_pos, r.node_neg);
            element_currents[&r.name].push(i);
        }
        for c in &circuit.capacitors {
            let y = Complex::new(0.0, omega * c.capacitance);
            let i = y * branch_voltage(&x, c.node_pos, c.node_neg);
            element_currents[&c.name].push(i);
        }
        for l in &circuit.inductors {
            let y = inductor_admittance(l.inductance, omega);
            let i = y * branch_voltage(&x, l.node_pos, l.node_neg);
            element_currents[&l.name].push(i);
        }
        for v in &circuit.vsources {
            element_currents[&v.name].push(x[v.branch_index]);
        }
    }

    Ok(Some(AcResult {
        freqs,
        node_voltages,
        element_currents,
    }))
}

/// Expand an AC sweep into its frequency list.
pub fn frequency_points(sweep: &AcSweep) -> Result<Vec<f64>> {
    if sweep.fstart <= 0.0 || sweep.fstop <= 0.0 {
        return Err(Error::BadInput(format!(
            ".ac requires positive frequencies, got [{}, {}]",
            sweep.fstart, sweep.fstop
        )));
    }
    match sweep.sweep_type {
        AcSweepType::Dec => {
            if sweep.num_points < 1 {
                return Err(Error::BadInput(
                    ".ac dec requires at least 1 point per decade".to_string(),
                ));
            }
            let decades = (sweep.fstop / sweep.fstart).log10();
            let n = (decades * sweep.num_points as f64).ceil().max(1.0) as usize;
            let mut freqs: Vec<f64> = (0..=n)
                .map(|i| sweep.fstart * 10f64.powf(i as f64 / sweep.num_points as f64))
                .collect();
            if *freqs.last().expect("non-empty") < sweep.fstop * (1.0 - EPSILON) {
                freqs.push(sweep.fstop);
            }
            Ok(freqs)
        }
        AcSweepType::Lin => {
            if sweep.num_points < 2 {
                return Err(Error::BadInput(
                    ".ac lin requires at least 2 points".to_string(),
                ));
            }
            let n = sweep.num_points;
            let step = (sweep.fstop - sweep.fstart) / (n - 1) as f64;
            Ok((0..n).map(|i| sweep.fstart + step * i as f64).collect())
        }
    }
}

fn stamp_at_frequency(circuit: &Circuit, sys: &mut ComplexMnaSystem, omega: f64) -> Result<()> {
    for r in &circuit.resistors {
        if r.resistance <= 0.0 {
            return Err(Error::BadElementValue {
                name: r.name.clone(),
                value: r.resistance,
                reason: "resistance must be positive",
            });
        }
        sys.stamp_admittance(
            r.node_pos.matrix_index(),
            r.node_neg.matrix_index(),
            Complex::new(1.0 / r.resistance, 0.0),
        );
    }
    for c in &circuit.capacitors {
        sys.stamp_admittance(
            c.node_pos.matrix_index(),
            c.node_neg.matrix_index(),
            Complex::new(0.0, omega * c.capacitance),
        );
    }
    for l in &circuit.inductors {
        sys.stamp_admittance(
            l.node_pos.matrix_index(),
            l.node_neg.matrix_index(),
            inductor_admittance(l.inductance, omega),
        );
    }
    for v in &circuit.vsources {
        sys.stamp_voltage_source(
            v.node_pos.matrix_index(),
            v.node_neg.matrix_index(),
            v.branch_index,
            v.ac_phasor(),
        );
    }
    Ok(())
}

/// `1/(jwL)`, or zero when the impedance is degenerate (f or L near zero).
fn inductor_admittance(inductance: f64, omega: f64) -> Complex<f64> {
    checked_recip(Complex::new(0.0, omega * inductance)).unwrap_or_default()
}

fn branch_voltage(
    x: &nalgebra::DVector<Complex<f64>>,
    pos: NodeId,
    neg: NodeId,
) -> Complex<f64> {
    let vp = pos.matrix_index().map(|i| x[i]).unwrap_or_default();
    let vn = neg.matrix_index().map(|i| x[i]).unwrap_or_default();
    vp - vn
}
