//! The transient engine: time grid, companion stamping, Newton iteration,
//! recording, and state update.

use indexmap::IndexMap;
use nalgebra::DVector;

use voltaic_core::{MnaSystem, NodeId, EPSILON};
use voltaic_devices::Circuit;

use crate::error::{Error, Result};
use crate::linear::solve_dense;

use super::result::TranResult;

/// Newton iteration budget per time step.
pub const MAX_NEWTON_ITERATIONS: usize = 20;

/// Convergence threshold on the infinity norm between successive iterates.
pub const NEWTON_TOLERANCE: f64 = 1e-6;

/// Run transient analysis if the circuit requests one.
///
/// Mutates the element state fields (`v_prev`, `i_prev`, `vd_prev`,
/// `is_on`) as the simulation advances; everything else in the circuit is
/// left alone.
pub fn run_tran(circuit: &mut Circuit) -> Result<Option<TranResult>> {
    let Some(params) = circuit.tran.clone() else {
        return Ok(None);
    };
    if params.tstop <= 0.0 {
        return Err(Error::BadInput(format!(
            ".tran requires tstop > 0, got {}",
            params.tstop
        )));
    }
    if params.tstep < 0.0 {
        return Err(Error::BadInput(format!(
            ".tran requires tstep >= 0, got {}",
            params.tstep
        )));
    }

    // Effective step: the request when meaningful, otherwise a 1000-point
    // default; the grid is then renormalized to land exactly on tstop.
    let dt_requested = if params.tstep > EPSILON {
        params.tstep
    } else {
        (params.tstop / 1000.0).max(EPSILON)
    };
    // The relative guard keeps a near-integer ratio from rounding up into a
    // spurious extra step.
    let steps = ((params.tstop / dt_requested) * (1.0 - 1e-12)).ceil().max(1.0) as usize;
    let h = params.tstop / steps as f64;
    log::debug!(
        "tran: {} steps of {:.3e} s to {:.3e} s, {} unknowns",
        steps,
        h,
        params.tstop,
        circuit.mna_size()
    );

    let mut sys = MnaSystem::new(circuit.num_nodes(), circuit.num_vsources());
    let mut x = DVector::zeros(circuit.mna_size());

    let mut times = Vec::with_capacity(steps);
    let mut node_voltages: IndexMap<String, Vec<f64>> = circuit
        .nodes
        .iter_unknowns()
        .map(|(_, name)| (name.to_string(), Vec::with_capacity(steps)))
        .collect();
    let mut element_currents: IndexMap<String, Vec<f64>> = element_names(circuit)
        .map(|name| (name.to_string(), Vec::with_capacity(steps)))
        .collect();

    for step in 1..=steps {
        let t = step as f64 * h;
        x = newton_solve(circuit, &mut sys, x, t, h)?;
        record(
            circuit,
            &x,
            t,
            h,
            &mut times,
            &mut node_voltages,
            &mut element_currents,
        );
        update_state(circuit, &x, h);
    }

    Ok(Some(TranResult {
        times,
        node_voltages: apply_probes(node_voltages, &circuit.probes),
        element_currents,
    }))
}

/// Solve one time step: reassemble, solve, and re-linearize until the
/// iterate settles and no switch toggles.
fn newton_solve(
    circuit: &mut Circuit,
    sys: &mut MnaSystem,
    mut x: DVector<f64>,
    t: f64,
    h: f64,
) -> Result<DVector<f64>> {
    for iter in 0..MAX_NEWTON_ITERATIONS {
        sys.clear();

        for r in &circuit.resistors {
            r.stamp(sys);
        }
        for c in &circuit.capacitors {
            c.stamp_companion(sys, h);
        }
        for l in &circuit.inductors {
            l.stamp_companion(sys, h);
        }
        for s in &circuit.switches {
            sys.stamp_conductance(
                s.node_pos.matrix_index(),
                s.node_neg.matrix_index(),
                s.conductance(),
            );
        }
        for d in &circuit.diodes {
            // Iteration 0 re-seeds from the previous step; afterwards the
            // junction voltage comes from the latest iterate.
            let vd = if iter == 0 {
                d.vd_prev
            } else {
                branch_voltage(&x, d.node_pos, d.node_neg)
            };
            let (gd, ieq) = d.linearize(vd);
            sys.stamp_conductance(d.node_pos.matrix_index(), d.node_neg.matrix_index(), gd);
            sys.stamp_current_source(d.node_pos.matrix_index(), d.node_neg.matrix_index(), ieq);
        }
        for v in &circuit.vsources {
            sys.stamp_voltage_source(
                v.node_pos.matrix_index(),
                v.node_neg.matrix_index(),
                v.branch_index,
                v.value_at(t),
            );
        }

        let x_next = solve_dense(sys.matrix(), sys.rhs())?;

        // A toggled switch changes the topology, so the iterate that caused
        // it cannot be accepted; assembly must run again.
        let mut toggled = false;
        for s in &mut circuit.switches {
            let vc = branch_voltage(&x_next, s.ctrl_pos, s.ctrl_neg);
            toggled |= s.update_state(vc);
        }

        let delta = x_next
            .iter()
            .zip(x.iter())
            .fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs()));
        x = x_next;

        if !toggled && delta < NEWTON_TOLERANCE {
            log::trace!("tran: t = {:.6e} s converged in {} iterations", t, iter + 1);
            return Ok(x);
        }
    }

    Err(Error::NewtonNonConvergence {
        time: t,
        iterations: MAX_NEWTON_ITERATIONS,
    })
}

/// Append the converged step to the output series. Runs before the state
/// update so the companion formulas still see the previous-step state.
fn record(
    circuit: &Circuit,
    x: &DVector<f64>,
    t: f64,
    h: f64,
    times: &mut Vec<f64>,
    node_voltages: &mut IndexMap<String, Vec<f64>>,
    element_currents: &mut IndexMap<String, Vec<f64>>,
) {
    times.push(t);

    for (id, name) in circuit.nodes.iter_unknowns() {
        let v = x[id.matrix_index().expect("non-ground node")];
        node_voltages.get_mut(name).expect("preallocated").push(v);
    }

    for r in &circuit.resistors {
        let v = branch_voltage(x, r.node_pos, r.node_neg);
        element_currents[&r.name].push(v / r.resistance);
    }
    for c in &circuit.capacitors {
        let v = branch_voltage(x, c.node_pos, c.node_neg);
        element_currents[&c.name].push(c.current(v, h));
    }
    for l in &circuit.inductors {
        let v = branch_voltage(x, l.node_pos, l.node_neg);
        element_currents[&l.name].push(l.current(v, h));
    }
    for vsrc in &circuit.vsources {
        element_currents[&vsrc.name].push(x[vsrc.branch_index]);
    }
    for s in &circuit.switches {
        let v = branch_voltage(x, s.node_pos, s.node_neg);
        element_currents[&s.name].push(v / s.effective_resistance());
    }
    for d in &circuit.diodes {
        let v = branch_voltage(x, d.node_pos, d.node_neg);
        element_currents[&d.name].push(d.current(v));
    }
}

/// Commit post-step element state (backward Euler throughout).
fn update_state(circuit: &mut Circuit, x: &DVector<f64>, h: f64) {
    for c in &mut circuit.capacitors {
        let v = branch_voltage(x, c.node_pos, c.node_neg);
        c.update_state(v, h);
    }
    for l in &mut circuit.inductors {
        let v = branch_voltage(x, l.node_pos, l.node_neg);
        l.update_state(v, h);
    }
    for d in &mut circuit.diodes {
        d.vd_prev = branch_voltage(x, d.node_pos, d.node_neg);
    }
}

/// Keep only probed node series, matching case-insensitively while the
/// output keys keep the node's original casing.
fn apply_probes(
    node_voltages: IndexMap<String, Vec<f64>>,
    probes: &[String],
) -> IndexMap<String, Vec<f64>> {
    if probes.is_empty() {
        return node_voltages;
    }
    let wanted: Vec<String> = probes.iter().map(|p| p.to_uppercase()).collect();
    node_voltages
        .into_iter()
        .filter(|(name, _)| wanted.contains(&name.to_uppercase()))
        .collect()
}

fn element_names(circuit: &Circuit) -> impl Iterator<Item = &str> {
    circuit
        .resistors
        .iter()
        .map(|e| e.name.as_str())
        .chain(circuit.capacitors.iter().map(|e| e.name.as_str()))
        .chain(circuit.inductors.iter().map(|e| e.name.as_str()))
        .chain(circuit.vsources.iter().map(|e| e.name.as_str()))
        .chain(circuit.switches.iter().map(|e| e.name.as_str()))
        .chain(circuit.diodes.iter().map(|e| e.name.as_str()))
}

fn branch_voltage(x: &DVector<f64>, pos: NodeId, neg: NodeId) -> f64 {
    let vp = pos.matrix_index().map(|i| x[i]).unwrap_or(0.0);
    let vn = neg.matrix_index().map(|i| x[i]).unwrap_or(0.0);
    vp - vn
}
