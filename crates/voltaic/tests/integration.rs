//! End-to-end tests: netlist text in, analysis results out.

use voltaic::{simulate, SimulateError};

#[test]
fn resistive_divider_dc() {
    let netlist = "V1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 1k\n.tran 1u 1u\n.end\n";

    let result = simulate(netlist).unwrap();
    let tran = result.tran.expect("transient requested");

    let v2 = tran.voltage("2").expect("V(2) should exist");
    assert!(
        (v2.last().unwrap() - 5.0).abs() < 1e-9,
        "V(2) should be 5.0, got {}",
        v2.last().unwrap()
    );
}

#[test]
fn rc_lowpass_step_response() {
    let netlist = "\
V1 1 0 PULSE(0 5 0 1n 1n 5u 10u)
R1 1 2 1k
C1 2 0 1u
.tran 0.1u 20u
.end
";
    let result = simulate(netlist).unwrap();
    let tran = result.tran.unwrap();

    let v2 = tran.voltage("2").unwrap();
    assert!(v2[0] < 0.01, "output starts from rest, got {}", v2[0]);

    // tau = 1 ms; during the first pulse the discrete solution must track
    // 5 * (1 - exp(-t/tau)) within 50 mV.
    for (t, v) in tran.times.iter().zip(v2.iter()) {
        if *t > 5e-6 {
            break;
        }
        let analytic = 5.0 * (1.0 - (-t / 1e-3).exp());
        assert!(
            (v - analytic).abs() < 0.05,
            "t = {t}: V(2) = {v}, analytic = {analytic}"
        );
    }

    let v1 = tran.voltage("1").unwrap();
    assert!((v1[10] - 5.0).abs() < 1e-9, "drive should sit at 5 V");
}

#[test]
fn single_pole_ac_magnitude_and_phase() {
    let netlist = "\
V1 1 0 AC 1
R1 1 2 30
C1 2 0 100u
.ac dec 100 1 100
.end
";
    let result = simulate(netlist).unwrap();
    let ac = result.ac.expect("ac requested");

    let v2 = ac.voltage("2").expect("V(2) should exist");
    assert!((ac.freqs[0] - 1.0).abs() < 1e-12);

    let mag = v2[0].norm();
    let phase_deg = v2[0].arg().to_degrees();
    assert!((mag - 0.999822).abs() < 1e-4, "|V(2)| at 1 Hz = {mag}");
    assert!((phase_deg + 1.08).abs() < 0.01, "phase at 1 Hz = {phase_deg}");
}

#[test]
fn switch_hysteresis() {
    let netlist = "\
V1 c 0 PWL(0 0 1m 5 3m 0 7m 5 9m 0)
V2 vs 0 DC 5
R1 vs out 1k
C1 out 0 1u
S1 out 0 c 0 swmod
.model swmod VSWITCH(Ron=1 Roff=1e9 Von=2 Voff=1)
.tran 10u 10m
.end
";
    let result = simulate(netlist).unwrap();
    let tran = result.tran.unwrap();

    // Control ramp crosses Von at 0.4 ms: switch on, output shorted.
    assert!(tran.voltage_at("out", 0.5e-3).unwrap() < 0.05);
    // Control fell through Voff at 2.6 ms: output recharging, above 2 V.
    let v35 = tran.voltage_at("out", 3.5e-3).unwrap();
    assert!(v35 > 2.0, "V(out) at 3.5 ms = {v35}");
    assert!(tran.voltage_at("out", 3.6e-3).unwrap() > tran.voltage_at("out", 3.4e-3).unwrap());
    // Second ramp crosses Von at 4.6 ms: on again through 8.5 ms.
    assert!(tran.voltage_at("out", 8.5e-3).unwrap() < 0.05);
}

#[test]
fn diode_clamp_half_wave() {
    let forward = "\
V1 a 0 DC 1
D1 a k dclamp
R1 k 0 1k
.model dclamp D(Is=1e-14 N=1)
.tran 1u 1u
.end
";
    let result = simulate(forward).unwrap();
    let tran = result.tran.unwrap();
    let vk = *tran.voltage("k").unwrap().last().unwrap();
    let drop = 1.0 - vk;
    assert!((drop - 0.6).abs() < 0.1, "forward diode drop = {drop}");

    let reverse = forward.replace("DC 1", "DC -1");
    let result = simulate(&reverse).unwrap();
    let tran = result.tran.unwrap();
    let vk = *tran.voltage("k").unwrap().last().unwrap();
    assert!(vk.abs() < 1e-6, "reverse-biased cathode = {vk}");
}

#[test]
fn node_casing_round_trip() {
    let netlist = "\
V1 nOdE1 0 DC 2
R1 NODE1 mid 1k
R2 nOdE1 mid 1k
R3 mid 0 1k
.print TRAN V(NODE1)
.tran 1u 1u
.end
";
    let result = simulate(netlist).unwrap();
    let tran = result.tran.unwrap();

    // One node for all three spellings, keyed by the first-seen casing.
    assert_eq!(tran.node_voltages.len(), 1);
    assert!(tran.node_voltages.contains_key("nOdE1"));
    assert!((tran.voltage("node1").unwrap()[0] - 2.0).abs() < 1e-9);
}

#[test]
fn one_deck_can_request_both_analyses() {
    let netlist = "\
V1 1 0 DC 1 AC 1
R1 1 2 1k
C1 2 0 1u
.ac lin 11 100 1000
.tran 10u 1m
.end
";
    let result = simulate(netlist).unwrap();
    let ac = result.ac.expect("ac requested");
    let tran = result.tran.expect("tran requested");

    assert_eq!(ac.freqs.len(), 11);
    for series in ac.node_voltages.values() {
        assert_eq!(series.len(), ac.freqs.len());
    }
    for series in ac.element_currents.values() {
        assert_eq!(series.len(), ac.freqs.len());
    }
    for series in tran.node_voltages.values() {
        assert_eq!(series.len(), tran.times.len());
    }
    for series in tran.element_currents.values() {
        assert_eq!(series.len(), tran.times.len());
    }
}

#[test]
fn unknown_model_surfaces_as_parse_error() {
    let result = simulate("D1 a k ghost\nR1 k 0 1k\n.tran 1u 1u\n");
    assert!(matches!(result, Err(SimulateError::Parse(_))));
}

#[test]
fn singular_system_surfaces_as_solve_error() {
    let result = simulate("R1 1 2 1k\n.tran 1u 1u\n");
    assert!(matches!(result, Err(SimulateError::Solve(_))));
}
