//! Netlist text to [`Circuit`].
//!
//! Parsing runs in two passes over the logical lines: `.model` cards first
//! so elements can resolve their models wherever the cards appear, then
//! everything else in netlist order. Node names register with the circuit's
//! case-insensitive index as they are seen.

use std::collections::HashMap;

use voltaic_devices::{
    AcSweep, AcSweepType, Capacitor, Circuit, Diode, DiodeModel, Inductor, Resistor, SwitchModel,
    TranParams, VSwitch, VoltageSource, Waveform,
};

use crate::error::{Error, Result};
use crate::value::parse_value;

#[derive(Debug, Clone)]
enum ModelCard {
    Switch(SwitchModel),
    Diode(DiodeModel),
}

/// Parse a netlist and return a finalized circuit.
pub fn parse_netlist(text: &str) -> Result<Circuit> {
    let lines = logical_lines(text)?;
    let models = collect_models(&lines)?;

    let mut circuit = Circuit::new();

    for (line_no, line) in &lines {
        let tokens = tokenize(line);
        let Some(first) = tokens.first() else {
            continue;
        };

        if let Some(directive) = first.strip_prefix('.') {
            match directive.to_uppercase().as_str() {
                "MODEL" => {} // consumed by the first pass
                "AC" => parse_ac(&mut circuit, &tokens, *line_no)?,
                "TRAN" => parse_tran(&mut circuit, &tokens, *line_no)?,
                "PRINT" => parse_print(&mut circuit, &tokens),
                "END" => break,
                other => {
                    return Err(err(*line_no, format!("unsupported directive '.{other}'")));
                }
            }
            continue;
        }

        match first
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_default()
        {
            'R' => parse_resistor(&mut circuit, &tokens, *line_no)?,
            'C' => parse_capacitor(&mut circuit, &tokens, *line_no)?,
            'L' => parse_inductor(&mut circuit, &tokens, *line_no)?,
            'V' => parse_vsource(&mut circuit, &tokens, *line_no)?,
            'S' => parse_switch(&mut circuit, &tokens, *line_no, &models)?,
            'D' => parse_diode(&mut circuit, &tokens, *line_no, &models)?,
            other => {
                return Err(err(*line_no, format!("unsupported element '{other}'")));
            }
        }
    }

    circuit.finalize();
    Ok(circuit)
}

/// Strip comments, drop blanks, and fold `+` continuations into their card.
fn logical_lines(text: &str) -> Result<Vec<(usize, String)>> {
    let mut out: Vec<(usize, String)> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let uncommented = match raw.find(';') {
            Some(p) => &raw[..p],
            None => raw,
        };
        let trimmed = uncommented.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('+') {
            match out.last_mut() {
                Some((_, prev)) => {
                    prev.push(' ');
                    prev.push_str(rest);
                }
                None => return Err(err(line_no, "continuation with no preceding card".into())),
            }
            continue;
        }
        out.push((line_no, trimmed.to_string()));
    }
    Ok(out)
}

/// Split a card into tokens, with `(`, `)`, `=`, and `,` as their own
/// tokens so `PULSE(0 5)` and `Ron=1` need no special spacing.
fn tokenize(line: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(line.len() + 8);
    for ch in line.chars() {
        match ch {
            '(' | ')' | '=' | ',' => {
                spaced.push(' ');
                spaced.push(ch);
                spaced.push(' ');
            }
            _ => spaced.push(ch),
        }
    }
    spaced.split_whitespace().map(String::from).collect()
}

fn err(line: usize, message: String) -> Error {
    Error::Parse { line, message }
}

fn number(token: &str, line: usize) -> Result<f64> {
    parse_value(token).map_err(|_| err(line, format!("invalid value '{token}'")))
}

// ────────────────────── .model cards ──────────────────────

fn collect_models(lines: &[(usize, String)]) -> Result<HashMap<String, ModelCard>> {
    let mut models = HashMap::new();
    for (line_no, line) in lines {
        let tokens = tokenize(line);
        let is_model = tokens
            .first()
            .is_some_and(|t| t.eq_ignore_ascii_case(".model"));
        if !is_model {
            continue;
        }
        if tokens.len() < 3 {
            return Err(err(*line_no, ".model requires a name and a type".into()));
        }
        let name = tokens[1].to_lowercase();
        let kind = tokens[2].to_uppercase();
        let params = key_value_pairs(&tokens[3..], *line_no)?;

        let card = match kind.as_str() {
            "SW" | "VSWITCH" => ModelCard::Switch(switch_model(&params, *line_no)?),
            "D" => ModelCard::Diode(diode_model(&params, *line_no)?),
            other => {
                return Err(err(*line_no, format!("unsupported model type '{other}'")));
            }
        };
        models.insert(name, card);
    }
    Ok(models)
}

/// Collect `key = value` pairs from the tail of a `.model` card, ignoring
/// the optional surrounding parentheses.
fn key_value_pairs(tokens: &[String], line: usize) -> Result<Vec<(String, f64)>> {
    let mut pairs = Vec::new();
    let mut iter = tokens
        .iter()
        .filter(|t| !matches!(t.as_str(), "(" | ")" | ","))
        .peekable();
    while let Some(key) = iter.next() {
        if key == "=" {
            return Err(err(line, "stray '=' in model parameters".into()));
        }
        match iter.next() {
            Some(eq) if eq == "=" => {}
            _ => return Err(err(line, format!("expected '=' after '{key}'"))),
        }
        let Some(value) = iter.next() else {
            return Err(err(line, format!("missing value for '{key}'")));
        };
        pairs.push((key.to_lowercase(), number(value, line)?));
    }
    Ok(pairs)
}

fn switch_model(params: &[(String, f64)], line: usize) -> Result<SwitchModel> {
    let mut model = SwitchModel::default();
    let mut vt = None;
    let mut vh = None;
    for (key, value) in params {
        match key.as_str() {
            "ron" => model.ron = *value,
            "roff" => model.roff = *value,
            "von" => model.von = *value,
            "voff" => model.voff = *value,
            "vt" => vt = Some(*value),
            "vh" => vh = Some(*value),
            other => {
                return Err(err(line, format!("invalid switch model parameter '{other}'")));
            }
        }
    }
    if vt.is_some() || vh.is_some() {
        let thresholds = SwitchModel::from_threshold(vt.unwrap_or(0.0), vh.unwrap_or(0.0));
        model.von = thresholds.von;
        model.voff = thresholds.voff;
    }
    Ok(model)
}

fn diode_model(params: &[(String, f64)], line: usize) -> Result<DiodeModel> {
    let mut model = DiodeModel::default();
    for (key, value) in params {
        match key.as_str() {
            "is" => model.saturation_current = *value,
            "n" => model.emission_coefficient = *value,
            other => {
                return Err(err(line, format!("invalid diode model parameter '{other}'")));
            }
        }
    }
    Ok(model)
}

// ────────────────────── element lines ──────────────────────

fn two_nodes_and_value(
    circuit: &mut Circuit,
    tokens: &[String],
    line: usize,
) -> Result<(voltaic_core::NodeId, voltaic_core::NodeId, f64)> {
    if tokens.len() < 4 {
        return Err(err(
            line,
            format!("'{}' needs two nodes and a value", tokens[0]),
        ));
    }
    let n1 = circuit.nodes.get_or_create(&tokens[1]);
    let n2 = circuit.nodes.get_or_create(&tokens[2]);
    let value = number(&tokens[3], line)?;
    Ok((n1, n2, value))
}

fn parse_resistor(circuit: &mut Circuit, tokens: &[String], line: usize) -> Result<()> {
    let (n1, n2, value) = two_nodes_and_value(circuit, tokens, line)?;
    if value <= 0.0 {
        return Err(err(line, format!("resistance must be positive, got {value}")));
    }
    circuit
        .resistors
        .push(Resistor::new(tokens[0].clone(), n1, n2, value));
    Ok(())
}

fn parse_capacitor(circuit: &mut Circuit, tokens: &[String], line: usize) -> Result<()> {
    let (n1, n2, value) = two_nodes_and_value(circuit, tokens, line)?;
    circuit
        .capacitors
        .push(Capacitor::new(tokens[0].clone(), n1, n2, value));
    Ok(())
}

fn parse_inductor(circuit: &mut Circuit, tokens: &[String], line: usize) -> Result<()> {
    let (n1, n2, value) = two_nodes_and_value(circuit, tokens, line)?;
    circuit
        .inductors
        .push(Inductor::new(tokens[0].clone(), n1, n2, value));
    Ok(())
}

fn parse_vsource(circuit: &mut Circuit, tokens: &[String], line: usize) -> Result<()> {
    if tokens.len() < 3 {
        return Err(err(line, "voltage source needs two nodes".into()));
    }
    let n1 = circuit.nodes.get_or_create(&tokens[1]);
    let n2 = circuit.nodes.get_or_create(&tokens[2]);
    let mut source = VoltageSource::new(tokens[0].clone(), n1, n2, 0.0);

    let mut idx = 3;
    while idx < tokens.len() {
        let keyword = tokens[idx].to_uppercase();
        match keyword.as_str() {
            "DC" => {
                idx += 1;
                let Some(value) = tokens.get(idx) else {
                    return Err(err(line, "DC requires a value".into()));
                };
                source.dc = number(value, line)?;
                idx += 1;
            }
            "AC" => {
                idx += 1;
                let Some(mag) = tokens.get(idx) else {
                    return Err(err(line, "AC requires a magnitude".into()));
                };
                source.ac_mag = number(mag, line)?;
                idx += 1;
                // Optional phase in degrees.
                if let Some(phase) = tokens.get(idx) {
                    if let Ok(value) = parse_value(phase) {
                        source.ac_phase_deg = value;
                        idx += 1;
                    }
                }
            }
            "PULSE" => {
                let (values, next) = paren_values(tokens, idx + 1, line)?;
                if values.len() < 2 {
                    return Err(err(line, "PULSE requires at least V1 and V2".into()));
                }
                let get = |i: usize| values.get(i).copied().unwrap_or(0.0);
                source.waveform = Some(Waveform::Pulse {
                    v1: get(0),
                    v2: get(1),
                    delay: get(2),
                    rise: get(3),
                    fall: get(4),
                    width: get(5),
                    period: get(6),
                    ncycles: values.get(7).copied(),
                });
                idx = next;
            }
            "PWL" => {
                let (values, next) = paren_values(tokens, idx + 1, line)?;
                if values.len() < 2 || values.len() % 2 != 0 {
                    return Err(err(line, "PWL requires time/value pairs".into()));
                }
                let points = values.chunks(2).map(|p| (p[0], p[1])).collect();
                source.waveform = Some(Waveform::pwl(points));
                idx = next;
            }
            _ => {
                // A bare value directly after the nodes is a DC level.
                if idx == 3 {
                    source.dc = number(&tokens[idx], line)?;
                    idx += 1;
                } else {
                    return Err(err(line, format!("unexpected token '{}'", tokens[idx])));
                }
            }
        }
    }

    circuit.vsources.push(source);
    Ok(())
}

/// Read a `( v v ... )` group starting at `start`; returns the values and
/// the index just past the closing paren.
fn paren_values(tokens: &[String], start: usize, line: usize) -> Result<(Vec<f64>, usize)> {
    let mut idx = start;
    if tokens.get(idx).map(String::as_str) != Some("(") {
        return Err(err(line, "expected '('".into()));
    }
    idx += 1;
    let mut values = Vec::new();
    loop {
        match tokens.get(idx).map(String::as_str) {
            Some(")") => return Ok((values, idx + 1)),
            Some(",") => idx += 1,
            Some(token) => {
                values.push(number(token, line)?);
                idx += 1;
            }
            None => return Err(err(line, "unterminated '(' group".into())),
        }
    }
}

fn parse_switch(
    circuit: &mut Circuit,
    tokens: &[String],
    line: usize,
    models: &HashMap<String, ModelCard>,
) -> Result<()> {
    if tokens.len() < 6 {
        return Err(err(
            line,
            "switch needs two nodes, two control nodes, and a model".into(),
        ));
    }
    let n1 = circuit.nodes.get_or_create(&tokens[1]);
    let n2 = circuit.nodes.get_or_create(&tokens[2]);
    let nc1 = circuit.nodes.get_or_create(&tokens[3]);
    let nc2 = circuit.nodes.get_or_create(&tokens[4]);
    let model = match models.get(&tokens[5].to_lowercase()) {
        Some(ModelCard::Switch(m)) => m.clone(),
        Some(_) => {
            return Err(err(line, format!("'{}' is not a switch model", tokens[5])));
        }
        None => {
            return Err(Error::UnknownModel {
                line,
                name: tokens[5].clone(),
            });
        }
    };
    circuit
        .switches
        .push(VSwitch::new(tokens[0].clone(), n1, n2, nc1, nc2, model));
    Ok(())
}

fn parse_diode(
    circuit: &mut Circuit,
    tokens: &[String],
    line: usize,
    models: &HashMap<String, ModelCard>,
) -> Result<()> {
    if tokens.len() < 4 {
        return Err(err(line, "diode needs two nodes and a model".into()));
    }
    let n1 = circuit.nodes.get_or_create(&tokens[1]);
    let n2 = circuit.nodes.get_or_create(&tokens[2]);
    let model = match models.get(&tokens[3].to_lowercase()) {
        Some(ModelCard::Diode(m)) => m.clone(),
        Some(_) => {
            return Err(err(line, format!("'{}' is not a diode model", tokens[3])));
        }
        None => {
            return Err(Error::UnknownModel {
                line,
                name: tokens[3].clone(),
            });
        }
    };
    circuit
        .diodes
        .push(Diode::new(tokens[0].clone(), n1, n2, model));
    Ok(())
}

// ────────────────────── analysis cards ──────────────────────

fn parse_ac(circuit: &mut Circuit, tokens: &[String], line: usize) -> Result<()> {
    if tokens.len() < 5 {
        return Err(err(line, ".ac requires: DEC|LIN N fstart fstop".into()));
    }
    let sweep_type = match tokens[1].to_uppercase().as_str() {
        "DEC" => AcSweepType::Dec,
        "LIN" => AcSweepType::Lin,
        other => return Err(err(line, format!("unsupported sweep type '{other}'"))),
    };
    let num_points = number(&tokens[2], line)? as usize;
    if num_points == 0 {
        return Err(err(line, ".ac requires at least one point".into()));
    }
    circuit.ac = Some(AcSweep {
        sweep_type,
        num_points,
        fstart: number(&tokens[3], line)?,
        fstop: number(&tokens[4], line)?,
    });
    Ok(())
}

fn parse_tran(circuit: &mut Circuit, tokens: &[String], line: usize) -> Result<()> {
    if tokens.len() < 3 {
        return Err(err(line, ".tran requires: tstep tstop".into()));
    }
    circuit.tran = Some(TranParams {
        tstep: number(&tokens[1], line)?,
        tstop: number(&tokens[2], line)?,
    });
    Ok(())
}

/// `.print tran V(node)...` — collects node probes; anything that is not a
/// voltage probe is ignored.
fn parse_print(circuit: &mut Circuit, tokens: &[String]) {
    let mut idx = 1;
    while idx < tokens.len() {
        if tokens[idx].eq_ignore_ascii_case("v")
            && tokens.get(idx + 1).map(String::as_str) == Some("(")
        {
            if let Some(node) = tokens.get(idx + 2) {
                if node != ")" {
                    circuit.probes.push(node.clone());
                }
            }
            // Skip past the closing paren.
            while idx < tokens.len() && tokens[idx] != ")" {
                idx += 1;
            }
        }
        idx += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltaic_devices::Waveform;

    #[test]
    fn parses_resistive_divider() {
        let circuit = parse_netlist("V1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 1k\n.tran 1u 1u\n.end\n")
            .unwrap();

        assert_eq!(circuit.vsources.len(), 1);
        assert_eq!(circuit.resistors.len(), 2);
        assert_eq!(circuit.vsources[0].dc, 10.0);
        assert_eq!(circuit.resistors[0].resistance, 1e3);
        assert_eq!(circuit.num_nodes(), 2);

        let tran = circuit.tran.as_ref().unwrap();
        assert_eq!(tran.tstep, 1e-6);
        assert_eq!(tran.tstop, 1e-6);

        // Finalized: branch index follows the node unknowns.
        assert_eq!(circuit.vsources[0].branch_index, 2);
    }

    #[test]
    fn bare_value_after_nodes_is_dc() {
        let circuit = parse_netlist("V1 1 0 5\nR1 1 0 1k\n").unwrap();
        assert_eq!(circuit.vsources[0].dc, 5.0);
    }

    #[test]
    fn node_names_are_case_insensitive_first_casing_displayed() {
        let circuit =
            parse_netlist("V1 nOdE1 0 DC 1\nR1 NODE1 0 1k\nR2 node1 0 1k\n").unwrap();
        assert_eq!(circuit.num_nodes(), 1);
        let (id, name) = circuit.nodes.iter_unknowns().next().unwrap();
        assert_eq!(name, "nOdE1");
        assert_eq!(id.matrix_index(), Some(0));
    }

    #[test]
    fn parses_ac_source_and_sweep() {
        let circuit =
            parse_netlist("V1 1 0 AC 1 -30\nR1 1 2 30\nC1 2 0 100u\n.ac dec 100 1 100\n")
                .unwrap();

        assert_eq!(circuit.vsources[0].ac_mag, 1.0);
        assert_eq!(circuit.vsources[0].ac_phase_deg, -30.0);
        let ac = circuit.ac.as_ref().unwrap();
        assert_eq!(ac.sweep_type, AcSweepType::Dec);
        assert_eq!(ac.num_points, 100);
        assert_eq!(ac.fstart, 1.0);
        assert_eq!(ac.fstop, 100.0);
    }

    #[test]
    fn parses_pulse_waveform() {
        let circuit = parse_netlist("V1 1 0 PULSE(0 5 0 1n 1n 5u 10u)\nR1 1 0 1k\n").unwrap();
        match circuit.vsources[0].waveform.as_ref().unwrap() {
            Waveform::Pulse {
                v1,
                v2,
                width,
                period,
                ncycles,
                ..
            } => {
                assert_eq!(*v1, 0.0);
                assert_eq!(*v2, 5.0);
                assert_eq!(*width, 5e-6);
                assert_eq!(*period, 10e-6);
                assert!(ncycles.is_none());
            }
            other => panic!("expected PULSE, got {other:?}"),
        }
    }

    #[test]
    fn parses_pwl_waveform() {
        let circuit =
            parse_netlist("V1 c 0 PWL(0 0 1m 5 3m 0)\nR1 c 0 1k\n").unwrap();
        match circuit.vsources[0].waveform.as_ref().unwrap() {
            Waveform::Pwl { points } => {
                assert_eq!(points.len(), 3);
                assert_eq!(points[1], (1e-3, 5.0));
            }
            other => panic!("expected PWL, got {other:?}"),
        }
    }

    #[test]
    fn parses_switch_with_model() {
        let netlist = "\
V1 c 0 DC 0
V2 in 0 DC 5
R1 in out 1k
S1 out 0 c 0 sw1
.model SW1 VSWITCH(Ron=1 Roff=1e9 Von=2 Voff=1)
";
        let circuit = parse_netlist(netlist).unwrap();
        let s = &circuit.switches[0];
        assert_eq!(s.model.ron, 1.0);
        assert_eq!(s.model.roff, 1e9);
        assert_eq!(s.model.von, 2.0);
        assert_eq!(s.model.voff, 1.0);
        assert!(!s.is_on);
    }

    #[test]
    fn vt_vh_convert_to_thresholds() {
        let netlist = "\
S1 a 0 c 0 relay
.model relay SW(Ron=0.5 Roff=1MEG Vt=1.5 Vh=1)
";
        let circuit = parse_netlist(netlist).unwrap();
        let m = &circuit.switches[0].model;
        assert!((m.von - 2.0).abs() < 1e-12);
        assert!((m.voff - 1.0).abs() < 1e-12);
        assert_eq!(m.roff, 1e6);
    }

    #[test]
    fn parses_diode_model() {
        let netlist = "\
D1 a k dmod
R1 k 0 1k
.model dmod D(Is=1e-14 N=1.5)
";
        let circuit = parse_netlist(netlist).unwrap();
        let d = &circuit.diodes[0];
        assert_eq!(d.model.saturation_current, 1e-14);
        assert_eq!(d.model.emission_coefficient, 1.5);
    }

    #[test]
    fn unknown_model_is_a_hard_error() {
        let result = parse_netlist("D1 a k nosuch\n");
        assert!(matches!(result, Err(Error::UnknownModel { name, .. }) if name == "nosuch"));
    }

    #[test]
    fn model_kind_mismatch_is_rejected() {
        let netlist = "\
D1 a k sw1
.model sw1 SW(Ron=1)
";
        assert!(matches!(parse_netlist(netlist), Err(Error::Parse { .. })));
    }

    #[test]
    fn print_tran_collects_probes() {
        let circuit =
            parse_netlist("V1 nOdE1 0 DC 1\nR1 nOdE1 0 1k\n.print TRAN V(NODE1) V(0)\n")
                .unwrap();
        assert_eq!(circuit.probes, vec!["NODE1".to_string(), "0".to_string()]);
    }

    #[test]
    fn comments_and_continuations() {
        let netlist = "\
* a comment line
V1 1 0 PULSE(0 5
+ 0 1n 1n 5u 10u) ; trailing comment
R1 1 0 1k
";
        let circuit = parse_netlist(netlist).unwrap();
        assert!(matches!(
            circuit.vsources[0].waveform,
            Some(Waveform::Pulse { .. })
        ));
        assert_eq!(circuit.resistors.len(), 1);
    }

    #[test]
    fn nonpositive_resistance_is_rejected() {
        assert!(matches!(
            parse_netlist("R1 1 0 0\n"),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            parse_netlist("R1 1 0 -5\n"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn unsupported_element_is_rejected() {
        assert!(matches!(
            parse_netlist("Q1 1 2 3 bjt\n"),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn cards_after_end_are_ignored() {
        let circuit = parse_netlist("R1 1 0 1k\n.end\nR2 1 0 1k\n").unwrap();
        assert_eq!(circuit.resistors.len(), 1);
    }
}
