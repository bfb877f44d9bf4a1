//! Result formatting: CSV-style tables and a JSON exporter.

use serde::Serialize;
use voltaic::{AcResult, Simulation, TranResult};

/// Transient result as CSV: time, then `V(node)` and `I(element)` columns.
pub fn tran_csv(tran: &TranResult) -> String {
    let mut out = String::new();

    out.push_str("time");
    for name in tran.node_voltages.keys() {
        out.push_str(&format!(",V({name})"));
    }
    for name in tran.element_currents.keys() {
        out.push_str(&format!(",I({name})"));
    }
    out.push('\n');

    for (i, t) in tran.times.iter().enumerate() {
        out.push_str(&format!("{t:.6e}"));
        for series in tran.node_voltages.values() {
            out.push_str(&format!(",{:.6e}", series[i]));
        }
        for series in tran.element_currents.values() {
            out.push_str(&format!(",{:.6e}", series[i]));
        }
        out.push('\n');
    }
    out
}

/// AC result as CSV: frequency, then magnitude/phase-degree column pairs
/// for every node voltage and element current.
pub fn ac_csv(ac: &AcResult) -> String {
    let mut out = String::new();

    out.push_str("frequency");
    for name in ac.node_voltages.keys() {
        out.push_str(&format!(",Vm({name}),Vp({name})"));
    }
    for name in ac.element_currents.keys() {
        out.push_str(&format!(",Im({name}),Ip({name})"));
    }
    out.push('\n');

    for (i, f) in ac.freqs.iter().enumerate() {
        out.push_str(&format!("{f:.6e}"));
        for series in ac.node_voltages.values() {
            let z = series[i];
            out.push_str(&format!(",{:.6e},{:.6e}", z.norm(), z.arg().to_degrees()));
        }
        for series in ac.element_currents.values() {
            let z = series[i];
            out.push_str(&format!(",{:.6e},{:.6e}", z.norm(), z.arg().to_degrees()));
        }
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct SeriesJson {
    name: String,
    values: Vec<f64>,
}

#[derive(Serialize)]
struct PhasorSeriesJson {
    name: String,
    magnitude: Vec<f64>,
    phase_deg: Vec<f64>,
}

#[derive(Serialize)]
struct TranJson {
    times: Vec<f64>,
    node_voltages: Vec<SeriesJson>,
    element_currents: Vec<SeriesJson>,
}

#[derive(Serialize)]
struct AcJson {
    freqs: Vec<f64>,
    node_voltages: Vec<PhasorSeriesJson>,
    element_currents: Vec<PhasorSeriesJson>,
}

#[derive(Serialize)]
struct SimulationJson {
    ac: Option<AcJson>,
    tran: Option<TranJson>,
}

/// Serialize the whole simulation as a pretty-printed JSON document.
pub fn to_json(sim: &Simulation) -> serde_json::Result<String> {
    let doc = SimulationJson {
        ac: sim.ac.as_ref().map(ac_json),
        tran: sim.tran.as_ref().map(tran_json),
    };
    serde_json::to_string_pretty(&doc)
}

fn tran_json(tran: &TranResult) -> TranJson {
    let series = |(name, values): (&String, &Vec<f64>)| SeriesJson {
        name: name.clone(),
        values: values.clone(),
    };
    TranJson {
        times: tran.times.clone(),
        node_voltages: tran.node_voltages.iter().map(series).collect(),
        element_currents: tran.element_currents.iter().map(series).collect(),
    }
}

fn ac_json(ac: &AcResult) -> AcJson {
    let series = |(name, values): (&String, &Vec<num_complex::Complex<f64>>)| PhasorSeriesJson {
        name: name.clone(),
        magnitude: values.iter().map(|z| z.norm()).collect(),
        phase_deg: values.iter().map(|z| z.arg().to_degrees()).collect(),
    };
    AcJson {
        freqs: ac.freqs.clone(),
        node_voltages: ac.node_voltages.iter().map(series).collect(),
        element_currents: ac.element_currents.iter().map(series).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use num_complex::Complex;

    fn sample_tran() -> TranResult {
        let mut node_voltages = IndexMap::new();
        node_voltages.insert("out".to_string(), vec![1.0, 2.0]);
        let mut element_currents = IndexMap::new();
        element_currents.insert("R1".to_string(), vec![0.001, 0.002]);
        TranResult {
            times: vec![1e-6, 2e-6],
            node_voltages,
            element_currents,
        }
    }

    fn sample_ac() -> AcResult {
        let mut node_voltages = IndexMap::new();
        node_voltages.insert("out".to_string(), vec![Complex::new(0.0, 1.0)]);
        AcResult {
            freqs: vec![50.0],
            node_voltages,
            element_currents: IndexMap::new(),
        }
    }

    #[test]
    fn tran_csv_shape() {
        let csv = tran_csv(&sample_tran());
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "time,V(out),I(R1)");
        assert!(lines.next().unwrap().starts_with("1.000000e-6"));
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn ac_csv_reports_magnitude_and_phase() {
        let csv = ac_csv(&sample_ac());
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "frequency,Vm(out),Vp(out)");
        let row = lines.next().unwrap();
        assert!(row.contains("9.000000e1"), "phase column missing: {row}");
    }

    #[test]
    fn json_document_carries_both_analyses() {
        let sim = Simulation {
            ac: Some(sample_ac()),
            tran: Some(sample_tran()),
        };
        let doc = to_json(&sim).unwrap();
        assert!(doc.contains("\"freqs\""));
        assert!(doc.contains("\"times\""));
        assert!(doc.contains("\"phase_deg\""));
    }
}
