//! Result types for transient analysis.

use indexmap::IndexMap;

/// Result of a transient simulation.
///
/// Every series holds one sample per entry of `times`; node-voltage series
/// are guaranteed that length before probe filtering, element currents
/// always.
#[derive(Debug, Clone)]
pub struct TranResult {
    /// Simulated time points, uniform and ending exactly at tstop.
    pub times: Vec<f64>,
    /// Node-voltage series keyed by display name (probe-filtered when the
    /// circuit carries probes).
    pub node_voltages: IndexMap<String, Vec<f64>>,
    /// Element-current series keyed by element name; never filtered.
    pub element_currents: IndexMap<String, Vec<f64>>,
}

impl TranResult {
    /// Voltage series for a node, looked up case-insensitively.
    pub fn voltage(&self, node: &str) -> Option<&[f64]> {
        self.node_voltages
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(node))
            .map(|(_, series)| series.as_slice())
    }

    /// Current series for an element, looked up case-insensitively.
    pub fn current(&self, element: &str) -> Option<&[f64]> {
        self.element_currents
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(element))
            .map(|(_, series)| series.as_slice())
    }

    /// Node voltage at an arbitrary time, linearly interpolated between the
    /// two nearest samples and clamped to the simulated range.
    pub fn voltage_at(&self, node: &str, time: f64) -> Option<f64> {
        let series = self.voltage(node)?;
        if series.is_empty() {
            return None;
        }
        if time <= self.times[0] {
            return Some(series[0]);
        }
        if time >= *self.times.last()? {
            return Some(*series.last()?);
        }
        for i in 0..self.times.len() - 1 {
            let (t0, t1) = (self.times[i], self.times[i + 1]);
            if time >= t0 && time <= t1 {
                let alpha = (time - t0) / (t1 - t0);
                return Some(series[i] * (1.0 - alpha) + series[i + 1] * alpha);
            }
        }
        None
    }
}
