// ── Simulation form state ──

use std::collections::BTreeMap;

use citygrid_api::SimulateRequest;
use rand::Rng;
use serde::Serialize;

use crate::model::{RuleAssignment, RuleSet};

pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 50.0);
pub const TRAFFIC_RANGE: (f64, f64) = (0.0, 100.0);
pub const AIR_QUALITY_RANGE: (f64, f64) = (0.0, 300.0);

/// Device kinds the simulator offers.
pub const SIMULATED_KINDS: [&str; 4] = ["sensor", "traffic", "environment", "security"];

/// A simulated device reading being composed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationDraft {
    /// Empty lets the backend generate an id.
    pub device_id: String,
    pub name: String,
    pub kind: String,
    pub temperature: f64,
    pub traffic: f64,
    pub air_quality: f64,
    pub location: String,
}

impl Default for SimulationDraft {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            name: String::new(),
            kind: "sensor".into(),
            temperature: 25.0,
            traffic: 50.0,
            air_quality: 100.0,
            location: "City Center".into(),
        }
    }
}

impl SimulationDraft {
    /// Quick-add traffic sensor with a random level.
    pub fn traffic_preset<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            device_id: format!("traffic-sensor-{}", rng.random_range(0..1000)),
            name: "Traffic Sensor".into(),
            kind: "traffic".into(),
            traffic: f64::from(rng.random_range(0..100_u8)),
            location: "Main Street".into(),
            ..Self::default()
        }
    }

    /// Quick-add environment sensor with random climate readings.
    pub fn environment_preset<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            device_id: format!("env-sensor-{}", rng.random_range(0..1000)),
            name: "Environment Sensor".into(),
            kind: "environment".into(),
            temperature: f64::from(rng.random_range(15..40_u8)),
            air_quality: f64::from(rng.random_range(50..200_u8)),
            location: "City Park".into(),
            ..Self::default()
        }
    }

    /// Advance `kind` through [`SIMULATED_KINDS`].
    pub fn cycle_kind(&mut self) {
        let next = SIMULATED_KINDS
            .iter()
            .position(|k| *k == self.kind)
            .map_or(0, |i| (i + 1) % SIMULATED_KINDS.len());
        self.kind = SIMULATED_KINDS[next].to_owned();
    }

    /// Nudge the numeric fields, keeping each inside its slider range.
    pub fn adjust_temperature(&mut self, delta: f64) {
        self.temperature = clamp_range(self.temperature + delta, TEMPERATURE_RANGE);
    }

    pub fn adjust_traffic(&mut self, delta: f64) {
        self.traffic = clamp_range(self.traffic + delta, TRAFFIC_RANGE);
    }

    pub fn adjust_air_quality(&mut self, delta: f64) {
        self.air_quality = clamp_range(self.air_quality + delta, AIR_QUALITY_RANGE);
    }

    /// Readings keyed by their wire names, for rule previews.
    pub fn readings(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("temperature".to_owned(), self.temperature),
            ("traffic".to_owned(), self.traffic),
            ("airQuality".to_owned(), self.air_quality),
        ])
    }

    /// Where the backend would put this reading under `rules`.
    pub fn preview(&self, rules: &RuleSet) -> RuleAssignment {
        let name = (!self.name.is_empty()).then_some(self.name.as_str());
        rules.evaluate(name, &self.readings())
    }

    pub fn to_request(&self) -> SimulateRequest {
        SimulateRequest {
            device_id: (!self.device_id.trim().is_empty()).then(|| self.device_id.trim().to_owned()),
            name: self.name.clone(),
            kind: self.kind.clone(),
            temperature: Some(self.temperature),
            traffic: Some(self.traffic),
            air_quality: Some(self.air_quality),
            location: self.location.clone(),
        }
    }
}

fn clamp_range(value: f64, (min, max): (f64, f64)) -> f64 {
    value.clamp(min, max)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn defaults_match_form() {
        let draft = SimulationDraft::default();
        let req = draft.to_request();
        assert_eq!(req.device_id, None);
        assert_eq!(req.kind, "sensor");
        assert_eq!(req.temperature, Some(25.0));
        assert_eq!(req.traffic, Some(50.0));
        assert_eq!(req.air_quality, Some(100.0));
        assert_eq!(req.location, "City Center");
    }

    #[test]
    fn sliders_clamp() {
        let mut draft = SimulationDraft::default();
        draft.adjust_temperature(100.0);
        draft.adjust_traffic(-500.0);
        draft.adjust_air_quality(1000.0);
        assert_eq!(draft.temperature, 50.0);
        assert_eq!(draft.traffic, 0.0);
        assert_eq!(draft.air_quality, 300.0);
    }

    #[test]
    fn kind_cycles_and_wraps() {
        let mut draft = SimulationDraft::default();
        for expected in ["traffic", "environment", "security", "sensor"] {
            draft.cycle_kind();
            assert_eq!(draft.kind, expected);
        }
    }

    #[test]
    fn presets_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let t = SimulationDraft::traffic_preset(&mut rng);
        assert!(t.device_id.starts_with("traffic-sensor-"));
        assert!((0.0..100.0).contains(&t.traffic));

        let e = SimulationDraft::environment_preset(&mut rng);
        assert!((15.0..40.0).contains(&e.temperature));
        assert!((50.0..200.0).contains(&e.air_quality));
    }

    #[test]
    fn preview_uses_backend_policy() {
        let draft = SimulationDraft {
            name: "Traffic Cam".into(),
            traffic: 85.0,
            air_quality: 160.0,
            ..SimulationDraft::default()
        };
        let outcome = draft.preview(&RuleSet::backend_defaults());
        // air quality is checked last, so it has the final say
        assert_eq!(outcome.vlan, 70);

        let mut readings = draft.readings();
        readings.remove("airQuality");
        let outcome = RuleSet::backend_defaults().evaluate(Some("Traffic Cam"), &readings);
        assert_eq!(outcome.vlan, 40);
    }
}
