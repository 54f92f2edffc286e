// ── VLAN assignment rules ──
//
// The backend assigns every incoming reading to a VLAN from a
// parameter -> level -> {threshold, vlan} table. The table is edited here
// and sent back whole; `evaluate` mirrors the backend policy so a reading
// can be previewed before it is published.

use std::collections::BTreeMap;

use citygrid_api::{RuleMap, RuleThreshold};
use serde::Serialize;

use super::vlan::VlanId;
use crate::error::CoreError;

/// VLAN a reading lands on when no rule matches.
pub const DEFAULT_VLAN: VlanId = 100;

/// Parameters in the order the backend checks them.
const PARAMETER_ORDER: [&str; 3] = ["temperature", "traffic", "airQuality"];

/// Name keywords checked before any parameter rule.
const NAME_HINTS: [(&str, VlanId); 3] = [("traffic", 40), ("environment", 20), ("security", 30)];

/// One level of a parameter rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelRule {
    pub level: String,
    pub threshold: f64,
    pub vlan: VlanId,
}

/// All levels for one parameter, highest threshold first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterRules {
    pub parameter: String,
    pub levels: Vec<LevelRule>,
}

impl ParameterRules {
    /// First level whose threshold the value reaches.
    pub fn level_for(&self, value: f64) -> Option<&LevelRule> {
        self.levels.iter().find(|l| value >= l.threshold)
    }

    fn sort_levels(&mut self) {
        self.levels
            .sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
    }
}

/// Outcome of evaluating a reading against the rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleAssignment {
    pub vlan: VlanId,
    pub reason: String,
}

/// Ordered rule table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSet {
    parameters: Vec<ParameterRules>,
}

impl RuleSet {
    /// Convert the wire map, ordering parameters the way the backend
    /// checks them (known ones first, then alphabetical) and levels by
    /// descending threshold.
    pub fn from_rule_map(map: &RuleMap) -> Self {
        let mut parameters: Vec<ParameterRules> = map
            .iter()
            .map(|(parameter, levels)| {
                let mut rules = ParameterRules {
                    parameter: parameter.clone(),
                    levels: levels
                        .iter()
                        .map(|(level, rule)| LevelRule {
                            level: level.clone(),
                            threshold: rule.threshold,
                            vlan: rule.vlan,
                        })
                        .collect(),
                };
                rules.sort_levels();
                rules
            })
            .collect();
        parameters.sort_by_key(|p| parameter_rank(&p.parameter));
        Self { parameters }
    }

    pub fn to_rule_map(&self) -> RuleMap {
        self.parameters
            .iter()
            .map(|p| {
                let levels: BTreeMap<String, RuleThreshold> = p
                    .levels
                    .iter()
                    .map(|l| {
                        (
                            l.level.clone(),
                            RuleThreshold {
                                threshold: l.threshold,
                                vlan: l.vlan,
                            },
                        )
                    })
                    .collect();
                (p.parameter.clone(), levels)
            })
            .collect()
    }

    /// The table a fresh backend starts with.
    pub fn backend_defaults() -> Self {
        let table: [(&str, [(&str, f64, VlanId); 3]); 3] = [
            (
                "temperature",
                [("high", 30.0, 10), ("medium", 20.0, 20), ("low", 0.0, 30)],
            ),
            (
                "traffic",
                [("high", 80.0, 40), ("medium", 50.0, 50), ("low", 0.0, 60)],
            ),
            (
                "airQuality",
                [("high", 150.0, 70), ("medium", 100.0, 80), ("low", 0.0, 90)],
            ),
        ];
        let parameters = table
            .into_iter()
            .map(|(parameter, levels)| ParameterRules {
                parameter: parameter.to_owned(),
                levels: levels
                    .into_iter()
                    .map(|(level, threshold, vlan)| LevelRule {
                        level: level.to_owned(),
                        threshold,
                        vlan,
                    })
                    .collect(),
            })
            .collect();
        Self { parameters }
    }

    pub fn parameters(&self) -> &[ParameterRules] {
        &self.parameters
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Total number of level rules across all parameters.
    pub fn rule_count(&self) -> usize {
        self.parameters.iter().map(|p| p.levels.len()).sum()
    }

    pub fn get(&self, parameter: &str, level: &str) -> Option<&LevelRule> {
        self.parameters
            .iter()
            .find(|p| p.parameter == parameter)?
            .levels
            .iter()
            .find(|l| l.level == level)
    }

    /// Insert or replace one level rule.
    pub fn set(
        &mut self,
        parameter: &str,
        level: &str,
        threshold: f64,
        vlan: VlanId,
    ) -> Result<(), CoreError> {
        if !threshold.is_finite() {
            return Err(CoreError::InvalidRules {
                message: format!("{parameter}.{level}: threshold must be a finite number"),
            });
        }
        if parameter.is_empty() || level.is_empty() {
            return Err(CoreError::InvalidRules {
                message: "parameter and level names must not be empty".into(),
            });
        }

        let idx = match self.parameters.iter().position(|p| p.parameter == parameter) {
            Some(idx) => idx,
            None => {
                self.parameters.push(ParameterRules {
                    parameter: parameter.to_owned(),
                    levels: Vec::new(),
                });
                self.parameters
                    .sort_by_key(|p| parameter_rank(&p.parameter));
                self.parameters
                    .iter()
                    .position(|p| p.parameter == parameter)
                    .unwrap_or_default()
            }
        };

        let Some(rules) = self.parameters.get_mut(idx) else {
            return Ok(());
        };
        match rules.levels.iter_mut().find(|l| l.level == level) {
            Some(existing) => {
                existing.threshold = threshold;
                existing.vlan = vlan;
            }
            None => rules.levels.push(LevelRule {
                level: level.to_owned(),
                threshold,
                vlan,
            }),
        }
        rules.sort_levels();
        Ok(())
    }

    /// Reject tables the backend could not evaluate.
    pub fn validate(&self) -> Result<(), CoreError> {
        for p in &self.parameters {
            if p.levels.is_empty() {
                return Err(CoreError::InvalidRules {
                    message: format!("parameter '{}' has no levels", p.parameter),
                });
            }
            if let Some(bad) = p.levels.iter().find(|l| !l.threshold.is_finite()) {
                return Err(CoreError::InvalidRules {
                    message: format!("{}.{}: threshold must be finite", p.parameter, bad.level),
                });
            }
        }
        Ok(())
    }

    /// Assign a VLAN the way the backend does: name keywords first, then
    /// every parameter present in `readings` in rule order, later matches
    /// overriding earlier ones.
    pub fn evaluate(&self, name: Option<&str>, readings: &BTreeMap<String, f64>) -> RuleAssignment {
        let mut vlan = DEFAULT_VLAN;
        let mut reason = String::from("default");

        if let Some(name) = name {
            let lowered = name.to_lowercase();
            if let Some((hint, hinted)) = NAME_HINTS.iter().find(|(hint, _)| lowered.contains(hint))
            {
                vlan = *hinted;
                reason = format!("name contains '{hint}'");
            }
        }

        for rules in &self.parameters {
            let Some(&value) = readings.get(&rules.parameter) else {
                continue;
            };
            if let Some(level) = rules.level_for(value) {
                vlan = level.vlan;
                reason = format!(
                    "{} {} ({value} >= {})",
                    rules.parameter, level.level, level.threshold
                );
            }
        }

        RuleAssignment { vlan, reason }
    }

    /// Rules that route to `vlan`, as `parameter level (>= threshold)`.
    pub fn describe_vlan(&self, vlan: VlanId) -> Vec<String> {
        self.parameters
            .iter()
            .flat_map(|p| {
                p.levels
                    .iter()
                    .filter(move |l| l.vlan == vlan)
                    .map(move |l| format!("{} {} (>= {})", p.parameter, l.level, l.threshold))
            })
            .collect()
    }
}

fn parameter_rank(parameter: &str) -> (usize, String) {
    let known = PARAMETER_ORDER
        .iter()
        .position(|p| *p == parameter)
        .unwrap_or(PARAMETER_ORDER.len());
    (known, parameter.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn readings(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    #[test]
    fn round_trips_through_wire_map_in_backend_order() {
        let defaults = RuleSet::backend_defaults();
        let restored = RuleSet::from_rule_map(&defaults.to_rule_map());

        let order: Vec<&str> = restored
            .parameters()
            .iter()
            .map(|p| p.parameter.as_str())
            .collect();
        assert_eq!(order, ["temperature", "traffic", "airQuality"]);
        assert_eq!(restored, defaults);
    }

    #[test]
    fn temperature_thresholds_pick_first_reached_level() {
        let rules = RuleSet::backend_defaults();
        assert_eq!(rules.evaluate(None, &readings(&[("temperature", 22.0)])).vlan, 20);
        assert_eq!(rules.evaluate(None, &readings(&[("temperature", 30.0)])).vlan, 10);
        assert_eq!(rules.evaluate(None, &readings(&[("temperature", -4.0)])).vlan, DEFAULT_VLAN);
    }

    #[test]
    fn later_parameters_override_earlier_ones() {
        let rules = RuleSet::backend_defaults();
        let result = rules.evaluate(
            Some("Traffic Counter"),
            &readings(&[("temperature", 25.0), ("traffic", 91.0), ("airQuality", 40.0)]),
        );
        assert_eq!(result.vlan, 90);
    }

    #[test]
    fn name_hint_applies_without_readings() {
        let rules = RuleSet::backend_defaults();
        let result = rules.evaluate(Some("Security Gate Cam"), &BTreeMap::new());
        assert_eq!(result.vlan, 30);
        assert!(result.reason.contains("security"));
    }

    #[test]
    fn set_keeps_levels_sorted_and_rejects_nan() {
        let mut rules = RuleSet::backend_defaults();
        rules.set("temperature", "extreme", 40.0, 11).unwrap();
        let temps = &rules.parameters()[0];
        assert_eq!(temps.levels[0].level, "extreme");

        assert!(rules.set("temperature", "high", f64::NAN, 10).is_err());
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn describes_vlans_by_rule() {
        let rules = RuleSet::backend_defaults();
        assert_eq!(rules.describe_vlan(40), vec!["traffic high (>= 80)".to_owned()]);
        assert!(rules.describe_vlan(999).is_empty());
    }
}
