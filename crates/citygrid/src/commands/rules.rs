//! VLAN assignment rules: show, replace, evaluate.

use std::collections::BTreeMap;

use serde::Serialize;
use tabled::Tabled;

use citygrid_core::{RemoteSync, RuleAssignment, RuleMap, RuleSet, SyncConfig, VlanId};

use crate::cli::{EvalArgs, GlobalOpts, OutputFormat, RulesArgs, RulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Parameter")]
    parameter: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
    #[tabled(rename = "VLAN")]
    vlan: VlanId,
}

/// One flattened rule; what `rules get` prints per row.
#[derive(Serialize)]
struct FlatRule<'a> {
    parameter: &'a str,
    level: &'a str,
    threshold: f64,
    vlan: VlanId,
}

#[derive(Serialize)]
struct Evaluation {
    readings: BTreeMap<String, f64>,
    #[serde(flatten)]
    assignment: RuleAssignment,
}

fn flatten(rules: &RuleSet) -> Vec<FlatRule<'_>> {
    rules
        .parameters()
        .iter()
        .flat_map(|p| {
            p.levels.iter().map(move |l| FlatRule {
                parameter: &p.parameter,
                level: &l.level,
                threshold: l.threshold,
                vlan: l.vlan,
            })
        })
        .collect()
}

/// Structured formats print the wire map so the output can be fed back
/// to `rules set`.
fn render_rules(format: &OutputFormat, rules: &RuleSet) -> Result<String, CliError> {
    match format {
        OutputFormat::Table | OutputFormat::Plain => output::render_list(
            format,
            &flatten(rules),
            |r| RuleRow {
                parameter: r.parameter.to_owned(),
                level: r.level.to_owned(),
                threshold: r.threshold.to_string(),
                vlan: r.vlan,
            },
            |r| format!("{}.{} {} {}", r.parameter, r.level, r.threshold, r.vlan),
        ),
        _ => output::render_single(format, &rules.to_rule_map(), |_| String::new(), |_| {
            String::new()
        }),
    }
}

fn readings(args: &EvalArgs) -> BTreeMap<String, f64> {
    [
        ("temperature", args.temperature),
        ("traffic", args.traffic),
        ("airQuality", args.air_quality),
    ]
    .into_iter()
    .filter_map(|(k, v)| v.map(|v| (k.to_owned(), v)))
    .collect()
}

fn parse_rules(value: serde_json::Value) -> Result<RuleSet, CliError> {
    let map: RuleMap = serde_json::from_value(value).map_err(|e| CliError::Validation {
        field: "rules".into(),
        reason: format!("expected {{parameter: {{level: {{threshold, vlan}}}}}}: {e}"),
    })?;
    let rules = RuleSet::from_rule_map(&map);
    rules.validate()?;
    Ok(rules)
}

async fn fetch_rules(sync: SyncConfig) -> Result<RuleSet, CliError> {
    Ok(RemoteSync::oneshot(sync, |s| async move { Ok(s.snapshot().rules().clone()) }).await?)
}

pub async fn handle(sync: SyncConfig, args: RulesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let format = global.output_format();

    match args.command {
        RulesCommand::Get => {
            let rules = fetch_rules(sync).await?;
            if rules.is_empty() {
                if let Some(notice) = output::empty_notice(&format, "The backend has no rules") {
                    output::print_output(&notice, global.quiet);
                    return Ok(());
                }
            }
            output::print_output(&render_rules(&format, &rules)?, global.quiet);
            Ok(())
        }

        RulesCommand::Set { source } => {
            let rules = parse_rules(util::read_json_input(&source)?)?;
            let prompt = format!(
                "Replace the backend's rules with {} rule(s)?",
                rules.rule_count()
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            let saved = RemoteSync::new(sync)?.update_rules(&rules).await?;
            if !global.quiet {
                eprintln!("Saved {} rule(s)", saved.rule_count());
            }
            output::print_output(&render_rules(&format, &saved)?, global.quiet);
            Ok(())
        }

        RulesCommand::Eval(eval) => {
            let rules = if eval.offline {
                RuleSet::backend_defaults()
            } else {
                fetch_rules(sync).await?
            };
            let readings = readings(&eval);
            let assignment = rules.evaluate(eval.name.as_deref(), &readings);
            tracing::debug!(vlan = assignment.vlan, reason = %assignment.reason, "rules evaluated");

            let result = Evaluation {
                readings,
                assignment,
            };
            let out = output::render_single(
                &format,
                &result,
                |e| format!("VLAN {}\nReason: {}", e.assignment.vlan, e.assignment.reason),
                |e| e.assignment.vlan.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn eval_uses_only_given_readings() {
        let args = EvalArgs {
            name: None,
            temperature: None,
            traffic: Some(85.0),
            air_quality: None,
            offline: true,
        };
        let readings = readings(&args);
        assert_eq!(readings.len(), 1);
        let got = RuleSet::backend_defaults().evaluate(None, &readings);
        assert_eq!(got.vlan, 40);
    }

    #[test]
    fn parse_rejects_parameter_without_levels() {
        let err = parse_rules(json!({ "traffic": {} })).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        let err = parse_rules(json!({ "traffic": { "high": 80 } })).unwrap_err();
        assert!(err.to_string().contains("rules"));
    }

    #[test]
    fn plain_rules_one_per_line() {
        let out = render_rules(&OutputFormat::Plain, &RuleSet::backend_defaults()).unwrap();
        assert_eq!(out.lines().count(), 9);
        assert!(out.starts_with("temperature.high 30 10"));
    }
}
