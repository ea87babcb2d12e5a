//! Builders for the individual generated automations.

use crate::automation::{
    Action, Automation, ChooseOption, Condition, Flash, LightData, RuleError, RunMode,
    ServiceData, Trigger,
};
use crate::classifier::{candidate_template, jinja_literal, previous_template};
use crate::entity_ref::EntityRef;
use crate::lighting::LightingRuleMap;
use crate::mode::Mode;
use crate::time::flourish_reset_time;
use crate::zone::ZoneRuleSet;

use super::{dwell_timer, flourish_flag, CompileConfig, Variant};

/// Rule ids and aliases for one product variant.
pub(super) struct RuleNames {
    prefix: &'static str,
    title: &'static str,
}

impl RuleNames {
    pub(super) fn new(variant: Variant) -> Self {
        Self {
            prefix: variant.rule_prefix(),
            title: variant.title(),
        }
    }

    fn id(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.prefix)
    }

    fn alias(&self, what: &str) -> String {
        format!("{} - {what}", self.title)
    }
}

fn current_mode(selector: &EntityRef) -> String {
    format!("states({})", jinja_literal(&selector.to_string()))
}

/// Restart the dwell timer whenever the tracker classifies to a mode other
/// than the committed one, cancel it when the tracker is back in the
/// committed mode.
pub(super) fn start_dwell(
    names: &RuleNames,
    config: &CompileConfig,
    tracker: &EntityRef,
    rules: &ZoneRuleSet,
) -> Result<Automation, RuleError> {
    let timer = dwell_timer();
    Automation::builder()
        .id(names.id("compute_mode_start_dwell"))
        .alias(names.alias("Start dwell on location change"))
        .trigger(Trigger::state_changed(tracker.clone()))
        .action(Action::Variables {
            variables: [
                ("candidate".to_string(), candidate_template(tracker, rules)),
                ("previous".to_string(), previous_template(rules)),
            ]
            .into(),
        })
        .action(Action::Choose {
            choose: vec![
                ChooseOption {
                    conditions: vec![Condition::template(format!(
                        "{{{{ candidate == {} }}}}",
                        current_mode(&config.mode_selector)
                    ))],
                    sequence: vec![Action::call("timer.cancel", timer.clone())],
                },
                ChooseOption {
                    conditions: vec![Condition::template(format!(
                        "{{{{ candidate != previous or is_state({}, 'idle') }}}}",
                        jinja_literal(&timer.to_string())
                    ))],
                    sequence: vec![Action::call("timer.start", timer)],
                },
            ],
            default: Vec::new(),
        })
        .mode(RunMode::Restart)
        .build()
}

/// On timer expiry, re-classify the tracker's current value and commit it
/// if it still differs from the committed mode.
pub(super) fn commit_dwell(
    names: &RuleNames,
    config: &CompileConfig,
    tracker: &EntityRef,
    rules: &ZoneRuleSet,
) -> Result<Automation, RuleError> {
    let selector = &config.mode_selector;
    Automation::builder()
        .id(names.id("compute_mode_commit"))
        .alias(names.alias("Commit mode after dwell"))
        .trigger(Trigger::timer_finished(dwell_timer()))
        .action(Action::variable(
            "candidate",
            candidate_template(tracker, rules),
        ))
        .action(Action::Condition(Condition::template(format!(
            "{{{{ candidate != {} }}}}",
            current_mode(selector)
        ))))
        .action(Action::call_with(
            format!("{}.select_option", selector.domain()),
            selector.clone(),
            ServiceData::SelectOption {
                option: "{{ candidate }}".to_string(),
            },
        ))
        .mode(RunMode::Single)
        .build()
}

/// One branch per mode with a directive; each branch is gated on the manual
/// override being off. `None` when no mode has a directive.
pub(super) fn apply_lighting(
    names: &RuleNames,
    config: &CompileConfig,
    light: &EntityRef,
    lighting: &LightingRuleMap,
) -> Result<Option<Automation>, RuleError> {
    if lighting.is_empty() {
        return Ok(None);
    }
    let selector = &config.mode_selector;
    let choose = lighting
        .iter()
        .map(|(mode, directive)| ChooseOption {
            conditions: vec![Condition::state(selector.clone(), mode.as_str())],
            sequence: vec![
                Action::Condition(Condition::is_off(config.override_flag.clone())),
                Action::call_with(
                    "light.turn_on",
                    light.clone(),
                    ServiceData::Light(LightData::from(directive)),
                ),
            ],
        })
        .collect();
    Automation::builder()
        .id(names.id("apply_light_on_mode_change"))
        .alias(names.alias("Apply lighting on mode change"))
        .trigger(Trigger::state_changed(selector.clone()))
        .action(Action::Choose {
            choose,
            default: Vec::new(),
        })
        .mode(RunMode::Restart)
        .build()
        .map(Some)
}

/// Short flash on the first `HOME` commit of the day.
pub(super) fn home_flourish(
    names: &RuleNames,
    config: &CompileConfig,
    light: &EntityRef,
) -> Result<Automation, RuleError> {
    let flag = flourish_flag();
    Automation::builder()
        .id(names.id("home_flourish_once_daily"))
        .alias(names.alias("Home arrival flourish"))
        .trigger(Trigger::state_to(
            config.mode_selector.clone(),
            Mode::Home.as_str(),
        ))
        .condition(Condition::is_off(config.override_flag.clone()))
        .condition(Condition::is_off(flag.clone()))
        .action(Action::call_with(
            "light.turn_on",
            light.clone(),
            ServiceData::Light(LightData {
                flash: Some(Flash::Short),
                ..LightData::default()
            }),
        ))
        .action(Action::delay_secs(1))
        .action(Action::call("input_boolean.turn_on", flag))
        .mode(RunMode::Single)
        .build()
}

pub(super) fn reset_flourish(names: &RuleNames) -> Result<Automation, RuleError> {
    Automation::builder()
        .id(names.id("reset_flourish_daily"))
        .alias(names.alias("Reset flourish daily"))
        .trigger(Trigger::Time {
            at: flourish_reset_time(),
        })
        .action(Action::call("input_boolean.turn_off", flourish_flag()))
        .mode(RunMode::Single)
        .build()
}
