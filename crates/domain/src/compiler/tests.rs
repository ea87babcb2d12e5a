use super::*;
use crate::automation::{Action, Condition, LightData, RunMode, ServiceData, ToState, Trigger};
use crate::lighting::{LightingDirective, Rgb};

fn entity(raw: &str) -> EntityRef {
    EntityRef::parse("test", raw).unwrap()
}

fn rules() -> ZoneRuleSet {
    ZoneRuleSet::builder()
        .florida_zones(["zone.disney"])
        .work_zone("zone.office")
        .shopping_prefix("shopping_")
        .build()
}

fn config() -> CompileConfig {
    CompileConfig {
        tracker: Some(entity("device_tracker.pixel")),
        light: Some(entity("light.living_room")),
        ..CompileConfig::default()
    }
}

fn florida_blue() -> LightingRuleMap {
    LightingRuleMap::new().with(
        Mode::Florida,
        LightingDirective {
            color: Some(Rgb([0, 0, 255])),
            brightness: Some(200),
            effect: None,
        },
    )
}

fn rule_ids(doc: &CompiledDocument) -> Vec<&str> {
    doc.automations().iter().map(|a| a.id.as_str()).collect()
}

#[test]
fn should_be_idempotent() {
    let compile_once = || {
        let doc = compile(&config(), &rules(), DwellDuration::default(), &florida_blue(), true)
            .unwrap();
        serde_json::to_string(&doc).unwrap()
    };
    assert_eq!(compile_once(), compile_once());
}

#[test]
fn should_emit_all_rules_in_fixed_order() {
    let doc = compile(&config(), &rules(), DwellDuration::default(), &florida_blue(), true)
        .unwrap();
    assert_eq!(
        rule_ids(&doc),
        [
            "llm_compute_mode_start_dwell",
            "llm_compute_mode_commit",
            "llm_apply_light_on_mode_change",
            "llm_home_flourish_once_daily",
            "llm_reset_flourish_daily",
        ]
    );
    for rule in doc.automations() {
        rule.validate().unwrap();
        assert!(rule.alias.starts_with("Location Lighting Mode - "), "{rule}");
    }
}

#[test]
fn should_prefix_rule_ids_per_variant() {
    let config = CompileConfig {
        variant: Variant::WhereYaAtBulb,
        ..config()
    };
    let doc = compile(&config, &rules(), DwellDuration::default(), &florida_blue(), true)
        .unwrap();
    assert!(rule_ids(&doc).iter().all(|id| id.starts_with("wyab_")));
    assert!(doc.automations()[0].alias.starts_with("Where-Ya-At Bulb - "));
}

#[test]
fn should_declare_helpers_in_fixed_order() {
    let doc = compile(&config(), &rules(), DwellDuration::default(), &florida_blue(), true)
        .unwrap();
    let domains: Vec<_> = doc.helpers().iter().map(|s| s.domain.as_str()).collect();
    assert_eq!(domains, ["input_select", "input_boolean", "timer"]);
    assert_eq!(
        doc.helper("timer.mode_dwell"),
        Some(&HelperDecl::Timer {
            name: "Mode Dwell Timer".to_string(),
            duration: DwellDuration::default(),
        })
    );
    assert!(doc.helper("input_boolean.home_flourish_done_today").is_some());
    assert!(doc.helper("input_boolean.light_manual_override").is_some());
}

#[test]
fn should_list_every_mode_as_selector_option() {
    let doc = compile(
        &config(),
        &rules(),
        DwellDuration::default(),
        &LightingRuleMap::new(),
        false,
    )
    .unwrap();
    let Some(HelperDecl::Select { options, .. }) = doc.helper(DEFAULT_MODE_SELECTOR) else {
        panic!("mode selector not declared");
    };
    assert_eq!(options, &Mode::ALL);
}

#[test]
fn should_render_dwell_beyond_an_hour_as_hours() {
    let dwell = DwellDuration::from_secs(4500).unwrap();
    let doc = compile(&config(), &rules(), dwell, &LightingRuleMap::new(), false).unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["timer"]["mode_dwell"]["duration"], "01:15:00");
}

#[test]
fn should_gate_florida_lighting_on_override_off() {
    let doc = compile(&config(), &rules(), DwellDuration::default(), &florida_blue(), false)
        .unwrap();
    let rule = doc.rule("llm_apply_light_on_mode_change").unwrap();
    assert_eq!(rule.mode, RunMode::Restart);
    assert_eq!(
        rule.triggers,
        [Trigger::state_changed(entity(DEFAULT_MODE_SELECTOR))]
    );
    let [Action::Choose { choose, .. }] = rule.actions.as_slice() else {
        panic!("expected a single choose action");
    };
    assert_eq!(choose.len(), 1);
    assert_eq!(
        choose[0].conditions,
        [Condition::state(entity(DEFAULT_MODE_SELECTOR), "FLORIDA")]
    );
    assert_eq!(
        choose[0].sequence,
        [
            Action::Condition(Condition::is_off(entity(DEFAULT_OVERRIDE_FLAG))),
            Action::call_with(
                "light.turn_on",
                entity("light.living_room"),
                ServiceData::Light(LightData {
                    rgb_color: Some(Rgb([0, 0, 255])),
                    brightness: Some(200),
                    ..LightData::default()
                }),
            ),
        ]
    );
}

#[test]
fn should_produce_same_output_for_hex_and_triple_colors() {
    let hex: Rgb = "#FF8800".parse().unwrap();
    let triple: Rgb = "255,136,0".parse().unwrap();
    let render = |color| {
        let lighting = LightingRuleMap::new().with(
            Mode::Work,
            LightingDirective {
                color: Some(color),
                ..LightingDirective::default()
            },
        );
        let doc = compile(&config(), &rules(), DwellDuration::default(), &lighting, false)
            .unwrap();
        serde_json::to_string(&doc).unwrap()
    };
    assert_eq!(render(hex), render(triple));
}

#[test]
fn should_skip_lighting_and_flourish_without_light() {
    let config = CompileConfig {
        light: None,
        ..config()
    };
    let doc = compile(&config, &rules(), DwellDuration::default(), &florida_blue(), true)
        .unwrap();
    assert_eq!(
        rule_ids(&doc),
        ["llm_compute_mode_start_dwell", "llm_compute_mode_commit"]
    );
    // The flag helper is still declared so the runtime entity exists.
    assert!(doc.helper("input_boolean.home_flourish_done_today").is_some());
}

#[test]
fn should_skip_lighting_rule_when_no_mode_has_a_directive() {
    let doc = compile(
        &config(),
        &rules(),
        DwellDuration::default(),
        &LightingRuleMap::new(),
        true,
    )
    .unwrap();
    assert!(doc.rule("llm_apply_light_on_mode_change").is_none());
    assert!(doc.rule("llm_home_flourish_once_daily").is_some());
}

#[test]
fn should_skip_flourish_when_disabled() {
    let doc = compile(&config(), &rules(), DwellDuration::default(), &florida_blue(), false)
        .unwrap();
    assert!(doc.rule("llm_home_flourish_once_daily").is_none());
    assert!(doc.rule("llm_reset_flourish_daily").is_none());
    assert!(doc.helper("input_boolean.home_flourish_done_today").is_none());
}

#[test]
fn should_skip_dwell_rules_without_tracker() {
    let config = CompileConfig {
        tracker: None,
        ..config()
    };
    let doc = compile(&config, &rules(), DwellDuration::default(), &florida_blue(), false)
        .unwrap();
    assert_eq!(rule_ids(&doc), ["llm_apply_light_on_mode_change"]);
}

#[test]
fn should_emit_no_rules_for_empty_configuration() {
    let doc = compile(
        &CompileConfig::default(),
        &ZoneRuleSet::default(),
        DwellDuration::default(),
        &LightingRuleMap::new(),
        false,
    )
    .unwrap();
    assert!(doc.automations().is_empty());
    let json = serde_json::to_value(&doc).unwrap();
    assert!(json.get("automation").is_none());
}

#[test]
fn should_gate_flourish_on_override_and_daily_flag() {
    let doc = compile(&config(), &rules(), DwellDuration::default(), &florida_blue(), true)
        .unwrap();
    let rule = doc.rule("llm_home_flourish_once_daily").unwrap();
    assert_eq!(
        rule.triggers,
        [Trigger::State {
            entity_id: entity(DEFAULT_MODE_SELECTOR),
            to: ToState::Exactly("HOME".to_string()),
        }]
    );
    assert_eq!(
        rule.conditions,
        [
            Condition::is_off(entity(DEFAULT_OVERRIDE_FLAG)),
            Condition::is_off(entity("input_boolean.home_flourish_done_today")),
        ]
    );
    assert_eq!(
        rule.actions.last(),
        Some(&Action::call(
            "input_boolean.turn_on",
            entity("input_boolean.home_flourish_done_today")
        ))
    );

    let reset = doc.rule("llm_reset_flourish_daily").unwrap();
    let json = serde_json::to_value(reset).unwrap();
    assert_eq!(json["trigger"][0]["platform"], "time");
    assert_eq!(json["trigger"][0]["at"], "00:00:05");
}

#[test]
fn should_restart_dwell_on_value_change_of_tracker() {
    let doc = compile(&config(), &rules(), DwellDuration::default(), &florida_blue(), false)
        .unwrap();
    let rule = doc.rule("llm_compute_mode_start_dwell").unwrap();
    assert_eq!(rule.mode, RunMode::Restart);
    let json = serde_json::to_value(rule).unwrap();
    assert_eq!(json["trigger"][0]["entity_id"], "device_tracker.pixel");
    assert!(json["trigger"][0]["to"].is_null());
    assert!(
        json["action"][0]["variables"]["candidate"]
            .as_str()
            .unwrap()
            .starts_with("{% set loc = states('device_tracker.pixel') %}")
    );
    let cancel = &json["action"][1]["choose"][0];
    assert_eq!(
        cancel["conditions"][0]["value_template"],
        "{{ candidate == states('input_select.location_mode') }}"
    );
    assert_eq!(cancel["sequence"][0]["service"], "timer.cancel");
}

#[test]
fn should_commit_through_select_option_of_selector_domain() {
    let doc = compile(&config(), &rules(), DwellDuration::default(), &florida_blue(), false)
        .unwrap();
    let rule = doc.rule("llm_compute_mode_commit").unwrap();
    assert_eq!(
        rule.triggers,
        [Trigger::timer_finished(entity("timer.mode_dwell"))]
    );
    assert_eq!(
        rule.actions.last(),
        Some(&Action::call_with(
            "input_select.select_option",
            entity(DEFAULT_MODE_SELECTOR),
            ServiceData::SelectOption {
                option: "{{ candidate }}".to_string()
            },
        ))
    );
}

#[test]
fn should_fail_when_override_flag_is_the_mode_selector() {
    let config = CompileConfig {
        override_flag: entity(DEFAULT_MODE_SELECTOR),
        ..config()
    };
    let err = compile(&config, &rules(), DwellDuration::default(), &florida_blue(), true)
        .unwrap_err();
    let dup = match err {
        LocModeError::DuplicateHelper(dup) => dup,
        other => panic!("expected duplicate helper, got {other:?}"),
    };
    assert_eq!(dup.entity_id, DEFAULT_MODE_SELECTOR);
    assert_eq!(dup.first, "location_mode_entity");
    assert_eq!(dup.second, "manual_override_entity");
}

#[test]
fn should_fail_when_override_flag_collides_with_flourish_flag() {
    let config = CompileConfig {
        override_flag: entity("input_boolean.home_flourish_done_today"),
        ..config()
    };
    assert!(matches!(
        compile(&config, &rules(), DwellDuration::default(), &florida_blue(), true),
        Err(LocModeError::DuplicateHelper(_))
    ));
    // Without the flourish the flag is not declared, so there is no clash.
    assert!(compile(&config, &rules(), DwellDuration::default(), &florida_blue(), false).is_ok());
}

#[test]
fn should_parse_variant_names() {
    assert_eq!(
        "where_ya_at_bulb".parse::<Variant>().unwrap(),
        Variant::WhereYaAtBulb
    );
    assert!("wyab".parse::<Variant>().is_err());
    assert_eq!(
        Variant::default().default_package_path(),
        "packages/location_lighting_mode_generated.yaml"
    );
}
