//! Mode classifier: maps a raw tracker value to a [`Mode`].
//!
//! [`classify`] is the reference evaluation used in-process; the template
//! functions render the same ordered rule chain as Jinja that the rule
//! runtime evaluates against live tracker state. Both walk
//! [`ZoneRuleSet::rules`], so they cannot disagree on precedence.

use crate::entity_ref::EntityRef;
use crate::mode::Mode;
use crate::zone::{ZoneRule, ZoneRuleSet};

/// Classify a tracker value. First matching rule wins; no match is
/// [`Mode::Unknown`]. Total over all strings, including the empty one.
#[must_use]
pub fn classify(location_value: &str, rules: &ZoneRuleSet) -> Mode {
    rules
        .rules()
        .iter()
        .find(|rule| rule.matches(location_value))
        .map_or(Mode::Unknown, ZoneRule::mode)
}

/// Render the classifier as a Jinja template reading `tracker`'s current state.
#[must_use]
pub fn candidate_template(tracker: &EntityRef, rules: &ZoneRuleSet) -> String {
    classification_template(
        &format!("states({})", jinja_literal(&tracker.to_string())),
        rules,
    )
}

/// Render the classifier over the state the tracker had before the change
/// that fired the current state trigger.
#[must_use]
pub fn previous_template(rules: &ZoneRuleSet) -> String {
    classification_template(
        "(trigger.from_state.state if trigger.from_state else '')",
        rules,
    )
}

/// Render the ordered rule chain over an arbitrary Jinja `source` expression.
#[must_use]
pub fn classification_template(source: &str, rules: &ZoneRuleSet) -> String {
    let mut lines = Vec::with_capacity(7);
    lines.push(format!("{{% set loc = {source} %}}"));
    for (index, rule) in rules.rules().iter().enumerate() {
        let keyword = if index == 0 { "if" } else { "elif" };
        let test = match rule {
            ZoneRule::AnyOf { zones, .. } => {
                let items: Vec<_> = zones.iter().map(|z| jinja_literal(z)).collect();
                format!("loc in [{}]", items.join(", "))
            }
            ZoneRule::Exact { zone, .. } => format!("loc == {}", jinja_literal(zone)),
            ZoneRule::Prefix { prefix, .. } => {
                format!("loc.startswith({})", jinja_literal(prefix))
            }
        };
        lines.push(format!("{{% {keyword} {test} %}}{}", rule.mode()));
    }
    lines.push(format!("{{% else %}}{}{{% endif %}}", Mode::Unknown));
    lines.join("\n")
}

/// Quote `value` as a single-quoted Jinja string literal.
#[must_use]
pub fn jinja_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
