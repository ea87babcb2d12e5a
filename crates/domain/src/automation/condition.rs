//! Condition: a guard that must be true for the automation to proceed.

use serde::Serialize;

use crate::entity_ref::EntityRef;

/// A predicate the runtime evaluates against live state.
///
/// Conditions listed on an automation are combined with logical AND. The
/// same shape is used inline in action sequences, where a failing condition
/// stops the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum Condition {
    /// Requires an entity to be in a given state.
    State { entity_id: EntityRef, state: String },
    /// Requires a Jinja template to render truthy.
    Template { value_template: String },
}

impl Condition {
    #[must_use]
    pub fn state(entity_id: EntityRef, state: impl Into<String>) -> Self {
        Self::State {
            entity_id,
            state: state.into(),
        }
    }

    /// The entity must be `off`; used for the override and flourish gates.
    #[must_use]
    pub fn is_off(entity_id: EntityRef) -> Self {
        Self::state(entity_id, "off")
    }

    #[must_use]
    pub fn template(value_template: impl Into<String>) -> Self {
        Self::Template {
            value_template: value_template.into(),
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State { entity_id, state } => write!(f, "state_is({entity_id}, {state})"),
            Self::Template { value_template } => write!(f, "template({value_template})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_state_condition_with_tag() {
        let c = Condition::is_off(EntityRef::parse("t", "input_boolean.o").unwrap());
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            serde_json::json!({"condition": "state", "entity_id": "input_boolean.o", "state": "off"})
        );
    }

    #[test]
    fn should_serialize_template_condition_with_tag() {
        let c = Condition::template("{{ true }}");
        assert_eq!(
            serde_json::to_value(&c).unwrap(),
            serde_json::json!({"condition": "template", "value_template": "{{ true }}"})
        );
    }

    #[test]
    fn should_display_state_condition() {
        let c = Condition::state(EntityRef::parse("t", "input_select.m").unwrap(), "HOME");
        assert_eq!(c.to_string(), "state_is(input_select.m, HOME)");
    }
}
