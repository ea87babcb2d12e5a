//! Action: the steps the runtime performs when an automation fires.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::automation::Condition;
use crate::entity_ref::EntityRef;
use crate::lighting::{LightingDirective, Rgb};
use crate::time::hms;

/// One step of an action sequence.
///
/// The runtime distinguishes steps by their keys, so the variants are
/// serialized untagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Action {
    /// Bind template variables for the rest of the sequence.
    Variables {
        variables: BTreeMap<String, String>,
    },
    /// Run the sequence of the first option whose conditions hold, or
    /// `default` when none do.
    Choose {
        choose: Vec<ChooseOption>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        default: Vec<Action>,
    },
    /// Stop the sequence unless the condition holds.
    Condition(Condition),
    /// Invoke a service on a target entity.
    Service {
        service: String,
        target: Target,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<ServiceData>,
    },
    /// Wait before continuing, `HH:MM:SS`.
    Delay { delay: String },
}

/// A guarded branch of an [`Action::Choose`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChooseOption {
    pub conditions: Vec<Condition>,
    pub sequence: Vec<Action>,
}

/// Service call target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub entity_id: EntityRef,
}

/// Service call payloads the compiler emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ServiceData {
    Light(LightData),
    SelectOption { option: String },
}

/// Payload of `light.turn_on`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LightData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb_color: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<Flash>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flash {
    Short,
}

impl From<&LightingDirective> for LightData {
    fn from(directive: &LightingDirective) -> Self {
        Self {
            rgb_color: directive.color,
            brightness: directive.brightness,
            effect: directive.effect.clone(),
            flash: None,
        }
    }
}

impl Action {
    /// Call `service` on `entity_id` without payload.
    #[must_use]
    pub fn call(service: impl Into<String>, entity_id: EntityRef) -> Self {
        Self::Service {
            service: service.into(),
            target: Target { entity_id },
            data: None,
        }
    }

    /// Call `service` on `entity_id` with a payload.
    #[must_use]
    pub fn call_with(service: impl Into<String>, entity_id: EntityRef, data: ServiceData) -> Self {
        Self::Service {
            service: service.into(),
            target: Target { entity_id },
            data: Some(data),
        }
    }

    /// Bind a single template variable.
    #[must_use]
    pub fn variable(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::Variables {
            variables: BTreeMap::from([(name.into(), template.into())]),
        }
    }

    #[must_use]
    pub fn delay_secs(seconds: u32) -> Self {
        Self::Delay {
            delay: hms(seconds),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Variables { variables } => {
                let names: Vec<_> = variables.keys().map(String::as_str).collect();
                write!(f, "variables({})", names.join(", "))
            }
            Self::Choose { choose, default } => {
                write!(f, "choose({} options", choose.len())?;
                if !default.is_empty() {
                    f.write_str(", default")?;
                }
                f.write_str(")")
            }
            Self::Condition(condition) => write!(f, "{condition}"),
            Self::Service {
                service, target, ..
            } => write!(f, "call_service({service}, {})", target.entity_id),
            Self::Delay { delay } => write!(f, "delay({delay})"),
        }
    }
}
