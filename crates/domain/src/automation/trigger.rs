//! Trigger: the event pattern that activates an automation.

use chrono::NaiveTime;
use serde::{Serialize, Serializer};

use crate::entity_ref::EntityRef;

/// Describes what should activate an automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "platform", rename_all = "snake_case")]
pub enum Trigger {
    /// Fires when an entity changes state.
    State {
        entity_id: EntityRef,
        to: ToState,
    },
    /// Fires when the runtime emits an event of the given type about an entity.
    Event {
        event_type: String,
        event_data: EventData,
    },
    /// Fires once a day at a fixed local time.
    Time { at: NaiveTime },
}

/// Which state changes a [`Trigger::State`] reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToState {
    /// Only updates that change the state value. Serialized as `null`.
    ValueChange,
    /// Only transitions into this state.
    Exactly(String),
}

impl Serialize for ToState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::ValueChange => serializer.serialize_none(),
            Self::Exactly(state) => serializer.serialize_str(state),
        }
    }
}

/// Filter on the payload of an [`Trigger::Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventData {
    pub entity_id: EntityRef,
}

impl Trigger {
    /// An update of `entity_id` that changes its state value; attribute-only
    /// updates (e.g. GPS accuracy) are ignored.
    #[must_use]
    pub fn state_changed(entity_id: EntityRef) -> Self {
        Self::State {
            entity_id,
            to: ToState::ValueChange,
        }
    }

    /// A state change of `entity_id` into `to`.
    #[must_use]
    pub fn state_to(entity_id: EntityRef, to: impl Into<String>) -> Self {
        Self::State {
            entity_id,
            to: ToState::Exactly(to.into()),
        }
    }

    /// The `timer.finished` event of `timer`.
    #[must_use]
    pub fn timer_finished(timer: EntityRef) -> Self {
        Self::Event {
            event_type: "timer.finished".to_string(),
            event_data: EventData { entity_id: timer },
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::State { entity_id, to } => match to {
                ToState::ValueChange => write!(f, "state({entity_id} changed)"),
                ToState::Exactly(to) => write!(f, "state({entity_id} -> {to})"),
            },
            Self::Event {
                event_type,
                event_data,
            } => write!(f, "event({event_type}, {})", event_data.entity_id),
            Self::Time { at } => write!(f, "time({at})"),
        }
    }
}
