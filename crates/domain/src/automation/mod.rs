//! Automation: trigger → condition → action rules, as the rule runtime
//! reads them.
//!
//! The compiler never executes these rules. Each automation has one or more
//! [`Trigger`]s that determine when it activates, optional [`Condition`]s
//! that must all hold, and the [`Action`]s the runtime runs in order.

mod action;
mod condition;
mod trigger;

pub use action::{Action, ChooseOption, Flash, LightData, ServiceData, Target};
pub use condition::Condition;
pub use trigger::{EventData, ToState, Trigger};

use serde::Serialize;

/// How the runtime handles a new trigger while a previous run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Ignore new triggers while running.
    #[default]
    Single,
    /// Abort the running instance and start over.
    Restart,
}

/// Structural problems in a rule definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("rule id must not be empty")]
    EmptyId,
    #[error("rule `{0}` has no alias")]
    EmptyAlias(String),
    #[error("rule `{0}` has no trigger")]
    NoTriggers(String),
    #[error("rule `{0}` has no action")]
    NoActions(String),
}

/// A rule that reacts to state changes, events or time by running actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Automation {
    pub id: String,
    pub alias: String,
    #[serde(rename = "trigger")]
    pub triggers: Vec<Trigger>,
    #[serde(rename = "condition", skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(rename = "action")]
    pub actions: Vec<Action>,
    pub mode: RunMode,
}

impl Automation {
    /// Create a builder for constructing an [`Automation`].
    #[must_use]
    pub fn builder() -> AutomationBuilder {
        AutomationBuilder::default()
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the id or alias is empty, or when there is
    /// no trigger or no action.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.id.is_empty() {
            return Err(RuleError::EmptyId);
        }
        if self.alias.is_empty() {
            return Err(RuleError::EmptyAlias(self.id.clone()));
        }
        if self.triggers.is_empty() {
            return Err(RuleError::NoTriggers(self.id.clone()));
        }
        if self.actions.is_empty() {
            return Err(RuleError::NoActions(self.id.clone()));
        }
        Ok(())
    }
}

impl std::fmt::Display for Automation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.id, self.alias)
    }
}

/// Step-by-step builder for [`Automation`].
#[derive(Debug, Default)]
pub struct AutomationBuilder {
    id: Option<String>,
    alias: Option<String>,
    triggers: Vec<Trigger>,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
    mode: Option<RunMode>,
}

impl AutomationBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: RunMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Consume the builder, validate, and return an [`Automation`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if required fields are missing or empty.
    pub fn build(self) -> Result<Automation, RuleError> {
        let automation = Automation {
            id: self.id.unwrap_or_default(),
            alias: self.alias.unwrap_or_default(),
            triggers: self.triggers,
            conditions: self.conditions,
            actions: self.actions,
            mode: self.mode.unwrap_or_default(),
        };
        automation.validate()?;
        Ok(automation)
    }
}
