//! Rule compiler: turns zone rules, dwell settings and lighting directives
//! into one [`CompiledDocument`].
//!
//! Sections are emitted in a fixed order:
//!
//! 1. helpers: mode selector, override flag, dwell timer, and the
//!    once-daily flourish flag when the flourish is enabled
//! 2. the two dwell rules (start/restart on location change, commit on expiry)
//! 3. the lighting-apply rule
//! 4. the arrival flourish rule and its daily reset
//!
//! Compilation is pure: the same inputs always produce the same document,
//! and any error aborts before a document is returned.

mod rules;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::document::{CompiledDocument, HelperDecl};
use crate::entity_ref::EntityRef;
use crate::error::LocModeError;
use crate::lighting::LightingRuleMap;
use crate::mode::Mode;
use crate::time::DwellDuration;
use crate::zone::ZoneRuleSet;

/// Default entity id of the mode selector helper.
pub const DEFAULT_MODE_SELECTOR: &str = "input_select.location_mode";
/// Default entity id of the manual override helper.
pub const DEFAULT_OVERRIDE_FLAG: &str = "input_boolean.light_manual_override";

/// Branding of the generated rules. Both products share one compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    LocationLightingMode,
    WhereYaAtBulb,
}

impl Variant {
    /// Prefix of every rule id.
    #[must_use]
    pub fn rule_prefix(self) -> &'static str {
        match self {
            Self::LocationLightingMode => "llm",
            Self::WhereYaAtBulb => "wyab",
        }
    }

    /// Human-readable product name used in rule aliases.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::LocationLightingMode => "Location Lighting Mode",
            Self::WhereYaAtBulb => "Where-Ya-At Bulb",
        }
    }

    /// Package path relative to the Home Assistant config directory.
    #[must_use]
    pub fn default_package_path(self) -> &'static str {
        match self {
            Self::LocationLightingMode => "packages/location_lighting_mode_generated.yaml",
            Self::WhereYaAtBulb => "packages/where_ya_at_bulb_generated.yaml",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::LocationLightingMode => "location_lighting_mode",
            Self::WhereYaAtBulb => "where_ya_at_bulb",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant `{0}`, expected `location_lighting_mode` or `where_ya_at_bulb`")]
pub struct UnknownVariantError(pub String);

impl FromStr for Variant {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::LocationLightingMode, Self::WhereYaAtBulb]
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| UnknownVariantError(s.to_string()))
    }
}

/// Installation-specific entity wiring, passed explicitly into [`compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
    pub variant: Variant,
    /// Location source. Without it no dwell rules are emitted.
    pub tracker: Option<EntityRef>,
    /// Light to drive. Without it no lighting or flourish rules are emitted.
    pub light: Option<EntityRef>,
    pub mode_selector: EntityRef,
    pub override_flag: EntityRef,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            tracker: None,
            light: None,
            mode_selector: EntityRef::from_parts("input_select", "location_mode"),
            override_flag: EntityRef::from_parts("input_boolean", "light_manual_override"),
        }
    }
}

/// Helpers the compiler always names the same way.
pub(crate) fn dwell_timer() -> EntityRef {
    EntityRef::from_parts("timer", "mode_dwell")
}

pub(crate) fn flourish_flag() -> EntityRef {
    EntityRef::from_parts("input_boolean", "home_flourish_done_today")
}

/// Compile the full package document.
///
/// # Errors
///
/// Returns [`LocModeError::DuplicateHelper`] when two helpers resolve to the
/// same entity id (e.g. the override flag is configured as the mode
/// selector), or [`LocModeError::InvalidRule`] if a rule cannot be built.
pub fn compile(
    config: &CompileConfig,
    rules: &ZoneRuleSet,
    dwell: DwellDuration,
    lighting: &LightingRuleMap,
    flourish_enabled: bool,
) -> Result<CompiledDocument, LocModeError> {
    let mut doc = CompiledDocument::default();

    doc.declare(
        &config.mode_selector,
        "location_mode_entity",
        HelperDecl::Select {
            name: "Location Mode".to_string(),
            options: Mode::ALL.to_vec(),
        },
    )?;
    doc.declare(
        &config.override_flag,
        "manual_override_entity",
        HelperDecl::Toggle {
            name: "Light Manual Override".to_string(),
        },
    )?;
    if flourish_enabled {
        doc.declare(
            &flourish_flag(),
            "flourish_enabled",
            HelperDecl::Toggle {
                name: "Home Arrival Flourish Done Today".to_string(),
            },
        )?;
    }
    doc.declare(
        &dwell_timer(),
        "dwell_seconds",
        HelperDecl::Timer {
            name: "Mode Dwell Timer".to_string(),
            duration: dwell,
        },
    )?;

    let names = rules::RuleNames::new(config.variant);

    if let Some(tracker) = &config.tracker {
        doc.push_rule(rules::start_dwell(&names, config, tracker, rules)?);
        doc.push_rule(rules::commit_dwell(&names, config, tracker, rules)?);
    }

    if let Some(light) = &config.light {
        if let Some(rule) = rules::apply_lighting(&names, config, light, lighting)? {
            doc.push_rule(rule);
        }
        if flourish_enabled {
            doc.push_rule(rules::home_flourish(&names, config, light)?);
            doc.push_rule(rules::reset_flourish(&names)?);
        }
    }

    Ok(doc)
}

#[cfg(test)]
mod tests;
