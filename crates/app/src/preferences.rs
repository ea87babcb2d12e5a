//! Preference document: the user's saved settings layered over the add-on
//! options, and their resolution into compiler inputs.
//!
//! Both layers share one schema. Values are kept loosely typed
//! ([`serde_json::Value`]) where the input is known to vary: numbers may
//! arrive as strings, colors as a list, an `"r,g,b"` string or a hex code.
//! Everything is checked in [`Preferences::resolve`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use locmode_domain::compiler::{
    CompileConfig, DEFAULT_MODE_SELECTOR, DEFAULT_OVERRIDE_FLAG, Variant,
};
use locmode_domain::entity_ref::EntityRef;
use locmode_domain::error::{
    ColorFormatError, LocModeError, NumericFieldError, PackagePathError,
};
use locmode_domain::lighting::{LightingDirective, LightingRuleMap, Rgb};
use locmode_domain::mode::Mode;
use locmode_domain::time::DwellDuration;
use locmode_domain::zone::ZoneRuleSet;

/// Shopping prefix used when none is configured.
pub const DEFAULT_SHOPPING_PREFIX: &str = "shopping_";

/// One layer of settings. Absent and blank values defer to the next layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_tracker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_mode_entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_override_entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dwell_seconds: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones_florida: Option<ZoneList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_work: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_airport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopping_prefix: Option<String>,
    /// Lighting per mode name (`FLORIDA`, `WORK`, ...).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub colors: BTreeMap<String, ColorPreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flourish_enabled: Option<bool>,
    /// Output path relative to the Home Assistant config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_path: Option<String>,
}

/// Florida zones, either as a JSON list or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneList {
    List(Vec<String>),
    Csv(String),
}

impl ZoneList {
    /// Trimmed, non-blank zone ids in input order.
    #[must_use]
    pub fn zones(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Csv(joined) => joined.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|z| !z.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

/// Lighting settings for one mode. `rgb` takes precedence over `hex`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPreference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

/// A preference that was ignored without failing the compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The mode's color is malformed; the mode gets no lighting action.
    InvalidColor { mode: Mode, error: ColorFormatError },
    /// A `colors` key that names no mode.
    UnknownMode(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { mode, error } => {
                write!(f, "{mode}: {error}, no lighting action for this mode")
            }
            Self::UnknownMode(key) => write!(f, "colors: `{key}` is not a mode, ignored"),
        }
    }
}

/// Everything the compiler and the package writer need.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: CompileConfig,
    pub rules: ZoneRuleSet,
    pub dwell: DwellDuration,
    pub lighting: LightingRuleMap,
    pub flourish_enabled: bool,
    pub package_path: String,
    pub warnings: Vec<Warning>,
}

impl Preferences {
    /// Parse the add-on options JSON. Malformed input yields empty options.
    #[must_use]
    pub fn from_options_json(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring malformed add-on options");
            Self::default()
        })
    }

    /// Layer `self` over `fallback`: every key set in `self` wins.
    #[must_use]
    pub fn merged_over(self, fallback: Self) -> Self {
        let mut colors = fallback.colors;
        colors.extend(self.colors);
        Self {
            phone_tracker: first_text(self.phone_tracker, fallback.phone_tracker),
            light_entity: first_text(self.light_entity, fallback.light_entity),
            location_mode_entity: first_text(
                self.location_mode_entity,
                fallback.location_mode_entity,
            ),
            manual_override_entity: first_text(
                self.manual_override_entity,
                fallback.manual_override_entity,
            ),
            dwell_seconds: first_value(self.dwell_seconds, fallback.dwell_seconds),
            zones_florida: self
                .zones_florida
                .filter(|z| !z.zones().is_empty())
                .or(fallback.zones_florida),
            zone_work: first_text(self.zone_work, fallback.zone_work),
            zone_airport: first_text(self.zone_airport, fallback.zone_airport),
            shopping_prefix: first_text(self.shopping_prefix, fallback.shopping_prefix),
            colors,
            flourish_enabled: self.flourish_enabled.or(fallback.flourish_enabled),
            package_path: first_text(self.package_path, fallback.package_path),
        }
    }

    /// Validate every field and build the compiler inputs.
    ///
    /// # Errors
    ///
    /// Returns [`LocModeError::InvalidEntityId`],
    /// [`LocModeError::InvalidNumericField`] or
    /// [`LocModeError::InvalidPackagePath`] naming the offending field.
    /// Malformed colors are not errors; they are reported in
    /// [`Resolved::warnings`].
    pub fn resolve(&self, variant: Variant) -> Result<Resolved, LocModeError> {
        let config = CompileConfig {
            variant,
            tracker: EntityRef::parse_optional(
                "phone_tracker",
                self.phone_tracker.as_deref().unwrap_or_default(),
            )?,
            light: EntityRef::parse_optional(
                "light_entity",
                self.light_entity.as_deref().unwrap_or_default(),
            )?,
            mode_selector: EntityRef::parse(
                "location_mode_entity",
                text_or(self.location_mode_entity.as_deref(), DEFAULT_MODE_SELECTOR),
            )?,
            override_flag: EntityRef::parse(
                "manual_override_entity",
                text_or(self.manual_override_entity.as_deref(), DEFAULT_OVERRIDE_FLAG),
            )?,
        };

        let mut rules = ZoneRuleSet::builder().shopping_prefix(text_or(
            self.shopping_prefix.as_deref(),
            DEFAULT_SHOPPING_PREFIX,
        ));
        if let Some(zones) = &self.zones_florida {
            rules = rules.florida_zones(zones.zones());
        }
        if let Some(zone) = &self.zone_work {
            rules = rules.work_zone(zone.as_str());
        }
        if let Some(zone) = &self.zone_airport {
            rules = rules.airport_zone(zone.as_str());
        }

        let (lighting, warnings) = self.lighting()?;

        Ok(Resolved {
            config,
            rules: rules.build(),
            dwell: dwell_duration(self.dwell_seconds.as_ref())?,
            lighting,
            flourish_enabled: self.flourish_enabled.unwrap_or(false),
            package_path: package_path(text_or(
                self.package_path.as_deref(),
                variant.default_package_path(),
            ))?,
            warnings,
        })
    }

    fn lighting(&self) -> Result<(LightingRuleMap, Vec<Warning>), NumericFieldError> {
        let mut lighting = LightingRuleMap::new();
        let mut warnings = Vec::new();
        for (key, pref) in &self.colors {
            let Ok(mode) = key.parse::<Mode>() else {
                warnings.push(Warning::UnknownMode(key.clone()));
                continue;
            };
            let brightness = brightness(mode, pref.brightness.as_ref())?;
            let color = match color(pref) {
                Ok(color) => color,
                Err(error) => {
                    warnings.push(Warning::InvalidColor { mode, error });
                    continue;
                }
            };
            let effect = pref
                .effect
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(ToString::to_string);
            lighting.insert(
                mode,
                LightingDirective {
                    color,
                    brightness,
                    effect,
                },
            );
        }
        Ok((lighting, warnings))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_set(value: &Value) -> bool {
    !value.is_null() && value.as_str().is_none_or(|s| !is_blank(s))
}

fn first_text(value: Option<String>, fallback: Option<String>) -> Option<String> {
    value
        .filter(|v| !is_blank(v))
        .or_else(|| fallback.filter(|v| !is_blank(v)))
}

fn first_value(value: Option<Value>, fallback: Option<Value>) -> Option<Value> {
    value.filter(is_set).or_else(|| fallback.filter(is_set))
}

fn text_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.filter(|v| !is_blank(v)).unwrap_or(default)
}

/// Read an optional integer that may be encoded as a JSON number or string.
fn integer_field(
    field: &str,
    value: Option<&Value>,
    expected: &'static str,
) -> Result<Option<i64>, NumericFieldError> {
    let invalid = |raw: String| NumericFieldError {
        field: field.to_string(),
        value: raw,
        expected,
    };
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) if is_blank(s) => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid(s.clone())),
        Some(other) => Err(invalid(other.to_string())),
    }
}

/// Only plain components: no root, no `..`, no `.`.
fn package_path(raw: &str) -> Result<String, PackagePathError> {
    let trimmed = raw.trim();
    let path = Path::new(trimmed);
    if path
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        Ok(trimmed.to_string())
    } else {
        Err(PackagePathError(raw.to_string()))
    }
}

fn dwell_duration(value: Option<&Value>) -> Result<DwellDuration, NumericFieldError> {
    const EXPECTED: &str = "a positive integer";
    let Some(seconds) = integer_field("dwell_seconds", value, EXPECTED)? else {
        return Ok(DwellDuration::default());
    };
    let seconds = u32::try_from(seconds).map_err(|_| NumericFieldError {
        field: "dwell_seconds".to_string(),
        value: seconds.to_string(),
        expected: EXPECTED,
    })?;
    DwellDuration::from_secs(seconds)
}

fn brightness(mode: Mode, value: Option<&Value>) -> Result<Option<u8>, NumericFieldError> {
    const EXPECTED: &str = "an integer in 0..=255";
    let field = format!("colors.{mode}.brightness");
    integer_field(&field, value, EXPECTED)?
        .map(|b| {
            u8::try_from(b).map_err(|_| NumericFieldError {
                field: field.clone(),
                value: b.to_string(),
                expected: EXPECTED,
            })
        })
        .transpose()
}

fn color(pref: &ColorPreference) -> Result<Option<Rgb>, ColorFormatError> {
    if let Some(rgb) = pref.rgb.as_ref().filter(|v| is_set(v)) {
        return match rgb {
            Value::Array(items) => {
                let components = items
                    .iter()
                    .map(|item| {
                        item.as_i64()
                            .ok_or_else(|| ColorFormatError::Component(item.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Rgb::from_components(&components).map(Some)
            }
            Value::String(s) => s.parse().map(Some),
            other => Err(ColorFormatError::Unsupported(other.to_string())),
        };
    }
    pref.hex
        .as_deref()
        .filter(|h| !is_blank(h))
        .map(Rgb::from_hex)
        .transpose()
}
