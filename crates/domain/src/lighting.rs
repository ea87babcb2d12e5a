//! Lighting: what the target light should look like in each [`Mode`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ColorFormatError;
use crate::mode::Mode;

/// A normalized RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Build a color from exactly three integer components in `0..=255`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorFormatError::Arity`] for the wrong number of components
    /// and [`ColorFormatError::Component`] for out-of-range ones.
    pub fn from_components(components: &[i64]) -> Result<Self, ColorFormatError> {
        let [r, g, b] = components else {
            return Err(ColorFormatError::Arity(components.len()));
        };
        let channel =
            |c: i64| u8::try_from(c).map_err(|_| ColorFormatError::Component(c.to_string()));
        Ok(Self([channel(*r)?, channel(*g)?, channel(*b)?]))
    }

    /// Parse `#RRGGBB` / `RRGGBB`, case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ColorFormatError::Hex`] for anything that is not exactly six
    /// hex digits after an optional leading `#`.
    pub fn from_hex(value: &str) -> Result<Self, ColorFormatError> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorFormatError::Hex(value.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorFormatError::Hex(value.to_string()))
        };
        Ok(Self([channel(0)?, channel(2)?, channel(4)?]))
    }
}

/// Accepts either `"r,g,b"` or a hex string.
impl FromStr for Rgb {
    type Err = ColorFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains(',') {
            return Self::from_hex(s);
        }
        let components = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<i64>()
                    .map_err(|_| ColorFormatError::Component(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_components(&components)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{r},{g},{b}")
    }
}

/// How the light should look in one mode. Unset fields are left to the
/// light's current state, never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightingDirective {
    pub color: Option<Rgb>,
    pub brightness: Option<u8>,
    pub effect: Option<String>,
}

impl LightingDirective {
    /// A directive with no field set means "no lighting action".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.brightness.is_none() && self.effect.is_none()
    }
}

/// Non-empty lighting directives keyed by mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightingRuleMap {
    directives: BTreeMap<Mode, LightingDirective>,
}

impl LightingRuleMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directive for `mode`. An empty directive clears the mode.
    pub fn insert(&mut self, mode: Mode, directive: LightingDirective) {
        if directive.is_empty() {
            self.directives.remove(&mode);
        } else {
            self.directives.insert(mode, directive);
        }
    }

    #[must_use]
    pub fn with(mut self, mode: Mode, directive: LightingDirective) -> Self {
        self.insert(mode, directive);
        self
    }

    /// Directives in selector order ([`Mode::ALL`]).
    pub fn iter(&self) -> impl Iterator<Item = (Mode, &LightingDirective)> {
        self.directives.iter().map(|(mode, d)| (*mode, d))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

/// The directive to apply when `mode` becomes active, if any.
#[must_use]
pub fn lighting_for(mode: Mode, map: &LightingRuleMap) -> Option<&LightingDirective> {
    map.directives.get(&mode)
}
