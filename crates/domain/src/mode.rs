//! Mode: the discrete classification of where the household currently is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Location mode derived from the tracker value.
///
/// The declaration order is the option order of the mode selector helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Florida,
    Work,
    Home,
    Shopping,
    Traveling,
    #[default]
    Unknown,
}

impl Mode {
    /// Every mode, in selector option order.
    pub const ALL: [Mode; 6] = [
        Self::Florida,
        Self::Work,
        Self::Home,
        Self::Shopping,
        Self::Traveling,
        Self::Unknown,
    ];

    /// The literal the mode selector holds for this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Florida => "FLORIDA",
            Self::Work => "WORK",
            Self::Home => "HOME",
            Self::Shopping => "SHOPPING",
            Self::Traveling => "TRAVELING",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the six mode literals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode `{0}`")]
pub struct UnknownModeError(pub String);

impl FromStr for Mode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownModeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_unknown() {
        assert_eq!(Mode::default(), Mode::Unknown);
    }

    #[test]
    fn should_list_modes_in_selector_order() {
        let names: Vec<_> = Mode::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(
            names,
            ["FLORIDA", "WORK", "HOME", "SHOPPING", "TRAVELING", "UNKNOWN"]
        );
    }

    #[test]
    fn should_parse_case_insensitively() {
        assert_eq!("home".parse::<Mode>().unwrap(), Mode::Home);
        assert_eq!("Traveling".parse::<Mode>().unwrap(), Mode::Traveling);
        assert!("BEACH".parse::<Mode>().is_err());
    }

    #[test]
    fn should_serialize_as_uppercase_literal() {
        assert_eq!(serde_json::to_string(&Mode::Shopping).unwrap(), "\"SHOPPING\"");
        let parsed: Mode = serde_json::from_str("\"FLORIDA\"").unwrap();
        assert_eq!(parsed, Mode::Florida);
    }
}
