//! Typed references to Home Assistant entities (`domain.object_id`).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::EntityIdError;

/// A validated `domain.object_id` entity reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    domain: String,
    object_id: String,
}

impl EntityRef {
    /// Parse `raw` as an entity id, naming `field` in the error.
    ///
    /// Surrounding whitespace is trimmed. The id is split on the first `.`.
    ///
    /// # Errors
    ///
    /// Returns [`EntityIdError`] when there is no `.` separator or either
    /// side of it is empty.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, EntityIdError> {
        let trimmed = raw.trim();
        match trimmed.split_once('.') {
            Some((domain, object_id)) if !domain.is_empty() && !object_id.is_empty() => Ok(Self {
                domain: domain.to_string(),
                object_id: object_id.to_string(),
            }),
            _ => Err(EntityIdError {
                field,
                value: raw.to_string(),
            }),
        }
    }

    /// Build a reference from parts known to be valid.
    pub(crate) fn from_parts(domain: &str, object_id: &str) -> Self {
        Self {
            domain: domain.to_string(),
            object_id: object_id.to_string(),
        }
    }

    /// Parse an optional entity id where an empty string means "not configured".
    ///
    /// # Errors
    ///
    /// Same as [`EntityRef::parse`] for non-empty input.
    pub fn parse_optional(field: &'static str, raw: &str) -> Result<Option<Self>, EntityIdError> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(field, raw).map(Some)
    }

    /// The integration domain, e.g. `input_select`.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The object id within the domain, e.g. `location_mode`.
    #[must_use]
    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.object_id)
    }
}

impl Serialize for EntityRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_split_domain_and_object_id() {
        let e = EntityRef::parse("phone_tracker", "device_tracker.pixel").unwrap();
        assert_eq!(e.domain(), "device_tracker");
        assert_eq!(e.object_id(), "pixel");
        assert_eq!(e.to_string(), "device_tracker.pixel");
    }

    #[test]
    fn should_split_on_first_dot_only() {
        let e = EntityRef::parse("light_entity", "light.living.room").unwrap();
        assert_eq!(e.domain(), "light");
        assert_eq!(e.object_id(), "living.room");
    }

    #[test]
    fn should_trim_surrounding_whitespace() {
        let e = EntityRef::parse("light_entity", "  light.desk ").unwrap();
        assert_eq!(e.to_string(), "light.desk");
    }

    #[test]
    fn should_reject_missing_separator_and_name_the_field() {
        let err = EntityRef::parse("location_mode_entity", "location_mode").unwrap_err();
        assert_eq!(err.field, "location_mode_entity");
        assert_eq!(err.value, "location_mode");
    }

    #[test]
    fn should_reject_empty_domain_or_object_id() {
        assert!(EntityRef::parse("f", ".x").is_err());
        assert!(EntityRef::parse("f", "x.").is_err());
    }

    #[test]
    fn should_treat_blank_optional_as_unset() {
        assert_eq!(EntityRef::parse_optional("light_entity", "  ").unwrap(), None);
        assert!(EntityRef::parse_optional("light_entity", "nope").is_err());
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let e = EntityRef::parse("f", "timer.mode_dwell").unwrap();
        assert_eq!(serde_json::to_string(&e).unwrap(), "\"timer.mode_dwell\"");
    }
}
