//! Common error types used across the workspace.
//!
//! Each failure family has its own typed error carrying the offending
//! field or value; [`LocModeError`] unifies them via `#[from]`.

/// Top-level error for every fallible locmode operation.
#[derive(Debug, thiserror::Error)]
pub enum LocModeError {
    #[error("invalid color format")]
    InvalidColorFormat(#[from] ColorFormatError),

    #[error("invalid numeric field")]
    InvalidNumericField(#[from] NumericFieldError),

    #[error("invalid entity id")]
    InvalidEntityId(#[from] EntityIdError),

    #[error("invalid package path")]
    InvalidPackagePath(#[from] PackagePathError),

    #[error("duplicate helper declaration")]
    DuplicateHelper(#[from] DuplicateHelperError),

    #[error("invalid rule definition")]
    InvalidRule(#[from] crate::automation::RuleError),

    #[error("missing precondition")]
    MissingPrecondition(#[from] PreconditionError),

    /// Read or write failure reported by an adapter.
    #[error("I/O failure")]
    Io(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A color value that is neither a valid RGB triple nor a `#RRGGBB` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorFormatError {
    #[error("expected a 6-digit hex color, got `{0}`")]
    Hex(String),

    #[error("expected 3 color components, got {0}")]
    Arity(usize),

    #[error("color component `{0}` is not an integer in 0..=255")]
    Component(String),

    #[error("unsupported color value `{0}`")]
    Unsupported(String),
}

/// A numeric preference that is not an integer or is out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}` must be {expected}, got `{value}`")]
pub struct NumericFieldError {
    pub field: String,
    pub value: String,
    pub expected: &'static str,
}

/// An entity id that does not have the `domain.object_id` shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}` is not a `domain.object_id` entity id: `{value}`")]
pub struct EntityIdError {
    pub field: &'static str,
    pub value: String,
}

/// A package path that would land outside the configuration directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `package_path` must be a relative path below the configuration directory, got `{0}`")]
pub struct PackagePathError(pub String);

/// Two helper declarations resolve to the same entity id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("helper `{entity_id}` is declared by both `{first}` and `{second}`")]
pub struct DuplicateHelperError {
    pub entity_id: String,
    pub first: &'static str,
    pub second: &'static str,
}

/// The target Home Assistant configuration cannot accept a package.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("configuration.yaml not found in {0}")]
    ConfigurationMissing(String),

    #[error("Home Assistant packages are not enabled in configuration.yaml")]
    PackagesDisabled,
}

impl PreconditionError {
    /// What the user has to change before applying again.
    #[must_use]
    pub fn remediation(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing(_) => {
                "mount the Home Assistant configuration directory so that configuration.yaml is readable"
            }
            Self::PackagesDisabled => {
                "add `packages: !include_dir_named packages` under the `homeassistant:` key of configuration.yaml, then restart Home Assistant"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_field_in_numeric_error() {
        let err = NumericFieldError {
            field: "dwell_seconds".to_string(),
            value: "abc".to_string(),
            expected: "a positive integer",
        };
        assert_eq!(
            err.to_string(),
            "field `dwell_seconds` must be a positive integer, got `abc`"
        );
    }

    #[test]
    fn should_name_field_in_entity_id_error() {
        let err = EntityIdError {
            field: "light_entity",
            value: "kitchen".to_string(),
        };
        assert!(err.to_string().contains("light_entity"));
        assert!(err.to_string().contains("kitchen"));
    }

    #[test]
    fn should_convert_sub_errors_via_from() {
        let err: LocModeError = ColorFormatError::Arity(2).into();
        assert!(matches!(err, LocModeError::InvalidColorFormat(_)));

        let err: LocModeError = PreconditionError::PackagesDisabled.into();
        assert!(matches!(err, LocModeError::MissingPrecondition(_)));
    }

    #[test]
    fn should_expose_source_of_io_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = LocModeError::Io(Box::new(io));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("read-only"));
    }

    #[test]
    fn should_give_remediation_for_disabled_packages() {
        assert!(
            PreconditionError::PackagesDisabled
                .remediation()
                .contains("packages:")
        );
    }
}
