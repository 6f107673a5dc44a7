//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`RevdashError`]
//! via `From` at the port boundary.

/// Top-level error returned by application services and ports.
#[derive(Debug, thiserror::Error)]
pub enum RevdashError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A requested record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// A persistence adapter failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An external integration (marketplace, profile backend) failed.
    #[error("integration error")]
    Integration(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required name was empty.
    #[error("name must not be empty")]
    EmptyName,

    /// An email address did not have the `local@domain` shape.
    #[error("invalid email address `{0}`")]
    InvalidEmail(String),

    /// A setting name did not match any known field.
    #[error("unknown setting `{0}`")]
    UnknownSetting(String),

    /// A setting value was outside the field's domain.
    #[error("invalid value `{value}` for setting `{field}`")]
    InvalidSettingValue {
        /// JSON key of the field.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// A keyword did not match any variant of a profile enum.
    #[error("invalid {kind} `{value}`")]
    InvalidKeyword {
        /// Human-readable name of the enum.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// Dashboard default date range outside `1..=365`.
    #[error("default date range must be between 1 and 365 days, got {0}")]
    DateRangeOutOfBounds(u16),

    /// An imported account snapshot has a version this build cannot read.
    #[error("unsupported export version {0}")]
    UnsupportedExportVersion(u32),

    /// Imported data could not be parsed.
    #[error("malformed import data: {0}")]
    MalformedImport(String),

    /// Credentials were missing a seller id or token.
    #[error("credentials must not be empty")]
    EmptyCredentials,

    /// An operation required a live marketplace connection.
    #[error("marketplace `{0}` is not connected")]
    NotConnected(String),
}

/// A lookup did not find the requested record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    /// Kind of record that was looked up.
    pub entity: &'static str,
    /// Identifier used for the lookup.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_revdash_error() {
        let err: RevdashError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            RevdashError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_display_invalid_setting_value() {
        let err = ValidationError::InvalidSettingValue {
            field: "fontSize",
            value: "huge".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value `huge` for setting `fontSize`");
    }

    #[test]
    fn should_display_not_found_error() {
        let err = NotFoundError {
            entity: "Profile",
            id: "me".to_string(),
        };
        assert_eq!(err.to_string(), "Profile `me` not found");
    }
}
