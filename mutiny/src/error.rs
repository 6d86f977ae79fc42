//! Error types for fixture generation.

use std::fmt;

use crate::config::ConfigError;

/// Error raised by an [`Encoder`](crate::encode::Encoder)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError {
    message: String,
}

impl EncodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EncodeError {}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Error type for fixture generation
///
/// With the default configuration only [`FixtureError::Encoding`] can be
/// returned by a generation call. The remaining variants come from opt-in
/// settings or from selecting categories on a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureError {
    /// A combination could not be encoded; no fixtures are returned
    Encoding {
        /// Position of the failing combination in generation order
        index: usize,
        message: String,
    },

    /// Strict mode: a field's active category has no values
    EmptyField { field: String },

    /// The number of combinations exceeds the configured limit
    TooManyCombinations {
        /// `None` when the count overflows `usize`
        count: Option<usize>,
        limit: usize,
    },

    /// Strict mode: several fields format to the same wire name
    WireNameCollision {
        wire_name: String,
        /// Structural names in declaration order
        fields: Vec<String>,
    },

    /// No field with this name exists on the payload
    UnknownField { field: String },

    /// The field holds a plain value, not a candidate set
    NotSelectable { field: String },

    /// Invalid generation configuration
    Config(ConfigError),
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Encoding { index, message } => {
                write!(f, "Encoding failed for combination {}: {}", index, message)
            }
            FixtureError::EmptyField { field } => {
                write!(f, "Field '{}' has no active candidates", field)
            }
            FixtureError::TooManyCombinations { count, limit } => match count {
                Some(count) => write!(
                    f,
                    "Payload expands to {} combinations (limit: {})",
                    count, limit
                ),
                None => write!(
                    f,
                    "Payload expands to more combinations than can be counted (limit: {})",
                    limit
                ),
            },
            FixtureError::WireNameCollision { wire_name, fields } => write!(
                f,
                "Fields '{}' share the wire name '{}'",
                fields.join("', '"),
                wire_name
            ),
            FixtureError::UnknownField { field } => {
                write!(f, "Unknown field '{}'", field)
            }
            FixtureError::NotSelectable { field } => {
                write!(f, "Field '{}' has a plain value and cannot be selected", field)
            }
            FixtureError::Config(err) => write!(f, "Configuration error: {}", err),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for FixtureError {
    fn from(err: ConfigError) -> Self {
        FixtureError::Config(err)
    }
}

/// Helper functions for creating FixtureError instances
impl FixtureError {
    pub fn encoding(index: usize, err: EncodeError) -> Self {
        Self::Encoding {
            index,
            message: err.message,
        }
    }

    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField {
            field: field.into(),
        }
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    pub fn not_selectable(field: impl Into<String>) -> Self {
        Self::NotSelectable {
            field: field.into(),
        }
    }

    /// Check whether this error came from the encoder
    pub fn is_encoding(&self) -> bool {
        matches!(self, FixtureError::Encoding { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_error_display() {
        let error = FixtureError::encoding(3, EncodeError::new("key must be a string"));
        assert_eq!(
            error.to_string(),
            "Encoding failed for combination 3: key must be a string"
        );
        assert!(error.is_encoding());

        let error = FixtureError::TooManyCombinations {
            count: Some(64),
            limit: 10,
        };
        assert_eq!(
            error.to_string(),
            "Payload expands to 64 combinations (limit: 10)"
        );

        let error = FixtureError::WireNameCollision {
            wire_name: "account_id".to_string(),
            fields: vec!["account_id".to_string(), "AccountId".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Fields 'account_id', 'AccountId' share the wire name 'account_id'"
        );

        let error = FixtureError::not_selectable("version");
        assert_eq!(
            error.to_string(),
            "Field 'version' has a plain value and cannot be selected"
        );
    }

    #[test]
    fn test_config_error_is_source() {
        use std::error::Error;

        let error = FixtureError::from(ConfigError::InvalidMaxFixtures(0));
        assert!(error.source().is_some());
        assert!(!error.is_encoding());
    }
}
