//! Configuration for fixture generation.

use crate::format::FieldFormatter;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid fixture limit (must be > 0)
    InvalidMaxFixtures(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidMaxFixtures(n) => {
                write!(f, "Invalid max fixtures: {} (must be > 0)", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// One override of a [`GenerationConfig`] setting
///
/// Overrides are applied in order; for each setting the last one wins.
#[derive(Debug, Clone)]
pub enum ConfigOption {
    /// Transform applied to every field name before encoding
    FieldFormatter(FieldFormatter),
    /// Fail instead of dropping fields whose active category is empty
    Strict(bool),
    /// Refuse payloads that expand to more fixtures than this
    MaxFixtures(usize),
}

/// Use a custom field-name transform
pub fn with_field_formatter<F>(formatter: F) -> ConfigOption
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    ConfigOption::FieldFormatter(FieldFormatter::new(formatter))
}

/// Configuration for a generation call
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    /// Field-name transform, snake case by default
    pub field_formatter: FieldFormatter,
    /// Report empty fields as errors instead of dropping them
    pub strict: bool,
    /// Upper bound on the number of fixtures
    pub max_fixtures: Option<usize>,
}

impl GenerationConfig {
    /// Build a configuration from ordered overrides on top of the defaults
    pub fn from_options<I>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ConfigOption>,
    {
        let mut config = Self::default();
        for option in options {
            config.apply(option);
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply a single override
    pub fn apply(&mut self, option: ConfigOption) {
        match option {
            ConfigOption::FieldFormatter(formatter) => self.field_formatter = formatter,
            ConfigOption::Strict(strict) => self.strict = strict,
            ConfigOption::MaxFixtures(limit) => self.max_fixtures = Some(limit),
        }
    }

    pub fn field_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.field_formatter = FieldFormatter::new(formatter);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn max_fixtures(mut self, limit: usize) -> Self {
        self.max_fixtures = Some(limit);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_fixtures == Some(0) {
            return Err(ConfigError::InvalidMaxFixtures(0));
        }
        Ok(())
    }
}
