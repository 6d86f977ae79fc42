//! The generation pipeline: extract, expand, serialize.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{ConfigOption, GenerationConfig};
use crate::encode::{Encoder, JsonEncoder};
use crate::error::FixtureError;
use crate::extract::{CandidateMap, extract};
use crate::fixture::{Fixture, serialize_combinations};
use crate::payload::Payload;
use crate::product::{build_combinations, combination_count};

/// Generate fixtures for every combination of `payload` with the default
/// configuration
///
/// ```rust
/// use mutiny::{CandidateSet, PayloadDescription, generate};
///
/// let payload = PayloadDescription::new()
///     .candidates("CountryCode", CandidateSet::new().pass(["SE"]))
///     .candidates("Currency", CandidateSet::new().pass(["EUR", "SEK"]));
///
/// let fixtures = generate(&payload).unwrap();
/// assert_eq!(fixtures.len(), 2);
/// assert_eq!(fixtures[0].body_str(), Some(r#"{"country_code":"SE","currency":"EUR"}"#));
/// ```
pub fn generate<P: Payload>(payload: &P) -> Result<Vec<Fixture>, FixtureError> {
    FixtureGenerator::new().generate(payload)
}

/// Generate fixtures with ordered configuration overrides applied on top of
/// the defaults
pub fn generate_with<P, I>(payload: &P, options: I) -> Result<Vec<Fixture>, FixtureError>
where
    P: Payload,
    I: IntoIterator<Item = ConfigOption>,
{
    let config = GenerationConfig::from_options(options)?;
    FixtureGenerator::new().config(config).generate(payload)
}

/// Per-field summary of what a payload will expand to
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    /// Active candidate count per field, in declaration order
    pub fields: Vec<(String, usize)>,
    /// Number of fixtures, `None` on overflow
    pub combinations: Option<usize>,
}

impl GenerationPlan {
    /// Fields that will be missing from every fixture
    pub fn dropped_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, count)| *count == 0)
            .map(|(name, _)| name.as_str())
    }
}

/// Configurable fixture generator
///
/// ```rust
/// use mutiny::{CandidateSet, FixtureGenerator, PayloadDescription, format::to_camel_case};
///
/// let payload = PayloadDescription::new()
///     .candidates("country_code", CandidateSet::new().pass(["SE", "DK"]));
///
/// let fixtures = FixtureGenerator::new()
///     .field_formatter(to_camel_case)
///     .max_fixtures(10)
///     .generate(&payload)
///     .unwrap();
///
/// assert_eq!(fixtures[1].body_str(), Some(r#"{"countryCode":"DK"}"#));
/// ```
#[derive(Clone)]
pub struct FixtureGenerator {
    config: GenerationConfig,
    encoder: Arc<dyn Encoder + Send + Sync>,
}

impl Default for FixtureGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FixtureGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FixtureGenerator {
    pub fn new() -> Self {
        Self {
            config: GenerationConfig::default(),
            encoder: Arc::new(JsonEncoder::new()),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn field_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.config = self.config.field_formatter(formatter);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.config = self.config.strict(strict);
        self
    }

    pub fn max_fixtures(mut self, limit: usize) -> Self {
        self.config = self.config.max_fixtures(limit);
        self
    }

    /// Use a different wire encoder
    pub fn encoder<E>(mut self, encoder: E) -> Self
    where
        E: Encoder + Send + Sync + 'static,
    {
        self.encoder = Arc::new(encoder);
        self
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Summarize the expansion of `payload` without building it
    pub fn plan<P: Payload>(&self, payload: &P) -> GenerationPlan {
        let map = extract(payload);
        GenerationPlan {
            fields: map
                .iter()
                .map(|(name, values)| (name.to_string(), values.len()))
                .collect(),
            combinations: combination_count(&map),
        }
    }

    /// Generate one fixture per combination of `payload`
    pub fn generate<P: Payload>(&self, payload: &P) -> Result<Vec<Fixture>, FixtureError> {
        self.config.validate()?;

        let map = extract(payload);
        self.check(&map)?;

        let combinations = build_combinations(&map);
        serialize_combinations(
            &combinations,
            &self.config.field_formatter,
            self.encoder.as_ref(),
        )
    }

    fn check(&self, map: &CandidateMap) -> Result<(), FixtureError> {
        if self.config.strict
            && let Some(field) = map.empty_fields().next()
        {
            return Err(FixtureError::empty_field(field));
        }

        if let Some((wire_name, fields)) = self.wire_name_collision(map) {
            if self.config.strict {
                return Err(FixtureError::WireNameCollision { wire_name, fields });
            }
            tracing::warn!(
                wire_name = %wire_name,
                fields = ?fields,
                "fields share a wire name, the last in name order is encoded"
            );
        }

        if let Some(limit) = self.config.max_fixtures {
            let count = combination_count(map);
            if count.is_none_or(|count| count > limit) {
                return Err(FixtureError::TooManyCombinations { count, limit });
            }
        }

        Ok(())
    }

    /// First wire name produced by more than one contributing field
    fn wire_name_collision(&self, map: &CandidateMap) -> Option<(String, Vec<String>)> {
        let mut wire_names: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, values) in map.iter() {
            if values.is_empty() {
                continue;
            }
            wire_names
                .entry(self.config.field_formatter.format(name))
                .or_default()
                .push(name.to_string());
        }
        wire_names.into_iter().find(|(_, fields)| fields.len() > 1)
    }
}
