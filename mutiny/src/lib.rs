//! # Mutiny - combinatorial payload fixtures for API tests
//!
//! Mutiny expands a payload description into every combination of its
//! fields' candidate values and encodes each combination as a JSON request
//! body. Each field holds a [`CandidateSet`] with values that should
//! `pass`, values that should `fail` business rules, and `erroneous` values
//! with the wrong type or format. A [`Selection`] marker picks which of them
//! (or a single `null`) takes part in a generation run.
//!
//! ## Quick Start
//!
//! ```rust
//! use mutiny::{CandidateSet, Payload, Selection, generate};
//!
//! #[derive(Clone, Payload)]
//! struct Withdrawal {
//!     country_code: CandidateSet,
//!     currency: CandidateSet,
//!     reference: &'static str,
//! }
//!
//! let payload = Withdrawal {
//!     country_code: CandidateSet::new().pass(["SE"]).erroneous(["&nbsp;", "123"]),
//!     currency: CandidateSet::new().pass(["EUR", "SEK"]),
//!     reference: "order-1",
//! };
//!
//! // 1 x 2 valid bodies
//! assert_eq!(generate(&payload).unwrap().len(), 2);
//!
//! // 2 x 2 bodies with a malformed country code
//! let erroneous = payload.select("country_code", Selection::Erroneous).unwrap();
//! let fixtures = generate(&erroneous).unwrap();
//! assert_eq!(fixtures.len(), 4);
//! assert_eq!(
//!     fixtures[0].body_str(),
//!     Some(r#"{"country_code":"&nbsp;","currency":"EUR","reference":"order-1"}"#)
//! );
//! ```
//!
//! A field whose active category is empty (for example a field with no
//! `pass` values under the default selection) is left out of every fixture.
//! Enable [`GenerationConfig::strict`] to get an error instead.

// Lets the derive macro's `mutiny::` paths resolve inside this crate.
extern crate self as mutiny;

pub mod candidate;
pub mod config;
pub mod encode;
pub mod error;
pub mod extract;
pub mod fixture;
pub mod format;
pub mod generate;
pub mod payload;
pub mod product;

// Re-export the main public API
pub use candidate::{CandidateSet, CandidateValue, ParseSelectionError, Selection};
pub use config::{ConfigError, ConfigOption, GenerationConfig, with_field_formatter};
pub use encode::{Encoder, JsonEncoder};
pub use error::{EncodeError, FixtureError};
pub use extract::{CandidateMap, extract, extract_into};
pub use fixture::{Fixture, serialize_combinations};
pub use format::{FieldCase, FieldFormatter, to_snake_case};
pub use generate::{FixtureGenerator, GenerationPlan, generate, generate_with};
pub use payload::{
    DescribedField, FieldDescriptor, FieldRef, Payload, PayloadDescription, find_candidate_set,
    walk_descriptors,
};
pub use product::{Combination, build_combinations, combination_count};

// Re-export derive macro from separate crate when derive feature is enabled
#[cfg(feature = "derive")]
pub use mutiny_derive::Payload;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_defaults() {
        let generator = FixtureGenerator::default();
        let config = generator.generation_config();
        assert!(!config.strict);
        assert!(config.max_fixtures.is_none());
        assert_eq!(config.field_formatter.format("BankAccount"), "bank_account");
    }

    #[test]
    fn test_fixture_error_display() {
        let error = FixtureError::empty_field("currency");
        assert_eq!(
            format!("{}", error),
            "Field 'currency' has no active candidates"
        );
    }

    #[test]
    fn test_public_api_integration() {
        let base = PayloadDescription::new()
            .candidates("CountryCode", CandidateSet::new().pass(["SE"]).fail(["FEK"]))
            .candidates("Currency", CandidateSet::new().pass(["EUR", "SEK"]).fail(["DKK"]));

        let failing = base
            .select_all([("CountryCode", Selection::Fail), ("Currency", Selection::Fail)])
            .unwrap();

        let fixtures = generate(&failing).unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(
            fixtures[0].body_str(),
            Some(r#"{"country_code":"FEK","currency":"DKK"}"#)
        );
        assert_eq!(generate(&base).unwrap().len(), 2);
    }

    #[cfg(feature = "derive")]
    #[test]
    fn test_derived_payload_inside_crate() {
        #[derive(Clone, Payload)]
        struct Transfer {
            amount: CandidateSet,
            note: Option<String>,
        }

        let transfer = Transfer {
            amount: CandidateSet::new().pass([100, 250]),
            note: None,
        };

        let names: Vec<_> = transfer
            .fields()
            .into_iter()
            .map(|(name, _)| name.into_owned())
            .collect();
        assert_eq!(names, vec!["amount", "note"]);
        assert_eq!(generate(&transfer).unwrap().len(), 2);
    }
}
