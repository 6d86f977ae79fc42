//! Fixtures: combinations renamed to wire names and encoded.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::candidate::CandidateValue;
use crate::encode::Encoder;
use crate::error::FixtureError;
use crate::format::FieldFormatter;
use crate::product::Combination;

/// One generated test payload
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    fields: BTreeMap<String, CandidateValue>,
    body: Vec<u8>,
}

impl Fixture {
    /// Field map keyed by wire name, as it was encoded
    pub fn fields(&self) -> &BTreeMap<String, CandidateValue> {
        &self.fields
    }

    pub fn field(&self, wire_name: &str) -> Option<&CandidateValue> {
        self.fields.get(wire_name)
    }

    /// Encoded request body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Request body as text, if it is valid UTF-8
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Parse the body back into a JSON value
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn into_parts(self) -> (BTreeMap<String, CandidateValue>, Vec<u8>) {
        (self.fields, self.body)
    }
}

impl Serialize for Fixture {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Fixture", 2)?;
        state.serialize_field("fields", &self.fields)?;
        state.serialize_field("body", &String::from_utf8_lossy(&self.body))?;
        state.end()
    }
}

fn rename(combination: &Combination, formatter: &FieldFormatter) -> BTreeMap<String, CandidateValue> {
    combination
        .iter()
        .map(|(name, value)| (formatter.format(name), value.clone()))
        .collect()
}

/// Rename and encode every combination
///
/// The first encoding failure aborts the whole call; no fixtures are
/// returned alongside the error. When two fields format to the same wire
/// name, the one whose structural name sorts last wins.
pub fn serialize_combinations(
    combinations: &[Combination],
    formatter: &FieldFormatter,
    encoder: &dyn Encoder,
) -> Result<Vec<Fixture>, FixtureError> {
    let mut fixtures = Vec::with_capacity(combinations.len());

    for (index, combination) in combinations.iter().enumerate() {
        let fields = rename(combination, formatter);
        let body = encoder
            .encode(&fields)
            .map_err(|err| FixtureError::encoding(index, err))?;
        tracing::trace!(index, bytes = body.len(), "encoded fixture");
        fixtures.push(Fixture { fields, body });
    }

    tracing::debug!(fixtures = fixtures.len(), "serialized fixtures");
    Ok(fixtures)
}
