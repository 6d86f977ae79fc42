//! Candidate extraction: resolve every payload field to its active values.

use crate::candidate::CandidateValue;
use crate::payload::Payload;

/// Field name to active candidate values, in field declaration order
///
/// Keys are unique. A field may map to an empty list, in which case it takes
/// no part in the cartesian product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateMap {
    entries: Vec<(String, Vec<CandidateValue>)>,
}

impl CandidateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append values to a field's entry, creating the entry if needed
    pub fn append<I>(&mut self, field: &str, values: I)
    where
        I: IntoIterator<Item = CandidateValue>,
    {
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => existing.extend(values),
            None => self
                .entries
                .push((field.to_string(), values.into_iter().collect())),
        }
    }

    pub fn get(&self, field: &str) -> Option<&[CandidateValue]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CandidateValue])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Fields that contribute no candidates
    pub fn empty_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, values)| values.is_empty())
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<CandidateValue>)> for CandidateMap {
    fn from_iter<T: IntoIterator<Item = (S, Vec<CandidateValue>)>>(iter: T) -> Self {
        let mut map = CandidateMap::new();
        for (name, values) in iter {
            let name: String = name.into();
            map.append(&name, values);
        }
        map
    }
}

/// Build the flat candidate map of a payload
pub fn extract<P: Payload>(payload: &P) -> CandidateMap {
    let mut map = CandidateMap::new();
    extract_into(&mut map, payload);
    map
}

/// Resolve every field of `payload` and append the values into `map`
pub fn extract_into<P: Payload>(map: &mut CandidateMap, payload: &P) {
    for (name, field) in payload.fields() {
        let values = field.active();
        if values.is_empty() {
            tracing::warn!(
                field = %name,
                "field has no active candidates and is left out of every fixture"
            );
        }
        map.append(&name, values);
    }

    tracing::debug!(fields = map.len(), "extracted candidate map");
}
