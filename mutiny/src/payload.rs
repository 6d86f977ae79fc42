//! Payload descriptions: the ordered, named fields fixtures are generated from.
//!
//! A payload is anything implementing [`Payload`]. Statically typed payloads
//! usually get their implementation from `#[derive(Payload)]`, which builds a
//! constant table of [`FieldDescriptor`]s once per type; the table is walked
//! instead of inspecting the struct at runtime. [`PayloadDescription`] covers
//! payloads that are only known at runtime, such as description files.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::candidate::{CandidateSet, CandidateValue, Selection};
use crate::error::FixtureError;

/// A borrowed view of one payload field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRef<'a> {
    /// A field with categorized candidates
    Candidates(&'a CandidateSet),
    /// A field with a single fixed value
    Plain(CandidateValue),
}

impl<'a> FieldRef<'a> {
    /// View any serializable value as a single-candidate field
    pub fn plain<T: Serialize + ?Sized>(value: &T) -> Self {
        FieldRef::Plain(CandidateValue::from_serialize(value))
    }

    /// Resolve the values this field contributes to the product
    pub fn active(&self) -> Vec<CandidateValue> {
        match self {
            FieldRef::Candidates(set) => set.active(),
            FieldRef::Plain(value) => vec![value.clone()],
        }
    }
}

impl<'a> From<&'a CandidateSet> for FieldRef<'a> {
    fn from(set: &'a CandidateSet) -> Self {
        FieldRef::Candidates(set)
    }
}

/// Static description of one field of a payload type `P`
pub struct FieldDescriptor<P: 'static> {
    /// Structural name of the field
    pub name: &'static str,
    /// Read accessor
    pub read: for<'a> fn(&'a P) -> FieldRef<'a>,
    /// Mutable accessor, `None` for plain fields
    pub candidates_mut: Option<fn(&mut P) -> &mut CandidateSet>,
}

impl<P: 'static> Clone for FieldDescriptor<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: 'static> Copy for FieldDescriptor<P> {}

impl<P: 'static> std::fmt::Debug for FieldDescriptor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("selectable", &self.candidates_mut.is_some())
            .finish()
    }
}

/// Read every field of `payload` through a descriptor table
pub fn walk_descriptors<'a, P: 'static>(
    descriptors: &'static [FieldDescriptor<P>],
    payload: &'a P,
) -> Vec<(Cow<'a, str>, FieldRef<'a>)> {
    descriptors
        .iter()
        .map(|descriptor| (Cow::Borrowed(descriptor.name), (descriptor.read)(payload)))
        .collect()
}

/// Look up the candidate set of a named field through a descriptor table
pub fn find_candidate_set<'a, P: 'static>(
    descriptors: &'static [FieldDescriptor<P>],
    payload: &'a mut P,
    name: &str,
) -> Result<&'a mut CandidateSet, FixtureError> {
    let descriptor = descriptors
        .iter()
        .find(|descriptor| descriptor.name == name)
        .ok_or_else(|| FixtureError::unknown_field(name))?;

    match descriptor.candidates_mut {
        Some(accessor) => Ok(accessor(payload)),
        None => Err(FixtureError::not_selectable(name)),
    }
}

/// A payload description fixtures can be generated from
///
/// Implementations list their fields in declaration order. Selecting a
/// category never mutates the receiver: [`Payload::select`] clones the
/// payload and adjusts the copy, so a base description can be shared while
/// per-scenario variants are derived from it.
pub trait Payload: Clone {
    /// All fields in declaration order
    fn fields(&self) -> Vec<(Cow<'_, str>, FieldRef<'_>)>;

    /// The candidate set behind a field, if the field has one
    fn candidate_set_mut(&mut self, name: &str) -> Result<&mut CandidateSet, FixtureError>;

    /// Return a copy of this payload with `selection` active on the named field
    fn select(&self, name: &str, selection: Selection) -> Result<Self, FixtureError> {
        let mut derived = self.clone();
        derived.candidate_set_mut(name)?.set_selection(selection);
        Ok(derived)
    }

    /// Apply several selections in order
    fn select_all<'n, I>(&self, selections: I) -> Result<Self, FixtureError>
    where
        I: IntoIterator<Item = (&'n str, Selection)>,
    {
        let mut derived = self.clone();
        for (name, selection) in selections {
            derived.candidate_set_mut(name)?.set_selection(selection);
        }
        Ok(derived)
    }
}

/// One field of a [`PayloadDescription`]
#[derive(Debug, Clone, PartialEq)]
pub enum DescribedField {
    Candidates(CandidateSet),
    Plain(CandidateValue),
}

/// A payload description assembled at runtime
///
/// Deserializes from a JSON document of the form
///
/// ```json
/// {
///   "fields": [
///     { "name": "CountryCode", "pass": ["SE"], "fail": ["FEK"], "erroneous": [true] },
///     { "name": "BankAccount", "pass": [{ "type": "iban" }], "select": "fail" },
///     { "name": "Version", "value": 2 }
///   ]
/// }
/// ```
///
/// An entry with a `value` key is a plain field; every other entry is a
/// candidate field whose lists default to empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "DescriptionDocument")]
pub struct PayloadDescription {
    fields: Vec<(String, DescribedField)>,
}

impl PayloadDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate field. A field with the same name is replaced in place.
    pub fn candidates(mut self, name: impl Into<String>, set: CandidateSet) -> Self {
        self.insert(name.into(), DescribedField::Candidates(set));
        self
    }

    /// Append a plain field. A field with the same name is replaced in place.
    pub fn plain(mut self, name: impl Into<String>, value: impl Into<CandidateValue>) -> Self {
        self.insert(name.into(), DescribedField::Plain(value.into()));
        self
    }

    fn insert(&mut self, name: String, field: DescribedField) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = field,
            None => self.fields.push((name, field)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Payload for PayloadDescription {
    fn fields(&self) -> Vec<(Cow<'_, str>, FieldRef<'_>)> {
        self.fields
            .iter()
            .map(|(name, field)| {
                let field = match field {
                    DescribedField::Candidates(set) => FieldRef::Candidates(set),
                    DescribedField::Plain(value) => FieldRef::Plain(value.clone()),
                };
                (Cow::Borrowed(name.as_str()), field)
            })
            .collect()
    }

    fn candidate_set_mut(&mut self, name: &str) -> Result<&mut CandidateSet, FixtureError> {
        match self.fields.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, DescribedField::Candidates(set))) => Ok(set),
            Some((_, DescribedField::Plain(_))) => Err(FixtureError::not_selectable(name)),
            None => Err(FixtureError::unknown_field(name)),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptionDocument {
    fields: Vec<FieldEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldEntry {
    name: String,
    #[serde(default, deserialize_with = "present_value")]
    value: Option<Value>,
    #[serde(default)]
    pass: Vec<Value>,
    #[serde(default)]
    fail: Vec<Value>,
    #[serde(default)]
    erroneous: Vec<Value>,
    #[serde(default)]
    select: Selection,
}

// Keeps an explicit `"value": null` apart from a missing key.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<DescriptionDocument> for PayloadDescription {
    type Error = String;

    fn try_from(document: DescriptionDocument) -> Result<Self, Self::Error> {
        let mut description = PayloadDescription::new();
        for entry in document.fields {
            if description.field_names().any(|name| name == entry.name) {
                return Err(format!("duplicate field '{}'", entry.name));
            }

            let has_lists =
                !entry.pass.is_empty() || !entry.fail.is_empty() || !entry.erroneous.is_empty();
            description = match entry.value {
                Some(_) if has_lists || entry.select != Selection::Pass => {
                    return Err(format!(
                        "field '{}' mixes a plain value with candidate lists",
                        entry.name
                    ));
                }
                Some(value) => description.plain(entry.name, value),
                None => {
                    let set = CandidateSet::new()
                        .pass(entry.pass)
                        .fail(entry.fail)
                        .erroneous(entry.erroneous)
                        .select(entry.select);
                    description.candidates(entry.name, set)
                }
            };
        }
        Ok(description)
    }
}
