//! Candidate values and the categorized sets a payload field draws them from.

use std::fmt;
use std::str::FromStr;

use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use serde_json::value::RawValue;

/// A single value a field may take in a generated fixture
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateValue {
    /// A structured JSON value
    Json(Value),
    /// Pre-encoded JSON text, embedded verbatim as nested structure
    Raw(String),
    /// A value that could not be converted when the payload was described.
    /// Encoding a fixture that contains it fails with the stored reason.
    Unencodable(String),
}

impl CandidateValue {
    /// The JSON `null` literal
    pub fn null() -> Self {
        Self::Json(Value::Null)
    }

    /// Wrap pre-encoded JSON so that it is emitted as structure, not as a string
    pub fn raw(json: impl Into<String>) -> Self {
        Self::Raw(json.into())
    }

    /// Convert any serializable value. Conversion failures are kept as
    /// [`CandidateValue::Unencodable`] and surface when the fixture is encoded.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self::Json(json),
            Err(err) => Self::Unencodable(err.to_string()),
        }
    }

    /// Check whether this is the `null` literal
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }
}

impl Serialize for CandidateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CandidateValue::Json(value) => value.serialize(serializer),
            CandidateValue::Raw(text) => {
                let raw = RawValue::from_string(text.clone()).map_err(|e| {
                    S::Error::custom(format!("invalid pre-encoded JSON {:?}: {}", text, e))
                })?;
                raw.serialize(serializer)
            }
            CandidateValue::Unencodable(reason) => Err(S::Error::custom(reason)),
        }
    }
}

impl fmt::Display for CandidateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateValue::Json(value) => write!(f, "{}", value),
            CandidateValue::Raw(text) => write!(f, "{}", text),
            CandidateValue::Unencodable(reason) => write!(f, "<unencodable: {}>", reason),
        }
    }
}

impl From<Value> for CandidateValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<&str> for CandidateValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_string()))
    }
}

impl From<String> for CandidateValue {
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

impl From<bool> for CandidateValue {
    fn from(value: bool) -> Self {
        Self::Json(Value::Bool(value))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CandidateValue {
                fn from(value: $ty) -> Self {
                    Self::Json(Value::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for CandidateValue {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(number) => Self::Json(Value::Number(number)),
            None => Self::Unencodable(format!("{} is not representable in JSON", value)),
        }
    }
}

impl<T: Into<CandidateValue>> From<Option<T>> for CandidateValue {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}

/// Which category of a [`CandidateSet`] is active for a generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Values the system under test should accept (the default)
    #[default]
    Pass,
    /// Well-formed values that break a business rule
    Fail,
    /// Malformed values: wrong type or format
    Erroneous,
    /// A single `null` literal
    Null,
}

impl Selection {
    /// All selections, in declaration order
    pub const ALL: [Selection; 4] = [
        Selection::Pass,
        Selection::Fail,
        Selection::Erroneous,
        Selection::Null,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Selection::Pass => "pass",
            Selection::Fail => "fail",
            Selection::Erroneous => "erroneous",
            Selection::Null => "null",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Selection`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSelectionError(String);

impl fmt::Display for ParseSelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown selection '{}' (expected pass, fail, erroneous or null)",
            self.0
        )
    }
}

impl std::error::Error for ParseSelectionError {}

impl FromStr for Selection {
    type Err = ParseSelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(Selection::Pass),
            "fail" => Ok(Selection::Fail),
            "erroneous" => Ok(Selection::Erroneous),
            "null" | "nil" => Ok(Selection::Null),
            _ => Err(ParseSelectionError(s.to_string())),
        }
    }
}

/// The categorized candidate values for one payload field
///
/// Exactly one category is active per generation run, chosen by the
/// selection marker. An empty `pass` list under the default selection makes
/// the field drop out of every generated fixture.
///
/// ```rust
/// use mutiny::{CandidateSet, Selection};
///
/// let currency = CandidateSet::new()
///     .pass(["EUR", "SEK"])
///     .fail(["DKK"])
///     .erroneous(["123", "&nbsp;"]);
///
/// assert_eq!(currency.active().len(), 2);
/// assert_eq!(currency.clone().select(Selection::Erroneous).active().len(), 2);
/// assert_eq!(currency.select(Selection::Null).active().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    selection: Selection,
    pass: Vec<CandidateValue>,
    fail: Vec<CandidateValue>,
    erroneous: Vec<CandidateValue>,
}

impl CandidateSet {
    /// Create an empty candidate set with the default selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append values that should be accepted
    pub fn pass<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CandidateValue>,
    {
        self.pass.extend(values.into_iter().map(Into::into));
        self
    }

    /// Append well-formed values that should be rejected
    pub fn fail<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CandidateValue>,
    {
        self.fail.extend(values.into_iter().map(Into::into));
        self
    }

    /// Append malformed values
    pub fn erroneous<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CandidateValue>,
    {
        self.erroneous.extend(values.into_iter().map(Into::into));
        self
    }

    /// Return a copy with a different active category
    pub fn select(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn pass_values(&self) -> &[CandidateValue] {
        &self.pass
    }

    pub fn fail_values(&self) -> &[CandidateValue] {
        &self.fail
    }

    pub fn erroneous_values(&self) -> &[CandidateValue] {
        &self.erroneous
    }

    /// Resolve the values of the active category
    pub fn active(&self) -> Vec<CandidateValue> {
        match self.selection {
            Selection::Fail => self.fail.clone(),
            Selection::Erroneous => self.erroneous.clone(),
            Selection::Null => vec![CandidateValue::null()],
            Selection::Pass => self.pass.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CandidateSet {
        CandidateSet::new()
            .pass(["SE"])
            .fail(["FEK"])
            .erroneous(vec![
                CandidateValue::from("&nbsp;"),
                CandidateValue::from(true),
                CandidateValue::from(123),
            ])
    }

    #[test]
    fn test_default_selection_uses_pass() {
        let set = sample();
        assert_eq!(set.selection(), Selection::Pass);
        assert_eq!(set.active(), vec![CandidateValue::from("SE")]);
    }

    #[test]
    fn test_fail_and_erroneous_selection() {
        assert_eq!(
            sample().select(Selection::Fail).active(),
            vec![CandidateValue::from("FEK")]
        );
        assert_eq!(sample().select(Selection::Erroneous).active().len(), 3);
    }

    #[test]
    fn test_null_selection_ignores_lists() {
        let active = sample().select(Selection::Null).active();
        assert_eq!(active, vec![CandidateValue::null()]);
        assert!(active[0].is_null());

        let empty = CandidateSet::new().select(Selection::Null);
        assert_eq!(empty.active().len(), 1);
    }

    #[test]
    fn test_empty_pass_contributes_nothing() {
        let set = CandidateSet::new().fail(["x"]);
        assert!(set.active().is_empty());
    }

    #[test]
    fn test_select_leaves_original_untouched() {
        let base = sample();
        let snapshot = base.clone();
        let derived = base.clone().select(Selection::Fail);

        assert_eq!(base, snapshot);
        assert_eq!(derived.selection(), Selection::Fail);
        assert_eq!(derived.pass_values(), base.pass_values());
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!("FAIL".parse::<Selection>(), Ok(Selection::Fail));
        assert_eq!(" erroneous ".parse::<Selection>(), Ok(Selection::Erroneous));
        assert_eq!("nil".parse::<Selection>(), Ok(Selection::Null));
        assert!("maybe".parse::<Selection>().is_err());

        for selection in Selection::ALL {
            assert_eq!(selection.as_str().parse::<Selection>(), Ok(selection));
        }
    }

    #[test]
    fn test_raw_value_serializes_as_structure() {
        let value = CandidateValue::raw(r#"{"type":"iban"}"#);
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, r#"{"type":"iban"}"#);
    }

    #[test]
    fn test_invalid_raw_value_fails_to_serialize() {
        let value = CandidateValue::raw("{not json");
        assert!(serde_json::to_string(&value).is_err());
    }

    #[test]
    fn test_non_finite_float_is_unencodable() {
        let value = CandidateValue::from(f64::NAN);
        assert!(matches!(value, CandidateValue::Unencodable(_)));
        assert!(serde_json::to_string(&value).is_err());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Account {
            number: &'static str,
        }

        let value = CandidateValue::from_serialize(&Account { number: "42" });
        assert_eq!(value, CandidateValue::Json(json!({"number": "42"})));

        let mut bad_keys = std::collections::HashMap::new();
        bad_keys.insert((1, 2), "tuple keys are not JSON");
        assert!(matches!(
            CandidateValue::from_serialize(&bad_keys),
            CandidateValue::Unencodable(_)
        ));
    }

    #[test]
    fn test_option_conversion() {
        assert!(CandidateValue::from(None::<i32>).is_null());
        assert_eq!(CandidateValue::from(Some(5)), CandidateValue::from(5));
    }
}
