//! Field-name formatters: turn structural field names into wire names.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;

static FIRST_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(.)([A-Z][a-z]+)").expect("valid regex"));
static ALL_CAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert `CountryCode` / `countryCode` / `HTTPStatus` style names to snake case
///
/// ```rust
/// use mutiny::format::to_snake_case;
///
/// assert_eq!(to_snake_case("CountryCode"), "country_code");
/// assert_eq!(to_snake_case("bank_account"), "bank_account");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let snake = FIRST_CAP.replace_all(name, "${1}_${2}");
    let snake = ALL_CAP.replace_all(&snake, "${1}_${2}");
    snake.to_lowercase()
}

/// Convert to lower camel case: `country_code` becomes `countryCode`
pub fn to_camel_case(name: &str) -> String {
    let snake = to_snake_case(name);
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.chars() {
        if ch == '_' || ch == '-' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert to kebab case: `CountryCode` becomes `country-code`
pub fn to_kebab_case(name: &str) -> String {
    to_snake_case(name).replace('_', "-")
}

/// Keep the name as declared
pub fn preserve(name: &str) -> String {
    name.to_string()
}

/// An injectable `&str -> String` transform applied to every field name
#[derive(Clone)]
pub struct FieldFormatter(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl FieldFormatter {
    pub fn new<F>(formatter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(formatter))
    }

    pub fn format(&self, name: &str) -> String {
        (self.0)(name)
    }
}

impl Default for FieldFormatter {
    fn default() -> Self {
        Self::new(to_snake_case)
    }
}

impl fmt::Debug for FieldFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldFormatter(..)")
    }
}

/// The built-in naming conventions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldCase {
    #[default]
    Snake,
    Camel,
    Kebab,
    Preserve,
}

impl FieldCase {
    pub fn formatter(self) -> FieldFormatter {
        match self {
            FieldCase::Snake => FieldFormatter::new(to_snake_case),
            FieldCase::Camel => FieldFormatter::new(to_camel_case),
            FieldCase::Kebab => FieldFormatter::new(to_kebab_case),
            FieldCase::Preserve => FieldFormatter::new(preserve),
        }
    }
}

impl FromStr for FieldCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snake" => Ok(FieldCase::Snake),
            "camel" => Ok(FieldCase::Camel),
            "kebab" => Ok(FieldCase::Kebab),
            "preserve" => Ok(FieldCase::Preserve),
            other => Err(format!("unknown field case '{}'", other)),
        }
    }
}
