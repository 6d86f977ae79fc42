//! Cartesian product over the fields of a [`CandidateMap`].

use std::collections::BTreeMap;

use crate::candidate::CandidateValue;
use crate::extract::CandidateMap;

/// One concrete assignment of a single value to every contributing field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Combination(BTreeMap<String, CandidateValue>);

impl Combination {
    fn seed(field: &str, value: &CandidateValue) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), value.clone());
        Self(fields)
    }

    fn extended(&self, field: &str, value: &CandidateValue) -> Self {
        let mut fields = self.0.clone();
        fields.insert(field.to_string(), value.clone());
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&CandidateValue> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CandidateValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn as_map(&self) -> &BTreeMap<String, CandidateValue> {
        &self.0
    }

    pub fn into_map(self) -> BTreeMap<String, CandidateValue> {
        self.0
    }
}

impl<S: Into<String>, V: Into<CandidateValue>> FromIterator<(S, V)> for Combination {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

/// Contributing fields sorted by name, so the fold order does not depend on
/// declaration or map order.
fn contributing_fields(map: &CandidateMap) -> Vec<(&str, &[CandidateValue])> {
    let mut fields: Vec<_> = map.iter().filter(|(_, values)| !values.is_empty()).collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
}

/// Number of combinations `map` expands to, or `None` on overflow
///
/// Fields without candidates are the multiplicative identity; a map with no
/// contributing field expands to zero combinations.
pub fn combination_count(map: &CandidateMap) -> Option<usize> {
    let fields = contributing_fields(map);
    if fields.is_empty() {
        return Some(0);
    }
    fields
        .iter()
        .try_fold(1usize, |count, (_, values)| count.checked_mul(values.len()))
}

/// Expand `map` into every combination of one value per contributing field
///
/// Fields are folded in name order. Within the result, combinations are
/// ordered lexicographically by field name, earlier fields varying slowest.
/// Identical combinations are kept.
pub fn build_combinations(map: &CandidateMap) -> Vec<Combination> {
    let mut combinations: Vec<Combination> = Vec::new();

    for (field, values) in contributing_fields(map) {
        if combinations.is_empty() {
            combinations = values
                .iter()
                .map(|value| Combination::seed(field, value))
                .collect();
            continue;
        }

        let mut expanded = Vec::with_capacity(combinations.len().saturating_mul(values.len()));
        for existing in &combinations {
            for value in values {
                expanded.push(existing.extended(field, value));
            }
        }
        combinations = expanded;
    }

    tracing::debug!(
        fields = map.len(),
        combinations = combinations.len(),
        "built cartesian product"
    );
    combinations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<V: Into<CandidateValue>>(items: impl IntoIterator<Item = V>) -> Vec<CandidateValue> {
        items.into_iter().map(Into::into).collect()
    }

    #[test]
    fn test_empty_map_has_no_combinations() {
        let map = CandidateMap::new();
        assert!(build_combinations(&map).is_empty());
        assert_eq!(combination_count(&map), Some(0));
    }

    #[test]
    fn test_all_empty_fields_have_no_combinations() {
        let map: CandidateMap = [("a", Vec::new()), ("b", Vec::new())].into_iter().collect();
        assert!(build_combinations(&map).is_empty());
        assert_eq!(combination_count(&map), Some(0));
    }

    #[test]
    fn test_product_size_and_keys() {
        let map: CandidateMap = [
            ("a", values([1, 2, 3])),
            ("b", values(["x", "y"])),
            ("c", Vec::new()),
            ("d", values([true])),
        ]
        .into_iter()
        .collect();

        let combinations = build_combinations(&map);
        assert_eq!(combinations.len(), 6);
        assert_eq!(combination_count(&map), Some(6));

        for combination in &combinations {
            assert_eq!(combination.len(), 3);
            assert!(combination.contains("a"));
            assert!(combination.contains("b"));
            assert!(!combination.contains("c"));
            assert_eq!(combination.get("d"), Some(&CandidateValue::from(true)));
        }
    }

    #[test]
    fn test_ordering_is_by_field_name() {
        let map: CandidateMap = [("b", values(["x", "y"])), ("a", values([1, 2]))]
            .into_iter()
            .collect();

        let expected: Vec<Combination> = vec![
            [("a", CandidateValue::from(1)), ("b", CandidateValue::from("x"))].into_iter().collect(),
            [("a", CandidateValue::from(1)), ("b", CandidateValue::from("y"))].into_iter().collect(),
            [("a", CandidateValue::from(2)), ("b", CandidateValue::from("x"))].into_iter().collect(),
            [("a", CandidateValue::from(2)), ("b", CandidateValue::from("y"))].into_iter().collect(),
        ];
        assert_eq!(build_combinations(&map), expected);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let map: CandidateMap = [("a", values(["same", "same"]))].into_iter().collect();
        let combinations = build_combinations(&map);
        assert_eq!(combinations.len(), 2);
        assert_eq!(combinations[0], combinations[1]);
    }

    #[test]
    fn test_count_overflow() {
        let wide = values(0..=u8::MAX);
        let map: CandidateMap = (0..16).map(|i| (format!("f{}", i), wide.clone())).collect();
        assert_eq!(combination_count(&map), None);
    }
}
