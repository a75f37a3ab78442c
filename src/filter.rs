//! Occurrence filters: named reducers over multi-valued fields.
//!
//! The [`FilterRegistry`] maps filter names to implementations. It is built
//! once at startup and passed explicitly into the engine — no ambient
//! lookup, no global state. An unknown filter name is identity, never an
//! error: absence of a filter is valid configuration. Registering the same
//! name twice silently replaces the earlier filter.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;

use crate::entity::FieldOccurrence;
use crate::temporal::parse_timestamp;

/// Name of the boolean parameter truncating filter output to one value.
pub const PARAM_ONE_VALUE: &str = "filterOneValue";

/// A named reducer over a non-empty set of field occurrences.
pub trait OccurrenceFilter: Send + Sync {
    /// Reduce the occurrence set. Implementations must return a subset of
    /// the input (possibly the whole input) and must never panic on
    /// malformed values.
    fn apply(
        &self,
        occurrences: Vec<FieldOccurrence>,
        params: &BTreeMap<String, String>,
    ) -> Vec<FieldOccurrence>;
}

fn one_value_requested(params: &BTreeMap<String, String>) -> bool {
    params
        .get(PARAM_ONE_VALUE)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

// ---------------------------------------------------------------------------
// Built-in filters
// ---------------------------------------------------------------------------

/// Keeps every occurrence whose rendered length equals the maximum length in
/// the input (ties kept). Values that fail to render count as length 0.
pub struct LongestString;

impl OccurrenceFilter for LongestString {
    fn apply(
        &self,
        occurrences: Vec<FieldOccurrence>,
        params: &BTreeMap<String, String>,
    ) -> Vec<FieldOccurrence> {
        let lengths: Vec<usize> = occurrences
            .iter()
            .map(|occ| match occ.value.rendered() {
                Some(s) => s.chars().count(),
                None => {
                    tracing::warn!("longest-string: occurrence has no rendered form, counting length 0");
                    0
                }
            })
            .collect();
        let max = lengths.iter().copied().max().unwrap_or(0);

        let mut kept: Vec<FieldOccurrence> = occurrences
            .into_iter()
            .zip(lengths)
            .filter(|(_, len)| *len == max)
            .map(|(occ, _)| occ)
            .collect();

        if one_value_requested(params) {
            kept.truncate(1);
        }
        kept
    }
}

/// Keeps every occurrence whose parsed date equals the minimum in the input
/// (ties kept, by instant equality). Unparseable values are treated as "now"
/// so they sort last and never win.
pub struct OldestDate;

impl OccurrenceFilter for OldestDate {
    fn apply(
        &self,
        occurrences: Vec<FieldOccurrence>,
        params: &BTreeMap<String, String>,
    ) -> Vec<FieldOccurrence> {
        let now = Utc::now();
        let parsed: Vec<chrono::DateTime<Utc>> = occurrences
            .iter()
            .map(|occ| {
                occ.value
                    .rendered()
                    .and_then(parse_timestamp)
                    .unwrap_or_else(|| {
                        tracing::warn!(
                            value = ?occ.value.rendered(),
                            "oldest-date: unparseable date treated as now"
                        );
                        now
                    })
            })
            .collect();
        let Some(min) = parsed.iter().copied().min() else {
            return Vec::new();
        };

        let mut kept: Vec<FieldOccurrence> = occurrences
            .into_iter()
            .zip(parsed)
            .filter(|(_, dt)| *dt == min)
            .map(|(occ, _)| occ)
            .collect();

        if one_value_requested(params) {
            kept.truncate(1);
        }
        kept
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Explicit name → filter mapping, populated once at process start.
pub struct FilterRegistry {
    filters: HashMap<String, Box<dyn OccurrenceFilter>>,
}

impl FilterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Create a registry with the built-in filters registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("longest-string", Box::new(LongestString));
        registry.register("oldest-date", Box::new(OldestDate));
        registry
    }

    /// Register a filter under a name. A collision silently replaces the
    /// earlier filter; callers own name uniqueness.
    pub fn register(&mut self, name: impl Into<String>, filter: Box<dyn OccurrenceFilter>) {
        self.filters.insert(name.into(), filter);
    }

    /// Apply the named filter to an occurrence set.
    ///
    /// An unknown name (or an empty input) returns the input unchanged.
    pub fn apply(
        &self,
        name: &str,
        occurrences: Vec<FieldOccurrence>,
        params: &BTreeMap<String, String>,
    ) -> Vec<FieldOccurrence> {
        if occurrences.is_empty() {
            return occurrences;
        }
        match self.filters.get(name) {
            Some(filter) => filter.apply(occurrences, params),
            None => occurrences,
        }
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<FieldOccurrence> {
        values.iter().map(|v| FieldOccurrence::text(*v)).collect()
    }

    fn rendered(occurrences: &[FieldOccurrence]) -> Vec<&str> {
        occurrences
            .iter()
            .filter_map(|o| o.value.rendered())
            .collect()
    }

    fn one_value_params() -> BTreeMap<String, String> {
        BTreeMap::from([(PARAM_ONE_VALUE.to_string(), "true".to_string())])
    }

    #[test]
    fn longest_string_keeps_maximum() {
        let out = LongestString.apply(texts(&["ab", "abcd", "xy"]), &BTreeMap::new());
        assert_eq!(rendered(&out), vec!["abcd"]);
    }

    #[test]
    fn longest_string_keeps_ties() {
        let out = LongestString.apply(texts(&["abcd", "wxyz", "a"]), &BTreeMap::new());
        assert_eq!(rendered(&out), vec!["abcd", "wxyz"]);
    }

    #[test]
    fn longest_string_one_value_truncates_to_first() {
        let out = LongestString.apply(texts(&["abcd", "wxyz"]), &one_value_params());
        assert_eq!(rendered(&out), vec!["abcd"]);
    }

    #[test]
    fn longest_string_unrenderable_counts_as_zero() {
        let mut occs = texts(&["ok"]);
        occs.push(FieldOccurrence::compound(None, [("family", "Doe")]));
        let out = LongestString.apply(occs, &BTreeMap::new());
        assert_eq!(rendered(&out), vec!["ok"]);
    }

    #[test]
    fn oldest_date_keeps_minimum() {
        let out = OldestDate.apply(
            texts(&["2021-05-01", "2019-07-16", "2020-01-01"]),
            &BTreeMap::new(),
        );
        assert_eq!(rendered(&out), vec!["2019-07-16"]);
    }

    #[test]
    fn oldest_date_ties_by_instant_not_lexical_form() {
        // Same instant written at different precision.
        let out = OldestDate.apply(
            texts(&["2019-01-01", "2019", "2020-02-02"]),
            &BTreeMap::new(),
        );
        assert_eq!(rendered(&out), vec!["2019-01-01", "2019"]);
    }

    #[test]
    fn oldest_date_malformed_never_wins() {
        let out = OldestDate.apply(texts(&["garbage", "2019-07-16"]), &BTreeMap::new());
        assert_eq!(rendered(&out), vec!["2019-07-16"]);
    }

    #[test]
    fn oldest_date_one_value() {
        let out = OldestDate.apply(texts(&["2019", "2019-01-01"]), &one_value_params());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn registry_unknown_filter_is_identity() {
        let registry = FilterRegistry::with_builtins();
        let input = texts(&["a", "bb"]);
        let out = registry.apply("no-such-filter", input.clone(), &BTreeMap::new());
        assert_eq!(out, input);
    }

    #[test]
    fn registry_dispatches_by_name() {
        let registry = FilterRegistry::with_builtins();
        let out = registry.apply("longest-string", texts(&["a", "bb"]), &BTreeMap::new());
        assert_eq!(rendered(&out), vec!["bb"]);
    }

    #[test]
    fn registry_last_registered_wins() {
        struct KeepFirst;
        impl OccurrenceFilter for KeepFirst {
            fn apply(
                &self,
                mut occurrences: Vec<FieldOccurrence>,
                _params: &BTreeMap<String, String>,
            ) -> Vec<FieldOccurrence> {
                occurrences.truncate(1);
                occurrences
            }
        }

        let mut registry = FilterRegistry::with_builtins();
        registry.register("longest-string", Box::new(KeepFirst));
        let out = registry.apply("longest-string", texts(&["a", "bb"]), &BTreeMap::new());
        assert_eq!(rendered(&out), vec!["a"]);
    }
}
