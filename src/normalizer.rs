use crate::ingestion::RawInputs;
use crate::mapping::Mapping;
use crate::schema::RawValue;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const NON_BREAKING_SPACE: char = '\u{a0}';
const NARROW_NON_BREAKING_SPACE: char = '\u{202f}';

/// Coerces a manually typed amount into a finite `f64`.
///
/// Spaces (ordinary and non-breaking) are thousands separators and are
/// dropped; every comma becomes a decimal point. Anything that still does not
/// read as a finite number, including empty text, `nan` and `None`, is `0.0`.
pub fn coerce_str(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(*c, ' ' | NON_BREAKING_SPACE | NARROW_NON_BREAKING_SPACE))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    if is_blank_marker(cleaned) {
        return 0.0;
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

fn is_blank_marker(text: &str) -> bool {
    text.is_empty()
        || text.eq_ignore_ascii_case("nan")
        || text.eq_ignore_ascii_case("none")
        || text.eq_ignore_ascii_case("null")
}

impl RawValue {
    pub fn coerce(&self) -> f64 {
        match self {
            RawValue::Number(value) if value.is_finite() => *value,
            RawValue::Number(_) | RawValue::Missing | RawValue::Other(_) => 0.0,
            RawValue::Text(text) => coerce_str(text),
        }
    }
}

/// Canonical key → accumulated amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct NormalizedValues {
    buckets: BTreeMap<String, f64>,
}

impl NormalizedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored amount for `key`; an absent key reads as `0.0`.
    pub fn get(&self, key: &str) -> f64 {
        self.buckets.get(key).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, key: impl Into<String>, amount: f64) {
        *self.buckets.entry(key.into()).or_insert(0.0) += amount;
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.buckets.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.buckets.values().sum()
    }

    /// Buckets whose key is not in `read_keys`, i.e. amounts no formula uses.
    pub fn keys_outside<'a>(&'a self, read_keys: &'a [&'a str]) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.iter().filter(move |(k, _)| !read_keys.contains(k))
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.buckets
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for NormalizedValues {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (key, amount) in iter {
            values.add(key, amount);
        }
        values
    }
}

/// Folds labeled raw inputs into canonical buckets, summing labels that share a key.
pub fn normalize(raw_inputs: &RawInputs, mapping: &Mapping) -> NormalizedValues {
    let mut values = NormalizedValues::new();
    for (label, value) in raw_inputs.iter() {
        values.add(mapping.resolve(label), value.coerce());
    }
    values
}
