use crate::error::{Result, TcrError};
use crate::mapping::Mapping;
use crate::schema::RawValue;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Raw line label → value as entered, before any normalization.
///
/// Labels keep their entry order. Re-inserting a label replaces its value in
/// place, so duplicate JSON members resolve to the last one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RawInputs {
    entries: IndexMap<String, RawValue>,
}

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<L, V, I>(pairs: I) -> Self
    where
        L: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (L, V)>,
    {
        pairs
            .into_iter()
            .map(|(label, value)| (label.into(), value.into()))
            .collect()
    }

    /// One zero entry per mapped label, in mapping order: the blank entry form.
    pub fn template(mapping: &Mapping) -> Self {
        mapping
            .labels()
            .map(|label| (label, RawValue::Number(0.0)))
            .collect()
    }

    /// Parses a JSON object of label → value. Values that are neither
    /// numbers, strings nor null are kept as [`RawValue::Other`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(TcrError::InvalidRawInputs(
                "expected a JSON object of label/value pairs".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<RawValue>) {
        self.entries.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> Option<&RawValue> {
        self.entries.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(label, value)| (label.as_str(), value))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels the mapping does not know; they land in the catch-all bucket.
    pub fn unmapped_labels<'a>(&'a self, mapping: &'a Mapping) -> impl Iterator<Item = &'a str> + 'a {
        self.labels().filter(move |label| !mapping.contains_label(label))
    }
}

impl<L: Into<String>> FromIterator<(L, RawValue)> for RawInputs {
    fn from_iter<I: IntoIterator<Item = (L, RawValue)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_follows_mapping_order() {
        let mapping = Mapping::default();
        let template = RawInputs::template(&mapping);

        assert_eq!(template.len(), mapping.len());
        assert!(template.labels().eq(mapping.labels()));
        assert!(template.iter().all(|(_, v)| *v == RawValue::Number(0.0)));
    }

    #[test]
    fn test_from_json_keeps_order_and_value_kinds() {
        let json = r#"{
            "CHIFFRE D'AFFAIRES H.T.": "1 000,50",
            "Achats": 400,
            "Frais divers": null
        }"#;
        let inputs = RawInputs::from_json_str(json).unwrap();

        let labels: Vec<&str> = inputs.labels().collect();
        assert_eq!(labels, vec!["CHIFFRE D'AFFAIRES H.T.", "Achats", "Frais divers"]);
        assert_eq!(
            inputs.get("CHIFFRE D'AFFAIRES H.T."),
            Some(&RawValue::Text("1 000,50".to_string()))
        );
        assert_eq!(inputs.get("Achats"), Some(&RawValue::Number(400.0)));
        assert_eq!(inputs.get("Frais divers"), Some(&RawValue::Missing));
    }

    #[test]
    fn test_from_json_keeps_odd_values_as_zero() {
        let inputs =
            RawInputs::from_json_str(r#"{"CHIFFRE D'AFFAIRES H.T.": "1000", "Achats": true, "Notes": [1, 2]}"#)
                .unwrap();

        assert_eq!(inputs.len(), 3);
        assert_eq!(
            inputs.get("Achats"),
            Some(&RawValue::Other(serde_json::Value::Bool(true)))
        );
        assert_eq!(inputs.get("Notes").map(RawValue::coerce), Some(0.0));
    }

    #[test]
    fn test_duplicate_json_members_last_wins() {
        let inputs = RawInputs::from_json_str(r#"{"Achats": "1", "Ventes": "2", "Achats": "3"}"#).unwrap();

        let labels: Vec<&str> = inputs.labels().collect();
        assert_eq!(labels, vec!["Achats", "Ventes"]);
        assert_eq!(inputs.get("Achats"), Some(&RawValue::from("3")));
    }

    #[test]
    fn test_json_output_keeps_entry_order() {
        let inputs = RawInputs::from_pairs([("b", "x"), ("a", "y"), ("c", "z")]);
        assert_eq!(serde_json::to_string(&inputs).unwrap(), r#"{"b":"x","a":"y","c":"z"}"#);
    }

    #[test]
    fn test_large_input_keeps_order_and_lookup() {
        let count = 50_000;
        let inputs = RawInputs::from_pairs((0..count).map(|i| (format!("Ligne {}", i), i as f64)));

        assert_eq!(inputs.len(), count);
        assert_eq!(inputs.labels().next(), Some("Ligne 0"));
        assert_eq!(inputs.labels().last(), Some("Ligne 49999"));
        assert_eq!(inputs.get("Ligne 31337"), Some(&RawValue::Number(31337.0)));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let err = RawInputs::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, TcrError::InvalidRawInputs(_)));

        let err = RawInputs::from_json_str("{ broken").unwrap_err();
        assert!(matches!(err, TcrError::SerializationError(_)));
    }

    #[test]
    fn test_from_pairs_and_insert() {
        let mut inputs = RawInputs::from_pairs([("Achats", "400"), ("Frais divers", "12,5")]);
        inputs.insert("Achats", 410.0);
        inputs.insert("Ligne libre", "3");

        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs.get("Achats"), Some(&RawValue::Number(410.0)));
    }

    #[test]
    fn test_unmapped_labels() {
        let mapping = Mapping::default();
        let inputs = RawInputs::from_pairs([("Achats", "1"), ("Ligne libre", "2")]);
        let unmapped: Vec<&str> = inputs.unmapped_labels(&mapping).collect();
        assert_eq!(unmapped, vec!["Ligne libre"]);
    }
}
