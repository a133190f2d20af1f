//! Label → canonical key mapping.
//!
//! The mapping is the only configuration the engine takes. It arrives either
//! from code or as editable JSON text; when that text is unusable the
//! [`parse_mapping`] collaborator substitutes [`DEFAULT_MAPPING`] and reports
//! why through [`MappingResolution::Fallback`].

use crate::error::{Result, TcrError};
use crate::schema::keys::*;
use indexmap::IndexMap;
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The reference chart of the TCR entry form, in display order.
pub const DEFAULT_MAPPING: &[(&str, &str)] = &[
    ("CHIFFRE D'AFFAIRES H.T.", CA_HT),
    ("Dont exportations", CA_EXPORT),
    ("Dont ventes de marchandises", CA_VENTES_MARCHANDISES),
    ("Production Vendue", PROD_VENDUE),
    ("Production stockée", PROD_STOCKEE),
    ("Production immobilisée", PROD_IMMOBILISEE),
    ("Prestations fournies", PRESTATIONS),
    ("Autres produits d'exploitation", AUTRES_PROD_EXPL),
    ("Achats", ACHATS),
    ("Variation de stock matières, marchandises", VARIATION_STOCK),
    ("Autres charges externes (hors crédit bail, intérim)", CHARGES_EXTERNES),
    ("dont sous-traitance", SOUS_TRAITANCE),
    (
        "Variation prov. d'exploitation, transfert charges de Prod",
        VARIATION_PROV_EXPL_TRANSF,
    ),
    ("Frais de personnel", FRAIS_PERSONNEL),
    ("Impôts et taxes", IMPOTS_TAXES),
    ("Frais divers", FRAIS_DIVERS),
    ("Produits divers", PRODUITS_DIVERS),
    ("Transfert de Charge d'Exploitation", TRANSF_CHARGE_EXPL),
    ("Autres produits d'Exploitation", AUTRES_PROD_EXPL_2),
    ("Dotations aux amortissements", DOTATIONS_AMORTISSEMENTS),
    ("Dotations aux provisions", DOTATIONS_PROVISIONS),
    (
        "Part en capital des loyers de crédit bail",
        PART_CAPITAL_LOYERS_CREDIT_BAIL,
    ),
    ("Loyers d'actifs d'exploitation", LOYERS_ACTIFS_EXPL),
    ("Solde sur opérations faites en commun", SOLDE_OPERATIONS_COMMUNES),
    ("Produits financiers", PRODUITS_FINANCIERS),
    ("Frais financiers", FRAIS_FINANCIERS),
    ("Solde de change et autres", SOLDE_CHANGE_AUTRES),
    (
        "Charges et produits sans effet sur la MBA",
        CHARGES_PRODUITS_SANS_EFFET,
    ),
    (
        "± values sur cessions, reprise subv. invest.",
        PLUS_MINUS_CESSIONS,
    ),
    (
        "Variation provisions pr dépr. d'immo. Financières",
        VARIATION_PROV_IMMO_FIN,
    ),
    (
        "Variation des provisions réglementées",
        VARIATION_PROV_REGLEMENTEES,
    ),
    (
        "Autres produits et charges exceptionnels",
        AUTRES_PROD_CHARGES_EXCEPTIONNELS,
    ),
    (
        "Provisions exceptionnelles pour risques & charges",
        PROVISIONS_EXCEPTIONNELLES,
    ),
    ("Participation des salariés", PARTICIPATION_SALARIES),
    ("Impôts sur les bénéfices", IMPOTS_BENEFICES),
    ("RESULTAT NET COMPTABLE", RNC_EXPLICITE),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Mapping {
    entries: IndexMap<String, String>,
}

impl Default for Mapping {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_MAPPING.iter().copied())
    }
}

impl Mapping {
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn from_pairs<L, K, I>(pairs: I) -> Self
    where
        L: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (L, K)>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(label, key)| (label.into(), key.into()))
                .collect(),
        }
    }

    /// Canonical key for `label`, or [`CATCH_ALL_KEY`] when the label is unmapped.
    pub fn resolve(&self, label: &str) -> &str {
        self.entries
            .get(label)
            .map(String::as_str)
            .unwrap_or(CATCH_ALL_KEY)
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn insert(&mut self, label: impl Into<String>, key: impl Into<String>) {
        self.entries.insert(label.into(), key.into());
    }

    pub fn remove(&mut self, label: &str) -> Option<String> {
        self.entries.shift_remove(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, k)| (l.as_str(), k.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All labels that fold into `key`, in mapping order.
    pub fn labels_for_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |(_, k)| *k == key).map(|(l, _)| l)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renames `target` in place, replacing any entry already under `new_label`.
    /// Returns `false` when there is nothing to rename.
    pub fn relabel(&mut self, target: &str, new_label: impl Into<String>) -> bool {
        let new_label = new_label.into();
        if target == new_label || !self.entries.contains_key(target) {
            return false;
        }
        self.entries.shift_remove(&new_label);
        match self.entries.shift_remove_full(target) {
            Some((idx, _, key)) => {
                self.entries.shift_insert(idx, new_label, key);
                true
            }
            None => false,
        }
    }

    /// The editable text form, pretty JSON with accents kept verbatim.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Strict parse: the text must be a JSON object whose values are all strings.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or_else(|| {
            TcrError::InvalidMapping(format!(
                "expected a JSON object of label/key pairs, got {}",
                json_kind(&value)
            ))
        })?;

        let mut mapping = Self::empty();
        for (label, key) in object {
            let key = key.as_str().ok_or_else(|| {
                TcrError::InvalidMapping(format!(
                    "label '{}' maps to {} instead of a key string",
                    label,
                    json_kind(key)
                ))
            })?;
            mapping.insert(label.clone(), key);
        }
        Ok(mapping)
    }
}

pub fn default_mapping() -> Mapping {
    Mapping::default()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Outcome of reading a user-edited mapping definition.
#[derive(Debug)]
pub enum MappingResolution {
    /// The text was a valid mapping.
    Parsed(Mapping),
    /// The text was unusable; `mapping` is the default one.
    Fallback { mapping: Mapping, error: TcrError },
}

impl MappingResolution {
    pub fn mapping(&self) -> &Mapping {
        match self {
            Self::Parsed(mapping) | Self::Fallback { mapping, .. } => mapping,
        }
    }

    pub fn into_mapping(self) -> Mapping {
        match self {
            Self::Parsed(mapping) | Self::Fallback { mapping, .. } => mapping,
        }
    }

    pub fn warning(&self) -> Option<&TcrError> {
        match self {
            Self::Parsed(_) => None,
            Self::Fallback { error, .. } => Some(error),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn into_parts(self) -> (Mapping, Option<TcrError>) {
        match self {
            Self::Parsed(mapping) => (mapping, None),
            Self::Fallback { mapping, error } => (mapping, Some(error)),
        }
    }
}

/// Reads mapping text, substituting the default mapping when it is malformed.
pub fn parse_mapping(text: &str) -> MappingResolution {
    match Mapping::from_json_str(text) {
        Ok(mapping) => MappingResolution::Parsed(mapping),
        Err(error) => {
            warn!("Invalid mapping JSON, using the default mapping: {}", error);
            MappingResolution::Fallback {
                mapping: Mapping::default(),
                error,
            }
        }
    }
}

/// A single edit to a mapping between two runs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MappingEdit {
    /// Map `label` to `key`. An existing label keeps its position.
    Assign {
        #[schemars(description = "The raw line label as it appears on the entry form.")]
        label: String,
        #[schemars(description = "The canonical key the label folds into.")]
        key: String,
    },

    /// Drop a label; its values then fall into the catch-all bucket.
    Remove { label: String },

    /// Rename a label while keeping its key and position.
    Relabel {
        #[schemars(description = "The exact current label.")]
        target: String,
        #[schemars(description = "The new label.")]
        new_label: String,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MappingEdits {
    #[serde(default)]
    pub edits: Vec<MappingEdit>,
}

impl MappingEdits {
    pub fn new(edits: Vec<MappingEdit>) -> Self {
        Self { edits }
    }

    /// Applies the edits in order to a copy of `base`.
    pub fn apply(&self, base: &Mapping) -> Mapping {
        let mut mapping = base.clone();
        for edit in &self.edits {
            apply_single_edit(&mut mapping, edit);
        }
        mapping
    }
}

fn apply_single_edit(mapping: &mut Mapping, edit: &MappingEdit) {
    match edit {
        MappingEdit::Assign { label, key } => {
            mapping.insert(label.clone(), key.clone());
        }

        MappingEdit::Remove { label } => {
            mapping.remove(label);
        }

        MappingEdit::Relabel { target, new_label } => {
            mapping.relabel(target, new_label.clone());
        }
    }
}
