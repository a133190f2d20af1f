use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical accounting keys read by the aggregation formulas.
pub mod keys {
    pub const CA_HT: &str = "CA_HT";
    pub const CA_EXPORT: &str = "CA_export";
    pub const CA_VENTES_MARCHANDISES: &str = "CA_ventes_marchandises";
    pub const PROD_VENDUE: &str = "Prod_vendue";
    pub const PROD_STOCKEE: &str = "Prod_stockee";
    pub const PROD_IMMOBILISEE: &str = "Prod_immobilisee";
    pub const PRESTATIONS: &str = "Prestations";
    pub const AUTRES_PROD_EXPL: &str = "Autres_prod_expl";
    pub const ACHATS: &str = "Achats";
    pub const VARIATION_STOCK: &str = "Variation_stock";
    pub const CHARGES_EXTERNES: &str = "Charges_externes";
    pub const SOUS_TRAITANCE: &str = "Sous_traitance";
    pub const VARIATION_PROV_EXPL_TRANSF: &str = "Variation_prov_expl_transf";
    pub const FRAIS_PERSONNEL: &str = "Frais_personnel";
    pub const IMPOTS_TAXES: &str = "Impots_taxes";
    pub const FRAIS_DIVERS: &str = "Frais_divers";
    pub const PRODUITS_DIVERS: &str = "Produits_divers";
    pub const TRANSF_CHARGE_EXPL: &str = "Transf_charge_expl";
    pub const AUTRES_PROD_EXPL_2: &str = "Autres_prod_expl_2";
    pub const DOTATIONS_AMORTISSEMENTS: &str = "Dotations_amortissements";
    pub const DOTATIONS_PROVISIONS: &str = "Dotations_provisions";
    pub const PART_CAPITAL_LOYERS_CREDIT_BAIL: &str = "Part_capital_loyers_credit_bail";
    pub const LOYERS_ACTIFS_EXPL: &str = "Loyers_actifs_expl";
    pub const SOLDE_OPERATIONS_COMMUNES: &str = "Solde_operations_communes";
    pub const PRODUITS_FINANCIERS: &str = "Produits_financiers";
    pub const SOLDE_CHANGE_AUTRES: &str = "Solde_change_autres";
    pub const FRAIS_FINANCIERS: &str = "Frais_financiers";
    pub const CHARGES_PRODUITS_SANS_EFFET: &str = "Charges_produits_sans_effet";
    pub const PLUS_MINUS_CESSIONS: &str = "Plus_minus_cessions";
    pub const VARIATION_PROV_IMMO_FIN: &str = "Variation_prov_immo_fin";
    pub const VARIATION_PROV_REGLEMENTEES: &str = "Variation_prov_reglementees";
    pub const AUTRES_PROD_CHARGES_EXCEPTIONNELS: &str = "Autres_prod_charges_exceptionnels";
    pub const PROVISIONS_EXCEPTIONNELLES: &str = "Provisions_exceptionnelles";
    pub const PARTICIPATION_SALARIES: &str = "Participation_salaries";
    pub const IMPOTS_BENEFICES: &str = "Impots_benefices";
    pub const RNC_EXPLICITE: &str = "RNC_explicite";

    /// Bucket receiving every label the mapping does not know.
    pub const CATCH_ALL_KEY: &str = "Autres_generaux";

    /// Every key referenced by at least one aggregation formula.
    pub const FORMULA_KEYS: &[&str] = &[
        CA_HT,
        PROD_VENDUE,
        PROD_STOCKEE,
        PROD_IMMOBILISEE,
        PRESTATIONS,
        AUTRES_PROD_EXPL,
        ACHATS,
        VARIATION_STOCK,
        CHARGES_EXTERNES,
        SOUS_TRAITANCE,
        VARIATION_PROV_EXPL_TRANSF,
        FRAIS_PERSONNEL,
        IMPOTS_TAXES,
        FRAIS_DIVERS,
        PRODUITS_DIVERS,
        TRANSF_CHARGE_EXPL,
        AUTRES_PROD_EXPL_2,
        DOTATIONS_AMORTISSEMENTS,
        DOTATIONS_PROVISIONS,
        PART_CAPITAL_LOYERS_CREDIT_BAIL,
        LOYERS_ACTIFS_EXPL,
        SOLDE_OPERATIONS_COMMUNES,
        PRODUITS_FINANCIERS,
        SOLDE_CHANGE_AUTRES,
        FRAIS_FINANCIERS,
        CHARGES_PRODUITS_SANS_EFFET,
        PLUS_MINUS_CESSIONS,
        VARIATION_PROV_IMMO_FIN,
        VARIATION_PROV_REGLEMENTEES,
        AUTRES_PROD_CHARGES_EXCEPTIONNELS,
        PROVISIONS_EXCEPTIONNELLES,
        PARTICIPATION_SALARIES,
        IMPOTS_BENEFICES,
        RNC_EXPLICITE,
    ];
}

/// A value as typed into the entry form: a number, free text, or nothing.
///
/// Booleans, arrays and objects are kept as [`RawValue::Other`] so that one
/// odd cell never rejects the whole input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawValue {
    #[schemars(description = "An already numeric amount")]
    Number(f64),

    #[schemars(
        description = "A textual amount, possibly with space or non-breaking-space thousands separators and a comma decimal mark (e.g. '1 234,56')"
    )]
    Text(String),

    #[schemars(description = "No value entered; counts as 0.0")]
    Missing,

    #[schemars(description = "Any other JSON value (boolean, array, object); counts as 0.0")]
    Other(serde_json::Value),
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Missing)
    }
}
