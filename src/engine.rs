use crate::ingestion::RawInputs;
use crate::mapping::Mapping;
use crate::normalizer::{normalize, NormalizedValues};
use crate::schema::keys::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The TCR waterfall for one set of line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TcrAggregates {
    #[schemars(description = "Total operating revenue: turnover plus every production line")]
    pub produits_exploitation: f64,

    #[schemars(description = "Operating revenue less purchases and stock variation")]
    pub marge_brute: f64,

    #[schemars(description = "Gross margin less external charges, subcontracting and operating provision variation")]
    pub valeur_ajoutee_corrigee: f64,

    #[schemars(description = "Excédent Brut d'Exploitation (EBITDA equivalent)")]
    pub ebe: f64,

    #[schemars(description = "Depreciation, provisions, lease capital share, operating rents and joint operations")]
    pub charges_exploitation: f64,

    #[schemars(description = "Excédent Net d'Exploitation")]
    pub ene: f64,

    #[schemars(description = "Financial income plus exchange balance less financial charges")]
    pub solde_financier: f64,

    #[schemars(description = "Résultat Courant Avant Impôts")]
    pub rcai: f64,

    #[schemars(description = "Résultat Net Comptable")]
    pub rnc: f64,

    #[serde(rename = "normalized_values")]
    #[schemars(description = "Canonical bucket amounts the sub-totals were computed from")]
    pub normalized_values: NormalizedValues,
}

impl TcrAggregates {
    /// The nine sub-totals with their report names, in waterfall order.
    pub fn subtotals(&self) -> [(&'static str, f64); 9] {
        [
            ("PRODUITS_EXPLOITATION", self.produits_exploitation),
            ("MARGE_BRUTE", self.marge_brute),
            ("VALEUR_AJOUTEE_CORRIGEE", self.valeur_ajoutee_corrigee),
            ("EBE", self.ebe),
            ("CHARGES_EXPLOITATION", self.charges_exploitation),
            ("ENE", self.ene),
            ("SOLDE_FINANCIER", self.solde_financier),
            ("RCAI", self.rcai),
            ("RNC", self.rnc),
        ]
    }
}

/// Runs the sub-total chain over already normalized buckets.
///
/// Each step only reads buckets and earlier steps, so the order below is the
/// dependency order. Missing buckets read as `0.0`.
pub fn compute_aggregates(values: &NormalizedValues) -> TcrAggregates {
    let get = |key: &str| values.get(key);

    let produits_exploitation = get(CA_HT)
        + get(PROD_VENDUE)
        + get(PROD_STOCKEE)
        + get(PROD_IMMOBILISEE)
        + get(PRESTATIONS)
        + get(AUTRES_PROD_EXPL);

    let consommations = get(ACHATS) + get(VARIATION_STOCK);
    let marge_brute = produits_exploitation - consommations;

    let valeur_ajoutee_corrigee = marge_brute
        - get(CHARGES_EXTERNES)
        - get(SOUS_TRAITANCE)
        - get(VARIATION_PROV_EXPL_TRANSF);

    let ebe = valeur_ajoutee_corrigee
        - get(FRAIS_PERSONNEL)
        - get(IMPOTS_TAXES)
        - get(FRAIS_DIVERS)
        + get(PRODUITS_DIVERS)
        + get(TRANSF_CHARGE_EXPL);

    let charges_exploitation = get(DOTATIONS_AMORTISSEMENTS)
        + get(DOTATIONS_PROVISIONS)
        + get(PART_CAPITAL_LOYERS_CREDIT_BAIL)
        + get(LOYERS_ACTIFS_EXPL)
        + get(SOLDE_OPERATIONS_COMMUNES);

    let ene = ebe + get(AUTRES_PROD_EXPL_2) - charges_exploitation;

    let solde_financier =
        get(PRODUITS_FINANCIERS) + get(SOLDE_CHANGE_AUTRES) - get(FRAIS_FINANCIERS);

    let rcai = ene + solde_financier;

    let rnc = rcai
        + get(CHARGES_PRODUITS_SANS_EFFET)
        + get(PLUS_MINUS_CESSIONS)
        + get(VARIATION_PROV_IMMO_FIN)
        + get(VARIATION_PROV_REGLEMENTEES)
        + get(AUTRES_PROD_CHARGES_EXCEPTIONNELS)
        - get(PROVISIONS_EXCEPTIONNELLES)
        - get(PARTICIPATION_SALARIES)
        - get(IMPOTS_BENEFICES)
        + get(RNC_EXPLICITE);

    TcrAggregates {
        produits_exploitation,
        marge_brute,
        valeur_ajoutee_corrigee,
        ebe,
        charges_exploitation,
        ene,
        solde_financier,
        rcai,
        rnc,
        normalized_values: values.clone(),
    }
}

pub fn compute_aggregates_from_inputs(raw_inputs: &RawInputs, mapping: &Mapping) -> TcrAggregates {
    compute_aggregates(&normalize(raw_inputs, mapping))
}
