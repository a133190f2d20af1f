use crate::engine::TcrAggregates;
use crate::utils::ratio;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sub-totals as a share of operating revenue (and EBE over value added).
///
/// `None` marks a ratio whose denominator is zero. It serializes as `null`
/// and must never be shown as `0%`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TcrRatios {
    #[serde(rename = "Marge_brute_sur_CA")]
    pub marge_brute_sur_ca: Option<f64>,

    #[serde(rename = "VA_sur_CA")]
    pub va_sur_ca: Option<f64>,

    #[serde(rename = "EBE_sur_CA")]
    pub ebe_sur_ca: Option<f64>,

    #[serde(rename = "ENE_sur_CA")]
    pub ene_sur_ca: Option<f64>,

    #[serde(rename = "RCAI_sur_CA")]
    pub rcai_sur_ca: Option<f64>,

    #[serde(rename = "RNC_sur_CA")]
    pub rnc_sur_ca: Option<f64>,

    #[serde(rename = "EBE_sur_VA")]
    pub ebe_sur_va: Option<f64>,
}

impl TcrRatios {
    pub fn entries(&self) -> [(&'static str, Option<f64>); 7] {
        [
            ("Marge_brute_sur_CA", self.marge_brute_sur_ca),
            ("VA_sur_CA", self.va_sur_ca),
            ("EBE_sur_CA", self.ebe_sur_ca),
            ("ENE_sur_CA", self.ene_sur_ca),
            ("RCAI_sur_CA", self.rcai_sur_ca),
            ("RNC_sur_CA", self.rnc_sur_ca),
            ("EBE_sur_VA", self.ebe_sur_va),
        ]
    }

    pub fn undefined_count(&self) -> usize {
        self.entries().iter().filter(|(_, v)| v.is_none()).count()
    }
}

pub fn compute_ratios(aggs: &TcrAggregates) -> TcrRatios {
    let ca = aggs.produits_exploitation;
    let va = aggs.valeur_ajoutee_corrigee;

    TcrRatios {
        marge_brute_sur_ca: ratio(aggs.marge_brute, ca),
        va_sur_ca: ratio(va, ca),
        ebe_sur_ca: ratio(aggs.ebe, ca),
        ene_sur_ca: ratio(aggs.ene, ca),
        rcai_sur_ca: ratio(aggs.rcai, ca),
        rnc_sur_ca: ratio(aggs.rnc, ca),
        ebe_sur_va: ratio(aggs.ebe, va),
    }
}
