//! # TCR Aggregates
//!
//! Computes a French income-statement waterfall (*Tableau de Compte de
//! Résultat*) and its ratios from manually entered line items.
//!
//! ## Core Concepts
//!
//! - **Mapping**: raw line label → canonical key. Unknown labels fall into `Autres_generaux`
//! - **Raw Inputs**: label → value exactly as typed ("1 234,56", 812.5, empty...)
//! - **Normalized Values**: canonical key → summed amount, read with a zero default
//! - **Aggregates**: PRODUITS_EXPLOITATION down to RNC, computed in dependency order
//! - **Ratios**: sub-totals over operating revenue (and EBE over value added), `None` on a zero base
//!
//! ## Example
//!
//! ```rust
//! use tcr_aggregates::*;
//!
//! let inputs = RawInputs::from_pairs([
//!     ("CHIFFRE D'AFFAIRES H.T.", "1 000"),
//!     ("Achats", "400"),
//! ]);
//!
//! let report = process_tcr(&inputs, &Mapping::default());
//!
//! assert_eq!(report.aggregates.marge_brute, 600.0);
//! assert_eq!(report.ratios.marge_brute_sur_ca, Some(0.6));
//! ```

pub mod engine;
pub mod error;
pub mod ingestion;
pub mod mapping;
pub mod normalizer;
pub mod ratios;
pub mod report;
pub mod schema;
pub mod utils;

pub use engine::{compute_aggregates, compute_aggregates_from_inputs, TcrAggregates};
pub use error::{Result, TcrError};
pub use ingestion::RawInputs;
pub use mapping::{
    default_mapping, parse_mapping, Mapping, MappingEdit, MappingEdits, MappingResolution,
    DEFAULT_MAPPING,
};
pub use normalizer::{coerce_str, normalize, NormalizedValues};
pub use ratios::{compute_ratios, TcrRatios};
pub use report::{TcrReport, DEFAULT_REPORT_FILE_NAME};
pub use schema::{keys, RawValue};
pub use utils::*;

use log::{debug, info};

/// Entry point tying normalization, aggregation and ratios together.
pub struct TcrProcessor;

impl TcrProcessor {
    /// Normalizes `raw_inputs` through `mapping`, then computes the aggregates
    /// and ratios. The raw inputs are kept in the report as `postes_map`.
    pub fn process(raw_inputs: &RawInputs, mapping: &Mapping) -> TcrReport {
        info!(
            "Computing TCR for {} line items with a {}-label mapping",
            raw_inputs.len(),
            mapping.len()
        );

        let values = normalize(raw_inputs, mapping);
        debug!("Normalized into {} canonical buckets", values.len());

        for (key, amount) in values.keys_outside(keys::FORMULA_KEYS) {
            debug!("Bucket {} ({}) is not read by any aggregate", key, amount);
        }

        let aggregates = compute_aggregates(&values);
        let ratios = compute_ratios(&aggregates);

        debug!(
            "RNC = {}, {} undefined ratio(s)",
            aggregates.rnc,
            ratios.undefined_count()
        );

        TcrReport::new(aggregates, ratios, raw_inputs.clone())
    }

    /// Like [`TcrProcessor::process`], reading the mapping from its JSON text.
    ///
    /// Malformed text does not stop the computation: the default mapping is
    /// used and the parse error comes back as a warning.
    pub fn process_text(raw_inputs: &RawInputs, mapping_text: &str) -> (TcrReport, Option<TcrError>) {
        let (mapping, warning) = parse_mapping(mapping_text).into_parts();
        (Self::process(raw_inputs, &mapping), warning)
    }
}

pub fn process_tcr(raw_inputs: &RawInputs, mapping: &Mapping) -> TcrReport {
    TcrProcessor::process(raw_inputs, mapping)
}

pub fn compute_tcr_aggregates(raw_inputs: &RawInputs, mapping: &Mapping) -> TcrAggregates {
    compute_aggregates_from_inputs(raw_inputs, mapping)
}

pub fn compute_tcr_ratios(aggregates: &TcrAggregates) -> TcrRatios {
    compute_ratios(aggregates)
}
