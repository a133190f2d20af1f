use crate::engine::TcrAggregates;
use crate::error::Result;
use crate::ingestion::RawInputs;
use crate::ratios::TcrRatios;
use crate::utils::{format_amount, format_ratio, UNDEFINED_RATIO};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_REPORT_FILE_NAME: &str = "gibupet_tcr_report.json";

/// The exported artifact: results plus the raw inputs they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TcrReport {
    #[schemars(description = "The TCR sub-totals, with the normalized buckets under 'normalized_values'")]
    pub aggregates: TcrAggregates,

    #[schemars(description = "Ratios as fractions of 1; null when the denominator is zero")]
    pub ratios: TcrRatios,

    #[schemars(description = "The raw label/value input, before normalization")]
    pub postes_map: RawInputs,
}

impl TcrReport {
    pub fn new(aggregates: TcrAggregates, ratios: TcrRatios, postes_map: RawInputs) -> Self {
        Self {
            aggregates,
            ratios,
            postes_map,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(TcrReport)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Section,Indicator,Value\n");

        for (name, value) in self.aggregates.subtotals() {
            output.push_str(&format!("Aggregates,{},{}\n", name, value));
        }

        for (name, value) in self.ratios.entries() {
            let cell = match value {
                Some(v) => v.to_string(),
                None => UNDEFINED_RATIO.to_string(),
            };
            output.push_str(&format!("Ratios,{},{}\n", name, cell));
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# Tableau de Compte de Résultat\n\n");

        output.push_str("## Agrégats\n\n");
        output.push_str("| Agrégat | Montant |\n");
        output.push_str("|---|---:|\n");
        for (name, value) in self.aggregates.subtotals() {
            output.push_str(&format!("| {} | {} |\n", name, format_amount(value)));
        }
        output.push('\n');

        output.push_str("## Ratios\n\n");
        output.push_str("| Ratio | Valeur |\n");
        output.push_str("|---|---:|\n");
        for (name, value) in self.ratios.entries() {
            output.push_str(&format!("| {} | {} |\n", name, format_ratio(value)));
        }
        output.push('\n');

        output
    }
}
