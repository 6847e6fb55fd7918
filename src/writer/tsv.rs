//! Writing of results as tab-separated values, one line per variant.

use itertools::Itertools;

use super::{AnalysisResults, OutputFormat, ResultsWriter};
use crate::{
    model::{Variant, VariantCoordinates, VariantEvaluation},
    settings::AnalysisSettings,
};

/// One line of the TSV output.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct Record {
    #[serde(rename = "#CHROM")]
    chrom: String,
    pos: i32,
    #[serde(rename = "REF")]
    reference: String,
    #[serde(rename = "ALT")]
    alternative: String,
    variant_type: String,
    qual: String,
    filter: String,
    gene_symbol: String,
    entrez_gene_id: String,
    variant_effect: String,
    transcript: String,
    hgvs_c: String,
    hgvs_p: String,
}

impl From<&VariantEvaluation> for Record {
    fn from(variant: &VariantEvaluation) -> Self {
        let anno = variant.annotations.first();
        let or_dot = |value: Option<&String>| value.cloned().unwrap_or_else(|| String::from("."));
        Self {
            chrom: variant.contig_name().to_string(),
            pos: variant.start(),
            reference: variant.reference().to_string(),
            alternative: variant.alternative().to_string(),
            variant_type: variant.variant_type().to_string(),
            qual: format!("{:.1}", variant.phred_score()),
            filter: if variant.passed_filters() {
                String::from("PASS")
            } else {
                variant
                    .failed_filters
                    .iter()
                    .join(";")
            },
            gene_symbol: variant.gene_symbol().to_string(),
            entrez_gene_id: variant
                .entrez_gene_id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| String::from(".")),
            variant_effect: variant.variant_effect().to_string(),
            transcript: or_dot(anno.and_then(|anno| anno.accession.as_ref())),
            hgvs_c: or_dot(anno.and_then(|anno| anno.hgvs_cdna.as_ref())),
            hgvs_p: or_dot(anno.and_then(|anno| anno.hgvs_protein.as_ref())),
        }
    }
}

/// Writes one TSV line per variant using the most severe annotation.
#[derive(Debug, Default, Clone)]
pub struct TsvResultsWriter {}

impl ResultsWriter for TsvResultsWriter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Tsv
    }

    fn write_string(
        &self,
        results: &AnalysisResults,
        _settings: &AnalysisSettings,
    ) -> Result<String, anyhow::Error> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(Vec::new());
        for variant in &results.sample_data.variant_evaluations {
            writer.serialize(Record::from(variant))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("problem writing TSV: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }
}
