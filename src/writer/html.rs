//! Writing of results as a single HTML page.

use askama::Template;
use itertools::Itertools;

use super::{AnalysisResults, OutputFormat, ResultsWriter};
use crate::{
    filter::FilterReport,
    model::{Variant, VariantCoordinates, VariantEffect, VariantEvaluation, VariantType},
    settings::AnalysisSettings,
};

/// One line of the variants table, most severe annotation only.
#[derive(Debug, Clone, PartialEq)]
struct VariantRow {
    passed: bool,
    variant: String,
    variant_type: VariantType,
    quality: String,
    gene_symbol: String,
    effect: VariantEffect,
    impact: String,
    transcript: String,
    hgvs_c: String,
    hgvs_p: String,
    filters: String,
}

impl From<&VariantEvaluation> for VariantRow {
    fn from(variant: &VariantEvaluation) -> Self {
        let anno = variant.annotations.first();
        let or_dot = |value: Option<&String>| value.cloned().unwrap_or_else(|| String::from("."));
        let effect = variant.variant_effect();
        Self {
            passed: variant.passed_filters(),
            variant: variant.chromosomal_variant(),
            variant_type: variant.variant_type(),
            quality: format!("{:.1}", variant.phred_score()),
            gene_symbol: variant.gene_symbol().to_string(),
            effect,
            impact: effect.impact().to_string(),
            transcript: or_dot(anno.and_then(|anno| anno.accession.as_ref())),
            hgvs_c: or_dot(anno.and_then(|anno| anno.hgvs_cdna.as_ref())),
            hgvs_p: or_dot(anno.and_then(|anno| anno.hgvs_protein.as_ref())),
            filters: if variant.passed_filters() {
                String::from("PASS")
            } else {
                variant.failed_filters.iter().join(",")
            },
        }
    }
}

/// The results page, see `templates/results.html`.
#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate<'a> {
    vcf_name: String,
    vcf_path: String,
    sample_names: &'a [String],
    genome_release: String,
    transcripts_path: String,
    tx_db_version: &'a str,
    exomiser_version: &'a str,
    filter_reports: &'a [FilterReport],
    passed_count: usize,
    variant_count: usize,
    variants: Vec<VariantRow>,
}

/// Renders the results into the embedded HTML template.
#[derive(Debug, Default, Clone)]
pub struct HtmlResultsWriter {}

impl ResultsWriter for HtmlResultsWriter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn write_string(
        &self,
        results: &AnalysisResults,
        settings: &AnalysisSettings,
    ) -> Result<String, anyhow::Error> {
        let sample_data = &results.sample_data;
        let vcf_path = sample_data
            .vcf_path
            .as_deref()
            .unwrap_or(settings.vcf_path.as_path());

        let template = ResultsTemplate {
            vcf_name: vcf_path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default(),
            vcf_path: vcf_path.display().to_string(),
            sample_names: &sample_data.sample_names,
            genome_release: settings.genome_release.name(),
            transcripts_path: settings.transcripts_path.display().to_string(),
            tx_db_version: results.version.tx_db.as_deref().unwrap_or("unknown"),
            exomiser_version: &results.version.exomiser,
            filter_reports: &results.filter_reports,
            passed_count: sample_data.passed_variants().count(),
            variant_count: sample_data.variant_evaluations.len(),
            variants: sample_data
                .variant_evaluations
                .iter()
                .map(VariantRow::from)
                .collect(),
        };
        template
            .render()
            .map_err(|e| anyhow::anyhow!("problem rendering HTML results: {}", e))
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;
    use crate::writer::test::{results, settings};

    #[test]
    fn write_string() -> Result<(), anyhow::Error> {
        let html = HtmlResultsWriter::default()
            .write_string(&results(), &settings("tests/data/vcf/test.vcf", None))?;

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(!html.contains("{{"));
        assert!(!html.contains("{%"));
        assert!(html.contains("<title>Exomiser Analysis Results for test.vcf</title>"));
        assert!(html.contains("<tr><th>Samples</th><td>SAMPLE</td></tr>"));
        assert!(html.contains("<td>txs.json (test)</td>"));
        assert!(html.contains(
            "<tr><td>QUALITY</td><td>Minimum PHRED variant call quality: 20.0</td>\
             <td>1</td><td>1</td></tr>"
        ));
        assert!(html.contains("<p>1 of 2 variants passed all filters.</p>"));
        assert!(html.contains(
            "<tr class=\"passed\"><td>chr1:g.1054G&gt;A</td><td>SNV</td><td>60.0</td>\
             <td>TEST1</td><td class=\"impact-MODERATE\">missense_variant</td>\
             <td>NM_TEST1.1</td><td>c.4G&gt;A</td><td>p.(Ala2Thr)</td><td>PASS</td></tr>"
        ));
        assert!(html.contains(
            "<tr class=\"failed\"><td>chr1:g.12000_12000&lt;T&amp;G&gt;</td><td>SYMBOLIC</td>\
             <td>10.0</td><td>.</td><td class=\"impact-MODIFIER\">intergenic_variant</td>\
             <td>.</td><td>.</td><td>.</td><td>QUALITY</td></tr>"
        ));

        Ok(())
    }

    #[test]
    fn write_string_escapes_markup() -> Result<(), anyhow::Error> {
        let mut results = results();
        results.sample_data.vcf_path = Some(PathBuf::from("data/<b>x</b>.vcf"));
        results.sample_data.sample_names = vec![
            String::from("<script>alert(1)</script>"),
            String::from("Smith & Sons"),
        ];
        results.filter_reports[0].messages = vec![String::from("a<b"), String::from("c>d")];

        let html = HtmlResultsWriter::default()
            .write_string(&results, &settings("tests/data/vcf/test.vcf", None))?;

        assert!(!html.contains("<script>alert"));
        assert!(!html.contains("<b>x</b>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;, Smith &amp; Sons"));
        assert!(html.contains("<title>Exomiser Analysis Results for &lt;b&gt;x&lt;/b&gt;.vcf</title>"));
        assert!(html.contains("<td>a&lt;b; c&gt;d</td>"));

        Ok(())
    }

    #[test]
    fn write_string_without_variants() -> Result<(), anyhow::Error> {
        let html = HtmlResultsWriter::default().write_string(
            &AnalysisResults::default(),
            &settings("tests/data/vcf/test.vcf", None),
        )?;

        assert!(html.contains("<p>0 of 0 variants passed all filters.</p>"));
        assert!(!html.contains("<tr class="));
        assert!(html.contains("<title>Exomiser Analysis Results for test.vcf</title>"));

        Ok(())
    }
}
