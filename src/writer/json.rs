//! Writing of results as JSON.

use super::{AnalysisResults, OutputFormat, ResultsWriter};
use crate::settings::AnalysisSettings;

/// Writes the full results, including settings, as pretty-printed JSON.
#[derive(Debug, Default, Clone)]
pub struct JsonResultsWriter {}

#[derive(serde::Serialize)]
struct JsonOutput<'a> {
    settings: &'a AnalysisSettings,
    #[serde(flatten)]
    results: &'a AnalysisResults,
}

impl ResultsWriter for JsonResultsWriter {
    fn output_format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write_string(
        &self,
        results: &AnalysisResults,
        settings: &AnalysisSettings,
    ) -> Result<String, anyhow::Error> {
        Ok(serde_json::to_string_pretty(&JsonOutput { settings, results })?)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::writer::test::{results, settings};

    #[test]
    fn write_string() -> Result<(), anyhow::Error> {
        let settings = settings("tests/data/vcf/test.vcf", None);
        let output = JsonResultsWriter::default().write_string(&results(), &settings)?;
        let value: serde_json::Value = serde_json::from_str(&output)?;

        assert_eq!(value["settings"]["vcf_path"], "tests/data/vcf/test.vcf");
        assert_eq!(value["version"]["tx_db"], "test");
        assert_eq!(value["filter_reports"][0]["filter_type"], "QUALITY");
        let variants = &value["sample_data"]["variant_evaluations"];
        assert_eq!(variants[0]["annotations"][0]["hgvs_protein"], "p.(Ala2Thr)");
        assert_eq!(variants[0]["annotations"][0]["effects"][0], "missense_variant");
        assert_eq!(variants[1]["failed_filters"][0], "QUALITY");

        let parsed: AnalysisResults = serde_json::from_value(value)?;
        assert_eq!(parsed, results());

        Ok(())
    }
}
