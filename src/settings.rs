//! Settings of an analysis run.

use std::path::{Path, PathBuf};

use serde_with::{serde_as, DisplayFromStr};

use crate::{
    common::{io::open_read_maybe_gz, GenomeRelease},
    filter::{
        FilterRunner, GeneticInterval, IntervalFilter, QualityFilter, VariantFilter,
        VariantEffectFilter,
    },
    genome::contig::ReferenceDictionary,
    model::VariantEffect,
    writer::OutputFormat,
};

fn default_output_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Html]
}

/// Input, filter, and output settings of an analysis.
#[serde_as]
#[derive(
    Debug, Clone, PartialEq, derive_builder::Builder, serde::Serialize, serde::Deserialize,
)]
#[builder(pattern = "owned")]
pub struct AnalysisSettings {
    /// Path to the VCF file to analyse.
    pub vcf_path: PathBuf,
    #[builder(default)]
    #[serde(default)]
    pub genome_release: GenomeRelease,
    /// Path to the transcript database JSON file.
    pub transcripts_path: PathBuf,
    /// Prefix of the output files, derived from the VCF path if not set.
    #[builder(default)]
    #[serde(default)]
    pub output_prefix: Option<String>,
    #[builder(default = "default_output_formats()")]
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<OutputFormat>,
    /// Minimal PHRED quality of variants to keep.
    #[builder(default)]
    #[serde(default)]
    pub min_quality: Option<f64>,
    /// Remove intergenic, intronic, and up-/downstream variants.
    #[builder(default)]
    #[serde(default)]
    pub remove_off_exome: bool,
    /// Further effects to remove.
    #[builder(default)]
    #[serde(default)]
    pub off_target_effects: Vec<VariantEffect>,
    /// Only keep variants in this interval, e.g., `chr1:1000-2000`.
    #[builder(default)]
    #[serde(default)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub interval: Option<GeneticInterval>,
}

impl AnalysisSettings {
    /// Load settings from a YAML file.
    pub fn from_yaml<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        tracing::debug!("Loading analysis settings from {:?}", path.as_ref());
        let reader = open_read_maybe_gz(path.as_ref())?;
        serde_yaml::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("problem parsing settings {:?}: {}", path.as_ref(), e))
    }

    /// Build the filters in the order interval, quality, variant effect.
    pub fn filter_runner(&self, dict: &ReferenceDictionary) -> FilterRunner {
        let mut filters: Vec<Box<dyn VariantFilter>> = Vec::new();
        if let Some(interval) = self.interval.as_ref() {
            filters.push(Box::new(IntervalFilter::new(interval.clone(), dict)));
        }
        if let Some(min_quality) = self.min_quality {
            filters.push(Box::new(QualityFilter::new(min_quality)));
        }
        if self.remove_off_exome || !self.off_target_effects.is_empty() {
            filters.push(Box::new(VariantEffectFilter::new(
                self.off_target_effects.iter().copied(),
                self.remove_off_exome,
            )));
        }
        FilterRunner::new(filters)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        filter::FilterType,
        model::{variant::VariantEvaluationBuilder, SampleData, VariantType},
    };

    #[test]
    fn from_yaml() -> Result<(), anyhow::Error> {
        let settings = AnalysisSettings::from_yaml("tests/data/settings/analysis.yaml")?;
        let expected = AnalysisSettingsBuilder::default()
            .vcf_path(PathBuf::from("tests/data/vcf/test.vcf"))
            .transcripts_path(PathBuf::from("tests/data/txs/txs.json"))
            .output_prefix(Some(String::from("results/test")))
            .output_formats(vec![OutputFormat::Html, OutputFormat::Tsv])
            .min_quality(Some(20.0))
            .remove_off_exome(true)
            .off_target_effects(vec![VariantEffect::SynonymousVariant])
            .interval(Some("1:1000-5000".parse()?))
            .build()?;
        assert_eq!(settings, expected);

        Ok(())
    }

    #[test]
    fn defaults() -> Result<(), anyhow::Error> {
        let settings: AnalysisSettings = serde_yaml::from_str(
            "vcf_path: sample.vcf.gz\ntranscripts_path: txs.json\n",
        )?;
        assert_eq!(settings.genome_release, GenomeRelease::Grch37);
        assert_eq!(settings.output_formats, vec![OutputFormat::Html]);
        assert_eq!(settings.interval, None);
        assert!(settings.filter_runner(&ReferenceDictionary::default()).is_empty());

        Ok(())
    }

    #[test]
    fn invalid_interval() {
        let result: Result<AnalysisSettings, _> = serde_yaml::from_str(
            "vcf_path: sample.vcf\ntranscripts_path: txs.json\ninterval: chr1-100\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn filter_runner() -> Result<(), anyhow::Error> {
        let settings = AnalysisSettings::from_yaml("tests/data/settings/analysis.yaml")?;
        let runner = settings.filter_runner(&ReferenceDictionary::new(GenomeRelease::Grch37));

        let mut sample_data = SampleData {
            variant_evaluations: vec![VariantEvaluationBuilder::default()
                .contig_id(1)
                .contig_name(String::from("1"))
                .start(6000)
                .end(6000)
                .reference(String::from("A"))
                .alternative(String::from("T"))
                .variant_type(VariantType::Snv)
                .build()?],
            ..Default::default()
        };
        let reports = runner.run(&mut sample_data);
        let filter_types = reports
            .iter()
            .map(|report| report.filter_type)
            .collect::<Vec<_>>();
        assert_eq!(
            filter_types,
            vec![
                FilterType::Interval,
                FilterType::Quality,
                FilterType::VariantEffect
            ]
        );
        assert_eq!(reports[0].failed, 1);
        assert_eq!(reports[1].passed + reports[1].failed, 0);

        Ok(())
    }
}
