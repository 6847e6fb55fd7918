//! Annotation, filtering, and writing of results for a VCF file.

use std::{path::PathBuf, sync::Arc, time::Instant};

use clap::Parser;

use crate::{
    common::{GenomeRelease, Version},
    filter::GeneticInterval,
    genome::{service::AnnotationService, txs::TranscriptProvider},
    model::{SampleData, VariantEffect},
    settings::{AnalysisSettings, AnalysisSettingsBuilder},
    vcf,
    writer::{results_writer, AnalysisResults, OutputFormat},
};

/// Command line arguments for `annotate` sub command.
#[derive(Parser, Debug, Default)]
#[command(about = "Annotate and filter variants of a VCF file", long_about = None)]
pub struct Args {
    /// Path to a YAML settings file; command line arguments take precedence.
    #[arg(long)]
    pub path_settings: Option<PathBuf>,
    /// Path to the input VCF file.
    #[arg(long)]
    pub path_input_vcf: Option<PathBuf>,
    /// Path to the transcript database JSON file.
    #[arg(long)]
    pub path_transcripts: Option<PathBuf>,
    /// Genome release of the input.
    #[arg(long, value_enum)]
    pub genome_release: Option<GenomeRelease>,

    /// Prefix of the output files.
    #[arg(long)]
    pub output_prefix: Option<String>,
    /// Output formats to write.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub output_format: Vec<OutputFormat>,

    /// Minimal PHRED quality of variants.
    #[arg(long)]
    pub min_quality: Option<f64>,
    /// Remove intergenic, intronic, and up-/downstream variants.
    #[arg(long, default_value_t = false)]
    pub remove_off_exome: bool,
    /// Additional variant effects to remove, e.g., `synonymous_variant`.
    #[arg(long, value_delimiter = ',')]
    pub off_target_effect: Vec<VariantEffect>,
    /// Only keep variants overlapping this interval, e.g., `1:10000-20000`.
    #[arg(long, value_parser = parse_interval)]
    pub interval: Option<GeneticInterval>,
}

fn parse_interval(value: &str) -> Result<GeneticInterval, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

/// Merge the settings file (if any) with the command line arguments.
pub fn build_settings(args: &Args) -> Result<AnalysisSettings, anyhow::Error> {
    let mut settings = match args.path_settings.as_ref() {
        Some(path) => AnalysisSettings::from_yaml(path)?,
        None => AnalysisSettingsBuilder::default()
            .vcf_path(
                args.path_input_vcf
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("no input VCF file given"))?,
            )
            .transcripts_path(
                args.path_transcripts
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("no transcript database given"))?,
            )
            .build()?,
    };

    if let Some(path) = args.path_input_vcf.as_ref() {
        settings.vcf_path = path.clone();
    }
    if let Some(path) = args.path_transcripts.as_ref() {
        settings.transcripts_path = path.clone();
    }
    if let Some(genome_release) = args.genome_release {
        settings.genome_release = genome_release;
    }
    if args.output_prefix.is_some() {
        settings.output_prefix = args.output_prefix.clone();
    }
    if !args.output_format.is_empty() {
        settings.output_formats = args.output_format.clone();
    }
    if args.min_quality.is_some() {
        settings.min_quality = args.min_quality;
    }
    settings.remove_off_exome |= args.remove_off_exome;
    for effect in &args.off_target_effect {
        if !settings.off_target_effects.contains(effect) {
            settings.off_target_effects.push(*effect);
        }
    }
    if args.interval.is_some() {
        settings.interval = args.interval.clone();
    }

    Ok(settings)
}

/// Apply the filters of the settings to the annotated variants.
pub fn analyse(
    mut sample_data: SampleData,
    settings: &AnalysisSettings,
    service: &AnnotationService,
) -> AnalysisResults {
    let filter_reports = settings
        .filter_runner(service.reference_dictionary())
        .run(&mut sample_data);
    AnalysisResults {
        version: Version::new(service.data_version()),
        sample_data,
        filter_reports,
    }
}

/// Run the analysis described by `settings` and write all output files.
pub fn run_analysis(settings: &AnalysisSettings) -> Result<Vec<PathBuf>, anyhow::Error> {
    tracing::info!("Loading transcripts from {:?}", &settings.transcripts_path);
    let before_loading = Instant::now();
    let provider = TranscriptProvider::load(&settings.transcripts_path)?;
    if provider.genome_release() != settings.genome_release {
        anyhow::bail!(
            "genome release of transcripts ({}) does not match analysis ({})",
            provider.genome_release().name(),
            settings.genome_release.name()
        );
    }
    tracing::info!(
        "... done loading {} transcripts in {:?}",
        provider.transcript_count(),
        before_loading.elapsed()
    );
    let service = AnnotationService::new(Arc::new(provider));

    tracing::info!("Annotating variants of {:?}", &settings.vcf_path);
    let before_annotation = Instant::now();
    let sample_data = vcf::read_sample_data(&settings.vcf_path, &service)?;
    tracing::info!(
        "... done annotating {} variants in {:?}",
        sample_data.variant_evaluations.len(),
        before_annotation.elapsed()
    );

    let results = analyse(sample_data, settings, &service);

    settings
        .output_formats
        .iter()
        .map(|format| results_writer(*format).write_file(&results, settings))
        .collect()
}

/// Main entry point for `annotate` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let settings = build_settings(args)?;
    tracing::debug!("settings = {:?}", &settings);
    let paths = run_analysis(&settings)?;
    tracing::info!("Wrote {} result file(s)", paths.len());

    Ok(())
}
