//! Writing of analysis results in the supported output formats.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    common::{io::open_write_maybe_gz, Version},
    filter::FilterReport,
    model::SampleData,
    settings::AnalysisSettings,
};

pub mod html;
pub mod json;
pub mod tsv;

/// Supported output formats.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

/// The results of an analysis that are written out.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResults {
    pub version: Version,
    pub sample_data: SampleData,
    pub filter_reports: Vec<FilterReport>,
}

/// Strip the `.vcf`, `.vcf.gz`, or `.vcf.bgz` suffix from a file name.
fn vcf_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    [".vcf.gz", ".vcf.bgz", ".vcf"]
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .map(str::to_string)
        .unwrap_or(name)
}

/// Determine the output file for the given format.
///
/// The output prefix of the settings is used if set; otherwise, the results are written next to
/// the VCF file as `<vcf stem>-exomiser-results`.
pub fn determine_file_name(settings: &AnalysisSettings, format: OutputFormat) -> PathBuf {
    let prefix = match settings.output_prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => PathBuf::from(prefix),
        _ => {
            let dir = settings
                .vcf_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            dir.join(format!("{}-exomiser-results", vcf_stem(&settings.vcf_path)))
        }
    };
    let mut file_name = prefix.into_os_string();
    file_name.push(".");
    file_name.push(format.file_extension());
    PathBuf::from(file_name)
}

/// Common interface of the results writers.
pub trait ResultsWriter {
    fn output_format(&self) -> OutputFormat;

    /// Render the results into a string.
    fn write_string(
        &self,
        results: &AnalysisResults,
        settings: &AnalysisSettings,
    ) -> Result<String, anyhow::Error>;

    /// Write the results to the file given by `determine_file_name`.
    fn write_file(
        &self,
        results: &AnalysisResults,
        settings: &AnalysisSettings,
    ) -> Result<PathBuf, anyhow::Error> {
        let path = determine_file_name(settings, self.output_format());
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow::anyhow!("could not create directory {:?}: {}", dir, e))?;
        }
        let output = self.write_string(results, settings)?;
        let mut writer = open_write_maybe_gz(&path)?;
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        tracing::info!("Results written to file {}", path.display());
        Ok(path)
    }
}

/// Construct the writer for the given format.
pub fn results_writer(format: OutputFormat) -> Box<dyn ResultsWriter> {
    match format {
        OutputFormat::Html => Box::new(html::HtmlResultsWriter::default()),
        OutputFormat::Tsv => Box::new(tsv::TsvResultsWriter::default()),
        OutputFormat::Json => Box::new(json::JsonResultsWriter::default()),
    }
}
