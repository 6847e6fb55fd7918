//! Container for the data of one analysed sample.

use std::path::PathBuf;

use super::variant::VariantEvaluation;

/// The sample names and variants read from a VCF file.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SampleData {
    /// Path to the VCF file, if read from a file.
    pub vcf_path: Option<PathBuf>,
    /// Names of the samples in the VCF file.
    pub sample_names: Vec<String>,
    /// The variants, one entry per alternative allele.
    pub variant_evaluations: Vec<VariantEvaluation>,
}

impl SampleData {
    /// Variants that passed all filters.
    pub fn passed_variants(&self) -> impl Iterator<Item = &VariantEvaluation> {
        self.variant_evaluations
            .iter()
            .filter(|variant| variant.passed_filters())
    }
}
