//! The `Variant` interface and its main implementation `VariantEvaluation`.

use std::collections::BTreeSet;

use crate::filter::FilterType;

use super::{
    allele::ConfidenceInterval, annotation::TranscriptAnnotation, effect::VariantEffect,
    variant_type::VariantType,
};

/// Chromosome number of chrX.
pub const CHR_X: u32 = 23;
/// Chromosome number of chrY.
pub const CHR_Y: u32 = 24;

/// Genomic coordinates of a variant.
///
/// Positions are 1-based and inclusive, as in VCF.
pub trait VariantCoordinates {
    /// Numeric contig identifier, `0` if the contig is unknown.
    fn contig_id(&self) -> u32;
    /// Contig name as given in the input.
    fn contig_name(&self) -> &str;
    /// 1-based start position.
    fn start(&self) -> i32;
    /// 1-based end position.
    fn end(&self) -> i32;
    fn start_ci(&self) -> ConfidenceInterval;
    fn end_ci(&self) -> ConfidenceInterval;
    fn reference(&self) -> &str;
    fn alternative(&self) -> &str;
    fn variant_type(&self) -> VariantType;

    /// Length of the variant on the reference.
    fn length(&self) -> i32 {
        self.end() - self.start() + 1
    }

    fn is_symbolic(&self) -> bool {
        super::allele::AllelePosition::is_symbolic(self.alternative())
    }
}

/// A variant with its annotations and quality.
pub trait Variant: VariantCoordinates {
    /// The PHRED-scaled quality, `0.0` if missing.
    fn phred_score(&self) -> f64;

    fn is_x_chromosomal(&self) -> bool {
        self.contig_id() == CHR_X
    }

    fn is_y_chromosomal(&self) -> bool {
        self.contig_id() == CHR_Y
    }

    /// Whether the most severe effect is outside of the exome.
    fn is_off_exome(&self) -> bool {
        self.variant_effect().is_off_exome()
    }

    /// The most severe effect over all annotations.
    fn variant_effect(&self) -> VariantEffect {
        self.annotations()
            .iter()
            .map(TranscriptAnnotation::variant_effect)
            .min()
            .unwrap_or(VariantEffect::SequenceVariant)
    }

    /// Transcript annotations, most severe first.
    fn annotations(&self) -> &[TranscriptAnnotation];

    /// Symbol of the gene of the most severe annotation, `"."` if there is none.
    fn gene_symbol(&self) -> &str {
        self.annotations()
            .first()
            .and_then(|anno| anno.gene_symbol.as_deref())
            .unwrap_or(".")
    }

    /// Entrez gene identifier of the most severe annotation.
    fn entrez_gene_id(&self) -> Option<u32> {
        self.annotations().first().and_then(|anno| anno.entrez_id)
    }

    /// Genomic HGVS-like description, e.g., `chr6:g.29911092G>T`.
    fn chromosomal_variant(&self) -> String {
        let chrom = if self.contig_name().starts_with("chr") {
            self.contig_name().to_string()
        } else {
            format!("chr{}", self.contig_name())
        };
        let (start, reference, alternative) = (self.start(), self.reference(), self.alternative());

        if self.variant_type().is_structural() {
            let suffix = match self.variant_type().base_type() {
                VariantType::Del => String::from("del"),
                VariantType::Dup => String::from("dup"),
                VariantType::Inv => String::from("inv"),
                _ => alternative.to_string(),
            };
            return format!("{}:g.{}_{}{}", chrom, start, self.end(), suffix);
        }

        let common = reference
            .bytes()
            .zip(alternative.bytes())
            .take_while(|(r, a)| r == a)
            .count();
        let del = &reference[common..];
        let ins = &alternative[common..];
        let first = start.saturating_add(common as i32);
        match (del.len(), ins.len()) {
            (1, 1) => format!("{}:g.{}{}>{}", chrom, first, del, ins),
            (0, _) => format!("{}:g.{}_{}ins{}", chrom, first - 1, first, ins),
            (1, 0) => format!("{}:g.{}del", chrom, first),
            (n, 0) => format!("{}:g.{}_{}del", chrom, first, first + n as i32 - 1),
            (1, _) => format!("{}:g.{}delins{}", chrom, first, ins),
            (n, _) => format!("{}:g.{}_{}delins{}", chrom, first, first + n as i32 - 1, ins),
        }
    }
}

/// A variant of the analysed sample together with annotations and filter results.
#[derive(Debug, Clone, PartialEq, derive_builder::Builder, serde::Serialize, serde::Deserialize)]
#[builder(pattern = "owned")]
pub struct VariantEvaluation {
    #[builder(default)]
    pub contig_id: u32,
    pub contig_name: String,
    pub start: i32,
    pub end: i32,
    #[builder(default)]
    pub start_ci: ConfidenceInterval,
    #[builder(default)]
    pub end_ci: ConfidenceInterval,
    pub reference: String,
    pub alternative: String,
    pub variant_type: VariantType,
    #[builder(default)]
    pub quality: f64,
    #[builder(default)]
    pub annotations: Vec<TranscriptAnnotation>,
    /// Filters that the variant passed.
    #[builder(default)]
    pub passed_filters: BTreeSet<FilterType>,
    /// Filters that the variant failed.
    #[builder(default)]
    pub failed_filters: BTreeSet<FilterType>,
}

impl VariantEvaluation {
    /// Record the result of running a filter.
    pub fn add_filter_result(&mut self, filter_type: FilterType, passed: bool) {
        if passed {
            self.passed_filters.insert(filter_type);
        } else {
            self.failed_filters.insert(filter_type);
        }
    }

    /// Whether the variant passed all filters that were run on it.
    pub fn passed_filters(&self) -> bool {
        self.failed_filters.is_empty()
    }
}

impl VariantCoordinates for VariantEvaluation {
    fn contig_id(&self) -> u32 {
        self.contig_id
    }

    fn contig_name(&self) -> &str {
        &self.contig_name
    }

    fn start(&self) -> i32 {
        self.start
    }

    fn end(&self) -> i32 {
        self.end
    }

    fn start_ci(&self) -> ConfidenceInterval {
        self.start_ci
    }

    fn end_ci(&self) -> ConfidenceInterval {
        self.end_ci
    }

    fn reference(&self) -> &str {
        &self.reference
    }

    fn alternative(&self) -> &str {
        &self.alternative
    }

    fn variant_type(&self) -> VariantType {
        self.variant_type
    }
}

impl Variant for VariantEvaluation {
    fn phred_score(&self) -> f64 {
        self.quality
    }

    fn annotations(&self) -> &[TranscriptAnnotation] {
        &self.annotations
    }
}
