//! Annotation of variants given in VCF coordinates.

use std::sync::Arc;

use super::{
    bnd::parse_breakend_alt,
    contig::{ReferenceDictionary, UNKNOWN_CHROMOSOME},
    csq,
    position::GenomePosition,
    sv::{BreakendSv, LinearSv, PointSv, SvGenomeVariant},
    sv_csq,
    txs::TranscriptProvider,
    variant::GenomeVariant,
};
use crate::{
    common::GenomeRelease,
    model::{AllelePosition, ConfidenceInterval, TranscriptAnnotation, VariantEffect, VariantType},
};

/// Annotations of a small variant.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariantAnnotations {
    /// The normalized variant, `None` if it could not be built.
    pub variant: Option<GenomeVariant>,
    /// Transcript annotations, most severe first.
    pub annotations: Vec<TranscriptAnnotation>,
}

/// Annotations of a structural variant.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SvAnnotations {
    /// The structural variant, `None` if it could not be built.
    pub variant: Option<SvGenomeVariant>,
    /// Transcript annotations, most severe first.
    pub annotations: Vec<TranscriptAnnotation>,
}

impl VariantAnnotations {
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// The most severe effect, `None` if there are no annotations.
    pub fn highest_impact_effect(&self) -> Option<VariantEffect> {
        self.annotations
            .iter()
            .map(TranscriptAnnotation::variant_effect)
            .min()
    }
}

impl SvAnnotations {
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// The most severe effect, `None` if there are no annotations.
    pub fn highest_impact_effect(&self) -> Option<VariantEffect> {
        self.annotations
            .iter()
            .map(TranscriptAnnotation::variant_effect)
            .min()
    }
}

/// Annotation of small and structural variants on the transcripts of one genome release.
///
/// Coordinates are given 1-based as in VCF and translated to the 0-based coordinates used
/// internally.  Annotation never fails; problems yield empty annotation lists.
#[derive(Debug, Clone)]
pub struct AnnotationService {
    provider: Arc<TranscriptProvider>,
    seqvars_predictor: csq::ConsequencePredictor,
    strucvars_predictor: sv_csq::ConsequencePredictor,
}

impl AnnotationService {
    pub fn new(provider: Arc<TranscriptProvider>) -> Self {
        Self {
            seqvars_predictor: csq::ConsequencePredictor::new(provider.clone()),
            strucvars_predictor: sv_csq::ConsequencePredictor::new(provider.clone()),
            provider,
        }
    }

    pub fn reference_dictionary(&self) -> &ReferenceDictionary {
        self.provider.reference_dictionary()
    }

    pub fn genome_release(&self) -> GenomeRelease {
        self.provider.genome_release()
    }

    /// Version of the transcript data, if set.
    pub fn data_version(&self) -> Option<String> {
        self.seqvars_predictor.data_version()
    }

    pub fn transcript_count(&self) -> usize {
        self.provider.transcript_count()
    }

    fn genome_position(&self, contig: &str, pos: i32) -> GenomePosition {
        GenomePosition::from_one_based(self.reference_dictionary(), contig, pos)
    }

    /// Whether the zero-based, half-open range lies on the contig.
    ///
    /// Ranges on unknown contigs are accepted, there is nothing to annotate on them.
    fn is_on_contig(&self, contig_id: u32, range: &std::ops::Range<i32>) -> bool {
        if contig_id == UNKNOWN_CHROMOSOME {
            return true;
        }
        match self.reference_dictionary().contig_length(contig_id) {
            Some(length) => {
                range.start >= 0 && usize::try_from(range.end).is_ok_and(|end| end <= length)
            }
            None => false,
        }
    }

    /// Annotate a small variant given by 1-based VCF position and alleles.
    pub fn annotate_variant(
        &self,
        contig: &str,
        pos: i32,
        reference: &str,
        alternative: &str,
    ) -> VariantAnnotations {
        let variant = GenomeVariant::new(self.genome_position(contig, pos), reference, alternative);
        let empty = |variant: GenomeVariant| VariantAnnotations {
            variant: Some(variant),
            annotations: Vec::new(),
        };

        if variant.contig_id() == UNKNOWN_CHROMOSOME {
            tracing::trace!("Skipping variant on unknown contig {}", contig);
            return empty(variant);
        }
        let range = variant.pos()..std::cmp::max(variant.end(), variant.pos().saturating_add(1));
        if pos < 1 || !self.is_on_contig(variant.contig_id(), &range) {
            tracing::debug!(
                "Variant {}-{}-{}-{} is outside of the contig",
                contig,
                pos,
                reference,
                alternative
            );
            return empty(variant);
        }

        match self.seqvars_predictor.predict(&variant) {
            Ok(annotations) => VariantAnnotations {
                variant: Some(variant),
                annotations,
            },
            Err(e) => {
                tracing::debug!(
                    "Unable to annotate variant {}-{}-{}-{}: {}",
                    contig,
                    pos,
                    reference,
                    alternative,
                    e
                );
                empty(variant)
            }
        }
    }

    /// Annotate a structural variant given by 1-based VCF positions.
    #[allow(clippy::too_many_arguments)]
    pub fn annotate_structural_variant(
        &self,
        variant_type: VariantType,
        alt: &str,
        start_contig: &str,
        start_pos: i32,
        start_ci: ConfidenceInterval,
        end_contig: &str,
        end_pos: i32,
        end_ci: ConfidenceInterval,
    ) -> SvAnnotations {
        let start = self.genome_position(start_contig, start_pos);
        let end = self.genome_position(end_contig, end_pos);
        let variant = self.build_sv_genome_variant(variant_type, alt, start, start_ci, end, end_ci);
        let empty = |variant: SvGenomeVariant| SvAnnotations {
            variant: Some(variant),
            annotations: Vec::new(),
        };

        if !AllelePosition::is_symbolic(alt) {
            tracing::warn!(
                "Allele {} of {} variant at {}:{} is not symbolic, not annotating as structural variant",
                alt,
                variant_type,
                start_contig,
                start_pos
            );
            return empty(variant);
        }
        if variant.start().is_unknown_contig() {
            tracing::trace!("Skipping variant on unknown contig {}", start_contig);
            return empty(variant);
        }
        if start_pos < 1
            || variant
                .regions()
                .iter()
                .any(|(contig_id, range)| !self.is_on_contig(*contig_id, range))
        {
            tracing::debug!(
                "Variant {}-{}-{}-{} is outside of the contig",
                start_contig,
                start_pos,
                end_pos,
                alt
            );
            return empty(variant);
        }

        match self.strucvars_predictor.predict(&variant) {
            Ok(annotations) => SvAnnotations {
                variant: Some(variant),
                annotations,
            },
            Err(e) => {
                tracing::debug!(
                    "Unable to annotate variant {}-{}-{}-{}: {}",
                    start_contig,
                    start_pos,
                    end_pos,
                    alt,
                    e
                );
                empty(variant)
            }
        }
    }

    /// Build the structural variant by dispatching on the sub type.
    fn build_sv_genome_variant(
        &self,
        variant_type: VariantType,
        alt: &str,
        start: GenomePosition,
        start_ci: ConfidenceInterval,
        end: GenomePosition,
        end_ci: ConfidenceInterval,
    ) -> SvGenomeVariant {
        let linear = |start: GenomePosition, end: GenomePosition| LinearSv {
            start,
            end,
            start_ci,
            end_ci,
        };
        match variant_type.sub_type() {
            VariantType::Del => SvGenomeVariant::Deletion(linear(start, end)),
            VariantType::DelMe => SvGenomeVariant::MobileElementDeletion(linear(start, end)),
            VariantType::Dup => SvGenomeVariant::Duplication(linear(start, end)),
            VariantType::DupTandem => SvGenomeVariant::TandemDuplication(linear(start, end)),
            VariantType::Ins => SvGenomeVariant::Insertion(PointSv { start, start_ci }),
            VariantType::InsMe => {
                SvGenomeVariant::MobileElementInsertion(PointSv { start, start_ci })
            }
            VariantType::Inv => SvGenomeVariant::Inversion(linear(start, end)),
            VariantType::Cnv => SvGenomeVariant::CopyNumberVariant(linear(start, end)),
            VariantType::Bnd => self.build_breakend(alt, start, start_ci, end, end_ci),
            _ => SvGenomeVariant::Unknown(linear(start, end)),
        }
    }

    fn build_breakend(
        &self,
        alt: &str,
        start: GenomePosition,
        start_ci: ConfidenceInterval,
        end: GenomePosition,
        end_ci: ConfidenceInterval,
    ) -> SvGenomeVariant {
        match parse_breakend_alt(alt) {
            Some(bnd) => SvGenomeVariant::Breakend(BreakendSv {
                start,
                mate: self.genome_position(&bnd.mate_contig, bnd.mate_pos),
                start_ci,
                mate_ci: end_ci,
                leading: bnd.leading,
                trailing: bnd.trailing,
                side: bnd.side,
            }),
            None => {
                tracing::error!("Unable to parse breakend allele {}", alt);
                SvGenomeVariant::Unknown(LinearSv {
                    start,
                    end,
                    start_ci,
                    end_ci,
                })
            }
        }
    }
}
