//! Annotation of a variant with respect to a transcript.

use parse_display::{Display, FromStr};

use super::effect::VariantEffect;

/// Encode exon/intron rank.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    FromStr,
    Default,
    serde::Deserialize,
    serde::Serialize,
    utoipa::ToSchema,
)]
#[display("{ord}/{total}")]
pub struct Rank {
    pub ord: i32,
    pub total: i32,
}

/// Annotation of one allele on one transcript.
///
/// Intergenic variants are annotated with a single record without transcript.
#[serde_with::skip_serializing_none]
#[derive(
    Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, utoipa::ToSchema,
)]
pub struct TranscriptAnnotation {
    /// Effects on the transcript, most severe first.
    pub effects: Vec<VariantEffect>,
    /// Transcript accession, e.g., `NM_007294.3`.
    pub accession: Option<String>,
    /// Gene symbol, e.g., `BRCA1`.
    pub gene_symbol: Option<String>,
    /// HGNC identifier, e.g., `HGNC:1100`.
    pub hgnc_id: Option<String>,
    /// NCBI Entrez gene identifier.
    pub entrez_id: Option<u32>,
    /// Exon or intron rank of the variant.
    pub rank: Option<Rank>,
    /// HGVS notation on the transcript, `c.` or `n.`.
    pub hgvs_cdna: Option<String>,
    /// HGVS notation on the protein.
    pub hgvs_protein: Option<String>,
    /// Distance to the transcript for upstream/downstream variants.
    pub distance: Option<i32>,
}

impl TranscriptAnnotation {
    /// The most severe effect of the annotation.
    pub fn variant_effect(&self) -> VariantEffect {
        self.effects
            .iter()
            .min()
            .copied()
            .unwrap_or(VariantEffect::SequenceVariant)
    }

    /// Construct annotation for a variant not near any transcript.
    pub fn intergenic() -> Self {
        Self {
            effects: vec![VariantEffect::IntergenicVariant],
            ..Default::default()
        }
    }
}
