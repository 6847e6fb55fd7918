//! Variant effects as Sequence Ontology terms and their putative impact.

use parse_display::{Display, FromStr};
use strum::IntoEnumIterator;

/// Putative impact level.
#[derive(
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Display,
    FromStr,
    serde::Deserialize,
    serde::Serialize,
    strum::EnumIter,
    utoipa::ToSchema,
)]
#[display(style = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PutativeImpact {
    High,
    Moderate,
    Low,
    Modifier,
}

/// Effect of a variant on a transcript or on the genome.
///
/// The order of the variants is the order of decreasing severity, such that sorting a list
/// of effects puts the most severe one first.
#[derive(
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    Display,
    FromStr,
    serde::Deserialize,
    serde::Serialize,
    strum::EnumIter,
    utoipa::ToSchema,
)]
#[display(style = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VariantEffect {
    // high impact
    TranscriptAblation,
    TranscriptAmplification,
    ExonLossVariant,
    FrameshiftVariant,
    StopGained,
    StopLost,
    StartLost,
    SpliceAcceptorVariant,
    SpliceDonorVariant,
    // moderate impact
    DisruptiveInframeDeletion,
    DisruptiveInframeInsertion,
    ConservativeInframeDeletion,
    ConservativeInframeInsertion,
    MissenseVariant,
    FeatureTruncation,
    FeatureElongation,
    Inversion,
    Translocation,
    CopyNumberChange,
    // low impact
    SpliceRegionVariant,
    StopRetainedVariant,
    SynonymousVariant,
    // modifier
    CodingSequenceVariant,
    #[display("5_prime_UTR_variant")]
    #[serde(rename = "5_prime_UTR_variant")]
    FivePrimeUtrVariant,
    #[display("3_prime_UTR_variant")]
    #[serde(rename = "3_prime_UTR_variant")]
    ThreePrimeUtrVariant,
    ExonVariant,
    NonCodingTranscriptExonVariant,
    IntronVariant,
    NonCodingTranscriptIntronVariant,
    UpstreamGeneVariant,
    DownstreamGeneVariant,
    IntergenicVariant,
    StructuralVariant,
    SequenceVariant,
}

impl From<VariantEffect> for PutativeImpact {
    fn from(val: VariantEffect) -> Self {
        use VariantEffect::*;
        match val {
            TranscriptAblation
            | TranscriptAmplification
            | ExonLossVariant
            | FrameshiftVariant
            | StopGained
            | StopLost
            | StartLost
            | SpliceAcceptorVariant
            | SpliceDonorVariant => PutativeImpact::High,
            DisruptiveInframeDeletion
            | DisruptiveInframeInsertion
            | ConservativeInframeDeletion
            | ConservativeInframeInsertion
            | MissenseVariant
            | FeatureTruncation
            | FeatureElongation
            | Inversion
            | Translocation
            | CopyNumberChange => PutativeImpact::Moderate,
            SpliceRegionVariant | StopRetainedVariant | SynonymousVariant => PutativeImpact::Low,
            CodingSequenceVariant
            | FivePrimeUtrVariant
            | ThreePrimeUtrVariant
            | ExonVariant
            | NonCodingTranscriptExonVariant
            | IntronVariant
            | NonCodingTranscriptIntronVariant
            | UpstreamGeneVariant
            | DownstreamGeneVariant
            | IntergenicVariant
            | StructuralVariant
            | SequenceVariant => PutativeImpact::Modifier,
        }
    }
}

impl VariantEffect {
    /// Return vector of all values of `VariantEffect`.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    pub fn impact(&self) -> PutativeImpact {
        PutativeImpact::from(*self)
    }

    /// Whether the effect lies outside of exons and splice regions.
    pub fn is_off_exome(&self) -> bool {
        matches!(
            self,
            VariantEffect::IntergenicVariant
                | VariantEffect::UpstreamGeneVariant
                | VariantEffect::DownstreamGeneVariant
                | VariantEffect::IntronVariant
                | VariantEffect::NonCodingTranscriptIntronVariant
        )
    }
}
