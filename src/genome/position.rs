//! Positions on the genome.
//!
//! CAUTION: positions are stored zero-based, counter to the VCF convention.

use super::contig::{ReferenceDictionary, UNKNOWN_CHROMOSOME};

/// Enumeration for the two strands of the genome.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Strand {
    #[default]
    Fwd,
    Rev,
}

/// Coordinate system of a position given on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionType {
    OneBased,
    ZeroBased,
}

/// Zero-based position on a contig.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GenomePosition {
    /// Numeric contig identifier, `UNKNOWN_CHROMOSOME` for unknown contigs.
    pub contig_id: u32,
    /// Primary name of the contig, or the name given on input if unknown.
    pub contig_name: String,
    pub strand: Strand,
    /// 0-based position.
    pub pos: i32,
}

impl GenomePosition {
    /// Construct from a position in the given coordinate system.
    pub fn new(
        dict: &ReferenceDictionary,
        strand: Strand,
        contig_id: u32,
        pos: i32,
        position_type: PositionType,
    ) -> Self {
        let contig_name = dict.contig_name(contig_id).unwrap_or_default().to_string();
        Self {
            contig_id,
            contig_name,
            strand,
            pos: match position_type {
                PositionType::OneBased => pos.saturating_sub(1),
                PositionType::ZeroBased => pos,
            },
        }
    }

    /// Construct from a contig name and a 1-based position on the forward strand.
    pub fn from_one_based(dict: &ReferenceDictionary, contig: &str, pos: i32) -> Self {
        let contig_id = dict.contig_id(contig);
        let mut result = Self::new(dict, Strand::Fwd, contig_id, pos, PositionType::OneBased);
        if contig_id == UNKNOWN_CHROMOSOME {
            result.contig_name = contig.to_string();
        }
        result
    }

    pub fn is_unknown_contig(&self) -> bool {
        self.contig_id == UNKNOWN_CHROMOSOME
    }

    /// The 1-based position.
    pub fn one_based_pos(&self) -> i32 {
        self.pos.saturating_add(1)
    }
}

impl std::fmt::Display for GenomePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.contig_name, self.one_based_pos())
    }
}
