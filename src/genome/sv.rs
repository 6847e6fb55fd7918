//! Structural variants on the genome.

use super::{bnd::BreakendSide, position::GenomePosition};
use crate::model::ConfidenceInterval;

/// A structural variant spanning a linear region of one contig.
///
/// `start` is the position of the first (padding) base and `end` the last affected base,
/// both zero-based.  The affected region is thus `[start.pos, end.pos + 1)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LinearSv {
    pub start: GenomePosition,
    pub end: GenomePosition,
    pub start_ci: ConfidenceInterval,
    pub end_ci: ConfidenceInterval,
}

/// A structural variant located at a single position, e.g., an insertion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PointSv {
    pub start: GenomePosition,
    pub start_ci: ConfidenceInterval,
}

/// A mated breakend.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BreakendSv {
    pub start: GenomePosition,
    /// Position of the mate.
    pub mate: GenomePosition,
    pub start_ci: ConfidenceInterval,
    pub mate_ci: ConfidenceInterval,
    /// Reference bases before the join.
    pub leading: String,
    /// Reference bases after the join.
    pub trailing: String,
    pub side: BreakendSide,
}

/// Structural variant kinds that can be annotated.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SvGenomeVariant {
    Deletion(LinearSv),
    MobileElementDeletion(LinearSv),
    Duplication(LinearSv),
    TandemDuplication(LinearSv),
    Insertion(PointSv),
    MobileElementInsertion(PointSv),
    Inversion(LinearSv),
    CopyNumberVariant(LinearSv),
    Breakend(BreakendSv),
    Unknown(LinearSv),
}

impl SvGenomeVariant {
    /// The start position of the variant.
    pub fn start(&self) -> &GenomePosition {
        match self {
            SvGenomeVariant::Deletion(sv)
            | SvGenomeVariant::MobileElementDeletion(sv)
            | SvGenomeVariant::Duplication(sv)
            | SvGenomeVariant::TandemDuplication(sv)
            | SvGenomeVariant::Inversion(sv)
            | SvGenomeVariant::CopyNumberVariant(sv)
            | SvGenomeVariant::Unknown(sv) => &sv.start,
            SvGenomeVariant::Insertion(sv) | SvGenomeVariant::MobileElementInsertion(sv) => {
                &sv.start
            }
            SvGenomeVariant::Breakend(sv) => &sv.start,
        }
    }

    /// Zero-based, half-open regions affected by the variant, one per breakend for BNDs.
    pub fn regions(&self) -> Vec<(u32, std::ops::Range<i32>)> {
        match self {
            SvGenomeVariant::Deletion(sv)
            | SvGenomeVariant::MobileElementDeletion(sv)
            | SvGenomeVariant::Duplication(sv)
            | SvGenomeVariant::TandemDuplication(sv)
            | SvGenomeVariant::Inversion(sv)
            | SvGenomeVariant::CopyNumberVariant(sv)
            | SvGenomeVariant::Unknown(sv) => {
                let end = std::cmp::max(sv.start.pos, sv.end.pos).saturating_add(1);
                vec![(sv.start.contig_id, sv.start.pos..end)]
            }
            SvGenomeVariant::Insertion(sv) | SvGenomeVariant::MobileElementInsertion(sv) => {
                vec![(sv.start.contig_id, sv.start.pos..sv.start.pos.saturating_add(1))]
            }
            SvGenomeVariant::Breakend(sv) => vec![
                (sv.start.contig_id, sv.start.pos..sv.start.pos.saturating_add(1)),
                (sv.mate.contig_id, sv.mate.pos..sv.mate.pos.saturating_add(1)),
            ],
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SvGenomeVariant::Unknown(_))
    }
}
