//! Consequence prediction for structural variants.

use std::sync::Arc;

use indexmap::IndexMap;

use super::{
    csq::{sort_annotations, PADDING},
    position::Strand,
    sv::SvGenomeVariant,
    txs::{Transcript, TranscriptProvider},
};
use crate::model::{TranscriptAnnotation, VariantEffect};

/// Splice region bases into the exon.
const SPLICE_REGION_EXONIC: i32 = 3;
/// Splice region bases into the intron.
const SPLICE_REGION_INTRONIC: i32 = 8;

/// Region of a transcript that is affected by a structural variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum TxRegionKind {
    /// Affects the full transcript.
    Transcript,
    Exon,
    SpliceRegion,
    Intron,
    Upstream,
    Downstream,
}

/// Zero-based, half-open region of a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TxRegion {
    begin: i32,
    end: i32,
    kind: TxRegionKind,
}

/// Return list of half-open intervals for a given transcript.
fn tx_regions(tx: &Transcript) -> Vec<TxRegion> {
    let mut result = Vec::new();
    let (tx_start, tx_end) = (tx.tx_start(), tx.tx_end());
    let (left_flank, right_flank) = match tx.strand {
        Strand::Fwd => (TxRegionKind::Upstream, TxRegionKind::Downstream),
        Strand::Rev => (TxRegionKind::Downstream, TxRegionKind::Upstream),
    };

    let mut prev_end = None;
    for exon in &tx.exons {
        if exon.start == tx_start {
            result.push(TxRegion {
                begin: exon.start - PADDING,
                end: exon.start,
                kind: left_flank,
            });
        } else {
            result.push(TxRegion {
                begin: exon.start - SPLICE_REGION_INTRONIC,
                end: exon.start + SPLICE_REGION_EXONIC,
                kind: TxRegionKind::SpliceRegion,
            });
        }

        if exon.end == tx_end {
            result.push(TxRegion {
                begin: exon.end,
                end: exon.end + PADDING,
                kind: right_flank,
            });
        } else {
            result.push(TxRegion {
                begin: exon.end - SPLICE_REGION_EXONIC,
                end: exon.end + SPLICE_REGION_INTRONIC,
                kind: TxRegionKind::SpliceRegion,
            });
        }

        result.push(TxRegion {
            begin: exon.start,
            end: exon.end,
            kind: TxRegionKind::Exon,
        });

        if let Some(prev_end) = prev_end {
            result.push(TxRegion {
                begin: prev_end,
                end: exon.start,
                kind: TxRegionKind::Intron,
            });
        }
        prev_end = Some(exon.end);
    }

    result
}

/// Region kinds of the transcript overlapping the zero-based, half-open range.
fn tx_region_kinds(tx: &Transcript, range: &std::ops::Range<i32>) -> Vec<TxRegionKind> {
    if range.start <= tx.tx_start() && range.end >= tx.tx_end() {
        return vec![TxRegionKind::Transcript];
    }
    let mut result = tx_regions(tx)
        .into_iter()
        .filter(|region| range.start < region.end && region.begin < range.end)
        .map(|region| region.kind)
        .collect::<Vec<_>>();
    result.sort();
    result.dedup();
    result
}

/// Map region kind to effects depending on the kind of the structural variant.
fn region_effects(sv: &SvGenomeVariant, kind: TxRegionKind) -> Vec<VariantEffect> {
    use SvGenomeVariant as Sv;
    use TxRegionKind as Region;

    match (kind, sv) {
        (Region::Upstream, _) => vec![VariantEffect::UpstreamGeneVariant],
        (Region::Downstream, _) => vec![VariantEffect::DownstreamGeneVariant],
        (Region::SpliceRegion, Sv::Breakend(_)) => vec![
            VariantEffect::Translocation,
            VariantEffect::SpliceRegionVariant,
        ],
        (Region::SpliceRegion, Sv::Inversion(_)) => {
            vec![VariantEffect::Inversion, VariantEffect::SpliceRegionVariant]
        }
        (Region::SpliceRegion, _) => vec![VariantEffect::SpliceRegionVariant],
        (Region::Intron, Sv::Breakend(_)) => {
            vec![VariantEffect::Translocation, VariantEffect::IntronVariant]
        }
        (Region::Intron, Sv::Inversion(_)) => {
            vec![VariantEffect::Inversion, VariantEffect::IntronVariant]
        }
        (Region::Intron, _) => vec![VariantEffect::IntronVariant],
        (Region::Transcript, Sv::Deletion(_) | Sv::MobileElementDeletion(_)) => {
            vec![VariantEffect::TranscriptAblation]
        }
        (Region::Transcript, Sv::Duplication(_) | Sv::TandemDuplication(_)) => {
            vec![VariantEffect::TranscriptAmplification]
        }
        (Region::Exon, Sv::Deletion(_) | Sv::MobileElementDeletion(_)) => {
            vec![VariantEffect::ExonLossVariant]
        }
        (
            Region::Exon | Region::Transcript,
            Sv::Duplication(_)
            | Sv::TandemDuplication(_)
            | Sv::Insertion(_)
            | Sv::MobileElementInsertion(_),
        ) => vec![VariantEffect::FeatureElongation],
        (Region::Exon | Region::Transcript, Sv::Inversion(_)) => vec![VariantEffect::Inversion],
        (Region::Exon | Region::Transcript, Sv::CopyNumberVariant(_)) => {
            vec![VariantEffect::CopyNumberChange]
        }
        (Region::Exon | Region::Transcript, Sv::Breakend(_)) => vec![
            VariantEffect::Translocation,
            VariantEffect::FeatureTruncation,
        ],
        (Region::Exon | Region::Transcript, Sv::Unknown(_)) => {
            vec![VariantEffect::StructuralVariant]
        }
    }
}

/// Distance of the range to the transcript, `None` if overlapping.
fn distance(tx: &Transcript, range: &std::ops::Range<i32>) -> Option<i32> {
    if range.end <= tx.tx_start() {
        Some(tx.tx_start() - range.end + 1)
    } else if range.start >= tx.tx_end() {
        Some(range.start - tx.tx_end() + 1)
    } else {
        None
    }
}

/// Predict consequences of structural variants on transcripts.
#[derive(Debug, Clone)]
pub struct ConsequencePredictor {
    provider: Arc<TranscriptProvider>,
}

impl ConsequencePredictor {
    pub fn new(provider: Arc<TranscriptProvider>) -> Self {
        Self { provider }
    }

    /// Compute effects of `sv` on all transcripts within `PADDING`.
    ///
    /// Breakends are annotated at both of their positions.  Returns a single intergenic
    /// annotation if no transcript is affected.
    pub fn predict(&self, sv: &SvGenomeVariant) -> Result<Vec<TranscriptAnnotation>, anyhow::Error> {
        let mut by_tx: IndexMap<String, TranscriptAnnotation> = IndexMap::new();

        for (contig_id, range) in sv.regions() {
            if range.start >= range.end {
                anyhow::bail!("invalid structural variant region {:?}", range);
            }
            let query = range.start.saturating_sub(PADDING)..range.end.saturating_add(PADDING);
            for tx in self.provider.get_tx_for_region(contig_id, query) {
                let effects = tx_region_kinds(tx, &range)
                    .into_iter()
                    .flat_map(|kind| region_effects(sv, kind))
                    .collect::<Vec<_>>();
                if effects.is_empty() {
                    continue;
                }

                let anno = by_tx
                    .entry(tx.id.clone())
                    .or_insert_with(|| TranscriptAnnotation {
                        accession: Some(tx.id.clone()),
                        gene_symbol: Some(tx.gene_symbol.clone()),
                        hgnc_id: tx.hgnc_id.clone(),
                        entrez_id: tx.entrez_id,
                        ..Default::default()
                    });
                anno.effects.extend(effects);
                anno.effects.sort();
                anno.effects.dedup();
                if let Some(dist) = distance(tx, &range) {
                    anno.distance = Some(anno.distance.map_or(dist, |prev| prev.min(dist)));
                }
            }
        }

        let mut result = by_tx.into_values().collect::<Vec<_>>();
        if result.is_empty() {
            let mut anno = TranscriptAnnotation::intergenic();
            anno.effects.push(VariantEffect::StructuralVariant);
            result.push(anno);
        }
        sort_annotations(&mut result);
        Ok(result)
    }

    /// Return data version string (if set).
    pub fn data_version(&self) -> Option<String> {
        self.provider.data_version()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        genome::{
            bnd::BreakendSide,
            position::GenomePosition,
            sv::{BreakendSv, LinearSv, PointSv},
        },
        model::ConfidenceInterval,
    };

    fn predictor() -> Result<ConsequencePredictor, anyhow::Error> {
        let provider = TranscriptProvider::load("tests/data/txs/txs.json")?;
        Ok(ConsequencePredictor::new(Arc::new(provider)))
    }

    fn linear(predictor: &ConsequencePredictor, start: i32, end: i32) -> LinearSv {
        let dict = predictor.provider.reference_dictionary();
        LinearSv {
            start: GenomePosition::from_one_based(dict, "1", start),
            end: GenomePosition::from_one_based(dict, "1", end),
            start_ci: ConfidenceInterval::precise(),
            end_ci: ConfidenceInterval::precise(),
        }
    }

    fn effects(annos: &[TranscriptAnnotation]) -> Vec<(Option<String>, Vec<VariantEffect>)> {
        annos
            .iter()
            .map(|anno| (anno.accession.clone(), anno.effects.clone()))
            .collect()
    }

    #[rstest::rstest]
    #[case("del", 500, 5000, VariantEffect::TranscriptAblation)]
    #[case("del", 1050, 1060, VariantEffect::ExonLossVariant)]
    #[case("dup", 500, 5000, VariantEffect::TranscriptAmplification)]
    #[case("dup", 2050, 2060, VariantEffect::FeatureElongation)]
    #[case("inv", 1500, 1600, VariantEffect::Inversion)]
    #[case("inv", 1050, 2050, VariantEffect::Inversion)]
    #[case("cnv", 2050, 2060, VariantEffect::CopyNumberChange)]
    fn predict_linear(
        #[case] kind: &str,
        #[case] start: i32,
        #[case] end: i32,
        #[case] expected: VariantEffect,
    ) -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let sv = linear(&predictor, start, end);
        let sv = match kind {
            "del" => SvGenomeVariant::Deletion(sv),
            "dup" => SvGenomeVariant::Duplication(sv),
            "inv" => SvGenomeVariant::Inversion(sv),
            _ => SvGenomeVariant::CopyNumberVariant(sv),
        };
        let annos = predictor.predict(&sv)?;
        assert_eq!(annos.len(), 1);
        assert_eq!(annos[0].accession.as_deref(), Some("NM_TEST1.1"));
        assert_eq!(annos[0].variant_effect(), expected);

        Ok(())
    }

    #[test]
    fn predict_intronic_inversion() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let sv = SvGenomeVariant::Inversion(linear(&predictor, 1500, 1600));
        let annos = predictor.predict(&sv)?;
        assert_eq!(
            effects(&annos),
            vec![(
                Some(String::from("NM_TEST1.1")),
                vec![VariantEffect::Inversion, VariantEffect::IntronVariant]
            )]
        );

        Ok(())
    }

    #[test]
    fn predict_upstream_deletion() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let sv = SvGenomeVariant::Deletion(linear(&predictor, 400, 600));
        let annos = predictor.predict(&sv)?;
        assert_eq!(
            effects(&annos),
            vec![(
                Some(String::from("NM_TEST1.1")),
                vec![VariantEffect::UpstreamGeneVariant]
            )]
        );
        assert_eq!(annos[0].distance, Some(401));

        Ok(())
    }

    #[test]
    fn predict_insertion() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let dict = predictor.provider.reference_dictionary();
        let sv = SvGenomeVariant::MobileElementInsertion(PointSv {
            start: GenomePosition::from_one_based(dict, "1", 1060),
            start_ci: ConfidenceInterval::precise(),
        });
        let annos = predictor.predict(&sv)?;
        assert_eq!(
            effects(&annos),
            vec![(
                Some(String::from("NM_TEST1.1")),
                vec![VariantEffect::FeatureElongation]
            )]
        );

        Ok(())
    }

    #[test]
    fn predict_breakend_both_sides() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let dict = predictor.provider.reference_dictionary();
        let sv = SvGenomeVariant::Breakend(BreakendSv {
            start: GenomePosition::from_one_based(dict, "1", 1500),
            mate: GenomePosition::from_one_based(dict, "1", 21050),
            start_ci: ConfidenceInterval::precise(),
            mate_ci: ConfidenceInterval::precise(),
            leading: String::from("G"),
            trailing: String::new(),
            side: BreakendSide::LeftEnd,
        });
        let annos = predictor.predict(&sv)?;
        assert_eq!(
            effects(&annos),
            vec![
                (
                    Some(String::from("NR_TEST2.1")),
                    vec![
                        VariantEffect::FeatureTruncation,
                        VariantEffect::Translocation
                    ]
                ),
                (
                    Some(String::from("NM_TEST1.1")),
                    vec![VariantEffect::Translocation, VariantEffect::IntronVariant]
                ),
            ]
        );

        Ok(())
    }

    #[test]
    fn predict_intergenic() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let sv = SvGenomeVariant::Deletion(linear(&predictor, 12000, 12100));
        let annos = predictor.predict(&sv)?;
        assert_eq!(
            effects(&annos),
            vec![(
                None,
                vec![
                    VariantEffect::IntergenicVariant,
                    VariantEffect::StructuralVariant
                ]
            )]
        );

        Ok(())
    }
}
