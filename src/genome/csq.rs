//! Consequence prediction for small variants.

use std::sync::Arc;

use super::{
    position::Strand,
    seq::{aa3, aa3_seq, revcomp, translate},
    txs::{Exon, Transcript, TranscriptProvider},
    variant::GenomeVariant,
};
use crate::model::{Rank, TranscriptAnnotation, VariantEffect};

/// Length of the upstream/downstream region.
pub const PADDING: i32 = 5_000;

/// Number of intronic bases of the splice donor and acceptor sites.
const SPLICE_SITE: i32 = 2;
/// Exonic bases of the splice region.
const SPLICE_REGION_EXONIC: i32 = 3;
/// Intronic bases of the splice region.
const SPLICE_REGION_INTRONIC: i32 = 8;

/// Position in `c.`/`n.` coordinates: 1-based transcript position and intronic offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TxPos {
    base: i32,
    offset: i32,
}

/// Maps genomic positions to transcript positions.
struct TxMapper<'a> {
    tx: &'a Transcript,
    /// Exons in transcript order with the number of transcript bases before them.
    exons: Vec<(Exon, i32)>,
    /// 1-based transcript positions of the first and last CDS base.
    cds: Option<(i32, i32)>,
}

impl<'a> TxMapper<'a> {
    fn new(tx: &'a Transcript) -> Self {
        let mut ordered = tx.exons.clone();
        if tx.strand == Strand::Rev {
            ordered.reverse();
        }
        let mut offset = 0;
        let exons = ordered
            .into_iter()
            .map(|exon| {
                let result = (exon, offset);
                offset += exon.len();
                result
            })
            .collect();

        let mut result = Self {
            tx,
            exons,
            cds: None,
        };
        if let (true, Some(cds_start), Some(cds_end)) = (tx.is_coding(), tx.cds_start, tx.cds_end) {
            let (first, last) = match tx.strand {
                Strand::Fwd => (cds_start, cds_end - 1),
                Strand::Rev => (cds_end - 1, cds_start),
            };
            match (result.exon_pos(first), result.exon_pos(last)) {
                (Some(first), Some(last)) => result.cds = Some((first, last)),
                _ => tracing::debug!("CDS of {} does not start and end in exons", &tx.id),
            }
        }
        result
    }

    /// 1-based transcript position of an exonic genomic position.
    fn exon_pos(&self, pos: i32) -> Option<i32> {
        self.exons
            .iter()
            .find(|(exon, _)| exon.contains(pos))
            .map(|(exon, offset)| match self.tx.strand {
                Strand::Fwd => offset + pos - exon.start + 1,
                Strand::Rev => offset + exon.end - pos,
            })
    }

    /// Transcript position of any genomic position.
    fn tx_pos(&self, pos: i32) -> TxPos {
        if let Some(base) = self.exon_pos(pos) {
            return TxPos { base, offset: 0 };
        }

        let (tx_start, tx_end) = (self.tx.tx_start(), self.tx.tx_end());
        if pos < tx_start || pos >= tx_end {
            let dist = if pos < tx_start {
                tx_start - pos
            } else {
                pos - tx_end + 1
            };
            let five_prime = (pos < tx_start) == (self.tx.strand == Strand::Fwd);
            let base = if five_prime {
                1 - dist
            } else {
                self.tx.tx_len() + dist
            };
            return TxPos { base, offset: 0 };
        }

        for pair in self.exons.windows(2) {
            let ((up, up_offset), (down, down_offset)) = (pair[0], pair[1]);
            let (d_up, d_down) = match self.tx.strand {
                Strand::Fwd if up.end <= pos && pos < down.start => {
                    (pos - up.end + 1, down.start - pos)
                }
                Strand::Rev if down.end <= pos && pos < up.start => {
                    (up.start - pos, pos - down.end + 1)
                }
                _ => continue,
            };
            // Ties go to the upstream exon.
            return if d_up <= d_down {
                TxPos {
                    base: up_offset + up.len(),
                    offset: d_up,
                }
            } else {
                TxPos {
                    base: down_offset + 1,
                    offset: -d_down,
                }
            };
        }

        TxPos { base: 0, offset: 0 }
    }

    fn prefix(&self) -> &'static str {
        if self.cds.is_some() {
            "c."
        } else {
            "n."
        }
    }

    /// Format transcript position relative to the CDS if any.
    fn fmt_pos(&self, pos: TxPos) -> String {
        let tx_len = self.tx.tx_len();
        let base = match self.cds {
            Some((cds_first, _)) if pos.base < cds_first => format!("-{}", cds_first - pos.base),
            Some((_, cds_last)) if pos.base > cds_last => format!("*{}", pos.base - cds_last),
            Some((cds_first, _)) => format!("{}", pos.base - cds_first + 1),
            None if pos.base < 1 => format!("-{}", 1 - pos.base),
            None if pos.base > tx_len => format!("*{}", pos.base - tx_len),
            None => format!("{}", pos.base),
        };
        match pos.offset {
            0 => base,
            offset if offset > 0 => format!("{}+{}", base, offset),
            offset => format!("{}{}", base, offset),
        }
    }

    /// Exon or intron rank of the zero-based, half-open region.
    fn rank(&self, start: i32, end: i32) -> Option<Rank> {
        let total = self.exons.len() as i32;
        if let Some(idx) = self
            .exons
            .iter()
            .position(|(exon, _)| start < exon.end && exon.start < end)
        {
            return Some(Rank {
                ord: idx as i32 + 1,
                total,
            });
        }
        self.exons
            .windows(2)
            .position(|pair| {
                let (intron_start, intron_end) = match self.tx.strand {
                    Strand::Fwd => (pair[0].0.end, pair[1].0.start),
                    Strand::Rev => (pair[1].0.end, pair[0].0.start),
                };
                start < intron_end && intron_start < end
            })
            .map(|idx| Rank {
                ord: idx as i32 + 1,
                total: total - 1,
            })
    }

    /// Reference and alternative allele on the transcript strand.
    fn alleles(&self, var: &GenomeVariant) -> (String, String) {
        match self.tx.strand {
            Strand::Fwd => (var.reference().to_string(), var.alternative().to_string()),
            Strand::Rev => (revcomp(var.reference()), revcomp(var.alternative())),
        }
    }

    /// HGVS `c.`/`n.` description of the variant.
    fn hgvs_nucleotide(&self, var: &GenomeVariant) -> String {
        let prefix = self.prefix();
        let (reference, alternative) = self.alleles(var);
        if var.is_insertion() {
            let (left, right) = match self.tx.strand {
                Strand::Fwd => (var.pos() - 1, var.pos()),
                Strand::Rev => (var.pos(), var.pos() - 1),
            };
            return format!(
                "{}{}_{}ins{}",
                prefix,
                self.fmt_pos(self.tx_pos(left)),
                self.fmt_pos(self.tx_pos(right)),
                alternative
            );
        }

        let (first, last) = match self.tx.strand {
            Strand::Fwd => (var.pos(), var.end() - 1),
            Strand::Rev => (var.end() - 1, var.pos()),
        };
        let range = if first == last {
            self.fmt_pos(self.tx_pos(first))
        } else {
            format!(
                "{}_{}",
                self.fmt_pos(self.tx_pos(first)),
                self.fmt_pos(self.tx_pos(last))
            )
        };
        if var.is_snv() {
            format!("{}{}{}>{}", prefix, range, reference, alternative)
        } else if var.is_deletion() {
            format!("{}{}del", prefix, range)
        } else {
            format!("{}{}delins{}", prefix, range, alternative)
        }
    }
}

/// Location of a contiguous exonic variant in transcript coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxLocation {
    /// Insertion after the 1-based transcript position.
    InsertionAfter(i32),
    /// 1-based, closed range of affected transcript positions.
    Range(i32, i32),
}

/// Effects and protein change of a variant inside of the CDS.
fn cds_effects(
    mapper: &TxMapper,
    location: TxLocation,
    reference: &str,
    alternative: &str,
) -> (Vec<VariantEffect>, String) {
    let (cds_first, cds_last) = mapper.cds.unwrap_or_default();
    let cds_len = cds_last - cds_first + 1;
    let diff = alternative.len() as i32 - reference.len() as i32;

    // Variant position in CDS coordinates.
    let (c_first, c_last) = match location {
        TxLocation::InsertionAfter(k) => (k - cds_first + 1, k - cds_first + 1),
        TxLocation::Range(first, last) => (first - cds_first + 1, last - cds_first + 1),
    };
    let is_ins = matches!(location, TxLocation::InsertionAfter(_));
    let hits_start = if is_ins { c_first < 3 } else { c_first <= 3 };
    let hits_stop = if is_ins {
        c_first >= cds_len - 2
    } else {
        c_last >= cds_len - 2
    };

    // Effect on nucleotide level.
    let nucleotide_effect = if diff % 3 != 0 {
        VariantEffect::FrameshiftVariant
    } else if diff < 0 {
        if alternative.is_empty() && (c_first - 1) % 3 == 0 {
            VariantEffect::ConservativeInframeDeletion
        } else {
            VariantEffect::DisruptiveInframeDeletion
        }
    } else if diff > 0 {
        if reference.is_empty() && c_first % 3 == 0 {
            VariantEffect::ConservativeInframeInsertion
        } else {
            VariantEffect::DisruptiveInframeInsertion
        }
    } else {
        VariantEffect::CodingSequenceVariant
    };

    let Some(seq) = mapper.tx.sequence.as_ref().map(|seq| seq.to_ascii_uppercase()) else {
        let mut effects = vec![nucleotide_effect];
        if hits_start {
            effects.push(VariantEffect::StartLost);
        }
        if hits_stop {
            effects.push(VariantEffect::StopLost);
        }
        return (effects, String::from("p.?"));
    };

    // Build the alternative transcript sequence, checking the reference.
    let seq = seq.as_bytes();
    let (left, right) = match location {
        TxLocation::InsertionAfter(k) => (k as usize, k as usize),
        TxLocation::Range(first, last) => ((first - 1) as usize, last as usize),
    };
    let cds_begin = (cds_first - 1) as usize;
    match seq.get(left..right) {
        Some(bases) if cds_begin <= left && bases.eq_ignore_ascii_case(reference.as_bytes()) => {}
        bases => {
            tracing::debug!(
                "Reference {} does not match transcript {} sequence {}",
                reference,
                &mapper.tx.id,
                String::from_utf8_lossy(bases.unwrap_or_default())
            );
            return (vec![nucleotide_effect], String::from("p.?"));
        }
    }
    let mut alt_seq = Vec::with_capacity(seq.len() + alternative.len());
    alt_seq.extend_from_slice(&seq[..left]);
    alt_seq.extend_from_slice(alternative.to_ascii_uppercase().as_bytes());
    alt_seq.extend_from_slice(&seq[right..]);

    // Both sequences are translated into the 3' UTR so that a CDS without stop codon
    // (e.g., with incomplete 3' end) is compared over the same span.
    let ref_aa = translate(&seq[cds_begin..]);
    let alt_aa = translate(&alt_seq[cds_begin..]);
    let ref_p = truncate_at_stop(&ref_aa);
    let alt_p = truncate_at_stop(&alt_aa);

    if diff % 3 != 0 {
        return frameshift_effects(ref_p, alt_p);
    }

    let mut effects = Vec::new();
    if diff != 0 {
        effects.push(nucleotide_effect);
    }

    // Start codon.
    if ref_p.first() == Some(&b'M') && alt_p.first() != Some(&b'M') {
        effects.push(VariantEffect::StartLost);
        return (effects, String::from("p.(Met1?)"));
    }

    if ref_p == alt_p {
        let idx = ((c_first - 1).max(0) / 3) as usize;
        let aa = ref_p.get(idx).copied().unwrap_or(b'X');
        if diff == 0 {
            effects.push(if aa == b'*' {
                VariantEffect::StopRetainedVariant
            } else {
                VariantEffect::SynonymousVariant
            });
        }
        return (effects, format!("p.({}{}=)", aa3(aa), idx + 1));
    }

    // Trim common prefix and suffix of the protein sequences.
    let prefix = ref_p
        .iter()
        .zip(alt_p.iter())
        .take_while(|(r, a)| r == a)
        .count();
    let max_suffix = std::cmp::min(ref_p.len(), alt_p.len()) - prefix;
    let suffix = ref_p
        .iter()
        .rev()
        .zip(alt_p.iter().rev())
        .take(max_suffix)
        .take_while(|(r, a)| r == a)
        .count();
    let deleted = &ref_p[prefix..ref_p.len() - suffix];
    let inserted = &alt_p[prefix..alt_p.len() - suffix];
    let pos = prefix + 1;
    let ref_aa3 = |idx: usize| ref_p.get(idx).copied().map(aa3);

    let (effect, hgvs_p) = if ref_p.get(prefix) == Some(&b'*') {
        let ext = if alt_p.last() == Some(&b'*') {
            format!("{}", alt_p.len() - 1 - prefix)
        } else {
            String::from("?")
        };
        let alt = alt_p.get(prefix).copied().unwrap_or(b'X');
        (
            VariantEffect::StopLost,
            format!("p.(*{}{}ext*{})", pos, aa3(alt), ext),
        )
    } else if alt_p.get(prefix) == Some(&b'*') {
        let hgvs_p = match ref_aa3(prefix) {
            Some(aa) => format!("p.({}{}*)", aa, pos),
            None => String::from("p.?"),
        };
        (VariantEffect::StopGained, hgvs_p)
    } else if deleted.len() == 1 && inserted.len() == 1 {
        (
            VariantEffect::MissenseVariant,
            format!("p.({}{}{})", aa3(deleted[0]), pos, aa3(inserted[0])),
        )
    } else if inserted.is_empty() {
        (
            VariantEffect::MissenseVariant,
            format!("p.({}del)", protein_range(deleted, pos)),
        )
    } else if deleted.is_empty() {
        // Insertions need both flanking amino acids.
        let hgvs_p = match (prefix.checked_sub(1).and_then(ref_aa3), ref_aa3(prefix)) {
            (Some(before), Some(after)) => format!(
                "p.({}{}_{}{}ins{})",
                before,
                prefix,
                after,
                pos,
                aa3_seq(inserted)
            ),
            _ => String::from("p.?"),
        };
        (VariantEffect::MissenseVariant, hgvs_p)
    } else {
        (
            VariantEffect::MissenseVariant,
            format!(
                "p.({}delins{})",
                protein_range(deleted, pos),
                aa3_seq(inserted)
            ),
        )
    };

    // Stop changes are always reported; missense only for substitutions.
    if diff == 0 || effect != VariantEffect::MissenseVariant {
        effects.push(effect);
    }
    (effects, hgvs_p)
}

/// Effects and protein change of a frameshift.
fn frameshift_effects(ref_p: &[u8], alt_p: &[u8]) -> (Vec<VariantEffect>, String) {
    let mut effects = vec![VariantEffect::FrameshiftVariant];
    let Some(idx) = ref_p
        .iter()
        .zip(alt_p.iter())
        .position(|(r, a)| r != a)
        .or_else(|| (alt_p.len() < ref_p.len()).then_some(alt_p.len()))
    else {
        return (effects, String::from("p.(=)"));
    };

    let hgvs_p = if idx == 0 {
        effects.push(VariantEffect::StartLost);
        String::from("p.(Met1?)")
    } else if alt_p.get(idx) == Some(&b'*') {
        format!("p.({}{}*)", aa3(ref_p[idx]), idx + 1)
    } else {
        format!("p.({}{}fs)", aa3(ref_p[idx]), idx + 1)
    };
    (effects, hgvs_p)
}

/// Three-letter description of the amino acid range starting at 1-based `pos`.
fn protein_range(aas: &[u8], pos: usize) -> String {
    match aas {
        [aa] => format!("{}{}", aa3(*aa), pos),
        [first, .., last] => format!(
            "{}{}_{}{}",
            aa3(*first),
            pos,
            aa3(*last),
            pos + aas.len() - 1
        ),
        [] => String::new(),
    }
}

/// Amino acids up to and including the first stop codon.
fn truncate_at_stop(aas: &[u8]) -> &[u8] {
    match aas.iter().position(|aa| *aa == b'*') {
        Some(idx) => &aas[..=idx],
        None => aas,
    }
}

/// Annotation of a transcript without any effect yet.
fn tx_annotation(tx: &Transcript) -> TranscriptAnnotation {
    TranscriptAnnotation {
        accession: Some(tx.id.clone()),
        gene_symbol: Some(tx.gene_symbol.clone()),
        hgnc_id: tx.hgnc_id.clone(),
        entrez_id: tx.entrez_id,
        ..Default::default()
    }
}

/// Compute annotation of the variant on one transcript, `None` if it is too far away.
fn annotate_transcript(tx: &Transcript, var: &GenomeVariant) -> Option<TranscriptAnnotation> {
    let mapper = TxMapper::new(tx);
    let is_ins = var.is_insertion();
    // Insertions are located at the base right of them.
    let (start, end) = if is_ins {
        (var.pos(), var.pos() + 1)
    } else {
        (var.pos(), var.end())
    };
    let (tx_start, tx_end) = (tx.tx_start(), tx.tx_end());
    let mut anno = tx_annotation(tx);

    // Variants outside of the transcript.
    if end <= tx_start || start >= tx_end {
        let dist = if end <= tx_start {
            tx_start - end + 1
        } else {
            start - tx_end + 1
        };
        if dist > PADDING {
            return None;
        }
        let upstream = (end <= tx_start) == (tx.strand == Strand::Fwd);
        anno.effects = vec![if upstream {
            VariantEffect::UpstreamGeneVariant
        } else {
            VariantEffect::DownstreamGeneVariant
        }];
        anno.distance = Some(dist);
        return Some(anno);
    }

    anno.hgvs_cdna = Some(mapper.hgvs_nucleotide(var));
    anno.rank = mapper.rank(start, end);
    if start <= tx_start && end >= tx_end {
        anno.effects = vec![VariantEffect::TranscriptAblation];
        return Some(anno);
    }

    let overlaps = |a: i32, b: i32| start < b && a < end;
    // Insertions must lie strictly within splice sites and regions.
    let hits = |a: i32, b: i32| {
        if is_ins {
            a < var.pos() && var.pos() < b
        } else {
            overlaps(a, b)
        }
    };
    let exonic = tx.exons.iter().any(|exon| overlaps(exon.start, exon.end));
    let intronic = tx
        .exons
        .windows(2)
        .any(|pair| overlaps(pair[0].end, pair[1].start));

    let mut effects = Vec::new();
    let mut splice_region = false;
    for pair in tx.exons.windows(2) {
        let (a, b) = (pair[0].end, pair[1].start);
        let (donor, acceptor) = match tx.strand {
            Strand::Fwd => ((a, a + SPLICE_SITE), (b - SPLICE_SITE, b)),
            Strand::Rev => ((b - SPLICE_SITE, b), (a, a + SPLICE_SITE)),
        };
        if hits(donor.0, donor.1) {
            effects.push(VariantEffect::SpliceDonorVariant);
        }
        if hits(acceptor.0, acceptor.1) {
            effects.push(VariantEffect::SpliceAcceptorVariant);
        }
        splice_region |= hits(a - SPLICE_REGION_EXONIC, a + SPLICE_REGION_INTRONIC)
            || hits(b - SPLICE_REGION_INTRONIC, b + SPLICE_REGION_EXONIC);
    }
    let splice_site = !effects.is_empty();
    if splice_region && !splice_site {
        effects.push(VariantEffect::SpliceRegionVariant);
    }

    let mut hgvs_p = None;
    match mapper.cds {
        None => {
            if exonic {
                effects.push(VariantEffect::NonCodingTranscriptExonVariant);
            }
            if intronic && !splice_site {
                effects.push(VariantEffect::NonCodingTranscriptIntronVariant);
            }
        }
        Some((cds_first, cds_last)) => {
            if exonic {
                let contiguous = !intronic && start >= tx_start && end <= tx_end;
                let location = if !contiguous {
                    None
                } else if is_ins {
                    mapper.exon_pos(var.pos()).map(|pos| match tx.strand {
                        Strand::Fwd => TxLocation::InsertionAfter(pos - 1),
                        Strand::Rev => TxLocation::InsertionAfter(pos),
                    })
                } else {
                    match (mapper.exon_pos(start), mapper.exon_pos(end - 1)) {
                        (Some(left), Some(right)) => Some(match tx.strand {
                            Strand::Fwd => TxLocation::Range(left, right),
                            Strand::Rev => TxLocation::Range(right, left),
                        }),
                        _ => None,
                    }
                };
                let diff = var.alternative().len() as i32 - var.reference().len() as i32;
                let fallback = if diff % 3 != 0 {
                    VariantEffect::FrameshiftVariant
                } else {
                    VariantEffect::CodingSequenceVariant
                };

                match location {
                    Some(TxLocation::InsertionAfter(k)) if k < cds_first => {
                        effects.push(VariantEffect::FivePrimeUtrVariant)
                    }
                    Some(TxLocation::InsertionAfter(k)) if k >= cds_last => {
                        effects.push(VariantEffect::ThreePrimeUtrVariant)
                    }
                    Some(TxLocation::Range(_, last)) if last < cds_first => {
                        effects.push(VariantEffect::FivePrimeUtrVariant)
                    }
                    Some(TxLocation::Range(first, _)) if first > cds_last => {
                        effects.push(VariantEffect::ThreePrimeUtrVariant)
                    }
                    Some(TxLocation::Range(first, last))
                        if first < cds_first || last > cds_last =>
                    {
                        if first < cds_first {
                            effects.push(VariantEffect::FivePrimeUtrVariant);
                            effects.push(VariantEffect::StartLost);
                        }
                        if last > cds_last {
                            effects.push(VariantEffect::ThreePrimeUtrVariant);
                            effects.push(VariantEffect::StopLost);
                        }
                        effects.push(fallback);
                        hgvs_p = Some(String::from("p.?"));
                    }
                    Some(location) => {
                        let (reference, alternative) = mapper.alleles(var);
                        let (coding_effects, protein) =
                            cds_effects(&mapper, location, &reference, &alternative);
                        effects.extend(coding_effects);
                        hgvs_p = Some(protein);
                    }
                    None => {
                        let (cds_start, cds_end) =
                            (tx.cds_start.unwrap_or_default(), tx.cds_end.unwrap_or_default());
                        if overlaps(cds_start, cds_end) {
                            effects.push(fallback);
                            hgvs_p = Some(String::from("p.?"));
                        } else {
                            effects.push(VariantEffect::ExonVariant);
                        }
                    }
                }
            }
            if intronic && !splice_site {
                effects.push(VariantEffect::IntronVariant);
            }
        }
    }

    if effects.is_empty() {
        effects.push(VariantEffect::SequenceVariant);
    }
    effects.sort();
    effects.dedup();
    anno.effects = effects;
    anno.hgvs_protein = hgvs_p;
    Some(anno)
}

/// Sort annotations by severity, then by accession.
pub(crate) fn sort_annotations(annotations: &mut [TranscriptAnnotation]) {
    annotations.sort_by(|a, b| {
        (a.variant_effect(), &a.accession).cmp(&(b.variant_effect(), &b.accession))
    });
}

/// Predict consequences of small variants on transcripts.
#[derive(Debug, Clone)]
pub struct ConsequencePredictor {
    provider: Arc<TranscriptProvider>,
}

impl ConsequencePredictor {
    pub fn new(provider: Arc<TranscriptProvider>) -> Self {
        Self { provider }
    }

    /// Annotate the variant on all transcripts within `PADDING`.
    ///
    /// Returns a single intergenic annotation if there is no transcript nearby.
    pub fn predict(&self, var: &GenomeVariant) -> Result<Vec<TranscriptAnnotation>, anyhow::Error> {
        if var.reference().is_empty() && var.alternative().is_empty() {
            anyhow::bail!("variant {} has identical alleles", var);
        }
        if let Some(base) = var
            .reference()
            .bytes()
            .chain(var.alternative().bytes())
            .find(|base| !b"ACGTNacgtn".contains(base))
        {
            anyhow::bail!(
                "variant {} contains invalid base {:?}",
                var,
                base as char
            );
        }

        let query = var.pos().saturating_sub(PADDING)
            ..std::cmp::max(var.end(), var.pos().saturating_add(1)).saturating_add(PADDING);
        let mut result = self
            .provider
            .get_tx_for_region(var.contig_id(), query)
            .into_iter()
            .filter_map(|tx| annotate_transcript(tx, var))
            .collect::<Vec<_>>();
        if result.is_empty() {
            result.push(TranscriptAnnotation::intergenic());
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
    use crate::genome::position::GenomePosition;

    fn predictor() -> Result<ConsequencePredictor, anyhow::Error> {
        let provider = TranscriptProvider::load("tests/data/txs/txs.json")?;
        Ok(ConsequencePredictor::new(Arc::new(provider)))
    }

    fn predict(
        predictor: &ConsequencePredictor,
        pos: i32,
        reference: &str,
        alternative: &str,
    ) -> Result<Vec<TranscriptAnnotation>, anyhow::Error> {
        predict_on(predictor, "1", pos, reference, alternative)
    }

    fn predict_on(
        predictor: &ConsequencePredictor,
        contig: &str,
        pos: i32,
        reference: &str,
        alternative: &str,
    ) -> Result<Vec<TranscriptAnnotation>, anyhow::Error> {
        let dict = predictor.provider.reference_dictionary();
        let var = GenomeVariant::new(
            GenomePosition::from_one_based(dict, contig, pos),
            reference,
            alternative,
        );
        predictor.predict(&var)
    }

    #[rstest::rstest]
    #[case(1054, "G", "A", vec![VariantEffect::MissenseVariant], "c.4G>A", Some("p.(Ala2Thr)"))]
    #[case(1056, "T", "C", vec![VariantEffect::SynonymousVariant], "c.6T>C", Some("p.(Ala2=)"))]
    #[case(1058, "G", "A", vec![VariantEffect::StopGained], "c.8G>A", Some("p.(Trp3*)"))]
    #[case(1051, "A", "G", vec![VariantEffect::StartLost], "c.1A>G", Some("p.(Met1?)"))]
    #[case(3049, "T", "C", vec![VariantEffect::StopLost], "c.199T>C", Some("p.(*67Glnext*2)"))]
    #[case(3051, "A", "G", vec![VariantEffect::StopRetainedVariant], "c.201A>G", Some("p.(*67=)"))]
    #[case(1061, "TG", "T", vec![VariantEffect::FrameshiftVariant], "c.12del", Some("p.(Lys5fs)"))]
    #[case(
        1059,
        "GCTG",
        "G",
        vec![VariantEffect::ConservativeInframeDeletion],
        "c.10_12del",
        Some("p.(Leu4del)")
    )]
    #[case(
        1062,
        "G",
        "GGGC",
        vec![VariantEffect::ConservativeInframeInsertion],
        "c.12_13insGGC",
        Some("p.(Leu4_Lys5insGly)")
    )]
    #[case(1010, "T", "C", vec![VariantEffect::FivePrimeUtrVariant], "c.-41T>C", None)]
    #[case(3060, "C", "T", vec![VariantEffect::ThreePrimeUtrVariant], "c.*9C>T", None)]
    #[case(1101, "G", "A", vec![VariantEffect::SpliceDonorVariant], "c.50+1G>A", None)]
    #[case(2000, "G", "A", vec![VariantEffect::SpliceAcceptorVariant], "c.51-1G>A", None)]
    #[case(1500, "G", "A", vec![VariantEffect::IntronVariant], "c.50+400G>A", None)]
    #[case(1900, "G", "A", vec![VariantEffect::IntronVariant], "c.51-101G>A", None)]
    #[case(
        1105,
        "G",
        "A",
        vec![VariantEffect::SpliceRegionVariant, VariantEffect::IntronVariant],
        "c.50+5G>A",
        None
    )]
    fn predict_coding(
        #[case] pos: i32,
        #[case] reference: &str,
        #[case] alternative: &str,
        #[case] effects: Vec<VariantEffect>,
        #[case] hgvs_cdna: &str,
        #[case] hgvs_protein: Option<&str>,
    ) -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let annos = predict(&predictor, pos, reference, alternative)?;
        assert_eq!(annos.len(), 1);
        let anno = &annos[0];
        assert_eq!(anno.accession.as_deref(), Some("NM_TEST1.1"));
        assert_eq!(anno.gene_symbol.as_deref(), Some("TEST1"));
        assert_eq!(anno.effects, effects);
        assert_eq!(anno.hgvs_cdna.as_deref(), Some(hgvs_cdna));
        assert_eq!(anno.hgvs_protein.as_deref(), hgvs_protein);

        Ok(())
    }

    // NM_TEST3.1 is on the minus strand with c.1 at 2:6080 and exon 1 at 2:6001-6100.
    #[rstest::rstest]
    #[case(6077, "C", "T", vec![VariantEffect::MissenseVariant], "c.4G>A", Some("p.(Ala2Thr)"))]
    #[case(6075, "A", "G", vec![VariantEffect::SynonymousVariant], "c.6T>C", Some("p.(Ala2=)"))]
    #[case(6070, "AG", "A", vec![VariantEffect::FrameshiftVariant], "c.10del", Some("p.(Leu4*)"))]
    #[case(
        6068,
        "TCAG",
        "T",
        vec![VariantEffect::ConservativeInframeDeletion],
        "c.10_12del",
        Some("p.(Leu4del)")
    )]
    #[case(
        6068,
        "T",
        "TGCC",
        vec![VariantEffect::ConservativeInframeInsertion],
        "c.12_13insGGC",
        Some("p.(Leu4_Lys5insGly)")
    )]
    #[case(6091, "A", "G", vec![VariantEffect::FivePrimeUtrVariant], "c.-11T>C", None)]
    #[case(6000, "G", "A", vec![VariantEffect::SpliceDonorVariant], "c.80+1C>T", None)]
    #[case(5101, "C", "T", vec![VariantEffect::SpliceAcceptorVariant], "c.81-1G>A", None)]
    fn predict_coding_minus_strand(
        #[case] pos: i32,
        #[case] reference: &str,
        #[case] alternative: &str,
        #[case] effects: Vec<VariantEffect>,
        #[case] hgvs_cdna: &str,
        #[case] hgvs_protein: Option<&str>,
    ) -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let annos = predict_on(&predictor, "2", pos, reference, alternative)?;
        assert_eq!(annos.len(), 1);
        let anno = &annos[0];
        assert_eq!(anno.accession.as_deref(), Some("NM_TEST3.1"));
        assert_eq!(anno.effects, effects);
        assert_eq!(anno.hgvs_cdna.as_deref(), Some(hgvs_cdna));
        assert_eq!(anno.hgvs_protein.as_deref(), hgvs_protein);

        Ok(())
    }

    #[test]
    fn predict_rank_minus_strand() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let annos = predict_on(&predictor, "2", 6077, "C", "T")?;
        assert_eq!(annos[0].rank, Some(Rank { ord: 1, total: 2 }));
        let annos = predict_on(&predictor, "2", 5050, "A", "G")?;
        assert_eq!(annos[0].rank, Some(Rank { ord: 2, total: 2 }));
        let annos = predict_on(&predictor, "2", 5500, "A", "G")?;
        assert_eq!(annos[0].effects, vec![VariantEffect::IntronVariant]);
        assert_eq!(annos[0].rank, Some(Rank { ord: 1, total: 1 }));

        Ok(())
    }

    // NM_TEST4.1 has a CDS of four codons without stop codon, followed by `GGGTAA` in the UTR.
    #[rstest::rstest]
    #[case(30004, "G", "A", vec![VariantEffect::MissenseVariant], "c.4G>A", Some("p.(Ala2Thr)"))]
    #[case(30006, "T", "C", vec![VariantEffect::SynonymousVariant], "c.6T>C", Some("p.(Ala2=)"))]
    #[case(30012, "T", "G", vec![VariantEffect::SynonymousVariant], "c.12T>G", Some("p.(Ala4=)"))]
    #[case(30014, "G", "A", vec![VariantEffect::ThreePrimeUtrVariant], "c.*2G>A", None)]
    fn predict_cds_without_stop_codon(
        #[case] pos: i32,
        #[case] reference: &str,
        #[case] alternative: &str,
        #[case] effects: Vec<VariantEffect>,
        #[case] hgvs_cdna: &str,
        #[case] hgvs_protein: Option<&str>,
    ) -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let annos = predict_on(&predictor, "2", pos, reference, alternative)?;
        assert_eq!(annos.len(), 1);
        let anno = &annos[0];
        assert_eq!(anno.accession.as_deref(), Some("NM_TEST4.1"));
        assert_eq!(anno.effects, effects);
        assert_eq!(anno.hgvs_cdna.as_deref(), Some(hgvs_cdna));
        assert_eq!(anno.hgvs_protein.as_deref(), hgvs_protein);

        Ok(())
    }

    #[test]
    fn predict_rank() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let annos = predict(&predictor, 1054, "G", "A")?;
        assert_eq!(annos[0].rank, Some(Rank { ord: 1, total: 3 }));
        let annos = predict(&predictor, 1500, "G", "A")?;
        assert_eq!(annos[0].rank, Some(Rank { ord: 1, total: 2 }));

        Ok(())
    }

    #[test]
    fn predict_missense_in_splice_region() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        // c.48C>T is synonymous (GGC>GGT) but within the splice region.
        let annos = predict(&predictor, 1098, "C", "T")?;
        assert_eq!(
            annos[0].effects,
            vec![
                VariantEffect::SpliceRegionVariant,
                VariantEffect::SynonymousVariant
            ]
        );
        assert_eq!(annos[0].hgvs_cdna.as_deref(), Some("c.48C>T"));

        Ok(())
    }

    #[test]
    fn predict_noncoding_minus_strand() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let annos = predict(&predictor, 21090, "A", "G")?;
        assert_eq!(annos.len(), 1);
        let anno = &annos[0];
        assert_eq!(anno.accession.as_deref(), Some("NR_TEST2.1"));
        assert_eq!(
            anno.effects,
            vec![VariantEffect::NonCodingTranscriptExonVariant]
        );
        assert_eq!(anno.hgvs_cdna.as_deref(), Some("n.11T>C"));
        assert_eq!(anno.hgvs_protein, None);
        assert_eq!(anno.rank, Some(Rank { ord: 1, total: 2 }));

        // Last intronic base before exon 1 on the minus strand is the donor site.
        let annos = predict(&predictor, 21000, "A", "G")?;
        assert_eq!(annos[0].effects, vec![VariantEffect::SpliceDonorVariant]);
        assert_eq!(annos[0].hgvs_cdna.as_deref(), Some("n.100+1T>C"));

        Ok(())
    }

    #[test]
    fn predict_up_and_downstream() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let annos = predict(&predictor, 500, "A", "G")?;
        assert_eq!(annos.len(), 1);
        assert_eq!(annos[0].effects, vec![VariantEffect::UpstreamGeneVariant]);
        assert_eq!(annos[0].distance, Some(501));
        assert_eq!(annos[0].hgvs_cdna, None);

        // Left of the minus strand transcript is downstream.
        let annos = predict(&predictor, 19000, "A", "G")?;
        assert_eq!(annos.len(), 1);
        assert_eq!(annos[0].effects, vec![VariantEffect::DownstreamGeneVariant]);
        assert_eq!(annos[0].distance, Some(1001));

        Ok(())
    }

    #[test]
    fn predict_intergenic() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        let annos = predict(&predictor, 12000, "A", "G")?;
        assert_eq!(annos, vec![TranscriptAnnotation::intergenic()]);

        Ok(())
    }

    #[test]
    fn predict_reference_mismatch_falls_back() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        // Reference is G, not T.
        let annos = predict(&predictor, 1054, "T", "A")?;
        assert_eq!(annos[0].effects, vec![VariantEffect::CodingSequenceVariant]);
        assert_eq!(annos[0].hgvs_protein.as_deref(), Some("p.?"));

        Ok(())
    }

    #[test]
    fn predict_rejects_invalid_bases() -> Result<(), anyhow::Error> {
        let predictor = predictor()?;
        assert!(predict(&predictor, 1054, "G", "*").is_err());
        assert!(predict(&predictor, 1054, "G", "G").is_err());

        Ok(())
    }
}
