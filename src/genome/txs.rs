//! Transcript database and per-contig interval tree index.

use std::path::Path;

use bio::data_structures::interval_tree::ArrayBackedIntervalTree;
use rustc_hash::FxHashMap;

use super::{contig::ReferenceDictionary, position::Strand};
use crate::common::{io::open_read_maybe_gz, GenomeRelease};

type IntervalTree = ArrayBackedIntervalTree<i32, u32>;

/// Biotype of a transcript.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Biotype {
    #[default]
    Coding,
    NonCoding,
}

/// An exon as zero-based, half-open interval on the genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Exon {
    pub start: i32,
    pub end: i32,
}

impl Exon {
    pub fn len(&self) -> i32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, pos: i32) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// A transcript model.
///
/// Exons are sorted by genomic position.  The CDS is given as zero-based, half-open genomic
/// interval including start and stop codon.  The optional sequence is the cDNA sequence on
/// the transcript strand.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transcript {
    /// Transcript accession, e.g., `NM_007294.3`.
    pub id: String,
    pub gene_symbol: String,
    pub hgnc_id: Option<String>,
    pub entrez_id: Option<u32>,
    pub contig: String,
    pub strand: Strand,
    #[serde(default)]
    pub biotype: Biotype,
    pub exons: Vec<Exon>,
    pub cds_start: Option<i32>,
    pub cds_end: Option<i32>,
    pub sequence: Option<String>,
}

impl Transcript {
    /// Leftmost genomic position of the transcript.
    pub fn tx_start(&self) -> i32 {
        self.exons.first().map(|exon| exon.start).unwrap_or_default()
    }

    /// Rightmost genomic position of the transcript, exclusive.
    pub fn tx_end(&self) -> i32 {
        self.exons.last().map(|exon| exon.end).unwrap_or_default()
    }

    /// Length of the transcript sequence.
    pub fn tx_len(&self) -> i32 {
        self.exons.iter().map(Exon::len).sum()
    }

    /// Whether the transcript is coding and has a CDS.
    pub fn is_coding(&self) -> bool {
        self.biotype == Biotype::Coding && self.cds_start.is_some() && self.cds_end.is_some()
    }

    /// Check the transcript for consistency and sort the exons.
    fn validate(&mut self) -> Result<(), anyhow::Error> {
        if self.exons.is_empty() {
            anyhow::bail!("transcript {} has no exons", &self.id);
        }
        if let Some(exon) = self.exons.iter().find(|exon| exon.is_empty()) {
            anyhow::bail!("transcript {} has empty exon {:?}", &self.id, exon);
        }
        self.exons.sort_by_key(|exon| exon.start);
        if self
            .exons
            .windows(2)
            .any(|pair| pair[0].end > pair[1].start)
        {
            anyhow::bail!("transcript {} has overlapping exons", &self.id);
        }
        if let (Some(cds_start), Some(cds_end)) = (self.cds_start, self.cds_end) {
            if cds_start >= cds_end || cds_start < self.tx_start() || cds_end > self.tx_end() {
                anyhow::bail!(
                    "transcript {} has invalid CDS {}-{}",
                    &self.id,
                    cds_start,
                    cds_end
                );
            }
        }
        if let Some(seq) = self.sequence.as_ref() {
            if seq.len() as i32 != self.tx_len() {
                tracing::warn!(
                    "Sequence length {} of transcript {} does not match exons ({}), ignoring",
                    seq.len(),
                    &self.id,
                    self.tx_len()
                );
                self.sequence = None;
            }
        }
        Ok(())
    }
}

/// The transcript database as stored in JSON.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TranscriptDb {
    pub genome_release: GenomeRelease,
    /// Version of the underlying data, e.g., `RefSeq 105`.
    pub version: Option<String>,
    pub transcripts: Vec<Transcript>,
}

impl TranscriptDb {
    /// Load from (optionally gzip-compressed) JSON file.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        tracing::debug!("Loading transcripts from {:?}", path.as_ref());
        let reader = open_read_maybe_gz(path.as_ref())?;
        let mut db: TranscriptDb = serde_json::from_reader(reader).map_err(|e| {
            anyhow::anyhow!("problem parsing transcripts {:?}: {}", path.as_ref(), e)
        })?;
        for tx in db.transcripts.iter_mut() {
            tx.validate()?;
        }
        tracing::debug!("Loaded {} transcripts", db.transcripts.len());
        Ok(db)
    }
}

/// Interval trees over the transcripts, one per contig.
#[derive(derivative::Derivative)]
#[derivative(Debug)]
pub struct TxIntervalTrees {
    /// Interval tree to index in `TranscriptDb::transcripts`, for each contig identifier.
    #[derivative(Debug = "ignore")]
    trees: FxHashMap<u32, IntervalTree>,
}

impl TxIntervalTrees {
    pub fn new(db: &TranscriptDb, dict: &ReferenceDictionary) -> Self {
        let mut trees: FxHashMap<u32, IntervalTree> = FxHashMap::default();
        for (tx_id, tx) in db.transcripts.iter().enumerate() {
            let contig_id = dict.contig_id(&tx.contig);
            if contig_id == super::contig::UNKNOWN_CHROMOSOME {
                tracing::debug!(
                    "Skipping transcript {} on unknown contig {}",
                    &tx.id,
                    &tx.contig
                );
                continue;
            }
            trees
                .entry(contig_id)
                .or_insert_with(IntervalTree::new)
                .insert(tx.tx_start()..tx.tx_end(), tx_id as u32);
        }
        trees.values_mut().for_each(|tree| tree.index());
        Self { trees }
    }

    /// Indices of transcripts overlapping the zero-based, half-open `range`.
    pub fn find(&self, contig_id: u32, range: std::ops::Range<i32>) -> Vec<usize> {
        let Some(tree) = self.trees.get(&contig_id) else {
            return Vec::new();
        };
        let mut result = tree
            .find(range)
            .iter()
            .map(|entry| *entry.data() as usize)
            .collect::<Vec<_>>();
        result.sort();
        result
    }
}

/// Provides transcripts by genomic region.
#[derive(Debug)]
pub struct TranscriptProvider {
    db: TranscriptDb,
    trees: TxIntervalTrees,
    dict: ReferenceDictionary,
}

impl TranscriptProvider {
    pub fn new(db: TranscriptDb, dict: ReferenceDictionary) -> Self {
        let trees = TxIntervalTrees::new(&db, &dict);
        Self { db, trees, dict }
    }

    /// Load the transcript database and use the reference dictionary of its genome release.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let db = TranscriptDb::load(path)?;
        let dict = ReferenceDictionary::new(db.genome_release);
        Ok(Self::new(db, dict))
    }

    /// Transcripts overlapping the zero-based, half-open `range` on the given contig.
    pub fn get_tx_for_region(&self, contig_id: u32, range: std::ops::Range<i32>) -> Vec<&Transcript> {
        if range.start >= range.end {
            return Vec::new();
        }
        self.trees
            .find(contig_id, range)
            .into_iter()
            .map(|idx| &self.db.transcripts[idx])
            .collect()
    }

    pub fn reference_dictionary(&self) -> &ReferenceDictionary {
        &self.dict
    }

    pub fn genome_release(&self) -> GenomeRelease {
        self.db.genome_release
    }

    /// Version of the transcript data, if set.
    pub fn data_version(&self) -> Option<String> {
        self.db.version.clone()
    }

    pub fn transcript_count(&self) -> usize {
        self.db.transcripts.len()
    }
}
