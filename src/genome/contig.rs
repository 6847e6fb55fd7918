//! Reference dictionary mapping contig names to numeric identifiers.

use biocommons_bioutils::assemblies::{Assembly, ASSEMBLY_INFOS};
use rustc_hash::FxHashMap;

use crate::common::GenomeRelease;

/// Identifier used for contigs that are not known to the dictionary.
pub const UNKNOWN_CHROMOSOME: u32 = 0;

const CHR_X: u32 = 23;
const CHR_Y: u32 = 24;
const CHR_M: u32 = 25;

/// Mapping of contig names and aliases to numeric identifiers and lengths.
///
/// Autosomes are numbered `1..=22`, chrX is `23`, chrY is `24`, and chrMT is `25`.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDictionary {
    /// Mapping from any known alias (e.g., "1", "chr1", "NC_000001.10") to the identifier.
    alias_to_id: FxHashMap<String, u32>,
    /// Mapping from identifier to the primary name (e.g., "1", "X", "MT").
    id_to_name: FxHashMap<u32, String>,
    /// Mapping from identifier to contig length.
    id_to_length: FxHashMap<u32, usize>,
}

/// Return the chromosome number for a primary name, e.g., `23` for `"X"`.
fn chrom_no(name: &str) -> Option<u32> {
    let name = name.strip_prefix("chr").unwrap_or(name);
    match name {
        "X" => Some(CHR_X),
        "Y" => Some(CHR_Y),
        "M" | "MT" => Some(CHR_M),
        _ => name
            .parse::<u32>()
            .ok()
            .filter(|no| (1..=22).contains(no)),
    }
}

impl ReferenceDictionary {
    /// Create a new dictionary for the canonical contigs of the given genome release.
    pub fn new(genome_release: GenomeRelease) -> Self {
        let assembly: Assembly = genome_release.into();
        let mut result = Self::default();

        for seq in &ASSEMBLY_INFOS[assembly].sequences {
            // Skip non-primary sequences, but keep chrMT.
            if !["Primary Assembly", "non-nuclear"].contains(&&*seq.assembly_unit)
                || seq.sequence_role != "assembled-molecule"
            {
                continue;
            }
            let Some(id) = chrom_no(&seq.name) else {
                tracing::trace!("Skipping non-canonical sequence: {}", &seq.name);
                continue;
            };
            result.insert(id, &seq.name, seq.length);
            result.alias_to_id.insert(seq.refseq_ac.clone(), id);
            for alias in &seq.aliases {
                result.alias_to_id.insert(alias.clone(), id);
            }
        }

        result
    }

    /// Create a dictionary from contig names and lengths.
    ///
    /// Contigs must have names that can be mapped to chromosome numbers; others are skipped.
    pub fn from_contigs<'a, I>(contigs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut result = Self::default();
        for (name, length) in contigs {
            if let Some(id) = chrom_no(name) {
                result.insert(id, name.strip_prefix("chr").unwrap_or(name), length);
            } else {
                tracing::warn!("Skipping contig {} that has no chromosome number", name);
            }
        }
        result
    }

    /// Register the contig together with the `chr`-prefixed and unprefixed aliases.
    fn insert(&mut self, id: u32, name: &str, length: usize) {
        let bare = name.strip_prefix("chr").unwrap_or(name);
        self.id_to_name.insert(id, bare.to_string());
        self.id_to_length.insert(id, length);
        self.alias_to_id.insert(bare.to_string(), id);
        self.alias_to_id.insert(format!("chr{}", bare), id);
        if id == CHR_M {
            for alias in ["M", "MT", "chrM", "chrMT"] {
                self.alias_to_id.insert(alias.to_string(), id);
            }
        }
    }

    /// Numeric identifier of the contig, `UNKNOWN_CHROMOSOME` if unknown.
    pub fn contig_id(&self, alias: &str) -> u32 {
        self.alias_to_id
            .get(alias)
            .copied()
            .unwrap_or(UNKNOWN_CHROMOSOME)
    }

    /// Primary name of the contig with the given identifier.
    pub fn contig_name(&self, id: u32) -> Option<&str> {
        self.id_to_name.get(&id).map(String::as_str)
    }

    /// Length of the contig with the given identifier.
    pub fn contig_length(&self, id: u32) -> Option<usize> {
        self.id_to_length.get(&id).copied()
    }

    /// Number of contigs in the dictionary.
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}
