//! Small variants on the genome in zero-based, right-shifted representation.

use super::position::GenomePosition;

/// A sequence variant on the genome.
///
/// CAUTION: the position is zero-based and the alleles are trimmed left side first, i.e.,
/// the variant is right shifted.  This is counter to the VCF convention.  Insertions have an
/// empty reference allele and are located between `pos - 1` and `pos`, deletions have an
/// empty alternative allele.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GenomeVariant {
    position: GenomePosition,
    reference: String,
    alternative: String,
}

impl GenomeVariant {
    /// Construct a new variant, trimming common prefix and then common suffix.
    pub fn new(position: GenomePosition, reference: &str, alternative: &str) -> Self {
        let (reference, alternative) = (reference.as_bytes(), alternative.as_bytes());
        let prefix = reference
            .iter()
            .zip(alternative.iter())
            .take_while(|(r, a)| r == a)
            .count();
        let (reference, alternative) = (&reference[prefix..], &alternative[prefix..]);
        let suffix = reference
            .iter()
            .rev()
            .zip(alternative.iter().rev())
            .take_while(|(r, a)| r == a)
            .count();
        let reference = &reference[..reference.len() - suffix];
        let alternative = &alternative[..alternative.len() - suffix];

        let mut position = position;
        position.pos = position.pos.saturating_add(prefix as i32);

        Self {
            position,
            reference: String::from_utf8_lossy(reference).to_string(),
            alternative: String::from_utf8_lossy(alternative).to_string(),
        }
    }

    pub fn position(&self) -> &GenomePosition {
        &self.position
    }

    pub fn contig_id(&self) -> u32 {
        self.position.contig_id
    }

    pub fn contig_name(&self) -> &str {
        &self.position.contig_name
    }

    /// 0-based start position.
    pub fn pos(&self) -> i32 {
        self.position.pos
    }

    /// 0-based exclusive end position.
    pub fn end(&self) -> i32 {
        self.position.pos.saturating_add(self.reference.len() as i32)
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn alternative(&self) -> &str {
        &self.alternative
    }

    pub fn is_snv(&self) -> bool {
        self.reference.len() == 1 && self.alternative.len() == 1
    }

    pub fn is_insertion(&self) -> bool {
        self.reference.is_empty() && !self.alternative.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        !self.reference.is_empty() && self.alternative.is_empty()
    }

    /// Whether reference and alternative have the same length.
    pub fn is_substitution(&self) -> bool {
        self.reference.len() == self.alternative.len()
    }
}

impl std::fmt::Display for GenomeVariant {
    /// Format with 1-based positions, e.g. `1:g.100A>T`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.contig_name();
        let start = self.pos() + 1;
        if self.is_snv() {
            write!(
                f,
                "{}:g.{}{}>{}",
                name, start, self.reference, self.alternative
            )
        } else if self.is_insertion() {
            write!(f, "{}:g.{}_{}ins{}", name, start - 1, start, self.alternative)
        } else if self.is_deletion() && self.reference.len() == 1 {
            write!(f, "{}:g.{}del", name, start)
        } else if self.is_deletion() {
            write!(f, "{}:g.{}_{}del", name, start, self.end())
        } else if self.reference.len() == 1 {
            write!(f, "{}:g.{}delins{}", name, start, self.alternative)
        } else {
            write!(
                f,
                "{}:g.{}_{}delins{}",
                name,
                start,
                self.end(),
                self.alternative
            )
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::GenomeRelease;
    use crate::genome::contig::ReferenceDictionary;

    fn variant(pos: i32, reference: &str, alternative: &str) -> GenomeVariant {
        let dict = ReferenceDictionary::new(GenomeRelease::Grch37);
        GenomeVariant::new(
            GenomePosition::from_one_based(&dict, "1", pos),
            reference,
            alternative,
        )
    }

    #[rstest::rstest]
    #[case(100, "A", "T", 99, "A", "T", "1:g.100A>T")]
    #[case(100, "AT", "A", 100, "T", "", "1:g.101del")]
    #[case(100, "ATTG", "A", 100, "TTG", "", "1:g.101_103del")]
    #[case(100, "A", "AGT", 100, "", "GT", "1:g.100_101insGT")]
    #[case(100, "AC", "GT", 99, "AC", "GT", "1:g.100_101delinsGT")]
    #[case(100, "TCAA", "TCGA", 101, "A", "G", "1:g.102A>G")]
    fn normalization(
        #[case] pos: i32,
        #[case] reference: &str,
        #[case] alternative: &str,
        #[case] expected_pos: i32,
        #[case] expected_ref: &str,
        #[case] expected_alt: &str,
        #[case] expected_display: &str,
    ) {
        let var = variant(pos, reference, alternative);
        assert_eq!(var.pos(), expected_pos);
        assert_eq!(var.reference(), expected_ref);
        assert_eq!(var.alternative(), expected_alt);
        assert_eq!(format!("{}", var), expected_display);
    }

    #[test]
    fn right_shifted_by_prefix_trimming() {
        // Deletion of one T from a run of Ts: prefix trimming first yields the rightmost one.
        let var = variant(100, "ATT", "AT");
        assert_eq!(var.pos(), 101);
        assert_eq!(var.reference(), "T");
        assert!(var.is_deletion());
        assert_eq!(var.end(), 102);
    }

    #[test]
    fn predicates() {
        assert!(variant(100, "A", "T").is_snv());
        assert!(variant(100, "A", "AT").is_insertion());
        assert!(variant(100, "AT", "A").is_deletion());
        assert!(variant(100, "AC", "GT").is_substitution());
        assert!(!variant(100, "AC", "GT").is_snv());
    }
}
