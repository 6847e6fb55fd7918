//! Nucleotide and amino acid sequence helpers.

/// Map nucleotide to index in the codon table, `None` for ambiguous bases.
fn nucleotide_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

/// Standard genetic code, indexed by `first * 16 + second * 4 + third` in order `ACGT`.
const CODON_TABLE: [u8; 64] = [
    // AAA AAC AAG AAT  ACA ACC ACG ACT  AGA AGC AGG AGT  ATA ATC ATG ATT
    b'K', b'N', b'K', b'N', b'T', b'T', b'T', b'T', b'R', b'S', b'R', b'S', b'I', b'I', b'M', b'I',
    // CAA CAC CAG CAT  CCA CCC CCG CCT  CGA CGC CGG CGT  CTA CTC CTG CTT
    b'Q', b'H', b'Q', b'H', b'P', b'P', b'P', b'P', b'R', b'R', b'R', b'R', b'L', b'L', b'L', b'L',
    // GAA GAC GAG GAT  GCA GCC GCG GCT  GGA GGC GGG GGT  GTA GTC GTG GTT
    b'E', b'D', b'E', b'D', b'A', b'A', b'A', b'A', b'G', b'G', b'G', b'G', b'V', b'V', b'V', b'V',
    // TAA TAC TAG TAT  TCA TCC TCG TCT  TGA TGC TGG TGT  TTA TTC TTG TTT
    b'*', b'Y', b'*', b'Y', b'S', b'S', b'S', b'S', b'*', b'C', b'W', b'C', b'L', b'F', b'L', b'F',
];

/// Translate one codon into the one-letter amino acid code, `X` if not translatable.
pub fn translate_codon(codon: &[u8]) -> u8 {
    match codon {
        [a, b, c] => match (nucleotide_index(*a), nucleotide_index(*b), nucleotide_index(*c)) {
            (Some(a), Some(b), Some(c)) => CODON_TABLE[a * 16 + b * 4 + c],
            _ => b'X',
        },
        _ => b'X',
    }
}

/// Translate a sequence codon by codon, ignoring a trailing incomplete codon.
pub fn translate(seq: &[u8]) -> Vec<u8> {
    seq.chunks_exact(3).map(translate_codon).collect()
}

fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        other => other,
    }
}

/// Reverse complement of a nucleotide sequence.
pub fn revcomp(seq: &str) -> String {
    seq.bytes().rev().map(|b| complement(b) as char).collect()
}

/// Three-letter code of a one-letter amino acid code.
pub fn aa3(aa: u8) -> &'static str {
    match aa.to_ascii_uppercase() {
        b'A' => "Ala",
        b'R' => "Arg",
        b'N' => "Asn",
        b'D' => "Asp",
        b'C' => "Cys",
        b'E' => "Glu",
        b'Q' => "Gln",
        b'G' => "Gly",
        b'H' => "His",
        b'I' => "Ile",
        b'L' => "Leu",
        b'K' => "Lys",
        b'M' => "Met",
        b'F' => "Phe",
        b'P' => "Pro",
        b'S' => "Ser",
        b'T' => "Thr",
        b'W' => "Trp",
        b'Y' => "Tyr",
        b'V' => "Val",
        b'*' => "*",
        _ => "Xaa",
    }
}

/// Three-letter representation of a stretch of amino acids.
pub fn aa3_seq(aas: &[u8]) -> String {
    aas.iter().map(|aa| aa3(*aa)).collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[rstest::rstest]
    #[case("ATG", b'M')]
    #[case("GCT", b'A')]
    #[case("TGG", b'W')]
    #[case("TAA", b'*')]
    #[case("TGA", b'*')]
    #[case("atg", b'M')]
    #[case("ANG", b'X')]
    #[case("AT", b'X')]
    fn translate_codon(#[case] codon: &str, #[case] expected: u8) {
        assert_eq!(super::translate_codon(codon.as_bytes()), expected);
    }

    #[test]
    fn translate_ignores_incomplete_codon() {
        assert_eq!(translate(b"ATGGCTTGGTAAGC"), b"MAW*".to_vec());
    }

    #[test]
    fn revcomp_and_aa3() {
        assert_eq!(revcomp("ACGTn"), "nACGT");
        assert_eq!(aa3(b'W'), "Trp");
        assert_eq!(aa3(b'*'), "*");
        assert_eq!(aa3_seq(b"MA"), "MetAla");
    }
}
