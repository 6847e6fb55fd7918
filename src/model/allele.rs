//! Allele representation helpers and confidence intervals.

/// Confidence interval around a structural variant breakpoint.
///
/// Corresponds to the VCF `CIPOS` and `CIEND` fields, the lower bound is never positive and
/// the upper bound never negative.
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
pub struct ConfidenceInterval {
    lower_bound: i32,
    upper_bound: i32,
}

impl ConfidenceInterval {
    /// Construct new confidence interval, validating the bounds.
    pub fn new(lower_bound: i32, upper_bound: i32) -> Result<Self, anyhow::Error> {
        if lower_bound > 0 {
            anyhow::bail!(
                "confidence interval lower bound must be <= 0, was {}",
                lower_bound
            );
        }
        if upper_bound < 0 {
            anyhow::bail!(
                "confidence interval upper bound must be >= 0, was {}",
                upper_bound
            );
        }
        Ok(Self {
            lower_bound,
            upper_bound,
        })
    }

    /// The interval of a precise breakpoint.
    pub fn precise() -> Self {
        Self::default()
    }

    /// Construct from the values of a VCF `CIPOS`/`CIEND` field.
    pub fn from_vcf_values(values: &[Option<i32>]) -> Result<Self, anyhow::Error> {
        match values {
            [] => Ok(Self::precise()),
            [Some(lower), Some(upper)] => Self::new(*lower, *upper),
            _ => anyhow::bail!("invalid confidence interval values: {:?}", values),
        }
    }

    pub fn lower_bound(&self) -> i32 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> i32 {
        self.upper_bound
    }

    pub fn is_precise(&self) -> bool {
        self.lower_bound == 0 && self.upper_bound == 0
    }

    /// Leftmost position given the position `pos`.
    pub fn min_pos(&self, pos: i32) -> i32 {
        pos + self.lower_bound
    }

    /// Rightmost position given the position `pos`.
    pub fn max_pos(&self, pos: i32) -> i32 {
        pos + self.upper_bound
    }
}

impl std::fmt::Display for ConfidenceInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lower_bound, self.upper_bound)
    }
}

/// A one-based position with reference and alternative allele.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AllelePosition {
    /// 1-based position of the first base of `reference`.
    pub pos: i32,
    /// Reference allele.
    pub reference: String,
    /// Alternative allele.
    pub alternative: String,
}

impl AllelePosition {
    /// Whether the allele is a symbolic allele, e.g., `<DEL>`, `.A`, or `G]17:198982]`.
    pub fn is_symbolic(allele: &str) -> bool {
        allele.len() > 1
            && (Self::is_large_symbolic(allele)
                || Self::is_single_breakend(allele)
                || Self::is_mated_breakend(allele))
    }

    /// Whether the allele is a breakend, either single or mated.
    pub fn is_breakend(allele: &str) -> bool {
        allele.len() > 1 && (Self::is_single_breakend(allele) || Self::is_mated_breakend(allele))
    }

    fn is_large_symbolic(allele: &str) -> bool {
        allele.starts_with('<') || allele.ends_with('>')
    }

    fn is_single_breakend(allele: &str) -> bool {
        allele.starts_with('.') || allele.ends_with('.')
    }

    fn is_mated_breakend(allele: &str) -> bool {
        allele.contains('[') || allele.contains(']')
    }

    /// Trim the alleles to their minimal VCF representation.
    ///
    /// Common suffixes are removed first, then common prefixes.  Indels keep one padding base
    /// and the position is adjusted accordingly.  Symbolic alleles are returned as they are.
    pub fn trim(pos: i32, reference: &str, alternative: &str) -> Self {
        if Self::is_symbolic(alternative) || reference == alternative {
            return Self {
                pos,
                reference: reference.to_string(),
                alternative: alternative.to_string(),
            };
        }

        let mut reference = reference.as_bytes();
        let mut alternative = alternative.as_bytes();
        let mut pos = pos;

        // Trim from the right, keeping at least one base in each allele.
        while reference.len() > 1
            && alternative.len() > 1
            && reference[reference.len() - 1] == alternative[alternative.len() - 1]
        {
            reference = &reference[..reference.len() - 1];
            alternative = &alternative[..alternative.len() - 1];
        }
        // Trim from the left, keeping at least one base in each allele.
        while reference.len() > 1 && alternative.len() > 1 && reference[0] == alternative[0] {
            reference = &reference[1..];
            alternative = &alternative[1..];
            pos = pos.saturating_add(1);
        }
        // For SNVs/MNVs, padding is not needed.
        while reference.len() == alternative.len()
            && reference.len() > 1
            && reference[0] == alternative[0]
        {
            reference = &reference[1..];
            alternative = &alternative[1..];
            pos = pos.saturating_add(1);
        }

        Self {
            pos,
            reference: String::from_utf8_lossy(reference).to_string(),
            alternative: String::from_utf8_lossy(alternative).to_string(),
        }
    }
}
