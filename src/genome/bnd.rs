//! Parsing of mated breakend ALT alleles, e.g., `G]17:198982]` or `[13:123457[T`.

use once_cell::sync::Lazy;
use regex::Regex;

static BND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?<leading>\w*)(?<bracket1>[\[\]])(?<chrom>[^:]+):(?<pos>\w+)(?<bracket2>[\[\]])(?<trailing>\w*)$",
    )
    .expect("invalid regex in source code")
});

/// Side of the mate that is joined to the breakend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    utoipa::ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BreakendSide {
    /// Mate bracket `]`: the piece left of the mate position is joined.
    LeftEnd,
    /// Mate bracket `[`: the piece right of the mate position is joined.
    RightEnd,
}

/// The components of a mated breakend ALT allele.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakendAlt {
    /// Bases before the bracketed mate position.
    pub leading: String,
    /// Bases after the bracketed mate position.
    pub trailing: String,
    /// Contig of the mate as written in the allele.
    pub mate_contig: String,
    /// 1-based position of the mate.
    pub mate_pos: i32,
    pub side: BreakendSide,
}

/// Parse a mated breakend ALT allele.
///
/// Returns `None` if the allele does not match, if the two brackets differ, or if the mate
/// position is not an integer.
pub fn parse_breakend_alt(alt: &str) -> Option<BreakendAlt> {
    let caps = BND_PATTERN.captures(alt)?;
    let bracket = &caps["bracket1"];
    if bracket != &caps["bracket2"] {
        return None;
    }
    let mate_pos = caps["pos"].parse::<i32>().ok()?;
    Some(BreakendAlt {
        leading: caps["leading"].to_string(),
        trailing: caps["trailing"].to_string(),
        mate_contig: caps["chrom"].to_string(),
        mate_pos,
        side: if bracket == "]" {
            BreakendSide::LeftEnd
        } else {
            BreakendSide::RightEnd
        },
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[rstest::rstest]
    #[case("G]17:198982]", "G", "", "17", 198982, BreakendSide::LeftEnd)]
    #[case("]13:123456]T", "", "T", "13", 123456, BreakendSide::LeftEnd)]
    #[case("C[2:321682[", "C", "", "2", 321682, BreakendSide::RightEnd)]
    #[case("[17:198983[A", "", "A", "17", 198983, BreakendSide::RightEnd)]
    #[case("A]chrUn_gl000220:5]", "A", "", "chrUn_gl000220", 5, BreakendSide::LeftEnd)]
    fn parse_valid(
        #[case] alt: &str,
        #[case] leading: &str,
        #[case] trailing: &str,
        #[case] mate_contig: &str,
        #[case] mate_pos: i32,
        #[case] side: BreakendSide,
    ) {
        assert_eq!(
            parse_breakend_alt(alt),
            Some(BreakendAlt {
                leading: leading.to_string(),
                trailing: trailing.to_string(),
                mate_contig: mate_contig.to_string(),
                mate_pos,
                side,
            })
        );
    }

    #[rstest::rstest]
    #[case("G]17:198982[")]
    #[case("G]17:abc]")]
    #[case("G]17]")]
    #[case("<DEL>")]
    #[case("G.")]
    #[case("A")]
    fn parse_invalid(#[case] alt: &str) {
        assert_eq!(parse_breakend_alt(alt), None);
    }
}
