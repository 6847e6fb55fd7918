//! Classification of variants into sequence and structural variant types.

use strum::IntoEnumIterator;

use super::allele::AllelePosition;

/// Type of a variant.
///
/// The structural types follow the VCF symbolic allele hierarchy, e.g., `<DEL:ME:ALU>` is a
/// `DelMeAlu` with sub type `DelMe` and base type `Del`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VariantType {
    Snv,
    Mnv,
    Indel,
    Symbolic,
    Str,
    Del,
    DelMe,
    DelMeSva,
    DelMeL1,
    DelMeAlu,
    Ins,
    InsMe,
    InsMeSva,
    InsMeL1,
    InsMeAlu,
    Dup,
    DupTandem,
    DupInvDup,
    DupInvBefore,
    DupInvAfter,
    Inv,
    Cnv,
    CnvGain,
    CnvLoss,
    CnvLoh,
    CnvComplex,
    Bnd,
    #[default]
    Unknown,
}

impl VariantType {
    /// Return the top-level type, e.g., `Del` for `DelMeAlu`.
    pub fn base_type(&self) -> VariantType {
        use VariantType::*;
        match self {
            DelMe | DelMeSva | DelMeL1 | DelMeAlu => Del,
            InsMe | InsMeSva | InsMeL1 | InsMeAlu => Ins,
            DupTandem | DupInvDup | DupInvBefore | DupInvAfter => Dup,
            CnvGain | CnvLoss | CnvLoh | CnvComplex => Cnv,
            _ => *self,
        }
    }

    /// Return the first-level type, e.g., `DelMe` for `DelMeAlu`.
    pub fn sub_type(&self) -> VariantType {
        use VariantType::*;
        match self {
            DelMeSva | DelMeL1 | DelMeAlu => DelMe,
            InsMeSva | InsMeL1 | InsMeAlu => InsMe,
            DupInvDup | DupInvBefore | DupInvAfter => Dup,
            CnvGain | CnvLoss | CnvLoh | CnvComplex => Cnv,
            _ => *self,
        }
    }

    /// Whether this is a structural variant type.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            VariantType::Snv | VariantType::Mnv | VariantType::Indel | VariantType::Unknown
        )
    }

    /// The VCF symbolic allele id for the type, e.g., `DEL:ME:ALU`.
    pub fn symbolic_id(&self) -> String {
        self.to_string().replace('_', ":")
    }

    /// Parse the symbolic id of an allele, e.g. `DEL:ME:ALU` for `<DEL:ME:ALU>`.
    ///
    /// Unknown ids are mapped to `Symbolic`, e.g., `<DEL:FOO>`.
    pub fn from_symbolic_id(id: &str) -> VariantType {
        let id = id.trim_start_matches('<').trim_end_matches('>');
        let id = id.to_uppercase();
        Self::iter()
            .filter(|t| t.is_structural())
            .find(|t| t.symbolic_id() == id)
            .unwrap_or(VariantType::Symbolic)
    }

    /// Interpret the VCF `SVTYPE` INFO value.
    pub fn from_svtype(svtype: &str) -> VariantType {
        match VariantType::from_symbolic_id(svtype) {
            VariantType::Symbolic => VariantType::Unknown,
            other => other,
        }
    }

    /// Determine the variant type from the reference and alternative allele.
    pub fn parse_allele(reference: &str, alternative: &str) -> VariantType {
        if AllelePosition::is_symbolic(alternative) {
            if AllelePosition::is_breakend(alternative) {
                VariantType::Bnd
            } else {
                VariantType::from_symbolic_id(alternative)
            }
        } else if reference.len() == alternative.len() {
            if reference.len() == 1 {
                VariantType::Snv
            } else {
                VariantType::Mnv
            }
        } else {
            VariantType::Indel
        }
    }
}
