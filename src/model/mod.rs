//! Domain model of variants, their annotations and the analysed sample.

pub mod allele;
pub mod annotation;
pub mod effect;
pub mod sample;
pub mod variant;
pub mod variant_type;

pub use allele::{AllelePosition, ConfidenceInterval};
pub use annotation::{Rank, TranscriptAnnotation};
pub use effect::{PutativeImpact, VariantEffect};
pub use sample::SampleData;
pub use variant::{Variant, VariantCoordinates, VariantEvaluation};
pub use variant_type::VariantType;
