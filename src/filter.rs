//! Variant filters and the runner that applies them to the variants of a sample.

use std::{collections::BTreeSet, str::FromStr};

use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    IResult, Parser,
};

use crate::{
    genome::contig::{ReferenceDictionary, UNKNOWN_CHROMOSOME},
    model::{SampleData, Variant, VariantCoordinates, VariantEffect, VariantEvaluation},
};

/// Identifies a filter in the filter results of a variant.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    utoipa::ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    Quality,
    VariantEffect,
    Interval,
}

/// A filter deciding whether a single variant is kept.
pub trait VariantFilter: Send + Sync {
    fn filter_type(&self) -> FilterType;

    /// Human-readable description of the filter settings for the report.
    fn description(&self) -> String;

    /// Whether the variant passes the filter.
    fn run_filter(&self, variant: &VariantEvaluation) -> bool;
}

/// Removes variants below a minimal PHRED quality.
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct QualityFilter {
    min_quality: f64,
}

impl VariantFilter for QualityFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Quality
    }

    fn description(&self) -> String {
        format!("Minimum PHRED variant call quality: {:.1}", self.min_quality)
    }

    fn run_filter(&self, variant: &VariantEvaluation) -> bool {
        variant.phred_score() >= self.min_quality
    }
}

/// Removes variants by their most severe effect.
///
/// With `remove_off_exome`, intergenic, intronic, and up- or downstream variants are removed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantEffectFilter {
    off_target_effects: BTreeSet<VariantEffect>,
    remove_off_exome: bool,
}

impl VariantEffectFilter {
    pub fn new<I>(off_target_effects: I, remove_off_exome: bool) -> Self
    where
        I: IntoIterator<Item = VariantEffect>,
    {
        Self {
            off_target_effects: off_target_effects.into_iter().collect(),
            remove_off_exome,
        }
    }
}

impl VariantFilter for VariantEffectFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::VariantEffect
    }

    fn description(&self) -> String {
        let mut removed = self
            .off_target_effects
            .iter()
            .map(|effect| effect.to_string())
            .collect::<Vec<_>>();
        if self.remove_off_exome {
            removed.push(String::from("off-exome variants"));
        }
        if removed.is_empty() {
            String::from("Removed variant types: none")
        } else {
            format!("Removed variant types: {}", removed.join(", "))
        }
    }

    fn run_filter(&self, variant: &VariantEvaluation) -> bool {
        if self.remove_off_exome && variant.is_off_exome() {
            return false;
        }
        !self.off_target_effects.contains(&variant.variant_effect())
    }
}

/// A genomic interval with 1-based, inclusive coordinates, e.g., `chr1:1000-2000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct GeneticInterval {
    pub contig: String,
    pub start: i32,
    pub end: i32,
}

impl std::fmt::Display for GeneticInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}

impl GeneticInterval {
    fn parse(input: &str) -> IResult<&str, Self> {
        all_consuming((
            take_till1(|c: char| c == ':'),
            char(':'),
            map_res(digit1, str::parse::<i32>),
            char('-'),
            map_res(digit1, str::parse::<i32>),
        ))
        .map(|(contig, _, start, _, end)| GeneticInterval {
            contig: contig.to_string(),
            start,
            end,
        })
        .parse(input)
    }
}

impl FromStr for GeneticInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let interval = Self::parse(s.trim())
            .map(|(_, value)| value)
            .map_err(|e| anyhow::anyhow!("invalid interval {:?}: {}", s, e))?;
        if interval.start < 1 || interval.start > interval.end {
            anyhow::bail!("invalid interval {:?}: start must be in 1..=end", s);
        }
        Ok(interval)
    }
}

/// Keeps only variants overlapping a genomic interval.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalFilter {
    interval: GeneticInterval,
    contig_id: u32,
}

impl IntervalFilter {
    pub fn new(interval: GeneticInterval, dict: &ReferenceDictionary) -> Self {
        let contig_id = dict.contig_id(&interval.contig);
        Self {
            interval,
            contig_id,
        }
    }

    fn same_contig(&self, variant: &VariantEvaluation) -> bool {
        if self.contig_id == UNKNOWN_CHROMOSOME {
            variant.contig_name() == self.interval.contig
        } else {
            variant.contig_id() == self.contig_id
        }
    }
}

impl VariantFilter for IntervalFilter {
    fn filter_type(&self) -> FilterType {
        FilterType::Interval
    }

    fn description(&self) -> String {
        format!("Interval: {}", self.interval)
    }

    fn run_filter(&self, variant: &VariantEvaluation) -> bool {
        self.same_contig(variant)
            && variant.start() <= self.interval.end
            && variant.end() >= self.interval.start
    }
}

/// Outcome of running one filter over the variants of a sample.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct FilterReport {
    pub filter_type: FilterType,
    pub passed: usize,
    pub failed: usize,
    pub messages: Vec<String>,
}

/// Applies filters in order.
///
/// Each filter is only run on the variants that passed all previous filters.
#[derive(Default)]
pub struct FilterRunner {
    filters: Vec<Box<dyn VariantFilter>>,
}

impl FilterRunner {
    pub fn new(filters: Vec<Box<dyn VariantFilter>>) -> Self {
        Self { filters }
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn run(&self, sample_data: &mut SampleData) -> Vec<FilterReport> {
        let mut reports = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            let (mut passed, mut failed) = (0, 0);
            for variant in sample_data
                .variant_evaluations
                .iter_mut()
                .filter(|variant| variant.passed_filters())
            {
                let pass = filter.run_filter(variant);
                variant.add_filter_result(filter.filter_type(), pass);
                if pass {
                    passed += 1;
                } else {
                    failed += 1;
                }
            }
            tracing::info!(
                "Filter {}: {} passed, {} failed",
                filter.filter_type(),
                passed,
                failed
            );
            reports.push(FilterReport {
                filter_type: filter.filter_type(),
                passed,
                failed,
                messages: vec![filter.description()],
            });
        }
        reports
    }
}
