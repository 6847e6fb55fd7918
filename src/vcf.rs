//! Reading of VCF files into annotated `VariantEvaluation`s.

use std::{io::BufRead, path::Path};

use noodles::vcf;
use noodles::vcf::variant::record_buf::info::field::{value::Array, Value};
use rayon::prelude::*;

use crate::{
    common::io::open_read_maybe_gz,
    genome::{bnd::parse_breakend_alt, service::AnnotationService},
    model::{
        variant::VariantEvaluationBuilder, AllelePosition, ConfidenceInterval, SampleData,
        VariantEvaluation, VariantType,
    },
};

/// One allele of a VCF record before annotation.
#[derive(Debug, Clone, PartialEq)]
struct RawAllele {
    contig: String,
    pos: i32,
    reference: String,
    alternative: String,
    quality: f64,
    svtype: Option<String>,
    end: Option<i32>,
    start_ci: ConfidenceInterval,
    end_ci: ConfidenceInterval,
}

/// Read and annotate the variants of a (optionally gzip-compressed) VCF file.
pub fn read_sample_data<P>(path: P, service: &AnnotationService) -> Result<SampleData, anyhow::Error>
where
    P: AsRef<Path>,
{
    tracing::info!("Reading variants from {:?}", path.as_ref());
    let reader = open_read_maybe_gz(path.as_ref())?;
    let mut sample_data = read_sample_data_from_reader(reader, service)?;
    sample_data.vcf_path = Some(path.as_ref().to_path_buf());
    Ok(sample_data)
}

/// Read and annotate the variants from VCF text, e.g., an upload.
pub fn read_sample_data_from_reader<R>(
    reader: R,
    service: &AnnotationService,
) -> Result<SampleData, anyhow::Error>
where
    R: BufRead,
{
    let mut reader = vcf::io::Reader::new(reader);
    let header = reader
        .read_header()
        .map_err(|e| anyhow::anyhow!("problem reading VCF header: {}", e))?;
    let sample_names = header
        .sample_names()
        .iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>();

    let mut alleles = Vec::new();
    let mut record = vcf::variant::RecordBuf::default();
    loop {
        let bytes_read = reader
            .read_record_buf(&header, &mut record)
            .map_err(|e| anyhow::anyhow!("problem reading VCF record: {}", e))?;
        if bytes_read == 0 {
            break; // EOF
        }
        alleles.extend(split_alleles(&record)?);
    }
    tracing::debug!("Read {} alleles, annotating", alleles.len());

    let variant_evaluations = alleles
        .par_iter()
        .map(|allele| annotate_allele(allele, service))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(
        "Annotated {} variants of {} samples",
        variant_evaluations.len(),
        sample_names.len()
    );

    Ok(SampleData {
        vcf_path: None,
        sample_names,
        variant_evaluations,
    })
}

fn info_string(record: &vcf::variant::RecordBuf, key: &str) -> Option<String> {
    match record.info().get(key) {
        Some(Some(Value::String(value))) => Some(value.clone()),
        _ => None,
    }
}

fn info_integer(record: &vcf::variant::RecordBuf, key: &str) -> Option<i32> {
    match record.info().get(key) {
        Some(Some(Value::Integer(value))) => Some(*value),
        _ => None,
    }
}

fn info_confidence_interval(
    record: &vcf::variant::RecordBuf,
    key: &str,
) -> Result<ConfidenceInterval, anyhow::Error> {
    match record.info().get(key) {
        Some(Some(Value::Array(Array::Integer(values)))) => {
            ConfidenceInterval::from_vcf_values(values)
        }
        _ => Ok(ConfidenceInterval::precise()),
    }
}

/// Split a multi-allelic record into one entry per alternative allele.
///
/// Spanning deletion (`*`) and missing (`.`) alleles are skipped.
fn split_alleles(record: &vcf::variant::RecordBuf) -> Result<Vec<RawAllele>, anyhow::Error> {
    let contig = record.reference_sequence_name().to_string();
    let pos: usize = record
        .variant_start()
        .ok_or_else(|| anyhow::anyhow!("missing position in VCF record on {}", &contig))?
        .into();
    let pos = i32::try_from(pos)
        .map_err(|e| anyhow::anyhow!("position {}:{} out of range: {}", &contig, pos, e))?;
    let quality = record.quality_score().map(f64::from).unwrap_or_default();
    let svtype = info_string(record, "SVTYPE");
    let end = info_integer(record, "END");
    let start_ci = info_confidence_interval(record, "CIPOS")?;
    let end_ci = info_confidence_interval(record, "CIEND")?;

    Ok(record
        .alternate_bases()
        .as_ref()
        .iter()
        .filter(|alt| {
            let keep = alt.as_str() != "*" && alt.as_str() != ".";
            if !keep {
                tracing::trace!("Skipping allele {} at {}:{}", alt, &contig, pos);
            }
            keep
        })
        .map(|alt| RawAllele {
            contig: contig.clone(),
            pos,
            reference: record.reference_bases().to_string(),
            alternative: alt.clone(),
            quality,
            svtype: svtype.clone(),
            end,
            start_ci,
            end_ci,
        })
        .collect())
}

/// Build and annotate the `VariantEvaluation` of one allele.
fn annotate_allele(
    allele: &RawAllele,
    service: &AnnotationService,
) -> Result<VariantEvaluation, anyhow::Error> {
    let contig_id = service.reference_dictionary().contig_id(&allele.contig);
    let builder = VariantEvaluationBuilder::default()
        .contig_id(contig_id)
        .contig_name(allele.contig.clone())
        .quality(allele.quality);

    let variant = if AllelePosition::is_symbolic(&allele.alternative) {
        let mut variant_type = VariantType::parse_allele(&allele.reference, &allele.alternative);
        if variant_type == VariantType::Symbolic {
            if let Some(svtype) = allele.svtype.as_deref() {
                variant_type = VariantType::from_svtype(svtype);
            }
        }
        let end = allele.end.unwrap_or(allele.pos);
        let (end_contig, end_pos) = match parse_breakend_alt(&allele.alternative) {
            Some(bnd) if variant_type == VariantType::Bnd => (bnd.mate_contig, bnd.mate_pos),
            _ => (allele.contig.clone(), end),
        };
        let annotations = service.annotate_structural_variant(
            variant_type,
            &allele.alternative,
            &allele.contig,
            allele.pos,
            allele.start_ci,
            &end_contig,
            end_pos,
            allele.end_ci,
        );
        builder
            .start(allele.pos)
            .end(end)
            .start_ci(allele.start_ci)
            .end_ci(allele.end_ci)
            .reference(allele.reference.clone())
            .alternative(allele.alternative.clone())
            .variant_type(variant_type)
            .annotations(annotations.annotations)
            .build()?
    } else {
        let trimmed = AllelePosition::trim(allele.pos, &allele.reference, &allele.alternative);
        let annotations = service.annotate_variant(
            &allele.contig,
            trimmed.pos,
            &trimmed.reference,
            &trimmed.alternative,
        );
        let ref_len = i32::try_from(trimmed.reference.len().max(1)).unwrap_or(i32::MAX);
        builder
            .start(trimmed.pos)
            .end(trimmed.pos.saturating_add(ref_len - 1))
            .variant_type(VariantType::parse_allele(
                &trimmed.reference,
                &trimmed.alternative,
            ))
            .reference(trimmed.reference)
            .alternative(trimmed.alternative)
            .annotations(annotations.annotations)
            .build()?
    };

    Ok(variant)
}
