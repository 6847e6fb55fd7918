//! Parsing of the HGNC complete set into a gene identifier table.

use std::path::Path;

use super::{Resource, ResourceParser};
use crate::common::io::{open_read_maybe_gz, open_write_maybe_gz};

/// One gene of the HGNC complete set, only the columns that are used.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HgncRecord {
    pub hgnc_id: String,
    pub symbol: String,
    #[serde(default)]
    pub entrez_id: Option<u32>,
    #[serde(default)]
    pub ensembl_gene_id: Option<String>,
}

/// Read the approved genes of the HGNC complete set TSV file.
pub fn read_hgnc(path: &Path) -> Result<Vec<HgncRecord>, anyhow::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(open_read_maybe_gz(path)?);
    let headers = reader.headers()?.clone();
    let status_idx = headers.iter().position(|header| header == "status");

    let mut result = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(idx) = status_idx {
            if record.get(idx) != Some("Approved") {
                continue;
            }
        }
        let record: HgncRecord = record.deserialize(Some(&headers))?;
        result.push(record);
    }
    tracing::debug!("Read {} genes from {}", result.len(), path.display());
    Ok(result)
}

/// Writes the `hgnc_id`, `symbol`, `entrez_id`, and `ensembl_gene_id` columns of approved genes.
#[derive(Debug, Default, Clone)]
pub struct HgncResourceParser {}

impl ResourceParser for HgncResourceParser {
    fn parse(&self, resource: &Resource, in_dir: &Path, out_dir: &Path) -> Result<(), anyhow::Error> {
        let genes = read_hgnc(&resource.input_path(in_dir))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(open_write_maybe_gz(resource.output_path(out_dir))?);
        for gene in &genes {
            writer.serialize(gene)?;
        }
        writer.flush()?;
        Ok(())
    }
}
