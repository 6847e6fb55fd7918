//! Building of the disease-gene table from OMIM and HGNC.

use std::path::Path;

use rustc_hash::FxHashMap;

use super::{
    hgnc::{read_hgnc, HgncRecord},
    mim2gene::{read_mim2gene, MimEntryType},
    resource_parser, ResourceGroup, ResourceGroupParser, ResourceStatus,
};
use crate::common::io::open_write_maybe_gz;

/// Name of the output file in the output directory.
pub const DISEASE_GENE_FILE_NAME: &str = "disease_gene.tsv";

const HGNC_RESOURCE: &str = "hgnc";
const MIM2GENE_RESOURCE: &str = "mim2gene";

/// Association of an OMIM disease with a gene.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DiseaseGeneRecord {
    /// Disease identifier, e.g., `OMIM:604370`.
    pub disease_id: String,
    pub disease_type: MimEntryType,
    /// Identifier of the gene entry, e.g., `OMIM:113705`.
    pub gene_mim_id: Option<String>,
    pub entrez_id: u32,
    pub gene_symbol: Option<String>,
    pub hgnc_id: Option<String>,
}

/// Joins the OMIM phenotype entries of `mim2gene.txt` with the HGNC genes by Entrez ID.
#[derive(Debug, Default, Clone)]
pub struct DiseaseGeneResourceGroupParser {}

impl DiseaseGeneResourceGroupParser {
    fn build_records(
        group: &ResourceGroup,
        in_dir: &Path,
    ) -> Result<Vec<DiseaseGeneRecord>, anyhow::Error> {
        let (Some(hgnc), Some(mim2gene)) = (
            group.resource(HGNC_RESOURCE),
            group.resource(MIM2GENE_RESOURCE),
        ) else {
            anyhow::bail!("resources of group {} are incomplete", &group.name);
        };
        let genes = read_hgnc(&hgnc.input_path(in_dir))?;
        let entries = read_mim2gene(&mim2gene.input_path(in_dir))?;

        let gene_by_entrez = genes
            .iter()
            .filter_map(|gene| gene.entrez_id.map(|id| (id, gene)))
            .collect::<FxHashMap<u32, &HgncRecord>>();
        let gene_mim_by_entrez = entries
            .iter()
            .filter(|entry| {
                matches!(
                    entry.entry_type,
                    MimEntryType::Gene | MimEntryType::GenePhenotype
                )
            })
            .filter_map(|entry| entry.entrez_id.map(|id| (id, entry.mim_number)))
            .collect::<FxHashMap<u32, u32>>();

        let mut result = entries
            .iter()
            .filter(|entry| entry.entry_type.is_phenotype())
            .filter_map(|entry| {
                let entrez_id = entry.entrez_id?;
                let gene = gene_by_entrez.get(&entrez_id);
                Some(DiseaseGeneRecord {
                    disease_id: format!("OMIM:{}", entry.mim_number),
                    disease_type: entry.entry_type,
                    gene_mim_id: gene_mim_by_entrez
                        .get(&entrez_id)
                        .map(|mim| format!("OMIM:{}", mim)),
                    entrez_id,
                    gene_symbol: gene
                        .map(|gene| gene.symbol.clone())
                        .or_else(|| entry.symbol.clone()),
                    hgnc_id: gene.map(|gene| gene.hgnc_id.clone()),
                })
            })
            .collect::<Vec<_>>();
        result.sort_by(|a, b| {
            (&a.disease_id, a.entrez_id).cmp(&(&b.disease_id, b.entrez_id))
        });
        Ok(result)
    }
}

impl ResourceGroupParser for DiseaseGeneResourceGroupParser {
    fn name(&self) -> &'static str {
        "DiseaseGeneResourceGroupParser"
    }

    fn parse_resources(
        &self,
        group: &mut ResourceGroup,
        in_dir: &Path,
        out_dir: &Path,
    ) -> Result<(), anyhow::Error> {
        if [HGNC_RESOURCE, MIM2GENE_RESOURCE]
            .iter()
            .any(|name| group.resource(name).is_none())
        {
            self.log_resource_missing(&group.name, self.name());
            return Ok(());
        }
        for name in [HGNC_RESOURCE, MIM2GENE_RESOURCE] {
            if let Some(resource) = group.resource_mut(name) {
                resource_parser(resource.parser).parse_resource(resource, in_dir, out_dir);
            }
        }
        if group
            .resources()
            .any(|resource| resource.status != ResourceStatus::Success)
        {
            tracing::error!(
                "Not building {} as resources of group {} failed",
                DISEASE_GENE_FILE_NAME,
                &group.name
            );
            return Ok(());
        }

        let records = Self::build_records(group, in_dir)?;
        let path = out_dir.join(DISEASE_GENE_FILE_NAME);
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(open_write_maybe_gz(&path)?);
        for record in &records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        tracing::info!(
            "Wrote {} disease-gene associations to {}",
            records.len(),
            path.display()
        );

        Ok(())
    }
}
