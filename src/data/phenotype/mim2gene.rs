//! Parsing of the OMIM `mim2gene.txt` file.

use std::path::Path;

use parse_display::{Display, FromStr};

use super::{Resource, ResourceParser};
use crate::common::io::{open_read_maybe_gz, open_write_maybe_gz};

/// Type of an OMIM entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    FromStr,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum MimEntryType {
    #[display("gene")]
    #[serde(rename = "gene")]
    Gene,
    #[display("phenotype")]
    #[serde(rename = "phenotype")]
    Phenotype,
    #[display("gene/phenotype")]
    #[serde(rename = "gene/phenotype")]
    GenePhenotype,
    #[display("predominantly phenotypes")]
    #[serde(rename = "predominantly phenotypes")]
    PredominantlyPhenotypes,
    #[display("moved/removed")]
    #[serde(rename = "moved/removed")]
    MovedRemoved,
}

impl MimEntryType {
    /// Whether the entry describes a phenotype.
    pub fn is_phenotype(&self) -> bool {
        matches!(
            self,
            MimEntryType::Phenotype
                | MimEntryType::GenePhenotype
                | MimEntryType::PredominantlyPhenotypes
        )
    }
}

/// One line of `mim2gene.txt`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Mim2GeneRecord {
    pub mim_number: u32,
    pub entry_type: MimEntryType,
    pub entrez_id: Option<u32>,
    pub symbol: Option<String>,
    pub ensembl_gene_id: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Read all entries of the tab-separated `mim2gene.txt` file.
pub fn read_mim2gene(path: &Path) -> Result<Vec<Mim2GeneRecord>, anyhow::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .from_reader(open_read_maybe_gz(path)?);

    let mut result = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mim_number = record
            .get(0)
            .unwrap_or_default()
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("invalid MIM number in {:?}: {}", &record, e))?;
        let entry_type = record
            .get(1)
            .unwrap_or_default()
            .parse::<MimEntryType>()
            .map_err(|e| anyhow::anyhow!("invalid MIM entry type in {:?}: {}", &record, e))?;
        let entrez_id = non_empty(record.get(2))
            .map(|value| value.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("invalid Entrez ID in {:?}: {}", &record, e))?;
        result.push(Mim2GeneRecord {
            mim_number,
            entry_type,
            entrez_id,
            symbol: non_empty(record.get(3)),
            ensembl_gene_id: non_empty(record.get(4)),
        });
    }
    tracing::debug!("Read {} OMIM entries from {}", result.len(), path.display());
    Ok(result)
}

/// Writes the OMIM entries that are linked to a gene.
#[derive(Debug, Default, Clone)]
pub struct Mim2GeneResourceParser {}

impl ResourceParser for Mim2GeneResourceParser {
    fn parse(&self, resource: &Resource, in_dir: &Path, out_dir: &Path) -> Result<(), anyhow::Error> {
        let entries = read_mim2gene(&resource.input_path(in_dir))?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_writer(open_write_maybe_gz(resource.output_path(out_dir))?);
        for entry in entries.iter().filter(|entry| entry.entrez_id.is_some()) {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[rstest::rstest]
    #[case("gene", MimEntryType::Gene, false)]
    #[case("gene/phenotype", MimEntryType::GenePhenotype, true)]
    #[case("predominantly phenotypes", MimEntryType::PredominantlyPhenotypes, true)]
    #[case("moved/removed", MimEntryType::MovedRemoved, false)]
    fn entry_type(#[case] text: &str, #[case] expected: MimEntryType, #[case] is_phenotype: bool) {
        let entry_type = text.parse::<MimEntryType>().unwrap();
        assert_eq!(entry_type, expected);
        assert_eq!(entry_type.is_phenotype(), is_phenotype);
        assert_eq!(entry_type.to_string(), text);
    }

    #[test]
    fn read() -> Result<(), anyhow::Error> {
        let entries = read_mim2gene(Path::new("tests/data/phenotype/mim2gene.txt"))?;
        assert_eq!(entries.len(), 8);
        assert_eq!(
            entries[2],
            Mim2GeneRecord {
                mim_number: 100640,
                entry_type: MimEntryType::Gene,
                entrez_id: Some(216),
                symbol: Some(String::from("ALDH1A1")),
                ensembl_gene_id: Some(String::from("ENSG00000165092")),
            }
        );
        assert_eq!(entries[0].entrez_id, None);
        assert_eq!(entries[0].symbol, None);

        Ok(())
    }
}
