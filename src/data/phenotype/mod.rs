//! Processing of the resource files that the phenotype data is built from.
//!
//! Resources are downloaded files (e.g., the HGNC complete set) that are parsed into tab-separated
//! tables.  Resources that must be combined form a resource group that is processed by a group
//! parser.

use std::path::{Path, PathBuf};

use clap::Parser;
use indexmap::IndexMap;

use crate::common::io::open_read_maybe_gz;

pub mod disease_gene;
pub mod hgnc;
pub mod mim2gene;

/// Processing status of a resource.
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
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    #[default]
    Unprocessed,
    Success,
    ParseError,
    FileNotFound,
}

/// The parsers available for single resources.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceParserKind {
    Hgnc,
    Mim2gene,
}

/// The parsers available for resource groups.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceGroupParserKind {
    DiseaseGene,
}

/// A resource file and its processing status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Resource {
    pub name: String,
    /// Name of the input file in the input directory.
    pub file_name: String,
    /// Name of the processed file in the output directory.
    pub parsed_file_name: String,
    pub parser: ResourceParserKind,
    /// Name of the group that the resource belongs to, if any.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default, skip_deserializing)]
    pub status: ResourceStatus,
}

impl Resource {
    pub fn input_path(&self, in_dir: &Path) -> PathBuf {
        in_dir.join(&self.file_name)
    }

    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.parsed_file_name)
    }
}

/// Parses a single resource into its processed file.
pub trait ResourceParser {
    /// Parse the resource from `in_dir` and write the result to `out_dir`.
    fn parse(&self, resource: &Resource, in_dir: &Path, out_dir: &Path) -> Result<(), anyhow::Error>;

    /// Parse the resource and record the outcome in its status.
    fn parse_resource(&self, resource: &mut Resource, in_dir: &Path, out_dir: &Path) {
        let input_path = resource.input_path(in_dir);
        if !input_path.exists() {
            tracing::error!(
                "Resource {} not found at {}",
                &resource.name,
                input_path.display()
            );
            resource.status = ResourceStatus::FileNotFound;
            return;
        }
        resource.status = match self.parse(resource, in_dir, out_dir) {
            Ok(()) => ResourceStatus::Success,
            Err(e) => {
                tracing::error!("Problem parsing resource {}: {}", &resource.name, e);
                ResourceStatus::ParseError
            }
        };
        tracing::info!("Parsed resource {}: {}", &resource.name, resource.status);
    }
}

/// Return the parser for the given kind.
pub fn resource_parser(kind: ResourceParserKind) -> Box<dyn ResourceParser> {
    match kind {
        ResourceParserKind::Hgnc => Box::new(hgnc::HgncResourceParser::default()),
        ResourceParserKind::Mim2gene => Box::new(mim2gene::Mim2GeneResourceParser::default()),
    }
}

/// Resources that are processed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    pub name: String,
    pub parser: ResourceGroupParserKind,
    resources: IndexMap<String, Resource>,
}

impl ResourceGroup {
    pub fn new(name: &str, parser: ResourceGroupParserKind) -> Self {
        Self {
            name: name.to_string(),
            parser,
            resources: IndexMap::new(),
        }
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.name.clone(), resource);
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn resource_mut(&mut self, name: &str) -> Option<&mut Resource> {
        self.resources.get_mut(name)
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }
}

/// Parses the resources of a group into combined output.
pub trait ResourceGroupParser {
    /// Name of the parser for log messages.
    fn name(&self) -> &'static str;

    /// Parse the resources of `group`, updating their status.
    fn parse_resources(
        &self,
        group: &mut ResourceGroup,
        in_dir: &Path,
        out_dir: &Path,
    ) -> Result<(), anyhow::Error>;

    fn log_resource_missing(&self, group_name: &str, parser_name: &str) {
        tracing::error!(
            "MISSING RESOURCE for {} data required by {} - check this is defined in resource configuration.",
            group_name,
            parser_name
        );
    }
}

/// Return the group parser for the given kind.
pub fn resource_group_parser(kind: ResourceGroupParserKind) -> Box<dyn ResourceGroupParser> {
    match kind {
        ResourceGroupParserKind::DiseaseGene => {
            Box::new(disease_gene::DiseaseGeneResourceGroupParser::default())
        }
    }
}

/// Configuration of a resource group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GroupConfig {
    pub name: String,
    pub parser: ResourceGroupParserKind,
}

/// The resource configuration as read from YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

impl ResourceConfig {
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let reader = open_read_maybe_gz(path.as_ref())?;
        let config: Self = serde_yaml::from_reader(reader).map_err(|e| {
            anyhow::anyhow!("problem parsing resource config {:?}: {}", path.as_ref(), e)
        })?;
        if let Some(resource) = config
            .resources
            .iter()
            .find(|resource| resource.group.is_some() && config.group(resource).is_none())
        {
            anyhow::bail!(
                "resource {} refers to undefined group {:?}",
                &resource.name,
                &resource.group
            );
        }
        Ok(config)
    }

    fn group(&self, resource: &Resource) -> Option<&GroupConfig> {
        self.groups
            .iter()
            .find(|group| Some(&group.name) == resource.group.as_ref())
    }

    /// Split into resource groups and the resources not in any group.
    pub fn into_groups(self) -> (Vec<ResourceGroup>, Vec<Resource>) {
        let mut groups = self
            .groups
            .iter()
            .map(|group| ResourceGroup::new(&group.name, group.parser))
            .collect::<Vec<_>>();
        let mut ungrouped = Vec::new();
        for resource in self.resources {
            match groups
                .iter_mut()
                .find(|group| Some(&group.name) == resource.group.as_ref())
            {
                Some(group) => group.add_resource(resource),
                None => ungrouped.push(resource),
            }
        }
        (groups, ungrouped)
    }
}

/// Process all configured resources, returning them with their final status.
pub fn process_resources(
    config: ResourceConfig,
    in_dir: &Path,
    out_dir: &Path,
) -> Result<Vec<Resource>, anyhow::Error> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| anyhow::anyhow!("could not create output directory {:?}: {}", out_dir, e))?;
    let (groups, ungrouped) = config.into_groups();

    let mut result = Vec::new();
    for mut group in groups {
        tracing::info!("Processing resource group {}", &group.name);
        resource_group_parser(group.parser).parse_resources(&mut group, in_dir, out_dir)?;
        result.extend(group.resources().cloned());
    }
    for mut resource in ungrouped {
        resource_parser(resource.parser).parse_resource(&mut resource, in_dir, out_dir);
        result.push(resource);
    }
    Ok(result)
}

/// Command line arguments for `data phenotype` sub command.
#[derive(Parser, Debug)]
#[command(about = "Process phenotype resource files", long_about = None)]
pub struct Args {
    /// Path to the resource configuration YAML file.
    #[arg(long)]
    pub path_config: PathBuf,
    /// Directory with the downloaded resource files.
    #[arg(long)]
    pub path_in: PathBuf,
    /// Directory to write the processed files to.
    #[arg(long)]
    pub path_out: PathBuf,
}

/// Main entry point for `data phenotype` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    let config = ResourceConfig::load(&args.path_config)?;
    let resources = process_resources(config, &args.path_in, &args.path_out)?;

    let failed = resources
        .iter()
        .filter(|resource| resource.status != ResourceStatus::Success)
        .collect::<Vec<_>>();
    for resource in &failed {
        tracing::warn!("Resource {} was not processed: {}", &resource.name, resource.status);
    }
    if !failed.is_empty() {
        anyhow::bail!("{} of {} resources failed", failed.len(), resources.len());
    }
    tracing::info!("Processed {} resources", resources.len());

    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use temp_testdir::TempDir;

    use super::*;

    const PATH_CONFIG: &str = "tests/data/phenotype/resources.yaml";
    const PATH_IN: &str = "tests/data/phenotype";

    #[test]
    fn load_config() -> Result<(), anyhow::Error> {
        let config = ResourceConfig::load(PATH_CONFIG)?;
        assert_eq!(config.resources.len(), 2);
        assert_eq!(config.resources[0].parser, ResourceParserKind::Hgnc);
        assert_eq!(config.resources[0].status, ResourceStatus::Unprocessed);

        let (groups, ungrouped) = config.into_groups();
        assert!(ungrouped.is_empty());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "disease_gene");
        assert!(groups[0].resource("hgnc").is_some());
        assert!(groups[0].resource("mim2gene").is_some());

        Ok(())
    }

    #[test]
    fn load_config_undefined_group() {
        let temp = TempDir::default();
        let path = temp.join("config.yaml");
        std::fs::write(
            &path,
            "resources:\n  - name: hgnc\n    file_name: hgnc.tsv\n    parsed_file_name: out.tsv\n    \
             parser: hgnc\n    group: missing\n",
        )
        .unwrap();
        assert!(ResourceConfig::load(&path).is_err());
    }

    #[test]
    fn parse_resource_file_not_found() {
        let temp = TempDir::default();
        let mut resource = Resource {
            name: String::from("hgnc"),
            file_name: String::from("does-not-exist.tsv"),
            parsed_file_name: String::from("hgnc_genes.tsv"),
            parser: ResourceParserKind::Hgnc,
            group: None,
            status: ResourceStatus::Unprocessed,
        };
        resource_parser(resource.parser).parse_resource(&mut resource, Path::new(PATH_IN), &temp);
        assert_eq!(resource.status, ResourceStatus::FileNotFound);
    }

    #[test]
    fn process_resources() -> Result<(), anyhow::Error> {
        let temp = TempDir::default();
        let config = ResourceConfig::load(PATH_CONFIG)?;
        let resources = super::process_resources(config, Path::new(PATH_IN), &temp)?;

        let status = resources
            .iter()
            .map(|resource| (resource.name.as_str(), resource.status))
            .collect::<Vec<_>>();
        assert_eq!(
            status,
            vec![
                ("hgnc", ResourceStatus::Success),
                ("mim2gene", ResourceStatus::Success)
            ]
        );
        assert!(temp.join("hgnc_genes.tsv").exists());
        assert!(temp.join("mim2gene.tsv").exists());
        assert!(temp.join("disease_gene.tsv").exists());

        Ok(())
    }
}
