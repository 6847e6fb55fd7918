use std::{collections::HashMap, path::PathBuf, sync::Arc};

use crate::genome::{service::AnnotationService, txs::TranscriptProvider};

/// Implementation of Actix server.
pub mod actix_server;

/// Module with OpenAPI documentation.
pub mod openapi {
    use crate::common::GenomeRelease;
    use crate::model::{PutativeImpact, Rank, TranscriptAnnotation, VariantEffect, VariantType};
    use crate::server::run::actix_server::seqvars_csq::{SeqvarsCsqQuery, SeqvarsCsqResponse};
    use crate::server::run::actix_server::strucvars_csq::{
        StrucvarsCsqQuery, StrucvarsCsqResponse,
    };
    use crate::server::run::actix_server::versions::{
        DataVersionEntry, SoftwareVersions, VersionsInfoResponse,
    };

    use super::actix_server::{seqvars_csq, strucvars_csq, versions, CustomError};

    /// Utoipa-based `OpenAPI` generation helper.
    #[derive(utoipa::OpenApi)]
    #[openapi(
        paths(versions::handle, seqvars_csq::handle, strucvars_csq::handle,),
        components(schemas(
            CustomError,
            VersionsInfoResponse,
            SoftwareVersions,
            DataVersionEntry,
            GenomeRelease,
            SeqvarsCsqQuery,
            SeqvarsCsqResponse,
            StrucvarsCsqQuery,
            StrucvarsCsqResponse,
            TranscriptAnnotation,
            VariantEffect,
            PutativeImpact,
            VariantType,
            Rank,
        ))
    )]
    pub struct ApiDoc;
}

/// Command line arguments for `server run` command.
#[derive(clap::Parser, Debug)]
#[command(about = "Run exomiser web server", long_about = None)]
pub struct Args {
    /// Paths to transcript database JSON files, at most one per genome release.
    #[arg(long, required = true)]
    pub path_transcripts: Vec<PathBuf>,

    /// Directory with static files served below `/resources`.
    #[arg(long)]
    pub path_resources: Option<PathBuf>,

    /// Maximal size of uploaded VCF files in bytes.
    #[arg(long, default_value_t = actix_server::MAX_UPLOAD_SIZE)]
    pub max_upload_size: usize,

    /// Whether to suppress printing hints.
    #[arg(long, default_value_t = false)]
    pub suppress_hints: bool,

    /// IP to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    pub listen_host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    pub listen_port: u16,
}

/// Print some hints via `tracing::info!`.
fn print_hints(args: &Args, data: &actix_server::WebServerData) {
    tracing::info!(
        "Launching server main on http://{}:{} ...",
        args.listen_host.as_str(),
        args.listen_port
    );

    // Short-circuit if no hints are to be
    if args.suppress_hints {
        return;
    }

    let prefix = format!(
        "try: http://{host}:{port}/",
        host = args.listen_host,
        port = args.listen_port
    );
    tracing::info!("{}", prefix);
    tracing::info!("{}swagger-ui/", prefix);
    tracing::info!("{}api/v1/versionsInfo", prefix);
    for genome_release in data.genome_releases() {
        let release = serde_json::to_value(genome_release)
            .ok()
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();
        tracing::info!(
            "{}api/v1/seqvars/csq?genome_release={}&chromosome=17&position=41245466\
            &reference=G&alternative=A",
            prefix,
            release
        );
        tracing::info!(
            "{}api/v1/strucvars/csq?genome_release={}&chromosome=17&start=41196312\
            &stop=41277500&sv_type=DEL",
            prefix,
            release
        );
    }
}

/// Load the transcript databases into one annotation service per genome release.
pub fn load_releases(
    paths: &[PathBuf],
) -> Result<HashMap<crate::common::GenomeRelease, actix_server::ReleaseData>, anyhow::Error> {
    let mut result = HashMap::new();
    for path in paths {
        if !path.exists() {
            tracing::warn!("No transcript database found at {}", path.display());
            continue;
        }
        tracing::info!("  - loading {}", path.display());
        let provider = TranscriptProvider::load(path)?;
        let genome_release = provider.genome_release();
        if result.contains_key(&genome_release) {
            anyhow::bail!(
                "more than one transcript database given for {}",
                genome_release.name()
            );
        }
        tracing::info!(
            "  - {} transcripts for {}",
            provider.transcript_count(),
            genome_release.name()
        );
        result.insert(
            genome_release,
            actix_server::ReleaseData {
                path_transcripts: path.clone(),
                service: AnnotationService::new(Arc::new(provider)),
            },
        );
    }
    Ok(result)
}

/// Main entry point for `server run` sub command.
///
/// # Errors
///
/// In the case that there is an error running the server.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("args_common = {:?}", &args_common);
    tracing::info!("args = {:?}", &args);

    if let Some(log::Level::Trace | log::Level::Debug) = args_common.verbose.log_level() {
        // Set before the worker threads are spawned.
        std::env::set_var("RUST_LOG", "debug");
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    // Load data that we need for running the server.
    tracing::info!("Loading data...");
    let before_loading = std::time::Instant::now();
    let releases = load_releases(&args.path_transcripts)?;
    if releases.is_empty() {
        anyhow::bail!("no transcript database could be loaded");
    }
    let data = actix_server::WebServerData {
        releases,
        max_upload_size: args.max_upload_size,
    };
    tracing::info!("... done loading data {:?}", before_loading.elapsed());

    // Print the server URL and some hints (the latter: unless suppressed).
    print_hints(args, &data);
    // Launch the Actix web server.
    actix_server::main(args, actix_web::web::Data::new(data))?;

    tracing::info!("All done. Have a nice day!");
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::GenomeRelease;

    #[test]
    fn load_releases_skips_missing() -> Result<(), anyhow::Error> {
        let releases = load_releases(&[
            PathBuf::from("tests/data/txs/txs.json"),
            PathBuf::from("tests/data/txs/does-not-exist.json"),
        ])?;
        assert_eq!(
            releases.keys().copied().collect::<Vec<_>>(),
            vec![GenomeRelease::Grch37]
        );

        Ok(())
    }

    #[test]
    fn load_releases_duplicate_release() {
        let result = load_releases(&[
            PathBuf::from("tests/data/txs/txs.json"),
            PathBuf::from("tests/data/txs/txs.json"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn openapi_paths() {
        use utoipa::OpenApi as _;

        let doc = openapi::ApiDoc::openapi();
        let mut paths = doc.paths.paths.keys().cloned().collect::<Vec<_>>();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                "/api/v1/seqvars/csq",
                "/api/v1/strucvars/csq",
                "/api/v1/versionsInfo"
            ]
        );
    }
}
