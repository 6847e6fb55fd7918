//! Run the server.

use std::{collections::HashMap, path::PathBuf};

use actix_web::{web, ResponseError};
use utoipa::OpenApi as _;

use crate::{common::GenomeRelease, genome::service::AnnotationService};

pub mod seqvars_csq;
pub mod strucvars_csq;
pub mod versions;
pub mod views;

/// Default maximal size of uploads, 50 MB.
pub const MAX_UPLOAD_SIZE: usize = 50_000_000;

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct CustomError {
    err: String,
}

impl std::fmt::Display for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.err)
    }
}

impl CustomError {
    fn new(err: anyhow::Error) -> Self {
        CustomError {
            err: err.to_string(),
        }
    }
}

impl ResponseError for CustomError {}

/// The loaded data of one genome release.
#[derive(derivative::Derivative)]
#[derivative(Debug)]
pub struct ReleaseData {
    /// Path of the transcript database.
    pub path_transcripts: PathBuf,
    #[derivative(Debug = "ignore")]
    pub service: AnnotationService,
}

/// Data structure for the web server data.
#[derive(Default, Debug)]
pub struct WebServerData {
    /// The loaded data for each genome release.
    pub releases: HashMap<GenomeRelease, ReleaseData>,
    /// Maximal size of uploaded payloads.
    pub max_upload_size: usize,
}

impl WebServerData {
    /// The data for the given genome release.
    pub fn release(&self, genome_release: GenomeRelease) -> Result<&ReleaseData, CustomError> {
        self.releases.get(&genome_release).ok_or_else(|| {
            CustomError::new(anyhow::anyhow!(
                "genome release not supported: {:?}",
                genome_release
            ))
        })
    }

    /// The annotation service for the given genome release.
    pub fn service(&self, genome_release: GenomeRelease) -> Result<&AnnotationService, CustomError> {
        self.release(genome_release).map(|release| &release.service)
    }

    /// The supported genome releases, sorted.
    pub fn genome_releases(&self) -> Vec<GenomeRelease> {
        let mut result = self.releases.keys().copied().collect::<Vec<_>>();
        result.sort();
        result
    }
}

/// Register the views and endpoints of the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(views::index)
        .service(views::submit)
        .service(seqvars_csq::handle)
        .service(strucvars_csq::handle)
        .service(versions::handle);
}

/// Main entry point for running the REST server.
#[actix_web::main]
pub async fn main(
    args: &super::Args,
    data: actix_web::web::Data<WebServerData>,
) -> std::io::Result<()> {
    let max_upload_size = data.max_upload_size;
    let path_resources = args.path_resources.clone();
    actix_web::HttpServer::new(move || {
        let app = actix_web::App::new()
            .app_data(data.clone())
            .app_data(web::PayloadConfig::new(max_upload_size))
            .configure(configure)
            .service(
                utoipa_swagger_ui::SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", super::openapi::ApiDoc::openapi()),
            );
        let app = match path_resources.as_ref() {
            Some(path) => app.service(actix_files::Files::new("/resources", path)),
            None => app,
        };
        app.wrap(actix_web::middleware::Logger::default())
    })
    .bind((args.listen_host.as_str(), args.listen_port))?
    .run()
    .await
}
