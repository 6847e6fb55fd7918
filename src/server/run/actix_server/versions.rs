use actix_web::{
    get,
    web::{self, Data, Json, Path},
};

use crate::common::GenomeRelease;

use super::CustomError;

/// Software version specification.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct SoftwareVersions {
    /// Version of `exomiser`.
    pub exomiser: String,
    /// Version of the `noodles` crate used for reading VCF.
    pub noodles: Option<String>,
}

impl SoftwareVersions {
    /// Create a new `SoftwareVersions` instance.
    pub fn new() -> Self {
        let exomiser = crate::built_info::PKG_VERSION.to_string();
        let noodles = crate::built_info::DEPENDENCIES
            .iter()
            .find(|(name, _)| name == &"noodles")
            .map(|(_, version)| version.to_string());

        Self { exomiser, noodles }
    }
}

impl Default for SoftwareVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// Specification of data version for a given genome release.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct DataVersionEntry {
    /// Genome release for which the data version is specified.
    pub genome_release: GenomeRelease,
    /// Version of the transcript database, if any.
    pub version_transcripts: Option<String>,
    /// Number of transcripts in the database.
    pub transcript_count: usize,
}

/// Response of the `/api/v1/versionsInfo` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct VersionsInfoResponse {
    /// Software versions specification.
    pub software: SoftwareVersions,
    /// Data versions specification.
    pub data: Vec<DataVersionEntry>,
}

impl VersionsInfoResponse {
    /// Create a new `VersionsInfoResponse` instance from the given `WebServerData`.
    pub fn from_web_server_data(data: &super::WebServerData) -> Result<Self, anyhow::Error> {
        let software = SoftwareVersions::new();
        let data = data
            .genome_releases()
            .into_iter()
            .map(|genome_release| {
                let service = data.service(genome_release).map_err(|e| anyhow::anyhow!("{}", e))?;
                Ok(DataVersionEntry {
                    genome_release,
                    version_transcripts: service.data_version(),
                    transcript_count: service.transcript_count(),
                })
            })
            .collect::<Result<Vec<_>, anyhow::Error>>()?;

        Ok(Self { software, data })
    }
}

/// Query for the software and data versions.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "versionsInfo",
    responses(
        (status = 200, description = "Version information.", body = VersionsInfoResponse),
        (status = 500, description = "Internal server error.", body = CustomError)
    )
)]
#[get("/api/v1/versionsInfo")]
async fn handle(
    data: Data<super::WebServerData>,
    _path: Path<()>,
    _query: web::Query<()>,
) -> actix_web::Result<Json<VersionsInfoResponse>, CustomError> {
    Ok(Json(
        VersionsInfoResponse::from_web_server_data(data.into_inner().as_ref())
            .map_err(|e| CustomError::new(anyhow::anyhow!("Problem determining version: {}", e)))?,
    ))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::server::run::actix_server::test::data;

    #[actix_web::test]
    async fn versions_info() -> Result<(), anyhow::Error> {
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(data()?)
                .configure(super::super::configure),
        )
        .await;
        let req = actix_web::test::TestRequest::get()
            .uri("/api/v1/versionsInfo")
            .to_request();
        let response: VersionsInfoResponse = actix_web::test::call_and_read_body_json(&app, req).await;

        assert_eq!(response.software.exomiser, crate::built_info::PKG_VERSION);
        assert_eq!(
            response.data,
            vec![DataVersionEntry {
                genome_release: GenomeRelease::Grch37,
                version_transcripts: Some(String::from("test")),
                transcript_count: 4,
            }]
        );

        Ok(())
    }
}
