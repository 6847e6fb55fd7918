//! Implementation of endpoint `/api/v1/strucvars/csq`.

use actix_web::{
    get,
    web::{self, Data, Json, Path},
};

use crate::{
    common::GenomeRelease,
    model::{ConfidenceInterval, TranscriptAnnotation, VariantType},
};

use super::{versions::VersionsInfoResponse, CustomError};

/// Query parameters of the `/api/v1/strucvars/csq` endpoint.
#[serde_with::skip_serializing_none]
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    utoipa::IntoParams,
    utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub(crate) struct StrucvarsCsqQuery {
    /// The assembly.
    pub genome_release: GenomeRelease,
    /// Chromosome.
    pub chromosome: String,
    /// 1-based start position.
    pub start: i32,
    /// 1-based stop position, ignored for insertions and breakends.
    pub stop: Option<i32>,
    /// The variant type to use for annotation, e.g., `DEL` or `DEL_ME_ALU`.
    pub sv_type: VariantType,
    /// The alternative allele, required for `BND`, e.g., `N[17:198982[`.
    pub alternative: Option<String>,
}

impl StrucvarsCsqQuery {
    /// The alternative allele, the symbolic allele of the type if not given.
    fn alternative(&self) -> String {
        self.alternative
            .clone()
            .unwrap_or_else(|| format!("<{}>", self.sv_type.symbolic_id()))
    }

    fn stop(&self) -> i32 {
        match self.sv_type.base_type() {
            VariantType::Ins | VariantType::Bnd => self.start,
            _ => self.stop.unwrap_or(self.start),
        }
    }
}

/// Response of the `/api/v1/strucvars/csq` endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub(crate) struct StrucvarsCsqResponse {
    /// Version information.
    pub version: VersionsInfoResponse,
    /// The original query records.
    pub query: StrucvarsCsqQuery,
    /// The transcript annotations, most severe first.
    pub result: Vec<TranscriptAnnotation>,
}

/// Query for consequence of a structural variant.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "strucvarsCsq",
    params(
        StrucvarsCsqQuery
    ),
    responses(
        (status = 200, description = "Strucvars consequence information.", body = StrucvarsCsqResponse),
        (status = 500, description = "Internal server error.", body = CustomError)
    )
)]
#[get("/api/v1/strucvars/csq")]
async fn handle(
    data: Data<super::WebServerData>,
    _path: Path<()>,
    query: web::Query<StrucvarsCsqQuery>,
) -> actix_web::Result<Json<StrucvarsCsqResponse>, CustomError> {
    if !query.sv_type.is_structural() {
        return Err(CustomError::new(anyhow::anyhow!(
            "not a structural variant type: {}",
            query.sv_type
        )));
    }
    if query.sv_type.base_type() == VariantType::Bnd && query.alternative.is_none() {
        return Err(CustomError::new(anyhow::anyhow!(
            "the alternative allele is required for breakends"
        )));
    }

    let service = data.service(query.genome_release)?;
    let result = service
        .annotate_structural_variant(
            query.sv_type,
            &query.alternative(),
            &query.chromosome,
            query.start,
            ConfidenceInterval::precise(),
            &query.chromosome,
            query.stop(),
            ConfidenceInterval::precise(),
        )
        .annotations;

    let result = StrucvarsCsqResponse {
        version: VersionsInfoResponse::from_web_server_data(data.into_inner().as_ref())
            .map_err(|e| CustomError::new(anyhow::anyhow!("Problem determining version: {}", e)))?,
        query: query.into_inner(),
        result,
    };

    Ok(Json(result))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{model::VariantEffect, server::run::actix_server::test::data};

    async fn call(uri: &str) -> Result<actix_web::dev::ServiceResponse, anyhow::Error> {
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(data()?)
                .configure(super::super::configure),
        )
        .await;
        let req = actix_web::test::TestRequest::get().uri(uri).to_request();
        Ok(actix_web::test::call_service(&app, req).await)
    }

    #[test]
    fn query_defaults() {
        let query = StrucvarsCsqQuery {
            genome_release: GenomeRelease::Grch37,
            chromosome: String::from("1"),
            start: 1000,
            stop: Some(2000),
            sv_type: VariantType::DelMeAlu,
            alternative: None,
        };
        assert_eq!(query.alternative(), "<DEL:ME:ALU>");
        assert_eq!(query.stop(), 2000);

        let query = StrucvarsCsqQuery {
            sv_type: VariantType::Ins,
            ..query
        };
        assert_eq!(query.stop(), 1000);
    }

    #[actix_web::test]
    async fn deletion() -> Result<(), anyhow::Error> {
        let resp = call(
            "/api/v1/strucvars/csq?genome_release=grch37&chromosome=1&start=2050\
            &stop=2080&sv_type=DEL",
        )
        .await?;
        assert!(resp.status().is_success());
        let response: StrucvarsCsqResponse = actix_web::test::read_body_json(resp).await;

        assert_eq!(response.result.len(), 1);
        assert_eq!(
            response.result[0].variant_effect(),
            VariantEffect::ExonLossVariant
        );

        Ok(())
    }

    #[actix_web::test]
    async fn breakend_requires_alternative() -> Result<(), anyhow::Error> {
        let resp = call(
            "/api/v1/strucvars/csq?genome_release=grch37&chromosome=1&start=2050&sv_type=BND",
        )
        .await?;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );

        Ok(())
    }

    #[actix_web::test]
    async fn not_structural() -> Result<(), anyhow::Error> {
        let resp = call(
            "/api/v1/strucvars/csq?genome_release=grch37&chromosome=1&start=2050&sv_type=SNV",
        )
        .await?;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );

        Ok(())
    }
}
