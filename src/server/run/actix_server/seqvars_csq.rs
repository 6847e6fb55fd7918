//! Implementation of endpoint `/api/v1/seqvars/csq`.

use actix_web::{
    get,
    web::{self, Data, Json, Path},
};

use crate::{common::GenomeRelease, model::TranscriptAnnotation};

use super::{versions::VersionsInfoResponse, CustomError};

/// Query parameters of the `/api/v1/seqvars/csq` endpoint.
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
pub(crate) struct SeqvarsCsqQuery {
    /// The assembly.
    pub genome_release: GenomeRelease,
    /// Chromosome name.
    pub chromosome: String,
    /// 1-based position as in VCF.
    pub position: i32,
    /// Reference allele as in VCF.
    pub reference: String,
    /// Alternative allele as in VCF.
    pub alternative: String,
    /// Optionally, the HGNC ID of the gene to limit to.
    pub hgnc_id: Option<String>,
}

/// Response of the `/api/v1/seqvars/csq` endpoint.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub(crate) struct SeqvarsCsqResponse {
    /// Version information.
    pub version: VersionsInfoResponse,
    /// The original query records.
    pub query: SeqvarsCsqQuery,
    /// The transcript annotations, most severe first.
    pub result: Vec<TranscriptAnnotation>,
}

/// Query for consequence of a variant.
#[allow(clippy::unused_async)]
#[utoipa::path(
    get,
    operation_id = "seqvarsCsq",
    params(
        SeqvarsCsqQuery
    ),
    responses(
        (status = 200, description = "Seqvars consequence information.", body = SeqvarsCsqResponse),
        (status = 500, description = "Internal server error.", body = CustomError)
    )
)]
#[get("/api/v1/seqvars/csq")]
async fn handle(
    data: Data<super::WebServerData>,
    _path: Path<()>,
    query: web::Query<SeqvarsCsqQuery>,
) -> actix_web::Result<Json<SeqvarsCsqResponse>, CustomError> {
    let SeqvarsCsqQuery {
        genome_release,
        chromosome,
        position,
        reference,
        alternative,
        hgnc_id,
    } = query.clone().into_inner();

    let service = data.service(genome_release)?;
    let result = service
        .annotate_variant(&chromosome, position, &reference, &alternative)
        .annotations
        .into_iter()
        .filter(|annotation| match hgnc_id.as_ref() {
            // Skip if HGNC gene ID is given but does not match.
            Some(hgnc_id) => annotation.hgnc_id.as_ref() == Some(hgnc_id),
            None => true,
        })
        .collect();

    let result = SeqvarsCsqResponse {
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

    #[actix_web::test]
    async fn missense() -> Result<(), anyhow::Error> {
        let resp = call(
            "/api/v1/seqvars/csq?genome_release=grch37&chromosome=1&position=1054\
            &reference=G&alternative=A",
        )
        .await?;
        assert!(resp.status().is_success());
        let response: SeqvarsCsqResponse = actix_web::test::read_body_json(resp).await;

        assert_eq!(response.query.position, 1054);
        assert_eq!(response.result.len(), 1);
        assert_eq!(
            response.result[0].variant_effect(),
            VariantEffect::MissenseVariant
        );
        assert_eq!(response.result[0].gene_symbol.as_deref(), Some("TEST1"));
        assert_eq!(response.version.data.len(), 1);

        Ok(())
    }

    #[actix_web::test]
    async fn hgnc_id_filter() -> Result<(), anyhow::Error> {
        for (hgnc_id, expected) in [("HGNC:1", 1), ("HGNC:2", 0)] {
            let resp = call(&format!(
                "/api/v1/seqvars/csq?genome_release=grch37&chromosome=1&position=1054\
                &reference=G&alternative=A&hgnc_id={}",
                hgnc_id
            ))
            .await?;
            let response: SeqvarsCsqResponse = actix_web::test::read_body_json(resp).await;
            assert_eq!(response.result.len(), expected, "hgnc_id = {}", hgnc_id);
        }

        Ok(())
    }

    #[actix_web::test]
    async fn unsupported_release() -> Result<(), anyhow::Error> {
        let resp = call(
            "/api/v1/seqvars/csq?genome_release=grch38&chromosome=1&position=1054\
            &reference=G&alternative=A",
        )
        .await?;
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );

        Ok(())
    }
}
