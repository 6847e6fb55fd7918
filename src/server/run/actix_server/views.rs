//! HTML views: the submission page and the results of a submitted VCF.

use std::path::PathBuf;

use actix_web::{
    get,
    http::header::ContentType,
    post,
    web::{self, Data},
    HttpResponse,
};
use askama::Template;
use clap::ValueEnum as _;

use super::{CustomError, WebServerData};
use crate::{
    annotate::analyse,
    common::GenomeRelease,
    filter::GeneticInterval,
    settings::AnalysisSettingsBuilder,
    vcf::read_sample_data_from_reader,
    writer::{html::HtmlResultsWriter, OutputFormat, ResultsWriter},
};

/// Entry of the genome release selection.
struct ReleaseOption {
    value: String,
    name: String,
}

/// The submission page, see `templates/index.html`.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    exomiser_version: &'a str,
    max_upload_mb: usize,
    genome_releases: Vec<ReleaseOption>,
}

/// File name shown for submitted VCF text.
const SUBMITTED_VCF_NAME: &str = "submitted.vcf";

/// Query parameters of `POST /submit`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
struct SubmitQuery {
    /// Defaults to the first loaded genome release.
    pub genome_release: Option<GenomeRelease>,
    pub min_quality: Option<f64>,
    #[serde(default)]
    pub remove_off_exome: bool,
    /// Interval to restrict to, e.g., `1:1000-2000`.
    pub interval: Option<String>,
}

fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(body)
}

/// The submission page.
#[allow(clippy::unused_async)]
#[get("/")]
async fn index(data: Data<WebServerData>) -> actix_web::Result<HttpResponse, CustomError> {
    let template = IndexTemplate {
        exomiser_version: crate::common::version(),
        max_upload_mb: data.max_upload_size / 1_000_000,
        genome_releases: data
            .genome_releases()
            .into_iter()
            .filter_map(|genome_release| {
                genome_release
                    .to_possible_value()
                    .map(|value| ReleaseOption {
                        value: value.get_name().to_string(),
                        name: genome_release.name(),
                    })
            })
            .collect(),
    };
    let body = template
        .render()
        .map_err(|e| CustomError::new(anyhow::anyhow!("problem rendering index: {}", e)))?;

    Ok(html_response(body))
}

/// Annotate and filter the VCF text of the request body and return the HTML results.
#[allow(clippy::unused_async)]
#[post("/submit")]
async fn submit(
    data: Data<WebServerData>,
    query: web::Query<SubmitQuery>,
    body: String,
) -> actix_web::Result<HttpResponse, CustomError> {
    let query = query.into_inner();
    let genome_release = match query.genome_release {
        Some(genome_release) => genome_release,
        None => data.genome_releases().first().copied().ok_or_else(|| {
            CustomError::new(anyhow::anyhow!("no genome release loaded"))
        })?,
    };
    let release = data.release(genome_release)?;
    let interval = query
        .interval
        .as_deref()
        .filter(|interval| !interval.is_empty())
        .map(str::parse::<GeneticInterval>)
        .transpose()
        .map_err(CustomError::new)?;

    let settings = AnalysisSettingsBuilder::default()
        .vcf_path(PathBuf::from(SUBMITTED_VCF_NAME))
        .genome_release(genome_release)
        .transcripts_path(release.path_transcripts.clone())
        .output_formats(vec![OutputFormat::Html])
        .min_quality(query.min_quality)
        .remove_off_exome(query.remove_off_exome)
        .interval(interval)
        .build()
        .map_err(|e| CustomError::new(anyhow::anyhow!("invalid settings: {}", e)))?;

    tracing::info!(
        "Analysing submitted VCF of {} bytes for {}",
        body.len(),
        genome_release.name()
    );
    let sample_data = read_sample_data_from_reader(body.as_bytes(), &release.service)
        .map_err(|e| CustomError::new(anyhow::anyhow!("problem reading VCF: {}", e)))?;
    let results = analyse(sample_data, &settings, &release.service);
    let html = HtmlResultsWriter::default()
        .write_string(&results, &settings)
        .map_err(CustomError::new)?;

    Ok(html_response(html))
}

#[cfg(test)]
mod test {
    use actix_web::http::{header, StatusCode};
    use pretty_assertions::assert_eq;

    use crate::server::run::actix_server::test::data;

    #[actix_web::test]
    async fn index() -> Result<(), anyhow::Error> {
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(data()?)
                .configure(super::super::configure),
        )
        .await;
        let req = actix_web::test::TestRequest::get().uri("/").to_request();
        let resp = actix_web::test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/html; charset=utf-8")
        );
        let body = actix_web::test::read_body(resp).await;
        let body = std::str::from_utf8(&body)?;
        assert!(body.contains("<option value=\"grch37\">GRCh37</option>"));
        assert!(body.contains("limited to 50 MB"));
        assert!(!body.contains("{{"));
        assert!(!body.contains("{%"));

        Ok(())
    }

    #[actix_web::test]
    async fn submit() -> Result<(), anyhow::Error> {
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(data()?)
                .configure(super::super::configure),
        )
        .await;
        let req = actix_web::test::TestRequest::post()
            .uri("/submit?genome_release=grch37&min_quality=25")
            .set_payload(std::fs::read_to_string("tests/data/vcf/test.vcf")?)
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = actix_web::test::read_body(resp).await;
        let body = std::str::from_utf8(&body)?;
        assert!(body.contains("<title>Exomiser Analysis Results for submitted.vcf</title>"));
        assert!(body.contains("4 of 6 variants passed all filters."));

        Ok(())
    }

    #[actix_web::test]
    async fn submit_invalid() -> Result<(), anyhow::Error> {
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(data()?)
                .configure(super::super::configure),
        )
        .await;

        let req = actix_web::test::TestRequest::post()
            .uri("/submit")
            .set_payload(
                "##fileformat=VCFv4.2\n\
                #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
                1\tabc\t.\tA\tT\t.\tPASS\t.\n",
            )
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let req = actix_web::test::TestRequest::post()
            .uri("/submit?interval=1-100")
            .set_payload(std::fs::read_to_string("tests/data/vcf/test.vcf")?)
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        Ok(())
    }

    #[actix_web::test]
    async fn submit_too_large() -> Result<(), anyhow::Error> {
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(data()?)
                .app_data(actix_web::web::PayloadConfig::new(16))
                .configure(super::super::configure),
        )
        .await;
        let req = actix_web::test::TestRequest::post()
            .uri("/submit")
            .set_payload(std::fs::read_to_string("tests/data/vcf/test.vcf")?)
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        Ok(())
    }
}
