use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::http::header::{self, HeaderName};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod certificate;
pub mod config;
pub mod db;

pub use crate::config::AppConfig;
pub use crate::db::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str, details: Option<&str>) -> Self {
        Self {
            error: error.to_string(),
            details: details.map(str::to_string),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new(message, None)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(message, None)
    }

    pub fn internal_error(message: &str, details: &str) -> Self {
        Self::new(message, Some(details))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::certificate::handlers::generate_certificate,
        crate::certificate::handlers::verify_certificate_handler,
        health
    ),
    components(
        schemas(
            certificate::model::GenerateCertificateRequest,
            certificate::model::CertificateVerification,
            certificate::model::ApplicationStatus,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Certificate", description = "Certificate rendering and verification."),
        (name = "Health", description = "Liveness probe.")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600)
}

/// Routes shared by the server and the integration tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::scope("/api").configure(certificate::handlers::config));
}

/// Opens the database pool behind the shared application state.
pub async fn connect_state(config: &AppConfig) -> anyhow::Result<web::Data<AppState>> {
    match AppState::new(config).await {
        Ok(state) => Ok(web::Data::new(state)),
        Err(e) => {
            log::error!("Failed to connect to database. Please check DATABASE_URL in .env and ensure the database is running. Error: {}", e);
            Err(anyhow::anyhow!("failed to connect to database: {}", e))
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let app_state = connect_state(&config).await?;

    let prometheus = PrometheusMetricsBuilder::new("village_certificate_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let origins = config.cors_allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(build_cors(&origins))
            .app_data(app_state.clone())
            .configure(configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
