use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::{header, Method, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Local;
use log::{error, info};

use super::model::{CertificateVerification, GenerateCertificateRequest};
use super::{render_certificate, verify_certificate, CertificateError};
use crate::{AppState, ErrorResponse};

const GENERATION_FAILED: &str = "Failed to generate certificate";

fn error_response(err: &CertificateError) -> HttpResponse {
    let status = err.status_code();
    let message = err.to_string();
    let body = match status {
        StatusCode::NOT_FOUND => ErrorResponse::not_found(&message),
        StatusCode::BAD_REQUEST => ErrorResponse::bad_request(&message),
        _ => {
            error!("Certificate generation failed: {}", message);
            ErrorResponse::internal_error(GENERATION_FAILED, &message)
        }
    };
    HttpResponse::build(status).json(body)
}

/// Unreadable request bodies go down the same 500 path as any other failure.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let details = err.to_string();
    error!("Rejected certificate request body: {}", details);
    let response = HttpResponse::InternalServerError()
        .json(ErrorResponse::internal_error(GENERATION_FAILED, &details));
    InternalError::from_response(err, response).into()
}

#[utoipa::path(
    post,
    path = "/api/certificates/generate",
    tag = "Certificate",
    request_body = GenerateCertificateRequest,
    responses(
        (status = 200, description = "Base64 encoded PDF certificate", content_type = "application/pdf", body = String),
        (status = 400, description = "No template configured for the village", body = ErrorResponse),
        (status = 404, description = "Application not found or not approved", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn generate_certificate(
    state: web::Data<AppState>,
    body: web::Json<GenerateCertificateRequest>,
) -> impl Responder {
    info!("Generating certificate for application {}", body.application_id);

    let today = Local::now().date_naive();
    match render_certificate(state.store.as_ref(), &body.application_id, today).await {
        Ok(rendered) => {
            info!(
                "Certificate {} rendered ({} bytes)",
                rendered.application_number,
                rendered.pdf.len()
            );
            HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", rendered.filename),
                ))
                .insert_header(("Content-Transfer-Encoding", "base64"))
                .body(BASE64.encode(&rendered.pdf))
        }
        Err(e) => error_response(&e),
    }
}

/// Answers bare `OPTIONS` requests that carry no CORS preflight headers.
pub async fn certificate_preflight() -> impl Responder {
    HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"))
        .insert_header((
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            "authorization, x-client-info, apikey, content-type",
        ))
        .finish()
}

#[utoipa::path(
    get,
    path = "/api/certificates/verify/{application_number}",
    tag = "Certificate",
    params(
        ("application_number" = String, Path, description = "Application number printed on the certificate")
    ),
    responses(
        (status = 200, description = "Certificate is valid", body = CertificateVerification),
        (status = 404, description = "Application not found or not approved", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn verify_certificate_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let application_number = path.into_inner();
    info!("Verifying certificate {}", application_number);

    let today = Local::now().date_naive();
    match verify_certificate(state.store.as_ref(), &application_number, today).await {
        Ok(verification) => HttpResponse::Ok().json(verification),
        Err(e) => error_response(&e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/certificates/generate")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route(web::post().to(generate_certificate))
            .route(web::method(Method::OPTIONS).to(certificate_preflight)),
    )
    .service(
        web::resource("/certificates/verify/{application_number}")
            .route(web::get().to(verify_certificate_handler)),
    );
}
