//! Certificate rendering - turns an approved application, its village template
//! and the village's image assets into a single-page PDF.
//!
//! - `template` - placeholder substitution with field fallbacks
//! - `text_layout` - greedy word wrap over `font_metrics`
//! - `assets` - data-URL image decoding, tolerant of bad assets
//! - `qr` - verification QR payload
//! - `layout` - page geometry and pure draw instructions
//! - `pdf` - printpdf backend
//! - `renderer` - the request pipeline

pub mod assets;
pub mod font_metrics;
pub mod handlers;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod qr;
pub mod renderer;
pub mod template;
pub mod text_layout;

pub use renderer::{render_certificate, verify_certificate};

use actix_web::http::StatusCode;
use thiserror::Error;

use crate::db::StoreError;

/// Errors that end a certificate request.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("Application not found or not approved")]
    NotFoundOrUnapproved,
    #[error("No certificate template configured for this village")]
    TemplateNotConfigured,
    #[error("failed to load certificate data: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Qr(#[from] qr::QrError),
    #[error(transparent)]
    Pdf(#[from] pdf::PdfError),
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl CertificateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFoundOrUnapproved => StatusCode::NOT_FOUND,
            Self::TemplateNotConfigured => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Qr(_) | Self::Pdf(_) | Self::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// A finished certificate, owned by the request that produced it.
#[derive(Debug)]
pub struct RenderedCertificate {
    pub application_number: String,
    pub filename: String,
    pub pdf: Vec<u8>,
}

/// `certificate-{application_number}.pdf`, minus characters that would break
/// a quoted `Content-Disposition` filename.
pub fn certificate_filename(application_number: &str) -> String {
    let safe: String = application_number
        .trim()
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("certificate-{}.pdf", safe)
}
