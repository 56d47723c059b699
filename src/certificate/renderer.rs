//! The certificate request pipeline.
//!
//! Prerequisites (approved application, configured template) are checked
//! before anything is drawn, so a refused request never yields partial bytes.
//! Decoding, QR encoding and PDF serialisation run on the blocking pool.

use chrono::NaiveDate;
use uuid::Uuid;

use super::assets::{DecodedAssets, EmbeddedImage};
use super::font_metrics::body_text_width;
use super::layout::{compose, ComposeInput, ImageLookup, ImageSource, LAYOUT};
use super::model::{ApplicationRecord, CertificateVerification, VillageDocumentSet};
use super::qr::QrPayload;
use super::template::{substitute, CertificateContext};
use super::text_layout::wrap_text;
use super::{certificate_filename, pdf, CertificateError, RenderedCertificate};
use crate::db::CertificateStore;

/// Rasters available to one certificate.
#[derive(Debug, Default)]
pub struct CertificateImages {
    pub assets: DecodedAssets,
    pub qr: Option<EmbeddedImage>,
}

impl ImageLookup for CertificateImages {
    fn image(&self, source: ImageSource) -> Option<&EmbeddedImage> {
        match source {
            ImageSource::Asset(role) => self.assets.get(role),
            ImageSource::Qr => self.qr.as_ref(),
        }
    }
}

/// Renders the certificate for `application` from already-fetched inputs.
pub fn build_certificate(
    application: &ApplicationRecord,
    template: &str,
    documents: &VillageDocumentSet,
    date: NaiveDate,
) -> Result<RenderedCertificate, CertificateError> {
    let context = CertificateContext::new(application, date);

    let body = substitute(template, &context);
    let body_lines = wrap_text(
        &body,
        body_text_width,
        LAYOUT.content_width(),
        LAYOUT.body_font_size,
    );
    log::debug!(
        "certificate {} body wrapped into {} lines",
        context.application_number,
        body_lines.len()
    );

    let images = CertificateImages {
        assets: DecodedAssets::decode(documents),
        qr: Some(QrPayload::from_context(&context).to_image()?),
    };

    let ops = compose(&ComposeInput {
        context: &context,
        body_lines: &body_lines,
        images: &images,
    });
    let pdf = pdf::render(&LAYOUT, &ops, &images)?;

    Ok(RenderedCertificate {
        filename: certificate_filename(&context.application_number),
        application_number: context.application_number,
        pdf,
    })
}

/// Fetches everything for `application_id` and renders its certificate.
pub async fn render_certificate(
    store: &dyn CertificateStore,
    application_id: &str,
    date: NaiveDate,
) -> Result<RenderedCertificate, CertificateError> {
    let id = Uuid::parse_str(application_id.trim()).map_err(|_| {
        log::debug!("application id '{}' is not a UUID", application_id);
        CertificateError::NotFoundOrUnapproved
    })?;

    let application = store
        .find_approved_application(&id)
        .await?
        .filter(ApplicationRecord::is_renderable)
        .ok_or(CertificateError::NotFoundOrUnapproved)?;

    let template = store
        .find_template(&application.village_id)
        .await?
        .ok_or(CertificateError::TemplateNotConfigured)?;

    let documents = store
        .find_village_documents(&application.village_id)
        .await?
        .unwrap_or_default();

    tokio::task::spawn_blocking(move || {
        build_certificate(&application, &template, &documents, date)
    })
    .await?
}

/// Looks up the data a scanned QR code should match.
pub async fn verify_certificate(
    store: &dyn CertificateStore,
    application_number: &str,
    date: NaiveDate,
) -> Result<CertificateVerification, CertificateError> {
    let application = store
        .find_approved_by_number(application_number.trim())
        .await?
        .filter(ApplicationRecord::is_renderable)
        .ok_or(CertificateError::NotFoundOrUnapproved)?;

    let payload = QrPayload::from_context(&CertificateContext::new(&application, date));
    Ok(CertificateVerification {
        application_number: payload.application_number,
        applicant_name: payload.applicant_name,
        relation: payload.relation,
        post_office: payload.post_office,
        police_station: payload.police_station,
        village: payload.village,
        status: application.status,
    })
}
