//! Verification QR code printed on every certificate.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use thiserror::Error;

use super::assets::EmbeddedImage;
use super::template::CertificateContext;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("failed to encode QR payload: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("failed to write QR image: {0}")]
    Image(#[from] image::ImageError),
}

/// Fields encoded into the verification QR code.
#[derive(Debug, Clone, PartialEq)]
pub struct QrPayload {
    pub application_number: String,
    pub applicant_name: String,
    pub relation: String,
    pub post_office: String,
    pub police_station: String,
    pub village: String,
}

impl QrPayload {
    pub fn from_context(context: &CertificateContext) -> Self {
        Self {
            application_number: context.application_number.clone(),
            applicant_name: context.applicant_name.clone(),
            relation: context.relation.clone(),
            post_office: context.post_office.clone(),
            police_station: context.police_station.clone(),
            village: context.village_name.clone(),
        }
    }

    /// The text scanned from the code. Field order and labels are fixed.
    pub fn text(&self) -> String {
        format!(
            "NOC VERIFICATION\n\
             Application No: {}\n\
             Name: {}\n\
             Relation: {}\n\
             Post Office: {}\n\
             Police Station: {}\n\
             Village: {}",
            self.application_number,
            self.applicant_name,
            self.relation,
            self.post_office,
            self.police_station,
            self.village
        )
    }

    pub fn to_png(&self) -> Result<Vec<u8>, QrError> {
        let code = QrCode::new(self.text().as_bytes())?;
        let image = code.render::<Luma<u8>>().quiet_zone(true).build();

        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    pub fn to_image(&self) -> Result<EmbeddedImage, QrError> {
        let png = self.to_png()?;
        let image = image::load_from_memory_with_format(&png, ImageFormat::Png)?;
        Ok(EmbeddedImage::from_dynamic(&image))
    }
}
