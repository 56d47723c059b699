//! Decoding of village image assets stored as base64 data URLs.
//!
//! Each asset decodes independently. A broken asset is logged and dropped so
//! the certificate still renders without it.

use base64::Engine;
use image::{DynamicImage, ImageFormat, Rgba};
use thiserror::Error;

use super::model::{AssetRole, VillageDocumentSet};

/// Why a single asset could not be embedded.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("data URL is malformed")]
    MalformedDataUrl,
    #[error("unsupported image type '{0}'")]
    UnsupportedMime(String),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image payload is empty")]
    Empty,
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Raster ready for embedding: RGB8 pixels with alpha flattened onto white.
#[derive(Clone, PartialEq)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl std::fmt::Debug for EmbeddedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgb.len())
            .finish()
    }
}

impl EmbeddedImage {
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);

        for Rgba([r, g, b, a]) in rgba.pixels().copied() {
            let alpha = a as f32 / 255.0;
            for channel in [r, g, b] {
                let blended = channel as f32 * alpha + 255.0 * (1.0 - alpha);
                rgb.push(blended.round() as u8);
            }
        }

        Self { width, height, rgb }
    }

    /// Decodes encoded image bytes of a known format.
    pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<Self, DecodeFailure> {
        if bytes.is_empty() {
            return Err(DecodeFailure::Empty);
        }
        let image = image::load_from_memory_with_format(bytes, format)?;
        Ok(Self::from_dynamic(&image))
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

fn image_format_for(mime: &str) -> Result<ImageFormat, DecodeFailure> {
    match mime.trim().to_ascii_lowercase().as_str() {
        "image/png" => Ok(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Ok(ImageFormat::Jpeg),
        other => Err(DecodeFailure::UnsupportedMime(other.to_string())),
    }
}

/// Decodes a `data:image/png;base64,...` or `data:image/jpeg;base64,...` URL.
pub fn decode_data_url(data_url: &str) -> Result<EmbeddedImage, DecodeFailure> {
    let rest = data_url
        .trim()
        .strip_prefix("data:")
        .ok_or(DecodeFailure::MalformedDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(DecodeFailure::MalformedDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(DecodeFailure::MalformedDataUrl)?;
    let format = image_format_for(mime)?;

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD.decode(compact.as_bytes())?;

    EmbeddedImage::decode(&bytes, format)
}

/// The village images that decoded successfully.
#[derive(Debug, Clone, Default)]
pub struct DecodedAssets {
    pub letterhead: Option<EmbeddedImage>,
    pub signature: Option<EmbeddedImage>,
    pub seal: Option<EmbeddedImage>,
    pub round_seal: Option<EmbeddedImage>,
}

impl DecodedAssets {
    pub fn decode(documents: &VillageDocumentSet) -> Self {
        let mut decoded = Self::default();
        for role in AssetRole::ALL {
            let Some(data_url) = documents.get(role) else {
                continue;
            };
            match decode_data_url(data_url) {
                Ok(image) => {
                    log::debug!(
                        "decoded {} asset ({}x{})",
                        role.as_str(),
                        image.width,
                        image.height
                    );
                    *decoded.slot_mut(role) = Some(image);
                }
                Err(e) => {
                    log::warn!("skipping {} asset: {}", role.as_str(), e);
                }
            }
        }
        decoded
    }

    pub fn get(&self, role: AssetRole) -> Option<&EmbeddedImage> {
        match role {
            AssetRole::Letterhead => self.letterhead.as_ref(),
            AssetRole::Signature => self.signature.as_ref(),
            AssetRole::Seal => self.seal.as_ref(),
            AssetRole::RoundSeal => self.round_seal.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: AssetRole) -> &mut Option<EmbeddedImage> {
        match role {
            AssetRole::Letterhead => &mut self.letterhead,
            AssetRole::Signature => &mut self.signature,
            AssetRole::Seal => &mut self.seal,
            AssetRole::RoundSeal => &mut self.round_seal,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageBuffer, RgbaImage};
    use std::io::Cursor;

    pub(crate) fn png_data_url(width: u32, height: u32) -> String {
        let img: RgbaImage = ImageBuffer::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }

    #[test]
    fn test_decode_png_data_url() {
        let image = decode_data_url(&png_data_url(4, 2)).unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.rgb.len(), 4 * 2 * 3);
        assert_eq!(&image.rgb[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_transparent_pixels_become_white() {
        let img: RgbaImage = ImageBuffer::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
        let embedded = EmbeddedImage::from_dynamic(&DynamicImage::ImageRgba8(img));
        assert_eq!(embedded.rgb, vec![255, 255, 255]);
    }

    #[test]
    fn test_rejects_unsupported_mime() {
        let err = decode_data_url("data:image/gif;base64,R0lGODlh").unwrap_err();
        assert!(matches!(err, DecodeFailure::UnsupportedMime(ref m) if m == "image/gif"));
    }

    #[test]
    fn test_rejects_malformed_urls() {
        assert!(matches!(
            decode_data_url("image/png;base64,AAAA"),
            Err(DecodeFailure::MalformedDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64"),
            Err(DecodeFailure::MalformedDataUrl)
        ));
        assert!(matches!(
            decode_data_url("data:image/png,AAAA"),
            Err(DecodeFailure::MalformedDataUrl)
        ));
    }

    #[test]
    fn test_rejects_bad_base64_and_corrupt_streams() {
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@not-base64@@"),
            Err(DecodeFailure::Base64(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/jpeg;base64,aGVsbG8gd29ybGQ="),
            Err(DecodeFailure::Image(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,"),
            Err(DecodeFailure::Empty)
        ));
    }

    #[test]
    fn test_one_bad_asset_does_not_affect_others() {
        let documents = VillageDocumentSet {
            letterhead: Some("data:image/png;base64,corrupt!!".to_string()),
            signature: Some(png_data_url(3, 3)),
            seal: None,
            round_seal: Some(png_data_url(2, 2)),
        };

        let decoded = DecodedAssets::decode(&documents);

        assert!(decoded.letterhead.is_none());
        assert!(decoded.signature.is_some());
        assert!(decoded.seal.is_none());
        assert!(decoded.get(AssetRole::RoundSeal).is_some());
    }
}
