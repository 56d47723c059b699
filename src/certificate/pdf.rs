//! printpdf backend: replays [`DrawOp`]s onto a single page.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Px, Rgb,
};
use thiserror::Error;

use super::font_metrics::FontFace;
use super::layout::{DrawOp, ImageLookup, LayoutConstants, Rect};

const PT_TO_MM: f32 = 0.352_777_78;
const DOCUMENT_TITLE: &str = "No Objection Certificate";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to load font: {0}")]
    Font(String),
    #[error("failed to serialize PDF: {0}")]
    Save(String),
}

fn mm(points: f32) -> Mm {
    Mm(points * PT_TO_MM)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
        }
    }
}

fn stroke_rect(layer: &PdfLayerReference, rect: &Rect, stroke_width: f32) {
    let corners = [
        (rect.x, rect.y),
        (rect.x + rect.width, rect.y),
        (rect.x + rect.width, rect.y + rect.height),
        (rect.x, rect.y + rect.height),
    ];
    let points = corners
        .iter()
        .map(|&(x, y)| (Point::new(mm(x), mm(y)), false))
        .collect();

    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(stroke_width);
    layer.add_line(Line {
        points,
        is_closed: true,
    });
}

fn place_image(layer: &PdfLayerReference, image: &super::assets::EmbeddedImage, rect: &Rect) {
    if image.width == 0 || image.height == 0 {
        return;
    }

    let xobject = ImageXObject {
        width: Px(image.width as usize),
        height: Px(image.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: image.rgb.clone(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    };

    // At 72 DPI one pixel is one point, so the scale maps pixels onto the box.
    Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(mm(rect.x)),
            translate_y: Some(mm(rect.y)),
            scale_x: Some(rect.width / image.width as f32),
            scale_y: Some(rect.height / image.height as f32),
            dpi: Some(72.0),
            ..Default::default()
        },
    );
}

/// Draws `ops` on one page of `layout`'s size and returns the PDF bytes.
pub fn render<I: ImageLookup>(
    layout: &LayoutConstants,
    ops: &[DrawOp],
    images: &I,
) -> Result<Vec<u8>, PdfError> {
    let (doc, page, layer) = PdfDocument::new(
        DOCUMENT_TITLE,
        mm(layout.page_width),
        mm(layout.page_height),
        "Certificate",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PdfError::Font(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PdfError::Font(e.to_string()))?,
    };

    for op in ops {
        match op {
            DrawOp::StrokeRect { rect, stroke_width } => stroke_rect(&layer, rect, *stroke_width),
            DrawOp::Text {
                text,
                x,
                y,
                size,
                font,
            } => {
                layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
                layer.use_text(text.as_str(), *size, mm(*x), mm(*y), fonts.get(*font));
            }
            DrawOp::Image { source, rect } => match images.image(*source) {
                Some(image) => place_image(&layer, image, rect),
                None => log::debug!("no raster for {:?}, skipping", source),
            },
        }
    }

    let mut bytes = Vec::new();
    {
        let mut writer = BufWriter::new(&mut bytes);
        doc.save(&mut writer)
            .map_err(|e| PdfError::Save(e.to_string()))?;
    }
    Ok(bytes)
}
