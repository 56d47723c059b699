//! Page geometry and the pure composition stage.
//!
//! `compose` turns resolved certificate data into a list of [`DrawOp`]s in
//! PDF user space (points, origin bottom-left). Nothing here touches the PDF
//! library; `pdf::render` replays the ops.

use serde::{Deserialize, Serialize};

use super::assets::EmbeddedImage;
use super::font_metrics::FontFace;
use super::model::AssetRole;
use super::template::CertificateContext;

pub const TITLE_TEXT: &str = "TO WHOM IT MAY CONCERN";
pub const SIGNATORY_ROLE: &str = "Headman/Secretary";

/// Axis-aligned box, `x`/`y` at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Largest box with `aspect` (width / height) that fits inside `self`,
    /// centred.
    pub fn fit_centered(&self, aspect: f32) -> Rect {
        if !(aspect.is_finite() && aspect > 0.0) {
            return *self;
        }
        let (width, height) = if aspect > self.width / self.height {
            (self.width, self.width / aspect)
        } else {
            (self.height * aspect, self.height)
        };
        Rect::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }
}

/// Fixed certificate geometry, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstants {
    pub page_width: f32,
    pub page_height: f32,
    pub border_inset: f32,
    pub border_stroke: f32,
    pub letterhead_width: f32,
    pub letterhead_height: f32,
    pub letterhead_top_margin: f32,
    pub header_title_size: f32,
    pub header_title_y: f32,
    pub header_subtitle_size: f32,
    pub header_subtitle_y: f32,
    pub meta_size: f32,
    pub meta_y: f32,
    pub meta_left_x: f32,
    pub meta_right_inset: f32,
    pub title_size: f32,
    pub title_y: f32,
    pub body_font_size: f32,
    pub body_line_height: f32,
    pub body_left_margin: f32,
    pub body_start_y: f32,
    pub qr_x: f32,
    pub qr_y: f32,
    pub qr_size: f32,
    pub signature_right_inset: f32,
    pub signature_y: f32,
    pub signature_width: f32,
    pub signature_height: f32,
    pub signatory_size: f32,
    pub signatory_line_height: f32,
    pub signatory_top_y: f32,
    pub seal_size: f32,
    pub seal_x: f32,
    pub round_seal_right_inset: f32,
    pub seal_y: f32,
}

pub const LAYOUT: LayoutConstants = LayoutConstants {
    page_width: 595.28,
    page_height: 841.89,
    border_inset: 30.0,
    border_stroke: 3.0,
    letterhead_width: 300.0,
    letterhead_height: 120.0,
    letterhead_top_margin: 50.0,
    header_title_size: 18.0,
    header_title_y: 841.89 - 90.0,
    header_subtitle_size: 12.0,
    header_subtitle_y: 841.89 - 112.0,
    meta_size: 12.0,
    meta_y: 841.89 - 195.0,
    meta_left_x: 60.0,
    meta_right_inset: 160.0,
    title_size: 16.0,
    title_y: 841.89 - 240.0,
    body_font_size: 14.0,
    body_line_height: 20.0,
    body_left_margin: 60.0,
    body_start_y: 841.89 - 280.0,
    qr_x: 60.0,
    qr_y: 120.0,
    qr_size: 80.0,
    signature_right_inset: 220.0,
    signature_y: 160.0,
    signature_width: 120.0,
    signature_height: 50.0,
    signatory_size: 11.0,
    signatory_line_height: 15.0,
    signatory_top_y: 145.0,
    seal_size: 60.0,
    seal_x: 80.0,
    round_seal_right_inset: 140.0,
    seal_y: 50.0,
};

impl LayoutConstants {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.body_left_margin
    }

    pub fn border(&self) -> Rect {
        Rect::new(
            self.border_inset,
            self.border_inset,
            self.page_width - 2.0 * self.border_inset,
            self.page_height - 2.0 * self.border_inset,
        )
    }

    pub fn letterhead_box(&self) -> Rect {
        Rect::new(
            (self.page_width - self.letterhead_width) / 2.0,
            self.page_height - self.letterhead_top_margin - self.letterhead_height,
            self.letterhead_width,
            self.letterhead_height,
        )
    }

    pub fn qr_box(&self) -> Rect {
        Rect::new(self.qr_x, self.qr_y, self.qr_size, self.qr_size)
    }

    pub fn signature_box(&self) -> Rect {
        Rect::new(
            self.page_width - self.signature_right_inset,
            self.signature_y,
            self.signature_width,
            self.signature_height,
        )
    }

    pub fn seal_box(&self) -> Rect {
        Rect::new(self.seal_x, self.seal_y, self.seal_size, self.seal_size)
    }

    pub fn round_seal_box(&self) -> Rect {
        Rect::new(
            self.page_width - self.round_seal_right_inset,
            self.seal_y,
            self.seal_size,
            self.seal_size,
        )
    }

    /// Baseline of body line `index`, counted from zero.
    pub fn body_line_y(&self, index: usize) -> f32 {
        self.body_start_y - index as f32 * self.body_line_height
    }

    fn centered_x(&self, text: &str, font: FontFace, size: f32) -> f32 {
        (self.page_width - font.text_width(text, size)) / 2.0
    }
}

/// Which raster an image op refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    Asset(AssetRole),
    Qr,
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    StrokeRect {
        rect: Rect,
        stroke_width: f32,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        font: FontFace,
    },
    Image {
        source: ImageSource,
        rect: Rect,
    },
}

/// Dimensions of the rasters available to `compose`, used only for fitting.
pub trait ImageLookup {
    fn image(&self, source: ImageSource) -> Option<&EmbeddedImage>;
}

/// Everything the compositor reads.
pub struct ComposeInput<'a, I: ImageLookup> {
    pub context: &'a CertificateContext,
    pub body_lines: &'a [String],
    pub images: &'a I,
}

fn text(text: impl Into<String>, x: f32, y: f32, size: f32, font: FontFace) -> DrawOp {
    DrawOp::Text {
        text: text.into(),
        x,
        y,
        size,
        font,
    }
}

fn draw_frame(ops: &mut Vec<DrawOp>, layout: &LayoutConstants) {
    ops.push(DrawOp::StrokeRect {
        rect: layout.border(),
        stroke_width: layout.border_stroke,
    });
}

fn draw_header<I: ImageLookup>(
    ops: &mut Vec<DrawOp>,
    layout: &LayoutConstants,
    context: &CertificateContext,
    images: &I,
) {
    let letterhead = ImageSource::Asset(AssetRole::Letterhead);
    if let Some(image) = images.image(letterhead) {
        ops.push(DrawOp::Image {
            source: letterhead,
            rect: layout.letterhead_box().fit_centered(image.aspect_ratio()),
        });
        return;
    }

    let heading = format!("{} VILLAGE AUTHORITY", context.village_name.to_uppercase());
    let address = format!(
        "{} District - {}, {}",
        context.district, context.pin_code, context.state
    );
    ops.push(text(
        heading.as_str(),
        layout.centered_x(&heading, FontFace::Bold, layout.header_title_size),
        layout.header_title_y,
        layout.header_title_size,
        FontFace::Bold,
    ));
    ops.push(text(
        address.as_str(),
        layout.centered_x(&address, FontFace::Regular, layout.header_subtitle_size),
        layout.header_subtitle_y,
        layout.header_subtitle_size,
        FontFace::Regular,
    ));
}

fn draw_meta(ops: &mut Vec<DrawOp>, layout: &LayoutConstants, context: &CertificateContext) {
    ops.push(text(
        format!("Rf. No. {}", context.application_number),
        layout.meta_left_x,
        layout.meta_y,
        layout.meta_size,
        FontFace::Regular,
    ));
    ops.push(text(
        context.date.as_str(),
        layout.page_width - layout.meta_right_inset,
        layout.meta_y,
        layout.meta_size,
        FontFace::Regular,
    ));
}

fn draw_title(ops: &mut Vec<DrawOp>, layout: &LayoutConstants) {
    ops.push(text(
        TITLE_TEXT,
        layout.centered_x(TITLE_TEXT, FontFace::Bold, layout.title_size),
        layout.title_y,
        layout.title_size,
        FontFace::Bold,
    ));
}

fn draw_body(ops: &mut Vec<DrawOp>, layout: &LayoutConstants, lines: &[String]) {
    for (index, line) in lines.iter().enumerate() {
        ops.push(text(
            line.as_str(),
            layout.body_left_margin,
            layout.body_line_y(index),
            layout.body_font_size,
            FontFace::Regular,
        ));
    }
}

fn draw_qr<I: ImageLookup>(ops: &mut Vec<DrawOp>, layout: &LayoutConstants, images: &I) {
    if images.image(ImageSource::Qr).is_some() {
        ops.push(DrawOp::Image {
            source: ImageSource::Qr,
            rect: layout.qr_box(),
        });
    }
}

fn draw_signature_block<I: ImageLookup>(
    ops: &mut Vec<DrawOp>,
    layout: &LayoutConstants,
    context: &CertificateContext,
    images: &I,
) {
    let signature = ImageSource::Asset(AssetRole::Signature);
    let sig_box = layout.signature_box();
    if images.image(signature).is_some() {
        ops.push(DrawOp::Image {
            source: signature,
            rect: sig_box,
        });
    }

    let lines = [
        SIGNATORY_ROLE.to_string(),
        context.admin_name.clone(),
        format!("Secretary, {} Village", context.village_name),
    ];
    for (index, line) in lines.into_iter().enumerate() {
        ops.push(text(
            line,
            sig_box.x,
            layout.signatory_top_y - index as f32 * layout.signatory_line_height,
            layout.signatory_size,
            FontFace::Regular,
        ));
    }
}

fn draw_seals<I: ImageLookup>(ops: &mut Vec<DrawOp>, layout: &LayoutConstants, images: &I) {
    let seals = [
        (AssetRole::Seal, layout.seal_box()),
        (AssetRole::RoundSeal, layout.round_seal_box()),
    ];
    for (role, rect) in seals {
        let source = ImageSource::Asset(role);
        if images.image(source).is_some() {
            ops.push(DrawOp::Image { source, rect });
        }
    }
}

/// Lays out a full certificate page.
pub fn compose<I: ImageLookup>(input: &ComposeInput<'_, I>) -> Vec<DrawOp> {
    let layout = &LAYOUT;
    let mut ops = Vec::with_capacity(16 + input.body_lines.len());

    draw_frame(&mut ops, layout);
    draw_header(&mut ops, layout, input.context, input.images);
    draw_meta(&mut ops, layout, input.context);
    draw_title(&mut ops, layout);
    draw_body(&mut ops, layout, input.body_lines);
    draw_qr(&mut ops, layout, input.images);
    draw_signature_block(&mut ops, layout, input.context, input.images);
    draw_seals(&mut ops, layout, input.images);

    ops
}
