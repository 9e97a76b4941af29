// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A `plotters` drawing backend producing a single-page vector PDF.
//!
//! One backend unit is one PDF point. Text is set in the standard Helvetica
//! font, which every PDF reader provides, so nothing is embedded. The file is
//! only written by `present`; a backend dropped before that leaves no file.

pub mod text;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use plotters_backend::text_anchor::{HPos, Pos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
    FontTransform,
};

use std::path::{Path, PathBuf};

const FONT: Name<'static> = Name(b"F1");
const FONT_NAME: Name<'static> = Name(b"Helvetica");
const ENCODING: Name<'static> = Name(b"WinAnsiEncoding");

// control point distance for a quarter circle drawn as a cubic bezier
const KAPPA: f32 = 0.552_284_7;

pub struct PdfBackend {
    path: PathBuf,
    size: (u32, u32),
    content: Content,
    saved: bool,
}

impl PdfBackend {
    pub fn new<P: AsRef<Path>>(path: P, size: (u32, u32)) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            size,
            content: Content::new(),
            saved: false,
        }
    }

    /// Serializes everything drawn so far into a complete document and
    /// resets the page.
    pub fn to_bytes(&mut self) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let font_id = Ref::new(4);
        let content_id = Ref::new(5);

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, self.size.0 as f32, self.size.1 as f32));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(FONT, font_id);
        page.finish();

        pdf.type1_font(font_id)
            .base_font(FONT_NAME)
            .encoding_predefined(ENCODING);

        let content = std::mem::replace(&mut self.content, Content::new());
        pdf.stream(content_id, &content.finish());

        pdf.finish()
    }

    fn x(&self, x: i32) -> f32 {
        x as f32
    }

    // backend coordinates grow downwards, PDF user space grows upwards
    fn y(&self, y: i32) -> f32 {
        self.size.1 as f32 - y as f32
    }

    fn set_stroke<S: BackendStyle>(&mut self, style: &S) -> bool {
        let color = style.color();
        if color.alpha == 0.0 {
            return false;
        }
        let (r, g, b) = blend(color);
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(style.stroke_width() as f32);
        true
    }

    fn set_fill(&mut self, color: BackendColor) -> bool {
        if color.alpha == 0.0 {
            return false;
        }
        let (r, g, b) = blend(color);
        self.content.set_fill_rgb(r, g, b);
        true
    }

    fn trace_path<I: IntoIterator<Item = BackendCoord>>(&mut self, path: I) -> usize {
        let mut count = 0;
        for (x, y) in path {
            let (px, py) = (self.x(x), self.y(y));
            if count == 0 {
                self.content.move_to(px, py);
            } else {
                self.content.line_to(px, py);
            }
            count += 1;
        }
        count
    }
}

/// Color as PDF RGB components, with alpha folded onto a white page.
fn blend(color: BackendColor) -> (f32, f32, f32) {
    let alpha = color.alpha.max(0.0).min(1.0) as f32;
    let channel = |c: u8| (c as f32 / 255.0) * alpha + (1.0 - alpha);
    (
        channel(color.rgb.0),
        channel(color.rgb.1),
        channel(color.rgb.2),
    )
}

/// Direction cosines of a text rotation, clockwise on screen.
fn rotation(transform: FontTransform) -> (f64, f64) {
    match transform {
        FontTransform::None => (1.0, 0.0),
        FontTransform::Rotate90 => (0.0, 1.0),
        FontTransform::Rotate180 => (-1.0, 0.0),
        FontTransform::Rotate270 => (0.0, -1.0),
    }
}

/// Offset from the anchor point to the start of the baseline, in the text's
/// own frame with y growing downwards.
fn anchor_offset(anchor: Pos, width: f64, size: f64) -> (f64, f64) {
    let dx = match anchor.h_pos {
        HPos::Left => 0.0,
        HPos::Center => -width / 2.0,
        HPos::Right => -width,
    };
    let dy = match anchor.v_pos {
        VPos::Top => size * text::ASCENT,
        VPos::Center => size * (text::ASCENT - text::DESCENT) / 2.0,
        VPos::Bottom => -size * text::DESCENT,
    };
    (dx, dy)
}

impl DrawingBackend for PdfBackend {
    type ErrorType = std::io::Error;

    fn get_size(&self) -> (u32, u32) {
        self.size
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<std::io::Error>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<std::io::Error>> {
        if self.saved {
            return Ok(());
        }
        let document = self.to_bytes();
        std::fs::write(&self.path, document).map_err(DrawingErrorKind::DrawingError)?;
        self.saved = true;
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<std::io::Error>> {
        if self.set_fill(color) {
            let (x, y) = (self.x(point.0), self.y(point.1));
            self.content.rect(x, y - 1.0, 1.0, 1.0);
            self.content.fill_nonzero();
        }
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<std::io::Error>> {
        if self.set_stroke(style) {
            self.trace_path(vec![from, to]);
            self.content.stroke();
        }
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<std::io::Error>> {
        let x = self.x(upper_left.0);
        let y = self.y(bottom_right.1);
        let w = (bottom_right.0 - upper_left.0) as f32;
        let h = (bottom_right.1 - upper_left.1) as f32;

        if fill {
            if self.set_fill(style.color()) {
                self.content.rect(x, y, w, h);
                self.content.fill_nonzero();
            }
        } else if self.set_stroke(style) {
            self.content.rect(x, y, w, h);
            self.content.stroke();
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<std::io::Error>> {
        if self.set_stroke(style) && self.trace_path(path) > 0 {
            self.content.stroke();
        }
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<std::io::Error>> {
        let active = if fill {
            self.set_fill(style.color())
        } else {
            self.set_stroke(style)
        };
        if !active || radius == 0 {
            return Ok(());
        }

        let (cx, cy) = (self.x(center.0), self.y(center.1));
        let r = radius as f32;
        let k = r * KAPPA;

        self.content.move_to(cx + r, cy);
        self.content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        self.content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        self.content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        self.content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        self.content.close_path();

        if fill {
            self.content.fill_nonzero();
        } else {
            self.content.stroke();
        }
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<std::io::Error>> {
        if self.set_fill(style.color()) && self.trace_path(vert) > 0 {
            self.content.close_path();
            self.content.fill_nonzero();
        }
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<std::io::Error>> {
        if text.is_empty() || !self.set_fill(style.color()) {
            return Ok(());
        }

        if !text::is_encodable(text) {
            warn!("'{}' has characters Helvetica cannot show, drawn as '?'", text);
        }

        let size = style.size();
        let (dx, dy) = anchor_offset(style.anchor(), text::width(text, size), size);
        let (cos, sin) = rotation(style.transform());

        // rotate the anchor offset into screen space, then flip into PDF space
        let sx = pos.0 as f64 + dx * cos - dy * sin;
        let sy = pos.1 as f64 + dx * sin + dy * cos;
        let origin_x = sx as f32;
        let origin_y = self.size.1 as f32 - sy as f32;

        let (cos, sin) = (cos as f32, sin as f32);
        self.content.begin_text();
        self.content
            .set_text_matrix([cos, -sin, sin, cos, origin_x, origin_y]);
        for span in text::spans(text) {
            self.content.set_font(FONT, span.size(size) as f32);
            self.content.set_rise(span.rise(size) as f32);
            self.content.show(Str(&text::encode(span.text)));
        }
        self.content.set_rise(0.0);
        self.content.end_text();

        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<std::io::Error>> {
        let size = style.size();
        Ok((
            text::width(text, size).ceil() as u32,
            (size * (text::ASCENT + text::DESCENT)).ceil() as u32,
        ))
    }
}
