//! Output device: where operator effects become elements.
//!
//! The interpreter drives an [`OutputDevice`]; [`ElementCollector`] is the
//! implementation that builds the ordered [`ParsedElement`] list. Keeping
//! the seam a trait keeps the operator handlers free of output policy and
//! lets tests observe painting directly.

use bytes::Bytes;
use tracing::trace;

use crate::font::{self, FontTable};
use crate::model::elements::{
    FillRule, PaintOp, ParsedElement, ParsedImage, ParsedPath, ParsedText, PathSegment, SubPath,
    TextRun,
};
use crate::model::state::GraphicsState;
use crate::utils::{apply_matrix_pt, matrix_scale, mult_matrix};

/// One item of a text-showing sequence (`TJ` mixes both).
#[derive(Debug, Clone)]
pub enum TextItem {
    /// Positioning adjustment in thousandths of text space.
    Adjust(f64),
    /// Font-encoded bytes to show.
    Show(Vec<u8>),
}

/// Receiver for the interpreter's output.
pub trait OutputDevice {
    fn begin_page(&mut self, _number: u32, _width: f64, _height: f64) {}

    fn end_page(&mut self) {}

    /// A form XObject is being expanded.
    fn begin_form(&mut self, _name: &str) {}

    fn end_form(&mut self, _name: &str) {}

    /// A painting operator finalized the current path.
    fn paint_path(
        &mut self,
        state: &GraphicsState,
        paint: PaintOp,
        fill_rule: FillRule,
        clip_only: bool,
        segments: &[PathSegment],
    );

    /// A text-showing operator ran. Implementations advance
    /// `state.text.line_matrix` past the shown text.
    fn show_text(&mut self, state: &mut GraphicsState, items: &[TextItem], fonts: &FontTable);

    /// An image XObject was placed at the unit square under the CTM.
    fn draw_image(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        rgb: &Bytes,
        alpha: Option<&Bytes>,
        state: &GraphicsState,
    );
}

/// Builds a device-space [`ParsedPath`] from accumulated user-space
/// segments, or `None` for clip-only and unpainted paths.
///
/// Points are transformed at construction time, so later CTM mutation
/// never reaches an emitted path.
pub fn build_path(
    segments: &[PathSegment],
    state: &GraphicsState,
    paint: PaintOp,
    fill_rule: FillRule,
    clip_only: bool,
) -> Option<ParsedPath> {
    if clip_only || paint == PaintOp::None || segments.is_empty() {
        return None;
    }
    let ctm = state.ctm;
    let mut subpaths: Vec<SubPath> = Vec::new();
    let mut current: Vec<PathSegment> = Vec::new();
    for seg in segments {
        match *seg {
            PathSegment::MoveTo(x, y) => {
                if !current.is_empty() {
                    subpaths.push(SubPath {
                        segments: std::mem::take(&mut current),
                    });
                }
                let (dx, dy) = apply_matrix_pt(ctm, (x, y));
                current.push(PathSegment::MoveTo(dx, dy));
            }
            PathSegment::LineTo(x, y) => {
                let (dx, dy) = apply_matrix_pt(ctm, (x, y));
                current.push(PathSegment::LineTo(dx, dy));
            }
            PathSegment::CurveTo(x1, y1, x2, y2, x3, y3) => {
                let (dx1, dy1) = apply_matrix_pt(ctm, (x1, y1));
                let (dx2, dy2) = apply_matrix_pt(ctm, (x2, y2));
                let (dx3, dy3) = apply_matrix_pt(ctm, (x3, y3));
                current.push(PathSegment::CurveTo(dx1, dy1, dx2, dy2, dx3, dy3));
            }
            PathSegment::Close => current.push(PathSegment::Close),
        }
    }
    if !current.is_empty() {
        subpaths.push(SubPath { segments: current });
    }
    Some(ParsedPath {
        subpaths,
        paint,
        fill_rule,
        state: state.clone(),
    })
}

/// Average advance for codes without metrics, in em units.
const AVG_GLYPH_WIDTH: f64 = 0.5;
/// Double-byte (CJK) glyphs are typically full-width.
const AVG_CJK_GLYPH_WIDTH: f64 = 1.0;

/// Collects interpreter output into an ordered element list.
#[derive(Default)]
pub struct ElementCollector {
    elements: Vec<ParsedElement>,
}

impl ElementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_elements(self) -> Vec<ParsedElement> {
        self.elements
    }

    pub fn elements(&self) -> &[ParsedElement] {
        &self.elements
    }
}

impl OutputDevice for ElementCollector {
    fn paint_path(
        &mut self,
        state: &GraphicsState,
        paint: PaintOp,
        fill_rule: FillRule,
        clip_only: bool,
        segments: &[PathSegment],
    ) {
        if let Some(path) = build_path(segments, state, paint, fill_rule, clip_only) {
            self.elements.push(ParsedElement::Path(path));
        }
    }

    fn show_text(&mut self, state: &mut GraphicsState, items: &[TextItem], fonts: &FontTable) {
        let info = state
            .text
            .font_name
            .as_deref()
            .and_then(|name| font::resolve(fonts, name))
            .cloned();
        let byte_width = info.as_ref().map_or(1, |i| i.code_byte_width.max(1));

        let trm = mult_matrix(state.text.matrix, state.ctm);
        let effective_size = state.text.font_size * matrix_scale(trm);
        let hscale = state.text.horizontal_scaling * 0.01;
        let dxscale = 0.001 * state.text.font_size * hscale;
        let rise = state.text.rise;
        let (mut lx, ly) = state.text.line_matrix;

        let mut runs: Vec<TextRun> = Vec::new();
        let mut need_charspace = false;
        for item in items {
            match item {
                TextItem::Adjust(n) => {
                    lx -= n * dxscale;
                    need_charspace = true;
                }
                TextItem::Show(bytes) => {
                    if bytes.is_empty() {
                        continue;
                    }
                    let (anchor_x, anchor_y) = apply_matrix_pt(trm, (lx, ly + rise));
                    for code in iter_codes(bytes, byte_width) {
                        if need_charspace {
                            lx += state.text.char_spacing * hscale;
                        }
                        lx += advance_for(info.as_deref(), code, byte_width)
                            * state.text.font_size
                            * hscale;
                        if byte_width == 1 && code == 32 && state.text.word_spacing != 0.0 {
                            lx += state.text.word_spacing * hscale;
                        }
                        need_charspace = true;
                    }
                    let (end_x, _) = apply_matrix_pt(trm, (lx, ly + rise));
                    runs.push(TextRun {
                        raw: bytes.clone(),
                        x: anchor_x,
                        y: anchor_y,
                        end_x,
                        effective_font_size: effective_size,
                        font_name: state.text.font_name.clone(),
                        char_spacing: state.text.char_spacing,
                        word_spacing: state.text.word_spacing,
                        horizontal_scaling: state.text.horizontal_scaling,
                        render_mode: state.text.render_mode,
                    });
                }
            }
        }
        state.text.line_matrix = (lx, ly);
        if !runs.is_empty() {
            self.elements.push(ParsedElement::Text(ParsedText {
                runs,
                state: state.clone(),
            }));
        }
    }

    fn draw_image(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        rgb: &Bytes,
        alpha: Option<&Bytes>,
        state: &GraphicsState,
    ) {
        trace!(name, width, height, "placing image xobject");
        self.elements.push(ParsedElement::Image(ParsedImage {
            width,
            height,
            rgb: rgb.clone(),
            alpha: alpha.cloned(),
            placement: state.ctm,
            state: state.clone(),
        }));
    }
}

/// Iterates character codes at the font's code width. A dangling byte of
/// a truncated double-byte code is dropped here; the decoder reports it.
fn iter_codes(bytes: &[u8], byte_width: u8) -> impl Iterator<Item = u32> + '_ {
    let double = byte_width == 2;
    let step = if double { 2 } else { 1 };
    bytes.chunks(step).filter_map(move |chunk| match *chunk {
        [hi, lo] => Some(u32::from(u16::from_be_bytes([hi, lo]))),
        [b] if !double => Some(u32::from(b)),
        _ => None,
    })
}

fn advance_for(info: Option<&font::FontInfo>, code: u32, byte_width: u8) -> f64 {
    if let Some(info) = info {
        if let Some(widths) = &info.widths
            && let Some(w) = widths.get(&code)
        {
            return *w;
        }
        if let Some(default) = info.default_width {
            return default;
        }
    }
    if byte_width == 2 {
        AVG_CJK_GLYPH_WIDTH
    } else {
        AVG_GLYPH_WIDTH
    }
}
