//! Extracted drawing elements.
//!
//! Elements carry their graphics-state snapshot so downstream conversion
//! never has to replay operator state.

use super::state::GraphicsState;
use crate::utils::Matrix;
use bytes::Bytes;

/// One path segment, in the space of its containing list.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    /// Cubic bezier (x1, y1, x2, y2, x3, y3).
    CurveTo(f64, f64, f64, f64, f64, f64),
    Close,
}

/// Paint operation derived from the painting operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOp {
    Fill,
    Stroke,
    FillStroke,
    /// `n`: path ended without painting (clip consumption only).
    None,
}

/// Winding rule for fill operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// One subpath of a painted path, in device space.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub segments: Vec<PathSegment>,
}

/// A painted vector path, fully transformed to device space.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPath {
    pub subpaths: Vec<SubPath>,
    pub paint: PaintOp,
    pub fill_rule: FillRule,
    /// Graphics state at paint time; `state.ctm` is the transform the
    /// subpaths were already pushed through.
    pub state: GraphicsState,
}

/// One positioned run of still-encoded text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Raw font-encoded bytes; decoding is deferred to the font decoder.
    pub raw: Vec<u8>,
    /// Device-space baseline anchor.
    pub x: f64,
    pub y: f64,
    /// Device-space x after the run's advance.
    pub end_x: f64,
    /// Nominal size scaled by the text and transformation matrices.
    pub effective_font_size: f64,
    pub font_name: Option<String>,
    pub char_spacing: f64,
    pub word_spacing: f64,
    pub horizontal_scaling: f64,
    pub render_mode: i32,
}

/// A text element: the runs of one showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedText {
    pub runs: Vec<TextRun>,
    pub state: GraphicsState,
}

/// A raster image element.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB8 samples, row 0 at the top of the placed box.
    pub rgb: Bytes,
    /// Row-major alpha samples, when the image carries transparency.
    pub alpha: Option<Bytes>,
    /// Placement: maps the unit square onto the device-space quad.
    pub placement: Matrix,
    pub state: GraphicsState,
}

/// An extracted element, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedElement {
    Path(ParsedPath),
    Text(ParsedText),
    Image(ParsedImage),
}

impl ParsedElement {
    pub fn as_text(&self) -> Option<&ParsedText> {
        match self {
            ParsedElement::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&ParsedPath> {
        match self {
            ParsedElement::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ParsedImage> {
        match self {
            ParsedElement::Image(i) => Some(i),
            _ => None,
        }
    }
}
