//! Data model: graphics state, colors, and extracted elements.

pub mod color;
pub mod elements;
pub mod state;

pub use color::{Color, ColorSpace, PREDEFINED_COLORSPACE};
pub use elements::{
    FillRule, PaintOp, ParsedElement, ParsedImage, ParsedPath, ParsedText, PathSegment, SubPath,
    TextRun,
};
pub use state::{GraphicsState, SoftMask, SoftMaskKind, TextState};
