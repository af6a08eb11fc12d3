//! estampa - PDF content-stream interpretation into drawing elements.
//!
//! The crate consumes already-decoded page content streams plus resolved
//! resource dictionaries and produces, per page, an ordered list of
//! [`ParsedElement`]s (vector paths, positioned text runs, raster images)
//! in page coordinates, ready for conversion into another document
//! format's shape model. Container parsing, font-program analysis, and
//! the actual conversion are the caller's concern; they meet this crate
//! at [`PageContent`], [`ResourceResolver`], and [`FontTable`].

pub mod document;
pub mod error;
pub mod font;
pub mod high_level;
pub mod interp;
pub mod model;
pub mod parser;
pub mod resources;
pub mod softmask;
pub mod utils;

pub use document::page::{Document, DocumentInfo, Page, PageContent};
pub use error::{ParseError, Result};
pub use font::{FontInfo, FontTable, decode_text};
pub use high_level::{page_count, page_dimensions, parse_document};
pub use interp::{ElementCollector, InterpretOptions, OutputDevice, PageInterpreter};
pub use model::color::{Color, ColorSpace};
pub use model::elements::{
    FillRule, PaintOp, ParsedElement, ParsedImage, ParsedPath, ParsedText, PathSegment, SubPath,
    TextRun,
};
pub use model::state::{GraphicsState, SoftMask, SoftMaskKind, TextState};
pub use resources::{
    ExtGState, FallbackResolver, NoResources, ResourceResolver, SoftMaskUpdate, XObjectSlot,
};
