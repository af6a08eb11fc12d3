//! High-level extraction API.
//!
//! Pages are independent units of state, so document interpretation fans
//! out across the rayon pool; output order always matches input order.

use rayon::prelude::*;
use std::sync::Arc;

use crate::document::page::{Document, DocumentInfo, Page, PageContent, interpret_page};
use crate::font::FontTable;
use crate::interp::interpreter::InterpretOptions;

/// Interprets every supplied page into a [`Document`].
///
/// Each page gets its own interpreter and graphics-state stack; nothing
/// is shared across pages but the read-only font table and options.
pub fn parse_document(
    pages: &[PageContent],
    fonts: FontTable,
    info: Option<DocumentInfo>,
    options: InterpretOptions,
) -> Document {
    let fonts = Arc::new(fonts);
    let parsed: Vec<Page> = pages
        .par_iter()
        .map(|page| interpret_page(page, &fonts, &options))
        .collect();
    Document {
        pages: parsed,
        info,
    }
}

/// Number of pages a parse would produce, without extracting elements.
pub fn page_count(pages: &[PageContent]) -> usize {
    pages.len()
}

/// A page's dimensions, without extracting elements.
pub fn page_dimensions(page: &PageContent) -> (f64, f64) {
    (page.width, page.height)
}
