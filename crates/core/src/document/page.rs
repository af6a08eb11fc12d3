//! Per-page interpretation and the document output model.

use bytes::Bytes;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ParseError, Result};
use crate::font::FontTable;
use crate::interp::device::{ElementCollector, OutputDevice};
use crate::interp::interpreter::{InterpretOptions, PageInterpreter};
use crate::model::elements::ParsedElement;
use crate::resources::ResourceResolver;
use crate::softmask::rasterize_masked_text;

/// Caller-supplied input for one page: dimensions, the decoded content
/// stream (an array of streams already joined with newlines), and the
/// page's resource dictionaries behind a resolver.
#[derive(Clone)]
pub struct PageContent {
    /// 1-based page number.
    pub number: u32,
    pub width: f64,
    pub height: f64,
    pub content: Bytes,
    pub resources: Arc<dyn ResourceResolver>,
}

/// Optional document metadata, attached verbatim when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// One interpreted page: elements in paint order, later elements
/// visually on top of earlier ones.
#[derive(Debug, Clone)]
pub struct Page {
    pub number: u32,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<ParsedElement>,
}

/// An interpreted document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub pages: Vec<Page>,
    pub info: Option<DocumentInfo>,
}

impl Document {
    /// Page by zero-based index.
    pub fn page(&self, index: usize) -> Result<&Page> {
        self.pages.get(index).ok_or(ParseError::PageOutOfRange(index))
    }
}

/// Interprets one page into its element list.
///
/// Best-effort throughout: an empty or undecodable stream yields a page
/// with no elements, never an error. After interpretation, text elements
/// whose state carries an unexpressible soft mask are baked into image
/// elements in place, preserving paint order.
pub fn interpret_page(
    page: &PageContent,
    fonts: &Arc<FontTable>,
    options: &InterpretOptions,
) -> Page {
    let mut collector = ElementCollector::new();
    collector.begin_page(page.number, page.width, page.height);
    {
        let mut interp = PageInterpreter::new(
            &mut collector,
            page.resources.clone(),
            fonts.clone(),
            options.clone(),
        );
        interp.execute(&page.content);
    }
    collector.end_page();

    let elements = collector
        .into_elements()
        .into_iter()
        .map(|element| bake_soft_mask(element, fonts))
        .collect::<Vec<_>>();
    debug!(
        page = page.number,
        elements = elements.len(),
        "page interpreted"
    );

    Page {
        number: page.number,
        width: page.width,
        height: page.height,
        elements,
    }
}

/// Replaces masked text with its rasterization; everything else passes
/// through untouched.
fn bake_soft_mask(element: ParsedElement, fonts: &FontTable) -> ParsedElement {
    match element {
        ParsedElement::Text(text) => match rasterize_masked_text(&text, fonts) {
            Some(image) => ParsedElement::Image(image),
            None => ParsedElement::Text(text),
        },
        other => other,
    }
}
