//! Tests for document assembly and the high-level API.

use bytes::Bytes;
use estampa_core::{
    DocumentInfo, FontTable, InterpretOptions, NoResources, PageContent, ParsedElement,
    page_count, page_dimensions, parse_document,
};
use std::sync::Arc;

fn page(number: u32, content: &'static [u8]) -> PageContent {
    PageContent {
        number,
        width: 612.0,
        height: 792.0,
        content: Bytes::from_static(content),
        resources: Arc::new(NoResources),
    }
}

#[test]
fn test_pages_keep_input_order() {
    let pages: Vec<PageContent> = (1..=16)
        .map(|n| page(n, b"0 0 1 1 re f"))
        .collect();
    let doc = parse_document(&pages, FontTable::default(), None, InterpretOptions::default());
    assert_eq!(doc.pages.len(), 16);
    for (index, parsed) in doc.pages.iter().enumerate() {
        assert_eq!(parsed.number as usize, index + 1);
        assert_eq!(parsed.elements.len(), 1);
    }
}

#[test]
fn test_empty_content_stream_yields_empty_page() {
    let doc = parse_document(
        &[page(1, b"")],
        FontTable::default(),
        None,
        InterpretOptions::default(),
    );
    assert_eq!(doc.pages.len(), 1);
    assert!(doc.pages[0].elements.is_empty());
}

#[test]
fn test_garbage_content_stream_yields_empty_page_not_error() {
    let doc = parse_document(
        &[page(1, b"\xde\xad\xbe\xef not a stream ((((")],
        FontTable::default(),
        None,
        InterpretOptions::default(),
    );
    assert!(doc.pages[0].elements.is_empty());
}

#[test]
fn test_paint_order_preserved() {
    let doc = parse_document(
        &[page(
            1,
            b"0 0 1 1 re f BT /F1 10 Tf (A) Tj ET 2 2 1 1 re S",
        )],
        FontTable::default(),
        None,
        InterpretOptions::default(),
    );
    let kinds: Vec<&str> = doc.pages[0]
        .elements
        .iter()
        .map(|e| match e {
            ParsedElement::Path(_) => "path",
            ParsedElement::Text(_) => "text",
            ParsedElement::Image(_) => "image",
        })
        .collect();
    assert_eq!(kinds, vec!["path", "text", "path"]);
}

#[test]
fn test_metadata_attached_verbatim() {
    let info = DocumentInfo {
        title: Some("Quarterly Report".into()),
        author: None,
        subject: Some("Numbers".into()),
    };
    let doc = parse_document(
        &[page(1, b"")],
        FontTable::default(),
        Some(info.clone()),
        InterpretOptions::default(),
    );
    assert_eq!(doc.info, Some(info));
}

#[test]
fn test_preflight_helpers_skip_extraction() {
    let pages = vec![page(1, b"0 0 1 1 re f"), page(2, b"")];
    assert_eq!(page_count(&pages), 2);
    assert_eq!(page_dimensions(&pages[0]), (612.0, 792.0));
}

#[test]
fn test_page_lookup_by_index() {
    let doc = parse_document(
        &[page(1, b""), page(2, b"")],
        FontTable::default(),
        None,
        InterpretOptions::default(),
    );
    assert!(doc.page(1).is_ok());
    assert!(doc.page(2).is_err());
}
