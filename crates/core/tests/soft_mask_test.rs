//! Tests for soft-mask rasterization through the full pipeline.

use bytes::Bytes;
use estampa_core::{
    ExtGState, FontTable, InterpretOptions, PageContent, ParsedElement, ResourceResolver,
    SoftMask, SoftMaskKind, SoftMaskUpdate, XObjectSlot, parse_document,
};
use estampa_core::utils::MATRIX_IDENTITY;
use rustc_hash::FxHashMap;
use std::sync::Arc;

struct MaskResources {
    states: FxHashMap<String, ExtGState>,
}

impl ResourceResolver for MaskResources {
    fn ext_g_state(&self, name: &str) -> Option<ExtGState> {
        self.states.get(name).cloned()
    }

    fn x_object(&self, _name: &str) -> Option<XObjectSlot> {
        None
    }

    fn color_space(&self, _name: &str) -> Option<estampa_core::ColorSpace> {
        None
    }
}

fn gray_mask(level: u8, kind: SoftMaskKind) -> SoftMask {
    SoftMask::new(
        kind,
        1,
        1,
        Bytes::copy_from_slice(&[level]),
        (0.0, 0.0, 1.0, 1.0),
        MATRIX_IDENTITY,
    )
    .unwrap()
}

fn masked_resources(mask: SoftMask) -> Arc<dyn ResourceResolver> {
    let mut states = FxHashMap::default();
    states.insert("GS0".to_string(), ExtGState {
        fill_alpha: None,
        stroke_alpha: None,
        soft_mask: SoftMaskUpdate::Set(mask),
    });
    Arc::new(MaskResources { states })
}

fn masked_page(resources: Arc<dyn ResourceResolver>) -> PageContent {
    PageContent {
        number: 1,
        width: 612.0,
        height: 792.0,
        content: Bytes::from_static(b"/GS0 gs 1 0 0 rg BT /F1 0.8 Tf (A) Tj ET"),
        resources,
    }
}

#[test]
fn test_luminosity_mask_bakes_red_text() {
    // A 1x1 luminosity mask with gray byte 0x80 over red fill text.
    let page = masked_page(masked_resources(gray_mask(0x80, SoftMaskKind::Luminosity)));
    let doc = parse_document(&[page], FontTable::default(), None, InterpretOptions::default());

    let elements = &doc.pages[0].elements;
    assert_eq!(elements.len(), 1);
    let image = elements[0].as_image().expect("masked text becomes an image");
    assert_eq!((image.width, image.height), (1, 1));
    assert_eq!(image.rgb.as_ref(), &[255, 0, 0]);
    assert_eq!(image.alpha.as_ref().unwrap().as_ref(), &[128]);
    assert!(image.state.soft_mask.is_none());
    assert_eq!(image.state.soft_mask_alpha, 1.0);
}

#[test]
fn test_alpha_mask_bakes_red_text() {
    let page = masked_page(masked_resources(gray_mask(200, SoftMaskKind::Alpha)));
    let doc = parse_document(&[page], FontTable::default(), None, InterpretOptions::default());

    let image = doc.pages[0].elements[0].as_image().unwrap();
    assert_eq!(image.rgb.as_ref(), &[255, 0, 0]);
    assert_eq!(image.alpha.as_ref().unwrap().as_ref(), &[200]);
}

#[test]
fn test_masked_page_has_no_text_elements() {
    let page = masked_page(masked_resources(gray_mask(0x80, SoftMaskKind::Luminosity)));
    let doc = parse_document(&[page], FontTable::default(), None, InterpretOptions::default());

    let texts = doc.pages[0]
        .elements
        .iter()
        .filter(|e| matches!(e, ParsedElement::Text(_)))
        .count();
    let images = doc.pages[0]
        .elements
        .iter()
        .filter(|e| matches!(e, ParsedElement::Image(_)))
        .count();
    assert_eq!(texts, 0);
    assert_eq!(images, 1);
}

#[test]
fn test_smask_none_clears_mask() {
    let mut states = FxHashMap::default();
    states.insert("GS0".to_string(), ExtGState {
        fill_alpha: None,
        stroke_alpha: None,
        soft_mask: SoftMaskUpdate::Set(gray_mask(0x80, SoftMaskKind::Luminosity)),
    });
    states.insert("GS1".to_string(), ExtGState {
        fill_alpha: None,
        stroke_alpha: None,
        soft_mask: SoftMaskUpdate::Clear,
    });
    let page = PageContent {
        number: 1,
        width: 612.0,
        height: 792.0,
        content: Bytes::from_static(b"/GS0 gs /GS1 gs BT /F1 0.8 Tf (A) Tj ET"),
        resources: Arc::new(MaskResources { states }),
    };
    let doc = parse_document(&[page], FontTable::default(), None, InterpretOptions::default());
    // Mask was cleared before the text: it stays vector text.
    assert!(doc.pages[0].elements[0].as_text().is_some());
}

#[test]
fn test_constant_alpha_triggers_bake() {
    let mut states = FxHashMap::default();
    states.insert("GS0".to_string(), ExtGState {
        fill_alpha: Some(0.5),
        stroke_alpha: None,
        soft_mask: SoftMaskUpdate::Unchanged,
    });
    let page = PageContent {
        number: 1,
        width: 612.0,
        height: 792.0,
        content: Bytes::from_static(b"/GS0 gs 1 0 0 rg BT /F1 0.8 Tf (A) Tj ET"),
        resources: Arc::new(MaskResources { states }),
    };
    let doc = parse_document(&[page], FontTable::default(), None, InterpretOptions::default());
    let image = doc.pages[0].elements[0].as_image().unwrap();
    assert_eq!(image.alpha.as_ref().unwrap().as_ref(), &[128]);
    assert_eq!(image.state.soft_mask_alpha, 1.0);
}

#[test]
fn test_mask_restored_by_state_stack() {
    // A mask installed inside q..Q does not leak to text after Q.
    let page = PageContent {
        number: 1,
        width: 612.0,
        height: 792.0,
        content: Bytes::from_static(b"q /GS0 gs Q BT /F1 0.8 Tf (A) Tj ET"),
        resources: masked_resources(gray_mask(0x80, SoftMaskKind::Luminosity)),
    };
    let doc = parse_document(&[page], FontTable::default(), None, InterpretOptions::default());
    assert!(doc.pages[0].elements[0].as_text().is_some());
}
