//! Tests for the font decoder fallback chains.

use estampa_core::font::{FontInfo, FontTable, decode_text, repair};
use rustc_hash::FxHashMap;
use std::sync::Arc;

fn table(entries: Vec<(&str, FontInfo)>) -> FontTable {
    entries
        .into_iter()
        .map(|(name, info)| (name.to_string(), Arc::new(info)))
        .collect()
}

fn mapped_font(pairs: &[(u32, &str)], byte_width: u8) -> FontInfo {
    FontInfo {
        mapping: pairs.iter().map(|(c, s)| (*c, s.to_string())).collect(),
        code_byte_width: byte_width,
        ..FontInfo::default()
    }
}

// ============================================================================
// Name resolution
// ============================================================================

#[test]
fn test_subset_prefix_falls_back_to_base_name() {
    let fonts = table(vec![("Arial", mapped_font(&[(0x41, "A")], 1))]);
    assert_eq!(decode_text(b"A", "XGIAKD+Arial", &fonts), "A");
}

#[test]
fn test_exact_match_wins_over_fallbacks() {
    let fonts = table(vec![
        ("Arial", mapped_font(&[(0x41, "wrong")], 1)),
        ("XGIAKD+Arial", mapped_font(&[(0x41, "right")], 1)),
    ]);
    assert_eq!(decode_text(b"A", "XGIAKD+Arial", &fonts), "right");
}

#[test]
fn test_leading_slash_stripped() {
    let fonts = table(vec![("F1", mapped_font(&[(0x61, "x")], 1))]);
    assert_eq!(decode_text(b"a", "/F1", &fonts), "x");
}

#[test]
fn test_substring_match_is_deterministic() {
    // Insertion order decides between multiple substring candidates.
    let fonts = table(vec![
        ("Times-Roman", mapped_font(&[(0x41, "first")], 1)),
        ("Times-Bold", mapped_font(&[(0x41, "second")], 1)),
    ]);
    assert_eq!(decode_text(b"A", "Times", &fonts), "first");
}

#[test]
fn test_unknown_font_decodes_byte_for_byte() {
    let fonts = FontTable::default();
    assert_eq!(decode_text(b"Hello", "Ghost", &fonts), "Hello");
}

// ============================================================================
// Double-byte decoding
// ============================================================================

#[test]
fn test_identity_two_byte_never_degrades_to_ascii() {
    let info = FontInfo {
        code_byte_width: 2,
        ordering: Some("Identity".to_string()),
        ..FontInfo::default()
    };
    let fonts = table(vec![("CID1", info)]);
    // "AB" reads as the single code 0x4142: must become U+FFFD, never "AB".
    let decoded = decode_text(b"AB", "CID1", &fonts);
    assert_eq!(decoded, "\u{fffd}");
    // Longer runs too.
    let decoded = decode_text(b"ABCD", "CID1", &fonts);
    assert_eq!(decoded, "\u{fffd}\u{fffd}");
}

#[test]
fn test_two_byte_mapping_used_first() {
    let info = mapped_font(&[(0x0001, "あ")], 2);
    let fonts = table(vec![("Mincho", info)]);
    assert_eq!(decode_text(&[0x00, 0x01], "Mincho", &fonts), "あ");
}

#[test]
fn test_cjk_ordering_fallback_for_latin_range() {
    let info = FontInfo {
        code_byte_width: 2,
        ordering: Some("Adobe-Japan1".to_string()),
        ..FontInfo::default()
    };
    let fonts = table(vec![("Mincho", info)]);
    // CIDs 34, 67, 1: 'A', 'b', space.
    let raw = [0x00, 34, 0x00, 67, 0x00, 1];
    assert_eq!(decode_text(&raw, "Mincho", &fonts), "Ab ");
}

#[test]
fn test_truncated_double_byte_code() {
    let info = mapped_font(&[(0x0041, "A")], 2);
    let fonts = table(vec![("CID1", info)]);
    assert_eq!(decode_text(&[0x00, 0x41, 0x07], "CID1", &fonts), "A\u{fffd}");
}

// ============================================================================
// Single-byte decoding and repair
// ============================================================================

#[test]
fn test_single_byte_fallback_order() {
    let mut encoding = FxHashMap::default();
    encoding.insert(0x42u8, 'Z');
    let info = FontInfo {
        mapping: [(0x41u32, "Q".to_string())].into_iter().collect(),
        code_byte_width: 1,
        encoding_map: Some(encoding),
        ..FontInfo::default()
    };
    let fonts = table(vec![("F1", info)]);
    // mapping, then encoding table, then the raw byte.
    assert_eq!(decode_text(b"ABC", "F1", &fonts), "QZC");
}

#[test]
fn test_encoding_only_font_repairs_nul_streams() {
    let mut encoding = FxHashMap::default();
    for b in 0x20u8..0x7f {
        encoding.insert(b, b as char);
    }
    let info = FontInfo {
        code_byte_width: 1,
        encoding_map: Some(encoding),
        ..FontInfo::default()
    };
    let fonts = table(vec![("F1", info)]);
    // Faux double-byte text collapses back to its payload.
    assert_eq!(decode_text(b"\x00H\x00i\x00!", "F1", &fonts), "Hi!");
}

#[test]
fn test_repair_margin_is_exposed() {
    // The margin is a documented tunable; pin its current value.
    assert_eq!(repair::REPAIR_MARGIN, 0.1);
}

// ============================================================================
// Output sanitization
// ============================================================================

#[test]
fn test_forbidden_characters_sanitized() {
    let fonts = table(vec![("F1", mapped_font(
        &[(0x41, "ok\u{0007}"), (0x42, "a\tb")],
        1,
    ))]);
    // BEL is dropped, tab becomes a space.
    assert_eq!(decode_text(b"AB", "F1", &fonts), "oka b");
}
