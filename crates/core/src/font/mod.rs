//! Font decoding metadata and text decoding.
//!
//! Font *programs* are never parsed here; an external analysis stage
//! (ToUnicode CMap parsing, base-encoding selection, CID-ordering
//! detection) supplies one [`FontInfo`] per font resource.

pub mod cid;
pub mod decoder;
pub mod repair;

pub use decoder::decode_text;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Decoding metadata for one font resource.
#[derive(Debug, Clone, Default)]
pub struct FontInfo {
    /// Character code to Unicode string, from a ToUnicode CMap.
    pub mapping: FxHashMap<u32, String>,
    /// Code width in bytes: 1 (simple fonts) or 2 (CID fonts).
    pub code_byte_width: u8,
    /// CID collection tag (e.g., "Adobe-Japan1"), when known.
    pub ordering: Option<String>,
    /// Code to character from a base encoding table (simple fonts).
    pub encoding_map: Option<FxHashMap<u8, char>>,
    /// Advance width per code in text-space units, when the analysis
    /// stage extracted metrics.
    pub widths: Option<FxHashMap<u32, f64>>,
    /// Default advance for codes missing from `widths`.
    pub default_width: Option<f64>,
}

impl FontInfo {
    /// A single-byte font with neither mapping nor encoding table.
    pub fn unmapped() -> Self {
        Self {
            code_byte_width: 1,
            ..Self::default()
        }
    }

    pub fn is_double_byte(&self) -> bool {
        self.code_byte_width == 2
    }
}

/// All known fonts for a document, keyed by font resource name.
///
/// Insertion-ordered so that the substring fallback in [`resolve`] stays
/// deterministic across runs.
pub type FontTable = IndexMap<String, Arc<FontInfo>>;

/// Resolves a font resource name against the table.
///
/// Chain: exact match; leading-`/` strip; 6-character subset prefix strip
/// (`XGIAKD+Arial` matches `Arial`); finally a substring match in either
/// direction over the table in insertion order.
pub fn resolve<'t>(fonts: &'t FontTable, name: &str) -> Option<&'t Arc<FontInfo>> {
    if let Some(info) = fonts.get(name) {
        return Some(info);
    }
    let bare = name.strip_prefix('/').unwrap_or(name);
    if let Some(info) = fonts.get(bare) {
        return Some(info);
    }
    if let Some(stripped) = strip_subset_prefix(bare)
        && let Some(info) = fonts.get(stripped)
    {
        return Some(info);
    }
    if bare.is_empty() {
        return None;
    }
    fonts
        .iter()
        .find(|(known, _)| known.contains(bare) || bare.contains(known.as_str()))
        .map(|(_, info)| info)
}

/// Strips a `ABCDEF+` subset-tag prefix, if present.
fn strip_subset_prefix(name: &str) -> Option<&str> {
    let (tag, rest) = (name.get(..6)?, name.get(7..)?);
    if name.as_bytes().get(6) == Some(&b'+') && tag.bytes().all(|b| b.is_ascii_uppercase()) {
        Some(rest)
    } else {
        None
    }
}
