//! Raw text bytes to Unicode.

use itertools::Itertools;
use tracing::trace;

use super::{FontInfo, FontTable, cid, repair, resolve};
use crate::utils::sanitize_text;

const REPLACEMENT: char = '\u{fffd}';

/// Decodes a font-encoded byte string into sanitized Unicode text.
///
/// The font resource name is resolved through the fallback chain in
/// [`resolve`]; with no match at all the bytes are kept byte-for-byte and
/// only the sanitize pass applies.
pub fn decode_text(raw: &[u8], font_name: &str, fonts: &FontTable) -> String {
    let decoded = match resolve(fonts, font_name) {
        Some(info) => decode_with_info(raw, info),
        None => {
            trace!(font = font_name, "no font info, passing bytes through");
            raw.iter().map(|&b| b as char).collect()
        }
    };
    sanitize_text(&decoded)
}

fn decode_with_info(raw: &[u8], info: &FontInfo) -> String {
    if info.is_double_byte() {
        return decode_double_byte(raw, info);
    }
    if !info.mapping.is_empty() {
        return decode_single_byte_mapped(raw, info);
    }
    if let Some(encoding) = &info.encoding_map {
        // Encoding-only fonts get the malformed-stream repair pass first.
        let repaired = repair::repair_embedded_nuls(raw);
        return repaired
            .iter()
            .map(|b| encoding.get(b).copied().unwrap_or(*b as char))
            .collect();
    }
    raw.iter().map(|&b| b as char).collect()
}

/// Big-endian 16-bit codes. Unmapped codes are never reinterpreted as
/// ASCII; without a usable mapping or ordering they become U+FFFD.
fn decode_double_byte(raw: &[u8], info: &FontInfo) -> String {
    let mut out = String::new();
    for (hi, lo) in raw.iter().copied().tuples() {
        let code = u16::from_be_bytes([hi, lo]) as u32;
        if let Some(mapped) = info.mapping.get(&code) {
            out.push_str(mapped);
        } else if let Some(ch) = info
            .ordering
            .as_deref()
            .and_then(|ordering| cid::ordering_fallback(ordering, code))
        {
            out.push(ch);
        } else {
            out.push(REPLACEMENT);
        }
    }
    if raw.len() % 2 == 1 {
        // Dangling byte of a truncated code.
        out.push(REPLACEMENT);
    }
    out
}

fn decode_single_byte_mapped(raw: &[u8], info: &FontInfo) -> String {
    let mut out = String::new();
    for &b in raw {
        if let Some(mapped) = info.mapping.get(&(b as u32)) {
            out.push_str(mapped);
        } else if let Some(ch) = info
            .encoding_map
            .as_ref()
            .and_then(|enc| enc.get(&b).copied())
        {
            out.push(ch);
        } else {
            out.push(b as char);
        }
    }
    out
}
