//! CID-ordering fallback decoding.
//!
//! Double-byte fonts without a usable ToUnicode mapping can still yield
//! text for the proportional-Latin range shared by the common CJK
//! character collections: CID 1 is the space and CIDs 2-95 run through
//! the printable ASCII repertoire in order. Identity orderings carry no
//! collection semantics and never fall back.

/// Collections the Latin-range fallback applies to.
const LATIN_RANGE_ORDERINGS: &[&str] = &["Japan1", "GB1", "CNS1", "Korea1", "KR"];

/// True for `Identity-H`/`Identity-V`/"Identity" ordering tags.
pub fn is_identity(ordering: &str) -> bool {
    ordering == "Identity" || ordering.starts_with("Identity-")
}

/// Looks up the fallback character for a CID under the given ordering.
///
/// Returns `None` for identity orderings, unknown collections, and CIDs
/// outside the shared Latin range.
pub fn ordering_fallback(ordering: &str, cid: u32) -> Option<char> {
    if is_identity(ordering) {
        return None;
    }
    let known = LATIN_RANGE_ORDERINGS
        .iter()
        .any(|tag| ordering.contains(tag));
    if !known {
        return None;
    }
    match cid {
        1 => Some(' '),
        // CID 2 is '!', running contiguously to '~' at CID 95.
        2..=95 => char::from_u32(0x21 + cid - 2),
        _ => None,
    }
}
