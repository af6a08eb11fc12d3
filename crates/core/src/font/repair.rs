//! Heuristic repair of malformed single-byte text.
//!
//! Some producers emit single-byte strings with embedded NUL bytes: text
//! stored as faux 16-bit codes, or shifted by a constant. The repair pass
//! builds a fixed set of candidate reinterpretations, scores each with a
//! pure readability heuristic, and keeps the best one only when it beats
//! the original by a fixed margin. Candidate order and the strict margin
//! make the choice deterministic.

/// Margin a candidate must clear over the original's score. A tunable,
/// not a verified constant.
pub const REPAIR_MARGIN: f64 = 0.1;

/// Average per-byte readability: rewards spaces, alphanumerics and common
/// punctuation, penalizes control bytes. Pure and total.
pub fn readability_score(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let total: f64 = bytes
        .iter()
        .map(|&b| match b {
            b' ' => 1.5,
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => 1.0,
            b'.' | b',' | b';' | b':' | b'!' | b'?' | b'\'' | b'"' | b'(' | b')' | b'-' => 0.5,
            b'\t' | b'\n' | b'\r' => 0.0,
            0x00..=0x1f | 0x7f => -1.0,
            _ => 0.0,
        })
        .sum();
    total / bytes.len() as f64
}

/// Repairs a single-byte stream containing embedded NUL bytes.
///
/// Candidates, in order: NUL-stripped; de-interleaved (every second byte,
/// as if falsely-detected double-byte codes); NUL-stripped with a +3
/// shift applied. The original wins unless a candidate clears
/// [`REPAIR_MARGIN`]; earlier candidates win exact ties.
pub fn repair_embedded_nuls(bytes: &[u8]) -> Vec<u8> {
    if !bytes.contains(&0) {
        return bytes.to_vec();
    }

    let stripped: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
    let deinterleaved: Vec<u8> = bytes.iter().copied().skip(1).step_by(2).collect();
    let shifted: Vec<u8> = stripped.iter().map(|b| b.wrapping_add(3)).collect();

    let base = readability_score(bytes);
    let mut best: Option<(f64, &Vec<u8>)> = None;
    for candidate in [&stripped, &deinterleaved, &shifted] {
        if candidate.is_empty() {
            continue;
        }
        let score = readability_score(candidate);
        if score <= base + REPAIR_MARGIN {
            continue;
        }
        match best {
            Some((best_score, _)) if score <= best_score => {}
            _ => best = Some((score, candidate)),
        }
    }
    match best {
        Some((_, candidate)) => candidate.clone(),
        None => bytes.to_vec(),
    }
}
