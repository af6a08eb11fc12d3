//! Geometry helpers and output-text sanitization.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// A point in user or device space.
pub type Point = (f64, f64);

/// A rectangle (x0, y0, x1, y1).
pub type Rect = (f64, f64, f64, f64);

/// An affine transformation matrix (a, b, c, d, e, f).
///
/// Maps (x, y) to (a*x + c*y + e, b*x + d*y + f).
pub type Matrix = (f64, f64, f64, f64, f64, f64);

/// The identity matrix.
pub const MATRIX_IDENTITY: Matrix = (1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

/// Multiplies two affine matrices: returns m1 applied before m0.
pub fn mult_matrix(m1: Matrix, m0: Matrix) -> Matrix {
    let (a1, b1, c1, d1, e1, f1) = m1;
    let (a0, b0, c0, d0, e0, f0) = m0;
    (
        a0 * a1 + c0 * b1,
        b0 * a1 + d0 * b1,
        a0 * c1 + c0 * d1,
        b0 * c1 + d0 * d1,
        a0 * e1 + c0 * f1 + e0,
        b0 * e1 + d0 * f1 + f0,
    )
}

/// Translates a matrix by (x, y) inside the projection.
///
/// The matrix is changed so that its origin sits at the given point of its
/// own coordinate system, not of the outer one.
pub fn translate_matrix(m: Matrix, v: Point) -> Matrix {
    let (a, b, c, d, e, f) = m;
    let (x, y) = v;
    (a, b, c, d, x * a + y * c + e, x * b + y * d + f)
}

/// Applies a matrix to a point.
pub fn apply_matrix_pt(m: Matrix, v: Point) -> Point {
    let (a, b, c, d, e, f) = m;
    let (x, y) = v;
    (a * x + c * y + e, b * x + d * y + f)
}

/// Inverts an affine matrix. Returns `None` when the matrix is singular.
pub fn invert_matrix(m: Matrix) -> Option<Matrix> {
    let (a, b, c, d, e, f) = m;
    let det = a * d - b * c;
    if det.abs() < 1e-12 {
        return None;
    }
    let ia = d / det;
    let ib = -b / det;
    let ic = -c / det;
    let id = a / det;
    Some((ia, ib, ic, id, -(e * ia + f * ic), -(e * ib + f * id)))
}

/// Approximate uniform scale magnitude of a matrix.
///
/// Exact for rotations and uniform scales; an approximation for skewed or
/// non-uniformly scaled matrices.
pub fn matrix_scale(m: Matrix) -> f64 {
    m.0.hypot(m.1)
}

/// Control characters that must not reach the XML-based output format.
/// Tab, newline and carriage return are handled separately.
static FORBIDDEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f\x7f]").unwrap());

static LINEBREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t\n\r]").unwrap());

/// Makes decoded text safe for an XML-based output format.
///
/// Forbidden control characters are dropped; tab, newline and carriage
/// return are kept as content but replaced with a space.
pub fn sanitize_text(s: &str) -> String {
    let spaced: Cow<'_, str> = LINEBREAK_RE.replace_all(s, " ");
    FORBIDDEN_RE.replace_all(&spaced, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mult_matrix_identity() {
        let identity = MATRIX_IDENTITY;
        assert_eq!(mult_matrix(identity, identity), identity);
    }

    #[test]
    fn test_apply_matrix_pt_identity() {
        assert_eq!(apply_matrix_pt(MATRIX_IDENTITY, (5.0, 10.0)), (5.0, 10.0));
    }

    #[test]
    fn test_translate_then_apply() {
        let m = translate_matrix(MATRIX_IDENTITY, (3.0, 4.0));
        assert_eq!(apply_matrix_pt(m, (0.0, 0.0)), (3.0, 4.0));
    }

    #[test]
    fn test_invert_round_trips() {
        let m = (2.0, 0.0, 0.0, 3.0, 5.0, -7.0);
        let inv = invert_matrix(m).unwrap();
        let (x, y) = apply_matrix_pt(inv, apply_matrix_pt(m, (1.5, -2.5)));
        assert!((x - 1.5).abs() < 1e-9);
        assert!((y + 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_invert_singular() {
        assert!(invert_matrix((0.0, 0.0, 0.0, 0.0, 1.0, 2.0)).is_none());
    }

    #[test]
    fn test_sanitize_keeps_breaks_as_spaces() {
        assert_eq!(sanitize_text("a\tb\nc\rd"), "a b c d");
        assert_eq!(sanitize_text("a\x00b\x07c"), "abc");
        assert_eq!(sanitize_text("plain"), "plain");
    }
}
