//! Soft-mask rasterization.
//!
//! The vector output model has no per-pixel transparency, so text painted
//! under an active soft mask (or a constant alpha below 1.0) is baked
//! into an RGBA raster and replaced by an image element. The emitted
//! image carries a cleared mask state; the effect must not be reapplied
//! downstream.

use bytes::Bytes;
use tracing::warn;

use crate::font::{self, FontTable};
use crate::model::elements::{ParsedImage, ParsedText, TextRun};
use crate::utils::{apply_matrix_pt, invert_matrix};

/// Ascent above the baseline as a fraction of the effective size, used
/// when no real font metrics exist for the bounding box.
const ASCENT_RATIO: f64 = 0.88;
/// Descent below the baseline as a fraction of the effective size.
const DESCENT_RATIO: f64 = 0.26;

/// Bakes the active soft mask of a text element into a raster image.
///
/// Returns `None` when the element's state carries no mask and a unit
/// constant alpha; the caller then keeps the vector text.
pub fn rasterize_masked_text(text: &ParsedText, fonts: &FontTable) -> Option<ParsedImage> {
    let state = &text.state;
    if !state.needs_mask_bake() {
        return None;
    }
    if text.runs.is_empty() {
        return None;
    }

    // Device-space bounding box from the runs' anchors, advances, and the
    // ascent/descent envelope of the effective size.
    let mut x0 = f64::INFINITY;
    let mut y0 = f64::INFINITY;
    let mut x1 = f64::NEG_INFINITY;
    let mut y1 = f64::NEG_INFINITY;
    for run in &text.runs {
        let size = run.effective_font_size.abs();
        let end_x = if (run.end_x - run.x).abs() > 1e-9 {
            run.end_x
        } else {
            // Zero-advance run: estimate the width from glyph metrics.
            run.x + estimate_run_width(run, fonts)
        };
        x0 = x0.min(run.x.min(end_x));
        x1 = x1.max(run.x.max(end_x));
        y0 = y0.min(run.y - DESCENT_RATIO * size);
        y1 = y1.max(run.y + ASCENT_RATIO * size);
    }
    let width = ((x1 - x0).ceil() as usize).max(1);
    let height = ((y1 - y0).ceil() as usize).max(1);

    let [r, g, b] = state.fill_color.to_rgb8();
    let mut rgb = Vec::with_capacity(width * height * 3);
    for _ in 0..width * height {
        rgb.extend_from_slice(&[r, g, b]);
    }

    let constant = (state.soft_mask_alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    let mask_inverse = state.soft_mask.as_ref().and_then(|mask| {
        let inv = invert_matrix(mask.matrix);
        if inv.is_none() {
            warn!("soft mask matrix is singular, using constant alpha");
        }
        inv
    });

    let mut alpha = Vec::with_capacity(width * height);
    for row in 0..height {
        // Row 0 is the top of the box.
        let dy = y1 - (row as f64 + 0.5);
        for col in 0..width {
            let dx = x0 + col as f64 + 0.5;
            let sample = match (&state.soft_mask, mask_inverse) {
                (Some(mask), Some(inv)) => {
                    let (mx, my) = apply_matrix_pt(inv, (dx, dy));
                    let masked = mask.sample(mx, my);
                    scale_alpha(masked, state.soft_mask_alpha)
                }
                _ => constant,
            };
            alpha.push(sample);
        }
    }

    let mut baked_state = state.clone();
    baked_state.soft_mask = None;
    baked_state.soft_mask_alpha = 1.0;

    Some(ParsedImage {
        width: width as u32,
        height: height as u32,
        rgb: Bytes::from(rgb),
        alpha: Some(Bytes::from(alpha)),
        // Unit square onto the device-space box.
        placement: (width as f64, 0.0, 0.0, height as f64, x0, y0),
        state: baked_state,
    })
}

fn scale_alpha(sample: u8, constant: f64) -> u8 {
    (f64::from(sample) * constant.clamp(0.0, 1.0)).round() as u8
}

/// Per-glyph width estimate for runs whose advance was never computed.
fn estimate_run_width(run: &TextRun, fonts: &FontTable) -> f64 {
    let info = run
        .font_name
        .as_deref()
        .and_then(|name| font::resolve(fonts, name));
    let byte_width = info.map_or(1, |i| i.code_byte_width.max(1)) as usize;
    let glyphs = (run.raw.len() / byte_width).max(1) as f64;
    let per_glyph = if byte_width == 2 { 1.0 } else { 0.5 };
    glyphs * per_glyph * run.effective_font_size.abs() * run.horizontal_scaling * 0.01
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::color::Color;
    use crate::model::elements::TextRun;
    use crate::model::state::{GraphicsState, SoftMask, SoftMaskKind};
    use crate::utils::MATRIX_IDENTITY;

    fn red_text(state: GraphicsState) -> ParsedText {
        ParsedText {
            runs: vec![TextRun {
                raw: b"A".to_vec(),
                x: 0.0,
                y: 0.2,
                end_x: 1.0,
                effective_font_size: 0.5,
                font_name: Some("F1".into()),
                char_spacing: 0.0,
                word_spacing: 0.0,
                horizontal_scaling: 100.0,
                render_mode: 0,
            }],
            state,
        }
    }

    fn red_state() -> GraphicsState {
        let mut state = GraphicsState::new();
        state.fill_color = Color::Rgb(1.0, 0.0, 0.0);
        state
    }

    #[test]
    fn test_no_mask_returns_none() {
        let text = red_text(red_state());
        assert!(rasterize_masked_text(&text, &FontTable::default()).is_none());
    }

    #[test]
    fn test_luminosity_mask_bakes_alpha() {
        let mut state = red_state();
        state.soft_mask = Some(
            SoftMask::new(
                SoftMaskKind::Luminosity,
                1,
                1,
                Bytes::from_static(&[0x80]),
                (0.0, 0.0, 1.0, 1.0),
                MATRIX_IDENTITY,
            )
            .unwrap(),
        );
        let image = rasterize_masked_text(&red_text(state), &FontTable::default()).unwrap();
        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.rgb.as_ref(), &[255, 0, 0]);
        assert_eq!(image.alpha.as_ref().unwrap().as_ref(), &[128]);
        assert!(image.state.soft_mask.is_none());
        assert_eq!(image.state.soft_mask_alpha, 1.0);
    }

    #[test]
    fn test_alpha_mask_bakes_alpha() {
        let mut state = red_state();
        state.soft_mask = Some(
            SoftMask::new(
                SoftMaskKind::Alpha,
                1,
                1,
                Bytes::from_static(&[200]),
                (0.0, 0.0, 1.0, 1.0),
                MATRIX_IDENTITY,
            )
            .unwrap(),
        );
        let image = rasterize_masked_text(&red_text(state), &FontTable::default()).unwrap();
        assert_eq!(image.rgb.as_ref(), &[255, 0, 0]);
        assert_eq!(image.alpha.as_ref().unwrap().as_ref(), &[200]);
    }

    #[test]
    fn test_constant_alpha_only() {
        let mut state = red_state();
        state.soft_mask_alpha = 0.5;
        let image = rasterize_masked_text(&red_text(state), &FontTable::default()).unwrap();
        assert_eq!(image.alpha.as_ref().unwrap().as_ref(), &[128]);
        assert_eq!(image.state.soft_mask_alpha, 1.0);
    }
}
