//! Graphics and text state.
//!
//! Both states are plain value types: `q` pushes a clone, `Q` restores by
//! value, so nothing mutated between a balanced pair survives the pop.

use super::color::{Color, ColorSpace, PREDEFINED_COLORSPACE};
use crate::error::{ParseError, Result};
use crate::utils::{MATRIX_IDENTITY, Matrix, Point, Rect};
use bytes::Bytes;

/// How a soft mask's alpha samples were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftMaskKind {
    /// Samples derived from the luminosity of a rendered mask group.
    Luminosity,
    /// Samples taken from an alpha channel directly.
    Alpha,
}

/// A per-pixel soft mask attached to the graphics state.
///
/// The sample buffer always holds one alpha byte per pixel, regardless of
/// kind; the resolver has already collapsed luminosity groups.
#[derive(Debug, Clone, PartialEq)]
pub struct SoftMask {
    pub kind: SoftMaskKind,
    pub width: u32,
    pub height: u32,
    /// Row-major alpha samples, `width * height` bytes.
    pub alpha: Bytes,
    /// Bounding box in mask space.
    pub bbox: Rect,
    /// Mask space to device space.
    pub matrix: Matrix,
}

impl SoftMask {
    pub fn new(
        kind: SoftMaskKind,
        width: u32,
        height: u32,
        alpha: Bytes,
        bbox: Rect,
        matrix: Matrix,
    ) -> Result<Self> {
        let expected = width as usize * height as usize;
        if alpha.len() != expected {
            return Err(ParseError::SoftMaskShape {
                expected,
                got: alpha.len(),
            });
        }
        Ok(Self {
            kind,
            width,
            height,
            alpha,
            bbox,
            matrix,
        })
    }

    /// Samples the mask at a mask-space point, clamping to the bounding box.
    pub fn sample(&self, x: f64, y: f64) -> u8 {
        let (x0, y0, x1, y1) = self.bbox;
        let w = (x1 - x0).abs().max(1e-9);
        let h = (y1 - y0).abs().max(1e-9);
        let u = ((x - x0) / w).clamp(0.0, 1.0);
        let v = ((y - y0) / h).clamp(0.0, 1.0);
        let px = ((u * self.width as f64) as usize).min(self.width as usize - 1);
        // Row 0 holds the top of the mask box.
        let py = (((1.0 - v) * self.height as f64) as usize).min(self.height as usize - 1);
        self.alpha[py * self.width as usize + px]
    }
}

/// Text-related state within the graphics state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Font resource name set by `Tf` (e.g., "F1").
    pub font_name: Option<String>,
    /// Nominal font size in text-space units.
    pub font_size: f64,
    /// Character spacing (`Tc`).
    pub char_spacing: f64,
    /// Word spacing (`Tw`), applied to single-byte code 32.
    pub word_spacing: f64,
    /// Horizontal scaling percentage (`Tz`, 100 = normal).
    pub horizontal_scaling: f64,
    /// Leading (`TL`), stored negated so `T*` is a plain translate.
    pub leading: f64,
    /// Render mode (`Tr`, 0-7).
    pub render_mode: i32,
    /// Baseline rise (`Ts`).
    pub rise: f64,
    /// Text matrix (`Tm`).
    pub matrix: Matrix,
    /// Position within the current line, in unscaled text space.
    pub line_matrix: Point,
}

impl TextState {
    pub fn new() -> Self {
        Self {
            font_name: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 100.0,
            leading: 0.0,
            render_mode: 0,
            rise: 0.0,
            matrix: MATRIX_IDENTITY,
            line_matrix: (0.0, 0.0),
        }
    }

    /// Reset text and line matrix, called on `BT`.
    pub fn reset(&mut self) {
        self.matrix = MATRIX_IDENTITY;
        self.line_matrix = (0.0, 0.0);
    }
}

impl Default for TextState {
    fn default() -> Self {
        Self::new()
    }
}

/// The full graphics state, including the CTM and text state.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    /// Current transformation matrix, user space to device space.
    pub ctm: Matrix,

    /// Non-stroking (fill) color and color space.
    pub fill_color: Color,
    pub fill_cs: ColorSpace,
    /// Stroking color and color space.
    pub stroke_color: Color,
    pub stroke_cs: ColorSpace,

    /// Constant fill/stroke alpha from `ca`/`CA` (0-1).
    pub fill_alpha: f64,
    pub stroke_alpha: f64,

    /// Active per-pixel soft mask, if any.
    pub soft_mask: Option<SoftMask>,
    /// Constant alpha the vector output model cannot carry; consumed and
    /// reset to 1.0 by the soft-mask rasterizer.
    pub soft_mask_alpha: f64,

    /// Line width in device units (CTM scale already applied).
    pub line_width: f64,
    /// Dash pattern: (array, phase).
    pub dash: Option<(Vec<f64>, f64)>,

    pub text: TextState,
}

impl GraphicsState {
    pub fn new() -> Self {
        let device_gray = PREDEFINED_COLORSPACE
            .get("DeviceGray")
            .expect("DeviceGray must exist")
            .clone();
        Self {
            ctm: MATRIX_IDENTITY,
            fill_color: Color::default(),
            fill_cs: device_gray.clone(),
            stroke_color: Color::default(),
            stroke_cs: device_gray,
            fill_alpha: 1.0,
            stroke_alpha: 1.0,
            soft_mask: None,
            soft_mask_alpha: 1.0,
            line_width: 1.0,
            dash: None,
            text: TextState::new(),
        }
    }

    /// True when painting through this state needs the raster escape
    /// hatch instead of the vector model.
    pub fn needs_mask_bake(&self) -> bool {
        self.soft_mask.is_some() || self.soft_mask_alpha < 1.0
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_mask_shape_validated() {
        let err = SoftMask::new(
            SoftMaskKind::Alpha,
            2,
            2,
            Bytes::from_static(&[1, 2, 3]),
            (0.0, 0.0, 1.0, 1.0),
            MATRIX_IDENTITY,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_soft_mask_sample_clamps() {
        let mask = SoftMask::new(
            SoftMaskKind::Luminosity,
            2,
            1,
            Bytes::from_static(&[10, 200]),
            (0.0, 0.0, 2.0, 1.0),
            MATRIX_IDENTITY,
        )
        .unwrap();
        assert_eq!(mask.sample(-5.0, 0.5), 10);
        assert_eq!(mask.sample(5.0, 0.5), 200);
    }

    #[test]
    fn test_state_clone_is_structural() {
        let mut state = GraphicsState::new();
        let saved = state.clone();
        state.fill_color = Color::Rgb(1.0, 0.0, 0.0);
        state.text.font_size = 12.0;
        assert_ne!(state, saved);
        assert_eq!(saved, GraphicsState::new());
    }
}
