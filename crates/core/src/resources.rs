//! Resource boundary toward the container document loader.
//!
//! The interpreter never touches the document object graph; everything it
//! needs arrives resolved-by-name through this trait. Implementations are
//! expected to hand out already-decoded stream bytes.

use crate::model::state::SoftMask;
use crate::utils::{MATRIX_IDENTITY, Matrix};
use bytes::Bytes;
use std::sync::Arc;

/// Effect of an ExtGState dictionary on the active soft mask.
#[derive(Debug, Clone, PartialEq)]
pub enum SoftMaskUpdate {
    /// The dictionary has no `SMask` entry.
    Unchanged,
    /// `SMask /None`: disable the active mask.
    Clear,
    /// Install a resolved mask.
    Set(SoftMask),
}

/// The slice of an ExtGState dictionary this interpreter consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtGState {
    /// `ca` (non-stroking alpha), when present.
    pub fill_alpha: Option<f64>,
    /// `CA` (stroking alpha), when present.
    pub stroke_alpha: Option<f64>,
    pub soft_mask: SoftMaskUpdate,
}

impl Default for ExtGState {
    fn default() -> Self {
        Self {
            fill_alpha: None,
            stroke_alpha: None,
            soft_mask: SoftMaskUpdate::Unchanged,
        }
    }
}

/// A resolved XObject resource.
#[derive(Clone)]
pub enum XObjectSlot {
    /// A nested content stream with its own matrix and resources.
    Form {
        /// Decoded content-stream text.
        content: Bytes,
        /// The form's own coordinate matrix.
        matrix: Matrix,
        /// The form's resource dictionary; callers fall back to their own
        /// resources for names it does not define.
        resources: Option<Arc<dyn ResourceResolver>>,
    },
    /// A decoded raster image.
    Image {
        width: u32,
        height: u32,
        /// Row-major RGB8 samples.
        rgb: Bytes,
        /// Row-major alpha samples, when present.
        alpha: Option<Bytes>,
    },
}

impl XObjectSlot {
    /// Convenience constructor for a form without its own resources.
    pub fn form(content: impl Into<Bytes>) -> Self {
        XObjectSlot::Form {
            content: content.into(),
            matrix: MATRIX_IDENTITY,
            resources: None,
        }
    }

    /// Builds an image slot, validating the buffer shapes.
    pub fn image(
        width: u32,
        height: u32,
        rgb: impl Into<Bytes>,
        alpha: Option<Bytes>,
    ) -> crate::error::Result<Self> {
        let rgb = rgb.into();
        let pixels = width as usize * height as usize;
        if rgb.len() != pixels * 3 {
            return Err(crate::error::ParseError::ImageShape {
                expected: pixels * 3,
                got: rgb.len(),
            });
        }
        if let Some(alpha) = &alpha
            && alpha.len() != pixels
        {
            return Err(crate::error::ParseError::ImageShape {
                expected: pixels,
                got: alpha.len(),
            });
        }
        Ok(XObjectSlot::Image {
            width,
            height,
            rgb,
            alpha,
        })
    }
}

/// Name-based lookup into one page's (or form's) resource dictionaries.
pub trait ResourceResolver: Send + Sync {
    /// Resolve an ExtGState dictionary referenced by `gs`.
    fn ext_g_state(&self, name: &str) -> Option<ExtGState>;

    /// Resolve a Form or Image XObject referenced by `Do`.
    fn x_object(&self, name: &str) -> Option<XObjectSlot>;

    /// Resolve a named color space referenced by `cs`/`CS`. Device spaces
    /// never reach this call.
    fn color_space(&self, name: &str) -> Option<crate::model::color::ColorSpace>;
}

/// A resolver with nothing in it; used for pages without resources.
pub struct NoResources;

impl ResourceResolver for NoResources {
    fn ext_g_state(&self, _name: &str) -> Option<ExtGState> {
        None
    }

    fn x_object(&self, _name: &str) -> Option<XObjectSlot> {
        None
    }

    fn color_space(&self, _name: &str) -> Option<crate::model::color::ColorSpace> {
        None
    }
}

/// Form resources layered over the caller's resources.
///
/// Lookups try the form's own dictionary first and fall back to the
/// invoking context, matching how form XObjects inherit resources.
pub struct FallbackResolver {
    primary: Option<Arc<dyn ResourceResolver>>,
    fallback: Arc<dyn ResourceResolver>,
}

impl FallbackResolver {
    pub fn new(
        primary: Option<Arc<dyn ResourceResolver>>,
        fallback: Arc<dyn ResourceResolver>,
    ) -> Self {
        Self { primary, fallback }
    }
}

impl ResourceResolver for FallbackResolver {
    fn ext_g_state(&self, name: &str) -> Option<ExtGState> {
        self.primary
            .as_ref()
            .and_then(|p| p.ext_g_state(name))
            .or_else(|| self.fallback.ext_g_state(name))
    }

    fn x_object(&self, name: &str) -> Option<XObjectSlot> {
        self.primary
            .as_ref()
            .and_then(|p| p.x_object(name))
            .or_else(|| self.fallback.x_object(name))
    }

    fn color_space(&self, name: &str) -> Option<crate::model::color::ColorSpace> {
        self.primary
            .as_ref()
            .and_then(|p| p.color_space(name))
            .or_else(|| self.fallback.color_space(name))
    }
}
