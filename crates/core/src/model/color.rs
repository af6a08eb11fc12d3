//! Color spaces and color values.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::LazyLock;

/// A color-space tag: name plus component count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpace {
    /// Name of the color space (e.g., "DeviceRGB").
    pub name: String,
    /// Number of color components.
    pub ncomponents: usize,
}

impl ColorSpace {
    pub fn new(name: &str, ncomponents: usize) -> Self {
        Self {
            name: name.to_string(),
            ncomponents,
        }
    }

    pub fn is_pattern(&self) -> bool {
        self.name == "Pattern"
    }
}

/// Predefined color spaces resolvable without the resource dictionary.
pub static PREDEFINED_COLORSPACE: LazyLock<HashMap<&'static str, ColorSpace>> =
    LazyLock::new(|| {
        let entries = [
            ("DeviceGray", 1),
            ("CalGray", 1),
            ("DeviceRGB", 3),
            ("CalRGB", 3),
            ("Lab", 3),
            ("DeviceCMYK", 4),
            ("Separation", 1),
            ("Indexed", 1),
            ("Pattern", 1),
        ];
        let mut map = HashMap::with_capacity(entries.len());
        for (name, n) in entries {
            map.insert(name, ColorSpace::new(name, n));
        }
        map
    });

/// A resolved color value.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// Greyscale (0.0 = black, 1.0 = white).
    Gray(f64),
    Rgb(f64, f64, f64),
    Cmyk(f64, f64, f64, f64),
}

impl Default for Color {
    fn default() -> Self {
        Color::Gray(0.0)
    }
}

/// Pattern operands cannot be resolved without a pattern engine; they
/// degrade to this placeholder.
pub const PATTERN_PLACEHOLDER: Color = Color::Gray(0.5);

impl Color {
    /// Builds a color from raw operand components; anything other than
    /// 1, 3 or 4 components yields `None`.
    pub fn from_components(components: &SmallVec<[f64; 4]>) -> Option<Self> {
        match components.as_slice() {
            [g] => Some(Color::Gray(*g)),
            [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
            [c, m, y, k] => Some(Color::Cmyk(*c, *m, *y, *k)),
            _ => None,
        }
    }

    /// Resolves to 8-bit RGB for rasterization.
    pub fn to_rgb8(&self) -> [u8; 3] {
        fn chan(v: f64) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        match *self {
            Color::Gray(g) => [chan(g); 3],
            Color::Rgb(r, g, b) => [chan(r), chan(g), chan(b)],
            Color::Cmyk(c, m, y, k) => [
                chan((1.0 - c) * (1.0 - k)),
                chan((1.0 - m) * (1.0 - k)),
                chan((1.0 - y) * (1.0 - k)),
            ],
        }
    }
}
