//! Color operators.
//!
//! cs/CS select a color space by tag; sc/scn/SC/SCN set components in the
//! selected space; rg/g/k and their stroking twins set color and space in
//! one step. Pattern operands degrade to a neutral placeholder since no
//! pattern engine sits behind the extraction model.

use smallvec::SmallVec;
use tracing::trace;

use crate::interp::interpreter::{Operand, PageInterpreter};
use crate::model::color::{Color, ColorSpace, PATTERN_PLACEHOLDER, PREDEFINED_COLORSPACE};

/// Initial color for a freshly selected space.
fn initial_color(cs: &ColorSpace) -> Color {
    if cs.is_pattern() {
        return PATTERN_PLACEHOLDER;
    }
    match cs.ncomponents {
        3 => Color::Rgb(0.0, 0.0, 0.0),
        4 => Color::Cmyk(0.0, 0.0, 0.0, 1.0),
        _ => Color::Gray(0.0),
    }
}

#[allow(non_snake_case)]
impl<'a> PageInterpreter<'a> {
    fn lookup_color_space(&self, name: &str) -> ColorSpace {
        if let Some(cs) = PREDEFINED_COLORSPACE.get(name) {
            return cs.clone();
        }
        match self.resources.color_space(name) {
            Some(cs) => cs,
            None => {
                trace!(name, "unknown color space, treating as DeviceGray");
                ColorSpace::new("DeviceGray", 1)
            }
        }
    }

    /// Sets the stroking color space.
    ///
    /// PDF operator: `CS`
    pub fn do_CS(&mut self, name: &str) {
        let cs = self.lookup_color_space(name);
        self.state.stroke_color = initial_color(&cs);
        self.state.stroke_cs = cs;
    }

    /// Sets the non-stroking color space.
    ///
    /// PDF operator: `cs`
    pub fn do_cs(&mut self, name: &str) {
        let cs = self.lookup_color_space(name);
        self.state.fill_color = initial_color(&cs);
        self.state.fill_cs = cs;
    }

    /// Resolves sc/scn-style operands to a color value.
    ///
    /// A trailing name operand means a pattern reference; patterns resolve
    /// to the mid-gray placeholder. Otherwise the component count decides
    /// the color family.
    fn color_from_operands(args: &mut Vec<Operand>) -> Option<Color> {
        if matches!(args.last(), Some(Operand::Name(_))) {
            return Some(PATTERN_PLACEHOLDER);
        }
        let mut components: SmallVec<[f64; 4]> = SmallVec::new();
        for arg in args.iter() {
            if let Operand::Number(n) = arg {
                components.push(*n);
            }
        }
        Color::from_components(&components)
    }

    /// Sets the stroking color in the current color space.
    ///
    /// PDF operators: `SC`, `SCN`
    pub fn do_SC(&mut self, args: &mut Vec<Operand>) {
        if let Some(color) = Self::color_from_operands(args) {
            self.state.stroke_color = color;
        }
    }

    /// Sets the non-stroking color in the current color space.
    ///
    /// PDF operators: `sc`, `scn`
    pub fn do_sc(&mut self, args: &mut Vec<Operand>) {
        if let Some(color) = Self::color_from_operands(args) {
            self.state.fill_color = color;
        }
    }

    /// Sets the stroking color to a gray level.
    ///
    /// PDF operator: `G`
    pub fn do_G(&mut self, gray: f64) {
        self.state.stroke_cs = ColorSpace::new("DeviceGray", 1);
        self.state.stroke_color = Color::Gray(gray);
    }

    /// Sets the non-stroking color to a gray level.
    ///
    /// PDF operator: `g`
    pub fn do_g(&mut self, gray: f64) {
        self.state.fill_cs = ColorSpace::new("DeviceGray", 1);
        self.state.fill_color = Color::Gray(gray);
    }

    /// Sets the stroking color to an RGB value.
    ///
    /// PDF operator: `RG`
    pub fn do_RG(&mut self, r: f64, g: f64, b: f64) {
        self.state.stroke_cs = ColorSpace::new("DeviceRGB", 3);
        self.state.stroke_color = Color::Rgb(r, g, b);
    }

    /// Sets the non-stroking color to an RGB value.
    ///
    /// PDF operator: `rg`
    pub fn do_rg(&mut self, r: f64, g: f64, b: f64) {
        self.state.fill_cs = ColorSpace::new("DeviceRGB", 3);
        self.state.fill_color = Color::Rgb(r, g, b);
    }

    /// Sets the stroking color to a CMYK value.
    ///
    /// PDF operator: `K`
    pub fn do_K(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.state.stroke_cs = ColorSpace::new("DeviceCMYK", 4);
        self.state.stroke_color = Color::Cmyk(c, m, y, k);
    }

    /// Sets the non-stroking color to a CMYK value.
    ///
    /// PDF operator: `k`
    pub fn do_k(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.state.fill_cs = ColorSpace::new("DeviceCMYK", 4);
        self.state.fill_color = Color::Cmyk(c, m, y, k);
    }
}
