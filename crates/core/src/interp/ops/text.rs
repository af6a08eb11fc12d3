//! Text operators.
//!
//! Text state lives inside the graphics state and is saved/restored with
//! it. Showing operators hand raw bytes to the device; decoding stays in
//! the font decoder so the interpreter is font-agnostic.

use crate::interp::device::TextItem;
use crate::interp::interpreter::{Operand, PageInterpreter};

#[allow(non_snake_case)]
impl<'a> PageInterpreter<'a> {
    // ========================================================================
    // Text object
    // ========================================================================

    /// Begins a text object: text and line matrix reset to identity.
    ///
    /// PDF operator: `BT`
    pub fn do_BT(&mut self) {
        self.state.text.reset();
    }

    /// Ends a text object. Text state persists for the next `BT`.
    ///
    /// PDF operator: `ET`
    pub fn do_ET(&mut self) {}

    // ========================================================================
    // Text state
    // ========================================================================

    /// Sets character spacing.
    ///
    /// PDF operator: `Tc`
    pub fn do_Tc(&mut self, spacing: f64) {
        self.state.text.char_spacing = spacing;
    }

    /// Sets word spacing.
    ///
    /// PDF operator: `Tw`
    pub fn do_Tw(&mut self, spacing: f64) {
        self.state.text.word_spacing = spacing;
    }

    /// Sets horizontal scaling (percent, 100 = normal).
    ///
    /// PDF operator: `Tz`
    pub fn do_Tz(&mut self, scaling: f64) {
        self.state.text.horizontal_scaling = scaling;
    }

    /// Sets text leading. Stored negated so `T*` is a plain translate.
    ///
    /// PDF operator: `TL`
    pub fn do_TL(&mut self, leading: f64) {
        self.state.text.leading = -leading;
    }

    /// Sets the font resource name and nominal size.
    ///
    /// The name is kept as-is; resolution against the font table happens
    /// when text is shown or decoded.
    ///
    /// PDF operator: `Tf`
    pub fn do_Tf(&mut self, name: &str, size: f64) {
        self.state.text.font_name = Some(name.to_string());
        self.state.text.font_size = size;
    }

    /// Sets the text render mode (0-7).
    ///
    /// PDF operator: `Tr`
    pub fn do_Tr(&mut self, mode: i32) {
        self.state.text.render_mode = mode;
    }

    /// Sets the baseline rise.
    ///
    /// PDF operator: `Ts`
    pub fn do_Ts(&mut self, rise: f64) {
        self.state.text.rise = rise;
    }

    // ========================================================================
    // Text positioning
    // ========================================================================

    /// Moves to the start of the next line, offset by (tx, ty).
    ///
    /// PDF operator: `Td`
    pub fn do_Td(&mut self, tx: f64, ty: f64) {
        let (a, b, c, d, e, f) = self.state.text.matrix;
        self.state.text.matrix = (a, b, c, d, tx * a + ty * c + e, tx * b + ty * d + f);
        self.state.text.line_matrix = (0.0, 0.0);
    }

    /// Like `Td`, and also sets the leading so `T*` repeats the ty
    /// offset.
    ///
    /// PDF operator: `TD`
    pub fn do_TD(&mut self, tx: f64, ty: f64) {
        self.do_Td(tx, ty);
        self.state.text.leading = ty;
    }

    /// Sets the text matrix and line matrix directly (absolute).
    ///
    /// PDF operator: `Tm`
    pub fn do_Tm(&mut self, m: crate::utils::Matrix) {
        self.state.text.matrix = m;
        self.state.text.line_matrix = (0.0, 0.0);
    }

    /// Moves to the start of the next line using the current leading.
    ///
    /// PDF operator: `T*`
    pub fn do_T_star(&mut self) {
        // Leading already stores -TL, so this is Td(0, leading).
        let leading = self.state.text.leading;
        self.do_Td(0.0, leading);
    }

    // ========================================================================
    // Text showing
    // ========================================================================

    /// Shows text with per-item positioning adjustments.
    ///
    /// PDF operator: `TJ`
    pub fn do_TJ(&mut self, seq: Vec<Operand>) {
        let items: Vec<TextItem> = seq
            .into_iter()
            .filter_map(|item| match item {
                Operand::Number(n) => Some(TextItem::Adjust(n)),
                Operand::String(s) => Some(TextItem::Show(s)),
                _ => None,
            })
            .collect();
        self.show(&items);
    }

    /// Shows a text string.
    ///
    /// PDF operator: `Tj`
    pub fn do_Tj(&mut self, s: Vec<u8>) {
        self.show(&[TextItem::Show(s)]);
    }

    /// Moves to the next line and shows text.
    ///
    /// PDF operator: `'`
    pub fn do_quote(&mut self, s: Vec<u8>) {
        self.do_T_star();
        self.do_Tj(s);
    }

    /// Sets word and character spacing, moves to the next line, and shows
    /// text.
    ///
    /// PDF operator: `"`
    pub fn do_doublequote(&mut self, aw: f64, ac: f64, s: Vec<u8>) {
        self.do_Tw(aw);
        self.do_Tc(ac);
        self.do_quote(s);
    }

    fn show(&mut self, items: &[TextItem]) {
        self.device.show_text(&mut self.state, items, &self.fonts);
    }
}
