//! Graphics state operators.
//!
//! q/Q push and pop the state stack; cm composes the CTM; w/d track line
//! styling; gs merges an ExtGState resource into the current state.

use tracing::warn;

use crate::interp::interpreter::PageInterpreter;
use crate::resources::SoftMaskUpdate;
use crate::utils::{Matrix, matrix_scale, mult_matrix};

#[allow(non_snake_case)]
impl<'a> PageInterpreter<'a> {
    /// Saves the current graphics state to the stack.
    ///
    /// PDF operator: `q`
    pub fn do_q(&mut self) {
        self.gstack.push(self.state.clone());
    }

    /// Restores the graphics state from the stack.
    ///
    /// An unbalanced `Q` at the base state is a no-op, not an error.
    ///
    /// PDF operator: `Q`
    pub fn do_Q(&mut self) {
        if let Some(state) = self.gstack.pop() {
            self.state = state;
        }
    }

    /// Concatenates a matrix onto the current transformation matrix.
    ///
    /// PDF operator: `cm`
    pub fn do_cm(&mut self, m: Matrix) {
        self.state.ctm = mult_matrix(m, self.state.ctm);
    }

    /// Sets the line width, scaled into device units.
    ///
    /// PDF operator: `w`
    pub fn do_w(&mut self, width: f64) {
        self.state.line_width = width * matrix_scale(self.state.ctm);
    }

    /// Sets the line dash pattern.
    ///
    /// PDF operator: `d`
    pub fn do_d(&mut self, pattern: Vec<f64>, phase: f64) {
        self.state.dash = if pattern.is_empty() {
            None
        } else {
            Some((pattern, phase))
        };
    }

    /// Merges a named ExtGState resource into the current state.
    ///
    /// `ca`/`CA` update the alphas; `SMask` installs or clears the soft
    /// mask. A constant `ca` below 1.0 also arms the raster escape hatch,
    /// since the vector output model cannot carry it.
    ///
    /// PDF operator: `gs`
    pub fn do_gs(&mut self, name: &str) {
        let Some(ext) = self.resources.ext_g_state(name) else {
            warn!(name, "unresolvable ExtGState, ignored");
            return;
        };
        if let Some(ca) = ext.fill_alpha {
            self.state.fill_alpha = ca;
            self.state.soft_mask_alpha = ca;
        }
        if let Some(ca_stroke) = ext.stroke_alpha {
            self.state.stroke_alpha = ca_stroke;
        }
        match ext.soft_mask {
            SoftMaskUpdate::Unchanged => {}
            SoftMaskUpdate::Clear => self.state.soft_mask = None,
            SoftMaskUpdate::Set(mask) => self.state.soft_mask = Some(mask),
        }
    }
}
