//! XObject operators.
//!
//! `Do` either places an image under the current CTM or recursively
//! interprets a form's content stream. Recursion is bounded by a depth
//! cap and a currently-expanding name set so cyclic forms truncate
//! instead of recursing forever.

use std::sync::Arc;
use tracing::warn;

use crate::interp::interpreter::PageInterpreter;
use crate::model::elements::PathSegment;
use crate::model::state::GraphicsState;
use crate::resources::{FallbackResolver, ResourceResolver, XObjectSlot};
use crate::utils::{Point, mult_matrix};

/// Interpreter registers saved around a form expansion.
pub(crate) struct FormFrame {
    gstack: Vec<GraphicsState>,
    state: GraphicsState,
    curpath: Vec<PathSegment>,
    current_point: Option<Point>,
    pending_clip: bool,
    resources: Arc<dyn ResourceResolver>,
}

#[allow(non_snake_case)]
impl<'a> PageInterpreter<'a> {
    /// Invokes a named XObject.
    ///
    /// PDF operator: `Do`
    pub fn do_Do(&mut self, name: &str) {
        let Some(slot) = self.resources.x_object(name) else {
            warn!(name, "unresolvable XObject, skipped");
            return;
        };
        match slot {
            XObjectSlot::Image {
                width,
                height,
                rgb,
                alpha,
            } => {
                self.device
                    .draw_image(name, width, height, &rgb, alpha.as_ref(), &self.state);
            }
            XObjectSlot::Form {
                content,
                matrix,
                resources,
            } => self.expand_form(name, &content, matrix, resources),
        }
    }

    fn expand_form(
        &mut self,
        name: &str,
        content: &[u8],
        matrix: crate::utils::Matrix,
        resources: Option<Arc<dyn ResourceResolver>>,
    ) {
        if self.form_stack.iter().any(|n| n == name) {
            warn!(name, "cyclic form XObject, expansion truncated");
            return;
        }
        if self.form_stack.len() >= self.options.max_form_depth {
            warn!(
                name,
                depth = self.form_stack.len(),
                "form nesting too deep, expansion truncated"
            );
            return;
        }

        let frame = self.snapshot_frame();
        self.form_stack.push(name.to_string());
        self.device.begin_form(name);

        self.state.ctm = mult_matrix(matrix, self.state.ctm);
        self.resources = Arc::new(FallbackResolver::new(resources, frame.resources.clone()));
        self.curpath.clear();
        self.current_point = None;
        self.pending_clip = false;
        self.execute(content);

        self.device.end_form(name);
        self.form_stack.pop();
        self.restore_frame(frame);
    }

    fn snapshot_frame(&mut self) -> FormFrame {
        FormFrame {
            gstack: std::mem::take(&mut self.gstack),
            state: self.state.clone(),
            curpath: std::mem::take(&mut self.curpath),
            current_point: self.current_point,
            pending_clip: self.pending_clip,
            resources: self.resources.clone(),
        }
    }

    fn restore_frame(&mut self, frame: FormFrame) {
        self.gstack = frame.gstack;
        self.state = frame.state;
        self.curpath = frame.curpath;
        self.current_point = frame.current_point;
        self.pending_clip = frame.pending_clip;
        self.resources = frame.resources;
    }

    /// Skips a shading paint; shading is outside the extraction model.
    ///
    /// PDF operator: `sh`
    pub fn do_sh(&mut self, name: &str) {
        tracing::trace!(name, "shading operator skipped");
    }
}
