//! Path construction and painting operators.
//!
//! Construction accumulates user-space segments; painting hands them to
//! the device, which transforms them through the CTM active at paint
//! time. A pending clip marks the path clip-only, and clip-only paths
//! never reach the output.

use crate::interp::interpreter::PageInterpreter;
use crate::model::elements::{FillRule, PaintOp, PathSegment};
use crate::utils::Point;

#[allow(non_snake_case)]
impl<'a> PageInterpreter<'a> {
    // ========================================================================
    // Path construction
    // ========================================================================

    /// Begins a new subpath at the given point.
    ///
    /// PDF operator: `m`
    pub fn do_m(&mut self, p: Point) {
        self.curpath.push(PathSegment::MoveTo(p.0, p.1));
        self.current_point = Some(p);
    }

    /// Appends a straight line segment from the current point.
    ///
    /// PDF operator: `l`
    pub fn do_l(&mut self, p: Point) {
        self.curpath.push(PathSegment::LineTo(p.0, p.1));
        self.current_point = Some(p);
    }

    /// Appends a cubic bezier with two explicit control points.
    ///
    /// PDF operator: `c`
    pub fn do_c(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.curpath
            .push(PathSegment::CurveTo(x1, y1, x2, y2, x3, y3));
        self.current_point = Some((x3, y3));
    }

    /// Appends a cubic bezier using the current point as first control
    /// point.
    ///
    /// PDF operator: `v`
    pub fn do_v(&mut self, x2: f64, y2: f64, x3: f64, y3: f64) {
        let (x1, y1) = self.current_point.unwrap_or((0.0, 0.0));
        self.curpath
            .push(PathSegment::CurveTo(x1, y1, x2, y2, x3, y3));
        self.current_point = Some((x3, y3));
    }

    /// Appends a cubic bezier using the endpoint as second control point.
    ///
    /// PDF operator: `y`
    pub fn do_y(&mut self, x1: f64, y1: f64, x3: f64, y3: f64) {
        self.curpath
            .push(PathSegment::CurveTo(x1, y1, x3, y3, x3, y3));
        self.current_point = Some((x3, y3));
    }

    /// Closes the current subpath.
    ///
    /// PDF operator: `h`
    pub fn do_h(&mut self) {
        self.curpath.push(PathSegment::Close);
    }

    /// Appends a rectangle as a complete subpath.
    ///
    /// PDF operator: `re`
    pub fn do_re(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.curpath.push(PathSegment::MoveTo(x, y));
        self.curpath.push(PathSegment::LineTo(x + w, y));
        self.curpath.push(PathSegment::LineTo(x + w, y + h));
        self.curpath.push(PathSegment::LineTo(x, y + h));
        self.curpath.push(PathSegment::Close);
        self.current_point = Some((x, y));
    }

    // ========================================================================
    // Path painting
    // ========================================================================

    /// Finalizes the in-progress path through the device and resets the
    /// path machinery, consuming any pending clip mark.
    fn paint_path(&mut self, paint: PaintOp, fill_rule: FillRule) {
        let clip_only = self.pending_clip || paint == PaintOp::None;
        self.device
            .paint_path(&self.state, paint, fill_rule, clip_only, &self.curpath);
        self.curpath.clear();
        self.current_point = None;
        self.pending_clip = false;
    }

    /// Strokes the current path.
    ///
    /// PDF operator: `S`
    pub fn do_S(&mut self) {
        self.paint_path(PaintOp::Stroke, FillRule::NonZero);
    }

    /// Closes and strokes the current path.
    ///
    /// PDF operator: `s`
    pub fn do_s(&mut self) {
        self.do_h();
        self.do_S();
    }

    /// Fills the current path with the nonzero winding rule.
    ///
    /// PDF operators: `f`, `F`
    pub fn do_f(&mut self) {
        self.paint_path(PaintOp::Fill, FillRule::NonZero);
    }

    /// Fills the current path with the even-odd rule.
    ///
    /// PDF operator: `f*`
    pub fn do_f_star(&mut self) {
        self.paint_path(PaintOp::Fill, FillRule::EvenOdd);
    }

    /// Fills and strokes with the nonzero winding rule.
    ///
    /// PDF operator: `B`
    pub fn do_B(&mut self) {
        self.paint_path(PaintOp::FillStroke, FillRule::NonZero);
    }

    /// Fills and strokes with the even-odd rule.
    ///
    /// PDF operator: `B*`
    pub fn do_B_star(&mut self) {
        self.paint_path(PaintOp::FillStroke, FillRule::EvenOdd);
    }

    /// Closes, fills, and strokes with the nonzero winding rule.
    ///
    /// PDF operator: `b`
    pub fn do_b(&mut self) {
        self.do_h();
        self.do_B();
    }

    /// Closes, fills, and strokes with the even-odd rule.
    ///
    /// PDF operator: `b*`
    pub fn do_b_star(&mut self) {
        self.do_h();
        self.do_B_star();
    }

    /// Ends the path without painting.
    ///
    /// PDF operator: `n`
    pub fn do_n(&mut self) {
        self.paint_path(PaintOp::None, FillRule::NonZero);
    }

    /// Marks the in-progress path as a clipping path.
    ///
    /// Clip regions are consumed, not intersected: the marked path is
    /// dropped from the output at its painting operator.
    ///
    /// PDF operators: `W`, `W*`
    pub fn do_W(&mut self) {
        self.pending_clip = true;
    }
}
