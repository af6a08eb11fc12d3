//! Operator parser and graphics-state machine.
//!
//! Consumes the token stream of one page (or form) and drives the output
//! device. Interpretation is best-effort throughout: unknown operators,
//! short operand stacks, and unresolvable resources degrade to skips, and
//! a malformed stream can never abort the page.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{trace, warn};

use crate::font::FontTable;
use crate::interp::device::OutputDevice;
use crate::model::elements::PathSegment;
use crate::model::state::GraphicsState;
use crate::parser::{ContentLexer, Token};
use crate::resources::ResourceResolver;
use crate::utils::{Matrix, Point};

/// A composed operand awaiting its operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    String(Vec<u8>),
    Name(String),
    Bool(bool),
    Array(Vec<Operand>),
    Dict(FxHashMap<String, Operand>),
}

/// Interpretation limits.
#[derive(Debug, Clone)]
pub struct InterpretOptions {
    /// Operator budget per page, counted across nested forms. Adversarial
    /// streams hit this instead of running unbounded.
    pub max_ops: usize,
    /// Maximum form-XObject nesting depth.
    pub max_form_depth: usize,
}

impl Default for InterpretOptions {
    fn default() -> Self {
        Self {
            max_ops: 1_000_000,
            max_form_depth: 15,
        }
    }
}

type Handler = fn(&mut PageInterpreter<'_>, &mut Vec<Operand>);

/// Operator dispatch table. Adding an operator is a data change here plus
/// a handler method in `ops/`.
static HANDLERS: Lazy<FxHashMap<&'static [u8], Handler>> = Lazy::new(|| {
    let entries: &[(&'static [u8], Handler)] = &[
        // Graphics state
        (b"q", |i, _| i.do_q()),
        (b"Q", |i, _| i.do_Q()),
        (b"cm", |i, a| {
            if let Some(m) = pop_matrix(a) {
                i.do_cm(m);
            }
        }),
        (b"w", |i, a| {
            if let Some(w) = pop_number(a) {
                i.do_w(w);
            }
        }),
        (b"d", |i, a| {
            if a.len() >= 2 {
                let phase = pop_number(a).unwrap_or(0.0);
                let pattern = pop_number_array(a).unwrap_or_default();
                i.do_d(pattern, phase);
            }
        }),
        (b"gs", |i, a| {
            if let Some(name) = pop_name(a) {
                i.do_gs(&name);
            }
        }),
        // Accepted but not tracked: cap/join/miter/intent/flatness.
        (b"J", |_, a| drop(pop_number(a))),
        (b"j", |_, a| drop(pop_number(a))),
        (b"M", |_, a| drop(pop_number(a))),
        (b"ri", |_, a| drop(pop_name(a))),
        (b"i", |_, a| drop(pop_number(a))),
        // Path construction
        (b"m", |i, a| {
            if let Some(p) = pop_point(a) {
                i.do_m(p);
            }
        }),
        (b"l", |i, a| {
            if let Some(p) = pop_point(a) {
                i.do_l(p);
            }
        }),
        (b"c", |i, a| {
            if let Some([x1, y1, x2, y2, x3, y3]) = pop_numbers::<6>(a) {
                i.do_c(x1, y1, x2, y2, x3, y3);
            }
        }),
        (b"v", |i, a| {
            if let Some([x2, y2, x3, y3]) = pop_numbers::<4>(a) {
                i.do_v(x2, y2, x3, y3);
            }
        }),
        (b"y", |i, a| {
            if let Some([x1, y1, x3, y3]) = pop_numbers::<4>(a) {
                i.do_y(x1, y1, x3, y3);
            }
        }),
        (b"h", |i, _| i.do_h()),
        (b"re", |i, a| {
            if let Some([x, y, w, h]) = pop_numbers::<4>(a) {
                i.do_re(x, y, w, h);
            }
        }),
        // Path painting
        (b"S", |i, _| i.do_S()),
        (b"s", |i, _| i.do_s()),
        (b"f", |i, _| i.do_f()),
        (b"F", |i, _| i.do_f()),
        (b"f*", |i, _| i.do_f_star()),
        (b"B", |i, _| i.do_B()),
        (b"B*", |i, _| i.do_B_star()),
        (b"b", |i, _| i.do_b()),
        (b"b*", |i, _| i.do_b_star()),
        (b"n", |i, _| i.do_n()),
        // Clipping
        (b"W", |i, _| i.do_W()),
        (b"W*", |i, _| i.do_W()),
        // Color
        (b"CS", |i, a| {
            if let Some(name) = pop_name(a) {
                i.do_CS(&name);
            }
        }),
        (b"cs", |i, a| {
            if let Some(name) = pop_name(a) {
                i.do_cs(&name);
            }
        }),
        (b"SC", |i, a| i.do_SC(a)),
        (b"SCN", |i, a| i.do_SC(a)),
        (b"sc", |i, a| i.do_sc(a)),
        (b"scn", |i, a| i.do_sc(a)),
        (b"G", |i, a| {
            if let Some(g) = pop_number(a) {
                i.do_G(g);
            }
        }),
        (b"g", |i, a| {
            if let Some(g) = pop_number(a) {
                i.do_g(g);
            }
        }),
        (b"RG", |i, a| {
            if let Some([r, g, b]) = pop_numbers::<3>(a) {
                i.do_RG(r, g, b);
            }
        }),
        (b"rg", |i, a| {
            if let Some([r, g, b]) = pop_numbers::<3>(a) {
                i.do_rg(r, g, b);
            }
        }),
        (b"K", |i, a| {
            if let Some([c, m, y, k]) = pop_numbers::<4>(a) {
                i.do_K(c, m, y, k);
            }
        }),
        (b"k", |i, a| {
            if let Some([c, m, y, k]) = pop_numbers::<4>(a) {
                i.do_k(c, m, y, k);
            }
        }),
        // Text object and state
        (b"BT", |i, _| i.do_BT()),
        (b"ET", |i, _| i.do_ET()),
        (b"Tc", |i, a| {
            if let Some(v) = pop_number(a) {
                i.do_Tc(v);
            }
        }),
        (b"Tw", |i, a| {
            if let Some(v) = pop_number(a) {
                i.do_Tw(v);
            }
        }),
        (b"Tz", |i, a| {
            if let Some(v) = pop_number(a) {
                i.do_Tz(v);
            }
        }),
        (b"TL", |i, a| {
            if let Some(v) = pop_number(a) {
                i.do_TL(v);
            }
        }),
        (b"Tf", |i, a| {
            if a.len() >= 2 {
                let size = pop_number(a).unwrap_or(0.0);
                if let Some(name) = pop_name(a) {
                    i.do_Tf(&name, size);
                }
            }
        }),
        (b"Tr", |i, a| {
            if let Some(v) = pop_number(a) {
                i.do_Tr(v as i32);
            }
        }),
        (b"Ts", |i, a| {
            if let Some(v) = pop_number(a) {
                i.do_Ts(v);
            }
        }),
        // Text positioning
        (b"Td", |i, a| {
            if let Some((tx, ty)) = pop_point(a) {
                i.do_Td(tx, ty);
            }
        }),
        (b"TD", |i, a| {
            if let Some((tx, ty)) = pop_point(a) {
                i.do_TD(tx, ty);
            }
        }),
        (b"Tm", |i, a| {
            if let Some(m) = pop_matrix(a) {
                i.do_Tm(m);
            }
        }),
        (b"T*", |i, _| i.do_T_star()),
        // Text showing
        (b"Tj", |i, a| {
            if let Some(s) = pop_string(a) {
                i.do_Tj(s);
            }
        }),
        (b"TJ", |i, a| {
            if let Some(arr) = pop_array(a) {
                i.do_TJ(arr);
            }
        }),
        (b"'", |i, a| {
            if let Some(s) = pop_string(a) {
                i.do_quote(s);
            }
        }),
        (b"\"", |i, a| {
            if a.len() >= 3 {
                let s = pop_string(a).unwrap_or_default();
                let ac = pop_number(a).unwrap_or(0.0);
                let aw = pop_number(a).unwrap_or(0.0);
                i.do_doublequote(aw, ac, s);
            }
        }),
        // XObjects
        (b"Do", |i, a| {
            if let Some(name) = pop_name(a) {
                i.do_Do(&name);
            }
        }),
        // Marked content: consumed, no elements
        (b"BMC", |_, a| drop(pop_name(a))),
        (b"BDC", |_, a| a.clear()),
        (b"EMC", |_, _| {}),
        (b"MP", |_, a| drop(pop_name(a))),
        (b"DP", |_, a| a.clear()),
        // Shading and Type 3 glyph metrics: out of the extraction model
        (b"sh", |i, a| {
            if let Some(name) = pop_name(a) {
                i.do_sh(&name);
            }
        }),
        (b"d0", |_, a| a.clear()),
        (b"d1", |_, a| a.clear()),
    ];
    entries.iter().copied().collect()
});

/// Composition frame for bracketed operand runs.
enum Context {
    Array(Vec<Operand>),
    Dict(Vec<Operand>),
}

/// Interprets one page's content stream against an output device.
pub struct PageInterpreter<'a> {
    pub(crate) state: GraphicsState,
    pub(crate) gstack: Vec<GraphicsState>,
    pub(crate) curpath: Vec<PathSegment>,
    pub(crate) current_point: Option<Point>,
    /// Set by `W`/`W*`; marks the next painted path clip-only.
    pub(crate) pending_clip: bool,
    pub(crate) resources: Arc<dyn ResourceResolver>,
    pub(crate) fonts: Arc<FontTable>,
    pub(crate) device: &'a mut dyn OutputDevice,
    pub(crate) options: InterpretOptions,
    pub(crate) ops_used: usize,
    budget_exhausted: bool,
    /// Names of forms currently being expanded, for cycle detection.
    pub(crate) form_stack: Vec<String>,
}

impl<'a> PageInterpreter<'a> {
    pub fn new(
        device: &'a mut dyn OutputDevice,
        resources: Arc<dyn ResourceResolver>,
        fonts: Arc<FontTable>,
        options: InterpretOptions,
    ) -> Self {
        Self {
            state: GraphicsState::new(),
            gstack: Vec::new(),
            curpath: Vec::new(),
            current_point: None,
            pending_clip: false,
            resources,
            fonts,
            device,
            options,
            ops_used: 0,
            budget_exhausted: false,
            form_stack: Vec::new(),
        }
    }

    /// Access to the final graphics state, mainly for tests.
    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    /// Executes a content stream. Re-entered for form XObjects; the
    /// operator budget spans all nesting levels.
    pub fn execute(&mut self, content: &[u8]) {
        let mut operands: Vec<Operand> = Vec::new();
        let mut contexts: Vec<Context> = Vec::new();
        let mut skipping_inline = false;

        for token in ContentLexer::new(content) {
            if self.budget_exhausted {
                return;
            }
            if skipping_inline {
                if matches!(&token, Token::Operator(op) if op.as_slice() == b"EI") {
                    skipping_inline = false;
                }
                continue;
            }
            match token {
                Token::Number(n) => push_value(&mut contexts, &mut operands, Operand::Number(n)),
                Token::LiteralString(s) | Token::HexString(s) => {
                    push_value(&mut contexts, &mut operands, Operand::String(s));
                }
                Token::Name(n) => push_value(&mut contexts, &mut operands, Operand::Name(n)),
                Token::ArrayOpen => contexts.push(Context::Array(Vec::new())),
                Token::DictOpen => contexts.push(Context::Dict(Vec::new())),
                Token::ArrayClose => match contexts.pop() {
                    Some(Context::Array(items)) => {
                        push_value(&mut contexts, &mut operands, Operand::Array(items));
                    }
                    Some(ctx) => {
                        // Mismatched close: keep the outer frame alive.
                        contexts.push(ctx);
                    }
                    None => trace!("stray ] ignored"),
                },
                Token::DictClose => match contexts.pop() {
                    Some(Context::Dict(items)) => {
                        push_value(&mut contexts, &mut operands, Operand::Dict(pair_dict(items)));
                    }
                    Some(ctx) => {
                        contexts.push(ctx);
                    }
                    None => trace!("stray >> ignored"),
                },
                Token::Operator(op) => {
                    if !contexts.is_empty() {
                        // Inside a bracketed value only true/false/null
                        // carry meaning.
                        match op.as_slice() {
                            b"true" => {
                                push_value(&mut contexts, &mut operands, Operand::Bool(true));
                                continue;
                            }
                            b"false" => {
                                push_value(&mut contexts, &mut operands, Operand::Bool(false));
                                continue;
                            }
                            b"null" => continue,
                            _ => {
                                // An operator inside an unterminated
                                // bracket run: dissolve the run so the
                                // operator still executes.
                                trace!("dissolving unterminated bracket run");
                                for ctx in contexts.drain(..) {
                                    let (Context::Array(items) | Context::Dict(items)) = ctx;
                                    operands.extend(items);
                                }
                            }
                        }
                    }
                    if op.as_slice() == b"BI" {
                        // Inline images have no resolver entry; skip the
                        // payload up to EI.
                        trace!("skipping inline image");
                        skipping_inline = true;
                        operands.clear();
                        continue;
                    }
                    self.ops_used += 1;
                    if self.ops_used > self.options.max_ops {
                        warn!(
                            max_ops = self.options.max_ops,
                            "operator budget exhausted, truncating page"
                        );
                        self.budget_exhausted = true;
                        return;
                    }
                    match HANDLERS.get(op.as_slice()) {
                        Some(handler) => handler(self, &mut operands),
                        None => {
                            trace!(op = %String::from_utf8_lossy(&op), "unknown operator ignored")
                        }
                    }
                    operands.clear();
                }
            }
        }
    }
}

fn push_value(contexts: &mut [Context], operands: &mut Vec<Operand>, value: Operand) {
    match contexts.last_mut() {
        Some(Context::Array(items)) | Some(Context::Dict(items)) => items.push(value),
        None => operands.push(value),
    }
}

/// Pairs a flat dict item list into a key/value map; odd tails and
/// non-name keys are dropped.
fn pair_dict(items: Vec<Operand>) -> FxHashMap<String, Operand> {
    let mut map = FxHashMap::default();
    let mut iter = items.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        if let Operand::Name(key) = key {
            map.insert(key, value);
        }
    }
    map
}

// ============================================================================
// Operand popping helpers
// ============================================================================

pub(crate) fn pop_number(args: &mut Vec<Operand>) -> Option<f64> {
    match args.pop()? {
        Operand::Number(n) => Some(n),
        _ => None,
    }
}

pub(crate) fn pop_name(args: &mut Vec<Operand>) -> Option<String> {
    match args.pop()? {
        Operand::Name(n) => Some(n),
        _ => None,
    }
}

pub(crate) fn pop_string(args: &mut Vec<Operand>) -> Option<Vec<u8>> {
    match args.pop()? {
        Operand::String(s) => Some(s),
        _ => None,
    }
}

pub(crate) fn pop_array(args: &mut Vec<Operand>) -> Option<Vec<Operand>> {
    match args.pop()? {
        Operand::Array(items) => Some(items),
        _ => None,
    }
}

/// Pops N numbers pushed in operand order.
pub(crate) fn pop_numbers<const N: usize>(args: &mut Vec<Operand>) -> Option<[f64; N]> {
    if args.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for slot in out.iter_mut().rev() {
        *slot = pop_number(args)?;
    }
    Some(out)
}

pub(crate) fn pop_point(args: &mut Vec<Operand>) -> Option<Point> {
    let [x, y] = pop_numbers::<2>(args)?;
    Some((x, y))
}

pub(crate) fn pop_matrix(args: &mut Vec<Operand>) -> Option<Matrix> {
    let [a, b, c, d, e, f] = pop_numbers::<6>(args)?;
    Some((a, b, c, d, e, f))
}

/// Pops an array operand and keeps its numeric entries.
pub(crate) fn pop_number_array(args: &mut Vec<Operand>) -> Option<Vec<f64>> {
    let items = pop_array(args)?;
    Some(
        items
            .into_iter()
            .filter_map(|item| match item {
                Operand::Number(n) => Some(n),
                _ => None,
            })
            .collect(),
    )
}
