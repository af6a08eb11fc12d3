//! Content-stream interpretation.
//!
//! This module contains:
//! - `interpreter`: the operator parser and graphics-state machine
//! - `device`: the output seam collecting elements, plus the path builder
//! - `ops`: operator implementations by category

pub mod device;
pub mod interpreter;
pub mod ops;

pub use device::{ElementCollector, OutputDevice, TextItem, build_path};
pub use interpreter::{InterpretOptions, Operand, PageInterpreter};
