//! Content-stream tokenization.

pub mod lexer;

pub use lexer::{ContentLexer, Token};
