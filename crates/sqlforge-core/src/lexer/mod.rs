//! SQL lexer.
//!
//! A hand-written lexer that produces a stream of tokens, each carrying the
//! byte span it was read from.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;
