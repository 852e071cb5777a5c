//! # sqlforge-core
//!
//! Turns a raw, literal-laden SQL statement into a named-parameter
//! statement, a typed metadata model read from a live database, and Java
//! data-access artifacts.
//!
//! This crate provides:
//! - A hand-written recursive descent parser with Pratt expression parsing
//! - Span-based literal-to-parameter rewriting with hardcode markers
//! - A vendor-type mapping table
//! - Metadata extraction through the driver-agnostic [`Describe`] trait
//! - Java synthesis with builder or setter assembly
//!
//! ## Normalization
//!
//! ```rust
//! use sqlforge_core::rewrite::rewrite;
//!
//! let sql = rewrite(
//!     "SELECT * FROM users WHERE name = 'HARDCODE_AS_STRING{admin}' AND age > 30",
//! )
//! .unwrap();
//! assert_eq!(sql, "SELECT * FROM users WHERE name = 'admin' AND age > :age");
//! ```
//!
//! ## Generation
//!
//! [`Generator::generate`] runs the whole pipeline against any
//! [`Describe`] implementation and returns the metadata together with the
//! synthesized [`GeneratedArtifact`]s.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod generator;
pub mod lexer;
pub mod metadata;
pub mod naming;
pub mod parser;
pub mod rewrite;
pub mod type_map;

pub use ast::{Expr, Statement, StatementKind};
pub use codegen::{ArtifactKind, GeneratedArtifact, SynthesisOptions, Synthesizer};
pub use error::{ErrorKind, GenerateError, Result};
pub use generator::{detect_kind, Generation, GenerationRequest, Generator};
pub use lexer::{Lexer, Token, TokenKind};
pub use metadata::{Describe, StatementMetadata};
pub use parser::{parse, ParseError, Parser};
pub use rewrite::{normalize, rewrite, NormalizedStatement};
pub use type_map::{lookup, TypeMapping};
