//! Tolerant parser for LDAP search filters (RFC 4515 string form)
//!
//! Built for editors, where the text is nearly always half-typed:
//! - **logos** for the structural lexemes, with hand-scanned assertion values
//! - a recursive descent parser that never fails and never drops a token
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind, text and offset
//!     ↓
//! Parser → FilterTree (root filter + undefined siblings)
//!     ↓
//! syntax → validity, cursor lookup, mutation
//!     ↓
//! ide → diagnostics, completion contexts, highlighting
//! ```
//!
//! Whitespace outside assertion values is not tokenized, so rebuilding the
//! text from a tree yields the input without that whitespace.

#[allow(clippy::module_inception)]
mod parser;

mod lexer;
mod token;

pub use lexer::{Lexer, tokenize};
pub use parser::{parse, parse_text};
pub use token::{Token, TokenKind};
