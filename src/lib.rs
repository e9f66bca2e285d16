//! # ldapfilter-base
//!
//! Tolerant tokenizer, parser and mutable tree for LDAP search filters, for
//! use behind filter editors and other tools that must cope with incomplete
//! input.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Diagnostics, completion contexts, highlighting
//!   ↓
//! syntax    → FilterTree/FilterNode, validity, slot mutation
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, tokens
//! ```
//!
//! ```
//! use ldapfilter::parser::parse_text;
//!
//! let tree = parse_text("(&(cn=Bob)(sn=))");
//! assert!(!tree.is_valid());
//! assert_eq!(tree.invalid_subtrees().len(), 1);
//! ```

// ============================================================================
// MODULES (dependency order: parser → syntax → ide)
// ============================================================================

/// Parser: logos lexer, recursive-descent parser, tokens
pub mod parser;

/// Syntax: filter tree nodes, validity and mutation
pub mod syntax;

/// Editor features: diagnostics, completion contexts, highlighting
pub mod ide;

// Re-export commonly needed items
pub use parser::{Token, TokenKind, parse, parse_text, tokenize};
pub use syntax::{FilterNode, FilterTree, InvalidCause, NodeKind};

/// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
