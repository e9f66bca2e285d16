//! FilterAnalysisHost and Analysis: state management for one filter field.
//!
//! The `FilterAnalysisHost` owns the current text and its tree and hands out
//! `Analysis` snapshots for querying. Every edit reparses the whole text; the
//! last parse wins.
//!
//! ## Usage
//!
//! ```
//! use ldapfilter::ide::FilterAnalysisHost;
//!
//! let mut host = FilterAnalysisHost::new();
//! host.set_text("(cn=");
//! host.set_text("(cn=Bob)");
//!
//! let analysis = host.analysis();
//! assert_eq!(analysis.revision(), 2);
//! assert!(analysis.is_valid());
//! ```

use text_size::TextSize;

use crate::parser::parse_text;
use crate::syntax::{FilterNode, FilterTree};

use super::{CompletionContext, Diagnostic, HighlightedToken};

/// Owns the filter text and its parse.
///
/// Apply edits via `set_text()`, then get a consistent snapshot via
/// `analysis()`.
#[derive(Debug, Clone)]
pub struct FilterAnalysisHost {
    text: String,
    tree: FilterTree,
    /// Bumped on every `set_text`
    revision: u64,
}

impl Default for FilterAnalysisHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterAnalysisHost {
    /// Create a host holding the empty filter.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            tree: parse_text(""),
            revision: 0,
        }
    }

    /// Replace the whole text and reparse it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.tree = parse_text(&self.text);
        self.revision += 1;
        tracing::debug!(
            revision = self.revision,
            len = self.text.len(),
            valid = self.tree.is_valid(),
            "reparsed filter"
        );
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &FilterTree {
        &self.tree
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Get a read-only snapshot for queries.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            text: &self.text,
            tree: &self.tree,
            revision: self.revision,
        }
    }
}

/// Read-only snapshot of a [`FilterAnalysisHost`].
#[derive(Debug, Clone, Copy)]
pub struct Analysis<'a> {
    text: &'a str,
    tree: &'a FilterTree,
    revision: u64,
}

impl<'a> Analysis<'a> {
    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn tree(&self) -> &'a FilterTree {
        self.tree
    }

    /// Revision of the host when the snapshot was taken.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_valid(&self) -> bool {
        self.tree.is_valid()
    }

    pub fn node_at_offset(&self, offset: TextSize) -> Option<&'a FilterNode> {
        self.tree.node_at_offset(offset)
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        super::diagnostics(self.tree)
    }

    pub fn completion_contexts(&self, offset: TextSize) -> Vec<CompletionContext> {
        super::completion_contexts(self.tree, offset)
    }

    pub fn highlights(&self) -> Vec<HighlightedToken> {
        super::highlights(self.tree)
    }
}
