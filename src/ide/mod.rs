//! Editor features built on the filter tree.
//!
//! This module is the interface between the filter tree and an editor
//! widget. Each function answers one editor request.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take a tree in, return plain data out
//! 2. **No widget types**: Hosts convert ranges and classes themselves
//! 3. **Composable**: Built on `syntax` queries only
//!
//! ## Usage
//!
//! ```
//! use ldapfilter::ide::FilterAnalysisHost;
//!
//! let mut host = FilterAnalysisHost::new();
//! host.set_text("(&(cn=Bob)(sn=))");
//!
//! let analysis = host.analysis();
//! assert_eq!(analysis.diagnostics().len(), 1);
//! ```

mod analysis;
mod completion;
mod diagnostics;
mod highlight;

pub use analysis::{Analysis, FilterAnalysisHost};
pub use completion::{CompletionContext, CompletionKind, completion_contexts};
pub use diagnostics::{Diagnostic, diagnostics};
pub use highlight::{HighlightClass, HighlightedToken, highlights};
