//! Parse result: the root filter plus any stray top-level siblings

use text_size::{TextRange, TextSize};

use super::node::FilterNode;
use crate::parser::Token;

/// Top-level nodes of one parse, in source order.
///
/// Text before the first `(` and text after the root filter are kept as
/// [`FilterNode::Undefined`] siblings of the root. There is always at least
/// one node: input without any `(` produces a single undefined root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTree {
    nodes: Vec<FilterNode>,
    root: usize,
}

impl FilterTree {
    pub(crate) fn new(mut nodes: Vec<FilterNode>, root: usize) -> Self {
        if nodes.is_empty() {
            nodes.push(FilterNode::undefined());
        }
        let root = root.min(nodes.len() - 1);
        Self { nodes, root }
    }

    /// The filter itself, or the undefined placeholder if no `(` was found.
    pub fn root(&self) -> &FilterNode {
        &self.nodes[self.root]
    }

    /// Every top-level node including the root.
    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    /// Top-level undefined nodes before and after the root.
    pub fn siblings(&self) -> impl Iterator<Item = &FilterNode> {
        let root = self.root;
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != root)
            .map(|(_, node)| node)
    }

    /// Valid iff the root is valid and nothing else surrounds it.
    pub fn is_valid(&self) -> bool {
        self.nodes.len() == 1 && self.root().is_valid()
    }

    pub fn invalid_subtrees(&self) -> Vec<&FilterNode> {
        self.nodes.iter().flat_map(FilterNode::invalid_subtrees).collect()
    }

    /// Deepest node at `offset` across all top-level nodes. A node whose span
    /// contains the offset wins over a preceding node that merely ends there.
    pub fn node_at_offset(&self, offset: TextSize) -> Option<&FilterNode> {
        let spans: Vec<Option<TextRange>> = self.nodes.iter().map(FilterNode::span).collect();
        let hit = spans
            .iter()
            .position(|span| span.is_some_and(|s| s.contains(offset)))
            .or_else(|| spans.iter().position(|span| span.is_some_and(|s| s.end() == offset)))?;
        self.nodes[hit].node_at_offset(offset)
    }

    pub fn all_tokens(&self) -> Vec<&Token> {
        let mut tokens: Vec<&Token> = self.nodes.iter().flat_map(FilterNode::all_tokens).collect();
        tokens.sort_by_key(|token| token.offset());
        tokens
    }

    pub fn to_text(&self) -> String {
        self.all_tokens().iter().map(|token| token.text()).collect()
    }
}
