//! Inline diagnostics for invalid filter parts.

use text_size::{TextRange, TextSize};

use crate::parser::Token;
use crate::syntax::{FilterNode, FilterTree, InvalidCause};

/// One problem with the filter text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub cause: InvalidCause,
    /// Offending tokens, or an empty range where a missing token belongs.
    pub range: TextRange,
    pub message: String,
}

impl Diagnostic {
    /// Stable code for the cause, e.g. `missing-value`.
    pub fn code(&self) -> &'static str {
        self.cause.as_str()
    }
}

/// Get one diagnostic per local cause of every invalid node, in tree order.
pub fn diagnostics(tree: &FilterTree) -> Vec<Diagnostic> {
    let mut result = Vec::new();
    for node in tree.invalid_subtrees() {
        for cause in node.causes() {
            result.push(Diagnostic {
                cause,
                range: cause_range(node, cause),
                message: cause.description().to_string(),
            });
        }
    }
    tracing::debug!(count = result.len(), "computed filter diagnostics");
    result
}

fn cause_range(node: &FilterNode, cause: InvalidCause) -> TextRange {
    let span = node.span().unwrap_or_default();
    match cause {
        InvalidCause::MissingOpenParen => TextRange::empty(span.start()),
        InvalidCause::MissingCloseParen => TextRange::empty(span.end()),
        InvalidCause::UnrecognizedFragment => node
            .stray_tokens()
            .iter()
            .map(Token::range)
            .reduce(TextRange::cover)
            .unwrap_or(span),
        InvalidCause::TooManyNotChildren => node
            .as_branch()
            .and_then(|branch| {
                branch
                    .surplus_children()
                    .iter()
                    .filter_map(FilterNode::span)
                    .reduce(TextRange::cover)
            })
            .unwrap_or(span),
        InvalidCause::MissingOperator
        | InvalidCause::MissingAttribute
        | InvalidCause::MissingMatchingRule
        | InvalidCause::MissingValue
        | InvalidCause::EmptyBranch => {
            TextRange::empty(expected_at(node, cause).unwrap_or(span.end()))
        }
    }
}

/// Where the token missing for `cause` would have to be typed.
fn expected_at(node: &FilterNode, cause: InvalidCause) -> Option<TextSize> {
    use InvalidCause::*;

    let token = match (node, cause) {
        (FilterNode::Branch(n), MissingOperator) => n.open_paren(),
        (FilterNode::Branch(n), EmptyBranch) => n.operator_token().or(n.open_paren()),

        (FilterNode::Item(n), MissingAttribute) => n.open_paren(),
        (FilterNode::Item(n), MissingOperator) => n.attribute_token().or(n.open_paren()),
        (FilterNode::Item(n), MissingValue) => n.operator_token(),

        (FilterNode::Extensible(n), MissingAttribute) => n.open_paren(),
        (FilterNode::Extensible(n), MissingMatchingRule) => n.rule_colon_token(),
        (FilterNode::Extensible(n), MissingOperator) => n
            .matching_rule_token()
            .or(n.rule_colon_token())
            .or(n.dn_token())
            .or(n.attribute_token())
            .or(n.open_paren()),
        (FilterNode::Extensible(n), MissingValue) => n.operator_token(),

        (FilterNode::Undefined(n), MissingAttribute) => n.open_paren(),
        _ => None,
    };
    token.map(Token::end)
}
