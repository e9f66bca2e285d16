//! Structural validity of filter nodes
//!
//! Invalidity is never stored: it is read off the tree shape. A node has
//! *local* causes when one of its own slots is missing or malformed; an
//! ancestor whose only problem is an invalid descendant has none.

use std::fmt;

use super::node::{BranchOperator, FilterNode};
use crate::parser::TokenKind;

/// Why a node is structurally incomplete.
///
/// Variants are listed in reporting priority: [`FilterNode::cause`] returns
/// the first that applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InvalidCause {
    /// The filter does not start with `(`
    MissingOpenParen,
    /// No `&`/`|`/`!` or comparison operator where one is required
    MissingOperator,
    /// No attribute description (or, for extensible matches, neither an
    /// attribute nor a matching rule)
    MissingAttribute,
    /// A `:` with no matching rule after it
    MissingMatchingRule,
    /// Comparison without an assertion value
    MissingValue,
    /// AND/OR/NOT without any nested filter
    EmptyBranch,
    /// NOT with more than one nested filter
    TooManyNotChildren,
    /// Tokens that do not fit the grammar at this position
    UnrecognizedFragment,
    /// The filter is not closed with `)`
    MissingCloseParen,
}

impl InvalidCause {
    pub const ALL: &'static [InvalidCause] = &[
        InvalidCause::MissingOpenParen,
        InvalidCause::MissingOperator,
        InvalidCause::MissingAttribute,
        InvalidCause::MissingMatchingRule,
        InvalidCause::MissingValue,
        InvalidCause::EmptyBranch,
        InvalidCause::TooManyNotChildren,
        InvalidCause::UnrecognizedFragment,
        InvalidCause::MissingCloseParen,
    ];

    /// Stable identifier, e.g. for diagnostic codes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingOpenParen => "missing-open-paren",
            Self::MissingOperator => "missing-operator",
            Self::MissingAttribute => "missing-attribute",
            Self::MissingMatchingRule => "missing-matching-rule",
            Self::MissingValue => "missing-value",
            Self::EmptyBranch => "empty-branch",
            Self::TooManyNotChildren => "too-many-not-children",
            Self::UnrecognizedFragment => "unrecognized-fragment",
            Self::MissingCloseParen => "missing-close-paren",
        }
    }

    /// Human-readable description for inline diagnostics.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MissingOpenParen => "filter must start with '('",
            Self::MissingOperator => "expected a filter operator",
            Self::MissingAttribute => "expected an attribute description",
            Self::MissingMatchingRule => "expected a matching rule after ':'",
            Self::MissingValue => "expected an assertion value",
            Self::EmptyBranch => "expected at least one nested filter",
            Self::TooManyNotChildren => "'!' takes exactly one nested filter",
            Self::UnrecognizedFragment => "unrecognized filter text",
            Self::MissingCloseParen => "filter must end with ')'",
        }
    }
}

impl fmt::Display for InvalidCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FilterNode {
    /// Local causes of invalidity, in priority order.
    pub fn causes(&self) -> Vec<InvalidCause> {
        use InvalidCause::*;

        let mut causes = Vec::new();
        let mut has_stray = false;
        match self {
            FilterNode::Branch(branch) => {
                if branch.open_paren.is_none() {
                    causes.push(MissingOpenParen);
                }
                if branch.operator_token.is_none() {
                    causes.push(MissingOperator);
                }
                if branch.children.is_empty() {
                    causes.push(EmptyBranch);
                }
                if branch.operator == BranchOperator::Not && branch.children.len() > 1 {
                    causes.push(TooManyNotChildren);
                }
                has_stray = !branch.stray.is_empty();
            }
            FilterNode::Item(item) => {
                if item.open_paren.is_none() {
                    causes.push(MissingOpenParen);
                }
                if item.operator_token.is_none() {
                    causes.push(MissingOperator);
                }
                if item.attribute_token.as_ref().is_none_or(|t| t.is_empty()) {
                    causes.push(MissingAttribute);
                }
                let is_present = item
                    .operator_token
                    .as_ref()
                    .is_some_and(|t| t.kind() == TokenKind::Present);
                if item.operator_token.is_some()
                    && !is_present
                    && item.value_token.is_none()
                    && item.substring_parts.is_empty()
                {
                    causes.push(MissingValue);
                }
                has_stray = !item.stray.is_empty();
            }
            FilterNode::Extensible(ext) => {
                if ext.open_paren.is_none() {
                    causes.push(MissingOpenParen);
                }
                if ext.operator_token.is_none() {
                    causes.push(MissingOperator);
                }
                if ext.attribute_token.is_none() && ext.matching_rule_token.is_none() {
                    causes.push(MissingAttribute);
                }
                if ext.rule_colon_token.is_some() && ext.matching_rule_token.is_none() {
                    causes.push(MissingMatchingRule);
                }
                if ext.value_token.is_none() {
                    causes.push(MissingValue);
                }
                has_stray = !ext.stray.is_empty();
            }
            FilterNode::Undefined(undefined) => {
                if undefined.open_paren.is_none() && undefined.tokens_seen.is_empty() {
                    causes.push(MissingOpenParen);
                } else if undefined.tokens_seen.is_empty() {
                    causes.push(MissingAttribute);
                } else {
                    causes.push(UnrecognizedFragment);
                }
            }
        }
        if has_stray {
            causes.push(UnrecognizedFragment);
        }
        if self.open_paren().is_some() && self.close_paren().is_none() {
            causes.push(MissingCloseParen);
        }
        causes.sort();
        causes
    }

    /// The highest-priority local cause, if any.
    pub fn cause(&self) -> Option<InvalidCause> {
        self.causes().first().copied()
    }

    /// Whether this subtree is structurally complete.
    pub fn is_valid(&self) -> bool {
        self.causes().is_empty() && self.owned_children().iter().all(FilterNode::is_valid)
    }

    /// Nodes with local causes, in pre-order. Surplus NOT children are not
    /// visited; the NOT itself reports [`InvalidCause::TooManyNotChildren`].
    pub fn invalid_subtrees(&self) -> Vec<&FilterNode> {
        let mut out = Vec::new();
        self.collect_invalid(&mut out);
        out
    }

    fn collect_invalid<'a>(&'a self, out: &mut Vec<&'a FilterNode>) {
        if !self.causes().is_empty() {
            out.push(self);
        }
        for child in self.owned_children() {
            child.collect_invalid(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Token;
    use crate::syntax::node::{Branch, Item};
    use text_size::TextSize;

    fn tok(kind: TokenKind, text: &str, offset: u32) -> Token {
        Token::new(kind, text, TextSize::new(offset))
    }

    #[test]
    fn test_priority_order_matches_all() {
        let mut sorted = InvalidCause::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, InvalidCause::ALL);
    }

    #[test]
    fn test_empty_item_reports_every_missing_part() {
        let causes = FilterNode::item().causes();
        assert_eq!(
            causes,
            vec![
                InvalidCause::MissingOpenParen,
                InvalidCause::MissingOperator,
                InvalidCause::MissingAttribute
            ]
        );
    }

    #[test]
    fn test_present_needs_no_value() {
        let node = FilterNode::Item(Item {
            open_paren: Some(tok(TokenKind::LParen, "(", 0)),
            attribute_token: Some(tok(TokenKind::Attribute, "cn", 1)),
            operator_token: Some(tok(TokenKind::Present, "=*", 3)),
            close_paren: Some(tok(TokenKind::RParen, ")", 5)),
            ..Item::default()
        });
        assert!(node.is_valid());
        assert_eq!(node.cause(), None);
    }

    #[test]
    fn test_undefined_is_always_invalid() {
        assert_eq!(
            FilterNode::undefined().cause(),
            Some(InvalidCause::MissingOpenParen)
        );
        let mut undefined = crate::syntax::node::Undefined::new();
        undefined.tokens_seen.push(tok(TokenKind::Unknown, "~", 0));
        assert_eq!(
            FilterNode::Undefined(undefined).cause(),
            Some(InvalidCause::UnrecognizedFragment)
        );
    }

    #[test]
    fn test_branch_invalid_only_through_child_has_no_cause() {
        let mut branch = Branch::new(BranchOperator::And);
        branch.open_paren = Some(tok(TokenKind::LParen, "(", 0));
        branch.operator_token = Some(tok(TokenKind::And, "&", 1));
        branch.children.push(FilterNode::item());
        branch.close_paren = Some(tok(TokenKind::RParen, ")", 2));
        let node = FilterNode::Branch(branch);

        assert!(!node.is_valid());
        assert!(node.causes().is_empty());
        let invalid = node.invalid_subtrees();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].kind(), crate::syntax::NodeKind::Item);
    }

    #[test]
    fn test_display_uses_description() {
        assert_eq!(
            InvalidCause::MissingValue.to_string(),
            "expected an assertion value"
        );
        assert_eq!(InvalidCause::EmptyBranch.as_str(), "empty-branch");
    }
}
