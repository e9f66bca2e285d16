//! Syntax highlighting classes for filter tokens.

use text_size::TextRange;

use crate::parser::TokenKind;
use crate::syntax::{FilterNode, FilterTree};

/// Highlight class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HighlightClass {
    Paren,
    BranchOperator,
    Attribute,
    FilterType,
    Wildcard,
    Value,
    DnFlag,
    MatchingRule,
    /// Unknown characters and tokens the parser could not place
    Error,
}

impl HighlightClass {
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightClass::Paren => "paren",
            HighlightClass::BranchOperator => "branch-operator",
            HighlightClass::Attribute => "attribute",
            HighlightClass::FilterType => "filter-type",
            HighlightClass::Wildcard => "wildcard",
            HighlightClass::Value => "value",
            HighlightClass::DnFlag => "dn-flag",
            HighlightClass::MatchingRule => "matching-rule",
            HighlightClass::Error => "error",
        }
    }
}

impl From<TokenKind> for HighlightClass {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::LParen | TokenKind::RParen => HighlightClass::Paren,
            TokenKind::And | TokenKind::Or | TokenKind::Not => HighlightClass::BranchOperator,
            TokenKind::Attribute => HighlightClass::Attribute,
            TokenKind::Equal
            | TokenKind::GreaterOrEqual
            | TokenKind::LessOrEqual
            | TokenKind::Approx
            | TokenKind::Present
            | TokenKind::ExtensibleOp => HighlightClass::FilterType,
            TokenKind::SubstringOp => HighlightClass::Wildcard,
            TokenKind::Value => HighlightClass::Value,
            TokenKind::DnFlag => HighlightClass::DnFlag,
            TokenKind::Colon | TokenKind::MatchingRule => HighlightClass::MatchingRule,
            TokenKind::Unknown => HighlightClass::Error,
        }
    }
}

/// A highlighted token range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedToken {
    pub range: TextRange,
    pub class: HighlightClass,
}

/// Get highlight ranges for every token of the tree, sorted by position.
pub fn highlights(tree: &FilterTree) -> Vec<HighlightedToken> {
    let mut result = Vec::new();
    for node in tree.nodes() {
        collect(node, &mut result);
    }
    result.sort_by_key(|token| token.range.start());
    result
}

fn collect(node: &FilterNode, result: &mut Vec<HighlightedToken>) {
    let stray = node.stray_tokens();
    for token in node.own_tokens() {
        let class = if stray.iter().any(|s| std::ptr::eq(s, token)) {
            HighlightClass::Error
        } else {
            HighlightClass::from(token.kind())
        };
        result.push(HighlightedToken {
            range: token.range(),
            class,
        });
    }
    // surplus NOT children are ordinary filters and highlight as such
    for child in node.children() {
        collect(child, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    fn classes(input: &str) -> Vec<HighlightClass> {
        highlights(&parse_text(input))
            .into_iter()
            .map(|token| token.class)
            .collect()
    }

    #[test]
    fn test_item_classes() {
        use HighlightClass::*;
        assert_eq!(
            classes("(&(cn=Bo*))"),
            vec![Paren, BranchOperator, Paren, Attribute, FilterType, Value, Wildcard, Paren, Paren]
        );
    }

    #[test]
    fn test_extensible_classes() {
        use HighlightClass::*;
        assert_eq!(
            classes("(cn:dn:rule:=x)"),
            vec![Paren, Attribute, DnFlag, MatchingRule, MatchingRule, FilterType, Value, Paren]
        );
    }

    #[test]
    fn test_stray_and_undefined_are_errors() {
        use HighlightClass::*;
        assert_eq!(
            classes("(&&(cn=a))x"),
            vec![Paren, BranchOperator, Error, Paren, Attribute, FilterType, Value, Paren, Paren, Error]
        );
        // parens of an undefined node keep their class
        assert_eq!(classes("(~)"), vec![Paren, Error, Paren]);
    }

    #[test]
    fn test_ranges_follow_source() {
        let tokens = highlights(&parse_text("(cn>=10)"));
        assert_eq!(tokens[2].range, TextRange::new(3.into(), 5.into()));
        assert_eq!(tokens[3].range, TextRange::new(5.into(), 7.into()));
    }
}
