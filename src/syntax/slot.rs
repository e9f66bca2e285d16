//! Programmatic tree mutation
//!
//! The parser fills nodes directly. Code that builds or edits a tree by hand
//! goes through [`FilterNode::set_slot`] and [`FilterNode::add_child`], which
//! refuse anything that would break the tree invariants.

use std::fmt;

use thiserror::Error;

use super::node::{BranchOperator, FilterNode, NodeKind};
use crate::parser::{Token, TokenKind};

/// A token position within a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    OpenParen,
    CloseParen,
    /// Branch operator, item filter type or extensible `:=`
    Operator,
    Attribute,
    Value,
    /// Appends to an item's substring parts
    SubstringPart,
    DnFlag,
    RuleColon,
    MatchingRule,
    /// Appends to an undefined node's tokens
    Fragment,
}

impl Slot {
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::OpenParen => "open paren",
            Slot::CloseParen => "close paren",
            Slot::Operator => "operator",
            Slot::Attribute => "attribute",
            Slot::Value => "value",
            Slot::SubstringPart => "substring part",
            Slot::DnFlag => "dn flag",
            Slot::RuleColon => "rule colon",
            Slot::MatchingRule => "matching rule",
            Slot::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected [`FilterNode::set_slot`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// The slot already holds a token.
    #[error("{slot} slot is already set")]
    SlotAlreadySet { slot: Slot },

    /// The token kind is not legal in this slot.
    #[error("{} token cannot fill the {slot} slot", found.display_name())]
    TokenKindMismatch { slot: Slot, found: TokenKind },

    /// The node variant has no such slot.
    #[error("{node} node has no {slot} slot")]
    NoSuchSlot { slot: Slot, node: NodeKind },
}

/// Rejected [`FilterNode::add_child`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChildError {
    #[error("cannot add a child to a {node} node")]
    NotABranch { node: NodeKind },
}

enum Target<'a> {
    Single(&'a mut Option<Token>),
    Append(&'a mut Vec<Token>),
}

impl FilterNode {
    /// Put `token` into `slot`.
    ///
    /// Fails if the slot is already filled, if the token kind does not fit,
    /// or if this node variant has no such slot. The node is left untouched
    /// on failure.
    pub fn set_slot(&mut self, slot: Slot, token: Token) -> Result<(), SlotError> {
        let node = self.kind();
        let (target, legal) = self.slot_target(slot).ok_or(SlotError::NoSuchSlot { slot, node })?;

        if matches!(&target, Target::Single(existing) if existing.is_some()) {
            tracing::debug!(%slot, %node, "rejected token for filled slot");
            return Err(SlotError::SlotAlreadySet { slot });
        }
        if !legal.is_empty() && !legal.contains(&token.kind()) {
            tracing::debug!(%slot, %node, kind = ?token.kind(), "rejected token kind");
            return Err(SlotError::TokenKindMismatch {
                slot,
                found: token.kind(),
            });
        }

        match target {
            Target::Single(existing) => *existing = Some(token),
            Target::Append(list) => list.push(token),
        }
        Ok(())
    }

    /// Append a nested filter to a branch.
    pub fn add_child(&mut self, child: FilterNode) -> Result<(), ChildError> {
        match self {
            FilterNode::Branch(branch) => {
                branch.children.push(child);
                Ok(())
            }
            _ => Err(ChildError::NotABranch { node: self.kind() }),
        }
    }

    /// Storage and legal token kinds for `slot`. An empty kind list accepts
    /// any token.
    fn slot_target(&mut self, slot: Slot) -> Option<(Target<'_>, &'static [TokenKind])> {
        use TokenKind as K;

        const OPEN: &[TokenKind] = &[K::LParen];
        const CLOSE: &[TokenKind] = &[K::RParen];
        const ATTRIBUTE: &[TokenKind] = &[K::Attribute];
        const VALUE: &[TokenKind] = &[K::Value];

        let target: (Target<'_>, &'static [TokenKind]) = match (self, slot) {
            (FilterNode::Branch(n), Slot::OpenParen) => (Target::Single(&mut n.open_paren), OPEN),
            (FilterNode::Branch(n), Slot::CloseParen) => (Target::Single(&mut n.close_paren), CLOSE),
            (FilterNode::Branch(n), Slot::Operator) => {
                let legal: &'static [TokenKind] = match n.operator {
                    BranchOperator::And => &[K::And],
                    BranchOperator::Or => &[K::Or],
                    BranchOperator::Not => &[K::Not],
                };
                (Target::Single(&mut n.operator_token), legal)
            }

            (FilterNode::Item(n), Slot::OpenParen) => (Target::Single(&mut n.open_paren), OPEN),
            (FilterNode::Item(n), Slot::CloseParen) => (Target::Single(&mut n.close_paren), CLOSE),
            (FilterNode::Item(n), Slot::Attribute) => {
                (Target::Single(&mut n.attribute_token), ATTRIBUTE)
            }
            (FilterNode::Item(n), Slot::Operator) => {
                (Target::Single(&mut n.operator_token), TokenKind::FILTER_TYPES)
            }
            (FilterNode::Item(n), Slot::Value) => (Target::Single(&mut n.value_token), VALUE),
            (FilterNode::Item(n), Slot::SubstringPart) => (
                Target::Append(&mut n.substring_parts),
                &[K::SubstringOp, K::Value],
            ),

            (FilterNode::Extensible(n), Slot::OpenParen) => {
                (Target::Single(&mut n.open_paren), OPEN)
            }
            (FilterNode::Extensible(n), Slot::CloseParen) => {
                (Target::Single(&mut n.close_paren), CLOSE)
            }
            (FilterNode::Extensible(n), Slot::Attribute) => {
                (Target::Single(&mut n.attribute_token), ATTRIBUTE)
            }
            (FilterNode::Extensible(n), Slot::DnFlag) => {
                (Target::Single(&mut n.dn_token), &[K::DnFlag])
            }
            (FilterNode::Extensible(n), Slot::RuleColon) => {
                (Target::Single(&mut n.rule_colon_token), &[K::Colon])
            }
            (FilterNode::Extensible(n), Slot::MatchingRule) => {
                (Target::Single(&mut n.matching_rule_token), &[K::MatchingRule])
            }
            (FilterNode::Extensible(n), Slot::Operator) => {
                (Target::Single(&mut n.operator_token), &[K::ExtensibleOp])
            }
            (FilterNode::Extensible(n), Slot::Value) => (Target::Single(&mut n.value_token), VALUE),

            (FilterNode::Undefined(n), Slot::OpenParen) => {
                (Target::Single(&mut n.open_paren), OPEN)
            }
            (FilterNode::Undefined(n), Slot::CloseParen) => {
                (Target::Single(&mut n.close_paren), CLOSE)
            }
            (FilterNode::Undefined(n), Slot::Fragment) => (Target::Append(&mut n.tokens_seen), &[]),

            _ => return None,
        };
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_size::TextSize;

    fn punct(kind: TokenKind, offset: u32) -> Token {
        Token::punct(kind, TextSize::new(offset)).unwrap()
    }

    fn word(kind: TokenKind, text: &str, offset: u32) -> Token {
        Token::new(kind, text, TextSize::new(offset))
    }

    #[test]
    fn test_build_item_by_hand() {
        let mut node = FilterNode::item();
        node.set_slot(Slot::OpenParen, punct(TokenKind::LParen, 0)).unwrap();
        node.set_slot(Slot::Attribute, word(TokenKind::Attribute, "cn", 1)).unwrap();
        node.set_slot(Slot::Operator, punct(TokenKind::Equal, 3)).unwrap();
        node.set_slot(Slot::Value, word(TokenKind::Value, "Bob", 4)).unwrap();
        node.set_slot(Slot::CloseParen, punct(TokenKind::RParen, 7)).unwrap();

        assert!(node.is_valid());
        assert_eq!(node.to_text(), "(cn=Bob)");
    }

    #[test]
    fn test_filled_slot_is_rejected() {
        let mut node = FilterNode::item();
        node.set_slot(Slot::Attribute, word(TokenKind::Attribute, "cn", 1)).unwrap();
        let err = node
            .set_slot(Slot::Attribute, word(TokenKind::Attribute, "sn", 1))
            .unwrap_err();
        assert_eq!(err, SlotError::SlotAlreadySet { slot: Slot::Attribute });
        assert_eq!(
            node.as_item().unwrap().attribute_token().unwrap().text(),
            "cn"
        );
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let mut node = FilterNode::item();
        let err = node
            .set_slot(Slot::Value, word(TokenKind::Attribute, "cn", 1))
            .unwrap_err();
        assert_eq!(
            err,
            SlotError::TokenKindMismatch {
                slot: Slot::Value,
                found: TokenKind::Attribute
            }
        );
        assert_eq!(err.to_string(), "attribute token cannot fill the value slot");
    }

    #[test]
    fn test_branch_operator_must_match() {
        let mut node = FilterNode::branch(BranchOperator::And);
        assert!(matches!(
            node.set_slot(Slot::Operator, punct(TokenKind::Or, 1)),
            Err(SlotError::TokenKindMismatch { .. })
        ));
        node.set_slot(Slot::Operator, punct(TokenKind::And, 1)).unwrap();
    }

    #[test]
    fn test_missing_slot_on_variant() {
        let mut node = FilterNode::branch(BranchOperator::Or);
        let err = node
            .set_slot(Slot::Value, word(TokenKind::Value, "x", 0))
            .unwrap_err();
        assert_eq!(
            err,
            SlotError::NoSuchSlot {
                slot: Slot::Value,
                node: NodeKind::Or
            }
        );
        assert_eq!(err.to_string(), "or node has no value slot");
    }

    #[test]
    fn test_substring_parts_append() {
        let mut node = FilterNode::item();
        node.set_slot(Slot::SubstringPart, punct(TokenKind::SubstringOp, 4)).unwrap();
        node.set_slot(Slot::SubstringPart, word(TokenKind::Value, "b", 5)).unwrap();
        assert_eq!(node.as_item().unwrap().substring_parts().len(), 2);
    }

    #[test]
    fn test_add_child() {
        let mut not = FilterNode::branch(BranchOperator::Not);
        not.add_child(FilterNode::item()).unwrap();
        not.add_child(FilterNode::item()).unwrap();
        assert_eq!(not.children().len(), 2);
        assert!(not.causes().contains(&crate::syntax::InvalidCause::TooManyNotChildren));

        let mut leaf = FilterNode::item();
        assert_eq!(
            leaf.add_child(FilterNode::item()),
            Err(ChildError::NotABranch {
                node: NodeKind::Item
            })
        );
    }
}
