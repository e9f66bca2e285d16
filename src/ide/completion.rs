//! Content-assist contexts.
//!
//! This module does not know any schema. It tells the host *what* can be
//! typed at the cursor (an attribute type, a filter type, a matching rule,
//! ...) together with the already typed prefix and the range a proposal
//! replaces. The host fills in the actual proposals from its schema.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

use crate::parser::{Token, TokenKind};
use crate::syntax::{Branch, Extensible, FilterNode, FilterTree, Item};

/// What can be typed at the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    /// A `(` without a component yet: branch operators, attribute types or
    /// whole filter templates.
    FilterStart,
    BranchOperator,
    AttributeType,
    /// `=`, `>=`, `<=`, `~=`, `=*` or the start of an extensible match
    FilterType,
    Value,
    DnFlag,
    MatchingRule,
}

/// A place in the filter where proposals apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionContext {
    pub kind: CompletionKind,
    /// Text between the start of `range` and the cursor.
    pub prefix: SmolStr,
    /// Range a proposal replaces.
    pub range: TextRange,
    /// Attribute the value belongs to, for [`CompletionKind::Value`].
    pub attribute: Option<SmolStr>,
}

impl CompletionContext {
    /// Create a context that inserts at `offset` without replacing anything.
    pub fn new(kind: CompletionKind, offset: TextSize) -> Self {
        Self {
            kind,
            prefix: SmolStr::default(),
            range: TextRange::empty(offset),
            attribute: None,
        }
    }

    /// Create a context that replaces `token`, with the prefix cut at the cursor.
    pub fn replacing(kind: CompletionKind, token: &Token, offset: TextSize) -> Self {
        let typed = usize::from(offset.checked_sub(token.offset()).unwrap_or_default());
        let prefix = token.text().get(..typed).unwrap_or(token.text());
        Self {
            kind,
            prefix: SmolStr::new(prefix),
            range: token.range(),
            attribute: None,
        }
    }

    /// Set the attribute the value belongs to.
    pub fn with_attribute(mut self, attribute: Option<&Token>) -> Self {
        self.attribute = attribute.map(|token| SmolStr::new(token.text()));
        self
    }
}

/// Get completion contexts at a cursor offset.
///
/// Several contexts can apply at once: right after an attribute type the
/// cursor both extends the attribute and starts the filter type. Offset 0
/// is before the opening paren and yields nothing.
pub fn completion_contexts(tree: &FilterTree, offset: TextSize) -> Vec<CompletionContext> {
    let mut result = Vec::new();
    if offset == TextSize::from(0) {
        return result;
    }
    let Some(node) = tree.node_at_offset(offset) else {
        return result;
    };

    match node {
        FilterNode::Undefined(undefined) => {
            if undefined.open_paren().is_some() && undefined.tokens_seen().is_empty() {
                result.push(CompletionContext::new(CompletionKind::FilterStart, offset));
            }
        }
        FilterNode::Branch(branch) => branch_contexts(branch, offset, &mut result),
        FilterNode::Item(item) => item_contexts(item, offset, &mut result),
        FilterNode::Extensible(ext) => extensible_contexts(ext, offset, &mut result),
    }

    tracing::trace!(offset = u32::from(offset), count = result.len(), "completion contexts");
    result
}

/// Inclusive at both ends: a cursor right behind a token still edits it.
fn touches(token: &Token, offset: TextSize) -> bool {
    token.offset() <= offset && offset <= token.end()
}

fn branch_contexts(branch: &Branch, offset: TextSize, result: &mut Vec<CompletionContext>) {
    if let Some(op) = branch.operator_token() {
        if touches(op, offset) {
            result.push(CompletionContext::replacing(CompletionKind::BranchOperator, op, offset));
        }
    }
}

fn item_contexts(item: &Item, offset: TextSize, result: &mut Vec<CompletionContext>) {
    let Some(attribute) = item.attribute_token() else {
        return;
    };

    // Editing the attribute type
    if touches(attribute, offset) {
        result.push(CompletionContext::replacing(CompletionKind::AttributeType, attribute, offset));
    }

    // After the attribute type: filter types
    match item.operator_token() {
        Some(op) if attribute.end() <= offset && offset <= op.end() => {
            result.push(CompletionContext::replacing(CompletionKind::FilterType, op, offset));
        }
        None if attribute.end() == offset => {
            result.push(CompletionContext::new(CompletionKind::FilterType, offset));
        }
        _ => {}
    }

    // Editing the value
    if let Some(op) = item.operator_token() {
        if op.kind() == TokenKind::Present {
            return;
        }
        let context = match item.value_token() {
            Some(value) if op.end() <= offset && offset <= value.end() => {
                CompletionContext::replacing(CompletionKind::Value, value, offset)
            }
            None if item.substring_parts().is_empty() && op.end() == offset => {
                CompletionContext::new(CompletionKind::Value, offset)
            }
            _ => return,
        };
        result.push(context.with_attribute(Some(attribute)));
    }
}

fn extensible_contexts(ext: &Extensible, offset: TextSize, result: &mut Vec<CompletionContext>) {
    if let Some(attribute) = ext.attribute_token() {
        if touches(attribute, offset) {
            result.push(CompletionContext::replacing(CompletionKind::AttributeType, attribute, offset));
        }
    }

    if let Some(dn) = ext.dn_token() {
        if touches(dn, offset) {
            result.push(CompletionContext::replacing(CompletionKind::DnFlag, dn, offset));
        }
    }

    // Right behind the rule colon: the rule, or `dn` if not given yet
    if let Some(colon) = ext.rule_colon_token() {
        if ext.matching_rule_token().is_none() && colon.end() == offset {
            if ext.dn_token().is_none() {
                result.push(CompletionContext::new(CompletionKind::DnFlag, offset));
            }
            result.push(CompletionContext::new(CompletionKind::MatchingRule, offset));
        }
    }

    if let Some(rule) = ext.matching_rule_token() {
        if touches(rule, offset) {
            result.push(CompletionContext::replacing(CompletionKind::MatchingRule, rule, offset));
        }
    }

    if let Some(op) = ext.operator_token() {
        let context = match ext.value_token() {
            Some(value) if op.end() <= offset && offset <= value.end() => {
                CompletionContext::replacing(CompletionKind::Value, value, offset)
            }
            None if op.end() == offset => CompletionContext::new(CompletionKind::Value, offset),
            _ => return,
        };
        result.push(context.with_attribute(ext.attribute_token()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    fn kinds_at(input: &str, offset: u32) -> Vec<CompletionKind> {
        completion_contexts(&parse_text(input), offset.into())
            .into_iter()
            .map(|context| context.kind)
            .collect()
    }

    #[test]
    fn test_offset_zero_yields_nothing() {
        assert!(kinds_at("(cn=Bob)", 0).is_empty());
    }

    #[test]
    fn test_open_paren_starts_filter() {
        assert_eq!(kinds_at("(", 1), vec![CompletionKind::FilterStart]);
        assert_eq!(kinds_at("(&(", 3), vec![CompletionKind::FilterStart]);
    }

    #[test]
    fn test_attribute_then_filter_type() {
        let contexts = completion_contexts(&parse_text("(obj"), 4.into());
        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].kind, CompletionKind::AttributeType);
        assert_eq!(contexts[0].prefix, "obj");
        assert_eq!(contexts[0].range, TextRange::new(1.into(), 4.into()));
        assert_eq!(contexts[1].kind, CompletionKind::FilterType);
        assert_eq!(contexts[1].range, TextRange::empty(4.into()));
    }

    #[test]
    fn test_attribute_prefix_is_cut_at_cursor() {
        let contexts = completion_contexts(&parse_text("(objectClass=*)"), 4.into());
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].prefix, "obj");
    }

    #[test]
    fn test_value_context_names_attribute() {
        let contexts = completion_contexts(&parse_text("(objectClass=per)"), 16.into());
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].kind, CompletionKind::Value);
        assert_eq!(contexts[0].prefix, "per");
        assert_eq!(contexts[0].attribute.as_deref(), Some("objectClass"));
    }

    #[test]
    fn test_filter_type_and_empty_value_after_operator() {
        assert_eq!(
            kinds_at("(cn=", 4),
            vec![CompletionKind::FilterType, CompletionKind::Value]
        );
    }

    #[test]
    fn test_branch_operator() {
        assert_eq!(kinds_at("(|", 2), vec![CompletionKind::BranchOperator]);
        // the cursor already touches the nested filter
        assert!(kinds_at("(&(cn=a))", 2).is_empty());
    }

    #[test]
    fn test_extensible_rule_colon() {
        assert_eq!(
            kinds_at("(cn:", 4),
            vec![CompletionKind::DnFlag, CompletionKind::MatchingRule]
        );
        assert_eq!(kinds_at("(cn:dn:", 7), vec![CompletionKind::MatchingRule]);
    }

    #[test]
    fn test_extensible_matching_rule_prefix() {
        let contexts = completion_contexts(&parse_text("(cn:caseEx:=x)"), 8.into());
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].kind, CompletionKind::MatchingRule);
        assert_eq!(contexts[0].prefix, "case");
    }

    #[test]
    fn test_after_close_paren_yields_nothing() {
        assert!(kinds_at("(cn=Bob)", 8).is_empty());
    }
}
