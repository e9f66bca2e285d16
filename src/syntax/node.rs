//! Filter tree nodes
//!
//! Every node corresponds to one parenthesized filter in the source. Token
//! slots are optional so the parser can hand out partially typed filters;
//! tokens the parser met but could not place are kept in `stray` so that the
//! token inventory of a subtree always covers the text it was built from.

use std::fmt;

use text_size::{TextRange, TextSize};

use crate::parser::{Token, TokenKind};

/// Boolean operator of a [`Branch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchOperator {
    And,
    Or,
    Not,
}

impl BranchOperator {
    pub fn token_kind(self) -> TokenKind {
        match self {
            BranchOperator::And => TokenKind::And,
            BranchOperator::Or => TokenKind::Or,
            BranchOperator::Not => TokenKind::Not,
        }
    }

    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(BranchOperator::And),
            TokenKind::Or => Some(BranchOperator::Or),
            TokenKind::Not => Some(BranchOperator::Not),
            _ => None,
        }
    }
}

/// Flat classification of a node, for callers that only need the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    And,
    Or,
    Not,
    Item,
    Extensible,
    Undefined,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::And => "and",
            NodeKind::Or => "or",
            NodeKind::Not => "not",
            NodeKind::Item => "item",
            NodeKind::Extensible => "extensible",
            NodeKind::Undefined => "undefined",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The comparison an [`Item`] performs, derived from its operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    Equality,
    GreaterOrEqual,
    LessOrEqual,
    Approx,
    Present,
    Substring,
}

/// `(&...)`, `(|...)` or `(!...)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub(crate) operator: BranchOperator,
    pub(crate) open_paren: Option<Token>,
    pub(crate) operator_token: Option<Token>,
    pub(crate) children: Vec<FilterNode>,
    pub(crate) close_paren: Option<Token>,
    pub(crate) stray: Vec<Token>,
}

impl Branch {
    pub fn new(operator: BranchOperator) -> Self {
        Self {
            operator,
            open_paren: None,
            operator_token: None,
            children: Vec::new(),
            close_paren: None,
            stray: Vec::new(),
        }
    }

    pub fn operator(&self) -> BranchOperator {
        self.operator
    }

    pub fn open_paren(&self) -> Option<&Token> {
        self.open_paren.as_ref()
    }

    /// The `&`, `|` or `!` token.
    pub fn operator_token(&self) -> Option<&Token> {
        self.operator_token.as_ref()
    }

    /// All children in source order, including surplus children of a NOT.
    pub fn children(&self) -> &[FilterNode] {
        &self.children
    }

    /// Children that structurally belong to this branch. A NOT owns only its
    /// first child; the rest are surplus.
    pub fn owned_children(&self) -> &[FilterNode] {
        match self.operator {
            BranchOperator::Not => &self.children[..self.children.len().min(1)],
            BranchOperator::And | BranchOperator::Or => &self.children,
        }
    }

    pub fn surplus_children(&self) -> &[FilterNode] {
        &self.children[self.owned_children().len()..]
    }

    pub fn close_paren(&self) -> Option<&Token> {
        self.close_paren.as_ref()
    }

    pub fn stray(&self) -> &[Token] {
        &self.stray
    }
}

/// `(attr op value)`, including presence and substring assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub(crate) open_paren: Option<Token>,
    pub(crate) attribute_token: Option<Token>,
    pub(crate) operator_token: Option<Token>,
    pub(crate) value_token: Option<Token>,
    pub(crate) substring_parts: Vec<Token>,
    pub(crate) close_paren: Option<Token>,
    pub(crate) stray: Vec<Token>,
}

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_paren(&self) -> Option<&Token> {
        self.open_paren.as_ref()
    }

    pub fn attribute_token(&self) -> Option<&Token> {
        self.attribute_token.as_ref()
    }

    pub fn operator_token(&self) -> Option<&Token> {
        self.operator_token.as_ref()
    }

    /// The value, or the initial segment of a substring assertion.
    pub fn value_token(&self) -> Option<&Token> {
        self.value_token.as_ref()
    }

    /// Wildcards and the value segments following the first wildcard.
    pub fn substring_parts(&self) -> &[Token] {
        &self.substring_parts
    }

    pub fn close_paren(&self) -> Option<&Token> {
        self.close_paren.as_ref()
    }

    pub fn stray(&self) -> &[Token] {
        &self.stray
    }

    pub fn filter_type(&self) -> Option<FilterType> {
        let filter_type = match self.operator_token.as_ref()?.kind() {
            TokenKind::Equal if !self.substring_parts.is_empty() => FilterType::Substring,
            TokenKind::Equal => FilterType::Equality,
            TokenKind::GreaterOrEqual => FilterType::GreaterOrEqual,
            TokenKind::LessOrEqual => FilterType::LessOrEqual,
            TokenKind::Approx => FilterType::Approx,
            TokenKind::Present => FilterType::Present,
            _ => return None,
        };
        Some(filter_type)
    }
}

/// `(attr:dn:rule:=value)` and its optional-part variations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extensible {
    pub(crate) open_paren: Option<Token>,
    pub(crate) attribute_token: Option<Token>,
    pub(crate) dn_token: Option<Token>,
    pub(crate) rule_colon_token: Option<Token>,
    pub(crate) matching_rule_token: Option<Token>,
    pub(crate) operator_token: Option<Token>,
    pub(crate) value_token: Option<Token>,
    pub(crate) close_paren: Option<Token>,
    pub(crate) stray: Vec<Token>,
}

impl Extensible {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_paren(&self) -> Option<&Token> {
        self.open_paren.as_ref()
    }

    pub fn attribute_token(&self) -> Option<&Token> {
        self.attribute_token.as_ref()
    }

    pub fn dn_token(&self) -> Option<&Token> {
        self.dn_token.as_ref()
    }

    pub fn dn_flag(&self) -> bool {
        self.dn_token.is_some()
    }

    pub fn rule_colon_token(&self) -> Option<&Token> {
        self.rule_colon_token.as_ref()
    }

    pub fn matching_rule_token(&self) -> Option<&Token> {
        self.matching_rule_token.as_ref()
    }

    /// The `:=` token.
    pub fn operator_token(&self) -> Option<&Token> {
        self.operator_token.as_ref()
    }

    pub fn value_token(&self) -> Option<&Token> {
        self.value_token.as_ref()
    }

    pub fn close_paren(&self) -> Option<&Token> {
        self.close_paren.as_ref()
    }

    pub fn stray(&self) -> &[Token] {
        &self.stray
    }
}

/// Placeholder for text that does not form a recognizable filter component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Undefined {
    pub(crate) open_paren: Option<Token>,
    pub(crate) tokens_seen: Vec<Token>,
    pub(crate) close_paren: Option<Token>,
}

impl Undefined {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_paren(&self) -> Option<&Token> {
        self.open_paren.as_ref()
    }

    pub fn tokens_seen(&self) -> &[Token] {
        &self.tokens_seen
    }

    pub fn close_paren(&self) -> Option<&Token> {
        self.close_paren.as_ref()
    }
}

/// A node of the filter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    Branch(Branch),
    Item(Item),
    Extensible(Extensible),
    Undefined(Undefined),
}

impl FilterNode {
    pub fn branch(operator: BranchOperator) -> Self {
        FilterNode::Branch(Branch::new(operator))
    }

    pub fn item() -> Self {
        FilterNode::Item(Item::new())
    }

    pub fn extensible() -> Self {
        FilterNode::Extensible(Extensible::new())
    }

    pub fn undefined() -> Self {
        FilterNode::Undefined(Undefined::new())
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            FilterNode::Branch(branch) => match branch.operator {
                BranchOperator::And => NodeKind::And,
                BranchOperator::Or => NodeKind::Or,
                BranchOperator::Not => NodeKind::Not,
            },
            FilterNode::Item(_) => NodeKind::Item,
            FilterNode::Extensible(_) => NodeKind::Extensible,
            FilterNode::Undefined(_) => NodeKind::Undefined,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            FilterNode::Branch(branch) => Some(branch),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            FilterNode::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_extensible(&self) -> Option<&Extensible> {
        match self {
            FilterNode::Extensible(extensible) => Some(extensible),
            _ => None,
        }
    }

    pub fn as_undefined(&self) -> Option<&Undefined> {
        match self {
            FilterNode::Undefined(undefined) => Some(undefined),
            _ => None,
        }
    }

    pub fn open_paren(&self) -> Option<&Token> {
        match self {
            FilterNode::Branch(n) => n.open_paren(),
            FilterNode::Item(n) => n.open_paren(),
            FilterNode::Extensible(n) => n.open_paren(),
            FilterNode::Undefined(n) => n.open_paren(),
        }
    }

    pub fn close_paren(&self) -> Option<&Token> {
        match self {
            FilterNode::Branch(n) => n.close_paren(),
            FilterNode::Item(n) => n.close_paren(),
            FilterNode::Extensible(n) => n.close_paren(),
            FilterNode::Undefined(n) => n.close_paren(),
        }
    }

    /// Direct children; empty for leaves.
    pub fn children(&self) -> &[FilterNode] {
        match self {
            FilterNode::Branch(branch) => branch.children(),
            _ => &[],
        }
    }

    /// Children that queries descend into; see [`Branch::owned_children`].
    pub fn owned_children(&self) -> &[FilterNode] {
        match self {
            FilterNode::Branch(branch) => branch.owned_children(),
            _ => &[],
        }
    }

    /// Tokens held directly by this node, excluding its children.
    pub fn own_tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        match self {
            FilterNode::Branch(n) => {
                tokens.extend(n.open_paren.iter());
                tokens.extend(n.operator_token.iter());
                tokens.extend(n.stray.iter());
                tokens.extend(n.close_paren.iter());
            }
            FilterNode::Item(n) => {
                tokens.extend(n.open_paren.iter());
                tokens.extend(n.attribute_token.iter());
                tokens.extend(n.operator_token.iter());
                tokens.extend(n.value_token.iter());
                tokens.extend(n.substring_parts.iter());
                tokens.extend(n.stray.iter());
                tokens.extend(n.close_paren.iter());
            }
            FilterNode::Extensible(n) => {
                tokens.extend(n.open_paren.iter());
                tokens.extend(n.attribute_token.iter());
                tokens.extend(n.dn_token.iter());
                tokens.extend(n.rule_colon_token.iter());
                tokens.extend(n.matching_rule_token.iter());
                tokens.extend(n.operator_token.iter());
                tokens.extend(n.value_token.iter());
                tokens.extend(n.stray.iter());
                tokens.extend(n.close_paren.iter());
            }
            FilterNode::Undefined(n) => {
                tokens.extend(n.open_paren.iter());
                tokens.extend(n.tokens_seen.iter());
                tokens.extend(n.close_paren.iter());
            }
        }
        tokens
    }

    /// Tokens this node holds without a slot for them: stray tokens, or
    /// everything between the parens of an undefined node.
    pub fn stray_tokens(&self) -> &[Token] {
        match self {
            FilterNode::Branch(n) => &n.stray,
            FilterNode::Item(n) => &n.stray,
            FilterNode::Extensible(n) => &n.stray,
            FilterNode::Undefined(n) => &n.tokens_seen,
        }
    }

    /// Every token of the subtree, sorted by offset.
    pub fn all_tokens(&self) -> Vec<&Token> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        tokens.sort_by_key(|token| token.offset());
        tokens
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        out.extend(self.own_tokens());
        for child in self.children() {
            child.collect_tokens(out);
        }
    }

    /// Range from the first token start to the last token end.
    pub fn span(&self) -> Option<TextRange> {
        let tokens = self.all_tokens();
        let start = tokens.first()?.offset();
        let end = tokens.iter().map(|token| token.end()).max()?;
        Some(TextRange::new(start, end))
    }

    /// Deepest node whose span contains `offset`.
    ///
    /// A cursor placed right after the last character of a node maps to
    /// that node unless another span strictly contains the offset.
    pub fn node_at_offset(&self, offset: TextSize) -> Option<&FilterNode> {
        let span = self.span()?;
        if !(span.contains(offset) || span.end() == offset) {
            return None;
        }
        Some(self.deepest_at(offset))
    }

    fn deepest_at(&self, offset: TextSize) -> &FilterNode {
        let children = self.owned_children();
        let spans: Vec<Option<TextRange>> = children.iter().map(|c| c.span()).collect();
        let hit = spans
            .iter()
            .position(|span| span.is_some_and(|s| s.contains(offset)))
            .or_else(|| spans.iter().position(|span| span.is_some_and(|s| s.end() == offset)));
        match hit {
            Some(index) => children[index].deepest_at(offset),
            None => self,
        }
    }

    /// Source text rebuilt from the subtree's tokens.
    pub fn to_text(&self) -> String {
        self.all_tokens().iter().map(|token| token.text()).collect()
    }
}
