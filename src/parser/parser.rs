//! Recursive descent parser for LDAP search filters
//!
//! Builds a [`FilterTree`] from tokens. Parsing never fails: a missing token
//! leaves its slot empty and an unexpected token is kept as a stray token of
//! the node being parsed. Invalidity is read off the finished tree.

use super::lexer::tokenize;
use super::token::{Token, TokenKind};
use crate::syntax::{Branch, BranchOperator, Extensible, FilterNode, FilterTree, Item, Undefined};

/// Parse a token stream into a filter tree.
pub fn parse(tokens: &[Token]) -> FilterTree {
    let mut parser = Parser::new(tokens);
    let tree = parser.parse_document();
    tracing::trace!(
        tokens = tokens.len(),
        top_level = tree.nodes().len(),
        "parsed filter"
    );
    tree
}

/// Tokenize and parse filter text.
pub fn parse_text(input: &str) -> FilterTree {
    parse(&tokenize(input))
}

/// Tokens that end any skipping: a nested filter starts or the current one
/// closes.
const RECOVERY: &[TokenKind] = &[TokenKind::LParen, TokenKind::RParen];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(Token::kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        self.current_kind().is_some_and(|kind| kinds.contains(&kind))
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(Token::kind)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) -> Option<Token> {
        let token = self.current()?.clone();
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) { self.bump() } else { None }
    }

    fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if self.at_any(kinds) { self.bump() } else { None }
    }

    // =========================================================================
    // Error recovery
    // =========================================================================

    /// Move tokens into `stray` until one of `wanted`, a parenthesis or the
    /// end of input.
    fn skip_until(&mut self, wanted: &[TokenKind], stray: &mut Vec<Token>) {
        while !self.at_eof() && !self.at_any(wanted) && !self.at_any(RECOVERY) {
            if let Some(token) = self.bump() {
                tracing::trace!(kind = ?token.kind(), offset = u32::from(token.offset()), "stray token");
                stray.push(token);
            }
        }
    }

    /// Collect leftovers of the current node and claim its `)`. A node that
    /// was not opened with `(` never claims one, so it cannot steal the
    /// parent's closing paren.
    fn finish(&mut self, opened: bool, stray: &mut Vec<Token>) -> Option<Token> {
        self.skip_until(&[], stray);
        if opened { self.eat(TokenKind::RParen) } else { None }
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// Document = Junk? Filter? Junk?
    fn parse_document(&mut self) -> FilterTree {
        let mut nodes = Vec::new();

        let mut leading = Vec::new();
        while !self.at_eof() && !self.at(TokenKind::LParen) {
            leading.extend(self.bump());
        }
        if !leading.is_empty() {
            tracing::trace!(count = leading.len(), "text before filter");
            nodes.push(undefined_fragment(leading));
        }

        let root = nodes.len();
        if self.at(TokenKind::LParen) {
            nodes.push(self.parse_filter());
        }

        let trailing: Vec<Token> = self.tokens[self.pos.min(self.tokens.len())..].to_vec();
        self.pos = self.tokens.len();
        if !trailing.is_empty() {
            tracing::trace!(count = trailing.len(), "text after filter");
            nodes.push(undefined_fragment(trailing));
        }

        FilterTree::new(nodes, root)
    }

    /// Filter = '(' FilterComp ')'
    /// FilterComp = Branch | Item | Extensible
    fn parse_filter(&mut self) -> FilterNode {
        let open = self.eat(TokenKind::LParen);

        let Some(kind) = self.current_kind() else {
            return self.parse_undefined(open);
        };
        if let Some(operator) = BranchOperator::from_token_kind(kind) {
            return self.parse_branch(open, operator);
        }

        match kind {
            TokenKind::Attribute if self.nth(1).is_some_and(is_extensible_part) => {
                self.parse_extensible(open)
            }
            TokenKind::Attribute => self.parse_item(open),
            kind if is_extensible_part(kind) => self.parse_extensible(open),
            kind if kind.is_filter_type() => self.parse_item(open),
            _ => self.parse_undefined(open),
        }
    }

    /// Branch = ('&' | '|' | '!') Filter*
    fn parse_branch(&mut self, open: Option<Token>, operator: BranchOperator) -> FilterNode {
        let mut branch = Branch::new(operator);
        branch.open_paren = open;
        branch.operator_token = self.bump();

        while !self.at_eof() && !self.at(TokenKind::RParen) {
            let pos_before = self.pos;

            match self.current_kind() {
                Some(TokenKind::LParen) => branch.children.push(self.parse_filter()),
                Some(kind) if starts_component(kind) => {
                    tracing::trace!(?kind, "nested filter without '('");
                    branch.children.push(self.parse_filter());
                }
                _ => branch.stray.extend(self.bump()),
            }

            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before {
                branch.stray.extend(self.bump());
            }
        }

        branch.close_paren = self.finish(branch.open_paren.is_some(), &mut branch.stray);
        FilterNode::Branch(branch)
    }

    /// Item = Attribute FilterType (Value? ('*' Value?)*)?
    fn parse_item(&mut self, open: Option<Token>) -> FilterNode {
        let mut item = Item {
            open_paren: open,
            ..Item::default()
        };

        item.attribute_token = self.eat(TokenKind::Attribute);
        self.skip_until(TokenKind::FILTER_TYPES, &mut item.stray);
        item.operator_token = self.eat_any(TokenKind::FILTER_TYPES);

        let operator = item.operator_token.as_ref().map(Token::kind);
        let takes_value = operator.is_some_and(|kind| kind != TokenKind::Present);
        let substring_allowed = operator == Some(TokenKind::Equal);

        if takes_value {
            loop {
                match self.current_kind() {
                    Some(TokenKind::Value)
                        if item.value_token.is_none() && item.substring_parts.is_empty() =>
                    {
                        item.value_token = self.bump();
                    }
                    Some(TokenKind::Value | TokenKind::SubstringOp) if substring_allowed => {
                        item.substring_parts.extend(self.bump());
                    }
                    Some(TokenKind::Value | TokenKind::SubstringOp) => {
                        item.stray.extend(self.bump())
                    }
                    _ => break,
                }
            }
        }

        item.close_paren = self.finish(item.open_paren.is_some(), &mut item.stray);
        FilterNode::Item(item)
    }

    /// Extensible = Attribute? ':dn'? (':' MatchingRule)? ':=' Value
    fn parse_extensible(&mut self, open: Option<Token>) -> FilterNode {
        use TokenKind::{Colon, DnFlag, ExtensibleOp, MatchingRule, Value};

        let mut ext = Extensible {
            open_paren: open,
            ..Extensible::default()
        };

        ext.attribute_token = self.eat(TokenKind::Attribute);
        self.skip_until(&[DnFlag, Colon, ExtensibleOp], &mut ext.stray);
        ext.dn_token = self.eat(DnFlag);

        self.skip_until(&[Colon, ExtensibleOp], &mut ext.stray);
        if let Some(colon) = self.eat(Colon) {
            ext.rule_colon_token = Some(colon);
            ext.matching_rule_token = self.eat(MatchingRule);
        }

        self.skip_until(&[ExtensibleOp], &mut ext.stray);
        ext.operator_token = self.eat(ExtensibleOp);
        if ext.operator_token.is_some() {
            ext.value_token = self.eat(Value);
        }

        ext.close_paren = self.finish(ext.open_paren.is_some(), &mut ext.stray);
        FilterNode::Extensible(ext)
    }

    /// Anything that does not start a known filter component. An opened
    /// fragment swallows balanced nested parentheses up to its own `)`.
    fn parse_undefined(&mut self, open: Option<Token>) -> FilterNode {
        let mut undefined = Undefined {
            open_paren: open,
            ..Undefined::default()
        };

        if undefined.open_paren.is_some() {
            let mut depth = 0usize;
            while let Some(kind) = self.current_kind() {
                match kind {
                    TokenKind::RParen if depth == 0 => break,
                    TokenKind::RParen => depth -= 1,
                    TokenKind::LParen => depth += 1,
                    _ => {}
                }
                undefined.tokens_seen.extend(self.bump());
            }
            undefined.close_paren = self.eat(TokenKind::RParen);
        } else {
            self.skip_until(&[], &mut undefined.tokens_seen);
        }

        FilterNode::Undefined(undefined)
    }
}

fn undefined_fragment(tokens: Vec<Token>) -> FilterNode {
    FilterNode::Undefined(Undefined {
        tokens_seen: tokens,
        ..Undefined::default()
    })
}

fn is_extensible_part(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::DnFlag | TokenKind::Colon | TokenKind::ExtensibleOp
    )
}

/// Kinds that can begin a filter component whose `(` is missing.
fn starts_component(kind: TokenKind) -> bool {
    kind == TokenKind::Attribute || is_extensible_part(kind) || kind.is_filter_type()
}
