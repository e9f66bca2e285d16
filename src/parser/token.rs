//! Filter tokens
//!
//! A token is an immutable lexeme with its exact source text and byte
//! position. The parser never rewrites tokens; it only decides which slot of
//! which node they land in.

use smol_str::SmolStr;
use text_size::{TextRange, TextSize};

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `&`
    And,
    /// `|`
    Or,
    /// `!`
    Not,
    /// Attribute description, e.g. `cn` or `2.5.4.3`
    Attribute,
    /// `=`
    Equal,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
    /// `~=`
    Approx,
    /// `=*` closing a presence filter
    Present,
    /// `*` wildcard of a substring assertion
    SubstringOp,
    /// Assertion value text
    Value,
    /// `:=`
    ExtensibleOp,
    /// `:dn` flag of an extensible match
    DnFlag,
    /// `:` introducing a matching rule
    Colon,
    /// Matching rule name or OID
    MatchingRule,
    /// Anything the lexer could not classify
    Unknown,
}

impl TokenKind {
    /// Comparison operators that may follow an item attribute.
    pub const FILTER_TYPES: &'static [TokenKind] = &[
        TokenKind::Equal,
        TokenKind::GreaterOrEqual,
        TokenKind::LessOrEqual,
        TokenKind::Approx,
        TokenKind::Present,
    ];

    pub fn is_filter_type(self) -> bool {
        Self::FILTER_TYPES.contains(&self)
    }

    pub fn is_branch_operator(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or | TokenKind::Not)
    }

    /// Whether the lexer switches to value scanning after this token.
    pub(crate) fn starts_value(self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::GreaterOrEqual
                | TokenKind::LessOrEqual
                | TokenKind::Approx
                | TokenKind::ExtensibleOp
        )
    }

    /// Canonical spelling for kinds whose text is fixed.
    pub fn punctuation(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Not => "!",
            TokenKind::Equal => "=",
            TokenKind::GreaterOrEqual => ">=",
            TokenKind::LessOrEqual => "<=",
            TokenKind::Approx => "~=",
            TokenKind::Present => "=*",
            TokenKind::SubstringOp => "*",
            TokenKind::ExtensibleOp => ":=",
            TokenKind::DnFlag => ":dn",
            TokenKind::Colon => ":",
            TokenKind::Attribute
            | TokenKind::Value
            | TokenKind::MatchingRule
            | TokenKind::Unknown => return None,
        };
        Some(text)
    }

    /// Human-readable name used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::And => "'&'",
            TokenKind::Or => "'|'",
            TokenKind::Not => "'!'",
            TokenKind::Attribute => "attribute",
            TokenKind::Equal => "'='",
            TokenKind::GreaterOrEqual => "'>='",
            TokenKind::LessOrEqual => "'<='",
            TokenKind::Approx => "'~='",
            TokenKind::Present => "'=*'",
            TokenKind::SubstringOp => "'*'",
            TokenKind::Value => "value",
            TokenKind::ExtensibleOp => "':='",
            TokenKind::DnFlag => "':dn'",
            TokenKind::Colon => "':'",
            TokenKind::MatchingRule => "matching rule",
            TokenKind::Unknown => "unknown token",
        }
    }
}

/// A token with its kind, exact source text and byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    kind: TokenKind,
    text: SmolStr,
    offset: TextSize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>, offset: TextSize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Synthesize a punctuation token at `offset` using the canonical
    /// spelling of `kind`. Returns `None` for kinds with free-form text.
    pub fn punct(kind: TokenKind, offset: TextSize) -> Option<Self> {
        kind.punctuation().map(|text| Self::new(kind, text, offset))
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn offset(&self) -> TextSize {
        self.offset
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn end(&self) -> TextSize {
        self.offset + self.len()
    }

    pub fn range(&self) -> TextRange {
        TextRange::at(self.offset, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punct_uses_canonical_text() {
        let token = Token::punct(TokenKind::GreaterOrEqual, TextSize::new(3)).unwrap();
        assert_eq!(token.text(), ">=");
        assert_eq!(token.range(), TextRange::new(3.into(), 5.into()));
    }

    #[test]
    fn test_punct_rejects_free_text_kinds() {
        assert!(Token::punct(TokenKind::Value, TextSize::new(0)).is_none());
        assert!(Token::punct(TokenKind::Attribute, TextSize::new(0)).is_none());
    }

    #[test]
    fn test_len_counts_bytes() {
        let token = Token::new(TokenKind::Value, "Jürgen", TextSize::new(4));
        assert_eq!(token.len(), TextSize::new(7));
        assert_eq!(token.end(), TextSize::new(11));
    }
}
