//! Logos-based lexer for LDAP search filters
//!
//! The structural lexemes (parentheses, operators, attribute words) come from
//! a logos DFA. Assertion values are not regular in that sense: after a
//! comparison operator everything up to the next `(`, `)` or `*` belongs to
//! the value, spaces included. The [`Lexer`] wrapper therefore scans values
//! itself and bumps the logos lexer past them.

use super::token::{Token, TokenKind};
use logos::Logos;
use text_size::TextSize;

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, LogosToken>,
    in_value: bool,
    previous: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            source: input,
            inner: LogosToken::lexer(input),
            in_value: false,
            previous: None,
        }
    }

    /// Text after the last consumed byte.
    fn rest(&self) -> &'a str {
        &self.source[self.inner.span().end..]
    }

    /// Next piece of an assertion value, or `None` once the value ends.
    fn next_value_piece(&mut self) -> Option<Token> {
        let start = self.inner.span().end;
        let rest = self.rest();
        match rest.chars().next()? {
            '(' | ')' => None,
            '*' => {
                self.inner.bump(1);
                Some(Token::new(TokenKind::SubstringOp, "*", offset(start)))
            }
            _ => {
                let len = rest.find(['(', ')', '*']).unwrap_or(rest.len());
                self.inner.bump(len);
                Some(Token::new(TokenKind::Value, &rest[..len], offset(start)))
            }
        }
    }

    fn classify(&mut self, lexeme: LogosToken) -> TokenKind {
        match lexeme {
            LogosToken::LParen => TokenKind::LParen,
            LogosToken::RParen => TokenKind::RParen,
            LogosToken::Amp => TokenKind::And,
            LogosToken::Pipe => TokenKind::Or,
            LogosToken::Bang => TokenKind::Not,
            LogosToken::GtEq => TokenKind::GreaterOrEqual,
            LogosToken::LtEq => TokenKind::LessOrEqual,
            LogosToken::TildeEq => TokenKind::Approx,
            LogosToken::ColonEq => TokenKind::ExtensibleOp,
            LogosToken::Star => TokenKind::SubstringOp,
            LogosToken::Eq => {
                // `=*` right before `)` or the end is a presence test
                let is_present = self
                    .rest()
                    .strip_prefix('*')
                    .is_some_and(|after| after.is_empty() || after.starts_with(')'));
                if is_present {
                    self.inner.bump(1);
                    TokenKind::Present
                } else {
                    TokenKind::Equal
                }
            }
            LogosToken::Colon => {
                let rest = self.rest();
                let is_dn = rest.get(..2).is_some_and(|s| s.eq_ignore_ascii_case("dn"))
                    && rest
                        .get(2..)
                        .is_some_and(|after| after.is_empty() || after.starts_with(':'));
                if is_dn {
                    self.inner.bump(2);
                    TokenKind::DnFlag
                } else {
                    TokenKind::Colon
                }
            }
            LogosToken::Word => {
                if self.previous == Some(TokenKind::Colon) {
                    TokenKind::MatchingRule
                } else {
                    TokenKind::Attribute
                }
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.in_value {
            if let Some(token) = self.next_value_piece() {
                self.previous = Some(token.kind());
                return Some(token);
            }
            self.in_value = false;
        }

        let lexeme = self.inner.next()?;
        let kind = match lexeme {
            Ok(t) => self.classify(t),
            Err(()) => TokenKind::Unknown,
        };
        let span = self.inner.span();
        if kind == TokenKind::Unknown {
            tracing::trace!(offset = span.start, text = &self.source[span.clone()], "unknown filter character");
        }

        self.in_value = kind.starts_value();
        self.previous = Some(kind);
        Some(Token::new(kind, &self.source[span.clone()], offset(span.start)))
    }
}

fn offset(pos: usize) -> TextSize {
    // Filter texts are far below 4 GiB; saturate rather than wrap
    TextSize::new(u32::try_from(pos).unwrap_or(u32::MAX))
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

/// Logos token enum - structural lexemes only, values are scanned by [`Lexer`]
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum LogosToken {
    // =========================================================================
    // MULTI-CHARACTER OPERATORS (longest match wins over single-char)
    // =========================================================================
    #[token(">=")]
    GtEq,

    #[token("<=")]
    LtEq,

    #[token("~=")]
    TildeEq,

    #[token(":=")]
    ColonEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token(":")]
    Colon,
    #[token("*")]
    Star,

    // =========================================================================
    // WORDS (attribute descriptions, matching rules)
    // =========================================================================
    #[regex(r"[^ \t\r\n\f()&|!=<>~:*]+")]
    Word,
}
