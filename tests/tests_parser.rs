//! Parser Tests - Tokens, Filter Shapes and Recovery
//!
//! Covers the lexer output for each lexeme class and the tree shapes the
//! parser builds for complete and half-typed filters.

use ldapfilter::parser::{TokenKind, parse_text, tokenize};
use ldapfilter::syntax::{FilterType, InvalidCause, NodeKind};
use rstest::rstest;

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).iter().map(|token| token.kind()).collect()
}

// ============================================================================
// Tokens
// ============================================================================

#[rstest]
#[case("(cn=Bob)", vec![TokenKind::LParen, TokenKind::Attribute, TokenKind::Equal, TokenKind::Value, TokenKind::RParen])]
#[case("(cn=*)", vec![TokenKind::LParen, TokenKind::Attribute, TokenKind::Present, TokenKind::RParen])]
#[case("(cn=*x)", vec![TokenKind::LParen, TokenKind::Attribute, TokenKind::Equal, TokenKind::SubstringOp, TokenKind::Value, TokenKind::RParen])]
#[case("(age>=1)", vec![TokenKind::LParen, TokenKind::Attribute, TokenKind::GreaterOrEqual, TokenKind::Value, TokenKind::RParen])]
#[case("(age<=1)", vec![TokenKind::LParen, TokenKind::Attribute, TokenKind::LessOrEqual, TokenKind::Value, TokenKind::RParen])]
#[case("(sn~=x)", vec![TokenKind::LParen, TokenKind::Attribute, TokenKind::Approx, TokenKind::Value, TokenKind::RParen])]
#[case("(&|!", vec![TokenKind::LParen, TokenKind::And, TokenKind::Or, TokenKind::Not])]
#[case("(cn:DN:r:=x)", vec![TokenKind::LParen, TokenKind::Attribute, TokenKind::DnFlag, TokenKind::Colon, TokenKind::MatchingRule, TokenKind::ExtensibleOp, TokenKind::Value, TokenKind::RParen])]
#[case("(#)", vec![TokenKind::LParen, TokenKind::Attribute, TokenKind::RParen])]
#[case("(<)", vec![TokenKind::LParen, TokenKind::Unknown, TokenKind::RParen])]
fn test_token_kinds(#[case] input: &str, #[case] expected: Vec<TokenKind>) {
    assert_eq!(kinds(input), expected, "input: {}", input);
}

#[test]
fn test_value_keeps_inner_spaces() {
    let tokens = tokenize("(cn=Babs Jensen)");
    assert_eq!(tokens[3].text(), "Babs Jensen");
    assert_eq!(u32::from(tokens[3].offset()), 4);
}

#[test]
fn test_whitespace_between_tokens_is_skipped() {
    let tokens = tokenize(" ( & (cn=a) )");
    assert_eq!(tokens.len(), 8);
    assert_eq!(u32::from(tokens[0].offset()), 1);
    assert_eq!(u32::from(tokens[1].offset()), 3);
}

// ============================================================================
// Filter shapes
// ============================================================================

#[rstest]
#[case("(cn=Bob)", NodeKind::Item)]
#[case("(&(cn=Bob))", NodeKind::And)]
#[case("(|(cn=Bob))", NodeKind::Or)]
#[case("(!(cn=Bob))", NodeKind::Not)]
#[case("(cn:=Bob)", NodeKind::Extensible)]
#[case("(:dn:2.5.13.5:=Bob)", NodeKind::Extensible)]
#[case("(~)", NodeKind::Undefined)]
#[case("", NodeKind::Undefined)]
fn test_root_kind(#[case] input: &str, #[case] expected: NodeKind) {
    assert_eq!(parse_text(input).root().kind(), expected, "input: {}", input);
}

#[rstest]
#[case("(cn=Bob)", FilterType::Equality)]
#[case("(cn=*)", FilterType::Present)]
#[case("(cn=B*)", FilterType::Substring)]
#[case("(cn=*b*)", FilterType::Substring)]
#[case("(age>=3)", FilterType::GreaterOrEqual)]
#[case("(age<=3)", FilterType::LessOrEqual)]
#[case("(sn~=Smyth)", FilterType::Approx)]
fn test_item_filter_type(#[case] input: &str, #[case] expected: FilterType) {
    let tree = parse_text(input);
    let item = tree.root().as_item().expect("item root");
    assert_eq!(item.filter_type(), Some(expected));
    assert!(tree.is_valid(), "input: {}", input);
}

#[test]
fn test_present_has_no_value() {
    let tree = parse_text("(cn=*)");
    assert!(tree.is_valid());
    let item = tree.root().as_item().unwrap();
    assert_eq!(item.operator_token().unwrap().kind(), TokenKind::Present);
    assert!(item.value_token().is_none());
    assert!(item.substring_parts().is_empty());
}

// ============================================================================
// Recovery
// ============================================================================

#[rstest]
#[case("(&)", InvalidCause::EmptyBranch)]
#[case("(|)", InvalidCause::EmptyBranch)]
#[case("(!)", InvalidCause::EmptyBranch)]
#[case("(cn)", InvalidCause::MissingOperator)]
#[case("(=Bob)", InvalidCause::MissingAttribute)]
#[case("(cn=)", InvalidCause::MissingValue)]
#[case("(cn:=)", InvalidCause::MissingValue)]
#[case("(cn:dn)", InvalidCause::MissingOperator)]
#[case("(cn::=x)", InvalidCause::MissingMatchingRule)]
#[case("(cn=Bob", InvalidCause::MissingCloseParen)]
#[case("(cn x=1)", InvalidCause::UnrecognizedFragment)]
#[case("(age>=1*)", InvalidCause::UnrecognizedFragment)]
#[case("()", InvalidCause::MissingAttribute)]
#[case("(!(a=1)(b=2))", InvalidCause::TooManyNotChildren)]
fn test_root_cause(#[case] input: &str, #[case] expected: InvalidCause) {
    let tree = parse_text(input);
    assert!(!tree.is_valid(), "input: {}", input);
    assert_eq!(tree.root().cause(), Some(expected), "input: {}", input);
}

#[test]
fn test_missing_open_paren_on_nested_filter() {
    let tree = parse_text("(|cn=a(sn=b))");
    let children = tree.root().children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].cause(), Some(InvalidCause::MissingOpenParen));
    assert!(children[1].is_valid());
    assert!(tree.root().close_paren().is_some());
}

#[test]
fn test_junk_before_filter_is_kept() {
    let tree = parse_text("x y(cn=a)");
    assert_eq!(tree.nodes().len(), 2);
    assert_eq!(tree.nodes()[0].kind(), NodeKind::Undefined);
    assert_eq!(tree.root().kind(), NodeKind::Item);
    assert_eq!(tree.to_text(), "xy(cn=a)");
}

#[test]
fn test_text_without_paren_is_single_undefined() {
    let tree = parse_text("cn=Bob");
    assert_eq!(tree.nodes().len(), 1);
    assert_eq!(tree.root().cause(), Some(InvalidCause::UnrecognizedFragment));
    assert_eq!(tree.to_text(), "cn=Bob");
}
