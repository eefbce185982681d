//! Unit tests for the lexer module.
//!
//! Covers keywords, identifiers, numeric/character/string literals,
//! operators, comments and error cases.

use super::{
    lexer::{tokenize, unescape},
    tokens::TokenKind,
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.c".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("void bool char int double if else for return true false"),
        vec![
            TokenKind::Void,
            TokenKind::Bool,
            TokenKind::Char,
            TokenKind::Int,
            TokenKind::Double,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::For,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::False,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore integer".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    // Keywords only match whole words
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "integer");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].value, "0");
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_characters() {
    let source = r"'a' '\n' '\'' ' '".to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Character);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].value, r"\n");
    assert_eq!(tokens[2].value, r"\'");
    assert_eq!(tokens[3].value, " ");
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "two words" "tab\there" "say \"hi\"""#.to_string();
    let tokens = tokenize(source, Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "two words");
    assert_eq!(tokens[2].value, r"tab\there");
    assert_eq!(tokens[3].value, r#"say \"hi\""#);
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("= == != < <= > >= + - * / %"),
        vec![
            TokenKind::Assignment,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] ; ,"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    assert_eq!(
        kinds("int x; // trailing comment\n// whole line\nx = 1;"),
        vec![
            TokenKind::Int,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_token_spans() {
    let tokens = tokenize("int  answer".to_string(), Some("test.c".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 11);
    assert_eq!(tokens[1].span.start.1.as_str(), "test.c");
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("int x = 1 @ 2;".to_string(), Some("test.c".to_string())).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_unescape_simple_escapes() {
    assert_eq!(unescape(r"tab\there"), b"tab\there");
    assert_eq!(unescape(r#"say \"hi\""#), b"say \"hi\"");
    assert_eq!(unescape(r"\'\\\r"), b"'\\\r");
    assert_eq!(unescape(r"a\qb"), b"a\\qb");
}

#[test]
fn test_unescape_hex() {
    assert_eq!(unescape(r"\x41\x42"), b"AB");
    assert_eq!(unescape(r"\x4"), b"\x04");
    assert_eq!(unescape(r"\xg"), b"\\xg");
}

#[test]
fn test_unescape_yields_raw_bytes() {
    // High escapes are single bytes, not UTF-8 sequences
    assert_eq!(unescape(r"\xff"), vec![0xff]);
    assert_eq!(unescape(r"\x80a"), vec![0x80, b'a']);

    // Interior NULs are kept
    assert_eq!(unescape(r"ab\0cd"), b"ab\0cd");

    // Unescaped text is copied as UTF-8
    assert_eq!(unescape("é"), "é".as_bytes());
}
