#![allow(dead_code)]

use sqlscan::{Token, TokenKind, tokenize};

pub fn scan(input: &str) -> Vec<Token> {
    tokenize(input).unwrap_or_else(|e| panic!("tokenize failed for {input:?}: {e}"))
}

pub fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

pub fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

pub fn offsets(tokens: &[Token]) -> Vec<usize> {
    tokens.iter().map(|t| t.span.offset).collect()
}

/// Tokens that are neither whitespace nor comments.
pub fn significant(tokens: &[Token]) -> Vec<&Token> {
    tokens.iter().filter(|t| !t.kind.is_trivia()).collect()
}

/// Helper: scan, concatenate token texts, assert the input comes back.
pub fn assert_lossless(input: &str) {
    let tokens = scan(input);
    let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        joined, input,
        "round-trip mismatch:\n--- tokens ---\n{tokens:#?}"
    );
}
