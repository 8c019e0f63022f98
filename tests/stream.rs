//! Background-thread token stream.

mod common;

use std::io::{self, Cursor, Read};

use common::{assert_lossless, scan};
use sqlscan::{
    DispatchTable, Lexer, Scanner, State, TokenKind, TokenStream, Transition, Utf8Reader, state,
};

#[test]
fn stream_matches_lexer() {
    let input = "SELECT a.b, 'x''y' FROM t -- tail\nWHERE c >= 1.5 AND d = ?;";
    let stream = TokenStream::from_reader(Cursor::new(input)).expect("spawn");
    let streamed: Vec<_> = stream.collect();
    assert_eq!(streamed, scan(input));
}

#[test]
fn reader_and_string_agree_on_byte_order_mark() {
    let input = "\u{FEFF}ab c";
    let expected = vec![
        (TokenKind::Unknown, "\u{feff}".to_string(), 0),
        (TokenKind::Ident, "ab".to_string(), 3),
        (TokenKind::Whitespace, " ".to_string(), 5),
        (TokenKind::Ident, "c".to_string(), 6),
        (TokenKind::EndOfInput, String::new(), 7),
    ];
    let summary = |t: sqlscan::Token| (t.kind, t.text, t.span.offset);

    let from_str: Vec<_> = Lexer::new(input).map(summary).collect();
    let from_reader: Vec<_> = Lexer::from_reader(input.as_bytes()).map(summary).collect();
    let streamed: Vec<_> = TokenStream::from_reader(Cursor::new(input))
        .expect("spawn")
        .map(summary)
        .collect();

    assert_eq!(from_str, expected);
    assert_eq!(from_reader, expected);
    assert_eq!(streamed, expected);
    assert_lossless(input);
}

#[test]
fn stream_terminates_with_one_end_token() {
    let stream = TokenStream::from_reader(Cursor::new("a b c")).expect("spawn");
    let tokens: Vec<_> = stream.collect();
    let ends = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::EndOfInput)
        .count();
    assert_eq!(ends, 1);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfInput));
}

#[test]
fn stream_stops_after_fatal_error() {
    let mut stream = TokenStream::from_reader(Cursor::new("x /* never closed")).expect("spawn");
    assert_eq!(stream.next_token().map(|t| t.kind), Some(TokenKind::Ident));
    assert_eq!(stream.next_token().map(|t| t.kind), Some(TokenKind::Whitespace));
    let error = stream.next_token().expect("error token");
    assert_eq!(error.kind, TokenKind::Error);
    assert_eq!(error.span.offset, 2);
    assert!(stream.next_token().is_none());
}

#[test]
fn stream_with_custom_table() {
    let table = DispatchTable::default()
        .with("#", sqlscan::state::SINGLE_LINE_COMMENT)
        .expect("register")
        .into_shared();
    let source = Utf8Reader::new(Cursor::new("# hi\nx"));
    let stream = TokenStream::spawn(source, table).expect("spawn");
    let kinds: Vec<_> = stream.map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::SingleLineComment,
            TokenKind::Whitespace,
            TokenKind::Ident,
            TokenKind::EndOfInput,
        ]
    );
}

/// Reader that fails after handing out its data.
struct Flaky {
    data: Cursor<&'static str>,
}

impl Read for Flaky {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::other("connection reset")),
            n => Ok(n),
        }
    }
}

#[test]
fn stream_reports_read_failure() {
    let stream = TokenStream::from_reader(Flaky {
        data: Cursor::new("select 1"),
    })
    .expect("spawn");
    let tokens: Vec<_> = stream.collect();
    let last = tokens.last().expect("tokens");
    assert_eq!(last.kind, TokenKind::Error);
    assert_eq!(last.text, "failed to read input: connection reset");
    assert!(!tokens.iter().any(|t| t.kind == TokenKind::EndOfInput));
}

#[test]
fn stream_dropped_early() {
    let input = "a, ".repeat(50_000);
    let mut stream = TokenStream::from_reader(Cursor::new(input)).expect("spawn");
    for _ in 0..10 {
        assert!(stream.next_token().is_some());
    }
    drop(stream);
}

fn overreach(sc: &mut Scanner<'_>) -> Transition {
    sc.next();
    sc.backup_by(5);
    Ok(Some(state::WHITESPACE))
}

#[test]
#[should_panic(expected = "back up")]
fn stream_reraises_scanner_panic() {
    let table = DispatchTable::default()
        .with("@", State::new("overreach", overreach))
        .expect("register")
        .into_shared();
    let stream = TokenStream::spawn(Utf8Reader::new(Cursor::new("@")), table).expect("spawn");
    for _ in stream {}
}
