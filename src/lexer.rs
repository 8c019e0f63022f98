use std::fmt;
use std::io::{BufReader, Read};
use std::iter::FusedIterator;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::dispatch::DispatchTable;
use crate::scanner::{Scanner, State};
use crate::source::{CharSource, Utf8Reader};
use crate::state;
use crate::token::{Span, Token, TokenKind};

/// Classifies a fatal lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Input ended inside a `/* ... */` comment.
    UnterminatedComment,
    /// Input ended inside a backtick-quoted identifier.
    UnterminatedIdentifier,
    /// Input ended right after a backslash in a string.
    UnterminatedEscape,
    /// The character source failed.
    Io(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedComment => {
                write!(f, "reached end of input when looking for comment end")
            }
            Self::UnterminatedIdentifier => {
                write!(f, "unterminated quoted identifier")
            }
            Self::UnterminatedEscape => {
                write!(f, "unterminated quoted string")
            }
            Self::Io(message) => {
                write!(f, "failed to read input: {message}")
            }
        }
    }
}

/// Error that stops a scan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {offset}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
}

/// Tokenize a source string into its complete token sequence.
///
/// The returned tokens end with a single [`TokenKind::EndOfInput`].
///
/// # Errors
///
/// Returns `LexError` on unterminated comments, backtick identifiers or
/// escapes.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let tokens: Vec<Token> = lexer.by_ref().collect();
    match lexer.take_error() {
        Some(err) => Err(err),
        None => Ok(tokens),
    }
}

/// Pull-based scanner: each call to `next` runs the state machine just
/// far enough to produce one more token.
///
/// A scan ends after one [`TokenKind::EndOfInput`] token, or after one
/// [`TokenKind::Error`] token when a fatal error stops it.
pub struct Lexer<'a> {
    scanner: Scanner<'a>,
    state: Option<State>,
    error: Option<LexError>,
}

impl<'a> Lexer<'a> {
    /// Scan a string with the built-in dispatch table.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_table(input.chars(), DispatchTable::shared())
    }

    /// Scan UTF-8 text from a reader with the built-in dispatch table.
    pub fn from_reader<R: Read + Send + 'a>(reader: R) -> Self {
        Self::with_table(
            Utf8Reader::new(BufReader::new(reader)),
            DispatchTable::shared(),
        )
    }

    /// Scan any character source with a custom dispatch table.
    pub fn with_table<S: CharSource + Send + 'a>(source: S, table: Arc<DispatchTable>) -> Self {
        Self {
            scanner: Scanner::new(Box::new(source), table),
            state: Some(state::WHITESPACE),
            error: None,
        }
    }

    /// The fatal error that ended the scan, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    /// Take the fatal error that ended the scan, if any.
    pub const fn take_error(&mut self) -> Option<LexError> {
        self.error.take()
    }

    /// Whether the final token has been produced.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.state.is_none()
    }

    fn step(&mut self, state: State) {
        trace!(state = state.name(), offset = self.scanner.offset(), "enter state");
        let result = state.run(&mut self.scanner);

        let result = match self.scanner.take_fault() {
            Some(e) => Err(LexError {
                kind: LexErrorKind::Io(e.to_string()),
                offset: self.scanner.offset(),
            }),
            None => result,
        };

        match result {
            Ok(next) => self.state = next,
            Err(err) => {
                debug!(error = %err, "scan stopped");
                self.scanner.push_token(Token {
                    kind: TokenKind::Error,
                    text: err.kind.to_string(),
                    span: Span::at(err.offset),
                });
                self.state = None;
                self.error = Some(err);
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.scanner.pop_token() {
                return Some(token);
            }
            let state = self.state?;
            self.step(state);
        }
    }
}

impl FusedIterator for Lexer<'_> {}

impl fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("state", &self.state)
            .field("offset", &self.scanner.offset())
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn simple_statement() {
        let tokens = tokenize("select * from t").expect("should tokenize");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["select", " ", "*", " ", "from", " ", "t", ""]);
        assert_eq!(tokens[2].kind, TokenKind::Operator);
        assert_eq!(tokens[7].kind, TokenKind::EndOfInput);
    }

    #[test]
    fn empty_input() {
        let tokens = tokenize("").expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::EndOfInput);
        assert_eq!(tokens[0].span.offset, 0);
    }

    #[test]
    fn end_token_offset_is_input_length() {
        let tokens = tokenize("é ").expect("should tokenize");
        assert_eq!(tokens.last().map(Token::offset), Some(3));
    }

    #[test]
    fn lexer_is_fused() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Ident));
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::EndOfInput));
        assert!(lexer.is_finished());
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn fatal_error_ends_with_error_token() {
        let mut lexer = Lexer::new("a /* open");
        let tokens: Vec<_> = lexer.by_ref().collect();
        let last = tokens.last().expect("tokens");
        assert_eq!(last.kind, TokenKind::Error);
        assert_eq!(last.text, "reached end of input when looking for comment end");
        assert_eq!(last.span.offset, 2);
        assert!(tokens.iter().all(|t| t.kind != TokenKind::EndOfInput));
        assert_eq!(
            lexer.error().map(|e| &e.kind),
            Some(&LexErrorKind::UnterminatedComment)
        );
    }

    #[test]
    fn error_display() {
        let err = tokenize("`abc").expect_err("unterminated");
        assert_eq!(err.to_string(), "unterminated quoted identifier at byte 0");
    }

    #[test]
    fn reader_source() {
        let tokens: Vec<_> = Lexer::from_reader("x = 'é'".as_bytes()).collect();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Operator,
                TokenKind::Whitespace,
                TokenKind::Quote,
                TokenKind::String,
                TokenKind::Quote,
                TokenKind::EndOfInput,
            ]
        );
        assert_eq!(tokens[6].span.offset, 7);
    }

    #[test]
    fn reader_failure_is_fatal() {
        let mut lexer = Lexer::from_reader(&b"ok \xff"[..]);
        let tokens: Vec<_> = lexer.by_ref().collect();
        let last = tokens.last().expect("tokens");
        assert_eq!(last.kind, TokenKind::Error);
        assert!(matches!(
            lexer.error().map(|e| &e.kind),
            Some(LexErrorKind::Io(_))
        ));
    }

    #[test]
    fn custom_source_error_message() {
        struct Broken;
        impl CharSource for Broken {
            fn next_char(&mut self) -> io::Result<Option<char>> {
                Err(io::Error::other("gone"))
            }
        }

        let tokens: Vec<_> = Lexer::with_table(Broken, DispatchTable::shared()).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "failed to read input: gone");
    }
}
