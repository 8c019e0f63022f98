//! Streaming scanner for SQL-like languages.
//!
//! A hand-written state machine turns characters into classified tokens
//! with exact byte offsets. Every character of the input ends up in
//! exactly one token, whitespace and comments included, so the token
//! texts concatenate back to the input.
//!
//! # Quick start
//!
//! ## Scan a string
//!
//! ```
//! use sqlscan::{TokenKind, tokenize};
//!
//! let tokens = tokenize("select a.b from t where x = ?").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Ident);
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::EndOfInput);
//!
//! let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(text, "select a.b from t where x = ?");
//! ```
//!
//! ## Add syntax through the dispatch table
//!
//! ```
//! use sqlscan::{DispatchTable, Lexer, Scanner, State, TokenKind, Transition, state};
//!
//! fn system_variable(sc: &mut Scanner<'_>) -> Transition {
//!     sc.next();
//!     sc.next();
//!     sc.accept_while(|c| c.is_alphanumeric() || c == '_');
//!     sc.emit(TokenKind::Ident);
//!     Ok(Some(state::WHITESPACE))
//! }
//!
//! let table = DispatchTable::default()
//!     .with("@@", State::new("system_variable", system_variable))
//!     .unwrap()
//!     .into_shared();
//!
//! let tokens: Vec<_> = Lexer::with_table("@@version".chars(), table).collect();
//! assert_eq!(tokens[0].text, "@@version");
//! ```
//!
//! ## Scan on a background thread
//!
//! ```
//! use sqlscan::TokenStream;
//!
//! let mut stream = TokenStream::from_reader("select 1".as_bytes()).unwrap();
//! while let Some(token) = stream.next_token() {
//!     println!("{} {:?}", token.kind, token.text);
//! }
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use std::sync::Arc;

pub mod classify;
pub mod dispatch;
pub mod lexer;
pub mod scanner;
pub mod source;
pub mod state;
pub mod stream;
pub mod token;

pub use dispatch::{DispatchError, DispatchTable};
pub use lexer::{LexError, LexErrorKind, Lexer, tokenize};
pub use scanner::{Scanner, State, Transition};
pub use source::{CharSource, Utf8Reader};
pub use stream::TokenStream;
pub use token::{Span, Token, TokenKind};

/// Unified error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fatal scan error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// An invalid dispatch table binding.
    #[error("{0}")]
    Dispatch(#[from] DispatchError),
    /// The scanning thread could not be started.
    #[error("failed to start scanner thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Scan `input` with a custom dispatch table and collect every token.
pub fn tokenize_with(input: &str, table: &Arc<DispatchTable>) -> Result<Vec<Token>, Error> {
    let mut lexer = Lexer::with_table(input.chars(), Arc::clone(table));
    let tokens: Vec<Token> = lexer.by_ref().collect();
    match lexer.take_error() {
        Some(err) => Err(err.into()),
        None => Ok(tokens),
    }
}
