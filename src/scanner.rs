//! Lookahead buffer and cursor shared by all state functions.
//!
//! Characters are read from the source on demand and kept in a window
//! until they are committed by [`Scanner::emit`] or [`Scanner::ignore`].
//! Between commits a state function may move the cursor back freely,
//! which lets it change its mind about a token without touching the
//! source again.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::dispatch::DispatchTable;
use crate::lexer::{LexError, LexErrorKind};
use crate::source::CharSource;
use crate::token::{Span, Token, TokenKind};

/// Outcome of running a state: the next state, `None` once the scan is
/// complete, or a fatal error.
pub type Transition = Result<Option<State>, LexError>;

/// A named state of the scanning state machine.
#[derive(Clone, Copy)]
pub struct State {
    name: &'static str,
    run: fn(&mut Scanner<'_>) -> Transition,
}

impl State {
    pub const fn new(name: &'static str, run: fn(&mut Scanner<'_>) -> Transition) -> Self {
        Self { name, run }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Run this state against `scanner`.
    pub fn run(self, scanner: &mut Scanner<'_>) -> Transition {
        (self.run)(scanner)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&self.name).finish()
    }
}

/// Scanner state: the lookahead window, the cursor into it, and the
/// tokens emitted but not yet handed out.
///
/// Slots of the window are `None` where the source reported end of
/// input, so moving back over the end marker is the same as moving back
/// over a character.
pub struct Scanner<'a> {
    source: Box<dyn CharSource + Send + 'a>,
    exhausted: bool,
    fault: Option<io::Error>,
    buffer: Vec<Option<char>>,
    pos: usize,
    offset: usize,
    table: Arc<DispatchTable>,
    quote: Option<char>,
    emitted: VecDeque<Token>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(source: Box<dyn CharSource + Send + 'a>, table: Arc<DispatchTable>) -> Self {
        Self {
            source,
            exhausted: false,
            fault: None,
            buffer: Vec::with_capacity(16),
            pos: 0,
            offset: 0,
            table,
            quote: None,
            emitted: VecDeque::new(),
        }
    }

    fn read(&mut self) -> Option<char> {
        if self.exhausted {
            return None;
        }
        match self.source.next_char() {
            Ok(Some(c)) => Some(c),
            Ok(None) => {
                self.exhausted = true;
                None
            }
            Err(e) => {
                // Surfaced by the driver as a fatal error after this step.
                self.exhausted = true;
                self.fault = Some(e);
                None
            }
        }
    }

    /// Consume and return the next character, `None` at end of input.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    /// Return the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        if self.pos == self.buffer.len() {
            let c = self.read();
            self.buffer.push(c);
        }
        self.buffer[self.pos]
    }

    /// Return up to `n` upcoming characters without consuming them.
    /// Fewer are returned when the input ends first.
    pub fn peek_ahead(&mut self, n: usize) -> String {
        while self.buffer.len() < self.pos + n {
            let c = self.read();
            self.buffer.push(c);
        }
        self.buffer[self.pos..self.pos + n].iter().flatten().collect()
    }

    /// Step back one character.
    ///
    /// # Panics
    ///
    /// Panics if nothing was consumed since the last commit.
    pub fn backup(&mut self) {
        self.backup_by(1);
    }

    /// Step back `n` characters.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `n` characters were consumed since the last
    /// commit. This is a bug in the calling state, not bad input.
    pub fn backup_by(&mut self, n: usize) {
        assert!(
            n <= self.pos,
            "scanner: trying to back up by {n} when only {} characters are consumed",
            self.pos
        );
        self.pos -= n;
    }

    /// Consume the next character if it is one of `valid`.
    pub fn accept(&mut self, valid: &str) -> bool {
        match self.next() {
            Some(c) if valid.contains(c) => true,
            _ => {
                self.backup();
                false
            }
        }
    }

    /// Consume characters while `pred` holds. Returns how many were
    /// consumed; the first rejected character stays unconsumed.
    pub fn accept_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.next().is_some_and(&pred) {
            count += 1;
        }
        self.backup();
        count
    }

    /// Consume characters until `pred` holds or the input ends. Returns
    /// how many were consumed; the terminating character stays
    /// unconsumed.
    pub fn accept_until(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.next().is_some_and(|c| !pred(c)) {
            count += 1;
        }
        self.backup();
        count
    }

    /// Emit everything consumed since the last commit as a token of
    /// `kind`, then commit.
    pub fn emit(&mut self, kind: TokenKind) {
        let text: String = self.buffer[..self.pos].iter().flatten().collect();
        self.emitted.push_back(Token {
            kind,
            text,
            span: Span::at(self.offset),
        });
        self.ignore();
    }

    /// Drop everything consumed since the last commit.
    pub fn ignore(&mut self) {
        let bytes: usize = self.buffer[..self.pos]
            .iter()
            .flatten()
            .map(|c| c.len_utf8())
            .sum();
        self.offset += bytes;
        self.buffer.drain(..self.pos);
        self.pos = 0;
    }

    /// Characters consumed since the last commit.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.pos
    }

    /// Byte offset of the first uncommitted character.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// State bound to `literal` in the dispatch table.
    #[must_use]
    pub fn dispatch(&self, literal: &str) -> Option<State> {
        self.table.get(literal)
    }

    /// Fatal transition positioned at the pending start offset.
    pub fn fail(&self, kind: LexErrorKind) -> Transition {
        Err(LexError {
            kind,
            offset: self.offset,
        })
    }

    /// Delimiter of the quoted string being scanned across states.
    #[must_use]
    pub const fn quote(&self) -> Option<char> {
        self.quote
    }

    pub const fn set_quote(&mut self, quote: Option<char>) {
        self.quote = quote;
    }

    pub(crate) fn pop_token(&mut self) -> Option<Token> {
        self.emitted.pop_front()
    }

    pub(crate) fn push_token(&mut self, token: Token) {
        self.emitted.push_back(token);
    }

    /// Take the source failure seen since the last call. End-of-input
    /// tokens queued on the strength of that failure are dropped.
    pub(crate) fn take_fault(&mut self) -> Option<io::Error> {
        let fault = self.fault.take()?;
        self.emitted.retain(|t| t.kind != TokenKind::EndOfInput);
        Some(fault)
    }
}
