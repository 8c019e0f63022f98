//! Threaded token stream.
//!
//! The scanner runs on its own thread and hands tokens over one at a
//! time through a zero-capacity channel, so the producer is never more
//! than one token ahead of the consumer.

use std::io::{BufReader, Read};
use std::panic;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, sync_channel};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::Error;
use crate::dispatch::DispatchTable;
use crate::lexer::Lexer;
use crate::source::{CharSource, Utf8Reader};
use crate::token::Token;

/// Consumer end of a scan running on a background thread.
///
/// Dropping the stream early is fine: the producer stops the next time
/// it tries to hand over a token.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Receiver<Token>,
    producer: Option<JoinHandle<()>>,
}

impl TokenStream {
    /// Start scanning `source` on a new thread.
    ///
    /// # Errors
    ///
    /// Returns `Error::Spawn` if the thread cannot be started.
    pub fn spawn<S>(source: S, table: Arc<DispatchTable>) -> Result<Self, Error>
    where
        S: CharSource + Send + 'static,
    {
        let (tx, rx) = sync_channel(0);
        let producer = thread::Builder::new()
            .name("sqlscan-producer".to_string())
            .spawn(move || {
                debug!("scanner started");
                for token in Lexer::with_table(source, table) {
                    if tx.send(token).is_err() {
                        debug!("token stream dropped, stopping scanner");
                        return;
                    }
                }
                debug!("scanner finished");
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            tokens: rx,
            producer: Some(producer),
        })
    }

    /// Start scanning UTF-8 text from `reader` with the built-in table.
    ///
    /// # Errors
    ///
    /// Returns `Error::Spawn` if the thread cannot be started.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Result<Self, Error> {
        Self::spawn(
            Utf8Reader::new(BufReader::new(reader)),
            DispatchTable::shared(),
        )
    }

    /// Block until the next token arrives. Returns `None` once the scan
    /// is over and every token has been taken.
    ///
    /// # Panics
    ///
    /// Re-raises a panic of the scanning thread.
    pub fn next_token(&mut self) -> Option<Token> {
        match self.tokens.recv() {
            Ok(token) => Some(token),
            Err(_) => {
                if let Some(producer) = self.producer.take() {
                    if let Err(payload) = producer.join() {
                        panic::resume_unwind(payload);
                    }
                }
                None
            }
        }
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
