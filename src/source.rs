//! Character sources feeding the scanner.
//!
//! A source hands out one character at a time and signals the end of
//! input with `Ok(None)`. Sources never buffer lookahead on behalf of the
//! scanner; all backtracking happens in the scanner's own window.

use std::io::{self, BufRead};
use std::str::Chars;

/// Sequential supplier of characters.
pub trait CharSource {
    /// Read the next character, or `None` at end of input.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl CharSource for Chars<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

impl<S: CharSource + ?Sized> CharSource for Box<S> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

/// Decodes UTF-8 from a buffered reader one character at a time.
///
/// Every decoded character is passed on, a leading byte order mark
/// included, so reading a text gives the same characters as `str::chars`.
#[derive(Debug)]
pub struct Utf8Reader<R> {
    reader: R,
}

impl<R: BufRead> Utf8Reader<R> {
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.reader.fill_buf()? {
            [] => return Ok(None),
            [first, ..] => *first,
        };
        self.reader.consume(1);
        Ok(Some(byte))
    }

    fn decode(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };

        let width = utf8_width(lead)
            .ok_or_else(|| invalid_data(format!("invalid UTF-8 lead byte 0x{lead:02x}")))?;

        let mut bytes = [lead, 0, 0, 0];
        for slot in bytes.iter_mut().take(width).skip(1) {
            *slot = self
                .read_byte()?
                .ok_or_else(|| invalid_data("truncated UTF-8 sequence".to_string()))?;
        }

        std::str::from_utf8(&bytes[..width])
            .map_err(|e| invalid_data(e.to_string()))?
            .chars()
            .next()
            .map_or_else(
                || Err(invalid_data("empty UTF-8 sequence".to_string())),
                |c| Ok(Some(c)),
            )
    }
}

impl<R: BufRead> CharSource for Utf8Reader<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        self.decode()
    }
}

const fn utf8_width(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
