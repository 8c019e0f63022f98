use std::borrow::Cow;
use std::fmt;

/// Precedence of non-operators.
pub const LOWEST_PREC: u8 = 0;

/// Source location of a token.
///
/// `offset` is the byte offset of the first character of the token
/// within the whole input. `line` and `column` are carried for
/// consumers that fill them in; the scanner leaves them at `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Span starting at `offset` with no line information.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            offset,
            line: 0,
            column: 0,
        }
    }
}

/// Token kinds produced by the scanner.
///
/// Keywords are not distinguished from identifiers: every word-like
/// token is an [`TokenKind::Ident`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Fatal scan error; the text is the diagnostic message.
    Error,
    /// Run of spaces, tabs, carriage returns and newlines.
    Whitespace,
    /// Comment up to the end of the line (`-- ...`, `// ...`).
    SingleLineComment,
    /// Delimited comment (`/* ... */`).
    MultiLineComment,
    /// Parameter placeholder (`?`, `%s`).
    Holder,
    /// Integer literal.
    Number,
    /// Literal with a fractional part (`1.5`).
    Float,
    /// Literal with an exponent marker (`1e10`).
    Imaginary,
    /// Body of a quoted string, without its quotes.
    String,
    /// Opening or closing quote of a string.
    Quote,
    /// Identifier, keyword or backtick-quoted name.
    Ident,
    /// Run of operator characters (`=`, `<>`, `+`, ...).
    Operator,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Period,
    Semicolon,
    Colon,
    /// End of input. Always the last token of a successful scan.
    EndOfInput,
    /// Character or unterminated literal the scanner could not classify.
    Unknown,
}

impl TokenKind {
    /// Stable lowercase name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Whitespace => "whitespace",
            Self::SingleLineComment => "single_line_comment",
            Self::MultiLineComment => "multi_line_comment",
            Self::Holder => "holder",
            Self::Number => "number",
            Self::Float => "float",
            Self::Imaginary => "imaginary",
            Self::String => "string",
            Self::Quote => "quote",
            Self::Ident => "ident",
            Self::Operator => "operator",
            Self::LParen => "left_paren",
            Self::RParen => "right_paren",
            Self::LBracket => "left_bracket",
            Self::RBracket => "right_bracket",
            Self::LBrace => "left_brace",
            Self::RBrace => "right_brace",
            Self::Comma => "comma",
            Self::Period => "period",
            Self::Semicolon => "semicolon",
            Self::Colon => "colon",
            Self::EndOfInput => "end_of_input",
            Self::Unknown => "unknown",
        }
    }

    /// Whether tokens of this kind carry no meaning for a parser.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::SingleLineComment | Self::MultiLineComment
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Byte offset of the token start.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.offset
    }

    /// Binary operator precedence of this token.
    ///
    /// Word operators (`or`, `and`, `in`) match case-insensitively.
    /// Anything that is not a binary operator gets [`LOWEST_PREC`].
    #[must_use]
    pub fn precedence(&self) -> u8 {
        if !matches!(self.kind, TokenKind::Operator | TokenKind::Ident) {
            return LOWEST_PREC;
        }
        let text = self.text.as_str();
        if text == "||" || text.eq_ignore_ascii_case("or") {
            1
        } else if text == "&&" || text.eq_ignore_ascii_case("and") {
            2
        } else if matches!(text, "==" | "!=" | "<" | "<=" | ">" | ">=")
            || text.eq_ignore_ascii_case("in")
        {
            3
        } else if matches!(text, "+" | "-" | "|" | "^") {
            4
        } else if matches!(text, "*" | "/" | "%" | "<<" | ">>" | "&" | "&^") {
            5
        } else {
            LOWEST_PREC
        }
    }

    /// Text with quoting resolved.
    ///
    /// Backtick identifiers lose their backticks and doubled backticks
    /// collapse to one. String bodies collapse a doubled `quote` and drop
    /// the backslash of an escape. Other tokens are returned unchanged.
    #[must_use]
    pub fn unquoted(&self, quote: char) -> Cow<'_, str> {
        match self.kind {
            TokenKind::Ident => match self
                .text
                .strip_prefix('`')
                .and_then(|rest| rest.strip_suffix('`'))
            {
                Some(inner) => collapse_doubled(inner, '`', false),
                None => Cow::Borrowed(&self.text),
            },
            TokenKind::String => collapse_doubled(&self.text, quote, true),
            _ => Cow::Borrowed(&self.text),
        }
    }
}

fn collapse_doubled(body: &str, delimiter: char, backslash: bool) -> Cow<'_, str> {
    if !body.contains(delimiter) && !(backslash && body.contains('\\')) {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if backslash && c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if c == delimiter {
            out.push(c);
            // the second half of a doubled delimiter
            let mut lookahead = chars.clone();
            if lookahead.next() == Some(delimiter) {
                chars = lookahead;
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
