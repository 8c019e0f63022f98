//! Built-in states of the scanning state machine.
//!
//! Every state consumes some input, emits at most one token and names
//! the state to run next. Scanning starts in [`WHITESPACE`], which is
//! also where every other state returns to.

use crate::classify::{
    is_digit, is_end_of_line, is_holder, is_ident_char, is_operator, is_whitespace,
};
use crate::lexer::LexErrorKind;
use crate::scanner::{Scanner, State, Transition};
use crate::token::TokenKind;

/// Entry state: skips leading whitespace and dispatches on what follows.
pub const WHITESPACE: State = State::new("whitespace", lex_whitespace);
pub const SINGLE_LINE_COMMENT: State = State::new("single_line_comment", lex_single_line_comment);
pub const MULTI_LINE_COMMENT: State = State::new("multi_line_comment", lex_multi_line_comment);
pub const STRING: State = State::new("string", lex_string);
pub const IDENTIFIER: State = State::new("identifier", lex_identifier);
pub const NUMBER: State = State::new("number", lex_number);
pub const OPERATOR: State = State::new("operator", lex_operator);
pub const HOLDER: State = State::new("holder", lex_holder);
pub const UNKNOWN: State = State::new("unknown", lex_unknown);

const STRING_BODY: State = State::new("string_body", lex_string_body);
const CLOSING_QUOTE: State = State::new("closing_quote", lex_closing_quote);
const NAME_TRAIL: State = State::new("name_trail", lex_name_trail);
const NAME_PERIOD: State = State::new("name_period", lex_name_period);

pub const PERIOD: State = State::new("period", lex_period);
pub const COMMA: State = State::new("comma", lex_comma);
pub const SEMICOLON: State = State::new("semicolon", lex_semicolon);
pub const COLON: State = State::new("colon", lex_colon);
pub const LPAREN: State = State::new("left_paren", lex_lparen);
pub const RPAREN: State = State::new("right_paren", lex_rparen);
pub const LBRACKET: State = State::new("left_bracket", lex_lbracket);
pub const RBRACKET: State = State::new("right_bracket", lex_rbracket);
pub const LBRACE: State = State::new("left_brace", lex_lbrace);
pub const RBRACE: State = State::new("right_brace", lex_rbrace);

fn next(state: State) -> Transition {
    Ok(Some(state))
}

fn lex_whitespace(sc: &mut Scanner<'_>) -> Transition {
    if sc.accept_while(is_whitespace) > 0 {
        sc.emit(TokenKind::Whitespace);
        return next(WHITESPACE);
    }

    let Some(c) = sc.peek() else {
        sc.emit(TokenKind::EndOfInput);
        return Ok(None);
    };

    // Two-character literals take priority over one-character ones.
    let two = sc.peek_ahead(2);
    if two.chars().count() == 2 {
        if let Some(state) = sc.dispatch(&two) {
            return next(state);
        }
    }
    let mut one = [0; 4];
    if let Some(state) = sc.dispatch(c.encode_utf8(&mut one)) {
        return next(state);
    }

    if is_operator(c) {
        next(OPERATOR)
    } else if is_digit(c) {
        next(NUMBER)
    } else if is_ident_char(c) || c == '`' {
        next(IDENTIFIER)
    } else {
        next(UNKNOWN)
    }
}

fn lex_single_line_comment(sc: &mut Scanner<'_>) -> Transition {
    sc.accept_until(is_end_of_line);
    sc.emit(TokenKind::SingleLineComment);
    next(WHITESPACE)
}

fn lex_multi_line_comment(sc: &mut Scanner<'_>) -> Transition {
    sc.next();
    sc.next();
    loop {
        sc.accept_until(|c| c == '*');
        if sc.peek_ahead(2) == "*/" {
            sc.next();
            sc.next();
            sc.emit(TokenKind::MultiLineComment);
            return next(WHITESPACE);
        }
        if sc.peek().is_none() {
            return sc.fail(LexErrorKind::UnterminatedComment);
        }
        sc.next();
    }
}

/// Emits the opening quote and hands the body to [`STRING_BODY`].
fn lex_string(sc: &mut Scanner<'_>) -> Transition {
    let Some(quote) = sc.next() else {
        sc.backup();
        return next(WHITESPACE);
    };
    sc.set_quote(Some(quote));
    sc.emit(TokenKind::Quote);
    next(STRING_BODY)
}

/// A doubled quote stands for itself; a backslash takes the next
/// character literally. Running out of input before the closing quote is
/// not fatal: the partial body comes out as [`TokenKind::Unknown`].
fn lex_string_body(sc: &mut Scanner<'_>) -> Transition {
    let Some(quote) = sc.quote() else {
        return next(WHITESPACE);
    };

    loop {
        match sc.next() {
            None => {
                sc.backup();
                sc.set_quote(None);
                sc.emit(TokenKind::Unknown);
                return next(WHITESPACE);
            }
            Some('\\') => {
                if sc.peek().is_none() {
                    return sc.fail(LexErrorKind::UnterminatedEscape);
                }
                sc.next();
            }
            Some(c) if c == quote => {
                if sc.peek() == Some(quote) {
                    sc.next();
                } else {
                    sc.backup();
                    sc.emit(TokenKind::String);
                    return next(CLOSING_QUOTE);
                }
            }
            Some(_) => {}
        }
    }
}

fn lex_closing_quote(sc: &mut Scanner<'_>) -> Transition {
    sc.set_quote(None);
    single(sc, TokenKind::Quote)
}

/// Scans one part of a possibly qualified name such as `db.t.col` or
/// `` `my db`.t ``. Trailing whitespace and the joining period are left
/// to [`NAME_TRAIL`] and [`NAME_PERIOD`], which come back here for the
/// next part.
fn lex_identifier(sc: &mut Scanner<'_>) -> Transition {
    match sc.next() {
        Some('`') => loop {
            match sc.next() {
                None => return sc.fail(LexErrorKind::UnterminatedIdentifier),
                Some('`') if sc.peek() == Some('`') => {
                    sc.next();
                }
                Some('`') => break,
                Some(_) => {}
            }
        },
        Some(c) if is_ident_char(c) => {
            sc.accept_while(is_ident_char);
        }
        _ => {
            // Not a name after the period; leave it to the entry state.
            sc.backup();
            return next(WHITESPACE);
        }
    }
    sc.emit(TokenKind::Ident);
    next(NAME_TRAIL)
}

fn lex_name_trail(sc: &mut Scanner<'_>) -> Transition {
    if sc.accept_while(is_whitespace) > 0 {
        sc.emit(TokenKind::Whitespace);
        return next(NAME_PERIOD);
    }
    lex_name_period(sc)
}

fn lex_name_period(sc: &mut Scanner<'_>) -> Transition {
    if sc.peek() != Some('.') {
        return next(WHITESPACE);
    }
    sc.next();
    sc.emit(TokenKind::Period);
    next(IDENTIFIER)
}

/// Scans `12`, `1.5` or `1e-3`. A digit run followed by an identifier
/// character is really the start of a name, so the cursor goes back over
/// the digits and the identifier state takes over.
fn lex_number(sc: &mut Scanner<'_>) -> Transition {
    let digits = sc.accept_while(is_digit);
    if sc.accept(".") {
        sc.accept_while(is_digit);
        sc.emit(TokenKind::Float);
    } else if sc.accept("eE") {
        sc.accept("+-");
        sc.accept_while(is_digit);
        sc.emit(TokenKind::Imaginary);
    } else if sc.peek().is_some_and(is_ident_char) {
        sc.backup_by(digits);
        return next(IDENTIFIER);
    } else {
        sc.emit(TokenKind::Number);
    }
    next(WHITESPACE)
}

fn lex_operator(sc: &mut Scanner<'_>) -> Transition {
    sc.accept_while(is_operator);
    sc.emit(TokenKind::Operator);
    next(WHITESPACE)
}

fn lex_holder(sc: &mut Scanner<'_>) -> Transition {
    sc.accept_while(is_holder);
    sc.emit(TokenKind::Holder);
    next(WHITESPACE)
}

fn lex_unknown(sc: &mut Scanner<'_>) -> Transition {
    sc.next();
    sc.emit(TokenKind::Unknown);
    next(WHITESPACE)
}

fn single(sc: &mut Scanner<'_>, kind: TokenKind) -> Transition {
    sc.next();
    sc.emit(kind);
    next(WHITESPACE)
}

fn lex_period(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::Period)
}

fn lex_comma(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::Comma)
}

fn lex_semicolon(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::Semicolon)
}

fn lex_colon(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::Colon)
}

fn lex_lparen(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::LParen)
}

fn lex_rparen(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::RParen)
}

fn lex_lbracket(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::LBracket)
}

fn lex_rbracket(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::RBracket)
}

fn lex_lbrace(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::LBrace)
}

fn lex_rbrace(sc: &mut Scanner<'_>) -> Transition {
    single(sc, TokenKind::RBrace)
}
