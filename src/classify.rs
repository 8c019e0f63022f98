//! Character classes used by the state machine.

/// Space, tab, carriage return or newline.
#[must_use]
pub const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Carriage return or newline. End of input also ends a line; the
/// scanner's `accept_until` stops there on its own.
#[must_use]
pub const fn is_end_of_line(c: char) -> bool {
    matches!(c, '\r' | '\n')
}

#[must_use]
pub const fn is_operator(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '=' | '>' | '<' | '~' | '|' | '^' | '&' | '%' | '!'
    )
}

/// Characters making up a parameter placeholder such as `?` or `%s`.
#[must_use]
pub const fn is_holder(c: char) -> bool {
    matches!(c, '?' | '%' | 's')
}

#[must_use]
pub const fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Underscore, letter or digit, in any script.
#[must_use]
pub fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_classes() {
        for c in [' ', '\t', '\r', '\n'] {
            assert!(is_whitespace(c), "{c:?}");
        }
        assert!(is_end_of_line('\n'));
        assert!(is_end_of_line('\r'));
        assert!(!is_end_of_line(' '));
        assert!(!is_whitespace('\u{a0}'));
    }

    #[test]
    fn operator_class() {
        for c in "+-*/=><~|^&%!".chars() {
            assert!(is_operator(c), "{c:?}");
        }
        for c in "?.,;:()`'\"".chars() {
            assert!(!is_operator(c), "{c:?}");
        }
    }

    #[test]
    fn holder_class() {
        assert!(is_holder('?'));
        assert!(is_holder('%'));
        assert!(is_holder('s'));
        assert!(!is_holder('d'));
    }

    #[test]
    fn ident_class() {
        assert!(is_ident_char('_'));
        assert!(is_ident_char('z'));
        assert!(is_ident_char('7'));
        assert!(is_ident_char('é'));
        assert!(is_ident_char('名'));
        assert!(!is_ident_char('-'));
        assert!(!is_ident_char('`'));
    }

    #[test]
    fn digit_class() {
        assert!(is_digit('0'));
        assert!(is_digit('9'));
        assert!(!is_digit('a'));
        assert!(!is_digit('٣'));
    }
}
