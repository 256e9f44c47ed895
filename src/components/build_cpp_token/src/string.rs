use crate::Tokenizer;
use text::Cursor;

impl Tokenizer {
    pub(crate) fn read_string_literal(&mut self, cursor: &mut Cursor, token_start: usize, quote: u8) {
        loop {
            let c = match cursor.peek() {
                Some(c) => c,
                None => {
                    self.error(token_start, token_start, "unexpected end-of-file in string literal");
                    break;
                }
            };
            cursor.advance();
            if c == b'\\' {
                if cursor.at_end() {
                    self.error(token_start, token_start, "unexpected end-of-file in string literal");
                    break;
                }
                cursor.advance();
            } else if c == b'\n' {
                self.error(token_start, token_start, "unexpected end-of-line in string literal");
                break;
            } else if c == quote {
                break;
            }
        }
    }

    // Called with the cursor on the `"` that follows the `R` prefix.
    pub(crate) fn read_raw_string_literal(&mut self, cursor: &mut Cursor, token_start: usize) -> bool {
        cursor.advance();

        let delimiter_start = cursor.pos();
        loop {
            let c = match cursor.peek() {
                Some(c) => c,
                None => {
                    self.error(
                        token_start,
                        token_start,
                        "unexpected end-of-file in raw string delimiter",
                    );
                    return false;
                }
            };
            if c == b'(' {
                break;
            }
            if c.is_ascii_whitespace() || c == b')' || c == b'\\' {
                self.error(
                    token_start,
                    cursor.pos(),
                    "invalid character in raw string delimiter",
                );
                return false;
            }
            cursor.advance();
        }

        let delimiter_end = cursor.pos();
        cursor.advance();

        // Read until `)<delimiter>"`.
        loop {
            let c = match cursor.peek() {
                Some(c) => c,
                None => {
                    self.error(token_start, token_start, "unexpected end-of-file in string literal");
                    return false;
                }
            };
            cursor.advance();
            if c != b')' {
                continue;
            }

            let mut matched = true;
            for i in 0..(delimiter_end - delimiter_start) {
                let expected = cursor.slice(delimiter_start + i, delimiter_start + i + 1)[0];
                match cursor.peek() {
                    Some(c) if c == expected => cursor.advance(),
                    Some(_) => {
                        matched = false;
                        break;
                    }
                    None => {
                        self.error(
                            token_start,
                            token_start,
                            "unexpected end-of-file in string literal",
                        );
                        return false;
                    }
                }
            }
            if !matched {
                continue;
            }

            match cursor.peek() {
                Some(b'"') => {
                    cursor.advance();
                    return true;
                }
                Some(_) => continue,
                None => {
                    self.error(token_start, token_start, "unexpected end-of-file in string literal");
                    return false;
                }
            }
        }
    }
}
