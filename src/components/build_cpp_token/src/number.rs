use text::Cursor;

// Numeric literals are scanned, not validated: overflow and malformed
// suffixes are a later layer's concern.
pub(crate) fn read_numeric_literal(cursor: &mut Cursor) {
    if cursor.peek() == Some(b'0') {
        cursor.advance();
        if cursor.peek() == Some(b'x') {
            cursor.advance();
            while cursor.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                cursor.advance();
            }
            read_suffix(cursor);
            return;
        }
    }

    read_decimal(cursor);
    read_suffix(cursor);
}

fn read_decimal(cursor: &mut Cursor) {
    while cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
        cursor.advance();
    }

    if cursor.peek() == Some(b'.') {
        cursor.advance();
        while cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            cursor.advance();
        }
    }

    if let Some(b'e' | b'E') = cursor.peek() {
        let digits_at = match cursor.peek_at(1) {
            Some(b'+' | b'-') => 2,
            _ => 1,
        };
        if cursor.peek_at(digits_at).is_some_and(|c| c.is_ascii_digit()) {
            cursor.advance_by(digits_at);
            while cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
                cursor.advance();
            }
        }
    }
}

fn read_suffix(cursor: &mut Cursor) {
    if cursor.peek() == Some(b'f') {
        cursor.advance();
        return;
    }

    if cursor.peek() == Some(b'U') {
        cursor.advance();
    }
    if cursor.peek() == Some(b'L') {
        cursor.advance();
        if cursor.peek() == Some(b'L') {
            cursor.advance();
        }
    }
}
