use std::fmt::Display;

const TAB_STOP: u32 = 4;
const CHECKPOINT_INTERVAL: u32 = 256;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    pub fn shift_column(&self, amount: u32) -> Self {
        Self {
            line: self.line,
            column: self.column + amount,
        }
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else if c == '\t' {
            self.column += TAB_STOP - (self.column % TAB_STOP);
        } else if c as u32 >= 32 {
            self.column += 1;
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Copy, Clone, Debug)]
struct Checkpoint {
    // Byte offset of the first code point boundary at or after the 256-byte
    // mark this checkpoint belongs to.
    offset: u32,
    location: Location,
}

/// Maps byte offsets within one piece of source text to line/column pairs.
///
/// A checkpoint is sampled every 256 bytes, so resolving any offset re-scans
/// at most ~256 bytes regardless of how large the text is.
#[derive(Clone, Debug, Default)]
pub struct LocationIndex {
    checkpoints: Vec<Checkpoint>,
}

impl LocationIndex {
    pub fn build(text: &str) -> Self {
        let mut checkpoints = Vec::with_capacity(text.len() / CHECKPOINT_INTERVAL as usize + 1);
        let mut location = Location::start();
        let mut next_mark = 0u32;

        for (offset, c) in text.char_indices() {
            let offset = offset as u32;
            if offset >= next_mark {
                checkpoints.push(Checkpoint { offset, location });
                next_mark = (offset / CHECKPOINT_INTERVAL + 1) * CHECKPOINT_INTERVAL;
            }
            location.advance(c);
        }

        // Make sure the final mark is covered so that resolving the exact
        // end-of-text offset lands on a checkpoint at or before it.
        if text.len() as u32 >= next_mark {
            checkpoints.push(Checkpoint {
                offset: text.len() as u32,
                location,
            });
        }

        Self { checkpoints }
    }

    /// Resolves a byte offset in `text` to its 1-based line/column.
    ///
    /// `offset` may equal `text.len()`, which resolves to the location just
    /// past the last character. An offset inside a multi-byte code point
    /// resolves to that code point's location.
    pub fn resolve(&self, offset: u32, text: &str) -> Location {
        assert!(offset as usize <= text.len());

        let index = ((offset / CHECKPOINT_INTERVAL) as usize).min(self.checkpoints.len() - 1);
        let checkpoint = self.checkpoints[index];

        // The checkpoint may sit past the requested offset when the offset
        // falls inside the code point spanning the 256-byte mark.
        if checkpoint.offset >= offset {
            let earlier = index
                .checked_sub(1)
                .map(|i| self.checkpoints[i])
                .unwrap_or(Checkpoint {
                    offset: 0,
                    location: Location::start(),
                });
            return Self::scan(earlier, offset, text);
        }

        Self::scan(checkpoint, offset, text)
    }

    fn scan(checkpoint: Checkpoint, offset: u32, text: &str) -> Location {
        let mut location = checkpoint.location;
        for (pos, c) in text[checkpoint.offset as usize..].char_indices() {
            if checkpoint.offset + pos as u32 >= offset {
                break;
            }
            if checkpoint.offset + pos as u32 + c.len_utf8() as u32 > offset {
                // Offset lands mid-code-point.
                break;
            }
            location.advance(c);
        }
        location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(text: &str, offset: u32) -> Location {
        let mut location = Location::start();
        for (pos, c) in text.char_indices() {
            if pos as u32 + c.len_utf8() as u32 > offset {
                break;
            }
            location.advance(c);
        }
        location
    }

    #[test]
    fn agrees_with_naive_scan() {
        let mut text = String::new();
        for i in 0..100 {
            text.push_str("word another\tthird\n");
            if i % 7 == 0 {
                text.push_str("日本語のテキスト\n");
            }
        }

        let index = LocationIndex::build(&text);
        for offset in 0..=text.len() as u32 {
            assert_eq!(
                index.resolve(offset, &text),
                naive(&text, offset),
                "offset {offset}"
            );
        }
    }

    #[test]
    fn end_of_text_resolves() {
        let text = "abc\ndef";
        let index = LocationIndex::build(text);
        assert_eq!(
            index.resolve(text.len() as u32, text),
            Location { line: 2, column: 4 }
        );
    }

    #[test]
    fn empty_text() {
        let index = LocationIndex::build("");
        assert_eq!(index.resolve(0, ""), Location::start());
    }

    #[test]
    fn tabs_advance_to_tab_stop() {
        let text = "\ta";
        let index = LocationIndex::build(text);
        assert_eq!(index.resolve(1, text), Location { line: 1, column: 4 });
        assert_eq!(index.resolve(2, text), Location { line: 1, column: 5 });
    }

    #[test]
    fn control_codes_do_not_advance() {
        let text = "a\u{01}b";
        let index = LocationIndex::build(text);
        assert_eq!(index.resolve(2, text), Location { line: 1, column: 2 });
        assert_eq!(index.resolve(3, text), Location { line: 1, column: 3 });
    }
}
