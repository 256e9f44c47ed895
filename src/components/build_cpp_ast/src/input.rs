use crate::Parser;
use cpp_token::{Token, TokenKind};
use preprocessor::Directive;
use text::Cursor;

/// A token as remembered by the buffer: classification plus its span in the
/// logical offset space. The text is recovered on demand from whichever file
/// or macro expansion produced it, so replaying after a backtrack never
/// re-invokes the tokenizer or the preprocessor.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CachedToken {
    pub kind: TokenKind,
    pub input_offset: u32,
    pub len: u32,
}

/// A saved parser position plus error count, enabling speculative parsing.
///
/// While any restore point is open, diagnostics are suppressed: errors are
/// still counted (so `error_occurred` can detect a failed speculation) but
/// not surfaced. Every restore point must be resolved with exactly one of
/// `commit` or `backtrack` before it goes out of scope; dropping one
/// unresolved leaves diagnostics suppressed, which is a usage error.
///
/// Restore points nest: the suppression depth is restored exactly when an
/// inner point is resolved.
#[must_use]
pub(crate) struct RestorePoint {
    token_index: usize,
    error_count: u32,
}

impl Parser {
    pub(crate) fn open_restore_point(&mut self) -> RestorePoint {
        self.restore_point_depth += 1;
        RestorePoint {
            token_index: self.token_index,
            error_count: self.raw_error_count,
        }
    }

    pub(crate) fn error_occurred(&self, restore_point: &RestorePoint) -> bool {
        self.raw_error_count != restore_point.error_count
    }

    pub(crate) fn commit(&mut self, restore_point: RestorePoint) {
        debug_assert!(!self.error_occurred(&restore_point));
        self.restore_point_depth -= 1;
    }

    pub(crate) fn backtrack(&mut self, restore_point: RestorePoint) {
        self.token_index = restore_point.token_index;
        self.raw_error_count = restore_point.error_count;
        self.restore_point_depth -= 1;
    }

    /// Returns the next meaningful token without consuming it.
    ///
    /// This is where preprocessing interleaves with tokenization: macro
    /// invocations and finished nested inputs are handled as tokens are
    /// pulled, never as a separate pass. Directives, comments and whitespace
    /// are buffered but skipped on delivery (whitespace is surfaced when the
    /// caller is only preprocessing).
    pub(crate) fn peek(&mut self) -> Token {
        loop {
            let token = if self.token_index < self.tokens.len() {
                let cached = self.tokens[self.token_index];
                let text = if cached.len == 0 {
                    String::new()
                } else {
                    self.pp.text_at(cached.input_offset, cached.len).to_string()
                };
                Token::new(cached.kind, cached.input_offset, text)
            } else {
                match self.pump_one_token() {
                    Some(token) => token,
                    None => continue,
                }
            };

            match token.kind {
                TokenKind::PreprocessorDirective
                | TokenKind::CStyleComment
                | TokenKind::LineComment => self.token_index += 1,
                TokenKind::Whitespace => {
                    if self.only_preprocessing {
                        return token;
                    }
                    self.token_index += 1;
                }
                _ => return token,
            }
        }
    }

    pub(crate) fn next(&mut self) -> Token {
        let token = self.peek();
        self.token_index += 1;
        token
    }

    pub(crate) fn advance(&mut self) {
        self.token_index += 1;
    }

    pub(crate) fn push_back(&mut self) {
        self.token_index -= 1;
    }

    // Reads one raw token from the top of the input stack and buffers it.
    // Returns None when the read was consumed internally (a macro invocation
    // or a finished nested input) and the loop should pull again.
    fn pump_one_token(&mut self) -> Option<Token> {
        let (source, pos) = self.pp.cursor_state();
        let (token, new_pos) = {
            let text = self.pp.source_text(source);
            let mut cursor = Cursor::new(text, pos);
            let token = self.tkr.read_token(&mut cursor);
            (token, cursor.pos())
        };
        self.pp.set_cursor_pos(new_pos);
        self.report_lexer_errors();

        if token.kind.is_identifier() {
            if let Some(macro_index) = self.pp.find_macro(&token.text) {
                // The invocation itself must not contribute to the logical
                // input stream: rewind the tokenizer's offset so the
                // expansion logically starts where the invocation began.
                // The invocation token is never buffered.
                self.tkr.input_offset = token.input_offset;
                self.pp.push_macro_expansion(macro_index, token.input_offset);
                return None;
            }
        } else if token.is_end_of_file() && self.pp.stack_depth() > 1 {
            // A nested include or macro ran out; only that physical source
            // ends, not the logical stream. Resume the parent.
            self.pp.pop_finished(token.input_offset);
            return None;
        }

        self.tokens.push(CachedToken {
            kind: token.kind,
            input_offset: token.input_offset,
            len: token.text.len() as u32,
        });

        if token.kind.is_preprocessor_directive() {
            // Handled only here, on first read; replays from the buffer skip
            // directives without re-processing them.
            self.handle_directive(&token);
            self.token_index += 1;
            return None;
        }

        Some(token)
    }

    fn handle_directive(&mut self, token: &Token) {
        let body = token.text.strip_prefix('#').unwrap_or(&token.text).trim();

        match Directive::parse(body) {
            Directive::Include { operand } => {
                // Not found in any search path: dropped with no diagnostic.
                let _ = self
                    .pp
                    .push_include(&self.include_paths, operand, token.end_offset());
            }
            Directive::Define { name, body } => {
                self.pp
                    .define_macro(name.to_string(), body.to_string(), Some(token.input_offset));
            }
            Directive::Other => (),
        }
    }

    fn report_lexer_errors(&mut self) {
        for error in self.tkr.take_errors() {
            // Tokenizer errors don't affect the raw error count and are not
            // muted; they flip the success flag directly.
            let (path, location) = self.pp.location_string(error.input_offset);
            self.diagnostics.push(diagnostics::format_diagnostic(
                &path,
                location,
                diagnostics::Severity::Error,
                &error.message,
            ));
            self.success = false;
        }
    }
}
