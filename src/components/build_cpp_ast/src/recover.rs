use crate::Parser;
use crate::error::Severity;
use cpp_token::{Token, TokenKind};

bitflags::bitflags! {
    /// Closing punctuation an enclosing scope is prepared to consume.
    /// Before swallowing an unexpected token, recovery checks this mask; a
    /// match aborts the current scope without consuming the token, so one
    /// mismatched bracket never causes runaway consumption.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub(crate) struct Accept: u32 {
        const OPEN_CURLY = 0x1;
        const CLOSE_CURLY = 0x2;
        const CLOSE_PAREN = 0x4;
        const CLOSE_SQUARE = 0x8;
        const CLOSE_ANGLE = 0x10;
        const COMMA = 0x20;
        const SEMICOLON = 0x40;
    }
}

impl Parser {
    /// Runs `body` with the accept flags and right-shift tokenization
    /// configured for the scope opened by `open_kind`, restoring both on
    /// the way out.
    pub(crate) fn with_scope_flags<R>(
        &mut self,
        open_kind: TokenKind,
        body: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved_flags = self.outer_accept_flags;
        let saved_right_shift = self.tkr.config.tokenize_right_shift;

        match open_kind {
            TokenKind::OpenCurly => {
                self.outer_accept_flags = Accept::CLOSE_CURLY;
                self.tkr.config.tokenize_right_shift = true;
            }
            TokenKind::OpenParen => {
                self.outer_accept_flags =
                    (self.outer_accept_flags | Accept::CLOSE_PAREN) & !Accept::CLOSE_ANGLE;
                self.tkr.config.tokenize_right_shift = true;
            }
            TokenKind::OpenAngle => {
                self.outer_accept_flags |= Accept::CLOSE_ANGLE;
                self.tkr.config.tokenize_right_shift = false;
            }
            TokenKind::OpenSquare => {
                self.outer_accept_flags =
                    (self.outer_accept_flags | Accept::CLOSE_SQUARE) & !Accept::CLOSE_ANGLE;
                self.tkr.config.tokenize_right_shift = true;
            }
            _ => unreachable!("not an opening bracket"),
        }

        let result = body(self);

        self.outer_accept_flags = saved_flags;
        self.tkr.config.tokenize_right_shift = saved_right_shift;
        result
    }

    /// False when the token closes a scope an enclosing caller is waiting
    /// on; the token is pushed back so that caller can read it.
    pub(crate) fn ok_to_stay_in_scope(&mut self, token: &Token) -> bool {
        let flag = match token.kind {
            TokenKind::OpenCurly => Accept::OPEN_CURLY,
            TokenKind::CloseCurly => Accept::CLOSE_CURLY,
            TokenKind::CloseParen => Accept::CLOSE_PAREN,
            TokenKind::CloseAngle => Accept::CLOSE_ANGLE,
            TokenKind::CloseSquare => Accept::CLOSE_SQUARE,
            TokenKind::Eof => return false,
            _ => return true,
        };

        if self.outer_accept_flags.contains(flag) {
            self.push_back();
            return false;
        }
        true
    }

    /// Consumes tokens until the scope opened by `open_token` closes,
    /// recursing into nested scopes. Returns the closing token, or None when
    /// an unexpected token is left for an outer scope to handle.
    pub(crate) fn skip_any_scope(&mut self, open_token: &Token) -> Option<Token> {
        let close_kind = open_token
            .kind
            .closing()
            .expect("scope skipping requires an opening bracket");

        self.with_scope_flags(open_token.kind, |parser| {
            loop {
                let token = parser.next();
                if token.kind == close_kind {
                    return Some(token);
                }

                if !parser.ok_to_stay_in_scope(&token) {
                    parser.error_no_mute(
                        Severity::Error,
                        token.input_offset,
                        &format!("expected '{}'", close_kind.punctuation_str()),
                    );
                    parser.error_no_mute(
                        Severity::Note,
                        open_token.input_offset,
                        &format!("to match this '{}'", open_token.to_str()),
                    );
                    parser.mute_errors = true;
                    return None;
                }

                match token.kind {
                    TokenKind::OpenAngle => {
                        // Only nest on < when immediately inside a
                        // template-argument scope; anywhere else it may just
                        // be a less-than operator.
                        if !parser.tkr.config.tokenize_right_shift {
                            parser.skip_any_scope(&token);
                        }
                    }
                    TokenKind::OpenCurly | TokenKind::OpenParen | TokenKind::OpenSquare => {
                        parser.skip_any_scope(&token);
                    }
                    _ => (),
                }
            }
        })
    }

    /// Deals with a token the current production has no rule for. The token
    /// must already be consumed. Returns false when the token closes an
    /// outer scope (it is pushed back for that scope to read); otherwise the
    /// token is swallowed, skipping its entire sub-scope if it opens one.
    pub(crate) fn handle_unexpected_token(&mut self, token: &Token) -> bool {
        if !self.ok_to_stay_in_scope(token) {
            return false;
        }

        match token.kind {
            TokenKind::OpenAngle => {
                if !self.tkr.config.tokenize_right_shift {
                    // An inner scope canceled by an outer closer pushes that
                    // closer back; the caller reads it next either way.
                    self.skip_any_scope(token);
                }
                true
            }
            TokenKind::OpenCurly | TokenKind::OpenParen | TokenKind::OpenSquare => {
                self.skip_any_scope(token);
                true
            }
            _ => true,
        }
    }

    /// Expects the closer matching `open_token` at the current position,
    /// recovering by skipping the scope when it is missing. Returns None
    /// when an outer scope is expected to consume the closer, in which case
    /// the caller should unwind.
    pub(crate) fn close_scope(&mut self, open_token: &Token) -> Option<Token> {
        let close_token = self.peek();
        if Some(close_token.kind) == open_token.kind.closing() {
            self.advance();
            return Some(close_token);
        }

        self.error(
            close_token.input_offset,
            &format!(
                "expected '{}' before '{}'",
                if open_token.kind == TokenKind::OpenSquare { ']' } else { ')' },
                close_token.to_str()
            ),
        );

        match self.skip_any_scope(open_token) {
            Some(close_token) => {
                self.mute_errors = false;
                Some(close_token)
            }
            None => {
                // The closer belongs to an outer scope.
                debug_assert!(self.mute_errors);
                None
            }
        }
    }
}
