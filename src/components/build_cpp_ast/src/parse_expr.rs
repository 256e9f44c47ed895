use crate::Parser;
use cpp_token::{Token, TokenKind};

impl Parser {
    fn consume_specifier(&mut self) {
        loop {
            let mut token = self.peek();
            if token.kind.is_open_angle() {
                // Assume < begins a template-argument list here; inside it,
                // >> must close two nested scopes.
                self.advance();
                let saved_right_shift = self.tkr.config.tokenize_right_shift;
                self.tkr.config.tokenize_right_shift = false;
                self.skip_any_scope(&token);
                self.tkr.config.tokenize_right_shift = saved_right_shift;
                token = self.peek();
            }

            if !token.kind.is_double_colon() {
                return;
            }
            self.advance();
            let spec_token = self.peek();
            if spec_token.kind.is_identifier() {
                self.advance();
            } else {
                self.error(
                    spec_token.input_offset,
                    &format!("expected identifier before '{}'", spec_token.to_str()),
                );
                return;
            }
        }
    }

    fn parse_capture_list(&mut self) {
        // Only an empty capture list is accepted.
        let token = self.next();
        if !token.kind.is_close_square() {
            self.error(
                token.input_offset,
                &format!("expected ']' before '{}'", token.to_str()),
            );
        }
    }

    // Parses a comma-separated list of expressions up to `close_kind`,
    // starting just inside the brackets. Returns the closing token.
    fn parse_expression_list(&mut self, open_token: &Token) -> Option<Token> {
        let close_kind = open_token.kind.closing().expect("list needs brackets");
        let close_char = close_kind.punctuation_str();

        self.with_scope_flags(open_token.kind, |parser| {
            loop {
                let token = parser.peek();
                if token.kind == close_kind {
                    parser.advance();
                    return Some(token);
                }
                parser.parse_expression(false);
                let sep = parser.next();
                if sep.kind == close_kind {
                    return Some(sep);
                } else if !sep.kind.is_comma() {
                    parser.error(
                        sep.input_offset,
                        &format!("expected ',' or '{}' before '{}'", close_char, sep.to_str()),
                    );
                    if !parser.handle_unexpected_token(&sep) {
                        return None;
                    }
                }
            }
        })
    }

    /// Skims one expression, validating bracket structure and recovering on
    /// unexpected tokens, returning the last token consumed. Expression
    /// structure beyond bracket nesting is not modeled: this handles the
    /// initializer shapes that occur in declarations, not the full
    /// expression grammar.
    pub(crate) fn parse_expression(&mut self, optional: bool) -> Option<Token> {
        let start_token = self.next();
        let mut end_token = None;

        match start_token.kind {
            TokenKind::Identifier => {
                self.consume_specifier();
                let token2 = self.peek();
                if token2.kind.is_open_paren() {
                    // Function arguments.
                    self.advance();
                    end_token = self.parse_expression_list(&token2);
                } else if token2.kind.is_open_curly() {
                    // Braced initializer list.
                    self.advance();
                    end_token = self.parse_expression_list(&token2);
                } else {
                    // Can't consume any more of the expression.
                    end_token = Some(start_token.clone());
                }
            }

            TokenKind::NumericLiteral => {
                end_token = Some(start_token.clone());
            }

            TokenKind::StringLiteral => {
                // Adjacent string literals concatenate.
                end_token = Some(start_token.clone());
                while self.peek().kind.is_string_literal() {
                    end_token = Some(self.next());
                }
            }

            TokenKind::OpenParen => {
                end_token = self.with_scope_flags(TokenKind::OpenParen, |parser| {
                    parser.parse_expression(false);
                    let token2 = parser.peek();
                    if token2.kind.is_close_paren() {
                        // Treat as a C-style cast and keep going. Whether the
                        // inner expression names a type is unknowable here.
                        parser.advance();
                        parser.parse_expression(true)
                    } else {
                        parser.close_scope(&start_token)
                    }
                });
            }

            TokenKind::OpenCurly => {
                end_token = self.parse_expression_list(&start_token);
            }

            TokenKind::Bang | TokenKind::SingleAmpersand | TokenKind::SingleMinus => {
                end_token = self.parse_expression(false);
            }

            TokenKind::OpenSquare => {
                // Lambda expression.
                self.parse_capture_list();
                let open_paren = self.peek();
                if open_paren.kind.is_open_paren() {
                    self.advance();
                    let mut unused_params = Vec::new();
                    self.parse_parameter_declaration_list(&mut unused_params, false);
                    if self.peek().kind.is_close_paren() {
                        self.advance();
                    }
                } else {
                    self.error(
                        open_paren.input_offset,
                        &format!("expected '(' before '{}'", open_paren.to_str()),
                    );
                }

                let mut token2 = self.peek();
                if token2.kind.is_arrow() {
                    self.advance();
                    self.parse_type_id();
                    token2 = self.peek();
                }
                if token2.kind.is_open_curly() {
                    self.advance();
                    end_token = self.skip_any_scope(&token2);
                } else {
                    self.error(
                        token2.input_offset,
                        &format!("expected '{{' before '{}'", token2.to_str()),
                    );
                }
            }

            _ => {
                if optional {
                    self.push_back();
                } else {
                    self.error(
                        start_token.input_offset,
                        &format!("expected expression before '{}'", start_token.to_str()),
                    );
                    self.push_back();
                }
                return None;
            }
        }

        // Binary and ternary continuations.
        let token = self.peek();
        match token.kind {
            TokenKind::CloseAngle => {
                // Inside a template-argument scope, > closes the scope
                // instead of comparing.
                if self.tkr.config.tokenize_right_shift {
                    self.advance();
                    end_token = self.parse_expression(false);
                }
            }

            TokenKind::SingleVerticalBar
            | TokenKind::DoubleEqual
            | TokenKind::NotEqual
            | TokenKind::OpenAngle
            | TokenKind::LessThanOrEqual
            | TokenKind::GreaterThanOrEqual
            | TokenKind::LeftShift
            | TokenKind::RightShift
            | TokenKind::SinglePlus
            | TokenKind::SingleMinus
            | TokenKind::Percent
            | TokenKind::Arrow
            | TokenKind::Star
            | TokenKind::Dot
            | TokenKind::ForwardSlash => {
                self.advance();
                end_token = self.parse_expression(false);
            }

            TokenKind::QuestionMark => {
                self.advance();
                self.parse_expression(false);
                let colon = self.peek();
                if !colon.kind.is_single_colon() {
                    // The colon is needed to match the '?' seen earlier.
                    self.error(
                        colon.input_offset,
                        &format!("expected ':' before '{}'", colon.to_str()),
                    );
                } else {
                    self.advance();
                    end_token = self.parse_expression(false);
                }
            }

            _ => (),
        }

        end_token.or(Some(start_token))
    }
}
