use crate::Parser;
use cpp_ast::{
    Decltype, Destructor, Identifier, OperatorFunc, Prefix, PrefixSegment, QualifiedId,
    QualifiedName, TemplateArg, TemplateArgValue, TemplateId,
};
use cpp_token::TokenKind;

#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum ParseQualifiedMode {
    AllowIncomplete,
    RequireComplete,
    RequireCompleteOrEmpty,
}

impl Parser {
    // Consumes as much as it can; unrecognized tokens are returned to the
    // caller without logging an error.
    fn parse_nested_name_specifier(&mut self) -> Vec<Prefix> {
        let mut prefix: Vec<Prefix> = Vec::new();

        loop {
            let token = self.peek();
            if !token.kind.is_identifier() {
                break;
            }
            if matches!(
                token.text.as_str(),
                "operator" | "const" | "volatile" | "inline" | "static" | "friend"
            ) {
                break;
            }

            self.advance();
            let segment;
            if token.text == "decltype" {
                let mut decltype = Decltype {
                    keyword: token,
                    open_paren: None,
                    close_paren: None,
                };
                let punc_token = self.peek();
                if punc_token.kind.is_open_paren() {
                    self.advance();
                    decltype.close_paren = self.skip_any_scope(&punc_token);
                    decltype.open_paren = Some(punc_token);
                } else {
                    self.error(
                        punc_token.input_offset,
                        &format!("expected '(' before '{}'", punc_token.to_str()),
                    );
                }
                segment = PrefixSegment::Decltype(decltype);
            } else {
                let punc_token = self.peek();
                if punc_token.kind.is_open_angle() {
                    let mut template_id = TemplateId {
                        name: token,
                        open_angle: None,
                        args: Vec::new(),
                        close_angle: None,
                    };
                    self.advance();
                    // A < here is only the start of a template-argument list
                    // if the preceding name refers to a template. Without
                    // type knowledge in this pass, we assume it always does.
                    template_id.open_angle = Some(punc_token);
                    let aborted = self.parse_template_argument_list(&mut template_id);
                    segment = PrefixSegment::TemplateId(template_id);

                    // A token canceled the argument list on behalf of an
                    // outer scope: stop here and let the caller unwind.
                    if aborted {
                        prefix.push(Prefix {
                            segment,
                            double_colon: None,
                        });
                        break;
                    }
                } else {
                    segment = PrefixSegment::Identifier(Identifier { name: token });
                }
            }

            prefix.push(Prefix {
                segment,
                double_colon: None,
            });

            let sep_token = self.peek();
            if !sep_token.kind.is_double_colon() {
                break;
            }
            self.advance();
            prefix.last_mut().unwrap().double_colon = Some(sep_token);
        }

        prefix
    }

    // Returns true when a token canceled the list for an outer scope.
    fn parse_template_argument_list(&mut self, template_id: &mut TemplateId) -> bool {
        debug_assert!(self.pass_number <= 1);

        // Inside the angle brackets, >> must lex as two separate > tokens so
        // nested argument lists can each match one.
        self.with_scope_flags(TokenKind::OpenAngle, |parser| {
            loop {
                let mut template_arg = TemplateArg::default();

                // Try a type ID; constant expressions are not attempted.
                let restore_point = parser.open_restore_point();
                let type_id = parser.parse_type_id();
                if !parser.error_occurred(&restore_point) {
                    parser.commit(restore_point);
                    template_arg.value = TemplateArgValue::Type(type_id);
                } else {
                    parser.backtrack(restore_point);
                }

                template_id.args.push(template_arg);
                loop {
                    let sep_token = parser.next();
                    if sep_token.kind.is_close_angle() {
                        template_id.close_angle = Some(sep_token);
                        parser.mute_errors = false;
                        return false;
                    } else if sep_token.kind.is_comma() {
                        template_id.args.last_mut().unwrap().comma = Some(sep_token);
                        parser.mute_errors = false;
                        break;
                    } else if !parser.handle_unexpected_token(&sep_token) {
                        return true;
                    }
                }
            }
        })
    }

    // Consumes as much as it can; unrecognized tokens are returned to the
    // caller without logging an error.
    pub(crate) fn parse_qualified_id(&mut self, mode: ParseQualifiedMode) -> QualifiedId {
        let mut prefix = self.parse_nested_name_specifier();
        let mut qid = QualifiedId::default();

        // A trailing component without :: is the unqualified name itself.
        if prefix
            .last()
            .is_some_and(|prefix| prefix.double_colon.is_none())
        {
            let tail = prefix.pop().unwrap();
            qid.name = match tail.segment {
                PrefixSegment::Identifier(identifier) => QualifiedName::Identifier(identifier),
                PrefixSegment::TemplateId(template_id) => QualifiedName::TemplateId(template_id),
                PrefixSegment::Decltype(decltype) => QualifiedName::Decltype(decltype),
            };
        }
        qid.prefix = prefix;

        if qid.name.is_none() {
            let token = self.peek();
            if token.kind.is_tilde() {
                self.advance();
                let token2 = self.peek();
                if !token2.kind.is_identifier() {
                    self.error(
                        token2.input_offset,
                        &format!("expected destructor name before '{}'", token2.to_str()),
                    );
                } else {
                    self.advance();
                    qid.name = QualifiedName::Destructor(Destructor {
                        tilde: token,
                        name: token2,
                    });
                }
            } else if token.kind.is_identifier() && token.text == "operator" {
                self.advance();
                qid.name = QualifiedName::OperatorFunc(self.parse_operator_name(token));
            }
        }

        let incomplete = match mode {
            ParseQualifiedMode::AllowIncomplete => false,
            ParseQualifiedMode::RequireComplete => qid.name.is_none(),
            ParseQualifiedMode::RequireCompleteOrEmpty => {
                qid.name.is_none() && !qid.prefix.is_empty()
            }
        };
        if incomplete {
            let token = self.peek();
            self.error(
                token.input_offset,
                &format!("expected qualified-id before '{}'", token.to_str()),
            );
        }

        qid
    }

    fn parse_operator_name(&mut self, keyword: cpp_token::Token) -> OperatorFunc {
        let mut op_func = OperatorFunc {
            keyword,
            punc: None,
            punc2: None,
        };

        let op_token = self.next();
        match op_token.kind {
            TokenKind::LeftShift
            | TokenKind::RightShift
            | TokenKind::SinglePlus
            | TokenKind::DoublePlus
            | TokenKind::SingleMinus
            | TokenKind::DoubleMinus
            | TokenKind::Star
            | TokenKind::Arrow
            | TokenKind::ForwardSlash
            | TokenKind::SingleEqual
            | TokenKind::DoubleEqual
            | TokenKind::NotEqual
            | TokenKind::PlusEqual
            | TokenKind::MinusEqual
            | TokenKind::StarEqual
            | TokenKind::SlashEqual
            | TokenKind::OpenAngle
            | TokenKind::CloseAngle
            | TokenKind::LessThanOrEqual
            | TokenKind::GreaterThanOrEqual
            | TokenKind::OpenParen
            | TokenKind::OpenSquare => {
                let expected_close = match op_token.kind {
                    TokenKind::OpenParen => Some((TokenKind::CloseParen, ')')),
                    TokenKind::OpenSquare => Some((TokenKind::CloseSquare, ']')),
                    _ => None,
                };
                op_func.punc = Some(op_token);

                if let Some((close_kind, close_char)) = expected_close {
                    let op_token2 = self.next();
                    if op_token2.kind == close_kind {
                        op_func.punc2 = Some(op_token2);
                    } else {
                        self.error(
                            op_token2.input_offset,
                            &format!("expected '{}' before '{}'", close_char, op_token2.to_str()),
                        );
                        self.push_back();
                    }
                }
            }
            _ => {
                self.error(
                    op_token.input_offset,
                    &format!("expected operator token before '{}'", op_token.to_str()),
                );
                self.push_back();
            }
        }

        op_func
    }
}
