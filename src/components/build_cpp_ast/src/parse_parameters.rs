use crate::Parser;
use crate::parse_declarator::DeclaratorFlags;
use crate::parse_qualified_id::ParseQualifiedMode;
use cpp_ast::{
    AssignedValue, Assignment, DeclSpecifier, FunctionProduction, Initializer, Parameter,
    QualifiedName, TypeParameter, TypeSpecifier,
};
use cpp_token::TokenKind;

impl Parser {
    /// Parses `( parameter-declaration-list ) qualifiers...` starting at the
    /// open parenthesis. Returns None when the parenthesis is missing, which
    /// only happens while optimistically parsing a constructor.
    pub(crate) fn parse_parameter_list(&mut self) -> Option<FunctionProduction> {
        let open_paren = self.peek();
        if !open_paren.kind.is_open_paren() {
            debug_assert!(self.restore_point_depth > 0);
            self.error(
                open_paren.input_offset,
                &format!("expected '(' before '{}'", open_paren.to_str()),
            );
            return None;
        }
        self.mute_errors = false;
        self.advance();

        let mut function = FunctionProduction {
            open_paren,
            params: Vec::new(),
            close_paren: None,
            qualifiers: Vec::new(),
            arrow: None,
            trailing_return_type: None,
        };

        self.parse_parameter_declaration_list(&mut function.params, false);

        let close_paren = self.peek();
        if close_paren.kind.is_close_paren() {
            self.advance();
            function.close_paren = Some(close_paren);
            function.qualifiers = self.parse_function_qualifier_seq();
        }
        Some(function)
    }

    pub(crate) fn parse_parameter_declaration_list(
        &mut self,
        params: &mut Vec<Parameter>,
        for_template: bool,
    ) {
        let (open_kind, close_kind, close_char) = if for_template {
            (TokenKind::OpenAngle, TokenKind::CloseAngle, '>')
        } else {
            (TokenKind::OpenParen, TokenKind::CloseParen, ')')
        };

        self.mute_errors = false;

        if self.peek().kind == close_kind {
            return; // Empty parameter declaration list.
        }

        self.with_scope_flags(open_kind, |parser| {
            loop {
                // A parameter declaration is expected here.
                let any_tokens_consumed;
                let expected_loc = parser.peek();
                if expected_loc.kind.is_ellipsis() && !for_template {
                    parser.advance();
                    params.push(Parameter {
                        decl_specifiers: vec![DeclSpecifier::Ellipsis(expected_loc)],
                        ..Parameter::default()
                    });
                    any_tokens_consumed = true;
                } else {
                    let saved_token_index = parser.token_index;
                    let param = if for_template {
                        parser.parse_template_parameter()
                    } else {
                        parser.parse_function_parameter()
                    };
                    params.push(param);
                    any_tokens_consumed = saved_token_index != parser.token_index;
                }

                let token = parser.peek();
                if token.kind == close_kind {
                    break; // End of parameter declaration list.
                } else if token.kind.is_comma() {
                    parser.advance();
                    params.last_mut().unwrap().comma = Some(token);
                } else {
                    parser.error(
                        token.input_offset,
                        &format!(
                            "expected ',' or '{}' before '{}'",
                            close_char,
                            token.to_str()
                        ),
                    );
                    parser.advance();
                    if any_tokens_consumed {
                        if !parser.handle_unexpected_token(&token) {
                            break;
                        }
                    } else if !parser.ok_to_stay_in_scope(&token) {
                        break;
                    }
                }
            }
        });
    }

    fn parse_function_parameter(&mut self) -> Parameter {
        let mut result = Parameter::default();
        let mut got_type_specifier = false;

        loop {
            let token = self.peek();
            if !token.kind.is_identifier() {
                // We should have parsed a type specifier by now.
                if !got_type_specifier {
                    self.error(
                        token.input_offset,
                        &format!("expected parameter type before '{}'", token.to_str()),
                    );
                }
                break;
            }

            if matches!(token.text.as_str(), "const" | "volatile" | "unsigned") {
                self.mute_errors = false;
                self.advance();
                result.decl_specifiers.push(DeclSpecifier::Keyword(token));
            } else if matches!(
                token.text.as_str(),
                "typename" | "struct" | "class" | "union" | "enum"
            ) {
                if !got_type_specifier {
                    self.mute_errors = false;
                } else {
                    self.error(token.input_offset, "too many type specifiers");
                }
                self.advance();
                let qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
                result
                    .decl_specifiers
                    .push(DeclSpecifier::TypeSpecifier(TypeSpecifier {
                        elaborate_keyword: Some(token),
                        qid,
                        was_assumed: false,
                    }));
            } else {
                self.mute_errors = false;
                if got_type_specifier {
                    break; // This must be the declarator part.
                }
                got_type_specifier = true;

                // Without type knowledge we can't verify that this
                // qualified-id names a type; we assume it does and record
                // the guess.
                let qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
                result
                    .decl_specifiers
                    .push(DeclSpecifier::TypeSpecifier(TypeSpecifier {
                        elaborate_keyword: None,
                        qid,
                        was_assumed: true,
                    }));
            }
        }

        let declarator = self.parse_declarator(
            None,
            DeclaratorFlags::ALLOW_NAMED | DeclaratorFlags::ALLOW_ABSTRACT,
        );
        if !declarator.qid.is_empty() {
            let offset = declarator
                .qid
                .first_token()
                .map(|token| token.input_offset)
                .unwrap_or(0);
            if !declarator.qid.prefix.is_empty() {
                self.error(offset, "parameter name cannot have a nested-name prefix");
            } else if let QualifiedName::Identifier(identifier) = declarator.qid.name {
                result.identifier = Some(identifier.name);
            } else {
                self.error(offset, "expected identifier");
            }
        }
        result.production = declarator.production;
        self.parse_optional_variable_initializer(&mut result.init, false);
        result
    }

    fn parse_template_parameter(&mut self) -> Parameter {
        let mut result = Parameter::default();
        let mut got_type_specifier = false;

        loop {
            let token = self.peek();
            if !token.kind.is_identifier() {
                if !got_type_specifier {
                    self.error(
                        token.input_offset,
                        &format!("expected template parameter before '{}'", token.to_str()),
                    );
                }
                break;
            }

            if matches!(token.text.as_str(), "const" | "volatile" | "unsigned") {
                self.mute_errors = false;
                self.advance();
                result.decl_specifiers.push(DeclSpecifier::Keyword(token));
            } else if token.text == "typename" || token.text == "class" {
                if !got_type_specifier {
                    self.mute_errors = false;
                } else {
                    self.error(token.input_offset, "too many type specifiers");
                }
                self.advance();

                let mut ellipsis = None;
                let token2 = self.peek();
                if token2.kind.is_ellipsis() {
                    self.advance();
                    ellipsis = Some(token2);
                }

                let qid = self.parse_qualified_id(ParseQualifiedMode::RequireCompleteOrEmpty);
                if !qid.prefix.is_empty() {
                    if token.text == "typename" {
                        // `typename A::B` is a non-type template parameter.
                        got_type_specifier = true;
                        result
                            .decl_specifiers
                            .push(DeclSpecifier::TypeSpecifier(TypeSpecifier {
                                elaborate_keyword: Some(token),
                                qid,
                                was_assumed: false,
                            }));
                        continue;
                    }
                    let offset = qid
                        .first_token()
                        .map(|first| first.input_offset)
                        .unwrap_or(token.input_offset);
                    self.error(offset, "template parameter name cannot have a nested name prefix");
                } else if let QualifiedName::Identifier(identifier) = qid.name {
                    result.identifier = Some(identifier.name);
                } else if !qid.name.is_none() {
                    let offset = qid
                        .first_token()
                        .map(|first| first.input_offset)
                        .unwrap_or(token.input_offset);
                    self.error(offset, "expected identifier");
                }
                result
                    .decl_specifiers
                    .push(DeclSpecifier::TypeParameter(TypeParameter {
                        keyword: token,
                        ellipsis,
                    }));
                self.parse_optional_type_id_initializer(&mut result.init);
                return result;
            } else {
                self.mute_errors = false;
                if got_type_specifier {
                    break; // Parse it as a declarator.
                }
                got_type_specifier = true;
                let qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
                result
                    .decl_specifiers
                    .push(DeclSpecifier::TypeSpecifier(TypeSpecifier {
                        elaborate_keyword: None,
                        qid,
                        was_assumed: false,
                    }));
            }
        }

        let declarator = self.parse_declarator(
            None,
            DeclaratorFlags::ALLOW_NAMED | DeclaratorFlags::ALLOW_ABSTRACT,
        );
        if !declarator.qid.is_empty() {
            let offset = declarator
                .qid
                .first_token()
                .map(|token| token.input_offset)
                .unwrap_or(0);
            if !declarator.qid.prefix.is_empty() {
                self.error(offset, "template parameter name cannot have a nested-name prefix");
            } else if let QualifiedName::Identifier(identifier) = declarator.qid.name {
                result.identifier = Some(identifier.name);
            } else {
                self.error(offset, "expected identifier");
            }
        }
        result.production = declarator.production;
        self.parse_optional_variable_initializer(&mut result.init, false);
        result
    }

    pub(crate) fn parse_function_qualifier_seq(&mut self) -> Vec<cpp_token::Token> {
        let mut qualifiers = Vec::new();
        loop {
            let token = self.peek();
            let is_qualifier = match token.kind {
                TokenKind::Identifier => token.text == "const" || token.text == "override",
                TokenKind::SingleAmpersand | TokenKind::DoubleAmpersand => true,
                _ => false,
            };
            if !is_qualifier {
                break;
            }
            self.advance();
            qualifiers.push(token);
        }
        qualifiers
    }

    pub(crate) fn parse_optional_trailing_return_type(
        &mut self,
        function: &mut FunctionProduction,
    ) {
        let arrow_token = self.peek();
        if arrow_token.kind.is_arrow() {
            self.advance();
            function.arrow = Some(arrow_token);
            function.trailing_return_type = Some(self.parse_type_id());
        }
    }

    pub(crate) fn parse_optional_type_id_initializer(&mut self, init: &mut Initializer) {
        *init = Initializer::None;
        let token = self.peek();
        if !token.kind.is_single_equal() {
            return;
        }
        self.advance();
        let mut assignment = Assignment {
            equal_sign: Some(token),
            value: AssignedValue::None,
        };

        let token2 = self.next();
        if token2.text != "0" {
            // Not a `<typename A::B = 0>` style default; expect a type-id.
            self.push_back();
            let saved_error_count = self.raw_error_count;
            let type_id = self.parse_type_id();
            if saved_error_count == self.raw_error_count {
                assignment.value = AssignedValue::Type(type_id);
            }
        }
        *init = Initializer::Assignment(assignment);
    }

    pub(crate) fn parse_optional_variable_initializer(
        &mut self,
        init: &mut Initializer,
        _allow_braced_init: bool,
    ) {
        debug_assert!(init.is_none());
        let token = self.peek();
        if token.kind.is_open_curly() {
            // Braced initializer; the expression skim consumes the braces.
            *init = Initializer::Assignment(Assignment::default());
            self.parse_expression(false);
        } else if token.kind.is_single_equal() {
            self.advance();
            self.parse_expression(false);
            *init = Initializer::Assignment(Assignment {
                equal_sign: Some(token),
                value: AssignedValue::None,
            });
        } else if token.kind.is_single_colon() {
            self.advance();
            self.parse_expression(false);
            *init = Initializer::BitField(cpp_ast::BitField {
                colon: token,
                width: None,
            });
        }
    }
}
