use crate::Parser;
use crate::error::Severity;
use crate::parse_declarator::DeclaratorFlags;
use crate::parse_qualified_id::ParseQualifiedMode;
use crate::recover::Accept;
use cpp_ast::{
    AccessSpecifierDecl, AssignedValue, Assignment, BaseSpecifier, ClassSpecifier, ConversionFunc,
    DeclProduction, DeclProductionKind, DeclSpecifier, Declaration, DeclarationBody, EntityDecl,
    EnumSpecifier, Enumerator, FunctionBody, InitDeclarator, Initializer, LinkageDecl,
    NamespaceDecl, QualifiedId, QualifiedName, StaticAssertDecl, TemplateDecl, TypeAliasDecl,
    TypeSpecifier, UsingNamespaceDecl,
};
use cpp_token::TokenKind;

fn entity_declaration(entity: EntityDecl) -> Declaration {
    Declaration {
        body: DeclarationBody::Entity(entity),
        semicolon: None,
    }
}

// Whether the grammar demands a terminating semicolon after this
// declaration. Block-shaped declarations (namespace bodies, linkage blocks,
// access specifiers, function definitions) don't take one.
fn requires_semicolon(declaration: &Declaration) -> bool {
    match &declaration.body {
        DeclarationBody::Empty => false,
        DeclarationBody::AccessSpecifier(_) => false,
        DeclarationBody::Namespace(namespace) => namespace.open_curly.is_none(),
        DeclarationBody::Linkage(linkage) => linkage.open_curly.is_none(),
        DeclarationBody::Template(template) => {
            template.child.as_deref().map(requires_semicolon).unwrap_or(true)
        }
        DeclarationBody::Entity(entity) => entity
            .init_declarators
            .last()
            .is_none_or(|last| !last.init.is_function_body()),
        _ => true,
    }
}

/// True when a qualified-id in declaration position names a constructor or
/// destructor: inside a class, a plain name equal to the class name; outside
/// any class, a name equal to the last component of its own prefix, as in
/// `Foo::Foo(...)`.
fn looks_like_ctor_dtor(enclosing_class_name: &str, qid: &QualifiedId) -> bool {
    if enclosing_class_name.is_empty() {
        if qid.prefix.is_empty() {
            return false;
        }
        let Some(ctor_dtor_name) = qid.ctor_dtor_name() else {
            return false;
        };
        match &qid.prefix.last().unwrap().segment {
            cpp_ast::PrefixSegment::Identifier(identifier) => {
                ctor_dtor_name == identifier.name.text
            }
            cpp_ast::PrefixSegment::TemplateId(template_id) => {
                ctor_dtor_name == template_id.name.text
            }
            cpp_ast::PrefixSegment::Decltype(_) => false,
        }
    } else {
        if !qid.prefix.is_empty() {
            return false;
        }
        qid.ctor_dtor_name() == Some(enclosing_class_name)
    }
}

impl Parser {
    fn skip_member_initializer_list(&mut self) {
        // Make sure that if { is encountered, even badly placed, control
        // returns to the caller.
        let saved_flags = self.outer_accept_flags;
        self.outer_accept_flags |= Accept::OPEN_CURLY;

        loop {
            let qid = self.parse_qualified_id(ParseQualifiedMode::AllowIncomplete);
            if !qid.name.is_none() {
                let open_token = self.peek();
                if open_token.kind.is_open_paren() || open_token.kind.is_open_curly() {
                    self.advance();
                    self.skip_any_scope(&open_token);
                } else {
                    self.error(
                        open_token.input_offset,
                        &format!("expected '{{' or '(' before '{}'", open_token.to_str()),
                    );
                    continue;
                }

                let next_token = self.peek();
                if next_token.kind.is_open_curly() {
                    // End of the member initializer list.
                    self.mute_errors = false;
                    break;
                } else if next_token.kind.is_comma() {
                    self.advance();
                    self.mute_errors = false;
                } else {
                    self.error(
                        next_token.input_offset,
                        "expected function body after member initializer list",
                    );
                    break;
                }
            } else {
                let token = self.peek();
                self.error(
                    token.input_offset,
                    &format!(
                        "expected class member or base class name before '{}'",
                        token.to_str()
                    ),
                );
                if qid.prefix.is_empty() {
                    self.advance();
                    if !self.handle_unexpected_token(&token) {
                        break;
                    }
                }
            }
        }

        self.outer_accept_flags = saved_flags;
    }

    fn parse_optional_function_body(&mut self, init: &mut Initializer) {
        *init = Initializer::None;

        let mut token = self.peek();
        if token.kind.is_single_equal() {
            self.advance();
            *init = Initializer::Assignment(Assignment {
                equal_sign: Some(token),
                value: AssignedValue::None,
            });
            self.parse_expression(false);
            return;
        }

        let mut function_body = FunctionBody::default();
        let mut have_body = false;

        if token.kind.is_single_colon() {
            self.advance();
            function_body.colon = Some(token);
            have_body = true;
            self.skip_member_initializer_list();
            token = self.peek();
        }

        if token.kind.is_open_curly() {
            self.advance();
            function_body.close_curly = self.skip_any_scope(&token);
            function_body.open_curly = Some(token);
            have_body = true;
        }

        if have_body {
            *init = Initializer::FunctionBody(function_body);
        }
    }

    fn parse_init_declarators(&mut self, entity: &mut EntityDecl) {
        // A list of zero or more named declarators is accepted here.
        loop {
            let declarator = self.parse_declarator(None, DeclaratorFlags::ALLOW_NAMED);
            if declarator.qid.is_empty() {
                break; // Any error was already logged.
            }

            let mut init_declarator = InitDeclarator {
                qid: declarator.qid,
                production: declarator.production,
                init: Initializer::None,
                comma: None,
            };

            let is_function = init_declarator
                .production
                .as_ref()
                .is_some_and(|production| production.kind.is_function());
            if is_function {
                self.parse_optional_function_body(&mut init_declarator.init);
                if init_declarator.init.is_function_body() {
                    if !entity.init_declarators.is_empty() {
                        let offset = match &init_declarator.production.as_ref().unwrap().kind {
                            DeclProductionKind::Function(function) => {
                                function.open_paren.input_offset
                            }
                            _ => unreachable!(),
                        };
                        self.error_no_mute(
                            Severity::Error,
                            offset,
                            "can't mix function definitions with other declarations",
                        );
                    }
                }
                entity.init_declarators.push(init_declarator);
                // Nothing follows a function body in the declarator list.
                break;
            }

            self.parse_optional_variable_initializer(&mut init_declarator.init, true);
            entity.init_declarators.push(init_declarator);

            let sep_token = self.peek();
            if !sep_token.kind.is_comma() {
                break;
            }
            self.advance();
            entity.init_declarators.last_mut().unwrap().comma = Some(sep_token);
        }
    }

    fn parse_base_specifier_list(&mut self) -> Vec<BaseSpecifier> {
        let mut base_specifiers = Vec::new();
        loop {
            let mut access_spec = None;

            let token = self.peek();
            if token.kind.is_identifier()
                && matches!(token.text.as_str(), "public" | "private" | "protected")
            {
                self.advance();
                self.mute_errors = false;
                access_spec = Some(token);
            }

            let base_qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
            if base_qid.name.is_none() {
                break;
            }
            self.mute_errors = false;
            base_specifiers.push(BaseSpecifier {
                access_spec,
                base_qid,
                comma: None,
            });

            let punc_token = self.peek();
            if punc_token.kind.is_open_curly() {
                break;
            }
            self.advance();
            if punc_token.kind.is_comma() {
                base_specifiers.last_mut().unwrap().comma = Some(punc_token);
            } else {
                self.error(
                    punc_token.input_offset,
                    &format!("expected ',' or '{{' before '{}'", punc_token.to_str()),
                );
                break;
            }
        }
        base_specifiers
    }

    fn parse_class_declaration(&mut self) -> ClassSpecifier {
        let keyword = self.next();
        let qid = self.parse_qualified_id(ParseQualifiedMode::RequireCompleteOrEmpty);
        let mut class_spec = ClassSpecifier {
            keyword,
            qid,
            virt_specifiers: Vec::new(),
            colon: None,
            base_specifiers: Vec::new(),
            open_curly: None,
            member_decls: Vec::new(),
            close_curly: None,
        };

        // Optional virt-specifier sequence.
        let mut final_token_seen = false;
        let mut token = self.next();
        while token.kind.is_identifier() && token.text == "final" {
            if final_token_seen {
                self.error(
                    token.input_offset,
                    &format!("'{}' used more than once", token.text),
                );
            } else {
                final_token_seen = true;
                class_spec.virt_specifiers.push(token);
            }
            token = self.next();
        }

        if token.kind.is_single_colon() {
            class_spec.colon = Some(token);
            class_spec.base_specifiers = self.parse_base_specifier_list();
            token = self.next();
        }

        if token.kind.is_open_curly() {
            let class_name = class_spec.qid.class_name().unwrap_or("").to_string();
            let (member_decls, close_curly) = self.parse_declaration_list(true, &class_name);
            class_spec.open_curly = Some(token);
            class_spec.member_decls = member_decls;
            class_spec.close_curly = close_curly;
        } else {
            self.push_back();
        }
        class_spec
    }

    fn parse_enum_body(&mut self, enum_spec: &mut EnumSpecifier) {
        self.mute_errors = false;

        self.with_scope_flags(TokenKind::OpenCurly, |parser| {
            loop {
                let token = parser.next();
                if token.kind.is_close_curly() {
                    parser.mute_errors = false;
                    enum_spec.close_curly = Some(token);
                    break;
                } else if token.kind.is_identifier() {
                    parser.mute_errors = false;

                    let mut enumerator = Enumerator {
                        name: token,
                        init: Initializer::None,
                        comma: None,
                    };
                    parser.parse_optional_variable_initializer(&mut enumerator.init, false);

                    let token2 = parser.next();
                    let mut done = false;
                    if token2.kind.is_comma() {
                        parser.mute_errors = false;
                        enumerator.comma = Some(token2);
                    } else if token2.kind.is_close_curly() {
                        parser.mute_errors = false;
                        enum_spec.close_curly = Some(token2);
                        done = true;
                    } else {
                        if token2.kind.is_identifier() {
                            parser.error(token2.input_offset, "missing ',' between enumerators");
                        }
                        // Other tokens will produce an error on the next
                        // loop iteration.
                        parser.push_back();
                    }
                    enum_spec.enumerators.push(enumerator);
                    if done {
                        break;
                    }
                } else {
                    parser.error(
                        token.input_offset,
                        &format!("expected enumerator or '}}' before '{}'", token.to_str()),
                    );
                    if !parser.handle_unexpected_token(&token) {
                        return;
                    }
                }
            }
        });
    }

    fn parse_enum_declaration(&mut self) -> EnumSpecifier {
        let keyword = self.next();
        let mut class_keyword = None;
        let token2 = self.peek();
        if token2.kind.is_identifier() && token2.text == "class" {
            self.advance();
            class_keyword = Some(token2);
        }

        let qid = self.parse_qualified_id(ParseQualifiedMode::RequireCompleteOrEmpty);
        let mut enum_spec = EnumSpecifier {
            keyword,
            class_keyword,
            qid,
            colon: None,
            base: QualifiedId::default(),
            open_curly: None,
            enumerators: Vec::new(),
            close_curly: None,
        };

        let sep_token = self.peek();
        if sep_token.kind.is_single_colon() {
            self.advance();
            if enum_spec.qid.is_empty() {
                self.error_no_mute(
                    Severity::Error,
                    sep_token.input_offset,
                    "scoped enum requires a name",
                );
            }
            enum_spec.colon = Some(sep_token);
            enum_spec.base = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
        }

        let token3 = self.peek();
        if token3.kind.is_open_curly() {
            self.advance();
            enum_spec.open_curly = Some(token3);
            self.parse_enum_body(&mut enum_spec);
        }
        enum_spec
    }

    fn parse_entity_declaration(&mut self, enclosing_class_name: &str) -> Declaration {
        let mut entity = EntityDecl::default();
        let start_input_offset = self.peek().input_offset;
        let saved_error_count = self.raw_error_count;

        // Parse the decl-specifier sequence.
        let mut got_type_specifier = false;
        loop {
            let token = self.peek();
            if !token.kind.is_identifier() {
                // Parse the remainder as a declarator list (it may start
                // with * or &). No error if no type specifier was seen yet:
                // the declarator may name a destructor.
                break;
            }

            match token.text.as_str() {
                "extern" => {
                    self.mute_errors = false;
                    self.advance();
                    let literal = self.peek();
                    if literal.kind.is_string_literal() {
                        self.advance();
                        entity.decl_specifiers.push(DeclSpecifier::Linkage {
                            extern_keyword: token,
                            literal,
                        });
                    } else {
                        entity.decl_specifiers.push(DeclSpecifier::Keyword(token));
                    }
                }
                "inline" | "const" | "volatile" | "static" | "friend" | "virtual"
                | "constexpr" | "thread_local" | "unsigned" | "mutable" | "explicit" => {
                    self.mute_errors = false;
                    self.advance();
                    entity.decl_specifiers.push(DeclSpecifier::Keyword(token));
                }
                "alignas" => {
                    // alignas is technically part of the attribute-specifier
                    // sequence, which can only precede the decl-specifiers,
                    // but accept it anywhere in the sequence.
                    self.mute_errors = false;
                    self.advance();
                    let open_paren = self.next();
                    if !open_paren.kind.is_open_paren() {
                        self.error(
                            open_paren.input_offset,
                            &format!("expected '(' before '{}'", open_paren.to_str()),
                        );
                        continue;
                    }
                    self.parse_type_id();
                    if self.close_scope(&open_paren).is_none() {
                        break;
                    }
                }
                "typedef" => {
                    self.mute_errors = false;
                    self.advance();
                }
                "struct" | "class" | "union" => {
                    self.mute_errors = false;
                    if got_type_specifier {
                        self.error(token.input_offset, "too many type specifiers");
                    }
                    let class_spec = self.parse_class_declaration();
                    got_type_specifier = true;
                    entity.decl_specifiers.push(DeclSpecifier::Class(class_spec));
                }
                "enum" => {
                    self.mute_errors = false;
                    if got_type_specifier {
                        self.error(token.input_offset, "too many type specifiers");
                    }
                    let enum_spec = self.parse_enum_declaration();
                    got_type_specifier = true;
                    entity.decl_specifiers.push(DeclSpecifier::Enum(enum_spec));
                }
                "operator" if !got_type_specifier => {
                    // A conversion function.
                    self.mute_errors = false;
                    self.advance();
                    let mut conv_func = ConversionFunc {
                        operator_keyword: token,
                        decl_specifiers: Vec::new(),
                        abstract_declarator: None,
                    };
                    self.parse_conversion_type_id(&mut conv_func);

                    let mut init_declarator = InitDeclarator {
                        qid: QualifiedId {
                            prefix: Vec::new(),
                            name: QualifiedName::ConversionFunc(conv_func),
                        },
                        ..InitDeclarator::default()
                    };

                    let open_paren = self.peek();
                    if open_paren.kind.is_open_paren() {
                        self.advance();
                        let mut function = cpp_ast::FunctionProduction {
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
                            init_declarator.production = Some(Box::new(DeclProduction {
                                kind: DeclProductionKind::Function(function),
                                child: None,
                            }));
                            self.parse_optional_function_body(&mut init_declarator.init);
                        } else {
                            init_declarator.production = Some(Box::new(DeclProduction {
                                kind: DeclProductionKind::Function(function),
                                child: None,
                            }));
                        }
                        entity.init_declarators.push(init_declarator);
                        return entity_declaration(entity);
                    }

                    self.error(
                        open_paren.input_offset,
                        &format!("expected '(' before '{}'", open_paren.to_str()),
                    );
                    entity.init_declarators.push(init_declarator);
                    break;
                }
                _ => {
                    self.mute_errors = false;
                    if got_type_specifier {
                        // Already have a type specifier, so this must be the
                        // declarator part.
                        break;
                    }

                    self.advance();
                    let mut typename_token = None;
                    let qid;
                    if token.text == "typename" {
                        typename_token = Some(token.clone());
                        let mut ellipsis = None;
                        let token2 = self.peek();
                        if token2.kind.is_ellipsis() {
                            self.advance();
                            ellipsis = Some(token2);
                        }
                        qid = self.parse_qualified_id(ParseQualifiedMode::RequireCompleteOrEmpty);
                        if let Some(ellipsis) = ellipsis {
                            self.error(
                                ellipsis.input_offset,
                                &format!("expected qualified-id before '{}'", ellipsis.to_str()),
                            );
                        }
                    } else {
                        self.push_back();
                        qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
                        debug_assert!(!qid.is_empty());
                    }

                    if typename_token.is_none() && looks_like_ctor_dtor(enclosing_class_name, &qid)
                    {
                        // Optimistically parse it as a constructor. The
                        // restore point recovers from `Foo(bar())`.
                        let restore_point = self.open_restore_point();
                        let function = self.parse_parameter_list();
                        if !self.error_occurred(&restore_point) {
                            self.commit(restore_point);
                            let function = function.expect("constructor parameter list");
                            let mut init_declarator = InitDeclarator {
                                qid,
                                production: Some(Box::new(DeclProduction {
                                    kind: DeclProductionKind::Function(function),
                                    child: None,
                                })),
                                ..InitDeclarator::default()
                            };
                            self.parse_optional_function_body(&mut init_declarator.init);
                            entity.init_declarators.push(init_declarator);
                            return entity_declaration(entity);
                        }
                        // Not a constructor: treat the tokens as an entity
                        // type specifier instead.
                        self.backtrack(restore_point);
                    }

                    // All declarations are explicitly typed; there is no
                    // "default int". This must be the type specifier.
                    if typename_token.is_some() && qid.prefix.is_empty() {
                        if let Some(first_token) = qid.first_token() {
                            let (offset, text) =
                                (first_token.input_offset, first_token.to_str().to_string());
                            self.error(
                                offset,
                                &format!("expected nested name prefix before '{}'", text),
                            );
                        }
                    }

                    got_type_specifier = true;
                    entity
                        .decl_specifiers
                        .push(DeclSpecifier::TypeSpecifier(TypeSpecifier {
                            elaborate_keyword: typename_token,
                            qid,
                            was_assumed: false,
                        }));
                }
            }
        }

        // Parse the init-declarators.
        self.parse_init_declarators(&mut entity);

        let is_type_declaration = entity
            .decl_specifiers
            .iter()
            .any(|spec| spec.is_class() || spec.is_enum());
        if saved_error_count == self.raw_error_count
            && entity.init_declarators.is_empty()
            && !is_type_declaration
        {
            self.error_no_mute(
                Severity::Error,
                start_input_offset,
                "declaration does not declare anything",
            );
        }

        entity_declaration(entity)
    }

    pub(crate) fn parse_declaration_internal(&mut self, enclosing_class_name: &str) -> Declaration {
        let mut result = Declaration::default();
        let token = self.peek();

        if token.kind.is_identifier() {
            match token.text.as_str() {
                "extern" => {
                    // Possibly a linkage specification block.
                    self.mute_errors = false;
                    let restore_point = self.open_restore_point();
                    self.advance();

                    let token2 = self.next();
                    if !token2.kind.is_string_literal() {
                        self.backtrack(restore_point);
                        result = self.parse_entity_declaration(enclosing_class_name);
                    } else {
                        let token3 = self.next();
                        if token3.kind.is_open_curly() {
                            // extern "C" { ... }
                            self.commit(restore_point);
                            let (child_decls, close_curly) = self.parse_declaration_list(true, "");
                            result.body = DeclarationBody::Linkage(LinkageDecl {
                                extern_keyword: token,
                                literal: token2,
                                open_curly: Some(token3),
                                child_decls,
                                close_curly,
                            });
                        } else {
                            // A linkage specifier attached to the current
                            // declaration: extern "C" void foo();
                            self.backtrack(restore_point);
                            result = self.parse_entity_declaration(enclosing_class_name);
                        }
                    }
                }
                "public" | "private" | "protected" => {
                    self.advance();
                    self.mute_errors = false;
                    let punc_token = self.peek();
                    if punc_token.kind.is_single_colon() {
                        self.advance();
                        result.body = DeclarationBody::AccessSpecifier(AccessSpecifierDecl {
                            keyword: token,
                            colon: Some(punc_token),
                        });
                    } else {
                        self.error(
                            punc_token.input_offset,
                            &format!("expected ':' before '{}'", punc_token.to_str()),
                        );
                    }
                }
                "static_assert" => {
                    self.advance();
                    self.mute_errors = false;
                    let punc_token = self.peek();
                    if !punc_token.kind.is_open_paren() {
                        self.error(
                            punc_token.input_offset,
                            &format!("expected '(' before '{}'", punc_token.to_str()),
                        );
                    } else {
                        self.advance();
                        if let Some(close_token) = self.skip_any_scope(&punc_token) {
                            result.body = DeclarationBody::StaticAssert(StaticAssertDecl {
                                keyword: token,
                                open_paren: Some(punc_token),
                                close_paren: Some(close_token),
                            });
                        }
                    }
                }
                "namespace" => {
                    self.advance();
                    self.mute_errors = false;
                    let mut namespace = NamespaceDecl {
                        keyword: token,
                        qid: QualifiedId::default(),
                        open_curly: None,
                        child_decls: Vec::new(),
                        close_curly: None,
                    };

                    let mut token2 = self.peek();
                    if token2.kind.is_identifier() {
                        namespace.qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
                        token2 = self.peek();
                    }

                    if token2.kind.is_open_curly() {
                        self.advance();
                        namespace.open_curly = Some(token2);
                        let (child_decls, close_curly) = self.parse_declaration_list(true, "");
                        namespace.child_decls = child_decls;
                        namespace.close_curly = close_curly;
                    } else {
                        self.error(
                            token2.input_offset,
                            &format!("expected '{{' before '{}'", token2.to_str()),
                        );
                    }
                    result.body = DeclarationBody::Namespace(namespace);
                }
                "template" => {
                    self.advance();
                    self.mute_errors = false;
                    let mut template = TemplateDecl {
                        keyword: token,
                        open_angle: None,
                        params: Vec::new(),
                        close_angle: None,
                        child: None,
                    };

                    let token2 = self.peek();
                    if token2.kind.is_open_angle() {
                        self.advance();
                        template.open_angle = Some(token2);

                        let saved_right_shift = self.tkr.config.tokenize_right_shift;
                        self.tkr.config.tokenize_right_shift = false;
                        let mut params = Vec::new();
                        self.parse_parameter_declaration_list(&mut params, true);
                        template.params = params;
                        self.tkr.config.tokenize_right_shift = saved_right_shift;

                        let close_angle = self.peek();
                        if close_angle.kind.is_close_angle() {
                            self.advance();
                            template.close_angle = Some(close_angle);
                        }
                    }
                    template.child =
                        Some(Box::new(self.parse_declaration_internal(enclosing_class_name)));
                    result.body = DeclarationBody::Template(template);
                }
                "using" => {
                    // A using directive or a type alias.
                    self.advance();
                    self.mute_errors = false;
                    let token2 = self.next();
                    if token2.kind.is_identifier() && token2.text == "namespace" {
                        let qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
                        result.body = DeclarationBody::UsingNamespace(UsingNamespaceDecl {
                            using_keyword: token,
                            namespace_keyword: token2,
                            qid,
                        });
                    } else {
                        let mut alias = TypeAliasDecl {
                            using_keyword: token,
                            name: token2,
                            equals: None,
                            type_id: cpp_ast::TypeId::default(),
                        };

                        let equal_token = self.peek();
                        if !equal_token.kind.is_single_equal() {
                            self.error(
                                equal_token.input_offset,
                                &format!("expected '=' before '{}'", equal_token.to_str()),
                            );
                        } else {
                            self.advance();
                            alias.equals = Some(equal_token);
                            alias.type_id = self.parse_type_id();
                        }
                        result.body = DeclarationBody::TypeAlias(alias);
                    }
                }
                _ => {
                    result = self.parse_entity_declaration(enclosing_class_name);
                }
            }
        } else if token.kind.is_semicolon() {
            // An empty declaration.
            self.advance();
            result.semicolon = Some(token);
        } else if token.kind.is_tilde() {
            result = self.parse_entity_declaration(enclosing_class_name);
        } else {
            self.advance();
            self.error(
                token.input_offset,
                &format!("expected declaration before '{}'", token.to_str()),
            );
        }
        result
    }

    pub(crate) fn parse_declaration_list(
        &mut self,
        expect_close_curly: bool,
        enclosing_class_name: &str,
    ) -> (Vec<Declaration>, Option<cpp_token::Token>) {
        // Close curly is always handled at this scope, even at file scope.
        self.with_scope_flags(TokenKind::OpenCurly, |parser| {
            let mut result = Vec::new();
            let mut close_curly = None;

            loop {
                let token = parser.peek();
                if token.is_end_of_file() {
                    if expect_close_curly {
                        parser.error(
                            token.input_offset,
                            &format!("expected '}}' before '{}'", token.to_str()),
                        );
                    }
                    break;
                } else if token.kind.is_close_curly() {
                    parser.advance();
                    if expect_close_curly {
                        close_curly = Some(token);
                        break;
                    }
                    parser.error(
                        token.input_offset,
                        &format!("expected declaration before '{}'", token.to_str()),
                    );
                    continue;
                }

                let declaration = parser.parse_declaration_internal(enclosing_class_name);
                let semicolon_required = requires_semicolon(&declaration);
                result.push(declaration);

                let semicolon = parser.peek();
                if semicolon.kind.is_semicolon() {
                    parser.advance();
                    parser.mute_errors = false;
                    result.last_mut().unwrap().semicolon = Some(semicolon);
                } else if semicolon_required {
                    parser.error(
                        semicolon.input_offset,
                        &format!("expected ';' before '{}'", semicolon.to_str()),
                    );
                }
            }

            (result, close_curly)
        })
    }

    pub(crate) fn parse_translation_unit(&mut self) -> Vec<Declaration> {
        let (declarations, _) = self.parse_declaration_list(false, "");
        debug_assert!(self.peek().is_end_of_file());
        declarations
    }
}
