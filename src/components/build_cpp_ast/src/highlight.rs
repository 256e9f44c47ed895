use crate::Parser;
use cpp_ast::{
    Color, DeclProduction, DeclProductionKind, DeclSpecifier, Declaration, DeclarationBody,
    Parameter, PrefixSegment, QualifiedId, QualifiedName, TokenSpan,
};
use cpp_token::Token;

/// Collects the span sequence for one declaration, synthesizing a space
/// between tokens wherever canonical formatting wants one.
#[derive(Default)]
struct Visitor {
    spans: Vec<TokenSpan>,
    needs_space: bool,
}

enum NameRef<'a> {
    None,
    Qid(&'a QualifiedId),
    Token(&'a Token),
}

impl Visitor {
    fn append(&mut self, color: Color, token: &Token) {
        self.spans.push(TokenSpan::Token {
            color,
            token: token.clone(),
        });
    }

    fn append_opt(&mut self, color: Color, token: Option<&Token>) {
        if let Some(token) = token {
            self.append(color, token);
        }
    }

    fn append_space(&mut self) {
        self.spans.push(TokenSpan::Space);
        self.needs_space = false;
    }

    fn space_if_needed(&mut self) {
        if self.needs_space {
            self.append_space();
        }
    }

    fn visit_qid(&mut self, color: Color, qid: &QualifiedId) {
        for prefix in &qid.prefix {
            match &prefix.segment {
                PrefixSegment::Identifier(identifier) => {
                    self.append(Color::Type, &identifier.name)
                }
                PrefixSegment::TemplateId(template_id) => {
                    self.visit_template_id(Color::Type, template_id)
                }
                PrefixSegment::Decltype(decltype) => self.append(Color::None, &decltype.keyword),
            }
            self.append_opt(Color::None, prefix.double_colon.as_ref());
        }

        match &qid.name {
            QualifiedName::None => (),
            QualifiedName::Identifier(identifier) => self.append(color, &identifier.name),
            QualifiedName::TemplateId(template_id) => self.visit_template_id(color, template_id),
            QualifiedName::Decltype(decltype) => self.append(color, &decltype.keyword),
            QualifiedName::Destructor(destructor) => {
                self.append(color, &destructor.tilde);
                self.append(color, &destructor.name);
            }
            QualifiedName::OperatorFunc(op_func) => {
                self.append(color, &op_func.keyword);
                self.append_opt(color, op_func.punc.as_ref());
                self.append_opt(color, op_func.punc2.as_ref());
            }
            QualifiedName::ConversionFunc(conv_func) => {
                self.append(color, &conv_func.operator_keyword);
                self.needs_space = true;
                self.visit_decl_specifiers(&conv_func.decl_specifiers);
                self.visit_declarator(NameRef::None, conv_func.abstract_declarator.as_deref());
            }
        }
    }

    fn visit_template_id(&mut self, color: Color, template_id: &cpp_ast::TemplateId) {
        self.append(color, &template_id.name);
        self.append_opt(Color::None, template_id.open_angle.as_ref());
        self.needs_space = false;
        for arg in &template_id.args {
            if let cpp_ast::TemplateArgValue::Type(type_id) = &arg.value {
                self.visit_decl_specifiers(&type_id.decl_specifiers);
                self.visit_declarator(NameRef::None, type_id.abstract_declarator.as_deref());
            }
        }
        self.append_opt(Color::None, template_id.close_angle.as_ref());
    }

    fn visit_decl_specifiers(&mut self, decl_specifiers: &[DeclSpecifier]) {
        for decl_specifier in decl_specifiers {
            self.space_if_needed();
            match decl_specifier {
                DeclSpecifier::Keyword(token) => self.append(Color::None, token),
                DeclSpecifier::TypeSpecifier(type_spec) => {
                    self.append_opt(Color::None, type_spec.elaborate_keyword.as_ref());
                    self.visit_qid(Color::Type, &type_spec.qid);
                }
                DeclSpecifier::TypeParameter(type_param) => {
                    self.append(Color::None, &type_param.keyword);
                    self.append_opt(Color::None, type_param.ellipsis.as_ref());
                }
                // Class, enum, linkage and ellipsis specifiers don't occur
                // in the declarations the highlighter renders.
                _ => (),
            }
            self.needs_space = true;
        }
    }

    fn visit_parameters(&mut self, params: &[Parameter]) {
        for param in params {
            self.visit_decl_specifiers(&param.decl_specifiers);
            let name = match &param.identifier {
                Some(identifier) => NameRef::Token(identifier),
                None => NameRef::None,
            };
            self.visit_declarator(name, param.production.as_deref());
            if let Some(comma) = &param.comma {
                self.append(Color::None, comma);
                self.append_space();
            }
        }
    }

    fn visit_declarator(&mut self, name: NameRef, production: Option<&DeclProduction>) {
        // Flatten the chain first.
        let mut chain = Vec::new();
        let mut cursor = production;
        while let Some(production) = cursor {
            // Declarators with parenthesized productions are not rendered.
            if production.kind.is_parenthesized() {
                return;
            }
            chain.push(production);
            cursor = production.child.as_deref();
        }

        // The chain stores trailing productions (arrays, functions) first
        // and leading productions (indirections, qualifiers) after them.
        let leading_start = chain
            .iter()
            .rposition(|production| {
                production.kind.is_array_of() || production.kind.is_function()
            })
            .map(|index| index + 1)
            .unwrap_or(0);

        // Leading productions read right-to-left.
        for production in chain[leading_start..].iter().rev() {
            match &production.kind {
                DeclProductionKind::Indirection { punc, .. } => self.append(Color::None, punc),
                DeclProductionKind::Qualifier { keyword } => {
                    self.space_if_needed();
                    self.append(Color::None, keyword);
                    self.needs_space = true;
                }
                _ => (),
            }
        }

        match name {
            NameRef::None => (),
            NameRef::Token(token) => {
                self.space_if_needed();
                self.append(Color::Variable, token);
                self.needs_space = true;
            }
            NameRef::Qid(qid) => {
                self.space_if_needed();
                self.visit_qid(Color::Symbol, qid);
                self.needs_space = true;
            }
        }

        // Trailing productions read left-to-right.
        for production in &chain[..leading_start] {
            match &production.kind {
                DeclProductionKind::ArrayOf {
                    open_square,
                    close_square,
                } => {
                    self.append(Color::None, open_square);
                    self.append_opt(Color::None, close_square.as_ref());
                    self.needs_space = false;
                }
                DeclProductionKind::Function(function) => {
                    self.append(Color::None, &function.open_paren);
                    self.needs_space = false;
                    self.visit_parameters(&function.params);
                    self.append_opt(Color::None, function.close_paren.as_ref());
                    for qualifier in &function.qualifiers {
                        self.append_space();
                        self.append(Color::None, qualifier);
                    }
                    self.needs_space = true;
                }
                _ => (),
            }
        }
    }

    fn visit_declaration(&mut self, declaration: &Declaration) {
        match &declaration.body {
            DeclarationBody::Entity(entity) => {
                self.visit_decl_specifiers(&entity.decl_specifiers);
                for init_declarator in &entity.init_declarators {
                    self.visit_declarator(
                        NameRef::Qid(&init_declarator.qid),
                        init_declarator.production.as_deref(),
                    );
                    if let Some(comma) = &init_declarator.comma {
                        self.append(Color::None, comma);
                        self.append_space();
                    }
                }
            }
            DeclarationBody::Template(template) => {
                self.append(Color::None, &template.keyword);
                self.append_space();
                self.append_opt(Color::None, template.open_angle.as_ref());
                self.needs_space = false;
                self.visit_parameters(&template.params);
                self.append_opt(Color::None, template.close_angle.as_ref());
                self.needs_space = true;
                if let Some(child) = &template.child {
                    self.visit_declaration(child);
                }
            }
            // Other declaration kinds aren't rendered by the highlighter.
            _ => (),
        }
    }
}

impl Parser {
    /// Reconstructs a canonical rendering of a declaration as an ordered
    /// span sequence: each span is one colored token or one synthesized
    /// inter-token space.
    pub fn syntax_highlight(&self, declaration: &Declaration) -> Vec<TokenSpan> {
        let mut visitor = Visitor::default();
        visitor.visit_declaration(declaration);
        visitor.spans
    }
}
