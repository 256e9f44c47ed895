use crate::declarator::{InitDeclarator, Parameter, TypeId};
use crate::qid::QualifiedId;
use crate::specifier::DeclSpecifier;
use cpp_token::Token;
use derive_more::IsVariant;

/// One declaration. Tokens that are implicit in context (for example the
/// braces around a namespace body, or the terminating semicolon) are kept as
/// `Option`s; a declaration that failed to materialize at all is `Empty`.
#[derive(Clone, Debug, Default)]
pub struct Declaration {
    pub body: DeclarationBody,
    pub semicolon: Option<Token>,
}

#[derive(Clone, Debug, Default, IsVariant)]
pub enum DeclarationBody {
    #[default]
    Empty,
    Linkage(LinkageDecl),
    Namespace(NamespaceDecl),
    Entity(EntityDecl),
    Template(TemplateDecl),
    TypeAlias(TypeAliasDecl),
    UsingNamespace(UsingNamespaceDecl),
    StaticAssert(StaticAssertDecl),
    AccessSpecifier(AccessSpecifierDecl),
}

/// `extern "C" { ... }`
#[derive(Clone, Debug)]
pub struct LinkageDecl {
    pub extern_keyword: Token,
    pub literal: Token,
    pub open_curly: Option<Token>,
    pub child_decls: Vec<Declaration>,
    pub close_curly: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct NamespaceDecl {
    pub keyword: Token,
    pub qid: QualifiedId,
    pub open_curly: Option<Token>,
    pub child_decls: Vec<Declaration>,
    pub close_curly: Option<Token>,
}

/// The common case: a decl-specifier sequence followed by zero or more init
/// declarators, covering variables, functions, classes and enums alike.
#[derive(Clone, Debug, Default)]
pub struct EntityDecl {
    pub decl_specifiers: Vec<DeclSpecifier>,
    pub init_declarators: Vec<InitDeclarator>,
}

#[derive(Clone, Debug)]
pub struct TemplateDecl {
    pub keyword: Token,
    pub open_angle: Option<Token>,
    pub params: Vec<Parameter>,
    pub close_angle: Option<Token>,
    pub child: Option<Box<Declaration>>,
}

/// `using Name = type-id;`
#[derive(Clone, Debug)]
pub struct TypeAliasDecl {
    pub using_keyword: Token,
    pub name: Token,
    pub equals: Option<Token>,
    pub type_id: TypeId,
}

#[derive(Clone, Debug)]
pub struct UsingNamespaceDecl {
    pub using_keyword: Token,
    pub namespace_keyword: Token,
    pub qid: QualifiedId,
}

#[derive(Clone, Debug)]
pub struct StaticAssertDecl {
    pub keyword: Token,
    pub open_paren: Option<Token>,
    pub close_paren: Option<Token>,
}

/// `public:` / `private:` / `protected:`
#[derive(Clone, Debug)]
pub struct AccessSpecifierDecl {
    pub keyword: Token,
    pub colon: Option<Token>,
}

impl EntityDecl {
    pub fn first_token(&self) -> Option<&Token> {
        if let Some(first) = self.decl_specifiers.first() {
            return first.first_token();
        }
        self.init_declarators
            .first()
            .and_then(|init_decl| init_decl.qid.first_token())
    }
}

impl Declaration {
    pub fn first_token(&self) -> Option<&Token> {
        match &self.body {
            DeclarationBody::Empty => self.semicolon.as_ref(),
            DeclarationBody::Linkage(linkage) => Some(&linkage.extern_keyword),
            DeclarationBody::Namespace(namespace) => Some(&namespace.keyword),
            DeclarationBody::Entity(entity) => entity.first_token(),
            DeclarationBody::Template(template) => Some(&template.keyword),
            DeclarationBody::TypeAlias(alias) => Some(&alias.using_keyword),
            DeclarationBody::UsingNamespace(using) => Some(&using.using_keyword),
            DeclarationBody::StaticAssert(static_assert) => Some(&static_assert.keyword),
            DeclarationBody::AccessSpecifier(access) => Some(&access.keyword),
        }
    }
}
