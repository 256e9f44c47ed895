use crate::decl::Declaration;
use crate::declarator::Initializer;
use crate::qid::QualifiedId;
use cpp_token::Token;
use derive_more::IsVariant;

/// One element of a decl-specifier sequence.
#[derive(Clone, Debug, IsVariant)]
pub enum DeclSpecifier {
    /// `const`, `static`, `inline`, ... kept verbatim.
    Keyword(Token),
    /// `extern "C"` attached to a single declaration.
    Linkage { extern_keyword: Token, literal: Token },
    Class(ClassSpecifier),
    Enum(EnumSpecifier),
    TypeSpecifier(TypeSpecifier),
    /// `typename T` / `class T` inside a template parameter list.
    TypeParameter(TypeParameter),
    /// `...` standing alone in a parameter list.
    Ellipsis(Token),
}

impl DeclSpecifier {
    pub fn first_token(&self) -> Option<&Token> {
        match self {
            DeclSpecifier::Keyword(token) => Some(token),
            DeclSpecifier::Linkage { extern_keyword, .. } => Some(extern_keyword),
            DeclSpecifier::Class(class) => Some(&class.keyword),
            DeclSpecifier::Enum(en) => Some(&en.keyword),
            DeclSpecifier::TypeSpecifier(type_spec) => type_spec
                .elaborate_keyword
                .as_ref()
                .or_else(|| type_spec.qid.first_token()),
            DeclSpecifier::TypeParameter(type_param) => Some(&type_param.keyword),
            DeclSpecifier::Ellipsis(token) => Some(token),
        }
    }
}

/// `struct` / `class` / `union` definition or forward reference.
#[derive(Clone, Debug)]
pub struct ClassSpecifier {
    pub keyword: Token,
    pub qid: QualifiedId,
    pub virt_specifiers: Vec<Token>,
    pub colon: Option<Token>,
    pub base_specifiers: Vec<BaseSpecifier>,
    pub open_curly: Option<Token>,
    pub member_decls: Vec<Declaration>,
    pub close_curly: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct BaseSpecifier {
    pub access_spec: Option<Token>,
    pub base_qid: QualifiedId,
    pub comma: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct EnumSpecifier {
    pub keyword: Token,
    pub class_keyword: Option<Token>,
    pub qid: QualifiedId,
    pub colon: Option<Token>,
    pub base: QualifiedId,
    pub open_curly: Option<Token>,
    pub enumerators: Vec<Enumerator>,
    pub close_curly: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct Enumerator {
    pub name: Token,
    pub init: Initializer,
    pub comma: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct TypeSpecifier {
    /// `typename`, `class`, `struct`, `union` or `enum` when elaborated.
    pub elaborate_keyword: Option<Token>,
    pub qid: QualifiedId,
    /// True whenever the parser assumed, without type knowledge, that the
    /// qualified-id names a type. For example in `void func(int(A));` the
    /// parser cannot know whether `A` identifies a type; it assumes so and
    /// records the guess here.
    pub was_assumed: bool,
}

#[derive(Clone, Debug)]
pub struct TypeParameter {
    pub keyword: Token,
    pub ellipsis: Option<Token>,
}
