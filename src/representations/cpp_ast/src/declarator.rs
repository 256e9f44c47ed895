use crate::expr::{Expression, Statement};
use crate::qid::{Prefix, QualifiedId};
use crate::specifier::DeclSpecifier;
use cpp_token::Token;
use derive_more::IsVariant;

/// A type-id: decl-specifiers plus an optional abstract declarator, as used
/// by type aliases, template arguments and casts.
#[derive(Clone, Debug, Default)]
pub struct TypeId {
    pub decl_specifiers: Vec<DeclSpecifier>,
    pub abstract_declarator: Option<Box<DeclProduction>>,
}

/// One link in a declarator's modifier chain.
///
/// The chain is a singly linked list, not a tree. Phase one of declarator
/// parsing inserts pointer/reference/qualifier links at the head (they read
/// right-to-left: `* const &` is "reference to const pointer"); phase two
/// extends array/function links in encounter order (they read left-to-right
/// after the declared name).
#[derive(Clone, Debug)]
pub struct DeclProduction {
    pub kind: DeclProductionKind,
    pub child: Option<Box<DeclProduction>>,
}

#[derive(Clone, Debug, IsVariant)]
pub enum DeclProductionKind {
    Parenthesized {
        open_paren: Token,
        close_paren: Option<Token>,
    },
    /// `*`, `&` or `&&`, optionally prefixed as in a pointer-to-member
    /// `Foo::*`.
    Indirection {
        prefix: Vec<Prefix>,
        punc: Token,
    },
    ArrayOf {
        open_square: Token,
        close_square: Option<Token>,
    },
    Function(FunctionProduction),
    Qualifier {
        keyword: Token,
    },
}

#[derive(Clone, Debug)]
pub struct FunctionProduction {
    pub open_paren: Token,
    pub params: Vec<Parameter>,
    pub close_paren: Option<Token>,
    pub qualifiers: Vec<Token>,
    pub arrow: Option<Token>,
    pub trailing_return_type: Option<TypeId>,
}

/// A function or template parameter. Abstract parameters leave `identifier`
/// empty: `void func(int, char*);`
#[derive(Clone, Debug, Default)]
pub struct Parameter {
    pub decl_specifiers: Vec<DeclSpecifier>,
    pub identifier: Option<Token>,
    pub production: Option<Box<DeclProduction>>,
    pub init: Initializer,
    pub comma: Option<Token>,
}

/// A declarator together with its optional initializer. Multiple init
/// declarators can share one decl-specifier sequence: `int x, y;`
#[derive(Clone, Debug, Default)]
pub struct InitDeclarator {
    pub qid: QualifiedId,
    pub production: Option<Box<DeclProduction>>,
    pub init: Initializer,
    pub comma: Option<Token>,
}

#[derive(Clone, Debug, Default, IsVariant)]
pub enum Initializer {
    #[default]
    None,
    Assignment(Assignment),
    FunctionBody(FunctionBody),
    BitField(BitField),
}

#[derive(Clone, Debug, Default)]
pub struct Assignment {
    pub equal_sign: Option<Token>,
    pub value: AssignedValue,
}

#[derive(Clone, Debug, Default)]
pub enum AssignedValue {
    #[default]
    None,
    Expression(Box<Expression>),
    Type(TypeId),
}

#[derive(Clone, Debug, Default)]
pub struct FunctionBody {
    pub colon: Option<Token>,
    pub member_inits: Vec<MemberInitializer>,
    pub open_curly: Option<Token>,
    pub statements: Vec<Statement>,
    pub close_curly: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct MemberInitializer {
    pub qid: QualifiedId,
    pub open: Option<Token>,
    pub expr: Option<Box<Expression>>,
    pub close: Option<Token>,
    pub comma: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct BitField {
    pub colon: Token,
    pub width: Option<Box<Expression>>,
}
