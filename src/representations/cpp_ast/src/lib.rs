//! Syntax tree for the supported C++ subset.
//!
//! The tree is built once by the parser and is immutable afterwards; its
//! read-only consumers are the syntax highlighter and the tree dumper. Every
//! node owns its children exclusively, so there is no sharing and there are
//! no cycles. Omitted or unparsable pieces are represented by `None` tokens
//! and empty variants rather than sentinel values.

mod decl;
mod declarator;
mod expr;
mod qid;
mod span;
mod specifier;

pub use decl::{
    AccessSpecifierDecl, Declaration, DeclarationBody, EntityDecl, LinkageDecl, NamespaceDecl,
    StaticAssertDecl, TemplateDecl, TypeAliasDecl, UsingNamespaceDecl,
};
pub use declarator::{
    Assignment, AssignedValue, BitField, DeclProduction, DeclProductionKind, FunctionBody,
    FunctionProduction, InitDeclarator, Initializer, MemberInitializer, Parameter, TypeId,
};
pub use expr::{Expression, Statement};
pub use qid::{
    ConversionFunc, Decltype, Destructor, Identifier, OperatorFunc, Prefix, PrefixSegment,
    QualifiedId, QualifiedName, TemplateArg, TemplateArgValue, TemplateId,
};
pub use span::{Color, TokenSpan};
pub use specifier::{
    BaseSpecifier, ClassSpecifier, DeclSpecifier, EnumSpecifier, Enumerator, TypeParameter,
    TypeSpecifier,
};
