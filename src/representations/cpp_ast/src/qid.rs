use crate::declarator::{DeclProduction, TypeId};
use crate::expr::Expression;
use crate::specifier::DeclSpecifier;
use cpp_token::Token;
use derive_more::IsVariant;
use std::fmt::Display;

/// The name of a function, variable, type or template, corresponding to
/// _qualified-id_ in the grammar:
///
/// ```text
///     x
///     Foo::x
///     Foo::Bar::x
///     Foo::operator int
///     Foo::~Foo
/// ```
#[derive(Clone, Debug, Default)]
pub struct QualifiedId {
    pub prefix: Vec<Prefix>,
    pub name: QualifiedName,
}

/// One `A::` component of a qualified-id's nested-name prefix.
#[derive(Clone, Debug)]
pub struct Prefix {
    pub segment: PrefixSegment,
    pub double_colon: Option<Token>,
}

#[derive(Clone, Debug)]
pub enum PrefixSegment {
    Identifier(Identifier),
    TemplateId(TemplateId),
    Decltype(Decltype),
}

#[derive(Clone, Debug)]
pub struct Identifier {
    pub name: Token,
}

#[derive(Clone, Debug)]
pub struct TemplateId {
    pub name: Token,
    pub open_angle: Option<Token>,
    pub args: Vec<TemplateArg>,
    pub close_angle: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub struct TemplateArg {
    pub value: TemplateArgValue,
    pub comma: Option<Token>,
}

#[derive(Clone, Debug, Default)]
pub enum TemplateArgValue {
    #[default]
    None,
    Expression(Box<Expression>),
    Type(TypeId),
}

#[derive(Clone, Debug)]
pub struct Decltype {
    pub keyword: Token,
    pub open_paren: Option<Token>,
    pub close_paren: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct Destructor {
    pub tilde: Token,
    pub name: Token,
}

#[derive(Clone, Debug)]
pub struct OperatorFunc {
    pub keyword: Token,
    pub punc: Option<Token>,
    pub punc2: Option<Token>,
}

#[derive(Clone, Debug)]
pub struct ConversionFunc {
    pub operator_keyword: Token,
    pub decl_specifiers: Vec<DeclSpecifier>,
    pub abstract_declarator: Option<Box<DeclProduction>>,
}

#[derive(Clone, Debug, Default, IsVariant)]
pub enum QualifiedName {
    #[default]
    None,
    Identifier(Identifier),
    TemplateId(TemplateId),
    Decltype(Decltype),
    Destructor(Destructor),
    OperatorFunc(OperatorFunc),
    ConversionFunc(ConversionFunc),
}

impl QualifiedId {
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.name.is_none()
    }

    /// The plain name a class declaration introduces, used to recognize
    /// constructors among its members.
    pub fn class_name(&self) -> Option<&str> {
        match &self.name {
            QualifiedName::Identifier(identifier) => Some(&identifier.name.text),
            QualifiedName::TemplateId(template_id) => Some(&template_id.name.text),
            _ => None,
        }
    }

    pub fn ctor_dtor_name(&self) -> Option<&str> {
        match &self.name {
            QualifiedName::Identifier(identifier) => Some(&identifier.name.text),
            QualifiedName::Destructor(destructor) => Some(&destructor.name.text),
            QualifiedName::TemplateId(template_id) => Some(&template_id.name.text),
            _ => None,
        }
    }

    // Used when logging errors.
    pub fn first_token(&self) -> Option<&Token> {
        if let Some(prefix) = self.prefix.first() {
            return Some(match &prefix.segment {
                PrefixSegment::Identifier(identifier) => &identifier.name,
                PrefixSegment::TemplateId(template_id) => &template_id.name,
                PrefixSegment::Decltype(decltype) => &decltype.keyword,
            });
        }

        match &self.name {
            QualifiedName::None => None,
            QualifiedName::Identifier(identifier) => Some(&identifier.name),
            QualifiedName::TemplateId(template_id) => Some(&template_id.name),
            QualifiedName::Decltype(decltype) => Some(&decltype.keyword),
            QualifiedName::Destructor(destructor) => Some(&destructor.tilde),
            QualifiedName::OperatorFunc(op_func) => Some(&op_func.keyword),
            QualifiedName::ConversionFunc(conv_func) => Some(&conv_func.operator_keyword),
        }
    }
}

impl Display for QualifiedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for prefix in &self.prefix {
            match &prefix.segment {
                PrefixSegment::Identifier(identifier) => f.write_str(&identifier.name.text)?,
                PrefixSegment::TemplateId(template_id) => {
                    write!(f, "{}<>", template_id.name.text)?
                }
                PrefixSegment::Decltype(_) => f.write_str("decltype()")?,
            }
            f.write_str("::")?;
        }

        match &self.name {
            QualifiedName::None => f.write_str("(empty)"),
            QualifiedName::Identifier(identifier) => f.write_str(&identifier.name.text),
            QualifiedName::TemplateId(template_id) => write!(f, "{}<>", template_id.name.text),
            QualifiedName::Decltype(_) => f.write_str("decltype()"),
            QualifiedName::Destructor(destructor) => write!(f, "~{}", destructor.name.text),
            QualifiedName::OperatorFunc(op_func) => {
                f.write_str("operator")?;
                if let Some(punc) = &op_func.punc {
                    f.write_str(punc.to_str())?;
                }
                if let Some(punc2) = &op_func.punc2 {
                    f.write_str(punc2.to_str())?;
                }
                Ok(())
            }
            QualifiedName::ConversionFunc(_) => f.write_str("(conversion)"),
        }
    }
}
