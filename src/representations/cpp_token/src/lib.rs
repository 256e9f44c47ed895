use derive_more::IsVariant;
use std::fmt::Display;

/// One token of C++ source. `text` is the verbatim bytes the token was
/// read from (punctuation included), except for tokens synthesized across
/// line continuations, whose text is re-joined.
///
/// `input_offset` is a position in the logical input-offset space: the
/// conceptual concatenation of the top-level file, every included file, and
/// every macro expansion, in the order they are encountered.
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub input_offset: u32,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, input_offset: u32, text: String) -> Self {
        Self {
            kind,
            input_offset,
            text,
        }
    }

    pub fn is_end_of_file(&self) -> bool {
        self.kind.is_eof()
    }

    pub fn end_offset(&self) -> u32 {
        self.input_offset + self.text.len() as u32
    }

    /// Rendering used when quoting the token inside diagnostics.
    pub fn to_str(&self) -> &str {
        match self.kind {
            TokenKind::Eof => "end-of-file",
            TokenKind::Unrecognized
            | TokenKind::Whitespace
            | TokenKind::Identifier
            | TokenKind::StringLiteral
            | TokenKind::NumericLiteral
            | TokenKind::PreprocessorDirective => &self.text,
            kind => kind.punctuation_str(),
        }
    }
}

// Tokens compare by position and classification only; the text is implied
// by those two for any tokens originating from the same parse.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.input_offset == other.input_offset && self.kind == other.kind
    }
}

impl Eq for Token {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum TokenKind {
    Eof,
    Unrecognized,
    Whitespace,
    CStyleComment,
    LineComment,
    PreprocessorDirective,
    StringLiteral,
    NumericLiteral,
    Identifier,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,
    OpenAngle,
    CloseAngle,
    LessThanOrEqual,
    GreaterThanOrEqual,
    OpenSquare,
    CloseSquare,
    Semicolon,
    SingleColon,
    DoubleColon,
    SingleEqual,
    DoubleEqual,
    NotEqual,
    PlusEqual,
    MinusEqual,
    Arrow,
    StarEqual,
    SlashEqual,
    Comma,
    QuestionMark,
    ForwardSlash,
    Star,
    Percent,
    SingleAmpersand,
    DoubleAmpersand,
    SingleVerticalBar,
    DoubleVerticalBar,
    SinglePlus,
    DoublePlus,
    SingleMinus,
    DoubleMinus,
    LeftShift,
    RightShift,
    Dot,
    Tilde,
    Caret,
    Hash,
    DoubleHash,
    Bang,
    Ellipsis,
}

impl TokenKind {
    pub fn at(self, input_offset: u32, text: impl Into<String>) -> Token {
        Token::new(self, input_offset, text.into())
    }

    /// The closing punctuation matching an opening bracket kind.
    pub fn closing(self) -> Option<TokenKind> {
        match self {
            TokenKind::OpenCurly => Some(TokenKind::CloseCurly),
            TokenKind::OpenParen => Some(TokenKind::CloseParen),
            TokenKind::OpenAngle => Some(TokenKind::CloseAngle),
            TokenKind::OpenSquare => Some(TokenKind::CloseSquare),
            _ => None,
        }
    }

    pub fn punctuation_str(self) -> &'static str {
        match self {
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenAngle => "<",
            TokenKind::CloseAngle => ">",
            TokenKind::LessThanOrEqual => "<=",
            TokenKind::GreaterThanOrEqual => ">=",
            TokenKind::OpenSquare => "[",
            TokenKind::CloseSquare => "]",
            TokenKind::Semicolon => ";",
            TokenKind::SingleColon => ":",
            TokenKind::DoubleColon => "::",
            TokenKind::SingleEqual => "=",
            TokenKind::DoubleEqual => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::Arrow => "->",
            TokenKind::StarEqual => "*=",
            TokenKind::SlashEqual => "/=",
            TokenKind::Comma => ",",
            TokenKind::QuestionMark => "?",
            TokenKind::ForwardSlash => "/",
            TokenKind::Star => "*",
            TokenKind::Percent => "%",
            TokenKind::SingleAmpersand => "&",
            TokenKind::DoubleAmpersand => "&&",
            TokenKind::SingleVerticalBar => "|",
            TokenKind::DoubleVerticalBar => "||",
            TokenKind::SinglePlus => "+",
            TokenKind::DoublePlus => "++",
            TokenKind::SingleMinus => "-",
            TokenKind::DoubleMinus => "--",
            TokenKind::LeftShift => "<<",
            TokenKind::RightShift => ">>",
            TokenKind::Dot => ".",
            TokenKind::Tilde => "~",
            TokenKind::Caret => "^",
            TokenKind::Hash => "#",
            TokenKind::DoubleHash => "##",
            TokenKind::Bang => "!",
            TokenKind::Ellipsis => "...",
            TokenKind::LineComment => "//",
            TokenKind::CStyleComment => "/*",
            _ => "???",
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_text() {
        let a = TokenKind::Identifier.at(10, "foo");
        let b = TokenKind::Identifier.at(10, "bar");
        let c = TokenKind::Identifier.at(11, "foo");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, TokenKind::NumericLiteral.at(10, "foo"));
    }

    #[test]
    fn punctuation_renders_from_table() {
        let token = TokenKind::DoubleColon.at(0, "::");
        assert_eq!(token.to_str(), "::");
        assert_eq!(TokenKind::Eof.at(0, "").to_str(), "end-of-file");
    }
}
