use crate::Parser;
use crate::error::Severity;
use crate::parse_declarator::DeclaratorFlags;
use crate::parse_qualified_id::ParseQualifiedMode;
use cpp_ast::{
    ConversionFunc, DeclProduction, DeclProductionKind, DeclSpecifier, TypeId, TypeSpecifier,
};
use cpp_token::TokenKind;

impl Parser {
    pub(crate) fn parse_type_id(&mut self) -> TypeId {
        let mut result = TypeId::default();
        let mut got_type_specifier = false;

        loop {
            let token = self.peek();
            if !token.kind.is_identifier() {
                // We should have parsed a type specifier by now.
                if !got_type_specifier {
                    self.error(
                        token.input_offset,
                        &format!("expected type specifier before '{}'", token.to_str()),
                    );
                }
                break;
            }

            if token.text == "const" || token.text == "volatile" {
                self.mute_errors = false;
                self.advance();
                result.decl_specifiers.push(DeclSpecifier::Keyword(token));
            } else {
                if !got_type_specifier {
                    self.mute_errors = false;
                } else {
                    self.error(token.input_offset, "type-id cannot have a name");
                }
                got_type_specifier = true;

                let mut elaborate_keyword = None;
                if matches!(
                    token.text.as_str(),
                    "typename" | "struct" | "class" | "union" | "enum"
                ) {
                    self.advance();
                    elaborate_keyword = Some(token);
                }
                let qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
                // Words like `static` never begin a qualified-id; without
                // this check they would never be consumed here.
                let no_progress = elaborate_keyword.is_none() && qid.is_empty();
                result
                    .decl_specifiers
                    .push(DeclSpecifier::TypeSpecifier(TypeSpecifier {
                        elaborate_keyword,
                        qid,
                        was_assumed: false,
                    }));
                if no_progress {
                    break;
                }
            }
        }

        // Optional abstract declarator.
        let declarator = self.parse_declarator(None, DeclaratorFlags::ALLOW_ABSTRACT);
        debug_assert!(declarator.qid.is_empty());
        result.abstract_declarator = declarator.production;
        result
    }

    // Consumes as much as it can; unrecognized tokens are returned to the
    // caller without logging an error.
    pub(crate) fn parse_conversion_type_id(&mut self, conv: &mut ConversionFunc) {
        let mut got_type_specifier = false;
        loop {
            let token = self.peek();
            if !token.kind.is_identifier() {
                break;
            }

            if token.text == "const" || token.text == "volatile" {
                self.advance();
                conv.decl_specifiers.push(DeclSpecifier::Keyword(token));
            } else {
                let qid = self.parse_qualified_id(ParseQualifiedMode::RequireComplete);
                if qid.is_empty() {
                    break;
                }
                if got_type_specifier {
                    // Not a breaking error; ignore it and continue from here.
                    let offset = qid
                        .first_token()
                        .map(|token| token.input_offset)
                        .unwrap_or(token.input_offset);
                    self.error_no_mute(Severity::Error, offset, "too many type specifiers");
                } else {
                    got_type_specifier = true;
                    conv.decl_specifiers
                        .push(DeclSpecifier::TypeSpecifier(TypeSpecifier {
                            elaborate_keyword: None,
                            qid,
                            was_assumed: false,
                        }));
                }
            }
        }

        // The limited abstract declarator part: only indirections and
        // cv-qualifiers are allowed in a conversion-type-id.
        let mut allow_qualifier = false;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Star | TokenKind::SingleAmpersand | TokenKind::DoubleAmpersand => {
                    self.advance();
                    allow_qualifier = token.kind.is_star();
                    conv.abstract_declarator = Some(Box::new(DeclProduction {
                        kind: DeclProductionKind::Indirection {
                            prefix: Vec::new(),
                            punc: token,
                        },
                        child: conv.abstract_declarator.take(),
                    }));
                }
                TokenKind::Identifier if token.text == "const" || token.text == "volatile" => {
                    self.advance();
                    if !allow_qualifier {
                        // Not a breaking error; ignore it and continue.
                        self.error_no_mute(
                            Severity::Error,
                            token.input_offset,
                            &format!("'{}' qualifier not allowed here", token.text),
                        );
                    }
                    conv.abstract_declarator = Some(Box::new(DeclProduction {
                        kind: DeclProductionKind::Qualifier { keyword: token },
                        child: conv.abstract_declarator.take(),
                    }));
                }
                _ => break,
            }
        }
    }
}
