use crate::Parser;
use crate::error::Severity;
use crate::parse_qualified_id::ParseQualifiedMode;
use cpp_ast::{DeclProduction, DeclProductionKind, QualifiedId};
use cpp_token::TokenKind;

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub(crate) struct DeclaratorFlags: u32 {
        const ALLOW_NAMED = 1;
        const ALLOW_ABSTRACT = 2;
    }
}

/// A parsed declarator: the optional declared name plus the head of its
/// production chain.
#[derive(Default)]
pub(crate) struct Declarator {
    pub production: Option<Box<DeclProduction>>,
    pub qid: QualifiedId,
}

impl Parser {
    /// Parses a declarator in two phases.
    ///
    /// Phase one reads pointer/reference symbols and cv-qualifiers,
    /// inserting productions at the *head* of the chain so they read
    /// right-to-left: `* const &` becomes "reference to const pointer".
    /// Pointers may carry nested-name prefixes (pointer-to-member
    /// `Foo::*`). An open parenthesis is first tried as a function
    /// parameter list (when abstract declarators are allowed), falling back
    /// to a nested declarator; a parsed qualified-id names the declarator
    /// and ends the phase.
    ///
    /// Phase two reads trailing array subscripts and function parameter
    /// lists, which read left-to-right after the name: `[]()` is "array of
    /// functions". Those productions are collected in encounter order and
    /// spliced in front of the phase-one chain.
    ///
    /// When bad tokens are encountered, they are consumed until reaching a
    /// token an outer scope accepts. The first bad token mutes diagnostics;
    /// they stay muted until the next good token, and may still be muted on
    /// return (for example when an outer `}` forces an early exit).
    pub(crate) fn parse_declarator(
        &mut self,
        nested: Option<Box<DeclProduction>>,
        flags: DeclaratorFlags,
    ) -> Declarator {
        let mut declarator = Declarator {
            production: nested,
            qid: QualifiedId::default(),
        };
        let mut allow_qualifier = false;
        let mut expecting_qualified_id = false;
        // Phase-two productions (plus a phase-one function parameter list if
        // speculation succeeds), spliced before the phase-one chain at the
        // end.
        let mut trailing: Vec<DeclProduction> = Vec::new();

        // Phase one.
        loop {
            let qid = self.parse_qualified_id(ParseQualifiedMode::AllowIncomplete);
            if !qid.name.is_none() {
                if !flags.contains(DeclaratorFlags::ALLOW_NAMED) {
                    let offset = qid
                        .first_token()
                        .expect("named qualified-id has a token")
                        .input_offset;
                    self.error_no_mute(Severity::Error, offset, "type-id cannot have a name");
                }
                declarator.qid = qid;
                break;
            }
            // The name is empty, but qid.prefix may be a pointer-to-member
            // prefix.

            let token = self.next();
            if token.kind.is_open_paren() {
                if !qid.prefix.is_empty() {
                    self.error_no_mute(
                        Severity::Error,
                        token.input_offset,
                        &format!("'{}' cannot have a nested name prefix", token.to_str()),
                    );
                }
                self.mute_errors = false;

                if flags.contains(DeclaratorFlags::ALLOW_ABSTRACT) {
                    // Try a function parameter list first.
                    self.push_back();
                    let restore_point = self.open_restore_point();
                    let function = self.parse_parameter_list();
                    if !self.error_occurred(&restore_point) {
                        let mut function = function.expect("parameter list parsed cleanly");
                        self.commit(restore_point);
                        // Errors in the trailing return type no longer
                        // backtrack.
                        self.parse_optional_trailing_return_type(&mut function);
                        trailing.push(DeclProduction {
                            kind: DeclProductionKind::Function(function),
                            child: None,
                        });
                        break;
                    }
                    self.backtrack(restore_point);
                    self.advance();
                }

                // Parse it as a nested declarator.
                let inner_chain = declarator.production.take();
                let target = self.parse_declarator(inner_chain, flags);
                declarator.production = Some(Box::new(DeclProduction {
                    kind: DeclProductionKind::Parenthesized {
                        open_paren: token.clone(),
                        close_paren: None,
                    },
                    child: target.production,
                }));
                debug_assert!(declarator.qid.is_empty());
                declarator.qid = target.qid;

                match self.close_scope(&token) {
                    Some(close_token) => {
                        if let DeclProductionKind::Parenthesized { close_paren, .. } =
                            &mut declarator.production.as_mut().unwrap().kind
                        {
                            *close_paren = Some(close_token);
                        }
                    }
                    None => return declarator,
                }
                break;
            }

            if !qid.prefix.is_empty() && !token.kind.is_star() {
                self.error_no_mute(
                    Severity::Error,
                    token.input_offset,
                    &format!("'{}' cannot have a nested name prefix", token.to_str()),
                );
            }

            match token.kind {
                TokenKind::Star | TokenKind::SingleAmpersand | TokenKind::DoubleAmpersand => {
                    self.mute_errors = false;
                    allow_qualifier = token.kind.is_star();
                    declarator.production = Some(Box::new(DeclProduction {
                        kind: DeclProductionKind::Indirection {
                            prefix: qid.prefix,
                            punc: token,
                        },
                        child: declarator.production.take(),
                    }));
                }
                TokenKind::Ellipsis => {
                    // Parameter packs are consumed without a production rule.
                    self.mute_errors = false;
                }
                TokenKind::Identifier => {
                    // Only cv-qualifiers and friends reach here; anything
                    // else was absorbed by the qualified-id parse.
                    if !allow_qualifier {
                        self.error_no_mute(
                            Severity::Error,
                            token.input_offset,
                            &format!("'{}' qualifier not allowed here", token.text),
                        );
                    }
                    self.mute_errors = false;
                    declarator.production = Some(Box::new(DeclProduction {
                        kind: DeclProductionKind::Qualifier { keyword: token },
                        child: declarator.production.take(),
                    }));
                }
                _ => {
                    // End of phase one. Empty declarators are allowed even
                    // without ALLOW_ABSTRACT so that definitions like
                    // `struct Foo {};` don't log an error: a missing name is
                    // only an error once some production exists.
                    if !flags.contains(DeclaratorFlags::ALLOW_ABSTRACT) {
                        if declarator.production.is_some() {
                            self.error(
                                token.input_offset,
                                &format!("expected qualified-id before '{}'", token.to_str()),
                            );
                        } else {
                            expecting_qualified_id = true;
                        }
                    }
                    self.push_back();
                    break;
                }
            }
        }

        // Phase two.
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::OpenSquare => {
                    self.advance();
                    self.mute_errors = false;
                    if expecting_qualified_id {
                        self.error(
                            token.input_offset,
                            &format!("expected qualified-id before '{}'", token.to_str()),
                        );
                        expecting_qualified_id = false;
                    }

                    trailing.push(DeclProduction {
                        kind: DeclProductionKind::ArrayOf {
                            open_square: token.clone(),
                            close_square: None,
                        },
                        child: None,
                    });
                    self.parse_expression(true);

                    match self.close_scope(&token) {
                        Some(close_token) => {
                            if let DeclProductionKind::ArrayOf { close_square, .. } =
                                &mut trailing.last_mut().unwrap().kind
                            {
                                *close_square = Some(close_token);
                            }
                        }
                        None => break,
                    }
                }
                TokenKind::OpenParen => {
                    self.mute_errors = false;
                    if expecting_qualified_id {
                        self.error(
                            token.input_offset,
                            &format!("expected qualified-id before '{}'", token.to_str()),
                        );
                        expecting_qualified_id = false;
                    }

                    if let Some(mut function) = self.parse_parameter_list() {
                        self.parse_optional_trailing_return_type(&mut function);
                        trailing.push(DeclProduction {
                            kind: DeclProductionKind::Function(function),
                            child: None,
                        });
                    }
                }
                _ => break,
            }
        }

        // Splice the trailing sub-chain in front of the phase-one chain.
        let mut chain = declarator.production.take();
        for mut production in trailing.into_iter().rev() {
            production.child = chain;
            chain = Some(Box::new(production));
        }
        declarator.production = chain;
        declarator
    }
}
