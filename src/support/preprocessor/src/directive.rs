/// A recognized preprocessor directive, parsed from the directive line's
/// text with the leading `#` already stripped.
///
/// Only `#include` and `#define` are modeled; everything else is passed
/// through as `Other` and ignored. `#include <...>` is not distinguished
/// from `#include "..."`: the operand is taken by stripping one leading and
/// one trailing delimiter character.
#[derive(Debug, PartialEq, Eq)]
pub enum Directive<'a> {
    Include { operand: &'a str },
    Define { name: &'a str, body: &'a str },
    Other,
}

impl<'a> Directive<'a> {
    pub fn parse(text: &'a str) -> Self {
        let text = text.trim_start();
        let (command, rest) = split_identifier(text);

        match command {
            "include" => {
                let operand = rest.trim();
                if operand.len() < 2 {
                    return Directive::Other;
                }
                Directive::Include {
                    operand: &operand[1..operand.len() - 1],
                }
            }
            "define" => {
                let (name, body) = split_identifier(rest.trim_start());
                if name.is_empty() {
                    return Directive::Other;
                }
                Directive::Define {
                    name,
                    body: body.trim(),
                }
            }
            _ => Directive::Other,
        }
    }
}

fn split_identifier(text: &str) -> (&str, &str) {
    let end = text
        .bytes()
        .position(|c| !(c.is_ascii_alphanumeric() || c == b'_' || c == b'$'))
        .unwrap_or(text.len());
    text.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_quoted_and_angled() {
        assert_eq!(
            Directive::parse("include \"x.h\""),
            Directive::Include { operand: "x.h" }
        );
        assert_eq!(
            Directive::parse("include <vector>"),
            Directive::Include { operand: "vector" }
        );
    }

    #[test]
    fn define_with_and_without_body() {
        assert_eq!(
            Directive::parse("define COUNT 32"),
            Directive::Define {
                name: "COUNT",
                body: "32"
            }
        );
        assert_eq!(
            Directive::parse("define EMPTY"),
            Directive::Define {
                name: "EMPTY",
                body: ""
            }
        );
    }

    #[test]
    fn unknown_directives_ignored() {
        assert_eq!(Directive::parse("pragma once"), Directive::Other);
        assert_eq!(Directive::parse("define"), Directive::Other);
        assert_eq!(Directive::parse("include x"), Directive::Other);
    }
}
