use crate::Parser;
use cpp_ast::{
    AssignedValue, DeclProduction, DeclProductionKind, DeclSpecifier, Declaration,
    DeclarationBody, InitDeclarator, Initializer,
};
use cpp_token::Token;
use itertools::Itertools;
use std::fmt::Write;
use std::path::Path;

struct DumpContext<'a> {
    parser: &'a Parser,
    indent_level: usize,
}

impl DumpContext<'_> {
    fn indent(&self) -> String {
        "  ".repeat(self.indent_level)
    }

    // "filename(line)" with the directory part stripped, matching how the
    // dump is read alongside an editor.
    fn format_loc(&self, token: Option<&Token>) -> String {
        let Some(token) = token else {
            return "?".to_string();
        };
        let location = self.parser.get_file_location(token.input_offset);
        let filename = Path::new(&location.abs_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(location.abs_path);
        format!("{}({})", filename, location.line)
    }
}

fn dump_decl_specifier(
    ctx: &mut DumpContext,
    out: &mut String,
    decl_specifier: &DeclSpecifier,
) -> std::fmt::Result {
    match decl_specifier {
        DeclSpecifier::Keyword(token) => {
            writeln!(out, "{}Keyword '{}'", ctx.indent(), token.text)?;
        }
        DeclSpecifier::Linkage { literal, .. } => {
            writeln!(out, "{}Linkage '{}'", ctx.indent(), literal.text)?;
        }
        DeclSpecifier::Class(class_spec) => {
            writeln!(
                out,
                "{}Class {} '{}'",
                ctx.indent(),
                class_spec.keyword.text,
                class_spec.qid
            )?;
            if !class_spec.virt_specifiers.is_empty() {
                writeln!(
                    out,
                    "{}  virt_specifiers: {}",
                    ctx.indent(),
                    class_spec
                        .virt_specifiers
                        .iter()
                        .map(|token| token.text.as_str())
                        .format(" ")
                )?;
            }
            if !class_spec.base_specifiers.is_empty() {
                writeln!(
                    out,
                    "{}  base_specifiers:{}",
                    ctx.indent(),
                    class_spec.base_specifiers.iter().format_with(",", |base, f| {
                        let access = base
                            .access_spec
                            .as_ref()
                            .map(|token| token.text.as_str())
                            .unwrap_or("");
                        f(&format_args!(" {} {}", access, base.base_qid))
                    })
                )?;
            }
            ctx.indent_level += 1;
            for declaration in &class_spec.member_decls {
                dump_declaration(ctx, out, declaration)?;
            }
            ctx.indent_level -= 1;
        }
        DeclSpecifier::Enum(enum_spec) => {
            writeln!(
                out,
                "{}Enum{}{} '{}'",
                ctx.indent(),
                if enum_spec.class_keyword.is_some() { " " } else { "" },
                enum_spec
                    .class_keyword
                    .as_ref()
                    .map(|token| token.text.as_str())
                    .unwrap_or(""),
                enum_spec.qid
            )?;
            if !enum_spec.base.is_empty() {
                writeln!(out, "{}  base: '{}'", ctx.indent(), enum_spec.base)?;
            }
            for enumerator in &enum_spec.enumerators {
                writeln!(out, "{}  '{}'", ctx.indent(), enumerator.name.text)?;
            }
        }
        DeclSpecifier::TypeSpecifier(type_spec) => {
            writeln!(out, "{}TypeSpecifier '{}'", ctx.indent(), type_spec.qid)?;
        }
        DeclSpecifier::TypeParameter(type_param) => {
            writeln!(
                out,
                "{}TypeParameter '{}'",
                ctx.indent(),
                type_param.keyword.text
            )?;
        }
        DeclSpecifier::Ellipsis(_) => {
            writeln!(out, "{}Ellipsis", ctx.indent())?;
        }
    }
    Ok(())
}

fn dump_production(
    ctx: &mut DumpContext,
    out: &mut String,
    production: Option<&DeclProduction>,
) -> std::fmt::Result {
    let Some(production) = production else {
        return Ok(());
    };

    match &production.kind {
        DeclProductionKind::Parenthesized { .. } => {
            writeln!(out, "{}Parenthesized", ctx.indent())?;
        }
        DeclProductionKind::Indirection { punc, .. } => {
            writeln!(out, "{}Indirection '{}'", ctx.indent(), punc.to_str())?;
        }
        DeclProductionKind::ArrayOf { .. } => {
            writeln!(out, "{}ArrayOf", ctx.indent())?;
        }
        DeclProductionKind::Function(function) => {
            writeln!(out, "{}Function", ctx.indent())?;
            ctx.indent_level += 1;
            for param in &function.params {
                writeln!(
                    out,
                    "{}Parameter '{}'",
                    ctx.indent(),
                    param
                        .identifier
                        .as_ref()
                        .map(|token| token.text.as_str())
                        .unwrap_or("")
                )?;
                ctx.indent_level += 1;
                for decl_specifier in &param.decl_specifiers {
                    dump_decl_specifier(ctx, out, decl_specifier)?;
                }
                dump_production(ctx, out, param.production.as_deref())?;
                ctx.indent_level -= 1;
            }
            ctx.indent_level -= 1;
        }
        DeclProductionKind::Qualifier { keyword } => {
            writeln!(out, "{}Qualifier '{}'", ctx.indent(), keyword.text)?;
        }
    }

    ctx.indent_level += 1;
    dump_production(ctx, out, production.child.as_deref())?;
    ctx.indent_level -= 1;
    Ok(())
}

fn dump_init_declarator(
    ctx: &mut DumpContext,
    out: &mut String,
    init_declarator: &InitDeclarator,
) -> std::fmt::Result {
    writeln!(out, "{}InitDeclarator '{}'", ctx.indent(), init_declarator.qid)?;
    ctx.indent_level += 1;
    dump_production(ctx, out, init_declarator.production.as_deref())?;
    ctx.indent_level -= 1;

    match &init_declarator.init {
        Initializer::None => (),
        Initializer::Assignment(assignment) => match &assignment.value {
            AssignedValue::Type(type_id) => {
                writeln!(out, "{}Assignment (type_id)", ctx.indent())?;
                ctx.indent_level += 1;
                for decl_specifier in &type_id.decl_specifiers {
                    dump_decl_specifier(ctx, out, decl_specifier)?;
                }
                dump_production(ctx, out, type_id.abstract_declarator.as_deref())?;
                ctx.indent_level -= 1;
            }
            _ => {
                writeln!(out, "{}Assignment (expression)", ctx.indent())?;
            }
        },
        Initializer::FunctionBody(function_body) => {
            writeln!(out, "{}FunctionBody", ctx.indent())?;
            ctx.indent_level += 1;
            for member_init in &function_body.member_inits {
                writeln!(out, "{}MemberInitializer '{}'", ctx.indent(), member_init.qid)?;
            }
            ctx.indent_level -= 1;
        }
        Initializer::BitField(_) => {
            writeln!(out, "{}BitField", ctx.indent())?;
        }
    }
    Ok(())
}

fn dump_declaration(
    ctx: &mut DumpContext,
    out: &mut String,
    declaration: &Declaration,
) -> std::fmt::Result {
    match &declaration.body {
        DeclarationBody::Linkage(linkage) => {
            writeln!(
                out,
                "{}{}: Linkage '{}'",
                ctx.indent(),
                ctx.format_loc(Some(&linkage.extern_keyword)),
                linkage.literal.text
            )?;
            ctx.indent_level += 1;
            for child in &linkage.child_decls {
                dump_declaration(ctx, out, child)?;
            }
            ctx.indent_level -= 1;
        }
        DeclarationBody::Namespace(namespace) => {
            writeln!(
                out,
                "{}{}: Namespace '{}'",
                ctx.indent(),
                ctx.format_loc(Some(&namespace.keyword)),
                namespace.qid
            )?;
            ctx.indent_level += 1;
            for child in &namespace.child_decls {
                dump_declaration(ctx, out, child)?;
            }
            ctx.indent_level -= 1;
        }
        DeclarationBody::Entity(entity) => {
            writeln!(
                out,
                "{}{}: Entity",
                ctx.indent(),
                ctx.format_loc(entity.first_token())
            )?;
            ctx.indent_level += 1;
            for decl_specifier in &entity.decl_specifiers {
                dump_decl_specifier(ctx, out, decl_specifier)?;
            }
            for init_declarator in &entity.init_declarators {
                dump_init_declarator(ctx, out, init_declarator)?;
            }
            ctx.indent_level -= 1;
        }
        DeclarationBody::Template(template) => {
            writeln!(
                out,
                "{}{}: Template",
                ctx.indent(),
                ctx.format_loc(Some(&template.keyword))
            )?;
            if let Some(child) = &template.child {
                ctx.indent_level += 1;
                dump_declaration(ctx, out, child)?;
                ctx.indent_level -= 1;
            }
        }
        DeclarationBody::TypeAlias(alias) => {
            writeln!(
                out,
                "{}{}: TypeAlias '{}'",
                ctx.indent(),
                ctx.format_loc(Some(&alias.using_keyword)),
                alias.name.text
            )?;
            ctx.indent_level += 1;
            for decl_specifier in &alias.type_id.decl_specifiers {
                dump_decl_specifier(ctx, out, decl_specifier)?;
            }
            dump_production(ctx, out, alias.type_id.abstract_declarator.as_deref())?;
            ctx.indent_level -= 1;
        }
        DeclarationBody::UsingNamespace(using) => {
            writeln!(
                out,
                "{}{}: UsingNamespace '{}'",
                ctx.indent(),
                ctx.format_loc(Some(&using.using_keyword)),
                using.qid
            )?;
        }
        DeclarationBody::StaticAssert(static_assert) => {
            writeln!(
                out,
                "{}{}: StaticAssert",
                ctx.indent(),
                ctx.format_loc(Some(&static_assert.keyword))
            )?;
        }
        DeclarationBody::AccessSpecifier(access) => {
            writeln!(
                out,
                "{}{}: AccessSpecifier '{}'",
                ctx.indent(),
                ctx.format_loc(Some(&access.keyword)),
                access.keyword.text
            )?;
        }
        DeclarationBody::Empty => {
            writeln!(
                out,
                "{}{}: Declaration (empty)",
                ctx.indent(),
                ctx.format_loc(declaration.semicolon.as_ref())
            )?;
        }
    }
    Ok(())
}

impl Parser {
    /// Renders an indented debug dump of a declaration tree, one node per
    /// line, with each top-level node tagged by its source location.
    pub fn dump_declaration(&self, declaration: &Declaration) -> String {
        let mut out = String::new();
        let mut ctx = DumpContext {
            parser: self,
            indent_level: 0,
        };
        dump_declaration(&mut ctx, &mut out, declaration).expect("formatting a dump never fails");
        out
    }
}
