use build_cpp_ast::Parser;
use cpp_ast::{
    DeclProduction, DeclProductionKind, DeclSpecifier, Declaration, DeclarationBody, EntityDecl,
    QualifiedName, TemplateArgValue,
};
use indoc::indoc;

fn parse(src: &str) -> build_cpp_ast::ParseResult {
    Parser::new().parse_file("/test/main.cpp", src)
}

fn entity(declaration: &Declaration) -> &EntityDecl {
    match &declaration.body {
        DeclarationBody::Entity(entity) => entity,
        other => panic!("expected an entity declaration, got {:?}", other),
    }
}

fn production_kinds(production: Option<&DeclProduction>) -> Vec<&'static str> {
    let mut kinds = Vec::new();
    let mut cursor = production;
    while let Some(production) = cursor {
        kinds.push(match &production.kind {
            DeclProductionKind::Parenthesized { .. } => "paren",
            DeclProductionKind::Indirection { punc, .. } => match punc.text.as_str() {
                "*" => "pointer",
                "&" => "ref",
                _ => "ref-ref",
            },
            DeclProductionKind::ArrayOf { .. } => "array",
            DeclProductionKind::Function(_) => "function",
            DeclProductionKind::Qualifier { keyword } => match keyword.text.as_str() {
                "const" => "const",
                _ => "qualifier",
            },
        });
        cursor = production.child.as_deref();
    }
    kinds
}

#[test]
fn constructor_inside_class_context() {
    let mut parser = Parser::new();
    let declaration = parser.parse_declaration("Foo(bar())", "Foo");

    assert!(parser.success(), "diagnostics: {:?}", parser.diagnostics());
    assert!(parser.diagnostics().is_empty());

    let entity = entity(&declaration);
    assert!(entity.decl_specifiers.is_empty());
    assert_eq!(entity.init_declarators.len(), 1);

    let ctor = &entity.init_declarators[0];
    assert_eq!(ctor.qid.to_string(), "Foo");
    let DeclProductionKind::Function(function) = &ctor.production.as_ref().unwrap().kind else {
        panic!("constructor declarator must be a function production");
    };
    assert_eq!(function.params.len(), 1);
}

#[test]
fn same_tokens_outside_class_context() {
    let mut parser = Parser::new();
    let declaration = parser.parse_declaration("Foo(bar())", "");

    // Without an enclosing class name, Foo is not a constructor: it becomes
    // the type specifier and the declarator names bar.
    let entity = entity(&declaration);
    assert_eq!(entity.decl_specifiers.len(), 1);
    let DeclSpecifier::TypeSpecifier(type_spec) = &entity.decl_specifiers[0] else {
        panic!("expected a type specifier");
    };
    assert_eq!(type_spec.qid.to_string(), "Foo");

    assert_eq!(entity.init_declarators.len(), 1);
    assert_eq!(entity.init_declarators[0].qid.to_string(), "bar");
}

#[test]
fn stray_comma_in_parameter_list_recovers() {
    let result = parse("void f(int a,, int b);\n");

    assert!(!result.success);
    assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);

    let entity = entity(&result.declarations[0]);
    let DeclProductionKind::Function(function) =
        &entity.init_declarators[0].production.as_ref().unwrap().kind
    else {
        panic!("expected a function declarator");
    };
    let names: Vec<&str> = function
        .params
        .iter()
        .filter_map(|param| param.identifier.as_ref())
        .map(|token| token.text.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn right_shift_splits_into_nested_template_args() {
    let result = parse("A<B<C>> x;\n");
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);

    let entity = entity(&result.declarations[0]);
    let DeclSpecifier::TypeSpecifier(type_spec) = &entity.decl_specifiers[0] else {
        panic!("expected a type specifier");
    };
    let QualifiedName::TemplateId(outer) = &type_spec.qid.name else {
        panic!("expected A<...> to be a template-id");
    };
    assert_eq!(outer.name.text, "A");
    assert!(outer.close_angle.is_some(), "outer > must be matched");

    assert_eq!(outer.args.len(), 1);
    let TemplateArgValue::Type(inner_type) = &outer.args[0].value else {
        panic!("expected a type template argument");
    };
    let DeclSpecifier::TypeSpecifier(inner_spec) = &inner_type.decl_specifiers[0] else {
        panic!("expected inner type specifier");
    };
    let QualifiedName::TemplateId(inner) = &inner_spec.qid.name else {
        panic!("expected B<C> to be a template-id");
    };
    assert_eq!(inner.name.text, "B");
    assert!(inner.close_angle.is_some(), "inner > must be matched");

    assert_eq!(entity.init_declarators[0].qid.to_string(), "x");
}

#[test]
fn declarators_read_outward() {
    {
        let result = parse("int * const & r;\n");
        assert!(result.success);
        let entity = entity(&result.declarations[0]);
        assert_eq!(
            production_kinds(entity.init_declarators[0].production.as_deref()),
            vec!["ref", "const", "pointer"],
            "reference to const pointer"
        );
    }

    {
        let result = parse("int (*fp)(int);\n");
        assert!(result.success, "diagnostics: {:?}", result.diagnostics);
        let entity = entity(&result.declarations[0]);
        assert_eq!(entity.init_declarators[0].qid.to_string(), "fp");
        assert_eq!(
            production_kinds(entity.init_declarators[0].production.as_deref()),
            vec!["function", "paren", "pointer"]
        );
    }

    {
        let result = parse("int x[3];\n");
        assert!(result.success);
        let entity = entity(&result.declarations[0]);
        assert_eq!(
            production_kinds(entity.init_declarators[0].production.as_deref()),
            vec!["array"]
        );
    }
}

#[test]
fn namespace_class_and_members() {
    let result = parse(indoc! {r#"
        namespace ui {

        class Button : public Widget {
        public:
            Button();
            ~Button();
            bool operator==(const Button& other) const;
            int width, height;
        };

        } // namespace ui
    "#});
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);

    let DeclarationBody::Namespace(namespace) = &result.declarations[0].body else {
        panic!("expected a namespace");
    };
    assert_eq!(namespace.qid.to_string(), "ui");
    assert_eq!(namespace.child_decls.len(), 1);

    let class_entity = entity(&namespace.child_decls[0]);
    let DeclSpecifier::Class(class_spec) = &class_entity.decl_specifiers[0] else {
        panic!("expected a class specifier");
    };
    assert_eq!(class_spec.qid.to_string(), "Button");
    assert_eq!(class_spec.base_specifiers.len(), 1);
    assert_eq!(class_spec.base_specifiers[0].base_qid.to_string(), "Widget");
    assert_eq!(class_spec.member_decls.len(), 5);

    // public: then ctor, dtor, operator==, and one entity declaring both
    // width and height.
    assert!(matches!(
        class_spec.member_decls[0].body,
        DeclarationBody::AccessSpecifier(_)
    ));
    let ctor = entity(&class_spec.member_decls[1]);
    assert_eq!(ctor.init_declarators[0].qid.to_string(), "Button");

    let dtor = entity(&class_spec.member_decls[2]);
    assert_eq!(dtor.init_declarators[0].qid.to_string(), "~Button");

    let op = entity(&class_spec.member_decls[3]);
    assert!(matches!(
        op.init_declarators[0].qid.name,
        QualifiedName::OperatorFunc(_)
    ));

    let fields = entity(&class_spec.member_decls[4]);
    assert_eq!(fields.init_declarators.len(), 2);
    assert_eq!(fields.init_declarators[0].qid.to_string(), "width");
    assert_eq!(fields.init_declarators[1].qid.to_string(), "height");
}

#[test]
fn scoped_enum_with_base_and_enumerators() {
    let result = parse("enum class Color : int { Red, Green = 5, Blue };\n");
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);

    let entity = entity(&result.declarations[0]);
    let DeclSpecifier::Enum(enum_spec) = &entity.decl_specifiers[0] else {
        panic!("expected an enum specifier");
    };
    assert!(enum_spec.class_keyword.is_some());
    assert_eq!(enum_spec.qid.to_string(), "Color");
    assert_eq!(enum_spec.base.to_string(), "int");

    let names: Vec<&str> = enum_spec
        .enumerators
        .iter()
        .map(|enumerator| enumerator.name.text.as_str())
        .collect();
    assert_eq!(names, vec!["Red", "Green", "Blue"]);
    assert!(enum_spec.enumerators[1].init.is_assignment());
    assert!(enum_spec.close_curly.is_some());
}

#[test]
fn template_declarations() {
    let result = parse(indoc! {r#"
        template <typename T, int N>
        struct FixedArray {
            T items[N];
        };
    "#});
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);

    let DeclarationBody::Template(template) = &result.declarations[0].body else {
        panic!("expected a template declaration");
    };
    assert_eq!(template.params.len(), 2);
    assert_eq!(
        template.params[0].identifier.as_ref().unwrap().text,
        "T"
    );
    assert_eq!(
        template.params[1].identifier.as_ref().unwrap().text,
        "N"
    );

    let child = entity(template.child.as_ref().unwrap());
    assert!(child.decl_specifiers[0].is_class());
}

#[test]
fn linkage_using_and_static_assert() {
    let result = parse(indoc! {r#"
        extern "C" {
        void handler(int sig);
        }
        using Callback = void (*)(int);
        using namespace core;
        static_assert(sizeof(int) == 4, "weird platform");
    "#});
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);

    let DeclarationBody::Linkage(linkage) = &result.declarations[0].body else {
        panic!("expected a linkage block");
    };
    assert_eq!(linkage.literal.text, "\"C\"");
    assert_eq!(linkage.child_decls.len(), 1);

    let DeclarationBody::TypeAlias(alias) = &result.declarations[1].body else {
        panic!("expected a type alias");
    };
    assert_eq!(alias.name.text, "Callback");

    assert!(matches!(
        result.declarations[2].body,
        DeclarationBody::UsingNamespace(_)
    ));
    assert!(matches!(
        result.declarations[3].body,
        DeclarationBody::StaticAssert(_)
    ));
}

#[test]
fn declaration_that_declares_nothing() {
    let result = parse("int;\n");
    assert!(!result.success);
    assert!(
        result.diagnostics[0].contains("declaration does not declare anything"),
        "{:?}",
        result.diagnostics
    );
}

#[test]
fn empty_declaration_is_not_an_error() {
    let result = parse(";\n");
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);
    assert!(result.declarations[0].body.is_empty());
}

#[test]
fn function_definition_needs_no_semicolon() {
    let result = parse(indoc! {r#"
        int add(int a, int b) {
            return a + b;
        }
        int counter = 0;
    "#});
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);
    assert_eq!(result.declarations.len(), 2);

    let function = entity(&result.declarations[0]);
    assert!(function.init_declarators[0].init.is_function_body());
}

#[test]
fn mismatched_bracket_recovers_at_outer_scope() {
    let result = parse(indoc! {r#"
        struct Broken {
            void member(int x;
        };
        int after;
    "#});
    // The missing ) is reported, but the parse continues and the following
    // declaration is still recognized.
    assert!(!result.success);
    assert!(result.declarations.len() >= 2);
    let last = entity(result.declarations.last().unwrap());
    assert_eq!(last.init_declarators[0].qid.to_string(), "after");
}
