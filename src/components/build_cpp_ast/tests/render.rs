use build_cpp_ast::Parser;
use cpp_ast::{Color, TokenSpan};
use indoc::indoc;

fn reconstruct(spans: &[TokenSpan]) -> String {
    spans
        .iter()
        .map(|span| match span {
            TokenSpan::Token { token, .. } => token.text.clone(),
            TokenSpan::Space => " ".to_string(),
        })
        .collect()
}

fn color_of<'a>(spans: &'a [TokenSpan], text: &str) -> Color {
    spans
        .iter()
        .find_map(|span| match span {
            TokenSpan::Token { color, token } if token.text == text => Some(*color),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no span with text {:?}", text))
}

#[test]
fn highlight_reconstructs_canonical_rendering() {
    let mut parser = Parser::new();
    let declaration = parser.parse_declaration("template <typename T> T* first(T* a, int n);", "");
    assert!(parser.success(), "diagnostics: {:?}", parser.diagnostics());

    let spans = parser.syntax_highlight(&declaration);
    assert_eq!(reconstruct(&spans), "template <typename T> T* first(T* a, int n)");
}

#[test]
fn highlight_assigns_semantic_colors() {
    let mut parser = Parser::new();
    let declaration = parser.parse_declaration("Widget* make_widget(int count);", "");
    let spans = parser.syntax_highlight(&declaration);

    assert_eq!(color_of(&spans, "Widget"), Color::Type);
    assert_eq!(color_of(&spans, "make_widget"), Color::Symbol);
    assert_eq!(color_of(&spans, "count"), Color::Variable);
    assert_eq!(color_of(&spans, "int"), Color::Type);
    assert_eq!(color_of(&spans, "("), Color::None);
}

#[test]
fn highlight_normalizes_whitespace() {
    let mut parser = Parser::new();
    let declaration = parser.parse_declaration("int   *   p", "");
    let spans = parser.syntax_highlight(&declaration);

    // One synthesized space between type and declarator, none inside `*p`.
    assert_eq!(reconstruct(&spans), "int* p");
}

#[test]
fn dump_is_indented_one_node_per_line() {
    let src = indoc! {r#"
        namespace ns {

        struct Point {
            int x;
            int y;
        };

        }
    "#};

    let mut parser = Parser::new();
    let result = parser.parse_file("/test/main.cpp", src);
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);

    let dump = parser.dump_declaration(&result.declarations[0]);
    let lines: Vec<&str> = dump.lines().collect();

    assert_eq!(lines[0], "main.cpp(1): Namespace 'ns'");
    assert_eq!(lines[1], "  main.cpp(3): Entity");
    assert_eq!(lines[2], "    Class struct 'Point'");
    assert!(lines.contains(&"      main.cpp(4): Entity"));
    assert!(lines.contains(&"        InitDeclarator 'x'"));
    assert!(lines.contains(&"        InitDeclarator 'y'"));
}

#[test]
fn dump_shows_declarator_structure() {
    let mut parser = Parser::new();
    let result = parser.parse_file("/test/main.cpp", "int* xs[8];\n");
    assert!(result.success);

    let dump = parser.dump_declaration(&result.declarations[0]);
    assert!(dump.contains("InitDeclarator 'xs'"), "{}", dump);
    assert!(dump.contains("ArrayOf"), "{}", dump);
    assert!(dump.contains("Indirection '*'"), "{}", dump);
}
