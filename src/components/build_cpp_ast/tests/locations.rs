use build_cpp_ast::Parser;
use cpp_ast::{DeclarationBody, EntityDecl};
use std::fs;
use std::path::PathBuf;

fn entity(declaration: &cpp_ast::Declaration) -> &EntityDecl {
    match &declaration.body {
        DeclarationBody::Entity(entity) => entity,
        other => panic!("expected an entity declaration, got {:?}", other),
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cpp_parse_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn include_chain_resumes_in_original_file() {
    let dir = scratch_dir("resume");
    fs::write(dir.join("x.h"), "int from_header;\n").unwrap();

    let mut parser = Parser::new();
    parser.include_paths = vec![dir];

    let src = "#include \"x.h\"\nint a;\nint b;\n";
    let result = parser.parse_file("/test/main.cpp", src);
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);
    assert_eq!(result.declarations.len(), 3);

    // The included declaration resolves into the header file.
    let header_decl = entity(&result.declarations[0]);
    let offset = header_decl.init_declarators[0]
        .qid
        .first_token()
        .unwrap()
        .input_offset;
    let location = parser.get_file_location(offset);
    assert!(location.abs_path.ends_with("x.h"), "{}", location.abs_path);
    assert_eq!((location.line, location.column), (1, 5));

    // Tokens after the include resolve back into the including file at
    // their correct lines, not into the header.
    let a_decl = entity(&result.declarations[1]);
    let offset = a_decl.init_declarators[0]
        .qid
        .first_token()
        .unwrap()
        .input_offset;
    let location = parser.get_file_location(offset);
    assert_eq!(location.abs_path, "/test/main.cpp");
    assert_eq!((location.line, location.column), (2, 5));

    let b_decl = entity(&result.declarations[2]);
    let offset = b_decl.init_declarators[0]
        .qid
        .first_token()
        .unwrap()
        .input_offset;
    let location = parser.get_file_location(offset);
    assert_eq!(location.abs_path, "/test/main.cpp");
    assert_eq!((location.line, location.column), (3, 5));
}

#[test]
fn diagnostics_use_stable_location_format() {
    let src = "int a;\nint b;\n    \"oops\nint c;\n";
    let result = Parser::new().parse_file("/tmp/a.cpp", src);

    assert!(!result.success);
    assert!(
        result
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.starts_with("/tmp/a.cpp(3, 5): error: ")),
        "diagnostics: {:?}",
        result.diagnostics
    );
}

#[test]
fn macro_expansion_reports_invocation_site() {
    let mut parser = Parser::new();
    let src = "#define NAME counter\nint NAME;\n";
    let result = parser.parse_file("/test/macro.cpp", src);
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);

    let declaration = entity(&result.declarations[0]);
    let name_token = declaration.init_declarators[0].qid.first_token().unwrap();

    // The token's text comes from the macro's expansion...
    assert_eq!(name_token.text, "counter");

    // ...but its location chases back to where the macro was invoked.
    let location = parser.get_file_location(name_token.input_offset);
    assert_eq!(location.abs_path, "/test/macro.cpp");
    assert_eq!((location.line, location.column), (2, 5));
}

#[test]
fn logical_offsets_stay_monotonic_across_expansion() {
    let mut parser = Parser::new();
    let src = "#define NAME counter\nint NAME;\n";
    let result = parser.parse_file("/test/macro.cpp", src);
    assert!(result.success);

    let declaration = &result.declarations[0];
    let ent = entity(declaration);
    let int_offset = ent.decl_specifiers[0].first_token().unwrap().input_offset;
    let name_token = ent.init_declarators[0].qid.first_token().unwrap();
    let semicolon_offset = declaration.semicolon.as_ref().unwrap().input_offset;

    assert!(int_offset < name_token.input_offset);
    // The expansion occupies its own logical span; the following token
    // starts past the end of the expanded text.
    assert!(semicolon_offset >= name_token.input_offset + name_token.text.len() as u32);
}
