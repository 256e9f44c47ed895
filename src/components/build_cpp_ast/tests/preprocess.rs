use build_cpp_ast::{Parser, PreprocessorDefinition};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cpp_parse_pp_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn input_without_directives_is_unchanged() {
    let src = "int x = 1;\n\nstruct Foo {\n    int y;\n};\n";
    let result = Parser::new().preprocess("/test/plain.cpp", src);
    assert!(result.success);
    assert_eq!(result.output, src);
}

#[test]
fn object_macro_expands_in_place() {
    let src = "#define COUNT 32\nint buffer[COUNT];\n";
    let result = Parser::new().preprocess("/test/macro.cpp", src);
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);
    assert_eq!(result.output, "int buffer[32];\n");
}

#[test]
fn empty_macro_expands_to_nothing() {
    let src = "#define DECORATION\nDECORATION int x;\n";
    let result = Parser::new().preprocess("/test/macro.cpp", src);
    assert!(result.success);
    assert_eq!(result.output, " int x;\n");
}

#[test]
fn redefinition_shadows_later_uses_only() {
    let src = "#define N 1\nint a = N;\n#define N 2\nint b = N;\n";
    let result = Parser::new().preprocess("/test/redef.cpp", src);
    assert!(result.success);
    assert_eq!(result.output, "int a = 1;\nint b = 2;\n");
}

#[test]
fn macro_body_can_mention_other_macros() {
    let src = "#define INNER 7\n#define OUTER INNER\nint x = OUTER;\n";
    let result = Parser::new().preprocess("/test/nested.cpp", src);
    assert!(result.success);
    assert_eq!(result.output, "int x = 7;\n");
}

#[test]
fn predefined_definitions_apply_before_parsing() {
    let mut parser = Parser::new();
    parser.predefined_defs = vec![PreprocessorDefinition {
        name: "VALUE".to_string(),
        expansion: "42".to_string(),
    }];

    let result = parser.preprocess("/test/defs.cpp", "int x = VALUE;\n");
    assert!(result.success);
    assert_eq!(result.output, "int x = 42;\n");
}

#[test]
fn include_splices_file_contents() {
    let dir = scratch_dir("splice");
    fs::write(dir.join("x.h"), "int from_header;\n").unwrap();

    let mut parser = Parser::new();
    parser.include_paths = vec![dir];

    let src = "#include \"x.h\"\nint after;\n";
    let result = parser.preprocess("/test/main.cpp", src);
    assert!(result.success, "diagnostics: {:?}", result.diagnostics);
    assert_eq!(result.output, "int from_header;\nint after;\n");
}

#[test]
fn first_matching_include_path_wins() {
    let first = scratch_dir("first");
    let second = scratch_dir("second");
    fs::write(first.join("pick.h"), "int from_first;\n").unwrap();
    fs::write(second.join("pick.h"), "int from_second;\n").unwrap();

    let mut parser = Parser::new();
    parser.include_paths = vec![first, second];

    let result = parser.preprocess("/test/main.cpp", "#include \"pick.h\"\n");
    assert!(result.success);
    assert_eq!(result.output, "int from_first;\n");
}

#[test]
fn missing_include_is_dropped_silently() {
    let result = Parser::new().preprocess("/test/main.cpp", "#include \"nope.h\"\nint x;\n");
    assert!(result.success);
    assert!(result.diagnostics.is_empty());
    assert_eq!(result.output, "int x;\n");
}

#[test]
fn comments_are_removed() {
    let src = "int x; // trailing\n/* leading */int y;\n";
    let result = Parser::new().preprocess("/test/comments.cpp", src);
    assert!(result.success);
    assert_eq!(result.output, "int x; int y;\n");
}
