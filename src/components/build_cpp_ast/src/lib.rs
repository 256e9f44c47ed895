//! Error-tolerant recursive-descent parser for a large subset of C++,
//! interleaved token-by-token with object-like macro expansion and
//! `#include` processing.
//!
//! A parse never fails outright: the caller always receives a complete
//! (possibly partial) declaration tree, the full diagnostics list, and a
//! single success flag.

mod dump;
mod error;
mod highlight;
mod input;
mod parse_declaration;
mod parse_declarator;
mod parse_expr;
mod parse_parameters;
mod parse_qualified_id;
mod parse_type;
mod recover;

use build_cpp_token::{Config, Tokenizer};
use cpp_ast::Declaration;
use input::CachedToken;
pub use preprocessor::{FileLocation, PreprocessorDefinition};
use preprocessor::Preprocessor;
use recover::Accept;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct ParseResult {
    pub success: bool,
    pub declarations: Vec<Declaration>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Default)]
pub struct PreprocessResult {
    pub success: bool,
    pub output: String,
    pub diagnostics: Vec<String>,
}

/// One parse invocation's worth of state. A `Parser` owns its preprocessor,
/// token buffer and diagnostics exclusively, so concurrent parses on
/// separate instances are safe by construction; nothing global is touched.
pub struct Parser {
    /// Ordered search paths for `#include` resolution; the first directory
    /// containing the named file wins.
    pub include_paths: Vec<PathBuf>,
    /// Definitions applied before parsing begins, like `-D` compiler flags.
    pub predefined_defs: Vec<PreprocessorDefinition>,

    tkr: Tokenizer,
    pp: Preprocessor,
    diagnostics: Vec<String>,
    success: bool,
    only_preprocessing: bool,

    // Token buffer and backtracking.
    tokens: Vec<CachedToken>,
    token_index: usize,
    restore_point_depth: u32,

    // Error recovery.
    raw_error_count: u32,
    mute_errors: bool,
    outer_accept_flags: Accept,

    // Always 1 for now; reserved for a hypothetical second pass that would
    // carry real type knowledge into template-argument parsing.
    pass_number: u32,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            include_paths: Vec::new(),
            predefined_defs: Vec::new(),
            tkr: Tokenizer::new(Config {
                tokenize_preprocessor_directives: true,
                ..Config::default()
            }),
            pp: Preprocessor::new(),
            diagnostics: Vec::new(),
            success: true,
            only_preprocessing: false,
            tokens: Vec::new(),
            token_index: 0,
            restore_point_depth: 0,
            raw_error_count: 0,
            mute_errors: false,
            outer_accept_flags: Accept::empty(),
            pass_number: 1,
        }
    }

    fn set_input(&mut self, abs_path: &str, src: &str) {
        self.pp.set_input(abs_path, src.to_string());
        self.pp.apply_definitions(&self.predefined_defs);
    }

    /// Runs macro expansion and include processing only, reconstituting the
    /// source text with whitespace preserved and directives and comments
    /// removed.
    pub fn preprocess(&mut self, abs_path: &str, src: &str) -> PreprocessResult {
        self.set_input(abs_path, src);
        self.only_preprocessing = true;

        let mut output = String::new();
        loop {
            let token = self.next();
            if token.is_end_of_file() {
                break;
            }
            output.push_str(token.to_str());
        }

        PreprocessResult {
            success: self.success,
            output,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }

    pub fn parse_file(&mut self, abs_path: &str, src: &str) -> ParseResult {
        self.set_input(abs_path, src);
        let declarations = self.parse_translation_unit();

        ParseResult {
            success: self.success,
            declarations,
            diagnostics: std::mem::take(&mut self.diagnostics),
        }
    }

    /// Parses one isolated declaration, such as a snippet embedded in
    /// documentation. `enclosing_class_name` supplies the class context that
    /// decides whether `Foo(bar())` reads as a constructor; pass an empty
    /// string for a free declaration.
    pub fn parse_declaration(&mut self, src: &str, enclosing_class_name: &str) -> Declaration {
        self.set_input("", src);
        self.parse_declaration_internal(enclosing_class_name)
    }

    /// Resolves any token offset in the returned tree back to the physical
    /// file, line and column that produced it, chasing macro expansions to
    /// their invocation sites.
    pub fn get_file_location(&self, input_offset: u32) -> FileLocation {
        self.pp.file_location(input_offset)
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}
