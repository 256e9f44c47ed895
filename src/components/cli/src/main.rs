use build_cpp_ast::{Parser, PreprocessorDefinition};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

struct Options {
    input: Option<PathBuf>,
    include_paths: Vec<PathBuf>,
    defines: Vec<PreprocessorDefinition>,
    preprocess_only: bool,
}

fn print_usage() {
    eprintln!("usage: cppdump [--preprocess] [-I <dir>]... [-D NAME=VALUE]... <file.cpp>");
}

fn parse_options(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options {
        input: None,
        include_paths: Vec::new(),
        defines: Vec::new(),
        preprocess_only: false,
    };

    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--preprocess" => options.preprocess_only = true,
            "-I" => {
                let dir = args.next().ok_or("-I requires a directory")?;
                options.include_paths.push(PathBuf::from(dir));
            }
            "-D" => {
                let def = args.next().ok_or("-D requires NAME or NAME=VALUE")?;
                let (name, expansion) = match def.split_once('=') {
                    Some((name, expansion)) => (name.to_string(), expansion.to_string()),
                    None => (def, String::new()),
                };
                options.defines.push(PreprocessorDefinition { name, expansion });
            }
            _ if arg.starts_with('-') => return Err(format!("unknown option '{}'", arg)),
            _ => {
                if options.input.replace(PathBuf::from(arg)).is_some() {
                    return Err("only one input file is supported".to_string());
                }
            }
        }
    }

    Ok(options)
}

fn main() -> ExitCode {
    let options = match parse_options(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}: {}", "error".red().bold(), message);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let Some(input) = options.input else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let source = match std::fs::read(&input) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(error) => {
            eprintln!(
                "{}: can't read '{}': {}",
                "error".red().bold(),
                input.display(),
                error
            );
            return ExitCode::FAILURE;
        }
    };

    let abs_path = input
        .canonicalize()
        .unwrap_or(input)
        .to_string_lossy()
        .into_owned();

    let mut parser = Parser::new();
    parser.include_paths = options.include_paths;
    parser.predefined_defs = options.defines;

    let success = if options.preprocess_only {
        let result = parser.preprocess(&abs_path, &source);
        print!("{}", result.output);
        for diagnostic in &result.diagnostics {
            eprintln!("{}", diagnostic);
        }
        result.success
    } else {
        let result = parser.parse_file(&abs_path, &source);
        for declaration in &result.declarations {
            print!("{}", parser.dump_declaration(declaration));
        }
        for diagnostic in &result.diagnostics {
            eprintln!("{}", diagnostic);
        }
        result.success
    };

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
