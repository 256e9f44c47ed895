use line_column::Location;
use std::fmt::Display;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        })
    }
}

/// Renders one diagnostic line in the stable format consumed by terminals
/// and IDEs: `<abs_path>(<line>, <column>): <severity>: <message>`.
pub fn format_diagnostic(
    abs_path: &str,
    location: Location,
    severity: Severity,
    message: &str,
) -> String {
    format!(
        "{}({}, {}): {}: {}",
        abs_path, location.line, location.column, severity, message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_format() {
        let rendered = format_diagnostic(
            "/tmp/a.cpp",
            Location { line: 3, column: 5 },
            Severity::Error,
            "unexpected end-of-line in string literal",
        );
        assert_eq!(
            rendered,
            "/tmp/a.cpp(3, 5): error: unexpected end-of-line in string literal"
        );
    }
}
