use crate::Parser;
pub(crate) use diagnostics::Severity;

impl Parser {
    /// Records an error or note without engaging cascade suppression.
    ///
    /// Errors always bump the raw counter, even when muted or inside a
    /// restore point; that counter is how speculative parses detect failure.
    /// The rendered diagnostic is only surfaced when no restore point is
    /// open and errors aren't muted.
    pub(crate) fn error_no_mute(&mut self, severity: Severity, input_offset: u32, message: &str) {
        if severity == Severity::Error {
            self.raw_error_count += 1;
        }

        if self.restore_point_depth == 0 && !self.mute_errors {
            let (path, location) = self.pp.location_string(input_offset);
            self.diagnostics
                .push(diagnostics::format_diagnostic(&path, location, severity, message));
            if severity == Severity::Error {
                self.success = false;
            }
        }
    }

    /// Records an error and mutes subsequent diagnostics until the parser
    /// consumes a good token again, preventing cascades from one mistake.
    pub(crate) fn error(&mut self, input_offset: u32, message: &str) {
        self.error_no_mute(Severity::Error, input_offset, message);
        self.mute_errors = true;
    }
}
