//! JSON summary reporter

use crate::fixer::Injection;
use crate::output::{
    JsonReporter, ReportError, Reporter, RunMode, RunSummary, path_to_forward_slashes,
};
use serde::Serialize;
use std::io::Write;

/// Top-level JSON report envelope.
#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    mode: RunMode,
    modified: bool,
    already_named: usize,
    injections: &'a [Injection],
}

impl Reporter for JsonReporter {
    fn emit(&self, summary: &RunSummary<'_>, out: &mut dyn Write) -> Result<(), ReportError> {
        let report = JsonReport {
            file: path_to_forward_slashes(summary.file),
            mode: summary.mode,
            modified: summary.report.is_modified(),
            already_named: summary.report.already_named,
            injections: &summary.report.injections,
        };

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| ReportError::Serialization(e.to_string()))?;
        writeln!(out, "{}", json)?;
        out.flush()?;
        Ok(())
    }
}
