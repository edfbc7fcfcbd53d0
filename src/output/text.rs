//! Human-readable text output reporter
//!
//! ```text
//! Injected constraintName='fk_orders_user_id_to_users' for FK orders(user_id) -> users
//! Updated changelog written to db/changelog.xml
//! ```

use crate::output::{
    ReportError, Reporter, RunMode, RunSummary, TextReporter, path_to_forward_slashes,
};
use std::io::Write;

/// Message printed when every foreign key already has a name.
pub const NOTHING_TO_DO: &str = "No missing foreign key constraintName attributes found.";

/// Format the whole run as text, one line per entry.
fn format_summary(summary: &RunSummary<'_>) -> String {
    let verb = match summary.mode {
        RunMode::Write => "Injected",
        RunMode::Check => "Would inject",
    };

    let mut out = String::new();
    for injection in &summary.report.injections {
        out.push_str(&format!("{} {}\n", verb, injection));
    }

    let file = path_to_forward_slashes(summary.file);
    let closing = match (summary.report.is_modified(), summary.mode) {
        (false, _) => NOTHING_TO_DO.to_string(),
        (true, RunMode::Write) => format!("Updated changelog written to {}", file),
        (true, RunMode::Check) => format!(
            "{} foreign key(s) missing constraintName in {}",
            summary.report.injections.len(),
            file
        ),
    };
    out.push_str(&closing);
    out.push('\n');
    out
}

impl Reporter for TextReporter {
    fn emit(&self, summary: &RunSummary<'_>, out: &mut dyn Write) -> Result<(), ReportError> {
        out.write_all(format_summary(summary).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixer::{FixReport, Injection};
    use crate::naming::ForeignKeyIdentity;
    use std::path::Path;

    fn report_with(names: &[&str]) -> FixReport {
        FixReport {
            injections: names
                .iter()
                .map(|name| Injection {
                    constraint_name: name.to_string(),
                    identity: ForeignKeyIdentity {
                        base_table: "orders".to_string(),
                        base_columns: "user_id".to_string(),
                        referenced_table: "users".to_string(),
                    },
                })
                .collect(),
            already_named: 0,
        }
    }

    fn render(mode: RunMode, report: &FixReport) -> String {
        let summary = RunSummary {
            file: Path::new("db/changelog.xml"),
            mode,
            report,
        };
        let mut out = Vec::new();
        TextReporter::new().emit(&summary, &mut out).expect("emit");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_write_mode_lists_injections_then_target() {
        let report = report_with(&["fk_orders_user_id_to_users", "fk_orders_user_id_to_users_1"]);
        let expected = "Injected constraintName='fk_orders_user_id_to_users' for FK orders(user_id) -> users\n\
Injected constraintName='fk_orders_user_id_to_users_1' for FK orders(user_id) -> users\n\
Updated changelog written to db/changelog.xml\n";
        assert_eq!(render(RunMode::Write, &report), expected);
    }

    #[test]
    fn test_check_mode_uses_conditional_wording() {
        let report = report_with(&["fk_orders_user_id_to_users"]);
        let text = render(RunMode::Check, &report);
        assert!(text.starts_with("Would inject constraintName='fk_orders_user_id_to_users'"));
        assert!(text.ends_with("1 foreign key(s) missing constraintName in db/changelog.xml\n"));
    }

    #[test]
    fn test_no_injections_prints_nothing_to_do() {
        let report = FixReport::default();
        assert_eq!(render(RunMode::Write, &report), format!("{}\n", NOTHING_TO_DO));
        assert_eq!(render(RunMode::Check, &report), format!("{}\n", NOTHING_TO_DO));
    }
}
