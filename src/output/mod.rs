//! Reporters for the outcome of a naming run
//!
//! Supports plain text lines (one per injected name) and a JSON summary.

use crate::fixer::FixReport;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error writing report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Whether the run rewrote the changelog or only inspected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Write,
    Check,
}

/// Everything a reporter needs to describe one run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary<'a> {
    pub file: &'a Path,
    pub mode: RunMode,
    pub report: &'a FixReport,
}

/// Trait for output format reporters.
pub trait Reporter {
    /// Write the summary of a run to `out`.
    fn emit(&self, summary: &RunSummary<'_>, out: &mut dyn Write) -> Result<(), ReportError>;
}

/// Line-oriented report for terminals and CI logs.
pub struct TextReporter;

impl TextReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Single JSON document, for tooling that post-processes the result.
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a file path to a string with forward slashes.
fn path_to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

pub mod json;
pub mod text;
