//! Structured JSON output for scripting and piping.
//!
//! This module provides serializable data structures that represent the
//! complete output of a usage report. When the `--json` flag is passed, these
//! structures are serialized to stdout as a single JSON object, replacing all
//! human-readable output.

use humansize::{DECIMAL, format_size};
use serde::Serialize;

use crate::report::{PathReport, UsageReport};

/// Top-level JSON output emitted when `--json` is active.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// One entry per requested path, in request order.
    pub paths: Vec<JsonPathEntry>,

    /// Aggregated summary statistics.
    pub summary: JsonSummary,
}

/// A single path entry in the JSON output.
#[derive(Debug, Serialize)]
pub struct JsonPathEntry {
    /// The path as requested.
    pub path: String,

    /// Size of the regular files under the path, in bytes.
    pub size: u64,

    /// Human-readable formatted size (e.g. `"1.23 GB"`).
    pub size_formatted: String,

    /// Number of regular files under the path.
    pub files: u64,

    /// Whether the path is a directory.
    pub is_dir: bool,

    /// Whether the path is read-only.
    pub read_only: bool,

    /// RFC 3339 timestamp of the measurement.
    pub last_check: String,

    /// Why the path could not be measured. Absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated summary across all paths.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    /// Number of paths requested.
    pub total_paths: usize,

    /// Total size in bytes of the successfully measured paths.
    pub total_size: u64,

    /// Human-readable formatted total size.
    pub total_size_formatted: String,

    /// Total number of files in the successfully measured paths.
    pub total_files: u64,

    /// Number of paths that could not be measured.
    pub errors: usize,
}

impl JsonOutput {
    /// Build a `JsonOutput` from a usage report.
    #[must_use]
    pub fn from_report(report: &UsageReport) -> Self {
        Self {
            paths: report.paths.iter().map(JsonPathEntry::from_path_report).collect(),
            summary: JsonSummary::from_report(report),
        }
    }
}

impl JsonPathEntry {
    /// Convert a `PathReport` into a `JsonPathEntry`.
    #[must_use]
    pub fn from_path_report(report: &PathReport) -> Self {
        Self {
            path: report.path.display().to_string(),
            size: report.size,
            size_formatted: format_size(report.size, DECIMAL),
            files: report.files,
            is_dir: report.is_dir,
            read_only: report.read_only,
            last_check: report.last_check.to_rfc3339(),
            error: report.err.clone(),
        }
    }
}

impl JsonSummary {
    /// Compute summary statistics from a usage report.
    #[must_use]
    pub fn from_report(report: &UsageReport) -> Self {
        let total_size = report.total_size();

        Self {
            total_paths: report.paths.len(),
            total_size,
            total_size_formatted: format_size(total_size, DECIMAL),
            total_files: report.total_files(),
            errors: report.errors().count(),
        }
    }
}
