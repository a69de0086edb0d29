//! Disk usage reports for a list of paths.
//!
//! A [`UsageReport`] holds one [`PathReport`] per requested path: its size,
//! number of files, whether it is a directory or read-only, when it was
//! measured and, if it could not be measured, why. Paths are measured in
//! parallel and a failure on one path never aborts the others.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use humansize::{DECIMAL, format_size};
use rayon::prelude::*;

use crate::{
    config::ReportOptions,
    logging::Logger,
    utils::{dir_size, is_not_found, print_exec_time},
};

/// Disk usage of a single path.
#[derive(Clone, Debug)]
pub struct PathReport {
    /// The path as it was requested
    pub path: PathBuf,

    /// Total size in bytes of the regular files under the path
    pub size: u64,

    /// Number of regular files under the path (1 for a file)
    pub files: u64,

    /// Whether the path is a directory
    pub is_dir: bool,

    /// Whether the path's permissions mark it read-only
    pub read_only: bool,

    /// When the path was measured
    pub last_check: DateTime<Utc>,

    /// Why the path could not be measured, if it could not
    pub err: Option<String>,
}

impl PathReport {
    /// Measure a single path.
    ///
    /// Errors are recorded in [`PathReport::err`] with a size and file count of
    /// zero, and logged as warnings through `logger`.
    #[must_use]
    pub fn collect(path: &Path, logger: &Logger) -> Self {
        let _timer = print_exec_time(logger, format!("dir size {}", path.display()));

        let mut report = Self {
            path: path.to_path_buf(),
            size: 0,
            files: 0,
            is_dir: false,
            read_only: false,
            last_check: Utc::now(),
            err: None,
        };

        let measured = fs::metadata(path).and_then(|metadata| {
            report.is_dir = metadata.is_dir();
            report.read_only = metadata.permissions().readonly();
            dir_size(path)
        });

        match measured {
            Ok(stats) => {
                report.size = stats.size;
                report.files = stats.files;
            }
            Err(e) => {
                let reason = if is_not_found(&e) {
                    "path does not exist"
                } else {
                    "path is not accessible"
                };
                logger.in_scope(|| {
                    tracing::warn!(path = %path.display(), error = %e, "{reason}");
                });
                report.err = Some(e.to_string());
            }
        }

        report
    }

    /// Whether the path was measured successfully.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.err.is_none()
    }
}

/// Disk usage of a list of paths.
#[derive(Clone, Debug, Default)]
pub struct UsageReport {
    /// One entry per requested path, in request order
    pub paths: Vec<PathReport>,
}

impl UsageReport {
    /// Measure every path in `paths`, in parallel.
    ///
    /// When `options.threads` is non-zero a dedicated pool of that size is
    /// used; otherwise the global rayon pool.
    ///
    /// # Errors
    ///
    /// Returns an error only if the thread pool cannot be built. Failures to
    /// measure individual paths are recorded in the report instead.
    pub fn collect(paths: &[PathBuf], options: &ReportOptions, logger: &Logger) -> Result<Self> {
        let _timer = print_exec_time(logger, "usage report");

        let measure = || -> Vec<PathReport> {
            paths
                .par_iter()
                .map(|path| PathReport::collect(path, logger))
                .collect()
        };

        let reports = if options.threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(options.threads)
                .build()?
                .install(measure)
        } else {
            measure()
        };

        Ok(Self { paths: reports })
    }

    /// Total size in bytes of every successfully measured path.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.successful().map(|p| p.size).sum()
    }

    /// Total number of files in every successfully measured path.
    #[must_use]
    pub fn total_files(&self) -> u64 {
        self.successful().map(|p| p.files).sum()
    }

    /// Paths that could not be measured.
    pub fn errors(&self) -> impl Iterator<Item = &PathReport> {
        self.paths.iter().filter(|p| !p.is_ok())
    }

    /// Whether any path could not be measured.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    fn successful(&self) -> impl Iterator<Item = &PathReport> {
        self.paths.iter().filter(|p| p.is_ok())
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        for report in &self.paths {
            println!("  {}", format_row(report));
        }

        if self.has_errors() {
            println!(
                "\n{}",
                "⚠️  No access to some paths; their size could not be calculated.".yellow()
            );
        }

        println!(
            "\n  💾 Total size: {} in {} files",
            format_size(self.total_size(), DECIMAL).bright_green().bold(),
            self.total_files().to_string().bright_white()
        );
    }
}

/// Format one summary row.
fn format_row(report: &PathReport) -> String {
    let icon = if report.is_dir { "📁" } else { "📄" };
    let flags = if report.read_only { " (read-only)" } else { "" };

    match &report.err {
        Some(err) => format!("❌ {}  {}", report.path.display(), err.red()),
        None => format!(
            "{icon} {}{flags}  {}  {} files",
            report.path.display(),
            format_size(report.size, DECIMAL).bright_white(),
            report.files
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::BufferWriter;
    use tempfile::TempDir;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_path_report_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "12345").unwrap();
        fs::write(temp.path().join("b"), "678").unwrap();

        let report = PathReport::collect(temp.path(), &Logger::disabled());

        assert!(report.is_ok());
        assert!(report.is_dir);
        assert!(!report.read_only);
        assert_eq!(report.size, 8);
        assert_eq!(report.files, 2);
    }

    #[test]
    fn test_path_report_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("single");
        fs::write(&file, "abc").unwrap();

        let report = PathReport::collect(&file, &Logger::disabled());

        assert!(report.is_ok());
        assert!(!report.is_dir);
        assert_eq!(report.size, 3);
        assert_eq!(report.files, 1);
    }

    #[test]
    fn test_path_report_missing_path() {
        let buf = BufferWriter::new();
        let logger = Logger::new(LevelFilter::DEBUG, buf.clone());

        let report = PathReport::collect(Path::new("/the-wrong-path"), &logger);

        assert!(!report.is_ok());
        assert_eq!(report.size, 0);
        assert_eq!(report.files, 0);

        let out = buf.contents();
        assert!(out.contains("level=warn"));
        assert!(out.contains(r#"msg="path does not exist""#));
        assert!(out.contains("path=/the-wrong-path"));
        assert!(out.contains(r#"msg="dir size /the-wrong-path""#));
    }

    #[cfg(unix)]
    #[test]
    fn test_path_report_inaccessible_subdir() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(temp.path().join("visible"), "1234").unwrap();
        fs::write(locked.join("secret"), "s").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores directory permissions
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let buf = BufferWriter::new();
        let logger = Logger::new(LevelFilter::DEBUG, buf.clone());
        let report = PathReport::collect(temp.path(), &logger);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(report.err.is_some());
        assert_eq!(report.size, 0);
        assert_eq!(report.files, 0);
        assert!(buf.contents().contains(r#"msg="path is not accessible""#));
    }

    #[test]
    fn test_usage_report_keeps_order_and_totals() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        fs::write(first.join("x"), "1234").unwrap();
        fs::write(second.join("y"), "12").unwrap();
        fs::write(second.join("z"), "1").unwrap();
        let missing = temp.path().join("missing");

        let paths = vec![first.clone(), missing.clone(), second.clone()];
        let report =
            UsageReport::collect(&paths, &ReportOptions { threads: 2 }, &Logger::disabled())
                .unwrap();

        let order: Vec<_> = report.paths.iter().map(|p| p.path.clone()).collect();
        assert_eq!(order, vec![first, missing, second]);
        assert_eq!(report.total_size(), 7);
        assert_eq!(report.total_files(), 3);
        assert!(report.has_errors());
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_usage_report_empty() {
        let report =
            UsageReport::collect(&[], &ReportOptions::default(), &Logger::disabled()).unwrap();

        assert!(report.paths.is_empty());
        assert_eq!(report.total_size(), 0);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_usage_report_logs_exec_time() {
        let temp = TempDir::new().unwrap();
        let buf = BufferWriter::new();
        let logger = Logger::new(LevelFilter::DEBUG, buf.clone());

        UsageReport::collect(
            &[temp.path().to_path_buf()],
            &ReportOptions::default(),
            &logger,
        )
        .unwrap();

        let out = buf.contents();
        assert_eq!(out.matches(r#"msg="usage report""#).count(), 1);
        assert_eq!(out.matches("msg=\"dir size ").count(), 1);
        assert!(out.lines().all(|line| line.contains("took=")));
    }

    #[test]
    fn test_format_row() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "12345").unwrap();

        let ok = PathReport::collect(temp.path(), &Logger::disabled());
        let row = format_row(&ok);
        assert!(row.contains(&temp.path().display().to_string()));
        assert!(row.contains("1 files"));

        let missing = PathReport::collect(Path::new("/the-wrong-path"), &Logger::disabled());
        assert!(format_row(&missing).starts_with("❌ /the-wrong-path"));
    }
}
