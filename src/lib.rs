//! # doku-du
//!
//! Disk usage of directory trees and execution-time logging.
//!
//! - [`utils::dir_size`] walks a directory tree and returns the total size and
//!   number of its regular files, or an [`std::io::Error`] whose kind tells a
//!   missing path apart from other failures.
//! - [`utils::print_exec_time`] starts a timer whose guard writes a single
//!   `level=debug msg=<label> took=<duration>` record when released.
//! - [`report::UsageReport`] measures a list of paths in parallel, the way the
//!   `doku-du` command-line tool reports them.
//!
//! Logging goes through an explicit [`logging::Logger`] rather than a global
//! subscriber.

pub mod config;
pub mod logging;
pub mod output;
pub mod report;
pub mod utils;

pub use config::ReportOptions;
pub use logging::Logger;
