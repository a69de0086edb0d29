//! Utility functions and helpers.
//!
//! This module contains the filesystem and timing helpers used throughout the
//! application: directory size measurement and execution-time logging.

pub mod size;
pub mod timing;

pub use size::{DirStats, dir_size, is_not_found};
pub use timing::{ExecTimer, print_exec_time};
