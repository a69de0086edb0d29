//! Configuration types.
//!
//! [`file`] holds the persistent TOML configuration; [`ReportOptions`] is the
//! resolved set of options the report layer runs with.

pub mod file;
pub mod report;

pub use file::FileConfig;
pub use report::ReportOptions;
