//! Options controlling how a usage report is computed.

/// Configuration for computing a usage report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Number of threads used to measure paths (0 = rayon default)
    pub threads: usize,
}
