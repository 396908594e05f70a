//! Error taxonomy for report generation.
//!
//! `DataFetch` and `EmptyPeriod` are deliberately distinct variants: a user
//! message for "no data in range" must never read like "could not reach the
//! data source". Malformed rows are not an error at all here; they are
//! skipped with a warning during parsing so partial data still produces a
//! report.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    /// The measurement or permit source could not be read. Propagated to
    /// the caller; no retry is attempted here.
    DataFetch(String),
    /// The source was reachable but held nothing for the requested period.
    /// A valid state: callers render it as "no data for this period".
    EmptyPeriod,
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::DataFetch(detail) => {
                write!(f, "could not reach data source: {detail}")
            }
            ReportError::EmptyPeriod => {
                write!(f, "no data for this period")
            }
        }
    }
}

impl std::error::Error for ReportError {}

#[cfg(test)]
mod tests {
    use super::ReportError;

    #[test]
    fn test_messages_are_not_conflated() {
        let fetch = ReportError::DataFetch("io failure".to_string()).to_string();
        let empty = ReportError::EmptyPeriod.to_string();
        assert!(fetch.contains("could not reach data source"));
        assert!(empty.contains("no data for this period"));
        assert!(!empty.contains("data source"));
    }
}
