#[cfg(test)]
use mockall::automock;
use tracing::error;

use super::error::Error;

/// How bad a reported failure is for the process.
///
/// The registry only reports `Almost`, since every setup failure is handed
/// back to the caller. `Fatal` is there for reporters shared with callers
/// that cannot carry on, e.g. a CLI that exits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The caller cannot continue.
    Fatal,
    /// The caller may recover, e.g. by trying another device.
    Almost,
}

/// Receives setup failures before they are handed back to the caller.
///
/// Whatever `report` returns is what the caller of the registry sees.
#[cfg_attr(test, automock)]
pub trait FailureReporter {
    fn report(&self, severity: Severity, error: Error) -> Error;
}

/// Logs failures through `tracing` and returns them unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, severity: Severity, error: Error) -> Error {
        error!(?severity, error = ?error, "{}", error);
        error
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn it_returns_the_reported_error_unchanged() {
        let reporter = TracingReporter;
        let err = reporter.report(
            Severity::Almost,
            Error::Speed(io::Error::from_raw_os_error(22)),
        );
        assert!(matches!(err, Error::Speed(_)));
        assert_eq!(err.raw_os_error(), Some(22));
    }

    #[test]
    fn it_passes_fatal_errors_through() {
        let reporter = TracingReporter;
        let err = reporter.report(Severity::Fatal, Error::BusOutOfRange(7));
        assert!(matches!(err, Error::BusOutOfRange(7)));
    }
}
