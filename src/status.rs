//! Process outcome reporting.
//!
//! The serve loops return an [`ExitStatus`] instead of terminating the
//! process, so the whole engine can be driven from tests. Only `main`
//! translates the status into an OS exit code.

/// Outcome of a forwarder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Clean shutdown after the cancellation signal was observed.
    Ok,
    /// The command line was invalid.
    BadArguments,
    /// The listen address or a target address failed to resolve.
    ResolveFailure,
    /// Binding the listen endpoint failed.
    ListenFailure,
    /// Accept/receive failed for a reason other than intentional shutdown.
    ReadFailure,
}

impl ExitStatus {
    /// OS exit code for this outcome.
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Ok => 0,
            ExitStatus::BadArguments | ExitStatus::ResolveFailure | ExitStatus::ListenFailure => 1,
            ExitStatus::ReadFailure => 2,
        }
    }
}
