use crate::fix::LocationFix;

/// Sink for fixes leaving the device.
pub trait FixReporter: Send + Sync {
    /// Forward one fix to the remote end. Side effects only: the outcome is
    /// handled internally and never reaches the session, and dispatch must not
    /// block the caller on network IO.
    fn report(&self, fix: &LocationFix) -> impl Future<Output = ()>;
}
