use serde::{Deserialize, Serialize};

use crate::{accuracy::AccuracyTier, authorization::AuthorizationState, fix::LocationFix};

/// Mutable session state. Only ever touched from the session's own event
/// path, snapshots go out through [SessionState::as_status].
pub(crate) struct SessionState {
    pub(crate) tracking: bool,
    pub(crate) accuracy: AccuracyTier,
    pub(crate) authorization: AuthorizationState,
    pub(crate) last_fix: Option<LocationFix>,
    pub(crate) fix_count: u64,
}

impl SessionState {
    pub(crate) fn new(accuracy: AccuracyTier) -> Self {
        Self {
            tracking: false,
            accuracy,
            authorization: AuthorizationState::default(),
            last_fix: None,
            fix_count: 0,
        }
    }

    pub(crate) fn record_fix(&mut self, fix: LocationFix) {
        self.fix_count += 1;
        self.last_fix = Some(fix);
    }

    pub(crate) fn as_status(&self) -> SessionStatus {
        SessionStatus {
            tracking: self.tracking,
            accuracy: self.accuracy,
            authorization: self.authorization,
            last_fix: self.last_fix.clone(),
            fix_count: self.fix_count,
        }
    }
}

/// Read-only snapshot of a session for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Whether a start call has succeeded with no stop since
    pub tracking: bool,
    pub accuracy: AccuracyTier,
    pub authorization: AuthorizationState,
    pub last_fix: Option<LocationFix>,
    /// Total fixes received since the session was constructed
    pub fix_count: u64,
}
