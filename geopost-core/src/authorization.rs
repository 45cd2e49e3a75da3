use serde::{Deserialize, Serialize};

/// Permission level granted by the platform. Owned by the platform, mirrored
/// read-only into [crate::SessionStatus].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationState {
    /// The user has not picked a grant yet
    #[default]
    NotDetermined,
    /// Location access is blocked system-wide
    Restricted,
    /// The user refused location access
    Denied,
    /// Updates may be delivered at any time
    AuthorizedAlways,
    /// Updates may be delivered while the app is in use
    AuthorizedWhenInUse,
}

impl AuthorizationState {
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedAlways | Self::AuthorizedWhenInUse)
    }
}

/// Which grant an authorization request asks the platform for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationScope {
    Always,
    WhenInUse,
}
