use serde::{Deserialize, Serialize};

use crate::{
    accuracy::AccuracyTier,
    authorization::{AuthorizationScope, AuthorizationState},
    fix::LocationFix,
    settings::SessionSettings,
};

/// An event pushed by the platform's location framework
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProviderEvent {
    /// A new fix is available
    Fix(LocationFix),
    /// The user or the system changed the location grant
    AuthorizationChanged(AuthorizationState),
    /// The platform failed to produce updates
    Error(String),
}

/// Seam to the platform's location framework. Commands flow in through the
/// methods, fixes and grant changes flow back out via [ProviderEvent]s.
pub trait LocationProvider: Send + Sync {
    /// Forward the distance filter and background-update policy to the platform
    fn apply_settings(&self, settings: &SessionSettings) -> impl Future<Output = ()>;
    /// Ask the platform for a grant. User-mediated and asynchronous, the
    /// outcome arrives later as an [ProviderEvent::AuthorizationChanged].
    fn request_authorization(&self, scope: AuthorizationScope) -> impl Future<Output = ()>;
    /// Select the precision/power tradeoff, always succeeds
    fn set_accuracy(&self, tier: AccuracyTier) -> impl Future<Output = ()>;
    /// Begin delivering fixes
    fn start_updates(&self) -> impl Future<Output = ()>;
    /// Stop delivering fixes
    fn stop_updates(&self) -> impl Future<Output = ()>;
    /// Receive the next batch of events
    fn receive_events(&self) -> impl Future<Output = impl Iterator<Item = ProviderEvent>>;
}
