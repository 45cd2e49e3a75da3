use serde::{Deserialize, Serialize};

use super::accuracy::AccuracyTier;

/// Settings for a tracking session, pushed to the platform when permission is
/// requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Minimum movement in meters before the platform delivers a new fix
    pub distance_filter_meters: f64,
    /// Keep delivering updates while the app is backgrounded
    pub allow_background_updates: bool,
    /// Let the platform pause updates on its own to save power
    pub pauses_updates_automatically: bool,
    /// Stop tracking when the provider reports an error
    pub stop_on_error: bool,
    /// Tier applied before tracking starts
    pub initial_accuracy: AccuracyTier,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            distance_filter_meters: 1.0,
            allow_background_updates: true,
            pauses_updates_automatically: false,
            stop_on_error: false,
            initial_accuracy: AccuracyTier::default(),
        }
    }
}
