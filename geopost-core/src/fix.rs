use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Convenience alias for UTC DT
pub type UtcDT = DateTime<Utc>;

/// One location sample as delivered by the platform. Immutable snapshot,
/// created per update and consumed once by the reporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub longitude: f64,
    pub latitude: f64,
    /// Meters above sea level
    pub altitude: f64,
    /// Radius of the horizontal confidence circle, meters
    pub horizontal_accuracy: f64,
    /// Altitude error bound, meters
    pub vertical_accuracy: f64,
    /// Heading in degrees clockwise from true north
    pub course: f64,
    /// Meters per second
    pub speed: f64,
    /// When the platform captured the sample
    pub timestamp: UtcDT,
}
