use serde::{Deserialize, Serialize};

use geopost_core::{LocationFix, UtcDT};

/// Flat wire form of one fix. Field names are dictated by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub horizontal_accuracy: f64,
    pub vertical_accuracy: f64,
    pub course: f64,
    pub speed: f64,
    /// Wall-clock time the report was built, seconds since the Unix epoch
    pub timestamp: f64,
}

impl ReportPayload {
    pub fn new(fix: &LocationFix, reported_at: UtcDT) -> Self {
        Self {
            longitude: fix.longitude,
            latitude: fix.latitude,
            altitude: fix.altitude,
            horizontal_accuracy: fix.horizontal_accuracy,
            vertical_accuracy: fix.vertical_accuracy,
            course: fix.course,
            speed: fix.speed,
            timestamp: reported_at.timestamp_micros() as f64 / 1_000_000.0,
        }
    }
}
