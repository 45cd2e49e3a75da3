use serde::{Deserialize, Serialize};

/// Desired precision/power tradeoff, forwarded to the platform before updates
/// start. Coarser tiers save power at the cost of wider error bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccuracyTier {
    /// Highest precision the hardware can deliver, meant for turn-by-turn use
    BestForNavigation,
    /// Highest precision for general use
    #[default]
    Best,
    /// Accurate to roughly ten meters
    TenMeters,
    /// Accurate to roughly a hundred meters
    HundredMeters,
    /// Accurate to roughly a kilometer
    Kilometer,
}

impl AccuracyTier {
    pub const ALL: [AccuracyTier; 5] = [
        AccuracyTier::BestForNavigation,
        AccuracyTier::Best,
        AccuracyTier::TenMeters,
        AccuracyTier::HundredMeters,
        AccuracyTier::Kilometer,
    ];

    /// Nominal horizontal error bound for the tier, meters
    pub fn horizontal_error_meters(self) -> f64 {
        match self {
            Self::BestForNavigation => 2.0,
            Self::Best => 5.0,
            Self::TenMeters => 10.0,
            Self::HundredMeters => 100.0,
            Self::Kilometer => 1000.0,
        }
    }
}
