mod accuracy;
mod authorization;
mod fix;
mod provider;
mod reporter;
mod session;
mod settings;
mod state;
#[cfg(test)]
mod tests;

pub use accuracy::AccuracyTier;
pub use authorization::{AuthorizationScope, AuthorizationState};
pub use fix::{LocationFix, UtcDT};
pub use provider::{LocationProvider, ProviderEvent};
pub use reporter::FixReporter;
pub use session::{Session, StatusUpdateSender};
pub use settings::SessionSettings;
pub use state::SessionStatus;

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
