use interprocess::local_socket::{GenericNamespaced, Name, ToNsName};
use serde::{Deserialize, Serialize};

use geopost_core::{AccuracyTier, SessionStatus};

pub mod prelude {
    pub use anyhow::{Context, anyhow, bail};
    pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
}

pub use prelude::*;

pub mod simulate;

pub fn get_socket_name(base_name: String) -> Result<Name<'static>> {
    base_name
        .to_ns_name::<GenericNamespaced>()
        .context("Failed to parse socket name")
}

/// A command for a running agent, one JSON line per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentRequest {
    /// Push settings to the provider and ask for an Always grant
    RequestPermission,
    /// Select the accuracy tier
    SetAccuracy(AccuracyTier),
    /// Begin tracking
    Start,
    /// Stop tracking
    Stop,
    /// Read the current status
    Status,
    /// Shut the agent down
    Quit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgentResponse {
    /// The request was accepted
    Ack,
    /// Current session status, sent as a reply and pushed on changes
    Status(SessionStatus),
    Error(String),
}

impl From<SessionStatus> for AgentResponse {
    fn from(val: SessionStatus) -> Self {
        AgentResponse::Status(val)
    }
}

impl From<anyhow::Error> for AgentResponse {
    fn from(value: anyhow::Error) -> Self {
        AgentResponse::Error(value.to_string())
    }
}
