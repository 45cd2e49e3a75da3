use clap::{Parser, Subcommand, ValueEnum};
use interprocess::local_socket::{tokio::Stream, traits::tokio::Stream as _};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use geopost_agent::{AgentRequest, get_socket_name, prelude::*};
use geopost_core::AccuracyTier;

/// Control a running geopost daemon
#[derive(Parser)]
struct Cli {
    /// Name of the local socket the daemon is listening on
    socket: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AccuracyTierValue {
    BestForNavigation,
    Best,
    TenMeters,
    HundredMeters,
    Kilometer,
}

impl From<AccuracyTierValue> for AccuracyTier {
    fn from(value: AccuracyTierValue) -> Self {
        match value {
            AccuracyTierValue::BestForNavigation => AccuracyTier::BestForNavigation,
            AccuracyTierValue::Best => AccuracyTier::Best,
            AccuracyTierValue::TenMeters => AccuracyTier::TenMeters,
            AccuracyTierValue::HundredMeters => AccuracyTier::HundredMeters,
            AccuracyTierValue::Kilometer => AccuracyTier::Kilometer,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Push settings to the provider and request an Always grant
    RequestPermission,
    /// Select the accuracy tier
    SetAccuracy {
        #[arg(value_enum)]
        tier: AccuracyTierValue,
    },
    /// Begin tracking
    Start,
    /// Stop tracking
    Stop,
    /// Print the daemon's current status
    Status,
    /// Shut the daemon down
    Quit,
}

impl From<Commands> for AgentRequest {
    fn from(value: Commands) -> Self {
        match value {
            Commands::RequestPermission => AgentRequest::RequestPermission,
            Commands::SetAccuracy { tier } => AgentRequest::SetAccuracy(tier.into()),
            Commands::Start => AgentRequest::Start,
            Commands::Stop => AgentRequest::Stop,
            Commands::Status => AgentRequest::Status,
            Commands::Quit => AgentRequest::Quit,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let cli = Cli::parse();

    let socket_name = get_socket_name(cli.socket.clone()).context("Failed to get socket name")?;

    let stream = Stream::connect(socket_name)
        .await
        .context("Failed to connect to socket")?;

    let mut recv = BufReader::new(&stream);
    let mut send = &stream;

    let request = AgentRequest::from(cli.command);
    let mut encoded = serde_json::to_vec(&request).context("Failed to encode request")?;
    encoded.push(b'\n');
    send.write_all(&encoded)
        .await
        .context("Failed to send request")?;

    let mut response = String::with_capacity(256);
    recv.read_line(&mut response)
        .await
        .context("Failed to read response")?;
    println!("{}", response.trim_end());

    Ok(())
}
