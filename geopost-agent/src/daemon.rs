use std::{sync::Arc, time::Duration};

use clap::Parser;
use interprocess::local_socket::{ListenerOptions, tokio::prelude::*};
use log::{error, info};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
};

use geopost_agent::{
    AgentRequest, AgentResponse, get_socket_name,
    prelude::*,
    simulate::{SimOptions, SimulatedProvider},
};
use geopost_core::{Session, SessionSettings, StatusUpdateSender};
use geopost_report::HttpReporter;

/// Headless location agent: tracks a simulated walk and reports every fix to
/// the remote endpoint
#[derive(Parser)]
struct Cli {
    /// Name of the local control socket to listen on
    socket: String,

    /// Milliseconds between simulated fixes
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Starting latitude of the simulated walk
    #[arg(long, default_value_t = 39.9042)]
    latitude: f64,

    /// Starting longitude of the simulated walk
    #[arg(long, default_value_t = 116.4074)]
    longitude: f64,

    /// Refuse authorization requests, for exercising the denied path
    #[arg(long)]
    deny: bool,

    /// Report to this URL instead of the compiled-in endpoint
    #[arg(long)]
    report_url: Option<String>,

    /// Stop tracking when the provider reports an error
    #[arg(long)]
    stop_on_error: bool,
}

struct UpdateSender(mpsc::Sender<()>);

impl StatusUpdateSender for UpdateSender {
    fn send_update(&self) {
        // Coalesced: a full channel already has a wakeup pending
        self.0.try_send(()).ok();
    }
}

type AgentSession = Session<SimulatedProvider, HttpReporter, UpdateSender>;

async fn handle_request(session: &AgentSession, req: AgentRequest) -> AgentResponse {
    match req {
        AgentRequest::RequestPermission => {
            session.request_permission().await;
            AgentResponse::Ack
        }
        AgentRequest::SetAccuracy(tier) => {
            session.set_accuracy(tier).await;
            AgentResponse::Ack
        }
        AgentRequest::Start => {
            session.start().await;
            AgentResponse::Ack
        }
        AgentRequest::Stop => {
            session.stop().await;
            AgentResponse::Ack
        }
        AgentRequest::Status => session.status().await.into(),
        AgentRequest::Quit => {
            session.quit().await;
            AgentResponse::Ack
        }
    }
}

async fn write_response<W: AsyncWriteExt + Unpin>(stream: &mut W, resp: &AgentResponse) {
    match serde_json::to_vec(resp) {
        Ok(mut encoded) => {
            encoded.push(b'\n');
            if let Err(why) = stream.write_all(&encoded).await {
                error!("Failed to send response: {why:?}");
            }
        }
        Err(why) => error!("Failed to encode response: {why:?}"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    colog::init();
    let cli = Cli::parse();

    let socket_name = get_socket_name(cli.socket.clone())?;
    let opts = ListenerOptions::new().name(socket_name);
    let listener = opts.create_tokio().context("Failed to bind to socket")?;

    let provider = SimulatedProvider::spawn(SimOptions {
        tick: Duration::from_millis(cli.tick_ms),
        origin_latitude: cli.latitude,
        origin_longitude: cli.longitude,
        deny: cli.deny,
        ..Default::default()
    });

    let reporter = match cli.report_url.clone() {
        Some(url) => HttpReporter::with_url(url),
        None => HttpReporter::new(),
    }
    .context("Failed to build reporter")?;

    let settings = SessionSettings {
        stop_on_error: cli.stop_on_error,
        ..Default::default()
    };

    let (update_tx, mut update_rx) = mpsc::channel(2);
    let session = Arc::new(AgentSession::new(
        settings,
        provider.clone(),
        reporter,
        UpdateSender(update_tx),
    ));

    let session_loop = tokio::spawn({
        let session = session.clone();
        async move { session.main_loop().await }
    });

    info!(
        "geopost daemon {} ready on {}",
        env!("CARGO_PKG_VERSION"),
        cli.socket
    );

    'server: loop {
        let res = tokio::select! {
            res = listener.accept() => {
                res
            },
            Ok(_) = tokio::signal::ctrl_c() => {
                break 'server;
            }
        };

        match res {
            Ok(stream) => {
                let mut recv = BufReader::new(&stream);
                let mut send = &stream;

                let mut buffer = String::with_capacity(256);

                loop {
                    tokio::select! {
                        Ok(_) = tokio::signal::ctrl_c() => {
                            break 'server;
                        }
                        res = recv.read_line(&mut buffer) => {
                            match res {
                                Ok(0) => {
                                    break;
                                }
                                Ok(_amnt) => {
                                    let resp = match serde_json::from_str(buffer.trim_end()) {
                                        Ok(req) => {
                                            let quit = matches!(&req, AgentRequest::Quit);
                                            let resp = handle_request(&session, req).await;
                                            if quit {
                                                write_response(&mut send, &resp).await;
                                                break 'server;
                                            }
                                            resp
                                        }
                                        Err(why) => AgentResponse::Error(format!("Bad request: {why}")),
                                    };
                                    buffer.clear();
                                    write_response(&mut send, &resp).await;
                                }
                                Err(why) => {
                                    error!("Read error: {why:?}");
                                }
                            }
                        }
                        Some(_) = update_rx.recv() => {
                            let resp = AgentResponse::from(session.status().await);
                            write_response(&mut send, &resp).await;
                        }
                    }
                }
            }
            Err(why) => error!("Error from connection: {why:?}"),
        }
    }

    session.quit().await;
    provider.shutdown();
    session_loop
        .await
        .context("Session loop panicked")?
        .context("Session loop failed")?;

    Ok(())
}
