use std::sync::Arc;

use chrono::TimeZone;
use tokio::{
    sync::{Mutex, mpsc},
    task::yield_now,
};

use crate::{
    AccuracyTier, AuthorizationScope, FixReporter, LocationFix, LocationProvider, ProviderEvent,
    SessionSettings, StatusUpdateSender,
};

type EventRx = mpsc::Receiver<ProviderEvent>;
type EventTx = mpsc::Sender<ProviderEvent>;

/// Commands a [MockProvider] records for assertions
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    ApplySettings(SessionSettings),
    RequestAuthorization(AuthorizationScope),
    SetAccuracy(AccuracyTier),
    StartUpdates,
    StopUpdates,
}

/// Stand-in platform: tests inject events, the session's commands are logged
pub struct MockProvider {
    tx: EventTx,
    rx: Mutex<EventRx>,
    commands: Mutex<Vec<ProviderCommand>>,
}

impl MockProvider {
    pub fn new() -> Arc<Self> {
        let (tx, rx) = mpsc::channel(20);
        Arc::new(Self {
            tx,
            rx: Mutex::new(rx),
            commands: Mutex::new(Vec::new()),
        })
    }

    pub async fn push_event(&self, event: ProviderEvent) {
        self.tx.send(event).await.expect("Failed to push event");
    }

    pub async fn push_fix(&self, fix: LocationFix) {
        self.push_event(ProviderEvent::Fix(fix)).await;
    }

    pub async fn wait_for_queue_empty(&self) {
        loop {
            if self.tx.capacity() == self.tx.max_capacity() {
                break;
            } else {
                yield_now().await;
            }
        }
    }

    pub async fn commands(&self) -> Vec<ProviderCommand> {
        self.commands.lock().await.clone()
    }

    async fn record(&self, command: ProviderCommand) {
        self.commands.lock().await.push(command);
    }
}

impl LocationProvider for MockProvider {
    async fn apply_settings(&self, settings: &SessionSettings) {
        self.record(ProviderCommand::ApplySettings(settings.clone()))
            .await;
    }

    async fn request_authorization(&self, scope: AuthorizationScope) {
        self.record(ProviderCommand::RequestAuthorization(scope))
            .await;
    }

    async fn set_accuracy(&self, tier: AccuracyTier) {
        self.record(ProviderCommand::SetAccuracy(tier)).await;
    }

    async fn start_updates(&self) {
        self.record(ProviderCommand::StartUpdates).await;
    }

    async fn stop_updates(&self) {
        self.record(ProviderCommand::StopUpdates).await;
    }

    async fn receive_events(&self) -> impl Iterator<Item = ProviderEvent> {
        let mut rx = self.rx.lock().await;
        let mut buf = Vec::with_capacity(20);
        rx.recv_many(&mut buf, 20).await;
        buf.into_iter()
    }
}

/// Reporter that keeps everything it is handed
#[derive(Clone, Default)]
pub struct CapturingReporter(Arc<Mutex<Vec<LocationFix>>>);

impl CapturingReporter {
    pub async fn fixes(&self) -> Vec<LocationFix> {
        self.0.lock().await.clone()
    }
}

impl FixReporter for CapturingReporter {
    async fn report(&self, fix: &LocationFix) {
        self.0.lock().await.push(fix.clone());
    }
}

pub struct DummySender;

impl StatusUpdateSender for DummySender {
    fn send_update(&self) {}
}

/// Deterministic fix for assertions, varied by `seq`
pub fn mk_fix(seq: f64) -> LocationFix {
    LocationFix {
        longitude: 116.0 + seq * 0.001,
        latitude: 39.0 + seq * 0.001,
        altitude: 50.0 + seq,
        horizontal_accuracy: 5.0,
        vertical_accuracy: 8.0,
        course: 90.0,
        speed: 1.5,
        timestamp: chrono::Utc
            .timestamp_opt(1_740_000_000 + seq as i64, 0)
            .unwrap(),
    }
}
