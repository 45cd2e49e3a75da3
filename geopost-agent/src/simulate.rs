use std::{sync::Arc, time::Duration};

use chrono::Utc;
use log::debug;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use geopost_core::{
    AccuracyTier, AuthorizationScope, AuthorizationState, LocationFix, LocationProvider,
    ProviderEvent, SessionSettings,
};

/// Knobs for the simulated walk
#[derive(Debug, Clone)]
pub struct SimOptions {
    /// Time between synthesized fixes
    pub tick: Duration,
    /// Starting latitude, degrees
    pub origin_latitude: f64,
    /// Starting longitude, degrees
    pub origin_longitude: f64,
    /// Walk speed, meters per second
    pub speed: f64,
    /// Refuse authorization requests instead of granting them
    pub deny: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            origin_latitude: 39.9042,
            origin_longitude: 116.4074,
            speed: 1.4,
            deny: false,
        }
    }
}

struct SimState {
    latitude: f64,
    longitude: f64,
    heading: f64,
    accuracy: AccuracyTier,
    authorization: AuthorizationState,
    emitting: bool,
}

type EventQueue = (
    mpsc::Sender<ProviderEvent>,
    Mutex<mpsc::Receiver<ProviderEvent>>,
);

const METERS_PER_DEGREE: f64 = 111_320.0;

/// Stand-in for the platform location framework. Synthesizes a random walk on
/// a fixed tick while updates are started and a grant is in place;
/// authorization requests resolve instantly as grant or denial.
pub struct SimulatedProvider {
    opts: SimOptions,
    events: EventQueue,
    sim: Mutex<SimState>,
    cancel: CancellationToken,
}

impl SimulatedProvider {
    pub fn spawn(opts: SimOptions) -> Arc<Self> {
        let (tx, rx) = mpsc::channel(30);

        let provider = Arc::new(Self {
            sim: Mutex::new(SimState {
                latitude: opts.origin_latitude,
                longitude: opts.origin_longitude,
                heading: 0.0,
                accuracy: AccuracyTier::default(),
                authorization: AuthorizationState::default(),
                emitting: false,
            }),
            opts,
            events: (tx, Mutex::new(rx)),
            cancel: CancellationToken::new(),
        });

        tokio::spawn({
            let provider = provider.clone();
            async move {
                provider.run().await;
            }
        });

        provider
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    async fn push_event(&self, event: ProviderEvent) {
        self.events
            .0
            .send(event)
            .await
            .expect("Failed to push event");
    }

    async fn run(&self) {
        let mut interval = tokio::time::interval(self.opts.tick);

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    break;
                }

                _ = interval.tick() => {
                    if let Some(fix) = self.next_fix().await {
                        self.push_event(ProviderEvent::Fix(fix)).await;
                    }
                }
            }
        }
    }

    /// Advance the walk one tick. None while stopped or without a grant.
    async fn next_fix(&self) -> Option<LocationFix> {
        let mut sim = self.sim.lock().await;

        if !sim.emitting || !sim.authorization.is_authorized() {
            return None;
        }

        let error = sim.accuracy.horizontal_error_meters();

        sim.heading = (sim.heading + rand::random_range(-25.0..25.0)).rem_euclid(360.0);
        let step = self.opts.speed * self.opts.tick.as_secs_f64();
        let north = sim.heading.to_radians().cos();
        let east = sim.heading.to_radians().sin();
        sim.latitude += (step * north) / METERS_PER_DEGREE;
        sim.longitude += (step * east) / (METERS_PER_DEGREE * sim.latitude.to_radians().cos());

        let jitter = || rand::random_range(-error..error) / METERS_PER_DEGREE;

        Some(LocationFix {
            longitude: sim.longitude + jitter(),
            latitude: sim.latitude + jitter(),
            altitude: 43.5 + rand::random_range(-2.0..2.0),
            horizontal_accuracy: error,
            vertical_accuracy: error * 1.5,
            course: sim.heading,
            speed: self.opts.speed,
            timestamp: Utc::now(),
        })
    }
}

impl LocationProvider for SimulatedProvider {
    async fn apply_settings(&self, settings: &SessionSettings) {
        // The walk has no real distance filter, just record the ask
        debug!("Simulated provider settings: {settings:?}");
    }

    async fn request_authorization(&self, scope: AuthorizationScope) {
        let granted = match scope {
            _ if self.opts.deny => AuthorizationState::Denied,
            AuthorizationScope::Always => AuthorizationState::AuthorizedAlways,
            AuthorizationScope::WhenInUse => AuthorizationState::AuthorizedWhenInUse,
        };

        let mut sim = self.sim.lock().await;
        if sim.authorization != granted {
            sim.authorization = granted;
            drop(sim);
            self.push_event(ProviderEvent::AuthorizationChanged(granted))
                .await;
        }
    }

    async fn set_accuracy(&self, tier: AccuracyTier) {
        self.sim.lock().await.accuracy = tier;
    }

    async fn start_updates(&self) {
        self.sim.lock().await.emitting = true;
    }

    async fn stop_updates(&self) {
        self.sim.lock().await.emitting = false;
    }

    async fn receive_events(&self) -> impl Iterator<Item = ProviderEvent> {
        let mut rx = self.events.1.lock().await;
        let mut buf = Vec::with_capacity(30);
        rx.recv_many(&mut buf, 30).await;
        buf.into_iter()
    }
}
