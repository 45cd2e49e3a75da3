use std::sync::Arc;

use log::{error, warn};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::{
    accuracy::AccuracyTier,
    authorization::{AuthorizationScope, AuthorizationState},
    prelude::*,
    provider::{LocationProvider, ProviderEvent},
    reporter::FixReporter,
    settings::SessionSettings,
    state::{SessionState, SessionStatus},
};

/// Hook fired after every status mutation so a presentation layer knows to
/// re-read [Session::status]
pub trait StatusUpdateSender {
    fn send_update(&self);
}

/// A location tracking session. Drives a [LocationProvider], keeps the status
/// snapshot current, and forwards every received fix to a [FixReporter].
pub struct Session<P: LocationProvider, R: FixReporter, S: StatusUpdateSender> {
    state: RwLock<SessionState>,
    provider: Arc<P>,
    reporter: R,
    status_updates: S,
    settings: SessionSettings,
    cancel: CancellationToken,
}

impl<P: LocationProvider, R: FixReporter, S: StatusUpdateSender> Session<P, R, S> {
    pub fn new(settings: SessionSettings, provider: Arc<P>, reporter: R, status_updates: S) -> Self {
        let state = SessionState::new(settings.initial_accuracy);

        Self {
            state: RwLock::new(state),
            provider,
            reporter,
            status_updates,
            settings,
            cancel: CancellationToken::new(),
        }
    }

    fn emit_status_update(&self) {
        self.status_updates.send_update();
    }

    /// Push the session settings to the platform and ask for an Always grant.
    /// The outcome arrives later as an authorization change event.
    pub async fn request_permission(&self) {
        self.provider.apply_settings(&self.settings).await;
        self.provider
            .request_authorization(AuthorizationScope::Always)
            .await;
    }

    /// Select the accuracy tier. Takes effect immediately and is re-applied
    /// before every start.
    pub async fn set_accuracy(&self, tier: AccuracyTier) {
        let mut state = self.state.write().await;
        state.accuracy = tier;
        drop(state);
        self.provider.set_accuracy(tier).await;
        self.emit_status_update();
    }

    /// Begin tracking. A denied grant re-requests WhenInUse authorization
    /// instead of starting updates.
    pub async fn start(&self) {
        let mut state = self.state.write().await;

        if state.authorization == AuthorizationState::Denied {
            drop(state);
            warn!("Location authorization denied, re-requesting");
            self.provider
                .request_authorization(AuthorizationScope::WhenInUse)
                .await;
            return;
        }

        self.provider.set_accuracy(state.accuracy).await;
        self.provider.start_updates().await;
        state.tracking = true;
        drop(state);
        self.emit_status_update();
    }

    /// Stop tracking.
    pub async fn stop(&self) {
        let mut state = self.state.write().await;
        self.provider.stop_updates().await;
        state.tracking = false;
        drop(state);
        self.emit_status_update();
    }

    /// Snapshot of the current session status
    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.as_status()
    }

    pub async fn quit(&self) {
        self.cancel.cancel();
    }

    async fn consume_event(&self, state: &mut SessionState, event: ProviderEvent) {
        match event {
            ProviderEvent::Fix(fix) => {
                state.record_fix(fix.clone());
                self.reporter.report(&fix).await;
            }
            ProviderEvent::AuthorizationChanged(auth) => {
                state.authorization = auth;
                match auth {
                    // Nothing to do until the user acts
                    AuthorizationState::NotDetermined
                    | AuthorizationState::Restricted
                    | AuthorizationState::Denied => {}
                    AuthorizationState::AuthorizedAlways
                    | AuthorizationState::AuthorizedWhenInUse => {
                        // Resume updates only if a start already succeeded
                        if state.tracking {
                            self.provider.start_updates().await;
                        }
                    }
                }
            }
            ProviderEvent::Error(why) => {
                error!("Location provider error: {why}");
                if self.settings.stop_on_error {
                    self.provider.stop_updates().await;
                    state.tracking = false;
                }
            }
        }

        self.emit_status_update();
    }

    /// Main loop of the session, consumes provider events until [Session::quit]
    pub async fn main_loop(&self) -> Result {
        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    break;
                }

                events = self.provider.receive_events() => {
                    let mut state = self.state.write().await;
                    for event in events {
                        self.consume_event(&mut state, event).await;
                    }
                }
            }
        }

        let mut state = self.state.write().await;
        if state.tracking {
            self.provider.stop_updates().await;
            state.tracking = false;
        }

        Ok(())
    }
}
