//! Recovery view retry trigger

use super::probe::Connectivity;
use crate::engine::{CycleOutcome, PaginationEngine};
use crate::source::UsersSource;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Message shown when a retry finds the network still down
pub const STILL_OFFLINE_MESSAGE: &str = "Network is still unavailable";

/// Result of a retry from the recovery view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryEvent {
    /// Network is back; return to the user list
    Resume,
    /// Network is still down; tell the user
    StillOffline { message: String },
}

/// Drives the recovery view's retry action
pub struct RecoveryController<C> {
    connectivity: Arc<C>,
    events: broadcast::Sender<RecoveryEvent>,
}

impl<C: Connectivity + 'static> RecoveryController<C> {
    pub fn new(connectivity: Arc<C>) -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            connectivity,
            events,
        }
    }

    /// Subscribe to retry results
    pub fn subscribe(&self) -> broadcast::Receiver<RecoveryEvent> {
        self.events.subscribe()
    }

    /// Re-poll connectivity and broadcast the result
    ///
    /// The check runs on the blocking pool since probes may wait on sockets.
    pub async fn retry(&self) -> RecoveryEvent {
        let connectivity = Arc::clone(&self.connectivity);
        let available = match tokio::task::spawn_blocking(move || connectivity.is_available()).await
        {
            Ok(available) => available,
            Err(e) => {
                warn!("Connectivity check did not complete: {e}");
                false
            }
        };

        let event = if available {
            info!("Network available again");
            RecoveryEvent::Resume
        } else {
            RecoveryEvent::StillOffline {
                message: STILL_OFFLINE_MESSAGE.to_string(),
            }
        };

        if self.events.send(event.clone()).is_err() {
            debug!("No subscribers for recovery event");
        }
        event
    }

    /// Retry and, if the network is back, run a fetch cycle on `engine`
    pub async fn retry_and_resume<S: UsersSource>(
        &self,
        engine: &PaginationEngine<S>,
    ) -> (RecoveryEvent, Option<CycleOutcome>) {
        match self.retry().await {
            RecoveryEvent::Resume => (RecoveryEvent::Resume, Some(engine.request_more().await)),
            offline => (offline, None),
        }
    }
}

impl<C> std::fmt::Debug for RecoveryController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryController")
            .field("subscribers", &self.events.receiver_count())
            .finish_non_exhaustive()
    }
}
