//! Execution engine module
//!
//! Incremental, re-entrancy safe loading of the remote user list.
//!
//! # Overview
//!
//! The engine module provides:
//! - `PaginationEngine` - runs guarded fetch cycles against a `UsersSource`
//! - `UsersView` - the latest state, published through a `watch` channel
//! - `EngineEvent` - one-shot notifications, published through a `broadcast` channel
//! - `CycleOutcome` - how each `request_more` call ended
//!
//! The remote total is treated as a hint: it is re-read before deciding to
//! stop and again after every page, because other clients may register users
//! while this one scrolls.

mod types;

pub use types::{
    CycleOutcome, EngineConfig, EngineEvent, EngineStats, UsersView, DEFAULT_EVENT_CAPACITY,
    DEFAULT_PAGE_SIZE,
};

use crate::error::{Error, ErrorKind, Result};
use crate::pagination::{CycleDraft, PaginationState};
use crate::source::UsersSource;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, watch, RwLock};
use tracing::{debug, info, warn};

/// Mutable engine state; the lock is never held across a network call
#[derive(Debug, Default)]
struct Inner {
    state: PaginationState,
    stats: EngineStats,
    error: Option<String>,
}

/// Clears the in-flight flag on every exit path, including a dropped future
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Paginated user-list synchronization engine
///
/// One engine serves one browsing session. Consumers call
/// [`request_more`](Self::request_more) on mount and whenever the end of
/// the list comes into view, and render whatever [`subscribe`](Self::subscribe)
/// yields.
pub struct PaginationEngine<S> {
    source: S,
    config: EngineConfig,
    inner: RwLock<Inner>,
    in_flight: AtomicBool,
    view: watch::Sender<UsersView>,
    events: broadcast::Sender<EngineEvent>,
}

impl<S: UsersSource> PaginationEngine<S> {
    /// Create an engine with default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    /// Create an engine with custom configuration
    pub fn with_config(source: S, config: EngineConfig) -> Self {
        let (view, _) = watch::channel(UsersView::default());
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            source,
            config,
            inner: RwLock::new(Inner::default()),
            in_flight: AtomicBool::new(false),
            view,
            events,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<UsersView> {
        self.view.subscribe()
    }

    /// Subscribe to one-shot events
    ///
    /// Only events sent after subscribing are delivered.
    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Latest published view
    pub fn view(&self) -> UsersView {
        self.view.borrow().clone()
    }

    /// Copy of the pagination state
    pub async fn snapshot(&self) -> PaginationState {
        self.inner.read().await.state.clone()
    }

    /// Get statistics
    pub async fn stats(&self) -> EngineStats {
        self.inner.read().await.stats.clone()
    }

    /// Whether a fetch cycle is currently running
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run the first cycle of the session
    ///
    /// Skipped once anything has been loaded or a cycle has completed; later
    /// loads go through [`request_more`](Self::request_more).
    pub async fn load_initial(&self) -> CycleOutcome {
        {
            let inner = self.inner.read().await;
            if inner.state.has_completed_cycle() || !inner.state.users().is_empty() {
                return CycleOutcome::Skipped;
            }
        }
        self.request_more().await
    }

    /// Fetch the next page if the remote collection may hold unseen users
    ///
    /// A no-op returning [`CycleOutcome::Skipped`] while another cycle runs.
    pub async fn request_more(&self) -> CycleOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Fetch cycle already in flight, ignoring request");
            self.inner.write().await.stats.skipped += 1;
            return CycleOutcome::Skipped;
        };

        self.inner.write().await.stats.cycles += 1;
        self.view.send_modify(|view| view.is_loading = true);

        match self.run_cycle().await {
            Ok(outcome) => {
                self.publish().await;
                outcome
            }
            Err(err) => self.fail(err).await,
        }
    }

    async fn run_cycle(&self) -> Result<CycleOutcome> {
        let (mut draft, page, loaded) = {
            let inner = self.inner.read().await;
            (
                inner.state.begin_cycle(),
                inner.state.current_page(),
                inner.state.users().len(),
            )
        };

        if draft.should_refresh_total {
            match self.source.fetch_total_count().await {
                Ok(total) => draft.observe_total(total),
                Err(err) if err.kind() == ErrorKind::EmptyCollection => {
                    info!("Remote user collection is empty");
                    draft.mark_empty();
                    self.commit(draft).await;
                    return Ok(CycleOutcome::Empty);
                }
                Err(err) => return Err(err),
            }
        }

        if draft.covers(loaded) {
            debug!(loaded, total = ?draft.total_count, "All users have been loaded");
            draft.mark_exhausted();
            self.commit(draft).await;
            return Ok(CycleOutcome::Exhausted);
        }

        let fetched = match self.source.fetch_page(page, self.config.page_size).await {
            Ok(fetched) => fetched,
            Err(err) if err.kind() == ErrorKind::EmptyCollection => {
                warn!(page, "Page cursor is past the last remote page: {err}");
                draft.mark_page_missing();
                self.commit(draft).await;
                return Ok(CycleOutcome::Exhausted);
            }
            Err(err) => return Err(err),
        };

        // The collection may have changed while the page was in transit
        let refreshed_total = match self.source.fetch_total_count().await {
            Ok(total) => total,
            Err(err) if err.kind() == ErrorKind::EmptyCollection => {
                info!(page, "Remote user collection emptied while the page was in transit");
                draft.mark_empty();
                self.commit(draft).await;
                return Ok(CycleOutcome::Empty);
            }
            Err(err) => return Err(err),
        };

        let mut inner = self.inner.write().await;
        let received = fetched.items.len();
        let added = inner.state.commit_page(draft, fetched.items, refreshed_total);
        inner.stats.pages_fetched += 1;
        inner.error = None;
        debug!(
            page,
            received,
            added,
            total = refreshed_total,
            "Page merged"
        );

        Ok(CycleOutcome::Loaded { page, added })
    }

    async fn commit(&self, draft: CycleDraft) {
        let mut inner = self.inner.write().await;
        inner.state.apply(draft);
        inner.error = None;
    }

    async fn fail(&self, err: Error) -> CycleOutcome {
        let kind = err.kind();
        let outcome = match kind {
            ErrorKind::Connectivity => {
                warn!("Network unreachable, fetch cycle aborted: {err}");
                self.inner.write().await.stats.offline += 1;
                if self.events.send(EngineEvent::NavigateToOffline).is_err() {
                    debug!("No event subscribers for offline notification");
                }
                CycleOutcome::Offline
            }
            ErrorKind::EmptyCollection
            | ErrorKind::Validation
            | ErrorKind::Protocol
            | ErrorKind::Transport
            | ErrorKind::Internal => {
                warn!(?kind, "Fetch cycle failed: {err}");
                let mut inner = self.inner.write().await;
                inner.stats.failures += 1;
                inner.error = Some(err.to_string());
                CycleOutcome::Failed(kind)
            }
        };

        self.publish().await;
        outcome
    }

    async fn publish(&self) {
        let inner = self.inner.read().await;
        self.view.send_replace(UsersView {
            users: inner.state.users().to_vec(),
            is_loading: false,
            has_more: inner.state.has_more(),
            error: inner.error.clone(),
        });
    }
}

impl<S> std::fmt::Debug for PaginationEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
