//! Engine types
//!
//! Configuration, published view, one-shot events and cycle outcomes of the
//! pagination engine.

use crate::error::ErrorKind;
use crate::types::User;

/// Default number of users requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// Default capacity of the one-shot event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 16;

/// Configuration for a pagination engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Users requested per page
    pub page_size: u32,
    /// Buffered one-shot events per subscriber before old ones are dropped
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Create a new engine config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set event channel capacity
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

/// What subscribers render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersView {
    /// Users loaded so far, in arrival order
    pub users: Vec<User>,
    /// A fetch cycle is running
    pub is_loading: bool,
    /// A further fetch is expected to yield new users
    pub has_more: bool,
    /// Message of the last failed cycle, cleared by the next successful one
    pub error: Option<String>,
}

impl Default for UsersView {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            is_loading: false,
            has_more: true,
            error: None,
        }
    }
}

impl UsersView {
    /// Nothing loaded, nothing loading and nothing more expected
    pub fn is_empty_collection(&self) -> bool {
        self.users.is_empty() && !self.is_loading && !self.has_more
    }
}

/// One-shot notifications for the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The network is unreachable; show the recovery view
    NavigateToOffline,
}

/// How a single `request_more` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was already in flight
    Skipped,
    /// A page was fetched and merged
    Loaded {
        /// Page number that was fetched
        page: u32,
        /// Previously unseen users appended
        added: usize,
    },
    /// No further page is available right now
    Exhausted,
    /// The server reports zero users
    Empty,
    /// The network is unreachable; state is unchanged
    Offline,
    /// The cycle failed for another reason; state is unchanged
    Failed(ErrorKind),
}

impl CycleOutcome {
    /// Check if the cycle left state untouched because it failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Offline | Self::Failed(_))
    }
}

/// Counters accumulated over the engine's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Cycles that actually ran
    pub cycles: usize,
    /// Calls rejected by the in-flight guard
    pub skipped: usize,
    /// Pages fetched and committed
    pub pages_fetched: usize,
    /// Offline cycles
    pub offline: usize,
    /// Cycles failed for other reasons
    pub failures: usize,
}
