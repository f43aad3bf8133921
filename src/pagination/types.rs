//! Pagination state
//!
//! `PaginationState` is owned by exactly one engine. A fetch cycle never
//! mutates it directly: it copies the scalar fields into a [`CycleDraft`],
//! works on the draft across its network calls, and hands the draft back
//! only when the cycle ends without failure.

use super::merge::merge_into;
use crate::types::User;

/// Scalar state changes staged by one fetch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleDraft {
    /// Cached remote total, `None` while unknown
    pub total_count: Option<u64>,
    /// Whether a further fetch is expected to yield new users
    pub has_more: bool,
    /// Re-validate the remote total before the next decision
    pub should_refresh_total: bool,
}

impl CycleDraft {
    /// Record a freshly fetched remote total
    ///
    /// A total larger than the cached one (an unknown total counts as lower
    /// than any) re-opens the list.
    pub fn observe_total(&mut self, total: u64) {
        if self.total_count.map_or(true, |known| total > known) {
            self.has_more = true;
        }
        self.total_count = Some(total);
        self.should_refresh_total = false;
    }

    /// The server reported zero users; keep re-checking on later cycles
    pub fn mark_empty(&mut self) {
        self.total_count = Some(0);
        self.has_more = false;
        self.should_refresh_total = true;
    }

    /// The current page does not exist on the server
    ///
    /// The cached total still claims more users, so `has_more` is left alone
    /// and the total is re-validated before the page is requested again.
    pub fn mark_page_missing(&mut self) {
        self.should_refresh_total = true;
    }

    /// Everything known has been loaded; re-validate the total next time
    pub fn mark_exhausted(&mut self) {
        self.has_more = false;
        self.should_refresh_total = true;
    }

    /// Whether `loaded` users already cover the cached total
    pub fn covers(&self, loaded: usize) -> bool {
        self.total_count.map_or(true, |total| total <= loaded as u64)
    }
}

/// Accumulated user list and page cursor of one browsing session
#[derive(Debug, Clone)]
pub struct PaginationState {
    users: Vec<User>,
    current_page: u32,
    total_count: Option<u64>,
    has_more: bool,
    should_refresh_total: bool,
    completed_cycles: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationState {
    /// Create an empty state positioned at page 1
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            current_page: 1,
            total_count: None,
            has_more: true,
            should_refresh_total: true,
            completed_cycles: 0,
        }
    }

    /// Users loaded so far, in arrival order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Next page to fetch (1-indexed)
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Cached remote total
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn should_refresh_total(&self) -> bool {
        self.should_refresh_total
    }

    /// Whether any cycle has run to a non-failing end
    pub fn has_completed_cycle(&self) -> bool {
        self.completed_cycles > 0
    }

    /// Snapshot the scalar fields for a new cycle
    pub fn begin_cycle(&self) -> CycleDraft {
        CycleDraft {
            total_count: self.total_count,
            has_more: self.has_more,
            should_refresh_total: self.should_refresh_total,
        }
    }

    /// Commit a cycle that ended without fetching a page
    pub fn apply(&mut self, draft: CycleDraft) {
        self.total_count = draft.total_count;
        self.has_more = draft.has_more;
        self.should_refresh_total = draft.should_refresh_total;
        self.completed_cycles += 1;
    }

    /// Commit a cycle that fetched `items` from the current page
    ///
    /// Stores the total read after the page, advances the cursor by one and
    /// returns how many previously unseen users were appended.
    pub fn commit_page(
        &mut self,
        draft: CycleDraft,
        items: Vec<User>,
        refreshed_total: u64,
    ) -> usize {
        self.apply(draft);
        self.total_count = Some(refreshed_total);
        self.current_page += 1;
        merge_into(&mut self.users, items)
    }
}
