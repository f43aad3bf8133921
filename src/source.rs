//! Remote users collection seam
//!
//! The engine only sees this trait. [`crate::api::UsersApi`] is the HTTP
//! implementation; tests plug in scripted in-memory sources.

use crate::error::Result;
use crate::types::UsersPage;
use async_trait::async_trait;
use std::sync::Arc;

/// A remote, externally mutable collection of users
///
/// Implementations report an unreachable network as
/// [`crate::Error::Connectivity`] and a collection with zero users as
/// [`crate::Error::EmptyCollection`].
#[async_trait]
pub trait UsersSource: Send + Sync {
    /// Fetch page `page` (1-indexed) holding up to `page_size` users
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<UsersPage>;

    /// Fetch the current remote total
    async fn fetch_total_count(&self) -> Result<u64>;
}

#[async_trait]
impl<S: UsersSource + ?Sized> UsersSource for Arc<S> {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<UsersPage> {
        (**self).fetch_page(page, page_size).await
    }

    async fn fetch_total_count(&self) -> Result<u64> {
        (**self).fetch_total_count().await
    }
}
