// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # userdir-sync
//!
//! Incremental synchronization of a remote, paginated user directory.
//!
//! The crate keeps a growing, de-duplicated list of users in step with a
//! REST API whose collection may grow while the client scrolls. Consumers
//! drive it with "load more" signals and observe the result through channels.
//!
//! ## Features
//!
//! - **Guarded Fetch Cycles**: at most one cycle in flight; extra triggers are dropped
//! - **Drift Tolerant Paging**: the remote total is re-read around every page
//! - **Identity De-duplication**: overlapping pages never produce duplicate users
//! - **Offline Signalling**: connectivity failures become a one-shot navigation event
//! - **Registration**: positions, token and multipart `POST /users`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use userdir_sync::{ClientConfig, PaginationEngine, UsersApi};
//!
//! #[tokio::main]
//! async fn main() -> userdir_sync::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let engine = PaginationEngine::with_config(
//!         UsersApi::from_config(&config)?,
//!         config.engine_config(),
//!     );
//!
//!     let mut view = engine.subscribe();
//!     engine.load_initial().await;
//!     println!("{} users", view.borrow_and_update().users.len());
//!
//!     // on scroll
//!     engine.request_more().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PaginationEngine                        │
//! │  request_more() → CycleOutcome   subscribe() → UsersView     │
//! │  subscribe_events() → EngineEvent::NavigateToOffline         │
//! └──────────────────────────────────────────────────────────────┘
//!                 │                              │
//! ┌───────────────┴──────────┐   ┌───────────────┴──────────────┐
//! │ UsersSource (UsersApi)   │   │ Pagination                   │
//! ├──────────────────────────┤   ├──────────────────────────────┤
//! │ HTTP retry + backoff     │   │ page cursor, cached total    │
//! │ envelope decoding        │   │ identity merge               │
//! └──────────────────────────┘   └──────────────────────────────┘
//!                 │
//! ┌───────────────┴──────────────────────────────────────────────┐
//! │ Connectivity                                                 │
//! │   TcpProbe / ManualConnectivity → RecoveryController         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and classification
pub mod error;

/// Domain types
pub mod types;

/// Client configuration
pub mod config;

/// HTTP client with retry and backoff
pub mod http;

/// Users directory REST client
pub mod api;

/// Data source seam used by the engine
pub mod source;

/// Page cursor and de-duplication
pub mod pagination;

/// Guarded fetch cycles and state publication
pub mod engine;

/// Network availability and recovery
pub mod connectivity;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use api::UsersApi;
pub use config::ClientConfig;
pub use connectivity::{
    initial_view, Connectivity, InitialView, ManualConnectivity, RecoveryController,
    RecoveryEvent, TcpProbe,
};
pub use engine::{CycleOutcome, EngineConfig, EngineEvent, PaginationEngine, UsersView};
pub use source::UsersSource;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
