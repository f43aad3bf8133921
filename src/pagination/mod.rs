//! Pagination module
//!
//! Page-cursor bookkeeping and identity de-duplication for the user list.
//!
//! # Overview
//!
//! - `PaginationState` - accumulated users, page cursor, cached remote total
//! - `CycleDraft` - scalar changes staged during one fetch cycle
//! - `merge` / `merge_into` - order-preserving, set-backed de-duplication

mod merge;
mod types;

pub use merge::{merge, merge_into, Identified};
pub use types::{CycleDraft, PaginationState};
