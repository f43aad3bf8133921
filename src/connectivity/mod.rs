//! Connectivity module
//!
//! Answers "is the network usable right now" for the consumer: once at
//! session start to pick the first view, and again from the recovery view
//! whenever the user asks to retry.
//!
//! # Overview
//!
//! - `Connectivity` - synchronous availability check
//! - `TcpProbe` - checks that the API host accepts TCP connections
//! - `ManualConnectivity` - availability flag set by the embedder
//! - `RecoveryController` - async retry trigger for the recovery view

mod probe;
mod recovery;

pub use probe::{initial_view, Connectivity, InitialView, ManualConnectivity, TcpProbe};
pub use recovery::{RecoveryController, RecoveryEvent, STILL_OFFLINE_MESSAGE};

#[cfg(test)]
mod tests;
