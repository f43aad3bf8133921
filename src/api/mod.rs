//! Users API module
//!
//! HTTP/JSON client for the users directory REST API.
//!
//! # Endpoints
//!
//! - `GET /users?page=&count=` - one page of users plus the remote total
//! - `GET /positions` - open positions for registration
//! - `GET /token` - single-use registration token
//! - `POST /users` - multipart registration, authorized by the `Token` header
//!
//! Every response body is a `{"success": bool, ...}` envelope; failures carry
//! a `message` and optionally a `fails` map of field → reasons.

mod client;
mod types;

pub use client::{UsersApi, DEFAULT_BASE_URL};
pub use types::{
    decode_envelope, ApiFailure, Envelope, PositionsResponse, RegisteredResponse, TokenResponse,
    UsersResponse,
};

#[cfg(test)]
mod tests;
