//! Wire types of the users API

use crate::error::{Error, FieldFailures, Result};
use crate::types::{Position, User};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Successful `GET /users` body
#[derive(Debug, Clone, Deserialize)]
pub struct UsersResponse {
    pub total_users: u64,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    pub users: Vec<User>,
}

/// Successful `GET /positions` body
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    pub positions: Vec<Position>,
}

/// Successful `GET /token` body
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Successful `POST /users` body
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredResponse {
    pub user_id: u64,
    #[serde(default)]
    pub message: String,
}

/// Failure body: a message, plus per-field reasons on validation failures
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiFailure {
    pub message: String,
    #[serde(default)]
    pub fails: Option<FieldFailures>,
}

impl ApiFailure {
    /// Whether the server listed per-field reasons
    pub fn has_field_failures(&self) -> bool {
        self.fails.as_ref().is_some_and(|fails| !fails.is_empty())
    }

    /// Convert into a validation error, keeping field failures if any
    pub fn into_error(self) -> Error {
        match self.fails {
            Some(fails) if !fails.is_empty() => Error::validation_failures(self.message, fails),
            _ => Error::validation(self.message),
        }
    }
}

/// A decoded response envelope
#[derive(Debug, Clone)]
pub enum Envelope<T> {
    Success(T),
    Failure(ApiFailure),
}

/// Decode an envelope body
///
/// A body without a `success` flag is decoded as a success (the token
/// endpoint omits it on some deployments). Anything that is not a JSON object
/// matching either shape is a protocol error.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<Envelope<T>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| Error::protocol(format!("response is not JSON: {e}")))?;

    if !value.is_object() {
        return Err(Error::protocol("response is not a JSON object"));
    }

    match value.get("success").map(Value::as_bool) {
        Some(Some(true)) | None => serde_json::from_value(value)
            .map(Envelope::Success)
            .map_err(|e| Error::protocol(format!("malformed success body: {e}"))),
        Some(Some(false)) => serde_json::from_value(value)
            .map(Envelope::Failure)
            .map_err(|e| Error::protocol(format!("malformed failure body: {e}"))),
        Some(None) => Err(Error::protocol("`success` is not a boolean")),
    }
}
