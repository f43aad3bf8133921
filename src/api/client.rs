//! Users API client

use super::types::{
    decode_envelope, Envelope, PositionsResponse, RegisteredResponse, TokenResponse, UsersResponse,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::source::UsersSource;
use crate::types::{NewUser, Position, UsersPage};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, info};

/// Base URL of the public test-assignment deployment
pub const DEFAULT_BASE_URL: &str = "https://frontend-test-assignment-api.abz.agency/api/v1/";

/// Client for the users directory API
#[derive(Debug, Clone)]
pub struct UsersApi {
    http: HttpClient,
}

impl UsersApi {
    /// Create a client over an existing HTTP client
    ///
    /// The HTTP client should carry the API base URL.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(HttpClient::with_config(config.http_client_config())?))
    }

    /// Get the underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Fetch one page of users
    ///
    /// A 404 failure (page past the end, or no users at all) maps to
    /// `Error::EmptyCollection`.
    pub async fn users(&self, page: u32, count: u32) -> Result<UsersPage> {
        let config = RequestConfig::new().query("page", page).query("count", count);
        let response = self.http.get_with_config("users", config).await?;
        let (status, envelope) = read_envelope::<UsersResponse>(response).await?;

        match envelope {
            Envelope::Success(body) => {
                debug!(
                    page,
                    received = body.users.len(),
                    total = body.total_users,
                    "Fetched users page"
                );
                Ok(UsersPage::new(body.total_users, body.users))
            }
            Envelope::Failure(failure)
                if status == StatusCode::NOT_FOUND && !failure.has_field_failures() =>
            {
                Err(Error::empty(failure.message))
            }
            Envelope::Failure(failure) => Err(failure.into_error()),
        }
    }

    /// Fetch the current number of registered users
    ///
    /// The API has no count endpoint, so this requests a one-user page and
    /// reads `total_users`. Zero users, reported either as a total of 0 or as a
    /// single-message failure, maps to `Error::EmptyCollection`.
    pub async fn total_users(&self) -> Result<u64> {
        let config = RequestConfig::new().query("page", 1).query("count", 1);
        let response = self.http.get_with_config("users", config).await?;
        let (_, envelope) = read_envelope::<UsersResponse>(response).await?;

        match envelope {
            Envelope::Success(body) if body.total_users == 0 => Err(Error::empty("No users found")),
            Envelope::Success(body) => Ok(body.total_users),
            Envelope::Failure(failure) if failure.has_field_failures() => Err(failure.into_error()),
            Envelope::Failure(failure) => Err(Error::empty(failure.message)),
        }
    }

    /// Fetch positions a new user can register for
    ///
    /// No open positions maps to `Error::EmptyCollection`.
    pub async fn positions(&self) -> Result<Vec<Position>> {
        let response = self.http.get("positions").await?;
        let (_, envelope) = read_envelope::<PositionsResponse>(response).await?;

        match envelope {
            Envelope::Success(body) if body.positions.is_empty() => {
                Err(Error::empty("No open positions"))
            }
            Envelope::Success(body) => Ok(body.positions),
            Envelope::Failure(failure) => Err(Error::empty(failure.message)),
        }
    }

    /// Fetch a registration token
    pub async fn token(&self) -> Result<String> {
        let response = self.http.get("token").await?;
        let (_, envelope) = read_envelope::<TokenResponse>(response).await?;

        match envelope {
            Envelope::Success(body) => Ok(body.token),
            Envelope::Failure(failure) => Err(failure.into_error()),
        }
    }

    /// Register a new user and return the id the server assigned
    ///
    /// A fresh token is requested for every registration. Server-side
    /// validation failures are returned as `Error::Validation` or
    /// `Error::ValidationFailures` for field-level display.
    pub async fn register(&self, user: &NewUser) -> Result<u64> {
        let token = self.token().await?;

        let photo = Part::bytes(user.photo.clone())
            .file_name(user.photo_file_name.clone())
            .mime_str(&user.photo_mime)?;
        let form = Form::new()
            .text("name", user.name.clone())
            .text("email", user.email.clone())
            .text("phone", user.phone.clone())
            .text("position_id", user.position_id.to_string())
            .part("photo", photo);

        let mut headers = HashMap::new();
        headers.insert("Token".to_string(), token);

        let response = self.http.post_multipart("users", form, &headers).await?;
        let (_, envelope) = read_envelope::<RegisteredResponse>(response).await?;

        match envelope {
            Envelope::Success(body) => {
                info!(user_id = body.user_id, "Registered user: {}", body.message);
                Ok(body.user_id)
            }
            Envelope::Failure(failure) => Err(failure.into_error()),
        }
    }
}

#[async_trait]
impl UsersSource for UsersApi {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<UsersPage> {
        self.users(page, page_size).await
    }

    async fn fetch_total_count(&self) -> Result<u64> {
        self.total_users().await
    }
}

/// Read the body of any response and decode its envelope
async fn read_envelope<T: DeserializeOwned>(
    response: Response,
) -> Result<(StatusCode, Envelope<T>)> {
    let status = response.status();
    let body = response.text().await?;
    let envelope = decode_envelope(&body)?;
    Ok((status, envelope))
}
