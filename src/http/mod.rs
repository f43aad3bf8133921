//! HTTP client module
//!
//! Thin layer over reqwest used by the users API client.
//!
//! # Features
//!
//! - **Automatic Retries**: 5xx, 429 and timeouts are retried with backoff
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Failure Classification**: unreachable hosts surface as `Error::Connectivity`

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
