//! Availability checks

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Synchronous "is the network usable" check
///
/// Implementations may block for a bounded time; async callers should run
/// them on a blocking thread.
pub trait Connectivity: Send + Sync {
    fn is_available(&self) -> bool;
}

impl<C: Connectivity + ?Sized> Connectivity for Arc<C> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// First view to show when a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialView {
    /// Network is usable; show the user list
    Users,
    /// Network is down; show the recovery view
    Offline,
}

/// Pick the first view of a session
pub fn initial_view<C: Connectivity + ?Sized>(connectivity: &C) -> InitialView {
    if connectivity.is_available() {
        InitialView::Users
    } else {
        InitialView::Offline
    }
}

/// Availability flag flipped by the embedder (for example from OS network callbacks)
#[derive(Debug)]
pub struct ManualConnectivity {
    available: AtomicBool,
}

impl ManualConnectivity {
    pub fn new(available: bool) -> Self {
        Self {
            available: AtomicBool::new(available),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }
}

impl Connectivity for ManualConnectivity {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }
}

/// Considers the network usable when the API host accepts a TCP connection
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and port of `url`, using the scheme's default port if none is given
    pub fn for_url(url: &Url, timeout: Duration) -> Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::config(format!("URL '{url}' has no host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::config(format!("URL '{url}' has no known port")))?;
        Ok(Self::new(host, port, timeout))
    }

    /// Probe the configured API base URL
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::for_url(&config.parsed_base_url()?, config.probe_timeout())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Connectivity for TcpProbe {
    fn is_available(&self) -> bool {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                debug!(host = %self.host, "Name resolution failed: {e}");
                return false;
            }
        };

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(_) => return true,
                Err(e) => debug!(%addr, "Probe connect failed: {e}"),
            }
        }
        false
    }
}
