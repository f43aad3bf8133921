//! Tests for connectivity module

use super::*;
use crate::config::ClientConfig;
use crate::engine::{CycleOutcome, PaginationEngine};
use crate::source::UsersSource;
use crate::types::UsersPage;
use async_trait::async_trait;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

struct NoUsers;

#[async_trait]
impl UsersSource for NoUsers {
    async fn fetch_page(&self, _page: u32, _page_size: u32) -> crate::Result<UsersPage> {
        Err(crate::Error::empty("Page not found"))
    }

    async fn fetch_total_count(&self) -> crate::Result<u64> {
        Err(crate::Error::empty("No users found"))
    }
}

// ============================================================================
// Availability Tests
// ============================================================================

#[test]
fn test_manual_connectivity() {
    let connectivity = ManualConnectivity::new(false);
    assert!(!connectivity.is_available());
    assert_eq!(initial_view(&connectivity), InitialView::Offline);

    connectivity.set_available(true);
    assert!(connectivity.is_available());
    assert_eq!(initial_view(&connectivity), InitialView::Users);
}

#[test]
fn test_initial_view_through_trait_object() {
    let connectivity: Arc<dyn Connectivity> = Arc::new(ManualConnectivity::new(true));
    assert_eq!(initial_view(&connectivity), InitialView::Users);
}

#[test]
fn test_tcp_probe_for_url_defaults_port() {
    let url = Url::parse("https://frontend-test-assignment-api.abz.agency/api/v1/").unwrap();
    let probe = TcpProbe::for_url(&url, Duration::from_millis(100)).unwrap();

    assert_eq!(probe.host(), "frontend-test-assignment-api.abz.agency");
    assert_eq!(probe.port(), 443);

    let url = Url::parse("http://localhost:8080/").unwrap();
    let probe = TcpProbe::for_url(&url, Duration::from_millis(100)).unwrap();
    assert_eq!(probe.port(), 8080);
}

#[test]
fn test_tcp_probe_from_config() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:3000/api/".to_string(),
        ..ClientConfig::default()
    };
    let probe = TcpProbe::from_config(&config).unwrap();
    assert_eq!(probe.host(), "127.0.0.1");
    assert_eq!(probe.port(), 3000);
}

#[test]
fn test_tcp_probe_reaches_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let probe = TcpProbe::new("127.0.0.1", port, Duration::from_millis(500));
    assert!(probe.is_available());
}

#[test]
fn test_tcp_probe_closed_port() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let probe = TcpProbe::new("127.0.0.1", port, Duration::from_millis(500));
    assert!(!probe.is_available());
}

// ============================================================================
// Recovery Tests
// ============================================================================

#[tokio::test]
async fn test_retry_still_offline() {
    let connectivity = Arc::new(ManualConnectivity::new(false));
    let controller = RecoveryController::new(Arc::clone(&connectivity));
    let mut events = controller.subscribe();

    let event = controller.retry().await;
    assert_eq!(
        event,
        RecoveryEvent::StillOffline {
            message: STILL_OFFLINE_MESSAGE.to_string()
        }
    );
    assert_eq!(events.recv().await.unwrap(), event);
}

#[tokio::test]
async fn test_retry_without_subscribers_still_returns_event() {
    let controller = RecoveryController::new(Arc::new(ManualConnectivity::new(true)));
    assert_eq!(controller.retry().await, RecoveryEvent::Resume);
}

#[tokio::test]
async fn test_retry_resumes_when_back_online() {
    let connectivity = Arc::new(ManualConnectivity::new(false));
    let controller = RecoveryController::new(Arc::clone(&connectivity));

    assert_ne!(controller.retry().await, RecoveryEvent::Resume);

    connectivity.set_available(true);
    assert_eq!(controller.retry().await, RecoveryEvent::Resume);
}

#[tokio::test]
async fn test_retry_and_resume_runs_a_cycle_only_when_online() {
    let connectivity = Arc::new(ManualConnectivity::new(false));
    let controller = RecoveryController::new(Arc::clone(&connectivity));
    let engine = PaginationEngine::new(NoUsers);

    let (event, outcome) = controller.retry_and_resume(&engine).await;
    assert!(matches!(event, RecoveryEvent::StillOffline { .. }));
    assert!(outcome.is_none());

    connectivity.set_available(true);
    let (event, outcome) = controller.retry_and_resume(&engine).await;
    assert_eq!(event, RecoveryEvent::Resume);
    assert_eq!(outcome, Some(CycleOutcome::Empty));
}
