//! Tests for the users API module

use super::*;
use crate::error::{Error, ErrorKind};
use crate::http::{HttpClient, HttpClientConfig};
use crate::source::UsersSource;
use crate::types::NewUser;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> UsersApi {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(0)
        .build();
    UsersApi::new(HttpClient::with_config(config).unwrap())
}

fn user_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("user{id}@example.com"),
        "phone": "+380971234567",
        "position": "Lawyer",
        "position_id": 1,
        "registration_timestamp": 1_537_777_441,
        "photo": format!("https://example.com/{id}.jpg")
    })
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn test_decode_success_envelope() {
    let body = r#"{"success": true, "positions": [{"id": 1, "name": "Lawyer"}]}"#;
    match decode_envelope::<PositionsResponse>(body).unwrap() {
        Envelope::Success(body) => assert_eq!(body.positions[0].name, "Lawyer"),
        Envelope::Failure(f) => panic!("unexpected failure: {f:?}"),
    }
}

#[test]
fn test_decode_single_failure() {
    let body = r#"{"success": false, "message": "Page not found"}"#;
    match decode_envelope::<UsersResponse>(body).unwrap() {
        Envelope::Failure(failure) => {
            assert_eq!(failure.message, "Page not found");
            assert!(!failure.has_field_failures());
            assert!(matches!(failure.into_error(), Error::Validation { .. }));
        }
        Envelope::Success(_) => panic!("Expected Failure"),
    }
}

#[test]
fn test_decode_multiple_failures() {
    let body = r#"{
        "success": false,
        "message": "Validation failed",
        "fails": {
            "count": ["The count must be an integer."],
            "page": ["The page must be at least 1."]
        }
    }"#;
    let Envelope::Failure(failure) = decode_envelope::<UsersResponse>(body).unwrap() else {
        panic!("Expected Failure");
    };

    assert!(failure.has_field_failures());
    let err = failure.into_error();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let fails = err.field_failures().unwrap();
    assert_eq!(fails.len(), 2);
    assert_eq!(fails["page"], vec!["The page must be at least 1.".to_string()]);
}

#[test]
fn test_decode_token_without_success_flag() {
    let Envelope::Success(token) = decode_envelope::<TokenResponse>(r#"{"token": "abc"}"#).unwrap()
    else {
        panic!("Expected Success");
    };
    assert_eq!(token.token, "abc");
}

#[test]
fn test_decode_unknown_shapes_are_protocol_errors() {
    for body in [
        "<html>502 Bad Gateway</html>",
        "[1, 2, 3]",
        r#"{"success": "yes"}"#,
        r#"{"success": true, "users": "none"}"#,
        r#"{"success": false}"#,
    ] {
        let err = decode_envelope::<UsersResponse>(body).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol, "body: {body}");
    }
}

// ============================================================================
// GET /users
// ============================================================================

#[tokio::test]
async fn test_users_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .and(query_param("count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "page": 2,
            "total_pages": 3,
            "total_users": 5,
            "count": 2,
            "links": {"next_url": null, "prev_url": null},
            "users": [user_json(3), user_json(4)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = api(&server).fetch_page(2, 2).await.unwrap();

    assert_eq!(page.total_count, 5);
    assert_eq!(
        page.items.iter().map(|u| u.id.unwrap()).collect::<Vec<_>>(),
        vec![3, 4]
    );
}

#[tokio::test]
async fn test_users_page_not_found_is_empty_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Page not found"
        })))
        .mount(&server)
        .await;

    let err = api(&server).users(9, 6).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyCollection);
}

#[tokio::test]
async fn test_users_validation_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "message": "Validation failed",
            "fails": {"count": ["The count must be at most 100."]}
        })))
        .mount(&server)
        .await;

    let err = api(&server).users(1, 500).await.unwrap_err();
    assert!(matches!(err, Error::ValidationFailures { .. }));
}

// ============================================================================
// Total count
// ============================================================================

#[tokio::test]
async fn test_total_users_requests_single_user_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .and(query_param("count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "total_users": 42,
            "users": [user_json(1)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(api(&server).fetch_total_count().await.unwrap(), 42);
}

#[tokio::test]
async fn test_total_users_single_error_is_empty_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Page not found"
        })))
        .mount(&server)
        .await;

    let err = api(&server).total_users().await.unwrap_err();
    assert!(matches!(err, Error::EmptyCollection { .. }));
}

#[tokio::test]
async fn test_total_users_zero_is_empty_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "total_users": 0,
            "users": []
        })))
        .mount(&server)
        .await;

    let err = api(&server).total_users().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyCollection);
}

#[tokio::test]
async fn test_total_users_garbage_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = api(&server).total_users().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
}

// ============================================================================
// GET /positions
// ============================================================================

#[tokio::test]
async fn test_positions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "positions": [{"id": 1, "name": "Lawyer"}, {"id": 2, "name": "Content manager"}]
        })))
        .mount(&server)
        .await;

    let positions = api(&server).positions().await.unwrap();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[1].name, "Content manager");
}

#[tokio::test]
async fn test_positions_missing_is_empty_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "message": "Positions not found"
        })))
        .mount(&server)
        .await;

    let err = api(&server).positions().await.unwrap_err();
    assert_eq!(err.to_string(), "Empty collection: Positions not found");
}

// ============================================================================
// POST /users
// ============================================================================

async fn mount_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "eyJ0eXAi"
        })))
        .mount(server)
        .await;
}

fn new_user() -> NewUser {
    NewUser::new(
        "Ann",
        "ann@example.com",
        "+380501112233",
        2,
        b"jpeg".to_vec(),
    )
}

#[tokio::test]
async fn test_register_sends_token_and_form() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Token", "eyJ0eXAi"))
        .and(body_string_contains("name=\"position_id\""))
        .and(body_string_contains("filename=\"photo.jpg\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "user_id": 23,
            "message": "New user successfully registered"
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(api(&server).register(&new_user()).await.unwrap(), 23);
}

#[tokio::test]
async fn test_register_conflict_propagates_message() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "message": "User with this phone or email already exist"
        })))
        .mount(&server)
        .await;

    let err = api(&server).register(&new_user()).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(err.to_string(), "User with this phone or email already exist");
}

#[tokio::test]
async fn test_register_field_failures() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "success": false,
            "message": "Validation failed",
            "fails": {
                "name": ["The name must be at least 2 characters."],
                "photo": ["The photo may not be greater than 5 Mbytes.", "Image is invalid."]
            }
        })))
        .mount(&server)
        .await;

    let err = api(&server).register(&new_user()).await.unwrap_err();
    let fails = err.field_failures().expect("field failures");
    assert_eq!(fails["photo"].len(), 2);
}

#[tokio::test]
async fn test_register_without_token_does_not_post() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = api(&server).register(&new_user()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}
