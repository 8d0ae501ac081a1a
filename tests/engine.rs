//! Request engine tests.
//!
//! Uses wiremock to stand in for the kraken API and checks what the client
//! sends and how it classifies what comes back.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use twitchapi::{
    BoxError, CancellationToken, ClientConfig, CredentialProvider, Credentials, OAuthOptions,
    RequestOptions, RetryPolicy, TwitchClient, TwitchError,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TwitchClient {
    TwitchClient::new(
        ClientConfig::new("abc123")
            .with_base_url(server.uri())
            .with_retry(RetryPolicy::none()),
    )
    .unwrap()
}

// =============================================================================
// Authentication state
// =============================================================================

#[tokio::test]
async fn test_unauthenticated_call_fails_without_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(!client.is_authenticated());

    let err = client.call_api("/channels/1", true).await.unwrap_err();
    assert!(matches!(err, TwitchError::NotAuthenticated));

    // wiremock verifies the expectation on MockServer drop
}

#[tokio::test]
async fn test_set_credentials_scopes() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    assert!(!client.has_scope("channel_read"));

    client.set_credentials(Credentials::new("tok", ["channel_read"]));

    assert!(client.is_authenticated());
    assert!(client.has_scope("channel_read"));
    assert!(!client.has_scope("other"));
}

#[tokio::test]
async fn test_empty_token_is_unauthenticated() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    client.set_credentials(Credentials::new("", ["channel_read"]));
    assert!(!client.is_authenticated());
    assert!(!client.has_scope("channel_read"));

    let err = client.call_api("/channel", true).await.unwrap_err();
    assert!(matches!(err, TwitchError::NotAuthenticated));
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_authenticated_call_sends_oauth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channel"))
        .and(header("Accept", "application/vnd.twitchtv.v5+json"))
        .and(header("Client-ID", "abc123"))
        .and(header("Authorization", "OAuth tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "lirik" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.set_credentials(Credentials::new("tok", ["channel_read"]));

    let value = assert_ok!(client.call_api("/channel", true).await);
    assert_eq!(value["name"], "lirik");
}

#[tokio::test]
async fn test_unauthenticated_call_sends_empty_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/1"))
        .and(header("Client-ID", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    // Credentials are only sent when the call asks for them.
    client.set_credentials(Credentials::new("tok", ["channel_read"]));
    assert_ok!(client.call_api("/channels/1", false).await);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let authorization = requests[0]
        .headers
        .get("authorization")
        .map(|v| v.to_str().unwrap().to_string());
    assert_eq!(authorization.as_deref(), Some(""));
}

// =============================================================================
// Response classification
// =============================================================================

#[tokio::test]
async fn test_success_body_is_returned_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/23161357"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "lirik" })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let value = client.call_api("/channels/23161357", false).await.unwrap();

    assert_eq!(value, json!({ "name": "lirik" }));
}

#[tokio::test]
async fn test_server_error_body_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Server Error",
            "status": 500,
            "message": "oops"
        })))
        // Application errors are never retried
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = TwitchClient::new(ClientConfig::new("abc123").with_base_url(mock_server.uri()))
        .unwrap();
    let err = client.call_api("/channels/1", false).await.unwrap_err();

    match &err {
        TwitchError::Api { status, body } => {
            assert_eq!(*status, 500);
            assert_eq!(body.error, "Server Error");
            assert_eq!(body.status, Some(500));
            assert_eq!(body.message, "oops");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(err.status_code(), Some(500));
    assert!(err.to_string().contains("oops"));
}

#[tokio::test]
async fn test_non_200_success_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.call_api("/anything", false).await.unwrap_err();

    assert!(matches!(err, TwitchError::Api { status: 201, .. }));
}

#[tokio::test]
async fn test_non_json_error_body_is_protocol_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.call_api("/channels/1", false).await.unwrap_err();

    assert!(matches!(err, TwitchError::Protocol { status: 502, .. }));
}

#[tokio::test]
async fn test_non_json_success_body_is_protocol_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.call_api("/channels/1", false).await.unwrap_err();

    assert!(matches!(err, TwitchError::Protocol { status: 200, .. }));
}

// =============================================================================
// raw_api and query strings
// =============================================================================

#[tokio::test]
async fn test_raw_api_appends_options_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/23161357/videos"))
        .and(query_param("limit", "10"))
        .and(query_param("broadcast_type", "archive,upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_total": 0, "videos": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = RequestOptions::new()
        .with("limit", 10)
        .with("broadcast_type", "archive,upload");

    let value = client
        .raw_api("/channels/23161357/videos", Some(&options), false)
        .await
        .unwrap();
    assert_eq!(value["_total"], 0);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("limit=10&broadcast_type=archive,upload")
    );
}

#[tokio::test]
async fn test_raw_api_without_options() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "_id": "1" })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert_ok!(client.raw_api("/users/1", None, false).await);
    assert_ok!(client.raw_api("/users/1", Some(&RequestOptions::new()), false).await);

    for request in mock_server.received_requests().await.unwrap() {
        assert_eq!(request.url.query(), None);
    }
}

#[tokio::test]
async fn test_client_helpers_delegate_to_query_functions() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    let options = RequestOptions::new().with("a", 1).with("b", "two");
    assert_eq!(client.construct_options(Some(&options)), "?a=1&b=two");
    assert_eq!(client.construct_options(None), "");
    assert_eq!(
        client.construct_comma_list(["lirik", "monstercat"]).as_deref(),
        Some("lirik,monstercat")
    );
    assert_eq!(client.construct_comma_list(Vec::<u64>::new()), None);
}

// =============================================================================
// Concurrency, timeouts, retries, cancellation
// =============================================================================

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let (a, b, c) = tokio::join!(
        client.call_api("/a", false),
        client.call_api("/b", false),
        client.call_api("/c", false),
    );

    assert_ok!(a);
    assert_ok!(b);
    assert_ok!(c);
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = TwitchClient::new(
        ClientConfig::new("abc123")
            .with_base_url(mock_server.uri())
            .with_timeout(Duration::from_millis(100))
            .with_retry(RetryPolicy::none()),
    )
    .unwrap();

    let err = client.call_api("/slow", false).await.unwrap_err();
    match err {
        TwitchError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_errors_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = TwitchClient::new(
        ClientConfig::new("abc123")
            .with_base_url(mock_server.uri())
            .with_timeout(Duration::from_millis(100))
            .with_retry(RetryPolicy {
                max_retries: 2,
                backoff: Duration::from_millis(10),
            }),
    )
    .unwrap();

    let err = assert_err!(client.call_api("/slow", false).await);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_cancelled_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = client
        .call_api_cancellable("/slow", false, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, TwitchError::Cancelled));
}

#[tokio::test]
async fn test_cancellable_call_checks_auth_first() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .raw_api_cancellable("/channel", None, true, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, TwitchError::NotAuthenticated));
}

// =============================================================================
// Automated login
// =============================================================================

#[derive(Debug, thiserror::Error)]
#[error("browser crashed")]
struct BrowserCrashed;

/// Provider that records what it was called with.
#[derive(Default)]
struct RecordingProvider {
    calls: AtomicUsize,
    fail: bool,
    seen_client_id: parking_lot::Mutex<Option<String>>,
}

/// Handle given to the client while the test keeps its own.
struct Shared(Arc<RecordingProvider>);

#[async_trait]
impl CredentialProvider for Shared {
    async fn automate_login(
        &self,
        client_id: &str,
        user: &str,
        _password: &str,
        _show_browser: bool,
    ) -> Result<Credentials, BoxError> {
        self.0.calls.fetch_add(1, Ordering::SeqCst);
        *self.0.seen_client_id.lock() = Some(client_id.to_string());
        if self.0.fail {
            return Err(Box::new(BrowserCrashed));
        }
        Ok(Credentials::new(format!("token-for-{user}"), ["channel_read"]))
    }
}

#[tokio::test]
async fn test_auto_authenticate_stores_credentials() {
    let provider = Arc::new(RecordingProvider::default());
    let client = TwitchClient::with_credential_provider(
        ClientConfig::new("abc123").with_oauth(OAuthOptions::automated("bot", "hunter2")),
        Shared(Arc::clone(&provider)),
    )
    .unwrap();

    let credentials = client.auto_authenticate().await.unwrap();

    assert_eq!(credentials.access_token, "token-for-bot");
    assert!(client.is_authenticated());
    assert!(client.has_scope("channel_read"));
    assert_eq!(client.credentials(), Some(credentials));
    assert_eq!(provider.seen_client_id.lock().as_deref(), Some("abc123"));
}

#[tokio::test]
async fn test_auto_authenticate_propagates_provider_error() {
    let provider = Arc::new(RecordingProvider {
        fail: true,
        ..Default::default()
    });
    let client = TwitchClient::with_credential_provider(
        ClientConfig::new("abc123").with_oauth(OAuthOptions::automated("bot", "hunter2")),
        Shared(Arc::clone(&provider)),
    )
    .unwrap();

    let err = client.auto_authenticate().await.unwrap_err();

    match err {
        TwitchError::CredentialProvider(source) => assert!(source.is::<BrowserCrashed>()),
        other => panic!("expected provider error, got {other:?}"),
    }
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_auto_authenticate_requires_complete_login() {
    let provider = Arc::new(RecordingProvider::default());
    let client = TwitchClient::with_credential_provider(
        ClientConfig::new("abc123").with_oauth(OAuthOptions::automated("bot", "")),
        Shared(Arc::clone(&provider)),
    )
    .unwrap();

    let err = client.auto_authenticate().await.unwrap_err();

    assert!(matches!(err, TwitchError::Configuration(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_provider_without_oauth_options_is_not_bound() {
    let provider = Arc::new(RecordingProvider::default());
    let client = TwitchClient::with_credential_provider(
        ClientConfig::new("abc123"),
        Shared(Arc::clone(&provider)),
    )
    .unwrap();

    let err = client.auto_authenticate().await.unwrap_err();

    assert!(matches!(err, TwitchError::Configuration(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}
