//! Relay client tests against a real loopback server

use page_sentry::api::{create_router, handlers::AppState};
use page_sentry::{
    display_for, DisplayPayload, ErrorCode, PredictionRelay, RelayClient, RelayConfig, Verdict,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(Arc::new(AppState::default()), &RelayConfig::default());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Port that had a listener a moment ago and is now closed
async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn test_client_exchange_roundtrip() {
    let addr = spawn_server().await;
    let client =
        RelayClient::with_timeout(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();

    for verdict in [Verdict::Safe, Verdict::Suspicious, Verdict::Malicious] {
        let payload = client.exchange(verdict).await.unwrap();
        assert_eq!(payload, DisplayPayload::for_verdict(verdict));
    }
}

#[tokio::test]
async fn test_client_from_config() {
    let addr = spawn_server().await;
    let config = RelayConfig {
        relay_url: format!("http://{}/", addr),
        ..RelayConfig::default()
    };
    let client = RelayClient::new(&config).unwrap();
    let payload = display_for(&client, Verdict::Malicious).await;
    assert_eq!(payload.status, "malicious");
}

#[tokio::test]
async fn test_unreachable_relay_is_recoverable() {
    let addr = closed_port().await;
    let client =
        RelayClient::with_timeout(&format!("http://{}", addr), Duration::from_millis(500)).unwrap();

    let err = client.exchange(Verdict::Suspicious).await.unwrap_err();
    assert!(err.code.is_recoverable());
    assert!(matches!(
        err.code,
        ErrorCode::RelayUnavailable | ErrorCode::RelayTimeout
    ));

    // display_for never fails
    let payload = display_for(&client, Verdict::Suspicious).await;
    assert_eq!(payload, DisplayPayload::for_verdict(Verdict::Suspicious));
}

#[tokio::test]
async fn test_non_relay_endpoint_falls_back() {
    // A server that answers 404 for the prediction path
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = axum::Router::new().route("/", axum::routing::get(|| async { "hello" }));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client =
        RelayClient::with_timeout(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
    let err = client.exchange(Verdict::Safe).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RelayInvalidResponse);

    let payload = display_for(&client, Verdict::Safe).await;
    assert_eq!(payload.status, "safe");
}
