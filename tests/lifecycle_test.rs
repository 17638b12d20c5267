//! Integration tests for server lifecycle: guarded start, stop, restart.

mod common;

use common::fixture_with_tracks;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use airjuke::server::{AppContext, MediaServer, ServerState};

fn ephemeral() -> SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

async fn server_with_tracks(n: u64) -> MediaServer {
    let ctx = AppContext::new(Arc::new(fixture_with_tracks(n)));
    let _ = ctx.catalog.rebuild(ctx.source.as_ref()).await;
    MediaServer::new(ctx).with_grace(Duration::from_secs(1))
}

#[tokio::test]
async fn start_serves_and_reports_running() {
    let server = server_with_tracks(1).await;
    assert_eq!(server.state().await, ServerState::Stopped);

    let addr = server.start(ephemeral()).await.unwrap();
    assert_eq!(server.state().await, ServerState::Running);
    assert_eq!(server.bound_addr().await, Some(addr));

    let resp = reqwest::get(format!("http://{addr}/music")).await.unwrap();
    assert_eq!(resp.status(), 200);

    server.stop().await;
}

#[tokio::test]
async fn second_start_is_ignored() {
    let server = server_with_tracks(1).await;

    let first = server.start(ephemeral()).await.unwrap();
    // A second start must not bind again; it reports the existing binding.
    let second = server.start(ephemeral()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(server.state().await, ServerState::Running);

    server.stop().await;
}

#[tokio::test]
async fn stop_releases_the_port() {
    let server = server_with_tracks(1).await;
    let addr = server.start(ephemeral()).await.unwrap();

    server.stop().await;
    assert_eq!(server.state().await, ServerState::Stopped);
    assert_eq!(server.bound_addr().await, None);

    // The exact address must be bindable again.
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    drop(listener);
}

#[tokio::test]
async fn stopped_server_refuses_connections() {
    let server = server_with_tracks(1).await;
    let addr = server.start(ephemeral()).await.unwrap();
    server.stop().await;

    let result = reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap()
        .get(format!("http://{addr}/music"))
        .send()
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn stop_is_idempotent() {
    let server = server_with_tracks(1).await;
    server.start(ephemeral()).await.unwrap();

    server.stop().await;
    server.stop().await;
    assert_eq!(server.state().await, ServerState::Stopped);
}

#[tokio::test]
async fn restart_cycle_serves_again() {
    let server = server_with_tracks(2).await;

    let first = server.start(ephemeral()).await.unwrap();
    let resp = reqwest::get(format!("http://{first}/music")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let second = server.restart(ephemeral()).await.unwrap();
    assert_eq!(server.state().await, ServerState::Running);

    let body: serde_json::Value = reqwest::get(format!("http://{second}/music"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    server.stop().await;
}

#[tokio::test]
async fn bind_failure_is_fatal_and_leaves_server_stopped() {
    // Occupy a port, then ask the server to bind it.
    let blocker = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let taken = blocker.local_addr().unwrap();

    let server = server_with_tracks(1).await;
    let result = server.start(taken).await;
    assert!(result.is_err());
    assert_eq!(server.state().await, ServerState::Stopped);

    // A later start on a free port still works.
    let addr = server.start(ephemeral()).await.unwrap();
    let resp = reqwest::get(format!("http://{addr}/music")).await.unwrap();
    assert_eq!(resp.status(), 200);
    server.stop().await;
}
