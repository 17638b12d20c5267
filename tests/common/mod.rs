//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires a [`FixtureSource`] into a full
//! [`AppContext`]. The [`with_server`] constructor builds the catalog and
//! starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use airjuke::catalog::fixture::FixtureSource;
use airjuke::server::{create_router, AppContext};

/// Test harness wrapping an [`AppContext`] backed by an in-memory source.
pub struct TestHarness {
    pub ctx: AppContext,
}

impl TestHarness {
    /// Create a harness around a fixture source, without building the
    /// catalog.
    pub fn new(source: FixtureSource) -> Self {
        Self {
            ctx: AppContext::new(Arc::new(source)),
        }
    }

    /// Build the catalog from the source, degrading to empty on failure.
    pub async fn build_catalog(&self) {
        let _ = self.ctx.catalog.rebuild(self.ctx.source.as_ref()).await;
    }

    /// Build the catalog, then start an Axum server on a random port and
    /// return the harness together with the bound socket address.
    pub async fn with_server(source: FixtureSource) -> (Self, SocketAddr) {
        let harness = Self::new(source);
        harness.build_catalog().await;
        let addr = harness.spawn_server().await;
        (harness, addr)
    }

    /// Start serving the current context without (re)building the catalog.
    pub async fn spawn_server(&self) -> SocketAddr {
        let app = create_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }
}

/// A fixture with `n` tracks whose media bytes are derived from the id, so
/// cross-stream contamination is detectable.
pub fn fixture_with_tracks(n: u64) -> FixtureSource {
    let mut source = FixtureSource::new();
    for id in 1..=n {
        let data = track_bytes(id, 8 * 1024);
        source = source.with_track(
            id,
            &format!("Track {id}"),
            &format!("Artist {id}"),
            "Fixture Album",
            &data,
        );
    }
    source
}

/// Deterministic per-track byte pattern.
pub fn track_bytes(id: u64, len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u64).wrapping_mul(id) as u8).collect()
}
