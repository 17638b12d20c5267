//! Integration tests for track streaming and range semantics.

mod common;

use common::{fixture_with_tracks, track_bytes, TestHarness};

use airjuke::catalog::fixture::FixtureSource;

fn thousand_byte_source() -> FixtureSource {
    FixtureSource::new().with_track(1, "Kilobyte", "Tester", "Sizes", &track_bytes(1, 1000))
}

#[tokio::test]
async fn full_stream_serves_all_bytes() {
    let (_h, addr) = TestHarness::with_server(fixture_with_tracks(1)).await;

    let resp = reqwest::get(format!("http://{addr}/music?audio_id=1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "audio/mpeg"
    );
    assert_eq!(
        resp.headers().get("accept-ranges").unwrap().to_str().unwrap(),
        "bytes"
    );
    assert_eq!(
        resp.headers().get("content-length").unwrap().to_str().unwrap(),
        "8192"
    );
    assert_eq!(
        resp.headers().get("icy-name").unwrap().to_str().unwrap(),
        "Track 1"
    );
    assert_eq!(
        resp.headers().get("icy-artist").unwrap().to_str().unwrap(),
        "Artist 1"
    );

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), track_bytes(1, 8 * 1024));
}

#[tokio::test]
async fn bounded_range_request() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "bytes=500-699")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes 500-699/1000"
    );
    assert_eq!(
        resp.headers().get("content-length").unwrap().to_str().unwrap(),
        "200"
    );
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), &track_bytes(1, 1000)[500..=699]);
}

#[tokio::test]
async fn open_ended_range_request() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "bytes=900-")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes 900-999/1000"
    );
    assert_eq!(resp.bytes().await.unwrap().len(), 100);
}

#[tokio::test]
async fn range_past_end_is_unsatisfiable() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "bytes=2000-3000")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 416);
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes */1000"
    );
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn inverted_range_is_unsatisfiable() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "bytes=700-500")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
}

#[tokio::test]
async fn unparseable_range_serves_full_file() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "chunks=1-2")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.bytes().await.unwrap().len(), 1000);
}

#[tokio::test]
async fn suffix_range_is_rejected() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "bytes=-200")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn full_and_whole_range_partial_bodies_are_identical() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;
    let client = reqwest::Client::new();

    let full = client
        .get(format!("http://{addr}/music?audio_id=1"))
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();

    let partial_resp = client
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "bytes=0-999")
        .send()
        .await
        .unwrap();
    assert_eq!(partial_resp.status(), 206);
    let partial = partial_resp.bytes().await.unwrap();

    assert_eq!(full, partial);
}

#[tokio::test]
async fn unlisted_track_streams_without_icy_metadata() {
    let source = FixtureSource::new().with_unlisted_track(7, "Ghost", b"ghost-bytes");
    let (_h, addr) = TestHarness::with_server(source).await;

    let resp = reqwest::get(format!("http://{addr}/music?audio_id=7"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    // Not in the catalog snapshot, so no icy enrichment — but the stream
    // must still succeed.
    assert!(resp.headers().get("icy-name").is_none());
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"ghost-bytes");
}

#[tokio::test]
async fn untitled_track_gets_fallback_icy_name() {
    let track = airjuke::catalog::Track {
        id: airjuke::catalog::TrackId::from(3),
        title: None,
        artist: None,
        album: None,
        duration_ms: None,
        locator: "mem:3".to_string(),
    };
    let source = FixtureSource::new().with_raw_track(track, b"abc");
    let (_h, addr) = TestHarness::with_server(source).await;

    let resp = reqwest::get(format!("http://{addr}/music?audio_id=3"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("icy-name").unwrap().to_str().unwrap(),
        "Unknown Title"
    );
    assert!(resp.headers().get("icy-artist").is_none());
}

#[tokio::test]
async fn single_byte_range() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "bytes=999-999")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes 999-999/1000"
    );
    assert_eq!(resp.bytes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn end_beyond_length_is_clamped() {
    let (_h, addr) = TestHarness::with_server(thousand_byte_source()).await;

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/music?audio_id=1"))
        .header("Range", "bytes=990-5000")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes 990-999/1000"
    );
}
