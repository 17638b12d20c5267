//! The `/music` route family: catalog listing, track streaming, album
//! queries and rescan.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{AlbumId, TrackId};
use crate::server::{error::ApiError, AppContext};
use crate::streaming::{self, RangeStatus};

pub fn music_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(music))
        .route("/albums", get(list_albums))
        .route("/albums/:id/art", get(album_art))
        .route("/rescan", post(rescan))
}

#[derive(Deserialize)]
struct MusicQuery {
    audio_id: Option<String>,
}

/// `GET /music` — catalog listing without `audio_id`, track streaming with.
async fn music(
    State(ctx): State<AppContext>,
    Query(query): Query<MusicQuery>,
    headers: HeaderMap,
) -> Result<Response<Body>, ApiError> {
    match query.audio_id {
        None => Ok(catalog_listing(&ctx).into_response()),
        Some(raw) => stream_track(&ctx, &raw, &headers).await,
    }
}

fn catalog_listing(ctx: &AppContext) -> impl IntoResponse {
    let catalog = ctx.catalog.snapshot();
    let tracks: Vec<_> = catalog.tracks().collect();
    Json(json!({
        "status": "ok",
        "ipAddress": crate::net::local_ipv4().map(|ip| ip.to_string()),
        "data": tracks,
    }))
}

async fn stream_track(
    ctx: &AppContext,
    raw_id: &str,
    headers: &HeaderMap,
) -> Result<Response<Body>, ApiError> {
    let raw_id = raw_id.trim();
    if raw_id.is_empty() {
        return Err(ApiError::MissingAudioId);
    }
    let id: TrackId = raw_id.parse().map_err(|_| ApiError::InvalidAudioId)?;

    // The snapshot is cloned out of the store; no lock is held while the
    // stream runs.
    let catalog = ctx.catalog.snapshot();

    // A track missing from the snapshot can still be streamable if the
    // source learned about it after the last rescan.
    let track = match catalog.lookup(id) {
        Some(track) => track.clone(),
        None => ctx
            .source
            .get_track(id)
            .await
            .map_err(|e| ApiError::AudioNotFound(e.to_string()))?
            .ok_or_else(|| ApiError::AudioNotFound(format!("no track with id {id}")))?,
    };

    let resource = ctx
        .source
        .open_resource(&track.locator)
        .await
        .map_err(|e| ApiError::AudioNotFound(e.to_string()))?;

    let range_header = headers.get(header::RANGE).and_then(|h| h.to_str().ok());
    let resolved = streaming::resolve(range_header, resource.len);
    if resolved.status == RangeStatus::Malformed {
        return Err(ApiError::MalformedRange);
    }

    // icy metadata comes from the catalog only; a fresh-from-source track
    // streams without it.
    let response = streaming::respond(resource, resolved, catalog.lookup(id)).await?;
    Ok(response)
}

/// `GET /music/albums` — album groupings, without art payloads.
async fn list_albums(State(ctx): State<AppContext>) -> impl IntoResponse {
    let catalog = ctx.catalog.snapshot();
    let albums: Vec<_> = catalog.albums().collect();
    Json(json!({
        "status": "ok",
        "data": albums,
    }))
}

/// `GET /music/albums/{id}/art` — thumbnail passthrough.
async fn album_art(
    State(ctx): State<AppContext>,
    Path(id): Path<u64>,
) -> Result<Response<Body>, ApiError> {
    let catalog = ctx.catalog.snapshot();
    let thumbnail = catalog
        .album(AlbumId::from(id))
        .and_then(|album| album.thumbnail.clone())
        .ok_or(ApiError::ArtNotFound)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, thumbnail.mime)
        .header(header::CONTENT_LENGTH, thumbnail.data.len().to_string())
        .body(Body::from(thumbnail.data))
        .map_err(|e| ApiError::Stream(std::io::Error::other(e)))
}

/// `POST /music/rescan` — rebuild the catalog and swap it in atomically.
async fn rescan(State(ctx): State<AppContext>) -> impl IntoResponse {
    let (catalog, error) = ctx.catalog.rebuild(ctx.source.as_ref()).await;

    let mut body = json!({
        "status": "ok",
        "tracks": catalog.len(),
    });
    if let Some(err) = error {
        tracing::error!(error = %err, "catalog rescan failed; serving empty catalog");
        body["degraded"] = json!(true);
    }
    Json(body)
}
