//! Response framing for resolved ranges.
//!
//! Takes an opened [`MediaResource`] and a [`ResolvedRange`] and produces
//! the correctly-framed HTTP response: status line, content headers and a
//! streaming body. The skipped prefix of a partial response is seeked over,
//! never buffered.

use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};
use std::io::SeekFrom;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use crate::catalog::{MediaResource, Track};
use crate::streaming::range::{RangeStatus, ResolvedRange};

/// Fallback MIME type when the source declares none.
pub const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

/// Build the HTTP response for a resolved range over an opened resource.
///
/// The resource handle moves into the response body and is dropped when the
/// body finishes or the connection aborts; the 416 path drops it
/// immediately. Track metadata, when available, is attached as best-effort
/// `icy-name`/`icy-artist` headers — a missing track never aborts the
/// stream.
pub async fn respond(
    resource: MediaResource,
    resolved: ResolvedRange,
    track: Option<&Track>,
) -> std::io::Result<Response<Body>> {
    let content_type = resource
        .content_type
        .clone()
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let response = match resolved.status {
        RangeStatus::Full => {
            let mut builder = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, resolved.total.to_string());
            builder = with_icy_headers(builder, track);
            builder.body(Body::from_stream(ReaderStream::new(resource.reader)))
        }
        RangeStatus::Partial => {
            let mut reader = resource.reader;
            reader.seek(SeekFrom::Start(resolved.start)).await?;
            let limited = reader.take(resolved.len());

            let mut builder = Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, resolved.len().to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", resolved.start, resolved.end, resolved.total),
                );
            builder = with_icy_headers(builder, track);
            builder.body(Body::from_stream(ReaderStream::new(limited)))
        }
        RangeStatus::Unsatisfiable => Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", resolved.total))
            .body(Body::empty()),
        // Routes reject malformed ranges before reaching the responder;
        // kept total so a future caller cannot panic here.
        RangeStatus::Malformed => Response::builder()
            .status(StatusCode::BAD_REQUEST)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("Malformed range")),
    };

    response.map_err(std::io::Error::other)
}

/// Attach `icy-name`/`icy-artist` when the values survive header encoding.
fn with_icy_headers(
    mut builder: axum::http::response::Builder,
    track: Option<&Track>,
) -> axum::http::response::Builder {
    let Some(track) = track else {
        return builder;
    };
    if let Ok(name) = HeaderValue::from_str(track.display_title()) {
        builder = builder.header("icy-name", name);
    }
    if let Some(artist) = track.artist.as_deref().and_then(|a| HeaderValue::from_str(a).ok()) {
        builder = builder.header("icy-artist", artist);
    }
    builder
}
