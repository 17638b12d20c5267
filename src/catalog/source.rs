//! Media source collaborator interface.
//!
//! A [`MediaSource`] is the external provider of track/album metadata and
//! media byte streams. The catalog only consumes this query interface; how
//! tracks are discovered (filesystem walk, database, remote API) is the
//! source's business. The crate ships two implementations: the filesystem
//! library in [`crate::library`] and the in-memory
//! [`FixtureSource`](crate::catalog::fixture::FixtureSource) used by tests.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncSeek};

use super::{Album, Track, TrackId};

/// Errors produced by a media source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The locator does not resolve to any media.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store failed to enumerate its contents.
    #[error("source backend error: {0}")]
    Backend(String),
}

impl SourceError {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Backend error.
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }
}

/// Byte stream a resource handle yields: seekable, readable, sendable.
pub trait MediaStream: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin> MediaStream for T {}

/// An opened media resource: a seekable byte source of known total length.
///
/// The handle is owned exclusively by the request that opened it and is
/// released when the reader is dropped, whether the response body completed
/// or the connection was aborted.
pub struct MediaResource {
    /// Seekable reader positioned at offset 0.
    pub reader: Box<dyn MediaStream>,
    /// Total length of the resource in bytes.
    pub len: u64,
    /// MIME type declared by the source, if it knows one.
    pub content_type: Option<String>,
}

impl std::fmt::Debug for MediaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaResource")
            .field("reader", &"<dyn MediaStream>")
            .field("len", &self.len)
            .field("content_type", &self.content_type)
            .finish()
    }
}

impl MediaResource {
    /// Wrap a reader of known length with no declared content type.
    pub fn new(reader: Box<dyn MediaStream>, len: u64) -> Self {
        Self {
            reader,
            len,
            content_type: None,
        }
    }

    /// Attach a declared MIME type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// External provider of catalog metadata and media byte streams.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Enumerate all known tracks, in source-defined order.
    async fn list_tracks(&self) -> Result<Vec<Track>, SourceError>;

    /// Enumerate all known albums, each with its member tracks in
    /// source-defined order.
    async fn list_albums(&self) -> Result<Vec<Album>, SourceError>;

    /// Look up a single track by id. `Ok(None)` means the source does not
    /// know the id; errors are reserved for backend failures.
    async fn get_track(&self, id: TrackId) -> Result<Option<Track>, SourceError>;

    /// Open the media behind a locator as a seekable byte stream.
    async fn open_resource(&self, locator: &str) -> Result<MediaResource, SourceError>;
}
