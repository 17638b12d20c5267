//! In-memory track/album catalog.
//!
//! The catalog is a rebuildable snapshot of everything the media source
//! currently knows. Snapshots are immutable once built; [`CatalogStore`]
//! swaps the active snapshot atomically so concurrent readers always see
//! either the old or the new catalog, never a partial one.

mod ids;
pub mod fixture;
pub mod source;

pub use ids::{AlbumId, TrackId};
pub use source::{MediaResource, MediaSource, MediaStream, SourceError};

use bytes::Bytes;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Title shown for tracks whose source reported no title tag.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// A single audio track. Immutable value record once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Duration in milliseconds, when the source knows it.
    pub duration_ms: Option<u64>,
    /// Opaque locator only the media source can resolve. Not exposed in
    /// catalog JSON; clients fetch media by id.
    #[serde(skip)]
    pub locator: String,
}

impl Track {
    /// The track title, substituting a fixed fallback when absent.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }
}

/// Opaque album art blob, passed through byte-for-byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub data: Bytes,
    pub mime: String,
}

/// An album: a name and its member tracks in source-defined order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub tracks: Vec<Track>,
    /// Served from the art endpoint, never inlined into JSON.
    #[serde(skip)]
    pub thumbnail: Option<Thumbnail>,
}

/// Immutable snapshot of all tracks and albums at a point in time.
#[derive(Debug, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    by_id: HashMap<TrackId, usize>,
    albums: Vec<Album>,
}

impl Catalog {
    /// Build a snapshot by querying the source.
    ///
    /// Building never partially fails: if either enumeration errors, the
    /// whole build errors and the caller decides what to install (the
    /// fail-soft policy in [`CatalogStore::rebuild`] installs an empty
    /// snapshot). Duplicate track ids from the source are dropped, first
    /// occurrence wins.
    pub async fn build(source: &dyn MediaSource) -> Result<Self, SourceError> {
        let tracks = source.list_tracks().await?;
        let albums = source.list_albums().await?;
        Ok(Self::from_parts(tracks, albums))
    }

    /// Assemble a snapshot from already-enumerated records.
    pub fn from_parts(tracks: Vec<Track>, albums: Vec<Album>) -> Self {
        let mut by_id = HashMap::with_capacity(tracks.len());
        let mut deduped = Vec::with_capacity(tracks.len());
        for track in tracks {
            match by_id.entry(track.id) {
                std::collections::hash_map::Entry::Vacant(e) => {
                    e.insert(deduped.len());
                    deduped.push(track);
                }
                std::collections::hash_map::Entry::Occupied(_) => {
                    tracing::warn!(id = %track.id, "dropping track with duplicate id");
                }
            }
        }
        Self {
            tracks: deduped,
            by_id,
            albums,
        }
    }

    /// Look up a track by id.
    #[must_use]
    pub fn lookup(&self, id: TrackId) -> Option<&Track> {
        self.by_id.get(&id).map(|&i| &self.tracks[i])
    }

    /// All tracks, in insertion order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// All albums, in source-defined order.
    pub fn albums(&self) -> impl Iterator<Item = &Album> {
        self.albums.iter()
    }

    /// Look up an album by id.
    #[must_use]
    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    /// Number of tracks in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// True when the snapshot holds no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Owner of the active catalog snapshot.
///
/// The pointer swap in [`install`](Self::install) is the only mutation
/// point: readers clone the `Arc` out of the lock and keep streaming from
/// their snapshot even while a rebuild installs a new one.
#[derive(Debug, Default)]
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active snapshot. Cheap; callers must not hold the returned
    /// `Arc` hostage to a lock (there is none to hold).
    #[must_use]
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().clone()
    }

    /// Atomically replace the active snapshot.
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        *self.current.write() = next.clone();
        next
    }

    /// Rebuild from the source and install the result.
    ///
    /// Fail-soft: a source error installs an *empty* snapshot and hands the
    /// error back so the caller can log it — an errored source and a
    /// genuinely empty library both leave a usable catalog, but stay
    /// distinguishable.
    pub async fn rebuild(
        &self,
        source: &dyn MediaSource,
    ) -> (Arc<Catalog>, Option<SourceError>) {
        match Catalog::build(source).await {
            Ok(catalog) => (self.install(catalog), None),
            Err(err) => (self.install(Catalog::default()), Some(err)),
        }
    }
}
