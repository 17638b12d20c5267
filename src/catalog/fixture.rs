//! In-memory media source for tests and demos.
//!
//! [`FixtureSource`] is the test double required wherever a real library is
//! unavailable: tracks, albums and byte blobs live in memory, resources are
//! served through `Cursor`, and a switchable failure mode exercises the
//! fail-soft catalog path.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::io::Cursor;

use super::source::{MediaResource, MediaSource, SourceError};
use super::{Album, AlbumId, Thumbnail, Track, TrackId};

/// In-memory [`MediaSource`] with canned tracks, albums and media bytes.
#[derive(Debug, Default)]
pub struct FixtureSource {
    tracks: Vec<Track>,
    unlisted: Vec<Track>,
    albums: Vec<Album>,
    blobs: HashMap<String, Bytes>,
    fail: bool,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn locator(id: u64) -> String {
        format!("mem:{id}")
    }

    /// Add a track with full metadata and its media bytes.
    #[must_use]
    pub fn with_track(mut self, id: u64, title: &str, artist: &str, album: &str, data: &[u8]) -> Self {
        let locator = Self::locator(id);
        self.blobs.insert(locator.clone(), Bytes::copy_from_slice(data));
        self.tracks.push(Track {
            id: TrackId::from(id),
            title: Some(title.to_string()),
            artist: Some(artist.to_string()),
            album: Some(album.to_string()),
            duration_ms: Some(1_000),
            locator,
        });
        self
    }

    /// Add an arbitrary track record together with its media bytes.
    #[must_use]
    pub fn with_raw_track(mut self, track: Track, data: &[u8]) -> Self {
        self.blobs
            .insert(track.locator.clone(), Bytes::copy_from_slice(data));
        self.tracks.push(track);
        self
    }

    /// Add a track that `get_track` resolves but `list_tracks` omits,
    /// modelling media that appeared after the last catalog build.
    #[must_use]
    pub fn with_unlisted_track(mut self, id: u64, title: &str, data: &[u8]) -> Self {
        let locator = Self::locator(id);
        self.blobs.insert(locator.clone(), Bytes::copy_from_slice(data));
        self.unlisted.push(Track {
            id: TrackId::from(id),
            title: Some(title.to_string()),
            artist: None,
            album: None,
            duration_ms: None,
            locator,
        });
        self
    }

    /// Add an album grouping existing track ids, optionally with art.
    #[must_use]
    pub fn with_album(mut self, id: u64, name: &str, track_ids: &[u64], art: Option<(&[u8], &str)>) -> Self {
        let tracks = track_ids
            .iter()
            .filter_map(|tid| {
                let tid = TrackId::from(*tid);
                self.tracks.iter().find(|t| t.id == tid).cloned()
            })
            .collect();
        self.albums.push(Album {
            id: AlbumId::from(id),
            name: name.to_string(),
            tracks,
            thumbnail: art.map(|(data, mime)| Thumbnail {
                data: Bytes::copy_from_slice(data),
                mime: mime.to_string(),
            }),
        });
        self
    }

    /// Make every metadata query fail with a backend error.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn check(&self) -> Result<(), SourceError> {
        if self.fail {
            Err(SourceError::backend("fixture configured to fail"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MediaSource for FixtureSource {
    async fn list_tracks(&self) -> Result<Vec<Track>, SourceError> {
        self.check()?;
        Ok(self.tracks.clone())
    }

    async fn list_albums(&self) -> Result<Vec<Album>, SourceError> {
        self.check()?;
        Ok(self.albums.clone())
    }

    async fn get_track(&self, id: TrackId) -> Result<Option<Track>, SourceError> {
        self.check()?;
        Ok(self
            .tracks
            .iter()
            .chain(self.unlisted.iter())
            .find(|t| t.id == id)
            .cloned())
    }

    async fn open_resource(&self, locator: &str) -> Result<MediaResource, SourceError> {
        let blob = self
            .blobs
            .get(locator)
            .ok_or_else(|| SourceError::not_found(locator))?;
        let len = blob.len() as u64;
        Ok(MediaResource::new(Box::new(Cursor::new(blob.clone())), len))
    }
}
