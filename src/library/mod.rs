//! Filesystem-backed media source.
//!
//! Walks the configured library roots, picks up audio files by extension,
//! reads tags with `lofty` and serves the files back as seekable streams.
//! This is the real-world [`MediaSource`] behind the server binary; tests
//! use the in-memory fixture instead.

use async_trait::async_trait;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::Path;
use walkdir::WalkDir;

use crate::catalog::{
    Album, AlbumId, MediaResource, MediaSource, SourceError, Thumbnail, Track, TrackId,
};
use crate::config::LibraryConfig;

/// Media source reading tracks from local directories.
#[derive(Debug, Clone)]
pub struct FsLibrary {
    config: LibraryConfig,
}

impl FsLibrary {
    pub fn new(config: LibraryConfig) -> Self {
        Self { config }
    }

    /// Walk all roots and collect tracks plus album groupings.
    ///
    /// Blocking; callers go through `spawn_blocking`. A file whose tags
    /// cannot be read still becomes a track with filename-derived metadata;
    /// only the walk itself failing is an error.
    fn scan(&self) -> (Vec<Track>, Vec<Album>) {
        let mut tracks = Vec::new();
        let mut album_order: Vec<String> = Vec::new();
        let mut album_members: HashMap<String, Vec<Track>> = HashMap::new();
        let mut album_art: HashMap<String, Thumbnail> = HashMap::new();

        for root in &self.config.roots {
            let mut walker = WalkDir::new(root).follow_links(self.config.follow_links);
            if let Some(depth) = self.config.max_depth {
                walker = walker.max_depth(depth);
            }

            for entry in walker
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if !path.is_file() || !self.is_audio_file(path) {
                    continue;
                }

                let scanned = read_track(path);
                if let Some(album_name) = scanned.track.album.clone() {
                    if !album_members.contains_key(&album_name) {
                        album_order.push(album_name.clone());
                    }
                    album_members
                        .entry(album_name.clone())
                        .or_default()
                        .push(scanned.track.clone());
                    if let Some(art) = scanned.art {
                        album_art.entry(album_name).or_insert(art);
                    }
                }
                tracks.push(scanned.track);
            }
        }

        let albums = album_order
            .into_iter()
            .map(|name| {
                let tracks = album_members.remove(&name).unwrap_or_default();
                Album {
                    id: AlbumId::from(stable_hash(&name)),
                    thumbnail: album_art.remove(&name),
                    name,
                    tracks,
                }
            })
            .collect();

        (tracks, albums)
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.config
                    .extensions
                    .iter()
                    .any(|e| e.trim().trim_start_matches('.').eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Stable 64-bit hash used for track and album ids.
///
/// `DefaultHasher::new()` uses fixed keys, so the same path hashes to the
/// same id on every scan — rebuild idempotence depends on this.
fn stable_hash(value: &impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

struct ScannedTrack {
    track: Track,
    art: Option<Thumbnail>,
}

fn read_track(path: &Path) -> ScannedTrack {
    let locator = path.to_string_lossy().into_owned();

    let fallback_title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string());

    let mut title = fallback_title;
    let mut artist = None;
    let mut album = None;
    let mut duration_ms = None;
    let mut art = None;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration_ms = Some(tagged.properties().duration().as_millis() as u64);

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = non_empty(tag.get_string(&ItemKey::TrackTitle)) {
                title = Some(v);
            }
            artist = non_empty(tag.get_string(&ItemKey::TrackArtist));
            album = non_empty(tag.get_string(&ItemKey::AlbumTitle));

            if let Some(picture) = tag.pictures().first() {
                art = Some(Thumbnail {
                    data: bytes::Bytes::copy_from_slice(picture.data()),
                    mime: picture
                        .mime_type()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "image/jpeg".to_string()),
                });
            }
        }
    }

    ScannedTrack {
        track: Track {
            id: TrackId::from(stable_hash(&locator)),
            title,
            artist,
            album,
            duration_ms,
            locator,
        },
        art,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

/// MIME type for an audio file path, by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("ogg") | Some("opus") => "audio/ogg",
        Some("wav") => "audio/wav",
        // mp3 and anything unrecognized.
        _ => "audio/mpeg",
    }
}

#[async_trait]
impl MediaSource for FsLibrary {
    async fn list_tracks(&self) -> Result<Vec<Track>, SourceError> {
        let library = self.clone();
        tokio::task::spawn_blocking(move || library.scan().0)
            .await
            .map_err(|e| SourceError::backend(format!("scan task failed: {e}")))
    }

    async fn list_albums(&self) -> Result<Vec<Album>, SourceError> {
        let library = self.clone();
        tokio::task::spawn_blocking(move || library.scan().1)
            .await
            .map_err(|e| SourceError::backend(format!("scan task failed: {e}")))
    }

    async fn get_track(&self, id: TrackId) -> Result<Option<Track>, SourceError> {
        let tracks = self.list_tracks().await?;
        Ok(tracks.into_iter().find(|t| t.id == id))
    }

    async fn open_resource(&self, locator: &str) -> Result<MediaResource, SourceError> {
        let path = Path::new(locator);
        let file = tokio::fs::File::open(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::not_found(locator)
            } else {
                SourceError::Io(e)
            }
        })?;
        let len = file.metadata().await?.len();
        Ok(MediaResource::new(Box::new(file), len).with_content_type(content_type_for(path)))
    }
}
