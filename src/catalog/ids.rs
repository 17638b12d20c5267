//! Typed ID wrappers for catalog entities.
//!
//! Newtypes around `u64` prevent mixing track and album identifiers at
//! compile time. Identifiers are assigned by the media source and must be
//! unique within a catalog snapshot.

use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::str::FromStr;

/// Unique identifier for a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl TrackId {
    /// Raw numeric value, as used in `audio_id` query parameters.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for TrackId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<TrackId> for u64 {
    fn from(id: TrackId) -> Self {
        id.0
    }
}

impl FromStr for TrackId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Unique identifier for an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlbumId(u64);

impl AlbumId {
    /// Raw numeric value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for AlbumId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<AlbumId> for u64 {
    fn from(id: AlbumId) -> Self {
        id.0
    }
}

impl FromStr for AlbumId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

impl std::fmt::Display for AlbumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_id_round_trip() {
        let id = TrackId::from(42);
        let n: u64 = id.into();
        assert_eq!(n, 42);
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_track_id_parse() {
        let id: TrackId = "17".parse().unwrap();
        assert_eq!(id, TrackId::from(17));
        assert!("abc".parse::<TrackId>().is_err());
        assert!("-1".parse::<TrackId>().is_err());
        assert!("".parse::<TrackId>().is_err());
    }

    #[test]
    fn test_track_id_serialization_is_transparent() {
        let id = TrackId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: TrackId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_album_id_display() {
        let id = AlbumId::from(3);
        assert_eq!(format!("{}", id), "3");
    }

    #[test]
    fn test_ids_are_distinct_types() {
        let _track = TrackId::from(1);
        let _album = AlbumId::from(1);
        // Type system prevents mixing these at compile time.
    }
}
