//! Upstream payload shapes and their projected records.
//!
//! The upstream wraps every resource in a `{"response": {...}}`
//! envelope. Raw structs mirror that shape for deserialization only;
//! the projected records are what this proxy re-serves, with the
//! rich-text `description` DOM replaced by its flattened form.

use serde::{Deserialize, Serialize};

use crate::flatten::{flatten, DomNode, FlatNode};

// --- Raw upstream shapes (deserialize only) ---

#[derive(Debug, Deserialize)]
pub struct SongEnvelope {
    pub response: SongResponse,
}

#[derive(Debug, Deserialize)]
pub struct SongResponse {
    pub song: RawSong,
}

#[derive(Debug, Deserialize)]
pub struct ArtistEnvelope {
    pub response: ArtistResponse,
}

#[derive(Debug, Deserialize)]
pub struct ArtistResponse {
    pub artist: RawArtist,
}

#[derive(Debug, Deserialize)]
pub struct RawSong {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub full_title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub artist_names: String,
    #[serde(default)]
    pub song_art_image_url: Option<String>,
    #[serde(default)]
    pub album: Option<RawAlbum>,
    #[serde(default)]
    pub description: Option<RawDescription>,
}

#[derive(Debug, Deserialize)]
pub struct RawArtist {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub alternate_names: Vec<String>,
    #[serde(default)]
    pub description: Option<RawDescription>,
}

#[derive(Debug, Deserialize)]
pub struct RawAlbum {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub cover_art_url: Option<String>,
    #[serde(default)]
    pub primary_artists: Vec<RawArtistName>,
}

#[derive(Debug, Deserialize)]
pub struct RawArtistName {
    pub name: String,
}

/// Description fields nest the DOM one level down.
#[derive(Debug, Deserialize)]
pub struct RawDescription {
    pub dom: DomNode,
}

// --- Projected records (what the proxy serves) ---

/// A song as re-served by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: u64,
    pub title: String,
    pub full_title: String,
    pub url: String,
    pub release_date: Option<String>,
    pub artist_names: String,
    pub song_art_image_url: Option<String>,
    pub album: Option<AlbumRecord>,
    pub description: Vec<FlatNode>,
}

/// An artist as re-served by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub image_url: Option<String>,
    pub alternate_names: Vec<String>,
    pub description: Vec<FlatNode>,
}

/// Album projection attached to a song; `artist` is the name of the
/// first listed primary artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub id: u64,
    pub name: String,
    pub cover_art_url: Option<String>,
    pub artist: String,
}

impl From<RawSong> for SongRecord {
    fn from(raw: RawSong) -> Self {
        let description = flatten(raw.description.as_ref().map(|d| &d.dom));
        Self {
            id: raw.id,
            title: raw.title,
            full_title: raw.full_title,
            url: raw.url,
            release_date: raw.release_date,
            artist_names: raw.artist_names,
            song_art_image_url: raw.song_art_image_url,
            album: raw.album.map(AlbumRecord::from),
            description,
        }
    }
}

impl From<RawArtist> for ArtistRecord {
    fn from(raw: RawArtist) -> Self {
        let description = flatten(raw.description.as_ref().map(|d| &d.dom));
        Self {
            id: raw.id,
            name: raw.name,
            url: raw.url,
            image_url: raw.image_url,
            alternate_names: raw.alternate_names,
            description,
        }
    }
}

impl From<RawAlbum> for AlbumRecord {
    fn from(raw: RawAlbum) -> Self {
        let artist = raw
            .primary_artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default();
        Self {
            id: raw.id,
            name: raw.name,
            cover_art_url: raw.cover_art_url,
            artist,
        }
    }
}
