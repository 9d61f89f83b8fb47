//! Response shapes of the discovery API and conversion into `Track`s.

use serde::Deserialize;
use thiserror::Error;

use crate::collage::{Artist, Track};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    Http(u16),
    #[error("api status {code}: {message}")]
    Status { code: i64, message: String },
    #[error("artist not found: {0}")]
    ArtistNotFound(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("playlist is empty")]
    EmptyPlaylist,
}

impl ApiError {
    /// Message suitable for the entry screen.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) | ApiError::Http(_) => "There was a problem reaching Echo Nest.",
            _ => "Couldn't find that artist.",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub response: T,
}

#[derive(Debug, Deserialize)]
pub struct Status {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistBody {
    pub status: Status,
    #[serde(default)]
    pub songs: Vec<Song>,
}

#[derive(Debug, Deserialize)]
pub struct Song {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub artist_id: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub tracks: Vec<SongTrack>,
}

#[derive(Debug, Deserialize)]
pub struct SongTrack {
    pub preview_url: Option<String>,
    pub release_image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArtistsBody {
    pub status: Status,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

fn check_status(status: &Status) -> Result<(), ApiError> {
    if status.code == 0 {
        Ok(())
    } else {
        Err(ApiError::Status {
            code: status.code,
            message: status.message.clone(),
        })
    }
}

/// Parse a static-playlist response body into playable tracks.
pub fn parse_playlist(body: &str) -> Result<Vec<Track>, ApiError> {
    let envelope: Envelope<PlaylistBody> =
        serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    check_status(&envelope.response.status)?;
    Ok(extract_playlist(envelope.response.songs))
}

/// Parse an artist search or similar-artist response body.
pub fn parse_artists(body: &str) -> Result<Vec<Artist>, ApiError> {
    let envelope: Envelope<ArtistsBody> =
        serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))?;
    check_status(&envelope.response.status)?;
    Ok(envelope.response.artists)
}

/// Keep songs whose first track has both a preview and a release image.
pub fn extract_playlist(songs: Vec<Song>) -> Vec<Track> {
    songs
        .into_iter()
        .filter_map(|song| {
            let first = song.tracks.into_iter().next()?;
            let preview_url = first.preview_url.filter(|u| !u.is_empty())?;
            let release_image = first.release_image.filter(|u| !u.is_empty())?;
            Some(Track {
                id: song.id,
                title: song.title,
                artist_id: song.artist_id,
                artist_name: song.artist_name,
                preview_url,
                release_image,
            })
        })
        .collect()
}
