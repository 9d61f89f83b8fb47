use serde::{Deserialize, Serialize};

/// Position of a cell in the grid, `row * width + col`.
pub type CellId = usize;

pub type ArtistId = String;
pub type TrackId = String;

/// A playable track taken from a playlist. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist_id: ArtistId,
    pub artist_name: String,
    pub preview_url: String,
    pub release_image: String,
}

impl Track {
    /// "Artist - Title", used in status lines and logs.
    pub fn display(&self) -> String {
        let artist = self.artist_name.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}

/// An artist as returned by lookups and similarity searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
}
