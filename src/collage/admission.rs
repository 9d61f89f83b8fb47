use std::collections::{HashMap, HashSet};

use super::model::{ArtistId, Track, TrackId};

/// Default cap on tracks by one artist shown at the same time.
pub const MAX_ARTIST_TRACKS: usize = 2;

/// Tracks currently on the grid, grouped by artist.
#[derive(Debug, Default, Clone)]
pub struct ArtistTrackIndex {
    by_artist: HashMap<ArtistId, HashSet<TrackId>>,
}

impl ArtistTrackIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `track` as shown. Returns false if it was already recorded.
    pub fn insert(&mut self, track: &Track) -> bool {
        self.by_artist
            .entry(track.artist_id.clone())
            .or_default()
            .insert(track.id.clone())
    }

    /// Forget `track`, dropping the artist entry once it is empty.
    pub fn remove(&mut self, track: &Track) -> bool {
        let Some(ids) = self.by_artist.get_mut(&track.artist_id) else {
            return false;
        };
        let removed = ids.remove(&track.id);
        if ids.is_empty() {
            self.by_artist.remove(&track.artist_id);
        }
        removed
    }

    /// Number of tracks by `artist_id` currently shown.
    pub fn count(&self, artist_id: &str) -> usize {
        self.by_artist.get(artist_id).map_or(0, HashSet::len)
    }

    pub fn contains(&self, artist_id: &str, track_id: &str) -> bool {
        self.by_artist
            .get(artist_id)
            .is_some_and(|ids| ids.contains(track_id))
    }

    /// Number of distinct artists on the grid.
    pub fn artists(&self) -> usize {
        self.by_artist.len()
    }

    /// Number of tracks on the grid.
    pub fn total(&self) -> usize {
        self.by_artist.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_artist.is_empty()
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    NoTrack,
    ArtistAtCapacity { artist_id: ArtistId, shown: usize },
    AlreadyShown { track_id: TrackId },
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }
}

/// Limits how many tracks by one artist may occupy the grid at once.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionPolicy {
    max_artist_tracks: usize,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::new(MAX_ARTIST_TRACKS)
    }
}

impl AdmissionPolicy {
    pub fn new(max_artist_tracks: usize) -> Self {
        Self { max_artist_tracks }
    }

    pub fn max_artist_tracks(&self) -> usize {
        self.max_artist_tracks
    }

    /// Decide whether `track` may be shown given what is on the grid.
    ///
    /// The artist's count must be below the cap; independently, a track that
    /// is already on the grid is never admitted a second time.
    pub fn admission(&self, track: Option<&Track>, index: &ArtistTrackIndex) -> Admission {
        let Some(track) = track else {
            return Admission::NoTrack;
        };

        let shown = index.count(&track.artist_id);
        if shown == 0 {
            return Admission::Accepted;
        }
        if shown >= self.max_artist_tracks {
            return Admission::ArtistAtCapacity {
                artist_id: track.artist_id.clone(),
                shown,
            };
        }
        if index.contains(&track.artist_id, &track.id) {
            return Admission::AlreadyShown {
                track_id: track.id.clone(),
            };
        }
        Admission::Accepted
    }

    pub fn should_display(&self, track: Option<&Track>, index: &ArtistTrackIndex) -> bool {
        self.admission(track, index).is_accepted()
    }
}
