//! Application model types: `App`, the entry form and playback state.
//!
//! `App` owns the collage and the playlist controller. It never talks to the
//! network or the audio device itself; every operation returns the
//! [`Effect`]s the runtime has to carry out.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::api::{ApiError, SimilarArtistCursor};
use crate::assets::{AssetError, LoadedMedia};
use crate::audio::PlaybackHandle;
use crate::collage::{Artist, ArtistId, CellId, Collage, Tile, Track, TrackId};
use crate::config::Settings;
use crate::controller::{ControllerError, PlaylistController, PlaylistRequest, TickOutcome};

/// The playback state of the active cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Entry,
    Collage,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Work the runtime performs on behalf of the model.
#[derive(Debug)]
pub enum Effect {
    /// Resolve an artist name and fetch its first playlist.
    Enter { name: String },
    RequestPlaylist(PlaylistRequest),
    RequestSimilar {
        artist_id: ArtistId,
        count: usize,
        offset: usize,
    },
    LoadMedia(Track),
    Play {
        cell: CellId,
        track_id: TrackId,
        audio: Arc<[u8]>,
    },
    TogglePause,
}

pub const SEARCHING: &str = "Searching...";
pub const READY: &str = "Let's do it!";

/// The artist-name form shown before the collage starts.
#[derive(Debug, Default)]
pub struct EntryForm {
    pub input: String,
    pub status: Option<String>,
    pub searching: bool,
}

impl EntryForm {
    pub fn push_char(&mut self, c: char) {
        if !self.searching && !c.is_control() {
            self.input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.searching {
            self.input.pop();
        }
    }

    /// Lock the form and return the name to look up. Blank input and
    /// submissions while a search is running are ignored.
    pub fn submit(&mut self) -> Option<String> {
        let name = self.input.trim();
        if self.searching || name.is_empty() {
            return None;
        }
        let name = name.to_string();
        self.searching = true;
        self.status = Some(SEARCHING.to_string());
        Some(name)
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.searching = false;
        self.status = Some(message.into());
    }

    pub fn succeed(&mut self) {
        self.searching = false;
        self.status = Some(READY.to_string());
    }
}

/// The main application model.
pub struct App {
    pub screen: Screen,
    pub entry: EntryForm,
    pub collage: Collage,
    pub controller: PlaylistController,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,

    pub focal_artist: Option<Artist>,
    pub similar: Vec<Artist>,
    similar_cursor: SimilarArtistCursor,

    /// Last non-fatal problem worth showing on the collage screen.
    pub status: Option<String>,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(settings: &Settings) -> Self {
        let collage = Collage::new(&settings.grid);
        let controller = PlaylistController::new(&settings.schedule, collage.policy());
        let cursor = SimilarArtistCursor::new(settings.api.similar_page_size, settings.api.similar_max);
        Self::with_parts(collage, controller, cursor)
    }

    pub fn with_parts(
        collage: Collage,
        controller: PlaylistController,
        similar_cursor: SimilarArtistCursor,
    ) -> Self {
        Self {
            screen: Screen::Entry,
            entry: EntryForm::default(),
            collage,
            controller,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            focal_artist: None,
            similar: Vec::new(),
            similar_cursor,
            status: None,
            spinner_frame: 0,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn advance_spinner(&mut self) {
        if self.entry.searching {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Submit the entry form.
    pub fn submit_entry(&mut self) -> Option<Effect> {
        let name = self.entry.submit()?;
        info!(name = %name, "looking up artist");
        Some(Effect::Enter { name })
    }

    /// The entry lookup finished. On success the collage starts streaming the
    /// artist's playlist right away.
    pub fn entered(
        &mut self,
        result: Result<(Artist, Vec<Track>), ApiError>,
        now: Instant,
    ) -> Vec<Effect> {
        let (artist, tracks) = match result {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "artist lookup failed");
                self.entry.fail(e.user_message());
                return Vec::new();
            }
        };

        if let Err(e) = self.controller.set_playlist(tracks, now) {
            warn!(error = %e, "no playable tracks");
            self.entry.fail(ApiError::EmptyPlaylist.user_message());
            return Vec::new();
        }

        info!(artist = %artist.name, "starting collage");
        self.entry.succeed();
        self.screen = Screen::Collage;
        if self.collage.hovering().is_none() {
            self.collage.set_hovering(Some(0));
        }
        let artist_id = artist.id.clone();
        self.focal_artist = Some(artist);
        vec![self.first_similar_page(artist_id)]
    }

    /// Fire the pending tick if due. An admitted track has its media loaded.
    pub fn tick(&mut self, now: Instant) -> Option<Effect> {
        match self.controller.poll(now, self.collage.artist_index())? {
            TickOutcome::Admitted(track) => Some(Effect::LoadMedia(track)),
            TickOutcome::Rejected { track, reason } => {
                trace!(track = %track.id, ?reason, "tick dropped track");
                None
            }
            TickOutcome::Empty => None,
        }
    }

    /// Both media parts arrived; put the tile on the grid.
    pub fn media_ready(&mut self, track: Track, media: LoadedMedia) -> Option<CellId> {
        match self.collage.place(track, media) {
            Ok(placement) => Some(placement.cell),
            Err(e) => {
                debug!(error = %e, "tile not placed");
                None
            }
        }
    }

    pub fn media_failed(&self, track: &Track, error: &AssetError) {
        debug!(track = %track.id, %error, "tile skipped this cycle");
    }

    /// Toggle playback of `cell`: play it when it is not playing, otherwise
    /// pause it. Starting a cell other than the active one makes its artist
    /// the focal artist.
    pub fn toggle(&mut self, cell: CellId) -> Vec<Effect> {
        if self.collage.tile(cell).is_none() {
            return Vec::new();
        }
        if self.collage.active() == Some(cell) {
            match self.playback {
                PlaybackState::Playing => {
                    self.playback = PlaybackState::Paused;
                    return vec![Effect::TogglePause];
                }
                PlaybackState::Paused => {
                    self.playback = PlaybackState::Playing;
                    return vec![Effect::TogglePause];
                }
                PlaybackState::Stopped => {}
            }
        }
        self.play(cell)
    }

    pub fn toggle_hovered(&mut self) -> Vec<Effect> {
        match self.collage.hovering() {
            Some(cell) => self.toggle(cell),
            None => Vec::new(),
        }
    }

    /// Start `cell` from the beginning.
    fn play(&mut self, cell: CellId) -> Vec<Effect> {
        let Some(tile) = self.collage.tile(cell) else {
            return Vec::new();
        };
        let play = Effect::Play {
            cell,
            track_id: tile.track.id.clone(),
            audio: Arc::clone(&tile.media.audio),
        };
        let artist = Artist {
            id: tile.track.artist_id.clone(),
            name: tile.track.artist_name.clone(),
        };

        let mut effects = vec![play];
        if self.collage.active() != Some(cell) {
            self.collage.set_focal_cell(Some(cell));
            effects.extend(self.change_focal_artist(artist));
        }
        self.collage.set_active(Some(cell));
        self.playback = PlaybackState::Playing;
        effects
    }

    /// A preview ended on its own; move on to the most recently loaded tile.
    ///
    /// The report is queued behind user input, so it is ignored unless the
    /// finished track is still the active one.
    pub fn playback_finished(&mut self, cell: CellId, track_id: &str) -> Vec<Effect> {
        let current = self.collage.active() == Some(cell)
            && self.collage.tile(cell).is_some_and(|t| t.track.id == track_id);
        if !current {
            debug!(cell, track = track_id, "ignoring finish of a replaced preview");
            return Vec::new();
        }
        self.playback = PlaybackState::Stopped;
        match self.collage.last_loaded() {
            Some(next) => self.play(next),
            None => Vec::new(),
        }
    }

    pub fn playback_failed(&mut self, cell: CellId, reason: &str) {
        warn!(cell, reason, "preview could not be played");
        if self.collage.active() == Some(cell) {
            self.playback = PlaybackState::Stopped;
        }
        self.status = Some("That preview can't be played.".to_string());
    }

    /// Make `artist` the seed of the stream. The current tiles keep playing
    /// until the new playlist arrives.
    pub fn change_focal_artist(&mut self, artist: Artist) -> Vec<Effect> {
        if self.focal_artist.as_ref().is_some_and(|a| a.id == artist.id) {
            return Vec::new();
        }
        info!(artist = %artist.name, "focal artist changed");
        let request = self.controller.set_focal_artist(artist.id.clone());
        let artist_id = artist.id.clone();
        self.focal_artist = Some(artist);

        let mut effects = vec![Effect::RequestPlaylist(request)];
        effects.push(self.first_similar_page(artist_id));
        effects
    }

    /// Pick the `index`th similar artist as the new focal artist.
    pub fn choose_similar(&mut self, index: usize) -> Vec<Effect> {
        match self.similar.get(index).cloned() {
            Some(artist) => {
                self.collage.set_focal_cell(None);
                self.change_focal_artist(artist)
            }
            None => Vec::new(),
        }
    }

    pub fn playlist_loaded(
        &mut self,
        request: PlaylistRequest,
        result: Result<Vec<Track>, ApiError>,
        now: Instant,
    ) {
        match self.controller.handle_playlist(request.id, result, now) {
            Ok(n) => debug!(artist = %request.artist_id, tracks = n, "playlist accepted"),
            Err(ControllerError::Stale { .. }) => {}
            Err(e) => warn!(artist = %request.artist_id, error = %e, "keeping current playlist"),
        }
    }

    fn first_similar_page(&mut self, artist_id: ArtistId) -> Effect {
        self.similar.clear();
        self.similar_cursor.reset();
        let (count, offset) = self.similar_cursor.next_page();
        Effect::RequestSimilar {
            artist_id,
            count,
            offset,
        }
    }

    /// Request the next page of artists similar to the focal artist.
    pub fn next_similar_page(&mut self) -> Option<Effect> {
        let artist_id = self.focal_artist.as_ref()?.id.clone();
        let (count, offset) = self.similar_cursor.next_page();
        Some(Effect::RequestSimilar {
            artist_id,
            count,
            offset,
        })
    }

    /// Similar artists arrived. Pages for an artist that is no longer focal
    /// are dropped.
    pub fn similar_loaded(&mut self, artist_id: &str, result: Result<Vec<Artist>, ApiError>) {
        if self.focal_artist.as_ref().map(|a| a.id.as_str()) != Some(artist_id) {
            debug!(artist = artist_id, "ignoring similar artists for old focal artist");
            return;
        }
        match result {
            Ok(artists) => self.similar = artists,
            Err(e) => warn!(artist = artist_id, error = %e, "similar artists unavailable"),
        }
    }

    /// Move the hover cursor one cell, stopping at the grid edges.
    pub fn move_hover(&mut self, dir: Direction) {
        let Some(cell) = self.collage.hovering() else {
            self.collage.set_hovering(Some(0));
            return;
        };
        let (row, col) = self.collage.position(cell);
        let (row, col) = match dir {
            Direction::Up => (row.saturating_sub(1), col),
            Direction::Down => ((row + 1).min(self.collage.height() - 1), col),
            Direction::Left => (row, col.saturating_sub(1)),
            Direction::Right => (row, (col + 1).min(self.collage.width() - 1)),
        };
        let next = self.collage.cell_at(row, col);
        self.collage.set_hovering(Some(next));
    }

    /// Remove the hovered tile unless it is the active one.
    pub fn clear_hovered(&mut self) -> Option<Tile> {
        let cell = self.collage.hovering()?;
        if self.collage.active() == Some(cell) {
            return None;
        }
        self.collage.clear(cell).ok().flatten()
    }
}
