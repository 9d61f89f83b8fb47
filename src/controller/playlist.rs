use std::collections::VecDeque;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::api::ApiError;
use crate::collage::{Admission, AdmissionPolicy, ArtistId, ArtistTrackIndex, Track};
use crate::config::ScheduleSettings;
use crate::schedule::{DecayScheduler, TickTimer};

/// Identifies one playlist request; only the latest one is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// A playlist fetch the caller must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    pub id: RequestId,
    pub artist_id: ArtistId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Loading { artist_id: ArtistId },
    Streaming,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("playlist for request {request:?} superseded by {latest:?}")]
    Stale { request: RequestId, latest: RequestId },
    #[error("playlist is empty")]
    EmptyPlaylist,
    #[error(transparent)]
    Fetch(#[from] ApiError),
}

/// What a tick did with the head of the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The track may be shown; its media should be loaded and placed.
    Admitted(Track),
    /// The track was dropped.
    Rejected { track: Track, reason: Admission },
    /// Nothing left in the queue.
    Empty,
}

/// Owns the playlist queue and paces it onto the grid.
///
/// Exactly one tick is pending while streaming. A new playlist replaces the
/// queue, cancels the pending tick and restarts the decay schedule; a failed
/// or empty fetch leaves the running stream alone.
#[derive(Debug)]
pub struct PlaylistController {
    queue: VecDeque<Track>,
    schedule: ScheduleSettings,
    scheduler: DecayScheduler,
    timer: TickTimer,
    policy: AdmissionPolicy,
    issued: u64,
    pending: Option<PlaylistRequest>,
    streaming: bool,
    ticks: u64,
}

impl PlaylistController {
    pub fn new(schedule: &ScheduleSettings, policy: AdmissionPolicy) -> Self {
        Self {
            queue: VecDeque::new(),
            schedule: schedule.clone(),
            scheduler: DecayScheduler::from_settings(schedule),
            timer: TickTimer::new(),
            policy,
            issued: 0,
            pending: None,
            streaming: false,
            ticks: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        if self.streaming {
            ControllerState::Streaming
        } else if let Some(p) = &self.pending {
            ControllerState::Loading {
                artist_id: p.artist_id.clone(),
            }
        } else {
            ControllerState::Idle
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queued(&self) -> impl Iterator<Item = &Track> {
        self.queue.iter()
    }

    /// Ticks fired since the current playlist started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pending_request(&self) -> Option<&PlaylistRequest> {
        self.pending.as_ref()
    }

    /// Deadline of the pending tick, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Start a focal-artist change. The returned request supersedes any
    /// earlier one; its reply goes to [`PlaylistController::handle_playlist`].
    pub fn set_focal_artist(&mut self, artist_id: impl Into<ArtistId>) -> PlaylistRequest {
        let request = PlaylistRequest {
            id: self.next_request_id(),
            artist_id: artist_id.into(),
        };
        info!(artist = %request.artist_id, request = request.id.0, "focal artist requested");
        self.pending = Some(request.clone());
        request
    }

    /// Accept the reply to a playlist request.
    ///
    /// Replies to superseded requests are discarded. Failed and empty fetches
    /// are reported but leave the current queue and schedule untouched.
    pub fn handle_playlist(
        &mut self,
        request: RequestId,
        result: Result<Vec<Track>, ApiError>,
        now: Instant,
    ) -> Result<usize, ControllerError> {
        let latest = RequestId(self.issued);
        if request != latest {
            debug!(request = request.0, latest = latest.0, "ignoring stale playlist");
            return Err(ControllerError::Stale { request, latest });
        }
        self.pending = None;

        let tracks = result?;
        if tracks.is_empty() {
            return Err(ControllerError::EmptyPlaylist);
        }
        Ok(self.start(tracks, now))
    }

    /// Start streaming an already fetched playlist. Outstanding requests
    /// become stale.
    pub fn set_playlist(&mut self, tracks: Vec<Track>, now: Instant) -> Result<usize, ControllerError> {
        if tracks.is_empty() {
            return Err(ControllerError::EmptyPlaylist);
        }
        self.next_request_id();
        self.pending = None;
        Ok(self.start(tracks, now))
    }

    /// Fire the pending tick if it is due.
    pub fn poll(&mut self, now: Instant, index: &ArtistTrackIndex) -> Option<TickOutcome> {
        if self.timer.fire_if_due(now) {
            Some(self.tick(now, index))
        } else {
            None
        }
    }

    /// Evaluate the head of the queue and schedule the next tick.
    ///
    /// A rejected track is dropped, not retried. Ticks keep firing on an
    /// empty queue until a new playlist arrives.
    pub fn tick(&mut self, now: Instant, index: &ArtistTrackIndex) -> TickOutcome {
        self.ticks += 1;
        let outcome = match self.queue.pop_front() {
            None => TickOutcome::Empty,
            Some(track) => {
                let verdict = self.policy.admission(Some(&track), index);
                if verdict.is_accepted() {
                    TickOutcome::Admitted(track)
                } else {
                    debug!(track = %track.id, reason = ?verdict, "track rejected");
                    TickOutcome::Rejected {
                        track,
                        reason: verdict,
                    }
                }
            }
        };

        let delay = self.scheduler.next();
        trace!(tick = self.ticks, delay_ms = delay.as_millis() as u64, "next tick scheduled");
        self.timer.schedule_in(now, delay);
        outcome
    }

    fn start(&mut self, tracks: Vec<Track>, now: Instant) -> usize {
        self.timer.cancel();
        self.queue = tracks.into();
        self.scheduler = DecayScheduler::from_settings(&self.schedule);
        self.streaming = true;
        self.ticks = 0;
        self.timer.schedule_at(now);
        info!(tracks = self.queue.len(), "playlist started");
        self.queue.len()
    }

    fn next_request_id(&mut self) -> RequestId {
        self.issued += 1;
        RequestId(self.issued)
    }
}
