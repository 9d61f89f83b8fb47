//! Audio-related small types and handles.
//!
//! Commands sent to the audio thread, the events it reports back and the
//! playback snapshot shared with the UI.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::collage::{CellId, TrackId};

#[derive(Debug)]
pub enum AudioCmd {
    /// Start playing a preview, replacing whatever is playing now.
    Play {
        cell: CellId,
        track_id: TrackId,
        audio: Arc<[u8]>,
    },
    /// Toggle pause/resume of the current preview.
    TogglePause,
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Reported by the audio thread on the shared event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// The preview in `cell` played to its end.
    Finished { cell: CellId, track_id: TrackId },
    /// The preview bytes could not be decoded.
    DecodeFailed {
        cell: CellId,
        track_id: TrackId,
        reason: String,
    },
    /// No output device; playback is disabled for this session.
    DeviceUnavailable(String),
}

#[derive(Debug, Clone, Default)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Cell whose preview is loaded, if any.
    pub cell: Option<CellId>,
    /// Elapsed playback time for the current preview.
    pub elapsed: Duration,
}

impl PlaybackInfo {
    /// Elapsed time of `cell`'s preview; zero until the audio thread has
    /// picked it up.
    pub fn elapsed_in(&self, cell: CellId) -> Duration {
        if self.cell == Some(cell) {
            self.elapsed
        } else {
            Duration::ZERO
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

/// Elapsed time of the current preview across pauses.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlaybackClock {
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.accumulated = Duration::ZERO;
    }

    pub fn pause(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }
}

/// Volume pairs `(outgoing, incoming)` for each crossfade step.
pub fn crossfade_volumes(steps: u64) -> Vec<(f32, f32)> {
    let steps = steps.max(1);
    (1..=steps)
        .map(|step| {
            let t = step as f32 / steps as f32;
            (1.0 - t, t)
        })
        .collect()
}
