use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::collage::{CellId, TrackId};
use crate::config::AudioSettings;

use super::sink::create_sink;
use super::types::{AudioCmd, AudioEvent, PlaybackClock, PlaybackHandle, crossfade_volumes};

/// The preview currently owned by the audio thread.
#[derive(Default)]
struct Deck {
    sink: Option<Sink>,
    cell: Option<CellId>,
    track_id: Option<TrackId>,
    paused: bool,
    clock: PlaybackClock,
}

impl Deck {
    fn play(&mut self, new_sink: Sink, cell: CellId, track_id: TrackId, settings: &AudioSettings) {
        // Keep the default volume sane even if crossfade is disabled.
        new_sink.set_volume(1.0);

        if let Some(old_sink) = self.sink.take() {
            if !self.paused && settings.crossfade_ms > 0 {
                let steps = settings.crossfade_steps.max(1);
                let step = Duration::from_millis((settings.crossfade_ms / steps).max(1));
                old_sink.set_volume(1.0);
                new_sink.set_volume(0.0);
                new_sink.play();
                // Blocking fade; audio keeps flowing in rodio's mixer thread.
                for (out, inc) in crossfade_volumes(steps) {
                    old_sink.set_volume(out);
                    new_sink.set_volume(inc);
                    thread::sleep(step);
                }
            }
            old_sink.stop();
        }

        new_sink.play();
        self.sink = Some(new_sink);
        self.cell = Some(cell);
        self.track_id = Some(track_id);
        self.paused = false;
        self.clock.start(Instant::now());
    }

    fn toggle_pause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        let now = Instant::now();
        if self.paused {
            sink.play();
            self.clock.resume(now);
        } else {
            sink.pause();
            self.clock.pause(now);
        }
        self.paused = !self.paused;
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.cell = None;
        self.track_id = None;
        self.paused = true;
        self.clock.reset();
    }

    /// The preview ran out on its own.
    fn finished(&self) -> bool {
        !self.paused && self.sink.as_ref().is_some_and(Sink::empty)
    }

    fn publish(&self, playback: &PlaybackHandle) {
        if let Ok(mut info) = playback.lock() {
            info.cell = self.cell;
            info.elapsed = self.clock.elapsed(Instant::now());
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for (out, _) in crossfade_volumes(steps) {
        sink.set_volume(out);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread<E>(
    rx: Receiver<AudioCmd>,
    playback: PlaybackHandle,
    events: Sender<E>,
    settings: AudioSettings,
) -> JoinHandle<()>
where
    E: From<AudioEvent> + Send + 'static,
{
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "no audio output device, previews disabled");
                let _ = events.send(E::from(AudioEvent::DeviceUnavailable(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let mut deck = Deck::default();

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(AudioCmd::Play {
                    cell,
                    track_id,
                    audio,
                }) => match create_sink(&stream, audio) {
                    Ok(sink) => {
                        debug!(cell, track = %track_id, "playing preview");
                        deck.play(sink, cell, track_id, &settings);
                    }
                    Err(e) => {
                        warn!(cell, track = %track_id, error = %e, "preview not playable");
                        let _ = events.send(E::from(AudioEvent::DecodeFailed {
                            cell,
                            track_id,
                            reason: e.to_string(),
                        }));
                    }
                },
                Ok(AudioCmd::TogglePause) => deck.toggle_pause(),
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    if let Some(ref s) = deck.sink {
                        // Fade out gently before stopping.
                        fade_out_sink(s, fade_out_ms);
                    }
                    deck.stop();
                    deck.publish(&playback);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if deck.finished() {
                        if let (Some(cell), Some(track_id)) = (deck.cell, deck.track_id.clone()) {
                            debug!(cell, track = %track_id, "preview finished");
                            let _ = events.send(E::from(AudioEvent::Finished { cell, track_id }));
                        }
                        deck.stop();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
            deck.publish(&playback);
        }
    })
}
