use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, warn};

use crate::collage::Track;

use super::join::join_both;
use super::source::{AssetError, LoadedMedia, MediaSource};

#[derive(Debug)]
pub enum AssetEvent {
    Ready { track: Track, media: LoadedMedia },
    Failed { track: Track, error: AssetError },
}

/// Fetch image and audio for `track` concurrently; fails with the first
/// error when either part fails.
pub fn load_media(source: &dyn MediaSource, track: &Track) -> Result<LoadedMedia, AssetError> {
    let (image, audio) = join_both(
        || source.fetch_image(&track.release_image),
        || source.fetch_audio(&track.preview_url),
    );
    Ok(LoadedMedia::new(image?, audio?))
}

/// Starts media loads in the background and reports each as one event.
///
/// Loads are never cancelled; a load that finishes after its tile became
/// irrelevant is simply placed or dropped by the receiver.
pub struct AssetLoader<E> {
    source: Arc<dyn MediaSource>,
    events: Sender<E>,
}

impl<E> AssetLoader<E>
where
    E: From<AssetEvent> + Send + 'static,
{
    pub fn new(source: Arc<dyn MediaSource>, events: Sender<E>) -> Self {
        Self { source, events }
    }

    pub fn load(&self, track: Track) {
        let source = Arc::clone(&self.source);
        let events = self.events.clone();

        thread::spawn(move || {
            let event = match load_media(source.as_ref(), &track) {
                Ok(media) => {
                    debug!(track = %track.id, "media ready");
                    AssetEvent::Ready { track, media }
                }
                Err(error) => {
                    warn!(track = %track.id, error = %error, "media failed");
                    AssetEvent::Failed { track, error }
                }
            };
            let _ = events.send(E::from(event));
        });
    }
}
