use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::Duration;

use tracing::warn;

use crate::api::{ApiRequest, ApiWorker, EchoNestClient, PlaylistParams};
use crate::app::{App, Effect};
use crate::assets::{AssetLoader, HttpMediaSource};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;

use super::AppEvent;

/// Background workers, all reporting on the same event queue.
pub struct Services {
    pub api: ApiWorker,
    pub loader: AssetLoader<AppEvent>,
    pub audio: AudioPlayer,
}

pub fn start_services(
    settings: &config::Settings,
    events: Sender<AppEvent>,
) -> Result<Services, Box<dyn std::error::Error>> {
    let client = EchoNestClient::new(&settings.api)?;
    let params = PlaylistParams::from_settings(&settings.api);
    let media = HttpMediaSource::new(Duration::from_millis(settings.api.request_timeout_ms))?;

    Ok(Services {
        api: ApiWorker::spawn(Box::new(client), params, events.clone()),
        loader: AssetLoader::new(Arc::new(media), events.clone()),
        audio: AudioPlayer::new(settings.audio.clone(), events),
    })
}

/// Fill in and submit the entry form with an artist given on the command line.
pub fn submit_initial_artist(app: &mut App, services: &mut Services, name: &str) {
    app.entry.input = name.to_string();
    if let Some(effect) = app.submit_entry() {
        apply(services, effect);
    }
}

/// Carry out one model effect.
pub fn apply(services: &mut Services, effect: Effect) {
    let sent = match effect {
        Effect::Enter { name } => services.api.send(ApiRequest::Enter { name }).is_ok(),
        Effect::RequestPlaylist(request) => {
            services.api.send(ApiRequest::Playlist(request)).is_ok()
        }
        Effect::RequestSimilar {
            artist_id,
            count,
            offset,
        } => services
            .api
            .send(ApiRequest::Similar {
                artist_id,
                count,
                offset,
            })
            .is_ok(),
        Effect::LoadMedia(track) => {
            services.loader.load(track);
            true
        }
        Effect::Play {
            cell,
            track_id,
            audio,
        } => services
            .audio
            .send(AudioCmd::Play {
                cell,
                track_id,
                audio,
            })
            .is_ok(),
        Effect::TogglePause => services.audio.send(AudioCmd::TogglePause).is_ok(),
    };
    if !sent {
        warn!("background worker has stopped; request dropped");
    }
}

pub fn apply_all(services: &mut Services, effects: impl IntoIterator<Item = Effect>) {
    for effect in effects {
        apply(services, effect);
    }
}
