use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use tracing::{debug, warn};

use crate::collage::{Artist, ArtistId, Track};
use crate::controller::PlaylistRequest;

use super::client::{MusicApi, PlaylistParams};
use super::model::ApiError;

#[derive(Debug)]
pub enum ApiRequest {
    /// Resolve a typed artist name and fetch its first playlist.
    Enter { name: String },
    /// Fetch a playlist for a focal-artist change.
    Playlist(PlaylistRequest),
    /// Fetch one page of similar artists.
    Similar {
        artist_id: ArtistId,
        count: usize,
        offset: usize,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum ApiReply {
    Entered {
        name: String,
        result: Result<(Artist, Vec<Track>), ApiError>,
    },
    Playlist {
        request: PlaylistRequest,
        result: Result<Vec<Track>, ApiError>,
    },
    Similar {
        artist_id: ArtistId,
        result: Result<Vec<Artist>, ApiError>,
    },
}

/// Handle to the thread performing API requests in submission order.
pub struct ApiWorker {
    tx: Sender<ApiRequest>,
}

impl ApiWorker {
    /// Spawn the worker. Replies are delivered on `events` converted into the
    /// caller's event type.
    pub fn spawn<E>(api: Box<dyn MusicApi>, params: PlaylistParams, events: Sender<E>) -> Self
    where
        E: From<ApiReply> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<ApiRequest>();
        thread::spawn(move || run_worker(api, params, rx, events));
        Self { tx }
    }

    pub fn send(&self, request: ApiRequest) -> Result<(), mpsc::SendError<ApiRequest>> {
        self.tx.send(request)
    }

    /// Ask the worker to stop after its current request. Does not wait: a
    /// request in flight may block until its HTTP timeout.
    pub fn shutdown(&self) {
        let _ = self.send(ApiRequest::Shutdown);
    }
}

fn run_worker<E>(
    api: Box<dyn MusicApi>,
    params: PlaylistParams,
    rx: Receiver<ApiRequest>,
    events: Sender<E>,
) where
    E: From<ApiReply>,
{
    while let Ok(request) = rx.recv() {
        let reply = match request {
            ApiRequest::Shutdown => break,
            ApiRequest::Enter { name } => {
                let result = enter(api.as_ref(), &name, &params);
                if let Err(e) = &result {
                    warn!(name = %name, error = %e, "artist entry failed");
                }
                ApiReply::Entered { name, result }
            }
            ApiRequest::Playlist(request) => {
                let result = api.playlist(&request.artist_id, &params);
                match &result {
                    Ok(tracks) => debug!(
                        request = request.id.0,
                        artist = %request.artist_id,
                        tracks = tracks.len(),
                        "playlist fetched"
                    ),
                    Err(e) => warn!(artist = %request.artist_id, error = %e, "playlist fetch failed"),
                }
                ApiReply::Playlist { request, result }
            }
            ApiRequest::Similar {
                artist_id,
                count,
                offset,
            } => {
                let result = api.similar_artists(&artist_id, count, offset);
                if let Err(e) = &result {
                    warn!(artist = %artist_id, error = %e, "similar artists fetch failed");
                }
                ApiReply::Similar { artist_id, result }
            }
        };

        if events.send(E::from(reply)).is_err() {
            break;
        }
    }
}

fn enter(
    api: &dyn MusicApi,
    name: &str,
    params: &PlaylistParams,
) -> Result<(Artist, Vec<Track>), ApiError> {
    let artist = api.resolve_artist(name)?;
    let tracks = api.playlist(&artist.id, params)?;
    if tracks.is_empty() {
        return Err(ApiError::EmptyPlaylist);
    }
    Ok((artist, tracks))
}
