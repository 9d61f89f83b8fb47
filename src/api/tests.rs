use std::sync::mpsc;
use std::time::Duration;

use super::*;
use crate::collage::{Artist, Track};
use crate::config::ApiSettings;
use crate::controller::{PlaylistRequest, RequestId};

const PLAYLIST_BODY: &str = r#"{
  "response": {
    "status": {"code": 0, "message": "Success", "version": "4.2"},
    "songs": [
      {
        "id": "SOAAA",
        "title": "First",
        "artist_id": "AR1",
        "artist_name": "One",
        "tracks": [
          {"preview_url": "http://p/1.mp3", "release_image": "http://i/1.jpg", "catalog": "7digital-US"},
          {"preview_url": "http://p/1b.mp3", "release_image": "http://i/1b.jpg"}
        ]
      },
      {"id": "SOBBB", "title": "No tracks", "artist_id": "AR2", "artist_name": "Two", "tracks": []},
      {
        "id": "SOCCC",
        "title": "No image",
        "artist_id": "AR3",
        "artist_name": "Three",
        "tracks": [{"preview_url": "http://p/3.mp3"}]
      },
      {
        "id": "SODDD",
        "title": "Fourth",
        "artist_id": "AR4",
        "artist_name": "Four",
        "tracks": [{"preview_url": "http://p/4.mp3", "release_image": "http://i/4.jpg"}]
      }
    ]
  }
}"#;

#[test]
fn playlist_extraction_keeps_complete_songs_in_order() {
    let tracks = parse_playlist(PLAYLIST_BODY).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(
        tracks[0],
        Track {
            id: "SOAAA".into(),
            title: "First".into(),
            artist_id: "AR1".into(),
            artist_name: "One".into(),
            preview_url: "http://p/1.mp3".into(),
            release_image: "http://i/1.jpg".into(),
        }
    );
    assert_eq!(tracks[1].id, "SODDD");
}

#[test]
fn non_zero_status_is_an_error() {
    let body = r#"{"response": {"status": {"code": 5, "message": "The Identifier specified does not exist"}}}"#;
    let err = parse_playlist(body).unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            code: 5,
            message: "The Identifier specified does not exist".into()
        }
    );
    assert_eq!(err.user_message(), "Couldn't find that artist.");
}

#[test]
fn malformed_body_is_a_parse_error() {
    assert!(matches!(parse_playlist("<html>"), Err(ApiError::Parse(_))));
    assert!(matches!(parse_artists("{}"), Err(ApiError::Parse(_))));
}

#[test]
fn network_errors_have_their_own_message() {
    assert_eq!(
        ApiError::Network("timeout".into()).user_message(),
        "There was a problem reaching Echo Nest."
    );
    assert_eq!(
        ApiError::Http(503).user_message(),
        "There was a problem reaching Echo Nest."
    );
}

#[test]
fn artists_parse_from_search_and_similar_bodies() {
    let body = r#"{"response": {"status": {"code": 0, "message": "Success"},
        "artists": [{"id": "AR1", "name": "One"}, {"id": "AR2", "name": "Two", "familiarity": 0.5}]}}"#;
    let artists = parse_artists(body).unwrap();
    assert_eq!(
        artists,
        vec![
            Artist {
                id: "AR1".into(),
                name: "One".into()
            },
            Artist {
                id: "AR2".into(),
                name: "Two".into()
            },
        ]
    );
}

#[test]
fn playlist_query_carries_all_knobs() {
    let params = PlaylistParams::from_settings(&ApiSettings::default());
    let query = params.query();
    let get = |key: &str| -> Vec<String> {
        query
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .collect()
    };
    assert_eq!(get("bucket"), vec!["id:7digital-US", "tracks"]);
    assert_eq!(get("results"), vec!["100"]);
    assert_eq!(get("variety"), vec!["0.7"]);
    assert_eq!(get("adventurousness"), vec!["1"]);
    assert_eq!(get("type"), vec!["artist-radio"]);
    assert_eq!(get("distribution"), vec!["focused"]);
    assert_eq!(get("format"), vec!["json"]);
    assert_eq!(get("dmca"), vec!["true"]);
    assert_eq!(get("limit"), vec!["true"]);
}

#[test]
fn playlist_query_follows_dmca_and_limit_settings() {
    let settings = ApiSettings {
        dmca: false,
        limit: false,
        ..ApiSettings::default()
    };
    let query = PlaylistParams::from_settings(&settings).query();
    assert!(query.contains(&("dmca", "false".to_string())));
    assert!(query.contains(&("limit", "false".to_string())));
}

#[test]
fn similar_cursor_pages_and_wraps() {
    let mut cursor = SimilarArtistCursor::new(15, 100);
    let pages: Vec<(usize, usize)> = (0..8).map(|_| cursor.next_page()).collect();
    assert_eq!(
        pages,
        vec![
            (15, 0),
            (15, 15),
            (15, 30),
            (15, 45),
            (15, 60),
            (15, 75),
            (10, 90),
            (15, 0)
        ]
    );
    cursor.reset();
    assert_eq!(cursor.next_page(), (15, 0));
}

struct FakeApi;

impl MusicApi for FakeApi {
    fn resolve_artist(&self, name: &str) -> Result<Artist, ApiError> {
        match name {
            "radiohead" => Ok(Artist {
                id: "AR_RH".into(),
                name: "Radiohead".into(),
            }),
            "silence" => Ok(Artist {
                id: "AR_SILENT".into(),
                name: "Silence".into(),
            }),
            _ => Err(ApiError::ArtistNotFound(name.into())),
        }
    }

    fn similar_artists(
        &self,
        artist_id: &str,
        count: usize,
        offset: usize,
    ) -> Result<Vec<Artist>, ApiError> {
        Ok((offset..offset + count)
            .map(|i| Artist {
                id: format!("{artist_id}-{i}"),
                name: format!("Similar {i}"),
            })
            .collect())
    }

    fn playlist(&self, artist_id: &str, params: &PlaylistParams) -> Result<Vec<Track>, ApiError> {
        if artist_id == "AR_SILENT" {
            return Ok(Vec::new());
        }
        Ok((0..params.results.min(3))
            .map(|i| Track {
                id: format!("{artist_id}-T{i}"),
                title: format!("Song {i}"),
                artist_id: artist_id.into(),
                artist_name: "Someone".into(),
                preview_url: "p".into(),
                release_image: "i".into(),
            })
            .collect())
    }
}

fn worker() -> (ApiWorker, mpsc::Receiver<ApiReply>) {
    let (tx, rx) = mpsc::channel::<ApiReply>();
    let params = PlaylistParams::from_settings(&ApiSettings::default());
    (ApiWorker::spawn(Box::new(FakeApi), params, tx), rx)
}

fn recv(rx: &mpsc::Receiver<ApiReply>) -> ApiReply {
    rx.recv_timeout(Duration::from_secs(5)).unwrap()
}

#[test]
fn worker_resolves_and_fetches_on_enter() {
    let (worker, rx) = worker();
    worker
        .send(ApiRequest::Enter {
            name: "radiohead".into(),
        })
        .unwrap();
    match recv(&rx) {
        ApiReply::Entered { name, result } => {
            assert_eq!(name, "radiohead");
            let (artist, tracks) = result.unwrap();
            assert_eq!(artist.id, "AR_RH");
            assert_eq!(tracks.len(), 3);
        }
        other => panic!("unexpected reply {other:?}"),
    }
    worker.shutdown();
}

#[test]
fn worker_reports_unknown_and_empty_artists() {
    let (worker, rx) = worker();
    worker.send(ApiRequest::Enter { name: "nobody".into() }).unwrap();
    worker.send(ApiRequest::Enter { name: "silence".into() }).unwrap();

    match recv(&rx) {
        ApiReply::Entered { result, .. } => {
            assert_eq!(result.unwrap_err(), ApiError::ArtistNotFound("nobody".into()))
        }
        other => panic!("unexpected reply {other:?}"),
    }
    match recv(&rx) {
        ApiReply::Entered { result, .. } => assert_eq!(result.unwrap_err(), ApiError::EmptyPlaylist),
        other => panic!("unexpected reply {other:?}"),
    }
    worker.shutdown();
}

#[test]
fn worker_echoes_playlist_request_and_similar_offset() {
    let (worker, rx) = worker();
    let request = PlaylistRequest {
        id: RequestId(7),
        artist_id: "AR9".into(),
    };
    worker.send(ApiRequest::Playlist(request.clone())).unwrap();
    worker
        .send(ApiRequest::Similar {
            artist_id: "AR9".into(),
            count: 2,
            offset: 15,
        })
        .unwrap();

    match recv(&rx) {
        ApiReply::Playlist { request: r, result } => {
            assert_eq!(r, request);
            assert_eq!(result.unwrap()[0].id, "AR9-T0");
        }
        other => panic!("unexpected reply {other:?}"),
    }
    match recv(&rx) {
        ApiReply::Similar { artist_id, result } => {
            assert_eq!(artist_id, "AR9");
            let names: Vec<String> = result.unwrap().into_iter().map(|a| a.name).collect();
            assert_eq!(names, vec!["Similar 15", "Similar 16"]);
        }
        other => panic!("unexpected reply {other:?}"),
    }
    worker.shutdown();
}
