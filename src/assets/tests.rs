use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::*;
use crate::collage::Track;

#[derive(Default)]
struct FakeSource {
    images: HashMap<String, Result<Vec<u8>, AssetError>>,
    audio: HashMap<String, Result<Vec<u8>, AssetError>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSource {
    fn lookup(
        &self,
        table: &HashMap<String, Result<Vec<u8>, AssetError>>,
        url: &str,
    ) -> Result<Vec<u8>, AssetError> {
        self.fetched.lock().unwrap().push(url.to_string());
        table.get(url).cloned().unwrap_or_else(|| {
            Err(AssetError::Fetch {
                url: url.to_string(),
                reason: "404".into(),
            })
        })
    }
}

impl MediaSource for FakeSource {
    fn fetch_image(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        self.lookup(&self.images, url)
    }

    fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        self.lookup(&self.audio, url)
    }
}

fn track(id: &str) -> Track {
    Track {
        id: id.into(),
        title: id.into(),
        artist_id: "AR1".into(),
        artist_name: "Artist".into(),
        preview_url: format!("audio/{id}"),
        release_image: format!("image/{id}"),
    }
}

fn source_with(ids_ok: &[&str]) -> FakeSource {
    let mut source = FakeSource::default();
    for id in ids_ok {
        source.images.insert(format!("image/{id}"), Ok(vec![1, 2, 3]));
        source.audio.insert(format!("audio/{id}"), Ok(vec![4, 5]));
    }
    source
}

#[test]
fn join_both_returns_both_results() {
    let (a, b) = join_both(|| 1 + 1, || "two".to_string());
    assert_eq!(a, 2);
    assert_eq!(b, "two");
}

#[test]
fn load_media_needs_both_parts() {
    let source = source_with(&["t1"]);
    let media = load_media(&source, &track("t1")).unwrap();
    assert_eq!(&media.image[..], &[1, 2, 3]);
    assert_eq!(&media.audio[..], &[4, 5]);

    let fetched = source.fetched.lock().unwrap();
    assert!(fetched.contains(&"image/t1".to_string()));
    assert!(fetched.contains(&"audio/t1".to_string()));
}

#[test]
fn load_media_fails_when_audio_fails() {
    let mut source = source_with(&["t1"]);
    source.audio.insert(
        "audio/t1".into(),
        Err(AssetError::Undecodable {
            url: "audio/t1".into(),
            reason: "garbage".into(),
        }),
    );
    let err = load_media(&source, &track("t1")).unwrap_err();
    assert!(matches!(err, AssetError::Undecodable { .. }));
}

#[test]
fn load_media_fails_when_image_fails() {
    let mut source = source_with(&["t1"]);
    source.images.remove("image/t1");
    assert!(matches!(
        load_media(&source, &track("t1")),
        Err(AssetError::Fetch { .. })
    ));
}

#[test]
fn loader_reports_one_event_per_load() {
    let source: Arc<dyn MediaSource> = Arc::new(source_with(&["ok"]));
    let (tx, rx) = mpsc::channel::<AssetEvent>();
    let loader = AssetLoader::new(source, tx);

    loader.load(track("ok"));
    loader.load(track("missing"));

    let mut ready = Vec::new();
    let mut failed = Vec::new();
    for _ in 0..2 {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AssetEvent::Ready { track, .. } => ready.push(track.id),
            AssetEvent::Failed { track, .. } => failed.push(track.id),
        }
    }
    assert_eq!(ready, vec!["ok".to_string()]);
    assert_eq!(failed, vec!["missing".to_string()]);
}
