use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("fetching {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} is not an image ({content_type})")]
    NotAnImage { url: String, content_type: String },
    #[error("{url} is not playable audio: {reason}")]
    Undecodable { url: String, reason: String },
    #[error("{url} returned no data")]
    Empty { url: String },
}

/// Both parts of a tile, ready to show and play.
#[derive(Debug, Clone)]
pub struct LoadedMedia {
    pub image: Arc<[u8]>,
    pub audio: Arc<[u8]>,
}

impl LoadedMedia {
    pub fn new(image: Vec<u8>, audio: Vec<u8>) -> Self {
        Self {
            image: image.into(),
            audio: audio.into(),
        }
    }
}

/// Where tile media comes from.
pub trait MediaSource: Send + Sync {
    fn fetch_image(&self, url: &str) -> Result<Vec<u8>, AssetError>;
    fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}

/// Fetches media over HTTP and checks it is usable.
pub struct HttpMediaSource {
    http: reqwest::blocking::Client,
}

impl HttpMediaSource {
    pub fn new(timeout: Duration) -> Result<Self, AssetError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssetError::Fetch {
                url: String::new(),
                reason: e.to_string(),
            })?;
        Ok(Self { http })
    }

    fn fetch(&self, url: &str) -> Result<(Option<String>, Vec<u8>), AssetError> {
        let fetch_err = |reason: String| AssetError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .http
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| fetch_err(e.to_string()))?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().map_err(|e| fetch_err(e.to_string()))?;

        if bytes.is_empty() {
            return Err(AssetError::Empty {
                url: url.to_string(),
            });
        }
        Ok((content_type, bytes.to_vec()))
    }
}

impl MediaSource for HttpMediaSource {
    fn fetch_image(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let (content_type, bytes) = self.fetch(url)?;
        match content_type {
            Some(ct) if !ct.starts_with("image/") => Err(AssetError::NotAnImage {
                url: url.to_string(),
                content_type: ct,
            }),
            _ => Ok(bytes),
        }
    }

    fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let (_, bytes) = self.fetch(url)?;
        crate::audio::decode(Arc::from(bytes.as_slice())).map_err(|e| AssetError::Undecodable {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(bytes)
    }
}
