use std::time::Duration;

use tracing::debug;

use crate::collage::{Artist, Track};
use crate::config::ApiSettings;

use super::model::{ApiError, parse_artists, parse_playlist};

/// Artist lookup, similarity and playlist retrieval.
pub trait MusicApi: Send {
    /// Resolve a free-text artist name to the best-matching artist.
    fn resolve_artist(&self, name: &str) -> Result<Artist, ApiError>;

    /// Artists similar to `artist_id`, `count` results starting at `offset`.
    fn similar_artists(
        &self,
        artist_id: &str,
        count: usize,
        offset: usize,
    ) -> Result<Vec<Artist>, ApiError>;

    /// A static playlist of tracks seeded by `artist_id`.
    fn playlist(&self, artist_id: &str, params: &PlaylistParams) -> Result<Vec<Track>, ApiError>;
}

/// Knobs of a static playlist request.
#[derive(Debug, Clone)]
pub struct PlaylistParams {
    pub results: u32,
    pub variety: f64,
    pub adventurousness: f64,
    pub distribution: String,
    pub playlist_type: String,
    pub catalog: String,
    pub dmca: bool,
    pub limit: bool,
}

impl PlaylistParams {
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self {
            results: settings.results,
            variety: settings.variety,
            adventurousness: settings.adventurousness,
            distribution: settings.distribution.clone(),
            playlist_type: settings.playlist_type.clone(),
            catalog: settings.catalog.clone(),
            dmca: settings.dmca,
            limit: settings.limit,
        }
    }

    /// Query pairs for the playlist endpoint. `bucket` appears twice.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("adventurousness", self.adventurousness.to_string()),
            ("bucket", format!("id:{}", self.catalog)),
            ("bucket", "tracks".to_string()),
            ("distribution", self.distribution.clone()),
            ("dmca", self.dmca.to_string()),
            ("format", "json".to_string()),
            ("limit", self.limit.to_string()),
            ("results", self.results.to_string()),
            ("type", self.playlist_type.clone()),
            ("variety", self.variety.to_string()),
        ]
    }
}

/// HTTP client for the Echo Nest v4 API.
pub struct EchoNestClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl EchoNestClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("echollage/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, params = query.len(), "requesting");

        let response = self
            .http
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        // Error statuses usually still carry a JSON status block worth reporting.
        if !status.is_success() && !body.trim_start().starts_with('{') {
            return Err(ApiError::Http(status.as_u16()));
        }
        Ok(body)
    }
}

impl MusicApi for EchoNestClient {
    fn resolve_artist(&self, name: &str) -> Result<Artist, ApiError> {
        let query = [
            ("name", name.to_string()),
            ("results", "1".to_string()),
            ("format", "json".to_string()),
        ];
        let body = self.get("artist/search", &query)?;
        let artists = match parse_artists(&body) {
            Ok(artists) => artists,
            Err(ApiError::Status { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        artists
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ArtistNotFound(name.to_string()))
    }

    fn similar_artists(
        &self,
        artist_id: &str,
        count: usize,
        offset: usize,
    ) -> Result<Vec<Artist>, ApiError> {
        let query = [
            ("id", artist_id.to_string()),
            ("results", count.to_string()),
            ("start", offset.to_string()),
            ("format", "json".to_string()),
        ];
        let body = self.get("artist/similar", &query)?;
        parse_artists(&body)
    }

    fn playlist(&self, artist_id: &str, params: &PlaylistParams) -> Result<Vec<Track>, ApiError> {
        let mut query = vec![("artist_id", artist_id.to_string())];
        query.extend(params.query());
        let body = self.get("playlist/static", &query)?;
        parse_playlist(&body)
    }
}
