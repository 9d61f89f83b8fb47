use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/echollage/config.toml` or `~/.config/echollage/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ECHOLLAGE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub grid: GridSettings,
    pub schedule: ScheduleSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Root of the music-discovery API, without a trailing slash.
    pub base_url: String,
    pub api_key: String,
    /// Per-request timeout (milliseconds).
    pub request_timeout_ms: u64,
    /// Maximum number of songs per playlist (1..=100).
    pub results: u32,
    /// How varied the artists in a playlist are (0..=1).
    pub variety: f64,
    /// How far from the mainstream a playlist strays (0..=1).
    pub adventurousness: f64,
    /// `focused` or `wandering`.
    pub distribution: String,
    pub playlist_type: String,
    /// Catalog supplying preview audio and release images.
    pub catalog: String,
    /// Only return songs that may be streamed under DMCA rules.
    pub dmca: bool,
    /// Only return songs available in `catalog`.
    pub limit: bool,
    /// Similar artists requested per page.
    pub similar_page_size: usize,
    /// Similar-artist paging wraps after this many results.
    pub similar_max: usize,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://developer.echonest.com/api/v4".to_string(),
            api_key: String::new(),
            request_timeout_ms: 12_000,
            results: 100,
            variety: 0.7,
            adventurousness: 1.0,
            distribution: "focused".to_string(),
            playlist_type: "artist-radio".to_string(),
            catalog: "7digital-US".to_string(),
            dmca: true,
            limit: true,
            similar_page_size: 15,
            similar_max: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GridSettings {
    pub width: usize,
    pub height: usize,
    /// How many tracks by one artist may be on the grid at once.
    pub max_artist_tracks: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            width: 6,
            height: 4,
            max_artist_tracks: crate::collage::MAX_ARTIST_TRACKS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Delay before the second tick (milliseconds).
    pub initial_ms: u64,
    /// Delay the schedule converges to (milliseconds).
    pub steady_ms: u64,
    /// Ticks needed to close half the gap between the two.
    pub half_life: f64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            initial_ms: 500,
            steady_ms: 4000,
            half_life: 10.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Crossfade duration when switching tiles (milliseconds).
    /// Set to 0 to disable crossfade.
    pub crossfade_ms: u64,
    /// Number of steps used to fade volumes (higher = smoother, more CPU).
    pub crossfade_steps: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            crossfade_ms: 250,
            crossfade_steps: 10,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether tiles show artist and title under the art swatch.
    pub show_track_info: bool,
    /// Separator used between status line parts.
    pub status_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ echollage: the echo nest collage ~ ".to_string(),
            show_track_info: true,
            status_separator: " • ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Log file; defaults to the XDG state directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
