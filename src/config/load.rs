use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `ECHOLLAGE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ECHOLLAGE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let grid = &self.grid;
        if grid.width == 0 || grid.height == 0 {
            return Err("grid.width and grid.height must be >= 1".to_string());
        }
        match grid.width.checked_mul(grid.height) {
            None => return Err("grid.width * grid.height is too large".to_string()),
            Some(cells) if cells < 4 => {
                return Err("grid must have at least 4 cells".to_string());
            }
            Some(_) => {}
        }
        if grid.max_artist_tracks == 0 {
            return Err("grid.max_artist_tracks must be >= 1".to_string());
        }

        let schedule = &self.schedule;
        if !(schedule.half_life > 0.0) {
            return Err("schedule.half_life must be > 0".to_string());
        }
        if schedule.initial_ms == 0 || schedule.steady_ms == 0 {
            return Err("schedule intervals must be >= 1ms".to_string());
        }
        if schedule.initial_ms > schedule.steady_ms {
            return Err("schedule.initial_ms must not exceed schedule.steady_ms".to_string());
        }

        if self.audio.crossfade_steps == 0 {
            return Err("audio.crossfade_steps must be >= 1".to_string());
        }

        let api = &self.api;
        if !(1..=100).contains(&api.results) {
            return Err("api.results must be within 1..=100".to_string());
        }
        if !(0.0..=1.0).contains(&api.variety) {
            return Err("api.variety must be within 0..=1".to_string());
        }
        if !(0.0..=1.0).contains(&api.adventurousness) {
            return Err("api.adventurousness must be within 0..=1".to_string());
        }
        if api.similar_page_size == 0 || api.similar_max == 0 {
            return Err("api similar-artist paging sizes must be >= 1".to_string());
        }
        Ok(())
    }

    /// Render the settings as a TOML document.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Resolve the config path from `ECHOLLAGE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ECHOLLAGE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/echollage/config.toml`
/// or `~/.config/echollage/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("echollage").join("config.toml"))
}

/// Compute the default log path under `$XDG_STATE_HOME/echollage/echollage.log`
/// or `~/.local/state/echollage/echollage.log`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".local").join("state"))
    } else {
        None
    };

    state_home.map(|d| d.join("echollage").join("echollage.log"))
}
