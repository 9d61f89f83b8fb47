use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_echollage_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ECHOLLAGE_CONFIG_PATH", "/tmp/echollage-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/echollage-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("echollage")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("echollage")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state")
            .join("echollage")
            .join("echollage.log")
    );
}

#[test]
fn defaults_match_the_classic_collage() {
    let s = Settings::default();
    assert_eq!((s.grid.width, s.grid.height), (6, 4));
    assert_eq!(s.grid.max_artist_tracks, 2);
    assert_eq!(s.schedule.initial_ms, 500);
    assert_eq!(s.schedule.steady_ms, 4000);
    assert_eq!(s.schedule.half_life, 10.0);
    assert_eq!(s.api.results, 100);
    assert_eq!(s.api.request_timeout_ms, 12_000);
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[api]
base_url = "http://localhost:9000/api/v4"
api_key = "KEY"
variety = 0.25
similar_page_size = 5

[grid]
width = 8
height = 3
max_artist_tracks = 1

[schedule]
initial_ms = 250
steady_ms = 2000
half_life = 4.0

[audio]
crossfade_ms = 0
crossfade_steps = 3
quit_fade_out_ms = 123

[ui]
header_text = "hello"
show_track_info = false

[logging]
level = "debug"
file = "/tmp/echollage.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ECHOLLAGE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ECHOLLAGE__GRID__WIDTH");

    let s = Settings::load().unwrap();
    assert_eq!(s.api.base_url, "http://localhost:9000/api/v4");
    assert_eq!(s.api.api_key, "KEY");
    assert_eq!(s.api.variety, 0.25);
    assert_eq!(s.api.similar_page_size, 5);
    assert_eq!(s.api.results, 100);
    assert_eq!((s.grid.width, s.grid.height), (8, 3));
    assert_eq!(s.grid.max_artist_tracks, 1);
    assert_eq!(s.schedule.initial_ms, 250);
    assert_eq!(s.schedule.steady_ms, 2000);
    assert_eq!(s.schedule.half_life, 4.0);
    assert_eq!(s.audio.crossfade_ms, 0);
    assert_eq!(s.audio.crossfade_steps, 3);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_track_info);
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/echollage.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[grid]
width = 8
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ECHOLLAGE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ECHOLLAGE__GRID__WIDTH", "5");

    let s = Settings::load().unwrap();
    assert_eq!(s.grid.width, 5);
}

#[test]
fn validate_rejects_tiny_grids() {
    let mut s = Settings::default();
    s.grid.width = 1;
    s.grid.height = 3;
    assert!(s.validate().is_err());

    s.grid.height = 4;
    assert!(s.validate().is_ok());

    s.grid.width = 0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_grids_whose_size_overflows() {
    let mut s = Settings::default();
    s.grid.width = usize::MAX;
    s.grid.height = 2;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_bad_schedules_and_api_knobs() {
    let mut s = Settings::default();
    s.schedule.half_life = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.schedule.initial_ms = 5000;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.api.results = 101;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.api.variety = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.grid.max_artist_tracks = 0;
    assert!(s.validate().is_err());
}

#[test]
fn printed_config_parses_back() {
    let toml_text = Settings::default().to_toml().unwrap();
    assert!(toml_text.contains("[grid]"));
    let parsed: Settings = toml::from_str(&toml_text).unwrap();
    assert_eq!(parsed.grid.width, 6);
    assert_eq!(parsed.api.catalog, "7digital-US");
}
