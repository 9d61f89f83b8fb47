//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the entry form, the
//! collage, the playlist controller and playback state.

mod model;

pub use model::*;
