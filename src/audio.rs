//! Preview playback.
//!
//! A dedicated thread owns the rodio output stream and plays one preview at a
//! time. The rest of the app talks to it through [`AudioPlayer`] and learns
//! about finished or undecodable previews through [`AudioEvent`]s.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use sink::{DecodeError, decode};
pub use types::*;
