//! Playlist consumption: the queue of pending tracks and the tick loop that
//! feeds them, one per tick, to the collage.

mod playlist;

pub use playlist::*;
