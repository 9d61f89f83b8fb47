//! Loading of a track's album art and preview audio.
//!
//! A tile is only placed once both parts have loaded. Each load runs on its
//! own thread, fetches the two parts concurrently and joins them before
//! reporting a single `AssetEvent`.

mod join;
mod loader;
mod source;

pub use join::*;
pub use loader::*;
pub use source::*;

#[cfg(test)]
mod tests;
