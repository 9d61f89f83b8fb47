//! Collage model: tracks, grid cells and the policies deciding where and
//! whether a track is shown.
//!
//! `Collage` owns the grid state that the UI draws. It combines a
//! `TileSelector` (which cell is replaced next) with an `AdmissionPolicy`
//! (whether a track may be shown at all) over the `ArtistTrackIndex` of
//! tracks currently on screen.

mod admission;
mod grid;
mod model;
mod selector;

pub use admission::*;
pub use grid::*;
pub use model::*;
pub use selector::*;
