use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use crate::assets::LoadedMedia;
use crate::config::GridSettings;

use super::admission::{Admission, AdmissionPolicy, ArtistTrackIndex};
use super::model::{CellId, Track};
use super::selector::{SelectorError, TileSelector};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollageError {
    #[error("track rejected at placement: {0:?}")]
    Rejected(Admission),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error("cell {cell} is outside the {cells}-cell grid")]
    OutOfRange { cell: CellId, cells: usize },
}

/// A track whose media finished loading, occupying one cell.
#[derive(Debug, Clone)]
pub struct Tile {
    pub track: Track,
    pub media: LoadedMedia,
    /// Background colour derived from the album art, fixed at placement.
    pub swatch: [u8; 3],
}

/// A stable RGB colour for `image`, dark enough for white text on top.
pub fn image_swatch(image: &[u8]) -> [u8; 3] {
    // FNV-1a
    let mut h: u32 = 0x811c_9dc5;
    for b in image {
        h ^= u32::from(*b);
        h = h.wrapping_mul(0x0100_0193);
    }
    let [r, g, b, _] = h.to_le_bytes();
    [r / 2, g / 2, b / 2]
}

/// Result of a successful placement.
#[derive(Debug)]
pub struct Placement {
    pub cell: CellId,
    pub evicted: Option<Tile>,
}

/// The fixed-size grid of tiles and the reservations protecting some of them.
///
/// A cell is reserved while it is active (playing or paused mid-track),
/// hovered by the cursor, or the cell that seeded the current focal artist.
/// Reserved cells are never overwritten by new placements.
#[derive(Debug)]
pub struct Collage {
    width: usize,
    height: usize,
    cells: Vec<Option<Tile>>,
    selector: TileSelector,
    policy: AdmissionPolicy,
    index: ArtistTrackIndex,
    active: Option<CellId>,
    hovering: Option<CellId>,
    focal: Option<CellId>,
    last_loaded: Option<CellId>,
}

impl Collage {
    pub fn new(settings: &GridSettings) -> Self {
        Self::with_selector(
            settings,
            TileSelector::new(settings.width, settings.height),
        )
    }

    pub fn with_selector(settings: &GridSettings, selector: TileSelector) -> Self {
        let len = settings.width * settings.height;
        Self {
            width: settings.width,
            height: settings.height,
            cells: vec![None; len],
            selector,
            policy: AdmissionPolicy::new(settings.max_artist_tracks),
            index: ArtistTrackIndex::new(),
            active: None,
            hovering: None,
            focal: None,
            last_loaded: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_at(&self, row: usize, col: usize) -> CellId {
        row * self.width + col
    }

    pub fn position(&self, cell: CellId) -> (usize, usize) {
        (cell / self.width, cell % self.width)
    }

    pub fn tile(&self, cell: CellId) -> Option<&Tile> {
        self.cells.get(cell).and_then(Option::as_ref)
    }

    /// Occupied cells with their tiles, in cell order.
    pub fn tiles(&self) -> impl Iterator<Item = (CellId, &Tile)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(cell, tile)| tile.as_ref().map(|t| (cell, t)))
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn artist_index(&self) -> &ArtistTrackIndex {
        &self.index
    }

    pub fn policy(&self) -> AdmissionPolicy {
        self.policy
    }

    pub fn admission(&self, track: Option<&Track>) -> Admission {
        self.policy.admission(track, &self.index)
    }

    pub fn should_display(&self, track: Option<&Track>) -> bool {
        self.admission(track).is_accepted()
    }

    pub fn active(&self) -> Option<CellId> {
        self.active
    }

    pub fn hovering(&self) -> Option<CellId> {
        self.hovering
    }

    pub fn focal_cell(&self) -> Option<CellId> {
        self.focal
    }

    pub fn last_loaded(&self) -> Option<CellId> {
        self.last_loaded
    }

    pub fn set_active(&mut self, cell: Option<CellId>) {
        self.active = cell.filter(|&c| c < self.len());
    }

    pub fn set_hovering(&mut self, cell: Option<CellId>) {
        self.hovering = cell.filter(|&c| c < self.len());
    }

    pub fn set_focal_cell(&mut self, cell: Option<CellId>) {
        self.focal = cell.filter(|&c| c < self.len());
    }

    /// Cells that must not be overwritten right now.
    pub fn reserved(&self) -> BTreeSet<CellId> {
        [self.active, self.hovering, self.focal]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Place a loaded track into the next free cell.
    ///
    /// Admission is checked again here because several admitted tracks may
    /// finish loading in any order. The previous occupant of the chosen cell
    /// is evicted and its artist slot freed.
    pub fn place(&mut self, track: Track, media: LoadedMedia) -> Result<Placement, CollageError> {
        let verdict = self.admission(Some(&track));
        if !verdict.is_accepted() {
            return Err(CollageError::Rejected(verdict));
        }

        let cell = self.selector.next_cell(&self.reserved())?;
        let evicted = self.evict(cell);

        self.index.insert(&track);
        debug!(
            cell,
            track = %track.id,
            artist = %track.artist_id,
            evicted = evicted.as_ref().map(|t| t.track.id.as_str()),
            "placed tile"
        );
        let swatch = image_swatch(&media.image);
        self.cells[cell] = Some(Tile {
            track,
            media,
            swatch,
        });
        self.last_loaded = Some(cell);

        Ok(Placement { cell, evicted })
    }

    /// Remove the tile in `cell`, freeing its artist slot.
    pub fn clear(&mut self, cell: CellId) -> Result<Option<Tile>, CollageError> {
        if cell >= self.len() {
            return Err(CollageError::OutOfRange {
                cell,
                cells: self.len(),
            });
        }
        let evicted = self.evict(cell);
        if evicted.is_some() {
            if self.active == Some(cell) {
                self.active = None;
            }
            if self.focal == Some(cell) {
                self.focal = None;
            }
            if self.last_loaded == Some(cell) {
                self.last_loaded = None;
            }
        }
        Ok(evicted)
    }

    fn evict(&mut self, cell: CellId) -> Option<Tile> {
        let old = self.cells[cell].take()?;
        self.index.remove(&old.track);
        Some(old)
    }
}
