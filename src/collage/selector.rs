use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

use super::model::CellId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("no unreserved cell: {reserved} of {cells} cells are reserved")]
    NoFreeCell { reserved: usize, cells: usize },
}

/// Chooses which grid cell receives the next tile.
///
/// The first generation visits cells in a clockwise spiral from the top-right
/// corner so the grid fills from the edges inward. Every later generation is
/// a fresh random permutation (the "settle" phase). Reserved cells are
/// skipped rather than returned.
#[derive(Debug)]
pub struct TileSelector {
    width: usize,
    height: usize,
    order: Vec<CellId>,
    cursor: usize,
    generation: u64,
    rng: StdRng,
}

impl TileSelector {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_rng(width, height, StdRng::from_rng(&mut rand::rng()))
    }

    /// Selector with a deterministic shuffle sequence.
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Self {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, height: usize, rng: StdRng) -> Self {
        Self {
            width,
            height,
            order: spiral_order(width, height),
            cursor: 0,
            generation: 0,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of completed passes over the grid.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Return the next cell in visitation order that is not in `reserved`.
    ///
    /// Fails when every cell is reserved. Any `2 * N` consecutive reads span a
    /// complete generation, so the search is bounded by that.
    pub fn next_cell(&mut self, reserved: &BTreeSet<CellId>) -> Result<CellId, SelectorError> {
        let cells = self.len();
        let reserved_in_grid = reserved.iter().filter(|&&c| c < cells).count();
        if reserved_in_grid >= cells {
            return Err(SelectorError::NoFreeCell {
                reserved: reserved_in_grid,
                cells,
            });
        }

        for _ in 0..2 * cells {
            let cell = self.advance();
            if !reserved.contains(&cell) {
                return Ok(cell);
            }
        }

        Err(SelectorError::NoFreeCell {
            reserved: reserved_in_grid,
            cells,
        })
    }

    fn advance(&mut self) -> CellId {
        let cell = self.order[self.cursor];
        self.cursor += 1;
        if self.cursor >= self.order.len() {
            self.order = shuffled_order(self.len(), &mut self.rng);
            self.cursor = 0;
            self.generation += 1;
        }
        cell
    }
}

/// Clockwise spiral starting at the top-right corner: east column downwards,
/// south row leftwards, west column upwards, north row rightwards, then the
/// next ring inside.
pub fn spiral_order(width: usize, height: usize) -> Vec<CellId> {
    let position = |r: usize, c: usize| r * width + c;
    let mut positions = Vec::with_capacity(width * height);
    let (mut north, mut south, mut west, mut east) = (0, height, 0, width);

    while north < south && west < east {
        for r in north..south {
            positions.push(position(r, east - 1));
        }
        east -= 1;

        if west < east {
            for c in (west..east).rev() {
                positions.push(position(south - 1, c));
            }
            south -= 1;
        }

        if north < south && west < east {
            for r in (north..south).rev() {
                positions.push(position(r, west));
            }
            west += 1;
        }

        if north < south && west < east {
            for c in west..east {
                positions.push(position(north, c));
            }
            north += 1;
        }
    }

    positions
}

/// A uniformly random permutation of `0..n`.
pub fn shuffled_order(n: usize, rng: &mut StdRng) -> Vec<CellId> {
    let mut order: Vec<CellId> = (0..n).collect();
    order.shuffle(rng);
    order
}
