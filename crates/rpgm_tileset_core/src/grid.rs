//! Destination grid produced by an expansion

use serde::{Deserialize, Serialize};

/// A 2D grid of tile references, `None` meaning no tile.
///
/// Cells are subtile sized: each expanded tile covers a 2x2 block of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationGrid<T> {
    width: u32,
    height: u32,
    cells: Vec<Option<T>>,
    /// Cells whose source subtile was missing
    #[serde(default)]
    missing_sources: usize,
}

impl<T> DestinationGrid<T> {
    /// Create an empty grid
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            cells: std::iter::repeat_with(|| None).take(size).collect(),
            missing_sources: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Tile at (x, y), `None` for empty or out of bounds cells
    pub fn get(&self, x: u32, y: u32) -> Option<&T> {
        self.index(x, y).and_then(|i| self.cells[i].as_ref())
    }

    /// Write a cell, returning the previous value.
    ///
    /// Writes outside the grid are ignored.
    pub fn set(&mut self, x: u32, y: u32, tile: Option<T>) -> Option<T> {
        let i = self.index(x, y)?;
        std::mem::replace(&mut self.cells[i], tile)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Option<T>] {
        &self.cells
    }

    /// Populated cells with their coordinates
    pub fn iter_tiles(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        let width = self.width.max(1);
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|tile| (i as u32 % width, i as u32 / width, tile))
        })
    }

    /// Number of populated cells
    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Number of cells left empty because their source subtile was missing
    pub fn missing_sources(&self) -> usize {
        self.missing_sources
    }

    pub(crate) fn record_missing(&mut self) {
        self.missing_sources += 1;
    }
}
