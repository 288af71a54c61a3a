//! Single-image tileset model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::color::HexColor;

/// The image a tileset is cut from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetImage {
    pub path: PathBuf,
    /// Image size in pixels
    pub width: u32,
    pub height: u32,
}

impl TilesetImage {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

/// A tileset backed by one image, counted the way Tiled counts tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tileset {
    pub id: Uuid,
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub image: TilesetImage,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent_color: Option<HexColor>,
}

impl Tileset {
    /// Create a new tileset with no margin or spacing
    pub fn new(name: String, tile_width: u32, tile_height: u32, image: TilesetImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tile_width,
            tile_height,
            image,
            margin: 0,
            spacing: 0,
            transparent_color: None,
        }
    }

    pub fn with_margin(mut self, margin: u32, spacing: u32) -> Self {
        self.margin = margin;
        self.spacing = spacing;
        self
    }

    pub fn with_transparent_color(mut self, color: Option<HexColor>) -> Self {
        self.transparent_color = color;
        self
    }

    /// Number of addressable tile columns
    pub fn columns(&self) -> u32 {
        tiles_along(self.image.width, self.tile_width, self.margin, self.spacing)
    }

    /// Number of addressable tile rows
    pub fn rows(&self) -> u32 {
        tiles_along(self.image.height, self.tile_height, self.margin, self.spacing)
    }

    /// Total number of addressable tiles
    pub fn tile_count(&self) -> u32 {
        self.columns().saturating_mul(self.rows())
    }

    /// Grid size measured by dividing the image by the tile size, ignoring
    /// margin and spacing
    pub fn measured_size(&self) -> (u32, u32) {
        if self.tile_width == 0 || self.tile_height == 0 {
            return (0, 0);
        }
        (
            self.image.width / self.tile_width,
            self.image.height / self.tile_height,
        )
    }

    /// Convert a tile index to its (column, row)
    pub fn index_to_grid(&self, index: u32) -> Option<(u32, u32)> {
        if index >= self.tile_count() {
            return None;
        }
        let columns = self.columns();
        Some((index % columns, index / columns))
    }

    /// Pixel position of a tile's top-left corner in the image
    pub fn tile_origin(&self, index: u32) -> Option<(u32, u32)> {
        let (col, row) = self.index_to_grid(index)?;
        Some((
            offset_along(col, self.tile_width, self.margin, self.spacing)?,
            offset_along(row, self.tile_height, self.margin, self.spacing)?,
        ))
    }
}

// Margin and spacing come from user input, so the arithmetic is done in u64.
fn tiles_along(extent: u32, tile: u32, margin: u32, spacing: u32) -> u32 {
    if tile == 0 {
        return 0;
    }
    let usable = u64::from(extent).saturating_sub(2 * u64::from(margin));
    if usable < u64::from(tile) {
        return 0;
    }
    let count = (usable + u64::from(spacing)) / (u64::from(tile) + u64::from(spacing));
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn offset_along(index: u32, tile: u32, margin: u32, spacing: u32) -> Option<u32> {
    let offset =
        u64::from(margin) + u64::from(index) * (u64::from(tile) + u64::from(spacing));
    u32::try_from(offset).ok()
}
