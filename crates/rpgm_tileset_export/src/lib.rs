//! Host side of RPG Maker autotile expansion
//!
//! This crate loads autotile sheet images, runs them through
//! `rpgm_tileset_core` and writes the result in formats Tiled understands:
//! - `SubtileSheet` - a decoded sheet cut into half-size subtiles
//! - `render_grid` - flatten an expanded grid into an image
//! - `MapDocument` / `TilesetDocument` - Tiled JSON map and tileset files
//! - `export_tileset` - the whole sheet-to-tileset pipeline
//!
//! # Example
//!
//! ```rust,ignore
//! use rpgm_tileset_export::{export_tileset, ExportSettings, FixedDecisions};
//! use rpgm_tileset_core::LayoutKind;
//!
//! let settings = ExportSettings::new("Outside_A2.png", 48, 48);
//! let mut decisions = FixedDecisions {
//!     layout: Some(LayoutKind::A2),
//!     ..Default::default()
//! };
//! let report = export_tileset(&settings, &mut decisions)?;
//! println!("wrote {}", report.tileset.display());
//! ```

pub mod color;
pub mod pipeline;
pub mod raster;
pub mod sheet;
pub mod tiled;
pub mod tileset;

pub use color::HexColor;
pub use pipeline::{
    export_tileset, resolve_layout, write_intermediate, write_tileset, Decisions, ExportReport,
    ExportSettings, FixedDecisions, IntermediateFormat,
};
pub use raster::render_grid;
pub use sheet::SubtileSheet;
pub use tiled::{MapDocument, TileLayerDocument, TilesetDocument};
pub use tileset::{Tileset, TilesetImage};

// Re-export the core crate
pub use rpgm_tileset_core;

use rpgm_tileset_core::LayoutError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while exporting a tileset
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Source image does not exist: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("Invalid tile size {width}x{height}: tiles must be at least 2x2 px with even sides")]
    InvalidTileSize { width: u32, height: u32 },

    #[error("Invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("Cannot write {}: tilesets are saved as .tsj or .json", .0.display())]
    UnsupportedTilesetFormat(PathBuf),

    #[error("{} already exists and was not overwritten", .0.display())]
    OverwriteDeclined(PathBuf),
}
