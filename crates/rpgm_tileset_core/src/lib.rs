//! RPG Maker subtile autotile expansion
//!
//! This crate turns the compact autotile sheets used by RPG Maker (A1-A4)
//! into fully expanded blob tilesets that a general purpose tile-map editor
//! can paint with directly.
//!
//! # Features
//! - Subtile combination tables for terrain, wall and static blocks
//! - Sheet layouts for the A1, A2, A3 and A4 formats
//! - Format detection from the sheet size in subtiles
//! - Expansion into a grid of tile references
//!
//! # Example
//!
//! ```rust
//! use rpgm_tileset_core::{detect_layout, expand_indexed, LayoutKind};
//!
//! // A 32x24 subtile sheet could be A1 or A2, so the caller picks one
//! let detection = detect_layout(32, 24, 32 * 24).unwrap();
//! let kind = detection.resolve(Some(LayoutKind::A2), false).unwrap();
//!
//! // Expand with subtile indices as tile references
//! let grid = expand_indexed(kind.layout(), 32, Some);
//! assert_eq!((grid.width(), grid.height()), (112, 56));
//! ```

pub mod combination;
pub mod detect;
pub mod expand;
pub mod grid;
pub mod layout;

pub use combination::{AutotileKind, CombinationTable, Quadrant, SubtileCoord, TileComposition};
pub use detect::{detect_layout, margin_suspected, Detection, LayoutMatch};
pub use expand::{block_origins, expand, expand_indexed, placements, BlockOrigin, Placement};
pub use grid::DestinationGrid;
pub use layout::{LayoutKind, SheetLayout};

use thiserror::Error;

/// Errors raised while recognising a sheet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(
        "sheet measures {width}x{height} subtiles, which matches none of the A1, A2, A3 or A4 \
         layouts; check the tile size and that margin and spacing are 0"
    )]
    UnrecognizedLayout { width: u32, height: u32 },

    #[error("sheet could be any of {candidates:?}; a layout must be chosen explicitly")]
    AmbiguousLayout { candidates: [LayoutKind; 2] },

    #[error(
        "sheet measures {width}x{height} subtiles but has fewer addressable subtiles; \
         it appears to have non-zero margin or spacing"
    )]
    SuspectedMargin { width: u32, height: u32 },

    #[error("sheet was detected as {detected} but {requested} was requested")]
    LayoutMismatch {
        detected: LayoutKind,
        requested: LayoutKind,
    },

    #[error("unknown layout name: {0}")]
    UnknownLayoutName(String),
}
