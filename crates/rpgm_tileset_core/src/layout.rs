//! Sheet layouts
//!
//! A layout describes how autotile sub-blocks are arranged on one of the
//! RPG Maker autotile sheets. Sizes are derived from the combination tables at
//! compile time.

use crate::combination::AutotileKind::{self, Terrain as T, Unchanged as U, Wall as W};
use crate::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The known autotile sheet formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Animated tiles (water, lava, waterfalls)
    A1,
    /// Ground tiles
    A2,
    /// Building (roof and wall) tiles
    A3,
    /// Walls with ceilings
    A4,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 4] = [
        LayoutKind::A1,
        LayoutKind::A2,
        LayoutKind::A3,
        LayoutKind::A4,
    ];

    pub const fn layout(self) -> &'static SheetLayout {
        match self {
            LayoutKind::A1 => &A1,
            LayoutKind::A2 => &A2,
            LayoutKind::A3 => &A3,
            LayoutKind::A4 => &A4,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LayoutKind::A1 => "animated tiles",
            LayoutKind::A2 => "ground tiles",
            LayoutKind::A3 => "building tiles",
            LayoutKind::A4 => "wall tiles",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayoutKind::A1 => "A1",
            LayoutKind::A2 => "A2",
            LayoutKind::A3 => "A3",
            LayoutKind::A4 => "A4",
        };
        f.write_str(name)
    }
}

impl FromStr for LayoutKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(LayoutKind::A1),
            "A2" => Ok(LayoutKind::A2),
            "A3" => Ok(LayoutKind::A3),
            "A4" => Ok(LayoutKind::A4),
            _ => Err(LayoutError::UnknownLayoutName(s.to_string())),
        }
    }
}

/// Arrangement of sub-blocks on a sheet, rows top to bottom
#[derive(Debug, PartialEq, Eq)]
pub struct SheetLayout {
    pub kind: LayoutKind,
    rows: &'static [&'static [AutotileKind]],
    /// Width of the expanded sheet in output tiles
    pub output_width: u32,
    /// Height of the expanded sheet in output tiles
    pub output_height: u32,
    /// Width of the source sheet in subtiles
    pub input_subtile_width: u32,
    /// Height of the source sheet in subtiles
    pub input_subtile_height: u32,
}

impl SheetLayout {
    const fn new(kind: LayoutKind, rows: &'static [&'static [AutotileKind]]) -> Self {
        let (output_width, output_height) = output_size(rows);
        let (input_subtile_width, input_subtile_height) = input_size(rows);
        Self {
            kind,
            rows,
            output_width,
            output_height,
            input_subtile_width,
            input_subtile_height,
        }
    }

    pub fn rows(&self) -> &'static [&'static [AutotileKind]] {
        self.rows
    }

    /// Destination grid size in cells (each output tile is 2x2 cells)
    pub const fn grid_size(&self) -> (u32, u32) {
        (self.output_width * 2, self.output_height * 2)
    }

    /// Total number of sub-blocks on the sheet
    pub fn block_count(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }
}

// Row width is the sum of the blocks' widths and row height the tallest block;
// the sheet is as wide as its widest row.
const fn output_size(rows: &[&[AutotileKind]]) -> (u32, u32) {
    let mut width = 0;
    let mut height = 0;
    let mut r = 0;
    while r < rows.len() {
        let row = rows[r];
        let mut row_width = 0;
        let mut row_height = 0;
        let mut c = 0;
        while c < row.len() {
            let table = row[c].table();
            row_width += table.output_width;
            if table.output_height > row_height {
                row_height = table.output_height;
            }
            c += 1;
        }
        if row_width > width {
            width = row_width;
        }
        height += row_height;
        r += 1;
    }
    (width, height)
}

const fn input_size(rows: &[&[AutotileKind]]) -> (u32, u32) {
    let mut width = 0;
    let mut height = 0;
    let mut r = 0;
    while r < rows.len() {
        let row = rows[r];
        let mut row_width = 0;
        let mut row_height = 0;
        let mut c = 0;
        while c < row.len() {
            let table = row[c].table();
            row_width += table.input_subtile_width();
            if table.input_subtile_height() > row_height {
                row_height = table.input_subtile_height();
            }
            c += 1;
        }
        if row_width > width {
            width = row_width;
        }
        height += row_height;
        r += 1;
    }
    (width, height)
}

pub const A1: SheetLayout = SheetLayout::new(
    LayoutKind::A1,
    &[
        &[T, T, T, T, T, T, T, U],
        &[T, T, T, T, T, T, T, U],
        &[T, T, T, U, T, T, T, U],
        &[T, T, T, U, T, T, T, U],
    ],
);

pub const A2: SheetLayout = SheetLayout::new(
    LayoutKind::A2,
    &[
        &[T, T, T, T, T, T, T, T],
        &[T, T, T, T, T, T, T, T],
        &[T, T, T, T, T, T, T, T],
        &[T, T, T, T, T, T, T, T],
    ],
);

pub const A3: SheetLayout = SheetLayout::new(
    LayoutKind::A3,
    &[
        &[W, W, W, W, W, W, W, W],
        &[W, W, W, W, W, W, W, W],
        &[W, W, W, W, W, W, W, W],
        &[W, W, W, W, W, W, W, W],
    ],
);

pub const A4: SheetLayout = SheetLayout::new(
    LayoutKind::A4,
    &[
        &[T, T, T, T, T, T, T, T],
        &[W, W, W, W, W, W, W, W],
        &[T, T, T, T, T, T, T, T],
        &[W, W, W, W, W, W, W, W],
        &[T, T, T, T, T, T, T, T],
        &[W, W, W, W, W, W, W, W],
    ],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_sizes() {
        assert_eq!((A1.output_width, A1.output_height), (51, 28));
        assert_eq!((A2.output_width, A2.output_height), (56, 28));
        assert_eq!((A3.output_width, A3.output_height), (32, 16));
        assert_eq!((A4.output_width, A4.output_height), (56, 33));
    }

    #[test]
    fn test_grid_sizes() {
        assert_eq!(A1.grid_size(), (102, 56));
        assert_eq!(A2.grid_size(), (112, 56));
        assert_eq!(A3.grid_size(), (64, 32));
        assert_eq!(A4.grid_size(), (112, 66));
    }

    #[test]
    fn test_input_sizes_match_sheet_formats() {
        assert_eq!((A1.input_subtile_width, A1.input_subtile_height), (32, 24));
        assert_eq!((A2.input_subtile_width, A2.input_subtile_height), (32, 24));
        assert_eq!((A3.input_subtile_width, A3.input_subtile_height), (32, 16));
        assert_eq!((A4.input_subtile_width, A4.input_subtile_height), (32, 30));
    }

    #[test]
    fn test_a1_unchanged_columns() {
        let rows = A1.rows();
        assert_eq!(rows.len(), 4);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), 8);
            assert_eq!(row[7], U);
            assert_eq!(row[3], if r >= 2 { U } else { T });
        }
        assert_eq!(A4.block_count(), 48);
    }

    #[test]
    fn test_layout_kind_parse() {
        assert_eq!("a1".parse::<LayoutKind>().unwrap(), LayoutKind::A1);
        assert_eq!(" A4 ".parse::<LayoutKind>().unwrap(), LayoutKind::A4);
        assert!("A5".parse::<LayoutKind>().is_err());

        for kind in LayoutKind::ALL {
            assert_eq!(kind.to_string().parse::<LayoutKind>().unwrap(), kind);
            assert_eq!(kind.layout().kind, kind);
        }
    }
}
