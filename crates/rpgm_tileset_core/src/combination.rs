//! Subtile combination tables
//!
//! Every autotile kind expands one sub-block of the source sheet into a block
//! of whole output tiles. Each output tile is described by the four subtiles
//! that make up its quadrants. The coordinates are local to the sub-block and
//! measured in subtiles (half-tiles).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A subtile position inside a source sub-block (sub-block relative, 0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubtileCoord {
    pub x: u32,
    pub y: u32,
}

impl SubtileCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The four quadrants of a destination tile, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    TopLeft,
    BottomRight,
    TopRight,
    BottomLeft,
}

impl Quadrant {
    /// Quadrants in the order compositions list them
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::BottomRight,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
    ];

    /// Cell offset of this quadrant inside the 2x2 footprint of a tile
    pub const fn offset(self) -> (u32, u32) {
        match self {
            Quadrant::TopLeft => (0, 0),
            Quadrant::BottomRight => (1, 1),
            Quadrant::TopRight => (1, 0),
            Quadrant::BottomLeft => (0, 1),
        }
    }
}

/// The subtiles composing one destination tile.
///
/// `None` marks a slot that is intentionally left blank in the expanded sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileComposition(Option<[SubtileCoord; 4]>);

impl TileComposition {
    pub const EMPTY: Self = Self(None);

    /// Build a composition from (top-left, bottom-right, top-right, bottom-left)
    pub const fn new(
        top_left: SubtileCoord,
        bottom_right: SubtileCoord,
        top_right: SubtileCoord,
        bottom_left: SubtileCoord,
    ) -> Self {
        Self(Some([top_left, bottom_right, top_right, bottom_left]))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Subtiles in table order, empty for blank slots
    pub fn subtiles(&self) -> &[SubtileCoord] {
        match &self.0 {
            Some(coords) => coords,
            None => &[],
        }
    }

    /// Subtile for each quadrant, empty for blank slots
    pub fn quadrants(&self) -> impl Iterator<Item = (Quadrant, SubtileCoord)> + '_ {
        Quadrant::ALL.into_iter().zip(self.subtiles().iter().copied())
    }
}

const fn quad(tl: [u32; 2], br: [u32; 2], tr: [u32; 2], bl: [u32; 2]) -> TileComposition {
    TileComposition::new(
        SubtileCoord::new(tl[0], tl[1]),
        SubtileCoord::new(br[0], br[1]),
        SubtileCoord::new(tr[0], tr[1]),
        SubtileCoord::new(bl[0], bl[1]),
    )
}

/// Kind of autotile sub-block found on a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutotileKind {
    /// Ground terrain (water, grass, ...): 47 blob tiles
    Terrain,
    /// Walls and roofs: top behaves like terrain, bottom is static. 16 tiles
    Wall,
    /// Static tiles that only need re-emitting as subtiles
    Unchanged,
}

impl AutotileKind {
    pub const ALL: [AutotileKind; 3] = [
        AutotileKind::Terrain,
        AutotileKind::Wall,
        AutotileKind::Unchanged,
    ];

    /// The combination table for this kind
    pub const fn table(self) -> &'static CombinationTable {
        match self {
            AutotileKind::Terrain => &TERRAIN,
            AutotileKind::Wall => &WALL,
            AutotileKind::Unchanged => &UNCHANGED,
        }
    }
}

impl fmt::Display for AutotileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutotileKind::Terrain => write!(f, "terrain"),
            AutotileKind::Wall => write!(f, "wall"),
            AutotileKind::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// How one sub-block kind expands.
///
/// Input size is in whole source tiles (each 2x2 subtiles), output size is in
/// whole destination tiles. Compositions are in row-major order.
#[derive(Debug, PartialEq, Eq)]
pub struct CombinationTable {
    pub kind: AutotileKind,
    pub input_width: u32,
    pub input_height: u32,
    pub output_width: u32,
    pub output_height: u32,
    compositions: &'static [TileComposition],
}

impl CombinationTable {
    /// Width of the consumed sub-block in subtiles
    pub const fn input_subtile_width(&self) -> u32 {
        self.input_width * 2
    }

    /// Height of the consumed sub-block in subtiles
    pub const fn input_subtile_height(&self) -> u32 {
        self.input_height * 2
    }

    pub fn compositions(&self) -> &'static [TileComposition] {
        self.compositions
    }

    /// Composition for output tile (x, y) of this block
    pub fn composition(&self, x: u32, y: u32) -> Option<&'static TileComposition> {
        if x >= self.output_width || y >= self.output_height {
            return None;
        }
        self.compositions.get((x + y * self.output_width) as usize)
    }

    /// Number of slots that produce no tile
    pub fn empty_slots(&self) -> usize {
        self.compositions.iter().filter(|c| c.is_empty()).count()
    }
}

pub const TERRAIN: CombinationTable = CombinationTable {
    kind: AutotileKind::Terrain,
    input_width: 2,
    input_height: 3,
    output_width: 7,
    output_height: 7,
    compositions: &TERRAIN_COMPOSITIONS,
};

pub const WALL: CombinationTable = CombinationTable {
    kind: AutotileKind::Wall,
    input_width: 2,
    input_height: 2,
    output_width: 4,
    output_height: 4,
    compositions: &WALL_COMPOSITIONS,
};

pub const UNCHANGED: CombinationTable = CombinationTable {
    kind: AutotileKind::Unchanged,
    input_width: 2,
    input_height: 3,
    output_width: 2,
    output_height: 3,
    compositions: &UNCHANGED_COMPOSITIONS,
};

// Slots 41 and 48 are blank: neither isolated variant is rendered.
const TERRAIN_COMPOSITIONS: [TileComposition; 49] = [
    quad([0, 2], [1, 3], [1, 2], [0, 3]),
    quad([2, 2], [1, 3], [1, 2], [2, 3]),
    quad([2, 2], [3, 3], [3, 2], [2, 3]),
    quad([0, 2], [3, 3], [3, 2], [0, 3]),
    quad([2, 4], [3, 1], [1, 4], [2, 3]),
    quad([2, 4], [3, 1], [1, 4], [2, 1]),
    quad([2, 4], [1, 3], [1, 4], [2, 1]),
    quad([0, 4], [1, 3], [1, 4], [0, 3]),
    quad([2, 4], [1, 3], [1, 4], [2, 3]),
    quad([2, 4], [3, 3], [3, 4], [2, 3]),
    quad([0, 4], [3, 3], [3, 4], [0, 3]),
    quad([2, 4], [3, 1], [3, 0], [2, 3]),
    quad([2, 0], [3, 1], [3, 0], [2, 1]),
    quad([2, 0], [1, 3], [1, 4], [2, 1]),
    quad([0, 4], [1, 5], [1, 4], [0, 5]),
    quad([2, 4], [1, 5], [1, 4], [2, 5]),
    quad([2, 4], [3, 5], [3, 4], [2, 5]),
    quad([0, 4], [3, 5], [3, 4], [0, 5]),
    quad([2, 4], [1, 3], [3, 0], [2, 3]),
    quad([2, 0], [1, 3], [3, 0], [2, 3]),
    quad([2, 0], [1, 3], [1, 4], [2, 3]),
    quad([0, 2], [1, 5], [1, 2], [0, 5]),
    quad([2, 2], [1, 5], [1, 2], [2, 5]),
    quad([2, 2], [3, 5], [3, 2], [2, 5]),
    quad([0, 2], [3, 5], [3, 2], [0, 5]),
    quad([2, 2], [3, 1], [1, 2], [2, 3]),
    quad([2, 2], [3, 1], [1, 2], [2, 1]),
    quad([2, 2], [1, 3], [1, 2], [2, 1]),
    quad([0, 4], [3, 1], [1, 4], [0, 3]),
    quad([2, 4], [3, 3], [3, 4], [2, 1]),
    quad([2, 0], [3, 1], [1, 4], [2, 3]),
    quad([2, 4], [1, 3], [3, 0], [2, 1]),
    quad([2, 4], [1, 5], [3, 0], [2, 5]),
    quad([2, 0], [1, 5], [3, 0], [2, 5]),
    quad([2, 0], [1, 5], [1, 4], [2, 5]),
    quad([0, 4], [3, 1], [3, 0], [0, 3]),
    quad([2, 0], [3, 3], [3, 4], [2, 1]),
    quad([0, 2], [3, 1], [1, 2], [0, 3]),
    quad([2, 2], [3, 3], [3, 2], [2, 1]),
    quad([2, 4], [3, 1], [3, 0], [2, 1]),
    quad([2, 0], [3, 1], [1, 4], [2, 1]),
    TileComposition::EMPTY,
    quad([0, 4], [1, 3], [3, 0], [0, 3]),
    quad([2, 0], [3, 3], [3, 4], [2, 3]),
    quad([0, 4], [1, 5], [3, 0], [0, 5]),
    quad([2, 0], [3, 5], [3, 4], [2, 5]),
    quad([2, 0], [3, 1], [3, 0], [2, 3]),
    quad([2, 0], [1, 3], [3, 0], [2, 1]),
    TileComposition::EMPTY,
];

const WALL_COMPOSITIONS: [TileComposition; 16] = [
    quad([0, 0], [1, 1], [1, 0], [0, 1]),
    quad([2, 0], [1, 1], [1, 0], [2, 1]),
    quad([2, 0], [3, 1], [3, 0], [2, 1]),
    quad([0, 0], [3, 1], [3, 0], [0, 1]),
    quad([0, 2], [1, 1], [1, 2], [0, 1]),
    quad([2, 2], [1, 1], [1, 2], [2, 1]),
    quad([2, 2], [3, 1], [3, 2], [2, 1]),
    quad([0, 2], [3, 1], [3, 2], [0, 1]),
    quad([0, 2], [1, 3], [1, 2], [0, 3]),
    quad([2, 2], [1, 3], [1, 2], [2, 3]),
    quad([2, 2], [3, 3], [3, 2], [2, 3]),
    quad([0, 2], [3, 3], [3, 2], [0, 3]),
    quad([0, 0], [1, 3], [1, 0], [0, 3]),
    quad([2, 0], [1, 3], [1, 0], [2, 3]),
    quad([2, 0], [3, 3], [3, 0], [2, 3]),
    quad([0, 0], [3, 3], [3, 0], [0, 3]),
];

const UNCHANGED_COMPOSITIONS: [TileComposition; 6] = [
    quad([0, 0], [1, 1], [1, 0], [0, 1]),
    quad([2, 0], [3, 1], [3, 0], [2, 1]),
    quad([0, 2], [1, 3], [1, 2], [0, 3]),
    quad([2, 2], [3, 3], [3, 2], [2, 3]),
    quad([0, 4], [1, 5], [1, 4], [0, 5]),
    quad([2, 4], [3, 5], [3, 4], [2, 5]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes_match_output_area() {
        for kind in AutotileKind::ALL {
            let table = kind.table();
            assert_eq!(
                table.compositions().len(),
                (table.output_width * table.output_height) as usize,
                "{kind} table has the wrong number of slots"
            );
            assert_eq!(table.kind, kind);
        }
    }

    #[test]
    fn test_terrain_has_two_blank_slots() {
        assert_eq!(TERRAIN.output_width, 7);
        assert_eq!(TERRAIN.output_height, 7);
        assert_eq!(TERRAIN.empty_slots(), 2);
        assert!(TERRAIN.compositions()[41].is_empty());
        assert!(TERRAIN.compositions()[48].is_empty());
    }

    #[test]
    fn test_wall_and_unchanged_fully_populated() {
        assert_eq!(WALL.output_width, 4);
        assert_eq!(WALL.output_height, 4);
        assert_eq!(WALL.empty_slots(), 0);

        assert_eq!(UNCHANGED.output_width, UNCHANGED.input_width);
        assert_eq!(UNCHANGED.output_height, UNCHANGED.input_height);
        assert_eq!(UNCHANGED.empty_slots(), 0);
    }

    #[test]
    fn test_subtiles_stay_inside_sub_block() {
        for kind in AutotileKind::ALL {
            let table = kind.table();
            for composition in table.compositions() {
                for coord in composition.subtiles() {
                    assert!(coord.x < table.input_subtile_width());
                    assert!(coord.y < table.input_subtile_height());
                }
            }
        }
    }

    #[test]
    fn test_unchanged_is_identity() {
        for y in 0..UNCHANGED.output_height {
            for x in 0..UNCHANGED.output_width {
                let composition = UNCHANGED.composition(x, y).unwrap();
                for (quadrant, coord) in composition.quadrants() {
                    let (dx, dy) = quadrant.offset();
                    assert_eq!(coord, SubtileCoord::new(x * 2 + dx, y * 2 + dy));
                }
            }
        }
    }

    #[test]
    fn test_composition_lookup_bounds() {
        assert!(WALL.composition(3, 3).is_some());
        assert!(WALL.composition(4, 0).is_none());
        assert!(WALL.composition(0, 4).is_none());

        let first = WALL.composition(0, 0).unwrap();
        assert_eq!(
            first.subtiles(),
            &[
                SubtileCoord::new(0, 0),
                SubtileCoord::new(1, 1),
                SubtileCoord::new(1, 0),
                SubtileCoord::new(0, 1),
            ]
        );
    }
}
