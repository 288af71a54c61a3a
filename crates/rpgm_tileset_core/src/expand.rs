//! Blob expansion
//!
//! Walks a sheet layout block by block, row-major, and composes every output
//! tile from four source subtiles. Each block's source origin depends on the
//! blocks before it in its row and on the rows above it.

use crate::combination::{AutotileKind, Quadrant, SubtileCoord};
use crate::grid::DestinationGrid;
use crate::layout::SheetLayout;

/// Where one sub-block is read from and written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOrigin {
    pub kind: AutotileKind,
    pub row: usize,
    pub column: usize,
    /// Source origin in subtiles
    pub input: SubtileCoord,
    /// Destination origin in grid cells
    pub output_x: u32,
    pub output_y: u32,
}

/// One destination cell and the source subtile it is copied from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub dest_x: u32,
    pub dest_y: u32,
    /// Absolute source subtile
    pub source: SubtileCoord,
    pub quadrant: Quadrant,
}

/// Origins of every sub-block in a layout, in traversal order
pub fn block_origins(layout: &SheetLayout) -> Vec<BlockOrigin> {
    let mut origins = Vec::with_capacity(layout.block_count());

    let mut output_y = 0;
    let mut input_y = 0;
    for (row, blocks) in layout.rows().iter().enumerate() {
        let mut output_x = 0;
        let mut input_x = 0;
        let mut output_row_height = 0;
        let mut input_row_height = 0;

        for (column, &kind) in blocks.iter().enumerate() {
            let table = kind.table();
            origins.push(BlockOrigin {
                kind,
                row,
                column,
                input: SubtileCoord::new(input_x * 2, input_y * 2),
                output_x,
                output_y,
            });

            input_x += table.input_width;
            output_x += table.output_width * 2;
            output_row_height = output_row_height.max(table.output_height * 2);
            input_row_height = input_row_height.max(table.input_height);
        }

        output_y += output_row_height;
        input_y += input_row_height;
    }

    origins
}

/// Every cell written by expanding `layout`, blank slots excluded
pub fn placements(layout: &SheetLayout) -> Vec<Placement> {
    let mut placements = Vec::new();

    for origin in block_origins(layout) {
        let table = origin.kind.table();
        for y in 0..table.output_height {
            for x in 0..table.output_width {
                let Some(composition) = table.composition(x, y) else {
                    continue;
                };
                for (quadrant, local) in composition.quadrants() {
                    let (dx, dy) = quadrant.offset();
                    placements.push(Placement {
                        dest_x: origin.output_x + x * 2 + dx,
                        dest_y: origin.output_y + y * 2 + dy,
                        source: SubtileCoord::new(
                            origin.input.x + local.x,
                            origin.input.y + local.y,
                        ),
                        quadrant,
                    });
                }
            }
        }
    }

    placements
}

/// Expand a sheet.
///
/// `source` returns the tile for an absolute subtile coordinate, or `None`
/// when the sheet has nothing there; such cells are left empty.
pub fn expand<T, F>(layout: &SheetLayout, mut source: F) -> DestinationGrid<T>
where
    F: FnMut(u32, u32) -> Option<T>,
{
    let (width, height) = layout.grid_size();
    let mut grid = DestinationGrid::new(width, height);

    for placement in placements(layout) {
        let tile = source(placement.source.x, placement.source.y);
        if tile.is_none() {
            grid.record_missing();
        }
        grid.set(placement.dest_x, placement.dest_y, tile);
    }

    if grid.missing_sources() > 0 {
        tracing::warn!(
            "{} layout: {} source subtiles were missing, their cells are left empty",
            layout.kind,
            grid.missing_sources()
        );
    }
    tracing::debug!(
        "Expanded {} layout into {}x{} cells ({} populated)",
        layout.kind,
        width,
        height,
        grid.populated_count()
    );

    grid
}

/// Expand a sheet whose subtiles are addressed by flat index
/// `x + y * sheet_subtile_width`.
pub fn expand_indexed<T, F>(
    layout: &SheetLayout,
    sheet_subtile_width: u32,
    mut source: F,
) -> DestinationGrid<T>
where
    F: FnMut(u32) -> Option<T>,
{
    expand(layout, |x, y| source(x + y * sheet_subtile_width))
}
