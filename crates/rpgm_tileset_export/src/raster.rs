//! Rasterising an expanded grid

use image::RgbaImage;
use rpgm_tileset_core::DestinationGrid;

use crate::sheet::SubtileSheet;

/// Draw every populated cell of `grid` using the sheet's subtile pixels.
///
/// Empty cells, and cells referring to subtiles the sheet lacks, stay fully
/// transparent. Returns the image and the number of such unresolved cells.
pub fn render_grid(grid: &DestinationGrid<u32>, sheet: &SubtileSheet) -> (RgbaImage, usize) {
    let (w, h) = sheet.subtile_size();
    let mut image = RgbaImage::new(grid.width() * w, grid.height() * h);

    let mut unresolved = 0;
    for (x, y, &subtile) in grid.iter_tiles() {
        if !sheet.blit_subtile(subtile, &mut image, x * w, y * h) {
            unresolved += 1;
        }
    }
    if unresolved > 0 {
        tracing::debug!("{} cells refer to subtiles outside the sheet", unresolved);
    }

    (image, unresolved)
}
