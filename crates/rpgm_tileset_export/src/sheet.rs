//! Source sheets cut into subtiles

use image::{imageops, RgbaImage};
use rpgm_tileset_core::{detect_layout, Detection, LayoutError};
use std::path::Path;

use crate::color::HexColor;
use crate::tileset::{Tileset, TilesetImage};
use crate::ExportError;

/// A decoded autotile sheet together with its subtile tileset
#[derive(Debug, Clone)]
pub struct SubtileSheet {
    pub tileset: Tileset,
    pixels: RgbaImage,
}

impl SubtileSheet {
    /// Load a sheet from disk.
    ///
    /// `tile_width`/`tile_height` are the full tile size; subtiles are half
    /// of it, rounded down.
    pub fn load(
        path: &Path,
        name: &str,
        tile_width: u32,
        tile_height: u32,
        transparent_color: Option<HexColor>,
    ) -> Result<Self, ExportError> {
        let pixels = image::open(path)?.to_rgba8();
        tracing::debug!(
            "Loaded {} ({}x{} px)",
            path.display(),
            pixels.width(),
            pixels.height()
        );
        Self::from_image(path, name, pixels, tile_width, tile_height, transparent_color)
    }

    /// Build a sheet from an already decoded image
    pub fn from_image(
        path: &Path,
        name: &str,
        mut pixels: RgbaImage,
        tile_width: u32,
        tile_height: u32,
        transparent_color: Option<HexColor>,
    ) -> Result<Self, ExportError> {
        let subtile_width = tile_width / 2;
        let subtile_height = tile_height / 2;
        if subtile_width == 0 || subtile_height == 0 {
            return Err(ExportError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        if let Some(color) = transparent_color {
            for pixel in pixels.pixels_mut() {
                if color.matches(pixel) {
                    pixel.0[3] = 0;
                }
            }
        }

        let image = TilesetImage::new(path, pixels.width(), pixels.height());
        let tileset = Tileset::new(
            format!("{name} Subtiles"),
            subtile_width,
            subtile_height,
            image,
        )
        .with_transparent_color(transparent_color);

        Ok(Self { tileset, pixels })
    }

    /// Treat the sheet as having margin and spacing.
    ///
    /// Expansion does not account for them; this only affects how many
    /// subtiles are addressable.
    pub fn with_margin(mut self, margin: u32, spacing: u32) -> Self {
        self.tileset = self.tileset.with_margin(margin, spacing);
        self
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn subtile_size(&self) -> (u32, u32) {
        (self.tileset.tile_width, self.tileset.tile_height)
    }

    /// Sheet size in subtiles: image size divided by subtile size
    pub fn grid_size(&self) -> (u32, u32) {
        self.tileset.measured_size()
    }

    /// Subtile index at an absolute subtile coordinate, `None` if the sheet
    /// has no addressable subtile there
    pub fn subtile_at(&self, x: u32, y: u32) -> Option<u32> {
        let columns = self.tileset.columns();
        if x >= columns || y >= self.tileset.rows() {
            return None;
        }
        Some(x + y * columns)
    }

    /// Match this sheet against the known layouts
    pub fn detect(&self) -> Result<Detection, LayoutError> {
        let (width, height) = self.grid_size();
        detect_layout(width, height, u64::from(self.tileset.tile_count()))
    }

    /// Copy one subtile's pixels into `target` at pixel position (x, y)
    pub fn blit_subtile(&self, index: u32, target: &mut RgbaImage, x: u32, y: u32) -> bool {
        let Some((sx, sy)) = self.tileset.tile_origin(index) else {
            return false;
        };
        let (w, h) = self.subtile_size();
        let subtile = imageops::crop_imm(&self.pixels, sx, sy, w, h).to_image();
        imageops::replace(target, &subtile, i64::from(x), i64::from(y));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sheet(width: u32, height: u32) -> SubtileSheet {
        let pixels = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        SubtileSheet::from_image(Path::new("sheet.png"), "Sheet", pixels, 16, 16, None).unwrap()
    }

    #[test]
    fn test_grid_size_in_subtiles() {
        let sheet = sheet(256, 128);
        assert_eq!(sheet.subtile_size(), (8, 8));
        assert_eq!(sheet.grid_size(), (32, 16));
        assert_eq!(sheet.tileset.name, "Sheet Subtiles");
    }

    #[test]
    fn test_odd_tile_size_rounds_down() {
        let pixels = RgbaImage::new(32, 32);
        let sheet =
            SubtileSheet::from_image(Path::new("a.png"), "A", pixels, 17, 9, None).unwrap();
        assert_eq!(sheet.subtile_size(), (8, 4));
    }

    #[test]
    fn test_tile_size_too_small() {
        let pixels = RgbaImage::new(32, 32);
        let result = SubtileSheet::from_image(Path::new("a.png"), "A", pixels, 1, 16, None);
        assert!(matches!(result, Err(ExportError::InvalidTileSize { .. })));
    }

    #[test]
    fn test_subtile_lookup() {
        let sheet = sheet(256, 128);
        assert_eq!(sheet.subtile_at(0, 0), Some(0));
        assert_eq!(sheet.subtile_at(1, 1), Some(33));
        assert_eq!(sheet.subtile_at(32, 0), None);

        // Margin shrinks the addressable grid
        let sheet = sheet.with_margin(1, 0);
        assert_eq!(sheet.subtile_at(1, 1), Some(32));
        assert_eq!(sheet.subtile_at(31, 0), None);
    }

    #[test]
    fn test_detect_a3() {
        let detection = sheet(256, 128).detect().unwrap();
        assert!(!detection.margin_warning);
        assert!(!detection.needs_disambiguation());
    }

    #[test]
    fn test_detect_margin_warning() {
        let detection = sheet(256, 128).with_margin(1, 0).detect().unwrap();
        assert!(detection.margin_warning);
    }

    #[test]
    fn test_transparent_color_keyed_out() {
        let mut pixels = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 255, 255]));
        pixels.put_pixel(0, 0, Rgba([1, 1, 1, 255]));
        let sheet = SubtileSheet::from_image(
            Path::new("a.png"),
            "A",
            pixels,
            16,
            16,
            Some(HexColor::rgb(255, 0, 255)),
        )
        .unwrap();

        assert_eq!(sheet.pixels().get_pixel(5, 5).0[3], 0);
        assert_eq!(sheet.pixels().get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn test_blit_subtile() {
        let mut pixels = RgbaImage::new(16, 16);
        pixels.put_pixel(8, 0, Rgba([9, 9, 9, 255]));
        let sheet =
            SubtileSheet::from_image(Path::new("a.png"), "A", pixels, 16, 16, None).unwrap();

        let mut target = RgbaImage::new(16, 16);
        assert!(sheet.blit_subtile(1, &mut target, 8, 8));
        assert_eq!(target.get_pixel(8, 8), &Rgba([9, 9, 9, 255]));
        assert!(!sheet.blit_subtile(4, &mut target, 0, 0));
    }
}
