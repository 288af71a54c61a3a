//! Tiled JSON map (`.tmj`) and tileset (`.tsj`) documents

use rpgm_tileset_core::DestinationGrid;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::tileset::Tileset;
use crate::ExportError;

/// JSON format version written to documents
pub const FORMAT_VERSION: &str = "1.10";

/// A tileset as stored in a `.tsj` file or embedded in a map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesetDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstgid: Option<u32>,
    pub name: String,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub tilecount: u32,
    pub columns: u32,
    pub image: String,
    pub imagewidth: u32,
    pub imageheight: u32,
    pub margin: u32,
    pub spacing: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparentcolor: Option<String>,
}

impl TilesetDocument {
    /// Describe `tileset`, with its image path made relative to `base_dir`
    /// where possible
    pub fn from_tileset(tileset: &Tileset, base_dir: &Path) -> Self {
        Self {
            kind: "tileset".to_string(),
            version: FORMAT_VERSION.to_string(),
            firstgid: None,
            name: tileset.name.clone(),
            tilewidth: tileset.tile_width,
            tileheight: tileset.tile_height,
            tilecount: tileset.tile_count(),
            columns: tileset.columns(),
            image: relative_path(&tileset.image.path, base_dir),
            imagewidth: tileset.image.width,
            imageheight: tileset.image.height,
            margin: tileset.margin,
            spacing: tileset.spacing,
            transparentcolor: tileset.transparent_color.map(|c| c.to_string()),
        }
    }
}

/// A single tile layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub opacity: f32,
    pub visible: bool,
    /// Global tile ids, 0 for empty cells
    pub data: Vec<u32>,
}

/// An orthogonal, finite map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub orientation: String,
    pub renderorder: String,
    pub infinite: bool,
    pub width: u32,
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    pub nextlayerid: u32,
    pub nextobjectid: u32,
    pub layers: Vec<TileLayerDocument>,
    pub tilesets: Vec<TilesetDocument>,
}

impl MapDocument {
    /// Lay out an expanded grid as a one-layer map over the subtile tileset
    pub fn from_grid(
        grid: &DestinationGrid<u32>,
        tileset: &Tileset,
        layer_name: String,
        base_dir: &Path,
    ) -> Self {
        let mut embedded = TilesetDocument::from_tileset(tileset, base_dir);
        embedded.firstgid = Some(1);

        let data = grid
            .cells()
            .iter()
            .map(|cell| cell.map_or(0, |index| index + 1))
            .collect();

        Self {
            kind: "map".to_string(),
            version: FORMAT_VERSION.to_string(),
            orientation: "orthogonal".to_string(),
            renderorder: "right-down".to_string(),
            infinite: false,
            width: grid.width(),
            height: grid.height(),
            tilewidth: tileset.tile_width,
            tileheight: tileset.tile_height,
            nextlayerid: 2,
            nextobjectid: 1,
            layers: vec![TileLayerDocument {
                kind: "tilelayer".to_string(),
                id: 1,
                name: layer_name,
                x: 0,
                y: 0,
                width: grid.width(),
                height: grid.height(),
                opacity: 1.0,
                visible: true,
                data,
            }],
            tilesets: vec![embedded],
        }
    }
}

/// Write any document as pretty-printed JSON
pub fn write_document<T: Serialize>(document: &T, path: &Path) -> Result<(), ExportError> {
    let content = serde_json::to_string_pretty(document)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Path of `target` as written into a document stored in `base_dir`.
///
/// Tiled resolves image paths against the document's directory, so the
/// result may climb out of `base_dir` with `..`. Paths on different roots
/// (Windows drives) stay absolute.
fn relative_path(target: &Path, base_dir: &Path) -> String {
    let target = absolute(target);
    let base = absolute(base_dir);

    let target_parts: Vec<Component> = target.components().collect();
    let base_parts: Vec<Component> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let relative = if common == 0 {
        target.clone()
    } else {
        let mut relative = PathBuf::new();
        for _ in common..base_parts.len() {
            relative.push("..");
        }
        relative.extend(&target_parts[common..]);
        relative
    };
    relative.to_string_lossy().replace('\\', "/")
}

/// Make `path` absolute against the working directory and drop `.` and
/// `..` lexically, without touching the filesystem
fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(dir) => dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normal = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }
    normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::tileset::TilesetImage;

    fn subtiles() -> Tileset {
        Tileset::new(
            "Water Subtiles".to_string(),
            8,
            8,
            TilesetImage::new("/maps/water.png", 32, 16),
        )
        .with_transparent_color(Some(HexColor::rgb(255, 0, 255)))
    }

    #[test]
    fn test_tileset_document() {
        let doc = TilesetDocument::from_tileset(&subtiles(), Path::new("/maps"));
        assert_eq!(doc.image, "water.png");
        assert_eq!(doc.tilecount, 8);
        assert_eq!(doc.columns, 4);
        assert_eq!(doc.transparentcolor.as_deref(), Some("#ff00ff"));

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "tileset");
        assert!(json.get("firstgid").is_none());
    }

    #[test]
    fn test_relative_paths() {
        assert_eq!(
            relative_path(Path::new("/a/b/c.png"), Path::new("/a")),
            "b/c.png"
        );
        assert_eq!(
            relative_path(Path::new("/x/c.png"), Path::new("/a")),
            "../x/c.png"
        );
        assert_eq!(
            relative_path(Path::new("/a/art/c.png"), Path::new("/a/out/./tiles")),
            "../../art/c.png"
        );
        assert_eq!(
            relative_path(Path::new("/a/b/../c.png"), Path::new("/a")),
            "c.png"
        );
    }

    #[test]
    fn test_relative_paths_from_working_directory() {
        // Both relative, in sibling directories
        assert_eq!(
            relative_path(Path::new("art/sheet.tmj"), Path::new("out")),
            "../art/sheet.tmj"
        );
        assert_eq!(relative_path(Path::new("sheet.png"), Path::new("")), "sheet.png");
    }

    #[test]
    fn test_map_from_grid() {
        let mut grid = DestinationGrid::new(2, 2);
        grid.set(0, 0, Some(0));
        grid.set(1, 1, Some(5));

        let map = MapDocument::from_grid(
            &grid,
            &subtiles(),
            "Water Expanded".to_string(),
            Path::new("/maps"),
        );
        assert_eq!((map.width, map.height), (2, 2));
        assert_eq!((map.tilewidth, map.tileheight), (8, 8));
        assert_eq!(map.layers[0].data, vec![1, 0, 0, 6]);
        assert_eq!(map.tilesets[0].firstgid, Some(1));

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["type"], "map");
        assert_eq!(json["layers"][0]["type"], "tilelayer");
    }
}
