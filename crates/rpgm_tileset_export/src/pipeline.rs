//! End-to-end export: sheet in, expanded tileset out

use rpgm_tileset_core::{expand, Detection, DestinationGrid, LayoutError, LayoutKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::color::HexColor;
use crate::raster::render_grid;
use crate::sheet::SubtileSheet;
use crate::tiled::{write_document, MapDocument, TilesetDocument};
use crate::tileset::{Tileset, TilesetImage};
use crate::ExportError;

/// How the expanded sheet is stored before the final tileset refers to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntermediateFormat {
    /// A tile map over the source image; small and editable, but not every
    /// engine can use a map as a tileset image
    #[default]
    TileMap,
    /// A flattened PNG
    Image,
}

impl fmt::Display for IntermediateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntermediateFormat::TileMap => write!(f, "tilemap"),
            IntermediateFormat::Image => write!(f, "image"),
        }
    }
}

impl FromStr for IntermediateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tilemap" | "map" | "tmj" => Ok(IntermediateFormat::TileMap),
            "image" | "png" => Ok(IntermediateFormat::Image),
            _ => Err(format!("unknown intermediate format: {s}")),
        }
    }
}

/// Answers to the questions an export may need to ask the operator
pub trait Decisions {
    /// Layout the operator asked for up front, checked against detection
    fn requested_layout(&self) -> Option<LayoutKind> {
        None
    }

    /// Pick between layouts that share the sheet's size
    fn choose_layout(&mut self, candidates: &[LayoutKind]) -> Option<LayoutKind>;

    /// Whether to continue with a sheet that seems to have margin or spacing
    fn confirm_margin(&mut self, detection: &Detection) -> bool;

    /// Whether an existing intermediate file may be replaced
    fn confirm_overwrite(&mut self, path: &Path) -> bool;
}

/// Decisions fixed up front, for unattended runs
#[derive(Debug, Clone, Default)]
pub struct FixedDecisions {
    pub layout: Option<LayoutKind>,
    pub allow_margin: bool,
    pub allow_overwrite: bool,
}

impl Decisions for FixedDecisions {
    fn requested_layout(&self) -> Option<LayoutKind> {
        self.layout
    }

    fn choose_layout(&mut self, candidates: &[LayoutKind]) -> Option<LayoutKind> {
        self.layout.filter(|kind| candidates.contains(kind))
    }

    fn confirm_margin(&mut self, _detection: &Detection) -> bool {
        self.allow_margin
    }

    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        self.allow_overwrite
    }
}

/// Everything needed to export one sheet
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub source: PathBuf,
    /// Tileset name, defaults to the source file stem
    pub name: Option<String>,
    /// Final tile size in pixels (twice the subtile size)
    pub tile_width: u32,
    pub tile_height: u32,
    pub transparent_color: Option<HexColor>,
    pub intermediate: IntermediateFormat,
    /// Where to write the final tileset, defaults to `<name>.tsj` next to
    /// the source
    pub output: Option<PathBuf>,
    pub margin: u32,
    pub spacing: u32,
}

impl ExportSettings {
    pub fn new(source: impl Into<PathBuf>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            source: source.into(),
            name: None,
            tile_width,
            tile_height,
            transparent_color: None,
            intermediate: IntermediateFormat::default(),
            output: None,
            margin: 0,
            spacing: 0,
        }
    }

    fn source_dir(&self) -> &Path {
        self.source.parent().unwrap_or_else(|| Path::new(""))
    }

    fn source_stem(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn tileset_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.source_stem(),
        }
    }

    /// Path of the intermediate map or image
    pub fn intermediate_path(&self) -> PathBuf {
        let file = match self.intermediate {
            IntermediateFormat::TileMap => format!("{}.tmj", self.source_stem()),
            IntermediateFormat::Image => format!("{}_expanded.png", self.source_stem()),
        };
        self.source_dir().join(file)
    }

    /// Path of the final tileset
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            self.source_dir()
                .join(format!("{}.tsj", self.tileset_name()))
        })
    }

    fn validate(&self) -> Result<(), ExportError> {
        let valid = |size: u32| size >= 2 && size % 2 == 0;
        if !valid(self.tile_width) || !valid(self.tile_height) {
            return Err(ExportError::InvalidTileSize {
                width: self.tile_width,
                height: self.tile_height,
            });
        }
        let output = self.output_path();
        if !is_json_tileset(&output) {
            return Err(ExportError::UnsupportedTilesetFormat(output));
        }
        if !self.source.is_file() {
            return Err(ExportError::MissingSource(self.source.clone()));
        }
        Ok(())
    }
}

/// Tilesets are only written as JSON (`.tsj` or `.json`)
fn is_json_tileset(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("tsj") || ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Summary of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub layout: LayoutKind,
    /// Expanded grid size in subtiles
    pub grid_width: u32,
    pub grid_height: u32,
    pub populated_cells: usize,
    pub missing_sources: usize,
    pub intermediate: PathBuf,
    pub tileset: PathBuf,
}

/// Settle which layout a sheet uses, asking for whatever cannot be inferred
pub fn resolve_layout(
    sheet: &SubtileSheet,
    decisions: &mut dyn Decisions,
) -> Result<LayoutKind, ExportError> {
    let detection = sheet.detect()?;

    let allow_margin = detection.margin_warning && decisions.confirm_margin(&detection);
    if detection.margin_warning && !allow_margin {
        return Err(LayoutError::SuspectedMargin {
            width: detection.subtile_width,
            height: detection.subtile_height,
        }
        .into());
    }

    let requested = decisions.requested_layout();
    let choice = if detection.needs_disambiguation() {
        requested
            .filter(|kind| detection.layout.candidates().contains(kind))
            .or_else(|| decisions.choose_layout(detection.layout.candidates()))
    } else {
        requested
    };

    Ok(detection.resolve(choice, allow_margin)?)
}

/// Load, detect, expand and write the intermediate file and final tileset
pub fn export_tileset(
    settings: &ExportSettings,
    decisions: &mut dyn Decisions,
) -> Result<ExportReport, ExportError> {
    settings.validate()?;

    let name = settings.tileset_name();
    let sheet = SubtileSheet::load(
        &settings.source,
        &name,
        settings.tile_width,
        settings.tile_height,
        settings.transparent_color,
    )?
    .with_margin(settings.margin, settings.spacing);

    let kind = resolve_layout(&sheet, decisions)?;
    tracing::info!(
        "Expanding {} as {} ({})",
        settings.source.display(),
        kind,
        kind.description()
    );

    let grid = expand(kind.layout(), |x, y| sheet.subtile_at(x, y));

    let intermediate = settings.intermediate_path();
    if intermediate.exists() && !decisions.confirm_overwrite(&intermediate) {
        return Err(ExportError::OverwriteDeclined(intermediate));
    }
    write_intermediate(&grid, &sheet, settings.intermediate, &intermediate)?;
    tracing::info!("Wrote {}", intermediate.display());

    let tileset_path = settings.output_path();
    let (subtile_width, subtile_height) = sheet.subtile_size();
    let tileset = Tileset::new(
        name,
        settings.tile_width,
        settings.tile_height,
        TilesetImage::new(
            &intermediate,
            grid.width() * subtile_width,
            grid.height() * subtile_height,
        ),
    )
    .with_transparent_color(settings.transparent_color);
    write_tileset(&tileset, &tileset_path)?;
    tracing::info!("Wrote {}", tileset_path.display());

    Ok(ExportReport {
        layout: kind,
        grid_width: grid.width(),
        grid_height: grid.height(),
        populated_cells: grid.populated_count(),
        missing_sources: grid.missing_sources(),
        intermediate,
        tileset: tileset_path,
    })
}

/// Store an expanded grid as a map or a flattened image
pub fn write_intermediate(
    grid: &DestinationGrid<u32>,
    sheet: &SubtileSheet,
    format: IntermediateFormat,
    path: &Path,
) -> Result<(), ExportError> {
    match format {
        IntermediateFormat::TileMap => {
            let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
            let layer_name = format!("{} Expanded", sheet.tileset.name);
            let map = MapDocument::from_grid(grid, &sheet.tileset, layer_name, base_dir);
            write_document(&map, path)
        }
        IntermediateFormat::Image => {
            let (image, unresolved) = render_grid(grid, sheet);
            if unresolved > 0 {
                tracing::warn!(
                    "{} cells of {} left transparent: their subtiles are not on the sheet",
                    unresolved,
                    path.display()
                );
            }
            image.save(path)?;
            Ok(())
        }
    }
}

/// Write a tileset document, creating parent directories as needed
pub fn write_tileset(tileset: &Tileset, path: &Path) -> Result<(), ExportError> {
    if !is_json_tileset(path) {
        return Err(ExportError::UnsupportedTilesetFormat(path.to_path_buf()));
    }
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    if !base_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(base_dir)?;
    }
    write_document(&TilesetDocument::from_tileset(tileset, base_dir), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let settings = ExportSettings::new("/art/Outside_A2.png", 48, 48);
        assert_eq!(settings.tileset_name(), "Outside_A2");
        assert_eq!(
            settings.intermediate_path(),
            PathBuf::from("/art/Outside_A2.tmj")
        );
        assert_eq!(settings.output_path(), PathBuf::from("/art/Outside_A2.tsj"));

        let mut image = settings.clone();
        image.intermediate = IntermediateFormat::Image;
        image.name = Some("Grass".to_string());
        assert_eq!(
            image.intermediate_path(),
            PathBuf::from("/art/Outside_A2_expanded.png")
        );
        assert_eq!(image.output_path(), PathBuf::from("/art/Grass.tsj"));
    }

    #[test]
    fn test_blank_name_falls_back_to_stem() {
        let mut settings = ExportSettings::new("water.png", 32, 32);
        settings.name = Some("  ".to_string());
        assert_eq!(settings.tileset_name(), "water");
    }

    #[test]
    fn test_odd_tile_size_rejected() {
        let settings = ExportSettings::new("water.png", 33, 32);
        assert!(matches!(
            settings.validate(),
            Err(ExportError::InvalidTileSize { .. })
        ));
    }

    #[test]
    fn test_only_json_tilesets_are_written() {
        let mut settings = ExportSettings::new("water.png", 32, 32);
        settings.output = Some(PathBuf::from("out/Water.tsx"));
        assert!(matches!(
            settings.validate(),
            Err(ExportError::UnsupportedTilesetFormat(_))
        ));

        assert!(is_json_tileset(Path::new("a/Water.tsj")));
        assert!(is_json_tileset(Path::new("Water.JSON")));
        assert!(!is_json_tileset(Path::new("Water")));
    }

    #[test]
    fn test_intermediate_format_parse() {
        assert_eq!(
            "TileMap".parse::<IntermediateFormat>(),
            Ok(IntermediateFormat::TileMap)
        );
        assert_eq!("png".parse::<IntermediateFormat>(), Ok(IntermediateFormat::Image));
        assert!("gif".parse::<IntermediateFormat>().is_err());
    }

    #[test]
    fn test_fixed_decisions_only_pick_candidates() {
        let mut decisions = FixedDecisions {
            layout: Some(LayoutKind::A3),
            ..Default::default()
        };
        assert_eq!(
            decisions.choose_layout(&[LayoutKind::A1, LayoutKind::A2]),
            None
        );
        decisions.layout = Some(LayoutKind::A1);
        assert_eq!(
            decisions.choose_layout(&[LayoutKind::A1, LayoutKind::A2]),
            Some(LayoutKind::A1)
        );
    }
}
