//! Command-line arguments and the run loop behind `rpgm-expand`

use clap::{ArgAction, Parser};
use rpgm_tileset_core::LayoutKind;
use rpgm_tileset_export::{
    export_tileset, Decisions, ExportError, ExportReport, ExportSettings, FixedDecisions, HexColor,
    IntermediateFormat,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::preferences::Preferences;
use crate::prompt::TerminalDecisions;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("No tile size given and none remembered; pass --tile-width and --tile-height")]
    MissingTileSize,
}

/// Expand an RPG Maker A1-A4 autotile sheet into a Tiled blob tileset
#[derive(Debug, Clone, Parser)]
#[command(name = "rpgm-expand", version, about)]
pub struct Cli {
    /// Autotile sheet image (PNG)
    pub source: PathBuf,

    /// Tileset name, defaults to the file name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Tile width in pixels, remembered between runs
    #[arg(long, value_name = "PX")]
    pub tile_width: Option<u32>,

    /// Tile height in pixels, remembered between runs
    #[arg(long, value_name = "PX")]
    pub tile_height: Option<u32>,

    /// Colour to treat as transparent
    #[arg(long, value_name = "#RRGGBB", conflicts_with = "no_transparent")]
    pub transparent: Option<HexColor>,

    /// Ignore the remembered transparent colour
    #[arg(long)]
    pub no_transparent: bool,

    /// Store the expansion as a tile map or a flattened image
    #[arg(long, value_name = "tilemap|image")]
    pub intermediate: Option<IntermediateFormat>,

    /// Sheet layout; picks between A1 and A2, and must match the detected
    /// layout of other sheets
    #[arg(long, value_name = "A1|A2|A3|A4")]
    pub layout: Option<LayoutKind>,

    /// Final tileset path, defaults to <name>.tsj next to the source
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pixels around the edge of the sheet
    #[arg(long, default_value_t = 0)]
    pub margin: u32,

    /// Pixels between tiles in the sheet
    #[arg(long, default_value_t = 0)]
    pub spacing: u32,

    /// Answer yes to margin and overwrite questions
    #[arg(short, long)]
    pub yes: bool,

    /// Never ask; fail when a question would be needed
    #[arg(long)]
    pub non_interactive: bool,

    /// Ask through native dialogs instead of the terminal
    #[cfg(all(feature = "native", not(target_arch = "wasm32")))]
    #[arg(long, conflicts_with = "non_interactive")]
    pub dialogs: bool,

    /// Do not remember this run's settings
    #[arg(long)]
    pub no_save_preferences: bool,

    /// More output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Combine arguments with remembered preferences
    pub fn settings(&self, preferences: &Preferences) -> Result<ExportSettings, CliError> {
        let tile_width = self.tile_width.or(preferences.tile_width);
        let tile_height = self.tile_height.or(preferences.tile_height);
        let (Some(tile_width), Some(tile_height)) = (tile_width, tile_height) else {
            return Err(CliError::MissingTileSize);
        };

        let transparent_color = if self.no_transparent {
            None
        } else {
            self.transparent
                .or_else(|| preferences.default_transparent_color())
        };

        let mut settings = ExportSettings::new(&self.source, tile_width, tile_height);
        settings.name = self.name.clone();
        settings.transparent_color = transparent_color;
        settings.intermediate = self
            .intermediate
            .unwrap_or(preferences.intermediate_format);
        settings.output = self.output.clone();
        settings.margin = self.margin;
        settings.spacing = self.spacing;
        Ok(settings)
    }

    /// Where answers to export questions come from
    pub fn decisions(&self) -> Box<dyn Decisions> {
        if self.non_interactive {
            return Box::new(FixedDecisions {
                layout: self.layout,
                allow_margin: self.yes,
                allow_overwrite: self.yes,
            });
        }

        #[cfg(all(feature = "native", not(target_arch = "wasm32")))]
        if self.dialogs {
            return Box::new(crate::prompt::DialogDecisions {
                layout: self.layout,
                assume_yes: self.yes,
            });
        }

        Box::new(TerminalDecisions::new(
            std::io::stdin().lock(),
            std::io::stderr(),
            self.layout,
            self.yes,
        ))
    }
}

/// Install the global tracing subscriber
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one export with preferences from the default location
pub fn run(cli: &Cli) -> Result<ExportReport, CliError> {
    run_with_preferences(cli, Preferences::config_path().as_deref())
}

/// Run one export, loading and saving preferences at `preferences_path`
pub fn run_with_preferences(
    cli: &Cli,
    preferences_path: Option<&Path>,
) -> Result<ExportReport, CliError> {
    let mut preferences = preferences_path
        .map(Preferences::load_from)
        .unwrap_or_default();
    let settings = cli.settings(&preferences)?;

    if !cli.no_save_preferences {
        preferences.remember(&settings);
        match preferences_path {
            Some(path) => {
                if let Err(e) = preferences.save_to(path) {
                    tracing::warn!("Failed to save preferences: {}", e);
                }
            }
            None => tracing::warn!("No config directory; preferences not saved"),
        }
    }

    let mut decisions = cli.decisions();
    Ok(export_tileset(&settings, decisions.as_mut())?)
}
