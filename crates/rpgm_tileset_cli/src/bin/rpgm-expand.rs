//! Expand an RPG Maker autotile sheet from the command line

use clap::Parser;
use rpgm_tileset_cli::{init_logging, run, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            tracing::info!(
                "{} expanded to {}x{} subtiles ({} filled)",
                report.layout,
                report.grid_width,
                report.grid_height,
                report.populated_cells
            );
            if report.missing_sources > 0 {
                tracing::warn!(
                    "{} subtiles were outside the sheet and left empty",
                    report.missing_sources
                );
            }
            tracing::info!("Tileset saved to {}", report.tileset.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
