//! DIY keyboard configurator
//!
//! Main entry point: logging setup, config loading and dispatch to the TUI
//! or the `layout` printer.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::fs::File;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kbconf::config::AppConfig;
use kbconf_keyboard::{GridMode, KeyGrid, KeyLayoutTable};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    // Load config
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    match cli.command {
        Some(Commands::Layout { cells }) => print_layout(&config, cells),
        None => kbconf::tui::run(config),
    }
}

/// Logs go to `--log-file` if given, to stderr for plain subcommands, and
/// nowhere while the TUI owns the terminal.
fn init_logging(cli: &Cli) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match (&cli.log_file, &cli.command) {
        (Some(path), _) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        (None, Some(_)) => builder.with_writer(std::io::stderr).init(),
        (None, None) => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn print_layout(config: &AppConfig, cells: bool) -> Result<()> {
    let table = KeyLayoutTable::standard();
    let grid = KeyGrid::build(table, GridMode::Keymap);
    let geometry = grid.geometry(config.cell_metrics());

    println!(
        "{} keys in {} rows, grid {}x{} cells",
        grid.len(),
        table.row_count(),
        geometry.width(),
        geometry.height()
    );
    println!();
    if cells {
        println!(
            "{:>4}  {:<10} {:>3} {:>3}  {:>9}  {:>15}",
            "ID", "Label", "Row", "Col", "Size", "Cells"
        );
    } else {
        println!("{:>4}  {:<10} {:>3} {:>3}  {:>9}", "ID", "Label", "Row", "Col", "Size");
    }
    println!("{}", "─".repeat(if cells { 52 } else { 35 }));

    for key in grid.iter() {
        let cell = key.cell();
        let size = format!("{}x{}", key.size().width, key.size().height);
        print!(
            "{:>4}  {:<10} {:>3} {:>3}  {:>9}",
            key.id().0,
            key.label(),
            cell.row,
            cell.column,
            size
        );
        match geometry.rect(key.id()).filter(|_| cells) {
            Some(rect) => println!(
                "  {:>15}",
                format!("{},{} {}x{}", rect.x, rect.y, rect.width, rect.height)
            ),
            None => println!(),
        }
    }
    Ok(())
}
