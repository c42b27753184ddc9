// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kbconf")]
#[command(author, version, about = "Terminal configurator for DIY keyboards")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/kbconf/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Write logs to this file (the TUI is silent otherwise)
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the key grid (id, label, row, column, size) and exit
    #[command(visible_alias = "ls")]
    Layout {
        /// Also print each key's terminal cell rectangle
        #[arg(long)]
        cells: bool,
    },
}
