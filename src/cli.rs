use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marquee_core::Orientation;

#[derive(Parser, Debug)]
#[command(arg_required_else_help(true), version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,

    /// Directory holding marquee.ron, marquee.scss and plugins/
    #[arg(long, short)]
    pub config_path: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SubCommands {
    /// Open the panel
    Run {
        /// Overrides the orientation from the config file
        #[arg(short, long)]
        orientation: Option<Orientation>,
    },
    /// Print the default config
    #[command(name = "default_config")]
    DefaultConfig {
        /// Write it to the config file instead, replacing the current one
        #[arg(short, long, required = false, default_value_t = false)]
        replace_current_config: bool,
    },
}
