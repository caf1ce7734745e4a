//! Command-line interface for clipnote.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// clipnote - annotate scrollback captured from a paired tmux pane
#[derive(Debug, Parser)]
#[command(name = "clipnote")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log verbosity for /tmp/clipnote_debug.log (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Config file to use instead of ~/.config/clipnote/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bridge socket path
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the annotation panel for a tmux pane
    Watch {
        /// Target pane (e.g. `%3` or `session:0.0`)
        pane: String,
    },

    /// Send one request to a running annotation panel and print the response
    Ipc {
        /// capture, mark, get-marks or export
        command: String,

        /// Line indices for `mark`
        #[arg(allow_negative_numbers = true)]
        lines: Vec<String>,
    },
}
