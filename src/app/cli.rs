//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Gesture Replay - Record and replay touch gestures over adb
#[derive(Parser, Debug)]
#[command(name = "gesture-replay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List attached device serials
    Devices,

    /// Record touch gestures from a device
    Record {
        /// Device serial to record from
        #[arg(short, long)]
        serial: String,

        /// Label to store the gesture list under
        #[arg(short, long, default_value = "default")]
        label: String,

        /// Output file (defaults to a timestamped file in the data dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Recording duration in seconds (0 = until Ctrl+C)
        #[arg(short, long, default_value = "0")]
        duration: u64,
    },

    /// Replay a recorded gesture list against a device
    Replay {
        /// Gesture set file to load
        #[arg(short, long)]
        input: PathBuf,

        /// Label of the gesture list to replay
        #[arg(short, long, default_value = "default")]
        label: String,

        /// Target device serial (defaults to the first attached device)
        #[arg(short, long)]
        serial: Option<String>,
    },

    /// List saved gesture sets
    List {
        /// Show labels and gesture counts
        #[arg(short, long)]
        detailed: bool,
    },

    /// Initialize configuration and the data directory
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the gesture-set data directory
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".gesture_replay").join("gestures"))
            .unwrap_or_else(|| PathBuf::from("gestures"))
    }
}
