use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pricing", version, about = "SaaS pricing calculator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the pricing API server (default)
    Start,

    /// Calculate a pricing report from a JSON input without starting the server
    Calculate {
        /// Path to the JSON input, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },

    /// Test configuration file validity
    Test,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
