use clap::{Parser, Subcommand};

/// Amateur radio call sign lookup
#[derive(Parser, Debug)]
#[command(name = "hamcall", about = "Look up amateur radio operators by call sign", version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "hamcall.toml")]
    pub config: String,

    /// Omit to start the interactive prompt
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Look up one call sign and exit
    Lookup {
        /// Call sign, e.g. W1AW
        callsign: String,
    },
    /// Print recent lookups
    History,
    /// Forget all recent lookups
    ClearHistory,
    /// Switch between dark and light map tiles
    ToggleTheme,
}
