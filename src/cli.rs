use clap::Parser;
use std::path::PathBuf;

/// Heat/cool countdown with a colour-cycling celebration.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Heating time in seconds [default: 25]
    #[arg(value_name = "HEAT", allow_negative_numbers = true)]
    pub heat: Option<i64>,

    /// Cooling time in seconds [default: 25]
    #[arg(value_name = "COOL", allow_negative_numbers = true)]
    pub cool: Option<i64>,

    /// Celebration time after cooling, in seconds [default: 8]
    #[arg(value_name = "TIMEOUT", allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Don't clear the screen before drawing
    #[arg(short = 'n', long = "no-clear", visible_alias = "nc")]
    pub no_clear: bool,

    /// Skip the tone sequence
    #[arg(long)]
    pub mute: bool,

    /// Path to config TOML (default: search next to the binary, then CWD)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
