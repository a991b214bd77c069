use std::path::PathBuf;

use clap::Parser;

/// Generate static citation pages from Google Scholar profile exports.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, value_name = "PATH", default_value = "config.json")]
    pub config: PathBuf,
}
