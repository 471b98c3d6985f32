//! [`Args`] definitions.

use clap::Parser;

/// Finds hotel deals and e-mails the ones under your target price.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Replay the saved search and e-mail the results instead of prompting.
    #[arg(long)]
    pub headless: bool,

    /// Path to the configuration file.
    #[arg(short, long, default_value = "hotel-deals.toml")]
    pub config: String,
}
