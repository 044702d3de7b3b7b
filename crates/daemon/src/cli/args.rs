pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "burnbox")]
#[command(about = "Share a secret through a link that works exactly once")]
#[command(version)]
pub struct Args {
    /// Daemon to talk to (defaults to the configured port on localhost)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the burnbox config directory (defaults to ~/.burnbox)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
