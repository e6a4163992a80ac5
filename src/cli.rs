use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::server::Config;

#[derive(Debug, Parser)]
#[command(version, about = "Plinko static server and asset tools")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the game's static files (the default)
    Serve(ServeArgs),
    /// Render text into a transparent PNG label
    Label(LabelArgs),
    /// Print the given items in random order
    Shuffle {
        #[arg(required = true)]
        items: Vec<String>,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServeArgs {
    /// Port to listen on, 0 picks a free one
    #[arg(long, env = "PORT", default_value_t = 0)]
    pub port: u16,

    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,
}

impl From<ServeArgs> for Config {
    fn from(value: ServeArgs) -> Self {
        Self {
            port: value.port,
            public_dir: value.public_dir,
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct LabelArgs {
    pub text: String,

    #[arg(long)]
    pub width: u32,

    /// Font size in points, also the image height in pixels
    #[arg(long)]
    pub font_size: u32,

    #[arg(long)]
    pub center: bool,

    /// Write the PNG here instead of printing a data URL
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
