//! realm-guide: walk through the story tutorial in a terminal
//!
//! Usage:
//!   realm-guide                     # interactive tutorial
//!   realm-guide replay inputs.jsonl # headless, events as JSON lines
//!   realm-guide script              # list steps and their gates

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use realm_guide_app::logging::{init_logging, LogTarget};
use realm_guide_app::{print_script, run_play, run_replay, SessionOptions};
use realm_guide_config::AppConfig;

#[derive(Parser)]
#[command(name = "realm-guide", version, about = "Guided story tutorial")]
struct Cli {
    /// Config file (defaults to $REALM_GUIDE_CONFIG, then the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Scene manifest to load instead of the bundled tabletop
    #[arg(long, global = true)]
    scene: Option<PathBuf>,

    /// Step script to run instead of the built-in tutorial
    #[arg(long, global = true)]
    script: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive tutorial (default)
    Play,
    /// Feed JSON-lines input events and print emitted events
    Replay {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        file: PathBuf,
    },
    /// Print the step table
    Script,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let options = SessionOptions {
        scene: cli.scene,
        script: cli.script,
    };

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            init_logging(&config.logging, LogTarget::File)?;
            run_play(&config, &options).await
        }
        Commands::Replay { file } => {
            init_logging(&config.logging, LogTarget::Stderr)?;
            run_replay(&config, &options, &file).map(|_| ())
        }
        Commands::Script => {
            init_logging(&config.logging, LogTarget::Stderr)?;
            print_script(&config, &options, io::stdout().lock())
        }
    }
}
