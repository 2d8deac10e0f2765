//! Reelplan CLI: command-line interface for planning and exporting
//! timeline compositions.
//!
//! Usage:
//!   reelplan plan <PATH>                 Print the composition plan
//!   reelplan frame <PATH> --frame N      Show layers active at a frame
//!   reelplan preview <PATH>              Run a playback session
//!   reelplan validate <PATH>             Check a composition snapshot
//!   reelplan info <PATH>                 Show composition information
//!   reelplan export <PATH>               Hand a composition to the renderer
//!   reelplan init <PROJECT_ID>           Create an empty composition
//!   reelplan caption <PATH> --track T    Append a text overlay
//!   reelplan config [--write]            Show or write the configuration

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use reelplan_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "reelplan",
    about = "Timeline composition planner for generated video projects",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a composition and print the plan as JSON
    Plan {
        /// Path to the composition JSON
        path: PathBuf,

        /// Pass overlapping video/audio keyframes through instead of failing
        #[arg(long)]
        allow_overlaps: bool,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Show the layers active at one frame
    #[command(group(ArgGroup::new("at").required(true).args(["frame", "at_ms"])))]
    Frame {
        /// Path to the composition JSON
        path: PathBuf,

        /// Frame index
        #[arg(long)]
        frame: Option<u64>,

        /// Timeline position in milliseconds
        #[arg(long)]
        at_ms: Option<f64>,

        /// Pass overlapping video/audio keyframes through instead of failing
        #[arg(long)]
        allow_overlaps: bool,
    },

    /// Play a composition in real time and print published positions
    Preview {
        /// Path to the composition JSON
        path: PathBuf,

        /// Start position in milliseconds
        #[arg(long, default_value = "0")]
        from_ms: f64,

        /// Stop after this many milliseconds of playback
        #[arg(long)]
        duration_ms: Option<u64>,
    },

    /// Validate a composition snapshot
    Validate {
        /// Path to the composition JSON
        path: PathBuf,
    },

    /// Show composition information
    Info {
        /// Path to the composition JSON
        path: PathBuf,
    },

    /// Export a composition for rendering
    Export {
        /// Path to the composition JSON
        path: PathBuf,

        /// Output directory for the dispatch payload
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a new empty composition
    Init {
        /// Project id
        project_id: String,

        /// Project title
        #[arg(long, default_value = "")]
        title: String,

        /// Aspect ratio: 16:9, 9:16 or 1:1
        #[arg(long)]
        aspect: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Append a text overlay after the last keyframe on a text track
    Caption {
        /// Path to the composition JSON
        path: PathBuf,

        /// Text track id
        #[arg(long)]
        track: String,

        /// Overlay text
        #[arg(long)]
        text: String,

        /// Keyframe id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the user config file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    reelplan_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Plan {
            path,
            allow_overlaps,
            pretty,
        } => commands::plan::run(path, &config, allow_overlaps, pretty),
        Commands::Frame {
            path,
            frame,
            at_ms,
            allow_overlaps,
        } => commands::frame::run(path, &config, frame, at_ms, allow_overlaps),
        Commands::Preview {
            path,
            from_ms,
            duration_ms,
        } => commands::preview::run(path, &config, from_ms, duration_ms).await,
        Commands::Validate { path } => commands::validate::run(path, &config),
        Commands::Info { path } => commands::info::run(path),
        Commands::Export { path, output } => commands::export::run(path, &config, output),
        Commands::Init {
            project_id,
            title,
            aspect,
            output,
        } => commands::init::run(project_id, title, aspect, output),
        Commands::Caption {
            path,
            track,
            text,
            id,
        } => commands::caption::run(path, track, text, id),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
