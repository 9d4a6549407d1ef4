//! Command-line entry point.

use clap::{Parser, Subcommand};
use pagepad_app::{AppError, Session, parse_commands};
use pagepad_core::CanvasConfig;
use pagepad_render::{RasterSurface, load_font};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pagepad")]
#[command(about = "Replay drawing sessions on a multi-page canvas", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session file (one JSON command per line)
    Run {
        /// Session file
        session: PathBuf,

        /// Directory for exported files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Canvas configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// TrueType/OpenType font for page labels
        #[arg(long)]
        font: Option<PathBuf>,

        /// Surface width in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Surface height in pixels
        #[arg(long, default_value_t = 600)]
        height: u32,
    },

    /// Print the default configuration
    Config,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Run {
            session,
            out_dir,
            config,
            font,
            width,
            height,
        } => {
            let config = match config {
                Some(path) => CanvasConfig::load(path)?,
                None => CanvasConfig::default(),
            };
            let mut surface = RasterSurface::new(width, height);
            if let Some(path) = font {
                surface = surface.with_font(load_font(path)?);
            } else if config.page_label.enabled {
                log::warn!("No font given; page labels will not be drawn");
            }

            let script = std::fs::read_to_string(&session)?;
            let commands = parse_commands(&script)?;
            log::info!("Running {} commands from {:?}", commands.len(), session);

            let mut runner = Session::new(surface, config, out_dir);
            let report = runner.run(&commands)?;
            for path in &report.written {
                println!("{}", path.display());
            }
            println!(
                "{} page(s), undo depth {}, redo depth {}",
                report.page_count, report.undo_depth, report.redo_depth
            );
        }

        Commands::Config => {
            println!("{}", CanvasConfig::default().to_json()?);
        }
    }

    Ok(())
}
