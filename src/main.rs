mod core;
mod renderer;
mod shared;
mod ui;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::editor::EditorState;
use crate::shared::constants;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a map in the editor (missing files start blank)
    Edit {
        /// Map file, created on save when it does not exist yet
        file: PathBuf,
        #[arg(short = 'W', long, default_value_t = constants::DEFAULT_MAP_WIDTH,
              value_parser = clap::value_parser!(u16).range(constants::MIN_MAP_SIZE as i64..=constants::MAX_MAP_SIZE as i64),
              help = "Width for a new map, ignored when the file exists")]
        width: u16,
        #[arg(short = 'H', long, default_value_t = constants::DEFAULT_MAP_HEIGHT,
              value_parser = clap::value_parser!(u16).range(constants::MIN_MAP_SIZE as i64..=constants::MAX_MAP_SIZE as i64),
              help = "Height for a new map, ignored when the file exists")]
        height: u16,
    },
    /// Interactive setup menu, then the editor
    Menu,
    /// Detect terminal capabilities
    Detect,
    /// Query the terminal size as crossterm sees it
    TerminalSize,
}

fn main() -> Result<()> {
    // 1. Initialize logger (error.log / debug.log)
    crate::utils::logger::init();

    // 2. Reset terminal state left behind by a crashed session.
    // Errors are ignored because the terminal might not be in raw mode.
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);

    let cli = Cli::parse();

    match &cli.command {
        Commands::Edit { file, width, height } => {
            let state = EditorState::open(file, (*width, *height))?;
            crate::ui::session::run_editor(state)?;
        }
        Commands::Menu => {
            crate::core::launcher::run()?;
        }
        Commands::Detect => {
            let info = crate::utils::platform::TerminalInfo::detect()?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Commands::TerminalSize => {
            let (cols, rows) = crossterm::terminal::size()?;
            println!("{}x{}", cols, rows);
        }
    }

    Ok(())
}
