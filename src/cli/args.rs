// src/cli/args.rs
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Args {
    /// Config file (default: ./ankipack.toml if present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding one folder per deck
    #[arg(short, long, value_name = "DIR")]
    pub decks: Option<PathBuf>,

    /// Directory receiving the .apkg files
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Deck id shared by all decks, or the seed with --deck-ids-by-name
    #[arg(long, value_name = "ID")]
    pub deck_id: Option<i64>,

    /// Derive a distinct, stable id for every deck from its name
    #[arg(long)]
    pub deck_ids_by_name: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log level for the `ankipack` target; skipped-note warnings only by default
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}
