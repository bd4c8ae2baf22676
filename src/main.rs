// src/main.rs
use ankipack::cli::args::Args;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging based on verbosity
    let filter = args.log_level();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("ankipack={}", filter).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    ankipack::run(args)
}
