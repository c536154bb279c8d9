//! Interactive voting registry.
//!
//! Loads candidates from the configured data file (`voting_results.txt` by
//! default), runs the menu on stdin/stdout, and saves on "Save and Exit".

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tally::exit_codes;
use tally::io::config::{DEFAULT_CONFIG_FILE, load_config};
use tally::logging;
use tally::menu::{Session, SessionEnd};

#[derive(Parser)]
#[command(name = "tally", version, about = "Interactive voting registry")]
struct Cli {
    /// Optional TOML config (data file, capacity, record format).
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() {
    logging::init();
    match run() {
        Ok(SessionEnd::Exited { .. }) => std::process::exit(exit_codes::OK),
        Ok(SessionEnd::InputClosed) => std::process::exit(exit_codes::ABANDONED),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<SessionEnd> {
    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;
    let mut session = Session::open(&cfg);
    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), stdout.lock())
}
