use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gridsnake::clock::SystemClock;
use gridsnake::config::DEFAULT_LOG_FILE;
use gridsnake::game::{run_session, Outcome, Session};
use gridsnake::grid::Grid;
use gridsnake::input::{Input, InputSource};
use gridsnake::term::TermManager;

#[derive(Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Snake on a fixed grid, in the terminal")]
struct Cli {
    /// File the log is written to
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let grid = Grid::default();
    let mut term = TermManager::new(&grid).context("Failed to prepare the terminal")?;
    term.setup().context("Failed to set up the terminal")?;

    // The terminal is restored before anything is reported.
    let result = play(&mut term, &grid, cli.seed);
    term.restore().context("Failed to restore the terminal")?;

    match result {
        Ok(Some(outcome)) => {
            println!("{}", outcome);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            error!(%err, "game aborted");
            Err(err).context("Game aborted")
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Plays sessions back to back until the player quits. Returns the last outcome.
fn play(term: &mut TermManager, grid: &Grid, seed: Option<u64>) -> gridsnake::error::Result<Option<Outcome>> {
    let mut seeds = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(?seed, "starting");

    if term.show_intro()? == Input::Quit {
        return Ok(None);
    }

    let clock = SystemClock::new();

    loop {
        term.clear()?;

        let mut session = Session::new(*grid, StdRng::seed_from_u64(seeds.gen()));
        let outcome = run_session(&mut session, &clock, term)?;

        if let Outcome::Quit { .. } = outcome {
            return Ok(Some(outcome));
        }

        term.show_outcome(session.snake(), &outcome)?;

        if term.wait_input()? == Input::Quit {
            return Ok(Some(outcome));
        }
    }
}
