//! Fair Dice terminal game
//!
//! Plays one game of non-transitive dice against the computer. Every random
//! decision is a commit-reveal round: the computer publishes an HMAC of its
//! hidden value before the user answers, then discloses the key.

mod session;
mod table;

use anyhow::{bail, Context, Result};
use clap::Parser;
use fair_dice_core::DiceConfiguration;
use session::{Outcome, Session};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Fewest dice that leave the second mover a real choice
const MIN_DICE: usize = 3;

const EXAMPLE: &str = "fair-dice 2,2,4,4,9,9 6,8,1,1,8,6 7,5,3,7,5,3";

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(
    name = "fair-dice",
    version,
    about = "Non-transitive dice with verifiable fair rolls",
    after_help = format!("Example: {}", EXAMPLE)
)]
struct Args {
    /// Dice as six comma-separated integer faces, e.g. 2,2,4,4,9,9.
    /// Options must come before the dice, which may have negative faces.
    #[arg(
        value_name = "DICE",
        required = true,
        allow_hyphen_values = true,
        value_parser = parse_die
    )]
    dice: Vec<DiceConfiguration>,

    /// Decimal places shown in the probability table
    #[arg(long, default_value_t = 4)]
    precision: usize,
}

fn parse_die(s: &str) -> std::result::Result<DiceConfiguration, String> {
    s.parse().map_err(|e| format!("{}\n\nExample: {}", e, EXAMPLE))
}

fn validate(args: &Args) -> Result<()> {
    if args.dice.len() < MIN_DICE {
        bail!(
            "at least {} dice are required, got {}. Example: {}",
            MIN_DICE,
            args.dice.len(),
            EXAMPLE
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let args = Args::parse();
    validate(&args)?;
    info!(dice = args.dice.len(), precision = args.precision, "Starting fair dice");

    let stdin = std::io::stdin();
    let mut session = Session::new(args.dice, args.precision, stdin.lock(), std::io::stdout());
    match session.run()? {
        Outcome::Finished(result) => info!(%result, "Session finished"),
        Outcome::Exited => info!("Session exited by user"),
    }
    Ok(())
}
