//! Balances a checked-in roster from the command line.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use team_balance::roster::{parse_roster, to_players};
use team_balance::{balance_many, bench_surplus, BalanceConfig, GameAssignment, RosterEntry};

#[derive(Parser)]
#[command(name = "team-balance")]
#[command(about = "Split checked-in players into balanced 5v5 games")]
struct Cli {
    /// JSON array of roster entries
    #[arg(long)]
    roster: PathBuf,
    /// JSON balance config, defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for picking who sits out
    #[arg(long)]
    seed: Option<u64>,
    /// Ignore preference ranks in the imbalance score
    #[arg(long)]
    no_role_priority: bool,
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Print games as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    games: &'a [GameAssignment],
    sitting_out: &'a [RosterEntry],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BalanceConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => BalanceConfig::default(),
    };
    if cli.no_role_priority {
        config = config.with_role_priority(false);
    }
    if let Some(max_iterations) = cli.max_iterations {
        config = config.with_max_iterations(max_iterations);
    }

    let text = fs::read_to_string(&cli.roster).with_context(|| format!("reading {}", cli.roster.display()))?;
    let entries = parse_roster(&text)?;
    let mut rng = match cli.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let bench = bench_surplus(entries, &mut rng)?;
    let players = to_players(&bench.playing)?;
    let games = balance_many(&players, &config)?;

    if cli.json {
        let report = Report { games: &games, sitting_out: &bench.sitting_out };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (index, game) in games.iter().enumerate() {
        println!("Match {}:", index + 1);
        println!("{}\n", game.display(&config.weights));
    }
    if !bench.sitting_out.is_empty() {
        println!("Sitting out:");
        for entry in &bench.sitting_out {
            println!("  {} ({})", entry.id, entry.username);
        }
    }
    Ok(())
}
