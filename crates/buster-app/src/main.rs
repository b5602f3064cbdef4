#![deny(warnings)]
//! Replay driver for the BombBuster deduction engine.

mod report;

use anyhow::{Context, Result};
use buster_bot::suggest::{double_chance_suggestions, rank_calls, EntropySuggester};
use buster_core::config::GameConfig;
use buster_core::engine::BeliefEngine;
use buster_core::event::EventLog;
use buster_core::model::deck::deal_hands;
use buster_core::model::player::PlayerId;
use buster_core::snapshot::GameSnapshot;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Deal, replay, and analyse BombBuster games from snapshot files.
#[derive(Debug, Parser)]
#[command(name = "buster", author, version, about = "BombBuster deduction engine driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Deal a fresh simulated game and write its snapshot.
    Deal {
        /// Where the snapshot JSON is written.
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,
        /// RNG seed for the deal.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Configuration JSON to use instead of the built-in deck.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Replay a snapshot and print one observer's belief state.
    Replay {
        /// Snapshot JSON produced by `deal` (plus appended events).
        snapshot: PathBuf,
        /// Observer whose beliefs are reconstructed.
        #[arg(long, default_value_t = 0)]
        perspective: u8,
        /// Also print per-value copy counters.
        #[arg(long)]
        counts: bool,
    },
    /// Replay a snapshot and print call suggestions for the observer.
    Suggest {
        snapshot: PathBuf,
        #[arg(long, default_value_t = 0)]
        perspective: u8,
        /// Score two-slot double-chance attempts as well.
        #[arg(long)]
        double_chance: bool,
        /// Rank calls by simulated information gain (slower).
        #[arg(long)]
        entropy: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match Cli::parse().command {
        Command::Deal { out, seed, config } => deal(&out, seed, config.as_deref()),
        Command::Replay {
            snapshot,
            perspective,
            counts,
        } => replay(&snapshot, PlayerId(perspective), counts),
        Command::Suggest {
            snapshot,
            perspective,
            double_chance,
            entropy,
        } => suggest(&snapshot, PlayerId(perspective), double_chance, entropy),
    }
}

fn deal(out: &Path, seed: u64, config_path: Option<&Path>) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<GameConfig>(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    let layout = config.layout().context("validating configuration")?;

    let hands = deal_hands(&layout, seed);
    let snapshot = GameSnapshot::capture(config, &hands, EventLog::new());
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(out, snapshot.to_json()?)
        .with_context(|| format!("writing snapshot {}", out.display()))?;

    println!(
        "dealt {} hands of {} wires (seed {seed}) into {}",
        layout.players(),
        layout.hand_len(),
        out.display()
    );
    Ok(())
}

fn load_engine(path: &Path, perspective: PlayerId) -> Result<BeliefEngine> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot = GameSnapshot::from_json(&json)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    let engine = snapshot
        .restore(perspective)
        .with_context(|| format!("replaying {} events for {perspective}", snapshot.events.len()))?;
    info!(events = engine.log().len(), %perspective, "snapshot replayed");
    Ok(engine)
}

fn replay(path: &Path, perspective: PlayerId, counts: bool) -> Result<()> {
    let engine = load_engine(path, perspective)?;
    print!("{}", report::belief_table(&engine));
    if counts {
        print!("{}", report::value_counts_table(&engine));
    }
    println!("{}", report::status_line(&engine));
    Ok(())
}

fn suggest(path: &Path, perspective: PlayerId, double_chance: bool, entropy: bool) -> Result<()> {
    let mut engine = load_engine(path, perspective)?;

    let board = rank_calls(&engine);
    print!("{}", report::call_board(&board));

    if double_chance {
        let suggestions = double_chance_suggestions(&mut engine);
        print!("{}", report::double_chances(&suggestions, 10));
    }
    if entropy {
        let outcomes = EntropySuggester::new(&engine).ranked();
        print!("{}", report::entropy_outcomes(&outcomes, 10));
    }
    println!("{}", report::status_line(&engine));
    Ok(())
}
