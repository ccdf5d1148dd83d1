//! Builds a board and prints it as JSON.
//!
//! Environment:
//! - `BOARD_CONFIG`: path to a JSON board configuration (regulation board when unset)
//! - `BOARD_SEED`: seed for a reproducible board (random when unset)
//! - `RUST_LOG`: log filter, `info` by default

use anyhow::Context;
use catan_topology::{Board, BoardConfig, BoardSnapshot, PortSite};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Serialize)]
struct Report<'a> {
    seed: Option<u64>,
    ports: &'a [PortSite],
    board: BoardSnapshot,
}

fn load_config() -> anyhow::Result<BoardConfig> {
    let Ok(path) = std::env::var("BOARD_CONFIG") else {
        return Ok(BoardConfig::standard());
    };
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("reading board config {path}"))?;
    BoardConfig::from_json(&json).with_context(|| format!("parsing board config {path}"))
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;
    let seed = std::env::var("BOARD_SEED")
        .ok()
        .map(|s| s.parse::<u64>())
        .transpose()
        .context("BOARD_SEED must be an unsigned integer")?;

    let board = match seed {
        Some(seed) => Board::from_config(&config, &mut StdRng::seed_from_u64(seed)),
        None => Board::from_config(&config, &mut rand::thread_rng()),
    };
    board.verify()?;

    info!(
        tiles = board.tiles().len(),
        plots = board.plots().len(),
        paths = board.paths().len(),
        robber = %board.robber_position(),
        "board ready"
    );

    let report = Report {
        seed,
        ports: board.ports(),
        board: board.to_snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
