#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::must_use_candidate,
    // clippy::restriction,
    // clippy::pedantic
)]
// now allow a few rules which are denied by the above statement
// --> they are ridiculous and not necessary
#![allow(
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::fallible_impl_from,
    clippy::cargo_common_metadata
)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::all)]

//! Lets the computer play against itself and logs every move.
//!
//! Log output is controlled with `RUST_LOG`, e.g., `RUST_LOG=debug` also shows
//! the search statistics of every move.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use viergewinnt_engine::{
    EngineMoves, GameDriver, SearchConfig, SearchEngine, ZeroEvaluator, new_game,
};

#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, default_value_t = 6)]
    rows: usize,

    #[clap(short, long, default_value_t = 7)]
    cols: usize,

    /// Plies the first player looks ahead.
    #[clap(long, default_value_t = 6)]
    depth_first: usize,

    /// Plies the second player looks ahead.
    #[clap(long, default_value_t = 6)]
    depth_second: usize,

    /// Search the moves of the root on all cores.
    #[clap(short, long, action = clap::ArgAction::SetTrue)]
    parallel: bool,

    #[clap(long, action = clap::ArgAction::SetTrue)]
    no_table: bool,

    #[clap(long, action = clap::ArgAction::SetTrue)]
    no_pruning: bool,

    /// Thinking time per move; searches with increasing depth until it is
    /// used up.
    #[clap(long)]
    deadline_ms: Option<u64>,
}

impl Args {
    fn engine(&self, max_depth: usize) -> SearchEngine {
        SearchEngine::new(
            SearchConfig::default()
                .with_max_depth(max_depth)
                .with_alpha_beta(!self.no_pruning)
                .with_transposition_table(!self.no_table)
                .with_parallel(self.parallel)
                .with_deadline(self.deadline_ms.map(Duration::from_millis)),
        )
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut game = match new_game(args.rows, args.cols) {
        Ok(game) => game,
        Err(err) => {
            tracing::error!(%err, "cannot start game");
            return ExitCode::FAILURE;
        }
    };

    let mut first = EngineMoves::new(args.engine(args.depth_first), ZeroEvaluator);
    let mut second = EngineMoves::new(args.engine(args.depth_second), ZeroEvaluator);

    tracing::info!(
        rows = args.rows,
        cols = args.cols,
        "Let's play viergewinnt, computer against computer."
    );
    match GameDriver::default().play(&mut game, &mut first, &mut second) {
        Ok(result) => {
            tracing::info!(%result, "Gameover");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "game aborted");
            ExitCode::FAILURE
        }
    }
}
