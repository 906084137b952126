//! _Vier gewinnt_, also known as _Connect Four_: a [`Gameboard`] with
//! column-drop semantics, the [`GameState`] state machine on top of it and a
//! [`SearchEngine`] that picks moves for a computer opponent.
//!
//! The search is a depth-limited negamax with alpha-beta pruning and a
//! transposition table. It works on any game implementing [`Searchable`] and
//! plays moves forward and back on one instance instead of cloning the board
//! for every branch.
//!
//! ```
//! use viergewinnt_engine::{ZeroEvaluator, choose_move, new_game};
//!
//! let mut game = new_game(6, 7).unwrap();
//! for column in [0, 0, 1, 1, 2, 2] {
//!     game.apply(column).unwrap();
//! }
//! let outcome = choose_move(&mut game, 4, &ZeroEvaluator).unwrap();
//! assert_eq!(outcome.best_move, 3);
//! ```

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

pub mod board;
pub mod driver;
pub mod error;
pub mod game;
pub mod search;
pub mod win;

pub use board::{Cell, Gameboard, Player};
pub use driver::{DriverConfig, EngineMoves, GameDriver, MoveSource, ScriptedMoves};
pub use error::{DriverError, GameError, GameboardError, SearchError};
pub use game::{Fingerprint, GameResult, GameState, new_game};
pub use search::{
    Evaluator, SearchConfig, SearchEngine, SearchOutcome, SearchStats, Searchable, WIN_SCORE,
    ZeroEvaluator, choose_move, win_score,
};
