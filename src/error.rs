//! Error types of the board, the game state machine, the search and the
//! driver loop.

use crate::board::Player;
use crate::game::GameResult;

/// Violated preconditions of a single [`crate::Gameboard`] operation.
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy, Eq, thiserror::Error)]
pub enum GameboardError {
    #[error("column {column} does not exist (board has {cols} columns)")]
    InvalidColumn { column: usize, cols: usize },

    /// Column is full.
    #[error("column {column} is full")]
    ColumnFull { column: usize },

    /// Nothing to take back from this column.
    #[error("column {column} is empty")]
    EmptyColumn { column: usize },
}

/// Errors of the [`crate::GameState`] state machine.
#[derive(Debug, PartialEq, Clone, Eq, thiserror::Error)]
pub enum GameError {
    #[error("a {rows}x{cols} board is not supported")]
    InvalidDimensions { rows: usize, cols: usize },

    /// The column is out of range or full. Recoverable: ask for another move.
    #[error("column {column} is not a legal move (legal: {legal:?})")]
    InvalidMove { column: usize, legal: Vec<usize> },

    #[error("game is already over: {0}")]
    GameOver(GameResult),

    #[error("undo of column {column} does not match the last move ({last:?})")]
    UndoOutOfOrder { column: usize, last: Option<usize> },

    #[error(transparent)]
    Board(#[from] GameboardError),
}

/// Errors of [`crate::SearchEngine::choose_move`]. All of them signal a
/// broken precondition on the caller's side.
#[derive(Debug, PartialEq, Clone, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search started on a finished game: {0}")]
    TerminalState(GameResult),

    #[error("game is in progress but has no legal moves")]
    NoLegalMoves,

    #[error(transparent)]
    Game(#[from] GameError),
}

/// Errors of the [`crate::GameDriver`] turn loop.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{player} gave {rejections} illegal moves in a row")]
    TooManyRejections { player: Player, rejections: usize },

    #[error("move source of {player} has no more moves")]
    SourceExhausted { player: Player },

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Game(#[from] GameError),
}
