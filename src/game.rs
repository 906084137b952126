//! Game logic: the state machine on top of the [`Gameboard`].

use std::fmt::{self, Display, Formatter};

use crate::board::{Gameboard, Player};
use crate::error::GameError;
use crate::search::Searchable;

/// The state of a game as observed after a move.
#[derive(Debug, PartialOrd, PartialEq, Clone, Copy, Eq, Hash)]
pub enum GameResult {
    /// Game continues.
    InProgress,
    /// Player won with the last insertion.
    Win(Player),
    /// The game field is full without a winner.
    Draw,
}

impl GameResult {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl Display for GameResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => f.write_str("in progress"),
            Self::Win(player) => write!(f, "{player} won"),
            Self::Draw => f.write_str("draw"),
        }
    }
}

/// Exact encoding of a position: the chips and height of every column plus
/// the player to move.
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Fingerprint {
    columns: Box<[u64]>,
    to_move: Player,
}

/// Game with all its state.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct GameState {
    board: Gameboard,
    to_move: Player,
    moves_played: usize,
    /// Result after the last move, kept in sync by `apply` and `undo`.
    status: GameResult,
    /// Columns played through [`GameState::apply`], most recent last.
    history: Vec<usize>,
}

/// Starts a game on an empty `rows x cols` board with [`Player::First`] to
/// move.
pub fn new_game(rows: usize, cols: usize) -> Result<GameState, GameError> {
    Ok(GameState::from_board(Gameboard::new(rows, cols)?, Player::First))
}

impl GameState {
    /// Continues a game from an arbitrary position.
    ///
    /// The move counter is taken from the board and the result is computed by
    /// scanning the whole board.
    #[must_use]
    pub fn from_board(board: Gameboard, to_move: Player) -> Self {
        let moves_played = board.chips();
        let status = scan_result(&board);
        Self {
            board,
            to_move,
            moves_played,
            status,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub const fn board(&self) -> &Gameboard {
        &self.board
    }

    #[must_use]
    pub const fn to_move(&self) -> Player {
        self.to_move
    }

    #[must_use]
    pub const fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Result after the last applied move, without looking at the board.
    #[must_use]
    pub const fn status(&self) -> GameResult {
        self.status
    }

    /// Columns that still have a free slot, in ascending order.
    ///
    /// This only looks at the board. Once the game is over [`Self::apply`]
    /// rejects every move with [`GameError::GameOver`].
    #[must_use]
    pub fn legal_moves(&self) -> Vec<usize> {
        self.board.legal_columns().collect()
    }

    /// Drops a chip of the player to move into `column` and hands the turn to
    /// the opponent.
    pub fn apply(&mut self, column: usize) -> Result<GameResult, GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver(self.status));
        }
        if column >= self.board.cols() || self.board.free_slots_in_column(column) == 0 {
            return Err(GameError::InvalidMove {
                column,
                legal: self.legal_moves(),
            });
        }

        let player = self.to_move;
        self.board.drop(column, player)?;
        self.moves_played += 1;
        self.to_move = player.opponent();
        self.history.push(column);

        self.status = if self.board.has_line_of_four(player, column) {
            GameResult::Win(player)
        } else if self.board.is_full() {
            GameResult::Draw
        } else {
            GameResult::InProgress
        };
        Ok(self.status)
    }

    /// Takes back the last move, which must have been played in `column`.
    pub fn undo(&mut self, column: usize) -> Result<(), GameError> {
        let last = self.history.last().copied();
        if last != Some(column) {
            return Err(GameError::UndoOutOfOrder { column, last });
        }

        self.board.undo(column)?;
        self.history.pop();
        self.moves_played -= 1;
        self.to_move = self.to_move.opponent();
        // moves are only applied to running games
        self.status = GameResult::InProgress;
        Ok(())
    }

    /// Recomputes the result from the board.
    #[must_use]
    pub fn result(&self) -> GameResult {
        scan_result(&self.board)
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        let mut columns = Vec::new();
        for col in 0..self.board.cols() {
            self.board.push_column_key(col, &mut columns);
        }
        Fingerprint {
            columns: columns.into_boxed_slice(),
            to_move: self.to_move,
        }
    }
}

fn scan_result(board: &Gameboard) -> GameResult {
    if board.check_for_winner(Player::First) {
        GameResult::Win(Player::First)
    } else if board.check_for_winner(Player::Second) {
        GameResult::Win(Player::Second)
    } else if board.is_full() {
        GameResult::Draw
    } else {
        GameResult::InProgress
    }
}

impl Searchable for GameState {
    type Move = usize;
    type Fingerprint = Fingerprint;

    fn legal_moves(&self) -> Vec<usize> {
        Self::legal_moves(self)
    }

    fn apply(&mut self, mv: usize) -> Result<GameResult, GameError> {
        Self::apply(self, mv)
    }

    fn undo(&mut self, mv: usize) -> Result<(), GameError> {
        Self::undo(self, mv)
    }

    fn result(&self) -> GameResult {
        Self::result(self)
    }

    fn fingerprint(&self) -> Fingerprint {
        Self::fingerprint(self)
    }
}


#[cfg(test)]
pub(crate) mod property_tests {
    use super::*;
    use proptest::prelude::*;

    /// Plays the given columns, skipping illegal ones, until the game ends.
    pub(crate) fn arbitrary_game(
        rows: usize,
        cols: usize,
        max_moves: usize,
    ) -> impl Strategy<Value = GameState> {
        prop::collection::vec(0..cols, 0..max_moves).prop_map(move |columns| {
            let mut state = new_game(rows, cols).unwrap();
            for col in columns {
                if state.status().is_terminal() {
                    break;
                }
                let _ = state.apply(col);
            }
            state
        })
    }

    proptest! {
        #[test]
        fn prop_legal_moves_match_free_columns(state in arbitrary_game(6, 7, 42)) {
            let legal = state.legal_moves();
            for col in 0..state.board().cols() {
                let free = state.board().free_slots_in_column(col) > 0;
                prop_assert_eq!(legal.contains(&col), free);
            }
            for col in legal {
                let mut next = state.clone();
                prop_assert_eq!(next.apply(col).is_ok(), !state.status().is_terminal());
            }
        }

        #[test]
        fn prop_apply_undo_round_trip(state in arbitrary_game(6, 7, 42)) {
            prop_assume!(!state.status().is_terminal());
            for col in state.legal_moves() {
                let mut next = state.clone();
                next.apply(col).unwrap();
                next.undo(col).unwrap();
                prop_assert_eq!(&next, &state);
            }
        }

        #[test]
        fn prop_invariants_hold(state in arbitrary_game(5, 6, 30)) {
            let board = state.board();
            prop_assert_eq!(state.moves_played(), board.chips());
            let expected_to_move = if state.moves_played() % 2 == 0 { Player::First } else { Player::Second };
            prop_assert_eq!(state.to_move(), expected_to_move);
            prop_assert_eq!(state.status(), state.result());
            for col in 0..board.cols() {
                for row in 0..board.rows() {
                    prop_assert_eq!(board.cell(row, col).is_some(), row < board.column_height(col));
                }
            }
        }
    }
}
