//! Game board with column-drop semantics.

use std::fmt::{self, Display, Formatter};

use crate::error::GameboardError;
use crate::win::{self, Grid};

#[derive(Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub enum Player {
    First,
    Second,
}

impl Player {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first player"),
            Self::Second => f.write_str("second player"),
        }
    }
}

/// Content of a single slot: empty or owned by a player.
pub type Cell = Option<Player>;

/// Gameboard of `rows x cols` slots.
///
/// Technical indices correspond to the logical indices:
/// `(row=0, col=0)` is the bottom left of the game board.
#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Gameboard {
    rows: usize,
    cols: usize,
    /// Row-major, `cells[row * cols + col]`.
    cells: Vec<Cell>,
    /// Number of chips per column, which is also the next free row.
    heights: Vec<usize>,
}

impl Gameboard {
    /// Creates an empty board. Fails if a dimension is zero or the board
    /// does not fit into memory.
    pub fn new(rows: usize, cols: usize) -> Result<Self, crate::GameError> {
        let invalid = crate::GameError::InvalidDimensions { rows, cols };
        if rows == 0 || cols == 0 {
            return Err(invalid);
        }

        let cells = rows
            .checked_mul(cols)
            .and_then(|slots| filled(slots, None))
            .ok_or_else(|| invalid.clone())?;
        let heights = filled(cols, 0).ok_or(invalid)?;
        Ok(Self {
            rows,
            cols,
            cells,
            heights,
        })
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the content of a slot. Panics if the position is outside of
    /// the board.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col]
    }

    /// Number of chips in the given column, i.e., the index of its next free
    /// slot.
    #[must_use]
    pub fn column_height(&self, column: usize) -> usize {
        self.heights[column]
    }

    /// Returns the number of free slots in the given column.
    #[must_use]
    pub fn free_slots_in_column(&self, column: usize) -> usize {
        self.rows - self.heights[column]
    }

    /// Total number of chips on the board.
    #[must_use]
    pub fn chips(&self) -> usize {
        self.heights.iter().sum()
    }

    /// Emits the column indices where moves are legal, in ascending order.
    pub fn legal_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.cols).filter(|&col| self.heights[col] < self.rows)
    }

    /// Returns whether every column is filled up.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == self.rows)
    }

    fn check_column(&self, column: usize) -> Result<(), GameboardError> {
        if column >= self.cols {
            return Err(GameboardError::InvalidColumn {
                column,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Drops a chip of `player` into `column` and returns the row it landed
    /// in. The board is left untouched on error.
    pub fn drop(&mut self, column: usize, player: Player) -> Result<usize, GameboardError> {
        self.check_column(column)?;

        let row = self.heights[column];
        if row == self.rows {
            return Err(GameboardError::ColumnFull { column });
        }

        self.cells[row * self.cols + column] = Some(player);
        self.heights[column] += 1;
        Ok(row)
    }

    /// Takes the topmost chip out of `column` and returns its owner.
    ///
    /// This is the exact inverse of the most recent [`Self::drop`] into the
    /// same column.
    pub fn undo(&mut self, column: usize) -> Result<Player, GameboardError> {
        self.check_column(column)?;

        let row = self.heights[column]
            .checked_sub(1)
            .ok_or(GameboardError::EmptyColumn { column })?;
        let slot = &mut self.cells[row * self.cols + column];
        let owner = slot.take().ok_or(GameboardError::EmptyColumn { column })?;
        self.heights[column] = row;
        Ok(owner)
    }

    /// Checks for a line of four through the topmost chip of `column`, which
    /// is the chip placed by the last move into that column.
    #[must_use]
    pub fn has_line_of_four(&self, player: Player, column: usize) -> bool {
        match self.heights.get(column) {
            Some(&height) if height > 0 => {
                win::has_line_of_four(self, player, (height - 1, column))
            }
            _ => false,
        }
    }

    /// Check if `player` has a line of four anywhere on the board.
    #[must_use]
    pub fn check_for_winner(&self, player: Player) -> bool {
        win::check_for_winner(self, player)
    }

    /// Appends the encoding of one column to `key`: bit `row` is set for
    /// chips of [`Player::First`] and bit `height` marks the top. Every column
    /// takes `(rows + 1).div_ceil(64)` words.
    pub(crate) fn push_column_key(&self, column: usize, key: &mut Vec<u64>) {
        let start = key.len();
        key.resize(start + (self.rows + 1).div_ceil(KEY_WORD_BITS), 0);
        let mut set = |bit: usize| {
            key[start + bit / KEY_WORD_BITS] |= 1_u64 << (bit % KEY_WORD_BITS);
        };

        let height = self.heights[column];
        for row in 0..height {
            if self.cells[row * self.cols + column] == Some(Player::First) {
                set(row);
            }
        }
        set(height);
    }
}

const KEY_WORD_BITS: usize = u64::BITS as usize;

/// `vec![value; len]` that reports a failed allocation instead of aborting.
fn filled<T: Clone>(len: usize, value: T) -> Option<Vec<T>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len).ok()?;
    vec.resize(len, value);
    Some(vec)
}

impl Grid for Gameboard {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }
}
