//! Detection of four chips of one player in a row.

use crate::board::{Cell, Player};

/// Number of coins in a row to win the game.
pub const SERIES_LEN: usize = 4;

/// Directions `(d_row, d_col)` of a line; the opposite direction is walked as
/// well.
const DIRECTIONS: [(isize, isize); 4] = [
    // horizontal
    (0, 1),
    // vertical
    (1, 0),
    // diagonal (`/`)
    (1, 1),
    // diagonal (`\`)
    (-1, 1),
];

/// Read access to a rectangular grid of cells, `(row=0, col=0)` being the
/// bottom left.
///
/// The win checks only need to look at cells, so they also work on grids that
/// never went through column drops.
pub trait Grid {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn cell(&self, row: usize, col: usize) -> Cell;
}

/// Walks from `(row, col)` in direction `(d_row, d_col)` and counts the chips
/// of `player`, excluding the start cell.
fn count_direction<G: Grid + ?Sized>(
    grid: &G,
    player: Player,
    (row, col): (usize, usize),
    (d_row, d_col): (isize, isize),
) -> usize {
    let mut count = 0;
    let mut row = row as isize + d_row;
    let mut col = col as isize + d_col;

    while count < SERIES_LEN - 1
        && (0..grid.rows() as isize).contains(&row)
        && (0..grid.cols() as isize).contains(&col)
        && grid.cell(row as usize, col as usize) == Some(player)
    {
        count += 1;
        row += d_row;
        col += d_col;
    }

    count
}

/// Checks whether the chip at `last_move = (row, col)` belongs to `player`
/// and is part of a line of four.
///
/// Only the four lines through `last_move` are inspected. This is enough
/// right after a move, as no other line can have changed.
#[must_use]
pub fn has_line_of_four<G: Grid + ?Sized>(
    grid: &G,
    player: Player,
    last_move: (usize, usize),
) -> bool {
    let (row, col) = last_move;
    if row >= grid.rows() || col >= grid.cols() || grid.cell(row, col) != Some(player) {
        return false;
    }

    DIRECTIONS.iter().any(|&(d_row, d_col)| {
        1 + count_direction(grid, player, last_move, (d_row, d_col))
            + count_direction(grid, player, last_move, (-d_row, -d_col))
            >= SERIES_LEN
    })
}

/// Check if there is a line of four of `player` anywhere on the grid.
#[must_use]
pub fn check_for_winner<G: Grid + ?Sized>(grid: &G, player: Player) -> bool {
    (0..grid.rows()).any(|row| {
        (0..grid.cols()).any(|col| {
            grid.cell(row, col) == Some(player)
                && DIRECTIONS.iter().any(|&direction| {
                    count_direction(grid, player, (row, col), direction) >= SERIES_LEN - 1
                })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain grid without gravity, indexed like the gameboard.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(super) struct TestGrid {
        pub rows: usize,
        pub cols: usize,
        pub cells: Vec<Cell>,
    }

    impl TestGrid {
        pub fn new(rows: usize, cols: usize) -> Self {
            Self {
                rows,
                cols,
                cells: vec![None; rows * cols],
            }
        }

        pub fn set(&mut self, row: usize, col: usize, player: Player) {
            self.cells[row * self.cols + col] = Some(player);
        }

        pub fn rotated(&self) -> Self {
            let mut cells = self.cells.clone();
            cells.reverse();
            Self {
                rows: self.rows,
                cols: self.cols,
                cells,
            }
        }

        pub fn swapped(&self) -> Self {
            Self {
                rows: self.rows,
                cols: self.cols,
                cells: self.cells.iter().map(|c| c.map(Player::opponent)).collect(),
            }
        }
    }

    impl Grid for TestGrid {
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

    fn grid_with(rows: usize, cols: usize, chips: &[(usize, usize)]) -> TestGrid {
        let mut grid = TestGrid::new(rows, cols);
        for &(row, col) in chips {
            grid.set(row, col, Player::First);
        }
        grid
    }

    #[test]
    fn find_winner_horizontally() {
        let mut grid = grid_with(6, 7, &[(4, 0), (4, 1), (4, 2)]);
        assert!(!check_for_winner(&grid, Player::First));
        assert!(!has_line_of_four(&grid, Player::First, (4, 2)));

        grid.set(4, 3, Player::First);
        assert!(check_for_winner(&grid, Player::First));
        assert!(!check_for_winner(&grid, Player::Second));
        for col in 0..4 {
            assert!(has_line_of_four(&grid, Player::First, (4, col)));
            assert!(!has_line_of_four(&grid, Player::Second, (4, col)));
        }

        let grid = grid_with(4, 4, &[(0, 0), (0, 1), (0, 2), (0, 3)]);
        assert!(check_for_winner(&grid, Player::First));
        assert!(has_line_of_four(&grid, Player::First, (0, 1)));
    }

    #[test]
    fn find_winner_vertically() {
        let mut grid = grid_with(6, 7, &[(0, 5), (1, 5), (2, 5)]);
        assert!(!check_for_winner(&grid, Player::First));

        grid.set(3, 5, Player::First);
        assert!(check_for_winner(&grid, Player::First));
        assert!(has_line_of_four(&grid, Player::First, (3, 5)));
        assert!(has_line_of_four(&grid, Player::First, (0, 5)));
        assert!(!check_for_winner(&grid, Player::Second));
    }

    #[test]
    fn find_winner_diagonally() {
        // direction=/, gap
        {
            let grid = grid_with(6, 7, &[(0, 0), (1, 1), (2, 2), (4, 3)]);
            assert!(!check_for_winner(&grid, Player::First));
            assert!(!has_line_of_four(&grid, Player::First, (4, 3)));
        }
        // direction=/, winner=yes
        {
            let grid = grid_with(6, 7, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
            assert!(check_for_winner(&grid, Player::First));
            assert!(has_line_of_four(&grid, Player::First, (3, 3)));
        }
        // direction=/, touching the right edge
        {
            let grid = grid_with(6, 7, &[(0, 3), (1, 4), (2, 5), (3, 6)]);
            assert!(check_for_winner(&grid, Player::First));
            assert!(has_line_of_four(&grid, Player::First, (1, 4)));
        }
        // direction=\
        {
            let grid = grid_with(6, 7, &[(4, 3), (3, 4), (2, 5), (1, 6)]);
            assert!(check_for_winner(&grid, Player::First));
            assert!(has_line_of_four(&grid, Player::First, (1, 6)));
        }
        // direction=\, 4x4
        {
            let grid = grid_with(4, 4, &[(0, 3), (1, 2), (2, 1), (3, 0)]);
            assert!(check_for_winner(&grid, Player::First));
            assert!(has_line_of_four(&grid, Player::First, (2, 1)));
        }
    }

    #[test]
    fn no_line_on_boards_too_small_in_a_direction() {
        // 3 rows: neither vertical nor diagonal lines fit
        let grid = grid_with(3, 7, &[(0, 0), (1, 0), (2, 0), (1, 1), (2, 2)]);
        assert!(!check_for_winner(&grid, Player::First));
        assert!(!has_line_of_four(&grid, Player::First, (2, 0)));

        let grid = grid_with(3, 7, &[(2, 2), (2, 3), (2, 4), (2, 5)]);
        assert!(check_for_winner(&grid, Player::First));
        assert!(has_line_of_four(&grid, Player::First, (2, 5)));
    }

    #[test]
    fn out_of_bounds_or_foreign_chip_is_no_line() {
        let grid = grid_with(4, 4, &[(0, 0), (0, 1), (0, 2), (0, 3)]);
        assert!(!has_line_of_four(&grid, Player::First, (4, 0)));
        assert!(!has_line_of_four(&grid, Player::First, (0, 4)));
        assert!(!has_line_of_four(&grid, Player::First, (1, 0)));
    }

    #[test]
    fn rotated_and_swapped_grids() {
        let mut grid = grid_with(6, 7, &[(0, 3), (1, 4), (2, 5), (3, 6)]);
        grid.set(0, 0, Player::Second);

        let rotated = grid.rotated();
        assert!(has_line_of_four(&rotated, Player::First, (5, 3)));
        assert_eq!(rotated.cell(5, 6), Some(Player::Second));

        let swapped = grid.swapped();
        assert!(check_for_winner(&swapped, Player::Second));
        assert!(!check_for_winner(&swapped, Player::First));
    }
}
