use std::time::Instant;

use super::table::{Bound, TableEntry, TranspositionTable, to_node_relative};
use super::{Evaluator, INFINITY, MAX_EVAL, SearchConfig, SearchStats, Searchable, win_score};
use crate::error::{GameError, SearchError};
use crate::game::GameResult;

/// Why a search stopped without a score.
#[derive(Debug)]
pub(super) enum Halt {
    Deadline,
    Failed(SearchError),
}

impl From<SearchError> for Halt {
    fn from(err: SearchError) -> Self {
        Self::Failed(err)
    }
}

impl From<GameError> for Halt {
    fn from(err: GameError) -> Self {
        Self::Failed(err.into())
    }
}

/// The deadline is looked at on the first node and then every this many
/// nodes.
const DEADLINE_CHECK_INTERVAL: u64 = 256;

/// State of one depth-first search over a single game instance.
pub(super) struct Negamax<'a, S: Searchable, E: ?Sized> {
    evaluator: &'a E,
    alpha_beta: bool,
    table: Option<TranspositionTable<S::Fingerprint, S::Move>>,
    deadline: Option<Instant>,
    pub(super) stats: SearchStats,
}

impl<'a, S, E> Negamax<'a, S, E>
where
    S: Searchable,
    E: Evaluator<S> + ?Sized,
{
    pub(super) fn new(evaluator: &'a E, config: &SearchConfig, deadline: Option<Instant>) -> Self {
        Self {
            evaluator,
            alpha_beta: config.alpha_beta,
            table: config.transposition_table.then(TranspositionTable::new),
            deadline,
            stats: SearchStats::default(),
        }
    }

    /// Plays `mv` at the root, searches the reply to `depth - 1` and takes the
    /// move back. Returns the score of `mv` for the player to move at the
    /// root; the search can stop early once it is clear the score is not
    /// above `alpha`.
    pub(super) fn root_move(
        &mut self,
        state: &mut S,
        mv: S::Move,
        depth: usize,
        alpha: i32,
    ) -> Result<i32, Halt> {
        let status = state.apply(mv)?;
        let beta = if self.alpha_beta { -alpha } else { INFINITY };
        let child = self.negamax(state, status, depth - 1, 1, -INFINITY, beta);
        state.undo(mv)?;
        Ok(-child?)
    }

    /// Score of the position for the player to move. `status` is the result
    /// of the move that led here, `ply` the distance to the root.
    fn negamax(
        &mut self,
        state: &mut S,
        status: GameResult,
        depth: usize,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, Halt> {
        self.stats.nodes += 1;
        if self.stats.nodes % DEADLINE_CHECK_INTERVAL == 1
            && self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
        {
            return Err(Halt::Deadline);
        }

        // We start with the recursion tail: Can we stop the recursion?
        match status {
            // The player who moved last won: a late loss is less bad.
            GameResult::Win(_) => return Ok(-win_score(ply)),
            GameResult::Draw => return Ok(0),
            GameResult::InProgress => {}
        }
        if depth == 0 {
            return Ok(self.evaluator.evaluate(state).clamp(-MAX_EVAL, MAX_EVAL));
        }

        let key = self.table.as_ref().map(|_| state.fingerprint());
        if let (Some(table), Some(key)) = (&self.table, &key) {
            let hit = table
                .probe(key)
                .and_then(|entry| entry.usable_score(ply, depth, alpha, beta));
            if let Some(score) = hit {
                self.stats.table_hits += 1;
                return Ok(score);
            }
        }

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for mv in state.legal_moves() {
            let status = state.apply(mv)?;
            let (child_alpha, child_beta) = if self.alpha_beta {
                (-beta, -alpha)
            } else {
                (-INFINITY, INFINITY)
            };
            let child = self.negamax(state, status, depth - 1, ply + 1, child_alpha, child_beta);
            // undo before looking at the result, the caller gets its state back
            // also when the search halts
            state.undo(mv)?;
            let score = -child?;

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }

            if self.alpha_beta {
                alpha = alpha.max(best_score);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
        }

        if best_move.is_none() {
            return Err(SearchError::NoLegalMoves.into());
        }

        if let (Some(table), Some(key)) = (&mut self.table, key) {
            let bound = if best_score <= alpha_orig {
                Bound::Upper
            } else if best_score >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            table.store(
                key,
                TableEntry {
                    depth,
                    score: to_node_relative(best_score, ply),
                    best_move,
                    bound,
                },
            );
        }

        Ok(best_score)
    }
}
