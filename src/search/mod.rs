//! Adversarial search: negamax with alpha-beta pruning and a transposition
//! table, generic over any two-player game implementing [`Searchable`].

mod negamax;
pub mod table;

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::AddAssign;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{GameError, SearchError};
use crate::game::GameResult;
use self::negamax::{Halt, Negamax};

/// Score of a position that is won right now. Wins further away score less,
/// see [`win_score`].
pub const WIN_SCORE: i32 = 1_000_000;

/// Scores beyond this magnitude are wins or losses.
pub(crate) const WIN_THRESHOLD: i32 = WIN_SCORE / 2;

/// Bound of the search window. Negation is safe, unlike `i32::MIN`.
pub(crate) const INFINITY: i32 = i32::MAX;

/// Scores of evaluators are clamped into `-MAX_EVAL..=MAX_EVAL` so they never
/// look like a win.
pub const MAX_EVAL: i32 = WIN_THRESHOLD - 1;

/// Score of the player to move at the root when the game is won `plies`
/// moves from now. `win_score(1)` is an immediate win.
#[must_use]
pub const fn win_score(plies: usize) -> i32 {
    WIN_SCORE - plies as i32
}

/// What the search needs from a game. Moves are played and taken back on one
/// instance; every `apply` is undone in reverse order before the search
/// returns.
pub trait Searchable: Clone + Send + Sync {
    type Move: Copy + Eq + Debug + Send + Sync;
    /// Exact encoding of the position including the player to move.
    type Fingerprint: Hash + Eq + Send;

    /// Legal moves in the order the search tries them.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Plays `mv` for the player to move and returns the result afterwards.
    fn apply(&mut self, mv: Self::Move) -> Result<GameResult, GameError>;

    /// Takes back `mv`, which must be the last applied move.
    fn undo(&mut self, mv: Self::Move) -> Result<(), GameError>;

    fn result(&self) -> GameResult;

    fn fingerprint(&self) -> Self::Fingerprint;
}

/// Scores a position where the search stops before the game is over, from
/// the perspective of the player to move.
pub trait Evaluator<S: ?Sized>: Sync {
    fn evaluate(&self, state: &S) -> i32;
}

impl<S: ?Sized, F> Evaluator<S> for F
where
    F: Fn(&S) -> i32 + Sync,
{
    fn evaluate(&self, state: &S) -> i32 {
        self(state)
    }
}

/// Scores every unfinished position with 0, so only wins and losses within
/// the search depth count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroEvaluator;

impl<S: ?Sized> Evaluator<S> for ZeroEvaluator {
    fn evaluate(&self, _state: &S) -> i32 {
        0
    }
}

/// Knobs of the [`SearchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of plies to look ahead. At least one ply is always searched.
    pub max_depth: usize,
    /// Cut off branches that cannot change the result.
    pub alpha_beta: bool,
    /// Reuse results of positions reached through different move orders.
    pub transposition_table: bool,
    /// Search the moves of the root in parallel, each on its own copy of the
    /// game.
    pub parallel: bool,
    /// Search with increasing depth and return the result of the deepest
    /// completed depth once the time is up.
    pub deadline: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            alpha_beta: true,
            transposition_table: true,
            parallel: false,
            deadline: None,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_alpha_beta(mut self, alpha_beta: bool) -> Self {
        self.alpha_beta = alpha_beta;
        self
    }

    #[must_use]
    pub const fn with_transposition_table(mut self, transposition_table: bool) -> Self {
        self.transposition_table = transposition_table;
        self
    }

    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Plain minimax: no pruning, no table.
    #[must_use]
    pub const fn exhaustive(max_depth: usize) -> Self {
        Self {
            max_depth,
            alpha_beta: false,
            transposition_table: false,
            parallel: false,
            deadline: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Visited positions, including the root moves.
    pub nodes: u64,
    /// Nodes left early because of an alpha-beta cutoff.
    pub cutoffs: u64,
    /// Nodes answered from the transposition table.
    pub table_hits: u64,
    /// Deepest fully searched depth.
    pub completed_depth: usize,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.nodes += rhs.nodes;
        self.cutoffs += rhs.cutoffs;
        self.table_hits += rhs.table_hits;
        self.completed_depth = self.completed_depth.max(rhs.completed_depth);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome<M> {
    pub best_move: M,
    /// Score of `best_move` for the player to move.
    pub score: i32,
    pub stats: SearchStats,
}

/// Chooses moves by negamax search. The engine keeps no state between
/// calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchEngine {
    config: SearchConfig,
}

/// Searches `state` with the default configuration to `max_depth` plies.
pub fn choose_move<S, E>(
    state: &mut S,
    max_depth: usize,
    evaluator: &E,
) -> Result<SearchOutcome<S::Move>, SearchError>
where
    S: Searchable,
    E: Evaluator<S> + ?Sized,
{
    SearchEngine::new(SearchConfig::default().with_max_depth(max_depth))
        .choose_move(state, evaluator)
}

impl SearchEngine {
    #[must_use]
    pub const fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the best move for the player to move in `state` and its score.
    ///
    /// Among equally scored moves the first one in [`Searchable::legal_moves`]
    /// order wins. `state` is used as scratch space and is back in its
    /// original position when this returns, also on error.
    pub fn choose_move<S, E>(
        &self,
        state: &mut S,
        evaluator: &E,
    ) -> Result<SearchOutcome<S::Move>, SearchError>
    where
        S: Searchable,
        E: Evaluator<S> + ?Sized,
    {
        let result = state.result();
        if result.is_terminal() {
            return Err(SearchError::TerminalState(result));
        }
        let moves = state.legal_moves();
        let Some(&first_move) = moves.first() else {
            return Err(SearchError::NoLegalMoves);
        };

        let max_depth = self.config.max_depth.max(1);
        let deadline = self.config.deadline.map(|budget| Instant::now() + budget);
        // iterative deepening only pays off when the search may be cut short
        let first_depth = if deadline.is_some() { 1 } else { max_depth };

        let mut stats = SearchStats::default();
        let mut best = None;
        for depth in first_depth..=max_depth {
            match self.search_root(state, &moves, depth, evaluator, deadline) {
                Ok(outcome) => {
                    tracing::debug!(
                        depth,
                        score = outcome.score,
                        best_move = ?outcome.best_move,
                        nodes = outcome.stats.nodes,
                        "completed depth"
                    );
                    stats += outcome.stats;
                    best = Some(outcome);
                }
                Err(Halt::Deadline) => break,
                Err(Halt::Failed(err)) => return Err(err),
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                break;
            }
        }

        let outcome = match best {
            Some(outcome) => SearchOutcome { stats, ..outcome },
            None => {
                tracing::warn!(
                    ?first_move,
                    "deadline passed before depth 1 completed, playing first legal move"
                );
                SearchOutcome {
                    best_move: first_move,
                    score: 0,
                    stats,
                }
            }
        };

        tracing::debug!(
            best_move = ?outcome.best_move,
            score = outcome.score,
            depth = outcome.stats.completed_depth,
            nodes = outcome.stats.nodes,
            cutoffs = outcome.stats.cutoffs,
            table_hits = outcome.stats.table_hits,
            "search finished"
        );
        Ok(outcome)
    }

    fn search_root<S, E>(
        &self,
        state: &mut S,
        moves: &[S::Move],
        depth: usize,
        evaluator: &E,
        deadline: Option<Instant>,
    ) -> Result<SearchOutcome<S::Move>, Halt>
    where
        S: Searchable,
        E: Evaluator<S> + ?Sized,
    {
        let (best, mut stats) = if self.config.parallel {
            let root: &S = state;
            let results = moves
                .par_iter()
                .map(|&mv| {
                    let mut state = root.clone();
                    let mut search = Negamax::new(evaluator, &self.config, deadline);
                    let score = search.root_move(&mut state, mv, depth, -INFINITY)?;
                    Ok((mv, score, search.stats))
                })
                .collect::<Vec<Result<_, Halt>>>();

            let mut best: Option<(S::Move, i32)> = None;
            let mut stats = SearchStats::default();
            for result in results {
                let (mv, score, branch_stats) = result?;
                stats += branch_stats;
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((mv, score));
                }
            }
            (best, stats)
        } else {
            let mut search = Negamax::new(evaluator, &self.config, deadline);
            let mut best: Option<(S::Move, i32)> = None;
            let mut alpha = -INFINITY;
            for &mv in moves {
                let score = search.root_move(state, mv, depth, alpha)?;
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((mv, score));
                }
                if self.config.alpha_beta {
                    alpha = alpha.max(score);
                }
            }
            (best, search.stats)
        };

        let (best_move, score) = best.ok_or(Halt::Failed(SearchError::NoLegalMoves))?;
        stats.completed_depth = depth;
        Ok(SearchOutcome {
            best_move,
            score,
            stats,
        })
    }
}
