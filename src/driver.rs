//! Turn loop of a game between two move sources, e.g., a human front end and
//! the [`SearchEngine`].

use std::collections::VecDeque;

use crate::board::Player;
use crate::error::{DriverError, GameError};
use crate::game::{GameResult, GameState};
use crate::search::{Evaluator, SearchEngine};

/// Anything that picks a column for the player to move.
pub trait MoveSource {
    /// Name for log output.
    fn name(&self) -> &str;

    /// Picks a column. Returning `Ok(None)` means the source has no more
    /// moves to offer.
    fn next_move(&mut self, state: &GameState) -> Result<Option<usize>, DriverError>;
}

/// Moves chosen by the [`SearchEngine`].
#[derive(Debug, Clone)]
pub struct EngineMoves<E> {
    engine: SearchEngine,
    evaluator: E,
}

impl<E: Evaluator<GameState>> EngineMoves<E> {
    #[must_use]
    pub const fn new(engine: SearchEngine, evaluator: E) -> Self {
        Self { engine, evaluator }
    }
}

impl<E: Evaluator<GameState>> MoveSource for EngineMoves<E> {
    fn name(&self) -> &str {
        "engine"
    }

    fn next_move(&mut self, state: &GameState) -> Result<Option<usize>, DriverError> {
        let mut scratch = state.clone();
        let outcome = self.engine.choose_move(&mut scratch, &self.evaluator)?;
        tracing::debug!(
            column = outcome.best_move,
            score = outcome.score,
            depth = outcome.stats.completed_depth,
            "engine picked a move"
        );
        Ok(Some(outcome.best_move))
    }
}

/// A fixed list of columns, played in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    moves: VecDeque<usize>,
}

impl ScriptedMoves {
    pub fn new(moves: impl IntoIterator<Item = usize>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }
}

impl MoveSource for ScriptedMoves {
    fn name(&self) -> &str {
        "script"
    }

    fn next_move(&mut self, _state: &GameState) -> Result<Option<usize>, DriverError> {
        Ok(self.moves.pop_front())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Illegal moves in a row a source may propose before the game is
    /// aborted.
    pub max_rejections: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { max_rejections: 3 }
    }
}

/// Plays a game to its end, alternating between two [`MoveSource`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameDriver {
    config: DriverConfig,
}

impl GameDriver {
    #[must_use]
    pub const fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Continues `state` until it is over and returns the result. `first`
    /// moves for [`Player::First`], `second` for [`Player::Second`].
    ///
    /// Illegal moves are rejected and the same source is asked again.
    pub fn play(
        &self,
        state: &mut GameState,
        first: &mut dyn MoveSource,
        second: &mut dyn MoveSource,
    ) -> Result<GameResult, DriverError> {
        let mut result = state.status();
        while !result.is_terminal() {
            let player = state.to_move();
            let source: &mut dyn MoveSource = match player {
                Player::First => &mut *first,
                Player::Second => &mut *second,
            };
            result = self.turn(state, player, source)?;
        }

        tracing::info!(%result, moves = state.moves_played(), "game over");
        Ok(result)
    }

    fn turn(
        &self,
        state: &mut GameState,
        player: Player,
        source: &mut dyn MoveSource,
    ) -> Result<GameResult, DriverError> {
        let mut rejections = 0;
        loop {
            let column = source
                .next_move(state)?
                .ok_or(DriverError::SourceExhausted { player })?;

            match state.apply(column) {
                Ok(result) => {
                    tracing::info!(%player, source = source.name(), column, "move played");
                    return Ok(result);
                }
                Err(err @ GameError::InvalidMove { .. }) => {
                    rejections += 1;
                    tracing::warn!(%player, source = source.name(), %err, "move rejected");
                    if rejections >= self.config.max_rejections {
                        return Err(DriverError::TooManyRejections { player, rejections });
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
