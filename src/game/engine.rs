use std::num::NonZeroUsize;
use std::time::Duration;

use log::warn;
#[cfg(feature = "instrumentation")]
use tracing::instrument;
use thiserror::Error;

use crate::alpha_beta_searcher::{
    Clock, CpuClock, Deadline, SearchConfig, SearchContext, SearchDecision, SearchError,
    SearchStats, DEFAULT_TIME_BUDGET,
};
use crate::board::{Board, Move};
use crate::evaluate::{HeuristicEvaluator, HeuristicWeights};
use crate::tile_search::search_best_move;

/// Engine configuration, fixed for the lifetime of an engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// CPU time allowed per decision.
    pub time_budget: Duration,
    /// Optional cap on the iterative deepening depth.
    pub max_depth: Option<u8>,
    pub pruning: bool,
    /// `None` keeps every evaluated board; `Some(n)` keeps the `n` most recently used.
    pub cache_capacity: Option<NonZeroUsize>,
    pub weights: HeuristicWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            max_depth: None,
            pruning: true,
            cache_capacity: None,
            weights: HeuristicWeights::default(),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("Search error: {error:?}")]
    SearchError { error: SearchError },
    #[error("Engine is playing a {expected}x{expected} board, got {found}x{found}")]
    BoardSizeChanged { expected: usize, found: usize },
}

impl From<SearchError> for EngineError {
    fn from(error: SearchError) -> Self {
        EngineError::SearchError { error }
    }
}

/// Picks moves for one game session. The evaluation cache lives as long as
/// the engine, so reuse one engine for every move of a game.
pub struct Engine<C: Clock = CpuClock> {
    context: SearchContext<C>,
    evaluator: HeuristicEvaluator,
    board_size: Option<usize>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_clock(config, CpuClock::default())
    }
}

impl<C: Clock> Engine<C> {
    pub fn with_clock(config: EngineConfig, clock: C) -> Self {
        let search_config = SearchConfig {
            max_depth: config.max_depth,
            pruning: config.pruning,
        };
        Self {
            context: SearchContext::new(search_config, Deadline::new(clock, config.time_budget)),
            evaluator: HeuristicEvaluator::new(config.weights, config.cache_capacity),
            board_size: None,
        }
    }

    /// Returns the best move found within the time budget.
    ///
    /// When the board has no legal move this returns `Move::default()` without
    /// searching. When the budget runs out before depth 1 completes, it returns
    /// the first available move.
    #[cfg_attr(feature = "instrumentation", instrument(skip_all))]
    pub fn decide(&mut self, board: &Board) -> Move {
        match self.search(board) {
            Ok(decision) => decision.best_move,
            Err(EngineError::SearchError {
                error: SearchError::NoAvailableMoves,
            }) => Move::default(),
            Err(error) => {
                warn!("{}, falling back to the first available move", error);
                board.available_moves().first().copied().unwrap_or_default()
            }
        }
    }

    /// Like `decide`, but reports the depth, utility and fallback status, and
    /// fails when there is nothing to search.
    pub fn search(&mut self, board: &Board) -> Result<SearchDecision<Move>, EngineError> {
        match self.board_size {
            Some(expected) if expected != board.size() => {
                return Err(EngineError::BoardSizeChanged {
                    expected,
                    found: board.size(),
                })
            }
            _ => self.board_size = Some(board.size()),
        }

        Ok(search_best_move(
            &mut self.context,
            &mut self.evaluator,
            board,
        )?)
    }

    /// Statistics of the last `decide`/`search` call.
    pub fn last_stats(&self) -> &SearchStats {
        self.context.stats()
    }

    pub fn evaluator(&self) -> &HeuristicEvaluator {
        &self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alpha_beta_searcher::{FrozenClock, TickClock};
    use crate::tile_grid;

    fn tick_engine(config: EngineConfig) -> Engine<TickClock> {
        Engine::with_clock(config, TickClock::new(Duration::from_micros(1)))
    }

    #[test]
    fn test_decide_returns_available_move() {
        let board = tile_grid! {
            2 4 8 16
            0 0 0 0
            0 2 0 0
            0 0 0 0
        };
        let mut engine = tick_engine(EngineConfig::default());
        let mv = engine.decide(&board);
        assert!(board.available_moves().contains(&mv));
        assert!(engine.last_stats().completed_depth >= 1);
    }

    #[test]
    fn test_decide_without_moves_returns_default() {
        let board = tile_grid! {
            2 4 2 4
            4 2 4 2
            2 4 2 4
            4 2 4 2
        };
        let mut engine = tick_engine(EngineConfig::default());
        assert_eq!(engine.decide(&board), Move::default());
        assert_eq!(engine.last_stats().positions_searched(), 0);
        assert_eq!(engine.last_stats().deadline_polls, 0);
        assert_eq!(
            engine.search(&board),
            Err(EngineError::SearchError {
                error: SearchError::NoAvailableMoves
            })
        );
    }

    #[test]
    fn test_stats_are_cleared_when_a_later_board_has_no_moves() {
        let mut engine = tick_engine(EngineConfig {
            max_depth: Some(2),
            ..EngineConfig::default()
        });
        let open = tile_grid! {
            2 0
            0 4
        };
        let locked = tile_grid! {
            2 4
            4 2
        };

        engine.decide(&open);
        assert!(engine.last_stats().positions_searched() > 0);
        assert_eq!(engine.last_stats().completed_depth, 2);

        assert_eq!(engine.decide(&locked), Move::default());
        assert_eq!(engine.last_stats(), &SearchStats::default());
    }

    #[test]
    fn test_decide_on_largest_tiles_does_not_overflow() {
        let board: Board = "2147483648,2147483648/0,0".parse().unwrap();
        let mut engine = tick_engine(EngineConfig {
            max_depth: Some(1),
            ..EngineConfig::default()
        });
        assert_eq!(engine.decide(&board), Move::Down);
        assert_eq!(engine.last_stats().completed_depth, 1);
    }

    #[test]
    fn test_decide_with_no_time_returns_first_available_move() {
        let board = tile_grid! {
            2 4 8 16
            0 0 0 0
            0 0 0 0
            0 0 0 0
        };
        let mut engine = Engine::with_clock(EngineConfig::default(), FrozenClock);
        assert_eq!(engine.decide(&board), Move::Down);
        assert!(engine.last_stats().fallback);
        assert_eq!(engine.evaluator().computed(), 0);
    }

    #[test]
    fn test_decide_never_mutates_the_board() {
        let board = tile_grid! {
            2 2 4 0
            0 4 0 0
            0 0 8 0
            2 0 0 0
        };
        let before = board.clone();
        let mut engine = tick_engine(EngineConfig::default());
        engine.decide(&board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_cache_persists_across_decisions() {
        let board = tile_grid! {
            2 4 8 16
            0 0 0 0
            0 2 0 0
            0 0 0 0
        };
        let config = EngineConfig {
            max_depth: Some(2),
            ..EngineConfig::default()
        };
        let mut engine = tick_engine(config);

        let first = engine.decide(&board);
        let computed = engine.evaluator().computed();
        let second = engine.decide(&board);

        assert_eq!(first, second);
        assert_eq!(engine.evaluator().computed(), computed);
        assert!(engine.evaluator().cache().hits() > 0);
    }

    #[test]
    fn test_board_size_is_fixed_per_engine() {
        let mut engine = tick_engine(EngineConfig {
            max_depth: Some(1),
            ..EngineConfig::default()
        });
        let small = tile_grid! {
            2 0
            0 0
        };
        let large = tile_grid! {
            2 0 0
            0 0 0
            0 0 0
        };
        assert!(engine.search(&small).is_ok());
        assert_eq!(
            engine.search(&large),
            Err(EngineError::BoardSizeChanged {
                expected: 2,
                found: 3
            })
        );
        assert!(large.available_moves().contains(&engine.decide(&large)));
    }
}
