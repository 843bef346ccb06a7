//! Alpha-beta search over the player/tile-placement game tree.
//!
//! # Core Algorithm
//!
//! The tree alternates two kinds of plies. At a *max* ply the player picks one
//! of the available moves. At a *min* ply the board places a new tile, and the
//! search assumes the placement that is worst for the player: every empty cell
//! is tried with every candidate value in [`TILE_VALUES`]. Pruning uses the usual
//! [alpha, beta] window. Each node narrows its own copy of the window and
//! hands that copy to its children, so a bound found in one subtree never
//! leaks into a sibling. The chosen move is therefore the one exhaustive
//! minimax would choose at the same depth.
//!
//! ## Iterative Deepening
//!
//! [`iterative_deepening_search`] runs the search with depth limits 1, 2, 3, ...
//! until the [`Deadline`] expires and keeps the result of the last depth that
//! finished. A depth interrupted by the deadline is thrown away.
//!
//! ## Time Over
//!
//! Nodes poll the deadline before expanding and before every child. Once it
//! has expired they return [`SearchOutcome::TimeOver`], which every caller
//! propagates immediately.

use std::time::Duration;

use log::debug;
use thiserror::Error;
#[cfg(feature = "instrumentation")]
use tracing::instrument;

use super::deadline::{Clock, Deadline};
use super::{Evaluator, TileBoard};

/// Values the board may place on an empty cell, in enumeration order.
pub const TILE_VALUES: [u32; 2] = [2, 4];

#[derive(Error, Debug, PartialEq)]
pub enum SearchError {
    #[error("no available moves")]
    NoAvailableMoves,
}

/// Result of a search step that may have been cut short by the deadline.
#[must_use = "a timed out search must be propagated"]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchOutcome<T> {
    Completed(T),
    TimeOver,
}

impl<T> SearchOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            SearchOutcome::Completed(value) => Some(value),
            SearchOutcome::TimeOver => None,
        }
    }

    pub fn is_time_over(&self) -> bool {
        matches!(self, SearchOutcome::TimeOver)
    }
}

/// Utility of a max node and the move that reaches it. `best_move` is `None`
/// when the node was scored directly (depth limit or no moves).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult<M> {
    pub utility: f64,
    pub best_move: Option<M>,
}

/// Bounds of the scores that can still change the decision at the root.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PruningWindow {
    /// Best utility the player can already guarantee.
    pub alpha: f64,
    /// Best utility the tile placement can already hold the player to.
    pub beta: f64,
}

impl Default for PruningWindow {
    fn default() -> Self {
        Self {
            alpha: f64::NEG_INFINITY,
            beta: f64::INFINITY,
        }
    }
}

impl PruningWindow {
    #[inline]
    fn raise_alpha(&mut self, utility: f64) {
        if utility > self.alpha {
            self.alpha = utility;
        }
    }

    #[inline]
    fn lower_beta(&mut self, utility: f64) {
        if utility < self.beta {
            self.beta = utility;
        }
    }
}

/// Search configuration parameters.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Stop deepening once this depth limit completes.
    pub max_depth: Option<u8>,
    /// Disable to run plain minimax with the same enumeration order.
    pub pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            pruning: true,
        }
    }
}

/// Statistics collected during one decision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    pub max_nodes: usize,
    pub min_nodes: usize,
    pub evaluations: usize,
    pub beta_cutoffs: usize,
    pub alpha_cutoffs: usize,
    pub deadline_polls: u64,
    pub completed_depth: u8,
    pub fallback: bool,
    pub last_utility: Option<f64>,
    pub duration: Option<Duration>,
    depth_limit_reached: bool,
}

impl SearchStats {
    pub fn positions_searched(&self) -> usize {
        self.max_nodes + self.min_nodes
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The outcome of iterative deepening.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchDecision<M> {
    pub best_move: M,
    /// Utility of `best_move` at `completed_depth`, `None` for a fallback.
    pub utility: Option<f64>,
    pub completed_depth: u8,
    /// True when no depth finished and `best_move` is simply the first available move.
    pub fallback: bool,
}

pub struct SearchContext<C: Clock> {
    config: SearchConfig,
    stats: SearchStats,
    deadline: Deadline<C>,
}

impl<C: Clock> SearchContext<C> {
    pub fn new(config: SearchConfig, deadline: Deadline<C>) -> Self {
        Self {
            config,
            stats: SearchStats::default(),
            deadline,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn deadline_mut(&mut self) -> &mut Deadline<C> {
        &mut self.deadline
    }

    #[inline]
    fn has_time(&mut self) -> bool {
        self.deadline.has_time()
    }

    #[inline]
    fn evaluate<B, E>(&mut self, evaluator: &mut E, board: &B) -> f64
    where
        B: TileBoard,
        E: Evaluator<B>,
    {
        self.stats.evaluations += 1;
        evaluator.evaluate(board)
    }
}

/// Picks a move for `board` by deepening the search until the deadline
/// expires.
///
/// Returns `SearchError::NoAvailableMoves` without starting the clock when the
/// board has no legal move. If not even depth 1 finishes in time, the first
/// available move is returned with `fallback` set.
#[cfg_attr(feature = "instrumentation", instrument(skip_all))]
pub fn iterative_deepening_search<B, E, C>(
    context: &mut SearchContext<C>,
    evaluator: &mut E,
    board: &B,
) -> Result<SearchDecision<B::Move>, SearchError>
where
    B: TileBoard,
    E: Evaluator<B>,
    C: Clock,
{
    context.stats.reset();

    let moves = board.available_moves();
    let first_move = *moves
        .as_ref()
        .first()
        .ok_or(SearchError::NoAvailableMoves)?;

    context.deadline.start();

    let mut decision = SearchDecision {
        best_move: first_move,
        utility: None,
        completed_depth: 0,
        fallback: true,
    };
    let mut depth_limit: u8 = 1;

    while context.has_time() {
        debug!("iterative deepening - depth {}", depth_limit);
        context.stats.depth_limit_reached = false;

        match maximize(
            context,
            evaluator,
            board,
            0,
            depth_limit,
            PruningWindow::default(),
        ) {
            SearchOutcome::Completed(SearchResult {
                utility,
                best_move: Some(best_move),
            }) => {
                debug!(
                    "iterative deepening - depth {}: {:?} with utility {:.5}",
                    depth_limit, best_move, utility
                );
                decision = SearchDecision {
                    best_move,
                    utility: Some(utility),
                    completed_depth: depth_limit,
                    fallback: false,
                };
            }
            SearchOutcome::Completed(SearchResult {
                best_move: None, ..
            }) => break,
            SearchOutcome::TimeOver => {
                debug!("iterative deepening - depth {}: time over", depth_limit);
                break;
            }
        }

        if !context.stats.depth_limit_reached {
            debug!("search tree exhausted at depth {}", depth_limit);
            break;
        }
        if context.config.max_depth.map_or(false, |max| depth_limit >= max) {
            break;
        }
        if depth_limit == u8::MAX {
            break;
        }
        depth_limit += 1;
    }

    debug!(
        "final result: {:?} after {} completed iterations",
        decision.best_move, decision.completed_depth
    );

    context.stats.completed_depth = decision.completed_depth;
    context.stats.fallback = decision.fallback;
    context.stats.last_utility = decision.utility;
    context.stats.deadline_polls = context.deadline.polls();
    context.stats.duration = Some(context.deadline.elapsed());

    Ok(decision)
}

/// Max ply: the player picks the move with the highest utility.
///
/// Ties keep the earliest move in enumeration order.
#[cfg_attr(feature = "instrumentation", instrument(skip_all))]
pub fn maximize<B, E, C>(
    context: &mut SearchContext<C>,
    evaluator: &mut E,
    board: &B,
    depth: u8,
    depth_limit: u8,
    mut window: PruningWindow,
) -> SearchOutcome<SearchResult<B::Move>>
where
    B: TileBoard,
    E: Evaluator<B>,
    C: Clock,
{
    context.stats.max_nodes += 1;

    let moves = board.available_moves();
    if depth >= depth_limit || moves.as_ref().is_empty() {
        if depth >= depth_limit {
            context.stats.depth_limit_reached = true;
        }
        return SearchOutcome::Completed(SearchResult {
            utility: context.evaluate(evaluator, board),
            best_move: None,
        });
    }

    if !context.has_time() {
        return SearchOutcome::TimeOver;
    }

    let mut best: Option<SearchResult<B::Move>> = None;

    for &game_move in moves.as_ref() {
        if !context.has_time() {
            return SearchOutcome::TimeOver;
        }

        let mut child = board.clone();
        child.apply_move(game_move);

        let utility = match minimize(context, evaluator, &child, depth + 1, depth_limit, window) {
            SearchOutcome::Completed(utility) => utility,
            SearchOutcome::TimeOver => return SearchOutcome::TimeOver,
        };

        let improved = best.map_or(true, |current| utility > current.utility);
        if improved {
            best = Some(SearchResult {
                utility,
                best_move: Some(game_move),
            });
        }

        if context.config.pruning {
            let max_utility = best.map_or(utility, |current| current.utility);
            if max_utility >= window.beta {
                context.stats.beta_cutoffs += 1;
                break;
            }
            window.raise_alpha(max_utility);
        }
    }

    match best {
        Some(result) => SearchOutcome::Completed(result),
        None => SearchOutcome::TimeOver,
    }
}

/// Min ply: the board places the tile that is worst for the player.
///
/// Placements are enumerated cell-major, value-minor.
#[cfg_attr(feature = "instrumentation", instrument(skip_all))]
pub fn minimize<B, E, C>(
    context: &mut SearchContext<C>,
    evaluator: &mut E,
    board: &B,
    depth: u8,
    depth_limit: u8,
    mut window: PruningWindow,
) -> SearchOutcome<f64>
where
    B: TileBoard,
    E: Evaluator<B>,
    C: Clock,
{
    context.stats.min_nodes += 1;

    let cells = board.available_cells();
    if depth >= depth_limit || cells.as_ref().is_empty() {
        if depth >= depth_limit {
            context.stats.depth_limit_reached = true;
        }
        return SearchOutcome::Completed(context.evaluate(evaluator, board));
    }

    if !context.has_time() {
        return SearchOutcome::TimeOver;
    }

    let mut min_utility: Option<f64> = None;

    'placements: for &cell in cells.as_ref() {
        for &value in TILE_VALUES.iter() {
            if !context.has_time() {
                return SearchOutcome::TimeOver;
            }

            let mut child = board.clone();
            child.insert_tile(cell, value);

            let utility = match maximize(context, evaluator, &child, depth + 1, depth_limit, window)
            {
                SearchOutcome::Completed(result) => result.utility,
                SearchOutcome::TimeOver => return SearchOutcome::TimeOver,
            };

            let running_min = min_utility.map_or(utility, |current| current.min(utility));
            min_utility = Some(running_min);

            if context.config.pruning {
                if running_min <= window.alpha {
                    context.stats.alpha_cutoffs += 1;
                    break 'placements;
                }
                window.lower_beta(running_min);
            }
        }
    }

    match min_utility {
        Some(utility) => SearchOutcome::Completed(utility),
        None => SearchOutcome::TimeOver,
    }
}
