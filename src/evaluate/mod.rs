//! Heuristic scoring of a board at the search horizon.
//!
//! The score combines four terms, all computed on tile exponents
//! (`log2` of the tile value, 0 for an empty cell):
//!
//! - **max tile**: the value of the largest tile,
//! - **monotonicity**: how far rows and columns are from being sorted,
//! - **smoothness**: a penalty for neighbouring tiles of very different size,
//! - **empty cells**: free space, scaled by how advanced the game is.

use std::num::NonZeroUsize;

use log::trace;
#[cfg(feature = "instrumentation")]
use tracing::instrument;

use crate::alpha_beta_searcher::{Evaluator, TileBoard};

pub use self::cache::EvaluationCache;

mod cache;

/// Weights of the heuristic terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeuristicWeights {
    pub empty: f64,
    pub monotonicity: f64,
    pub smoothness: f64,
    pub max_tile: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            empty: 3.0,
            monotonicity: 0.8,
            smoothness: 0.5,
            max_tile: 1.0,
        }
    }
}

/// Monotonicity accumulators for the four scan directions.
///
/// Each field is the negated sum of the exponent drops between adjacent cells
/// met while scanning in that direction, so it is never positive. Lines that
/// never drop in a direction leave that field at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Monotonicity {
    /// Scanning each row left to right.
    pub rightward: f64,
    /// Scanning each row right to left.
    pub leftward: f64,
    /// Scanning each column top to bottom.
    pub downward: f64,
    /// Scanning each column bottom to top.
    pub upward: f64,
}

impl Monotonicity {
    /// Sum of the best row direction and the best column direction.
    pub fn best(&self) -> f64 {
        self.rightward.max(self.leftward) + self.downward.max(self.upward)
    }
}

/// The weighted terms of a score, before clamping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreBreakdown {
    pub max_tile: f64,
    pub monotonicity: f64,
    pub smoothness: f64,
    pub empty: f64,
}

impl ScoreBreakdown {
    /// Final utility; never negative.
    pub fn utility(&self) -> f64 {
        (self.max_tile + self.monotonicity - self.smoothness + self.empty).max(0.0)
    }
}

#[inline]
fn exponent(value: u32) -> f64 {
    if value == 0 {
        0.0
    } else {
        (value as f64).log2()
    }
}

pub fn monotonicity<B: TileBoard>(board: &B) -> Monotonicity {
    let size = board.size();
    let tiles = board.contents();
    let mut result = Monotonicity::default();
    let mut previous_in_column: Vec<Option<f64>> = vec![None; size];

    for row in tiles.chunks(size) {
        let mut previous_in_row: Option<f64> = None;
        for (col, &value) in row.iter().enumerate() {
            let current = exponent(value);

            if let Some(left) = previous_in_row {
                if current > left {
                    result.leftward += left - current;
                } else if left > current {
                    result.rightward += current - left;
                }
            }
            previous_in_row = Some(current);

            if let Some(above) = previous_in_column[col] {
                if current > above {
                    result.upward += above - current;
                } else if above > current {
                    result.downward += current - above;
                }
            }
            previous_in_column[col] = Some(current);
        }
    }

    result
}

/// Sum over every tile of the exponent gap to the nearest tile in each of the
/// four directions, skipping empty cells.
pub fn smoothness<B: TileBoard>(board: &B) -> f64 {
    const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

    let size = board.size() as isize;
    let mut total = 0.0;

    for row in 0..size {
        for col in 0..size {
            let value = match board.cell_value(row, col) {
                Some(value) if value != 0 => exponent(value),
                _ => continue,
            };
            for &(d_row, d_col) in DIRECTIONS.iter() {
                if let Some(neighbour) = nearest_tile(board, row, col, d_row, d_col) {
                    total += (value - neighbour).abs();
                }
            }
        }
    }

    total
}

fn nearest_tile<B: TileBoard>(
    board: &B,
    row: isize,
    col: isize,
    d_row: isize,
    d_col: isize,
) -> Option<f64> {
    let (mut row, mut col) = (row, col);
    loop {
        row += d_row;
        col += d_col;
        match board.cell_value(row, col)? {
            0 => continue,
            value => return Some(exponent(value)),
        }
    }
}

pub fn score_breakdown<B: TileBoard>(board: &B, weights: &HeuristicWeights) -> ScoreBreakdown {
    let tiles = board.contents();
    let max_tile = tiles.iter().copied().max().unwrap_or(0);
    let empty_cells = tiles.iter().filter(|&&value| value == 0).count();

    // An all-empty board has no max tile exponent; score its empty term as 0.
    let max_exponent = exponent(max_tile);

    ScoreBreakdown {
        max_tile: weights.max_tile * max_tile as f64,
        monotonicity: weights.monotonicity * monotonicity(board).best(),
        smoothness: weights.smoothness * smoothness(board),
        empty: weights.empty * empty_cells as f64 * max_exponent,
    }
}

/// Heuristic utility of `board`, uncached.
pub fn score<B: TileBoard>(board: &B, weights: &HeuristicWeights) -> f64 {
    score_breakdown(board, weights).utility()
}

/// Scores boards with the weighted heuristic and memoizes the result per board.
pub struct HeuristicEvaluator {
    weights: HeuristicWeights,
    cache: EvaluationCache,
    computed: usize,
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self::new(HeuristicWeights::default(), None)
    }
}

impl HeuristicEvaluator {
    pub fn new(weights: HeuristicWeights, cache_capacity: Option<NonZeroUsize>) -> Self {
        Self {
            weights,
            cache: EvaluationCache::with_capacity(cache_capacity),
            computed: 0,
        }
    }

    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    /// Number of boards scored from scratch (cache misses).
    pub fn computed(&self) -> usize {
        self.computed
    }
}

impl<B: TileBoard> Evaluator<B> for HeuristicEvaluator {
    #[cfg_attr(feature = "instrumentation", instrument(skip_all))]
    fn evaluate(&mut self, board: &B) -> f64 {
        if let Some(utility) = self.cache.get(board.contents()) {
            return utility;
        }

        let breakdown = score_breakdown(board, &self.weights);
        let utility = breakdown.utility();
        trace!(
            "tiles: {:?} / max = {:.1} / empty = {:.5} / mono = {:.5} / smoothness = {:.5} / utility = {:.5}",
            board.contents(),
            breakdown.max_tile,
            breakdown.empty,
            breakdown.monotonicity,
            breakdown.smoothness,
            utility
        );

        self.computed += 1;
        self.cache.insert(board.contents(), utility);
        utility
    }
}
