use log::{debug, info};
use rand::Rng;

use crate::alpha_beta_searcher::{Clock, SearchStats};
use crate::board::{Board, Move};
use crate::game::engine::Engine;

/// One move of a self-play game, reported to the caller after it is applied.
#[derive(Clone, Debug)]
pub struct Turn<'a> {
    pub number: usize,
    pub chosen: Move,
    pub points: u32,
    pub score: u32,
    /// Board after the move and the tile spawned in response.
    pub board: &'a Board,
    pub stats: &'a SearchStats,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameSummary {
    pub moves: usize,
    pub score: u32,
    pub max_tile: u32,
    pub final_board: Board,
    /// Mean of the depths completed per decision, 0 for a game without moves.
    pub average_depth: f64,
    pub fallbacks: usize,
}

/// An empty board with the two opening tiles.
pub fn new_game<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Board {
    Board::new(size).with_random_tile(rng).with_random_tile(rng)
}

/// Lets `engine` play from `start` until no move is left or `move_limit`
/// moves have been made. After every move a random tile is spawned with
/// `rng`, then `on_turn` sees the result.
pub fn play_game<C, R, F>(
    engine: &mut Engine<C>,
    start: Board,
    rng: &mut R,
    move_limit: Option<usize>,
    mut on_turn: F,
) -> GameSummary
where
    C: Clock,
    R: Rng + ?Sized,
    F: FnMut(&Turn),
{
    let mut board = start;
    let mut score: u32 = 0;
    let mut moves = 0;
    let mut total_depth = 0usize;
    let mut fallbacks = 0;

    while !board.is_game_over() {
        if move_limit.map_or(false, |limit| moves >= limit) {
            debug!("move limit {} reached", moves);
            break;
        }

        let chosen = engine.decide(&board);
        let points = board.apply_move(chosen);
        board = board.with_random_tile(rng);

        moves += 1;
        score = score.saturating_add(points);
        let stats = engine.last_stats();
        total_depth += stats.completed_depth as usize;
        if stats.fallback {
            fallbacks += 1;
        }

        on_turn(&Turn {
            number: moves,
            chosen,
            points,
            score,
            board: &board,
            stats,
        });
    }

    let average_depth = if moves == 0 {
        0.0
    } else {
        total_depth as f64 / moves as f64
    };

    info!(
        "game over after {} moves: score {}, max tile {}, average depth {:.2}",
        moves,
        score,
        board.max_tile(),
        average_depth
    );

    GameSummary {
        moves,
        score,
        max_tile: board.max_tile(),
        final_board: board,
        average_depth,
        fallbacks,
    }
}
