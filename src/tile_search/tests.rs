//! Search tests on real boards.
//!
//! Test coverage:
//! - Depth 1 picks the move whose resulting board scores best
//! - Pruned and exhaustive search agree on real positions
//! - The caller's board is never mutated
//! - Fallback and no-move handling through the board adapter

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::alpha_beta_searcher::{
    Deadline, FrozenClock, SearchConfig, SearchContext, SearchError, TickClock,
};
use crate::board::{Board, Move};
use crate::evaluate::{score, HeuristicEvaluator, HeuristicWeights};
use crate::tile_grid;

fn fixed_depth_context(depth: u8, pruning: bool) -> SearchContext<TickClock> {
    let config = SearchConfig {
        max_depth: Some(depth),
        pruning,
    };
    SearchContext::new(
        config,
        Deadline::new(TickClock::new(Duration::ZERO), Duration::from_secs(1)),
    )
}

fn random_position(seed: u64, moves: usize) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new(4).with_random_tile(&mut rng).with_random_tile(&mut rng);
    for _ in 0..moves {
        let available = board.available_moves();
        if available.is_empty() {
            break;
        }
        board.apply_move(available[rng.gen_range(0..available.len())]);
        board = board.with_random_tile(&mut rng);
    }
    board
}

#[test]
fn test_single_available_move_at_depth_one() {
    let board = tile_grid! {
        2 4 8 16
        0 0 0 0
        0 0 0 0
        0 0 0 0
    };
    let mut context = fixed_depth_context(1, true);
    let mut evaluator = HeuristicEvaluator::default();

    let decision = search_best_move(&mut context, &mut evaluator, &board).unwrap();

    assert_eq!(decision.best_move, Move::Down);
    assert_eq!(decision.completed_depth, 1);
    assert!(!decision.fallback);

    let mut moved = board.clone();
    moved.apply_move(Move::Down);
    assert_eq!(
        decision.utility,
        Some(score(&moved, &HeuristicWeights::default()))
    );
}

#[test]
fn test_depth_one_picks_best_scoring_move() {
    let board = tile_grid! {
        2 2 4 0
        0 4 0 0
        0 0 8 0
        2 0 0 0
    };
    let weights = HeuristicWeights::default();

    let mut expected: Option<(Move, f64)> = None;
    for &mv in board.available_moves().iter() {
        let mut child = board.clone();
        child.apply_move(mv);
        let utility = score(&child, &weights);
        if expected.map_or(true, |(_, best)| utility > best) {
            expected = Some((mv, utility));
        }
    }
    let (expected_move, expected_utility) = expected.unwrap();

    for &pruning in &[true, false] {
        let mut context = fixed_depth_context(1, pruning);
        let mut evaluator = HeuristicEvaluator::default();
        let decision = search_best_move(&mut context, &mut evaluator, &board).unwrap();

        assert_eq!(decision.best_move, expected_move);
        assert_eq!(decision.utility, Some(expected_utility));
        assert_eq!(
            context.stats().evaluations,
            board.available_moves().len(),
            "depth 1 scores every move exactly once"
        );
    }
}

#[test]
fn test_pruning_matches_exhaustive_search_on_real_boards() {
    for seed in 0..12 {
        let board = random_position(seed, 20 + seed as usize);
        if board.is_game_over() {
            continue;
        }
        for depth in 1..=3 {
            let mut pruned_context = fixed_depth_context(depth, true);
            let mut full_context = fixed_depth_context(depth, false);

            let pruned = search_best_move(
                &mut pruned_context,
                &mut HeuristicEvaluator::default(),
                &board,
            )
            .unwrap();
            let full = search_best_move(
                &mut full_context,
                &mut HeuristicEvaluator::default(),
                &board,
            )
            .unwrap();

            assert_eq!(pruned.best_move, full.best_move, "seed {} depth {}", seed, depth);
            assert_eq!(pruned.utility, full.utility, "seed {} depth {}", seed, depth);
            assert!(
                pruned_context.stats().positions_searched()
                    <= full_context.stats().positions_searched()
            );
        }
    }
}

#[test]
fn test_search_does_not_mutate_board() {
    let board = random_position(5, 15);
    let before = board.clone();
    let mut context = fixed_depth_context(3, true);
    search_best_move(&mut context, &mut HeuristicEvaluator::default(), &board).unwrap();
    assert_eq!(board, before);
}

#[test]
fn test_no_time_falls_back_to_first_available_move() {
    let board = tile_grid! {
        0 0 0 0
        0 2 0 0
        0 0 0 0
        0 0 0 0
    };
    let mut context = SearchContext::new(
        SearchConfig::default(),
        Deadline::new(FrozenClock, Duration::from_millis(20)),
    );
    let mut evaluator = HeuristicEvaluator::default();
    let decision = search_best_move(&mut context, &mut evaluator, &board).unwrap();

    assert_eq!(decision.best_move, Move::Up);
    assert!(decision.fallback);
    assert_eq!(decision.utility, None);
    assert_eq!(evaluator.computed(), 0);
}

#[test]
fn test_finished_board_reports_no_moves() {
    let board = tile_grid! {
        2 4 2 4
        4 2 4 2
        2 4 2 4
        4 2 4 2
    };
    let mut context = fixed_depth_context(2, true);
    assert_eq!(
        search_best_move(&mut context, &mut HeuristicEvaluator::default(), &board),
        Err(SearchError::NoAvailableMoves)
    );
}

#[test]
fn test_decision_is_always_an_available_move() {
    for seed in 0..20 {
        let board = random_position(100 + seed, 40);
        if board.is_game_over() {
            continue;
        }
        let mut context = fixed_depth_context(2, true);
        let decision =
            search_best_move(&mut context, &mut HeuristicEvaluator::default(), &board).unwrap();
        assert!(board.available_moves().contains(&decision.best_move));
    }
}
