//! Board-specific trait implementations for the alpha-beta search.

use crate::alpha_beta_searcher::{
    iterative_deepening_search, Clock, SearchContext, SearchDecision, SearchError, TileBoard,
};
use crate::board::{Board, Cell, CellList, Move, MoveList};
use crate::evaluate::HeuristicEvaluator;

impl TileBoard for Board {
    type Move = Move;
    type Cell = Cell;
    type MoveList = MoveList;
    type CellList = CellList;

    #[inline]
    fn size(&self) -> usize {
        Board::size(self)
    }

    #[inline]
    fn contents(&self) -> &[u32] {
        Board::contents(self)
    }

    #[inline]
    fn available_moves(&self) -> MoveList {
        Board::available_moves(self)
    }

    #[inline]
    fn available_cells(&self) -> CellList {
        Board::available_cells(self)
    }

    #[inline]
    fn apply_move(&mut self, game_move: Move) {
        Board::apply_move(self, game_move);
    }

    #[inline]
    fn insert_tile(&mut self, cell: Cell, value: u32) {
        Board::insert_tile(self, cell, value);
    }

    #[inline]
    fn cell_value(&self, row: isize, col: isize) -> Option<u32> {
        Board::cell_value(self, row, col)
    }
}

/// Runs iterative deepening on a `Board` with the heuristic evaluator.
pub fn search_best_move<C: Clock>(
    context: &mut SearchContext<C>,
    evaluator: &mut HeuristicEvaluator,
    board: &Board,
) -> Result<SearchDecision<Move>, SearchError> {
    iterative_deepening_search(context, evaluator, board)
}
