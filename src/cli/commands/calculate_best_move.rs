//! Calculate best move command - determine the best move for a position.

use structopt::StructOpt;
use twenty48::board::Board;
use twenty48::game::Engine;

use super::util::EngineArgs;
use super::Command;

#[derive(StructOpt)]
pub struct CalculateBestMoveArgs {
    #[structopt(long = "board")]
    pub board: Board,
    #[structopt(flatten)]
    pub engine: EngineArgs,
}

impl Command for CalculateBestMoveArgs {
    fn execute(self) {
        if self.board.is_game_over() {
            eprintln!("There are no valid moves in the given position.");
            return;
        }

        let mut engine = Engine::with_config(self.engine.config());
        match engine.search(&self.board) {
            Ok(decision) => {
                println!("{}", decision.best_move);
                let stats = engine.last_stats();
                let cache = engine.evaluator().cache();
                eprintln!(
                    "depth {}{}, {} positions searched, {} cutoffs, cache hits {} / misses {}",
                    decision.completed_depth,
                    if decision.fallback { " (fallback)" } else { "" },
                    stats.positions_searched(),
                    stats.alpha_cutoffs + stats.beta_cutoffs,
                    cache.hits(),
                    cache.misses()
                );
            }
            Err(err) => eprintln!("Failed to calculate best move: {}", err),
        }
    }
}
