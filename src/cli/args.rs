//! CLI argument parsing using StructOpt.

use structopt::StructOpt;

use crate::cli::commands::{
    benchmark::BenchmarkArgs, calculate_best_move::CalculateBestMoveArgs, watch::WatchArgs,
};

#[derive(StructOpt)]
#[structopt(
    name = "twenty48",
    about = "A time-bounded alpha-beta engine for the game 2048"
)]
pub enum Twenty48 {
    #[structopt(
        name = "calculate-best-move",
        about = "Determine the best move for a position given with `--board` (required), as rows separated by `/`, e.g. `2,4,8,16/0,0,0,0/0,0,0,0/0,0,0,0`. Search options: `--budget-ms` (default: 20), `--max-depth`, `--no-pruning`, `--cache-capacity`."
    )]
    CalculateBestMove(CalculateBestMoveArgs),
    #[structopt(
        name = "watch",
        about = "Watch the engine play a game from two random tiles on a `--size` board (default: 4). Use `--seed` for a reproducible game and `--delay` to slow it down."
    )]
    Watch(WatchArgs),
    #[structopt(
        name = "benchmark",
        about = "Play `--games` games (default: 10) without rendering and report scores, max tiles and search depth."
    )]
    Benchmark(BenchmarkArgs),
}

impl crate::cli::commands::Command for Twenty48 {
    fn execute(self) {
        macro_rules! execute_command {
            ($($variant:ident($cmd:ident)),+ $(,)?) => {
                match self {
                    $(Self::$variant($cmd) => $cmd.execute(),)+
                }
            };
        }

        execute_command! {
            CalculateBestMove(cmd),
            Watch(cmd),
            Benchmark(cmd),
        }
    }
}
