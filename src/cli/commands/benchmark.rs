//! Benchmark command - play several games and report how the engine did.

use std::collections::BTreeMap;
use std::time::Instant;

use structopt::StructOpt;
use twenty48::game::{new_game, play_game, Engine};

use super::util::{create_rng, EngineArgs};
use super::Command;

#[derive(StructOpt)]
pub struct BenchmarkArgs {
    #[structopt(short, long, default_value = "10")]
    pub games: usize,
    #[structopt(long)]
    pub seed: Option<u64>,
    #[structopt(long, default_value = "4")]
    pub size: usize,
    #[structopt(flatten)]
    pub engine: EngineArgs,
}

impl Command for BenchmarkArgs {
    fn execute(self) {
        if self.size < 2 {
            eprintln!("The board must be at least 2x2.");
            std::process::exit(1);
        }

        let mut rng = create_rng(self.seed);
        let mut max_tiles = Vec::with_capacity(self.games);
        let mut total_score = 0u64;
        let started = Instant::now();

        println!(
            "{:>6} {:>8} {:>8} {:>10} {:>10}",
            "Game", "Moves", "Score", "Max tile", "Avg depth"
        );

        for game in 1..=self.games {
            // One engine per game: the evaluation cache is session scoped.
            let mut engine = Engine::with_config(self.engine.config());
            let start = new_game(self.size, &mut rng);
            let summary = play_game(&mut engine, start, &mut rng, None, |_| {});

            println!(
                "{:>6} {:>8} {:>8} {:>10} {:>10.2}",
                game, summary.moves, summary.score, summary.max_tile, summary.average_depth
            );
            total_score += summary.score as u64;
            max_tiles.push(summary.max_tile);
        }

        if self.games == 0 {
            return;
        }

        println!(
            "\nAverage score: {:.1}, took {:.2?}",
            total_score as f64 / self.games as f64,
            started.elapsed()
        );

        let mut distribution: BTreeMap<u32, usize> = BTreeMap::new();
        for tile in max_tiles {
            *distribution.entry(tile).or_insert(0) += 1;
        }
        println!("{:>10} {:>8}", "Max tile", "Games");
        for (tile, games) in distribution.iter().rev() {
            println!("{:>10} {:>8}", tile, games);
        }
    }
}
