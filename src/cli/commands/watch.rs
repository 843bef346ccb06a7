//! Watch command - watch the engine play a game.

use std::time::Duration;

use structopt::StructOpt;
use twenty48::game::display::GameDisplay;
use twenty48::game::{new_game, play_game, Engine};

use super::util::{create_rng, EngineArgs};
use super::Command;

#[derive(StructOpt)]
pub struct WatchArgs {
    #[structopt(long, default_value = "4")]
    pub size: usize,
    #[structopt(long)]
    pub seed: Option<u64>,
    #[structopt(
        long = "delay",
        default_value = "100",
        help = "Delay between moves in milliseconds"
    )]
    pub delay_ms: u64,
    #[structopt(long = "move-limit")]
    pub move_limit: Option<usize>,
    #[structopt(flatten)]
    pub engine: EngineArgs,
}

impl Command for WatchArgs {
    fn execute(self) {
        if self.size < 2 {
            eprintln!("The board must be at least 2x2.");
            std::process::exit(1);
        }

        let mut rng = create_rng(self.seed);
        let mut engine = Engine::with_config(self.engine.config());
        let mut display = GameDisplay::new();
        let delay = Duration::from_millis(self.delay_ms);

        let start = new_game(self.size, &mut rng);
        let summary = play_game(&mut engine, start, &mut rng, self.move_limit, |turn| {
            display.render_turn(turn);
            std::thread::sleep(delay);
        });

        println!(
            "\nGame over after {} moves. Score: {}, max tile: {}",
            summary.moves, summary.score, summary.max_tile
        );
    }
}
