use std::fmt::Write;

use termion::{clear, cursor};

use crate::game::self_play::Turn;

/// Full-screen rendering of a running game.
pub struct GameDisplay {
    buffer: String,
}

impl Default for GameDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl GameDisplay {
    pub fn new() -> Self {
        Self {
            buffer: String::with_capacity(1024),
        }
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        // Writing to a String cannot fail.
        let _ = write!(self.buffer, "{}{}", cursor::Goto(1, 1), clear::All);
    }

    pub fn render_turn(&mut self, turn: &Turn) {
        self.clear();
        let stats = turn.stats;
        let _ = write!(
            self.buffer,
            "{}\nMove {}: {} (+{})\nScore: {}\n\nDepth: {}{}\nPositions searched: {}\nEvaluations: {}\n",
            turn.board,
            turn.number,
            turn.chosen,
            turn.points,
            turn.score,
            stats.completed_depth,
            if stats.fallback { " (fallback)" } else { "" },
            stats.positions_searched(),
            stats.evaluations,
        );
        print!("{}", self.buffer);
    }
}
