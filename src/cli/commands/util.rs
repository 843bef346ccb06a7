//! Shared utilities for CLI commands.

use std::num::NonZeroUsize;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;
use twenty48::game::EngineConfig;

/// Search options shared by every command that runs the engine.
#[derive(StructOpt)]
pub struct EngineArgs {
    #[structopt(
        long = "budget-ms",
        default_value = "20",
        help = "CPU time per move in milliseconds"
    )]
    pub budget_ms: u64,
    #[structopt(long = "max-depth", help = "Stop deepening after this depth")]
    pub max_depth: Option<u8>,
    #[structopt(long = "no-pruning", help = "Search without alpha-beta pruning")]
    pub no_pruning: bool,
    #[structopt(
        long = "cache-capacity",
        help = "Keep at most this many evaluated boards (default: unbounded)"
    )]
    pub cache_capacity: Option<NonZeroUsize>,
}

impl EngineArgs {
    pub(crate) fn config(&self) -> EngineConfig {
        EngineConfig {
            time_budget: Duration::from_millis(self.budget_ms),
            max_depth: self.max_depth,
            pruning: !self.no_pruning,
            cache_capacity: self.cache_capacity,
            ..EngineConfig::default()
        }
    }
}

pub(crate) fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
