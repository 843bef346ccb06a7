//! Time-bounded alpha-beta search for sliding-tile games.

pub mod deadline;
mod search;
mod traits;


pub use deadline::{Clock, CpuClock, Deadline, FrozenClock, TickClock, DEFAULT_TIME_BUDGET};
pub use search::{
    iterative_deepening_search, maximize, minimize, PruningWindow, SearchConfig, SearchContext,
    SearchDecision, SearchError, SearchOutcome, SearchResult, SearchStats, TILE_VALUES,
};
pub use traits::{Evaluator, TileBoard};
