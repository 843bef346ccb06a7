//! Cooperative time budget for a single decision.
//!
//! The search never gets interrupted. Every node polls [`Deadline::has_time`]
//! before doing more work and unwinds with `SearchOutcome::TimeOver` once the
//! budget is spent.

use std::time::Duration;

use cpu_time::ProcessTime;

/// Default per-decision budget.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_millis(20);

/// Source of elapsed time for a deadline.
pub trait Clock {
    /// Marks the beginning of a new decision.
    fn start(&mut self);

    /// Time spent since the last call to `start`.
    fn elapsed(&mut self) -> Duration;
}

/// Measures CPU time consumed by the process, so the budget is not eaten by
/// time the OS spends scheduling other work.
#[derive(Default)]
pub struct CpuClock {
    started: Option<ProcessTime>,
}

impl Clock for CpuClock {
    fn start(&mut self) {
        self.started = Some(ProcessTime::now());
    }

    fn elapsed(&mut self) -> Duration {
        self.started.map_or(Duration::ZERO, |started| started.elapsed())
    }
}

/// A clock that is always past any deadline. Useful to force the
/// no-time-left path deterministically.
#[derive(Default, Clone, Copy)]
pub struct FrozenClock;

impl Clock for FrozenClock {
    fn start(&mut self) {}

    fn elapsed(&mut self) -> Duration {
        Duration::MAX
    }
}

/// A deterministic clock that advances by `step` every time it is read.
///
/// With a `TickClock` the budget is effectively a number of deadline polls,
/// which makes time-limited searches reproducible.
#[derive(Clone, Copy)]
pub struct TickClock {
    step: Duration,
    elapsed: Duration,
}

impl TickClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            elapsed: Duration::ZERO,
        }
    }
}

impl Clock for TickClock {
    fn start(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn elapsed(&mut self) -> Duration {
        let now = self.elapsed;
        self.elapsed = self.elapsed.saturating_add(self.step);
        now
    }
}

pub struct Deadline<C: Clock> {
    clock: C,
    budget: Duration,
    polls: u64,
}

impl<C: Clock> Deadline<C> {
    pub fn new(clock: C, budget: Duration) -> Self {
        Self {
            clock,
            budget,
            polls: 0,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn start(&mut self) {
        self.polls = 0;
        self.clock.start();
    }

    /// True while the time spent since `start` is below the budget.
    #[inline]
    pub fn has_time(&mut self) -> bool {
        self.polls += 1;
        self.clock.elapsed() < self.budget
    }

    pub fn elapsed(&mut self) -> Duration {
        self.clock.elapsed()
    }

    /// Number of `has_time` calls since the last `start`.
    pub fn polls(&self) -> u64 {
        self.polls
    }
}
