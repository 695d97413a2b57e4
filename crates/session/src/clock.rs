//! Gravity clock.

use tetris_versus_core::GameState;

/// Accumulates elapsed time and yields gravity ticks at the engine's
/// current interval.
///
/// Suspended while the engine is paused or over: the accumulator is
/// cleared rather than left to fire a burst on resume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GravityClock {
    elapsed_ms: u32,
}

impl GravityClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `elapsed_ms` and return how many ticks are due.
    pub fn advance(&mut self, elapsed_ms: u32, state: &GameState) -> u32 {
        if !state.playable() {
            self.reset();
            return 0;
        }

        let interval = state.gravity_interval_ms();
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        let ticks = self.elapsed_ms / interval;
        self.elapsed_ms %= interval;
        ticks
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    /// Time accumulated toward the next tick
    pub fn pending_ms(&self) -> u32 {
        self.elapsed_ms
    }
}
