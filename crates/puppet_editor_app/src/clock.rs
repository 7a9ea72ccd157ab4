// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed-step clock driving the playback controller.
//!
//! Frame time is accumulated and converted into whole simulation steps at the
//! configured tick rate, so playback speed does not depend on frame rate.

use std::time::Duration;

/// Steps run in a single frame before the backlog is discarded
const MAX_STEPS_PER_FRAME: u32 = 8;

/// Accumulates frame time into fixed simulation steps
#[derive(Debug, Clone)]
pub struct TickClock {
    step: f64,
    accumulated: f64,
}

impl TickClock {
    /// Create a clock with the given step duration
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.as_secs_f64(),
            accumulated: 0.0,
        }
    }

    /// Add `delta_time` seconds and return how many steps to run.
    ///
    /// While not running the backlog is cleared, so resuming does not catch
    /// up on paused time.
    pub fn advance(&mut self, delta_time: f64, running: bool) -> u32 {
        if !running || self.step <= 0.0 {
            self.accumulated = 0.0;
            return 0;
        }

        self.accumulated += delta_time.max(0.0);

        let mut steps = 0;
        while self.accumulated >= self.step {
            self.accumulated -= self.step;
            steps += 1;

            // Limit max steps per frame to prevent spiral of death
            if steps >= MAX_STEPS_PER_FRAME {
                self.accumulated = 0.0;
                break;
            }
        }
        steps
    }
}
