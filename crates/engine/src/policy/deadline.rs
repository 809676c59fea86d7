// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Splitting the overall deadline between the solve and rewrite phases.

use crate::config::SupervisorConfig;
use std::time::Duration;
use tokio::time::Instant;

/// Soft and hard deadline of one scheduler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseWindow {
    pub soft: Instant,
    pub hard: Instant,
}

impl PhaseWindow {
    /// Window ending at `hard`, with the soft deadline `grace` before it.
    pub fn ending_at(hard: Instant, grace: Duration) -> Self {
        let soft = hard.checked_sub(grace).unwrap_or(hard);
        Self { soft, hard }
    }
}

/// Deadlines for both phases of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineSplit {
    pub rewrite_budget: Duration,
    pub solve: PhaseWindow,
    pub rewrite: PhaseWindow,
}

/// Time reserved for rewriting: at least `min`, `per_unit` for every unit
/// of task size, never more than a fifth of what remains.
pub fn rewrite_budget(total_size: u64, remaining: Duration, min: Duration, per_unit: Duration) -> Duration {
    let proportional = per_unit.saturating_mul(u32::try_from(total_size).unwrap_or(u32::MAX));
    min.max(proportional).min(remaining / 5)
}

/// Split the time between `now` and `deadline` for tasks of `total_size`.
pub fn split(now: Instant, deadline: Instant, total_size: u64, config: &SupervisorConfig) -> DeadlineSplit {
    let remaining = deadline.saturating_duration_since(now);
    let budget = rewrite_budget(total_size, remaining, config.min_rewrite, config.rewrite_per_unit);
    let solve_hard = deadline.checked_sub(budget).unwrap_or(now);
    DeadlineSplit {
        rewrite_budget: budget,
        solve: PhaseWindow::ending_at(solve_hard, config.grace),
        rewrite: PhaseWindow::ending_at(deadline, config.grace),
    }
}

#[cfg(test)]
#[path = "deadline_tests.rs"]
mod tests;
