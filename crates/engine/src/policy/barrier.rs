// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Re-prioritizing secondary heavy jobs once a problem's primary jobs are in.

use crate::job::{Job, Priority, Role};
use parking_lot::Mutex;
use std::sync::Arc;

/// Tier for secondary heavy jobs when heavy solving did not beat quick
/// solving on the primary seed.
pub const HEAVY_LAGGING_TIER: Priority = 300;

/// Tier for secondary heavy jobs when heavy solving beat quick solving.
pub const HEAVY_LEADING_TIER: Priority = 700;

/// Priority of secondary heavy jobs before (or without) re-prioritization.
pub const SECONDARY_FALLBACK: Priority = 283_283_283;

/// Base tier for secondary heavy jobs given the best primary scores.
pub fn secondary_tier(best_quick: i64, best_heavy: i64) -> Priority {
    if best_heavy <= best_quick {
        HEAVY_LAGGING_TIER
    } else {
        HEAVY_LEADING_TIER
    }
}

/// What a finished primary job contributes to the decision.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outcome {
    role: Role,
    args: Vec<String>,
    score: i64,
}

struct Progress {
    outcomes: Vec<Outcome>,
    fired: bool,
}

/// Counts the primary jobs of one problem and, when the last one finishes,
/// assigns every secondary heavy job of that problem its priority.
pub struct RescheduleBarrier {
    problem_id: u64,
    expected: usize,
    secondaries: Vec<Arc<Job>>,
    progress: Mutex<Progress>,
}

impl RescheduleBarrier {
    pub fn new(problem_id: u64, expected: usize, secondaries: Vec<Arc<Job>>) -> Self {
        Self {
            problem_id,
            expected,
            secondaries,
            progress: Mutex::new(Progress { outcomes: Vec::new(), fired: false }),
        }
    }

    /// Make every job in `primaries` report to the barrier when it finishes.
    pub fn watch(self: &Arc<Self>, primaries: &[Arc<Job>]) {
        for primary in primaries {
            let barrier = Arc::clone(self);
            primary.register_finish_callback(Box::new(move |job| {
                barrier.record(job.role(), job.args(), job.best_score());
                Ok(())
            }));
        }
    }

    /// Record one finished primary job. Returns true when this completed
    /// the barrier.
    pub fn record(&self, role: Role, args: &[String], score: i64) -> bool {
        let outcomes = {
            let mut progress = self.progress.lock();
            if progress.fired {
                return false;
            }
            progress.outcomes.push(Outcome { role, args: args.to_vec(), score });
            if progress.outcomes.len() < self.expected {
                return false;
            }
            progress.fired = true;
            std::mem::take(&mut progress.outcomes)
        };
        self.fire(outcomes);
        true
    }

    fn fire(&self, mut outcomes: Vec<Outcome>) {
        outcomes.sort_by(|a, b| b.score.cmp(&a.score));
        let best_quick = outcomes.iter().find(|o| o.role == Role::Quick).map_or(0, |o| o.score);
        let heavy: Vec<&Outcome> = outcomes.iter().filter(|o| o.role == Role::Heavy).collect();
        let best_heavy = heavy.first().map_or(0, |o| o.score);
        let tier = secondary_tier(best_quick, best_heavy);

        tracing::debug!(
            problem = self.problem_id,
            best_quick,
            best_heavy,
            tier,
            "rescheduling secondary jobs"
        );

        for job in &self.secondaries {
            let priority = heavy
                .iter()
                .position(|o| o.args == job.args())
                .and_then(|rank| Priority::try_from(rank).ok())
                .map_or(SECONDARY_FALLBACK, |rank| tier + rank);
            job.set_priority(priority);
        }
    }
}

#[cfg(test)]
#[path = "barrier_tests.rs"]
mod tests;
