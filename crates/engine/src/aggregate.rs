// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reducing every solution found during a run to one answer per task.

use foreman_core::{Solution, TaskId};
use indexmap::IndexMap;

/// Pick the highest-scoring solution for each task, in task order.
///
/// Tasks with no positive-scoring solution get the sentinel. Ties keep the
/// solution seen first. Solutions for tasks outside `tasks` are ignored.
pub fn choose_best(
    tasks: impl IntoIterator<Item = TaskId>,
    solutions: impl IntoIterator<Item = Solution>,
) -> Vec<Solution> {
    let mut best: IndexMap<TaskId, Solution> =
        tasks.into_iter().map(|id| (id, Solution::sentinel(id))).collect();

    for solution in solutions {
        match best.get_mut(&solution.task_id()) {
            Some(current) if solution.score > current.score => *current = solution,
            Some(_) => {}
            None => tracing::debug!(task = %solution.task_id(), "ignoring solution for unknown task"),
        }
    }
    best.into_values().collect()
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
