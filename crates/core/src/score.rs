// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-task and per-problem score summaries.

use crate::solution::Solution;
use crate::task::TaskId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub task: TaskId,
    pub score: i64,
    pub tag: String,
}

/// Scores sorted by (problem, seed) plus the integer average per problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreReport {
    pub rows: Vec<ScoreRow>,
    pub averages: Vec<(u64, i64)>,
}

impl ScoreReport {
    pub fn new(solutions: &[Solution]) -> Self {
        let mut rows: Vec<ScoreRow> = solutions
            .iter()
            .map(|s| ScoreRow { task: s.task_id(), score: s.score, tag: s.tag.clone() })
            .collect();
        rows.sort_by_key(|r| r.task);

        let mut by_problem: BTreeMap<u64, Vec<i64>> = BTreeMap::new();
        for row in &rows {
            by_problem.entry(row.task.problem_id).or_default().push(row.score);
        }
        let averages = by_problem
            .into_iter()
            .map(|(problem_id, scores)| {
                (problem_id, scores.iter().sum::<i64>() / scores.len() as i64)
            })
            .collect();

        Self { rows, averages }
    }
}

#[cfg(test)]
#[path = "score_tests.rs"]
mod tests;
