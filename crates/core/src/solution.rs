// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scored candidate answers.
//!
//! The JSON shape is `{problemId, seed, tag, solution, _score}`. Fields
//! prefixed with `_` are supervisor bookkeeping and can be stripped from the
//! final answer with [`Solution::official`].

use crate::task::TaskId;
use serde::{Deserialize, Serialize};

/// Tag carried by the zero-score placeholder.
pub const SENTINEL_TAG: &str = "sentinel";

/// A scored candidate answer for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    #[serde(rename = "problemId")]
    pub problem_id: u64,
    pub seed: u64,
    pub tag: String,
    pub solution: String,
    #[serde(rename = "_score", default)]
    pub score: i64,
}

impl Solution {
    pub fn new(task_id: TaskId, tag: impl Into<String>, solution: impl Into<String>, score: i64) -> Self {
        Self {
            problem_id: task_id.problem_id,
            seed: task_id.seed,
            tag: tag.into(),
            solution: solution.into(),
            score,
        }
    }

    /// The "no answer yet" placeholder for `task_id`.
    pub fn sentinel(task_id: TaskId) -> Self {
        Self::new(task_id, SENTINEL_TAG, "", 0)
    }

    pub fn task_id(&self) -> TaskId {
        TaskId::new(self.problem_id, self.seed)
    }

    pub fn is_sentinel(&self) -> bool {
        self.score <= 0
    }

    /// Overwrite the task identity with one the caller trusts.
    pub fn stamp(&mut self, task_id: TaskId) {
        self.problem_id = task_id.problem_id;
        self.seed = task_id.seed;
    }

    /// View without the `_`-prefixed bookkeeping fields.
    pub fn official(&self) -> OfficialSolution<'_> {
        OfficialSolution {
            problem_id: self.problem_id,
            seed: self.seed,
            tag: &self.tag,
            solution: &self.solution,
        }
    }
}

/// Serialization view of a [`Solution`] carrying only the answer fields.
#[derive(Debug, Serialize)]
pub struct OfficialSolution<'a> {
    #[serde(rename = "problemId")]
    pub problem_id: u64,
    pub seed: u64,
    pub tag: &'a str,
    pub solution: &'a str,
}

#[cfg(test)]
#[path = "solution_tests.rs"]
mod tests;
