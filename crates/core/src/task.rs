// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task identity and the immutable unit of work handed to workers.

use crate::solution::Solution;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one (problem, seed) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId {
    #[serde(rename = "problemId")]
    pub problem_id: u64,
    pub seed: u64,
}

impl TaskId {
    pub fn new(problem_id: u64, seed: u64) -> Self {
        Self { problem_id, seed }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}/s{}", self.problem_id, self.seed)
    }
}

/// One optimization problem bound to one of its seeds.
///
/// `size` is a cost proxy used to break scheduling ties; `payload` is the
/// JSON document written to a worker (the problem narrowed to this seed).
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: TaskId,
    size: u64,
    payload: serde_json::Value,
}

impl Task {
    pub fn new(id: TaskId, size: u64, payload: serde_json::Value) -> Self {
        Self { id, size, payload }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn problem_id(&self) -> u64 {
        self.id.problem_id
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    /// The zero-score placeholder for this task.
    pub fn sentinel(&self) -> Solution {
        Solution::sentinel(self.id)
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
