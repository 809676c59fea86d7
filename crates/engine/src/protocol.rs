// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-result stream between a worker and its job.
//!
//! A worker writes, at any time, newline-terminated JSON arrays of records
//! `{tag, solution, _score}`. Identity fields the worker sends are ignored;
//! every decoded record is stamped with the job's own task.

use foreman_core::{Solution, TaskId};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed worker output: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The fields a worker must supply, with the types it must supply them in.
#[derive(Debug, Deserialize)]
struct WorkerRecord {
    tag: String,
    solution: String,
    #[serde(rename = "_score")]
    score: i64,
}

/// Decode one output line into solutions for `task`.
///
/// Blank lines decode to nothing. A line is rejected whole if it is not a
/// JSON array or any record in it is missing a field or has the wrong type.
pub fn decode_line(line: &str, task: TaskId) -> Result<Vec<Solution>, ProtocolError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<WorkerRecord> = serde_json::from_str(line)?;
    Ok(records
        .into_iter()
        .map(|r| Solution::new(task, r.tag, r.solution, r.score))
        .collect())
}

/// Highest-scoring solution seen so far for one task.
///
/// Starts at the sentinel; replaced only by a strictly higher score, so the
/// score never decreases and ties keep the earlier solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestSolution {
    current: Solution,
}

impl BestSolution {
    pub fn new(task: TaskId) -> Self {
        Self { current: Solution::sentinel(task) }
    }

    /// Offer a candidate, returning true if it became the new best.
    pub fn offer(&mut self, mut candidate: Solution) -> bool {
        if candidate.score <= self.current.score {
            return false;
        }
        candidate.stamp(self.current.task_id());
        self.current = candidate;
        true
    }

    pub fn score(&self) -> i64 {
        self.current.score
    }

    pub fn get(&self) -> &Solution {
        &self.current
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
