// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Known-good solutions recorded by earlier runs.

use crate::error::CoreError;
use crate::solution::Solution;
use crate::task::TaskId;
use std::collections::HashSet;
use std::path::Path;

/// Tag given to every prior so the aggregate output shows where it came from.
pub const PRIOR_TAG: &str = "state-of-the-art";

/// Load a JSON array of solutions, keeping only those for `known` tasks.
pub fn load_priors(path: &Path, known: &HashSet<TaskId>) -> Result<Vec<Solution>, CoreError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| CoreError::Read { path: path.to_path_buf(), source })?;
    let solutions: Vec<Solution> = serde_json::from_str(&text)
        .map_err(|source| CoreError::Json { path: path.to_path_buf(), source })?;
    Ok(solutions
        .into_iter()
        .filter(|s| known.contains(&s.task_id()))
        .map(|mut s| {
            s.tag = PRIOR_TAG.to_string();
            s
        })
        .collect())
}

#[cfg(test)]
#[path = "prior_tests.rs"]
mod tests;
