// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Problem documents and their expansion into per-seed tasks.

use crate::error::CoreError;
use crate::task::{Task, TaskId};
use serde::Deserialize;
use std::path::Path;

const SEEDS_FIELD: &str = "sourceSeeds";

/// Fields of a problem document the supervisor reads. Everything else is
/// passed through to workers untouched.
#[derive(Debug, Clone, Deserialize)]
struct Header {
    id: u64,
    width: u64,
    height: u64,
    #[serde(rename = "sourceSeeds")]
    source_seeds: Vec<u64>,
}

/// A loaded problem document.
#[derive(Debug, Clone)]
pub struct Problem {
    header: Header,
    document: serde_json::Value,
}

impl Problem {
    pub fn from_value(document: serde_json::Value) -> Result<Self, CoreError> {
        let header = Header::deserialize(&document)
            .map_err(|e| CoreError::InvalidProblem(e.to_string()))?;
        Ok(Self { header, document })
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| CoreError::Read { path: path.to_path_buf(), source })?;
        let document = serde_json::from_str(&text)
            .map_err(|source| CoreError::Json { path: path.to_path_buf(), source })?;
        Self::from_value(document)
    }

    pub fn id(&self) -> u64 {
        self.header.id
    }

    pub fn seeds(&self) -> &[u64] {
        &self.header.source_seeds
    }

    /// Board area, used as the task cost proxy.
    pub fn size(&self) -> u64 {
        self.header.width.saturating_mul(self.header.height)
    }

    /// One task per seed; each payload is the document with its seed list
    /// narrowed to that seed.
    pub fn tasks(&self) -> Vec<Task> {
        self.header
            .source_seeds
            .iter()
            .map(|&seed| {
                let mut payload = self.document.clone();
                if let Some(obj) = payload.as_object_mut() {
                    obj.insert(SEEDS_FIELD.to_string(), serde_json::json!([seed]));
                }
                Task::new(TaskId::new(self.header.id, seed), self.size(), payload)
            })
            .collect()
    }
}

/// Load every problem file and expand them into tasks, preserving file and
/// seed order.
pub fn load_tasks<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Task>, CoreError> {
    let mut tasks = Vec::new();
    for path in paths {
        tasks.extend(Problem::load(path.as_ref())?.tasks());
    }
    Ok(tasks)
}

#[cfg(test)]
#[path = "problem_tests.rs"]
mod tests;
