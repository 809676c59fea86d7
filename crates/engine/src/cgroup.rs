// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Memory confinement groups for worker processes.
//!
//! The group itself is created by an external setup step. The supervisor
//! only writes the memory ceiling once per run and moves each worker into the
//! group right after spawn.

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CGROUP_ROOT: &str = "/sys/fs/cgroup";
pub const DEFAULT_CGROUP_NAME: &str = "foreman";

const PROCS_FILE: &str = "cgroup.procs";
const MEMORY_MAX_FILE: &str = "memory.max";
const MEMORY_LIMIT_V1_FILE: &str = "memory.limit_in_bytes";

#[derive(Debug, Error)]
pub enum CgroupError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A named group under a cgroup hierarchy root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cgroup {
    root: PathBuf,
    name: String,
}

impl Cgroup {
    pub fn new(root: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { root: root.into(), name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(&self.name)
    }

    /// Move `pid` into this group.
    pub fn attach(&self, pid: u32) -> Result<(), CgroupError> {
        write_existing(&self.path().join(PROCS_FILE), &pid.to_string())
    }

    /// Write the group's memory ceiling, returning the file written.
    ///
    /// Uses the v1 `memory.limit_in_bytes` file when present, otherwise the
    /// v2 `memory.max`.
    pub fn set_memory_limit(&self, bytes: u64) -> Result<PathBuf, CgroupError> {
        let dir = self.path();
        let v1 = dir.join(MEMORY_LIMIT_V1_FILE);
        let file = if v1.exists() { v1 } else { dir.join(MEMORY_MAX_FILE) };
        write_existing(&file, &bytes.to_string())?;
        Ok(file)
    }
}

impl Default for Cgroup {
    fn default() -> Self {
        Self::new(DEFAULT_CGROUP_ROOT, DEFAULT_CGROUP_NAME)
    }
}

fn write_existing(path: &Path, value: &str) -> Result<(), CgroupError> {
    let err = |source| CgroupError::Write { path: path.to_path_buf(), source };
    let mut file = std::fs::OpenOptions::new().write(true).open(path).map_err(err)?;
    writeln!(file, "{value}").map_err(err)
}

#[cfg(test)]
#[path = "cgroup_tests.rs"]
mod tests;
