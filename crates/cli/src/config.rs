// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional TOML configuration file.
//!
//! Every field may be omitted. Command-line flags win over the file.
//!
//! ```toml
//! quick_solvers = ["bin/quick"]
//! heavy_solvers = ["bin/heavy"]
//! rewriter = "bin/rewriter"
//! phrases_file = "phrases.txt"
//! time_limit = 60
//! show_scores = true
//!
//! [cgroup]
//! name = "foreman"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub quick_solvers: Vec<String>,
    pub heavy_solvers: Vec<String>,
    pub extra_solvers: Vec<String>,
    pub rewriter: Option<String>,
    pub solver_wrapper: Option<String>,
    pub phrases: Vec<String>,
    pub phrases_file: Option<PathBuf>,
    pub prior: Option<PathBuf>,
    pub cores: Option<usize>,
    /// Seconds.
    pub time_limit: Option<u64>,
    /// MiB.
    pub mem_limit: Option<u64>,
    pub heartbeat_ms: Option<u64>,
    pub disable_cgroup: bool,
    pub cgroup: CgroupSection,
    pub show_scores: bool,
    pub strip_extra_fields: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CgroupSection {
    pub root: Option<PathBuf>,
    pub name: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
