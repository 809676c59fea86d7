// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor configuration.

use crate::cgroup::Cgroup;
use crate::job::DEFAULT_HEARTBEAT;
use std::time::Duration;

/// Time between the soft and hard deadline of every phase.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(500);

/// Least time reserved for the rewrite phase.
pub const DEFAULT_MIN_REWRITE: Duration = Duration::from_secs(3);

/// Rewrite time reserved per unit of total task size.
pub const DEFAULT_REWRITE_PER_UNIT: Duration = Duration::from_millis(1);

/// Everything the phase policy needs to build and run jobs.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub quick_solvers: Vec<String>,
    pub heavy_solvers: Vec<String>,
    pub extra_solvers: Vec<String>,
    pub rewriter: Option<String>,
    pub phrases: Vec<String>,
    pub concurrency: usize,
    pub cgroup: Option<Cgroup>,
    pub wrapper: Option<String>,
    pub heartbeat: Duration,
    pub grace: Duration,
    pub min_rewrite: Duration,
    pub rewrite_per_unit: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            quick_solvers: Vec::new(),
            heavy_solvers: Vec::new(),
            extra_solvers: Vec::new(),
            rewriter: None,
            phrases: Vec::new(),
            concurrency: 1,
            cgroup: None,
            wrapper: None,
            heartbeat: DEFAULT_HEARTBEAT,
            grace: DEFAULT_GRACE,
            min_rewrite: DEFAULT_MIN_REWRITE,
            rewrite_per_unit: DEFAULT_REWRITE_PER_UNIT,
        }
    }
}

impl SupervisorConfig {
    foreman_core::setters! {
        into {
            quick_solvers: Vec<String>,
            heavy_solvers: Vec<String>,
            extra_solvers: Vec<String>,
            phrases: Vec<String>,
        }
        set {
            concurrency: usize,
            cgroup: Option<Cgroup>,
            heartbeat: Duration,
            grace: Duration,
            min_rewrite: Duration,
            rewrite_per_unit: Duration,
        }
        option {
            rewriter: String,
            wrapper: String,
        }
    }

    /// Argument vector for one solver program: the program followed by
    /// `-p <phrase>` for every power phrase.
    pub fn solver_args(&self, program: &str) -> Vec<String> {
        let mut args = vec![program.to_string()];
        for phrase in &self.phrases {
            args.push("-p".to_string());
            args.push(phrase.clone());
        }
        args
    }

    /// Argument vector for the rewriter: the program followed by `-p` and
    /// the comma-joined power phrases.
    pub fn rewriter_args(&self) -> Option<Vec<String>> {
        let program = self.rewriter.as_ref()?;
        Some(vec![program.clone(), "-p".to_string(), self.phrases.join(",")])
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
