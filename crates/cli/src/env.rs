// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variables and host queries.

use std::path::PathBuf;
use std::time::Duration;
use sysinfo::{System, SystemExt};

pub const CGROUP_ROOT_VAR: &str = "FOREMAN_CGROUP_ROOT";
pub const CGROUP_NAME_VAR: &str = "FOREMAN_CGROUP_NAME";
pub const HEARTBEAT_VAR: &str = "FOREMAN_HEARTBEAT_MS";

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Root of the cgroup hierarchy, if overridden.
pub fn cgroup_root() -> Option<PathBuf> {
    var(CGROUP_ROOT_VAR).map(PathBuf::from)
}

/// Name of the cgroup jobs join, if overridden.
pub fn cgroup_name() -> Option<String> {
    var(CGROUP_NAME_VAR)
}

/// Keepalive period, if overridden. Unparseable values are ignored.
pub fn heartbeat() -> Option<Duration> {
    let raw = var(HEARTBEAT_VAR)?;
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            tracing::warn!(var = HEARTBEAT_VAR, value = %raw, "ignoring invalid heartbeat");
            None
        }
    }
}

/// Number of CPUs this process may use.
pub fn cores() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Memory available for new processes, in MiB.
pub fn free_memory_mib() -> u64 {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.available_memory() / (1024 * 1024)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
