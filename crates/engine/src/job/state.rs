// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle states.
//!
//! ```text
//! Created ─start─▶ Started ─interrupt─▶ Interrupted
//!                     │                      │
//!                     ├──────exit────────────┼──▶ Finished
//!                     └──────kill────────────┴──▶ Terminated
//! ```

/// Where a job is in its lifecycle. `Finished` and `Terminated` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// No process exists yet.
    Created,
    /// Process spawned and its output is being read.
    Started,
    /// Graceful stop requested; the process may still report results.
    Interrupted,
    /// Process exited (any exit code), or never launched.
    Finished,
    /// Process was forcibly killed.
    Terminated,
}

foreman_core::simple_display! {
    JobState {
        Created => "created",
        Started => "started",
        Interrupted => "interrupted",
        Finished => "finished",
        Terminated => "terminated",
    }
}

impl JobState {
    pub fn is_running(self) -> bool {
        matches!(self, JobState::Started | JobState::Interrupted)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Finished | JobState::Terminated)
    }
}
