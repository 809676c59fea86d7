// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-engine: supervising external solver and rewriter processes.
//!
//! A [`Job`] runs one worker against one task and tracks the best result it
//! reports. The [`Scheduler`] runs batches of jobs between a soft and a hard
//! deadline, and the [`Supervisor`] plans the solve and rewrite phases on
//! top of it before [`choose_best`] reduces everything to one answer per
//! task.

pub mod aggregate;
pub mod cgroup;
pub mod config;
pub mod error;
pub mod job;
pub mod policy;
pub mod protocol;
pub mod scheduler;
pub mod signal;

pub use aggregate::choose_best;
pub use cgroup::{Cgroup, CgroupError};
pub use config::SupervisorConfig;
pub use error::{CallbackError, JobError};
pub use job::{Job, JobEvent, JobKind, JobState, Priority, Role};
pub use policy::{PhaseWindow, Supervisor};
pub use protocol::{BestSolution, ProtocolError};
pub use scheduler::{RunReport, Scheduler};
pub use signal::WorkerSignal;
