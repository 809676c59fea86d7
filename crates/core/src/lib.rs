// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman-core: tasks, solutions and problem loading shared by the
//! foreman supervisor crates.

pub mod macros;

pub mod error;
pub mod prior;
pub mod problem;
pub mod score;
pub mod solution;
pub mod task;

pub use error::CoreError;
pub use prior::{load_priors, PRIOR_TAG};
pub use problem::{load_tasks, Problem};
pub use score::{ScoreReport, ScoreRow};
pub use solution::{OfficialSolution, Solution, SENTINEL_TAG};
pub use task::{Task, TaskId};
