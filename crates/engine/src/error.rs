// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while launching and supervising worker processes.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to launch a job's worker process.
///
/// Never escapes the scheduler: a job that fails to launch is finalized as
/// finished with no exit status.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("job has no program to run")]
    EmptyCommand,

    #[error("job already started")]
    AlreadyStarted,

    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stage worker input: {0}")]
    Stage(#[from] std::io::Error),

    #[error("failed to encode worker input: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Error returned by a finish callback. Logged and otherwise ignored.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;
