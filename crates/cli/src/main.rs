// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! foreman: run solver and rewriter programs against problems under a time
//! limit and print the best answer for every task.

mod cli;
mod config;
mod env;
mod logging;
mod output;
mod run;

use clap::Parser;
use cli::Cli;
use config::FileConfig;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let started = tokio::time::Instant::now();
    let cli = Cli::parse();
    logging::init();

    let result: anyhow::Result<()> = async move {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let settings = cli.resolve(file)?;
        run::run(settings, started).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
