// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Writing the answers and the score report.

use foreman_core::{ScoreReport, Solution};
use std::io::Write;

/// Write `answers` as one JSON array followed by a newline. With `strip`,
/// fields starting with `_` are left out.
pub fn write_answers(out: &mut impl Write, answers: &[Solution], strip: bool) -> anyhow::Result<()> {
    if strip {
        let official: Vec<_> = answers.iter().map(Solution::official).collect();
        serde_json::to_writer(&mut *out, &official)?;
    } else {
        serde_json::to_writer(&mut *out, answers)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Log every answer's score, then the average per problem.
pub fn log_scores(answers: &[Solution]) {
    let report = ScoreReport::new(answers);
    tracing::info!("score stats:");
    for row in &report.rows {
        tracing::info!(task = %row.task, score = row.score, tag = %row.tag, "score");
    }
    for (problem_id, average) in &report.averages {
        tracing::info!(problem = problem_id, average, "average score");
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
