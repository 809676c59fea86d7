// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Behavior at the soft and hard deadlines.

use crate::prelude::*;
use std::time::{Duration, Instant};

#[test]
fn stubborn_solver_is_killed_but_its_answer_kept() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let stubborn = temp.worker(
        "stubborn",
        &format!("trap '' INT\n{}\nwhile :; do sleep 0.1; done", emit("stubborn", 5)),
    );

    let started = Instant::now();
    let out = temp
        .foreman()
        .args(["--disable-cgroup", "-m", "256", "-t", "3", "-f", p1.as_str()])
        .args(["--quick-solver", stubborn.as_str()])
        .passes();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(out.summary(), vec![(1, 0, "stubborn".into(), 5)]);
}

#[test]
fn interrupted_solver_reports_final_answer() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let polite = temp.worker(
        "polite",
        r#"trap 'echo "[{\"tag\":\"final\",\"solution\":\"s\",\"_score\":8}]"; exit 0' INT
echo '[{"tag":"interim","solution":"s","_score":2}]'
while :; do sleep 0.1; done"#,
    );

    let out = temp
        .foreman()
        .args(["--disable-cgroup", "-m", "256", "-t", "3", "-f", p1.as_str()])
        .args(["--quick-solver", polite.as_str()])
        .passes();
    assert_eq!(out.summary(), vec![(1, 0, "final".into(), 8)]);
}

#[test]
fn keepalive_reaches_solver() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    // Reports once per keepalive received.
    let counter = temp.worker(
        "counter",
        r#"n=0
trap 'n=$((n+1)); echo "[{\"tag\":\"beat\",\"solution\":\"s\",\"_score\":$n}]"; [ "$n" -ge 3 ] && exit 0' USR1
while :; do sleep 0.05; done"#,
    );

    let out = temp
        .foreman()
        .args(["--disable-cgroup", "-m", "256", "-t", "20", "-f", p1.as_str()])
        .args(["--quick-solver", counter.as_str()])
        .env("FOREMAN_HEARTBEAT_MS", "100")
        .passes();
    assert_eq!(out.summary(), vec![(1, 0, "beat".into(), 3)]);
}
