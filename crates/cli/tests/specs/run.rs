// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Full runs against shell-script workers.

use crate::prelude::*;

fn base() -> Vec<String> {
    ["--disable-cgroup", "-t", "20", "-c", "2", "-m", "256"].map(String::from).to_vec()
}

#[test]
fn prints_best_answer_per_task_in_load_order() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0, 7]);
    let p2 = temp.problem(2, &[3]);
    let quick = temp.worker("quick", &format!("{}\n{}", emit("q", 10), emit("q-worse", 4)));
    let heavy = temp.worker("heavy", &emit("h", 12));

    let out = temp
        .foreman()
        .args(base())
        .args(["-f", p1.as_str(), "-f", p2.as_str()])
        .args(["--quick-solver", quick.as_str(), "--heavy-solver", heavy.as_str()])
        .passes();

    assert_eq!(
        out.summary(),
        vec![(1, 0, "h".into(), 12), (1, 7, "h".into(), 12), (2, 3, "h".into(), 12)]
    );
}

#[test]
fn tasks_without_answers_get_sentinels() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let silent = temp.worker("silent", "exit 0");

    let out = temp.foreman().args(base()).args(["-f", p1.as_str(), "--quick-solver", silent.as_str()]).passes();
    assert_eq!(out.summary(), vec![(1, 0, "sentinel".into(), 0)]);
}

#[test]
fn solver_reads_single_seed_problem_on_stdin() {
    let temp = Project::empty();
    let p1 = temp.problem(5, &[11, 12]);
    // Scores the seed it was handed.
    let echoer = temp.worker(
        "echoer",
        r#"input=$(cat)
case "$input" in
  *'"sourceSeeds":[11]'*) score=11 ;;
  *'"sourceSeeds":[12]'*) score=12 ;;
  *) score=1 ;;
esac
echo "[{\"tag\":\"seen\",\"solution\":\"s\",\"_score\":$score}]""#,
    );

    let out = temp.foreman().args(base()).args(["-f", p1.as_str(), "--quick-solver", echoer.as_str()]).passes();
    assert_eq!(out.summary(), vec![(5, 11, "seen".into(), 11), (5, 12, "seen".into(), 12)]);
}

#[test]
fn crashing_solver_still_contributes() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let crashy = temp.worker("crashy", &format!("{}\nexit 9", emit("before-crash", 6)));

    let out = temp.foreman().args(base()).args(["-f", p1.as_str(), "--quick-solver", crashy.as_str()]).passes();
    assert_eq!(out.summary(), vec![(1, 0, "before-crash".into(), 6)]);
    assert!(out.stderr().contains("abnormally"), "stderr:\n{}", out.stderr());
}

#[test]
fn rewriter_improves_solver_answers() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let quick = temp.worker("quick", &emit("q", 3));
    let rewriter = temp.worker(
        "rewriter",
        r#"for arg in "$@"; do
  case "$arg" in
    --output=*) grep -q '"q-moves"' "${arg#--output=}" || exit 1 ;;
  esac
done
echo '[{"tag":"rewritten","solution":"better","_score":9}]'"#,
    );

    let out = temp
        .foreman()
        .args(base())
        .args(["-f", p1.as_str(), "--quick-solver", quick.as_str(), "--rewriter", rewriter.as_str()])
        .passes();
    assert_eq!(out.summary(), vec![(1, 0, "rewritten".into(), 9)]);
}

#[test]
fn phrases_reach_solver_and_rewriter() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let quick = temp.worker(
        "quick",
        r#"[ "$1 $2 $3 $4" = "-p ei! -p yuggoth" ] && echo '[{"tag":"q","solution":"s","_score":2}]'"#,
    );
    let rewriter = temp.worker(
        "rewriter",
        r#"[ "$1 $2" = "-p ei!,yuggoth" ] && echo '[{"tag":"rw","solution":"s","_score":5}]'"#,
    );

    let out = temp
        .foreman()
        .args(base())
        .args(["-f", p1.as_str(), "-p", "ei!", "-p", "yuggoth"])
        .args(["--quick-solver", quick.as_str(), "--rewriter", rewriter.as_str()])
        .passes();
    assert_eq!(out.summary(), vec![(1, 0, "rw".into(), 5)]);
}

#[test]
fn prior_solutions_compete_and_are_retagged() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0, 1]);
    let prior = temp.file(
        "prior.json",
        r#"[
            {"problemId": 1, "seed": 0, "tag": "old", "solution": "x", "_score": 40},
            {"problemId": 1, "seed": 1, "tag": "old", "solution": "x", "_score": 1},
            {"problemId": 9, "seed": 0, "tag": "old", "solution": "x", "_score": 99}
        ]"#,
    );
    let quick = temp.worker("quick", &emit("q", 20));

    let out = temp
        .foreman()
        .args(base())
        .args(["-f", p1.as_str(), "--quick-solver", quick.as_str(), "--prior", prior.to_str().unwrap()])
        .passes();
    assert_eq!(
        out.summary(),
        vec![(1, 0, "state-of-the-art".into(), 40), (1, 1, "q".into(), 20)]
    );
}

#[test]
fn strip_extra_fields_drops_score() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let quick = temp.worker("quick", &emit("q", 20));

    let out = temp
        .foreman()
        .args(base())
        .args(["-f", p1.as_str(), "--quick-solver", quick.as_str(), "--strip-extra-fields"])
        .passes();
    let answers = out.answers();
    assert_eq!(
        answers[0],
        serde_json::json!({"problemId": 1, "seed": 0, "tag": "q", "solution": "q-moves"})
    );
}

#[test]
fn show_scores_logs_report_to_stderr() {
    let temp = Project::empty();
    let p1 = temp.problem(3, &[0, 1]);
    let quick = temp.worker("quick", &emit("q", 20));

    let out = temp
        .foreman()
        .args(base())
        .args(["-f", p1.as_str(), "--quick-solver", quick.as_str(), "--show-scores"])
        .passes();
    assert!(out.stderr().contains("average score"), "stderr:\n{}", out.stderr());
    assert!(out.stderr().contains("p3/s1"));
    assert_eq!(out.answers().len(), 2);
}

#[test]
fn solver_wrapper_runs_solver() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let wrapper = temp.worker("wrapper", r#"exec "$@""#);
    let quick = temp.worker("quick", &emit("wrapped", 8));

    let out = temp
        .foreman()
        .args(base())
        .args(["-f", p1.as_str(), "--quick-solver", quick.as_str(), "--solver-wrapper", wrapper.as_str()])
        .passes();
    assert_eq!(out.summary(), vec![(1, 0, "wrapped".into(), 8)]);
}

#[test]
fn cgroup_limit_and_membership_are_written() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let quick = temp.worker("quick", &emit("q", 1));
    temp.file("cg/workers/memory.max", "");
    let procs = temp.file("cg/workers/cgroup.procs", "");

    temp.foreman()
        .args(["-t", "20", "-c", "1", "-m", "1152", "-f", p1.as_str(), "--quick-solver", quick.as_str()])
        .env("FOREMAN_CGROUP_ROOT", temp.path().join("cg"))
        .env("FOREMAN_CGROUP_NAME", "workers")
        .passes();

    let limit = std::fs::read_to_string(temp.path().join("cg/workers/memory.max")).unwrap();
    assert_eq!(limit.trim(), (1024u64 * 1024 * 1024).to_string());
    let pid = std::fs::read_to_string(procs).unwrap();
    assert!(pid.trim().parse::<u32>().is_ok(), "cgroup.procs: {pid:?}");
}

#[test]
fn missing_cgroup_is_logged_not_fatal() {
    let temp = Project::empty();
    let p1 = temp.problem(1, &[0]);
    let quick = temp.worker("quick", &emit("q", 1));

    let out = temp
        .foreman()
        .args(["-t", "20", "-c", "1", "-m", "256", "-f", p1.as_str(), "--quick-solver", quick.as_str()])
        .env("FOREMAN_CGROUP_ROOT", temp.path().join("no-cgroups"))
        .passes();
    assert!(out.stderr().contains("--disable-cgroup"), "stderr:\n{}", out.stderr());
    assert_eq!(out.summary(), vec![(1, 0, "q".into(), 1)]);
}
