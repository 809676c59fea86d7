// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

const TASK: TaskId = TaskId { problem_id: 1, seed: 0 };

#[test]
fn decodes_array_of_records() {
    let line = r#"[{"problemId":1,"seed":0,"tag":"x","solution":"a","_score":10},{"tag":"y","solution":"b","_score":3}]"#;
    let solutions = decode_line(line, TASK).unwrap();
    assert_eq!(solutions.len(), 2);
    assert_eq!(solutions[0], Solution::new(TASK, "x", "a", 10));
    assert_eq!(solutions[1], Solution::new(TASK, "y", "b", 3));
}

#[test]
fn stamps_task_identity_over_worker_values() {
    let line = r#"[{"problemId":77,"seed":88,"tag":"x","solution":"a","_score":10}]"#;
    let solutions = decode_line(line, TASK).unwrap();
    assert_eq!(solutions[0].task_id(), TASK);
}

#[yare::parameterized(
    empty      = { "" },
    whitespace = { "   \t" },
    empty_list = { "[]" },
)]
fn blank_lines_decode_to_nothing(line: &str) {
    assert!(decode_line(line, TASK).unwrap().is_empty());
}

#[yare::parameterized(
    not_json          = { "score: 10" },
    object_not_array  = { r#"{"tag":"x","solution":"a","_score":1}"# },
    missing_tag       = { r#"[{"solution":"a","_score":1}]"# },
    missing_score     = { r#"[{"tag":"x","solution":"a"}]"# },
    numeric_tag       = { r#"[{"tag":5,"solution":"a","_score":1}]"# },
    array_solution    = { r#"[{"tag":"x","solution":["a"],"_score":1}]"# },
    float_score       = { r#"[{"tag":"x","solution":"a","_score":1.5}]"# },
    string_score      = { r#"[{"tag":"x","solution":"a","_score":"1"}]"# },
    one_bad_of_two    = { r#"[{"tag":"x","solution":"a","_score":1},{"tag":"y"}]"# },
)]
fn malformed_lines_are_rejected_whole(line: &str) {
    assert!(matches!(decode_line(line, TASK), Err(ProtocolError::Malformed(_))));
}

#[test]
fn best_keeps_higher_score_and_earlier_tie() {
    let mut best = BestSolution::new(TASK);
    assert!(best.offer(Solution::new(TASK, "x", "a", 10)));
    assert!(!best.offer(Solution::new(TASK, "y", "b", 5)));
    assert!(!best.offer(Solution::new(TASK, "z", "c", 10)));
    assert_eq!(best.get().tag, "x");
    assert_eq!(best.score(), 10);
}

#[test]
fn best_starts_at_sentinel_and_ignores_non_positive() {
    let mut best = BestSolution::new(TASK);
    assert!(best.get().is_sentinel());
    assert!(!best.offer(Solution::new(TASK, "neg", "", -4)));
    assert!(!best.offer(Solution::new(TASK, "zero", "", 0)));
    assert_eq!(best.get().tag, foreman_core::SENTINEL_TAG);
}

proptest! {
    #[test]
    fn best_score_is_running_maximum(scores in proptest::collection::vec(-50i64..500, 0..40)) {
        let mut best = BestSolution::new(TASK);
        let mut previous = best.score();
        for (i, score) in scores.iter().enumerate() {
            best.offer(Solution::new(TASK, format!("t{i}"), "", *score));
            prop_assert!(best.score() >= previous);
            previous = best.score();
        }
        let expected = scores.iter().copied().filter(|s| *s > 0).max().unwrap_or(0);
        prop_assert_eq!(best.score(), expected);
    }
}
