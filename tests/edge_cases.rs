//! Edge case tests: degenerate corpora must not panic.

use quizlint::analyzer::LintEngine;
use quizlint::FlagKind;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn lint_str(content: &str) -> Result<quizlint::CorpusReport, quizlint::SkippedCorpus> {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    lint_path(file.path())
}

fn lint_path(path: &Path) -> Result<quizlint::CorpusReport, quizlint::SkippedCorpus> {
    LintEngine::new().lint_path(path, None)
}

#[test]
fn empty_file_is_skipped() {
    let err = lint_str("").unwrap_err();
    assert!(err.reason.contains("invalid JSON"), "{}", err.reason);
}

#[test]
fn top_level_array_is_skipped() {
    let err = lint_str(r#"[{"correctAnswer": "x"}]"#).unwrap_err();
    assert!(err.reason.contains("not a JSON object"), "{}", err.reason);
}

#[test]
fn questions_not_an_array_is_skipped() {
    let err = lint_str(r#"{"questions": "none"}"#).unwrap_err();
    assert!(err.reason.contains("no questions array"), "{}", err.reason);
}

#[test]
fn missing_file_is_skipped() {
    let err = lint_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.reason.contains("failed to read"), "{}", err.reason);
}

#[test]
fn empty_questions_pass_with_zero_ratio() {
    let r = lint_str(r#"{"questions": []}"#).unwrap();
    assert_eq!(r.verdict.total_questions, 0);
    assert_eq!(r.verdict.blocking_ratio, 0.0);
    assert!(r.verdict.passed);
}

#[test]
fn non_object_question_has_no_distractors() {
    let r = lint_str(r#"{"questions": [42, null, "text"]}"#).unwrap();
    assert_eq!(r.questions.len(), 3);
    assert_eq!(r.questions[0].id, "q_001");
    assert!(r.questions.iter().all(|q| q.has(FlagKind::NoDistractors)));
    assert!(!r.verdict.passed);
}

#[test]
fn missing_correct_answer_does_not_panic() {
    let r = lint_str(r#"{"questions": [{"distractors": ["Tax", "Subsidy"]}]}"#).unwrap();
    assert_eq!(r.questions.len(), 1);
    let stats = &r.questions[0].diagnostics.as_ref().unwrap().length;
    assert_eq!(stats.correct_words, 0);
}

#[test]
fn only_whitespace_distractors() {
    let r = lint_str(r#"{"questions": [{"correctAnswer": "Tax", "distractors": ["  ", ""]}]}"#)
        .unwrap();
    assert!(r.questions[0].has(FlagKind::NoDistractors));
}

#[test]
fn all_distractors_duplicate_the_correct_answer() {
    let r = lint_str(
        r#"{"questions": [{"correctAnswer": "Tax", "distractors": ["Tax", " Tax "]}]}"#,
    )
    .unwrap();
    let q = &r.questions[0];
    let kinds: Vec<FlagKind> = q.flags.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FlagKind::DuplicateCorrect, FlagKind::NoDistractors]);
    assert!(q.diagnostics.is_none());
}

#[test]
fn null_distractors_fall_back_to_options() {
    let r = lint_str(
        r#"{"questions": [{"correctAnswer": "Moral hazard", "distractors": null, "options": ["Moral hazard", "Adverse selection", "Signaling"]}]}"#,
    )
    .unwrap();
    let q = &r.questions[0];
    assert!(q.flags.is_empty(), "{:?}", q.flags);
    assert_eq!(q.diagnostics.as_ref().unwrap().length.distractor_words.len(), 2);
}

#[test]
fn numeric_and_boolean_values_are_coerced() {
    let r = lint_str(
        r#"{"questions": [{"id": 17, "correctAnswer": 42, "distractors": [41, true, "forty"]}]}"#,
    )
    .unwrap();
    let q = &r.questions[0];
    assert_eq!(q.id, "17");
    assert!(q.flags.is_empty());
}

#[test]
fn unicode_answers_no_panic() {
    let r = lint_str(
        r#"{"questions": [{"correctAnswer": "Élasticité — prix croisée", "distractors": ["税", "Ωμέγα βήτα", "😀 emoji answer"]}]}"#,
    )
    .unwrap();
    assert_eq!(r.questions.len(), 1);
}

#[test]
fn extra_fields_are_ignored() {
    let r = lint_str(
        r#"{"week": 3, "meta": {"a": 1}, "questions": [{"correctAnswer": "Tax", "distractors": ["Subsidy", "Quota"], "imageUrl": "x.png"}]}"#,
    )
    .unwrap();
    assert_eq!(r.questions.len(), 1);
}

#[test]
fn large_corpus_no_panic() {
    let question = r#"{"correctAnswer": "Adverse selection among applicants", "distractors": ["Moral hazard only", "A fall in equilibrium wage rates", "Perfectly elastic demand for coverage policies"]}"#;
    let body = vec![question; 2000].join(",");
    let r = lint_str(&format!(r#"{{"questions": [{}]}}"#, body)).unwrap();
    assert_eq!(r.verdict.total_questions, 2000);
    assert_eq!(r.verdict.blocking_questions, 0);
}
