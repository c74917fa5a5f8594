//! Quiz record parsing and validation.
//!
//! Parsing turns JSON into a typed [`Quiz`]; shape errors (missing fields,
//! a list where a string is expected, non-numeric weights) are reported as
//! [`ValidationError`]. [`validate_for_activation`] adds the rules a quiz
//! must satisfy before it can be served, and [`lint_quiz`] reports soft
//! issues that do not block anything.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::ValidationError;
use crate::model::{Question, QuestionKind, Quiz};

const REQUIRED_FIELDS: [&str; 3] = ["name", "title", "questions"];

/// Parse a JSON string into a quiz record.
pub fn parse_quiz_str(content: &str) -> Result<Quiz, ValidationError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| ValidationError::Malformed(format!("invalid JSON: {e}")))?;

    let Some(object) = value.as_object() else {
        return Err(ValidationError::Malformed(
            "expected a JSON object".to_string(),
        ));
    };
    for field in REQUIRED_FIELDS {
        if !object.contains_key(field) {
            return Err(ValidationError::MissingField(field));
        }
    }

    serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Read and parse a quiz file from an arbitrary path.
pub fn parse_quiz_file(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    parse_quiz_str(&content).with_context(|| format!("invalid quiz file: {}", path.display()))
}

/// Check that a name can be used as a store key (and therefore a file name).
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    let unsafe_name = trimmed.is_empty()
        || trimmed != name
        || trimmed.starts_with('.')
        || trimmed.contains(['/', '\\', '\0'])
        || trimmed.contains("..");
    if unsafe_name {
        return Err(ValidationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Validate a single question. `number` is 1-based and only used for messages.
pub fn validate_question(number: usize, question: &Question) -> Result<(), ValidationError> {
    let fail = |reason: &str| ValidationError::Question {
        number,
        reason: reason.to_string(),
    };

    if question.text.trim().is_empty() {
        return Err(fail("missing text"));
    }
    if !question.weight.is_finite() {
        return Err(fail("weight must be a number"));
    }
    if question.weight <= 0.0 {
        return Err(fail("weight must be positive"));
    }
    if question.question_type().is_choice() && question.options().len() < 2 {
        return Err(fail("multiple choice needs at least 2 options"));
    }
    Ok(())
}

/// Everything a quiz must satisfy before it can be activated.
pub fn validate_for_activation(quiz: &Quiz) -> Result<(), ValidationError> {
    validate_name(&quiz.name)?;
    if quiz.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if quiz.timer_minutes == 0 {
        return Err(ValidationError::InvalidTimer);
    }
    if quiz.questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }
    for (i, question) in quiz.questions.iter().enumerate() {
        validate_question(i + 1, question)?;
    }
    Ok(())
}

/// A non-fatal issue found in a quiz.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// 1-based question number, if the warning is about a question.
    pub question: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Report soft issues: answers that can never match, duplicates, manual grading.
pub fn lint_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |question: Option<usize>, message: String| {
        warnings.push(ValidationWarning { question, message });
    };

    let mut seen_text = HashSet::new();
    for (i, question) in quiz.questions.iter().enumerate() {
        let number = Some(i + 1);

        if !seen_text.insert(question.text.trim()) {
            warn(number, "duplicate question text".into());
        }

        let mut seen_options = HashSet::new();
        for option in question.options() {
            if !seen_options.insert(option.trim()) {
                warn(number, format!("duplicate option: {option}"));
            }
        }

        let in_options = |answer: &str| question.options().iter().any(|o| o.trim() == answer.trim());

        match &question.kind {
            QuestionKind::MultipleChoiceSingle { correct_answer, .. } => {
                if correct_answer.trim().is_empty() {
                    warn(number, "no correct answer set; it can never be scored correct".into());
                } else if !in_options(correct_answer) {
                    warn(number, format!("correct answer {correct_answer:?} is not one of the options"));
                }
            }
            QuestionKind::MultipleChoiceMultiple { correct_answer, .. } => {
                if correct_answer.is_empty() {
                    warn(number, "no correct answers set".into());
                }
                for answer in correct_answer.iter().filter(|a| !in_options(a)) {
                    warn(number, format!("correct answer {answer:?} is not one of the options"));
                }
            }
            QuestionKind::TrueFalse { correct_answer } => {
                if !matches!(correct_answer.trim(), "True" | "False") {
                    warn(number, format!("true/false answer should be \"True\" or \"False\", got {correct_answer:?}"));
                }
            }
            QuestionKind::ShortAnswer { .. } | QuestionKind::Paragraph { .. } => {
                if question.needs_manual_grading() {
                    warn(number, "no correct answer set; requires manual grading".into());
                }
            }
        }
    }

    if quiz.start_message.trim().is_empty() {
        warn(None, "start message is empty".into());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_QUIZ: &str = r#"{
        "name": "capitals",
        "title": "World Capitals",
        "timer_minutes": 15,
        "start_message": "Good luck!",
        "questions": [
            {"type": "multiple_choice_single", "text": "Capital of Japan?", "weight": 1,
             "options": ["Tokyo", "Kyoto"], "correct_answer": "Tokyo"},
            {"type": "true_false", "text": "Canberra is in Australia.", "correct_answer": "True"},
            {"type": "short_answer", "text": "Capital of France?", "weight": 2, "correct_answer": "Paris"},
            {"type": "paragraph", "text": "Why do capitals move?"}
        ]
    }"#;

    #[test]
    fn parse_valid_quiz() {
        let quiz = parse_quiz_str(VALID_QUIZ).unwrap();
        assert_eq!(quiz.name, "capitals");
        assert_eq!(quiz.questions.len(), 4);
        assert!(quiz.require_full_name);
        assert!(!quiz.shuffle_questions);
        assert_eq!(quiz.end_message, "Thank you for completing the quiz!");
        validate_for_activation(&quiz).unwrap();
    }

    #[test]
    fn missing_questions_field_is_rejected() {
        let err = parse_quiz_str(r#"{"name": "x", "title": "X"}"#).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("questions"));
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(
            parse_quiz_str("[1, 2, 3]"),
            Err(ValidationError::Malformed(_))
        ));
        assert!(matches!(
            parse_quiz_str("not json {"),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_question_type_is_malformed() {
        let json = r#"{"name": "x", "title": "X", "questions": [{"type": "essay", "text": "Q"}]}"#;
        assert!(matches!(parse_quiz_str(json), Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn zero_questions_blocks_activation() {
        let quiz = parse_quiz_str(r#"{"name": "x", "title": "X", "questions": []}"#).unwrap();
        assert_eq!(
            validate_for_activation(&quiz),
            Err(ValidationError::NoQuestions)
        );
    }

    #[test]
    fn choice_question_needs_two_options() {
        let json = r#"{"name": "x", "title": "X", "questions": [
            {"type": "multiple_choice_single", "text": "Q", "options": ["only"], "correct_answer": "only"}
        ]}"#;
        let quiz = parse_quiz_str(json).unwrap();
        let err = validate_for_activation(&quiz).unwrap_err();
        assert!(err.to_string().contains("question 1"));
        assert!(err.to_string().contains("at least 2 options"));
    }

    #[test]
    fn blank_question_text_is_rejected() {
        let json = r#"{"name": "x", "title": "X", "questions": [
            {"type": "true_false", "text": "ok", "correct_answer": "True"},
            {"type": "true_false", "text": "   ", "correct_answer": "True"}
        ]}"#;
        let quiz = parse_quiz_str(json).unwrap();
        let err = validate_for_activation(&quiz).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Question {
                number: 2,
                reason: "missing text".into()
            }
        );
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        let json = r#"{"name": "x", "title": "X", "questions": [
            {"type": "true_false", "text": "ok", "weight": 0, "correct_answer": "True"}
        ]}"#;
        let quiz = parse_quiz_str(json).unwrap();
        assert!(validate_for_activation(&quiz)
            .unwrap_err()
            .to_string()
            .contains("weight must be positive"));
    }

    #[test]
    fn zero_timer_is_rejected() {
        let json = r#"{"name": "x", "title": "X", "timer_minutes": 0, "questions": [
            {"type": "true_false", "text": "ok", "correct_answer": "True"}
        ]}"#;
        let quiz = parse_quiz_str(json).unwrap();
        assert_eq!(
            validate_for_activation(&quiz),
            Err(ValidationError::InvalidTimer)
        );
    }

    #[test]
    fn names_that_escape_the_store_are_rejected() {
        assert!(validate_name("algebra-1").is_ok());
        assert!(validate_name("Unit 3 Quiz").is_ok());
        for bad in ["", "  ", "../etc", "a/b", "a\\b", ".hidden", " padded "] {
            assert!(validate_name(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn lint_flags_answer_outside_options() {
        let json = r#"{"name": "x", "title": "X", "start_message": "hi", "questions": [
            {"type": "multiple_choice_single", "text": "Q1", "options": ["A", "B"], "correct_answer": "C"},
            {"type": "multiple_choice_multiple", "text": "Q2", "options": ["A", "A"], "correct_answer": ["A"]},
            {"type": "true_false", "text": "Q3", "correct_answer": "yes"},
            {"type": "short_answer", "text": "Q4"}
        ]}"#;
        let quiz = parse_quiz_str(json).unwrap();
        let warnings = lint_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.question == Some(1) && w.message.contains("not one of the options")));
        assert!(warnings
            .iter()
            .any(|w| w.question == Some(2) && w.message.contains("duplicate option")));
        assert!(warnings
            .iter()
            .any(|w| w.question == Some(3) && w.message.contains("True")));
        assert!(warnings
            .iter()
            .any(|w| w.question == Some(4) && w.message.contains("manual grading")));
    }

    #[test]
    fn lint_flags_empty_start_message_regardless_of_name_requirement() {
        for require_full_name in [true, false] {
            let json = format!(
                r#"{{"name": "x", "title": "X", "require_full_name": {require_full_name}, "questions": [
                    {{"type": "true_false", "text": "Q1", "correct_answer": "True"}}
                ]}}"#
            );
            let quiz = parse_quiz_str(&json).unwrap();
            let warnings = lint_quiz(&quiz);
            assert_eq!(warnings.len(), 1, "require_full_name = {require_full_name}");
            assert_eq!(warnings[0].question, None);
            assert_eq!(warnings[0].message, "start message is empty");
        }
    }

    #[test]
    fn parse_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        let err = parse_quiz_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }
}
