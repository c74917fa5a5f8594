//! Deterministic scoring of a submission against a quiz's questions.
//!
//! Comparison trims surrounding whitespace and nothing else: case is
//! preserved so answers in any script compare exactly. There is no partial
//! credit.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, Answers, Question, QuestionKind, QuestionType};

/// Tri-state correctness of one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    Correct,
    Incorrect,
    /// No declared answer; a human has to grade it.
    Manual,
}

impl Correctness {
    /// CSV / report spelling: `True`, `False`, `Manual`.
    pub fn label(&self) -> &'static str {
        match self {
            Correctness::Correct => "True",
            Correctness::Incorrect => "False",
            Correctness::Manual => "Manual",
        }
    }
}

/// Outcome for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    /// 1-based question number.
    pub question_num: usize,
    pub correct: Correctness,
    pub points_earned: f64,
    pub points_possible: f64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// What the student submitted, if anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_answer: Option<AnswerValue>,
}

/// Totals plus the per-question breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub total_points: f64,
    pub earned_points: f64,
    /// `earned / total * 100`, rounded to two decimals; 0 when total is 0.
    pub percentage: f64,
    pub question_results: Vec<QuestionScore>,
}

impl ScoreReport {
    /// Number of questions awaiting manual grading.
    pub fn manual_count(&self) -> usize {
        self.question_results
            .iter()
            .filter(|r| r.correct == Correctness::Manual)
            .count()
    }
}

/// Grade one answer against one question.
pub fn grade_answer(question: &Question, answer: &AnswerValue) -> Correctness {
    let verdict = |ok: bool| {
        if ok {
            Correctness::Correct
        } else {
            Correctness::Incorrect
        }
    };

    match &question.kind {
        QuestionKind::MultipleChoiceSingle { correct_answer, .. }
        | QuestionKind::TrueFalse { correct_answer } => verdict(text_matches(answer, correct_answer)),
        QuestionKind::MultipleChoiceMultiple { correct_answer, .. } => {
            let submitted: BTreeSet<&str> = match answer {
                AnswerValue::Text(s) => BTreeSet::from([s.trim()]),
                AnswerValue::Choices(items) => items.iter().map(|s| s.trim()).collect(),
            };
            let expected: BTreeSet<&str> = correct_answer.iter().map(|s| s.trim()).collect();
            verdict(submitted == expected)
        }
        QuestionKind::ShortAnswer { correct_answer } | QuestionKind::Paragraph { correct_answer } => {
            match correct_answer.as_deref() {
                Some(expected) if !expected.trim().is_empty() => {
                    verdict(text_matches(answer, expected))
                }
                _ => Correctness::Manual,
            }
        }
    }
}

fn text_matches(answer: &AnswerValue, expected: &str) -> bool {
    match answer {
        AnswerValue::Text(s) => s.trim() == expected.trim(),
        AnswerValue::Choices(_) => false,
    }
}

/// Score a full submission. Answers are keyed by 0-based question index.
pub fn score(questions: &[Question], answers: &Answers) -> ScoreReport {
    let mut total_points = 0.0;
    let mut earned_points = 0.0;
    let mut question_results = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let weight = question.weight;
        total_points += weight;

        let user_answer = answers.get(&i.to_string()).cloned();
        let correct = match &user_answer {
            Some(answer) => grade_answer(question, answer),
            None => Correctness::Incorrect,
        };
        let points_earned = if correct == Correctness::Correct {
            weight
        } else {
            0.0
        };
        earned_points += points_earned;

        tracing::debug!(
            question = i + 1,
            kind = %question.question_type(),
            ?correct,
            "graded answer"
        );

        question_results.push(QuestionScore {
            question_num: i + 1,
            correct,
            points_earned,
            points_possible: weight,
            question_type: question.question_type(),
            user_answer,
        });
    }

    let percentage = if total_points > 0.0 {
        round2(earned_points / total_points * 100.0)
    } else {
        0.0
    };

    ScoreReport {
        total_points,
        earned_points,
        percentage,
        question_results,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
