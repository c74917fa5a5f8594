//! Core data model types for quizdesk.
//!
//! A [`Quiz`] is the authored record persisted by the store. Each
//! [`Question`] carries a [`QuestionKind`] whose `type` tag selects the
//! shape of the expected answer, so shape errors surface when a record is
//! parsed rather than when it is scored.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An authored quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier; also the file name in the store.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Whether students must enter a name before submitting.
    #[serde(default = "default_true")]
    pub require_full_name: bool,
    /// Time allowed per student, in minutes.
    #[serde(default = "default_timer_minutes")]
    pub timer_minutes: u32,
    /// Shuffle question order once per activation.
    #[serde(default)]
    pub shuffle_questions: bool,
    /// Shown before the quiz starts.
    #[serde(default)]
    pub start_message: String,
    /// Shown after a successful submission.
    #[serde(default = "default_end_message")]
    pub end_message: String,
    /// Ordered questions. Index is the answer key.
    pub questions: Vec<Question>,
    /// Set by the store on every save.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub last_modified: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

pub(crate) fn default_timer_minutes() -> u32 {
    30
}

pub(crate) fn default_end_message() -> String {
    "Thank you for completing the quiz!".to_string()
}

/// A single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt shown to the student.
    pub text: String,
    /// Points awarded for a correct answer.
    #[serde(default = "default_weight", deserialize_with = "deserialize_weight")]
    pub weight: f64,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

fn default_weight() -> f64 {
    1.0
}

/// Accepts a JSON number or a numeric string (`"2"`, `"1.5"`).
fn deserialize_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawWeight {
        Number(f64),
        Text(String),
        Null(()),
    }

    match RawWeight::deserialize(deserializer)? {
        RawWeight::Number(n) => Ok(n),
        RawWeight::Null(()) => Ok(default_weight()),
        RawWeight::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("weight must be a number, got {s:?}"))),
    }
}

/// RFC 3339, or a local time without offset (`2024-05-01T10:00:00.123456`)
/// as older quiz files carry. Anything else is dropped.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(t.with_timezone(&Utc)));
    }
    let local = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest());
    Ok(local.map(|t| t.with_timezone(&Utc)))
}

/// `null` and absent both mean "use the default".
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Question variants. The `type` tag selects the answer shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoiceSingle {
        #[serde(default, deserialize_with = "null_as_default")]
        options: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        correct_answer: String,
    },
    MultipleChoiceMultiple {
        #[serde(default, deserialize_with = "null_as_default")]
        options: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        correct_answer: Vec<String>,
    },
    TrueFalse {
        #[serde(default, deserialize_with = "null_as_default")]
        correct_answer: String,
    },
    ShortAnswer {
        #[serde(default)]
        correct_answer: Option<String>,
    },
    Paragraph {
        #[serde(default)]
        correct_answer: Option<String>,
    },
}

impl Question {
    /// The type tag of this question.
    pub fn question_type(&self) -> QuestionType {
        match &self.kind {
            QuestionKind::MultipleChoiceSingle { .. } => QuestionType::MultipleChoiceSingle,
            QuestionKind::MultipleChoiceMultiple { .. } => QuestionType::MultipleChoiceMultiple,
            QuestionKind::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionKind::ShortAnswer { .. } => QuestionType::ShortAnswer,
            QuestionKind::Paragraph { .. } => QuestionType::Paragraph,
        }
    }

    /// Options for choice questions; empty for the other types.
    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::MultipleChoiceSingle { options, .. }
            | QuestionKind::MultipleChoiceMultiple { options, .. } => options,
            _ => &[],
        }
    }

    /// True when the question has no declared answer and must be graded by hand.
    pub fn needs_manual_grading(&self) -> bool {
        match &self.kind {
            QuestionKind::ShortAnswer { correct_answer }
            | QuestionKind::Paragraph { correct_answer } => correct_answer
                .as_deref()
                .map_or(true, |a| a.trim().is_empty()),
            _ => false,
        }
    }

    /// The declared correct answer rendered for humans (multi answers comma-joined).
    pub fn correct_answer_display(&self) -> String {
        match &self.kind {
            QuestionKind::MultipleChoiceSingle { correct_answer, .. }
            | QuestionKind::TrueFalse { correct_answer } => correct_answer.clone(),
            QuestionKind::MultipleChoiceMultiple { correct_answer, .. } => correct_answer.join(", "),
            QuestionKind::ShortAnswer { correct_answer }
            | QuestionKind::Paragraph { correct_answer } => {
                correct_answer.clone().unwrap_or_default()
            }
        }
    }
}

/// The question type tag on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoiceSingle,
    MultipleChoiceMultiple,
    TrueFalse,
    ShortAnswer,
    Paragraph,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::MultipleChoiceSingle,
        QuestionType::MultipleChoiceMultiple,
        QuestionType::TrueFalse,
        QuestionType::ShortAnswer,
        QuestionType::Paragraph,
    ];

    /// Human label, e.g. "Multiple Choice Single".
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoiceSingle => "Multiple Choice Single",
            QuestionType::MultipleChoiceMultiple => "Multiple Choice Multiple",
            QuestionType::TrueFalse => "True False",
            QuestionType::ShortAnswer => "Short Answer",
            QuestionType::Paragraph => "Paragraph",
        }
    }

    /// Whether the type carries an option list.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::MultipleChoiceSingle | QuestionType::MultipleChoiceMultiple
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionType::MultipleChoiceSingle => "multiple_choice_single",
            QuestionType::MultipleChoiceMultiple => "multiple_choice_multiple",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
            QuestionType::Paragraph => "paragraph",
        };
        write!(f, "{s}")
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "multiple_choice_single" | "single" | "mcq" => Ok(QuestionType::MultipleChoiceSingle),
            "multiple_choice_multiple" | "multiple" | "multi" => {
                Ok(QuestionType::MultipleChoiceMultiple)
            }
            "true_false" | "tf" => Ok(QuestionType::TrueFalse),
            "short_answer" | "short" => Ok(QuestionType::ShortAnswer),
            "paragraph" => Ok(QuestionType::Paragraph),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A submitted answer: a single string, or a list for multi-select questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    /// Render the answer with multi-select items joined by `sep`.
    pub fn joined(&self, sep: &str) -> String {
        match self {
            AnswerValue::Text(s) => s.clone(),
            AnswerValue::Choices(items) => items.join(sep),
        }
    }
}

/// Answers keyed by question index as a string (`"0"`, `"1"`, ...).
pub type Answers = BTreeMap<String, AnswerValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_display_and_parse() {
        for t in QuestionType::ALL {
            assert_eq!(t.to_string().parse::<QuestionType>().unwrap(), t);
        }
        assert_eq!("tf".parse::<QuestionType>().unwrap(), QuestionType::TrueFalse);
        assert_eq!(
            "multiple-choice-multiple".parse::<QuestionType>().unwrap(),
            QuestionType::MultipleChoiceMultiple
        );
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn question_defaults_weight_to_one() {
        let q: Question =
            serde_json::from_str(r#"{"type":"true_false","text":"Sky is blue?","correct_answer":"True"}"#)
                .unwrap();
        assert_eq!(q.weight, 1.0);
        assert_eq!(q.question_type(), QuestionType::TrueFalse);
    }

    #[test]
    fn weight_accepts_numeric_string() {
        let q: Question = serde_json::from_str(
            r#"{"type":"short_answer","text":"Capital of France?","weight":"2.5","correct_answer":"Paris"}"#,
        )
        .unwrap();
        assert_eq!(q.weight, 2.5);
    }

    #[test]
    fn weight_rejects_non_numeric_string() {
        let err = serde_json::from_str::<Question>(
            r#"{"type":"short_answer","text":"Q","weight":"heavy"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("weight must be a number"));
    }

    #[test]
    fn multi_select_requires_list_answer() {
        let bad = r#"{"type":"multiple_choice_multiple","text":"Q","options":["A","B"],"correct_answer":"A"}"#;
        assert!(serde_json::from_str::<Question>(bad).is_err());
    }

    #[test]
    fn null_correct_answer_is_tolerated() {
        let q: Question = serde_json::from_str(
            r#"{"type":"multiple_choice_single","text":"Q","options":["A","B"],"correct_answer":null}"#,
        )
        .unwrap();
        assert!(matches!(
            q.kind,
            QuestionKind::MultipleChoiceSingle { ref correct_answer, .. } if correct_answer.is_empty()
        ));
    }

    #[test]
    fn manual_grading_detection() {
        let manual: Question =
            serde_json::from_str(r#"{"type":"paragraph","text":"Discuss.","correct_answer":"  "}"#).unwrap();
        assert!(manual.needs_manual_grading());

        let auto: Question =
            serde_json::from_str(r#"{"type":"short_answer","text":"2+2?","correct_answer":"4"}"#).unwrap();
        assert!(!auto.needs_manual_grading());
    }

    #[test]
    fn answer_value_untagged() {
        let answers: Answers = serde_json::from_str(r#"{"0":"Paris","1":["A","B"]}"#).unwrap();
        assert_eq!(answers["0"], AnswerValue::Text("Paris".into()));
        assert_eq!(answers["1"].joined("; "), "A; B");
    }

    #[test]
    fn quiz_serde_roundtrip_keeps_type_tag() {
        let quiz = Quiz {
            name: "geo".into(),
            title: "Geography".into(),
            require_full_name: true,
            timer_minutes: 10,
            shuffle_questions: false,
            start_message: String::new(),
            end_message: default_end_message(),
            questions: vec![Question {
                text: "Pick".into(),
                weight: 2.0,
                kind: QuestionKind::MultipleChoiceMultiple {
                    options: vec!["A".into(), "B".into(), "C".into()],
                    correct_answer: vec!["A".into(), "C".into()],
                },
            }],
            last_modified: None,
        };
        let json = serde_json::to_value(&quiz).unwrap();
        assert_eq!(json["questions"][0]["type"], "multiple_choice_multiple");
        let back: Quiz = serde_json::from_value(json).unwrap();
        assert_eq!(back, quiz);
    }
}
