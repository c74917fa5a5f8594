//! The `quizdesk edit` command: change quiz properties, keep the questions.

use anyhow::{bail, Result};

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::error::ValidationError;
use quizdesk_core::model::Quiz;

/// Property changes collected from the command line. `None` leaves a
/// property as it is.
#[derive(Debug, Default)]
pub struct QuizEdits {
    pub title: Option<String>,
    pub timer: Option<u32>,
    pub shuffle: Option<bool>,
    pub require_full_name: Option<bool>,
    pub start_message: Option<String>,
    pub end_message: Option<String>,
}

impl QuizEdits {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.timer.is_none()
            && self.shuffle.is_none()
            && self.require_full_name.is_none()
            && self.start_message.is_none()
            && self.end_message.is_none()
    }

    /// Apply to `quiz`, returning the names of the changed properties.
    fn apply(self, quiz: &mut Quiz) -> Result<Vec<&'static str>, ValidationError> {
        let mut changed = Vec::new();
        if let Some(title) = self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle);
            }
            quiz.title = title;
            changed.push("title");
        }
        if let Some(timer) = self.timer {
            if timer == 0 {
                return Err(ValidationError::InvalidTimer);
            }
            quiz.timer_minutes = timer;
            changed.push("timer");
        }
        if let Some(shuffle) = self.shuffle {
            quiz.shuffle_questions = shuffle;
            changed.push("shuffle");
        }
        if let Some(required) = self.require_full_name {
            quiz.require_full_name = required;
            changed.push("name requirement");
        }
        if let Some(message) = self.start_message {
            quiz.start_message = message;
            changed.push("start message");
        }
        if let Some(message) = self.end_message {
            quiz.end_message = message;
            changed.push("end message");
        }
        Ok(changed)
    }
}

pub fn execute(config: &QuizdeskConfig, name: &str, edits: QuizEdits) -> Result<()> {
    if edits.is_empty() {
        bail!("nothing to change; pass at least one of --title, --timer, --shuffle, --require-name, --start-message, --end-message");
    }

    let store = super::store(config);
    let mut quiz = store.load(name)?;
    let changed = edits.apply(&mut quiz)?;
    store.save(&mut quiz)?;

    println!("Updated {name:?}: {}", changed.join(", "));
    let warnings: Vec<_> = quizdesk_core::parser::lint_quiz(&quiz)
        .into_iter()
        .filter(|w| w.question.is_none())
        .collect();
    super::print_warnings(&warnings);
    Ok(())
}
