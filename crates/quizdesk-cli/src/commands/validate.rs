//! The `quizdesk validate` command.

use std::path::Path;

use anyhow::{Context, Result};

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::parser::{lint_quiz, parse_quiz_file, validate_for_activation};

/// `target` is a file path when one exists, otherwise a stored quiz name.
pub fn execute(config: &QuizdeskConfig, target: &str) -> Result<()> {
    let path = Path::new(target);
    let quiz = if path.is_file() {
        parse_quiz_file(path)?
    } else {
        super::store(config).load(target)?
    };

    println!("Quiz: {} ({} questions)", quiz.title, quiz.questions.len());

    validate_for_activation(&quiz)
        .with_context(|| format!("quiz {:?} cannot be served", quiz.name))?;

    let warnings = lint_quiz(&quiz);
    super::print_warnings(&warnings);

    if warnings.is_empty() {
        println!("Quiz is valid.");
    } else {
        println!("\nQuiz is valid, {} warning(s) found.", warnings.len());
    }

    Ok(())
}
