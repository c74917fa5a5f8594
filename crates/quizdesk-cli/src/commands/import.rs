//! The `quizdesk import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::parser::lint_quiz;

pub fn execute(config: &QuizdeskConfig, file: PathBuf) -> Result<()> {
    let store = super::store(config);
    let quiz = store
        .import(&file)
        .with_context(|| format!("failed to import {}", file.display()))?;

    println!(
        "Imported {:?} ({} questions) into {}",
        quiz.name,
        quiz.questions.len(),
        store.path_for(&quiz.name).display()
    );
    super::print_warnings(&lint_quiz(&quiz));
    Ok(())
}
