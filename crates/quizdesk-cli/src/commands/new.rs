//! The `quizdesk new` command.

use anyhow::{bail, Result};

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::model::Quiz;
use quizdesk_core::store::default_quiz;

/// Settings collected from the command line.
pub struct NewQuiz {
    pub name: String,
    pub title: Option<String>,
    pub timer: u32,
    pub shuffle: bool,
    pub require_full_name: bool,
    pub start_message: Option<String>,
    pub end_message: Option<String>,
    pub force: bool,
}

pub fn execute(config: &QuizdeskConfig, args: NewQuiz) -> Result<()> {
    let store = super::store(config);
    if store.exists(&args.name) && !args.force {
        bail!(
            "quiz {:?} already exists (use --force to overwrite)",
            args.name
        );
    }

    let defaults = default_quiz();
    let mut quiz = Quiz {
        title: args.title.unwrap_or(defaults.title.clone()),
        name: args.name,
        timer_minutes: args.timer,
        shuffle_questions: args.shuffle,
        require_full_name: args.require_full_name,
        start_message: args.start_message.unwrap_or(defaults.start_message.clone()),
        end_message: args.end_message.unwrap_or(defaults.end_message.clone()),
        ..defaults
    };

    let path = store.save(&mut quiz)?;
    println!("Created quiz {:?} at {}", quiz.name, path.display());
    println!("Add questions with: quizdesk add-question {:?} --type <type> --text <text>", quiz.name);
    Ok(())
}
