//! The `quizdesk move-question` command.

use anyhow::{bail, Result};

use quizdesk_core::config::QuizdeskConfig;

/// Move question `from` to position `to` (both 1-based); the others shift.
pub fn execute(config: &QuizdeskConfig, name: &str, from: usize, to: usize) -> Result<()> {
    let store = super::store(config);
    let mut quiz = store.load(name)?;

    let count = quiz.questions.len();
    for number in [from, to] {
        if number == 0 || number > count {
            bail!("{name:?} has {count} question(s); there is no question {number}");
        }
    }
    if from == to {
        println!("Question {from} is already at position {to}.");
        return Ok(());
    }

    let question = quiz.questions.remove(from - 1);
    let text = question.text.clone();
    quiz.questions.insert(to - 1, question);
    store.save(&mut quiz)?;
    println!("Moved question {from} to position {to} in {name:?}: {text}");
    Ok(())
}
