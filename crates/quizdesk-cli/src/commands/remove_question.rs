//! The `quizdesk remove-question` command.

use anyhow::{bail, Result};

use quizdesk_core::config::QuizdeskConfig;

pub fn execute(config: &QuizdeskConfig, name: &str, number: usize) -> Result<()> {
    let store = super::store(config);
    let mut quiz = store.load(name)?;

    let count = quiz.questions.len();
    if number == 0 || number > count {
        bail!("{name:?} has {count} question(s); there is no question {number}");
    }

    let removed = quiz.questions.remove(number - 1);
    store.save(&mut quiz)?;
    println!("Removed question {number} from {name:?}: {}", removed.text);
    if quiz.questions.is_empty() {
        println!("The quiz has no questions left and cannot be served until one is added.");
    }
    Ok(())
}
