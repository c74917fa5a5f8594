//! The `quizdesk delete` command.

use anyhow::Result;

use quizdesk_core::config::QuizdeskConfig;
use quizdesk_core::store::DeleteOutcome;

pub fn execute(config: &QuizdeskConfig, name: &str) -> Result<()> {
    match super::store(config).delete(name)? {
        DeleteOutcome::Deleted => println!("Deleted quiz {name:?}"),
        DeleteOutcome::NotFound => println!("Quiz {name:?} not found, nothing deleted."),
    }
    Ok(())
}
