//! The `quizdesk list` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizdesk_core::config::QuizdeskConfig;

pub fn execute(config: &QuizdeskConfig) -> Result<()> {
    let store = super::store(config);
    let names = store.list()?;

    if names.is_empty() {
        println!(
            "No quizzes found in {}. Run `quizdesk init` or `quizdesk new <name>`.",
            store.data_dir().display()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Name", "Title", "Questions", "Timer", "Last modified"]);

    for name in &names {
        match store.load(name) {
            Ok(quiz) => {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(&quiz.title),
                    Cell::new(quiz.questions.len()),
                    Cell::new(format!("{} min", quiz.timer_minutes)),
                    Cell::new(
                        quiz.last_modified
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                ]);
            }
            Err(e) => {
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(format!("(unreadable: {e})")),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                ]);
            }
        }
    }

    println!("{table}");
    Ok(())
}
